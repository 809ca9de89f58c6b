mod color;

pub use color::{hsl_to_rgb, srgb_to_linear, Color};
