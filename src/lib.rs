pub mod camera;
pub mod cli;
pub mod driver;
pub mod easing;
pub mod frame;
pub mod geometry;
pub mod math;
pub mod noise;
pub mod palettes;
pub mod random;
pub mod renderer;
pub mod scene;
pub mod session;
pub mod settings;
pub mod shaders;
pub mod traits;
pub mod types;

pub use camera::OrthoCamera;
pub use cli::Cli;
pub use driver::AnimationDriver;
pub use easing::{CubicBezier, Easing, EasingDomain, EasingKind};
pub use frame::{FrameInfo, Playback};
pub use palettes::Palette;
pub use random::Random;
pub use renderer::WgpuRenderer;
pub use scene::{Scene, SceneBuilder, Variant};
pub use session::{build_scene, AnimationSession};
pub use settings::SketchSettings;
pub use traits::SceneRenderer;
