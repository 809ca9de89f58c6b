use anyhow::{bail, Context, Result};

/// Linear RGB color, as uploaded to the GPU
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color(pub [f32; 3]);

impl Color {
    pub const WHITE: Color = Color([1.0, 1.0, 1.0]);

    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self([r, g, b])
    }

    /// Parse `#rrggbb` (sRGB) into linear RGB
    pub fn from_hex(hex: &str) -> Result<Self> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        if digits.len() != 6 || !digits.is_ascii() {
            bail!("invalid hex color {:?}", hex);
        }

        let channel = |range: std::ops::Range<usize>| -> Result<f32> {
            let byte = u8::from_str_radix(&digits[range], 16)
                .with_context(|| format!("invalid hex color {:?}", hex))?;
            Ok(srgb_to_linear(byte as f32 / 255.0))
        };

        Ok(Self([channel(0..2)?, channel(2..4)?, channel(4..6)?]))
    }

    /// Build from hue [0, 360), saturation and lightness in [0, 1] (sRGB)
    pub fn from_hsl(h: f32, s: f32, l: f32) -> Self {
        let [r, g, b] = hsl_to_rgb(h / 360.0, s, l);
        Self([srgb_to_linear(r), srgb_to_linear(g), srgb_to_linear(b)])
    }

    pub fn to_array(&self) -> [f32; 3] {
        self.0
    }

    pub fn to_wgpu(&self) -> wgpu::Color {
        let [r, g, b] = self.0;
        wgpu::Color {
            r: r as f64,
            g: g as f64,
            b: b as f64,
            a: 1.0,
        }
    }
}

pub fn hsl_to_rgb(h: f32, s: f32, l: f32) -> [f32; 3] {
    let c = (1.0 - (2.0 * l - 1.0).abs()) * s;
    let h_prime = (h.rem_euclid(1.0) * 6.0) % 6.0;
    let x = c * (1.0 - ((h_prime % 2.0) - 1.0).abs());
    let m = l - c / 2.0;

    let (r, g, b) = match h_prime as i32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };

    [r + m, g + m, b + m]
}

pub fn srgb_to_linear(c: f32) -> f32 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hsl_to_rgb_red() {
        let rgb = hsl_to_rgb(0.0, 1.0, 0.5);
        assert!((rgb[0] - 1.0).abs() < 0.01);
        assert!(rgb[1].abs() < 0.01);
        assert!(rgb[2].abs() < 0.01);
    }

    #[test]
    fn test_hsl_to_rgb_grey() {
        // hsl(0, 0%, 40%) is the ambient light
        let rgb = hsl_to_rgb(0.0, 0.0, 0.4);
        for channel in rgb {
            assert!((channel - 0.4).abs() < 0.001);
        }
    }

    #[test]
    fn test_from_hex_white_and_black() {
        assert_eq!(Color::from_hex("#ffffff").unwrap(), Color::WHITE);
        assert_eq!(Color::from_hex("000000").unwrap(), Color::new(0.0, 0.0, 0.0));
    }

    #[test]
    fn test_from_hex_is_linearized() {
        let c = Color::from_hex("#808080").unwrap();
        // sRGB 0.5 is roughly 0.216 linear
        assert!((c.0[0] - 0.2158).abs() < 0.001);
    }

    #[test]
    fn test_from_hex_rejects_garbage() {
        assert!(Color::from_hex("#12345").is_err());
        assert!(Color::from_hex("#zzzzzz").is_err());
        assert!(Color::from_hex("#ééé").is_err());
    }
}
