use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use crate::easing::{Easing, EasingDomain, EasingKind};
use crate::scene::Variant;

/// Drawing context requested from the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ContextKind {
    /// 3D-capable GPU context
    #[default]
    Webgpu,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContextAttributes {
    pub antialias: bool,
}

impl Default for ContextAttributes {
    fn default() -> Self {
        Self { antialias: true }
    }
}

/// Sketch configuration. Every field has a default, so a JSON file only
/// needs the keys it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SketchSettings {
    /// Output size in pixels, [width, height]
    pub dimensions: [u32; 2],
    pub fps: u32,
    /// Loop length in seconds
    pub duration: f32,
    /// Repeating playback; `false` renders a single frame
    pub animate: bool,
    pub context: ContextKind,
    pub attributes: ContextAttributes,
    pub variant: Variant,
    /// Overrides the variant's default easing
    pub easing: Option<EasingKind>,
    pub easing_domain: EasingDomain,
    /// Fixed seed for reproducible scenes
    pub seed: Option<u64>,
}

impl Default for SketchSettings {
    fn default() -> Self {
        Self {
            dimensions: [512, 512],
            fps: 24,
            duration: 8.0,
            animate: true,
            context: ContextKind::default(),
            attributes: ContextAttributes::default(),
            variant: Variant::default(),
            easing: None,
            easing_domain: EasingDomain::default(),
            seed: None,
        }
    }
}

impl SketchSettings {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read settings from {}", path.display()))?;
        Self::from_json(&text).with_context(|| format!("invalid settings in {}", path.display()))
    }

    pub fn from_json(text: &str) -> Result<Self> {
        let settings: Self = serde_json::from_str(text)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        let [width, height] = self.dimensions;
        if width == 0 || height == 0 {
            bail!("dimensions must be non-zero, got {}x{}", width, height);
        }
        if self.fps == 0 {
            bail!("fps must be greater than zero");
        }
        if !(self.duration.is_finite() && self.duration > 0.0) {
            bail!("duration must be a positive number of seconds, got {}", self.duration);
        }
        Ok(())
    }

    pub fn width(&self) -> u32 {
        self.dimensions[0]
    }

    pub fn height(&self) -> u32 {
        self.dimensions[1]
    }

    pub fn aspect(&self) -> f32 {
        self.width() as f32 / self.height() as f32
    }

    /// Frames in one loop; at least one
    pub fn total_frames(&self) -> u64 {
        ((self.fps as f32 * self.duration).round() as u64).max(1)
    }

    pub fn easing_kind(&self) -> EasingKind {
        self.easing.unwrap_or_else(|| self.variant.default_easing())
    }

    pub fn easing(&self) -> Easing {
        Easing::new(self.easing_kind(), self.easing_domain)
    }
}
