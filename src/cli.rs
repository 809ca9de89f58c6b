// cli.rs - Command-line interface configuration
use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use crate::easing::{EasingDomain, EasingKind};
use crate::scene::Variant;
use crate::settings::SketchSettings;

#[derive(Parser, Debug, Clone, Default)]
#[command(name = "loop-cubes")]
#[command(about = "Seamlessly looping cube sketches", long_about = None)]
pub struct Cli {
    /// JSON settings file; flags below override its values
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Sketch to build
    #[arg(long, value_enum)]
    pub variant: Option<Variant>,

    /// Seed for palette and cube placement
    #[arg(long)]
    pub seed: Option<u64>,

    /// Rotation easing (defaults per variant)
    #[arg(long, value_enum)]
    pub easing: Option<EasingKind>,

    /// Easing behavior outside [0, 1]
    #[arg(long = "easing-domain", value_enum)]
    pub easing_domain: Option<EasingDomain>,

    #[arg(long)]
    pub width: Option<u32>,

    #[arg(long)]
    pub height: Option<u32>,

    #[arg(long)]
    pub fps: Option<u32>,

    /// Loop length in seconds
    #[arg(long)]
    pub duration: Option<f32>,

    /// Render a single frame instead of looping
    #[arg(long, default_value = "false")]
    pub still: bool,
}

impl Cli {
    /// Defaults, then the config file, then flags
    pub fn settings(&self) -> Result<SketchSettings> {
        let base = match &self.config {
            Some(path) => SketchSettings::load(path)?,
            None => SketchSettings::default(),
        };
        let settings = self.apply(base);
        settings.validate()?;
        Ok(settings)
    }

    pub fn apply(&self, mut settings: SketchSettings) -> SketchSettings {
        if let Some(variant) = self.variant {
            settings.variant = variant;
        }
        if let Some(seed) = self.seed {
            settings.seed = Some(seed);
        }
        if let Some(easing) = self.easing {
            settings.easing = Some(easing);
        }
        if let Some(domain) = self.easing_domain {
            settings.easing_domain = domain;
        }
        if let Some(width) = self.width {
            settings.dimensions[0] = width;
        }
        if let Some(height) = self.height {
            settings.dimensions[1] = height;
        }
        if let Some(fps) = self.fps {
            settings.fps = fps;
        }
        if let Some(duration) = self.duration {
            settings.duration = duration;
        }
        if self.still {
            settings.animate = false;
        }
        settings
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_flags() {
        let cli = Cli::parse_from([
            "loop-cubes",
            "--variant",
            "shader",
            "--seed",
            "42",
            "--easing-domain",
            "extrapolate",
            "--still",
        ]);
        let settings = cli.settings().unwrap();
        assert_eq!(settings.variant, Variant::Shader);
        assert_eq!(settings.seed, Some(42));
        assert_eq!(settings.easing_domain, EasingDomain::Extrapolate);
        assert!(!settings.animate);
    }

    #[test]
    fn test_flags_override_base() {
        let cli = Cli {
            width: Some(1024),
            fps: Some(60),
            ..Default::default()
        };
        let settings = cli.apply(SketchSettings::default());
        assert_eq!(settings.dimensions, [1024, 512]);
        assert_eq!(settings.fps, 60);
        assert!(settings.animate);
    }

    #[test]
    fn test_invalid_override_rejected() {
        let cli = Cli {
            duration: Some(0.0),
            ..Default::default()
        };
        assert!(cli.settings().is_err());
    }

    #[test]
    fn test_missing_config_file_errors() {
        let cli = Cli {
            config: Some(PathBuf::from("/definitely/not/here.json")),
            ..Default::default()
        };
        let err = cli.settings().unwrap_err();
        assert!(format!("{:#}", err).contains("failed to read settings"));
    }
}
