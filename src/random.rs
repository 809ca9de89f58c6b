use anyhow::{bail, Result};

use crate::math::Color;
use crate::palettes::Palette;

/// Seedable source for every random draw made while building a scene.
///
/// The seed is kept so a run can be logged and reproduced.
#[derive(Debug, Clone)]
pub struct Random {
    rng: fastrand::Rng,
    seed: u64,
}

impl Random {
    /// Seed from entropy
    pub fn new() -> Self {
        Self::with_seed(fastrand::u64(..))
    }

    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: fastrand::Rng::with_seed(seed),
            seed,
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Uniform in [0, 1)
    pub fn value(&mut self) -> f32 {
        self.rng.f32()
    }

    /// Uniform in [lo, hi)
    pub fn range(&mut self, lo: f32, hi: f32) -> f32 {
        lo + (hi - lo) * self.value()
    }

    /// Uniform pick, `None` for an empty slice
    pub fn pick<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        if items.is_empty() {
            return None;
        }
        items.get(self.rng.usize(..items.len()))
    }

    pub fn pick_palette(&mut self, catalog: &[Palette]) -> Result<Palette> {
        match self.pick(catalog) {
            Some(palette) => Ok(palette.clone()),
            None => bail!("palette catalog is empty"),
        }
    }

    pub fn pick_color(&mut self, palette: &Palette) -> Color {
        // Palettes are non-empty by construction
        let index = self.rng.usize(..palette.len());
        palette.colors()[index]
    }
}

impl Default for Random {
    fn default() -> Self {
        Self::new()
    }
}
