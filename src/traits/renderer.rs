use anyhow::Result;

use crate::camera::OrthoCamera;
use crate::scene::Scene;

/// Draws a scene to some output. The session owns one and drives it.
pub trait SceneRenderer {
    /// Viewport changed; `width`/`height` are CSS-style pixels, the backing
    /// store is `size * pixel_ratio`
    fn resize(&mut self, pixel_ratio: f32, width: u32, height: u32);

    /// Issue the draw for the current scene state
    fn draw(&mut self, scene: &Scene, camera: &OrthoCamera) -> Result<()>;

    /// Release GPU resources. Safe to call more than once.
    fn dispose(&mut self);

    fn is_disposed(&self) -> bool;
}
