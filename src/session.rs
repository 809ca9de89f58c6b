use anyhow::{bail, Result};

use crate::camera::OrthoCamera;
use crate::driver::AnimationDriver;
use crate::palettes;
use crate::random::Random;
use crate::scene::{Scene, SceneBuilder};
use crate::settings::SketchSettings;
use crate::traits::SceneRenderer;

/// Pick a palette and build the scene for a run, all before the first frame
pub fn build_scene(settings: &SketchSettings) -> Result<Scene> {
    let mut random = match settings.seed {
        Some(seed) => Random::with_seed(seed),
        None => Random::new(),
    };
    log::info!("Scene seed: {}", random.seed());

    let catalog = palettes::catalog()?;
    let palette = random.pick_palette(&catalog)?;
    Ok(SceneBuilder::new(settings.variant).build(&palette, &mut random))
}

/// Long-lived state for one running sketch: the scene, how it animates, how
/// it is viewed, and what draws it. The host calls `resize`, `render` and
/// `unload`; nothing here holds on to host callbacks.
pub struct AnimationSession<R: SceneRenderer> {
    scene: Scene,
    driver: AnimationDriver,
    camera: OrthoCamera,
    renderer: R,
    frames_rendered: u64,
    unloaded: bool,
}

impl<R: SceneRenderer> AnimationSession<R> {
    pub fn new(scene: Scene, driver: AnimationDriver, camera: OrthoCamera, renderer: R) -> Self {
        Self {
            scene,
            driver,
            camera,
            renderer,
            frames_rendered: 0,
            unloaded: false,
        }
    }

    /// Build the scene, driver and camera described by `settings`
    pub fn from_settings(settings: &SketchSettings, renderer: R) -> Result<Self> {
        let scene = build_scene(settings)?;
        Ok(Self::with_scene(settings, scene, renderer))
    }

    /// Wrap an already built scene; used when the renderer needs the scene's
    /// geometry before the session exists
    pub fn with_scene(settings: &SketchSettings, scene: Scene, renderer: R) -> Self {
        let driver = AnimationDriver::new(settings.easing());
        let camera = OrthoCamera::new(settings.aspect());

        log::info!(
            "Session ready: {:?} variant, {} cubes, {:?} easing ({:?} domain)",
            settings.variant,
            scene.len(),
            settings.easing_kind(),
            settings.easing_domain
        );

        Self::new(scene, driver, camera, renderer)
    }

    pub fn resize(&mut self, pixel_ratio: f32, width: u32, height: u32) {
        if width == 0 || height == 0 {
            log::debug!("Ignoring resize to {}x{}", width, height);
            return;
        }
        self.camera.resize(width as f32 / height as f32);
        self.renderer.resize(pixel_ratio, width, height);
    }

    /// Apply the animation for this frame, then draw it
    pub fn render(&mut self, playhead: f32, elapsed: f32) -> Result<()> {
        if self.unloaded {
            bail!("render called after unload");
        }

        self.driver.update(&mut self.scene, playhead, elapsed);
        self.renderer.draw(&self.scene, &self.camera)?;
        self.frames_rendered += 1;
        Ok(())
    }

    /// Release renderer resources; later calls do nothing
    pub fn unload(&mut self) {
        if self.unloaded {
            return;
        }
        self.renderer.dispose();
        self.unloaded = true;
        log::info!("Session unloaded after {} frames", self.frames_rendered);
    }

    pub fn is_unloaded(&self) -> bool {
        self.unloaded
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn camera(&self) -> &OrthoCamera {
        &self.camera
    }

    pub fn driver(&self) -> &AnimationDriver {
        &self.driver
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn frames_rendered(&self) -> u64 {
        self.frames_rendered
    }
}
