use glam::{Mat4, Vec3};

use crate::scene::Scene;
use crate::types::FrameUniform;

pub const CAMERA_ZOOM: f32 = 1.5;
pub const CAMERA_NEAR: f32 = -100.0;
pub const CAMERA_FAR: f32 = 100.0;

/// Static orthographic camera looking at the origin from (zoom, zoom, zoom)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrthoCamera {
    pub zoom: f32,
    pub left: f32,
    pub right: f32,
    pub top: f32,
    pub bottom: f32,
    pub near: f32,
    pub far: f32,
    pub position: Vec3,
    pub target: Vec3,
}

impl OrthoCamera {
    pub fn new(aspect: f32) -> Self {
        let mut camera = Self {
            zoom: CAMERA_ZOOM,
            left: -1.0,
            right: 1.0,
            top: 1.0,
            bottom: -1.0,
            near: CAMERA_NEAR,
            far: CAMERA_FAR,
            position: Vec3::splat(CAMERA_ZOOM),
            target: Vec3::ZERO,
        };
        camera.resize(aspect);
        camera
    }

    /// Recompute the frustum bounds for a viewport aspect ratio (width / height)
    pub fn resize(&mut self, aspect: f32) {
        let aspect = if aspect.is_finite() && aspect > 0.0 { aspect } else { 1.0 };

        self.left = -self.zoom * aspect;
        self.right = self.zoom * aspect;
        self.top = self.zoom;
        self.bottom = -self.zoom;

        self.near = CAMERA_NEAR;
        self.far = CAMERA_FAR;

        self.position = Vec3::splat(self.zoom);
        self.target = Vec3::ZERO;
    }

    pub fn aspect(&self) -> f32 {
        (self.right - self.left) / (self.top - self.bottom)
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, Vec3::Y)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::orthographic_rh(self.left, self.right, self.bottom, self.top, self.near, self.far)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// Camera and light state for one frame. Lights sit under the rotating
    /// root, but the directional light lies on the z axis so its direction is
    /// unaffected by the z rotation.
    pub fn to_uniform(&self, scene: &Scene) -> FrameUniform {
        let ambient = scene.ambient().color.to_array();
        let light = scene.directional();
        let direction = scene.root_matrix().transform_vector3(light.direction());

        FrameUniform {
            view_proj: self.view_projection().to_cols_array_2d(),
            ambient: [ambient[0], ambient[1], ambient[2], 1.0],
            light_color: {
                let [r, g, b] = light.color.to_array();
                [r, g, b, light.intensity]
            },
            light_direction: direction.extend(0.0).to_array(),
        }
    }
}

impl Default for OrthoCamera {
    fn default() -> Self {
        Self::new(1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec4Swizzles;

    #[test]
    fn test_resize_bounds() {
        let camera = OrthoCamera::new(2.0);
        assert_eq!(camera.left, -3.0);
        assert_eq!(camera.right, 3.0);
        assert_eq!(camera.top, 1.5);
        assert_eq!(camera.bottom, -1.5);
        assert_eq!(camera.near, -100.0);
        assert_eq!(camera.far, 100.0);
        assert_eq!(camera.aspect(), 2.0);
    }

    #[test]
    fn test_resize_ignores_degenerate_aspect() {
        let mut camera = OrthoCamera::new(1.0);
        camera.resize(f32::NAN);
        assert_eq!(camera.aspect(), 1.0);
        camera.resize(0.0);
        assert_eq!(camera.aspect(), 1.0);
    }

    #[test]
    fn test_origin_projects_to_center() {
        let camera = OrthoCamera::new(16.0 / 9.0);
        let clip = camera.view_projection() * glam::Vec4::new(0.0, 0.0, 0.0, 1.0);
        assert!(clip.xy().length() < 1e-6);
        // Depth lands inside wgpu's [0, 1] range
        assert!(clip.z > 0.0 && clip.z < 1.0);
    }

    #[test]
    fn test_camera_position_follows_zoom() {
        let camera = OrthoCamera::default();
        assert_eq!(camera.position, Vec3::splat(CAMERA_ZOOM));
        assert_eq!(camera.target, Vec3::ZERO);
    }
}
