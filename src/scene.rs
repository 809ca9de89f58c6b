use std::rc::Rc;

use glam::{Mat4, Vec3};
use serde::{Deserialize, Serialize};

use crate::easing::EasingKind;
use crate::geometry::Geometry;
use crate::math::Color;
use crate::palettes::Palette;
use crate::random::Random;

/// Scale damping applied after the random draw; keeps cubes sub-unit
pub const SCALE_DAMPING: f32 = 0.5;

/// Which of the two sketches to build
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Variant {
    /// Lit, flat-colored cubes
    #[default]
    Flat,
    /// Noise-displaced cubes with a UV color gradient
    Shader,
}

impl Variant {
    pub const fn instance_count(self) -> usize {
        match self {
            Variant::Flat => 30,
            Variant::Shader => 40,
        }
    }

    pub const fn default_easing(self) -> EasingKind {
        match self {
            Variant::Flat => EasingKind::QuadInOut,
            Variant::Shader => EasingKind::CubicBezier,
        }
    }
}

/// Uniform set bound to a displaced instance
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShaderUniforms {
    pub color: Color,
    pub time: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Material {
    Flat { color: Color },
    Shader { uniforms: ShaderUniforms },
}

impl Material {
    pub fn color(&self) -> Color {
        match self {
            Material::Flat { color } => *color,
            Material::Shader { uniforms } => uniforms.color,
        }
    }

    /// Time uniform, `None` for flat materials
    pub fn time(&self) -> Option<f32> {
        match self {
            Material::Flat { .. } => None,
            Material::Shader { uniforms } => Some(uniforms.time),
        }
    }

    pub fn is_displaced(&self) -> bool {
        matches!(self, Material::Shader { .. })
    }
}

/// One cube: shared geometry, own material, fixed pose
#[derive(Debug, Clone)]
pub struct Instance {
    geometry: Rc<Geometry>,
    material: Material,
    position: Vec3,
    scale: Vec3,
}

impl Instance {
    pub fn geometry(&self) -> &Rc<Geometry> {
        &self.geometry
    }

    pub fn material(&self) -> &Material {
        &self.material
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn scale(&self) -> Vec3 {
        self.scale
    }

    /// Local transform, before the scene root rotation
    pub fn local_matrix(&self) -> Mat4 {
        Mat4::from_translation(self.position) * Mat4::from_scale(self.scale)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AmbientLight {
    pub color: Color,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DirectionalLight {
    pub color: Color,
    pub intensity: f32,
    pub position: Vec3,
}

impl DirectionalLight {
    /// Unit vector from the origin towards the light
    pub fn direction(&self) -> Vec3 {
        self.position.normalize_or_zero()
    }
}

/// Everything drawn in one frame. Only the root rotation and the shader time
/// uniforms change after construction.
#[derive(Debug, Clone)]
pub struct Scene {
    variant: Variant,
    geometry: Rc<Geometry>,
    instances: Vec<Instance>,
    ambient: AmbientLight,
    directional: DirectionalLight,
    background: Color,
    rotation_z: f32,
}

impl Scene {
    pub fn variant(&self) -> Variant {
        self.variant
    }

    pub fn geometry(&self) -> &Rc<Geometry> {
        &self.geometry
    }

    pub fn instances(&self) -> &[Instance] {
        &self.instances
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    pub fn ambient(&self) -> &AmbientLight {
        &self.ambient
    }

    pub fn directional(&self) -> &DirectionalLight {
        &self.directional
    }

    pub fn background(&self) -> Color {
        self.background
    }

    pub fn rotation(&self) -> f32 {
        self.rotation_z
    }

    pub fn set_rotation(&mut self, radians: f32) {
        self.rotation_z = radians;
    }

    /// Write elapsed time into every shader material's time uniform
    pub fn set_time(&mut self, elapsed: f32) {
        for instance in &mut self.instances {
            if let Material::Shader { uniforms } = &mut instance.material {
                uniforms.time = elapsed;
            }
        }
    }

    pub fn root_matrix(&self) -> Mat4 {
        Mat4::from_rotation_z(self.rotation_z)
    }

    /// World transform of one instance
    pub fn model_matrix(&self, instance: &Instance) -> Mat4 {
        self.root_matrix() * instance.local_matrix()
    }
}

/// Builds a scene from a palette and a random source
#[derive(Debug, Clone, Copy)]
pub struct SceneBuilder {
    variant: Variant,
    count: usize,
}

impl SceneBuilder {
    pub fn new(variant: Variant) -> Self {
        Self {
            variant,
            count: variant.instance_count(),
        }
    }

    /// Override the variant's default instance count
    pub fn instance_count(mut self, count: usize) -> Self {
        self.count = count;
        self
    }

    pub fn build(&self, palette: &Palette, random: &mut Random) -> Scene {
        let geometry = Rc::new(Geometry::unit_cube());

        let instances = (0..self.count)
            .map(|_| {
                let material = match self.variant {
                    Variant::Flat => Material::Flat {
                        color: random.pick_color(palette),
                    },
                    Variant::Shader => Material::Shader {
                        uniforms: ShaderUniforms {
                            color: random.pick_color(palette),
                            time: 0.0,
                        },
                    },
                };
                let position = random_vec3(random);
                let scale = random_vec3(random) * SCALE_DAMPING;

                Instance {
                    geometry: Rc::clone(&geometry),
                    material,
                    position,
                    scale,
                }
            })
            .collect::<Vec<_>>();

        log::debug!(
            "Scene built: {} {:?} instances from a {}-color palette",
            instances.len(),
            self.variant,
            palette.len()
        );

        Scene {
            variant: self.variant,
            geometry,
            instances,
            ambient: AmbientLight {
                color: Color::from_hsl(0.0, 0.0, 0.4),
            },
            directional: DirectionalLight {
                color: Color::WHITE,
                intensity: 1.0,
                position: Vec3::new(0.0, 0.0, 4.0),
            },
            background: Color::from_hsl(0.0, 0.0, 0.95),
            rotation_z: 0.0,
        }
    }
}

fn random_vec3(random: &mut Random) -> Vec3 {
    let x = random.range(-1.0, 1.0);
    let y = random.range(-1.0, 1.0);
    let z = random.range(-1.0, 1.0);
    Vec3::new(x, y, z)
}
