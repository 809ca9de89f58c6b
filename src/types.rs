use glam::{Mat3, Mat4};

/// Cube vertex as laid out in the vertex buffer
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

impl Vertex {
    const ATTRIBUTES: [wgpu::VertexAttribute; 3] =
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3, 2 => Float32x2];

    pub const fn new(position: [f32; 3], normal: [f32; 3], uv: [f32; 2]) -> Self {
        Self { position, normal, uv }
    }

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

/// Per-instance data for GPU
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct InstanceRaw {
    pub model: [[f32; 4]; 4],
    pub normal: [[f32; 4]; 3], // mat3 columns padded to vec4
    pub color: [f32; 3],
    pub time: f32, // Elapsed time for displaced instances, 0.0 otherwise
}

impl InstanceRaw {
    const ATTRIBUTES: [wgpu::VertexAttribute; 8] = wgpu::vertex_attr_array![
        3 => Float32x4,
        4 => Float32x4,
        5 => Float32x4,
        6 => Float32x4,
        7 => Float32x4,
        8 => Float32x4,
        9 => Float32x4,
        10 => Float32x4,
    ];

    pub fn new(model: Mat4, color: [f32; 3], time: f32) -> Self {
        Self {
            model: model.to_cols_array_2d(),
            normal: normal_matrix(model),
            color,
            time,
        }
    }

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<InstanceRaw>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

/// Inverse-transpose of the model's linear part. Degenerate (near-zero scale)
/// transforms fall back to the plain linear part.
fn normal_matrix(model: Mat4) -> [[f32; 4]; 3] {
    let linear = Mat3::from_mat4(model);
    let normal = if linear.determinant().abs() > 1e-8 {
        linear.inverse().transpose()
    } else {
        linear
    };
    [
        normal.x_axis.extend(0.0).to_array(),
        normal.y_axis.extend(0.0).to_array(),
        normal.z_axis.extend(0.0).to_array(),
    ]
}

/// Per-frame uniform: camera projection and the two scene lights
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct FrameUniform {
    pub view_proj: [[f32; 4]; 4],
    pub ambient: [f32; 4],
    pub light_color: [f32; 4], // rgb + intensity
    pub light_direction: [f32; 4], // Unit vector towards the light
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn test_layout_sizes_match_wgsl() {
        assert_eq!(std::mem::size_of::<Vertex>(), 32);
        assert_eq!(std::mem::size_of::<InstanceRaw>(), 128);
        assert_eq!(std::mem::size_of::<FrameUniform>(), 112);
    }

    #[test]
    fn test_normal_matrix_of_uniform_scale_keeps_direction() {
        let model = Mat4::from_scale(Vec3::splat(2.0));
        let raw = InstanceRaw::new(model, [1.0, 0.0, 0.0], 0.0);
        let n = Vec3::new(raw.normal[0][0], raw.normal[1][1], raw.normal[2][2]);
        assert!((n - Vec3::splat(0.5)).length() < 1e-6);
    }

    #[test]
    fn test_normal_matrix_handles_degenerate_scale() {
        let model = Mat4::from_scale(Vec3::new(0.0, 1.0, 1.0));
        let raw = InstanceRaw::new(model, [1.0, 1.0, 1.0], 0.0);
        assert!(raw.normal.iter().flatten().all(|v| v.is_finite()));
    }
}
