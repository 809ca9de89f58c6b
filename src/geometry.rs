use crate::types::Vertex;

/// Indexed triangle mesh shared by every instance in a scene
#[derive(Debug, Clone, PartialEq)]
pub struct Geometry {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u16>,
}

impl Geometry {
    /// Axis-aligned cube of edge 1 centred on the origin.
    ///
    /// Four vertices per face so every face gets its own normal and a full
    /// [0, 1] UV square; the displaced fragment stage relies on `uv.x` sweeping
    /// across each face.
    pub fn unit_cube() -> Self {
        // (normal, u axis, v axis) per face
        let faces: [([f32; 3], [f32; 3], [f32; 3]); 6] = [
            ([1.0, 0.0, 0.0], [0.0, 0.0, -1.0], [0.0, 1.0, 0.0]),
            ([-1.0, 0.0, 0.0], [0.0, 0.0, 1.0], [0.0, 1.0, 0.0]),
            ([0.0, 1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, -1.0]),
            ([0.0, -1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 1.0]),
            ([0.0, 0.0, 1.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
            ([0.0, 0.0, -1.0], [-1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
        ];

        let corners = [(0.0, 1.0), (1.0, 1.0), (0.0, 0.0), (1.0, 0.0)];

        let vertices = faces
            .iter()
            .flat_map(|&(normal, u_axis, v_axis)| {
                corners.iter().map(move |&(u, v)| {
                    let (su, sv) = (u - 0.5, v - 0.5);
                    let position = [
                        normal[0] * 0.5 + u_axis[0] * su + v_axis[0] * sv,
                        normal[1] * 0.5 + u_axis[1] * su + v_axis[1] * sv,
                        normal[2] * 0.5 + u_axis[2] * su + v_axis[2] * sv,
                    ];
                    Vertex::new(position, normal, [u, v])
                })
            })
            .collect();

        // Two CCW triangles per face: (0, 2, 1) and (2, 3, 1)
        let indices = (0..6u16)
            .flat_map(|face| {
                let base = face * 4;
                [base, base + 2, base + 1, base + 2, base + 3, base + 1]
            })
            .collect();

        Self { vertices, indices }
    }

    pub fn index_count(&self) -> u32 {
        self.indices.len() as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn test_unit_cube_counts() {
        let cube = Geometry::unit_cube();
        assert_eq!(cube.vertices.len(), 24);
        assert_eq!(cube.indices.len(), 36);
        assert!(cube.indices.iter().all(|&i| (i as usize) < cube.vertices.len()));
    }

    #[test]
    fn test_unit_cube_fits_unit_box() {
        let cube = Geometry::unit_cube();
        for v in &cube.vertices {
            for c in v.position {
                assert!((c.abs() - 0.5).abs() < 1e-6, "corner component {} not at +-0.5", c);
            }
        }
    }

    #[test]
    fn test_unit_cube_triangles_face_outward() {
        let cube = Geometry::unit_cube();
        for tri in cube.indices.chunks(3) {
            let [a, b, c] = [tri[0], tri[1], tri[2]].map(|i| Vec3::from(cube.vertices[i as usize].position));
            let normal = Vec3::from(cube.vertices[tri[0] as usize].normal);
            let winding = (b - a).cross(c - a);
            assert!(winding.dot(normal) > 0.0);
        }
    }

    #[test]
    fn test_unit_cube_uvs_span_each_face() {
        let cube = Geometry::unit_cube();
        for face in cube.vertices.chunks(4) {
            let min_u = face.iter().map(|v| v.uv[0]).fold(f32::MAX, f32::min);
            let max_u = face.iter().map(|v| v.uv[0]).fold(f32::MIN, f32::max);
            assert_eq!((min_u, max_u), (0.0, 1.0));
        }
    }
}
