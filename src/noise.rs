//! 4D value noise used for vertex displacement.
//!
//! This is the CPU twin of `noise4`/`displace` in `cubes.wgsl`: same lattice
//! hash, same quintic fade, same constants (the constants are injected into
//! the shader source from here, see [`crate::shaders`]).

use glam::{IVec4, Vec3, Vec4};

/// Spatial frequency applied to local vertex positions
pub const FREQUENCY: f32 = 1.5;
/// Maximum displacement per axis in local units
pub const AMPLITUDE: f32 = 0.25;
/// Scale applied to elapsed seconds before it enters the fourth axis
pub const TIME_RATE: f32 = 0.5;
/// Lattice offsets that decorrelate the y and z displacement samples
pub const OFFSET_Y: Vec3 = Vec3::new(17.1, 31.7, 5.3);
pub const OFFSET_Z: Vec3 = Vec3::new(-43.9, 9.2, 27.4);

pub const HASH_X: u32 = 0x8da6_b343;
pub const HASH_Y: u32 = 0xd816_3841;
pub const HASH_Z: u32 = 0xcb1a_b31f;
pub const HASH_W: u32 = 0x1656_67b1;
pub const HASH_MIX: u32 = 0x5bd1_e995;

/// Lattice value in [-1, 1]
pub fn hash4(cell: IVec4) -> f32 {
    let mut h = (cell.x as u32).wrapping_mul(HASH_X)
        ^ (cell.y as u32).wrapping_mul(HASH_Y)
        ^ (cell.z as u32).wrapping_mul(HASH_Z)
        ^ (cell.w as u32).wrapping_mul(HASH_W);
    h = (h ^ (h >> 13)).wrapping_mul(HASH_MIX);
    h ^= h >> 15;
    (h as f32 / u32::MAX as f32) * 2.0 - 1.0
}

fn fade(t: Vec4) -> Vec4 {
    t * t * t * (t * (t * 6.0 - 15.0) + 10.0)
}

/// Smooth value noise in [-1, 1], C2-continuous in every axis
pub fn noise4(p: Vec4) -> f32 {
    let cell = p.floor();
    let base = cell.as_ivec4();
    let u = fade(p - cell).to_array();

    (0..16u32)
        .map(|corner| {
            let bits = [corner & 1, (corner >> 1) & 1, (corner >> 2) & 1, (corner >> 3) & 1];
            let weight: f32 = bits
                .iter()
                .zip(u)
                .map(|(&bit, w)| if bit == 1 { w } else { 1.0 - w })
                .product();
            let offset = IVec4::new(bits[0] as i32, bits[1] as i32, bits[2] as i32, bits[3] as i32);
            weight * hash4(base + offset)
        })
        .sum()
}

/// Displacement added to a local vertex position at `time` seconds
pub fn displace(position: Vec3, time: f32) -> Vec3 {
    let q = position * FREQUENCY;
    let w = time * TIME_RATE;
    Vec3::new(
        noise4(q.extend(w)),
        noise4((q + OFFSET_Y).extend(w)),
        noise4((q + OFFSET_Z).extend(w)),
    ) * AMPLITUDE
}
