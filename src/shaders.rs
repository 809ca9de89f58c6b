use crate::noise;

pub const VS_FLAT: &str = "vs_flat";
pub const VS_DISPLACED: &str = "vs_displaced";
pub const FS_FLAT: &str = "fs_flat";
pub const FS_DISPLACED: &str = "fs_displaced";

const CUBES_WGSL: &str = include_str!("cubes.wgsl");

fn vec3_literal(v: glam::Vec3) -> String {
    format!("vec3<f32>({:?}, {:?}, {:?})", v.x, v.y, v.z)
}

/// WGSL source for both cube pipelines, with the noise constants taken from
/// [`crate::noise`] so the GPU and CPU displacement stay identical
pub fn cubes_source() -> String {
    let constants = [
        format!("const NOISE_FREQUENCY: f32 = {:?};", noise::FREQUENCY),
        format!("const NOISE_AMPLITUDE: f32 = {:?};", noise::AMPLITUDE),
        format!("const NOISE_TIME_RATE: f32 = {:?};", noise::TIME_RATE),
        format!("const NOISE_OFFSET_Y: vec3<f32> = {};", vec3_literal(noise::OFFSET_Y)),
        format!("const NOISE_OFFSET_Z: vec3<f32> = {};", vec3_literal(noise::OFFSET_Z)),
        format!("const HASH_X: u32 = {}u;", noise::HASH_X),
        format!("const HASH_Y: u32 = {}u;", noise::HASH_Y),
        format!("const HASH_Z: u32 = {}u;", noise::HASH_Z),
        format!("const HASH_W: u32 = {}u;", noise::HASH_W),
        format!("const HASH_MIX: u32 = {}u;", noise::HASH_MIX),
    ];

    format!("{}\n\n{}", constants.join("\n"), CUBES_WGSL)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_points_present() {
        let source = cubes_source();
        for entry in [VS_FLAT, VS_DISPLACED, FS_FLAT, FS_DISPLACED] {
            assert!(source.contains(&format!("fn {}(", entry)), "missing {}", entry);
        }
    }

    #[test]
    fn test_constants_are_injected() {
        let source = cubes_source();
        assert!(source.contains("const NOISE_FREQUENCY: f32 = 1.5;"));
        assert!(source.contains("const NOISE_AMPLITUDE: f32 = 0.25;"));
        assert!(source.contains(&format!("const HASH_MIX: u32 = {}u;", 0x5bd1_e995u32)));
    }

    #[test]
    fn test_every_referenced_constant_is_defined() {
        let source = cubes_source();
        for name in ["NOISE_TIME_RATE", "NOISE_OFFSET_Y", "NOISE_OFFSET_Z", "HASH_X", "HASH_W"] {
            assert!(source.contains(&format!("const {}:", name)), "{} not defined", name);
        }
    }

    #[test]
    fn test_cubes_source_parses_and_validates() {
        let source = cubes_source();
        let module = naga::front::wgsl::parse_str(&source)
            .unwrap_or_else(|e| panic!("{}", e.emit_to_string(&source)));
        let info = naga::valid::Validator::new(
            naga::valid::ValidationFlags::all(),
            naga::valid::Capabilities::empty(),
        )
        .validate(&module);
        assert!(info.is_ok(), "{:?}", info.err());

        for entry in [VS_FLAT, VS_DISPLACED, FS_FLAT, FS_DISPLACED] {
            assert!(
                module.entry_points.iter().any(|ep| ep.name == entry),
                "missing entry point {}",
                entry
            );
        }
    }
}
