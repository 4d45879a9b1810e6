//! Determinism tests: identical inputs must encode to identical bytes.

use pbrforge_texture::{
    generate_by_name, DeterministicRng, GenerationConfig, MaterialRegistry, NormalConvention,
    Quality,
};

fn config(seed: u32) -> GenerationConfig {
    GenerationConfig::default()
        .with_resolution(32)
        .with_working_resolution(64)
        .with_seed(seed)
}

// ============================================================================
// Byte-identical output
// ============================================================================

/// Two independent runs of every material produce identical PNG bytes.
#[test]
fn test_every_material_is_byte_identical_across_runs() {
    let registry = MaterialRegistry::builtin();
    for name in registry.names() {
        let first = generate_by_name(&registry, name, &config(11)).unwrap().encode().unwrap();
        let second = generate_by_name(&registry, name, &config(11)).unwrap().encode().unwrap();

        assert_eq!(first.len(), second.len());
        for (a, b) in first.iter().zip(&second) {
            assert_eq!(a.suffix, b.suffix);
            assert_eq!(a.data, b.data, "{} {} differs between runs", name, a.suffix);
            assert_eq!(a.hash, b.hash);
        }
    }
}

/// Running materials on different threads does not change their output.
#[test]
fn test_parallel_generation_matches_sequential() {
    let registry = MaterialRegistry::builtin();
    let sequential = generate_by_name(&registry, "dirt", &config(5)).unwrap().encode().unwrap();

    let handles: Vec<_> = (0..4)
        .map(|_| {
            std::thread::spawn(move || {
                let registry = MaterialRegistry::builtin();
                generate_by_name(&registry, "dirt", &config(5))
                    .unwrap()
                    .encode()
                    .unwrap()
            })
        })
        .collect();

    for handle in handles {
        let parallel = handle.join().unwrap();
        for (a, b) in sequential.iter().zip(&parallel) {
            assert_eq!(a.hash, b.hash);
        }
    }
}

// ============================================================================
// Inputs that must change output
// ============================================================================

/// A different base seed changes the height map.
#[test]
fn test_seed_changes_output() {
    let registry = MaterialRegistry::builtin();
    let a = generate_by_name(&registry, "stone", &config(1)).unwrap().encode().unwrap();
    let b = generate_by_name(&registry, "stone", &config(2)).unwrap().encode().unwrap();
    let height = |maps: &[pbrforge_texture::generate::EncodedMap]| {
        maps.iter().find(|m| m.suffix == "height").map(|m| m.hash.clone())
    };
    assert_ne!(height(&a), height(&b));
}

/// Materials sharing an archetype never share noise for the same base seed.
#[test]
fn test_materials_do_not_collide() {
    let registry = MaterialRegistry::builtin();
    let moss = generate_by_name(&registry, "moss", &config(9)).unwrap();
    let snow = generate_by_name(&registry, "snow", &config(9)).unwrap();
    assert_ne!(moss.material_seed, snow.material_seed);
    assert_ne!(moss.height, snow.height);
}

/// The convention only touches the normal map.
#[test]
fn test_convention_only_changes_normals() {
    let registry = MaterialRegistry::builtin();
    let default = generate_by_name(&registry, "rock", &config(4)).unwrap();
    let mirrored = generate_by_name(
        &registry,
        "rock",
        &config(4).with_convention(NormalConvention::Mirrored),
    )
    .unwrap();

    assert_eq!(default.height, mirrored.height);
    assert_eq!(default.roughness, mirrored.roughness);
    assert_eq!(default.base_color, mirrored.base_color);
    assert_ne!(default.normal, mirrored.normal);

    let d = default.normal.to_rgb8();
    let m = mirrored.normal.to_rgb8();
    for (a, b) in d.chunks(3).zip(m.chunks(3)) {
        assert_eq!(a[0], b[0]);
        assert_eq!(a[2], b[2]);
    }
}

/// Quality tiers differ only through the detail pass.
#[test]
fn test_quality_changes_height() {
    let registry = MaterialRegistry::builtin();
    let low = generate_by_name(&registry, "sand", &config(3).with_quality(Quality::Low)).unwrap();
    let high = generate_by_name(&registry, "sand", &config(3).with_quality(Quality::High)).unwrap();
    assert_ne!(low.height, high.height);
}

// ============================================================================
// Seed derivation stability
// ============================================================================

/// Material seeds are pinned; changing them silently breaks exported packs.
#[test]
fn test_material_seed_golden_values() {
    assert_eq!(DeterministicRng::derive_material_seed(200, "stone"), 3216517451);
    assert_eq!(DeterministicRng::derive_material_seed(0, "stone"), 3635378491);
    assert_eq!(DeterministicRng::derive_material_seed(200, "sand"), 987264596);
    assert_eq!(DeterministicRng::derive_material_seed(42, "moss"), 2019420026);

    let registry = MaterialRegistry::builtin();
    let stone = generate_by_name(&registry, "stone", &config(200)).unwrap();
    assert_eq!(stone.material_seed, 3216517451);
}
