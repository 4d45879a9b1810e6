//! Field invariants: ranges, tiling, packing fidelity and resolution stability.

use std::collections::HashMap;

use pbrforge_texture::{
    generate_by_name, pack_channels, unpack_channel, GenerationConfig, MapKind, MaterialRegistry,
    NormalDeriver, PackedChannels, ScalarField,
};

fn native(resolution: u32, seed: u32) -> GenerationConfig {
    GenerationConfig::default()
        .with_resolution(resolution)
        .with_working_resolution(resolution)
        .with_seed(seed)
}

// ============================================================================
// Range invariant
// ============================================================================

/// Every scalar and vector field of every material lies in [0, 1].
#[test]
fn test_all_fields_in_unit_range() {
    let registry = MaterialRegistry::builtin();
    for name in registry.names() {
        for config in [native(64, 21), native(64, 21).with_resolution(16)] {
            let set = generate_by_name(&registry, name, &config).unwrap();
            for kind in [MapKind::Height, MapKind::Roughness, MapKind::Metallic, MapKind::Ao] {
                assert_eq!(
                    set.scalar(kind).find_out_of_range(),
                    None,
                    "{} {} out of range",
                    name,
                    kind
                );
            }
            assert_eq!(set.base_color.find_out_of_range(), None, "{} basecolor", name);
            assert_eq!(set.normal.find_out_of_range(), None, "{} normal", name);
        }
    }
}

/// Roughness never leaves the window its preset allows.
#[test]
fn test_roughness_within_preset_bounds() {
    let registry = MaterialRegistry::builtin();
    for entry in registry.entries() {
        let set = generate_by_name(&registry, &entry.name, &native(64, 8)).unwrap();
        let (lo, hi) = entry.preset.roughness_bounds();
        let (min, max) = set.roughness.min_max();
        assert!(min >= lo - 1e-9 && max <= hi + 1e-9, "{}: {}..{}", entry.name, min, max);
    }
}

// ============================================================================
// Seamless tiling
// ============================================================================

/// Normals at the left and right edges use the wrapped neighbours.
#[test]
fn test_normals_wrap_across_edges() {
    let registry = MaterialRegistry::builtin();
    let set = generate_by_name(&registry, "stone", &native(64, 30)).unwrap();
    let strength = registry.get("stone").unwrap().preset.normal_strength;

    let h = &set.height;
    for y in [0u32, 17, 63] {
        let up = (y + 1) % 64;
        let down = (y + 63) % 64;
        for (x, left, right) in [(0u32, 63u32, 1u32), (63, 62, 0)] {
            let dx = (h.get(right, y) - h.get(left, y)) * strength;
            let dy = (h.get(x, up) - h.get(x, down)) * strength;
            let len = (dx * dx + dy * dy + 1.0).sqrt();
            let expected = [(-dx / len + 1.0) * 0.5, (-dy / len + 1.0) * 0.5, (1.0 / len + 1.0) * 0.5];
            let got = set.normal.get(x, y);
            for i in 0..3 {
                assert!((got[i] - expected[i]).abs() < 1e-12, "({}, {}) component {}", x, y, i);
            }
        }
    }

    let rederived = NormalDeriver::new().with_strength(strength).derive(&set.height);
    assert_eq!(rederived, set.normal);
}

/// Continuous height rules show no step at the tile seam.
#[test]
fn test_height_has_no_seam() {
    let registry = MaterialRegistry::builtin();
    for name in ["stone", "sand", "moss", "snow"] {
        let set = generate_by_name(&registry, name, &native(128, 12)).unwrap();
        let h = &set.height;
        let w = h.width;

        let mut interior = 0.0;
        for y in 0..h.height {
            for x in 0..w - 1 {
                interior += (h.get(x + 1, y) - h.get(x, y)).abs();
            }
        }
        interior /= ((w - 1) * h.height) as f64;

        let seam_x = (0..h.height)
            .map(|y| (h.get(0, y) - h.get(w - 1, y)).abs())
            .sum::<f64>()
            / h.height as f64;
        let seam_y = (0..w)
            .map(|x| (h.get(x, 0) - h.get(x, h.height - 1)).abs())
            .sum::<f64>()
            / w as f64;

        assert!(seam_x < 3.0 * interior + 0.01, "{}: seam x {} vs {}", name, seam_x, interior);
        assert!(seam_y < 3.0 * interior + 0.01, "{}: seam y {} vs {}", name, seam_y, interior);
    }
}

/// Mean step across the x and y seams, each divided by the mean interior step.
fn seam_ratios(field: &ScalarField) -> (f64, f64) {
    let (w, h) = (field.width, field.height);

    let mut interior_x = 0.0;
    let mut interior_y = 0.0;
    for y in 0..h {
        for x in 0..w {
            if x + 1 < w {
                interior_x += (field.get(x + 1, y) - field.get(x, y)).abs();
            }
            if y + 1 < h {
                interior_y += (field.get(x, y + 1) - field.get(x, y)).abs();
            }
        }
    }
    interior_x /= ((w - 1) * h) as f64;
    interior_y /= (w * (h - 1)) as f64;

    let seam_x = (0..h).map(|y| (field.get(0, y) - field.get(w - 1, y)).abs()).sum::<f64>()
        / h as f64;
    let seam_y = (0..w).map(|x| (field.get(x, 0) - field.get(x, h - 1)).abs()).sum::<f64>()
        / w as f64;

    (seam_x / (interior_x + 1e-9), seam_y / (interior_y + 1e-9))
}

/// Resampling to a different output size keeps height and normals tileable.
#[test]
fn test_resampled_maps_have_no_seam() {
    let registry = MaterialRegistry::builtin();
    let configs = [
        native(256, 12).with_working_resolution(64),
        native(64, 12).with_working_resolution(256),
    ];
    for name in ["stone", "sand", "moss"] {
        for config in &configs {
            let set = generate_by_name(&registry, name, config).unwrap();
            let normal_x = ScalarField::from_fn(set.normal.width, set.normal.height, |x, y| {
                set.normal.decode_normal(x, y)[0]
            });

            for (map, field) in [("height", &set.height), ("normal.x", &normal_x)] {
                let (rx, ry) = seam_ratios(field);
                assert!(
                    rx < 2.0 && ry < 2.0,
                    "{} {} {}->{}: seam ratios {:.2} {:.2}",
                    name,
                    map,
                    config.working_resolution,
                    config.resolution,
                    rx,
                    ry
                );
            }
        }
    }
}

// ============================================================================
// Packing fidelity
// ============================================================================

/// ORM channels unpack to exactly the standalone quantized maps.
#[test]
fn test_orm_unpacks_to_individual_maps() {
    let registry = MaterialRegistry::builtin();
    for name in ["stone", "mud", "grass"] {
        let set = generate_by_name(&registry, name, &native(32, 77)).unwrap();
        let orm = set.orm.as_ref().unwrap();
        assert_eq!(unpack_channel(orm, 0), set.ao.to_bytes(), "{} ao", name);
        assert_eq!(unpack_channel(orm, 1), set.roughness.to_bytes(), "{} roughness", name);
        assert_eq!(unpack_channel(orm, 2), set.metallic.to_bytes(), "{} metallic", name);
    }
}

/// MRA is the same data in a different channel order.
#[test]
fn test_mra_reorders_channels() {
    let registry = MaterialRegistry::builtin();
    let set = generate_by_name(&registry, "ice", &native(32, 2)).unwrap();

    let mut maps: HashMap<MapKind, &ScalarField> = HashMap::new();
    maps.insert(MapKind::Metallic, &set.metallic);
    maps.insert(MapKind::Roughness, &set.roughness);
    maps.insert(MapKind::Ao, &set.ao);
    let mra = pack_channels(&PackedChannels::mra(), &maps, 32, 32).unwrap();

    let orm = set.orm.as_ref().unwrap();
    assert_eq!(unpack_channel(&mra, 0), unpack_channel(orm, 2));
    assert_eq!(unpack_channel(&mra, 1), unpack_channel(orm, 1));
    assert_eq!(unpack_channel(&mra, 2), unpack_channel(orm, 0));
}

// ============================================================================
// Resolution invariance
// ============================================================================

/// Height statistics survive shaping at a higher working resolution.
#[test]
fn test_height_statistics_are_resolution_stable() {
    let registry = MaterialRegistry::builtin();
    for name in ["stone", "dirt", "sand", "moss"] {
        let direct = generate_by_name(&registry, name, &native(128, 40)).unwrap();
        let downsampled = generate_by_name(
            &registry,
            name,
            &native(128, 40).with_working_resolution(256),
        )
        .unwrap();

        let (m1, v1) = (direct.height.mean(), direct.height.variance());
        let (m2, v2) = (downsampled.height.mean(), downsampled.height.variance());
        assert!((m1 - m2).abs() < 0.05, "{}: mean {} vs {}", name, m1, m2);
        assert!(
            (v1 - v2).abs() < 0.25 * v1.max(v2),
            "{}: variance {} vs {}",
            name,
            v1,
            v2
        );
    }
}
