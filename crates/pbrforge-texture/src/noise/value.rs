//! Lattice value noise.

use super::{lerp, smoothstep, NoiseSpec};
use crate::field::ScalarField;
use crate::rng::DeterministicRng;

/// Generate smooth value noise in [0, 1).
///
/// A lattice of `ceil(dim / scale) + 2` random values per axis is drawn
/// row-major from the call's RNG. Each pixel bilinearly interpolates its
/// four enclosing lattice values with smoothstep weights on both axes.
pub fn value_noise(spec: &NoiseSpec) -> ScalarField {
    let scale = spec.scale.max(1.0);
    // Tolerance keeps `width / (width / n)` from rounding up to n + 1 cells.
    let cells_x = (spec.width as f64 / scale - 1e-9).ceil().max(1.0) as usize;
    let cells_y = (spec.height as f64 / scale - 1e-9).ceil().max(1.0) as usize;
    let lattice_w = cells_x + 2;
    let lattice_h = cells_y + 2;

    let mut rng = DeterministicRng::new(spec.seed);
    let lattice: Vec<f64> = (0..lattice_w * lattice_h).map(|_| rng.gen_f64()).collect();

    let tileable = spec.tileable;
    let lookup = |ix: usize, iy: usize| {
        let (ix, iy) = if tileable {
            (ix % cells_x, iy % cells_y)
        } else {
            (ix, iy)
        };
        lattice[iy * lattice_w + ix]
    };

    ScalarField::from_fn(spec.width, spec.height, |x, y| {
        let fx = x as f64 / scale;
        let fy = y as f64 / scale;
        let ix = fx.floor() as usize;
        let iy = fy.floor() as usize;
        let tx = smoothstep(fx - ix as f64);
        let ty = smoothstep(fy - iy as f64);

        let top = lerp(lookup(ix, iy), lookup(ix + 1, iy), tx);
        let bottom = lerp(lookup(ix, iy + 1), lookup(ix + 1, iy + 1), tx);
        lerp(top, bottom, ty)
    })
}
