use crate::plot;
use anyhow::{anyhow, ensure, Result};
use image::{Rgb, RgbImage};
use log::info;
use ndarray::{Array3, Axis};
use std::path::Path;

/// Mixing ratio between the all-cells background and the three highlighted
/// footprints.
const BLEND_ALPHA: f32 = 0.5;

/// Build the RGB composite for three neuron footprints out of a
/// (height, width, neuron) array: the summed footprints of all cells as a
/// gray background, the three selected footprints (each normalized by its own
/// maximum) as the R, G and B channels, blended 50/50.
///
/// Indices may repeat to get different color combinations. Out-of-range
/// indices and all-zero footprints (whose normalization would divide by zero)
/// are rejected.
pub fn compose_overlay(footprints: &Array3<f64>, picks: [usize; 3]) -> Result<RgbImage> {
    let (height, width, count) = footprints.dim();
    ensure!(count > 0, "footprint array contains no neurons");
    for &n in &picks {
        ensure!(n < count, "neuron index {n} out of range, array holds {count} footprints");
    }

    let mut maxima = [0f64; 3];
    for (slot, &n) in picks.iter().enumerate() {
        let max = footprints.index_axis(Axis(2), n).fold(f64::NEG_INFINITY, |a, &v| a.max(v));
        ensure!(max > 0.0, "footprint for neuron {n} is all zeros, cannot normalize it");
        maxima[slot] = max;
    }

    let all_cells = footprints.sum_axis(Axis(2));

    Ok(RgbImage::from_fn(width as u32, height as u32, |x, y| {
        let (row, col) = (y as usize, x as usize);
        let gray = scale(all_cells[[row, col]]);
        let channel = |slot: usize| {
            let value = footprints[[row, col, picks[slot]]] / maxima[slot];
            blend(gray, scale(value))
        };
        Rgb([channel(0), channel(1), channel(2)])
    }))
}

/// Render the overlay for three neurons straight into a figure file, without
/// axes or ticks. The figure takes the dimensions of the footprint array.
pub fn overlay_neurons(
    footprints: &Array3<f64>,
    n1: usize,
    n2: usize,
    n3: usize,
    output: &Path,
) -> Result<()> {
    let composite = compose_overlay(footprints, [n1, n2, n3])?;
    let root = plot::create_figure(output, composite.dimensions())?;
    plot::draw_image(&root, &composite)?;
    root.present().map_err(|e| anyhow!("writing figure {}: {e}", output.display()))?;
    info!("wrote overlay of neurons {n1}, {n2}, {n3} to {}", output.display());
    Ok(())
}

fn scale(value: f64) -> u8 {
    (value * 255.0).clamp(0.0, 255.0) as u8
}

fn blend(first: u8, second: u8) -> u8 {
    (first as f32 * (1.0 - BLEND_ALPHA) + second as f32 * BLEND_ALPHA) as u8
}
