use anyhow::{anyhow, Result};
use image::RgbImage;
use plotters::coord::Shift;
use plotters::element::BitMapElement;
use plotters::prelude::*;
use std::path::Path;

/// Figure size in pixels used when the caller does not pass one.
pub const DEFAULT_FIGSIZE: (u32, u32) = (1200, 800);

/// Create a new white-filled bitmap figure backed by `path`. Call `present()`
/// on the returned area once drawing is done to write the file out.
pub fn create_figure<P: AsRef<Path> + ?Sized>(
    path: &P,
    figsize: (u32, u32),
) -> Result<DrawingArea<BitMapBackend<'_>, Shift>> {
    let root = BitMapBackend::new(path, figsize).into_drawing_area();
    root.fill(&WHITE).map_err(|e| anyhow!("filling figure background: {e}"))?;
    Ok(root)
}

/// Split a figure into `rows` x `cols` equally sized subplot areas, returned
/// in row-major order (the column index varies fastest). Degenerate counts
/// are left to plotters to handle.
pub fn create_subplot_axes<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    rows: usize,
    cols: usize,
) -> Vec<DrawingArea<DB, Shift>> {
    root.split_evenly((rows, cols))
}

/// Blit an RGB image into the top-left corner of a drawing area, with no axes
/// or ticks drawn around it.
pub fn draw_image<DB: DrawingBackend>(area: &DrawingArea<DB, Shift>, image: &RgbImage) -> Result<()> {
    let (width, height) = image.dimensions();
    let element: BitMapElement<'_, _> =
        BitMapElement::with_owned_buffer((0, 0), (width, height), image.as_raw().clone())
            .ok_or_else(|| anyhow!("image buffer does not match its {width}x{height} dimensions"))?;
    area.draw(&element).map_err(|e| anyhow!("drawing image: {e}"))?;
    Ok(())
}
