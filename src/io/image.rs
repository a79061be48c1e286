//! PNG export of solved grids as tiled layer maps

use image::{ImageBuffer, Rgba};

use crate::io::configuration::LAYER_GAP_PX;
use crate::io::error::{GenerationError, Result, invalid_parameter};
use crate::solver::executor::SolvedGrid;

/// Export a solved grid as one PNG with a top-down map per vertical layer
///
/// Layers are tiled left to right from bottom (y = 0) to top, separated by a
/// transparent gap column. Each pixel shows the color of its cell's
/// prototype; meshless modules render transparent.
///
/// # Errors
///
/// Returns an error if:
/// - A decided prototype has no entry in `colors`
/// - The parent directory cannot be created
/// - The image cannot be saved to the specified path
pub fn export_layers_png(
    solved: &SolvedGrid,
    colors: &[[u8; 4]],
    output_path: &str,
) -> Result<()> {
    let volume = solved.volume();
    let layer_width = volume.size_x as u32;
    let width = layer_width * volume.size_y as u32
        + LAYER_GAP_PX * (volume.size_y.saturating_sub(1)) as u32;
    let height = volume.size_z as u32;

    let mut img = ImageBuffer::from_pixel(width, height, Rgba([0, 0, 0, 0]));

    for y in 0..volume.size_y {
        let offset_x = y as u32 * (layer_width + LAYER_GAP_PX);
        for z in 0..volume.size_z {
            for x in 0..volume.size_x {
                let Some(variant) = solved.variant([x, y, z]) else {
                    continue;
                };
                if variant.mesh.is_none() {
                    continue;
                }
                let rgba = colors.get(variant.prototype).copied().ok_or_else(|| {
                    invalid_parameter(
                        "colors",
                        &variant.prototype,
                        &"no color entry for this prototype",
                    )
                })?;
                img.put_pixel(offset_x + x as u32, z as u32, Rgba(rgba));
            }
        }
    }

    if let Some(parent) = std::path::Path::new(output_path).parent() {
        std::fs::create_dir_all(parent).map_err(|e| GenerationError::FileSystem {
            path: parent.to_path_buf(),
            operation: "create directory",
            source: e,
        })?;
    }

    img.save(output_path)
        .map_err(|e| GenerationError::ImageExport {
            path: output_path.into(),
            source: e,
        })?;

    Ok(())
}
