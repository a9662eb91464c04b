#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

use std::path::{Path, PathBuf};

use cutout_image::{Image, ImageSize};
use cutout_imgproc::{
    alpha::apply_alpha_mask,
    color::gray_from_rgb_u8,
    contours::{bounding_rect, contour_area, find_contours, ContourApproximation},
    crop::crop_image,
    draw::fill_polygon,
    morphology::{close, open, Kernel, KernelShape},
    padding::PaddingMode,
    threshold::threshold_binary_inverse,
};
use cutout_io::{functional::read_image_any_rgb8, png::write_image_png_rgba8};
use log::info;

use crate::errors::SegmentError;

/// Error types for the segmentation pipeline.
pub mod errors;

const OUTPUT_DIR_NAME: &str = "segmented_parts";

/// Tuning parameters for [`segment_objects`].
///
/// The defaults match the classic white-background cutout setup: a bright
/// backdrop close to full white and objects at least a couple of thousand
/// pixels in size.
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentConfig {
    /// Background intensity cutoff on the 0-255 scale. Pixels strictly
    /// darker than this count as foreground. Default: `240`.
    pub threshold: u8,
    /// Minimum enclosed contour area in pixels squared. Contours whose area
    /// does not exceed this are dropped as noise. Default: `1000.0`.
    pub min_area: f64,
    /// Padding in pixels added on every side of an object's bounding box
    /// before cropping, clamped to the image bounds. Default: `20`.
    pub padding: usize,
    /// Side length of the square structuring element used for the
    /// morphological cleanup. Default: `5`.
    pub kernel_size: usize,
}

impl Default for SegmentConfig {
    fn default() -> Self {
        Self {
            threshold: 240,
            min_area: 1000.0,
            padding: 20,
            kernel_size: 5,
        }
    }
}

/// Extract every foreground object from an image shot on a white background.
///
/// Runs the full pipeline: foreground separation by thresholding,
/// morphological cleanup, contour extraction with area filtering, and a
/// per-object export. Each retained object is cropped around its padded
/// bounding box and written as an RGBA PNG whose alpha channel is opaque
/// inside the object's silhouette and fully transparent elsewhere.
///
/// Output files are named `part_01.png`, `part_02.png`, … in contour
/// discovery order and written to a `segmented_parts` directory created
/// next to the input file. Existing files with the same name are
/// overwritten. Padded crops of nearby objects may overlap; each crop is
/// an independent copy of the source pixels.
///
/// # Arguments
///
/// * `image_path` - The path to the input image. Any format supported by
///   [`read_image_any_rgb8`] works.
/// * `config` - Tuning parameters, see [`SegmentConfig`].
///
/// # Returns
///
/// The paths of the written PNG files in export order. An image without
/// qualifying objects yields an empty vector; the output directory is
/// still created.
///
/// # Errors
///
/// Returns an error if the input cannot be read or decoded, before any
/// directory or file is created, and if writing an output file fails.
pub fn segment_objects(
    image_path: impl AsRef<Path>,
    config: &SegmentConfig,
) -> Result<Vec<PathBuf>, SegmentError> {
    let image_path = image_path.as_ref();

    // Step 1: Load the image. Failure aborts before any output exists.
    let img = read_image_any_rgb8(image_path)?;
    info!("Image size: {}x{}", img.cols(), img.rows());

    // Step 2: Create the output directory next to the input file.
    let output_dir = image_path
        .parent()
        .map(|parent| parent.join(OUTPUT_DIR_NAME))
        .unwrap_or_else(|| PathBuf::from(OUTPUT_DIR_NAME));
    std::fs::create_dir_all(&output_dir)?;

    // Step 3: Foreground / background separation.
    let mut gray = Image::<u8, 1>::from_size_val(img.size(), 0)?;
    gray_from_rgb_u8(&img, &mut gray)?;

    let mut thresh = Image::<u8, 1>::from_size_val(gray.size(), 0)?;
    threshold_binary_inverse(&gray, &mut thresh, config.threshold, 255)?;

    // Step 4: Morphological cleanup. Closing fills small holes inside the
    // blobs, opening then removes isolated speckles.
    let kernel = Kernel::new(KernelShape::Box {
        size: config.kernel_size,
    });
    let mut closed = Image::<u8, 1>::from_size_val(thresh.size(), 0)?;
    close(&thresh, &mut closed, &kernel, PaddingMode::Constant)?;
    let mut cleaned = Image::<u8, 1>::from_size_val(closed.size(), 0)?;
    open(&closed, &mut cleaned, &kernel, PaddingMode::Constant)?;

    // Step 5: Contour extraction and area filtering.
    let contours = find_contours(&cleaned, ContourApproximation::Simple);
    info!("Found {} contours", contours.len());

    let valid_contours: Vec<_> = contours
        .into_iter()
        .filter(|contour| contour_area(contour) > config.min_area)
        .collect();
    info!(
        "Found {} valid objects (area > {})",
        valid_contours.len(),
        config.min_area
    );

    // Step 6: Crop, mask and export each object.
    let mut saved_files = Vec::with_capacity(valid_contours.len());
    for (i, contour) in valid_contours.iter().enumerate() {
        let part_number = i + 1;
        let rect = bounding_rect(contour);

        let x1 = rect.x.saturating_sub(config.padding);
        let y1 = rect.y.saturating_sub(config.padding);
        let x2 = usize::min(img.cols(), rect.x + rect.width + config.padding);
        let y2 = usize::min(img.rows(), rect.y + rect.height + config.padding);

        let roi_size = ImageSize {
            width: x2 - x1,
            height: y2 - y1,
        };
        let mut roi = Image::<u8, 3>::from_size_val(roi_size, 0)?;
        crop_image(&img, &mut roi, x1, y1)?;

        // the silhouette mask lives in the crop's local coordinate frame
        let shifted_points: Vec<(i64, i64)> = contour
            .points
            .iter()
            .map(|&(x, y)| (x - x1 as i64, y - y1 as i64))
            .collect();

        let mut mask = Image::<u8, 1>::from_size_val(roi_size, 0)?;
        fill_polygon(&mut mask, &shifted_points, [255]);

        let mut rgba = Image::<u8, 4>::from_size_val(roi_size, 0)?;
        apply_alpha_mask(&roi, &mask, &mut rgba)?;

        let output_path = output_dir.join(format!("part_{:02}.png", part_number));
        write_image_png_rgba8(&output_path, &rgba)?;
        info!(
            "Saved part {}: {} (size: {}x{})",
            part_number,
            output_path.display(),
            rect.width,
            rect.height
        );

        saved_files.push(output_path);
    }

    info!(
        "Done! Saved {} parts to {}",
        saved_files.len(),
        output_dir.display()
    );

    Ok(saved_files)
}
