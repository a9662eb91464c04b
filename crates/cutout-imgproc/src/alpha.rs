use cutout_image::{Image, ImageError};
use rayon::prelude::*;

/// Compose an RGBA image from an RGB image and an alpha mask.
///
/// The RGB channels are copied verbatim and the mask value becomes the
/// alpha channel, pixel for pixel: 0 is fully transparent, 255 fully
/// opaque. No file I/O and no color blending happens here.
///
/// # Arguments
///
/// * `rgb` - The color source image.
/// * `mask` - The alpha mask, one channel.
/// * `rgba` - The destination image.
///
/// # Errors
///
/// Returns [`ImageError::InvalidImageSize`] if `rgb` or `mask` do not have
/// the size of `rgba`.
///
/// # Example
///
/// ```rust
/// use cutout_image::{Image, ImageSize};
/// use cutout_imgproc::alpha::apply_alpha_mask;
///
/// let size = ImageSize { width: 2, height: 1 };
/// let rgb = Image::<u8, 3>::new(size, vec![10, 20, 30, 40, 50, 60]).unwrap();
/// let mask = Image::<u8, 1>::new(size, vec![255, 0]).unwrap();
/// let mut rgba = Image::<u8, 4>::from_size_val(size, 0u8).unwrap();
///
/// apply_alpha_mask(&rgb, &mask, &mut rgba).unwrap();
///
/// assert_eq!(rgba.as_slice(), &[10, 20, 30, 255, 40, 50, 60, 0]);
/// ```
pub fn apply_alpha_mask(
    rgb: &Image<u8, 3>,
    mask: &Image<u8, 1>,
    rgba: &mut Image<u8, 4>,
) -> Result<(), ImageError> {
    if rgb.size() != rgba.size() {
        return Err(ImageError::InvalidImageSize(
            rgb.cols(),
            rgb.rows(),
            rgba.cols(),
            rgba.rows(),
        ));
    }

    if mask.size() != rgba.size() {
        return Err(ImageError::InvalidImageSize(
            mask.cols(),
            mask.rows(),
            rgba.cols(),
            rgba.rows(),
        ));
    }

    let cols = rgba.cols();

    rgba.as_slice_mut()
        .par_chunks_exact_mut(cols * 4)
        .zip(rgb.as_slice().par_chunks_exact(cols * 3))
        .zip(mask.as_slice().par_chunks_exact(cols))
        .for_each(|((rgba_row, rgb_row), mask_row)| {
            for ((rgba_px, rgb_px), alpha) in rgba_row
                .chunks_exact_mut(4)
                .zip(rgb_row.chunks_exact(3))
                .zip(mask_row.iter())
            {
                rgba_px[..3].copy_from_slice(rgb_px);
                rgba_px[3] = *alpha;
            }
        });

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use cutout_image::{Image, ImageError, ImageSize};

    #[test]
    fn test_apply_alpha_mask() -> Result<(), ImageError> {
        let size = ImageSize {
            width: 2,
            height: 2,
        };

        #[rustfmt::skip]
        let rgb = Image::<u8, 3>::new(
            size,
            vec![
                1, 2, 3,  4, 5, 6, //
                7, 8, 9,  10, 11, 12, //
            ],
        )?;
        let mask = Image::<u8, 1>::new(size, vec![255, 0, 128, 0])?;
        let mut rgba = Image::<u8, 4>::from_size_val(size, 0u8)?;

        apply_alpha_mask(&rgb, &mask, &mut rgba)?;

        #[rustfmt::skip]
        let expected = [
            1, 2, 3, 255,  4, 5, 6, 0, //
            7, 8, 9, 128,  10, 11, 12, 0, //
        ];
        assert_eq!(rgba.as_slice(), &expected);

        Ok(())
    }

    #[test]
    fn test_apply_alpha_mask_preserves_color_under_zero_alpha() -> Result<(), ImageError> {
        let size = ImageSize {
            width: 3,
            height: 1,
        };

        let rgb = Image::<u8, 3>::new(size, vec![200; 9])?;
        let mask = Image::<u8, 1>::new(size, vec![0, 0, 0])?;
        let mut rgba = Image::<u8, 4>::from_size_val(size, 7u8)?;

        apply_alpha_mask(&rgb, &mask, &mut rgba)?;

        // fully transparent pixels still carry the source color
        assert_eq!(rgba.as_slice(), &[200, 200, 200, 0, 200, 200, 200, 0, 200, 200, 200, 0]);

        Ok(())
    }

    #[test]
    fn test_apply_alpha_mask_size_mismatch() -> Result<(), ImageError> {
        let rgb = Image::<u8, 3>::from_size_val(
            ImageSize {
                width: 2,
                height: 2,
            },
            0u8,
        )?;
        let mask = Image::<u8, 1>::from_size_val(
            ImageSize {
                width: 3,
                height: 2,
            },
            0u8,
        )?;
        let mut rgba = Image::<u8, 4>::from_size_val(rgb.size(), 0u8)?;

        let res = apply_alpha_mask(&rgb, &mask, &mut rgba);
        assert!(res.is_err());

        Ok(())
    }
}
