use super::kernels::Kernel;
use crate::padding::{spatial_padding, Padding2D, PaddingMode};
use cutout_image::{Image, ImageError, ImageSize};
use num_traits::Bounded;
use rayon::prelude::*;

/// Dilate an image using a [`Kernel`].
///
/// Dilation expands bright regions: each pixel is replaced by the maximum
/// value in the neighborhood defined by the kernel.
///
/// # Arguments
///
/// * `src` - The source image.
/// * `dst` - The destination image (will be overwritten).
/// * `kernel` - The morphological structuring element.
/// * `padding_mode` - The border handling mode.
/// * `constant_value` - The fill value for [`PaddingMode::Constant`].
///
/// # Errors
///
/// Returns [`ImageError::InvalidImageSize`] if `src` and `dst` sizes differ.
pub fn dilate<T, const C: usize>(
    src: &Image<T, C>,
    dst: &mut Image<T, C>,
    kernel: &Kernel,
    padding_mode: PaddingMode,
    constant_value: [T; C],
) -> Result<(), ImageError>
where
    T: Copy + Default + Send + Sync + Ord + Bounded,
{
    if src.size() != dst.size() {
        return Err(ImageError::InvalidImageSize(
            dst.width(),
            dst.height(),
            src.width(),
            src.height(),
        ));
    }

    let width = src.width();
    let (pad_h, pad_w) = kernel.pad();
    let k_width = kernel.width();
    let k_height = kernel.height();
    let k_data = kernel.data();

    let padded_size = ImageSize {
        width: width + 2 * pad_w,
        height: src.height() + 2 * pad_h,
    };
    let mut padded = Image::<T, C>::from_size_val(padded_size, T::default())?;

    let padding = Padding2D {
        top: pad_h,
        bottom: pad_h,
        left: pad_w,
        right: pad_w,
    };
    spatial_padding(src, &mut padded, padding, padding_mode, constant_value)?;

    dst.as_slice_mut()
        .par_chunks_exact_mut(width * C)
        .enumerate()
        .for_each(|(y, dst_row)| {
            for x in 0..width {
                for c in 0..C {
                    let mut max_val = T::min_value();

                    for ky in 0..k_height {
                        for kx in 0..k_width {
                            if k_data[ky * k_width + kx] == 1 {
                                if let Ok(pixel) = padded.get_pixel(x + kx, y + ky, c) {
                                    max_val = max_val.max(pixel);
                                }
                            }
                        }
                    }

                    dst_row[x * C + c] = max_val;
                }
            }
        });

    Ok(())
}

/// Erode an image using a [`Kernel`].
///
/// Erosion shrinks bright regions: each pixel is replaced by the minimum
/// value in the neighborhood defined by the kernel.
///
/// # Arguments
///
/// * `src` - The source image.
/// * `dst` - The destination image (will be overwritten).
/// * `kernel` - The morphological structuring element.
/// * `padding_mode` - The border handling mode.
/// * `constant_value` - The fill value for [`PaddingMode::Constant`].
///
/// # Errors
///
/// Returns [`ImageError::InvalidImageSize`] if `src` and `dst` sizes differ.
pub fn erode<T, const C: usize>(
    src: &Image<T, C>,
    dst: &mut Image<T, C>,
    kernel: &Kernel,
    padding_mode: PaddingMode,
    constant_value: [T; C],
) -> Result<(), ImageError>
where
    T: Copy + Default + Send + Sync + Ord + Bounded,
{
    if src.size() != dst.size() {
        return Err(ImageError::InvalidImageSize(
            dst.width(),
            dst.height(),
            src.width(),
            src.height(),
        ));
    }

    let width = src.width();
    let (pad_h, pad_w) = kernel.pad();
    let k_width = kernel.width();
    let k_height = kernel.height();
    let k_data = kernel.data();

    let padded_size = ImageSize {
        width: width + 2 * pad_w,
        height: src.height() + 2 * pad_h,
    };
    let mut padded = Image::<T, C>::from_size_val(padded_size, T::default())?;

    let padding = Padding2D {
        top: pad_h,
        bottom: pad_h,
        left: pad_w,
        right: pad_w,
    };
    spatial_padding(src, &mut padded, padding, padding_mode, constant_value)?;

    dst.as_slice_mut()
        .par_chunks_exact_mut(width * C)
        .enumerate()
        .for_each(|(y, dst_row)| {
            for x in 0..width {
                for c in 0..C {
                    let mut min_val = T::max_value();

                    for ky in 0..k_height {
                        for kx in 0..k_width {
                            if k_data[ky * k_width + kx] == 1 {
                                if let Ok(pixel) = padded.get_pixel(x + kx, y + ky, c) {
                                    min_val = min_val.min(pixel);
                                }
                            }
                        }
                    }

                    dst_row[x * C + c] = min_val;
                }
            }
        });

    Ok(())
}

/// Opening: erosion followed by dilation.
///
/// Removes small bright objects and smooths object boundaries.
///
/// With [`PaddingMode::Constant`] each stage pads with its own neutral
/// value (`T::max_value()` for the erosion, `T::min_value()` for the
/// dilation), so the image border neither erodes foreground touching it
/// nor smears bright values inward.
///
/// # Arguments
///
/// * `src` - The source image.
/// * `dst` - The destination image (will be overwritten).
/// * `kernel` - The morphological structuring element.
/// * `padding_mode` - The border handling mode.
///
/// # Errors
///
/// Returns [`ImageError::InvalidImageSize`] if `src` and `dst` sizes differ.
pub fn open<T, const C: usize>(
    src: &Image<T, C>,
    dst: &mut Image<T, C>,
    kernel: &Kernel,
    padding_mode: PaddingMode,
) -> Result<(), ImageError>
where
    T: Copy + Default + Send + Sync + Ord + Bounded,
{
    let mut temp_img = src.clone();
    erode(src, &mut temp_img, kernel, padding_mode, [T::max_value(); C])?;
    dilate(&temp_img, dst, kernel, padding_mode, [T::min_value(); C])?;
    Ok(())
}

/// Closing: dilation followed by erosion.
///
/// Fills small holes and gaps in bright regions.
///
/// With [`PaddingMode::Constant`] each stage pads with its own neutral
/// value (`T::min_value()` for the dilation, `T::max_value()` for the
/// erosion), so the image border neither erodes foreground touching it
/// nor smears bright values inward.
///
/// # Arguments
///
/// * `src` - The source image.
/// * `dst` - The destination image (will be overwritten).
/// * `kernel` - The morphological structuring element.
/// * `padding_mode` - The border handling mode.
///
/// # Errors
///
/// Returns [`ImageError::InvalidImageSize`] if `src` and `dst` sizes differ.
pub fn close<T, const C: usize>(
    src: &Image<T, C>,
    dst: &mut Image<T, C>,
    kernel: &Kernel,
    padding_mode: PaddingMode,
) -> Result<(), ImageError>
where
    T: Copy + Default + Send + Sync + Ord + Bounded,
{
    let mut temp_img = src.clone();
    dilate(src, &mut temp_img, kernel, padding_mode, [T::min_value(); C])?;
    erode(&temp_img, dst, kernel, padding_mode, [T::max_value(); C])?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::morphology::KernelShape;
    use cutout_image::{Image, ImageError, ImageSize};

    fn image_7x7(data: Vec<u8>) -> Result<Image<u8, 1>, ImageError> {
        Image::new(
            ImageSize {
                width: 7,
                height: 7,
            },
            data,
        )
    }

    #[test]
    fn test_dilate_grows_single_pixel() -> Result<(), ImageError> {
        #[rustfmt::skip]
        let src = Image::<u8, 1>::new(
            ImageSize { width: 5, height: 5 },
            vec![
                0, 0,   0, 0, 0, //
                0, 0,   0, 0, 0, //
                0, 0, 255, 0, 0, //
                0, 0,   0, 0, 0, //
                0, 0,   0, 0, 0, //
            ],
        )?;
        let mut dst = Image::from_size_val(src.size(), 0u8)?;

        let kernel = Kernel::new(KernelShape::Box { size: 3 });
        dilate(&src, &mut dst, &kernel, PaddingMode::Constant, [0])?;

        #[rustfmt::skip]
        let expected = [
            0,   0,   0,   0, 0, //
            0, 255, 255, 255, 0, //
            0, 255, 255, 255, 0, //
            0, 255, 255, 255, 0, //
            0,   0,   0,   0, 0, //
        ];
        assert_eq!(dst.as_slice(), &expected);

        Ok(())
    }

    #[test]
    fn test_erode_shrinks_square() -> Result<(), ImageError> {
        #[rustfmt::skip]
        let src = Image::<u8, 1>::new(
            ImageSize { width: 5, height: 5 },
            vec![
                0,   0,   0,   0, 0, //
                0, 255, 255, 255, 0, //
                0, 255, 255, 255, 0, //
                0, 255, 255, 255, 0, //
                0,   0,   0,   0, 0, //
            ],
        )?;
        let mut dst = Image::from_size_val(src.size(), 0u8)?;

        let kernel = Kernel::new(KernelShape::Box { size: 3 });
        erode(&src, &mut dst, &kernel, PaddingMode::Constant, [255])?;

        #[rustfmt::skip]
        let expected = [
            0, 0,   0, 0, 0, //
            0, 0,   0, 0, 0, //
            0, 0, 255, 0, 0, //
            0, 0,   0, 0, 0, //
            0, 0,   0, 0, 0, //
        ];
        assert_eq!(dst.as_slice(), &expected);

        Ok(())
    }

    #[test]
    fn test_close_fills_hole() -> Result<(), ImageError> {
        #[rustfmt::skip]
        let src = image_7x7(vec![
            0, 0,   0,   0,   0, 0, 0, //
            0, 0,   0,   0,   0, 0, 0, //
            0, 0, 255, 255, 255, 0, 0, //
            0, 0, 255,   0, 255, 0, 0, //
            0, 0, 255, 255, 255, 0, 0, //
            0, 0,   0,   0,   0, 0, 0, //
            0, 0,   0,   0,   0, 0, 0, //
        ])?;
        let mut dst = Image::from_size_val(src.size(), 0u8)?;

        let kernel = Kernel::new(KernelShape::Box { size: 3 });
        close(&src, &mut dst, &kernel, PaddingMode::Constant)?;

        #[rustfmt::skip]
        let expected = [
            0, 0,   0,   0,   0, 0, 0, //
            0, 0,   0,   0,   0, 0, 0, //
            0, 0, 255, 255, 255, 0, 0, //
            0, 0, 255, 255, 255, 0, 0, //
            0, 0, 255, 255, 255, 0, 0, //
            0, 0,   0,   0,   0, 0, 0, //
            0, 0,   0,   0,   0, 0, 0, //
        ];
        assert_eq!(dst.as_slice(), &expected);

        Ok(())
    }

    #[test]
    fn test_open_removes_speckle_keeps_block() -> Result<(), ImageError> {
        #[rustfmt::skip]
        let src = image_7x7(vec![
            0,   0,   0,   0, 0,   0, 0, //
            0, 255, 255, 255, 0,   0, 0, //
            0, 255, 255, 255, 0,   0, 0, //
            0, 255, 255, 255, 0,   0, 0, //
            0,   0,   0,   0, 0,   0, 0, //
            0,   0,   0,   0, 0, 255, 0, //
            0,   0,   0,   0, 0,   0, 0, //
        ])?;
        let mut dst = Image::from_size_val(src.size(), 0u8)?;

        let kernel = Kernel::new(KernelShape::Box { size: 3 });
        open(&src, &mut dst, &kernel, PaddingMode::Constant)?;

        // the isolated pixel vanishes and the block survives; the border
        // stays dark
        #[rustfmt::skip]
        let expected = [
            0,   0,   0,   0, 0, 0, 0, //
            0, 255, 255, 255, 0, 0, 0, //
            0, 255, 255, 255, 0, 0, 0, //
            0, 255, 255, 255, 0, 0, 0, //
            0,   0,   0,   0, 0, 0, 0, //
            0,   0,   0,   0, 0, 0, 0, //
            0,   0,   0,   0, 0, 0, 0, //
        ];
        assert_eq!(dst.as_slice(), &expected);

        Ok(())
    }

    #[test]
    fn test_open_keeps_border_touching_block() -> Result<(), ImageError> {
        #[rustfmt::skip]
        let src = image_7x7(vec![
            255, 255, 255, 0, 0, 0, 0, //
            255, 255, 255, 0, 0, 0, 0, //
            255, 255, 255, 0, 0, 0, 0, //
              0,   0,   0, 0, 0, 0, 0, //
              0,   0,   0, 0, 0, 0, 0, //
              0,   0,   0, 0, 0, 0, 0, //
              0,   0,   0, 0, 0, 0, 0, //
        ])?;
        let mut dst = Image::from_size_val(src.size(), 0u8)?;

        let kernel = Kernel::new(KernelShape::Box { size: 3 });
        open(&src, &mut dst, &kernel, PaddingMode::Constant)?;

        assert_eq!(dst.as_slice(), src.as_slice());

        Ok(())
    }

    #[test]
    fn test_dilate_size_mismatch() -> Result<(), ImageError> {
        let src = Image::<u8, 1>::from_size_val(
            ImageSize {
                width: 4,
                height: 4,
            },
            0u8,
        )?;
        let mut dst = Image::<u8, 1>::from_size_val(
            ImageSize {
                width: 5,
                height: 4,
            },
            0u8,
        )?;

        let kernel = Kernel::new(KernelShape::Box { size: 3 });
        let res = dilate(&src, &mut dst, &kernel, PaddingMode::Constant, [0]);
        assert!(res.is_err());

        Ok(())
    }
}
