use cutout_image::{Image, ImageError};
use rayon::prelude::*;

/// Copy a rectangular region of an image into `dst`.
///
/// The region starts at `(x, y)` in `src` and has the size of `dst`.
///
/// # Arguments
///
/// * `src` - The source image to crop.
/// * `dst` - The destination image receiving the region.
/// * `x` - The x-coordinate of the top-left corner of the region.
/// * `y` - The y-coordinate of the top-left corner of the region.
///
/// # Errors
///
/// Returns [`ImageError::InvalidImageSize`] if the region does not fit
/// inside `src`.
///
/// # Examples
///
/// ```rust
/// use cutout_image::{Image, ImageSize};
/// use cutout_imgproc::crop::crop_image;
///
/// let image = Image::<_, 1>::new(ImageSize { width: 4, height: 4 }, vec![
///     0u8, 1, 2, 3,
///     4u8, 5, 6, 7,
///     8u8, 9, 10, 11,
///     12u8, 13, 14, 15
/// ]).unwrap();
///
/// let mut cropped = Image::<_, 1>::from_size_val(ImageSize { width: 2, height: 2 }, 0u8).unwrap();
///
/// crop_image(&image, &mut cropped, 1, 1).unwrap();
///
/// assert_eq!(cropped.as_slice(), &[5u8, 6, 9, 10]);
/// ```
pub fn crop_image<T, const C: usize>(
    src: &Image<T, C>,
    dst: &mut Image<T, C>,
    x: usize,
    y: usize,
) -> Result<(), ImageError>
where
    T: Copy + Send + Sync,
{
    if x + dst.cols() > src.cols() || y + dst.rows() > src.rows() {
        return Err(ImageError::InvalidImageSize(
            dst.cols(),
            dst.rows(),
            src.cols().saturating_sub(x),
            src.rows().saturating_sub(y),
        ));
    }

    let dst_cols = dst.cols();

    dst.as_slice_mut()
        .par_chunks_exact_mut(dst_cols * C)
        .enumerate()
        .for_each(|(i, dst_row)| {
            let offset = (y + i) * src.cols() * C + x * C;
            let src_slice = &src.as_slice()[offset..offset + dst_cols * C];

            dst_row.copy_from_slice(src_slice);
        });

    Ok(())
}
