use std::path::Path;

use cutout_image::{Image, ImageSize};

use crate::error::IoError;

/// Reads an image from the given file path as RGB8.
///
/// The method tries any image format supported by the image crate,
/// guessing the format from the file content. Grayscale and alpha inputs
/// are converted to three channels.
///
/// # Arguments
///
/// * `file_path` - The path to a valid image file.
///
/// # Returns
///
/// An RGB image with three channels.
///
/// # Errors
///
/// Returns [`IoError::FileDoesNotExist`] if the path does not exist, and
/// [`IoError::ImageDecodeError`] if the content cannot be decoded.
pub fn read_image_any_rgb8(file_path: impl AsRef<Path>) -> Result<Image<u8, 3>, IoError> {
    let file_path = file_path.as_ref();

    // verify the file exists
    if !file_path.exists() {
        return Err(IoError::FileDoesNotExist(file_path.to_path_buf()));
    }

    // open the file and map it to memory
    let file = std::fs::File::open(file_path)?;
    let mmap = unsafe { memmap2::Mmap::map(&file)? };

    // decode the data directly from memory
    let img = image::ImageReader::new(std::io::Cursor::new(&mmap))
        .with_guessed_format()?
        .decode()?;

    let size = ImageSize {
        width: img.width() as usize,
        height: img.height() as usize,
    };

    Ok(Image::new(size, img.into_rgb8().into_raw())?)
}
