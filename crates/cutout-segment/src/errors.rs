/// Errors that can occur when segmenting objects out of an image.
#[derive(Debug, thiserror::Error)]
pub enum SegmentError {
    /// Error related to image buffers.
    #[error(transparent)]
    Image(#[from] cutout_image::ImageError),

    /// Error while reading or writing an image file.
    #[error(transparent)]
    Io(#[from] cutout_io::error::IoError),

    /// Error while creating the output directory.
    #[error("Failed to create the output directory")]
    File(#[from] std::io::Error),
}
