#![doc = env!("CARGO_PKG_DESCRIPTION")]

#[doc(inline)]
pub use cutout_image as image;

#[doc(inline)]
pub use cutout_imgproc as imgproc;

#[doc(inline)]
pub use cutout_io as io;

#[doc(inline)]
pub use cutout_segment as segment;
