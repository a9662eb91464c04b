mod kernels;
mod ops;

pub use kernels::{Kernel, KernelShape};
pub use ops::{close, dilate, erode, open};
