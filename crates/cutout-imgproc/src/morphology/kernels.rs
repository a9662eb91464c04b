/// Shapes of morphological structuring elements.
///
/// All kernels are centered at their geometric center.
#[derive(Debug, Clone)]
pub enum KernelShape {
    /// A square box element; every pixel within the box participates.
    Box {
        /// Side length of the square kernel (size x size).
        size: usize,
    },

    /// A cross (plus) shaped element; only the center row and center
    /// column participate.
    Cross {
        /// Side length of the square kernel (size x size).
        size: usize,
    },

    /// An elliptical element; pixels inside the ellipse inscribed in the
    /// `width` x `height` bounding box participate.
    Ellipse {
        /// Width of the ellipse bounding box.
        width: usize,
        /// Height of the ellipse bounding box.
        height: usize,
    },
}

/// A morphological structuring element.
///
/// Defines the neighborhood used by dilate, erode, open and close. Stored
/// as a flat binary mask where 1 marks pixels included in the operation.
///
/// # Example
///
/// ```rust
/// use cutout_imgproc::morphology::{Kernel, KernelShape};
///
/// let kernel = Kernel::new(KernelShape::Box { size: 5 });
/// assert_eq!(kernel.width(), 5);
/// assert_eq!(kernel.height(), 5);
/// assert_eq!(kernel.pad(), (2, 2));
/// ```
pub struct Kernel {
    data: Vec<u8>,
    width: usize,
    height: usize,
}

impl Kernel {
    /// Create a kernel from a [`KernelShape`].
    pub fn new(shape: KernelShape) -> Self {
        match shape {
            KernelShape::Box { size } => Self::box_kernel(size),
            KernelShape::Cross { size } => Self::cross_kernel(size),
            KernelShape::Ellipse { width, height } => Self::ellipse_kernel(width, height),
        }
    }

    /// Get a reference to the kernel mask.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Get the width of the kernel.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Get the height of the kernel.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Get the spatial padding implied by the kernel as `(pad_h, pad_w)`,
    /// i.e. the offset of the kernel center from its edge.
    pub fn pad(&self) -> (usize, usize) {
        (self.height / 2, self.width / 2)
    }

    fn box_kernel(size: usize) -> Self {
        Self {
            data: vec![1u8; size * size],
            width: size,
            height: size,
        }
    }

    fn cross_kernel(size: usize) -> Self {
        let mut data = vec![0u8; size * size];
        let mid = size / 2;

        // center row
        for j in 0..size {
            data[mid * size + j] = 1;
        }

        // center column
        for i in 0..size {
            data[i * size + mid] = 1;
        }

        Self {
            data,
            width: size,
            height: size,
        }
    }

    fn ellipse_kernel(width: usize, height: usize) -> Self {
        let mut data = vec![0u8; width * height];
        let cx = width as f32 / 2.0;
        let cy = height as f32 / 2.0;
        let rx = width as f32 / 2.0;
        let ry = height as f32 / 2.0;

        for i in 0..height {
            for j in 0..width {
                let x = j as f32 - cx;
                let y = i as f32 - cy;
                if (x * x) / (rx * rx) + (y * y) / (ry * ry) <= 1.0 {
                    data[i * width + j] = 1;
                }
            }
        }

        Self {
            data,
            width,
            height,
        }
    }
}
