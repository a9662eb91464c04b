use argh::FromArgs;
use std::path::PathBuf;

use cutout::io::error::IoError;
use cutout::segment::errors::SegmentError;
use cutout::segment::{segment_objects, SegmentConfig};

#[derive(FromArgs)]
/// Cut out objects photographed on a white background into alpha-masked PNGs
struct Args {
    /// path to an input image
    #[argh(option, short = 'i')]
    image_path: PathBuf,

    /// background intensity cutoff (default: 240)
    #[argh(option, default = "240")]
    threshold: u8,

    /// minimum contour area in pixels squared (default: 1000)
    #[argh(option, default = "1000.0")]
    min_area: f64,

    /// padding around each object's bounding box (default: 20)
    #[argh(option, default = "20")]
    padding: usize,

    /// side of the square cleanup kernel (default: 5)
    #[argh(option, default = "5")]
    kernel_size: usize,
}

/// Wording for the failure report: unreadable input is called out as a
/// read failure, anything past the load as a segmentation failure.
fn describe_failure(err: &SegmentError) -> &'static str {
    match err {
        SegmentError::Io(IoError::FileDoesNotExist(_) | IoError::ImageDecodeError(_)) => {
            "could not read image"
        }
        _ => "could not segment image",
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let env = env_logger::Env::default().default_filter_or("info");
    env_logger::init_from_env(env);

    let args: Args = argh::from_env();

    let config = SegmentConfig {
        threshold: args.threshold,
        min_area: args.min_area,
        padding: args.padding,
        kernel_size: args.kernel_size,
    };

    if let Err(err) = segment_objects(&args.image_path, &config) {
        log::error!(
            "Error: {} {}: {err}",
            describe_failure(&err),
            args.image_path.display()
        );
        return Err(err.into());
    }

    Ok(())
}
