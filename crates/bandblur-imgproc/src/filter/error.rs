use bandblur_image::ImageError;
use thiserror::Error;

use crate::parallel::ParallelError;

/// An error type for the filter module.
#[derive(Error, Debug, PartialEq)]
pub enum FilterError {
    /// The kernel size must be odd and greater than zero.
    #[error("kernel size must be odd and > 0, got {0}")]
    InvalidKernelSize(usize),

    /// The sigma must be a finite value greater than zero.
    #[error("sigma must be finite and > 0, got {0}")]
    InvalidSigma(f32),

    /// The source image has no pixels.
    #[error("source image is empty")]
    EmptySource,

    /// Error coming from the image buffers.
    #[error(transparent)]
    ImageError(#[from] ImageError),

    /// Error coming from the band workers.
    #[error(transparent)]
    Parallel(#[from] ParallelError),
}
