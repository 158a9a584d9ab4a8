//! Filter operations
//!
//! This module provides the gaussian kernels and the band-parallel blur.

/// Filter kernels
pub mod kernels;

/// Band convolution
mod convolution;
pub use convolution::*;

/// Filter errors
mod error;
pub use error::FilterError;

/// Filter operations
mod ops;
pub use ops::*;
