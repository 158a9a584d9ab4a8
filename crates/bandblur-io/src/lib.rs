#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// Error types for I/O operations.
///
/// Defines [`error::IoError`] variants for file access and encoding/decoding failures.
pub mod error;

/// High-level image reading and writing functions.
///
/// Provides convenient functions for reading any supported format and writing
/// by file extension. See [`functional::read_image_any_rgb8`].
pub mod functional;

/// JPEG image encoding.
///
/// Pure Rust JPEG encoder for writing grayscale and RGB images.
pub mod jpeg;

/// PNG image encoding and decoding.
///
/// Read and write 8-bit grayscale and RGB PNG images.
pub mod png;
