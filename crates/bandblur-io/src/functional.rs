use std::path::Path;

use bandblur_image::{Image, ImageSize};

use crate::{error::IoError, jpeg, png};

/// Default JPEG quality used by the extension based writers.
pub const DEFAULT_JPEG_QUALITY: u8 = 95;

/// Reads an RGB8 image from the given file path.
///
/// The method reads from any image format supported by the image crate and
/// converts the pixels to 8-bit RGB.
///
/// # Arguments
///
/// * `file_path` - The path to a valid image file.
///
/// # Returns
///
/// An image containing the image data.
pub fn read_image_any_rgb8(file_path: impl AsRef<Path>) -> Result<Image<u8, 3>, IoError> {
    let img = decode_any(file_path.as_ref())?;
    let size = image_size(&img);
    Ok(Image::new(size, img.into_rgb8().into_raw())?)
}

/// Reads a grayscale image from the given file path.
///
/// The method reads from any image format supported by the image crate and
/// converts the pixels to 8-bit luma.
///
/// # Arguments
///
/// * `file_path` - The path to a valid image file.
///
/// # Returns
///
/// A single channel image containing the image data.
pub fn read_image_any_mono8(file_path: impl AsRef<Path>) -> Result<Image<u8, 1>, IoError> {
    let img = decode_any(file_path.as_ref())?;
    let size = image_size(&img);
    Ok(Image::new(size, img.into_luma8().into_raw())?)
}

fn decode_any(file_path: &Path) -> Result<image::DynamicImage, IoError> {
    // verify the file exists
    if !file_path.exists() {
        return Err(IoError::FileDoesNotExist(file_path.to_path_buf()));
    }

    let img = image::ImageReader::open(file_path)?
        .with_guessed_format()?
        .decode()?;

    log::debug!(
        "decoded {} as {:?} ({}x{})",
        file_path.display(),
        img.color(),
        img.width(),
        img.height()
    );

    Ok(img)
}

fn image_size(img: &image::DynamicImage) -> ImageSize {
    ImageSize {
        width: img.width() as usize,
        height: img.height() as usize,
    }
}

enum OutputFormat {
    Png,
    Jpeg,
}

fn output_format(file_path: &Path) -> Result<OutputFormat, IoError> {
    let ext = file_path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase());

    match ext.as_deref() {
        Some("png") => Ok(OutputFormat::Png),
        Some("jpg") | Some("jpeg") => Ok(OutputFormat::Jpeg),
        _ => Err(IoError::InvalidFileExtension(file_path.to_path_buf())),
    }
}

/// Writes an RGB8 image choosing the encoder from the file extension.
///
/// Supported extensions are `png`, `jpg` and `jpeg`.
///
/// # Arguments
///
/// * `file_path` - The path to the output image.
/// * `image` - The image to write.
/// * `quality` - The JPEG quality in `[0, 100]`, ignored for PNG.
pub fn write_image_rgb8(
    file_path: impl AsRef<Path>,
    image: &Image<u8, 3>,
    quality: u8,
) -> Result<(), IoError> {
    let file_path = file_path.as_ref();
    match output_format(file_path)? {
        OutputFormat::Png => png::write_image_png_rgb8(file_path, image),
        OutputFormat::Jpeg => jpeg::write_image_jpeg_rgb8(file_path, image, quality),
    }
}

/// Writes a grayscale image choosing the encoder from the file extension.
///
/// Supported extensions are `png`, `jpg` and `jpeg`.
///
/// # Arguments
///
/// * `file_path` - The path to the output image.
/// * `image` - The image to write.
/// * `quality` - The JPEG quality in `[0, 100]`, ignored for PNG.
pub fn write_image_mono8(
    file_path: impl AsRef<Path>,
    image: &Image<u8, 1>,
    quality: u8,
) -> Result<(), IoError> {
    let file_path = file_path.as_ref();
    match output_format(file_path)? {
        OutputFormat::Png => png::write_image_png_gray8(file_path, image),
        OutputFormat::Jpeg => jpeg::write_image_jpeg_gray8(file_path, image, quality),
    }
}
