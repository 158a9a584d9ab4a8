use crate::error::IoError;
use bandblur_image::Image;
use jpeg_encoder::{ColorType, Encoder};
use std::path::Path;

/// Writes the given JPEG _(rgb8)_ data to the given file path.
///
/// # Arguments
///
/// - `file_path` - The path to the JPEG image.
/// - `image` - The image containing the JPEG image data
/// - `quality` - The quality of the JPEG encoding, range from 0 (lowest) to 100 (highest)
pub fn write_image_jpeg_rgb8(
    file_path: impl AsRef<Path>,
    image: &Image<u8, 3>,
    quality: u8,
) -> Result<(), IoError> {
    write_image_jpeg_imp(file_path, image, ColorType::Rgb, quality)
}

/// Writes the given JPEG _(grayscale)_ data to the given file path.
///
/// # Arguments
///
/// - `file_path` - The path to the JPEG image.
/// - `image` - The image containing the JPEG image data
/// - `quality` - The quality of the JPEG encoding, range from 0 (lowest) to 100 (highest)
pub fn write_image_jpeg_gray8(
    file_path: impl AsRef<Path>,
    image: &Image<u8, 1>,
    quality: u8,
) -> Result<(), IoError> {
    write_image_jpeg_imp(file_path, image, ColorType::Luma, quality)
}

fn write_image_jpeg_imp<const N: usize>(
    file_path: impl AsRef<Path>,
    image: &Image<u8, N>,
    color_type: ColorType,
    quality: u8,
) -> Result<(), IoError> {
    let image_size = image.size();

    // the jpeg format stores dimensions on 16 bits
    let (Ok(width), Ok(height)) = (
        u16::try_from(image_size.width),
        u16::try_from(image_size.height),
    ) else {
        return Err(IoError::ImageTooLarge(image_size.width, image_size.height));
    };

    let encoder = Encoder::new_file(file_path, quality.min(100))?;
    encoder.encode(image.as_slice(), width, height, color_type)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::functional::read_image_any_mono8;

    #[test]
    fn write_jpeg_gray8() -> Result<(), IoError> {
        let tmp_dir = tempfile::tempdir()?;
        let file_path = tmp_dir.path().join("flat.jpg");

        let image = Image::<u8, 1>::from_size_val([32, 24].into(), 120)?;
        write_image_jpeg_gray8(&file_path, &image, 95)?;

        let image_back = read_image_any_mono8(&file_path)?;
        assert_eq!(image_back.size(), image.size());
        assert!(image_back
            .as_slice()
            .iter()
            .all(|&v| (v as i32 - 120).abs() <= 2));

        Ok(())
    }

    #[test]
    fn write_jpeg_rgb8() -> Result<(), IoError> {
        let tmp_dir = tempfile::tempdir()?;
        let file_path = tmp_dir.path().join("flat-rgb.jpeg");

        let image = Image::<u8, 3>::from_size_val([16, 8].into(), 60)?;
        write_image_jpeg_rgb8(&file_path, &image, 90)?;

        assert!(file_path.exists());
        let image_back = read_image_any_mono8(&file_path)?;
        assert_eq!(image_back.size(), image.size());

        Ok(())
    }

    #[test]
    fn write_jpeg_too_large() -> Result<(), IoError> {
        let tmp_dir = tempfile::tempdir()?;
        let file_path = tmp_dir.path().join("wide.jpg");

        let image = Image::<u8, 1>::from_size_val([70_000, 1].into(), 0)?;
        let res = write_image_jpeg_gray8(&file_path, &image, 90);
        assert!(matches!(res, Err(IoError::ImageTooLarge(70_000, 1))));

        Ok(())
    }
}
