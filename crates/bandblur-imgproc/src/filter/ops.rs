use bandblur_image::{Image, ImageError};

use super::{convolve_band, kernels, FilterError};
use crate::parallel;

/// Blur a grayscale image with a gaussian filter, splitting the rows in bands.
///
/// The rows of the image are split in `num_workers` contiguous bands, the last
/// band taking the remainder rows. Each band is convolved on its own worker
/// thread and the function returns once all of them are done. The result does
/// not depend on the number of workers.
///
/// Only the first channel of `src` is read. Every channel of `dst` receives the
/// blurred intensity.
///
/// # Arguments
///
/// * `src` - The source image with shape (H, W, SC).
/// * `dst` - The destination image with shape (H, W, DC).
/// * `kernel_size` - The side of the square gaussian kernel, must be odd.
/// * `sigma` - The sigma of the gaussian kernel.
/// * `num_workers` - The number of bands and worker threads, in `[1, H]`.
///
/// # Errors
///
/// All the arguments are validated before any worker starts. A worker failure
/// fails the whole call.
///
/// # Example
///
/// ```
/// use bandblur_image::{Image, ImageSize};
/// use bandblur_imgproc::filter::gaussian_blur_bands;
///
/// let size = ImageSize { width: 8, height: 6 };
/// let src = Image::<u8, 1>::from_size_val(size, 128).unwrap();
/// let mut dst = Image::<u8, 3>::from_size_val(size, 0).unwrap();
///
/// gaussian_blur_bands(&src, &mut dst, 5, 1.5, 3).unwrap();
///
/// assert!(dst.as_slice().iter().all(|&v| v == 128));
/// ```
pub fn gaussian_blur_bands<const SC: usize, const DC: usize>(
    src: &Image<u8, SC>,
    dst: &mut Image<u8, DC>,
    kernel_size: usize,
    sigma: f32,
    num_workers: usize,
) -> Result<(), FilterError> {
    if SC == 0 || src.size().is_empty() {
        return Err(FilterError::EmptySource);
    }

    // the blurred intensity needs at least one destination channel
    if DC == 0 {
        return Err(ImageError::ChannelIndexOutOfBounds(0, DC).into());
    }

    if src.size() != dst.size() {
        return Err(ImageError::InvalidImageSize(
            src.cols(),
            src.rows(),
            dst.cols(),
            dst.rows(),
        )
        .into());
    }

    let kernel = kernels::gaussian_kernel_2d(kernel_size, sigma)?;
    let bands = parallel::partition_rows(src.rows(), num_workers)?;

    log::debug!(
        "gaussian blur {}: kernel {kernel_size}x{kernel_size} sigma {sigma}, {} bands of {} rows",
        src.size(),
        bands.len(),
        bands[0].len(),
    );

    let row_stride = dst.row_stride();
    parallel::run_bands(
        &bands,
        dst.as_slice_mut(),
        row_stride,
        num_workers,
        |band, rows| convolve_band::<SC, DC>(src, &kernel, band, rows),
    )?;

    Ok(())
}

/// Parameters of a band-parallel gaussian blur.
///
/// # Example
///
/// ```
/// use bandblur_image::Image;
/// use bandblur_imgproc::filter::BandedGaussianBlur;
///
/// let blur = BandedGaussianBlur::default()
///     .with_kernel_size(3)
///     .with_sigma(1.0)
///     .with_num_workers(2);
///
/// let src = Image::<u8, 1>::from_size_val([4, 4].into(), 7).unwrap();
/// let dst = blur.run(&src).unwrap();
/// assert_eq!(dst.size(), src.size());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BandedGaussianBlur {
    /// The side of the square gaussian kernel, must be odd.
    pub kernel_size: usize,
    /// The sigma of the gaussian kernel.
    pub sigma: f32,
    /// The number of bands and worker threads.
    pub num_workers: usize,
}

impl Default for BandedGaussianBlur {
    fn default() -> Self {
        Self {
            kernel_size: 61,
            sigma: 10.0,
            num_workers: 16,
        }
    }
}

impl BandedGaussianBlur {
    /// Set the kernel size.
    pub fn with_kernel_size(mut self, kernel_size: usize) -> Self {
        self.kernel_size = kernel_size;
        self
    }

    /// Set the sigma.
    pub fn with_sigma(mut self, sigma: f32) -> Self {
        self.sigma = sigma;
        self
    }

    /// Set the number of workers.
    pub fn with_num_workers(mut self, num_workers: usize) -> Self {
        self.num_workers = num_workers;
        self
    }

    /// Blur `src` into a preallocated `dst`, see [`gaussian_blur_bands`].
    pub fn apply<const SC: usize, const DC: usize>(
        &self,
        src: &Image<u8, SC>,
        dst: &mut Image<u8, DC>,
    ) -> Result<(), FilterError> {
        gaussian_blur_bands(src, dst, self.kernel_size, self.sigma, self.num_workers)
    }

    /// Blur `src` into a new image with the same size and channels.
    pub fn run<const C: usize>(&self, src: &Image<u8, C>) -> Result<Image<u8, C>, FilterError> {
        let mut dst = Image::from_size_val(src.size(), 0u8)?;
        self.apply(src, &mut dst)?;
        Ok(dst)
    }
}
