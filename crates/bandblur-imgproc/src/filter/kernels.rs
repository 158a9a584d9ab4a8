use super::FilterError;

/// A square, normalized 2D gaussian kernel.
///
/// The weights are stored row-major, `size * size` of them, and sum to one.
#[derive(Debug, Clone, PartialEq)]
pub struct GaussianKernel2d {
    size: usize,
    data: Vec<f32>,
}

impl GaussianKernel2d {
    /// The side length of the kernel, always odd.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Distance from the center cell to the border, `size / 2`.
    pub fn radius(&self) -> usize {
        self.size / 2
    }

    /// Weight at row `ky` and column `kx`, both in `[0, size)`.
    pub fn get(&self, ky: usize, kx: usize) -> f32 {
        self.data[ky * self.size + kx]
    }

    /// The weights of row `ky`.
    pub fn row(&self, ky: usize) -> &[f32] {
        &self.data[ky * self.size..(ky + 1) * self.size]
    }

    /// All the weights, row-major.
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    /// Sum of all the weights.
    pub fn sum(&self) -> f32 {
        self.data.iter().sum()
    }
}

fn validate(kernel_size: usize, sigma: f32) -> Result<(), FilterError> {
    if kernel_size == 0 || kernel_size % 2 == 0 {
        return Err(FilterError::InvalidKernelSize(kernel_size));
    }

    // the square kernel must be addressable, weights are accumulated in f64
    let fits = kernel_size
        .checked_mul(kernel_size)
        .and_then(|cells| cells.checked_mul(std::mem::size_of::<f64>()))
        .is_some_and(|bytes| bytes <= isize::MAX as usize);
    if !fits {
        return Err(FilterError::InvalidKernelSize(kernel_size));
    }

    if !sigma.is_finite() || sigma <= 0.0 {
        return Err(FilterError::InvalidSigma(sigma));
    }

    Ok(())
}

/// Create a gaussian blur kernel.
///
/// # Arguments
///
/// * `kernel_size` - The size of the kernel, must be odd.
/// * `sigma` - The sigma of the gaussian kernel, must be positive.
///
/// # Returns
///
/// A vector of the kernel, normalized to sum one.
pub fn gaussian_kernel_1d(kernel_size: usize, sigma: f32) -> Result<Vec<f32>, FilterError> {
    validate(kernel_size, sigma)?;

    let radius = (kernel_size / 2) as f64;
    let two_sigma_sq = 2.0 * (sigma as f64) * (sigma as f64);

    let weights = (0..kernel_size)
        .map(|i| {
            let x = i as f64 - radius;
            (-(x * x) / two_sigma_sq).exp()
        })
        .collect::<Vec<_>>();

    let norm = weights.iter().sum::<f64>();
    Ok(weights.into_iter().map(|w| (w / norm) as f32).collect())
}

/// Create a 2D gaussian blur kernel.
///
/// Each cell `(dy, dx)`, with offsets taken from the center cell, holds
/// `exp(-(dx² + dy²) / (2σ²)) / (2πσ²)` divided by the sum of all the cells.
///
/// # Arguments
///
/// * `kernel_size` - The side of the square kernel, must be odd.
/// * `sigma` - The standard deviation of the gaussian, must be positive.
///
/// # Errors
///
/// [`FilterError::InvalidKernelSize`] if `kernel_size` is even, zero or too
/// large for the kernel to be allocated and
/// [`FilterError::InvalidSigma`] if `sigma` is not a positive number.
///
/// # Example
///
/// ```
/// use bandblur_imgproc::filter::kernels::gaussian_kernel_2d;
///
/// let kernel = gaussian_kernel_2d(3, 1.0).unwrap();
/// assert_eq!(kernel.size(), 3);
/// assert!((kernel.sum() - 1.0).abs() < 1e-4);
/// ```
pub fn gaussian_kernel_2d(kernel_size: usize, sigma: f32) -> Result<GaussianKernel2d, FilterError> {
    validate(kernel_size, sigma)?;

    let radius = (kernel_size / 2) as isize;
    let sigma_sq = (sigma as f64) * (sigma as f64);
    let scale = 1.0 / (2.0 * std::f64::consts::PI * sigma_sq);

    let mut weights = Vec::with_capacity(kernel_size * kernel_size);
    let mut sum = 0.0f64;

    for dy in -radius..=radius {
        for dx in -radius..=radius {
            let dist_sq = (dx * dx + dy * dy) as f64;
            let w = scale * (-dist_sq / (2.0 * sigma_sq)).exp();
            weights.push(w);
            sum += w;
        }
    }

    let data = weights.into_iter().map(|w| (w / sum) as f32).collect();

    Ok(GaussianKernel2d {
        size: kernel_size,
        data,
    })
}
