use bandblur_image::Image;

use super::kernels::GaussianKernel2d;
use crate::parallel::Band;

/// Map a possibly out of range index to the nearest valid one in `[0, len)`.
#[inline]
fn clamp_index(i: isize, len: usize) -> usize {
    i.clamp(0, len as isize - 1) as usize
}

/// Convolve the rows of one band with a 2D kernel.
///
/// For every pixel of the band the neighborhood is sampled with edge clamping,
/// so samples falling outside the image reuse the nearest border pixel. Only
/// the first channel of `src` is read. The weighted sum is rounded, clamped to
/// `[0, 255]` and written to every channel of the destination pixel.
///
/// # Arguments
///
/// * `src` - The full source image with shape (H, W, SC).
/// * `kernel` - The normalized kernel.
/// * `band` - The rows of the image to compute.
/// * `dst_rows` - The destination rows of the band only, with shape (band.len(), W, DC).
///
/// PRECONDITION: `band` lies inside the image and `dst_rows` holds exactly
/// `band.len() * W * DC` elements.
pub fn convolve_band<const SC: usize, const DC: usize>(
    src: &Image<u8, SC>,
    kernel: &GaussianKernel2d,
    band: Band,
    dst_rows: &mut [u8],
) {
    let width = src.width();
    let height = src.height();
    let size = kernel.size();
    let radius = kernel.radius() as isize;

    debug_assert!(band.end_row <= height);
    debug_assert_eq!(dst_rows.len(), band.len() * width * DC);

    // offset in the source row of the sample taken for each (x, kx) pair
    let col_offsets = (0..width)
        .flat_map(|x| {
            (-radius..=radius).map(move |kx| clamp_index(x as isize + kx, width) * SC)
        })
        .collect::<Vec<_>>();

    let src_data = src.as_slice();
    let src_stride = src.row_stride();
    let mut row_offsets = vec![0usize; size];

    for (y, dst_row) in band.rows().zip(dst_rows.chunks_exact_mut(width * DC)) {
        for (ky, offset) in row_offsets.iter_mut().enumerate() {
            *offset = clamp_index(y as isize + ky as isize - radius, height) * src_stride;
        }

        for (dst_pixel, cols) in dst_row
            .chunks_exact_mut(DC)
            .zip(col_offsets.chunks_exact(size))
        {
            let mut sum = 0.0f32;
            for (ky, &row_offset) in row_offsets.iter().enumerate() {
                for (&w, &col) in kernel.row(ky).iter().zip(cols.iter()) {
                    sum += src_data[row_offset + col] as f32 * w;
                }
            }

            dst_pixel.fill(sum.round().clamp(0.0, 255.0) as u8);
        }
    }
}
