use std::ops::Range;
use std::panic::{self, AssertUnwindSafe};

use thiserror::Error;

/// Errors that can occur during parallel execution.
#[derive(Error, Debug, PartialEq)]
pub enum ParallelError {
    /// The thread pool failed to build.
    #[error("failed to build thread pool: {0}")]
    BuildError(String),

    /// The requested worker count cannot split the rows into non-empty bands.
    #[error("worker count must be in [1, {1}], got {0}")]
    InvalidWorkerCount(usize, usize),

    /// A worker panicked before finishing its band.
    #[error("a band worker panicked, the output is incomplete")]
    WorkerPanicked,

    /// The destination does not match the rows covered by the bands.
    #[error("destination length ({0}) does not match the bands ({1})")]
    SizeMismatch(usize, usize),
}

/// A half-open range of rows `[start_row, end_row)` processed by one worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Band {
    /// First row of the band.
    pub start_row: usize,
    /// One past the last row of the band.
    pub end_row: usize,
}

impl Band {
    /// Number of rows in the band.
    pub fn len(&self) -> usize {
        self.end_row - self.start_row
    }

    /// Whether the band covers no rows.
    pub fn is_empty(&self) -> bool {
        self.end_row <= self.start_row
    }

    /// The rows of the band as a range.
    pub fn rows(&self) -> Range<usize> {
        self.start_row..self.end_row
    }
}

/// Split `rows` into `num_workers` contiguous bands.
///
/// Every band gets `rows / num_workers` rows and the last one also takes the
/// remainder, so the bands cover `[0, rows)` exactly, in order.
///
/// # Arguments
///
/// * `rows` - The number of rows to split.
/// * `num_workers` - The number of bands, must be in `[1, rows]`.
///
/// # Example
///
/// ```
/// use bandblur_imgproc::parallel::{partition_rows, Band};
///
/// let bands = partition_rows(10, 3).unwrap();
/// assert_eq!(
///     bands,
///     vec![
///         Band { start_row: 0, end_row: 3 },
///         Band { start_row: 3, end_row: 6 },
///         Band { start_row: 6, end_row: 10 },
///     ]
/// );
/// ```
pub fn partition_rows(rows: usize, num_workers: usize) -> Result<Vec<Band>, ParallelError> {
    if num_workers == 0 || num_workers > rows {
        return Err(ParallelError::InvalidWorkerCount(num_workers, rows));
    }

    let band_height = rows / num_workers;

    let bands = (0..num_workers)
        .map(|i| {
            let start_row = i * band_height;
            let end_row = if i == num_workers - 1 {
                rows
            } else {
                start_row + band_height
            };
            Band { start_row, end_row }
        })
        .collect();

    Ok(bands)
}

/// Run `f` once per band on a dedicated pool of `num_workers` threads.
///
/// `dst` is split into one exclusive slice per band, holding the band rows only
/// (`band.len() * row_stride` elements). The call blocks until every band is
/// done. If any worker panics the whole call fails with
/// [`ParallelError::WorkerPanicked`].
///
/// PRECONDITION: `bands` are sorted, contiguous and start at row 0, as returned
/// by [`partition_rows`].
///
/// # Arguments
///
/// * `bands` - The bands to process.
/// * `dst` - The destination buffer covering all the bands.
/// * `row_stride` - The number of elements in one row of `dst`.
/// * `num_workers` - The number of threads in the pool.
/// * `f` - The operation to run for each band and its rows of `dst`.
pub fn run_bands<T, F>(
    bands: &[Band],
    dst: &mut [T],
    row_stride: usize,
    num_workers: usize,
    f: F,
) -> Result<(), ParallelError>
where
    T: Send,
    F: Fn(Band, &mut [T]) + Sync,
{
    let rows = bands.last().map_or(0, |band| band.end_row);

    if num_workers == 0 {
        return Err(ParallelError::InvalidWorkerCount(num_workers, rows));
    }

    if dst.len() != rows * row_stride {
        return Err(ParallelError::SizeMismatch(dst.len(), rows * row_stride));
    }

    debug_assert!(bands.first().map_or(true, |band| band.start_row == 0));
    debug_assert!(bands.windows(2).all(|w| w[0].end_row == w[1].start_row));

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(num_workers)
        .thread_name(|i| format!("band-worker-{i}"))
        .build()
        .map_err(|e| ParallelError::BuildError(e.to_string()))?;

    // carve the destination into one exclusive slice per band
    let mut chunks = Vec::with_capacity(bands.len());
    let mut rest = dst;
    for band in bands {
        let (head, tail) = std::mem::take(&mut rest).split_at_mut(band.len() * row_stride);
        chunks.push((*band, head));
        rest = tail;
    }

    let f = &f;
    panic::catch_unwind(AssertUnwindSafe(|| {
        pool.scope(|s| {
            for (band, rows) in chunks {
                s.spawn(move |_| {
                    log::trace!("band {:?} started", band.rows());
                    f(band, rows);
                    log::trace!("band {:?} finished", band.rows());
                });
            }
        })
    }))
    .map_err(|_| ParallelError::WorkerPanicked)
}
