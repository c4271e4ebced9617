//! Fork/join parallel matrix multiplication using Rayon.
//!
//! The output rectangle is recursively bisected along both dimensions into
//! four sub-blocks, each of which may run on an independent worker. A parent
//! task does not finish until all four children complete (`rayon::join`
//! barrier semantics). Recursion stops once a block's area falls at or below
//! a granularity threshold, at which point the block is computed by direct
//! triple-loop accumulation.
//!
//! B is transposed once up front so the inner reduction loop walks both
//! operands row-major — a cache-locality choice, not a correctness one.

use std::marker::PhantomData;

use crate::{check_shapes, Error, Matrix, MultiplyStrategy, Result};

/// Default block area at or below which recursion stops.
pub const DEFAULT_THRESHOLD: usize = 64;

/// Quadrant-recursive fork/join multiplication over a fixed-size thread pool.
///
/// # Example
/// ```
/// use matrix_strategies::{Matrix, ParallelMultiplication};
///
/// let a = Matrix::from_vec(2, 2, vec![1.0, 2.0, 3.0, 4.0]).unwrap();
/// let b = Matrix::from_vec(2, 2, vec![5.0, 6.0, 7.0, 8.0]).unwrap();
/// let strategy = ParallelMultiplication::new(4).unwrap();
/// let c = strategy.multiply(&a, &b).unwrap();
/// assert_eq!(c.data, vec![19.0, 22.0, 43.0, 50.0]);
/// ```
#[derive(Debug)]
pub struct ParallelMultiplication {
    pool: rayon::ThreadPool,
    workers: usize,
    threshold: usize,
}

impl ParallelMultiplication {
    /// Create a strategy backed by a pool of `workers` threads, with the
    /// default recursion threshold.
    pub fn new(workers: usize) -> Result<Self> {
        Self::with_threshold(workers, DEFAULT_THRESHOLD)
    }

    /// Create a strategy with an explicit recursion threshold.
    ///
    /// The threshold only affects task granularity, never the numerical
    /// result. Rejects a worker count or threshold of zero with
    /// [`Error::InvalidConfiguration`].
    pub fn with_threshold(workers: usize, threshold: usize) -> Result<Self> {
        if workers == 0 {
            return Err(Error::invalid_configuration(
                "worker count must be positive",
            ));
        }
        if threshold == 0 {
            return Err(Error::invalid_configuration(
                "recursion threshold must be positive",
            ));
        }
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers)
            .build()
            .map_err(|e| Error::invalid_configuration(format!("thread pool: {e}")))?;
        Ok(ParallelMultiplication {
            pool,
            workers,
            threshold,
        })
    }

    /// Number of worker threads in the pool.
    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Block area at or below which a task computes directly.
    pub fn threshold(&self) -> usize {
        self.threshold
    }

    /// Parallel matrix multiplication.
    ///
    /// Blocks the calling thread until the root task's join barrier
    /// releases. Shape mismatch is validated before any task is spawned.
    pub fn multiply<T>(&self, a: &Matrix<T>, b: &Matrix<T>) -> Result<Matrix<T>>
    where
        T: Clone + Default + std::ops::Add<Output = T> + std::ops::Mul<Output = T> + Send + Sync,
    {
        check_shapes(a, b)?;

        let common = a.cols;
        let out_cols = b.cols;
        let b_t = b.transpose();
        let mut result: Matrix<T> = Matrix::new(a.rows, out_cols);

        let root = Block {
            row_start: 0,
            row_end: a.rows,
            col_start: 0,
            col_end: out_cols,
        };
        let out = OutputCells::new(&mut result.data);
        self.pool.install(|| {
            multiply_block(&a.data, &b_t.data, out, root, common, out_cols, self.threshold)
        });

        Ok(result)
    }
}

impl<T> MultiplyStrategy<T> for ParallelMultiplication
where
    T: Clone + Default + std::ops::Add<Output = T> + std::ops::Mul<Output = T> + Send + Sync,
{
    fn multiply(&self, a: &Matrix<T>, b: &Matrix<T>) -> Result<Matrix<T>> {
        ParallelMultiplication::multiply(self, a, b)
    }
}

/// A rectangular sub-block of the output, identified by half-open row and
/// column ranges. Sub-blocks partition the output exactly at every
/// recursion level: no overlap, full cover.
#[derive(Debug, Clone, Copy)]
struct Block {
    row_start: usize,
    row_end: usize,
    col_start: usize,
    col_end: usize,
}

impl Block {
    fn area(&self) -> usize {
        (self.row_end - self.row_start) * (self.col_end - self.col_start)
    }
}

/// Raw view of the shared output buffer that can cross task boundaries.
///
/// Safety: concurrent tasks only ever write the disjoint sub-rectangles
/// assigned to them by the recursive bisection, so no two tasks touch the
/// same index.
struct OutputCells<'a, T> {
    ptr: *mut T,
    len: usize,
    _marker: PhantomData<&'a mut [T]>,
}

// Derived Clone/Copy would require `T: Copy`; the fields themselves are
// always copyable, so implement manually without that bound.
impl<T> Clone for OutputCells<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for OutputCells<'_, T> {}

unsafe impl<T: Send> Send for OutputCells<'_, T> {}
unsafe impl<T: Send> Sync for OutputCells<'_, T> {}

impl<'a, T> OutputCells<'a, T> {
    fn new(slice: &'a mut [T]) -> Self {
        OutputCells {
            ptr: slice.as_mut_ptr(),
            len: slice.len(),
            _marker: PhantomData,
        }
    }

    /// Safety: the caller must be the sole writer of every index it touches.
    #[allow(clippy::mut_from_ref)]
    unsafe fn as_mut_slice(&self) -> &mut [T] {
        std::slice::from_raw_parts_mut(self.ptr, self.len)
    }
}

fn multiply_block<T>(
    a: &[T],
    b_t: &[T],
    out: OutputCells<'_, T>,
    block: Block,
    common: usize,
    out_cols: usize,
    threshold: usize,
) where
    T: Clone + Default + std::ops::Add<Output = T> + std::ops::Mul<Output = T> + Send + Sync,
{
    if block.area() <= threshold {
        // Safety: this leaf is the only writer of its sub-rectangle.
        let out = unsafe { out.as_mut_slice() };
        for i in block.row_start..block.row_end {
            for j in block.col_start..block.col_end {
                let mut sum = T::default();
                for k in 0..common {
                    // b_t holds B transposed, so both accesses are row-major.
                    let a_val = a[i * common + k].clone();
                    let b_val = b_t[j * common + k].clone();
                    sum = sum + (a_val * b_val);
                }
                out[i * out_cols + j] = sum;
            }
        }
        return;
    }

    let mid_row = (block.row_start + block.row_end) / 2;
    let mid_col = (block.col_start + block.col_end) / 2;

    let quadrant = |row_start, row_end, col_start, col_end| Block {
        row_start,
        row_end,
        col_start,
        col_end,
    };
    let top_left = quadrant(block.row_start, mid_row, block.col_start, mid_col);
    let top_right = quadrant(block.row_start, mid_row, mid_col, block.col_end);
    let bottom_left = quadrant(mid_row, block.row_end, block.col_start, mid_col);
    let bottom_right = quadrant(mid_row, block.row_end, mid_col, block.col_end);

    // Fork all four children; the nested joins form the parent's barrier.
    rayon::join(
        || {
            rayon::join(
                || multiply_block(a, b_t, out, top_left, common, out_cols, threshold),
                || multiply_block(a, b_t, out, top_right, common, out_cols, threshold),
            )
        },
        || {
            rayon::join(
                || multiply_block(a, b_t, out, bottom_left, common, out_cols, threshold),
                || multiply_block(a, b_t, out, bottom_right, common, out_cols, threshold),
            )
        },
    );
}
