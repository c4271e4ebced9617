//! Dense matrix multiplication under three interchangeable strategies.
//!
//! All strategies compute the same product `C = A × B` and honor the same
//! contract (fresh result, inputs never mutated, [`Error::ShapeMismatch`]
//! when `A.cols != B.rows`), but exploit different parallelism substrates:
//!
//! - [`Matrix::multiply`] / [`SequentialMultiplication`]: single-threaded
//!   triple-nested accumulation with a fixed summation order — the
//!   correctness oracle the other strategies are tested against.
//! - [`ParallelMultiplication`]: quadrant-recursive fork/join decomposition
//!   over a fixed-size Rayon thread pool, with a granularity cutoff.
//! - [`MapReduceMultiplication`]: key-partitioned map/shuffle/reduce, modeled
//!   on stateless workers that only exchange keyed messages.
//!
//! Summation order (and hence floating-point rounding) differs between
//! strategies, so results agree within tolerance rather than bit-exactly.

pub mod error;
pub mod generate;
pub mod mapreduce;
pub mod parallel;

pub use error::{Error, Result};
pub use mapreduce::MapReduceMultiplication;
pub use parallel::ParallelMultiplication;

/// A dense, row-major matrix for numerical computations.
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix<T> {
    /// Number of rows
    pub rows: usize,
    /// Number of columns
    pub cols: usize,
    /// Row-major element storage, `rows * cols` long
    pub data: Vec<T>,
}

impl<T: Clone + Default> Matrix<T> {
    /// Create a new matrix filled with default values.
    pub fn new(rows: usize, cols: usize) -> Self {
        Matrix {
            rows,
            cols,
            data: vec![T::default(); rows * cols],
        }
    }

    /// Create a matrix from a row-major vector of data.
    pub fn from_vec(rows: usize, cols: usize, data: Vec<T>) -> Result<Self> {
        if data.len() != rows * cols {
            return Err(Error::DataLength {
                len: data.len(),
                rows,
                cols,
            });
        }
        Ok(Matrix { rows, cols, data })
    }

    /// Get an element at position (row, col).
    pub fn get(&self, row: usize, col: usize) -> Option<&T> {
        if row >= self.rows || col >= self.cols {
            return None;
        }
        self.data.get(row * self.cols + col)
    }

    /// Set an element at position (row, col).
    pub fn set(&mut self, row: usize, col: usize, value: T) -> Result<()> {
        if row >= self.rows || col >= self.cols {
            return Err(Error::IndexOutOfBounds { row, col });
        }
        self.data[row * self.cols + col] = value;
        Ok(())
    }
}

impl<T> Matrix<T>
where
    T: Clone + Default + From<u8>,
{
    /// Create the `size × size` identity matrix.
    pub fn identity(size: usize) -> Self {
        let mut result = Matrix::new(size, size);
        for i in 0..size {
            result.data[i * size + i] = T::from(1u8);
        }
        result
    }
}

impl<T> Matrix<T>
where
    T: Clone + Default + std::ops::Add<Output = T> + std::ops::Mul<Output = T>,
{
    /// Sequential matrix multiplication (O(n³)).
    ///
    /// Plain triple-nested accumulation in `i, j, k` order. The summation
    /// order is fixed, so the output is fully deterministic; this is the
    /// oracle the parallel and map/reduce strategies are compared against.
    ///
    /// # Example
    /// ```
    /// use matrix_strategies::Matrix;
    ///
    /// let a = Matrix::from_vec(2, 2, vec![1.0, 2.0, 3.0, 4.0]).unwrap();
    /// let b = Matrix::from_vec(2, 2, vec![5.0, 6.0, 7.0, 8.0]).unwrap();
    /// let c = a.multiply(&b).unwrap();
    /// assert_eq!(c.data, vec![19.0, 22.0, 43.0, 50.0]);
    /// ```
    pub fn multiply(&self, other: &Matrix<T>) -> Result<Matrix<T>> {
        check_shapes(self, other)?;

        let mut result: Matrix<T> = Matrix::new(self.rows, other.cols);
        let a_cols = self.cols;
        let b_cols = other.cols;

        for i in 0..self.rows {
            for j in 0..b_cols {
                let mut sum = T::default();
                let mut a_idx = i * a_cols;
                let mut b_idx = j;

                for _ in 0..a_cols {
                    // Direct index math avoids repeated bounds checks from `get`.
                    let a_val = self.data[a_idx].clone();
                    let b_val = other.data[b_idx].clone();
                    sum = sum + (a_val * b_val);
                    a_idx += 1;
                    b_idx += b_cols;
                }

                result.data[i * b_cols + j] = sum;
            }
        }

        Ok(result)
    }
}

impl<T> Matrix<T>
where
    T: Clone,
{
    /// Transpose the matrix.
    pub fn transpose(&self) -> Matrix<T> {
        let mut result = Matrix {
            rows: self.cols,
            cols: self.rows,
            data: Vec::with_capacity(self.data.len()),
        };

        for j in 0..self.cols {
            for i in 0..self.rows {
                result.data.push(self.data[i * self.cols + j].clone());
            }
        }

        result
    }
}

/// Validate multiplication compatibility before any computation starts.
pub(crate) fn check_shapes<T>(a: &Matrix<T>, b: &Matrix<T>) -> Result<()> {
    if a.cols != b.rows {
        return Err(Error::ShapeMismatch {
            lhs_rows: a.rows,
            lhs_cols: a.cols,
            rhs_rows: b.rows,
            rhs_cols: b.cols,
        });
    }
    Ok(())
}

/// The uniform seam all multiplication strategies implement.
///
/// Every implementor never mutates its inputs, always allocates a fresh
/// `rows(A) × cols(B)` result, and fails with [`Error::ShapeMismatch`]
/// for incompatible operands.
pub trait MultiplyStrategy<T> {
    /// Compute `A × B`.
    fn multiply(&self, a: &Matrix<T>, b: &Matrix<T>) -> Result<Matrix<T>>;
}

/// The sequential baseline as a [`MultiplyStrategy`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SequentialMultiplication;

impl<T> MultiplyStrategy<T> for SequentialMultiplication
where
    T: Clone + Default + std::ops::Add<Output = T> + std::ops::Mul<Output = T>,
{
    fn multiply(&self, a: &Matrix<T>, b: &Matrix<T>) -> Result<Matrix<T>> {
        a.multiply(b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matrix_creation() {
        let m: Matrix<f64> = Matrix::new(3, 3);
        assert_eq!(m.rows, 3);
        assert_eq!(m.cols, 3);
        assert_eq!(m.data.len(), 9);
    }

    #[test]
    fn test_matrix_from_vec() {
        let data = vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
        let m = Matrix::from_vec(2, 3, data).unwrap();
        assert_eq!(m.get(0, 0), Some(&1.0));
        assert_eq!(m.get(1, 2), Some(&6.0));
    }

    #[test]
    fn test_matrix_from_vec_length_mismatch() {
        let err = Matrix::from_vec(2, 3, vec![1.0, 2.0]).unwrap_err();
        assert_eq!(
            err,
            Error::DataLength {
                len: 2,
                rows: 2,
                cols: 3
            }
        );
    }

    #[test]
    fn test_matrix_get_set() {
        let mut m: Matrix<f64> = Matrix::new(2, 2);
        m.set(0, 0, 10.0).unwrap();
        m.set(1, 1, 20.0).unwrap();
        assert_eq!(m.get(0, 0), Some(&10.0));
        assert_eq!(m.get(1, 1), Some(&20.0));
        assert!(m.set(2, 0, 1.0).is_err());
    }

    #[test]
    fn test_matrix_multiply() {
        let a = Matrix::from_vec(2, 2, vec![1.0, 2.0, 3.0, 4.0]).unwrap();
        let b = Matrix::from_vec(2, 2, vec![5.0, 6.0, 7.0, 8.0]).unwrap();
        let c = a.multiply(&b).unwrap();

        assert_eq!(c.rows, 2);
        assert_eq!(c.cols, 2);
        assert_eq!(c.data, vec![19.0, 22.0, 43.0, 50.0]);
    }

    #[test]
    fn test_matrix_multiply_rectangular() {
        let a = Matrix::from_vec(2, 3, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]).unwrap();
        let b = Matrix::from_vec(3, 2, vec![7.0, 8.0, 9.0, 10.0, 11.0, 12.0]).unwrap();
        let c = a.multiply(&b).unwrap();

        assert_eq!(c.rows, 2);
        assert_eq!(c.cols, 2);
        assert_eq!(c.data, vec![58.0, 64.0, 139.0, 154.0]);
    }

    #[test]
    fn test_matrix_multiply_dimension_mismatch() {
        let a: Matrix<f64> = Matrix::new(2, 3);
        let b: Matrix<f64> = Matrix::new(2, 2);
        let err = a.multiply(&b).unwrap_err();
        assert_eq!(
            err,
            Error::ShapeMismatch {
                lhs_rows: 2,
                lhs_cols: 3,
                rhs_rows: 2,
                rhs_cols: 2
            }
        );
    }

    #[test]
    fn test_matrix_transpose() {
        let a = Matrix::from_vec(2, 3, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]).unwrap();
        let b = a.transpose();

        assert_eq!(b.rows, 3);
        assert_eq!(b.cols, 2);
        assert_eq!(b.get(0, 0), Some(&1.0));
        assert_eq!(b.get(0, 1), Some(&4.0));
        assert_eq!(b.get(1, 0), Some(&2.0));
        assert_eq!(b.get(2, 1), Some(&6.0));
    }

    #[test]
    fn test_identity_multiplication() {
        let a = Matrix::from_vec(2, 2, vec![1.0, 2.0, 3.0, 4.0]).unwrap();
        let identity: Matrix<f64> = Matrix::identity(2);
        let result = a.multiply(&identity).unwrap();

        assert_eq!(result, a);
    }

    #[test]
    fn test_outer_product_fan_out() {
        // 3x1 of all 2's times 1x3 of all 3's: every output cell is 6.
        let a = Matrix::from_vec(3, 1, vec![2.0; 3]).unwrap();
        let b = Matrix::from_vec(1, 3, vec![3.0; 3]).unwrap();
        let c = a.multiply(&b).unwrap();

        assert_eq!(c.rows, 3);
        assert_eq!(c.cols, 3);
        assert_eq!(c.data, vec![6.0; 9]);
    }

    #[test]
    fn test_all_strategies_agree_on_random_input() {
        use approx::assert_relative_eq;
        use rand::rngs::StdRng;
        use rand::SeedableRng;

        let mut rng = StdRng::seed_from_u64(2024);
        let a = generate::random_matrix(19, 23, -10.0, 10.0, &mut rng).unwrap();
        let b = generate::random_matrix(23, 17, -10.0, 10.0, &mut rng).unwrap();

        let oracle = a.multiply(&b).unwrap();
        let parallel = ParallelMultiplication::new(8)
            .unwrap()
            .multiply(&a, &b)
            .unwrap();
        let mapreduce = MapReduceMultiplication.multiply(&a, &b).unwrap();

        for other in [&parallel, &mapreduce] {
            assert_eq!((other.rows, other.cols), (oracle.rows, oracle.cols));
            for (x, y) in oracle.data.iter().zip(&other.data) {
                assert_relative_eq!(*x, *y, max_relative = 1e-9);
            }
        }
    }

    #[test]
    fn test_strategy_trait_object() {
        let strategies: Vec<Box<dyn MultiplyStrategy<f64>>> = vec![
            Box::new(SequentialMultiplication),
            Box::new(ParallelMultiplication::new(2).unwrap()),
            Box::new(MapReduceMultiplication),
        ];

        let a = Matrix::from_vec(2, 2, vec![1.0, 2.0, 3.0, 4.0]).unwrap();
        let b = Matrix::from_vec(2, 2, vec![5.0, 6.0, 7.0, 8.0]).unwrap();

        for strategy in &strategies {
            let c = strategy.multiply(&a, &b).unwrap();
            assert_eq!(c.data, vec![19.0, 22.0, 43.0, 50.0]);
        }
    }
}
