//! Matrix multiplication as a map/shuffle/reduce pipeline.
//!
//! The product is computed as if by independent, stateless workers that
//! cannot share memory and only exchange keyed messages:
//!
//! 1. A map pass over A emits each cell once per output column it
//!    participates in; a second, independent pass over B emits each cell
//!    once per output row.
//! 2. The shuffle groups contributions by output coordinate.
//! 3. Each group reduces to one output cell by joining the two tagged
//!    contribution sets on the reduction index and summing the cross
//!    products.
//!
//! This is matrix multiplication as a distributed equi-join on the reduction
//! index, keyed by destination coordinate. The in-memory [`Shuffle`] here
//! simulates the keyed exchange of a real partitioned substrate; the reduce
//! logic is identical either way.

use std::collections::HashMap;

use crate::{check_shapes, Matrix, MultiplyStrategy, Result};

/// Output coordinate `(row, col)` a contribution is destined for.
pub type Key = (usize, usize);

/// Which operand a contribution originated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tag {
    /// Left operand
    A,
    /// Right operand
    B,
}

/// One partial product operand, emitted during the map phase and consumed
/// during the reduce phase of its key.
#[derive(Debug, Clone, PartialEq)]
pub struct Contribution<T> {
    /// Source operand
    pub tag: Tag,
    /// Position along the shared reduction dimension
    pub index: usize,
    /// Cell value
    pub value: T,
}

/// The keyed-exchange seam between map and reduce.
///
/// Contributions accumulate under their output coordinate in arrival order;
/// reduction never depends on that order, only on tag and index.
#[derive(Debug, Default)]
pub struct Shuffle<T> {
    groups: HashMap<Key, Vec<Contribution<T>>>,
}

impl<T> Shuffle<T> {
    /// Create an empty exchange.
    pub fn new() -> Self {
        Shuffle {
            groups: HashMap::new(),
        }
    }

    /// Append one contribution to the group for `key`.
    pub fn emit(&mut self, key: Key, tag: Tag, index: usize, value: T) {
        self.groups
            .entry(key)
            .or_default()
            .push(Contribution { tag, index, value });
    }

    /// Number of non-empty groups.
    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    /// Visit every group once, in no particular key order.
    pub fn for_each_group<F>(&self, mut f: F)
    where
        F: FnMut(Key, &[Contribution<T>]),
    {
        for (key, contributions) in &self.groups {
            f(*key, contributions);
        }
    }
}

/// Key-partitioned shuffle/join multiplication.
///
/// # Example
/// ```
/// use matrix_strategies::{MapReduceMultiplication, Matrix};
///
/// let a = Matrix::from_vec(2, 2, vec![1.0, 2.0, 3.0, 4.0]).unwrap();
/// let b = Matrix::from_vec(2, 2, vec![5.0, 6.0, 7.0, 8.0]).unwrap();
/// let c = MapReduceMultiplication.multiply(&a, &b).unwrap();
/// assert_eq!(c.data, vec![19.0, 22.0, 43.0, 50.0]);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct MapReduceMultiplication;

impl MapReduceMultiplication {
    /// Multiply through the full map, shuffle, reduce pipeline.
    ///
    /// Shape mismatch is rejected before any contribution is emitted.
    pub fn multiply<T>(&self, a: &Matrix<T>, b: &Matrix<T>) -> Result<Matrix<T>>
    where
        T: Clone + Default + std::ops::Add<Output = T> + std::ops::Mul<Output = T>,
    {
        check_shapes(a, b)?;

        let mut shuffle = Shuffle::new();
        map_left_operand(a, b.cols, &mut shuffle);
        map_right_operand(b, a.rows, &mut shuffle);

        let mut result: Matrix<T> = Matrix::new(a.rows, b.cols);
        let out_cols = b.cols;
        shuffle.for_each_group(|(row, col), contributions| {
            result.data[row * out_cols + col] = reduce_group(contributions);
        });

        Ok(result)
    }
}

impl<T> MultiplyStrategy<T> for MapReduceMultiplication
where
    T: Clone + Default + std::ops::Add<Output = T> + std::ops::Mul<Output = T>,
{
    fn multiply(&self, a: &Matrix<T>, b: &Matrix<T>) -> Result<Matrix<T>> {
        MapReduceMultiplication::multiply(self, a, b)
    }
}

/// Map pass over A: cell `(i, k)` lands in every output cell of row `i`,
/// so it is replicated once per output column.
fn map_left_operand<T: Clone>(a: &Matrix<T>, out_cols: usize, shuffle: &mut Shuffle<T>) {
    for i in 0..a.rows {
        for k in 0..a.cols {
            let value = &a.data[i * a.cols + k];
            for j in 0..out_cols {
                shuffle.emit((i, j), Tag::A, k, value.clone());
            }
        }
    }
}

/// Map pass over B: cell `(k, j)` lands in every output cell of column `j`,
/// so it is replicated once per output row.
fn map_right_operand<T: Clone>(b: &Matrix<T>, out_rows: usize, shuffle: &mut Shuffle<T>) {
    for k in 0..b.rows {
        for j in 0..b.cols {
            let value = &b.data[k * b.cols + j];
            for i in 0..out_rows {
                shuffle.emit((i, j), Tag::B, k, value.clone());
            }
        }
    }
}

/// Join a group's two tagged contribution sets on the reduction index and
/// sum the cross products.
///
/// Duplicate `(tag, index)` entries overwrite (last write wins), and an
/// index present under only one tag contributes zero rather than erroring —
/// a missing cell degrades the sum instead of failing the job.
fn reduce_group<T>(contributions: &[Contribution<T>]) -> T
where
    T: Clone + Default + std::ops::Add<Output = T> + std::ops::Mul<Output = T>,
{
    let mut left: HashMap<usize, T> = HashMap::new();
    let mut right: HashMap<usize, T> = HashMap::new();

    for contribution in contributions {
        match contribution.tag {
            Tag::A => left.insert(contribution.index, contribution.value.clone()),
            Tag::B => right.insert(contribution.index, contribution.value.clone()),
        };
    }

    let mut sum = T::default();
    for (index, a_val) in &left {
        let b_val = right.get(index).cloned().unwrap_or_default();
        sum = sum + (a_val.clone() * b_val);
    }
    sum
}
