use std::cmp::Ordering;

use crate::{JenksErr, JenksNum};

/// A distinct data value, and the number of times it occurs in the dataset
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValueCountPair<T> {
    pub value: T,
    pub count: usize,
}

impl<T: JenksNum> ValueCountPair<T> {
    pub fn new(value: T, count: usize) -> Self {
        ValueCountPair { value, count }
    }
}

/// return a sorted **copy** of the input. NaN and infinities are rejected before
/// sorting, so the comparison can't fail
fn numeric_sort<T: JenksNum>(arr: &[T]) -> Result<Vec<T>, JenksErr> {
    if let Some(index) = arr.iter().position(|v| !v.is_finite()) {
        return Err(JenksErr::InvalidValue { index });
    }
    let mut xs = arr.to_vec();
    xs.sort_unstable_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
    Ok(xs)
}

/// Collapse arbitrary input into strictly ascending, distinct values with their
/// occurrence counts.
///
/// # Example
///
/// ```
/// use jenks::{value_count_pairs, ValueCountPair};
///
/// let pairs = value_count_pairs(&[5.0f64, 5.0, 5.0, 1.0, 2.0, 3.0]).unwrap();
/// assert_eq!(
///     pairs,
///     vec![
///         ValueCountPair::new(1.0, 1),
///         ValueCountPair::new(2.0, 1),
///         ValueCountPair::new(3.0, 1),
///         ValueCountPair::new(5.0, 3),
///     ]
/// );
/// ```
pub fn value_count_pairs<T: JenksNum>(data: &[T]) -> Result<Vec<ValueCountPair<T>>, JenksErr> {
    let sorted = numeric_sort(data)?;
    let mut pairs: Vec<ValueCountPair<T>> = Vec::new();
    for value in sorted {
        match pairs.last_mut() {
            Some(last) if last.value == value => last.count += 1,
            _ => pairs.push(ValueCountPair::new(value, 1)),
        }
    }
    Ok(pairs)
}
