//! Fisher-Jenks "natural breaks" classification partitions one-dimensional data into
//! contiguous classes with the least within-class variance. Walter Fisher
//! ([1958](https://doi.org/10.1080/01621459.1958.10501479)) showed that the optimal grouping
//! can be found exactly by [dynamic programming](https://en.wikipedia.org/wiki/Dynamic_programming);
//! George Jenks popularised it for choosing the class boundaries of choropleth maps.
//!
//! This implementation works on distinct values weighted by their number of occurrences,
//! and fills each row of the dynamic programming table by divide and conquer, for
//! O(m·log(m)·k) time in the number of distinct values `m` and classes `k`.

use num_traits::cast::FromPrimitive;
use num_traits::Float;
use std::fmt::Debug;
use tracing::debug;

#[cfg(not(target_arch = "wasm32"))]
mod ffi;
#[cfg(not(target_arch = "wasm32"))]
pub use crate::ffi::{drop_jenks_result, jenks_ffi, ExternalArray};

#[cfg(target_arch = "wasm32")]
mod wasm;
#[cfg(target_arch = "wasm32")]
pub use crate::wasm::jenks_wasm;

mod engine;
mod errors;
mod fit;
mod pairs;
mod stddev;
pub use crate::errors::JenksErr;
pub use crate::fit::{class_index, goodness_of_variance_fit};
pub use crate::pairs::{value_count_pairs, ValueCountPair};
pub use crate::stddev::std_dev_breaks;

use crate::engine::JenksFisher;

/// A trait that encompasses the floating point types Jenks classification works on
pub trait JenksNum: Float + FromPrimitive + Debug + Send + Sync {}
impl<T: Float + FromPrimitive + Debug + Send + Sync> JenksNum for T {}

/// Optimal breaks for data that has already been reduced to strictly ascending,
/// distinct values with positive occurrence counts (see [`value_count_pairs`]).
///
/// The first break is always the smallest value; each following break is the
/// lower bound of the next class. Asking for 0 classes yields no breaks.
///
/// # Errors
/// Input that isn't strictly ascending, a zero count, a non-finite value, or more
/// classes than there are pairs is rejected before any work is done.
///
/// # Example
///
/// ```
/// use jenks::{jenks_breaks_sorted, ValueCountPair};
///
/// let pairs = vec![
///     ValueCountPair::new(1.0f64, 1),
///     ValueCountPair::new(2.0, 1),
///     ValueCountPair::new(6.0, 1),
///     ValueCountPair::new(10.0, 2),
///     ValueCountPair::new(11.0, 1),
/// ];
/// assert_eq!(jenks_breaks_sorted(&pairs, 2).unwrap(), vec![1.0, 10.0]);
/// ```
pub fn jenks_breaks_sorted<T: JenksNum>(
    pairs: &[ValueCountPair<T>],
    nclasses: usize,
) -> Result<Vec<T>, JenksErr> {
    if nclasses == 0 {
        return Ok(vec![]);
    }
    Ok(JenksFisher::new(pairs, nclasses)?.breaks())
}

/// Jenks natural breaks minimise the variance within classes, and so maximise the
/// variance between them: each class is **optimally homogenous**, and the data is split
/// into representative groups. This is very useful for visualization, where one may
/// wish to represent a continuous variable in discrete colour or style groups.
///
/// Input may be in any order and contain repeated values: repeats are counted once,
/// with a weight, before classification. The result holds the lower bound of each
/// class, starting with the minimum of the data.
///
/// # Notes
/// If there are no more distinct values than requested classes, the distinct values
/// themselves are returned, so the result may be shorter than `nclasses`.
///
/// # References
/// 1. [Fisher, W. D. (1958). On Grouping for Maximum Homogeneity. Journal of the American Statistical Association, 53(284), 789–798.](https://doi.org/10.1080/01621459.1958.10501479)
/// 2. Jenks, G. F. (1977). Optimal data classification for choropleth maps. University of Kansas, Department of Geography, Occasional paper No. 2.
/// 3. <https://observablehq.com/@visionscarto/natural-breaks>
///
/// # Example
///
/// ```
/// use jenks::jenks_breaks;
///
/// let input = vec![
///     1.0f64, 12.0, 13.0, 14.0, 15.0, 16.0, 2.0, 2.0, 3.0, 5.0, 7.0, 1.0, 2.0, 5.0, 7.0,
///     1.0, 5.0, 82.0, 1.0, 1.3, 1.1, 78.0,
/// ];
/// let result = jenks_breaks(&input, 3).unwrap();
/// assert_eq!(result, vec![1.0, 12.0, 78.0]);
/// ```
pub fn jenks_breaks<T: JenksNum>(data: &[T], nclasses: usize) -> Result<Vec<T>, JenksErr> {
    if nclasses == 0 {
        return Ok(vec![]);
    }
    let pairs = value_count_pairs(data)?;
    debug!(
        values = data.len(),
        distinct = pairs.len(),
        classes = nclasses,
        "classifying"
    );
    if pairs.len() <= nclasses {
        debug!("no more distinct values than classes: returning the values themselves");
        return Ok(pairs.into_iter().map(|pair| pair.value).collect());
    }
    jenks_breaks_sorted(&pairs, nclasses)
}

/// The breaks returned by [jenks_breaks] are "ugly" in the sense that the values
/// returned are the lower bound of each class, which can’t be used for labelling, since they
/// might have many decimal places. To create a legend, the values should be rounded — but the
/// rounding might be either too loose (and would result in spurious decimal places), or too strict,
/// resulting in classes ranging “from x to x”. A better approach is to choose the roundest number that
/// separates the lowest point from a class from the highest point
/// in the _preceding_ class — thus giving just enough precision to distinguish the classes.
///
/// One value is returned per interior break, so there are no more than `nclasses - 1`.
///
/// # Original Implementation
/// <https://observablehq.com/@visionscarto/natural-breaks#round>
pub fn roundbreaks<T: JenksNum>(data: &[T], nclasses: usize) -> Result<Vec<T>, JenksErr> {
    let pairs = value_count_pairs(data)?;
    let breaks = if pairs.len() <= nclasses {
        pairs.iter().map(|pair| pair.value).collect()
    } else {
        jenks_breaks_sorted(&pairs, nclasses)?
    };
    let ten = T::from_f64(10.0).ok_or(JenksErr::ConversionError)?;
    let two = T::from_f64(2.0).ok_or(JenksErr::ConversionError)?;
    breaks
        .iter()
        .enumerate()
        .skip(1)
        .map(|(index, &high)| {
            // last value of the preceding class
            let low = pairs
                .partition_point(|pair| pair.value < high)
                .checked_sub(1)
                .map(|prev| pairs[prev].value)
                .ok_or(JenksErr::NotAscending { index })?;
            let p = ten.powf((T::one() - (high - low).log10()).floor());
            Ok((((high + low) / two) * p).floor() / p)
        })
        .collect::<Result<Vec<T>, _>>()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_breaks_floats() {
        let i = vec![
            1f64, 12., 13., 14., 15., 16., 2., 2., 3., 5., 7., 1., 2., 5., 7., 1., 5., 82., 1.,
            1.3, 1.1, 78.,
        ];
        let res = jenks_breaks(&i, 3).unwrap();
        assert_eq!(res, vec![1.0, 12.0, 78.0])
    }

    #[test]
    fn test_breaks_f32() {
        let i = vec![1f32, 2., 3., 4., 5., 6., 7., 8., 9., 10.];
        let res = jenks_breaks(&i, 3).unwrap();
        assert_eq!(res, vec![1.0, 4.0, 7.0])
    }

    #[test]
    fn test_zero_classes() {
        assert!(jenks_breaks(&[1.0f64, 2.0], 0).unwrap().is_empty());
        assert!(jenks_breaks_sorted::<f64>(&[], 0).unwrap().is_empty());
    }

    #[test]
    fn test_one_class_is_minimum() {
        let res = jenks_breaks(&[4.0f64, -2.5, 9.0, -2.5], 1).unwrap();
        assert_eq!(res, vec![-2.5]);
    }

    #[test]
    fn test_fewer_distinct_values_than_classes() {
        let res = jenks_breaks(&[3.0f64, 1.0, 3.0, 2.0, 1.0], 5).unwrap();
        assert_eq!(res, vec![1.0, 2.0, 3.0]);
        let res = jenks_breaks(&[3.0f64, 1.0, 2.0], 3).unwrap();
        assert_eq!(res, vec![1.0, 2.0, 3.0]);
        assert!(jenks_breaks::<f64>(&[], 4).unwrap().is_empty());
    }

    #[test]
    fn test_duplicates_are_weighted() {
        let res = jenks_breaks(&[5.0f64, 5., 5., 1., 2., 3.], 2).unwrap();
        assert_eq!(res, vec![1.0, 5.0]);
        // unweighted, the distinct values 1, 2, 6, 10, 11 would break at 6
        let res = jenks_breaks(&[1.0f64, 2., 6., 10., 10., 11.], 2).unwrap();
        assert_eq!(res, vec![1.0, 10.0]);
    }

    #[test]
    fn test_sorted_entry_rejects_bad_input() {
        let pairs = vec![ValueCountPair::new(2.0f64, 1), ValueCountPair::new(1.0, 1)];
        assert_eq!(
            jenks_breaks_sorted(&pairs, 2).unwrap_err(),
            JenksErr::NotAscending { index: 1 }
        );
        assert_eq!(
            jenks_breaks_sorted::<f64>(&[], 1).unwrap_err(),
            JenksErr::TooManyClasses {
                requested: 1,
                available: 0
            }
        );
    }

    #[test]
    fn test_nan_input() {
        assert_eq!(
            jenks_breaks(&[1.0f64, f64::NAN, 3.0], 2).unwrap_err(),
            JenksErr::InvalidValue { index: 1 }
        );
    }

    #[test]
    fn test_roundbreaks() {
        let i = vec![
            1f64, 12., 13., 14., 15., 16., 2., 2., 3., 5., 7., 1., 2., 5., 7., 1., 5., 82., 1.,
            1.3, 1.1, 78.,
        ];
        let expected = vec![9.0, 40.0];
        let res = roundbreaks(&i, 3).unwrap();
        assert_eq!(res, expected)
    }

    #[test]
    fn test_roundbreaks_few_distinct_values() {
        // breaks are the distinct values 1, 3, 10: midpoints 2 and 6.5, rounded to units
        let i = vec![10f64, 1., 3., 1., 3.];
        assert_eq!(roundbreaks(&i, 5).unwrap(), vec![2.0, 6.0]);
        assert_eq!(roundbreaks(&i, 3).unwrap(), vec![2.0, 6.0]);
    }

    #[test]
    fn test_roundbreaks_no_interior_breaks() {
        let i = vec![10f64, 1., 3., 1., 3.];
        assert!(roundbreaks(&i, 0).unwrap().is_empty());
        assert!(roundbreaks(&i, 1).unwrap().is_empty());
        assert!(roundbreaks::<f64>(&[], 2).unwrap().is_empty());
    }

    #[test]
    fn test_huge_values() {
        let i = vec![2e201f64, 1e200, 3e200, 1e201, 2e200];
        assert_eq!(jenks_breaks(&i, 2).unwrap(), vec![1e200, 2e201]);
    }
}
