use crate::{JenksErr, JenksNum};

/// Index of the class `value` falls into, where `breaks` holds the ascending
/// lower bound of each class (as returned by [`jenks_breaks`](crate::jenks_breaks)).
///
/// Returns `None` for values below the first break, for NaN, or when `breaks`
/// is empty.
///
/// ```
/// use jenks::class_index;
///
/// let breaks = [1.0, 4.0, 7.0];
/// assert_eq!(class_index(&breaks, 0.5), None);
/// assert_eq!(class_index(&breaks, 4.0), Some(1));
/// assert_eq!(class_index(&breaks, 100.0), Some(2));
/// ```
pub fn class_index<T: JenksNum>(breaks: &[T], value: T) -> Option<usize> {
    if value.is_nan() {
        return None;
    }
    breaks.partition_point(|&b| b <= value).checked_sub(1)
}

/// Goodness of variance fit: `1 - SDCM / SDAM`, where SDAM is the squared
/// deviation of every value from the array mean and SDCM the squared deviation
/// of every value from its class mean. 1 is a perfect fit.
///
/// Values below the first break are counted in the first class.
pub fn goodness_of_variance_fit<T: JenksNum>(data: &[T], breaks: &[T]) -> Result<T, JenksErr> {
    if data.is_empty() {
        return Err(JenksErr::EmptyInput);
    }
    if breaks.is_empty() {
        return Err(JenksErr::TooFewClasses);
    }
    if let Some(index) = data.iter().position(|v| !v.is_finite()) {
        return Err(JenksErr::InvalidValue { index });
    }
    let n = T::from_usize(data.len()).ok_or(JenksErr::ConversionError)?;
    let mean = data.iter().fold(T::zero(), |acc, &x| acc + x) / n;
    let sdam = data
        .iter()
        .fold(T::zero(), |acc, &x| acc + (x - mean) * (x - mean));
    if sdam == T::zero() {
        return Ok(T::one());
    }

    let class_of = |x: T| class_index(breaks, x).unwrap_or(0);
    let mut sums = vec![T::zero(); breaks.len()];
    let mut counts = vec![0usize; breaks.len()];
    for &x in data {
        let class = class_of(x);
        sums[class] = sums[class] + x;
        counts[class] += 1;
    }
    let means = sums
        .iter()
        .zip(&counts)
        .map(|(&sum, &count)| {
            if count == 0 {
                Ok(T::zero())
            } else {
                Ok(sum / T::from_usize(count).ok_or(JenksErr::ConversionError)?)
            }
        })
        .collect::<Result<Vec<T>, JenksErr>>()?;
    let sdcm = data.iter().fold(T::zero(), |acc, &x| {
        let dev = x - means[class_of(x)];
        acc + dev * dev
    });
    Ok(T::one() - sdcm / sdam)
}
