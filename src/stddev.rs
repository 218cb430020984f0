use crate::{JenksErr, JenksNum};

/// Classify by distance from the mean, in whole standard deviations.
///
/// Returns `[-∞, μ-3σ, μ-2σ, μ-σ, μ+σ, μ+2σ, μ+3σ, +∞]`, using the population
/// standard deviation. Values between μ-σ and μ+σ fall into the central class.
///
/// # Example
///
/// ```
/// use jenks::std_dev_breaks;
///
/// let breaks = std_dev_breaks(&[2.0f64, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]).unwrap();
/// assert_eq!(breaks, [f64::NEG_INFINITY, -1.0, 1.0, 3.0, 7.0, 9.0, 11.0, f64::INFINITY]);
/// ```
pub fn std_dev_breaks<T: JenksNum>(data: &[T]) -> Result<[T; 8], JenksErr> {
    if data.is_empty() {
        return Err(JenksErr::EmptyInput);
    }
    if let Some(index) = data.iter().position(|v| !v.is_finite()) {
        return Err(JenksErr::InvalidValue { index });
    }
    let n = T::from_usize(data.len()).ok_or(JenksErr::ConversionError)?;
    let mean = data.iter().fold(T::zero(), |acc, &x| acc + x) / n;
    let variance = data
        .iter()
        .fold(T::zero(), |acc, &x| acc + (x - mean) * (x - mean))
        / n;
    let sd = variance.sqrt();
    let two = T::from_f64(2.0).ok_or(JenksErr::ConversionError)?;
    let three = T::from_f64(3.0).ok_or(JenksErr::ConversionError)?;
    Ok([
        T::neg_infinity(),
        mean - three * sd,
        mean - two * sd,
        mean - sd,
        mean + sd,
        mean + two * sd,
        mean + three * sd,
        T::infinity(),
    ])
}
