//! The Fisher-Jenks dynamic program.
//!
//! Row `r` of the (conceptual) DP table holds, for each `i`, the largest sum of
//! squared class means attainable by `r + 1` classes covering data indices
//! `0..=i + r`. Only two rows are live at once; the optimal predecessor of every
//! cell is kept in a [`BreakTable`] so the breaks can be recovered afterwards.
//!
//! Optimal predecessors are non-decreasing in `i`, so each row is filled by
//! divide and conquer: solve the midpoint, then split the candidate range for
//! both halves at its predecessor. That's O(m log m) per row instead of O(m²).

use tracing::trace;

use crate::{JenksErr, JenksNum, ValueCountPair};

/// Target ranges shorter than this are not worth handing to another thread
const PARALLEL_THRESHOLD: usize = 2048;

/// Running totals over `0..=i`
#[derive(Debug, Clone, Copy)]
struct Cumulative<T> {
    weighted_sum: T,
    weight: T,
}

/// Flat storage for the optimal predecessor of each `(row, index)` cell.
/// All addressing goes through [`BreakTable::offset`].
#[derive(Debug)]
struct BreakTable {
    width: usize,
    rows: usize,
    cells: Vec<usize>,
}

impl BreakTable {
    fn new(width: usize, rows: usize) -> Self {
        BreakTable {
            width,
            rows,
            cells: vec![0; width * rows],
        }
    }

    #[inline(always)]
    fn offset(&self, row: usize, index: usize) -> usize {
        debug_assert!(row < self.rows, "row {row} out of {} rows", self.rows);
        debug_assert!(index < self.width, "index {index} out of {}", self.width);
        row * self.width + index
    }

    fn get(&self, row: usize, index: usize) -> usize {
        self.cells[self.offset(row, index)]
    }

    fn row_mut(&mut self, row: usize) -> &mut [usize] {
        let start = self.offset(row, 0);
        &mut self.cells[start..start + self.width]
    }
}

/// Read-only view needed to score one row: prefix sums, the previous row, and how
/// many rows are already complete (which shifts row indices onto data indices)
struct RowScorer<'e, T> {
    cumulative: &'e [Cumulative<T>],
    previous: &'e [T],
    completed_rows: usize,
    parallel_threshold: usize,
}

impl<T: JenksNum> RowScorer<'_, T> {
    /// Sum of squared means of the class spanning `b..=e`. Index 0 always
    /// belongs to the first class, so `b` is never 0 here.
    #[inline(always)]
    fn ssm(&self, b: usize, e: usize) -> T {
        debug_assert!(b > 0 && b <= e && e < self.cumulative.len());
        let weighted_sum = self.cumulative[e].weighted_sum - self.cumulative[b - 1].weighted_sum;
        let weight = self.cumulative[e].weight - self.cumulative[b - 1].weight;
        weighted_sum * weighted_sum / weight
    }

    /// Best predecessor `p` in `bp..ep` for target `i`, with its score.
    /// Only a strictly greater score displaces the current best, so ties go to
    /// the lowest index.
    fn find_max_break_index(&self, i: usize, bp: usize, ep: usize) -> (usize, T) {
        debug_assert!(bp < ep);
        debug_assert!(bp <= i);
        debug_assert!(ep <= i + 1);
        debug_assert!(ep <= self.previous.len());
        let offset = self.completed_rows;
        let mut found = bp;
        let mut max_ssm = self.previous[bp] + self.ssm(bp + offset, i + offset);
        for p in bp + 1..ep {
            let ssm = self.previous[p] + self.ssm(p + offset, i + offset);
            if ssm > max_ssm {
                max_ssm = ssm;
                found = p;
            }
        }
        (found, max_ssm)
    }
}

#[cfg(feature = "parallel")]
fn join<A, B>(len: usize, threshold: usize, left: A, right: B)
where
    A: FnOnce() + Send,
    B: FnOnce() + Send,
{
    if len >= threshold {
        rayon::join(left, right);
    } else {
        left();
        right();
    }
}

#[cfg(not(feature = "parallel"))]
fn join<A: FnOnce(), B: FnOnce()>(_len: usize, _threshold: usize, left: A, right: B) {
    left();
    right();
}

/// Fill targets `bi..bi + scores.len()` of the current row, drawing predecessors
/// from `bp..ep`. `scores` and `breaks` are exactly the slices of the current
/// row and break row covering the target range.
fn calc_range<T: JenksNum>(
    scorer: &RowScorer<'_, T>,
    scores: &mut [T],
    breaks: &mut [usize],
    bi: usize,
    bp: usize,
    ep: usize,
) {
    if scores.is_empty() {
        return;
    }
    let ei = bi + scores.len();
    debug_assert!(bp <= bi && ep <= ei && bp < ep);
    let mi = bi + scores.len() / 2;
    let (mp, max_ssm) = scorer.find_max_break_index(mi, bp, ep.min(mi + 1));
    debug_assert!(bp <= mp && mp < ep && mp <= mi);

    let local = mi - bi;
    scores[local] = max_ssm;
    breaks[local] = mp;

    let (low_scores, high_scores) = scores.split_at_mut(local);
    let (low_breaks, high_breaks) = breaks.split_at_mut(local);
    let (high_scores, high_breaks) = (&mut high_scores[1..], &mut high_breaks[1..]);
    join(
        ei - bi,
        scorer.parallel_threshold,
        // lower half of the targets can only use the lower half of the predecessors
        || calc_range(scorer, low_scores, low_breaks, bi, bp, mi.min(mp + 1)),
        || calc_range(scorer, high_scores, high_breaks, mi + 1, mp, ep),
    );
}

fn validate<T: JenksNum>(pairs: &[ValueCountPair<T>], classes: usize) -> Result<(), JenksErr> {
    if classes == 0 {
        return Err(JenksErr::TooFewClasses);
    }
    if classes > pairs.len() {
        return Err(JenksErr::TooManyClasses {
            requested: classes,
            available: pairs.len(),
        });
    }
    for (index, pair) in pairs.iter().enumerate() {
        if !pair.value.is_finite() {
            return Err(JenksErr::InvalidValue { index });
        }
        if pair.count == 0 {
            return Err(JenksErr::ZeroCount { index });
        }
        if index > 0 && pair.value <= pairs[index - 1].value {
            return Err(JenksErr::NotAscending { index });
        }
    }
    Ok(())
}

/// Power of two bringing the largest magnitude into `[0.5, 1)`. Multiplying by it
/// is exact, so every score is scaled without changing any comparison, and each
/// range sum `|Σ w·v|` stays below `Σ w`.
fn unit_scale<T: JenksNum>(pairs: &[ValueCountPair<T>]) -> T {
    let max_abs = pairs
        .iter()
        .fold(T::zero(), |acc, pair| acc.max(pair.value.abs()));
    let two = T::one() + T::one();
    let half = T::one() / two;
    let mut scaled = max_abs;
    let mut scale = T::one();
    while scaled >= T::one() {
        scaled = scaled * half;
        scale = scale * half;
    }
    while scaled > T::zero() && scaled < half && (scale * two).is_finite() {
        scaled = scaled * two;
        scale = scale * two;
    }
    scale
}

/// One classification run over a borrowed, validated pair sequence
#[derive(Debug)]
pub(crate) struct JenksFisher<'a, T> {
    pairs: &'a [ValueCountPair<T>],
    classes: usize,
    buf_size: usize,
    cumulative: Vec<Cumulative<T>>,
    previous: Vec<T>,
    current: Vec<T>,
    break_table: BreakTable,
    parallel_threshold: usize,
}

impl<'a, T: JenksNum> JenksFisher<'a, T> {
    pub(crate) fn new(pairs: &'a [ValueCountPair<T>], classes: usize) -> Result<Self, JenksErr> {
        validate(pairs, classes)?;
        let buf_size = pairs.len() - (classes - 1);
        let scale = unit_scale(pairs);
        let mut cumulative = Vec::with_capacity(pairs.len());
        let mut previous = vec![T::zero(); buf_size];
        let mut weighted_sum = T::zero();
        let mut weight = T::zero();
        for (i, pair) in pairs.iter().enumerate() {
            let w = T::from_usize(pair.count).ok_or(JenksErr::ConversionError)?;
            weight = weight + w;
            // bounds every squared range sum in the DP
            if !(weight * weight).is_finite() {
                return Err(JenksErr::Overflow { index: i });
            }
            weighted_sum = weighted_sum + w * (pair.value * scale);
            cumulative.push(Cumulative {
                weighted_sum,
                weight,
            });
            // a single class ending at i. The last (k - 1) values can't end it
            if i < buf_size {
                previous[i] = weighted_sum * weighted_sum / weight;
            }
        }
        Ok(JenksFisher {
            pairs,
            classes,
            buf_size,
            cumulative,
            previous,
            current: vec![T::zero(); buf_size],
            break_table: BreakTable::new(buf_size, classes.saturating_sub(2)),
            parallel_threshold: PARALLEL_THRESHOLD,
        })
    }

    fn scorer(&self, completed_rows: usize) -> RowScorer<'_, T> {
        RowScorer {
            cumulative: &self.cumulative,
            previous: &self.previous,
            completed_rows,
            parallel_threshold: self.parallel_threshold,
        }
    }

    /// Compute every row except the last, which is only needed at one index
    fn calc_all(&mut self) {
        for completed_rows in 1..self.classes.saturating_sub(1) {
            let scorer = RowScorer {
                cumulative: &self.cumulative,
                previous: &self.previous,
                completed_rows,
                parallel_threshold: self.parallel_threshold,
            };
            calc_range(
                &scorer,
                &mut self.current,
                self.break_table.row_mut(completed_rows - 1),
                0,
                0,
                self.buf_size,
            );
            std::mem::swap(&mut self.previous, &mut self.current);
            trace!(row = completed_rows, width = self.buf_size, "completed DP row");
        }
    }

    /// Run the DP and read out the breaks: the dataset minimum, followed by the
    /// lower bound of every further class
    pub(crate) fn breaks(mut self) -> Vec<T> {
        let classes = self.classes;
        let mut breaks = vec![self.pairs[0].value; classes];
        if classes < 2 {
            return breaks;
        }
        self.calc_all();
        let last_row = self.scorer(classes - 1);
        let (mut last_break, _) = last_row.find_max_break_index(self.buf_size - 1, 0, self.buf_size);
        for class in (1..classes).rev() {
            debug_assert!(last_break < self.buf_size);
            breaks[class] = self.pairs[last_break + class].value;
            if class > 1 {
                last_break = self.break_table.get(class - 2, last_break);
            }
        }
        breaks
    }
}
