use jenks::{jenks_breaks, jenks_breaks_sorted, value_count_pairs, ValueCountPair};
use proptest::prelude::*;

/// Sum of squared class means when classes start at the given pair indices
fn total_ssm(pairs: &[ValueCountPair<f64>], starts: &[usize]) -> f64 {
    let mut bounds = starts.to_vec();
    bounds.push(pairs.len());
    bounds
        .windows(2)
        .map(|w| {
            let class = &pairs[w[0]..w[1]];
            let wv: f64 = class.iter().map(|p| p.value * p.count as f64).sum();
            let weight: f64 = class.iter().map(|p| p.count as f64).sum();
            wv * wv / weight
        })
        .sum()
}

/// Every way of choosing `k - 1` cut points among `1..m`
fn combinations(m: usize, k: usize) -> Vec<Vec<usize>> {
    fn extend(start: usize, m: usize, left: usize, acc: &mut Vec<usize>, out: &mut Vec<Vec<usize>>) {
        if left == 0 {
            out.push(acc.clone());
            return;
        }
        for cut in start..m {
            acc.push(cut);
            extend(cut + 1, m, left - 1, acc, out);
            acc.pop();
        }
    }
    let mut out = vec![];
    extend(1, m, k - 1, &mut vec![], &mut out);
    out
}

fn brute_force_ssm(pairs: &[ValueCountPair<f64>], k: usize) -> f64 {
    combinations(pairs.len(), k)
        .into_iter()
        .map(|cuts| {
            let mut starts = vec![0];
            starts.extend(cuts);
            total_ssm(pairs, &starts)
        })
        .fold(f64::NEG_INFINITY, f64::max)
}

fn start_indices(pairs: &[ValueCountPair<f64>], breaks: &[f64]) -> Vec<usize> {
    breaks
        .iter()
        .map(|b| pairs.iter().position(|p| p.value == *b).unwrap())
        .collect()
}

fn small_integers() -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec((-25i32..25).prop_map(f64::from), 0..40)
}

#[test]
fn test_one_to_ten_matches_brute_force() {
    let values: Vec<f64> = (1..=10).map(f64::from).collect();
    let pairs = value_count_pairs(&values).unwrap();
    let breaks = jenks_breaks(&values, 3).unwrap();
    assert_eq!(breaks, vec![1.0, 4.0, 7.0]);
    let ssm = total_ssm(&pairs, &start_indices(&pairs, &breaks));
    assert_eq!(ssm, brute_force_ssm(&pairs, 3));
}

#[test]
fn test_large_input_is_ascending() {
    let values: Vec<f64> = (0..5_000).map(|i| ((i * 7919) % 1013) as f64 * 0.5).collect();
    let breaks = jenks_breaks(&values, 9).unwrap();
    assert_eq!(breaks.len(), 9);
    assert_eq!(breaks[0], 0.0);
    assert!(breaks.windows(2).all(|w| w[0] < w[1]));
}

proptest! {
    #[test]
    fn prop_first_break_is_minimum(data in small_integers(), k in 1usize..8) {
        let breaks = jenks_breaks(&data, k).unwrap();
        match data.iter().cloned().reduce(f64::min) {
            Some(min) => prop_assert_eq!(breaks[0], min),
            None => prop_assert!(breaks.is_empty()),
        }
    }

    #[test]
    fn prop_breaks_ascend(data in prop::collection::vec(-1e6f64..1e6, 1..60), k in 1usize..10) {
        let breaks = jenks_breaks(&data, k).unwrap();
        prop_assert!(breaks.len() <= k);
        prop_assert!(breaks.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn prop_deterministic(data in small_integers(), k in 0usize..8) {
        prop_assert_eq!(jenks_breaks(&data, k).unwrap(), jenks_breaks(&data, k).unwrap());
    }

    #[test]
    fn prop_few_distinct_values_pass_through(data in small_integers(), extra in 0usize..3) {
        let pairs = value_count_pairs(&data).unwrap();
        let k = pairs.len() + extra;
        let distinct: Vec<f64> = pairs.iter().map(|p| p.value).collect();
        if k > 0 {
            prop_assert_eq!(jenks_breaks(&data, k).unwrap(), distinct);
        }
    }

    #[test]
    fn prop_sorted_entry_agrees(data in small_integers(), k in 1usize..8) {
        let pairs = value_count_pairs(&data).unwrap();
        if pairs.len() > k {
            prop_assert_eq!(jenks_breaks(&data, k).unwrap(), jenks_breaks_sorted(&pairs, k).unwrap());
        }
    }

    #[test]
    fn prop_optimal_against_brute_force(
        data in prop::collection::vec((0i32..40).prop_map(f64::from), 1..18),
        k in 2usize..6,
    ) {
        let pairs = value_count_pairs(&data).unwrap();
        prop_assume!(pairs.len() > k && pairs.len() <= 12);
        let breaks = jenks_breaks(&data, k).unwrap();
        prop_assert_eq!(breaks.len(), k);
        let found = total_ssm(&pairs, &start_indices(&pairs, &breaks));
        let best = brute_force_ssm(&pairs, k);
        prop_assert!((found - best).abs() <= 1e-9 * best.abs().max(1.0), "{} vs {}", found, best);
    }
}
