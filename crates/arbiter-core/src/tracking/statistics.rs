//! Pure statistics over confidence series

use std::collections::BTreeMap;

use super::types::{ConfidenceRange, ConfidenceTrend, FactorAnalysis, FactorContribution};

/// Relative change below which a series is `stable`
pub const STABLE_CHANGE: f64 = 0.05;
/// Relative change above which a movement is `strongly_*`
pub const STRONG_CHANGE: f64 = 0.15;

const TOP_FACTORS: usize = 3;
const WEAK_FACTORS: usize = 2;

/// Trend from the first and last value of a series.
///
/// The relative change is `|last - first| / first`. A series starting at
/// zero counts as strongly moving unless it stays at zero.
pub fn trend(values: &[f64]) -> ConfidenceTrend {
    let (first, last) = match (values.first(), values.last()) {
        (Some(first), Some(last)) if values.len() >= 2 => (*first, *last),
        _ => return ConfidenceTrend::InsufficientData,
    };

    let delta = last - first;
    let percent_change = if first.abs() < f64::EPSILON {
        if delta.abs() < f64::EPSILON {
            0.0
        } else {
            f64::INFINITY
        }
    } else {
        delta.abs() / first.abs()
    };

    if percent_change < STABLE_CHANGE {
        ConfidenceTrend::Stable
    } else if delta > 0.0 {
        if percent_change > STRONG_CHANGE {
            ConfidenceTrend::StronglyImproving
        } else {
            ConfidenceTrend::Improving
        }
    } else if percent_change > STRONG_CHANGE {
        ConfidenceTrend::StronglyDeclining
    } else {
        ConfidenceTrend::Declining
    }
}

/// Population standard deviation of consecutive absolute deltas.
///
/// Zero for fewer than two values.
pub fn volatility(values: &[f64]) -> f64 {
    let deltas: Vec<f64> = values.windows(2).map(|w| (w[1] - w[0]).abs()).collect();
    population_std_dev(&deltas)
}

pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

pub fn population_std_dev(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let m = mean(values);
    let variance = values.iter().map(|v| (v - m) * (v - m)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}

pub fn range(values: &[f64]) -> Option<ConfidenceRange> {
    let first = *values.first()?;
    let (min, max) = values
        .iter()
        .fold((first, first), |(lo, hi), v| (lo.min(*v), hi.max(*v)));
    Some(ConfidenceRange { min, max })
}

/// Average each named factor over the maps it appears in, then rank.
pub fn rank_factors<'a>(factor_maps: impl IntoIterator<Item = &'a BTreeMap<String, f64>>) -> FactorAnalysis {
    let mut totals: BTreeMap<&str, (f64, usize)> = BTreeMap::new();
    for factors in factor_maps {
        for (name, value) in factors {
            let slot = totals.entry(name.as_str()).or_insert((0.0, 0));
            slot.0 += value;
            slot.1 += 1;
        }
    }

    let mut averages: Vec<FactorContribution> = totals
        .into_iter()
        .map(|(factor, (sum, count))| FactorContribution {
            factor: factor.to_string(),
            average: sum / count as f64,
        })
        .collect();
    averages.sort_by(|a, b| {
        b.average
            .partial_cmp(&a.average)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let top_factors = averages.iter().take(TOP_FACTORS).cloned().collect();
    let weak_factors = averages.iter().rev().take(WEAK_FACTORS).cloned().collect();

    FactorAnalysis {
        top_factors,
        weak_factors,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trend_labels() {
        assert_eq!(trend(&[0.70]), ConfidenceTrend::InsufficientData);
        assert_eq!(trend(&[]), ConfidenceTrend::InsufficientData);
        assert_eq!(trend(&[0.70, 0.71]), ConfidenceTrend::Stable);
        assert_eq!(trend(&[0.50, 0.70]), ConfidenceTrend::StronglyImproving);
        assert_eq!(trend(&[0.50, 0.55]), ConfidenceTrend::Improving);
        assert_eq!(trend(&[0.50, 0.45]), ConfidenceTrend::Declining);
        assert_eq!(trend(&[0.80, 0.40]), ConfidenceTrend::StronglyDeclining);
    }

    #[test]
    fn test_trend_uses_endpoints_only() {
        assert_eq!(trend(&[0.6, 0.1, 0.9, 0.61]), ConfidenceTrend::Stable);
    }

    #[test]
    fn test_trend_from_zero() {
        assert_eq!(trend(&[0.0, 0.0]), ConfidenceTrend::Stable);
        assert_eq!(trend(&[0.0, 0.2]), ConfidenceTrend::StronglyImproving);
    }

    #[test]
    fn test_volatility_zero_for_constant_series() {
        assert_eq!(volatility(&[0.6; 10]), 0.0);
        assert_eq!(volatility(&[0.6]), 0.0);
    }

    #[test]
    fn test_volatility_of_alternating_jumps() {
        // Deltas: 0.4, 0.4, 0.0 -> mean 0.2667, population std ~0.1886
        let v = volatility(&[0.2, 0.6, 0.2, 0.2]);
        assert!((v - 0.188_561_808).abs() < 1e-6, "got {v}");

        // Equal-sized jumps have no spread
        assert!(volatility(&[0.2, 0.6, 0.2, 0.6]) < 1e-12);
    }

    #[test]
    fn test_mean_and_range() {
        assert_eq!(mean(&[]), 0.0);
        assert!((mean(&[0.2, 0.4, 0.6]) - 0.4).abs() < 1e-12);
        let r = range(&[0.5, 0.1, 0.9]).unwrap();
        assert_eq!((r.min, r.max), (0.1, 0.9));
        assert!(range(&[]).is_none());
    }

    #[test]
    fn test_rank_factors() {
        let a = BTreeMap::from([
            ("alpha".to_string(), 0.9),
            ("beta".to_string(), 0.2),
            ("gamma".to_string(), 0.5),
            ("delta".to_string(), 0.4),
        ]);
        let b = BTreeMap::from([("alpha".to_string(), 0.7), ("beta".to_string(), 0.4)]);

        let analysis = rank_factors([&a, &b]);
        let top: Vec<_> = analysis.top_factors.iter().map(|f| f.factor.as_str()).collect();
        let weak: Vec<_> = analysis.weak_factors.iter().map(|f| f.factor.as_str()).collect();

        assert_eq!(top, vec!["alpha", "gamma", "delta"]);
        assert_eq!(weak, vec!["beta", "delta"]);
        assert!((analysis.top_factors[0].average - 0.8).abs() < 1e-12);
    }
}
