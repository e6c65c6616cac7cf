//! Descriptive statistics over numeric samples

use serde::{Deserialize, Serialize};

/// Quantile of an ascending slice using linear interpolation between closest ranks
pub fn quantile(sorted: &[f64], q: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let q = q.clamp(0.0, 1.0);
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;
    Some(sorted[lo] + (sorted[hi] - sorted[lo]) * frac)
}

pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

/// Sample variance (n - 1 denominator)
pub fn variance(values: &[f64]) -> Option<f64> {
    let n = values.len();
    if n < 2 {
        return None;
    }
    let m = mean(values)?;
    Some(values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / (n - 1) as f64)
}

/// Adjusted Fisher-Pearson skewness; needs at least three values
pub fn skewness(values: &[f64]) -> Option<f64> {
    let n = values.len();
    if n < 3 {
        return None;
    }
    let nf = n as f64;
    let m = mean(values)?;
    let m2 = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / nf;
    if m2 == 0.0 {
        return Some(0.0);
    }
    let m3 = values.iter().map(|v| (v - m).powi(3)).sum::<f64>() / nf;
    Some((nf * (nf - 1.0)).sqrt() / (nf - 2.0) * m3 / m2.powf(1.5))
}

/// Unbiased excess kurtosis; needs at least four values
pub fn kurtosis(values: &[f64]) -> Option<f64> {
    let n = values.len();
    if n < 4 {
        return None;
    }
    let nf = n as f64;
    let m = mean(values)?;
    let s2: f64 = values.iter().map(|v| (v - m).powi(2)).sum();
    if s2 == 0.0 {
        return Some(0.0);
    }
    let s4: f64 = values.iter().map(|v| (v - m).powi(4)).sum();
    let numer = nf * (nf + 1.0) * (nf - 1.0) * s4;
    let denom = (nf - 2.0) * (nf - 3.0) * s2 * s2;
    let adj = 3.0 * (nf - 1.0).powi(2) / ((nf - 2.0) * (nf - 3.0));
    Some(numer / denom - adj)
}

/// Median absolute deviation around the median
pub fn median_absolute_deviation(sorted: &[f64]) -> Option<f64> {
    let median = quantile(sorted, 0.5)?;
    let mut deviations: Vec<f64> = sorted.iter().map(|v| (v - median).abs()).collect();
    deviations.sort_by(|a, b| a.total_cmp(b));
    quantile(&deviations, 0.5)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistogramBin {
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Histogram {
    pub bins: Vec<HistogramBin>,
}

impl Histogram {
    /// Equal-width bins over an ascending slice of finite values.
    ///
    /// The bin count follows Sturges' rule, capped at `max_bins`. The last bin
    /// is closed on the right.
    pub fn from_sorted(sorted: &[f64], max_bins: usize) -> Option<Self> {
        let (&min, &max) = (sorted.first()?, sorted.last()?);
        if max_bins == 0 {
            return None;
        }
        if min == max {
            return Some(Self {
                bins: vec![HistogramBin {
                    lower: min,
                    upper: max,
                    count: sorted.len(),
                }],
            });
        }

        let sturges = (sorted.len() as f64).log2().ceil() as usize + 1;
        let n_bins = sturges.clamp(1, max_bins);
        // Work on halved values so `max - min` stays finite across the whole f64 range
        let half_min = min / 2.0;
        let half_width = (max / 2.0 - half_min) / n_bins as f64;
        let edge = |i: usize| 2.0 * (half_min + half_width * i as f64);

        let mut counts = vec![0usize; n_bins];
        for v in sorted {
            let idx = ((v / 2.0 - half_min) / half_width) as usize;
            counts[idx.min(n_bins - 1)] += 1;
        }

        let bins = counts
            .into_iter()
            .enumerate()
            .map(|(i, count)| HistogramBin {
                lower: if i == 0 { min } else { edge(i) },
                upper: if i + 1 == n_bins { max } else { edge(i + 1) },
                count,
            })
            .collect();
        Some(Self { bins })
    }

    pub fn max_count(&self) -> usize {
        self.bins.iter().map(|b| b.count).max().unwrap_or(0)
    }
}

/// Pearson correlation over rows where both sides are present
pub fn pearson(xs: &[Option<f64>], ys: &[Option<f64>]) -> Option<f64> {
    let pairs: Vec<(f64, f64)> = xs
        .iter()
        .zip(ys)
        .filter_map(|(x, y)| match (x, y) {
            (Some(x), Some(y)) if x.is_finite() && y.is_finite() => Some((*x, *y)),
            _ => None,
        })
        .collect();
    if pairs.len() < 2 {
        return None;
    }

    let n = pairs.len() as f64;
    let mx = pairs.iter().map(|p| p.0).sum::<f64>() / n;
    let my = pairs.iter().map(|p| p.1).sum::<f64>() / n;
    let (mut sxy, mut sxx, mut syy) = (0.0, 0.0, 0.0);
    for (x, y) in &pairs {
        sxy += (x - mx) * (y - my);
        sxx += (x - mx).powi(2);
        syy += (y - my).powi(2);
    }
    if !(sxx.is_finite() && syy.is_finite() && sxy.is_finite()) || sxx == 0.0 || syy == 0.0 {
        return None;
    }
    Some((sxy / (sxx.sqrt() * syy.sqrt())).clamp(-1.0, 1.0))
}
