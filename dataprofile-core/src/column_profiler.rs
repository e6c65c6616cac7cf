//! Per-column profiling: variable kind detection and summary statistics

use crate::config::ProfileSettings;
use crate::dataset::{Column, DataType};
use crate::stats::{self, Histogram};
use chrono::{NaiveDate, NaiveDateTime};
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::hash::Hash;
use tracing::debug;

const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Semantic kind of a variable, as shown in the report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VariableKind {
    Numeric,
    Categorical,
    Boolean,
    DateTime,
    Text,
    Unsupported,
}

impl VariableKind {
    pub fn label(&self) -> &'static str {
        match self {
            VariableKind::Numeric => "Numeric",
            VariableKind::Categorical => "Categorical",
            VariableKind::Boolean => "Boolean",
            VariableKind::DateTime => "DateTime",
            VariableKind::Text => "Text",
            VariableKind::Unsupported => "Unsupported",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrequentValue {
    pub value: String,
    pub count: usize,
    /// Share of non-missing cells
    pub ratio: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NumericSummary {
    pub mean: Option<f64>,
    pub std: Option<f64>,
    pub variance: Option<f64>,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub range: Option<f64>,
    pub sum: f64,
    pub p5: Option<f64>,
    pub p25: Option<f64>,
    pub median: Option<f64>,
    pub p75: Option<f64>,
    pub p95: Option<f64>,
    pub iqr: Option<f64>,
    pub mad: Option<f64>,
    pub cv: Option<f64>,
    pub skewness: Option<f64>,
    pub kurtosis: Option<f64>,
    pub zeros: usize,
    pub p_zeros: f64,
    pub negatives: usize,
    pub p_negatives: f64,
    pub infinite: usize,
    pub monotonic_increasing: bool,
    pub monotonic_decreasing: bool,
    pub histogram: Option<Histogram>,
    pub frequent: Vec<FrequentValue>,
}

/// Summary shared by categorical and free-text variables
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StringSummary {
    pub min_length: usize,
    pub max_length: usize,
    pub mean_length: f64,
    pub total_characters: usize,
    pub frequent: Vec<FrequentValue>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BooleanSummary {
    pub true_count: usize,
    pub false_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DateTimeSummary {
    pub min: String,
    pub max: String,
    pub range_days: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum VariableDetails {
    Numeric(NumericSummary),
    Categorical(StringSummary),
    Text(StringSummary),
    Boolean(BooleanSummary),
    DateTime(DateTimeSummary),
    Unsupported,
}

/// Profile of a single column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariableProfile {
    pub name: String,
    pub kind: VariableKind,
    pub dtype: DataType,
    /// Rows in the dataset
    pub n: usize,
    /// Non-missing cells
    pub count: usize,
    pub missing: usize,
    pub p_missing: f64,
    pub distinct: usize,
    pub p_distinct: f64,
    pub is_unique: bool,
    pub memory_size: usize,
    pub details: VariableDetails,
}

impl VariableProfile {
    pub fn numeric(&self) -> Option<&NumericSummary> {
        match &self.details {
            VariableDetails::Numeric(summary) => Some(summary),
            _ => None,
        }
    }

    pub fn strings(&self) -> Option<&StringSummary> {
        match &self.details {
            VariableDetails::Categorical(summary) | VariableDetails::Text(summary) => Some(summary),
            _ => None,
        }
    }
}

pub struct ColumnProfiler<'a> {
    settings: &'a ProfileSettings,
}

impl<'a> ColumnProfiler<'a> {
    pub fn new(settings: &'a ProfileSettings) -> Self {
        Self { settings }
    }

    pub fn profile(&self, column: &Column) -> VariableProfile {
        let n = column.len();
        let missing = column.missing_count();
        let count = n - missing;

        let (kind, distinct, unique, details) = if count == 0 {
            (VariableKind::Unsupported, 0, false, VariableDetails::Unsupported)
        } else {
            match column.dtype() {
                DataType::Integer | DataType::Float => self.profile_numeric(column, n),
                DataType::Boolean => self.profile_boolean(column),
                DataType::Text => self.profile_text(column, count),
            }
        };

        debug!(
            "Profiled '{}' as {} ({} distinct, {} missing)",
            column.name(),
            kind.label(),
            distinct,
            missing
        );

        VariableProfile {
            name: column.name().to_string(),
            kind,
            dtype: column.dtype(),
            n,
            count,
            missing,
            p_missing: ratio(missing, n),
            distinct,
            p_distinct: ratio(distinct, count),
            is_unique: unique,
            memory_size: column.memory_size(),
            details,
        }
    }

    fn profile_numeric(
        &self,
        column: &Column,
        n: usize,
    ) -> (VariableKind, usize, bool, VariableDetails) {
        let values: Vec<f64> = column.as_f64().into_iter().flatten().collect();
        let counts = value_counts(values.iter().map(|v| OrderedFloat(*v)));
        let distinct = counts.len();
        let unique = counts.values().all(|c| *c == 1);

        let mut finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
        let monotonic_increasing = finite.windows(2).all(|w| w[0] <= w[1]);
        let monotonic_decreasing = finite.windows(2).all(|w| w[0] >= w[1]);
        finite.sort_by(|a, b| a.total_cmp(b));

        let mean = stats::mean(&finite);
        let variance = stats::variance(&finite);
        let std = variance.map(f64::sqrt);
        let min = finite.first().copied();
        let max = finite.last().copied();
        let p25 = stats::quantile(&finite, 0.25);
        let p75 = stats::quantile(&finite, 0.75);
        let zeros = values.iter().filter(|v| **v == 0.0).count();
        let negatives = values.iter().filter(|v| **v < 0.0).count();

        let (histogram, frequent) = if self.settings.minimal {
            (None, Vec::new())
        } else {
            let frequent = top_values(&counts, values.len(), self.settings.n_frequent, |v| {
                v.0.to_string()
            });
            (
                Histogram::from_sorted(&finite, self.settings.histogram_max_bins),
                frequent,
            )
        };

        let summary = NumericSummary {
            mean,
            std,
            variance,
            min,
            max,
            range: min.zip(max).map(|(lo, hi)| hi - lo),
            sum: finite.iter().sum(),
            p5: stats::quantile(&finite, 0.05),
            p25,
            median: stats::quantile(&finite, 0.5),
            p75,
            p95: stats::quantile(&finite, 0.95),
            iqr: p25.zip(p75).map(|(lo, hi)| hi - lo),
            mad: stats::median_absolute_deviation(&finite),
            cv: match (std, mean) {
                (Some(s), Some(m)) if m != 0.0 => Some(s / m),
                _ => None,
            },
            skewness: stats::skewness(&finite),
            kurtosis: stats::kurtosis(&finite),
            zeros,
            p_zeros: ratio(zeros, n),
            negatives,
            p_negatives: ratio(negatives, n),
            infinite: values.iter().filter(|v| v.is_infinite()).count(),
            monotonic_increasing,
            monotonic_decreasing,
            histogram,
            frequent,
        };

        (
            VariableKind::Numeric,
            distinct,
            unique,
            VariableDetails::Numeric(summary),
        )
    }

    fn profile_boolean(&self, column: &Column) -> (VariableKind, usize, bool, VariableDetails) {
        let values: Vec<bool> = column.as_bool().into_iter().flatten().collect();
        let true_count = values.iter().filter(|v| **v).count();
        let false_count = values.len() - true_count;
        let distinct = usize::from(true_count > 0) + usize::from(false_count > 0);
        let unique = values.len() == distinct;

        (
            VariableKind::Boolean,
            distinct,
            unique,
            VariableDetails::Boolean(BooleanSummary {
                true_count,
                false_count,
            }),
        )
    }

    fn profile_text(
        &self,
        column: &Column,
        count: usize,
    ) -> (VariableKind, usize, bool, VariableDetails) {
        let counts = value_counts(column.present());
        let distinct = counts.len();
        let unique = counts.values().all(|c| *c == 1);

        if let Some(summary) = datetime_summary(column) {
            return (
                VariableKind::DateTime,
                distinct,
                unique,
                VariableDetails::DateTime(summary),
            );
        }

        let lengths: Vec<usize> = column.present().map(|c| c.chars().count()).collect();
        let total_characters: usize = lengths.iter().sum();
        let frequent = if self.settings.minimal {
            Vec::new()
        } else {
            top_values(&counts, count, self.settings.n_frequent, |v| v.to_string())
        };
        let summary = StringSummary {
            min_length: lengths.iter().copied().min().unwrap_or(0),
            max_length: lengths.iter().copied().max().unwrap_or(0),
            mean_length: ratio(total_characters, lengths.len()),
            total_characters,
            frequent,
        };

        let categorical = distinct <= self.settings.categorical_threshold
            || (distinct as f64) < 0.5 * count as f64;
        if categorical {
            (
                VariableKind::Categorical,
                distinct,
                unique,
                VariableDetails::Categorical(summary),
            )
        } else {
            (
                VariableKind::Text,
                distinct,
                unique,
                VariableDetails::Text(summary),
            )
        }
    }
}

fn ratio(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64
    }
}

fn value_counts<K: Hash + Eq>(values: impl Iterator<Item = K>) -> HashMap<K, usize> {
    let mut counts = HashMap::new();
    for value in values {
        *counts.entry(value).or_insert(0) += 1;
    }
    counts
}

/// Most frequent values, ties broken by the rendered value
fn top_values<K>(
    counts: &HashMap<K, usize>,
    total: usize,
    limit: usize,
    render: impl Fn(&K) -> String,
) -> Vec<FrequentValue> {
    let mut entries: Vec<FrequentValue> = counts
        .iter()
        .map(|(k, count)| FrequentValue {
            value: render(k),
            count: *count,
            ratio: ratio(*count, total),
        })
        .collect();
    entries.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.value.cmp(&b.value)));
    entries.truncate(limit);
    entries
}

fn parse_datetime(cell: &str) -> Option<NaiveDateTime> {
    let cell = cell.trim();
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(cell, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(cell, DATE_FORMAT)
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

/// `Some` only when every present cell parses as a date or timestamp
fn datetime_summary(column: &Column) -> Option<DateTimeSummary> {
    let parsed: Option<Vec<NaiveDateTime>> = column.present().map(parse_datetime).collect();
    let parsed = parsed?;
    let min = parsed.iter().min()?;
    let max = parsed.iter().max()?;
    Some(DateTimeSummary {
        min: min.to_string(),
        max: max.to_string(),
        range_days: (*max - *min).num_seconds() as f64 / 86_400.0,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn column(name: &str, cells: &[&str]) -> Column {
        Column::new(name, cells.iter().map(|c| c.to_string()).collect())
    }

    #[test]
    fn test_numeric_profile() {
        let settings = ProfileSettings::default();
        let profiler = ColumnProfiler::new(&settings);
        let profile = profiler.profile(&column("year", &["1899", "1924", "NA", "0", "1924"]));

        assert_eq!(profile.kind, VariableKind::Numeric);
        assert_eq!(profile.dtype, DataType::Integer);
        assert_eq!(profile.count, 4);
        assert_eq!(profile.missing, 1);
        assert!((profile.p_missing - 0.2).abs() < 1e-12);
        assert_eq!(profile.distinct, 3);
        assert!(!profile.is_unique);

        let numeric = profile.numeric().unwrap();
        assert_eq!(numeric.min, Some(0.0));
        assert_eq!(numeric.max, Some(1924.0));
        assert_eq!(numeric.zeros, 1);
        assert_eq!(numeric.frequent[0].value, "1924");
        assert_eq!(numeric.frequent[0].count, 2);
        assert!(!numeric.monotonic_increasing);
        assert!(numeric.histogram.is_some());
    }

    #[test]
    fn test_categorical_and_text() {
        let settings = ProfileSettings {
            categorical_threshold: 2,
            ..ProfileSettings::default()
        };
        let profiler = ColumnProfiler::new(&settings);

        let profile = profiler.profile(&column("genre", &["drama", "comedy", "drama", "drama"]));
        assert_eq!(profile.kind, VariableKind::Categorical);
        let strings = profile.strings().unwrap();
        assert_eq!(strings.frequent[0].value, "drama");
        assert!((strings.frequent[0].ratio - 0.75).abs() < 1e-12);
        assert_eq!(strings.min_length, 5);
        assert_eq!(strings.max_length, 6);

        let profile = profiler.profile(&column("name", &["Fred", "Lauren", "Sophia", "Audrey"]));
        assert_eq!(profile.kind, VariableKind::Text);
        assert!(profile.is_unique);
        assert_eq!(profile.strings().unwrap().total_characters, 22);
    }

    #[test]
    fn test_boolean_and_unsupported() {
        let settings = ProfileSettings::default();
        let profiler = ColumnProfiler::new(&settings);

        let profile = profiler.profile(&column("adult", &["True", "False", "true", ""]));
        assert_eq!(profile.kind, VariableKind::Boolean);
        assert_eq!(
            profile.details,
            VariableDetails::Boolean(BooleanSummary {
                true_count: 2,
                false_count: 1
            })
        );

        let profile = profiler.profile(&column("blank", &["", "NA"]));
        assert_eq!(profile.kind, VariableKind::Unsupported);
        assert_eq!(profile.missing, 2);
        assert_eq!(profile.p_distinct, 0.0);
    }

    #[test]
    fn test_datetime_detection() {
        let settings = ProfileSettings::default();
        let profiler = ColumnProfiler::new(&settings);
        let profile = profiler.profile(&column(
            "released",
            &["2020-01-01", "2020-01-11", "2020-01-06 12:00:00"],
        ));
        assert_eq!(profile.kind, VariableKind::DateTime);
        match profile.details {
            VariableDetails::DateTime(summary) => {
                assert_eq!(summary.min, "2020-01-01 00:00:00");
                assert!((summary.range_days - 10.0).abs() < 1e-12);
            }
            other => panic!("unexpected details: {:?}", other),
        }
    }

    #[test]
    fn test_minimal_skips_frequency_tables() {
        let settings = ProfileSettings::minimal();
        let profiler = ColumnProfiler::new(&settings);
        let profile = profiler.profile(&column("n", &["1", "2", "2"]));
        let numeric = profile.numeric().unwrap();
        assert!(numeric.frequent.is_empty());
        assert!(numeric.histogram.is_none());
        assert_eq!(numeric.median, Some(2.0));
    }
}
