//! Dataset-level profiling report

use crate::column_profiler::{ColumnProfiler, VariableKind, VariableProfile};
use crate::config::ProfileSettings;
use crate::dataset::Dataset;
use crate::stats;
use crate::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::time::Instant;
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisInfo {
    pub title: String,
    pub started: DateTime<Utc>,
    pub finished: DateTime<Utc>,
    pub duration_secs: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableStats {
    pub n_rows: usize,
    pub n_columns: usize,
    pub missing_cells: usize,
    pub p_missing_cells: f64,
    /// Rows identical to an earlier row
    pub duplicate_rows: usize,
    pub p_duplicate_rows: f64,
    pub memory_size: usize,
    pub kinds: BTreeMap<VariableKind, usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertKind {
    Constant,
    Unique,
    Missing,
    Zeros,
    HighCardinality,
    Skewed,
    Empty,
    Duplicates,
    HighCorrelation,
}

impl AlertKind {
    pub fn label(&self) -> &'static str {
        match self {
            AlertKind::Constant => "Constant",
            AlertKind::Unique => "Unique",
            AlertKind::Missing => "Missing",
            AlertKind::Zeros => "Zeros",
            AlertKind::HighCardinality => "High cardinality",
            AlertKind::Skewed => "Skewed",
            AlertKind::Empty => "Empty",
            AlertKind::Duplicates => "Duplicates",
            AlertKind::HighCorrelation => "High correlation",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub kind: AlertKind,
    /// `None` for dataset-wide alerts
    pub column: Option<String>,
    pub message: String,
}

/// Pearson coefficients between numeric variables
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Correlations {
    pub columns: Vec<String>,
    pub matrix: Vec<Vec<Option<f64>>>,
}

impl Correlations {
    pub fn get(&self, a: &str, b: &str) -> Option<f64> {
        let i = self.columns.iter().position(|c| c == a)?;
        let j = self.columns.iter().position(|c| c == b)?;
        self.matrix[i][j]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Samples {
    pub columns: Vec<String>,
    pub head: Vec<Vec<String>>,
    pub tail: Vec<Vec<String>>,
}

/// Profiling report of a whole dataset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileReport {
    pub analysis: AnalysisInfo,
    pub table: TableStats,
    pub variables: Vec<VariableProfile>,
    pub alerts: Vec<Alert>,
    pub correlations: Option<Correlations>,
    pub samples: Samples,
}

impl ProfileReport {
    /// Profile every column of `dataset`
    pub fn new(dataset: &Dataset, title: &str, settings: &ProfileSettings) -> Result<Self> {
        settings.validate()?;
        let started = Utc::now();
        let clock = Instant::now();
        info!(
            "Profiling {} columns over {} rows",
            dataset.n_columns(),
            dataset.n_rows()
        );

        let profiler = ColumnProfiler::new(settings);
        let variables: Vec<VariableProfile> =
            dataset.columns().iter().map(|c| profiler.profile(c)).collect();

        let table = table_stats(dataset, &variables);
        let correlations = if settings.minimal {
            None
        } else {
            correlations(dataset, &variables)
        };
        let alerts = collect_alerts(&table, &variables, correlations.as_ref(), settings);
        debug!("Raised {} alerts", alerts.len());

        let samples = Samples {
            columns: dataset.column_names().into_iter().map(str::to_string).collect(),
            head: dataset.head(settings.sample_rows),
            tail: dataset.tail(settings.sample_rows),
        };

        let analysis = AnalysisInfo {
            title: title.to_string(),
            started,
            finished: Utc::now(),
            duration_secs: clock.elapsed().as_secs_f64(),
        };
        info!("Profiling finished in {:.3}s", analysis.duration_secs);

        Ok(Self {
            analysis,
            table,
            variables,
            alerts,
            correlations,
            samples,
        })
    }

    pub fn title(&self) -> &str {
        &self.analysis.title
    }

    pub fn variable(&self, name: &str) -> Option<&VariableProfile> {
        self.variables.iter().find(|v| v.name == name)
    }

    pub fn alerts_for(&self, column: &str) -> impl Iterator<Item = &Alert> + '_ {
        let column = column.to_string();
        self.alerts
            .iter()
            .filter(move |a| a.column.as_deref() == Some(column.as_str()))
    }
}

fn table_stats(dataset: &Dataset, variables: &[VariableProfile]) -> TableStats {
    let n_rows = dataset.n_rows();
    let n_columns = dataset.n_columns();
    let cells = n_rows * n_columns;
    let missing_cells: usize = variables.iter().map(|v| v.missing).sum();

    let mut seen = HashSet::with_capacity(n_rows);
    let duplicate_rows = (0..n_rows)
        .filter(|&i| !seen.insert(dataset.row(i)))
        .count();

    let mut kinds = BTreeMap::new();
    for variable in variables {
        *kinds.entry(variable.kind).or_insert(0) += 1;
    }

    TableStats {
        n_rows,
        n_columns,
        missing_cells,
        p_missing_cells: if cells == 0 {
            0.0
        } else {
            missing_cells as f64 / cells as f64
        },
        duplicate_rows,
        p_duplicate_rows: if n_rows == 0 {
            0.0
        } else {
            duplicate_rows as f64 / n_rows as f64
        },
        memory_size: variables.iter().map(|v| v.memory_size).sum(),
        kinds,
    }
}

fn correlations(dataset: &Dataset, variables: &[VariableProfile]) -> Option<Correlations> {
    let numeric: Vec<(String, Vec<Option<f64>>)> = dataset
        .columns()
        .iter()
        .zip(variables)
        .filter(|(_, v)| v.kind == VariableKind::Numeric)
        .map(|(c, v)| (v.name.clone(), c.as_f64()))
        .collect();
    if numeric.len() < 2 {
        return None;
    }

    let matrix = numeric
        .iter()
        .map(|(_, xs)| {
            numeric
                .iter()
                .map(|(_, ys)| stats::pearson(xs, ys))
                .collect()
        })
        .collect();

    Some(Correlations {
        columns: numeric.into_iter().map(|(name, _)| name).collect(),
        matrix,
    })
}

fn collect_alerts(
    table: &TableStats,
    variables: &[VariableProfile],
    correlations: Option<&Correlations>,
    settings: &ProfileSettings,
) -> Vec<Alert> {
    let mut alerts = Vec::new();

    if table.duplicate_rows > 0 {
        alerts.push(Alert {
            kind: AlertKind::Duplicates,
            column: None,
            message: format!(
                "Dataset has {} ({:.1}%) duplicate rows",
                table.duplicate_rows,
                table.p_duplicate_rows * 100.0
            ),
        });
    }

    for v in variables {
        let mut push = |kind: AlertKind, message: String| {
            alerts.push(Alert {
                kind,
                column: Some(v.name.clone()),
                message,
            })
        };

        if v.kind == VariableKind::Unsupported {
            push(AlertKind::Empty, format!("{} has only missing values", v.name));
            continue;
        }
        if v.distinct == 1 {
            push(
                AlertKind::Constant,
                format!("{} has constant value", v.name),
            );
        }
        if v.is_unique && v.count > 1 {
            push(AlertKind::Unique, format!("{} has unique values", v.name));
        }
        if v.p_missing > settings.missing_alert_threshold {
            push(
                AlertKind::Missing,
                format!(
                    "{} has {} ({:.1}%) missing values",
                    v.name,
                    v.missing,
                    v.p_missing * 100.0
                ),
            );
        }
        if v.kind == VariableKind::Categorical && v.distinct > settings.categorical_threshold {
            push(
                AlertKind::HighCardinality,
                format!("{} has a high cardinality: {} distinct values", v.name, v.distinct),
            );
        }
        if let Some(numeric) = v.numeric() {
            if numeric.p_zeros > settings.zeros_alert_threshold {
                push(
                    AlertKind::Zeros,
                    format!(
                        "{} has {} ({:.1}%) zeros",
                        v.name,
                        numeric.zeros,
                        numeric.p_zeros * 100.0
                    ),
                );
            }
            if let Some(skew) = numeric.skewness {
                if skew.abs() > settings.skewness_alert_threshold {
                    push(
                        AlertKind::Skewed,
                        format!("{} is highly skewed (\u{03b3}1 = {:.2})", v.name, skew),
                    );
                }
            }
        }
    }

    if let Some(corr) = correlations {
        for (i, a) in corr.columns.iter().enumerate() {
            for (j, b) in corr.columns.iter().enumerate().skip(i + 1) {
                if let Some(r) = corr.matrix[i][j] {
                    if r.abs() > settings.correlation_threshold {
                        alerts.push(Alert {
                            kind: AlertKind::HighCorrelation,
                            column: Some(a.clone()),
                            message: format!("{} is highly correlated with {} (\u{03c1} = {:.2})", a, b, r),
                        });
                    }
                }
            }
        }
    }

    alerts
}
