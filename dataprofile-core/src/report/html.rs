//! Self-contained HTML rendering of a profile report

use crate::column_profiler::{
    FrequentValue, NumericSummary, StringSummary, VariableDetails, VariableProfile,
};
use crate::profile::{Correlations, ProfileReport, Samples};
use crate::stats::Histogram;
use crate::Result;
use std::borrow::Cow;
use std::fmt::Write;

const STYLE: &str = r#"
body { font-family: -apple-system, "Segoe UI", Helvetica, Arial, sans-serif; margin: 0; color: #222; background: #fafafa; }
header { background: #2c3e50; color: #fff; padding: 1.2em 2em; }
header h1 { margin: 0; font-size: 1.6em; }
nav { background: #34495e; padding: 0.5em 2em; }
nav a { color: #ecf0f1; margin-right: 1.5em; text-decoration: none; }
main { padding: 1em 2em; }
section { margin-bottom: 2.5em; }
h2 { border-bottom: 2px solid #2c3e50; padding-bottom: 0.2em; }
table { border-collapse: collapse; margin: 0.5em 0; font-size: 0.9em; }
th, td { border: 1px solid #ddd; padding: 0.25em 0.6em; text-align: left; }
th { background: #ecf0f1; }
td.num { text-align: right; font-variant-numeric: tabular-nums; }
.grid { display: flex; flex-wrap: wrap; gap: 2em; }
.variable { background: #fff; border: 1px solid #ddd; border-radius: 4px; padding: 1em; margin-bottom: 1.5em; }
.variable h3 { margin-top: 0; }
.kind { display: inline-block; background: #2980b9; color: #fff; border-radius: 3px; padding: 0 0.4em; font-size: 0.8em; margin-left: 0.5em; }
.alert { display: inline-block; background: #e67e22; color: #fff; border-radius: 3px; padding: 0 0.4em; font-size: 0.8em; margin-right: 0.4em; }
ul.alerts li { margin: 0.3em 0; }
svg .bar { fill: #2980b9; }
footer { color: #888; font-size: 0.8em; padding: 1em 2em; }
"#;

const HIST_WIDTH: f64 = 400.0;
const HIST_HEIGHT: f64 = 140.0;

/// Escape dataset-derived text placed in element content
pub fn escape_html(text: &str) -> Cow<'_, str> {
    html_escape::encode_text(text)
}

pub(super) fn render(report: &ProfileReport) -> Result<String> {
    let mut out = String::new();
    let title = escape_html(report.title());

    writeln!(out, "<!DOCTYPE html>")?;
    writeln!(out, "<html lang=\"en\">")?;
    writeln!(out, "<head>")?;
    writeln!(out, "<meta charset=\"utf-8\">")?;
    writeln!(
        out,
        "<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">"
    )?;
    writeln!(out, "<title>{}</title>", title)?;
    writeln!(out, "<style>{}</style>", STYLE)?;
    writeln!(out, "</head>")?;
    writeln!(out, "<body>")?;
    writeln!(out, "<header><h1>{}</h1></header>", title)?;
    writeln!(
        out,
        "<nav><a href=\"#overview\">Overview</a><a href=\"#alerts\">Alerts</a>\
         <a href=\"#variables\">Variables</a><a href=\"#correlations\">Correlations</a>\
         <a href=\"#sample\">Sample</a></nav>"
    )?;
    writeln!(out, "<main>")?;

    render_overview(&mut out, report)?;
    render_alerts(&mut out, report)?;
    render_variables(&mut out, report)?;
    render_correlations(&mut out, report.correlations.as_ref())?;
    render_samples(&mut out, &report.samples)?;

    writeln!(out, "</main>")?;
    writeln!(
        out,
        "<footer>Generated by dataprofile {}</footer>",
        env!("CARGO_PKG_VERSION")
    )?;
    writeln!(out, "</body>")?;
    writeln!(out, "</html>")?;
    Ok(out)
}

fn render_overview(out: &mut String, report: &ProfileReport) -> Result<()> {
    let table = &report.table;
    writeln!(out, "<section id=\"overview\"><h2>Overview</h2><div class=\"grid\">")?;

    writeln!(out, "<table><caption>Dataset statistics</caption>")?;
    stat_row(out, "Number of variables", &table.n_columns.to_string())?;
    stat_row(out, "Number of observations", &table.n_rows.to_string())?;
    stat_row(out, "Missing cells", &table.missing_cells.to_string())?;
    stat_row(out, "Missing cells (%)", &percent(table.p_missing_cells))?;
    stat_row(out, "Duplicate rows", &table.duplicate_rows.to_string())?;
    stat_row(out, "Duplicate rows (%)", &percent(table.p_duplicate_rows))?;
    stat_row(out, "Total size in memory", &bytes(table.memory_size))?;
    writeln!(out, "</table>")?;

    writeln!(out, "<table><caption>Variable types</caption>")?;
    for (kind, count) in &table.kinds {
        stat_row(out, kind.label(), &count.to_string())?;
    }
    writeln!(out, "</table>")?;

    let analysis = &report.analysis;
    writeln!(out, "<table><caption>Analysis</caption>")?;
    stat_row(
        out,
        "Started",
        &analysis.started.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
    )?;
    stat_row(
        out,
        "Finished",
        &analysis.finished.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
    )?;
    stat_row(out, "Duration", &format!("{:.3} s", analysis.duration_secs))?;
    writeln!(out, "</table>")?;

    writeln!(out, "</div></section>")?;
    Ok(())
}

fn render_alerts(out: &mut String, report: &ProfileReport) -> Result<()> {
    writeln!(out, "<section id=\"alerts\"><h2>Alerts</h2>")?;
    if report.alerts.is_empty() {
        writeln!(out, "<p>No alerts.</p>")?;
    } else {
        writeln!(out, "<ul class=\"alerts\">")?;
        for alert in &report.alerts {
            writeln!(
                out,
                "<li><span class=\"alert\">{}</span>{}</li>",
                alert.kind.label(),
                escape_html(&alert.message)
            )?;
        }
        writeln!(out, "</ul>")?;
    }
    writeln!(out, "</section>")?;
    Ok(())
}

fn render_variables(out: &mut String, report: &ProfileReport) -> Result<()> {
    writeln!(out, "<section id=\"variables\"><h2>Variables</h2>")?;
    for (i, variable) in report.variables.iter().enumerate() {
        render_variable(out, report, i, variable)?;
    }
    writeln!(out, "</section>")?;
    Ok(())
}

fn render_variable(
    out: &mut String,
    report: &ProfileReport,
    index: usize,
    v: &VariableProfile,
) -> Result<()> {
    writeln!(out, "<article class=\"variable\" id=\"variable-{}\">", index)?;
    writeln!(
        out,
        "<h3>{}<span class=\"kind\">{}</span></h3>",
        escape_html(&v.name),
        v.kind.label()
    )?;
    for alert in report.alerts_for(&v.name) {
        write!(out, "<span class=\"alert\">{}</span>", alert.kind.label())?;
    }

    writeln!(out, "<div class=\"grid\">")?;
    writeln!(out, "<table>")?;
    stat_row(out, "Storage type", v.dtype.as_str())?;
    stat_row(out, "Distinct", &v.distinct.to_string())?;
    stat_row(out, "Distinct (%)", &percent(v.p_distinct))?;
    stat_row(out, "Missing", &v.missing.to_string())?;
    stat_row(out, "Missing (%)", &percent(v.p_missing))?;
    stat_row(out, "Memory size", &bytes(v.memory_size))?;
    writeln!(out, "</table>")?;

    match &v.details {
        VariableDetails::Numeric(summary) => render_numeric(out, summary)?,
        VariableDetails::Categorical(summary) | VariableDetails::Text(summary) => {
            render_strings(out, summary)?
        }
        VariableDetails::Boolean(summary) => {
            writeln!(out, "<table>")?;
            stat_row(out, "True", &summary.true_count.to_string())?;
            stat_row(out, "False", &summary.false_count.to_string())?;
            writeln!(out, "</table>")?;
        }
        VariableDetails::DateTime(summary) => {
            writeln!(out, "<table>")?;
            stat_row(out, "Minimum", &escape_html(&summary.min))?;
            stat_row(out, "Maximum", &escape_html(&summary.max))?;
            stat_row(out, "Range (days)", &number(Some(summary.range_days)))?;
            writeln!(out, "</table>")?;
        }
        VariableDetails::Unsupported => {}
    }

    writeln!(out, "</div></article>")?;
    Ok(())
}

fn render_numeric(out: &mut String, s: &NumericSummary) -> Result<()> {
    writeln!(out, "<table><caption>Descriptive statistics</caption>")?;
    stat_row(out, "Mean", &number(s.mean))?;
    stat_row(out, "Standard deviation", &number(s.std))?;
    stat_row(out, "Variance", &number(s.variance))?;
    stat_row(out, "Coefficient of variation", &number(s.cv))?;
    stat_row(out, "Skewness", &number(s.skewness))?;
    stat_row(out, "Kurtosis", &number(s.kurtosis))?;
    stat_row(out, "MAD", &number(s.mad))?;
    stat_row(out, "Sum", &number(Some(s.sum)))?;
    stat_row(out, "Zeros", &s.zeros.to_string())?;
    stat_row(out, "Zeros (%)", &percent(s.p_zeros))?;
    stat_row(out, "Negative", &s.negatives.to_string())?;
    stat_row(out, "Negative (%)", &percent(s.p_negatives))?;
    stat_row(out, "Infinite", &s.infinite.to_string())?;
    stat_row(
        out,
        "Monotonicity",
        match (s.monotonic_increasing, s.monotonic_decreasing) {
            (true, true) => "Constant",
            (true, false) => "Increasing",
            (false, true) => "Decreasing",
            (false, false) => "Not monotonic",
        },
    )?;
    writeln!(out, "</table>")?;

    writeln!(out, "<table><caption>Quantile statistics</caption>")?;
    stat_row(out, "Minimum", &number(s.min))?;
    stat_row(out, "5-th percentile", &number(s.p5))?;
    stat_row(out, "Q1", &number(s.p25))?;
    stat_row(out, "Median", &number(s.median))?;
    stat_row(out, "Q3", &number(s.p75))?;
    stat_row(out, "95-th percentile", &number(s.p95))?;
    stat_row(out, "Maximum", &number(s.max))?;
    stat_row(out, "Range", &number(s.range))?;
    stat_row(out, "IQR", &number(s.iqr))?;
    writeln!(out, "</table>")?;

    if let Some(histogram) = &s.histogram {
        render_histogram(out, histogram)?;
    }
    render_frequent(out, &s.frequent)
}

fn render_strings(out: &mut String, s: &StringSummary) -> Result<()> {
    writeln!(out, "<table><caption>Length</caption>")?;
    stat_row(out, "Min length", &s.min_length.to_string())?;
    stat_row(out, "Max length", &s.max_length.to_string())?;
    stat_row(out, "Mean length", &number(Some(s.mean_length)))?;
    stat_row(out, "Total characters", &s.total_characters.to_string())?;
    writeln!(out, "</table>")?;
    render_frequent(out, &s.frequent)
}

fn render_frequent(out: &mut String, frequent: &[FrequentValue]) -> Result<()> {
    if frequent.is_empty() {
        return Ok(());
    }
    writeln!(out, "<table><caption>Most frequent values</caption>")?;
    writeln!(out, "<tr><th>Value</th><th>Count</th><th>Frequency (%)</th></tr>")?;
    for entry in frequent {
        writeln!(
            out,
            "<tr><td>{}</td><td class=\"num\">{}</td><td class=\"num\">{}</td></tr>",
            escape_html(&entry.value),
            entry.count,
            percent(entry.ratio)
        )?;
    }
    writeln!(out, "</table>")?;
    Ok(())
}

fn render_histogram(out: &mut String, histogram: &Histogram) -> Result<()> {
    let max = histogram.max_count().max(1) as f64;
    let bar_width = HIST_WIDTH / histogram.bins.len().max(1) as f64;

    writeln!(
        out,
        "<svg class=\"histogram\" width=\"{w}\" height=\"{h}\" viewBox=\"0 0 {w} {h}\" role=\"img\">",
        w = HIST_WIDTH,
        h = HIST_HEIGHT
    )?;
    for (i, bin) in histogram.bins.iter().enumerate() {
        let height = bin.count as f64 / max * (HIST_HEIGHT - 4.0);
        writeln!(
            out,
            "<rect class=\"bar\" x=\"{:.2}\" y=\"{:.2}\" width=\"{:.2}\" height=\"{:.2}\"><title>[{}, {}]: {}</title></rect>",
            i as f64 * bar_width,
            HIST_HEIGHT - height,
            (bar_width - 1.0).max(0.5),
            height,
            number(Some(bin.lower)),
            number(Some(bin.upper)),
            bin.count
        )?;
    }
    writeln!(out, "</svg>")?;
    Ok(())
}

fn render_correlations(out: &mut String, correlations: Option<&Correlations>) -> Result<()> {
    writeln!(out, "<section id=\"correlations\"><h2>Correlations</h2>")?;
    let Some(corr) = correlations else {
        writeln!(out, "<p>No correlations computed.</p></section>")?;
        return Ok(());
    };

    writeln!(out, "<table class=\"correlations\">")?;
    write!(out, "<tr><th></th>")?;
    for name in &corr.columns {
        write!(out, "<th>{}</th>", escape_html(name))?;
    }
    writeln!(out, "</tr>")?;

    for (name, row) in corr.columns.iter().zip(&corr.matrix) {
        write!(out, "<tr><th>{}</th>", escape_html(name))?;
        for value in row {
            match value {
                Some(r) => {
                    let (red, green, blue) = if *r >= 0.0 { (33, 102, 172) } else { (178, 24, 43) };
                    write!(
                        out,
                        "<td class=\"num\" style=\"background: rgba({}, {}, {}, {:.2})\">{:.3}</td>",
                        red,
                        green,
                        blue,
                        r.abs() * 0.6,
                        r
                    )?;
                }
                None => write!(out, "<td class=\"num\">-</td>")?,
            }
        }
        writeln!(out, "</tr>")?;
    }
    writeln!(out, "</table></section>")?;
    Ok(())
}

fn render_samples(out: &mut String, samples: &Samples) -> Result<()> {
    writeln!(out, "<section id=\"sample\"><h2>Sample</h2>")?;
    for (caption, rows) in [("First rows", &samples.head), ("Last rows", &samples.tail)] {
        writeln!(out, "<table><caption>{}</caption>", caption)?;
        write!(out, "<tr>")?;
        for name in &samples.columns {
            write!(out, "<th>{}</th>", escape_html(name))?;
        }
        writeln!(out, "</tr>")?;
        for row in rows {
            write!(out, "<tr>")?;
            for cell in row {
                write!(out, "<td>{}</td>", escape_html(cell))?;
            }
            writeln!(out, "</tr>")?;
        }
        writeln!(out, "</table>")?;
    }
    writeln!(out, "</section>")?;
    Ok(())
}

fn stat_row(out: &mut String, label: &str, value: &str) -> Result<()> {
    writeln!(
        out,
        "<tr><th>{}</th><td class=\"num\">{}</td></tr>",
        label, value
    )?;
    Ok(())
}

fn number(value: Option<f64>) -> String {
    match value {
        None => "-".to_string(),
        Some(v) if v.is_nan() => "NaN".to_string(),
        Some(v) if v.is_infinite() => (if v > 0.0 { "inf" } else { "-inf" }).to_string(),
        Some(v) if v.fract() == 0.0 && v.abs() < 1e15 => format!("{:.0}", v),
        Some(v) => {
            let formatted = format!("{:.4}", v);
            formatted.trim_end_matches('0').trim_end_matches('.').to_string()
        }
    }
}

fn percent(ratio: f64) -> String {
    format!("{:.1}%", ratio * 100.0)
}

fn bytes(size: usize) -> String {
    const UNITS: [&str; 4] = ["B", "KiB", "MiB", "GiB"];
    let mut value = size as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{} B", size)
    } else {
        format!("{:.1} {}", value, UNITS[unit])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{LoadOptions, ProfileSettings};
    use crate::dataset::Dataset;

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html("<b>Tom & Jerry</b>"),
            "&lt;b&gt;Tom &amp; Jerry&lt;/b&gt;"
        );
        assert!(matches!(escape_html("plain text"), Cow::Borrowed("plain text")));
    }

    #[test]
    fn test_number_formatting() {
        assert_eq!(number(None), "-");
        assert_eq!(number(Some(1924.0)), "1924");
        assert_eq!(number(Some(2.5)), "2.5");
        assert_eq!(number(Some(1.0 / 3.0)), "0.3333");
        assert_eq!(number(Some(f64::INFINITY)), "inf");
        assert_eq!(bytes(512), "512 B");
        assert_eq!(bytes(2048), "2.0 KiB");
        assert_eq!(percent(0.25), "25.0%");
    }

    #[test]
    fn test_render_document() {
        let ds = Dataset::from_reader(
            "title\tyear\tscore\n<script>\t1999\t1.5\nPlain\t2001\t3.5\n".as_bytes(),
            &LoadOptions::tsv(),
        )
        .unwrap();
        let report = ProfileReport::new(&ds, "Films & <More>", &ProfileSettings::default()).unwrap();
        let html = render(&report).unwrap();

        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.trim_end().ends_with("</html>"));
        assert!(html.contains("<title>Films &amp; &lt;More&gt;</title>"));
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
        assert!(html.contains("id=\"variable-2\""));
        assert!(html.contains("<svg class=\"histogram\""));
        assert!(html.contains("class=\"correlations\""));
    }
}
