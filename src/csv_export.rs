//! CSV export of the series currently in view.

use std::io::Write;

use chrono::{DateTime, SecondsFormat, Utc};
use eyre::{Result, WrapErr};

use crate::data_types::{Time, XAxisMode};

#[derive(Clone, Debug, PartialEq)]
pub struct CsvDataset {
    pub label: String,
    pub rows: Vec<(f64, f64)>,
}

fn quote(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

fn timestamp(seconds: f64) -> Option<String> {
    let t = Time::from_sec(seconds);
    DateTime::<Utc>::from_timestamp(t.sec as i64, t.nsec)
        .map(|dt| dt.to_rfc3339_opts(SecondsFormat::Nanos, true))
}

/// Writes `series,x,y` rows; timestamp panels get an extra RFC 3339 `time`
/// column derived from x.
pub fn write_csv<W: Write>(datasets: &[CsvDataset], mode: XAxisMode, mut out: W) -> Result<()> {
    let with_time = mode.is_timestamp();
    let header = if with_time { "series,x,y,time" } else { "series,x,y" };
    writeln!(out, "{header}").wrap_err("failed to write csv header")?;

    for dataset in datasets {
        let label = quote(&dataset.label);
        for &(x, y) in &dataset.rows {
            let written = if with_time {
                let time = timestamp(x).unwrap_or_default();
                writeln!(out, "{label},{x},{y},{time}")
            } else {
                writeln!(out, "{label},{x},{y}")
            };
            written.wrap_err_with(|| format!("failed to write csv row for {}", dataset.label))?;
        }
    }
    out.flush().wrap_err("failed to flush csv output")
}

/// Convenience wrapper returning the CSV document as a string.
pub fn to_csv_string(datasets: &[CsvDataset], mode: XAxisMode) -> Result<String> {
    let mut buf = Vec::new();
    write_csv(datasets, mode, &mut buf)?;
    String::from_utf8(buf).wrap_err("csv output is not utf-8")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_with_commas_are_quoted() {
        assert_eq!(quote("a,b"), "\"a,b\"");
        assert_eq!(quote("say \"hi\""), "\"say \"\"hi\"\"\"");
        assert_eq!(quote("plain"), "plain");
    }

    #[test]
    fn timestamp_column_is_utc() {
        assert_eq!(timestamp(0.5).as_deref(), Some("1970-01-01T00:00:00.500000000Z"));
    }
}
