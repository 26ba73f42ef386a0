//! CSV price source
//!
//! Reads a header row followed by `timestamp,<y>,<x>` rows. Column names in
//! the header become the pair's symbols. Timestamps may be RFC 3339 or plain
//! `YYYY-MM-DD` dates (midnight UTC). Rows where either price is missing or
//! not finite are dropped, so both legs stay on one shared index.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use csv::{ReaderBuilder, StringRecord, Trim, Writer};
use std::fs::File;
use std::path::{Path, PathBuf};

use crate::domain::PriceSeries;
use crate::ports::market_data::{MarketDataError, PricePair, PriceSource};

/// Price pair stored in a CSV file
#[derive(Debug, Clone)]
pub struct CsvPriceSource {
    path: PathBuf,
    y_column: Option<String>,
    x_column: Option<String>,
}

impl CsvPriceSource {
    /// Use the first two price columns as Y and X
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            y_column: None,
            x_column: None,
        }
    }

    /// Select the Y and X legs by header name
    pub fn with_columns(mut self, y_column: impl Into<String>, x_column: impl Into<String>) -> Self {
        self.y_column = Some(y_column.into());
        self.x_column = Some(x_column.into());
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn column_index(&self, headers: &StringRecord, wanted: Option<&str>, fallback: usize) -> Result<usize, MarketDataError> {
        match wanted {
            Some(name) => headers.iter().position(|h| h == name).ok_or_else(|| MarketDataError::ParseError {
                row: 0,
                reason: format!("column '{}' not found in header", name),
            }),
            None if fallback < headers.len() => Ok(fallback),
            None => Err(MarketDataError::ParseError {
                row: 0,
                reason: format!("expected timestamp and two price columns, header has {}", headers.len()),
            }),
        }
    }
}

impl PriceSource for CsvPriceSource {
    fn describe(&self) -> String {
        format!("CSV file {}", self.path.display())
    }

    fn load_pair(&self) -> Result<PricePair, MarketDataError> {
        let file = File::open(&self.path).map_err(|source| MarketDataError::Io {
            path: self.path.display().to_string(),
            source,
        })?;
        let mut reader = ReaderBuilder::new().trim(Trim::All).from_reader(file);

        let headers = reader.headers()?.clone();
        let y_idx = self.column_index(&headers, self.y_column.as_deref(), 1)?;
        let x_idx = self.column_index(&headers, self.x_column.as_deref(), 2)?;

        let mut y_points = Vec::new();
        let mut x_points = Vec::new();
        let mut dropped = 0usize;

        for (i, result) in reader.records().enumerate() {
            let record = result?;
            // Header is row 1
            let row = i + 2;

            let raw_ts = record.get(0).unwrap_or_default();
            let timestamp = parse_timestamp(raw_ts).ok_or_else(|| MarketDataError::ParseError {
                row,
                reason: format!("unrecognised timestamp '{}'", raw_ts),
            })?;

            match (parse_price(&record, y_idx, row)?, parse_price(&record, x_idx, row)?) {
                (Some(y), Some(x)) => {
                    y_points.push((timestamp, y));
                    x_points.push((timestamp, x));
                }
                _ => {
                    dropped += 1;
                    tracing::debug!("Dropping row {} ({}): missing price", row, raw_ts);
                }
            }
        }

        if dropped > 0 {
            tracing::info!("Dropped {} rows with missing prices", dropped);
        }
        if y_points.is_empty() {
            return Err(MarketDataError::Empty(self.path.display().to_string()));
        }

        Ok(PricePair {
            y_symbol: headers.get(y_idx).unwrap_or("Y").to_string(),
            x_symbol: headers.get(x_idx).unwrap_or("X").to_string(),
            y: PriceSeries::from_pairs(y_points)?,
            x: PriceSeries::from_pairs(x_points)?,
        })
    }
}

/// Write a pair as `timestamp,<y_symbol>,<x_symbol>` rows
pub fn write_pair_csv(path: &Path, pair: &PricePair) -> Result<(), MarketDataError> {
    let file = File::create(path).map_err(|source| MarketDataError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let mut writer = Writer::from_writer(file);

    writer.write_record(["timestamp", pair.y_symbol.as_str(), pair.x_symbol.as_str()])?;
    for (y, x) in pair.y.iter().zip(pair.x.iter()) {
        writer.write_record([y.timestamp.to_rfc3339(), y.value.to_string(), x.value.to_string()])?;
    }

    writer.flush().map_err(|source| MarketDataError::Io {
        path: path.display().to_string(),
        source,
    })?;
    Ok(())
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    if let Ok(ts) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S") {
        return Some(ts.and_utc());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|ts| ts.and_utc())
}

/// `None` for an empty cell or a non-finite value
fn parse_price(record: &StringRecord, idx: usize, row: usize) -> Result<Option<f64>, MarketDataError> {
    let raw = record.get(idx).unwrap_or_default();
    if raw.is_empty() {
        return Ok(None);
    }
    let value: f64 = raw.parse().map_err(|_| MarketDataError::ParseError {
        row,
        reason: format!("invalid price '{}'", raw),
    })?;
    Ok(value.is_finite().then_some(value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::series::test_support::daily_series;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn csv_file(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_pair_with_dates() {
        let file = csv_file("date,HDFCBANK,ICICIBANK\n2024-01-01,100.5,50.0\n2024-01-02,101.0,50.5\n2024-01-03,99.5,49.0\n");
        let pair = CsvPriceSource::new(file.path()).load_pair().unwrap();

        assert_eq!(pair.y_symbol, "HDFCBANK");
        assert_eq!(pair.x_symbol, "ICICIBANK");
        assert_eq!(pair.y.values(), vec![100.5, 101.0, 99.5]);
        assert_eq!(pair.x.values(), vec![50.0, 50.5, 49.0]);
        assert_eq!(pair.y.timestamps().collect::<Vec<_>>(), pair.x.timestamps().collect::<Vec<_>>());
    }

    #[test]
    fn test_rows_with_missing_prices_are_dropped() {
        let file = csv_file("timestamp,A,B\n2024-01-01,1.0,2.0\n2024-01-02,,2.1\n2024-01-03,1.2,NaN\n2024-01-04,1.3,2.3\n");
        let pair = CsvPriceSource::new(file.path()).load_pair().unwrap();

        assert_eq!(pair.y.values(), vec![1.0, 1.3]);
        assert_eq!(pair.x.values(), vec![2.0, 2.3]);
    }

    #[test]
    fn test_select_columns_by_name() {
        let file = csv_file("timestamp,A,B,C\n2024-01-01T00:00:00Z,1,2,3\n2024-01-02T00:00:00Z,4,5,6\n");
        let pair = CsvPriceSource::new(file.path()).with_columns("C", "A").load_pair().unwrap();

        assert_eq!(pair.y_symbol, "C");
        assert_eq!(pair.y.values(), vec![3.0, 6.0]);
        assert_eq!(pair.x.values(), vec![1.0, 4.0]);
    }

    #[test]
    fn test_unknown_column() {
        let file = csv_file("timestamp,A,B\n2024-01-01,1,2\n");
        let result = CsvPriceSource::new(file.path()).with_columns("A", "Z").load_pair();
        assert!(matches!(result, Err(MarketDataError::ParseError { row: 0, .. })));
    }

    #[test]
    fn test_bad_price_reports_row() {
        let file = csv_file("timestamp,A,B\n2024-01-01,1,2\n2024-01-02,abc,2\n");
        let result = CsvPriceSource::new(file.path()).load_pair();
        assert!(matches!(result, Err(MarketDataError::ParseError { row: 3, .. })));
    }

    #[test]
    fn test_unordered_timestamps_rejected() {
        let file = csv_file("timestamp,A,B\n2024-01-02,1,2\n2024-01-01,1,2\n");
        let result = CsvPriceSource::new(file.path()).load_pair();
        assert!(matches!(result, Err(MarketDataError::InvalidSeries(_))));
    }

    #[test]
    fn test_missing_file() {
        let result = CsvPriceSource::new("/nonexistent/prices.csv").load_pair();
        assert!(matches!(result, Err(MarketDataError::Io { .. })));
    }

    #[test]
    fn test_write_then_load() {
        let pair = PricePair {
            y_symbol: "Y".to_string(),
            x_symbol: "X".to_string(),
            y: daily_series(&[10.25, 11.5, 9.75]),
            x: daily_series(&[5.0, 5.5, 4.5]),
        };
        let file = NamedTempFile::new().unwrap();
        write_pair_csv(file.path(), &pair).unwrap();

        let loaded = CsvPriceSource::new(file.path()).load_pair().unwrap();
        assert_eq!(loaded, pair);
    }
}
