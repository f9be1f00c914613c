//! Load readings from the CSV export format
//!
//! Expected headers:
//! Timestamp,Temperature (°C),Humidity (%),Air Quality (ppm),Device ID

use crate::{Reading, ReadingError, DEFAULT_DEVICE_ID};
use chrono::{DateTime, Utc};
use std::io::Read;
use std::path::Path;
use tracing::info;

/// Load every reading from a CSV file
pub fn load_csv(path: &Path) -> Result<Vec<Reading>, ReadingError> {
    let file = std::fs::File::open(path).map_err(csv::Error::from)?;
    let readings = parse_csv(file)?;
    info!("Loaded {} readings from {}", readings.len(), path.display());
    Ok(readings)
}

/// Timestamp and three values; the device column may be absent
const MIN_COLUMNS: usize = 4;

/// Parse readings from any CSV source
pub fn parse_csv<R: Read>(source: R) -> Result<Vec<Reading>, ReadingError> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(source);

    let mut readings = Vec::new();
    for result in rdr.records() {
        let record = result?;
        let line = record.position().map(|p| p.line()).unwrap_or(0);
        if record.len() < MIN_COLUMNS {
            return Err(ReadingError::MissingColumns {
                line,
                found: record.len(),
            });
        }

        let timestamp = DateTime::parse_from_rfc3339(&record[0])
            .map(|t| t.with_timezone(&Utc))
            .map_err(|_| ReadingError::InvalidField {
                line,
                field: "timestamp",
                value: record[0].to_string(),
            })?;
        let number = |idx: usize, field: &'static str| -> Result<f64, ReadingError> {
            record[idx].parse::<f64>().map_err(|_| ReadingError::InvalidField {
                line,
                field,
                value: record[idx].to_string(),
            })
        };

        let device_id = record
            .get(4)
            .filter(|d| !d.is_empty() && *d != DEFAULT_DEVICE_ID)
            .map(str::to_string);

        readings.push(Reading {
            timestamp,
            temperature: number(1, "temperature")?,
            humidity: number(2, "humidity")?,
            air_quality: number(3, "air quality")?,
            device_id,
        });
    }
    Ok(readings)
}
