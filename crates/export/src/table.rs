//! CSV rendering of the reading history

use crate::ExportError;
use chrono::SecondsFormat;
use readings::Reading;

/// Header row of the CSV export
pub const CSV_HEADER: [&str; 5] = [
    "Timestamp",
    "Temperature (°C)",
    "Humidity (%)",
    "Air Quality (ppm)",
    "Device ID",
];

/// Render readings as CSV in history order.
///
/// Timestamps are RFC 3339 with milliseconds; readings without a device id
/// get the placeholder id.
pub fn render_csv(readings: &[Reading]) -> Result<String, ExportError> {
    if readings.is_empty() {
        return Err(ExportError::NoData);
    }

    let mut wtr = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());
    wtr.write_record(CSV_HEADER)?;

    for reading in readings {
        wtr.write_record([
            reading.timestamp.to_rfc3339_opts(SecondsFormat::Millis, true),
            reading.temperature.to_string(),
            reading.humidity.to_string(),
            reading.air_quality.to_string(),
            reading.device_or_default().to_string(),
        ])?;
    }

    let bytes = wtr.into_inner().map_err(|e| ExportError::Io(e.into_error()))?;
    String::from_utf8(bytes).map_err(|e| ExportError::Render(e.to_string()))
}
