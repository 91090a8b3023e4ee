pub mod buffer;
pub mod stream;

pub use buffer::{HistorySnapshot, ReadingHistory};

use chrono::{DateTime, Local};
use serde::Serialize;

/// One cached temperature reading.
/// Serializes in the dashboard feed shape:
/// `{"timestamp": "14:03:22", "temperature": 23.5}`.
#[derive(Debug, Clone, Serialize)]
pub struct Sample {
    /// Capture time, shown at display precision.
    #[serde(serialize_with = "hms")]
    pub timestamp: DateTime<Local>,
    /// Reading in °C.
    pub temperature: f64,
}

fn hms<S>(ts: &DateTime<Local>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.serialize_str(&ts.format("%H:%M:%S").to_string())
}
