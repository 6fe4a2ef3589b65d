use std::path::Path;

use anyhow::Context as _;
use chrono::Utc;
use fitparser::{FitDataRecord, Value, profile::MesgNum};

use crate::{
    foundation::error::{HudError, HudResult},
    telemetry::sample::RawSample,
};

/// Read a FIT container and return every `record` message that carries a timestamp.
///
/// Messages of other kinds (laps, events, sessions) and records without a timestamp are
/// skipped. Order is file order.
pub fn read_samples(path: &Path) -> HudResult<Vec<RawSample>> {
    let bytes =
        std::fs::read(path).with_context(|| format!("read fit container '{}'", path.display()))?;
    decode_samples(&bytes)
}

pub fn decode_samples(bytes: &[u8]) -> HudResult<Vec<RawSample>> {
    let messages = fitparser::de::from_bytes(bytes).map_err(|e| HudError::decode(e.to_string()))?;
    Ok(messages.iter().filter_map(sample_from_record).collect())
}

fn sample_from_record(record: &FitDataRecord) -> Option<RawSample> {
    if record.kind() != MesgNum::Record {
        return None;
    }

    let mut timestamp = None;
    let mut speed = None;
    let mut enhanced_speed = None;
    let mut power = None;
    let mut heart_rate = None;
    let mut cadence = None;

    for field in record.fields() {
        match field.name() {
            "timestamp" => {
                if let Value::Timestamp(ts) = field.value() {
                    timestamp = Some(ts.with_timezone(&Utc));
                }
            }
            "speed" => speed = value_to_f64(field.value()),
            "enhanced_speed" => enhanced_speed = value_to_f64(field.value()),
            "power" => power = value_to_u32(field.value()),
            "heart_rate" => heart_rate = value_to_u32(field.value()),
            "cadence" => cadence = value_to_u32(field.value()),
            _ => {}
        }
    }

    Some(RawSample {
        timestamp: timestamp?,
        speed,
        enhanced_speed,
        power,
        heart_rate,
        cadence,
    })
}

fn value_to_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Float32(v) => Some(f64::from(*v)),
        Value::Float64(v) => Some(*v),
        Value::SInt8(v) => Some(f64::from(*v)),
        Value::SInt16(v) => Some(f64::from(*v)),
        Value::SInt32(v) => Some(f64::from(*v)),
        Value::SInt64(v) => Some(*v as f64),
        Value::UInt8(v) => Some(f64::from(*v)),
        Value::UInt16(v) => Some(f64::from(*v)),
        Value::UInt32(v) => Some(f64::from(*v)),
        Value::UInt64(v) => Some(*v as f64),
        Value::UInt16z(v) => Some(f64::from(*v)),
        Value::UInt32z(v) => Some(f64::from(*v)),
        Value::UInt64z(v) => Some(*v as f64),
        Value::Byte(v) => Some(f64::from(*v)),
        Value::Array(values) => values.iter().find_map(value_to_f64),
        _ => None,
    }
}

fn value_to_u32(value: &Value) -> Option<u32> {
    let v = value_to_f64(value)?;
    if v.is_finite() && v >= 0.0 {
        Some(v as u32)
    } else {
        None
    }
}
