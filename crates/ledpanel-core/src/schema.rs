//! Boundary conversion from raw JSON payloads to typed entities.
//!
//! History rows are checked strictly one at a time: a row must be an object
//! with a timestamp and a recognised `estado`, and rows that are not are
//! skipped. Aggregate payloads are permissive per row (absent numbers become
//! 0, unknown states are kept as `None`). Every payload must be an array.

use ledpanel_types::{
    HistoryRecord, LedId, ParseError, ParseResult, PowerState, SessionReport, StateSample,
    TimeTotal, Timestamp,
};
use serde_json::{Map, Value};
use tracing::warn;

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn expect_array(value: &Value) -> ParseResult<&[Value]> {
    value.as_array().map(Vec::as_slice).ok_or_else(|| {
        ParseError::InvalidData(format!("expected an array, got {}", kind_of(value)))
    })
}

fn expect_object(value: &Value, index: usize) -> ParseResult<&Map<String, Value>> {
    value.as_object().ok_or_else(|| {
        ParseError::InvalidData(format!(
            "element {} is {}, expected an object",
            index,
            kind_of(value)
        ))
    })
}

/// Timestamps may arrive as text or as a bare number.
fn timestamp_field(obj: &Map<String, Value>, key: &str) -> Option<Timestamp> {
    match obj.get(key)? {
        Value::String(s) => Some(Timestamp::new(s.clone())),
        Value::Number(n) => Some(Timestamp::new(n.to_string())),
        _ => None,
    }
}

/// Numbers may arrive as JSON numbers or numeric strings.
fn number_field(obj: &Map<String, Value>, key: &str) -> Option<f64> {
    let value: Option<f64> = match obj.get(key)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    };
    value.filter(|v| v.is_finite())
}

fn led_id_field(obj: &Map<String, Value>) -> Option<LedId> {
    let raw = number_field(obj, "led_id")?;
    if raw.fract() != 0.0 || raw < 1.0 || raw > f64::from(u32::MAX) {
        return None;
    }
    LedId::new(raw as u32).ok()
}

fn history_row(item: &Value, index: usize) -> ParseResult<HistoryRecord> {
    let obj = expect_object(item, index)?;
    let timestamp =
        timestamp_field(obj, "timestamp").ok_or(ParseError::MissingField("timestamp"))?;
    let state = match obj.get("estado") {
        Some(Value::String(s)) => PowerState::from_wire(s)?,
        Some(other) => {
            return Err(ParseError::InvalidValue(format!(
                "element {}: 'estado' is {}, expected a string",
                index,
                kind_of(other)
            )));
        }
        None => return Err(ParseError::MissingField("estado")),
    };
    Ok(HistoryRecord {
        timestamp,
        state,
        duration_seconds: number_field(obj, "duracion_segundos"),
        range_start: timestamp_field(obj, "inicio"),
        range_end: timestamp_field(obj, "fin"),
    })
}

/// Parse a `/historial` payload: `[{timestamp, estado, ...}]`.
///
/// Rows are checked one by one; a bad row is logged and skipped.
pub fn parse_history(value: &Value) -> ParseResult<Vec<HistoryRecord>> {
    let mut records = Vec::new();
    for (index, item) in expect_array(value)?.iter().enumerate() {
        match history_row(item, index) {
            Ok(record) => records.push(record),
            Err(e) => warn!(index, error = %e, "Skipping invalid history row"),
        }
    }
    Ok(records)
}

/// Parse only the newest row of a `/historial` payload.
///
/// The newest row is element 0, or the last element when the service lists
/// oldest first. An empty array is `None`; an invalid newest row is an
/// error even if older rows are fine.
pub fn parse_latest_history(
    value: &Value,
    oldest_first: bool,
) -> ParseResult<Option<HistoryRecord>> {
    let items = expect_array(value)?;
    let newest = if oldest_first {
        items.len().checked_sub(1)
    } else if items.is_empty() {
        None
    } else {
        Some(0)
    };
    newest
        .map(|index| history_row(&items[index], index))
        .transpose()
}

/// Parse a `/estadisticas/tiempos` payload: `[{led_id, estado, total_horas}]`.
///
/// Rows without a usable `led_id` cannot be charted and are skipped.
pub fn parse_time_totals(value: &Value) -> ParseResult<Vec<TimeTotal>> {
    let mut rows = Vec::new();
    for (index, item) in expect_array(value)?.iter().enumerate() {
        let Some(obj) = item.as_object() else {
            warn!(index, "Skipping non-object time total row");
            continue;
        };
        let Some(led_id) = led_id_field(obj) else {
            warn!(index, "Skipping time total row without a valid led_id");
            continue;
        };
        let state = obj
            .get("estado")
            .and_then(Value::as_str)
            .and_then(|s| PowerState::from_wire(s).ok());
        rows.push(TimeTotal {
            led_id,
            state,
            total_hours: number_field(obj, "total_horas").unwrap_or(0.0),
        });
    }
    Ok(rows)
}

/// Parse a `/estadisticas/linea` payload: `[{timestamp, estado: 0|1}]`.
///
/// Only the number `1` counts as on.
pub fn parse_state_samples(value: &Value) -> ParseResult<Vec<StateSample>> {
    Ok(expect_array(value)?
        .iter()
        .map(|item| {
            let obj = item.as_object();
            let timestamp = obj
                .and_then(|o| timestamp_field(o, "timestamp"))
                .unwrap_or_else(|| Timestamp::new(""));
            let state = obj
                .and_then(|o| o.get("estado"))
                .and_then(Value::as_f64)
                .map_or(PowerState::Off, PowerState::from_sample);
            StateSample { timestamp, state }
        })
        .collect())
}

/// Parse a `/reportes` payload: `[{inicio, fin, duracion_formato, duracion_segundos}]`.
pub fn parse_session_reports(value: &Value) -> ParseResult<Vec<SessionReport>> {
    Ok(expect_array(value)?
        .iter()
        .map(|item| match item.as_object() {
            Some(obj) => SessionReport {
                start: timestamp_field(obj, "inicio"),
                end: timestamp_field(obj, "fin"),
                duration_label: obj
                    .get("duracion_formato")
                    .and_then(Value::as_str)
                    .map(String::from),
                duration_seconds: number_field(obj, "duracion_segundos").unwrap_or(0.0),
            },
            None => SessionReport {
                start: None,
                end: None,
                duration_label: None,
                duration_seconds: 0.0,
            },
        })
        .collect())
}
