//! Shared types for the LED panel client.
//!
//! This crate holds the data model used by `ledpanel-core` and the
//! front-ends: LED identifiers and power states, history records, the
//! aggregate rows returned by the statistics endpoints and the chart
//! projections built from them.
//!
//! # Example
//!
//! ```
//! use ledpanel_types::{HistoryRecord, PowerState};
//!
//! let record = HistoryRecord::new("2024-05-01T10:00:00Z", PowerState::On);
//! assert_eq!(record.summary_line(), "2024-05-01T10:00:00Z → ON");
//! ```

pub mod error;
pub mod types;

pub use error::{ParseError, ParseResult};
pub use types::{
    ChartKind, ChartSeries, HistoryRecord, LedId, LedState, ON_TIME_TITLE, PowerState,
    SessionReport, StateSample, TimeTotal, Timestamp,
};

#[cfg(test)]
mod tests {
    use super::*;

    // --- LedState tests ---

    #[test]
    fn test_placeholder_is_loading_and_off() {
        let state = LedState::placeholder(LedId::new(1).unwrap());
        assert!(state.is_loading);
        assert!(!state.is_on);
        assert_eq!(state.power(), PowerState::Off);
    }

    #[test]
    fn test_loaded_state_settles() {
        let state = LedState::loaded(LedId::new(2).unwrap(), true);
        assert!(!state.is_loading);
        assert_eq!(state.power(), PowerState::On);
    }

    // --- Serde tests ---

    #[cfg(feature = "serde")]
    #[test]
    fn test_power_state_serializes_as_wire_text() {
        let json = serde_json::to_string(&PowerState::On).unwrap();
        assert_eq!(json, "\"ENCENDIDO\"");
        let parsed: PowerState = serde_json::from_str("\"APAGADO\"").unwrap();
        assert_eq!(parsed, PowerState::Off);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_led_id_serde_rejects_zero() {
        let id: LedId = serde_json::from_str("4").unwrap();
        assert_eq!(id.get(), 4);
        assert!(serde_json::from_str::<LedId>("0").is_err());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_history_record_json_shape() {
        let record = HistoryRecord::new("T1", PowerState::On);
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["timestamp"], "T1");
        assert_eq!(value["state"], "ENCENDIDO");
        assert!(value.get("duration_seconds").is_none());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_chart_series_json_shape() {
        let series = ChartSeries::empty(ChartKind::SessionDurations, "d");
        let value = serde_json::to_value(&series).unwrap();
        assert_eq!(value["kind"], "duration");
        assert_eq!(value["unit"], "s");
        assert_eq!(value["values"], serde_json::json!([]));
    }
}
