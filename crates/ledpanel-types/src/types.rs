//! Core types for LED state and history data.

use core::fmt;
use core::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use time::format_description::well_known::Rfc3339;
use time::{OffsetDateTime, PrimitiveDateTime};
use time::macros::format_description;

use crate::error::ParseError;

/// Identifier of a remotely controlled LED.
///
/// Identifiers are small positive integers assigned by the remote service.
/// Zero is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(try_from = "u32", into = "u32")
)]
pub struct LedId(u32);

impl LedId {
    /// Create an identifier, rejecting zero.
    ///
    /// # Examples
    ///
    /// ```
    /// use ledpanel_types::LedId;
    ///
    /// assert_eq!(LedId::new(3).unwrap().get(), 3);
    /// assert!(LedId::new(0).is_err());
    /// ```
    pub fn new(value: u32) -> Result<Self, ParseError> {
        if value == 0 {
            Err(ParseError::InvalidValue(
                "LED id must be a positive integer".to_string(),
            ))
        } else {
            Ok(Self(value))
        }
    }

    /// The numeric identifier.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }

    /// Chart label for this LED (`LED 1`, `LED 2`, ...).
    #[must_use]
    pub fn label(self) -> String {
        format!("LED {}", self.0)
    }
}

impl TryFrom<u32> for LedId {
    type Error = ParseError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<LedId> for u32 {
    fn from(id: LedId) -> Self {
        id.0
    }
}

impl fmt::Display for LedId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for LedId {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value: u32 = s
            .trim()
            .parse()
            .map_err(|_| ParseError::InvalidValue(format!("'{}' is not a valid LED id", s)))?;
        Self::new(value)
    }
}

/// Power state of an LED.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum PowerState {
    /// The LED is lit.
    #[cfg_attr(feature = "serde", serde(rename = "ENCENDIDO"))]
    On,
    /// The LED is dark.
    #[default]
    #[cfg_attr(feature = "serde", serde(rename = "APAGADO"))]
    Off,
}

impl PowerState {
    /// Wire form of [`PowerState::On`] in history payloads.
    pub const ON_WIRE: &'static str = "ENCENDIDO";
    /// Wire form of [`PowerState::Off`] in history payloads.
    pub const OFF_WIRE: &'static str = "APAGADO";

    /// Parse the textual wire form (case-insensitive, surrounding whitespace ignored).
    pub fn from_wire(s: &str) -> Result<Self, ParseError> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case(Self::ON_WIRE) {
            Ok(Self::On)
        } else if trimmed.eq_ignore_ascii_case(Self::OFF_WIRE) {
            Ok(Self::Off)
        } else {
            Err(ParseError::UnknownState(s.to_string()))
        }
    }

    /// Map a binary sample value: exactly `1` is on, anything else is off.
    #[must_use]
    pub fn from_sample(value: f64) -> Self {
        if value == 1.0 { Self::On } else { Self::Off }
    }

    /// Textual wire form.
    #[must_use]
    pub fn as_wire(self) -> &'static str {
        match self {
            Self::On => Self::ON_WIRE,
            Self::Off => Self::OFF_WIRE,
        }
    }

    /// Binary form used by line charts.
    #[must_use]
    pub fn as_bit(self) -> u8 {
        match self {
            Self::On => 1,
            Self::Off => 0,
        }
    }

    /// Whether the LED is on.
    #[must_use]
    pub fn is_on(self) -> bool {
        self == Self::On
    }

    /// Short label used in history listings.
    #[must_use]
    pub fn short_label(self) -> &'static str {
        match self {
            Self::On => "ON",
            Self::Off => "OFF",
        }
    }

    /// Human-readable status.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::On => "Encendido",
            Self::Off => "Apagado",
        }
    }

    /// Label of the action that flips this state.
    #[must_use]
    pub fn action_label(self) -> &'static str {
        match self {
            Self::On => "Apagar",
            Self::Off => "Encender",
        }
    }
}

impl From<bool> for PowerState {
    fn from(on: bool) -> Self {
        if on { Self::On } else { Self::Off }
    }
}

impl fmt::Display for PowerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.short_label())
    }
}

impl FromStr for PowerState {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "on" | "1" | "true" | "encendido" => Ok(Self::On),
            "off" | "0" | "false" | "apagado" => Ok(Self::Off),
            _ => Err(ParseError::UnknownState(s.to_string())),
        }
    }
}

/// A point in time as reported by the remote service.
///
/// The raw text is preserved verbatim for display. It is also parsed as
/// RFC 3339 or, failing that, as an SQL-style `YYYY-MM-DD HH:MM:SS[.fff]`
/// stamp, which carries no offset and is read as UTC.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Timestamp {
    raw: String,
    parsed: Option<OffsetDateTime>,
}

impl Timestamp {
    /// Wrap a raw timestamp string.
    pub fn new(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let parsed = parse_datetime(raw.trim());
        Self { raw, parsed }
    }

    /// Build a timestamp from a parsed date-time.
    #[must_use]
    pub fn from_datetime(dt: OffsetDateTime) -> Self {
        let raw = dt.format(&Rfc3339).unwrap_or_else(|_| dt.to_string());
        Self {
            raw,
            parsed: Some(dt),
        }
    }

    /// The text exactly as the service sent it.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// The parsed date-time, if the text was in a recognised format.
    #[must_use]
    pub fn datetime(&self) -> Option<OffsetDateTime> {
        self.parsed
    }

    /// Time of day as `HH:MM:SS` (24-hour), or the raw text when unparsed.
    #[must_use]
    pub fn time_of_day(&self) -> String {
        let format = format_description!("[hour]:[minute]:[second]");
        self.parsed
            .and_then(|dt| dt.format(&format).ok())
            .unwrap_or_else(|| self.raw.clone())
    }
}

fn parse_datetime(text: &str) -> Option<OffsetDateTime> {
    if let Ok(dt) = OffsetDateTime::parse(text, &Rfc3339) {
        return Some(dt);
    }
    let sql = format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");
    let sql_fraction =
        format_description!("[year]-[month]-[day] [hour]:[minute]:[second].[subsecond]");
    PrimitiveDateTime::parse(text, &sql)
        .or_else(|_| PrimitiveDateTime::parse(text, &sql_fraction))
        .ok()
        .map(PrimitiveDateTime::assume_utc)
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

#[cfg(feature = "serde")]
impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.raw)
    }
}

#[cfg(feature = "serde")]
impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::new(raw))
    }
}

/// Last known state of one LED as held by the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LedState {
    /// LED identifier.
    pub id: LedId,
    /// Last known power state.
    pub is_on: bool,
    /// True until the first refresh completes.
    pub is_loading: bool,
}

impl LedState {
    /// Loading placeholder created before the first refresh.
    #[must_use]
    pub fn placeholder(id: LedId) -> Self {
        Self {
            id,
            is_on: false,
            is_loading: true,
        }
    }

    /// Settled state after a refresh.
    #[must_use]
    pub fn loaded(id: LedId, is_on: bool) -> Self {
        Self {
            id,
            is_on,
            is_loading: false,
        }
    }

    /// Power state as an enum.
    #[must_use]
    pub fn power(&self) -> PowerState {
        PowerState::from(self.is_on)
    }
}

/// One timestamped state observation from the remote history log.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct HistoryRecord {
    /// When the event was recorded.
    pub timestamp: Timestamp,
    /// Recorded state.
    pub state: PowerState,
    /// Length of the session ending at this event, when the service reports it.
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub duration_seconds: Option<f64>,
    /// Start of the covered range, when reported.
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub range_start: Option<Timestamp>,
    /// End of the covered range, when reported.
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub range_end: Option<Timestamp>,
}

impl HistoryRecord {
    /// Create a record with no derived fields.
    pub fn new(timestamp: impl Into<String>, state: PowerState) -> Self {
        Self {
            timestamp: Timestamp::new(timestamp),
            state,
            duration_seconds: None,
            range_start: None,
            range_end: None,
        }
    }

    /// One listing line: `"{timestamp} → ON|OFF"`.
    #[must_use]
    pub fn summary_line(&self) -> String {
        format!("{} → {}", self.timestamp, self.state.short_label())
    }
}

/// Accumulated hours in one state for one LED (bar aggregation row).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TimeTotal {
    /// LED identifier.
    pub led_id: LedId,
    /// State the total refers to, if recognised.
    pub state: Option<PowerState>,
    /// Total hours spent in `state`.
    pub total_hours: f64,
}

/// One binary state sample for the line chart.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct StateSample {
    /// Sample time.
    pub timestamp: Timestamp,
    /// Sampled state.
    pub state: PowerState,
}

/// One on-session with its duration, as reported by the service.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SessionReport {
    /// Session start.
    pub start: Option<Timestamp>,
    /// Session end.
    pub end: Option<Timestamp>,
    /// Duration already formatted by the service (e.g. `00:05:12`).
    pub duration_label: Option<String>,
    /// Duration in seconds.
    pub duration_seconds: f64,
}

/// Which aggregate chart a series belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ChartKind {
    /// Total on-hours per LED across all LEDs (bar chart).
    #[cfg_attr(feature = "serde", serde(rename = "bar"))]
    OnTimeTotals,
    /// Binary state over time for one LED (line chart).
    #[cfg_attr(feature = "serde", serde(rename = "line"))]
    StateTimeline,
    /// Per-session durations for one LED (line chart or list).
    #[cfg_attr(feature = "serde", serde(rename = "duration"))]
    SessionDurations,
}

impl ChartKind {
    /// Every chart kind, in menu order.
    pub const ALL: [ChartKind; 3] = [
        ChartKind::OnTimeTotals,
        ChartKind::StateTimeline,
        ChartKind::SessionDurations,
    ];

    /// Short name used in configuration and on the command line.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::OnTimeTotals => "bar",
            Self::StateTimeline => "line",
            Self::SessionDurations => "duration",
        }
    }

    /// Whether this chart is drawn for a single LED.
    #[must_use]
    pub fn is_per_led(self) -> bool {
        !matches!(self, Self::OnTimeTotals)
    }
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ChartKind {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "bar" | "totals" => Ok(Self::OnTimeTotals),
            "line" | "timeline" => Ok(Self::StateTimeline),
            "duration" | "sessions" => Ok(Self::SessionDurations),
            other => Err(ParseError::InvalidValue(format!(
                "unknown chart kind '{}' (expected bar, line or duration)",
                other
            ))),
        }
    }
}

/// Title of the on-time bar chart.
pub const ON_TIME_TITLE: &str = "Horas Encendido por LED";

/// A chart-ready projection of an aggregate.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ChartSeries {
    /// Aggregate shape.
    pub kind: ChartKind,
    /// Chart title.
    pub title: String,
    /// Category or time labels, one per value.
    pub labels: Vec<String>,
    /// Numeric values.
    pub values: Vec<f64>,
    /// Axis unit suffix (`h`, `s`), if any.
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub unit: Option<String>,
}

impl ChartSeries {
    /// An empty dataset of the given kind.
    pub fn empty(kind: ChartKind, title: impl Into<String>) -> Self {
        Self {
            kind,
            title: title.into(),
            labels: Vec::new(),
            values: Vec::new(),
            unit: Self::unit_for(kind),
        }
    }

    /// Default title for a chart kind, optionally scoped to one LED.
    #[must_use]
    pub fn title_for(kind: ChartKind, led: Option<LedId>) -> String {
        match (kind, led) {
            (ChartKind::OnTimeTotals, _) => ON_TIME_TITLE.to_string(),
            (ChartKind::StateTimeline, Some(id)) => format!("Cambios de Estado LED {}", id),
            (ChartKind::StateTimeline, None) => "Cambios de Estado".to_string(),
            (ChartKind::SessionDurations, Some(id)) => format!("Duración de sesiones LED {}", id),
            (ChartKind::SessionDurations, None) => "Duración de sesiones".to_string(),
        }
    }

    fn unit_for(kind: ChartKind) -> Option<String> {
        match kind {
            ChartKind::OnTimeTotals => Some("h".to_string()),
            ChartKind::StateTimeline => None,
            ChartKind::SessionDurations => Some("s".to_string()),
        }
    }

    /// Project bar rows: one bar per distinct LED in first-seen order, valued
    /// with the hours of its first ON row (0 when it has none).
    ///
    /// # Examples
    ///
    /// ```
    /// use ledpanel_types::{ChartSeries, LedId, PowerState, TimeTotal};
    ///
    /// let rows = vec![
    ///     TimeTotal { led_id: LedId::new(1).unwrap(), state: Some(PowerState::On), total_hours: 5.0 },
    ///     TimeTotal { led_id: LedId::new(2).unwrap(), state: Some(PowerState::On), total_hours: 0.0 },
    /// ];
    /// let series = ChartSeries::on_time_totals(&rows);
    /// assert_eq!(series.labels, vec!["LED 1", "LED 2"]);
    /// assert_eq!(series.values, vec![5.0, 0.0]);
    /// ```
    #[must_use]
    pub fn on_time_totals(rows: &[TimeTotal]) -> Self {
        let mut ids: Vec<LedId> = Vec::new();
        for row in rows {
            if !ids.contains(&row.led_id) {
                ids.push(row.led_id);
            }
        }

        let values = ids
            .iter()
            .map(|id| {
                rows.iter()
                    .find(|r| r.led_id == *id && r.state == Some(PowerState::On))
                    .map(|r| r.total_hours)
                    .filter(|h| h.is_finite())
                    .unwrap_or(0.0)
            })
            .collect();

        Self {
            kind: ChartKind::OnTimeTotals,
            title: Self::title_for(ChartKind::OnTimeTotals, None),
            labels: ids.iter().map(|id| id.label()).collect(),
            values,
            unit: Self::unit_for(ChartKind::OnTimeTotals),
        }
    }

    /// Project state samples onto a 0/1 line labelled by time of day.
    #[must_use]
    pub fn state_timeline(id: LedId, samples: &[StateSample]) -> Self {
        Self {
            kind: ChartKind::StateTimeline,
            title: Self::title_for(ChartKind::StateTimeline, Some(id)),
            labels: samples.iter().map(|s| s.timestamp.time_of_day()).collect(),
            values: samples.iter().map(|s| f64::from(s.state.as_bit())).collect(),
            unit: Self::unit_for(ChartKind::StateTimeline),
        }
    }

    /// Project session reports onto `#1..#n` labelled durations in seconds.
    #[must_use]
    pub fn session_durations(id: LedId, reports: &[SessionReport]) -> Self {
        Self {
            kind: ChartKind::SessionDurations,
            title: Self::title_for(ChartKind::SessionDurations, Some(id)),
            labels: (1..=reports.len()).map(|n| format!("#{}", n)).collect(),
            values: reports
                .iter()
                .map(|r| {
                    if r.duration_seconds.is_finite() {
                        r.duration_seconds
                    } else {
                        0.0
                    }
                })
                .collect(),
            unit: Self::unit_for(ChartKind::SessionDurations),
        }
    }

    /// Whether the series has no points.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Number of points.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Largest value, or 0 for an empty series.
    #[must_use]
    pub fn max_value(&self) -> f64 {
        self.values.iter().copied().fold(0.0, f64::max)
    }

    /// Iterate `(label, value)` pairs.
    pub fn points(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.labels
            .iter()
            .map(String::as_str)
            .zip(self.values.iter().copied())
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn arb_row() -> impl Strategy<Value = TimeTotal> {
        (1u32..6, any::<bool>(), 0.0f64..1000.0).prop_map(|(id, on, hours)| TimeTotal {
            led_id: LedId::new(id).unwrap(),
            state: Some(PowerState::from(on)),
            total_hours: hours,
        })
    }

    proptest! {
        /// One bar per distinct LED, never a negative bar.
        #[test]
        fn on_time_totals_one_bar_per_led(rows in proptest::collection::vec(arb_row(), 0..20)) {
            let series = ChartSeries::on_time_totals(&rows);
            let mut distinct: Vec<LedId> = rows.iter().map(|r| r.led_id).collect();
            distinct.sort();
            distinct.dedup();
            prop_assert_eq!(series.labels.len(), distinct.len());
            prop_assert_eq!(series.values.len(), series.labels.len());
            prop_assert!(series.values.iter().all(|v| *v >= 0.0));
        }

        /// Timeline values are always 0 or 1.
        #[test]
        fn state_timeline_is_binary(bits in proptest::collection::vec(any::<bool>(), 0..50)) {
            let samples: Vec<StateSample> = bits
                .iter()
                .map(|on| StateSample { timestamp: Timestamp::new("x"), state: PowerState::from(*on) })
                .collect();
            let series = ChartSeries::state_timeline(LedId::new(1).unwrap(), &samples);
            prop_assert!(series.values.iter().all(|v| *v == 0.0 || *v == 1.0));
            prop_assert_eq!(series.len(), bits.len());
        }

        /// Arbitrary text never panics the timestamp parser.
        #[test]
        fn timestamp_never_panics(raw in ".*") {
            let ts = Timestamp::new(raw.clone());
            prop_assert_eq!(ts.as_str(), raw.as_str());
            let _ = ts.time_of_day();
        }
    }
}
