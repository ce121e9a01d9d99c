//! Output formatting utilities for text, JSON, and CSV output.

use anyhow::Result;
use owo_colors::OwoColorize;
use serde::Serialize;
use tabled::builder::Builder;

use ledpanel_core::{HistoryListing, NO_CHART_DATA};
use ledpanel_types::{ChartSeries, HistoryRecord, LedId, LedState, PowerState, SessionReport};

use crate::cli::StyleMode;
use crate::style;

/// Formatting options for output.
#[derive(Debug, Clone, Copy)]
pub struct FormatOptions {
    /// Disable colored output.
    pub no_color: bool,
    /// Omit header row in CSV output.
    pub no_header: bool,
    /// Use compact JSON output (no pretty-printing).
    pub compact: bool,
    /// Visual styling mode.
    pub style: StyleMode,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            no_color: false,
            no_header: false,
            compact: false,
            style: StyleMode::Rich,
        }
    }
}

impl FormatOptions {
    pub fn new(no_color: bool, style: StyleMode) -> Self {
        // Plain mode automatically disables colors for pipe-friendliness
        let effective_no_color = no_color || style == StyleMode::Plain;
        Self {
            no_color: effective_no_color,
            no_header: false,
            compact: false,
            style,
        }
    }

    /// Check if rich styling is enabled.
    pub fn is_rich(&self) -> bool {
        self.style == StyleMode::Rich
    }

    /// Create with no_header option for CSV output.
    pub fn with_no_header(mut self, no_header: bool) -> Self {
        self.no_header = no_header;
        self
    }

    /// Create with compact JSON option.
    pub fn with_compact(mut self, compact: bool) -> Self {
        self.compact = compact;
        self
    }

    /// Serialize value to JSON string, respecting compact option.
    pub fn as_json<T: Serialize>(&self, value: &T) -> Result<String> {
        let json = if self.compact {
            serde_json::to_string(value)?
        } else {
            serde_json::to_string_pretty(value)?
        };
        Ok(json + "\n")
    }

    fn csv_header(&self, header: &str) -> String {
        if self.no_header {
            String::new()
        } else {
            format!("{}\n", header)
        }
    }
}

/// Escape a string for CSV output.
/// Wraps the value in quotes if it contains commas, quotes, or newlines.
/// Double quotes are escaped by doubling them.
#[must_use]
pub fn csv_escape(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') || s.contains('\r') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

/// Format seconds as `HH:MM:SS`.
#[must_use]
pub fn format_duration(seconds: f64) -> String {
    let total = if seconds.is_finite() && seconds > 0.0 {
        seconds.round() as u64
    } else {
        0
    };
    format!(
        "{:02}:{:02}:{:02}",
        total / 3600,
        (total % 3600) / 60,
        total % 60
    )
}

/// Format a chart value with its unit, dropping a zero fraction.
#[must_use]
pub fn format_value(value: f64, unit: Option<&str>) -> String {
    let number = if value.fract() == 0.0 {
        format!("{:.0}", value)
    } else {
        format!("{:.2}", value)
    };
    match unit {
        Some(unit) => format!("{}{}", number, unit),
        None => number,
    }
}

// ============================================================================
// Status formatting
// ============================================================================

#[derive(Serialize)]
struct LedStateJson {
    id: u32,
    is_on: bool,
    is_loading: bool,
    state: &'static str,
}

impl From<&LedState> for LedStateJson {
    fn from(led: &LedState) -> Self {
        Self {
            id: led.id.get(),
            is_on: led.is_on,
            is_loading: led.is_loading,
            state: led.power().as_wire(),
        }
    }
}

#[must_use]
pub fn format_status_text(leds: &[LedState], opts: &FormatOptions) -> String {
    if leds.is_empty() {
        return "No LEDs configured.\n".to_string();
    }

    let mut builder = Builder::default();
    builder.push_record(["LED", "State", "Action"]);
    for led in leds {
        let (state, action) = if led.is_loading {
            ("...".to_string(), String::new())
        } else {
            (
                style::format_power_colored(led.power(), opts.no_color),
                led.power().action_label().to_string(),
            )
        };
        builder.push_record([led.id.label(), state, action]);
    }

    let mut table = builder.build();
    style::apply_table_style(&mut table, opts.style);

    let on = leds.iter().filter(|led| led.is_on).count();
    let mut output = table.to_string();
    output.push('\n');
    if opts.is_rich() {
        output.push_str(&format!("{} of {} on\n", on, leds.len()));
    }
    output
}

pub fn format_status_json(leds: &[LedState], opts: &FormatOptions) -> Result<String> {
    let rows: Vec<LedStateJson> = leds.iter().map(LedStateJson::from).collect();
    opts.as_json(&rows)
}

#[must_use]
pub fn format_status_csv(leds: &[LedState], opts: &FormatOptions) -> String {
    let mut output = opts.csv_header("led_id,state,is_loading");
    for led in leds {
        output.push_str(&format!(
            "{},{},{}\n",
            led.id,
            led.power().as_wire(),
            led.is_loading
        ));
    }
    output
}

// ============================================================================
// State change formatting
// ============================================================================

#[must_use]
pub fn format_change_text(id: LedId, state: PowerState, opts: &FormatOptions) -> String {
    let message = format!(
        "{}: {}",
        id.label(),
        style::format_power_colored(state, opts.no_color)
    );
    format!("{}\n", style::format_success(&message, opts.no_color))
}

pub fn format_change_json(id: LedId, state: PowerState, opts: &FormatOptions) -> Result<String> {
    opts.as_json(&LedStateJson::from(&LedState::loaded(id, state.is_on())))
}

#[must_use]
pub fn format_change_csv(id: LedId, state: PowerState, opts: &FormatOptions) -> String {
    let mut output = opts.csv_header("led_id,state");
    output.push_str(&format!("{},{}\n", id, state.as_wire()));
    output
}

// ============================================================================
// History formatting
// ============================================================================

#[must_use]
pub fn format_history_text(id: LedId, listing: &HistoryListing, opts: &FormatOptions) -> String {
    let title = HistoryListing::title(id);
    let body = if listing.is_failed() && !opts.no_color {
        listing.render().red().to_string()
    } else {
        listing.render()
    };
    format!("{}\n{}\n", style::format_title(&title, opts.no_color), body)
}

pub fn format_history_json(records: &[HistoryRecord], opts: &FormatOptions) -> Result<String> {
    opts.as_json(&records)
}

#[must_use]
pub fn format_history_csv(records: &[HistoryRecord], opts: &FormatOptions) -> String {
    let mut output = opts.csv_header("timestamp,state,duration_seconds");
    for record in records {
        let duration = record
            .duration_seconds
            .map(|d| d.to_string())
            .unwrap_or_default();
        output.push_str(&format!(
            "{},{},{}\n",
            csv_escape(record.timestamp.as_str()),
            record.state.as_wire(),
            duration
        ));
    }
    output
}

// ============================================================================
// Chart formatting
// ============================================================================

/// Render a series as horizontal bars scaled to the terminal width.
#[must_use]
pub fn format_chart_text(series: &ChartSeries, opts: &FormatOptions) -> String {
    format_chart_text_with_width(series, opts, style::terminal_width())
}

fn format_chart_text_with_width(series: &ChartSeries, opts: &FormatOptions, width: usize) -> String {
    let mut output = format!("{}\n", style::format_title(&series.title, opts.no_color));
    if series.is_empty() {
        output.push_str(NO_CHART_DATA);
        output.push('\n');
        return output;
    }

    let unit = series.unit.as_deref();
    let label_width = series
        .labels
        .iter()
        .map(|l| l.chars().count())
        .max()
        .unwrap_or(0);
    let value_width = series
        .values
        .iter()
        .map(|v| format_value(*v, unit).len())
        .max()
        .unwrap_or(0);
    let bar_width = width.saturating_sub(label_width + value_width + 4).max(10);
    let max = series.max_value();

    for (label, value) in series.points() {
        let len = if max > 0.0 {
            ((value / max) * bar_width as f64).round() as usize
        } else {
            0
        };
        let bar = "█".repeat(len);
        let bar = if opts.no_color {
            bar
        } else {
            bar.cyan().to_string()
        };
        output.push_str(&format!(
            "{:>lw$} │{} {}\n",
            label,
            bar,
            format_value(value, unit),
            lw = label_width
        ));
    }
    output
}

pub fn format_chart_json(series: &ChartSeries, opts: &FormatOptions) -> Result<String> {
    opts.as_json(series)
}

#[must_use]
pub fn format_chart_csv(series: &ChartSeries, opts: &FormatOptions) -> String {
    let mut output = opts.csv_header("label,value");
    for (label, value) in series.points() {
        output.push_str(&format!("{},{}\n", csv_escape(label), value));
    }
    output
}

// ============================================================================
// Session formatting
// ============================================================================

fn session_label(report: &SessionReport) -> String {
    report
        .duration_label
        .clone()
        .unwrap_or_else(|| format_duration(report.duration_seconds))
}

fn timestamp_or_dash(ts: Option<&ledpanel_types::Timestamp>) -> String {
    ts.map(|t| t.as_str().to_string())
        .unwrap_or_else(|| "-".to_string())
}

#[must_use]
pub fn format_sessions_text(id: LedId, reports: &[SessionReport], opts: &FormatOptions) -> String {
    let title = ChartSeries::title_for(ledpanel_types::ChartKind::SessionDurations, Some(id));
    let mut output = format!("{}\n", style::format_title(&title, opts.no_color));
    if reports.is_empty() {
        output.push_str(NO_CHART_DATA);
        output.push('\n');
        return output;
    }

    let mut builder = Builder::default();
    builder.push_record(["#", "Start", "End", "Duration"]);
    for (i, report) in reports.iter().enumerate() {
        builder.push_record([
            (i + 1).to_string(),
            timestamp_or_dash(report.start.as_ref()),
            timestamp_or_dash(report.end.as_ref()),
            session_label(report),
        ]);
    }
    let mut table = builder.build();
    style::apply_table_style(&mut table, opts.style);
    output.push_str(&table.to_string());
    output.push('\n');

    let total: f64 = reports
        .iter()
        .map(|r| r.duration_seconds)
        .filter(|s| s.is_finite())
        .sum();
    output.push_str(&format!(
        "{} session(s), {} total\n",
        reports.len(),
        format_duration(total)
    ));
    output
}

pub fn format_sessions_json(reports: &[SessionReport], opts: &FormatOptions) -> Result<String> {
    opts.as_json(&reports)
}

#[must_use]
pub fn format_sessions_csv(reports: &[SessionReport], opts: &FormatOptions) -> String {
    let mut output = opts.csv_header("start,end,duration_label,duration_seconds");
    for report in reports {
        output.push_str(&format!(
            "{},{},{},{}\n",
            report
                .start
                .as_ref()
                .map(|t| csv_escape(t.as_str()))
                .unwrap_or_default(),
            report
                .end
                .as_ref()
                .map(|t| csv_escape(t.as_str()))
                .unwrap_or_default(),
            csv_escape(&session_label(report)),
            report.duration_seconds
        ));
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use ledpanel_types::{ChartKind, TimeTotal, Timestamp};

    fn id(n: u32) -> LedId {
        LedId::new(n).unwrap()
    }

    fn plain() -> FormatOptions {
        FormatOptions::new(true, StyleMode::Plain)
    }

    #[test]
    fn test_plain_mode_disables_color() {
        let opts = FormatOptions::new(false, StyleMode::Plain);
        assert!(opts.no_color);
        assert!(!opts.is_rich());
        assert!(!FormatOptions::new(false, StyleMode::Rich).no_color);
    }

    #[test]
    fn test_csv_escape() {
        assert_eq!(csv_escape("simple"), "simple");
        assert_eq!(csv_escape("a,b"), "\"a,b\"");
        assert_eq!(csv_escape("say \"hi\""), "\"say \"\"hi\"\"\"");
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(0.0), "00:00:00");
        assert_eq!(format_duration(312.0), "00:05:12");
        assert_eq!(format_duration(3723.4), "01:02:03");
        assert_eq!(format_duration(f64::NAN), "00:00:00");
    }

    #[test]
    fn test_format_value() {
        assert_eq!(format_value(5.0, Some("h")), "5h");
        assert_eq!(format_value(1.25, Some("h")), "1.25h");
        assert_eq!(format_value(1.0, None), "1");
    }

    #[test]
    fn test_status_text_lists_every_led() {
        let leds = vec![
            LedState::loaded(id(1), true),
            LedState::loaded(id(2), false),
            LedState::placeholder(id(3)),
        ];
        let text = format_status_text(&leds, &plain());
        assert!(text.contains("LED 1"));
        assert!(text.contains("Encendido"));
        assert!(text.contains("Apagar"));
        assert!(text.contains("Apagado"));
        assert!(text.contains("Encender"));
        assert!(text.contains("..."));
    }

    #[test]
    fn test_status_csv() {
        let leds = vec![LedState::loaded(id(1), true), LedState::loaded(id(2), false)];
        assert_eq!(
            format_status_csv(&leds, &plain()),
            "led_id,state,is_loading\n1,ENCENDIDO,false\n2,APAGADO,false\n"
        );
        assert_eq!(
            format_status_csv(&leds, &plain().with_no_header(true)),
            "1,ENCENDIDO,false\n2,APAGADO,false\n"
        );
    }

    #[test]
    fn test_status_json() {
        let leds = vec![LedState::loaded(id(4), true)];
        let json = format_status_json(&leds, &plain().with_compact(true)).unwrap();
        assert_eq!(
            json,
            "[{\"id\":4,\"is_on\":true,\"is_loading\":false,\"state\":\"ENCENDIDO\"}]\n"
        );
    }

    #[test]
    fn test_change_output() {
        assert_eq!(
            format_change_text(id(2), PowerState::On, &plain()),
            "[OK] LED 2: Encendido\n"
        );
        assert_eq!(
            format_change_csv(id(2), PowerState::Off, &plain()),
            "led_id,state\n2,APAGADO\n"
        );
    }

    #[test]
    fn test_history_text() {
        let listing = HistoryListing::from_records(vec![HistoryRecord::new("T1", PowerState::On)]);
        let text = format_history_text(id(1), &listing, &plain());
        assert!(text.starts_with("Historial LED 1\n"));
        assert!(text.ends_with("T1 → ON\n"));

        let empty = format_history_text(id(1), &HistoryListing::Empty, &plain());
        assert!(empty.ends_with("Sin eventos.\n"));
    }

    #[test]
    fn test_history_csv() {
        let mut record = HistoryRecord::new("2024-05-01T10:00:00Z", PowerState::Off);
        record.duration_seconds = Some(90.0);
        assert_eq!(
            format_history_csv(&[record], &plain()),
            "timestamp,state,duration_seconds\n2024-05-01T10:00:00Z,APAGADO,90\n"
        );
    }

    #[test]
    fn test_chart_text_empty() {
        let series = ChartSeries::empty(ChartKind::OnTimeTotals, "Horas Encendido por LED");
        let text = format_chart_text(&series, &plain());
        assert!(text.ends_with("No hay datos para mostrar.\n"));
    }

    #[test]
    fn test_chart_text_scales_bars() {
        let series = ChartSeries::on_time_totals(&[
            TimeTotal {
                led_id: id(1),
                state: Some(PowerState::On),
                total_hours: 10.0,
            },
            TimeTotal {
                led_id: id(2),
                state: Some(PowerState::On),
                total_hours: 5.0,
            },
        ]);
        let text = format_chart_text_with_width(&series, &plain(), 40);
        let lines: Vec<&str> = text.lines().collect();
        // title, underline, two bars
        assert_eq!(lines.len(), 4);
        let full = lines[2].matches('█').count();
        let half = lines[3].matches('█').count();
        assert_eq!(full, 28);
        assert_eq!(half, 14);
        assert!(lines[2].ends_with("10h"));
        assert!(lines[3].starts_with("LED 2 │"));
    }

    #[test]
    fn test_chart_csv() {
        let series = ChartSeries {
            kind: ChartKind::StateTimeline,
            title: "Cambios de Estado LED 1".to_string(),
            labels: vec!["08:00:00".to_string(), "09:00:00".to_string()],
            values: vec![1.0, 0.0],
            unit: None,
        };
        assert_eq!(
            format_chart_csv(&series, &plain()),
            "label,value\n08:00:00,1\n09:00:00,0\n"
        );
    }

    #[test]
    fn test_sessions_text_prefers_server_label() {
        let reports = vec![
            SessionReport {
                start: Some(Timestamp::new("A")),
                end: Some(Timestamp::new("B")),
                duration_label: Some("00:02:00".to_string()),
                duration_seconds: 120.0,
            },
            SessionReport {
                start: None,
                end: None,
                duration_label: None,
                duration_seconds: 61.0,
            },
        ];
        let text = format_sessions_text(id(3), &reports, &plain());
        assert!(text.starts_with("Duración de sesiones LED 3\n"));
        assert!(text.contains("00:02:00"));
        assert!(text.contains("00:01:01"));
        assert!(text.contains("2 session(s), 00:03:01 total"));
    }

    #[test]
    fn test_sessions_csv() {
        let reports = vec![SessionReport {
            start: Some(Timestamp::new("A")),
            end: None,
            duration_label: None,
            duration_seconds: 5.0,
        }];
        assert_eq!(
            format_sessions_csv(&reports, &plain().with_no_header(true)),
            "A,,00:00:05,5\n"
        );
    }
}
