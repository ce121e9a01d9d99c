//! Chart panel: on-hours as bars, timelines and session durations as lines.

use ratatui::prelude::*;
use ratatui::symbols::Marker;
use ratatui::widgets::{
    Axis, Bar, BarChart, BarGroup, Block, Borders, Chart, Dataset, GraphType, Paragraph,
};

use ledpanel_core::NO_CHART_DATA;
use ledpanel_types::{ChartKind, ChartSeries, PowerState};

use super::theme::{AppTheme, BORDER_TYPE};
use crate::tui::app::App;

/// Bar values are integers; keep two decimals of precision.
const BAR_SCALE: f64 = 100.0;

pub(super) fn draw_chart_panel(frame: &mut Frame, area: Rect, app: &App) {
    let theme = app.app_theme();

    let title = match (&app.chart, app.chart_loading) {
        (_, Some(kind)) => format!(" {} Loading {} chart... ", app.spinner_char(), kind.name()),
        (Some(series), None) => format!(" {} ", series.title),
        (None, None) => " Chart ".to_string(),
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BORDER_TYPE)
        .border_style(theme.border_style())
        .title(title)
        .title_style(theme.title_style());
    let inner = block.inner(area);
    frame.render_widget(block, area);

    match &app.chart {
        None => {
            let text = if app.charts.is_empty() {
                "No charts enabled".to_string()
            } else {
                let keys: Vec<&str> = app
                    .charts
                    .iter()
                    .map(|kind| match kind {
                        ChartKind::OnTimeTotals => "b",
                        ChartKind::StateTimeline => "l",
                        ChartKind::SessionDurations => "d",
                    })
                    .collect();
                format!("Press {} to load a chart", keys.join("/"))
            };
            draw_placeholder(frame, inner, &text, &theme);
        }
        Some(series) if series.is_empty() => {
            draw_placeholder(frame, inner, NO_CHART_DATA, &theme);
        }
        Some(series) => match series.kind {
            ChartKind::OnTimeTotals => draw_bars(frame, inner, series, &theme),
            ChartKind::StateTimeline | ChartKind::SessionDurations => {
                draw_line(frame, inner, series, &theme)
            }
        },
    }
}

fn draw_placeholder(frame: &mut Frame, area: Rect, text: &str, theme: &AppTheme) {
    let para = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(
            text.to_string(),
            Style::default().fg(theme.text_muted),
        )),
    ])
    .alignment(Alignment::Center);
    frame.render_widget(para, area);
}

fn value_text(value: f64, unit: Option<&str>) -> String {
    let text = if value.fract() == 0.0 {
        format!("{:.0}", value)
    } else {
        format!("{:.1}", value)
    };
    format!("{}{}", text, unit.unwrap_or(""))
}

fn draw_bars(frame: &mut Frame, area: Rect, series: &ChartSeries, theme: &AppTheme) {
    let unit = series.unit.as_deref();
    let bars: Vec<Bar> = series
        .points()
        .map(|(label, value)| {
            Bar::default()
                .value((value.max(0.0) * BAR_SCALE).round() as u64)
                .text_value(value_text(value, unit))
                .label(Line::from(label.to_string()))
        })
        .collect();

    let count = u16::try_from(bars.len()).unwrap_or(u16::MAX).max(1);
    let bar_width = (area.width / count).saturating_sub(1).clamp(3, 12);

    let chart = BarChart::default()
        .data(BarGroup::default().bars(&bars))
        .bar_width(bar_width)
        .bar_gap(1)
        .bar_style(Style::default().fg(theme.primary))
        .value_style(
            Style::default()
                .fg(theme.text_primary)
                .add_modifier(Modifier::BOLD),
        )
        .label_style(Style::default().fg(theme.text_secondary));
    frame.render_widget(chart, area);
}

fn draw_line(frame: &mut Frame, area: Rect, series: &ChartSeries, theme: &AppTheme) {
    let data: Vec<(f64, f64)> = series
        .values
        .iter()
        .enumerate()
        .map(|(i, &v)| (i as f64, v))
        .collect();

    let (y_max, y_labels) = if series.kind == ChartKind::StateTimeline {
        (
            1.0,
            vec![
                Span::raw(PowerState::Off.short_label()),
                Span::raw(PowerState::On.short_label()),
            ],
        )
    } else {
        let max = series.max_value().max(1.0);
        let unit = series.unit.as_deref();
        (
            max,
            vec![
                Span::raw(value_text(0.0, unit)),
                Span::raw(value_text((max / 2.0).round(), unit)),
                Span::raw(value_text(max.round(), unit)),
            ],
        )
    };

    let x_labels: Vec<Span> = match (series.labels.first(), series.labels.last()) {
        (Some(first), Some(last)) if series.len() > 1 => {
            vec![Span::raw(first.clone()), Span::raw(last.clone())]
        }
        (Some(only), _) => vec![Span::raw(only.clone())],
        _ => Vec::new(),
    };
    let x_max = (series.len().saturating_sub(1) as f64).max(1.0);

    let dataset = Dataset::default()
        .marker(Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(theme.primary))
        .data(&data);

    let chart = Chart::new(vec![dataset])
        .x_axis(
            Axis::default()
                .style(Style::default().fg(theme.text_muted))
                .bounds([0.0, x_max])
                .labels(x_labels),
        )
        .y_axis(
            Axis::default()
                .style(Style::default().fg(theme.text_muted))
                .bounds([0.0, y_max])
                .labels(y_labels),
        );
    frame.render_widget(chart, area);
}
