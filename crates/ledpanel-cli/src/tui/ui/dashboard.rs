//! Header and LED list.

use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, List, ListItem, Paragraph};

use super::theme::BORDER_TYPE;
use crate::tui::app::App;

/// Draw the one-line header.
pub(super) fn draw_header(frame: &mut Frame, area: Rect, app: &App) {
    let theme = app.app_theme();
    let on = app.leds.iter().filter(|led| led.is_on).count();

    let mut spans = vec![
        Span::styled(" ledpanel ", theme.title_style()),
        Span::styled(app.base_url.as_str(), Style::default().fg(theme.text_secondary)),
        Span::styled(
            format!("  {} of {} on", on, app.leds.len()),
            Style::default().fg(theme.text_primary),
        ),
    ];
    if let Some(at) = app.last_refresh {
        spans.push(Span::styled(
            format!("  updated {}", at.format("%H:%M:%S")),
            Style::default().fg(theme.text_muted),
        ));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Draw the LED list with state and action hint per row.
pub(super) fn draw_led_list(frame: &mut Frame, area: Rect, app: &App) {
    let theme = app.app_theme();

    let items: Vec<ListItem> = app
        .leds
        .iter()
        .enumerate()
        .map(|(i, led)| {
            let is_selected = i == app.selected;
            let marker = if is_selected { ">" } else { " " };

            let (icon, state, action, color) = if app.is_busy(led) {
                (app.spinner_char(), "...", "", theme.warning)
            } else {
                let power = led.power();
                let color = if led.is_on {
                    theme.success
                } else {
                    theme.text_muted
                };
                let icon = if led.is_on { "●" } else { "○" };
                (icon, power.label(), power.action_label(), color)
            };

            let line = Line::from(vec![
                Span::raw(format!("{} ", marker)),
                Span::styled(format!("{} ", icon), Style::default().fg(color)),
                Span::styled(
                    format!("{:<7}", led.id.label()),
                    Style::default().fg(theme.text_primary),
                ),
                Span::styled(format!("{:<10}", state), Style::default().fg(color)),
                Span::styled(
                    if action.is_empty() {
                        String::new()
                    } else {
                        format!("[{}]", action)
                    },
                    Style::default().fg(theme.info),
                ),
            ]);

            let item = ListItem::new(line);
            if is_selected {
                item.style(theme.selected_style())
            } else {
                item
            }
        })
        .collect();

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BORDER_TYPE)
            .border_style(theme.border_style())
            .title(format!(" LEDs ({}) ", app.leds.len()))
            .title_style(theme.title_style()),
    );
    frame.render_widget(list, area);
}
