//! Popups drawn over the dashboard.

use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use ledpanel_core::HistoryListing;

use super::theme::{AppTheme, BORDER_TYPE};
use crate::tui::app::App;

/// A rectangle of the given size centered in `area`, clamped to fit.
fn centered_rect(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width.saturating_sub(2));
    let height = height.min(area.height.saturating_sub(2));
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width, height)
}

/// Create a shortcut line with key and description.
fn shortcut_line<'a>(key: &str, desc: &str, theme: &AppTheme) -> Line<'a> {
    Line::from(vec![
        Span::styled(format!("{:>14} ", key), Style::default().fg(theme.warning)),
        Span::styled(desc.to_string(), Style::default().fg(theme.text_secondary)),
    ])
}

fn dismiss_line<'a>(theme: &AppTheme) -> Line<'a> {
    Line::from(vec![
        Span::styled("Press ", Style::default().fg(theme.text_muted)),
        Span::styled("Esc", theme.key_style()),
        Span::styled(" to close", Style::default().fg(theme.text_muted)),
    ])
}

/// Draw the help overlay.
pub(super) fn draw_help_overlay(frame: &mut Frame, app: &App) {
    let theme = app.app_theme();
    let help_area = centered_rect(frame.area(), 50, 17);
    frame.render_widget(Clear, help_area);

    let lines = vec![
        shortcut_line("j/k, ↑/↓", "Select LED", &theme),
        shortcut_line("Enter/Space/t", "Toggle LED", &theme),
        shortcut_line("r", "Refresh all LEDs", &theme),
        shortcut_line("h", "LED history", &theme),
        Line::from(""),
        shortcut_line("b", "On-hours per LED", &theme),
        shortcut_line("l", "State changes", &theme),
        shortcut_line("d", "Session durations", &theme),
        Line::from(""),
        shortcut_line("?", "Toggle help", &theme),
        shortcut_line("Esc", "Close popup", &theme),
        shortcut_line("q", "Quit", &theme),
        Line::from(""),
        dismiss_line(&theme),
    ];

    let help = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BORDER_TYPE)
            .border_style(Style::default().fg(theme.primary))
            .title(Span::styled(" Keyboard Shortcuts ", theme.title_style())),
    );
    frame.render_widget(help, help_area);
}

/// Draw the history popup for the selected LED.
pub(super) fn draw_history_popup(frame: &mut Frame, app: &App) {
    let Some(popup) = &app.history else {
        return;
    };
    let theme = app.app_theme();

    let area = frame.area();
    let popup_area = centered_rect(area, 48, area.height.saturating_sub(4).max(6));
    frame.render_widget(Clear, popup_area);

    let mut lines: Vec<Line> = match &popup.listing {
        None => vec![Line::from(vec![
            Span::styled(
                format!("{} ", app.spinner_char()),
                Style::default().fg(theme.primary),
            ),
            Span::styled("Loading...", Style::default().fg(theme.text_secondary)),
        ])],
        Some(listing) => {
            let color = match listing {
                HistoryListing::Failed(_) => theme.danger,
                HistoryListing::Empty => theme.text_muted,
                HistoryListing::Events(_) => theme.text_primary,
            };
            listing
                .lines()
                .into_iter()
                .map(|line| Line::from(Span::styled(line, Style::default().fg(color))))
                .collect()
        }
    };
    lines.push(Line::from(""));
    lines.push(dismiss_line(&theme));

    let body = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BORDER_TYPE)
            .border_style(Style::default().fg(theme.info))
            .title(Span::styled(
                format!(" {} ", HistoryListing::title(popup.id)),
                theme.title_style(),
            )),
    );
    frame.render_widget(body, popup_area);
}

/// Draw the modal error popup for a failed toggle.
pub(super) fn draw_error_popup(frame: &mut Frame, app: &App) {
    let Some(error) = &app.error else {
        return;
    };
    let theme = app.app_theme();

    let popup_area = centered_rect(frame.area(), 60, 10);
    frame.render_widget(Clear, popup_area);

    let mut lines = vec![
        Line::from(Span::styled(
            error.message.as_str(),
            Style::default()
                .fg(theme.danger)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
    ];
    if error.details != error.message {
        lines.push(Line::from(Span::styled(
            error.details.as_str(),
            Style::default().fg(theme.text_muted),
        )));
        lines.push(Line::from(""));
    }
    lines.push(dismiss_line(&theme));

    let popup = Paragraph::new(lines).wrap(Wrap { trim: true }).block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BORDER_TYPE)
            .border_style(Style::default().fg(theme.danger))
            .title(Span::styled(
                " Error ",
                Style::default()
                    .fg(theme.danger)
                    .add_modifier(Modifier::BOLD),
            )),
    );
    frame.render_widget(popup, popup_area);
}
