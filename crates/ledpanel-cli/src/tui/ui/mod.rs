//! Layout and rendering for the dashboard.
//!
//! The screen is split into:
//!
//! - **Header**: service URL, how many LEDs are on, last refresh time
//! - **Main content**: LED list (left) and chart panel (right)
//! - **Status bar**: spinner, status messages or key hints, and the clock
//!
//! Popups (error, history, help) are drawn last, on top of everything.

pub mod theme;

mod charts;
mod dashboard;
mod overlays;

use chrono::Local;
use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

use super::app::App;

/// Draw the complete interface.
pub fn draw(frame: &mut Frame, app: &App) {
    let main_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Header bar
            Constraint::Min(1),    // Main content
            Constraint::Length(1), // Status bar
        ])
        .split(frame.area());

    dashboard::draw_header(frame, main_layout[0], app);

    let content = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(36), Constraint::Min(20)])
        .split(main_layout[1]);
    dashboard::draw_led_list(frame, content[0], app);
    charts::draw_chart_panel(frame, content[1], app);

    draw_status_bar(frame, main_layout[2], app);

    if app.show_help {
        overlays::draw_help_overlay(frame, app);
    }
    if app.history.is_some() {
        overlays::draw_history_popup(frame, app);
    }
    if app.error.is_some() {
        overlays::draw_error_popup(frame, app);
    }
}

/// Key hints shown when nothing else needs the status bar.
fn context_hints(app: &App) -> Vec<(&'static str, &'static str)> {
    if app.has_popup() {
        return vec![("Esc", "close"), ("q", "quit")];
    }
    let mut hints = vec![("Enter", "toggle"), ("r", "refresh"), ("h", "history")];
    if !app.charts.is_empty() {
        hints.push(("b/l/d", "charts"));
    }
    hints.push(("?", "help"));
    hints.push(("q", "quit"));
    hints
}

fn draw_status_bar(frame: &mut Frame, area: Rect, app: &App) {
    let theme = app.app_theme();
    let time_str = Local::now().format("%H:%M:%S").to_string();

    let left_spans = if app.is_refreshing() {
        vec![
            Span::styled(
                format!(" {} ", app.spinner_char()),
                Style::default().fg(theme.primary),
            ),
            Span::styled("Refreshing...", Style::default().fg(theme.text_secondary)),
        ]
    } else if let Some(msg) = app.current_status_message() {
        vec![Span::styled(
            format!(" {}", msg),
            Style::default().fg(theme.text_secondary),
        )]
    } else {
        let mut spans = vec![Span::raw(" ")];
        for (i, (key, desc)) in context_hints(app).into_iter().enumerate() {
            if i > 0 {
                spans.push(Span::styled(" | ", Style::default().fg(theme.text_muted)));
            }
            spans.push(Span::styled(key, theme.key_style()));
            spans.push(Span::styled(
                format!(" {}", desc),
                Style::default().fg(theme.text_muted),
            ));
        }
        spans
    };

    let status_layout = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(1), Constraint::Length(10)])
        .split(area);

    frame.render_widget(Paragraph::new(Line::from(left_spans)), status_layout[0]);
    frame.render_widget(
        Paragraph::new(time_str)
            .style(Style::default().fg(theme.text_muted))
            .alignment(Alignment::Right),
        status_layout[1],
    );
}


#[cfg(test)]
mod tests {
    use super::test_support::{render, test_app};
    use super::*;
    use crate::tui::app::ErrorPopup;

    #[test]
    fn test_draw_shows_hints_when_idle() {
        let app = test_app();
        let screen = render(&app, 100, 20);
        assert!(screen.contains("Enter toggle"));
        assert!(screen.contains("? help"));
    }

    #[test]
    fn test_status_message_replaces_hints() {
        let mut app = test_app();
        app.push_status_message("LED 1: Encendido");
        let screen = render(&app, 100, 20);
        assert!(screen.contains("LED 1: Encendido"));
        assert!(!screen.contains("Enter toggle"));
    }

    #[test]
    fn test_popup_hints() {
        let mut app = test_app();
        app.error = Some(ErrorPopup {
            message: "No se pudo cambiar el estado del LED.".into(),
            details: "HTTP 500".into(),
        });
        assert_eq!(context_hints(&app), vec![("Esc", "close"), ("q", "quit")]);
    }

    #[test]
    fn test_draw_survives_tiny_terminal() {
        let app = test_app();
        let _ = render(&app, 10, 3);
    }
}
