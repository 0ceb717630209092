use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Style, Stylize},
    text::{Line, Span},
    widgets::Paragraph,
};

use super::ACCENT;

pub fn render(frame: &mut Frame, area: Rect, can_refresh: bool) {
    let key = |k: &'static str| Span::styled(k, Style::default().fg(ACCENT).bold());
    let label = |l: &'static str| Span::styled(l, Style::default().fg(Color::DarkGray));

    let mut spans = vec![key(" Enter"), label(" search  ")];
    if can_refresh {
        spans.push(key("F5"));
        spans.push(label(" refresh  "));
    }
    spans.push(key("Esc"));
    spans.push(label(" quit "));

    frame.render_widget(Paragraph::new(Line::from(spans).centered()), area);
}
