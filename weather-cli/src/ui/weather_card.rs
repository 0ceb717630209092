use chrono::Local;
use ratatui::{
    Frame,
    layout::{Constraint, Flex, Layout, Rect},
    style::{Color, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};
use weather_core::{
    WeatherReading,
    screen::{ScreenState, View},
};

use super::{ACCENT, capitalize_words, spinner};

const ERROR_ICON: &str = "⚠ ";
const MIN_CARD_WIDTH: u16 = 24;

pub fn render(frame: &mut Frame, area: Rect, state: &ScreenState) {
    let lines = match state.view() {
        View::Loading => vec![
            Line::from(vec![
                Span::styled(spinner(state.tick_count), Style::default().fg(ACCENT)),
                Span::raw(" "),
                Span::styled("Fetching weather...", Style::default().fg(Color::Gray)),
            ])
            .centered(),
        ],
        View::Error(message) => vec![
            Line::from(vec![
                Span::styled(ERROR_ICON, Style::default().fg(Color::Red)),
                Span::styled(message.to_string(), Style::default().fg(Color::Red)),
            ])
            .centered(),
        ],
        View::Ready(reading) => reading_lines(reading),
        View::Empty => vec![
            Line::styled(
                "Type a city name and press Enter",
                Style::default().fg(Color::DarkGray),
            )
            .centered(),
        ],
    };

    let bordered = matches!(state.view(), View::Ready(_));
    let border = if bordered { 2 } else { 0 };

    let content_width = lines.iter().map(Line::width).max().unwrap_or(0);
    let width = u16::try_from(content_width)
        .unwrap_or(u16::MAX)
        .saturating_add(border)
        .max(MIN_CARD_WIDTH)
        .min(area.width);
    let inner_width = width.saturating_sub(border).max(1);
    let height = lines
        .iter()
        .map(|line| wrapped_rows(line, inner_width))
        .fold(border, u16::saturating_add);

    let [card] = Layout::vertical([Constraint::Length(height)])
        .flex(Flex::Center)
        .areas(area);
    let [card] = Layout::horizontal([Constraint::Length(width)])
        .flex(Flex::Center)
        .areas(card);

    let mut paragraph = Paragraph::new(lines).wrap(Wrap { trim: true });
    if bordered {
        paragraph = paragraph.block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray)),
        );
    }
    frame.render_widget(paragraph, card);
}

/// Rows `line` occupies once word-wrapped to `width` columns.
fn wrapped_rows(line: &Line, width: u16) -> u16 {
    let width = usize::from(width);
    let text: String = line.spans.iter().map(|span| span.content.as_ref()).collect();

    let mut rows = 1;
    let mut used = 0;
    for word in text.split_whitespace() {
        let word_width = Span::raw(word).width();
        if used == 0 {
            used = word_width;
        } else if used + 1 + word_width <= width {
            used += 1 + word_width;
        } else {
            rows += 1;
            used = word_width;
        }
        // Words longer than a row are broken across rows.
        while used > width {
            rows += 1;
            used -= width;
        }
    }
    rows
}

fn reading_lines(reading: &WeatherReading) -> Vec<Line<'static>> {
    let mut lines = vec![
        Line::styled(reading.place.clone(), Style::default().fg(Color::White).bold()).centered(),
        Line::styled(
            format!("{}°C", reading.temperature_c),
            Style::default().fg(ACCENT).bold(),
        )
        .centered(),
        Line::styled(
            capitalize_words(&reading.condition),
            Style::default().fg(Color::Gray),
        )
        .centered(),
    ];

    if let Some(observed) = reading.observed_at {
        lines.push(
            Line::styled(
                format!("Updated {}", observed.with_timezone(&Local).format("%H:%M")),
                Style::default().fg(Color::DarkGray),
            )
            .centered(),
        );
    }

    lines
}
