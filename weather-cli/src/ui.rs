//! Rendering of the weather screen.
//!
//! Every function here is a pure function of [`ScreenState`]: no I/O and no
//! mutation, so the same state always draws the same frame.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Style, Stylize},
    widgets::{Block, BorderType, Borders},
};
use weather_core::screen::ScreenState;

mod help_bar;
mod search_box;
mod weather_card;

pub const SPINNERS: [&str; 4] = ["◐", "◓", "◑", "◒"];
pub const ACCENT: Color = Color::Rgb(22, 160, 133);

pub fn render(frame: &mut Frame, area: Rect, state: &ScreenState) {
    let title = if state.is_loading() {
        format!(" ☁ Weather finder {} ", spinner(state.tick_count))
    } else {
        " ☁ Weather finder ".to_string()
    };

    let outer = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(Color::Rgb(80, 80, 100)))
        .title(title)
        .title_style(Style::default().fg(ACCENT).bold())
        .title_alignment(Alignment::Center);

    let inner = outer.inner(area);
    frame.render_widget(outer, area);

    let [body, search, help] = Layout::vertical([
        Constraint::Min(1),
        Constraint::Length(search_box::HEIGHT),
        Constraint::Length(1),
    ])
    .areas(inner);

    weather_card::render(frame, body, state);
    search_box::render(frame, search, &state.search);
    help_bar::render(frame, help, state.can_refresh());
}

pub fn spinner(tick: u32) -> &'static str {
    SPINNERS[(tick as usize / 2) % SPINNERS.len()]
}

/// Upper-case the first letter of every word ("broken clouds" -> "Broken Clouds").
pub fn capitalize_words(text: &str) -> String {
    text.split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
