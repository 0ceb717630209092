use ratatui::{
    Frame,
    layout::{Position, Rect},
    style::{Color, Style},
    text::Line,
    widgets::{Block, Borders, Paragraph},
};

use super::ACCENT;

pub const HEIGHT: u16 = 3;
const PLACEHOLDER: &str = "Enter City Name";

pub fn render(frame: &mut Frame, area: Rect, text: &str) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(ACCENT))
        .title(" Search ");

    let inner = block.inner(area);

    // Scroll so the end of the text and the cursor after it stay in view.
    let typed = u16::try_from(Line::raw(text).width()).unwrap_or(u16::MAX);
    let offset = typed.saturating_sub(inner.width.saturating_sub(1));

    let paragraph = if text.is_empty() {
        Paragraph::new(PLACEHOLDER).style(Style::default().fg(Color::DarkGray))
    } else {
        Paragraph::new(text)
            .style(Style::default().fg(Color::White))
            .scroll((0, offset))
    };
    frame.render_widget(paragraph.block(block), area);

    if inner.width > 0 && inner.height > 0 {
        let x = inner.x + (typed - offset).min(inner.width - 1);
        frame.set_cursor_position(Position::new(x, inner.y));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::testing::buffer_to_string;
    use ratatui::{Terminal, backend::TestBackend};

    fn draw(width: u16, text: &str) -> (String, Position) {
        let mut terminal = Terminal::new(TestBackend::new(width, HEIGHT)).unwrap();
        terminal
            .draw(|frame| render(frame, frame.area(), text))
            .unwrap();
        let cursor = terminal.get_cursor_position().unwrap();
        (buffer_to_string(terminal.backend().buffer()), cursor)
    }

    #[test]
    fn long_text_keeps_its_tail_visible() {
        let text = format!("{}END", "x".repeat(40));
        let (output, cursor) = draw(20, &text);

        assert!(output.contains("END"), "{output}");
        assert_eq!(cursor, Position::new(18, 1));
    }

    #[test]
    fn cursor_counts_display_width() {
        let (_, cursor) = draw(30, "東京");
        assert_eq!(cursor, Position::new(5, 1));

        let (_, cursor) = draw(30, "Paris");
        assert_eq!(cursor, Position::new(6, 1));
    }
}
