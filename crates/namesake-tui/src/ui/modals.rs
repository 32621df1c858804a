//! Modal dialog widgets.

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Widget};

use crate::app::input::InputState;
use crate::theme::Theme;

/// Text input dialog for renaming and searching.
pub struct InputModal<'a> {
    theme: &'a Theme,
    input: &'a InputState,
    title: &'a str,
    prompt: &'a str,
    hint: Option<&'a str>,
}

impl<'a> InputModal<'a> {
    /// Create a new input modal.
    pub fn new(theme: &'a Theme, input: &'a InputState, title: &'a str, prompt: &'a str) -> Self {
        Self {
            theme,
            input,
            title,
            prompt,
            hint: None,
        }
    }

    /// Muted line shown under the input, e.g. the extension that will be kept.
    pub fn hint(mut self, hint: &'a str) -> Self {
        self.hint = Some(hint);
        self
    }

    fn input_line(&self, width: u16) -> Line<'static> {
        let cursor_style = Style::default().add_modifier(Modifier::REVERSED);
        let chars: Vec<char> = self.input.buffer().chars().collect();
        let cursor = self.input.cursor().min(chars.len());
        let max_visible = (width as usize).saturating_sub(4).max(1);

        // Keep the cursor inside the visible slice
        let start = (cursor + 1).saturating_sub(max_visible);
        let end = (start + max_visible).min(chars.len());

        let before: String = chars[start..cursor].iter().collect();
        let at: String = chars
            .get(cursor)
            .map(|c| c.to_string())
            .unwrap_or_else(|| " ".to_string());
        let after: String = chars
            .get(cursor + 1..end.max(cursor + 1))
            .map(|s| s.iter().collect())
            .unwrap_or_default();

        let mut spans = vec![Span::raw("  ")];
        if !before.is_empty() {
            spans.push(Span::raw(before));
        }
        spans.push(Span::styled(at, cursor_style));
        if !after.is_empty() {
            spans.push(Span::raw(after));
        }
        Line::from(spans)
    }
}

impl Widget for InputModal<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let extra = u16::from(self.input.error().is_some()) * 2 + u16::from(self.hint.is_some());
        let popup_width = 50.min(area.width.saturating_sub(4));
        let popup_height = (7 + extra).min(area.height.saturating_sub(4));

        let popup_x = (area.width.saturating_sub(popup_width)) / 2 + area.x;
        let popup_y = (area.height.saturating_sub(popup_height)) / 2 + area.y;

        let popup_area = Rect::new(popup_x, popup_y, popup_width, popup_height);

        Clear.render(popup_area, buf);

        let block = Block::default()
            .title(format!(" {} ", self.title))
            .title_style(
                Style::default()
                    .fg(self.theme.info)
                    .add_modifier(Modifier::BOLD),
            )
            .borders(Borders::ALL)
            .border_style(self.theme.border);

        let inner = block.inner(popup_area);
        block.render(popup_area, buf);

        let mut lines = vec![
            Line::styled(self.prompt, self.theme.help_desc),
            Line::raw(""),
            self.input_line(inner.width),
        ];

        if let Some(hint) = self.hint {
            lines.push(Line::styled(
                format!("  {hint}"),
                Style::default().fg(self.theme.muted),
            ));
        }

        if let Some(error) = self.input.error() {
            lines.push(Line::raw(""));
            lines.push(Line::styled(
                format!("  {error}"),
                Style::default().fg(self.theme.error),
            ));
        }

        lines.push(Line::raw(""));
        lines.push(Line::from(vec![
            Span::styled(" Enter ", self.theme.help_key),
            Span::raw("Confirm  "),
            Span::styled(" Esc ", self.theme.help_key),
            Span::raw("Cancel"),
        ]));

        Paragraph::new(lines).render(inner, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line_text(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn test_input_line_scrolls_to_cursor() {
        let theme = Theme::dark();
        let input = InputState::with_initial("abcdefghij");
        let modal = InputModal::new(&theme, &input, "Rename", "New name:");

        // Room for 6 characters: the tail plus the cursor cell
        let text = line_text(&modal.input_line(10));
        assert_eq!(text, "  fghij ");
    }

    #[test]
    fn test_input_line_empty_buffer() {
        let theme = Theme::dark();
        let input = InputState::new();
        let modal = InputModal::new(&theme, &input, "Search", "Term:");
        assert_eq!(line_text(&modal.input_line(20)), "   ");
    }
}
