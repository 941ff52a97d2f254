use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Clear, Paragraph, Widget, Wrap};

use crate::ui::theme::Theme;

pub struct ConfirmDialog<'a> {
    pub message: &'a str,
    pub theme: &'a Theme,
}

impl Widget for ConfirmDialog<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        Clear.render(area, buf);
        Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled(
                self.message,
                Style::default().fg(colors.fg()).add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(vec![
                Span::styled("[y] Yes  ", Style::default().fg(colors.error())),
                Span::styled("[n/Esc] No", Style::default().fg(colors.accent())),
            ]),
        ])
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(
            Block::bordered()
                .title(" Confirm ")
                .border_style(Style::default().fg(colors.warning()))
                .style(Style::default().bg(colors.bg())),
        )
        .render(area, buf);
    }
}
