use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Constraint, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Cell, Clear, Paragraph, Row, Table, Widget};

use quizr::engine::scoring::HistoryBand;
use quizr::session::result::QuizResult;

use crate::ui::theme::Theme;

/// Saved results, newest first.
pub struct HistoryTable<'a> {
    pub entries: &'a [QuizResult],
    pub theme: &'a Theme,
}

impl Widget for HistoryTable<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        Clear.render(area, buf);
        let block = Block::bordered()
            .title(" History ")
            .title_bottom(Line::from(" [c] Clear  [Esc] Close ").alignment(Alignment::Right))
            .border_style(Style::default().fg(colors.accent()))
            .style(Style::default().bg(colors.bg()));

        if self.entries.is_empty() {
            Paragraph::new(vec![
                Line::from(""),
                Line::from("No saved results yet."),
                Line::from("Finish a quiz and press [s] to save it!"),
            ])
            .style(Style::default().fg(colors.muted()))
            .alignment(Alignment::Center)
            .block(block)
            .render(area, buf);
            return;
        }

        let header = Row::new(["Date", "Category", "Questions", "Score", "%", "Review"])
            .style(Style::default().fg(colors.accent()).add_modifier(Modifier::BOLD));

        let rows = self.entries.iter().map(|r| {
            let pct_color = match HistoryBand::from_percentage(r.percentage) {
                HistoryBand::High => colors.success(),
                HistoryBand::Mid => colors.warning(),
                HistoryBand::Low => colors.error(),
            };
            Row::new(vec![
                Cell::from(r.date.clone()),
                Cell::from(r.category.clone()),
                Cell::from(r.question_count.to_string()),
                Cell::from(r.score_text()).style(Style::default().add_modifier(Modifier::BOLD)),
                Cell::from(format!("{}%", r.percentage)).style(Style::default().fg(pct_color)),
                Cell::from(r.review_text()),
            ])
            .style(Style::default().fg(colors.fg()))
        });

        let widths = [
            Constraint::Length(12),
            Constraint::Min(12),
            Constraint::Length(9),
            Constraint::Length(7),
            Constraint::Length(5),
            Constraint::Length(7),
        ];

        Table::new(rows, widths)
            .header(header)
            .column_spacing(1)
            .block(block)
            .render(area, buf);
    }
}
