use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget, Wrap};

use quizr::engine::scoring::ScoreTier;
use quizr::session::result::QuizResult;
use quizr::session::runner::WrongAnswer;

use crate::ui::theme::Theme;

pub struct ResultsPanel<'a> {
    pub result: &'a QuizResult,
    pub wrong_answers: &'a [WrongAnswer],
    pub theme: &'a Theme,
}

impl Widget for ResultsPanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let result = self.result;

        let block = Block::bordered()
            .title(" Quiz Complete ")
            .border_style(Style::default().fg(colors.accent()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2),
                Constraint::Length(2),
                Constraint::Length(2),
                Constraint::Min(0),
            ])
            .split(inner);

        let tier = result.tier();
        Paragraph::new(Line::from(vec![
            Span::raw(format!("{}  ", tier.emoji())),
            Span::styled(
                tier.headline(),
                Style::default()
                    .fg(colors.accent())
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!("  \u{2014} {}", result.category),
                Style::default().fg(colors.muted()),
            ),
        ]))
        .alignment(Alignment::Center)
        .render(layout[0], buf);

        let score_color = match tier {
            ScoreTier::Top | ScoreTier::High => colors.success(),
            ScoreTier::Mid => colors.warning(),
            ScoreTier::Low => colors.error(),
        };
        Paragraph::new(Line::from(vec![
            Span::styled("  Score:   ", Style::default().fg(colors.fg())),
            Span::styled(
                result.score_text(),
                Style::default().fg(score_color).add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!("  ({}% correct)", result.percentage),
                Style::default().fg(colors.muted()),
            ),
        ]))
        .render(layout[1], buf);

        let review_line = match result.review() {
            Some(review) => Line::from(vec![
                Span::styled("  Review:  ", Style::default().fg(colors.fg())),
                Span::styled(
                    format!("{}/{}", review.score, review.total),
                    Style::default().fg(colors.accent()).add_modifier(Modifier::BOLD),
                ),
                Span::styled(
                    format!("  ({}% fixed)", review.percentage),
                    Style::default().fg(colors.muted()),
                ),
            ]),
            None => Line::from(vec![
                Span::styled("  Review:  ", Style::default().fg(colors.fg())),
                Span::styled(
                    "n/a \u{2014} no mistakes to review",
                    Style::default().fg(colors.muted()),
                ),
            ]),
        };
        Paragraph::new(review_line).render(layout[2], buf);

        if self.wrong_answers.is_empty() {
            return;
        }

        let mut lines = Vec::with_capacity(self.wrong_answers.len() * 3);
        for wrong in self.wrong_answers {
            lines.push(Line::from(Span::styled(
                format!("\u{2022} {}", wrong.question.prompt),
                Style::default().fg(colors.fg()).add_modifier(Modifier::BOLD),
            )));
            lines.push(Line::from(vec![
                Span::styled("  Your answer: ", Style::default().fg(colors.muted())),
                Span::styled(wrong.your_answer.clone(), Style::default().fg(colors.incorrect())),
                Span::styled("  \u{2192}  Correct: ", Style::default().fg(colors.muted())),
                Span::styled(
                    wrong.question.correct_option().to_string(),
                    Style::default().fg(colors.correct()),
                ),
            ]));
            lines.push(Line::from(""));
        }
        Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .block(
                Block::bordered()
                    .title(format!(" Missed questions ({}) ", self.wrong_answers.len()))
                    .border_style(Style::default().fg(colors.border())),
            )
            .render(layout[3], buf);
    }
}
