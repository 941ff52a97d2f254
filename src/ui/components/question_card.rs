use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget, Wrap};

use quizr::bank::Question;
use quizr::session::runner::AnswerFeedback;

use crate::ui::theme::Theme;

const OPTION_KEYS: [char; 9] = ['1', '2', '3', '4', '5', '6', '7', '8', '9'];

/// A question with its options in bank order. Once answered, the chosen
/// option and the correct one are highlighted.
pub struct QuestionCard<'a> {
    pub title: &'a str,
    pub question: &'a Question,
    pub feedback: Option<AnswerFeedback>,
    pub cursor: usize,
    pub theme: &'a Theme,
}

impl Widget for QuestionCard<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .title(format!(" {} ", self.title))
            .border_style(Style::default().fg(colors.accent()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(4),
                Constraint::Min(0),
                Constraint::Length(3),
            ])
            .split(inner);

        Paragraph::new(Line::from(Span::styled(
            format!(" {}", self.question.prompt),
            Style::default().fg(colors.fg()).add_modifier(Modifier::BOLD),
        )))
        .wrap(Wrap { trim: false })
        .render(layout[0], buf);

        let mut lines: Vec<Line> = Vec::new();
        for (i, option) in self.question.options.iter().enumerate() {
            let key = OPTION_KEYS.get(i).copied().unwrap_or(' ');
            let mut style = Style::default().fg(colors.fg());
            let mut suffix = "";

            match self.feedback {
                Some(fb) if i == fb.correct_index => {
                    style = style.fg(colors.correct()).add_modifier(Modifier::BOLD);
                    suffix = "  \u{2713}";
                }
                Some(fb) if i == fb.chosen_index => {
                    style = style.fg(colors.incorrect()).add_modifier(Modifier::CROSSED_OUT);
                    suffix = "  \u{2717}";
                }
                Some(_) => style = style.fg(colors.muted()),
                None if i == self.cursor => {
                    style = style.bg(colors.selected_bg()).add_modifier(Modifier::BOLD);
                }
                None => {}
            }

            let indicator = if self.feedback.is_none() && i == self.cursor { ">" } else { " " };
            lines.push(Line::from(Span::styled(
                format!(" {indicator} [{key}] {option}{suffix}"),
                style,
            )));
            lines.push(Line::from(""));
        }
        Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .render(layout[1], buf);

        if let Some(fb) = self.feedback {
            let verdict = if fb.is_correct {
                Span::styled(" Correct!", Style::default().fg(colors.success()).add_modifier(Modifier::BOLD))
            } else {
                Span::styled(
                    format!(" Wrong \u{2014} the answer is: {}", self.question.correct_option()),
                    Style::default().fg(colors.error()).add_modifier(Modifier::BOLD),
                )
            };
            let mut feedback_lines = vec![Line::from(verdict)];
            if let Some(explanation) = &self.question.explanation {
                feedback_lines.push(Line::from(Span::styled(
                    format!(" {explanation}"),
                    Style::default().fg(colors.muted()),
                )));
            }
            Paragraph::new(feedback_lines)
                .wrap(Wrap { trim: false })
                .render(layout[2], buf);
        }
    }
}
