use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use quizr::bank::QuestionBank;
use quizr::session::quiz::QuizSetup;

use crate::ui::theme::Theme;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HomeFocus {
    Category,
    Count,
}

/// Category list on the left, question-count choices on the right.
pub struct HomeMenu<'a> {
    pub bank: &'a QuestionBank,
    pub setup: &'a QuizSetup,
    pub count_choices: &'a [usize],
    pub category_cursor: usize,
    pub count_cursor: usize,
    pub focus: HomeFocus,
    pub theme: &'a Theme,
}

impl HomeMenu<'_> {
    fn item_line(&self, text: String, is_cursor: bool, is_chosen: bool, focused: bool) -> Line<'static> {
        let colors = &self.theme.colors;
        let indicator = if is_cursor && focused { ">" } else { " " };
        let mark = if is_chosen { "\u{25CF}" } else { "\u{25CB}" };

        let mut style = Style::default().fg(if is_chosen { colors.accent() } else { colors.fg() });
        if is_cursor && focused {
            style = style.bg(colors.selected_bg()).add_modifier(Modifier::BOLD);
        }
        Line::from(Span::styled(format!(" {indicator} {mark} {text}"), style))
    }
}

impl Widget for HomeMenu<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .border_style(Style::default().fg(colors.border()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(4),
                Constraint::Min(0),
                Constraint::Length(2),
            ])
            .split(inner);

        let title = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled(
                "quizr",
                Style::default()
                    .fg(colors.accent())
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                "Pick a category and how many questions",
                Style::default().fg(colors.muted()),
            )),
        ])
        .alignment(Alignment::Center);
        title.render(layout[0], buf);

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(layout[1]);

        let focus_style = |focused: bool| {
            Style::default().fg(if focused {
                colors.border_focused()
            } else {
                colors.border()
            })
        };

        let category_focused = self.focus == HomeFocus::Category;
        let category_lines: Vec<Line> = self
            .bank
            .selectable_keys()
            .into_iter()
            .enumerate()
            .map(|(i, key)| {
                let text = format!(
                    "{} ({})",
                    self.bank.display_label(key),
                    self.bank.pool_size(key)
                );
                let chosen = self.setup.category.as_deref() == Some(key);
                self.item_line(text, i == self.category_cursor, chosen, category_focused)
            })
            .collect();
        Paragraph::new(category_lines)
            .block(
                Block::bordered()
                    .title(" Category ")
                    .border_style(focus_style(category_focused)),
            )
            .render(columns[0], buf);

        let count_focused = self.focus == HomeFocus::Count;
        let count_lines: Vec<Line> = self
            .count_choices
            .iter()
            .enumerate()
            .map(|(i, &n)| {
                let chosen = self.setup.count == Some(n);
                self.item_line(format!("{n} questions"), i == self.count_cursor, chosen, count_focused)
            })
            .collect();
        Paragraph::new(count_lines)
            .block(
                Block::bordered()
                    .title(" Questions ")
                    .border_style(focus_style(count_focused)),
            )
            .render(columns[1], buf);

        let status = if self.setup.is_ready() {
            Span::styled(
                "Ready \u{2014} press [Enter] to start",
                Style::default().fg(colors.success()),
            )
        } else {
            Span::styled(
                "Choose both a category and a question count to start",
                Style::default().fg(colors.muted()),
            )
        };
        Paragraph::new(Line::from(status))
            .alignment(Alignment::Center)
            .render(layout[2], buf);
    }
}
