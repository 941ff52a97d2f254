use std::time::{Duration, Instant};

use quizr::bank::QuestionBank;
use quizr::config::Config;
use quizr::session::quiz::{Outcome, QuizEvent, QuizPhase, QuizSession};
use quizr::session::result::QuizResult;
use quizr::store::history::HistoryStore;
use quizr::store::json_store::KeyValueStore;

use crate::ui::components::home_menu::HomeFocus;
use crate::ui::theme::Theme;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Modal {
    History,
    ConfirmClear,
}

pub struct Notice {
    pub text: String,
    pub is_error: bool,
    shown_at: Instant,
}

pub struct App {
    pub session: QuizSession,
    pub history: HistoryStore<Box<dyn KeyValueStore>>,
    pub config: Config,
    pub theme: &'static Theme,
    pub modal: Option<Modal>,
    pub history_entries: Vec<QuizResult>,
    pub home_focus: HomeFocus,
    pub category_cursor: usize,
    pub count_cursor: usize,
    pub option_cursor: usize,
    pub saved: bool,
    pub notice: Option<Notice>,
    pub should_quit: bool,
}

impl App {
    pub fn new(
        bank: QuestionBank,
        config: Config,
        store: Box<dyn KeyValueStore>,
        theme: &'static Theme,
    ) -> Self {
        let mut session = QuizSession::new(bank);
        session.set_date_format(&config.date_format);

        let mut category_cursor = 0;
        if let Some(key) = &config.default_category {
            session.choose_category(key);
            category_cursor = session
                .bank()
                .selectable_keys()
                .iter()
                .position(|k| *k == key.as_str())
                .unwrap_or(0);
        }
        let mut count_cursor = 0;
        if let Some(count) = config.default_count {
            session.choose_count(count);
            count_cursor = config
                .count_choices
                .iter()
                .position(|&n| n == count)
                .unwrap_or(0);
        }

        Self {
            session,
            history: HistoryStore::new(store),
            config,
            theme,
            modal: None,
            history_entries: Vec::new(),
            home_focus: HomeFocus::Category,
            category_cursor,
            count_cursor,
            option_cursor: 0,
            saved: false,
            notice: None,
            should_quit: false,
        }
    }

    fn dispatch(&mut self, event: QuizEvent) -> Outcome {
        let outcome = self.session.handle(event);
        match outcome {
            Outcome::Started => {
                self.option_cursor = 0;
                self.saved = false;
            }
            Outcome::NextQuestion | Outcome::ReviewStarted => self.option_cursor = 0,
            Outcome::Finished => self.notice = None,
            _ => {}
        }
        outcome
    }

    // Home

    pub fn category_count(&self) -> usize {
        self.session.bank().selectable_keys().len()
    }

    pub fn toggle_home_focus(&mut self) {
        self.home_focus = match self.home_focus {
            HomeFocus::Category => HomeFocus::Count,
            HomeFocus::Count => HomeFocus::Category,
        };
    }

    pub fn move_home_cursor(&mut self, down: bool) {
        let (cursor, len) = match self.home_focus {
            HomeFocus::Category => (&mut self.category_cursor, self.session.bank().selectable_keys().len()),
            HomeFocus::Count => (&mut self.count_cursor, self.config.count_choices.len()),
        };
        if len == 0 {
            return;
        }
        *cursor = if down {
            (*cursor + 1) % len
        } else {
            (*cursor + len - 1) % len
        };
    }

    /// Choose the item under the cursor in the focused list.
    pub fn select_home_item(&mut self) {
        match self.home_focus {
            HomeFocus::Category => {
                let key = self
                    .session
                    .bank()
                    .selectable_keys()
                    .get(self.category_cursor)
                    .map(|k| k.to_string());
                if let Some(key) = key {
                    self.dispatch(QuizEvent::ChooseCategory(key));
                    self.home_focus = HomeFocus::Count;
                }
            }
            HomeFocus::Count => {
                if let Some(&count) = self.config.count_choices.get(self.count_cursor) {
                    self.dispatch(QuizEvent::ChooseCount(count));
                }
            }
        }
    }

    pub fn start_quiz(&mut self) -> Outcome {
        self.dispatch(QuizEvent::Start)
    }

    // Quiz and review

    pub fn option_count(&self) -> usize {
        self.session
            .active_pass()
            .and_then(|p| p.current_question())
            .map_or(0, |q| q.options.len())
    }

    pub fn move_option_cursor(&mut self, down: bool) {
        let len = self.option_count();
        if len == 0 {
            return;
        }
        self.option_cursor = if down {
            (self.option_cursor + 1) % len
        } else {
            (self.option_cursor + len - 1) % len
        };
    }

    pub fn answer(&mut self, index: usize) -> Outcome {
        self.dispatch(QuizEvent::Answer(index))
    }

    pub fn answer_at_cursor(&mut self) -> Outcome {
        self.answer(self.option_cursor)
    }

    pub fn advance(&mut self) -> Outcome {
        self.dispatch(QuizEvent::Advance)
    }

    pub fn is_answered(&self) -> bool {
        self.session
            .active_pass()
            .is_some_and(|p| p.feedback().is_some())
    }

    // Results

    pub fn restart(&mut self) -> Outcome {
        self.dispatch(QuizEvent::Restart)
    }

    pub fn go_home(&mut self) {
        self.dispatch(QuizEvent::GoHome);
        self.modal = None;
        self.notice = None;
    }

    /// Persist the finished quiz once. Without a result this does nothing.
    pub fn save_result(&mut self) {
        if self.saved || !matches!(self.session.phase(), QuizPhase::Results { .. }) {
            return;
        }
        let Some(result) = self.session.last_result() else {
            return;
        };
        match self.history.append(result) {
            Ok(()) => {
                self.saved = true;
                self.show_notice("Result saved!", false);
            }
            Err(e) => {
                tracing::error!("failed to save result: {e:#}");
                self.show_notice("Could not save the result", true);
            }
        }
    }

    // History

    pub fn open_history(&mut self) {
        self.history_entries = self.history.load();
        self.modal = Some(Modal::History);
    }

    pub fn close_modal(&mut self) {
        self.modal = match self.modal {
            Some(Modal::ConfirmClear) => Some(Modal::History),
            _ => None,
        };
    }

    pub fn request_clear_history(&mut self) {
        if self.modal == Some(Modal::History) {
            self.modal = Some(Modal::ConfirmClear);
        }
    }

    pub fn confirm_clear_history(&mut self) {
        if self.modal != Some(Modal::ConfirmClear) {
            return;
        }
        if let Err(e) = self.history.clear() {
            tracing::error!("failed to clear history: {e:#}");
            self.show_notice("Could not clear history", true);
        }
        self.open_history();
    }

    // Notices

    fn show_notice(&mut self, text: &str, is_error: bool) {
        self.notice = Some(Notice {
            text: text.to_string(),
            is_error,
            shown_at: Instant::now(),
        });
    }

    pub fn tick(&mut self) {
        let ttl = Duration::from_secs(self.config.save_notice_secs);
        if self.notice.as_ref().is_some_and(|n| n.shown_at.elapsed() >= ttl) {
            self.notice = None;
        }
    }
}
