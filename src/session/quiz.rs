use chrono::Local;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::bank::{Question, QuestionBank};
use crate::engine::selector;
use crate::session::result::QuizResult;
use crate::session::runner::{AnswerFeedback, PassKind, PassRunner, PassState};

pub const DEFAULT_DATE_FORMAT: &str = "%d.%m.%Y";

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct QuizSetup {
    pub category: Option<String>,
    pub count: Option<usize>,
}

impl QuizSetup {
    pub fn is_ready(&self) -> bool {
        self.category.is_some() && self.count.is_some()
    }
}

#[derive(Clone, Debug)]
pub enum QuizPhase {
    Home,
    InQuiz(PassRunner),
    InReview {
        primary: PassRunner,
        review: PassRunner,
    },
    Results {
        primary: PassRunner,
        review: Option<PassRunner>,
    },
}

impl QuizPhase {
    pub fn name(&self) -> &'static str {
        match self {
            QuizPhase::Home => "home",
            QuizPhase::InQuiz(_) => "quiz",
            QuizPhase::InReview { .. } => "review",
            QuizPhase::Results { .. } => "results",
        }
    }
}

/// Input the session reacts to. Anything that does not apply to the current
/// phase is ignored.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum QuizEvent {
    ChooseCategory(String),
    ChooseCount(usize),
    Start,
    Answer(usize),
    Advance,
    Restart,
    GoHome,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    Ignored,
    SetupChanged,
    Started,
    Answered(AnswerFeedback),
    NextQuestion,
    ReviewStarted,
    Finished,
    Home,
}

pub struct QuizSession<R = SmallRng> {
    bank: QuestionBank,
    setup: QuizSetup,
    phase: QuizPhase,
    last_result: Option<QuizResult>,
    date_format: String,
    rng: R,
}

impl QuizSession<SmallRng> {
    pub fn new(bank: QuestionBank) -> Self {
        Self::with_rng(bank, SmallRng::from_entropy())
    }
}

impl<R: Rng> QuizSession<R> {
    pub fn with_rng(bank: QuestionBank, rng: R) -> Self {
        Self {
            bank,
            setup: QuizSetup::default(),
            phase: QuizPhase::Home,
            last_result: None,
            date_format: DEFAULT_DATE_FORMAT.to_string(),
            rng,
        }
    }

    pub fn set_date_format(&mut self, format: &str) {
        self.date_format = format.to_string();
    }

    pub fn bank(&self) -> &QuestionBank {
        &self.bank
    }

    pub fn setup(&self) -> &QuizSetup {
        &self.setup
    }

    pub fn phase(&self) -> &QuizPhase {
        &self.phase
    }

    pub fn last_result(&self) -> Option<&QuizResult> {
        self.last_result.as_ref()
    }

    pub fn category_label(&self) -> &str {
        match self.setup.category.as_deref() {
            Some(key) => self.bank.display_label(key),
            None => "",
        }
    }

    /// The pass currently taking answers, if any.
    pub fn active_pass(&self) -> Option<&PassRunner> {
        match &self.phase {
            QuizPhase::InQuiz(primary) => Some(primary),
            QuizPhase::InReview { review, .. } => Some(review),
            _ => None,
        }
    }

    pub fn handle(&mut self, event: QuizEvent) -> Outcome {
        match event {
            QuizEvent::ChooseCategory(key) => self.choose_category(&key),
            QuizEvent::ChooseCount(count) => self.choose_count(count),
            QuizEvent::Start => self.start(),
            QuizEvent::Answer(index) => self.answer(index),
            QuizEvent::Advance => self.advance(),
            QuizEvent::Restart => self.restart(),
            QuizEvent::GoHome => self.go_home(),
        }
    }

    pub fn choose_category(&mut self, key: &str) -> Outcome {
        if !matches!(self.phase, QuizPhase::Home) || !self.bank.contains(key) {
            return Outcome::Ignored;
        }
        self.setup.category = Some(key.to_string());
        Outcome::SetupChanged
    }

    pub fn choose_count(&mut self, count: usize) -> Outcome {
        if !matches!(self.phase, QuizPhase::Home) || count == 0 {
            return Outcome::Ignored;
        }
        self.setup.count = Some(count);
        Outcome::SetupChanged
    }

    pub fn start(&mut self) -> Outcome {
        if !matches!(self.phase, QuizPhase::Home) {
            return Outcome::Ignored;
        }
        self.begin()
    }

    /// Run the same category and count again from the results screen.
    pub fn restart(&mut self) -> Outcome {
        if !matches!(self.phase, QuizPhase::Results { .. }) {
            return Outcome::Ignored;
        }
        self.begin()
    }

    fn begin(&mut self) -> Outcome {
        let (Some(category), Some(count)) = (self.setup.category.as_deref(), self.setup.count)
        else {
            return Outcome::Ignored;
        };

        let questions = selector::pick_questions(&self.bank, category, count, &mut self.rng);
        if questions.is_empty() {
            tracing::warn!(category, "no questions available, quiz not started");
            return Outcome::Ignored;
        }

        tracing::info!(
            category,
            requested = count,
            selected = questions.len(),
            "quiz started"
        );
        self.last_result = None;
        self.phase = QuizPhase::InQuiz(PassRunner::new(PassKind::Primary, questions));
        Outcome::Started
    }

    pub fn answer(&mut self, index: usize) -> Outcome {
        let pass = match &mut self.phase {
            QuizPhase::InQuiz(primary) => primary,
            QuizPhase::InReview { review, .. } => review,
            _ => return Outcome::Ignored,
        };
        match pass.submit_answer(index) {
            Some(feedback) => {
                tracing::debug!(
                    pass = ?pass.kind(),
                    question = pass.index(),
                    correct = feedback.is_correct,
                    "answer recorded"
                );
                Outcome::Answered(feedback)
            }
            None => Outcome::Ignored,
        }
    }

    pub fn advance(&mut self) -> Outcome {
        let pass = match &mut self.phase {
            QuizPhase::InQuiz(primary) => primary,
            QuizPhase::InReview { review, .. } => review,
            _ => return Outcome::Ignored,
        };
        if pass.state() != PassState::Answered {
            return Outcome::Ignored;
        }
        match pass.advance() {
            PassState::Finished => self.finish_pass(),
            _ => Outcome::NextQuestion,
        }
    }

    fn finish_pass(&mut self) -> Outcome {
        match std::mem::replace(&mut self.phase, QuizPhase::Home) {
            QuizPhase::InQuiz(primary) if !primary.wrong_answers().is_empty() => {
                let missed: Vec<Question> = primary
                    .wrong_answers()
                    .iter()
                    .map(|w| w.question.clone())
                    .collect();
                let review_questions = selector::shuffled(&missed, &mut self.rng);
                tracing::info!(
                    score = primary.score(),
                    missed = review_questions.len(),
                    "primary pass finished, starting review"
                );
                self.phase = QuizPhase::InReview {
                    primary,
                    review: PassRunner::new(PassKind::Review, review_questions),
                };
                Outcome::ReviewStarted
            }
            QuizPhase::InQuiz(primary) => {
                self.enter_results(primary, None);
                Outcome::Finished
            }
            QuizPhase::InReview { primary, review } => {
                self.enter_results(primary, Some(review));
                Outcome::Finished
            }
            other => {
                self.phase = other;
                Outcome::Ignored
            }
        }
    }

    fn enter_results(&mut self, primary: PassRunner, review: Option<PassRunner>) {
        let result = QuizResult::compile(
            &primary,
            review.as_ref(),
            self.category_label(),
            Local::now(),
            &self.date_format,
        );
        tracing::info!(
            score = result.score,
            total = result.question_count,
            percentage = result.percentage,
            review = %result.review_text(),
            "quiz finished"
        );
        self.last_result = Some(result);
        self.phase = QuizPhase::Results { primary, review };
    }

    pub fn go_home(&mut self) -> Outcome {
        if !matches!(self.phase, QuizPhase::Home) {
            tracing::debug!(from = self.phase.name(), "returning home");
        }
        self.phase = QuizPhase::Home;
        Outcome::Home
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::bank::Category;

    fn five_question_bank() -> QuestionBank {
        let questions = (0..5)
            .map(|i| Question::new(&format!("question {i}"), &["a", "b", "c", "d"], i % 4))
            .collect();
        QuestionBank::new(vec![Category {
            key: "history".to_string(),
            label: "History".to_string(),
            questions,
        }])
        .unwrap()
    }

    fn session() -> QuizSession<SmallRng> {
        QuizSession::with_rng(five_question_bank(), SmallRng::seed_from_u64(11))
    }

    fn answer_current(session: &mut QuizSession<SmallRng>, correct: bool) -> AnswerFeedback {
        let q = session.active_pass().unwrap().current_question().unwrap();
        let choice = if correct {
            q.correct_index
        } else {
            (q.correct_index + 1) % q.options.len()
        };
        match session.handle(QuizEvent::Answer(choice)) {
            Outcome::Answered(feedback) => feedback,
            other => panic!("expected an answer, got {other:?}"),
        }
    }

    fn configured(count: usize) -> QuizSession<SmallRng> {
        let mut s = session();
        s.handle(QuizEvent::ChooseCategory("history".to_string()));
        s.handle(QuizEvent::ChooseCount(count));
        s
    }

    #[test]
    fn test_start_is_inert_until_configured() {
        let mut s = session();
        assert_eq!(s.handle(QuizEvent::Start), Outcome::Ignored);
        assert!(matches!(s.phase(), QuizPhase::Home));

        s.handle(QuizEvent::ChooseCategory("history".to_string()));
        assert_eq!(s.handle(QuizEvent::Start), Outcome::Ignored);
        assert!(matches!(s.phase(), QuizPhase::Home));

        s.handle(QuizEvent::ChooseCount(5));
        assert!(s.setup().is_ready());
        assert_eq!(s.handle(QuizEvent::Start), Outcome::Started);
        assert!(matches!(s.phase(), QuizPhase::InQuiz(_)));
    }

    #[test]
    fn test_unknown_category_and_zero_count_are_ignored() {
        let mut s = session();
        assert_eq!(s.choose_category("cooking"), Outcome::Ignored);
        assert_eq!(s.choose_count(0), Outcome::Ignored);
        assert_eq!(s.setup(), &QuizSetup::default());
    }

    #[test]
    fn test_count_above_pool_truncates() {
        let mut s = configured(10);
        s.start();
        assert_eq!(s.active_pass().unwrap().total(), 5);
    }

    #[test]
    fn test_double_answer_counts_once() {
        let mut s = configured(5);
        s.start();
        answer_current(&mut s, false);
        assert_eq!(s.handle(QuizEvent::Answer(0)), Outcome::Ignored);
        assert_eq!(s.handle(QuizEvent::Answer(1)), Outcome::Ignored);
        let pass = s.active_pass().unwrap();
        assert_eq!(pass.score(), 0);
        assert_eq!(pass.wrong_answers().len(), 1);
    }

    #[test]
    fn test_review_runs_over_exactly_the_missed_questions() {
        let mut s = configured(5);
        s.start();

        let mut missed = HashSet::new();
        for i in 0..5 {
            let wrong = i % 2 == 0; // questions 1, 3 and 5
            if wrong {
                let prompt = s.active_pass().unwrap().current_question().unwrap().prompt.clone();
                missed.insert(prompt);
            }
            answer_current(&mut s, !wrong);
            let pass = s.active_pass().unwrap();
            assert_eq!(pass.score() + pass.wrong_answers().len(), i + 1);
            let outcome = s.handle(QuizEvent::Advance);
            if i < 4 {
                assert_eq!(outcome, Outcome::NextQuestion);
            } else {
                assert_eq!(outcome, Outcome::ReviewStarted);
            }
        }

        let QuizPhase::InReview { primary, review } = s.phase() else {
            panic!("expected review phase");
        };
        assert_eq!(primary.score(), 2);
        assert_eq!(primary.wrong_answers().len(), 3);
        assert_eq!(review.total(), 3);
        let review_prompts: HashSet<String> =
            review.questions().iter().map(|q| q.prompt.clone()).collect();
        assert_eq!(review_prompts, missed);

        for correct in [true, false, true] {
            answer_current(&mut s, correct);
            s.handle(QuizEvent::Advance);
        }

        assert!(matches!(s.phase(), QuizPhase::Results { .. }));
        let QuizPhase::Results { primary, .. } = s.phase() else {
            unreachable!()
        };
        assert_eq!(primary.wrong_answers().len(), 3);

        let result = s.last_result().unwrap();
        assert_eq!(result.score, 2);
        assert_eq!(result.question_count, 5);
        assert_eq!(result.percentage, 40);
        assert_eq!(result.wrong_count, 3);
        assert_eq!(result.review_score, 2);
        assert_eq!(result.review_total, 3);
        assert_eq!(result.category, "History");
    }

    #[test]
    fn test_perfect_quiz_skips_review() {
        let mut s = configured(5);
        s.start();
        for _ in 0..4 {
            answer_current(&mut s, true);
            assert_eq!(s.handle(QuizEvent::Advance), Outcome::NextQuestion);
        }
        answer_current(&mut s, true);
        assert_eq!(s.handle(QuizEvent::Advance), Outcome::Finished);

        let QuizPhase::Results { review, .. } = s.phase() else {
            panic!("expected results");
        };
        assert!(review.is_none());
        let result = s.last_result().unwrap();
        assert_eq!(result.percentage, 100);
        assert_eq!(result.review(), None);
        assert_eq!(result.review_text(), "\u{2014}");
    }

    #[test]
    fn test_review_mistakes_are_not_reviewed_again() {
        let mut s = configured(1);
        s.start();
        answer_current(&mut s, false);
        assert_eq!(s.handle(QuizEvent::Advance), Outcome::ReviewStarted);
        answer_current(&mut s, false);
        assert_eq!(s.handle(QuizEvent::Advance), Outcome::Finished);
        let result = s.last_result().unwrap();
        assert_eq!(result.review_score, 0);
        assert_eq!(result.review_total, 1);
    }

    #[test]
    fn test_advance_before_answer_is_ignored() {
        let mut s = configured(5);
        s.start();
        assert_eq!(s.handle(QuizEvent::Advance), Outcome::Ignored);
        assert_eq!(s.active_pass().unwrap().index(), 0);

        answer_current(&mut s, true);
        assert_eq!(s.handle(QuizEvent::Advance), Outcome::NextQuestion);
        assert_eq!(s.handle(QuizEvent::Advance), Outcome::Ignored);
        assert_eq!(s.active_pass().unwrap().index(), 1);
    }

    #[test]
    fn test_advance_on_last_unanswered_question_does_not_finish() {
        let mut s = configured(1);
        s.start();
        assert_eq!(s.handle(QuizEvent::Advance), Outcome::Ignored);
        assert!(matches!(s.phase(), QuizPhase::InQuiz(_)));
        assert!(s.last_result().is_none());
    }

    #[test]
    fn test_restart_reuses_setup_and_go_home_keeps_it() {
        let mut s = configured(3);
        assert_eq!(s.handle(QuizEvent::Restart), Outcome::Ignored);
        s.start();
        for _ in 0..3 {
            answer_current(&mut s, true);
            s.handle(QuizEvent::Advance);
        }
        assert!(s.last_result().is_some());

        assert_eq!(s.handle(QuizEvent::Restart), Outcome::Started);
        assert_eq!(s.active_pass().unwrap().total(), 3);
        assert!(s.last_result().is_none());

        assert_eq!(s.handle(QuizEvent::GoHome), Outcome::Home);
        assert!(matches!(s.phase(), QuizPhase::Home));
        assert_eq!(s.setup().category.as_deref(), Some("history"));
        assert_eq!(s.setup().count, Some(3));
    }

    #[test]
    fn test_empty_pool_does_not_start() {
        let bank = QuestionBank::new(vec![Category {
            key: "empty".to_string(),
            label: "Empty".to_string(),
            questions: Vec::new(),
        }])
        .unwrap();
        let mut s = QuizSession::with_rng(bank, SmallRng::seed_from_u64(1));
        s.choose_category("empty");
        s.choose_count(5);
        assert_eq!(s.start(), Outcome::Ignored);
        assert!(matches!(s.phase(), QuizPhase::Home));
    }

    #[test]
    fn test_setup_is_frozen_outside_home() {
        let mut s = configured(5);
        s.start();
        assert_eq!(s.choose_count(10), Outcome::Ignored);
        assert_eq!(s.setup().count, Some(5));
    }
}
