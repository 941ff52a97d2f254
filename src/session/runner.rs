use serde::{Deserialize, Serialize};

use crate::bank::Question;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PassKind {
    Primary,
    Review,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PassState {
    AwaitingAnswer,
    Answered,
    Finished,
}

/// A missed question together with the literal text that was picked.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WrongAnswer {
    pub question: Question,
    pub your_answer: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AnswerFeedback {
    pub chosen_index: usize,
    pub correct_index: usize,
    pub is_correct: bool,
}

/// One traversal of a question sequence. The primary quiz and the review
/// round are both driven by this type; only the source of questions differs.
#[derive(Clone, Debug)]
pub struct PassRunner {
    kind: PassKind,
    questions: Vec<Question>,
    index: usize,
    score: usize,
    wrong_answers: Vec<WrongAnswer>,
    answered: Option<AnswerFeedback>,
}

impl PassRunner {
    pub fn new(kind: PassKind, questions: Vec<Question>) -> Self {
        Self {
            kind,
            questions,
            index: 0,
            score: 0,
            wrong_answers: Vec::new(),
            answered: None,
        }
    }

    pub fn kind(&self) -> PassKind {
        self.kind
    }

    /// Jump to `index` and clear the answered flag.
    pub fn load(&mut self, index: usize) -> Option<&Question> {
        self.index = index.min(self.questions.len());
        self.answered = None;
        self.questions.get(self.index)
    }

    pub fn current_question(&self) -> Option<&Question> {
        self.questions.get(self.index)
    }

    /// Record an answer for the current question. Only the first call per
    /// question counts; later calls and out-of-range choices return `None`.
    pub fn submit_answer(&mut self, chosen_index: usize) -> Option<AnswerFeedback> {
        if self.answered.is_some() {
            return None;
        }
        let question = self.questions.get(self.index)?;
        let chosen_text = question.option(chosen_index)?.to_string();

        let feedback = AnswerFeedback {
            chosen_index,
            correct_index: question.correct_index,
            is_correct: chosen_index == question.correct_index,
        };

        if feedback.is_correct {
            self.score += 1;
        } else {
            self.wrong_answers.push(WrongAnswer {
                question: question.clone(),
                your_answer: chosen_text,
            });
        }
        self.answered = Some(feedback);
        Some(feedback)
    }

    /// Move past an answered question. Unanswered questions stay put.
    pub fn advance(&mut self) -> PassState {
        if self.state() != PassState::Answered {
            return self.state();
        }
        self.load(self.index + 1);
        self.state()
    }

    pub fn state(&self) -> PassState {
        if self.index >= self.questions.len() {
            PassState::Finished
        } else if self.answered.is_some() {
            PassState::Answered
        } else {
            PassState::AwaitingAnswer
        }
    }

    pub fn is_finished(&self) -> bool {
        self.state() == PassState::Finished
    }

    pub fn feedback(&self) -> Option<AnswerFeedback> {
        self.answered
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn total(&self) -> usize {
        self.questions.len()
    }

    /// `(index, total)`; the index is zero-based.
    pub fn progress(&self) -> (usize, usize) {
        (self.index, self.questions.len())
    }

    pub fn progress_ratio(&self) -> f64 {
        if self.questions.is_empty() {
            return 1.0;
        }
        self.index as f64 / self.questions.len() as f64
    }

    pub fn score(&self) -> usize {
        self.score
    }

    pub fn answered_count(&self) -> usize {
        self.score + self.wrong_answers.len()
    }

    pub fn wrong_answers(&self) -> &[WrongAnswer] {
        &self.wrong_answers
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn three_questions() -> Vec<Question> {
        vec![
            Question::new("one", &["a", "b", "c"], 0),
            Question::new("two", &["a", "b", "c"], 1),
            Question::new("three", &["a", "b", "c"], 2),
        ]
    }

    #[test]
    fn test_new_pass_awaits_first_answer() {
        let pass = PassRunner::new(PassKind::Primary, three_questions());
        assert_eq!(pass.state(), PassState::AwaitingAnswer);
        assert_eq!(pass.current_question().unwrap().prompt, "one");
        assert_eq!(pass.progress(), (0, 3));
        assert_eq!(pass.progress_ratio(), 0.0);
    }

    #[test]
    fn test_correct_answer_scores() {
        let mut pass = PassRunner::new(PassKind::Primary, three_questions());
        let fb = pass.submit_answer(0).unwrap();
        assert!(fb.is_correct);
        assert_eq!(fb.correct_index, 0);
        assert_eq!(pass.score(), 1);
        assert!(pass.wrong_answers().is_empty());
        assert_eq!(pass.state(), PassState::Answered);
    }

    #[test]
    fn test_wrong_answer_records_chosen_text() {
        let mut pass = PassRunner::new(PassKind::Primary, three_questions());
        let fb = pass.submit_answer(2).unwrap();
        assert!(!fb.is_correct);
        assert_eq!(fb.chosen_index, 2);
        assert_eq!(fb.correct_index, 0);
        assert_eq!(pass.score(), 0);
        assert_eq!(pass.wrong_answers().len(), 1);
        assert_eq!(pass.wrong_answers()[0].your_answer, "c");
        assert_eq!(pass.wrong_answers()[0].question.prompt, "one");
    }

    #[test]
    fn test_second_submission_is_ignored() {
        let mut pass = PassRunner::new(PassKind::Primary, three_questions());
        assert!(pass.submit_answer(1).is_some());
        assert!(pass.submit_answer(0).is_none());
        assert!(pass.submit_answer(1).is_none());
        assert_eq!(pass.score(), 0);
        assert_eq!(pass.wrong_answers().len(), 1);
        assert_eq!(pass.feedback().unwrap().chosen_index, 1);
    }

    #[test]
    fn test_out_of_range_choice_is_ignored() {
        let mut pass = PassRunner::new(PassKind::Primary, three_questions());
        assert!(pass.submit_answer(9).is_none());
        assert_eq!(pass.state(), PassState::AwaitingAnswer);
        assert!(pass.submit_answer(0).is_some());
    }

    #[test]
    fn test_advance_requires_answer() {
        let mut pass = PassRunner::new(PassKind::Primary, three_questions());
        assert_eq!(pass.advance(), PassState::AwaitingAnswer);
        assert_eq!(pass.index(), 0);
    }

    #[test]
    fn test_advance_resets_answered_flag_and_finishes() {
        let mut pass = PassRunner::new(PassKind::Review, three_questions());
        for (i, choice) in [0, 0, 2].into_iter().enumerate() {
            assert_eq!(pass.index(), i);
            pass.submit_answer(choice).unwrap();
            assert_eq!(pass.answered_count(), i + 1);
            assert_eq!(pass.score() + pass.wrong_answers().len(), pass.answered_count());
            let next = pass.advance();
            if i < 2 {
                assert_eq!(next, PassState::AwaitingAnswer);
                assert!(pass.feedback().is_none());
            } else {
                assert_eq!(next, PassState::Finished);
            }
        }
        assert_eq!(pass.score(), 2);
        assert!(pass.is_finished());
        assert_eq!(pass.progress_ratio(), 1.0);
        assert!(pass.submit_answer(0).is_none());
    }

    #[test]
    fn test_load_resets_answered() {
        let mut pass = PassRunner::new(PassKind::Primary, three_questions());
        pass.submit_answer(0).unwrap();
        let q = pass.load(0).unwrap();
        assert_eq!(q.prompt, "one");
        assert_eq!(pass.state(), PassState::AwaitingAnswer);
    }

    #[test]
    fn test_empty_pass_is_finished() {
        let pass = PassRunner::new(PassKind::Primary, Vec::new());
        assert!(pass.is_finished());
        assert!(pass.current_question().is_none());
    }
}
