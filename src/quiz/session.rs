use std::mem;

use rand::Rng;
use thiserror::Error;

use super::score::score;
use super::shuffle::shuffle;
use super::{Category, Question, RandomizedQuestion};

/// One pass through the quiz: the shuffled questions and the answers given so far.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    id: u32,
    questions: Vec<RandomizedQuestion>,
    selections: Vec<Category>,
}

impl Session {
    pub fn new(bank: &[Question]) -> Self {
        Self::with_rng(bank, &mut rand::thread_rng())
    }

    pub fn with_rng<R: Rng + ?Sized>(bank: &[Question], rng: &mut R) -> Self {
        let id = rng.gen();
        let questions = bank
            .iter()
            .map(|q| RandomizedQuestion {
                text: q.text,
                options: shuffle(q.options, &mut *rng),
            })
            .collect();
        Self {
            id,
            questions,
            selections: Vec::new(),
        }
    }

    /// Random tag telling this session's buttons apart from those of earlier ones.
    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn questions(&self) -> &[RandomizedQuestion] {
        &self.questions
    }

    pub fn selections(&self) -> &[Category] {
        &self.selections
    }

    /// The question waiting for an answer, with its index.
    pub fn current(&self) -> Option<(usize, &RandomizedQuestion)> {
        let idx = self.selections.len();
        self.questions.get(idx).map(|q| (idx, q))
    }

    pub fn is_complete(&self) -> bool {
        self.selections.len() == self.questions.len()
    }

    fn category_of(
        &self,
        session: u32,
        question: usize,
        option: usize,
    ) -> Result<Category, TransitionError> {
        if session != self.id {
            return Err(TransitionError::StaleSession);
        }
        let expected = self.selections.len();
        if question != expected {
            return Err(TransitionError::StaleQuestion { question, expected });
        }
        self.questions
            .get(question)
            .and_then(|q| q.options.get(option))
            .map(|a| a.category)
            .ok_or(TransitionError::UnknownOption { question, option })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransitionError {
    #[error("action is not available right now")]
    NotAvailable,
    #[error("button belongs to an earlier session")]
    StaleSession,
    #[error("question {question} was already answered or not asked yet (asking {expected})")]
    StaleQuestion { question: usize, expected: usize },
    #[error("question {question} has no option {option}")]
    UnknownOption { question: usize, option: usize },
}

/// Per-chat dialogue state. A rejected transition leaves the state as it was.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum State {
    #[default]
    Start,
    Answering(Session),
    ReadyToScore(Session),
    Result {
        session: Session,
        category: Category,
    },
}

impl State {
    /// Mounts a fresh session. Used both for the first start and for `/start` mid-quiz.
    pub fn start(bank: &[Question]) -> Self {
        Self::from_session(Session::new(bank))
    }

    fn from_session(session: Session) -> Self {
        if session.is_complete() {
            State::ReadyToScore(session)
        } else {
            State::Answering(session)
        }
    }

    pub fn session(&self) -> Option<&Session> {
        match self {
            State::Start => None,
            State::Answering(session) | State::ReadyToScore(session) => Some(session),
            State::Result { session, .. } => Some(session),
        }
    }

    pub fn result(&self) -> Option<Category> {
        match self {
            State::Result { category, .. } => Some(*category),
            _ => None,
        }
    }

    /// Records the chosen option of `question`, which must be the one currently asked
    /// in the session tagged `session`.
    pub fn select(
        &mut self,
        session: u32,
        question: usize,
        option: usize,
    ) -> Result<Category, TransitionError> {
        let State::Answering(current) = self else {
            return Err(TransitionError::NotAvailable);
        };
        let category = current.category_of(session, question, option)?;
        current.selections.push(category);

        if current.is_complete() {
            let finished = mem::take(current);
            *self = State::ReadyToScore(finished);
        }
        Ok(category)
    }

    pub fn compute_result(&mut self) -> Result<Category, TransitionError> {
        let State::ReadyToScore(session) = self else {
            return Err(TransitionError::NotAvailable);
        };
        let category = score(&session.selections).ok_or(TransitionError::NotAvailable)?;
        let session = mem::take(session);
        *self = State::Result { session, category };
        Ok(category)
    }

    pub fn retake(&mut self, bank: &[Question]) -> Result<(), TransitionError> {
        self.retake_with(|| Session::new(bank))
    }

    fn retake_with(&mut self, fresh: impl FnOnce() -> Session) -> Result<(), TransitionError> {
        if !matches!(self, State::Result { .. }) {
            return Err(TransitionError::NotAvailable);
        }
        *self = State::from_session(fresh());
        Ok(())
    }
}
