use std::{fmt, str::FromStr};

use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup};
use thiserror::Error;
use url::Url;

use crate::config::Config;
use crate::quiz::session::{Session, State};
use crate::quiz::Category;

/// Telegram refuses callback data longer than this.
const MAX_CALLBACK_DATA: usize = 64;

/// What a pressed button asks for. Travels as the button's callback data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Start,
    Answer {
        session: u32,
        question: usize,
        option: usize,
    },
    SeeResult,
    Retake,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Start => f.write_str("start"),
            Action::Answer {
                session,
                question,
                option,
            } => write!(f, "answer:{session}:{question}:{option}"),
            Action::SeeResult => f.write_str("result"),
            Action::Retake => f.write_str("retake"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseActionError {
    #[error("callback data is longer than {MAX_CALLBACK_DATA} bytes")]
    TooLong,
    #[error("unknown callback data {0:?}")]
    Unknown(String),
}

impl FromStr for Action {
    type Err = ParseActionError;

    fn from_str(data: &str) -> Result<Self, Self::Err> {
        if data.len() > MAX_CALLBACK_DATA {
            return Err(ParseActionError::TooLong);
        }
        let unknown = || ParseActionError::Unknown(data.to_string());

        match data {
            "start" => Ok(Action::Start),
            "result" => Ok(Action::SeeResult),
            "retake" => Ok(Action::Retake),
            _ => {
                let rest = data.strip_prefix("answer:").ok_or_else(unknown)?;
                let mut parts = rest.split(':');
                let (Some(session), Some(question), Some(option), None) =
                    (parts.next(), parts.next(), parts.next(), parts.next())
                else {
                    return Err(unknown());
                };
                Ok(Action::Answer {
                    session: session.parse().map_err(|_| unknown())?,
                    question: question.parse().map_err(|_| unknown())?,
                    option: option.parse().map_err(|_| unknown())?,
                })
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ButtonKind {
    Callback(Action),
    Link(Url),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Button {
    pub label: String,
    pub kind: ButtonKind,
}

impl Button {
    fn callback(label: impl Into<String>, action: Action) -> Self {
        Self {
            label: label.into(),
            kind: ButtonKind::Callback(action),
        }
    }

    fn link(label: impl Into<String>, url: Url) -> Self {
        Self {
            label: label.into(),
            kind: ButtonKind::Link(url),
        }
    }
}

/// Everything one message shows: text, an optional picture and rows of buttons.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Screen {
    pub text: String,
    pub image: Option<Url>,
    pub buttons: Vec<Vec<Button>>,
}

impl Screen {
    pub fn keyboard(&self) -> InlineKeyboardMarkup {
        InlineKeyboardMarkup::new(self.buttons.iter().map(|row| {
            row.iter()
                .map(|button| match &button.kind {
                    ButtonKind::Callback(action) => {
                        InlineKeyboardButton::callback(button.label.clone(), action.to_string())
                    }
                    ButtonKind::Link(url) => {
                        InlineKeyboardButton::url(button.label.clone(), url.clone())
                    }
                })
                .collect::<Vec<_>>()
        }))
    }
}

pub fn share_text(category: Category, config: &Config) -> String {
    format!("I am a {category}! {}", config.site_url())
}

/// Projects the dialogue state onto the screen the chat should see.
pub fn render(state: &State, config: &Config) -> Screen {
    match state {
        State::Start => Screen {
            text: "Which animal are you? Answer a few quick questions to find out.".to_string(),
            image: None,
            buttons: vec![vec![Button::callback("Start Quiz", Action::Start)]],
        },
        State::Answering(session) => match session.current() {
            Some((idx, question)) => Screen {
                text: format!(
                    "Question {} of {}\n\n{}",
                    idx + 1,
                    session.questions().len(),
                    question.text
                ),
                image: None,
                buttons: question
                    .options
                    .iter()
                    .enumerate()
                    .map(|(option, answer)| {
                        vec![Button::callback(
                            answer.label,
                            Action::Answer {
                                session: session.id(),
                                question: idx,
                                option,
                            },
                        )]
                    })
                    .collect(),
            },
            None => ready(session),
        },
        State::ReadyToScore(session) => ready(session),
        State::Result { category, .. } => Screen {
            text: format!("You are a {category}!"),
            image: Some(config.image_url(*category)),
            buttons: vec![
                vec![Button::link(
                    "Share",
                    config.share_url(&share_text(*category, config)),
                )],
                vec![Button::callback("Retake Quiz", Action::Retake)],
            ],
        },
    }
}

fn ready(session: &Session) -> Screen {
    Screen {
        text: format!("That's all {} questions!", session.questions().len()),
        image: None,
        buttons: vec![vec![Button::callback("See Result", Action::SeeResult)]],
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use teloxide::types::InlineKeyboardButtonKind;

    use super::*;
    use crate::quiz::bank::QUESTIONS;
    use crate::quiz::session::TransitionError;

    fn config() -> Config {
        Config::new("https://quiz.example.com").unwrap()
    }

    /// Whether pressing some button on `screen` sends `action`.
    fn offers(screen: &Screen, action: Action) -> bool {
        screen
            .buttons
            .iter()
            .flatten()
            .any(|b| b.kind == ButtonKind::Callback(action))
    }

    fn id_of(state: &State) -> u32 {
        state.session().unwrap().id()
    }

    fn answering() -> State {
        State::Answering(Session::with_rng(QUESTIONS, &mut StdRng::seed_from_u64(42)))
    }

    #[test]
    fn actions_survive_callback_data() {
        for action in [
            Action::Start,
            Action::Answer {
                session: u32::MAX,
                question: 4,
                option: 3,
            },
            Action::SeeResult,
            Action::Retake,
        ] {
            assert_eq!(action.to_string().parse::<Action>(), Ok(action));
        }
    }

    #[test]
    fn malformed_callback_data_is_rejected() {
        for data in [
            "",
            "answer",
            "answer:1",
            "answer:1:2",
            "answer:x:1:2",
            "answer:7:1:-2",
            "answer:7:1:2:3",
            "retake!",
        ] {
            assert_eq!(
                data.parse::<Action>(),
                Err(ParseActionError::Unknown(data.to_string())),
                "{data}"
            );
        }
        assert_eq!("a".repeat(65).parse::<Action>(), Err(ParseActionError::TooLong));
    }

    #[test]
    fn answering_shows_the_current_question_in_shuffled_order() {
        let state = answering();
        let screen = render(&state, &config());
        let question = &state.session().unwrap().questions()[0];

        assert!(screen.text.starts_with("Question 1 of 5"));
        assert!(screen.text.ends_with(question.text));
        let labels: Vec<_> = screen.buttons.iter().flatten().map(|b| b.label.as_str()).collect();
        let expected: Vec<_> = question.options.iter().map(|a| a.label).collect();
        assert_eq!(labels, expected);
        assert!(screen.image.is_none());
    }

    #[test]
    fn see_result_appears_only_after_the_last_answer() {
        let config = config();
        let mut state = answering();
        let id = id_of(&state);
        for q in 0..QUESTIONS.len() - 1 {
            state.select(id, q, 0).unwrap();
            assert!(!offers(&render(&state, &config), Action::SeeResult));
        }
        state.select(id, QUESTIONS.len() - 1, 0).unwrap();
        assert!(offers(&render(&state, &config), Action::SeeResult));
    }

    #[test]
    fn result_screen_has_image_share_and_retake() {
        let config = config();
        let mut state = answering();
        let id = id_of(&state);
        for q in 0..QUESTIONS.len() {
            let option = state.session().unwrap().questions()[q]
                .options
                .iter()
                .position(|a| a.category.as_str() == "horse")
                .unwrap();
            state.select(id, q, option).unwrap();
        }
        state.compute_result().unwrap();

        let screen = render(&state, &config);
        assert_eq!(screen.text, "You are a horse!");
        assert_eq!(
            screen.image.as_ref().map(Url::as_str),
            Some("https://quiz.example.com/horse.png")
        );
        assert!(offers(&screen, Action::Retake));

        let share = screen
            .buttons
            .iter()
            .flatten()
            .find_map(|b| match &b.kind {
                ButtonKind::Link(url) => Some(url.clone()),
                ButtonKind::Callback(_) => None,
            })
            .unwrap();
        let text = share.query_pairs().find(|(k, _)| *k == "text").unwrap().1;
        assert_eq!(text, "I am a horse! https://quiz.example.com");
    }

    #[test]
    fn result_keyboard_works_without_the_photo() {
        let config = config();
        let mut state = answering();
        let id = id_of(&state);
        for q in 0..QUESTIONS.len() {
            state.select(id, q, 0).unwrap();
        }
        let category = state.compute_result().unwrap();

        // A missing image falls back to a text message with this same keyboard
        let keyboard = render(&state, &config).keyboard();
        let buttons: Vec<_> = keyboard.inline_keyboard.iter().flatten().collect();
        assert_eq!(buttons.len(), 2);
        match &buttons[0].kind {
            InlineKeyboardButtonKind::Url(url) => {
                let text = url.query_pairs().find(|(k, _)| *k == "text").unwrap().1;
                assert_eq!(text, share_text(category, &config));
            }
            other => panic!("share button is {other:?}"),
        }
        assert_eq!(
            buttons[1].kind,
            InlineKeyboardButtonKind::CallbackData("retake".to_string())
        );
    }

    #[test]
    fn rendering_does_not_change_anything() {
        let config = config();
        let state = answering();
        let before = state.clone();
        let first = render(&state, &config);
        let second = render(&state, &config);
        assert_eq!(first, second);
        assert_eq!(state, before);
    }

    #[test]
    fn start_offers_the_quiz() {
        assert!(offers(&render(&State::Start, &config()), Action::Start));
    }

    #[test]
    fn old_question_buttons_do_not_answer_a_remounted_quiz() {
        let config = config();
        let old = answering();
        let old_screen = render(&old, &config);

        let mut state =
            State::Answering(Session::with_rng(QUESTIONS, &mut StdRng::seed_from_u64(43)));
        let before = state.clone();
        for button in old_screen.buttons.iter().flatten() {
            let ButtonKind::Callback(action) = &button.kind else {
                continue;
            };
            let Ok(Action::Answer {
                session,
                question,
                option,
            }) = action.to_string().parse::<Action>()
            else {
                panic!("{} is not an answer button", button.label);
            };
            assert_eq!(
                state.select(session, question, option),
                Err(TransitionError::StaleSession),
                "{}",
                button.label
            );
        }
        assert_eq!(state, before);
    }

    #[test]
    fn current_question_buttons_record_the_clicked_option() {
        let config = config();
        let mut state = answering();
        let screen = render(&state, &config);
        let question = &state.session().unwrap().questions()[0];
        let (label, expected) = (question.options[2].label, question.options[2].category);

        let pressed = screen
            .buttons
            .iter()
            .flatten()
            .find(|b| b.label == label)
            .unwrap();
        let ButtonKind::Callback(Action::Answer {
            session,
            question,
            option,
        }) = pressed.kind
        else {
            panic!("{label} is not an answer button");
        };
        assert_eq!(state.select(session, question, option), Ok(expected));
    }
}
