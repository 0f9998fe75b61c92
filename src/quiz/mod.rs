pub mod bank;
pub mod score;
pub mod session;
pub mod shuffle;

use std::fmt;

/// Tag an answer counts towards. The bank decides which tags exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Category(&'static str);

impl Category {
    pub const fn new(tag: &'static str) -> Self {
        Self(tag)
    }

    pub fn as_str(&self) -> &'static str {
        self.0
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Question {
    pub text: &'static str,
    pub options: &'static [Answer],
}

impl Question {
    pub const fn new(text: &'static str, options: &'static [Answer]) -> Self {
        Self { text, options }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Answer {
    pub label: &'static str,
    pub category: Category,
}

impl Answer {
    pub const fn new(label: &'static str, category: Category) -> Self {
        Self { label, category }
    }
}

/// A question whose options were reordered for one session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RandomizedQuestion {
    pub text: &'static str,
    pub options: Vec<Answer>,
}
