//! Error taxonomy for registration, resolution, parameter parsing and dispatch.
//!
//! Every variant carries the word / name / label that triggered it so hosts can
//! react structurally instead of matching on messages. Tokenizer and action
//! failures are passed through untouched (`Syntax`, `Action`).

use thiserror::Error;

/// Boxed tokenizer error (opaque to the dispatcher).
pub type SyntaxError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Debug, Error)]
pub enum Error {
    /// A command with this name already exists at the insertion level.
    #[error("Command '{name}' defined more than once")]
    DuplicateCommand { name: String },

    /// A parameter with this label is already declared in the variable set.
    #[error("Parameter '{label}' declared more than once")]
    DuplicateParameter { label: String },

    /// Resolution could not match `word` (or a menu command received leftovers).
    #[error("No such command '{word}'")]
    NoSuchCommand { word: String },

    /// A parameter label was given without a following value.
    #[error("Missing value for parameter {label}")]
    MissingValue { label: String },

    /// A typed parameter rejected its value token.
    #[error("Invalid value '{value}' for parameter {label} (expected {expected})")]
    InvalidValue {
        label: String,
        value: String,
        expected: String,
    },

    /// Line splitting failed (e.g. unbalanced quotes).
    #[error(transparent)]
    Syntax(SyntaxError),

    /// Error returned by a command action.
    #[error(transparent)]
    Action(#[from] anyhow::Error),
}

impl Error {
    pub(crate) fn no_such_command(word: impl Into<String>) -> Self {
        Error::NoSuchCommand { word: word.into() }
    }

    /// The offending command word, if this is a `NoSuchCommand` error.
    pub fn unknown_word(&self) -> Option<&str> {
        match self {
            Error::NoSuchCommand { word } => Some(word),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
