//! Line splitting.
//!
//! The tree does not tokenize on its own; it calls a [`Splitter`]. The default
//! is POSIX-shell-like splitting via `shell_words` (quotes and backslash
//! escapes honored, unbalanced quotes rejected).

use std::sync::Arc;

use crate::error::SyntaxError;

/// Injected tokenizer: line -> words, or an opaque syntax error.
pub type Splitter = Arc<dyn Fn(&str) -> Result<Vec<String>, SyntaxError> + Send + Sync>;

/// Shell-style splitting backed by `shell_words::split`.
pub fn shell_split(line: &str) -> Result<Vec<String>, SyntaxError> {
    shell_words::split(line).map_err(Into::into)
}

pub(crate) fn default_splitter() -> Splitter {
    Arc::new(shell_split)
}
