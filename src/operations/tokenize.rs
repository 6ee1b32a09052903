//! Tokenizer for the command lines recorded in reference files
//!
//! The grammar is a small subset of shell quoting: blanks separate words,
//! double quotes delimit a word that may contain blanks, and nothing is ever
//! escaped. A quote always starts a new word, even when it directly follows
//! other characters, so `-m"1.0"` yields `-m` and `1.0`.

use crate::error::RegressionError;
use anyhow::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// Between words
    Blank,
    /// Inside an unquoted word
    Word,
    /// Inside a double-quoted word
    Quoted,
}

/// Split a recorded command line into program arguments
///
/// # Errors
///
/// Returns a reference error if a quote is left open or if the line holds no
/// word at all.
pub fn tokenize(line: &str) -> Result<Vec<String>> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut state = State::Blank;

    for ch in line.chars() {
        match (state, ch) {
            (State::Quoted, '"') => {
                // Quoted words are kept even when empty
                tokens.push(std::mem::take(&mut current));
                state = State::Blank;
            }
            (State::Quoted, _) => current.push(ch),
            (State::Word, '"') => {
                tokens.push(std::mem::take(&mut current));
                state = State::Quoted;
            }
            (State::Blank, '"') => state = State::Quoted,
            (State::Word, ' ' | '\t') => {
                tokens.push(std::mem::take(&mut current));
                state = State::Blank;
            }
            (State::Blank, ' ' | '\t') => {}
            (State::Blank | State::Word, _) => {
                current.push(ch);
                state = State::Word;
            }
        }
    }

    match state {
        State::Quoted => {
            return Err(RegressionError::reference(format!(
                "Unterminated quote in command line: {line}"
            ))
            .into());
        }
        State::Word => tokens.push(current),
        State::Blank => {}
    }

    if tokens.is_empty() {
        return Err(RegressionError::reference("The command line is empty").into());
    }

    Ok(tokens)
}
