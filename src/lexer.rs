//! A module implementing lexical analysis (tokenization) of a single command line.
//!
//! The language is deliberately flat: a line is a sequence of words separated by
//! whitespace. There are no quotes, escapes, operators or substitutions, so a token
//! is exactly the text between two runs of delimiters.

/// Upper bound on the number of tokens taken from one line. Anything past it is dropped.
pub const MAX_ARGS: usize = 1023;

/// Ordered tokens of one command line. Index 0 is the command name.
///
/// The tokens borrow from the line they were produced from, so the line must
/// outlive the list.
pub type ArgumentList<'a> = Vec<&'a str>;

/// Characters that separate tokens: space, tab, carriage return and newline.
fn is_delimiter(ch: char) -> bool {
    matches!(ch, ' ' | '\t' | '\r' | '\n')
}

/// Splits `line` into whitespace-delimited tokens.
///
/// Consecutive delimiters collapse, so no empty tokens are ever produced. An empty
/// or all-whitespace line yields an empty list.
///
/// # Arguments
/// * `line` - The raw input line, with or without its trailing newline.
///
/// # Returns
/// The tokens as slices of `line`, at most [`MAX_ARGS`] of them.
pub fn tokenize(line: &str) -> ArgumentList<'_> {
    let tokens: ArgumentList<'_> = line
        .split(is_delimiter)
        .filter(|token| !token.is_empty())
        .take(MAX_ARGS)
        .collect();
    tracing::trace!(?tokens, "tokenized line");
    tokens
}
