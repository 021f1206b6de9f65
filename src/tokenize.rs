use std::fmt;

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// `{`
    LeftBrace,
    /// `}`
    RightBrace,
    /// `[`
    LeftBracket,
    /// `]`
    RightBracket,
    /// `:`
    Colon,
    /// `,`
    Comma,
    /// `null`
    Null,
    /// `false`
    False,
    /// `true`
    True,
    /// Any number literal
    Number,
    /// Key of the key/value pair or a string value, quotes and escapes included
    String,
}

/// A classified slice of the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub lexeme: &'a str,
}

impl<'a> Token<'a> {
    pub fn new(kind: TokenKind, lexeme: &'a str) -> Self {
        Self { kind, lexeme }
    }
}

impl fmt::Display for Token<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.lexeme)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenizeError {
    #[error("Cannot parse empty string")]
    EmptyInput,
    #[error("Unknown token found: {0}")]
    UnknownToken(String),
    #[error("Expected end of string")]
    UnclosedQuotes,
    #[error("Incomplete escape at end of string")]
    IncompleteEscape,
    #[error("Too many decimal points in number: {0}")]
    TooManyDecimalPoints(String),
    #[error("Minus sign in between number: {0}")]
    MisplacedMinus(String),
    #[error("Expected digits in number: {0}")]
    MissingDigits(String),
}

type TokenizeResult<'a> = Result<Token<'a>, TokenizeError>;

/// Scans `input` left to right into an ordered token sequence.
///
/// String tokens keep their quotes and escape sequences untouched; decoding
/// happens in the parser. Fails on the first malformed lexeme.
pub fn tokenize(input: &str) -> Result<Vec<Token<'_>>, TokenizeError> {
    let mut index = 0;
    let mut tokens = Vec::new();

    while let Some(ch) = input[index..].chars().next() {
        if is_whitespace(ch) {
            index += 1;
            continue;
        }
        let token = make_token(input, ch, &mut index)?;
        tokens.push(token);
    }

    if tokens.is_empty() {
        return Err(TokenizeError::EmptyInput);
    }

    log::trace!("tokenized {} bytes into {} tokens", input.len(), tokens.len());
    Ok(tokens)
}

fn is_whitespace(ch: char) -> bool {
    matches!(ch, ' ' | '\t' | '\n' | '\r')
}

fn make_token<'a>(input: &'a str, ch: char, index: &mut usize) -> TokenizeResult<'a> {
    let kind = match ch {
        '{' => TokenKind::LeftBrace,
        '}' => TokenKind::RightBrace,
        '[' => TokenKind::LeftBracket,
        ']' => TokenKind::RightBracket,
        ':' => TokenKind::Colon,
        ',' => TokenKind::Comma,
        '"' => return tokenize_string(input, index),
        c if c.is_ascii_digit() || c == '-' => return tokenize_number(input, index),
        _ => return tokenize_literal(input, index),
    };

    let start = *index;
    *index += 1;
    Ok(Token::new(kind, &input[start..*index]))
}

fn tokenize_string<'a>(input: &'a str, index: &mut usize) -> TokenizeResult<'a> {
    let bytes = input.as_bytes();
    let start = *index;
    // skip the opening quote
    *index += 1;

    while *index < bytes.len() {
        match bytes[*index] {
            b'\\' => {
                if *index + 1 == bytes.len() {
                    return Err(TokenizeError::IncompleteEscape);
                }
                // the escaped character may be multi-byte; land on its boundary
                *index += 1;
                *index += input[*index..].chars().next().map_or(1, char::len_utf8);
            }
            b'"' => {
                *index += 1;
                return Ok(Token::new(TokenKind::String, &input[start..*index]));
            }
            _ => *index += 1,
        }
    }

    Err(TokenizeError::UnclosedQuotes)
}

fn tokenize_number<'a>(input: &'a str, index: &mut usize) -> TokenizeResult<'a> {
    let bytes = input.as_bytes();
    let start = *index;
    let mut has_decimal = false;
    let mut has_digit = false;

    while *index < bytes.len() {
        match bytes[*index] {
            b'0'..=b'9' => has_digit = true,
            b'.' if has_decimal => {
                return Err(TokenizeError::TooManyDecimalPoints(number_run(input, start)));
            }
            b'.' => has_decimal = true,
            b'-' if *index == start => {}
            b'-' => return Err(TokenizeError::MisplacedMinus(number_run(input, start))),
            _ => break,
        }
        *index += 1;
    }

    let literal = &input[start..*index];
    if !has_digit {
        return Err(TokenizeError::MissingDigits(literal.to_string()));
    }
    Ok(Token::new(TokenKind::Number, literal))
}

/// The full run of number-like characters starting at `start`, for error messages.
fn number_run(input: &str, start: usize) -> String {
    let rest = &input[start..];
    let end = rest
        .find(|c: char| !(c.is_ascii_digit() || c == '.' || c == '-'))
        .unwrap_or(rest.len());
    rest[..end].to_string()
}

fn tokenize_literal<'a>(input: &'a str, index: &mut usize) -> TokenizeResult<'a> {
    let start = *index;
    let rest = &input[start..];
    let end = rest
        .find(|c: char| !c.is_alphabetic())
        .unwrap_or(rest.len());
    let word = &rest[..end];

    let kind = match word {
        "null" => TokenKind::Null,
        "false" => TokenKind::False,
        "true" => TokenKind::True,
        "" => {
            // not alphabetic at all: report the offending character itself
            let ch = rest.chars().next().map(String::from).unwrap_or_default();
            return Err(TokenizeError::UnknownToken(ch));
        }
        _ => return Err(TokenizeError::UnknownToken(word.to_string())),
    };

    *index += end;
    Ok(Token::new(kind, word))
}
