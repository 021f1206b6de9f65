use std::str::Chars;

use thiserror::Error;

use crate::options::ParseOptions;
use crate::tokenize::{tokenize, Token, TokenKind, TokenizeError};
use crate::{Object, Value};

pub fn parse(input: &str) -> Result<Value, ParseError> {
    parse_with_options(input, &ParseOptions::default())
}

pub fn parse_with_options(input: &str, options: &ParseOptions) -> Result<Value, ParseError> {
    let result = parse_document(input, options);
    if let Err(err) = &result {
        log::debug!("failed to parse JSON: {err}");
    }
    result
}

fn parse_document(input: &str, options: &ParseOptions) -> Result<Value, ParseError> {
    let tokens = tokenize(input)?;
    let mut parser = Parser::new(&tokens, options);
    let value = parser.parse_tokens()?;
    parser.finish()?;
    Ok(value)
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error(transparent)]
    TokenizeError(#[from] TokenizeError),
    #[error(transparent)]
    ParseError(#[from] TokenParseError),
}

impl ParseError {
    /// The input was rejected while splitting it into tokens.
    pub fn is_lexical(&self) -> bool {
        matches!(self, Self::TokenizeError(_))
    }

    /// The tokens were valid but did not form a single JSON value.
    pub fn is_structural(&self) -> bool {
        matches!(self, Self::ParseError(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenParseError {
    /// A `\u` escape was not followed by exactly 4 hexadecimal digits
    #[error("Invalid escape: \\u{hex} in {string}")]
    InvalidEscape { hex: String, string: String },
    #[error("Unknown escape sequence \\{escape} found in {string}")]
    UnknownEscape { escape: String, string: String },
    #[error("Invalid token: {0}")]
    InvalidNumber(String),
    #[error("Expected ',' or '{closing}', found {found}")]
    ExpectedComma { closing: char, found: String },
    #[error("Expected string key for object, found {0}")]
    ExpectedProperty(String),
    #[error("Expected colon, found {0}")]
    ExpectedColon(String),
    #[error("Expected value after colon, found {0}")]
    ExpectedValueAfterColon(String),
    #[error("Expected value after comma, found {0}")]
    ExpectedValueAfterComma(String),
    #[error("Unexpected token: {0}")]
    UnexpectedToken(String),
    #[error("Unexpected end of file while parsing")]
    UnexpectedEof,
    #[error("Invalid JSON at {0}")]
    TrailingData(String),
    #[error("Nesting too deep: exceeded maximum depth of {0}")]
    NestingTooDeep(usize),
}

type ParseResult = Result<Value, TokenParseError>;

/// Recursive-descent cursor over a fully tokenized document.
struct Parser<'t, 'a> {
    tokens: &'t [Token<'a>],
    index: usize,
    depth: usize,
    max_depth: usize,
}

impl<'t, 'a> Parser<'t, 'a> {
    fn new(tokens: &'t [Token<'a>], options: &ParseOptions) -> Self {
        Self {
            tokens,
            index: 0,
            depth: 0,
            max_depth: options.max_depth,
        }
    }

    fn peek(&self) -> Result<Token<'a>, TokenParseError> {
        self.tokens
            .get(self.index)
            .copied()
            .ok_or(TokenParseError::UnexpectedEof)
    }

    fn next(&mut self) -> Result<Token<'a>, TokenParseError> {
        let token = self.peek()?;
        self.index += 1;
        Ok(token)
    }

    fn finish(&self) -> Result<(), TokenParseError> {
        match self.tokens.get(self.index) {
            Some(token) => Err(TokenParseError::TrailingData(token.lexeme.to_string())),
            None => Ok(()),
        }
    }

    fn enter(&mut self) -> Result<(), TokenParseError> {
        if self.depth >= self.max_depth {
            return Err(TokenParseError::NestingTooDeep(self.max_depth));
        }
        self.depth += 1;
        Ok(())
    }

    fn leave(&mut self) {
        self.depth -= 1;
    }

    fn parse_tokens(&mut self) -> ParseResult {
        let token = self.next()?;

        match token.kind {
            TokenKind::Null => Ok(Value::Null),
            TokenKind::False => Ok(Value::Bool(false)),
            TokenKind::True => Ok(Value::Bool(true)),
            TokenKind::Number => parse_number(token.lexeme),
            TokenKind::String => parse_string(token.lexeme).map(Value::String),
            TokenKind::LeftBrace => self.parse_object(),
            TokenKind::LeftBracket => self.parse_array(),
            _ => Err(TokenParseError::UnexpectedToken(token.lexeme.to_string())),
        }
    }

    fn parse_array(&mut self) -> ParseResult {
        self.enter()?;
        log::trace!("parsing array at depth {}", self.depth);
        let mut array = Vec::new();

        if self.peek()?.kind == TokenKind::RightBracket {
            self.index += 1;
            self.leave();
            return Ok(Value::Array(array));
        }

        loop {
            let value = self.parse_tokens()?;
            array.push(value);

            let token = self.next()?;
            match token.kind {
                TokenKind::RightBracket => break,
                TokenKind::Comma => {
                    // no trailing commas
                    let next = self.peek()?;
                    if next.kind == TokenKind::RightBracket {
                        return Err(TokenParseError::ExpectedValueAfterComma(next.lexeme.to_string()));
                    }
                }
                _ => {
                    return Err(TokenParseError::ExpectedComma {
                        closing: ']',
                        found: token.lexeme.to_string(),
                    })
                }
            }
        }

        self.leave();
        Ok(Value::Array(array))
    }

    fn parse_object(&mut self) -> ParseResult {
        self.enter()?;
        log::trace!("parsing object at depth {}", self.depth);
        let mut map = Object::new();

        if self.peek()?.kind == TokenKind::RightBrace {
            self.index += 1;
            self.leave();
            return Ok(Value::Object(map));
        }

        loop {
            let token = self.next()?;
            if token.kind != TokenKind::String {
                return Err(TokenParseError::ExpectedProperty(token.lexeme.to_string()));
            }
            let key = parse_string(token.lexeme)?;

            let token = self.next()?;
            if token.kind != TokenKind::Colon {
                return Err(TokenParseError::ExpectedColon(token.lexeme.to_string()));
            }

            let next = self.peek()?;
            if next.kind == TokenKind::RightBrace {
                return Err(TokenParseError::ExpectedValueAfterColon(next.lexeme.to_string()));
            }

            let value = self.parse_tokens()?;
            // duplicate keys: last one wins, first position kept
            map.insert(key, value);

            let token = self.next()?;
            match token.kind {
                TokenKind::RightBrace => break,
                TokenKind::Comma => {
                    let next = self.peek()?;
                    if next.kind == TokenKind::RightBrace {
                        return Err(TokenParseError::ExpectedValueAfterComma(next.lexeme.to_string()));
                    }
                }
                _ => {
                    return Err(TokenParseError::ExpectedComma {
                        closing: '}',
                        found: token.lexeme.to_string(),
                    })
                }
            }
        }

        self.leave();
        Ok(Value::Object(map))
    }
}

/// Integer when the literal has no `.`, float otherwise.
///
/// Integer literals outside the `i64` range fall back to a float.
fn parse_number(literal: &str) -> ParseResult {
    if !literal.contains('.') {
        if let Ok(integer) = literal.parse::<i64>() {
            return Ok(Value::Integer(integer));
        }
    }

    literal
        .parse::<f64>()
        .map(Value::Float)
        .map_err(|_| TokenParseError::InvalidNumber(literal.to_string()))
}

/// Strips the quotes of a string token and decodes its escape sequences.
fn parse_string(lexeme: &str) -> Result<String, TokenParseError> {
    let inner = lexeme
        .strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
        .unwrap_or(lexeme);
    let mut output = String::with_capacity(inner.len());
    let mut chars = inner.chars();

    while let Some(next_char) = chars.next() {
        if next_char != '\\' {
            output.push(next_char);
            continue;
        }

        match chars.next() {
            Some(c @ ('"' | '\\' | '/')) => output.push(c),
            Some('b') => output.push('\u{8}'),
            Some('f') => output.push('\u{c}'),
            Some('n') => output.push('\n'),
            Some('r') => output.push('\r'),
            Some('t') => output.push('\t'),
            Some('u') => output.push(parse_unicode_escape(&mut chars, lexeme)?),
            other => {
                return Err(TokenParseError::UnknownEscape {
                    escape: other.map(String::from).unwrap_or_default(),
                    string: lexeme.to_string(),
                })
            }
        }
    }

    Ok(output)
}

/// Decodes the 4 hex digits following `\u` as a single code point.
///
/// Surrogate halves are not combined; each one becomes U+FFFD.
fn parse_unicode_escape(chars: &mut Chars<'_>, lexeme: &str) -> Result<char, TokenParseError> {
    let hex: String = chars.by_ref().take(4).collect();
    let invalid = || TokenParseError::InvalidEscape {
        hex: hex.clone(),
        string: lexeme.to_string(),
    };

    if hex.len() != 4 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(invalid());
    }
    let code_point = u32::from_str_radix(&hex, 16).map_err(|_| invalid())?;

    Ok(char::from_u32(code_point).unwrap_or(char::REPLACEMENT_CHARACTER))
}
