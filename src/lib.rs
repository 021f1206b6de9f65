use indexmap::IndexMap;

mod options;
mod parse;
mod tokenize;
mod value;

pub use options::ParseOptions;
pub use parse::{parse, parse_with_options, ParseError, TokenParseError};
pub use tokenize::{tokenize, Token, TokenKind, TokenizeError};

/// Key/value pairs of a JSON object, in the order the keys first appeared.
pub type Object = IndexMap<String, Value>;

#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    /// literal characters `null`
    #[default]
    Null,

    /// literal characters `true` or `false`
    Bool(bool),

    /// a number literal without a decimal point
    Integer(i64),

    /// a number literal with a decimal point
    Float(f64),

    /// a string of characters wrapped in double quotes
    String(String),

    /// an array of values
    Array(Vec<Value>),

    /// an object with key-value pairs
    Object(Object),
}
