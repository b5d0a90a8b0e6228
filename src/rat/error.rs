//! Error types for grammar loading, matching and entity resolution
//!
//! Ordinary backtracking inside the matcher is not represented here: a token
//! or production that does not match is a plain `false`. These types cover
//! the outcomes a caller has to handle.

use std::fmt;

use crate::rat::formats::FormatError;

/// Errors raised while loading or validating a grammar
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GrammarError {
    /// The grammar file could not be read
    Io(String),
    /// A line could not be tokenized (unterminated quote, stray character)
    Lexical { line: usize, message: String },
    /// A production line appeared while no rule was open
    IncompleteLine { line: usize, text: String },
    /// A rule name was declared twice
    DuplicateDefinition(String),
    /// An `<name>` token that is not a known intrinsic class
    UnknownIntrinsic(String),
    NoRules,
    UndefinedReference(String),
    LeftRecursive(String),
    LiteralRuleName(String),
    Unreferenced(String),
}

impl fmt::Display for GrammarError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GrammarError::Io(msg) => write!(f, "IO error: {}", msg),
            GrammarError::Lexical { line, message } => {
                write!(f, "Line {}: {}", line, message)
            }
            GrammarError::IncompleteLine { line, text } => {
                write!(f, "Incomplete line {}: {}", line, text)
            }
            GrammarError::DuplicateDefinition(name) => {
                write!(f, "Definition '{}' is defined more than once.", name)
            }
            GrammarError::UnknownIntrinsic(name) => {
                write!(f, "Intrinsic '{}' is not recognized.", name)
            }
            GrammarError::NoRules => write!(f, "There are no rules defined."),
            GrammarError::UndefinedReference(name) => {
                write!(f, "Definition '{}' referenced, but not defined.", name)
            }
            GrammarError::LeftRecursive(name) => {
                write!(f, "Definition '{}' is left recursive.", name)
            }
            GrammarError::LiteralRuleName(name) => {
                write!(f, "Definition '{}' must not be a literal.", name)
            }
            GrammarError::Unreferenced(name) => {
                write!(f, "Definition '{}' is defined, but not referenced.", name)
            }
        }
    }
}

impl std::error::Error for GrammarError {}

impl From<std::io::Error> for GrammarError {
    fn from(err: std::io::Error) -> Self {
        GrammarError::Io(err.to_string())
    }
}

/// Errors that end a parse
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// No production of the start rule matched
    Failed,
    /// The start rule matched but left input behind (character offset)
    TrailingInput { position: usize },
    /// Rule nesting went past the configured ceiling
    DepthExceeded { limit: usize },
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::Failed => write!(f, "Parse failed."),
            ParseError::TrailingInput { position } => {
                write!(f, "Parse failed: trailing input at position {}.", position)
            }
            ParseError::DepthExceeded { limit } => {
                write!(f, "Parse failed: rule nesting exceeded the depth limit of {}.", limit)
            }
        }
    }
}

impl std::error::Error for ParseError {}

/// Canonicalization found no candidate, or more than one
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntityError {
    NotFound { category: String, value: String },
}

impl fmt::Display for EntityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityError::NotFound { category, value } => {
                write!(f, "Entity '{}' not found in '{}'.", value, category)
            }
        }
    }
}

impl std::error::Error for EntityError {}

/// Umbrella error for the front end and the processing helpers
#[derive(Debug, Clone, PartialEq)]
pub enum RatError {
    Grammar(GrammarError),
    Parse(ParseError),
    Entity(EntityError),
    Config(String),
    Format(String),
}

impl fmt::Display for RatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RatError::Grammar(err) => write!(f, "{}", err),
            RatError::Parse(err) => write!(f, "{}", err),
            RatError::Entity(err) => write!(f, "{}", err),
            RatError::Config(msg) => write!(f, "Configuration error: {}", msg),
            RatError::Format(msg) => write!(f, "Format error: {}", msg),
        }
    }
}

impl std::error::Error for RatError {}

impl From<GrammarError> for RatError {
    fn from(err: GrammarError) -> Self {
        RatError::Grammar(err)
    }
}

impl From<ParseError> for RatError {
    fn from(err: ParseError) -> Self {
        RatError::Parse(err)
    }
}

impl From<EntityError> for RatError {
    fn from(err: EntityError) -> Self {
        RatError::Entity(err)
    }
}

impl From<FormatError> for RatError {
    fn from(err: FormatError) -> Self {
        RatError::Format(err.to_string())
    }
}

impl From<config::ConfigError> for RatError {
    fn from(err: config::ConfigError) -> Self {
        RatError::Config(err.to_string())
    }
}
