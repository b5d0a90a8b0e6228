//! Main module for rat library functionality

pub mod config;
pub mod error;
pub mod formats;
pub mod packrat;
pub mod peg;
pub mod tree;

pub use error::{EntityError, GrammarError, ParseError, RatError};
pub use packrat::Packrat;
pub use peg::{Grammar, GrammarLoader};
pub use tree::{NodeId, Tree};

/// Load `grammar` text and parse `input` against it with default settings.
pub fn parse_with_grammar(grammar: &str, input: &str) -> Result<Tree, RatError> {
    let grammar = GrammarLoader::from_string(grammar).load()?;
    Ok(Packrat::new().parse(&grammar, input)?)
}
