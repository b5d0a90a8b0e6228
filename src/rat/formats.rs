//! Output formats for parse trees and grammars
//!
//! - `treeviz`: box-drawing tree, one line per node
//! - `tag`: XML-like elements
//! - `dump`: the plain diagnostic listing of [Tree::dump] or [Grammar::dump]
//! - `json`, `yaml`: serde serializations of the tree snapshot or the grammar
//!
//! Grammars support `dump`, `json` and `yaml`.

pub mod tag;
pub mod treeviz;

pub use tag::serialize_snapshot as serialize_tag;
pub use treeviz::to_treeviz_str;

use std::fmt;
use std::str::FromStr;

use crate::rat::peg::Grammar;
use crate::rat::tree::Tree;

/// Error that can occur during formatting
#[derive(Debug, Clone, PartialEq)]
pub enum FormatError {
    /// No format with this name
    FormatNotFound(String),
    /// The format cannot render this kind of value
    Unsupported { format: String, subject: String },
    /// Error during serialization
    SerializationError(String),
}

impl fmt::Display for FormatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormatError::FormatNotFound(name) => write!(f, "Format '{name}' not found"),
            FormatError::Unsupported { format, subject } => {
                write!(f, "Format '{format}' cannot render a {subject}")
            }
            FormatError::SerializationError(msg) => write!(f, "Serialization error: {msg}"),
        }
    }
}

impl std::error::Error for FormatError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutputFormat {
    Treeviz,
    Tag,
    Dump,
    Json,
    Yaml,
}

impl OutputFormat {
    pub const ALL: [OutputFormat; 5] = [
        OutputFormat::Treeviz,
        OutputFormat::Tag,
        OutputFormat::Dump,
        OutputFormat::Json,
        OutputFormat::Yaml,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            OutputFormat::Treeviz => "treeviz",
            OutputFormat::Tag => "tag",
            OutputFormat::Dump => "dump",
            OutputFormat::Json => "json",
            OutputFormat::Yaml => "yaml",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            OutputFormat::Treeviz => "Box-drawing tree, one line per node",
            OutputFormat::Tag => "XML-like tag format with hierarchical structure",
            OutputFormat::Dump => "Plain diagnostic listing",
            OutputFormat::Json => "JSON serialization",
            OutputFormat::Yaml => "YAML serialization",
        }
    }

    pub fn supports_grammar(&self) -> bool {
        matches!(
            self,
            OutputFormat::Dump | OutputFormat::Json | OutputFormat::Yaml
        )
    }

    /// All format names (sorted)
    pub fn list_formats() -> Vec<&'static str> {
        let mut names: Vec<_> = Self::ALL.iter().map(OutputFormat::name).collect();
        names.sort();
        names
    }
}

impl FromStr for OutputFormat {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|format| format.name() == s)
            .ok_or_else(|| FormatError::FormatNotFound(s.to_string()))
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Render a whole parse tree
pub fn render_tree(tree: &Tree, format: OutputFormat) -> Result<String, FormatError> {
    let root = tree.root();
    match format {
        OutputFormat::Treeviz => Ok(to_treeviz_str(&tree.snapshot(root))),
        OutputFormat::Tag => Ok(serialize_tag(&tree.snapshot(root))),
        OutputFormat::Dump => Ok(tree.dump(root)),
        OutputFormat::Json => serde_json::to_string_pretty(&tree.snapshot(root))
            .map_err(|err| FormatError::SerializationError(err.to_string())),
        OutputFormat::Yaml => serde_yaml::to_string(&tree.snapshot(root))
            .map_err(|err| FormatError::SerializationError(err.to_string())),
    }
}

pub fn render_grammar(grammar: &Grammar, format: OutputFormat) -> Result<String, FormatError> {
    match format {
        OutputFormat::Dump => Ok(grammar.dump()),
        OutputFormat::Json => serde_json::to_string_pretty(grammar)
            .map_err(|err| FormatError::SerializationError(err.to_string())),
        OutputFormat::Yaml => serde_yaml::to_string(grammar)
            .map_err(|err| FormatError::SerializationError(err.to_string())),
        OutputFormat::Treeviz | OutputFormat::Tag => Err(FormatError::Unsupported {
            format: format.name().to_string(),
            subject: "grammar".to_string(),
        }),
    }
}
