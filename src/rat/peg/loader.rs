//! Grammar loading
//!
//! `GrammarLoader` reads grammar text from a file or a string and folds it, line by line,
//! into a [Grammar]. The only state carried between lines is the [Scope]: which rule is open
//! and at which column its current production started. The finished grammar goes through
//! [validate](super::validate::validate) before it is handed out.

use std::fs;
use std::path::Path;

use super::grammar::{Grammar, Production};
use super::lexer::{tokenize_line, Lexeme};
use super::token::Token;
use super::validate::validate;
use crate::rat::config::GrammarConfig;
use crate::rat::error::GrammarError;

/// Loader state between lines
#[derive(Debug, Clone, PartialEq, Eq)]
enum Scope {
    NoRuleOpen,
    RuleOpen {
        name: String,
        /// Column of the first token of the current production, once there is one
        production_column: Option<usize>,
    },
}

pub struct GrammarLoader {
    source: String,
    config: GrammarConfig,
}

impl GrammarLoader {
    /// Read the grammar from a file
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, GrammarError> {
        let source = fs::read_to_string(path)?;
        Ok(GrammarLoader::from_string(source))
    }

    pub fn from_string<S: Into<String>>(source: S) -> Self {
        GrammarLoader {
            source: source.into(),
            config: GrammarConfig::default(),
        }
    }

    pub fn with_config(mut self, config: GrammarConfig) -> Self {
        self.config = config;
        self
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Build and validate the grammar
    pub fn load(&self) -> Result<Grammar, GrammarError> {
        let mut grammar = Grammar::new();

        self.source
            .lines()
            .enumerate()
            .try_fold(Scope::NoRuleOpen, |scope, (index, line)| {
                self.fold_line(&mut grammar, scope, index + 1, line)
            })?;

        log::trace!("loaded grammar:\n{}", grammar.dump());
        validate(&grammar)?;
        log::debug!(
            "grammar valid: {} rules, start rule '{}'",
            grammar.rules().len(),
            grammar.first_rule()
        );
        Ok(grammar)
    }

    fn fold_line(
        &self,
        grammar: &mut Grammar,
        scope: Scope,
        line_number: usize,
        line: &str,
    ) -> Result<Scope, GrammarError> {
        let lexemes = tokenize_line(line).map_err(|(column, rest)| GrammarError::Lexical {
            line: line_number,
            message: format!("cannot tokenize '{}' at column {}", rest.trim_end(), column),
        })?;

        if lexemes.is_empty() {
            if line.trim().is_empty() {
                if let Scope::RuleOpen { name, .. } = &scope {
                    log::debug!("line {}: blank, closing rule '{}'", line_number, name);
                }
                return Ok(Scope::NoRuleOpen);
            }
            // Comment only
            return Ok(scope);
        }

        log::debug!("line {}: {}", line_number, line.trim());

        let mut scope = scope;
        let mut production_open_on_line = false;

        for lexeme in &lexemes {
            if lexeme.is_rule_header() {
                let text = lexeme.text();
                let name = &text[..text.len() - 1];
                if !grammar.open_rule(name) {
                    return Err(GrammarError::DuplicateDefinition(name.to_string()));
                }
                log::debug!("line {}: rule '{}' opened", line_number, name);
                scope = Scope::RuleOpen {
                    name: name.to_string(),
                    production_column: None,
                };
                production_open_on_line = false;
                continue;
            }

            let Scope::RuleOpen {
                name,
                production_column,
            } = &mut scope
            else {
                return Err(GrammarError::IncompleteLine {
                    line: line_number,
                    text: line.trim().to_string(),
                });
            };

            let token = Token::decorate(lexeme.text(), &self.config.empty_marker)?;
            let rule = grammar
                .rule_mut(name)
                .ok_or_else(|| GrammarError::UndefinedReference(name.clone()))?;

            if !production_open_on_line {
                if !continues_production(lexeme, *production_column) {
                    rule.push(Production::default());
                    *production_column = Some(lexeme.column);
                }
                production_open_on_line = true;
            }

            if let Some(production) = rule.last_mut() {
                production.push(token);
            }
        }

        Ok(scope)
    }
}

/// A line indented deeper than the start of the current production extends that production
fn continues_production(first: &Lexeme, production_column: Option<usize>) -> bool {
    matches!(production_column, Some(column) if first.column > column)
}
