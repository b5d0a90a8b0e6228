//! Static soundness checks
//!
//! Checks run in a fixed order and the first violation wins:
//!
//!     1. no rules at all
//!     2. a rule reference with no matching rule
//!     3. a production that starts with a reference to its own rule
//!     4. a rule whose name is a quoted literal
//!     5. a rule, other than the start rule, that nothing references
//!
//! Rules are visited in name order, so the reported name does not depend on declaration order.

use std::collections::BTreeSet;

use super::grammar::Grammar;
use crate::rat::error::GrammarError;

pub fn validate(grammar: &Grammar) -> Result<(), GrammarError> {
    if grammar.is_empty() {
        return Err(GrammarError::NoRules);
    }

    let referenced: BTreeSet<&str> = grammar
        .rules()
        .values()
        .flat_map(|rule| rule.productions())
        .flat_map(|production| production.tokens())
        .filter(|token| token.is_rule_ref())
        .map(|token| token.text())
        .collect();

    if let Some(name) = referenced.iter().find(|name| !grammar.has_rule(name)) {
        return Err(GrammarError::UndefinedReference(name.to_string()));
    }

    for (name, rule) in grammar.rules() {
        let starts_with_self = rule.productions().iter().any(|production| {
            production
                .tokens()
                .first()
                .is_some_and(|first| first.is_rule_ref() && first.text() == name)
        });
        if starts_with_self {
            return Err(GrammarError::LeftRecursive(name.clone()));
        }
    }

    if let Some(name) = grammar
        .rules()
        .keys()
        .find(|name| name.starts_with('\'') || name.starts_with('"'))
    {
        return Err(GrammarError::LiteralRuleName(name.clone()));
    }

    if let Some(name) = grammar
        .rules()
        .keys()
        .find(|name| *name != grammar.first_rule() && !referenced.contains(name.as_str()))
    {
        return Err(GrammarError::Unreferenced(name.clone()));
    }

    Ok(())
}
