//! Grammar data model
//!
//! A [Grammar] maps rule names to [Rule]s and remembers which rule was declared first; that
//! rule is where matching starts. Grammars are built once by the loader and never change
//! afterwards, so one grammar can serve any number of parses.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::ops::Index;

use super::token::Token;

/// One alternative of a rule: tokens that must all match, in order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Production {
    tokens: Vec<Token>,
}

impl Production {
    pub fn new(tokens: Vec<Token>) -> Self {
        Production { tokens }
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub(crate) fn push(&mut self, token: Token) {
        self.tokens.push(token);
    }
}

impl Index<usize> for Production {
    type Output = Token;

    fn index(&self, index: usize) -> &Token {
        &self.tokens[index]
    }
}

/// Ordered alternatives; the first production that matches wins
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Rule {
    productions: Vec<Production>,
}

impl Rule {
    pub fn new(productions: Vec<Production>) -> Self {
        Rule { productions }
    }

    pub fn productions(&self) -> &[Production] {
        &self.productions
    }

    pub fn len(&self) -> usize {
        self.productions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.productions.is_empty()
    }

    pub(crate) fn push(&mut self, production: Production) {
        self.productions.push(production);
    }

    pub(crate) fn last_mut(&mut self) -> Option<&mut Production> {
        self.productions.last_mut()
    }
}

impl Index<usize> for Rule {
    type Output = Production;

    fn index(&self, index: usize) -> &Production {
        &self.productions[index]
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grammar {
    start: String,
    rules: BTreeMap<String, Rule>,
}

impl Grammar {
    pub(crate) fn new() -> Self {
        Grammar::default()
    }

    /// The first rule declared: the start symbol
    pub fn first_rule(&self) -> &str {
        &self.start
    }

    pub fn rule(&self, name: &str) -> Option<&Rule> {
        self.rules.get(name)
    }

    pub fn has_rule(&self, name: &str) -> bool {
        self.rules.contains_key(name)
    }

    /// Rules in name order
    pub fn rules(&self) -> &BTreeMap<String, Rule> {
        &self.rules
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Register an empty rule. Returns false if the name is already taken.
    pub(crate) fn open_rule(&mut self, name: &str) -> bool {
        if self.rules.contains_key(name) {
            return false;
        }
        if self.start.is_empty() {
            self.start = name.to_string();
        }
        self.rules.insert(name.to_string(), Rule::default());
        true
    }

    pub(crate) fn rule_mut(&mut self, name: &str) -> Option<&mut Rule> {
        self.rules.get_mut(name)
    }

    /// Diagnostic listing: one block per rule, the start rule marked with `▶`
    pub fn dump(&self) -> String {
        let mut out = String::from("PEG\n");

        let longest = self.rules.keys().map(|n| n.chars().count()).max().unwrap_or(0);

        for (name, rule) in &self.rules {
            let marker = if *name == self.start { "▶" } else { " " };
            out.push_str(&format!(
                "  {} {}:{}",
                marker,
                name,
                " ".repeat(1 + longest - name.chars().count())
            ));

            for (i, production) in rule.productions().iter().enumerate() {
                if i > 0 {
                    out.push_str(&" ".repeat(6 + longest));
                }
                for token in production.tokens() {
                    out.push(' ');
                    out.push_str(&token.to_string());
                }
                out.push('\n');
            }

            out.push('\n');
        }

        out
    }
}

impl Index<&str> for Grammar {
    type Output = Rule;

    fn index(&self, name: &str) -> &Rule {
        match self.rules.get(name) {
            Some(rule) => rule,
            None => panic!("no rule named '{}'", name),
        }
    }
}
