//! Backtracking matcher
//!
//!     [Packrat] walks a validated [Grammar] over an input string, starting at the grammar's
//!     first rule, and builds a [Tree] of what matched. Despite the name there is no memo
//!     table: each attempt is plain recursive descent with checkpoint and restore.
//!
//! Matching Layers
//!
//!     rule        ordered choice: productions are tried in declaration order, the first
//!                 one that matches wins
//!     production  sequence: every token must match; its nodes are added flat to the
//!                 enclosing rule's node
//!     quantifier  `?`, `+` and `*` repeat the lookahead layer
//!     lookahead   `&` and `!` try the base match and always give the input back
//!     token       one intrinsic class, rule reference, character or string literal
//!
//!     Every layer leaves the cursor where it found it when it reports no match. A failed
//!     attempt is `Ok(false)`; errors are reserved for outcomes that end the whole parse.
//!
//! Result Tree
//!
//!     The root is named after the start rule. Every matched rule reference adds a branch
//!     tagged `rule` named after the rule. Terminals become leaves named after the grammar
//!     token, tagged `intrinsic`, `charLiteral` or `stringLiteral`, with the attributes
//!     `expected` (the token) and `value` (the matched text). The empty marker matches without
//!     adding anything.

pub mod cursor;
pub mod entity;

pub use cursor::{Checkpoint, Cursor};
pub use entity::Entities;

use crate::rat::config::{EntityConfig, MatcherConfig};
use crate::rat::error::{EntityError, ParseError};
use crate::rat::peg::{Grammar, Lookahead, Production, Quantifier, Token, TokenKind};
use crate::rat::tree::{NodeId, Tree};

#[derive(Debug, Clone, Default)]
pub struct Packrat {
    config: MatcherConfig,
    entities: Entities,
}

impl Packrat {
    pub fn new() -> Self {
        Packrat::default()
    }

    pub fn with_config(config: MatcherConfig) -> Self {
        Packrat {
            config,
            entities: Entities::new(),
        }
    }

    /// Replaces the vocabulary, so call it before registering entities
    pub fn with_entity_config(mut self, config: EntityConfig) -> Self {
        self.entities = Entities::with_config(config);
        self
    }

    pub fn config(&self) -> &MatcherConfig {
        &self.config
    }

    pub fn entities(&self) -> &Entities {
        &self.entities
    }

    /// Register a vocabulary word, see [Entities::entity]
    pub fn entity(&mut self, category: &str, name: &str) {
        self.entities.entity(category, name);
    }

    /// Resolve a possibly abbreviated word, see [Entities::canonicalize]
    pub fn canonicalize(&self, category: &str, value: &str) -> Result<String, EntityError> {
        self.entities.canonicalize(category, value)
    }

    /// Match `input` against the start rule of `grammar`
    pub fn parse(&self, grammar: &Grammar, input: &str) -> Result<Tree, ParseError> {
        let start = grammar.first_rule();
        log::debug!("parsing {} characters from rule '{}'", input.chars().count(), start);

        let mut tree = Tree::new(start);
        let root = tree.root();
        tree[root].tag("rule");

        let mut session = Session {
            grammar,
            config: &self.config,
            cursor: Cursor::new(input),
            tree: &mut tree,
            depth: 0,
        };

        if !session.match_rule(start, root)? {
            log::debug!("no production of '{}' matched", start);
            return Err(ParseError::Failed);
        }

        if self.config.require_full_match && !session.cursor.at_end() {
            let position = session.cursor.position();
            log::debug!("trailing input at {}: {:?}", position, session.cursor.rest());
            return Err(ParseError::TrailingInput { position });
        }

        Ok(tree)
    }
}

/// State of one parse: the cursor, the tree under construction and the rule nesting depth
struct Session<'a> {
    grammar: &'a Grammar,
    config: &'a MatcherConfig,
    cursor: Cursor,
    tree: &'a mut Tree,
    depth: usize,
}

impl Session<'_> {
    /// Try each production of `name` in order; the first full match is added to `out`
    fn match_rule(&mut self, name: &str, out: NodeId) -> Result<bool, ParseError> {
        self.depth += 1;
        if self.config.max_depth > 0 && self.depth > self.config.max_depth {
            return Err(ParseError::DepthExceeded {
                limit: self.config.max_depth,
            });
        }

        let matched = self.match_alternatives(name, out);
        self.depth -= 1;
        matched
    }

    fn match_alternatives(&mut self, name: &str, out: NodeId) -> Result<bool, ParseError> {
        let grammar = self.grammar;
        let Some(rule) = grammar.rule(name) else {
            return Ok(false);
        };

        log::trace!("{}rule {} at {}", self.indent(), name, self.cursor.position());
        let checkpoint = self.cursor.checkpoint();
        for production in rule.productions() {
            if self.match_production(production, out)? {
                return Ok(true);
            }
        }

        self.cursor.restore(checkpoint);
        Ok(false)
    }

    /// All tokens in order, or nothing at all
    fn match_production(
        &mut self,
        production: &Production,
        out: NodeId,
    ) -> Result<bool, ParseError> {
        let checkpoint = self.cursor.checkpoint();
        let collector = self.tree.new_node("production");

        for token in production.tokens() {
            match self.match_token_quantified(token, collector) {
                Ok(true) => {}
                Ok(false) => {
                    self.cursor.restore(checkpoint);
                    self.tree.dispose(collector);
                    return Ok(false);
                }
                Err(err) => {
                    self.tree.dispose(collector);
                    return Err(err);
                }
            }
        }

        self.tree.splice_branches(out, collector);
        self.tree.dispose(collector);
        Ok(true)
    }

    fn match_token_quantified(&mut self, token: &Token, out: NodeId) -> Result<bool, ParseError> {
        match token.quantifier() {
            Quantifier::One => self.match_token_lookahead(token, out),
            Quantifier::ZeroOrOne => {
                self.match_token_lookahead(token, out)?;
                Ok(true)
            }
            Quantifier::OneOrMore => {
                if !self.match_token_lookahead(token, out)? {
                    return Ok(false);
                }
                self.repeat(token, out)?;
                Ok(true)
            }
            Quantifier::ZeroOrMore => {
                self.repeat(token, out)?;
                Ok(true)
            }
        }
    }

    /// Greedy repetition. Stops at the first failure, or at a match that consumed nothing
    /// since that one would repeat forever. Nodes of a zero-width match are dropped.
    fn repeat(&mut self, token: &Token, out: NodeId) -> Result<(), ParseError> {
        loop {
            let before = self.cursor.checkpoint();
            let collector = self.tree.new_node("repetition");
            let matched = self.match_token_lookahead(token, collector);
            let progressed = matches!(matched, Ok(true)) && self.cursor.checkpoint() != before;
            if progressed {
                self.tree.splice_branches(out, collector);
            }
            self.tree.dispose(collector);

            if !matched? || !progressed {
                return Ok(());
            }
        }
    }

    fn match_token_lookahead(&mut self, token: &Token, out: NodeId) -> Result<bool, ParseError> {
        let wanted = match token.lookahead() {
            Lookahead::None => return self.match_token(token, out),
            Lookahead::Positive => true,
            Lookahead::Negative => false,
        };

        let checkpoint = self.cursor.checkpoint();
        let scratch = self.tree.new_node("lookahead");
        let matched = self.match_token(token, scratch);
        self.tree.dispose(scratch);
        self.cursor.restore(checkpoint);

        Ok(matched? == wanted)
    }

    /// Base match, ignoring quantifier and lookahead
    fn match_token(&mut self, token: &Token, out: NodeId) -> Result<bool, ParseError> {
        log::trace!("{}token {} at {}", self.indent(), token, self.cursor.position());

        let value = match token.kind() {
            TokenKind::Empty => return Ok(true),
            TokenKind::RuleRef => return self.match_rule_ref(token.text(), out),
            TokenKind::Intrinsic(class) => self
                .cursor
                .skip_if(|c| class.accepts(c))
                .map(|c| ("intrinsic", c.to_string())),
            TokenKind::CharLiteral(expected) => self
                .cursor
                .skip_if(|c| c == *expected)
                .map(|c| ("charLiteral", c.to_string())),
            TokenKind::StringLiteral(expected) => self
                .cursor
                .skip_literal(expected)
                .then(|| ("stringLiteral", expected.clone())),
        };

        let Some((tag, value)) = value else {
            return Ok(false);
        };

        log::trace!("{}matched {:?}", self.indent(), value);
        let leaf = self.tree.new_node(token.text());
        let node = &mut self.tree[leaf];
        node.tag(tag);
        node.set_attribute("expected", token.text());
        node.set_attribute("value", value);
        self.tree.add_branch(out, leaf);
        Ok(true)
    }

    fn match_rule_ref(&mut self, name: &str, out: NodeId) -> Result<bool, ParseError> {
        let branch = self.tree.new_node(name);
        self.tree[branch].tag("rule");

        match self.match_rule(name, branch) {
            Ok(true) => {
                self.tree.add_branch(out, branch);
                Ok(true)
            }
            other => {
                self.tree.dispose(branch);
                other
            }
        }
    }

    fn indent(&self) -> String {
        "  ".repeat(self.depth)
    }
}
