//! Grammar model and loader
//!
//!     A grammar is a set of named rules. A rule is an ordered list of productions (ordered
//!     choice: the first production that matches wins). A production is a sequence of tokens
//!     that must all match in order.
//!
//! Grammar Language
//!
//!     rule-name:  alternative1-token1 alternative1-token2
//!                 alternative2-token1
//!
//!     - A token ending in a colon names a rule. The first rule declared is the start rule.
//!     - Every following line is a new alternative of the open rule, unless it is indented
//!       deeper than the column the current alternative started at; then it continues it.
//!     - A blank line closes the rule.
//!     - `'x'` is a character literal, `"text"` a string literal, `<digit>` an intrinsic
//!       character class. Anything else refers to a rule.
//!     - A trailing `?`, `+` or `*` sets the quantifier, a leading `&` or `!` makes the token a
//!       positive or negative lookahead.
//!     - `є` stands for the empty set and always matches.
//!     - `#` starts a comment that runs to the end of the line.
//!
//!     The loader checks the grammar before handing it out: every referenced rule exists, no
//!     rule starts by referring to itself, no rule name is a literal, and every rule except
//!     the start rule is used somewhere.

pub mod grammar;
pub mod lexer;
pub mod loader;
pub mod token;
pub mod validate;

pub use grammar::{Grammar, Production, Rule};
pub use loader::GrammarLoader;
pub use token::{Intrinsic, Lookahead, Quantifier, Token, TokenKind};
pub use validate::validate;
