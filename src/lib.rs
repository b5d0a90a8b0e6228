//! # rat
//!
//! A small parsing toolkit: a loader and validator for a line-oriented PEG
//! grammar language, and a backtracking matcher that walks a loaded grammar
//! against input text to produce a parse tree.
//!
//! ```text
//! grammar text ──▶ GrammarLoader ──▶ Grammar ──▶ Packrat::parse(input) ──▶ Tree
//! ```
//!
//! See [rat::peg] for the grammar language, [rat::packrat] for the matcher
//! and [rat::tree] for the result structure.

pub mod rat;
