//! Grammar tokens
//!
//! A token is one symbol of a production. Its text keeps the shape written in the grammar
//! (quotes and angle brackets included); the decorations (`&`/`!` prefix, `?`/`+`/`*`
//! suffix) are stripped into [Lookahead] and [Quantifier]. The [TokenKind] is decided once,
//! at load time, from the shape of the remaining text.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

use crate::rat::error::GrammarError;

static INTRINSIC_SHAPE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^<([^<>\s]+)>$").unwrap());
static SINGLE_QUOTED: Lazy<Regex> = Lazy::new(|| Regex::new(r"^'((?:\\.|[^'\\])*)'$").unwrap());
static DOUBLE_QUOTED: Lazy<Regex> = Lazy::new(|| Regex::new(r#"^"((?:\\.|[^"\\])*)"$"#).unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Quantifier {
    #[default]
    One,
    ZeroOrOne,
    OneOrMore,
    ZeroOrMore,
}

impl Quantifier {
    fn from_suffix(c: char) -> Option<Self> {
        match c {
            '?' => Some(Quantifier::ZeroOrOne),
            '+' => Some(Quantifier::OneOrMore),
            '*' => Some(Quantifier::ZeroOrMore),
            _ => None,
        }
    }

    pub fn suffix(&self) -> &'static str {
        match self {
            Quantifier::One => "",
            Quantifier::ZeroOrOne => "?",
            Quantifier::OneOrMore => "+",
            Quantifier::ZeroOrMore => "*",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Lookahead {
    #[default]
    None,
    Positive,
    Negative,
}

impl Lookahead {
    fn from_prefix(c: char) -> Option<Self> {
        match c {
            '&' => Some(Lookahead::Positive),
            '!' => Some(Lookahead::Negative),
            _ => None,
        }
    }

    pub fn prefix(&self) -> &'static str {
        match self {
            Lookahead::None => "",
            Lookahead::Positive => "&",
            Lookahead::Negative => "!",
        }
    }
}

/// Built-in single character classes, written `<name>` in a grammar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Intrinsic {
    /// Any code point
    Character,
    Digit,
    Alpha,
    Alnum,
    Upper,
    Lower,
    Hex,
    Punct,
    /// Horizontal whitespace
    Ws,
    /// Vertical whitespace
    Eol,
}

impl Intrinsic {
    pub const ALL: [Intrinsic; 10] = [
        Intrinsic::Character,
        Intrinsic::Digit,
        Intrinsic::Alpha,
        Intrinsic::Alnum,
        Intrinsic::Upper,
        Intrinsic::Lower,
        Intrinsic::Hex,
        Intrinsic::Punct,
        Intrinsic::Ws,
        Intrinsic::Eol,
    ];

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|i| i.name() == name)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Intrinsic::Character => "character",
            Intrinsic::Digit => "digit",
            Intrinsic::Alpha => "alpha",
            Intrinsic::Alnum => "alnum",
            Intrinsic::Upper => "upper",
            Intrinsic::Lower => "lower",
            Intrinsic::Hex => "hex",
            Intrinsic::Punct => "punct",
            Intrinsic::Ws => "ws",
            Intrinsic::Eol => "eol",
        }
    }

    /// Does the class accept `c`?
    pub fn accepts(&self, c: char) -> bool {
        match self {
            Intrinsic::Character => true,
            Intrinsic::Digit => c.is_ascii_digit(),
            Intrinsic::Alpha => c.is_alphabetic(),
            Intrinsic::Alnum => c.is_alphanumeric(),
            Intrinsic::Upper => c.is_uppercase(),
            Intrinsic::Lower => c.is_lowercase(),
            Intrinsic::Hex => c.is_ascii_hexdigit(),
            Intrinsic::Punct => is_punctuation(c),
            Intrinsic::Ws => c.is_whitespace() && !is_vertical_whitespace(c),
            Intrinsic::Eol => is_vertical_whitespace(c),
        }
    }
}

fn is_punctuation(c: char) -> bool {
    c.is_ascii_punctuation()
        || matches!(
            c,
            '\u{00A1}'
                | '\u{00A7}'
                | '\u{00AB}'
                | '\u{00B6}'
                | '\u{00B7}'
                | '\u{00BB}'
                | '\u{00BF}'
                | '\u{2010}'..='\u{2027}'
                | '\u{2030}'..='\u{205E}'
                | '\u{2E00}'..='\u{2E7F}'
                | '\u{3001}'..='\u{3003}'
                | '\u{3008}'..='\u{3011}'
        )
}

fn is_vertical_whitespace(c: char) -> bool {
    matches!(
        c,
        '\n' | '\u{000B}' | '\u{000C}' | '\r' | '\u{0085}' | '\u{2028}' | '\u{2029}'
    )
}

/// What a token matches against
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TokenKind {
    Intrinsic(Intrinsic),
    /// A reference to a rule, by the token's text
    RuleRef,
    CharLiteral(char),
    StringLiteral(String),
    /// The empty-set marker: matches without consuming anything
    Empty,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    text: String,
    #[serde(default)]
    quantifier: Quantifier,
    #[serde(default)]
    lookahead: Lookahead,
    kind: TokenKind,
}

impl Token {
    /// Split the decorations off a raw grammar token and classify what is left
    pub fn decorate(raw: &str, empty_marker: &str) -> Result<Self, GrammarError> {
        let mut text = raw;

        let mut quantifier = Quantifier::One;
        if let Some(last) = text.chars().last() {
            if let Some(q) = Quantifier::from_suffix(last) {
                if text.len() > last.len_utf8() {
                    quantifier = q;
                    text = &text[..text.len() - last.len_utf8()];
                }
            }
        }

        let mut lookahead = Lookahead::None;
        if let Some(first) = text.chars().next() {
            if let Some(l) = Lookahead::from_prefix(first) {
                if text.len() > first.len_utf8() {
                    lookahead = l;
                    text = &text[first.len_utf8()..];
                }
            }
        }

        let kind = classify(text, empty_marker)?;
        Ok(Token {
            text: text.to_string(),
            quantifier,
            lookahead,
            kind,
        })
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn quantifier(&self) -> Quantifier {
        self.quantifier
    }

    pub fn lookahead(&self) -> Lookahead {
        self.lookahead
    }

    pub fn kind(&self) -> &TokenKind {
        &self.kind
    }

    pub fn is_literal(&self) -> bool {
        matches!(
            self.kind,
            TokenKind::CharLiteral(_) | TokenKind::StringLiteral(_)
        )
    }

    pub fn is_rule_ref(&self) -> bool {
        matches!(self.kind, TokenKind::RuleRef)
    }

    /// Classification tags: `intrinsic`, or `literal` together with `character` or `string`.
    /// Rule references and the empty marker carry none.
    pub fn tags(&self) -> BTreeSet<&'static str> {
        match self.kind {
            TokenKind::Intrinsic(_) => BTreeSet::from(["intrinsic"]),
            TokenKind::CharLiteral(_) => BTreeSet::from(["literal", "character"]),
            TokenKind::StringLiteral(_) => BTreeSet::from(["literal", "string"]),
            TokenKind::RuleRef | TokenKind::Empty => BTreeSet::new(),
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}{}",
            self.lookahead.prefix(),
            self.text,
            self.quantifier.suffix()
        )
    }
}

fn classify(text: &str, empty_marker: &str) -> Result<TokenKind, GrammarError> {
    if text == empty_marker {
        return Ok(TokenKind::Empty);
    }

    if let Some(caps) = INTRINSIC_SHAPE.captures(text) {
        return Intrinsic::from_name(&caps[1])
            .map(TokenKind::Intrinsic)
            .ok_or_else(|| GrammarError::UnknownIntrinsic(text.to_string()));
    }

    if let Some(caps) = SINGLE_QUOTED.captures(text) {
        let payload = unescape(&caps[1]);
        let mut chars = payload.chars();
        return Ok(match (chars.next(), chars.next()) {
            (Some(c), None) => TokenKind::CharLiteral(c),
            _ => TokenKind::StringLiteral(payload),
        });
    }

    if let Some(caps) = DOUBLE_QUOTED.captures(text) {
        return Ok(TokenKind::StringLiteral(unescape(&caps[1])));
    }

    Ok(TokenKind::RuleRef)
}

fn unescape(payload: &str) -> String {
    let mut result = String::with_capacity(payload.len());
    let mut chars = payload.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            result.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => result.push('\n'),
            Some('t') => result.push('\t'),
            Some('r') => result.push('\r'),
            Some(other @ ('\\' | '\'' | '"')) => result.push(other),
            Some(other) => {
                result.push('\\');
                result.push(other);
            }
            None => result.push('\\'),
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn token(raw: &str) -> Token {
        Token::decorate(raw, "є").unwrap()
    }

    #[rstest]
    #[case("name", "name", Quantifier::One, Lookahead::None)]
    #[case("name?", "name", Quantifier::ZeroOrOne, Lookahead::None)]
    #[case("name+", "name", Quantifier::OneOrMore, Lookahead::None)]
    #[case("name*", "name", Quantifier::ZeroOrMore, Lookahead::None)]
    #[case("&name", "name", Quantifier::One, Lookahead::Positive)]
    #[case("!name*", "name", Quantifier::ZeroOrMore, Lookahead::Negative)]
    #[case("!'x'?", "'x'", Quantifier::ZeroOrOne, Lookahead::Negative)]
    #[case("<digit>+", "<digit>", Quantifier::OneOrMore, Lookahead::None)]
    #[case("'+'", "'+'", Quantifier::One, Lookahead::None)]
    #[case("'!'", "'!'", Quantifier::One, Lookahead::None)]
    #[case("*", "*", Quantifier::One, Lookahead::None)]
    fn test_decoration(
        #[case] raw: &str,
        #[case] text: &str,
        #[case] quantifier: Quantifier,
        #[case] lookahead: Lookahead,
    ) {
        let t = token(raw);
        assert_eq!(t.text(), text);
        assert_eq!(t.quantifier(), quantifier);
        assert_eq!(t.lookahead(), lookahead);
    }

    #[rstest]
    #[case("<digit>", TokenKind::Intrinsic(Intrinsic::Digit))]
    #[case("<character>", TokenKind::Intrinsic(Intrinsic::Character))]
    #[case("'a'", TokenKind::CharLiteral('a'))]
    #[case("'\\''", TokenKind::CharLiteral('\''))]
    #[case("'ab'", TokenKind::StringLiteral("ab".into()))]
    #[case("\"a\"", TokenKind::StringLiteral("a".into()))]
    #[case("\"say \\\"hi\\\"\"", TokenKind::StringLiteral("say \"hi\"".into()))]
    #[case("\"\"", TokenKind::StringLiteral(String::new()))]
    #[case("expression", TokenKind::RuleRef)]
    #[case("є", TokenKind::Empty)]
    fn test_classification(#[case] raw: &str, #[case] kind: TokenKind) {
        assert_eq!(token(raw).kind(), &kind);
    }

    #[test]
    fn test_tags() {
        assert_eq!(token("<digit>").tags(), BTreeSet::from(["intrinsic"]));
        assert_eq!(token("'a'").tags(), BTreeSet::from(["literal", "character"]));
        assert_eq!(token("\"ab\"").tags(), BTreeSet::from(["literal", "string"]));
        assert!(token("rule").tags().is_empty());
    }

    #[test]
    fn test_unknown_intrinsic() {
        assert_eq!(
            Token::decorate("<nonsense>", "є"),
            Err(GrammarError::UnknownIntrinsic("<nonsense>".into()))
        );
    }

    #[test]
    fn test_display_restores_decorations() {
        assert_eq!(token("!'x'?").to_string(), "!'x'?");
        assert_eq!(token("&rule+").to_string(), "&rule+");
    }

    #[rstest]
    #[case(Intrinsic::Digit, '7', true)]
    #[case(Intrinsic::Digit, 'x', false)]
    #[case(Intrinsic::Alpha, 'é', true)]
    #[case(Intrinsic::Upper, 'Q', true)]
    #[case(Intrinsic::Lower, 'Q', false)]
    #[case(Intrinsic::Hex, 'f', true)]
    #[case(Intrinsic::Hex, 'g', false)]
    #[case(Intrinsic::Punct, ',', true)]
    #[case(Intrinsic::Punct, '\u{2014}', true)]
    #[case(Intrinsic::Punct, 'a', false)]
    #[case(Intrinsic::Ws, ' ', true)]
    #[case(Intrinsic::Ws, '\n', false)]
    #[case(Intrinsic::Eol, '\n', true)]
    #[case(Intrinsic::Eol, '\u{2028}', true)]
    #[case(Intrinsic::Character, '\n', true)]
    fn test_intrinsic_classes(#[case] class: Intrinsic, #[case] c: char, #[case] accepted: bool) {
        assert_eq!(class.accepts(c), accepted);
    }
}
