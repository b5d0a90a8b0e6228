//! Tokenizer for a single grammar line
//!
//! The tokenization is handled by logos. It only knows three shapes: quoted literals, bare
//! words and comments. There are deliberately no recognizers for numbers, operators, paths
//! or dates, so grammar vocabulary such as `2024-01-01`, `a/b` or `+=` passes through as a
//! single word. Decorations (`&`, `!`, `?`, `+`, `*`) and a rule-defining `:` stay attached
//! to their token and are interpreted by the loader.

use logos::Logos;

#[derive(Logos, Debug, PartialEq, Clone)]
#[logos(skip r"[ \t\r\f]+")]
pub enum LineToken {
    // Comments run to the end of the line. Inside quotes `#` is ordinary text.
    #[regex(r"#[^\n]*", logos::skip)]
    Comment,

    #[regex(r#"[&!]?'(\\.|[^'\\\n])*'[?+*:]?"#, |lex| lex.slice().to_string())]
    #[regex(r#"[&!]?"(\\.|[^"\\\n])*"[?+*:]?"#, |lex| lex.slice().to_string())]
    Quoted(String),

    #[regex(r##"[^\s'"#]+"##, |lex| lex.slice().to_string())]
    Word(String),
}

impl LineToken {
    pub fn text(&self) -> &str {
        match self {
            LineToken::Quoted(text) | LineToken::Word(text) => text,
            LineToken::Comment => "",
        }
    }
}

/// A token together with the character column it starts at
#[derive(Debug, Clone, PartialEq)]
pub struct Lexeme {
    pub token: LineToken,
    pub column: usize,
}

impl Lexeme {
    pub fn text(&self) -> &str {
        self.token.text()
    }

    /// `name:` opens a rule
    pub fn is_rule_header(&self) -> bool {
        let text = self.text();
        text.len() > 1 && text.ends_with(':')
    }
}

/// Tokenize one line. On failure returns the column and the offending text.
pub fn tokenize_line(line: &str) -> Result<Vec<Lexeme>, (usize, String)> {
    let mut lexer = LineToken::lexer(line);
    let mut lexemes = Vec::new();

    while let Some(result) = lexer.next() {
        let span = lexer.span();
        let column = line[..span.start].chars().count();
        match result {
            Ok(token) => lexemes.push(Lexeme { token, column }),
            Err(()) => return Err((column, line[span.start..].to_string())),
        }
    }

    Ok(lexemes)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(line: &str) -> Vec<String> {
        tokenize_line(line)
            .unwrap()
            .iter()
            .map(|l| l.text().to_string())
            .collect()
    }

    #[test]
    fn test_rule_line() {
        assert_eq!(
            texts("thing: <character> <digit>"),
            vec!["thing:", "<character>", "<digit>"]
        );
    }

    #[test]
    fn test_literals_keep_quotes_and_spaces() {
        assert_eq!(
            texts(r#"  "hello world" 'x' "a\"b""#),
            vec![r#""hello world""#, "'x'", r#""a\"b""#]
        );
    }

    #[test]
    fn test_decorations_stay_attached() {
        assert_eq!(
            texts("&'x' !\"y\"* word+ <digit>?"),
            vec!["&'x'", "!\"y\"*", "word+", "<digit>?"]
        );
    }

    #[test]
    fn test_comments_are_dropped() {
        assert_eq!(texts("a b # trailing comment"), vec!["a", "b"]);
        assert!(texts("# whole line").is_empty());
        assert_eq!(texts("'#' \"#\""), vec!["'#'", "\"#\""]);
    }

    #[test]
    fn test_words_end_at_quotes_and_comments() {
        assert_eq!(texts("ab#c"), vec!["ab"]);
        assert_eq!(texts("ab'c'"), vec!["ab", "'c'"]);
        assert_eq!(texts(r#"x"y z"?"#), vec!["x", r#""y z"?"#]);
    }

    #[test]
    fn test_no_higher_level_recognizers() {
        assert_eq!(
            texts("2024-01-01 a/b += 3.14 http://x"),
            vec!["2024-01-01", "a/b", "+=", "3.14", "http://x"]
        );
    }

    #[test]
    fn test_columns() {
        let lexemes = tokenize_line("rule:  a\tb").unwrap();
        let columns: Vec<usize> = lexemes.iter().map(|l| l.column).collect();
        assert_eq!(columns, vec![0, 7, 9]);
    }

    #[test]
    fn test_rule_header() {
        let lexemes = tokenize_line("name: ':' \"'a'\":").unwrap();
        assert!(lexemes[0].is_rule_header());
        assert!(!lexemes[1].is_rule_header());
        assert!(lexemes[2].is_rule_header());
    }

    #[test]
    fn test_unterminated_quote() {
        let (column, rest) = tokenize_line("a 'bc").unwrap_err();
        assert_eq!(column, 2);
        assert!(rest.starts_with('\''));
    }
}
