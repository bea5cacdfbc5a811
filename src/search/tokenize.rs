//! Query tokenizer: splits a raw query string into lexical tokens.
//!
//! Recognized, in priority order:
//! - `"quoted phrases"` (an unclosed quote is an error)
//! - `(` and `)`
//! - `field:value`, where the value is a word, a wildcard or a quoted phrase
//! - `word~` / `word~N` fuzzy terms
//! - words containing `*` or `?` (wildcards)
//! - the case-sensitive keywords `AND`, `OR`, `NOT`
//! - plain words
//!
//! Whitespace separates tokens and never produces one.

use crate::error::QuerySyntaxError;
use std::fmt;

/// Edit distance used by `word~` when no threshold is given.
pub(crate) const DEFAULT_FUZZY_DISTANCE: usize = 1;

/// The value half of a `field:value` token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Word(String),
    Wildcard(String),
    Phrase(String),
}

/// A lexical token of the query language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    LParen,
    RParen,
    And,
    Or,
    Not,
    Phrase(String),
    Field { name: String, value: FieldValue },
    Fuzzy { term: String, distance: usize },
    Wildcard(String),
    Word(String),
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LParen => f.write_str("("),
            Self::RParen => f.write_str(")"),
            Self::And => f.write_str("AND"),
            Self::Or => f.write_str("OR"),
            Self::Not => f.write_str("NOT"),
            Self::Phrase(text) => write!(f, "\"{}\"", text),
            Self::Field { name, value } => match value {
                FieldValue::Word(v) | FieldValue::Wildcard(v) => write!(f, "{}:{}", name, v),
                FieldValue::Phrase(v) => write!(f, "{}:\"{}\"", name, v),
            },
            Self::Fuzzy { term, distance } => write!(f, "{}~{}", term, distance),
            Self::Wildcard(pattern) => f.write_str(pattern),
            Self::Word(word) => f.write_str(word),
        }
    }
}

/// Tokenize a query string.
///
/// An empty or whitespace-only query yields no tokens.
pub fn tokenize(query: &str) -> Result<Vec<Token>, QuerySyntaxError> {
    let mut tokens = vec![];
    let mut chars = query.char_indices().peekable();

    while let Some(&(start, c)) = chars.peek() {
        if c.is_whitespace() {
            chars.next();
            continue;
        }

        match c {
            '"' => {
                chars.next();
                let text = read_phrase(query, start, &mut chars)?;
                tokens.push(Token::Phrase(text));
            }
            '(' => {
                chars.next();
                tokens.push(Token::LParen);
            }
            ')' => {
                chars.next();
                tokens.push(Token::RParen);
            }
            _ => {
                // A bare run ends at whitespace, a parenthesis or a quote.
                let mut end = query.len();
                while let Some(&(i, c)) = chars.peek() {
                    if c.is_whitespace() || matches!(c, '(' | ')' | '"') {
                        end = i;
                        break;
                    }
                    chars.next();
                }
                let run = &query[start..end];

                // `field:"quoted value"`
                if let Some(name) = run.strip_suffix(':')
                    && is_identifier(name)
                    && let Some(&(quote, '"')) = chars.peek()
                {
                    chars.next();
                    let text = read_phrase(query, quote, &mut chars)?;
                    tokens.push(Token::Field {
                        name: name.to_string(),
                        value: FieldValue::Phrase(text),
                    });
                    continue;
                }

                tokens.push(classify(run));
            }
        }
    }

    tracing::trace!("Tokenized query {:?} into {} tokens", query, tokens.len());
    Ok(tokens)
}

/// Consume characters up to and including the closing quote.
fn read_phrase(
    query: &str,
    open: usize,
    chars: &mut std::iter::Peekable<std::str::CharIndices<'_>>,
) -> Result<String, QuerySyntaxError> {
    let content_start = open + 1;
    for (i, c) in chars.by_ref() {
        if c == '"' {
            return Ok(query[content_start..i].to_string());
        }
    }
    Err(QuerySyntaxError::UnterminatedPhrase { position: open })
}

/// Classify a whitespace-free run that is not a phrase or parenthesis.
fn classify(run: &str) -> Token {
    match run {
        "AND" => return Token::And,
        "OR" => return Token::Or,
        "NOT" => return Token::Not,
        _ => {}
    }

    if let Some((name, value)) = run.split_once(':')
        && is_identifier(name)
        && !value.is_empty()
    {
        let value = if is_wildcard(value) {
            FieldValue::Wildcard(value.to_string())
        } else {
            FieldValue::Word(value.to_string())
        };
        return Token::Field {
            name: name.to_string(),
            value,
        };
    }

    if let Some((term, distance)) = run.split_once('~')
        && !term.is_empty()
    {
        if distance.is_empty() {
            return Token::Fuzzy {
                term: term.to_string(),
                distance: DEFAULT_FUZZY_DISTANCE,
            };
        }
        if distance.bytes().all(|b| b.is_ascii_digit())
            && let Ok(distance) = distance.parse()
        {
            return Token::Fuzzy {
                term: term.to_string(),
                distance,
            };
        }
    }

    if is_wildcard(run) {
        return Token::Wildcard(run.to_string());
    }

    Token::Word(run.to_string())
}

fn is_identifier(name: &str) -> bool {
    !name.is_empty() && name.chars().all(|c| c.is_alphanumeric() || c == '_')
}

fn is_wildcard(text: &str) -> bool {
    text.contains(['*', '?'])
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert2::check;
    use rstest::rstest;

    fn word(w: &str) -> Token {
        Token::Word(w.to_string())
    }

    #[rstest]
    #[case("", vec![])]
    #[case("   \t\n", vec![])]
    #[case("react", vec![word("react")])]
    #[case("react hooks", vec![word("react"), word("hooks")])]
    #[case("a AND b", vec![word("a"), Token::And, word("b")])]
    #[case("a and b", vec![word("a"), word("and"), word("b")])]
    #[case("(a OR b)", vec![Token::LParen, word("a"), Token::Or, word("b"), Token::RParen])]
    #[case("NOT x", vec![Token::Not, word("x")])]
    fn test_words_and_operators(#[case] input: &str, #[case] expected: Vec<Token>) {
        check!(tokenize(input).unwrap() == expected);
    }

    #[rstest]
    #[case("\"use state\"", Token::Phrase("use state".to_string()))]
    #[case("re*", Token::Wildcard("re*".to_string()))]
    #[case("h?oks", Token::Wildcard("h?oks".to_string()))]
    #[case("raect~", Token::Fuzzy { term: "raect".to_string(), distance: 1 })]
    #[case("raect~2", Token::Fuzzy { term: "raect".to_string(), distance: 2 })]
    #[case("raect~x", word("raect~x"))]
    #[case("~2", word("~2"))]
    fn test_single_token(#[case] input: &str, #[case] expected: Token) {
        check!(tokenize(input).unwrap() == vec![expected]);
    }

    #[rstest]
    #[case("title:hooks", "title", FieldValue::Word("hooks".to_string()))]
    #[case("tags:re*", "tags", FieldValue::Wildcard("re*".to_string()))]
    #[case("title:\"hooks guide\"", "title", FieldValue::Phrase("hooks guide".to_string()))]
    #[case("path:hooks/guide", "path", FieldValue::Word("hooks/guide".to_string()))]
    fn test_field_tokens(#[case] input: &str, #[case] name: &str, #[case] value: FieldValue) {
        let expected = Token::Field {
            name: name.to_string(),
            value,
        };
        check!(tokenize(input).unwrap() == vec![expected]);
    }

    #[test]
    fn test_phrase_adjacent_to_words() {
        let tokens = tokenize("a\"b c\"d").unwrap();
        check!(tokens == vec![word("a"), Token::Phrase("b c".to_string()), word("d")]);
    }

    #[rstest]
    #[case("\"open", 0)]
    #[case("react \"open phrase", 6)]
    #[case("title:\"open", 6)]
    fn test_unterminated_phrase(#[case] input: &str, #[case] position: usize) {
        check!(tokenize(input) == Err(QuerySyntaxError::UnterminatedPhrase { position }));
    }

    #[test]
    fn test_empty_field_value_is_word() {
        check!(tokenize("title:").unwrap() == vec![word("title:")]);
    }

    #[test]
    fn test_display_round_trips_text() {
        let tokens = tokenize("title:\"a b\" x~2 (y)").unwrap();
        let rendered: Vec<String> = tokens.iter().map(ToString::to_string).collect();
        check!(rendered == vec!["title:\"a b\"", "x~2", "(", "y", ")"]);
    }

    #[rstest]
    #[case("日本 ~")]
    #[case("🦀*")]
    #[case("Москва~1")]
    fn test_unicode_handling(#[case] input: &str) {
        // Should not panic on multi-byte boundaries
        let _tokens = tokenize(input);
    }
}
