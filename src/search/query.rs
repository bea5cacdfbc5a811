//! Query AST and the recursive-descent parser that builds it.
//!
//! Grammar:
//!
//! ```text
//! Expression := Term ( [BooleanOp] Term | NOT Term | NOT )*
//! Term       := '(' Expression ')' | NOT Term | Phrase | Field | Fuzzy | Wildcard | Word
//! ```
//!
//! Operators chain strictly left to right with no precedence between them:
//! `a OR b AND c` is `(a OR b) AND c`. Two terms with no operator between them
//! are joined by an implicit `AND`. `NOT` is unary: `a NOT b` is `a AND (NOT b)`,
//! and a trailing `a NOT` negates everything to its left.

use super::tokenize::{FieldValue, Token, tokenize};
use crate::error::QuerySyntaxError;
use std::fmt;

/// Boolean combinator of a [`Query::Boolean`] node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BooleanOp {
    And,
    Or,
    /// Unary negation of the left operand; the node has no right child.
    Not,
}

impl fmt::Display for BooleanOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::And => "AND",
            Self::Or => "OR",
            Self::Not => "NOT",
        })
    }
}

/// A parsed query. Owned entirely by the parse call that produced it.
#[derive(Debug, Clone, PartialEq)]
pub enum Query {
    Term(String),
    Phrase(String),
    Wildcard(String),
    Fuzzy {
        term: String,
        distance: usize,
    },
    /// Restricts `inner` (a term, phrase or wildcard) to one named field.
    Field {
        name: String,
        inner: Box<Query>,
    },
    Boolean {
        left: Box<Query>,
        op: BooleanOp,
        right: Option<Box<Query>>,
    },
    Group(Box<Query>),
}

impl Query {
    pub fn and(left: Self, right: Self) -> Self {
        Self::Boolean {
            left: Box::new(left),
            op: BooleanOp::And,
            right: Some(Box::new(right)),
        }
    }

    pub fn or(left: Self, right: Self) -> Self {
        Self::Boolean {
            left: Box::new(left),
            op: BooleanOp::Or,
            right: Some(Box::new(right)),
        }
    }

    /// Negation of `inner`.
    pub fn not(inner: Self) -> Self {
        Self::Boolean {
            left: Box::new(inner),
            op: BooleanOp::Not,
            right: None,
        }
    }

    /// Tokenize and parse a query string.
    pub fn parse(query: &str) -> Result<Self, QuerySyntaxError> {
        let tokens = tokenize(query)?;
        Parser::new(&tokens).parse()
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Term(value) => f.write_str(value),
            Self::Phrase(text) => write!(f, "\"{}\"", text),
            Self::Wildcard(pattern) => f.write_str(pattern),
            Self::Fuzzy { term, distance } => write!(f, "{}~{}", term, distance),
            Self::Field { name, inner } => write!(f, "{}:{}", name, inner),
            Self::Boolean {
                left,
                op: BooleanOp::Not,
                ..
            } => write!(f, "(NOT {})", left),
            Self::Boolean { left, op, right } => match right {
                Some(right) => write!(f, "({} {} {})", left, op, right),
                None => write!(f, "{}", left),
            },
            Self::Group(inner) => write!(f, "{}", inner),
        }
    }
}

/// Deepest query tree the parser will build.
///
/// Evaluation, display and drop all recurse over the tree, so its height must stay
/// well inside the stack. Deeper queries are rejected and take the fallback path.
pub const MAX_QUERY_DEPTH: usize = 128;

/// Recursive-descent parser over an immutable token slice.
#[derive(Debug)]
pub struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
    /// Open groups and prefix `NOT`s on the current parse path.
    nesting: usize,
}

impl<'a> Parser<'a> {
    pub const fn new(tokens: &'a [Token]) -> Self {
        Self {
            tokens,
            pos: 0,
            nesting: 0,
        }
    }

    /// Parse the whole token stream as one expression.
    pub fn parse(mut self) -> Result<Query, QuerySyntaxError> {
        let (query, _) = self.parse_expression()?;
        match self.peek() {
            None => Ok(query),
            Some(token) => Err(QuerySyntaxError::UnexpectedToken {
                token: token.to_string(),
                position: self.pos,
            }),
        }
    }

    fn peek(&self) -> Option<&'a Token> {
        self.tokens.get(self.pos)
    }

    fn advance(&mut self) -> Option<&'a Token> {
        let token = self.tokens.get(self.pos)?;
        self.pos += 1;
        Some(token)
    }

    /// Height of a node whose tallest child has height `child`.
    const fn grow(child: usize, position: usize) -> Result<usize, QuerySyntaxError> {
        if child >= MAX_QUERY_DEPTH {
            return Err(QuerySyntaxError::TooDeep { position });
        }
        Ok(child + 1)
    }

    /// Parsed expression and its tree height.
    fn parse_expression(&mut self) -> Result<(Query, usize), QuerySyntaxError> {
        let (mut left, mut height) = self.parse_term()?;

        while let Some(token) = self.peek() {
            let position = self.pos;
            (left, height) = match token {
                Token::And => {
                    self.pos += 1;
                    let (right, right_height) = self.parse_term()?;
                    (
                        Query::and(left, right),
                        Self::grow(height.max(right_height), position)?,
                    )
                }
                Token::Or => {
                    self.pos += 1;
                    let (right, right_height) = self.parse_term()?;
                    (
                        Query::or(left, right),
                        Self::grow(height.max(right_height), position)?,
                    )
                }
                Token::Not => {
                    self.pos += 1;
                    if self.starts_term() {
                        let (negated, negated_height) = self.parse_term()?;
                        let negated_height = Self::grow(negated_height, position)?;
                        (
                            Query::and(left, Query::not(negated)),
                            Self::grow(height.max(negated_height), position)?,
                        )
                    } else {
                        (Query::not(left), Self::grow(height, position)?)
                    }
                }
                Token::RParen => break,
                _ => {
                    let (right, right_height) = self.parse_term()?;
                    (
                        Query::and(left, right),
                        Self::grow(height.max(right_height), position)?,
                    )
                }
            };
        }

        Ok((left, height))
    }

    /// Whether the next token can begin a term.
    fn starts_term(&self) -> bool {
        !matches!(
            self.peek(),
            None | Some(Token::RParen | Token::And | Token::Or)
        )
    }

    /// Enter a group or prefix `NOT`, bounding the parser's own recursion.
    fn nest(&mut self, position: usize) -> Result<(), QuerySyntaxError> {
        if self.nesting >= MAX_QUERY_DEPTH {
            return Err(QuerySyntaxError::TooDeep { position });
        }
        self.nesting += 1;
        Ok(())
    }

    /// Parsed term and its tree height.
    fn parse_term(&mut self) -> Result<(Query, usize), QuerySyntaxError> {
        let position = self.pos;
        let token = self.advance().ok_or(QuerySyntaxError::UnexpectedEnd)?;

        let term = match token {
            Token::LParen => {
                self.nest(position)?;
                let (inner, height) = self.parse_expression()?;
                self.nesting -= 1;
                match self.advance() {
                    Some(Token::RParen) => {
                        (Query::Group(Box::new(inner)), Self::grow(height, position)?)
                    }
                    _ => return Err(QuerySyntaxError::UnmatchedParen { position }),
                }
            }
            Token::Not => {
                self.nest(position)?;
                let (inner, height) = self.parse_term()?;
                self.nesting -= 1;
                (Query::not(inner), Self::grow(height, position)?)
            }
            Token::Phrase(text) => (Query::Phrase(text.clone()), 0),
            Token::Field { name, value } => (
                Query::Field {
                    name: name.clone(),
                    inner: Box::new(match value {
                        FieldValue::Word(v) => Query::Term(v.clone()),
                        FieldValue::Wildcard(v) => Query::Wildcard(v.clone()),
                        FieldValue::Phrase(v) => Query::Phrase(v.clone()),
                    }),
                },
                1,
            ),
            Token::Fuzzy { term, distance } => (
                Query::Fuzzy {
                    term: term.clone(),
                    distance: *distance,
                },
                0,
            ),
            Token::Wildcard(pattern) => (Query::Wildcard(pattern.clone()), 0),
            Token::Word(word) => (Query::Term(word.clone()), 0),
            Token::RParen | Token::And | Token::Or => {
                return Err(QuerySyntaxError::UnexpectedToken {
                    token: token.to_string(),
                    position,
                });
            }
        };

        Ok(term)
    }
}
