mod chunk;
mod token;

use std::borrow::Cow;
use std::fmt::Write;

use compact_str::CompactString;
use smallvec::SmallVec;
use sleet_types::Value;

pub use chunk::*;
pub use token::*;

use crate::params::{CompiledStatement, Params};

/// SQL fragment builder with flat chunk storage.
///
/// Uses `SmallVec<[SQLChunk; 8]>` for inline storage of typical SQL fragments
/// without heap allocation. Fragments carry their parameters; rendering
/// collects them in placeholder order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SQL {
    pub chunks: SmallVec<[SQLChunk; 8]>,
}

impl SQL {
    // ==================== constructors ====================

    /// Creates an empty SQL fragment
    #[inline]
    pub const fn empty() -> Self {
        Self {
            chunks: SmallVec::new_const(),
        }
    }

    /// Creates SQL with a single token
    #[inline]
    pub fn token(t: Token) -> Self {
        Self {
            chunks: smallvec::smallvec![SQLChunk::Token(t)],
        }
    }

    /// Creates SQL with a quoted identifier
    #[inline]
    pub fn ident(name: impl Into<CompactString>) -> Self {
        Self {
            chunks: smallvec::smallvec![SQLChunk::Ident(name.into())],
        }
    }

    /// Creates `` `qualifier`.`name` ``, or `` `name` `` when unqualified
    pub fn column(qualifier: Option<&str>, name: &str) -> Self {
        let mut sql = Self::empty();
        if let Some(qualifier) = qualifier {
            sql.push(SQLChunk::Ident(qualifier.into()));
            sql.push(SQLChunk::Token(Token::DOT));
        }
        sql.push(SQLChunk::Ident(name.into()));
        sql
    }

    /// Creates SQL with raw text (unquoted). Only for fixed SQL vocabulary.
    #[inline]
    pub fn raw(text: impl Into<Cow<'static, str>>) -> Self {
        Self {
            chunks: smallvec::smallvec![SQLChunk::Raw(text.into())],
        }
    }

    /// Creates SQL with a single unsigned integer literal.
    #[inline]
    pub fn number(value: u64) -> Self {
        Self {
            chunks: smallvec::smallvec![SQLChunk::Number(value)],
        }
    }

    /// Creates SQL with a single named parameter
    #[inline]
    pub fn param(name: impl Into<CompactString>, value: Value) -> Self {
        Self {
            chunks: smallvec::smallvec![SQLChunk::Param(Param {
                name: name.into(),
                value,
            })],
        }
    }

    /// Creates SQL for a function call: NAME(args)
    pub fn func(name: &'static str, args: SQL) -> Self {
        SQL::raw(name).push_token(Token::LPAREN).append(args).push_token(Token::RPAREN)
    }

    // ==================== combinators ====================

    /// Appends another fragment
    #[inline]
    pub fn append(mut self, other: SQL) -> Self {
        self.chunks.extend(other.chunks);
        self
    }

    /// Appends a token
    #[inline]
    pub fn push_token(mut self, t: Token) -> Self {
        self.chunks.push(SQLChunk::Token(t));
        self
    }

    /// Pushes a chunk in place
    #[inline]
    pub fn push(&mut self, chunk: SQLChunk) {
        self.chunks.push(chunk);
    }

    /// Appends another fragment in place
    #[inline]
    pub fn extend(&mut self, other: SQL) {
        self.chunks.extend(other.chunks);
    }

    /// Wraps this fragment in parentheses
    #[inline]
    pub fn parens(self) -> Self {
        SQL::token(Token::LPAREN).append(self).push_token(Token::RPAREN)
    }

    /// Joins fragments with a separator token
    pub fn join(parts: impl IntoIterator<Item = SQL>, separator: Token) -> Self {
        let mut out = SQL::empty();
        for (i, part) in parts.into_iter().enumerate() {
            if i > 0 {
                out.push(SQLChunk::Token(separator));
            }
            out.extend(part);
        }
        out
    }

    /// Joins fragments with a comma
    #[inline]
    pub fn comma_separated(parts: impl IntoIterator<Item = SQL>) -> Self {
        Self::join(parts, Token::COMMA)
    }

    /// Joins fragments with `separator`, parenthesizing each one when there is
    /// more than one.
    pub fn join_grouped(parts: Vec<SQL>, separator: Token) -> Self {
        if parts.len() == 1 {
            return parts.into_iter().next().unwrap_or_default();
        }
        Self::join(parts.into_iter().map(SQL::parens), separator)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    // ==================== rendering ====================

    /// Returns the SQL text without collecting parameters
    pub fn sql(&self) -> String {
        let mut buf = String::with_capacity(self.chunks.len().saturating_mul(8).max(64));
        self.write_to(&mut buf);
        buf
    }

    /// Write SQL to a buffer with `@name` placeholders.
    pub fn write_to(&self, buf: &mut impl Write) {
        for (i, chunk) in self.chunks.iter().enumerate() {
            chunk.write(buf);
            if self.needs_space(i) {
                let _ = buf.write_char(' ');
            }
        }
    }

    /// Returns an iterator over parameters in placeholder order
    pub fn params(&self) -> impl Iterator<Item = &Param> {
        self.chunks.iter().filter_map(|chunk| match chunk {
            SQLChunk::Param(param) => Some(param),
            _ => None,
        })
    }

    /// Renders the SQL text and collects parameter bindings
    pub fn build(self) -> CompiledStatement {
        let sql = self.sql();
        let mut params = Params::with_capacity(self.chunks.len() / 4);
        for chunk in self.chunks {
            if let SQLChunk::Param(param) = chunk {
                params.insert(param.name, param.value);
            }
        }
        CompiledStatement { sql, params }
    }

    fn needs_space(&self, index: usize) -> bool {
        let Some(next) = self.chunks.get(index + 1) else {
            return false;
        };
        chunk_needs_space(&self.chunks[index], next)
    }
}

/// Spacing between adjacent chunks
pub(crate) fn chunk_needs_space(current: &SQLChunk, next: &SQLChunk) -> bool {
    match (current, next) {
        // No space before closing/separator punctuation
        (_, SQLChunk::Token(Token::RPAREN | Token::COMMA | Token::DOT)) => false,
        // No space after opening punctuation
        (SQLChunk::Token(Token::LPAREN | Token::DOT), _) => false,
        // Space after comma
        (SQLChunk::Token(Token::COMMA), _) => true,
        // Function call: COUNT(
        (SQLChunk::Raw(_), SQLChunk::Token(Token::LPAREN)) => false,
        // Space after closing paren unless more punctuation follows
        (SQLChunk::Token(Token::RPAREN), _) => true,
        // Space before opening paren if preceded by word-like (e.g., "IN (")
        (current, SQLChunk::Token(Token::LPAREN)) => current.is_word_like(),
        // Space around comparison operators
        (SQLChunk::Token(t), _) if t.is_operator() => true,
        (_, SQLChunk::Token(t)) if t.is_operator() => true,
        // Space between all word-like chunks
        _ => current.is_word_like() && next.is_word_like(),
    }
}

impl From<Token> for SQL {
    fn from(t: Token) -> Self {
        SQL::token(t)
    }
}

impl core::fmt::Display for SQL {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let mut buf = String::new();
        self.write_to(&mut buf);
        f.write_str(&buf)
    }
}
