use std::borrow::Cow;
use std::fmt::Write;

use compact_str::CompactString;
use sleet_types::Value;

use super::Token;

/// A named parameter: rendered as `@name`, bound to `value`.
#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub name: CompactString,
    pub value: Value,
}

/// A SQL chunk represents a part of an SQL statement.
///
/// - `Token` - SQL keywords and operators (SELECT, FROM, =, etc.)
/// - `Ident` - Quoted identifiers (`table_name`, `column_name`)
/// - `Raw` - Unquoted function names (COUNT, UNNEST); never caller data
/// - `Number` - Unsigned integer literal produced by the builder
/// - `Param` - Named parameter placeholder with its bound value
#[derive(Debug, Clone, PartialEq)]
pub enum SQLChunk {
    /// Renders as: keyword with automatic spacing rules
    Token(Token),

    /// Renders as: `name` (backtick quoted, inner backticks escaped)
    Ident(CompactString),

    /// Renders as: text (no quotes, as-is)
    Raw(Cow<'static, str>),

    /// Renders as: decimal digits
    Number(u64),

    /// Renders as: @name
    Param(Param),
}

impl SQLChunk {
    /// Write this chunk's text to the buffer.
    pub(crate) fn write(&self, buf: &mut impl Write) {
        match self {
            SQLChunk::Token(t) => {
                let _ = buf.write_str(t.as_str());
            }
            SQLChunk::Ident(name) => write_ident(buf, name),
            SQLChunk::Raw(text) => {
                let _ = buf.write_str(text);
            }
            SQLChunk::Number(n) => {
                let _ = write!(buf, "{n}");
            }
            SQLChunk::Param(param) => {
                let _ = buf.write_char('@');
                let _ = buf.write_str(&param.name);
            }
        }
    }

    /// Word-like chunks need a space between them.
    pub(crate) const fn is_word_like(&self) -> bool {
        match self {
            SQLChunk::Token(t) => !t.is_punctuation() && !t.is_operator(),
            SQLChunk::Ident(_) | SQLChunk::Raw(_) | SQLChunk::Number(_) | SQLChunk::Param(_) => {
                true
            }
        }
    }
}

/// Writes a backtick-quoted identifier, escaping backslashes and backticks.
pub(crate) fn write_ident(buf: &mut impl Write, name: &str) {
    let _ = buf.write_char('`');
    for ch in name.chars() {
        if ch == '`' || ch == '\\' {
            let _ = buf.write_char('\\');
        }
        let _ = buf.write_char(ch);
    }
    let _ = buf.write_char('`');
}
