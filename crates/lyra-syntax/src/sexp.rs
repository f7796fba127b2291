//! S-expression reader for syntax trees.
//!
//! Trees are written the way tree-sitter prints them, with leaf text
//! spelled out:
//!
//! ```text
//! (source_file
//!   (declaration
//!     keyword: "let"
//!     name: (identifier "x")
//!     type_annotation: (type_annotation type: (signed_integer_type "Int"))
//!     "="
//!     value: (integer "1")))
//! ```
//!
//! - `(kind item ...)` is a named node; `field: item` attaches a field name.
//! - `(kind "text")` with a single unfielded string is a named leaf.
//! - A bare `"text"` is an anonymous leaf whose kind is its text.
//! - `;` starts a comment running to the end of the line.
//!
//! Each direct child of the root starts on a new source line, so
//! top-level declarations get distinct line numbers.

use std::fmt;

use crate::cursor::Cursor;
use crate::tree::{SyntaxTree, TreeBuilder};

/// A syntax error in reader input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SexpError {
    pub message: String,
    /// Byte offset into the reader input.
    pub offset: u32,
}

impl SexpError {
    pub fn new(message: impl Into<String>, offset: u32) -> Self {
        Self {
            message: message.into(),
            offset,
        }
    }
}

impl fmt::Display for SexpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at offset {}", self.message, self.offset)
    }
}

impl std::error::Error for SexpError {}

#[derive(Debug)]
enum Item {
    Node {
        kind: String,
        items: Vec<(Option<String>, Item)>,
    },
    Text(String),
}

/// Read one tree from `input`.
pub fn parse(input: &str) -> Result<SyntaxTree, SexpError> {
    let mut reader = Reader {
        cursor: Cursor::new(input),
    };
    reader.skip_trivia();
    let root = reader.node()?;
    reader.skip_trivia();
    if !reader.cursor.is_eof() {
        return Err(reader.error("trailing input after root node"));
    }

    let mut builder = TreeBuilder::new();
    emit(&mut builder, None, &root, true);
    builder
        .finish()
        .map_err(|e| SexpError::new(e.to_string(), input.len() as u32))
}

fn emit(builder: &mut TreeBuilder, field: Option<&str>, item: &Item, is_root: bool) {
    if let Some(name) = field {
        builder.field(name);
    }
    match item {
        Item::Text(text) => {
            builder.anonymous(text);
        }
        Item::Node { kind, items } => match items.as_slice() {
            [(None, Item::Text(text))] => {
                builder.token(kind.as_str(), text);
            }
            _ => {
                builder.start_node(kind.as_str());
                for (i, (child_field, child)) in items.iter().enumerate() {
                    if is_root && i > 0 {
                        builder.newline();
                    }
                    emit(builder, child_field.as_deref(), child, false);
                }
                builder.finish_node();
            }
        },
    }
}

struct Reader<'src> {
    cursor: Cursor<'src>,
}

impl Reader<'_> {
    fn error(&self, message: impl Into<String>) -> SexpError {
        SexpError::new(message, self.cursor.pos())
    }

    fn skip_trivia(&mut self) {
        loop {
            self.cursor.eat_while(char::is_whitespace);
            if self.cursor.peek() == Some(';') {
                self.cursor.eat_while(|c| c != '\n');
            } else {
                break;
            }
        }
    }

    fn node(&mut self) -> Result<Item, SexpError> {
        if !self.cursor.eat('(') {
            return Err(self.error("expected `(`"));
        }
        self.skip_trivia();
        let kind = self.ident()?;
        let mut items = Vec::new();
        loop {
            self.skip_trivia();
            match self.cursor.peek() {
                Some(')') => {
                    self.cursor.advance();
                    return Ok(Item::Node { kind, items });
                }
                Some('(') => items.push((None, self.node()?)),
                Some('"') => items.push((None, Item::Text(self.string()?))),
                Some(c) if is_ident_char(c) => {
                    let field = self.ident()?;
                    self.skip_trivia();
                    if !self.cursor.eat(':') {
                        return Err(self.error(format!("expected `:` after field name `{}`", field)));
                    }
                    self.skip_trivia();
                    let item = match self.cursor.peek() {
                        Some('(') => self.node()?,
                        Some('"') => Item::Text(self.string()?),
                        _ => return Err(self.error(format!("expected a node or string for field `{}`", field))),
                    };
                    items.push((Some(field), item));
                }
                Some(c) => return Err(self.error(format!("unexpected character {:?}", c))),
                None => return Err(self.error(format!("unclosed node `{}`", kind))),
            }
        }
    }

    fn ident(&mut self) -> Result<String, SexpError> {
        let start = self.cursor.pos();
        self.cursor.eat_while(is_ident_char);
        let text = self.cursor.slice(start, self.cursor.pos());
        if text.is_empty() {
            return Err(self.error("expected a name"));
        }
        Ok(text.to_owned())
    }

    fn string(&mut self) -> Result<String, SexpError> {
        let start = self.cursor.pos();
        self.cursor.advance();
        let mut out = String::new();
        loop {
            match self.cursor.advance() {
                Some('"') => return Ok(out),
                Some('\\') => match self.cursor.advance() {
                    Some('n') => out.push('\n'),
                    Some('t') => out.push('\t'),
                    Some(c) => out.push(c),
                    None => break,
                },
                Some(c) => out.push(c),
                None => break,
            }
        }
        Err(SexpError::new("unterminated string", start))
    }
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}
