/// Character iterator over reader input with byte-offset tracking.
pub(crate) struct Cursor<'src> {
    source: &'src str,
    pos: u32,
    chars: std::str::Chars<'src>,
}

impl<'src> Cursor<'src> {
    pub(crate) fn new(source: &'src str) -> Self {
        Self {
            source,
            pos: 0,
            chars: source.chars(),
        }
    }

    pub(crate) fn peek(&self) -> Option<char> {
        self.chars.clone().next()
    }

    pub(crate) fn advance(&mut self) -> Option<char> {
        let c = self.chars.next()?;
        self.pos += c.len_utf8() as u32;
        Some(c)
    }

    pub(crate) fn pos(&self) -> u32 {
        self.pos
    }

    pub(crate) fn is_eof(&self) -> bool {
        self.peek().is_none()
    }

    /// Consume `expected` if it is the current character.
    pub(crate) fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.advance();
            true
        } else {
            false
        }
    }

    pub(crate) fn eat_while(&mut self, predicate: impl Fn(char) -> bool) {
        while let Some(c) = self.peek() {
            if predicate(c) {
                self.advance();
            } else {
                break;
            }
        }
    }

    /// Source text between two byte offsets; `""` if they do not delimit a slice.
    pub(crate) fn slice(&self, start: u32, end: u32) -> &'src str {
        self.source.get(start as usize..end as usize).unwrap_or("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advance_tracks_multibyte_utf8() {
        let mut cursor = Cursor::new("\u{00E9}a");
        assert_eq!(cursor.advance(), Some('\u{00E9}'));
        assert_eq!(cursor.pos(), 2);
        assert_eq!(cursor.advance(), Some('a'));
        assert!(cursor.is_eof());
    }

    #[test]
    fn eat_and_slice() {
        let mut cursor = Cursor::new("(kind x)");
        assert!(cursor.eat('('));
        assert!(!cursor.eat(')'));
        let start = cursor.pos();
        cursor.eat_while(|c| c.is_ascii_alphabetic());
        assert_eq!(cursor.slice(start, cursor.pos()), "kind");
    }
}
