use lyra_common::Location;
use lyra_types::Literal;

/// A clause parameter pattern.
#[derive(Clone, Debug, PartialEq)]
pub struct Pattern {
    pub kind: PatternKind,
    pub location: Location,
}

#[derive(Clone, Debug, PartialEq)]
pub enum PatternKind {
    /// Binds the argument to a name: `(n) => ...`
    Identifier(String),
    /// Matches a fixed value: `(0) => ...`. Kept as written in source.
    Literal(String),
}

impl Pattern {
    pub fn identifier(name: impl Into<String>, location: Location) -> Self {
        Pattern {
            kind: PatternKind::Identifier(name.into()),
            location,
        }
    }

    pub fn literal(text: impl Into<String>, location: Location) -> Self {
        Pattern {
            kind: PatternKind::Literal(text.into()),
            location,
        }
    }

    /// The value of a literal pattern, if its text is a valid literal.
    pub fn literal_value(&self) -> Option<Literal> {
        match &self.kind {
            PatternKind::Literal(text) => Literal::from_source(text),
            PatternKind::Identifier(_) => None,
        }
    }
}
