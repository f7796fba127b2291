//! Expressions.
//!
//! Sub-expressions the collector could not recognize are `None` rather than
//! placeholder nodes; the checker treats them as having no known type.

use std::fmt;

use lyra_common::Location;
use lyra_types::Literal;

use crate::pat::Pattern;
use crate::stmt::Stmt;

#[derive(Clone, Debug, PartialEq)]
pub struct Expr {
    pub kind: ExprKind,
    pub location: Location,
}

impl Expr {
    pub fn new(kind: ExprKind, location: Location) -> Self {
        Expr { kind, location }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum ExprKind {
    Literal(Literal),
    Identifier(String),
    /// `left op right` for comparison, logical and arithmetic operators.
    Binary {
        op: BinaryOp,
        left: Option<Box<Expr>>,
        right: Option<Box<Expr>>,
    },
    Unary {
        op: UnaryOp,
        operand: Option<Box<Expr>>,
    },
    If {
        condition: Option<Box<Expr>>,
        then_branch: Option<Box<Expr>>,
        else_branch: Option<Box<Expr>>,
    },
    /// A clause guard: `if n < 2`.
    Guard(Option<Box<Expr>>),
    Array(Vec<Expr>),
    /// Elements that failed to collect stay in place as `None`.
    Tuple(Vec<Option<Expr>>),
    Call {
        callee: Option<Box<Expr>>,
        args: Vec<Expr>,
    },
    /// `object.property`; `property` may be a tuple position like `0`.
    Member {
        object: Option<Box<Expr>>,
        property: String,
    },
    Index {
        object: Option<Box<Expr>>,
        index: Option<Box<Expr>>,
    },
    Lambda {
        params: Vec<Pattern>,
        body: Option<Box<Expr>>,
    },
    Block(Vec<Stmt>),
}

/// Binary operators.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BinaryOp {
    Eq,
    NotEq,
    Gt,
    Lt,
    GtEq,
    LtEq,
    And,
    Or,
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Pow,
    /// `++`
    Concat,
    /// `<=>`
    Spaceship,
    /// An operator symbol the language does not define.
    Other(String),
}

impl BinaryOp {
    pub fn from_symbol(symbol: &str) -> BinaryOp {
        match symbol {
            "==" => BinaryOp::Eq,
            "!=" => BinaryOp::NotEq,
            ">" => BinaryOp::Gt,
            "<" => BinaryOp::Lt,
            ">=" => BinaryOp::GtEq,
            "<=" => BinaryOp::LtEq,
            "&&" => BinaryOp::And,
            "||" => BinaryOp::Or,
            "+" => BinaryOp::Add,
            "-" => BinaryOp::Sub,
            "*" => BinaryOp::Mul,
            "/" => BinaryOp::Div,
            "%" => BinaryOp::Rem,
            "**" => BinaryOp::Pow,
            "++" => BinaryOp::Concat,
            "<=>" => BinaryOp::Spaceship,
            other => BinaryOp::Other(other.to_owned()),
        }
    }

    pub fn symbol(&self) -> &str {
        match self {
            BinaryOp::Eq => "==",
            BinaryOp::NotEq => "!=",
            BinaryOp::Gt => ">",
            BinaryOp::Lt => "<",
            BinaryOp::GtEq => ">=",
            BinaryOp::LtEq => "<=",
            BinaryOp::And => "&&",
            BinaryOp::Or => "||",
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Rem => "%",
            BinaryOp::Pow => "**",
            BinaryOp::Concat => "++",
            BinaryOp::Spaceship => "<=>",
            BinaryOp::Other(s) => s,
        }
    }

    pub fn is_comparison(&self) -> bool {
        matches!(
            self,
            BinaryOp::Eq | BinaryOp::NotEq | BinaryOp::Gt | BinaryOp::Lt | BinaryOp::GtEq | BinaryOp::LtEq
        )
    }

    pub fn is_logical(&self) -> bool {
        matches!(self, BinaryOp::And | BinaryOp::Or)
    }

    pub fn is_arithmetic(&self) -> bool {
        matches!(
            self,
            BinaryOp::Add | BinaryOp::Sub | BinaryOp::Mul | BinaryOp::Div | BinaryOp::Rem | BinaryOp::Pow
        )
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum UnaryOp {
    Not,
    Neg,
    Other(String),
}

impl UnaryOp {
    pub fn from_symbol(symbol: &str) -> UnaryOp {
        match symbol {
            "!" => UnaryOp::Not,
            "-" => UnaryOp::Neg,
            other => UnaryOp::Other(other.to_owned()),
        }
    }

    pub fn symbol(&self) -> &str {
        match self {
            UnaryOp::Not => "!",
            UnaryOp::Neg => "-",
            UnaryOp::Other(s) => s,
        }
    }
}

impl fmt::Display for UnaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}
