//! Lyra type algebra.
//!
//! The closed set of Lyra types and the equality rules the checker relies on:
//!
//! - [`ty`]: `Ty` and its component types (primitives, functions, structs, data)
//! - [`equal`]: `types_equal`, the single source of truth for compatibility,
//!   plus the numeric predicate
//! - [`literal`]: literal values, used for struct field defaults and patterns
//!
//! Struct and data types compare nominally; arrays, maps, tuples and
//! functions compare structurally. Generics compare by name only and are
//! never substituted during equality.

pub mod equal;
pub mod literal;
pub mod ty;

pub use equal::{is_numeric, types_equal};
pub use literal::Literal;
pub use ty::{Constructor, CtorShape, DataTy, FnTy, Modifier, Param, Primitive, StructField, StructTy, Ty};
