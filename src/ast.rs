//! # Clove Expression Trees
//!
//! This module defines the tree an external query parser hands to the type
//! resolver. Nothing here knows about schemas or types; it is plain structure.
//!
//! ## Architecture Overview
//!
//! - **[literals]** - Literal values (`true`, `"text"`, `42`, `4.2`)
//! - **[operators]** - Classic operators and the classes that share type rules
//! - **[nodes]** - The tagged [`Node`] tree and the [`OperationKind`] discriminator
//!
//! ## Shape of a tree
//!
//! Every compound node is an operation with a flat list of children:
//!
//! ```text
//! list[myInteger > 3]/myInteger
//!
//! Operation(Variable)
//! ├── Segment("list")
//! ├── Operation(Operator)
//! │   ├── Operation(Variable) ── Segment("myInteger")
//! │   ├── Operator(>)
//! │   └── Literal(3)
//! └── Segment("myInteger")
//! ```
//!
//! - A **variable** operation is a sequence of segments, each optionally
//!   followed by one bracketed operation (an index or a filter).
//! - An **operator** operation holds one operator with its operands on either
//!   side: `[left, op, right]`, `[op, right]` for `!`, `[left, op]` for `++`.
//! - A **method call** holds the method reference followed by its arguments.
//! - A **literal** operation holds exactly one literal.
pub mod literals;
pub mod nodes;
pub mod operators;

pub use literals::{Literal, LiteralKind};
pub use nodes::{Node, OperationKind};
pub use operators::{Operator, OperatorClass};
