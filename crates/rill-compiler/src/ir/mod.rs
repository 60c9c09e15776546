//! IR Tree
//!
//! The intermediate representation handed to code generation. Nodes are
//! created exclusively by the lowering pass and never mutated after the
//! finished class is returned.

mod expr;
mod node;
mod pretty;

pub use expr::{ExpressionNode, LocalFunction, MethodSig};
pub use node::{BlockNode, CatchNode, ClassNode, FieldNode, FunctionNode, Modifiers, StatementNode};
pub use pretty::PrettyPrint;
