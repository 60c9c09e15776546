//! Rill Compiler - User Tree to IR Tree Lowering
//!
//! This crate implements the lowering phase of the Rill script compiler: it
//! transforms the analyzed, decorated user tree into the IR tree consumed by
//! code generation, specializing the script's entry point function with the
//! injections the embedding contract requires (metadata fields and getters,
//! accessor-to-local-variable bridging, capability probe methods, and the
//! runtime exception sandbox).

pub mod ast;
pub mod error;
pub mod ir;
pub mod location;
pub mod lower;
pub mod scope;
pub mod settings;
pub mod ty;

pub use error::{LowerError, LowerResult};
pub use location::Location;
pub use lower::{lower_script, LoweredScript};
pub use scope::{GetMethod, MethodArgument, ScriptClassInfo, ScriptScope};
pub use settings::CompilerSettings;
pub use ty::{Const, Ty};
