//! Value Types
//!
//! The resolved type model attached to expressions by upstream semantic
//! analysis and carried on every IR expression node.

use std::fmt;

/// Well-known reference type names used by the injection steps.
///
/// The generated class is linked against the embedding runtime at load time;
/// these names identify the runtime types the synthesized IR refers to.
pub mod well_known {
    /// Script display name and source text field type
    pub const STRING: &str = "String";
    /// Statement-boundary bitset field type
    pub const BIT_SET: &str = "BitSet";
    /// Diagnostic headers mapping
    pub const MAP: &str = "Map";
    /// Map utility owner of `emptyMap`
    pub const MAPS: &str = "Maps";
    /// Active type-definition context, loaded from the `$DEFINITION` field
    pub const TYPE_LOOKUP: &str = "TypeLookup";
    /// Uniform exception kind every runtime failure is converted into
    pub const SCRIPT_EXCEPTION: &str = "ScriptException";
    /// Common supertype accepted by `convertToScriptException`
    pub const THROWABLE: &str = "Throwable";
    /// Diagnostic error kind carrying explain headers
    pub const EXPLAIN_ERROR: &str = "ExplainError";
    /// The sandbox's own base error kind
    pub const RILL_ERROR: &str = "RillError";
    /// Linkage failure raised while bootstrapping a call site
    pub const BOOTSTRAP_ERROR: &str = "BootstrapError";
    pub const OUT_OF_MEMORY_ERROR: &str = "OutOfMemoryError";
    pub const STACK_OVERFLOW_ERROR: &str = "StackOverflowError";
    /// Catch-all failure kind
    pub const EXCEPTION: &str = "Exception";
}

/// Resolved value type
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Ty {
    Void,
    Bool,
    Byte,
    Char,
    Short,
    Int,
    Long,
    Float,
    Double,
    /// Reference type, identified by runtime type name
    Ref(String),
}

impl Ty {
    /// Create a reference type from a runtime type name
    pub fn reference(name: &str) -> Self {
        Ty::Ref(name.to_string())
    }

    pub fn is_void(&self) -> bool {
        matches!(self, Ty::Void)
    }

    pub fn is_primitive(&self) -> bool {
        !matches!(self, Ty::Void | Ty::Ref(_))
    }

    pub fn is_reference(&self) -> bool {
        matches!(self, Ty::Ref(_))
    }
}

impl fmt::Display for Ty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Ty::Void => write!(f, "void"),
            Ty::Bool => write!(f, "boolean"),
            Ty::Byte => write!(f, "byte"),
            Ty::Char => write!(f, "char"),
            Ty::Short => write!(f, "short"),
            Ty::Int => write!(f, "int"),
            Ty::Long => write!(f, "long"),
            Ty::Float => write!(f, "float"),
            Ty::Double => write!(f, "double"),
            Ty::Ref(name) => write!(f, "{}", name),
        }
    }
}

/// Constant literal value
#[derive(Debug, Clone, PartialEq)]
pub enum Const {
    Bool(bool),
    Byte(i8),
    Char(char),
    Short(i16),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    Str(String),
}

impl Const {
    /// The value type this literal inhabits
    pub fn ty(&self) -> Ty {
        match self {
            Const::Bool(_) => Ty::Bool,
            Const::Byte(_) => Ty::Byte,
            Const::Char(_) => Ty::Char,
            Const::Short(_) => Ty::Short,
            Const::Int(_) => Ty::Int,
            Const::Long(_) => Ty::Long,
            Const::Float(_) => Ty::Float,
            Const::Double(_) => Ty::Double,
            Const::Str(_) => Ty::reference(well_known::STRING),
        }
    }
}

impl fmt::Display for Const {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Const::Bool(v) => write!(f, "{}", v),
            Const::Byte(v) => write!(f, "{}", v),
            Const::Char(v) => write!(f, "{:?}", v),
            Const::Short(v) => write!(f, "{}", v),
            Const::Int(v) => write!(f, "{}", v),
            Const::Long(v) => write!(f, "{}L", v),
            Const::Float(v) => write!(f, "{}f", v),
            Const::Double(v) => write!(f, "{}d", v),
            Const::Str(v) => write!(f, "{:?}", v),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primitive_classification() {
        assert!(Ty::Int.is_primitive());
        assert!(Ty::Bool.is_primitive());
        assert!(!Ty::Void.is_primitive());
        assert!(!Ty::reference("Map").is_primitive());
        assert!(Ty::reference("Map").is_reference());
    }

    #[test]
    fn test_const_types() {
        assert_eq!(Const::Bool(false).ty(), Ty::Bool);
        assert_eq!(Const::Long(0).ty(), Ty::Long);
        assert_eq!(
            Const::Str("hello".to_string()).ty(),
            Ty::reference(well_known::STRING)
        );
    }

    #[test]
    fn test_ty_display() {
        assert_eq!(format!("{}", Ty::Bool), "boolean");
        assert_eq!(format!("{}", Ty::reference("BitSet")), "BitSet");
    }
}
