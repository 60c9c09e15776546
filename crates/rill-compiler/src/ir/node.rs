//! IR statement-level nodes
//!
//! Class, function, block, field and statement nodes of the IR tree.

use super::expr::ExpressionNode;
use crate::location::Location;
use crate::ty::Ty;
use std::ops::BitOr;

/// Field and method access modifiers on the generated class
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Modifiers(u32);

impl Modifiers {
    pub const NONE: Modifiers = Modifiers(0);
    pub const PUBLIC: Modifiers = Modifiers(0x0001);
    pub const STATIC: Modifiers = Modifiers(0x0008);

    pub fn contains(&self, other: Modifiers) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for Modifiers {
    type Output = Modifiers;

    fn bitor(self, rhs: Modifiers) -> Modifiers {
        Modifiers(self.0 | rhs.0)
    }
}

/// The single class a script compiles into
#[derive(Debug, Clone)]
pub struct ClassNode {
    pub location: Location,
    pub name: String,
    pub fields: Vec<FieldNode>,
    pub functions: Vec<FunctionNode>,
}

impl ClassNode {
    pub fn new(location: Location, name: impl Into<String>) -> Self {
        Self {
            location,
            name: name.into(),
            fields: Vec::new(),
            functions: Vec::new(),
        }
    }

    pub fn add_field(&mut self, field: FieldNode) {
        self.fields.push(field);
    }

    /// Append a function, returning its index within the class
    pub fn add_function(&mut self, function: FunctionNode) -> usize {
        self.functions.push(function);
        self.functions.len() - 1
    }

    /// Look up a function by name (first match in declaration order)
    pub fn function(&self, name: &str) -> Option<&FunctionNode> {
        self.functions.iter().find(|f| f.name == name)
    }
}

/// Field owned by the generated class
#[derive(Debug, Clone)]
pub struct FieldNode {
    pub location: Location,
    pub modifiers: Modifiers,
    pub ty: Ty,
    pub name: String,
}

#[derive(Debug, Clone)]
pub struct FunctionNode {
    pub location: Location,
    pub name: String,
    pub return_ty: Ty,
    /// Parameter names, index-aligned with `type_parameters`
    pub parameter_names: Vec<String>,
    pub type_parameters: Vec<Ty>,
    pub is_static: bool,
    pub is_vararg: bool,
    pub is_synthetic: bool,
    /// Loop iteration budget, zero when the counter is disabled
    pub max_loop_counter: u32,
    pub block: BlockNode,
}

#[derive(Debug, Clone)]
pub struct BlockNode {
    pub location: Location,
    pub statements: Vec<StatementNode>,
    /// True when every control path through this block escapes via return
    /// or throw; set from upstream analysis or by injection
    pub all_escape: bool,
}

impl BlockNode {
    pub fn new(location: Location) -> Self {
        Self {
            location,
            statements: Vec::new(),
            all_escape: false,
        }
    }
}

/// Exception handler clause. Handlers on a `Try` are evaluated in
/// declaration order with first-match-wins semantics; reordering them
/// changes observable behavior.
#[derive(Debug, Clone)]
pub struct CatchNode {
    pub location: Location,
    pub exception_ty: Ty,
    /// Name binding the caught value inside the handler block
    pub symbol: String,
    pub block: BlockNode,
}

#[derive(Debug, Clone)]
pub enum StatementNode {
    Declaration {
        location: Location,
        name: String,
        ty: Ty,
        initializer: Option<ExpressionNode>,
    },
    Expression {
        location: Location,
        expression: ExpressionNode,
    },
    Return {
        location: Location,
        value: Option<ExpressionNode>,
    },
    Throw {
        location: Location,
        value: ExpressionNode,
    },
    If {
        location: Location,
        condition: ExpressionNode,
        block: BlockNode,
    },
    IfElse {
        location: Location,
        condition: ExpressionNode,
        block: BlockNode,
        else_block: BlockNode,
    },
    While {
        location: Location,
        condition: ExpressionNode,
        block: BlockNode,
    },
    Break {
        location: Location,
    },
    Continue {
        location: Location,
    },
    Try {
        location: Location,
        block: BlockNode,
        catches: Vec<CatchNode>,
    },
}

impl StatementNode {
    pub fn location(&self) -> &Location {
        match self {
            StatementNode::Declaration { location, .. }
            | StatementNode::Expression { location, .. }
            | StatementNode::Return { location, .. }
            | StatementNode::Throw { location, .. }
            | StatementNode::If { location, .. }
            | StatementNode::IfElse { location, .. }
            | StatementNode::While { location, .. }
            | StatementNode::Break { location }
            | StatementNode::Continue { location }
            | StatementNode::Try { location, .. } => location,
        }
    }

    /// Whether this statement escapes on every control path through it
    pub fn escapes(&self) -> bool {
        match self {
            StatementNode::Return { .. } | StatementNode::Throw { .. } => true,
            StatementNode::IfElse {
                block, else_block, ..
            } => block.all_escape && else_block.all_escape,
            StatementNode::Try { block, catches, .. } => {
                block.all_escape && catches.iter().all(|c| c.block.all_escape)
            }
            _ => false,
        }
    }
}
