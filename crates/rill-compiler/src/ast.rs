//! User Tree
//!
//! The decorated AST handed over by the upstream parse and semantic-analysis
//! phases. This pass only consumes it: expression nodes arrive with their
//! resolved value type filled in, and boolean conditions (method escape,
//! all-paths escape) are read from the script scope keyed by node identity.

use crate::location::Location;
use crate::ty::{Const, Ty};

/// Identity of a user tree node, used as a decoration key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub u32);

impl NodeId {
    pub fn new(id: u32) -> Self {
        Self(id)
    }
}

/// Top-level script class
#[derive(Debug, Clone)]
pub struct SClass {
    pub id: NodeId,
    pub location: Location,
    pub functions: Vec<SFunction>,
}

/// Function declaration with its analyzed signature
#[derive(Debug, Clone)]
pub struct SFunction {
    pub id: NodeId,
    pub location: Location,
    pub name: String,
    pub return_ty: Ty,
    /// Parameter name/type pairs in declaration order
    pub parameters: Vec<(String, Ty)>,
    pub block: SBlock,
}

#[derive(Debug, Clone)]
pub struct SBlock {
    pub id: NodeId,
    pub location: Location,
    pub statements: Vec<SStatement>,
}

#[derive(Debug, Clone)]
pub struct SCatch {
    pub id: NodeId,
    pub location: Location,
    pub exception_ty: Ty,
    pub name: String,
    pub block: SBlock,
}

#[derive(Debug, Clone)]
pub struct SStatement {
    pub id: NodeId,
    pub location: Location,
    pub kind: SStatementKind,
}

#[derive(Debug, Clone)]
pub enum SStatementKind {
    Declaration {
        name: String,
        ty: Ty,
        initializer: Option<SExpression>,
    },
    Expression(SExpression),
    Return(Option<SExpression>),
    Throw(SExpression),
    If {
        condition: SExpression,
        block: SBlock,
        else_block: Option<SBlock>,
    },
    While {
        condition: SExpression,
        block: SBlock,
    },
    Break,
    Continue,
    Try {
        block: SBlock,
        catches: Vec<SCatch>,
    },
}

/// Expression with its resolved value type
#[derive(Debug, Clone)]
pub struct SExpression {
    pub location: Location,
    pub ty: Ty,
    pub kind: SExpressionKind,
}

#[derive(Debug, Clone)]
pub enum SExpressionKind {
    Constant(Const),
    Null,
    Variable(String),
    Binary {
        op: BinaryOp,
        left: Box<SExpression>,
        right: Box<SExpression>,
    },
    Unary {
        op: UnaryOp,
        operand: Box<SExpression>,
    },
    /// Call of another function declared in the same script
    CallLocal {
        name: String,
        arguments: Vec<SExpression>,
    },
}

/// Binary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Equal,
    NotEqual,
    Less,
    LessEqual,
    Greater,
    GreaterEqual,
    And,
    Or,
}

/// Unary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Neg,
    Not,
    BitNot,
}
