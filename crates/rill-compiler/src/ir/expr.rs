//! IR expression nodes

use crate::ast::{BinaryOp, UnaryOp};
use crate::location::Location;
use crate::ty::{Const, Ty};

/// Resolved target of a call to a function on the generated class itself
#[derive(Debug, Clone, PartialEq)]
pub struct LocalFunction {
    pub name: String,
    pub return_ty: Ty,
    pub parameter_tys: Vec<Ty>,
    /// Declared by the script base class rather than the script body
    pub is_internal: bool,
    pub is_static: bool,
}

/// Resolved target of a method invocation on an arbitrary receiver
#[derive(Debug, Clone, PartialEq)]
pub struct MethodSig {
    /// Type owning the method
    pub owner: Ty,
    pub name: String,
    pub return_ty: Ty,
    pub parameter_tys: Vec<Ty>,
}

#[derive(Debug, Clone)]
pub enum ExpressionNode {
    Constant {
        location: Location,
        ty: Ty,
        value: Const,
    },
    Null {
        location: Location,
        ty: Ty,
    },
    Variable {
        location: Location,
        ty: Ty,
        name: String,
    },
    /// Reference to a type for a following static invocation
    Static {
        location: Location,
        ty: Ty,
    },
    /// Load of a field on the generated class
    MemberFieldLoad {
        location: Location,
        ty: Ty,
        name: String,
        is_static: bool,
    },
    /// Call of a function on the generated class
    MemberCall {
        location: Location,
        ty: Ty,
        function: LocalFunction,
        arguments: Vec<ExpressionNode>,
    },
    /// Bound method invocation, only meaningful as the right side of `Call`
    Invoke {
        location: Location,
        ty: Ty,
        method: MethodSig,
        arguments: Vec<ExpressionNode>,
    },
    /// Receiver/invocation pairing: evaluate `receiver`, then apply
    /// `invocation` to it
    Call {
        location: Location,
        ty: Ty,
        receiver: Box<ExpressionNode>,
        invocation: Box<ExpressionNode>,
    },
    Binary {
        location: Location,
        ty: Ty,
        op: BinaryOp,
        left: Box<ExpressionNode>,
        right: Box<ExpressionNode>,
    },
    Unary {
        location: Location,
        ty: Ty,
        op: UnaryOp,
        operand: Box<ExpressionNode>,
    },
}

impl ExpressionNode {
    /// Resolved value type of this expression
    pub fn ty(&self) -> &Ty {
        match self {
            ExpressionNode::Constant { ty, .. }
            | ExpressionNode::Null { ty, .. }
            | ExpressionNode::Variable { ty, .. }
            | ExpressionNode::Static { ty, .. }
            | ExpressionNode::MemberFieldLoad { ty, .. }
            | ExpressionNode::MemberCall { ty, .. }
            | ExpressionNode::Invoke { ty, .. }
            | ExpressionNode::Call { ty, .. }
            | ExpressionNode::Binary { ty, .. }
            | ExpressionNode::Unary { ty, .. } => ty,
        }
    }

    pub fn location(&self) -> &Location {
        match self {
            ExpressionNode::Constant { location, .. }
            | ExpressionNode::Null { location, .. }
            | ExpressionNode::Variable { location, .. }
            | ExpressionNode::Static { location, .. }
            | ExpressionNode::MemberFieldLoad { location, .. }
            | ExpressionNode::MemberCall { location, .. }
            | ExpressionNode::Invoke { location, .. }
            | ExpressionNode::Call { location, .. }
            | ExpressionNode::Binary { location, .. }
            | ExpressionNode::Unary { location, .. } => location,
        }
    }
}
