//! Generic expression lowering

use super::Lowerer;
use crate::ast::{SExpression, SExpressionKind};
use crate::error::LowerResult;
use crate::ir::{ExpressionNode, LocalFunction};

impl<'a> Lowerer<'a> {
    pub(super) fn lower_expression(
        &mut self,
        expression: &SExpression,
    ) -> LowerResult<ExpressionNode> {
        let location = expression.location.clone();
        let ty = expression.ty.clone();

        let node = match &expression.kind {
            SExpressionKind::Constant(value) => ExpressionNode::Constant {
                location,
                ty,
                value: value.clone(),
            },
            SExpressionKind::Null => ExpressionNode::Null { location, ty },
            SExpressionKind::Variable(name) => ExpressionNode::Variable {
                location,
                ty,
                name: name.clone(),
            },
            SExpressionKind::Binary { op, left, right } => ExpressionNode::Binary {
                location,
                ty,
                op: *op,
                left: Box::new(self.lower_expression(left)?),
                right: Box::new(self.lower_expression(right)?),
            },
            SExpressionKind::Unary { op, operand } => ExpressionNode::Unary {
                location,
                ty,
                op: *op,
                operand: Box::new(self.lower_expression(operand)?),
            },
            SExpressionKind::CallLocal { name, arguments } => {
                let mut ir_arguments = Vec::with_capacity(arguments.len());
                for argument in arguments {
                    ir_arguments.push(self.lower_expression(argument)?);
                }

                // The analyzed call already agrees with its target: the
                // expression type is the return type and the argument types
                // are the parameter types.
                let function = LocalFunction {
                    name: name.clone(),
                    return_ty: ty.clone(),
                    parameter_tys: ir_arguments.iter().map(|a| a.ty().clone()).collect(),
                    is_internal: false,
                    is_static: false,
                };

                ExpressionNode::MemberCall {
                    location,
                    ty,
                    function,
                    arguments: ir_arguments,
                }
            }
        };

        Ok(node)
    }
}
