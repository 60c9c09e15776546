//! Generic statement lowering
//!
//! Converts user tree statements to IR statement nodes one-to-one,
//! preserving source locations.

use super::Lowerer;
use crate::ast::{SCatch, SStatement, SStatementKind};
use crate::error::{LowerError, LowerResult};
use crate::ir::{CatchNode, StatementNode};

impl<'a> Lowerer<'a> {
    pub(super) fn lower_statement(&mut self, statement: &SStatement) -> LowerResult<StatementNode> {
        let location = statement.location.clone();

        let node = match &statement.kind {
            SStatementKind::Declaration {
                name,
                ty,
                initializer,
            } => StatementNode::Declaration {
                location,
                name: name.clone(),
                ty: ty.clone(),
                initializer: initializer
                    .as_ref()
                    .map(|init| self.lower_expression(init))
                    .transpose()?,
            },
            SStatementKind::Expression(expression) => StatementNode::Expression {
                location,
                expression: self.lower_expression(expression)?,
            },
            SStatementKind::Return(value) => StatementNode::Return {
                location,
                value: value
                    .as_ref()
                    .map(|value| self.lower_expression(value))
                    .transpose()?,
            },
            SStatementKind::Throw(value) => StatementNode::Throw {
                location,
                value: self.lower_expression(value)?,
            },
            SStatementKind::If {
                condition,
                block,
                else_block,
            } => {
                let condition = self.lower_expression(condition)?;
                let block = self.lower_block(block)?;
                match else_block {
                    Some(else_block) => StatementNode::IfElse {
                        location,
                        condition,
                        block,
                        else_block: self.lower_block(else_block)?,
                    },
                    None => StatementNode::If {
                        location,
                        condition,
                        block,
                    },
                }
            }
            SStatementKind::While { condition, block } => StatementNode::While {
                location,
                condition: self.lower_expression(condition)?,
                block: self.lower_block(block)?,
            },
            SStatementKind::Break => StatementNode::Break { location },
            SStatementKind::Continue => StatementNode::Continue { location },
            SStatementKind::Try { block, catches } => {
                let block = self.lower_block(block)?;
                let mut ir_catches = Vec::with_capacity(catches.len());
                for catch in catches {
                    ir_catches.push(self.lower_catch(catch)?);
                }
                StatementNode::Try {
                    location,
                    block,
                    catches: ir_catches,
                }
            }
        };

        Ok(node)
    }

    fn lower_catch(&mut self, catch: &SCatch) -> LowerResult<CatchNode> {
        // Only reference types are throwable; a primitive here means the
        // upstream type checker let something broken through.
        if !catch.exception_ty.is_reference() {
            return Err(LowerError::IllegalTree {
                location: catch.location.clone(),
                message: format!("cannot catch non-reference type {}", catch.exception_ty),
            });
        }

        Ok(CatchNode {
            location: catch.location.clone(),
            exception_ty: catch.exception_ty.clone(),
            symbol: catch.name.clone(),
            block: self.lower_block(&catch.block)?,
        })
    }
}
