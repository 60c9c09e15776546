//! Pretty-printing for the IR tree
//!
//! Provides human-readable output for debugging lowered scripts.

use super::expr::ExpressionNode;
use super::node::{BlockNode, ClassNode, FunctionNode, Modifiers, StatementNode};
use std::fmt::Write;

/// Trait for pretty-printing IR constructs
pub trait PrettyPrint {
    fn pretty_print(&self) -> String;
}

impl PrettyPrint for ClassNode {
    fn pretty_print(&self) -> String {
        let mut output = String::new();
        writeln!(output, "class {} {{", self.name).unwrap();

        for field in &self.fields {
            let storage = if field.modifiers.contains(Modifiers::STATIC) {
                "static "
            } else {
                ""
            };
            writeln!(output, "  {}field {}: {}", storage, field.name, field.ty).unwrap();
        }

        for function in &self.functions {
            let mut printed = function.pretty_print();
            printed = printed
                .lines()
                .map(|line| format!("  {}\n", line))
                .collect();
            output.push_str(&printed);
        }

        writeln!(output, "}}").unwrap();
        output
    }
}

impl PrettyPrint for FunctionNode {
    fn pretty_print(&self) -> String {
        let mut output = String::new();

        let params: Vec<String> = self
            .parameter_names
            .iter()
            .zip(self.type_parameters.iter())
            .map(|(name, ty)| format!("{}: {}", name, ty))
            .collect();
        let synthetic = if self.is_synthetic { "synthetic " } else { "" };
        writeln!(
            output,
            "{}fn {}({}) -> {} {{",
            synthetic,
            self.name,
            params.join(", "),
            self.return_ty
        )
        .unwrap();

        output.push_str(&print_block(&self.block, 2));
        writeln!(output, "}}").unwrap();
        output
    }
}

fn print_block(block: &BlockNode, indent: usize) -> String {
    let mut output = String::new();
    for statement in &block.statements {
        output.push_str(&print_statement(statement, indent));
    }
    output
}

fn print_statement(statement: &StatementNode, indent: usize) -> String {
    let prefix = " ".repeat(indent);
    let mut output = String::new();

    match statement {
        StatementNode::Declaration {
            name,
            ty,
            initializer,
            ..
        } => match initializer {
            Some(init) => writeln!(
                output,
                "{}decl {}: {} = {}",
                prefix,
                name,
                ty,
                format_expr(init)
            )
            .unwrap(),
            None => writeln!(output, "{}decl {}: {}", prefix, name, ty).unwrap(),
        },
        StatementNode::Expression { expression, .. } => {
            writeln!(output, "{}{}", prefix, format_expr(expression)).unwrap();
        }
        StatementNode::Return { value, .. } => match value {
            Some(value) => writeln!(output, "{}return {}", prefix, format_expr(value)).unwrap(),
            None => writeln!(output, "{}return", prefix).unwrap(),
        },
        StatementNode::Throw { value, .. } => {
            writeln!(output, "{}throw {}", prefix, format_expr(value)).unwrap();
        }
        StatementNode::If {
            condition, block, ..
        } => {
            writeln!(output, "{}if {} {{", prefix, format_expr(condition)).unwrap();
            output.push_str(&print_block(block, indent + 2));
            writeln!(output, "{}}}", prefix).unwrap();
        }
        StatementNode::IfElse {
            condition,
            block,
            else_block,
            ..
        } => {
            writeln!(output, "{}if {} {{", prefix, format_expr(condition)).unwrap();
            output.push_str(&print_block(block, indent + 2));
            writeln!(output, "{}}} else {{", prefix).unwrap();
            output.push_str(&print_block(else_block, indent + 2));
            writeln!(output, "{}}}", prefix).unwrap();
        }
        StatementNode::While {
            condition, block, ..
        } => {
            writeln!(output, "{}while {} {{", prefix, format_expr(condition)).unwrap();
            output.push_str(&print_block(block, indent + 2));
            writeln!(output, "{}}}", prefix).unwrap();
        }
        StatementNode::Break { .. } => writeln!(output, "{}break", prefix).unwrap(),
        StatementNode::Continue { .. } => writeln!(output, "{}continue", prefix).unwrap(),
        StatementNode::Try { block, catches, .. } => {
            writeln!(output, "{}try {{", prefix).unwrap();
            output.push_str(&print_block(block, indent + 2));
            for catch in catches {
                writeln!(
                    output,
                    "{}}} catch ({} {}) {{",
                    prefix, catch.exception_ty, catch.symbol
                )
                .unwrap();
                output.push_str(&print_block(&catch.block, indent + 2));
            }
            writeln!(output, "{}}}", prefix).unwrap();
        }
    }

    output
}

fn format_expr(expr: &ExpressionNode) -> String {
    match expr {
        ExpressionNode::Constant { value, .. } => format!("{}", value),
        ExpressionNode::Null { ty, .. } => format!("({})null", ty),
        ExpressionNode::Variable { name, .. } => name.clone(),
        ExpressionNode::Static { ty, .. } => format!("{}", ty),
        ExpressionNode::MemberFieldLoad { name, is_static, .. } => {
            if *is_static {
                format!("load static {}", name)
            } else {
                format!("load this.{}", name)
            }
        }
        ExpressionNode::MemberCall {
            function,
            arguments,
            ..
        } => format!("this.{}({})", function.name, format_args(arguments)),
        ExpressionNode::Invoke {
            method, arguments, ..
        } => format!(".{}({})", method.name, format_args(arguments)),
        ExpressionNode::Call {
            receiver,
            invocation,
            ..
        } => format!("{}{}", format_expr(receiver), format_expr(invocation)),
        ExpressionNode::Binary { op, left, right, .. } => {
            format!("({} {:?} {})", format_expr(left), op, format_expr(right))
        }
        ExpressionNode::Unary { op, operand, .. } => {
            format!("({:?} {})", op, format_expr(operand))
        }
    }
}

fn format_args(arguments: &[ExpressionNode]) -> String {
    let formatted: Vec<String> = arguments.iter().map(format_expr).collect();
    formatted.join(", ")
}
