//! Literal Extractor
//!
//! Classifies a mapping value that is not a helper call. Non-primitive shapes are
//! kept as verbatim snippets so the generated template can rebuild them at
//! runtime; everything else goes through the generic primitive conversion.

use oxc_ast::ast::Expression;
use oxc_span::GetSpan;
use oxc_syntax::operator::UnaryOperator;

use crate::context::ParserContext;
use crate::error::ParserError;
use crate::ir::{Literal, Snippet};

pub fn extract_literal(expr: &Expression<'_>, ctx: &ParserContext<'_>) -> Result<Literal, ParserError> {
    match expr {
        Expression::ParenthesizedExpression(paren) => extract_literal(&paren.expression, ctx),
        Expression::JSXElement(_) | Expression::JSXFragment(_) => Ok(Literal::Snippet(
            Snippet::JsxElement(ctx.node_text(expr.span()).to_string()),
        )),
        Expression::ArrowFunctionExpression(_) | Expression::FunctionExpression(_) => Ok(
            Literal::Snippet(Snippet::Function(ctx.node_text(expr.span()).to_string())),
        ),
        Expression::ObjectExpression(_) => Ok(Literal::Snippet(Snippet::Object(
            ctx.node_text(expr.span()).to_string(),
        ))),
        Expression::TemplateLiteral(_) => Ok(Literal::Snippet(Snippet::TemplateString(
            ctx.node_text(expr.span()).replace('`', ""),
        ))),
        Expression::StaticMemberExpression(_) => Ok(Literal::Snippet(Snippet::Identifier(
            ctx.node_text(expr.span()).to_string(),
        ))),
        _ => convert_primitive(expr, ctx),
    }
}

/// Generic conversion for values that carry no source snippet.
fn convert_primitive(expr: &Expression<'_>, ctx: &ParserContext<'_>) -> Result<Literal, ParserError> {
    match expr {
        Expression::StringLiteral(s) => Ok(Literal::String(s.value.to_string())),
        Expression::NumericLiteral(n) => Ok(Literal::Number(n.value)),
        Expression::BooleanLiteral(b) => Ok(Literal::Boolean(b.value)),
        Expression::Identifier(id) if id.name == "undefined" => Ok(Literal::Undefined),
        Expression::UnaryExpression(unary) if unary.operator == UnaryOperator::UnaryNegation => {
            match &unary.argument {
                Expression::NumericLiteral(n) => Ok(Literal::Number(-n.value)),
                _ => Err(unsupported(expr, ctx)),
            }
        }
        Expression::ParenthesizedExpression(paren) => convert_primitive(&paren.expression, ctx),
        Expression::TSAsExpression(ts_as) => convert_primitive(&ts_as.expression, ctx),
        Expression::TSSatisfiesExpression(ts_sat) => convert_primitive(&ts_sat.expression, ctx),
        _ => Err(unsupported(expr, ctx)),
    }
}

fn unsupported(expr: &Expression<'_>, ctx: &ParserContext<'_>) -> ParserError {
    ctx.invalid_argument(
        format!(
            "Unsupported value `{}`: expected a string, number, boolean, undefined, \
             function, JSX element, object, template string or property access",
            ctx.node_text(expr.span())
        ),
        expr.span(),
    )
}
