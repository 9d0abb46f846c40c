//! Prop-Mapping Builder
//!
//! Walks an object literal and produces an ordered mapping. Call-shaped values go
//! through the intrinsic parser, everything else through the literal extractor.

use indexmap::map::Entry;
use oxc_allocator::Allocator;
use oxc_ast::ast::{Expression, ObjectExpression, ObjectPropertyKind, PropertyKey, Statement};
use oxc_parser::Parser;
use oxc_span::{GetSpan, SourceType};

use crate::context::ParserContext;
use crate::error::{ParseErrorKind, ParserError, SourceLocation};
use crate::intrinsics::parse_intrinsic;
use crate::ir::{format_number, Intrinsic, PropMapping, ValueMapping, ValueMappingKind};
use crate::literal::extract_literal;

pub fn source_type() -> SourceType {
    SourceType::default()
        .with_module(true)
        .with_typescript(true)
        .with_jsx(true)
}

// ═══════════════════════════════════════════════════════════════════════════════
// OBJECT LITERAL WALK
// ═══════════════════════════════════════════════════════════════════════════════

/// Builds a value mapping: every entry is either a nested intrinsic or a literal.
pub fn parse_value_mapping(
    obj: &ObjectExpression<'_>,
    ctx: &ParserContext<'_>,
) -> Result<ValueMapping, ParserError> {
    let mut mapping = ValueMapping::with_capacity(obj.properties.len());

    for property in &obj.properties {
        let prop = match property {
            ObjectPropertyKind::ObjectProperty(prop) => prop,
            ObjectPropertyKind::SpreadProperty(spread) => {
                return Err(ctx.invalid_argument(
                    "Spread properties are not supported in mappings",
                    spread.span,
                ))
            }
        };

        let key = property_key_name(&prop.key, prop.computed, ctx)?;
        let value = match &prop.value {
            Expression::CallExpression(call) => ValueMappingKind::Intrinsic(parse_intrinsic(call, ctx)?),
            other => ValueMappingKind::Literal(extract_literal(other, ctx)?),
        };

        match mapping.entry(key) {
            Entry::Occupied(entry) => {
                return Err(ctx.error(
                    ParseErrorKind::DuplicateKey,
                    format!("Duplicate key '{}'", entry.key()),
                    prop.span,
                ))
            }
            Entry::Vacant(entry) => {
                entry.insert(value);
            }
        }
    }

    Ok(mapping)
}

/// Builds a prop mapping, where every value must be a helper call.
pub fn parse_props_object(
    obj: &ObjectExpression<'_>,
    ctx: &ParserContext<'_>,
) -> Result<PropMapping, ParserError> {
    let mapping = parse_value_mapping(obj, ctx)?;
    let mut props = PropMapping::with_capacity(mapping.len());

    for ((key, value), property) in mapping.into_iter().zip(obj.properties.iter()) {
        match value {
            ValueMappingKind::Intrinsic(intrinsic) => {
                props.insert(key, intrinsic);
            }
            ValueMappingKind::Literal(_) => {
                return Err(ctx.invalid_argument(
                    format!("Prop '{key}' must be mapped with a figma.* helper call"),
                    property.span(),
                ))
            }
        }
    }

    Ok(props)
}

fn property_key_name(
    key: &PropertyKey<'_>,
    computed: bool,
    ctx: &ParserContext<'_>,
) -> Result<String, ParserError> {
    match key {
        PropertyKey::StaticIdentifier(id) if !computed => Ok(id.name.to_string()),
        PropertyKey::StringLiteral(s) => Ok(s.value.to_string()),
        PropertyKey::NumericLiteral(n) => Ok(format_number(n.value)),
        _ => Err(ctx.invalid_argument(
            "Mapping keys must be identifiers, string literals or numbers",
            key.span(),
        )),
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// STANDALONE SOURCE ENTRY POINTS
// ═══════════════════════════════════════════════════════════════════════════════

/// Parses `code` as a single parenthesized expression and hands it to `f`.
fn with_expression<T>(
    code: &str,
    file_path: &str,
    f: impl for<'a> FnOnce(&Expression<'a>, &ParserContext<'_>) -> Result<T, ParserError>,
) -> Result<T, ParserError> {
    let wrapped = format!("({})", code);
    let allocator = Allocator::default();
    let ret = Parser::new(&allocator, &wrapped, source_type()).parse();
    let ctx = ParserContext::new(&wrapped, file_path).with_base_offset(1);

    if let Some(first) = ret.errors.first() {
        let offset = first
            .labels
            .as_ref()
            .and_then(|labels| labels.first())
            .map_or(0, |label| label.offset() as u32);
        return Err(ctx.syntax_error(first.to_string(), offset));
    }

    match ret.program.body.first() {
        Some(Statement::ExpressionStatement(stmt)) if ret.program.body.len() == 1 => {
            let expr = match &stmt.expression {
                Expression::ParenthesizedExpression(paren) => &paren.expression,
                other => other,
            };
            f(expr, &ctx)
        }
        _ => Err(ParserError::new(
            ParseErrorKind::Syntax,
            "Expected a single expression",
            file_path,
            SourceLocation { line: 1, column: 1 },
            None,
        )),
    }
}

/// Parses the source of an object literal such as
/// `{ disabled: figma.boolean("Disabled") }` into a prop mapping.
pub fn parse_prop_mapping_source(code: &str, file_path: &str) -> Result<PropMapping, ParserError> {
    with_expression(code, file_path, |expr, ctx| match expr {
        Expression::ObjectExpression(obj) => parse_props_object(obj, ctx),
        other => Err(ctx.invalid_argument("Expected an object literal of props", other.span())),
    })
}

/// Parses the source of a single helper call such as `figma.children("Icon*")`.
pub fn parse_intrinsic_source(code: &str, file_path: &str) -> Result<Intrinsic, ParserError> {
    with_expression(code, file_path, |expr, ctx| match expr {
        Expression::CallExpression(call) => parse_intrinsic(call, ctx),
        other => Err(ctx.invalid_argument("Expected a figma.* helper call", other.span())),
    })
}
