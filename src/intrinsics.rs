//! Intrinsic Registry & Parser
//!
//! Recognizes `figma.*` helper calls in a connection declaration and turns them
//! into [`Intrinsic`] nodes. Matching is a textual prefix test on the call's
//! source, so no symbol resolution or type checker is involved.

use oxc_ast::ast::{ArrayExpressionElement, CallExpression, Expression, ObjectExpression};
use oxc_span::{GetSpan, Span};

use crate::context::ParserContext;
use crate::error::{ParseErrorKind, ParserError};
use crate::ir::{
    BooleanArgs, ChildrenArgs, ClassNameArgs, ClassNamePart, EnumArgs, Intrinsic, IntrinsicKind,
    NestedPropsArgs, PropNameArgs, TextContentArgs,
};
use crate::props::{parse_props_object, parse_value_mapping};

// ═══════════════════════════════════════════════════════════════════════════════
// REGISTRY
// ═══════════════════════════════════════════════════════════════════════════════

pub type ParseIntrinsicFn =
    for<'a, 's> fn(&CallExpression<'a>, &ParserContext<'s>) -> Result<Intrinsic, ParserError>;

pub struct IntrinsicEntry {
    pub kind: IntrinsicKind,
    /// Qualified call name, e.g. `figma.boolean`
    pub name: &'static str,
    pub parse: ParseIntrinsicFn,
}

impl IntrinsicEntry {
    pub fn matches(&self, call_text: &str) -> bool {
        call_text.starts_with(self.name)
    }
}

pub static INTRINSICS: [IntrinsicEntry; 8] = [
    IntrinsicEntry {
        kind: IntrinsicKind::Boolean,
        name: "figma.boolean",
        parse: parse_boolean,
    },
    IntrinsicEntry {
        kind: IntrinsicKind::Enum,
        name: "figma.enum",
        parse: parse_enum,
    },
    IntrinsicEntry {
        kind: IntrinsicKind::String,
        name: "figma.string",
        parse: parse_string,
    },
    IntrinsicEntry {
        kind: IntrinsicKind::Instance,
        name: "figma.instance",
        parse: parse_instance,
    },
    IntrinsicEntry {
        kind: IntrinsicKind::Children,
        name: "figma.children",
        parse: parse_children,
    },
    IntrinsicEntry {
        kind: IntrinsicKind::NestedProps,
        name: "figma.nestedProps",
        parse: parse_nested_props,
    },
    IntrinsicEntry {
        kind: IntrinsicKind::ClassName,
        name: "figma.className",
        parse: parse_class_name,
    },
    IntrinsicEntry {
        kind: IntrinsicKind::TextContent,
        name: "figma.textContent",
        parse: parse_text_content,
    },
];

/// Returns the registry entry whose qualified name prefixes the call text.
pub fn find_intrinsic(call_text: &str) -> Option<&'static IntrinsicEntry> {
    INTRINSICS.iter().find(|entry| entry.matches(call_text))
}

/// Parses a helper call into its IR node.
pub fn parse_intrinsic(
    call: &CallExpression<'_>,
    ctx: &ParserContext<'_>,
) -> Result<Intrinsic, ParserError> {
    let call_text = ctx.node_text(call.span);
    match find_intrinsic(call_text) {
        Some(entry) => (entry.parse)(call, ctx),
        None => Err(ctx.error(
            ParseErrorKind::UnknownIntrinsic,
            format!("Unknown intrinsic: {}", call_text),
            call.span,
        )),
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// ARGUMENT HELPERS
// ═══════════════════════════════════════════════════════════════════════════════

fn argument<'c, 'a>(call: &'c CallExpression<'a>, index: usize) -> Option<&'c Expression<'a>> {
    call.arguments.get(index).and_then(|arg| arg.as_expression())
}

fn argument_span(call: &CallExpression<'_>, index: usize) -> Span {
    call.arguments
        .get(index)
        .map(|arg| arg.span())
        .unwrap_or(call.span)
}

fn expect_string_literal(
    call: &CallExpression<'_>,
    index: usize,
    ctx: &ParserContext<'_>,
    message: &str,
) -> Result<String, ParserError> {
    match argument(call, index) {
        Some(Expression::StringLiteral(s)) => Ok(s.value.to_string()),
        _ => Err(ctx.invalid_argument(message, argument_span(call, index))),
    }
}

fn expect_object_literal<'c, 'a>(
    call: &'c CallExpression<'a>,
    index: usize,
    ctx: &ParserContext<'_>,
    message: &str,
) -> Result<&'c ObjectExpression<'a>, ParserError> {
    match argument(call, index) {
        Some(Expression::ObjectExpression(obj)) => Ok(&**obj),
        _ => Err(ctx.invalid_argument(message, argument_span(call, index))),
    }
}

fn prop_name(call: &CallExpression<'_>, ctx: &ParserContext<'_>, name: &str) -> Result<String, ParserError> {
    expect_string_literal(
        call,
        0,
        ctx,
        &format!("{name} takes at least one argument, which is the Figma property name"),
    )
}

// ═══════════════════════════════════════════════════════════════════════════════
// PER-KIND PARSERS
// ═══════════════════════════════════════════════════════════════════════════════

fn parse_boolean(call: &CallExpression<'_>, ctx: &ParserContext<'_>) -> Result<Intrinsic, ParserError> {
    let name = "figma.boolean";
    let figma_prop_name = prop_name(call, ctx, name)?;

    let value_mapping = if call.arguments.len() > 1 {
        let obj = expect_object_literal(
            call,
            1,
            ctx,
            &format!("{name} second argument should be an object literal, that sets values for 'true' and 'false'"),
        )?;
        let mapping = parse_value_mapping(obj, ctx)?;
        if let Some(key) = mapping.keys().find(|k| *k != "true" && *k != "false") {
            return Err(ctx.invalid_argument(
                format!("{name} value mapping only accepts the keys 'true' and 'false', found '{key}'"),
                obj.span,
            ));
        }
        Some(mapping)
    } else {
        None
    };

    Ok(Intrinsic::Boolean(BooleanArgs {
        figma_prop_name,
        value_mapping,
    }))
}

fn parse_enum(call: &CallExpression<'_>, ctx: &ParserContext<'_>) -> Result<Intrinsic, ParserError> {
    let name = "figma.enum";
    let figma_prop_name = prop_name(call, ctx, name)?;
    let obj = expect_object_literal(
        call,
        1,
        ctx,
        &format!("{name} second argument should be an object literal, that maps Figma prop values to code"),
    )?;
    let value_mapping = parse_value_mapping(obj, ctx)?;
    if value_mapping.is_empty() {
        return Err(ctx.invalid_argument(
            format!("{name} value mapping must contain at least one entry"),
            obj.span,
        ));
    }

    Ok(Intrinsic::Enum(EnumArgs {
        figma_prop_name,
        value_mapping,
    }))
}

fn parse_string(call: &CallExpression<'_>, ctx: &ParserContext<'_>) -> Result<Intrinsic, ParserError> {
    Ok(Intrinsic::String(PropNameArgs {
        figma_prop_name: prop_name(call, ctx, "figma.string")?,
    }))
}

fn parse_instance(call: &CallExpression<'_>, ctx: &ParserContext<'_>) -> Result<Intrinsic, ParserError> {
    Ok(Intrinsic::Instance(PropNameArgs {
        figma_prop_name: prop_name(call, ctx, "figma.instance")?,
    }))
}

fn parse_children(call: &CallExpression<'_>, ctx: &ParserContext<'_>) -> Result<Intrinsic, ParserError> {
    let invalid = || {
        ctx.invalid_argument(
            "Invalid argument to figma.children, should be a string literal or an array of strings",
            argument_span(call, 0),
        )
    };

    let layers = match argument(call, 0) {
        Some(Expression::StringLiteral(s)) => vec![s.value.to_string()],
        Some(Expression::ArrayExpression(arr)) if !arr.elements.is_empty() => {
            let mut layers = Vec::with_capacity(arr.elements.len());
            for element in &arr.elements {
                let layer = match element {
                    ArrayExpressionElement::StringLiteral(s) => s.value.to_string(),
                    _ => {
                        return Err(ctx.invalid_argument(
                            "figma.children array elements must be string literals",
                            element.span(),
                        ))
                    }
                };
                if layer.contains('*') {
                    return Err(ctx.error(
                        ParseErrorKind::UnsupportedWildcardInArray,
                        "Wildcards can not be used with an array of strings. Use a single string literal instead.",
                        arr.span,
                    ));
                }
                layers.push(layer);
            }
            layers
        }
        _ => return Err(invalid()),
    };

    Ok(Intrinsic::Children(ChildrenArgs { layers }))
}

fn parse_nested_props(call: &CallExpression<'_>, ctx: &ParserContext<'_>) -> Result<Intrinsic, ParserError> {
    let layer = expect_string_literal(
        call,
        0,
        ctx,
        "Invalid argument to figma.nestedProps, `layerName` should be a string literal",
    )?;
    let obj = expect_object_literal(
        call,
        1,
        ctx,
        "Invalid argument to figma.nestedProps, `props` should be an object literal",
    )?;

    Ok(Intrinsic::NestedProps(NestedPropsArgs {
        layer,
        props: parse_props_object(obj, ctx)?,
    }))
}

fn parse_class_name(call: &CallExpression<'_>, ctx: &ParserContext<'_>) -> Result<Intrinsic, ParserError> {
    let arr = match argument(call, 0) {
        Some(Expression::ArrayExpression(arr)) => arr,
        _ => {
            return Err(ctx.invalid_argument(
                "figma.className takes an array of strings",
                argument_span(call, 0),
            ))
        }
    };

    let mut class_name = Vec::with_capacity(arr.elements.len());
    for element in &arr.elements {
        match element {
            ArrayExpressionElement::StringLiteral(s) => {
                class_name.push(ClassNamePart::Literal(s.value.to_string()))
            }
            ArrayExpressionElement::CallExpression(inner) => {
                class_name.push(ClassNamePart::Intrinsic(parse_intrinsic(inner, ctx)?))
            }
            other => {
                tracing::trace!(
                    file = ctx.file_path,
                    element = ctx.node_text(other.span()),
                    "ignoring figma.className element"
                );
            }
        }
    }

    Ok(Intrinsic::ClassName(ClassNameArgs { class_name }))
}

fn parse_text_content(call: &CallExpression<'_>, ctx: &ParserContext<'_>) -> Result<Intrinsic, ParserError> {
    Ok(Intrinsic::TextContent(TextContentArgs {
        layer: expect_string_literal(
            call,
            0,
            ctx,
            "figma.textContent takes a single argument which is the Figma layer name",
        )?,
    }))
}
