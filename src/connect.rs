//! Connection declarations
//!
//! Finds every `figma.connect(...)` call in a source file, builds its prop
//! mapping and renders the template published for the design node.

use oxc_allocator::Allocator;
use oxc_ast::ast::{ArrayExpressionElement, CallExpression, Expression, ObjectExpression, ObjectPropertyKind, PropertyKey};
use oxc_ast_visit::{walk, Visit};
use oxc_parser::Parser;
use oxc_span::GetSpan;

use crate::codegen::{render_prop_mapping, render_snippet};
use crate::config::CodeConnectConfig;
use crate::context::ParserContext;
use crate::error::{ConnectError, ParserError, SourceLocation};
use crate::ir::{PropMapping, Snippet, ValueMapping, FIGMA_CONNECT_CALL};
use crate::props::{parse_props_object, parse_value_mapping, source_type};
use crate::protocol::types::{CodeConnectJson, SourceLine, TemplateData};

#[derive(Debug, Clone, PartialEq)]
pub struct ParsedConnection {
    pub figma_node: String,
    pub component: Option<String>,
    pub location: SourceLocation,
    pub props: PropMapping,
    pub example: Option<String>,
    pub variant: Option<ValueMapping>,
    pub imports: Vec<String>,
}

// ═══════════════════════════════════════════════════════════════════════════════
// COLLECTION
// ═══════════════════════════════════════════════════════════════════════════════

struct ConnectCollector<'c, 's> {
    ctx: &'c ParserContext<'s>,
    connections: Vec<Result<ParsedConnection, ParserError>>,
}

impl<'a> Visit<'a> for ConnectCollector<'_, '_> {
    fn visit_call_expression(&mut self, call: &CallExpression<'a>) {
        if self.ctx.node_text(call.span).starts_with(FIGMA_CONNECT_CALL) {
            self.connections.push(parse_connect_call(call, self.ctx));
            return;
        }
        walk::walk_call_expression(self, call);
    }
}

/// Parses every connection declaration in `source`.
///
/// A syntax error fails the whole file; otherwise each declaration succeeds or
/// fails on its own.
pub fn parse_connection_source(
    source: &str,
    file_path: &str,
) -> Result<Vec<Result<ParsedConnection, ParserError>>, ParserError> {
    let allocator = Allocator::default();
    let ret = Parser::new(&allocator, source, source_type()).parse();
    let ctx = ParserContext::new(source, file_path);

    if let Some(first) = ret.errors.first() {
        let offset = first
            .labels
            .as_ref()
            .and_then(|labels| labels.first())
            .map_or(0, |label| label.offset() as u32);
        return Err(ctx.syntax_error(first.to_string(), offset));
    }

    let mut collector = ConnectCollector {
        ctx: &ctx,
        connections: Vec::new(),
    };
    collector.visit_program(&ret.program);
    Ok(collector.connections)
}

fn parse_connect_call(
    call: &CallExpression<'_>,
    ctx: &ParserContext<'_>,
) -> Result<ParsedConnection, ParserError> {
    let mut component = None;
    let mut figma_node = None;
    let mut config: Option<&ObjectExpression<'_>> = None;

    for arg in &call.arguments {
        match arg.as_expression() {
            Some(Expression::StringLiteral(s)) if figma_node.is_none() => {
                figma_node = Some(s.value.to_string())
            }
            Some(expr)
                if matches!(
                    expr,
                    Expression::Identifier(_) | Expression::StaticMemberExpression(_)
                ) && component.is_none()
                    && figma_node.is_none() =>
            {
                component = Some(ctx.node_text(expr.span()).to_string())
            }
            Some(Expression::ObjectExpression(obj)) => config = Some(&**obj),
            _ => {
                return Err(ctx.invalid_argument(
                    "figma.connect takes an optional component, the Figma node URL and a config object",
                    arg.span(),
                ))
            }
        }
    }

    let figma_node = figma_node.ok_or_else(|| {
        ctx.invalid_argument(
            "figma.connect requires the Figma node URL as a string literal",
            call.span,
        )
    })?;

    let mut connection = ParsedConnection {
        figma_node,
        component,
        location: ctx.location(call.span.start),
        props: PropMapping::new(),
        example: None,
        variant: None,
        imports: Vec::new(),
    };

    let Some(config) = config else {
        return Ok(connection);
    };

    for property in &config.properties {
        let ObjectPropertyKind::ObjectProperty(prop) = property else {
            continue;
        };
        let key = match &prop.key {
            PropertyKey::StaticIdentifier(id) => id.name.as_str(),
            PropertyKey::StringLiteral(s) => s.value.as_str(),
            _ => continue,
        };

        match (key, &prop.value) {
            ("props", Expression::ObjectExpression(obj)) => {
                connection.props = parse_props_object(obj, ctx)?
            }
            ("props", other) => {
                return Err(ctx.invalid_argument("`props` should be an object literal", other.span()))
            }
            ("variant", Expression::ObjectExpression(obj)) => {
                connection.variant = Some(parse_value_mapping(obj, ctx)?)
            }
            ("example", value) => connection.example = Some(ctx.node_text(value.span()).to_string()),
            ("imports", Expression::ArrayExpression(arr)) => {
                for element in &arr.elements {
                    match element {
                        ArrayExpressionElement::StringLiteral(s) => {
                            connection.imports.push(s.value.to_string())
                        }
                        other => {
                            return Err(ctx.invalid_argument(
                                "`imports` should be an array of string literals",
                                other.span(),
                            ))
                        }
                    }
                }
            }
            _ => {}
        }
    }

    Ok(connection)
}

// ═══════════════════════════════════════════════════════════════════════════════
// TEMPLATE
// ═══════════════════════════════════════════════════════════════════════════════

/// Renders the executable template for one connection.
pub fn render_template(connection: &ParsedConnection) -> Result<String, ConnectError> {
    let props = render_prop_mapping(&connection.props, None)?;
    let example = connection
        .example
        .as_ref()
        .map(|text| render_snippet(&Snippet::Function(text.clone())))
        .unwrap_or_else(|| "undefined".to_string());

    Ok(format!(
        "const figma = require('figma')\n\nconst props = {}\n\nexport default {{ example: {}, props }}\n",
        props, example
    ))
}

pub fn to_code_connect_json(
    connection: ParsedConnection,
    source_path: &str,
    config: &CodeConnectConfig,
) -> Result<CodeConnectJson, ConnectError> {
    let template = render_template(&connection)?;
    Ok(CodeConnectJson {
        figma_node: connection.figma_node,
        component: connection.component,
        variant: connection.variant,
        source: source_path.to_string(),
        source_location: SourceLine {
            line: connection.location.line,
        },
        template,
        template_data: TemplateData {
            props: Some(connection.props),
            imports: connection.imports,
        },
        language: config.language(),
        label: config.label(),
    })
}
