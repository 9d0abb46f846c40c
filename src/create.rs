//! In-process CREATE
//!
//! Writes a new connection file for the ecosystems this crate parses itself.
//! A file is written whole or not at all, and an existing file is never
//! overwritten.

use lazy_static::lazy_static;
use regex::Regex;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Component, Path, PathBuf};

use crate::declaration::{is_identifier, print_prop_mapping, quoted};
use crate::ir::{
    BooleanArgs, EnumArgs, Intrinsic, Literal, PropMapping, PropNameArgs, ValueMapping,
    ValueMappingKind,
};
use crate::protocol::types::{
    ComponentDescriptor, CreatePayload, CreateRequestPayload, CreateRequestPayloadMulti,
    CreateResponsePayload, CreatedFile, ParserMessage,
};

pub const CONNECTION_FILE_EXTENSION: &str = "figma.tsx";

lazy_static! {
    static ref WORD_SEPARATOR: Regex = Regex::new(r"[^A-Za-z0-9]+").unwrap();
    /// Figma suffixes non-variant property names with `#<node id>`
    static ref PROPERTY_ID_SUFFIX: Regex = Regex::new(r"#[0-9:]+$").unwrap();
}

// ═══════════════════════════════════════════════════════════════════════════════
// NAMES
// ═══════════════════════════════════════════════════════════════════════════════

/// Turns an arbitrary design name into a PascalCase identifier.
pub fn normalize_component_name(name: &str) -> String {
    let mut out: String = WORD_SEPARATOR
        .split(name)
        .filter(|word| !word.is_empty())
        .map(capitalize)
        .collect();
    if out.is_empty() {
        return "Component".to_string();
    }
    if out.starts_with(|c: char| c.is_ascii_digit()) {
        out.insert(0, '_');
    }
    out
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn camel_case(name: &str) -> String {
    let pascal = normalize_component_name(name);
    let pascal = pascal.trim_start_matches('_');
    let mut chars = pascal.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Path of `target` relative to `from_dir`, with forward slashes and a leading `./`.
pub fn relative_import_path(from_dir: &Path, target: &Path) -> String {
    let target = target.with_extension("");
    let from: Vec<Component> = from_dir.components().filter(|c| *c != Component::CurDir).collect();
    let to: Vec<Component> = target.components().filter(|c| *c != Component::CurDir).collect();

    let common = from.iter().zip(to.iter()).take_while(|(a, b)| a == b).count();
    let mut rel = PathBuf::new();
    for _ in common..from.len() {
        rel.push("..");
    }
    for part in &to[common..] {
        rel.push(part.as_os_str());
    }

    let rel = rel.to_string_lossy().replace('\\', "/");
    if rel.starts_with("..") {
        rel
    } else {
        format!("./{}", rel)
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// PROP DERIVATION
// ═══════════════════════════════════════════════════════════════════════════════

/// Builds a mapping from the component's design property definitions, used when
/// the request carries no explicit prop mapping.
pub fn prop_mapping_from_definitions(component: &ComponentDescriptor) -> PropMapping {
    let mut props = PropMapping::new();
    let Some(definitions) = &component.component_property_definitions else {
        return props;
    };

    for (figma_prop_name, definition) in definitions {
        let kind = definition.get("type").and_then(|t| t.as_str()).unwrap_or_default();
        let figma_prop_name = figma_prop_name.to_string();
        let code_name = camel_case(&PROPERTY_ID_SUFFIX.replace(&figma_prop_name, ""));
        if code_name.is_empty() || props.contains_key(&code_name) {
            continue;
        }

        let node = match kind {
            "BOOLEAN" => Intrinsic::Boolean(BooleanArgs {
                figma_prop_name,
                value_mapping: None,
            }),
            "TEXT" => Intrinsic::String(PropNameArgs { figma_prop_name }),
            "INSTANCE_SWAP" => Intrinsic::Instance(PropNameArgs { figma_prop_name }),
            "VARIANT" => {
                let options = definition
                    .get("variantOptions")
                    .and_then(|v| v.as_array())
                    .map(|opts| opts.iter().filter_map(|o| o.as_str()).collect::<Vec<_>>())
                    .unwrap_or_default();
                if options.is_empty() {
                    continue;
                }
                let value_mapping: ValueMapping = options
                    .into_iter()
                    .map(|option| {
                        (
                            option.to_string(),
                            ValueMappingKind::Literal(Literal::String(camel_case(option))),
                        )
                    })
                    .collect();
                Intrinsic::Enum(EnumArgs {
                    figma_prop_name,
                    value_mapping,
                })
            }
            other => {
                tracing::debug!(property = %figma_prop_name, kind = other, "skipping property");
                continue;
            }
        };
        props.insert(code_name, node);
    }

    props
}

// ═══════════════════════════════════════════════════════════════════════════════
// FILE RENDERING
// ═══════════════════════════════════════════════════════════════════════════════

struct ConnectionBlock {
    component: Option<String>,
    figma_node_url: String,
    props: PropMapping,
}

fn render_example(component: &str, props: &PropMapping) -> String {
    let attributes: Vec<String> = props
        .keys()
        .filter(|k| is_identifier(k))
        .map(|k| format!("{k}={{props.{k}}}"))
        .collect();
    if attributes.is_empty() {
        format!("() => <{} />", component)
    } else {
        format!("(props) => <{} {} />", component, attributes.join(" "))
    }
}

fn render_block(block: &ConnectionBlock, example_component: &str) -> String {
    let head = match &block.component {
        Some(component) => format!("figma.connect({}, {}, {{\n", component, quoted(&block.figma_node_url)),
        None => format!("figma.connect({}, {{\n", quoted(&block.figma_node_url)),
    };
    format!(
        "{}  props: {},\n  example: {},\n}})\n",
        head,
        print_prop_mapping(&block.props, 2),
        render_example(example_component, &block.props)
    )
}

fn render_file(imports: &[String], blocks: &[(ConnectionBlock, String)]) -> String {
    let mut out = String::from("import figma from \"@figma/code-connect\"\n");
    for import in imports {
        out.push_str(import);
        out.push('\n');
    }
    for (block, example_component) in blocks {
        out.push('\n');
        out.push_str(&render_block(block, example_component));
    }
    out
}

fn import_line(default_import: Option<&str>, named: &[String], path: &str) -> Option<String> {
    let named = if named.is_empty() {
        None
    } else {
        Some(format!("{{ {} }}", named.join(", ")))
    };
    match (default_import, named) {
        (Some(d), Some(n)) => Some(format!("import {}, {} from \"{}\"", d, n, path)),
        (Some(d), None) => Some(format!("import {} from \"{}\"", d, path)),
        (None, Some(n)) => Some(format!("import {} from \"{}\"", n, path)),
        (None, None) => None,
    }
}

fn render_multi(payload: &CreateRequestPayloadMulti, project_dir: &Path) -> String {
    let mut default_import = None;
    let mut named: Vec<String> = Vec::new();
    let mut blocks = Vec::with_capacity(payload.figma_connections.len());

    for connection in &payload.figma_connections {
        let component = match connection.source_export.as_str() {
            "default" => {
                default_import = Some(payload.normalized_name.as_str());
                Some(payload.normalized_name.clone())
            }
            export if is_identifier(export) => {
                if !named.iter().any(|n| n == export) {
                    named.push(export.to_string());
                }
                Some(export.to_string())
            }
            _ => None,
        };
        let props = connection
            .prop_mapping
            .clone()
            .unwrap_or_else(|| prop_mapping_from_definitions(&connection.component));
        let example_component = component
            .clone()
            .unwrap_or_else(|| payload.normalized_name.clone());
        blocks.push((
            ConnectionBlock {
                component,
                figma_node_url: connection.component.figma_node_url.clone(),
                props,
            },
            example_component,
        ));
    }

    let path = relative_import_path(
        &project_dir.join(&payload.destination_dir),
        &project_dir.join(&payload.source_filepath),
    );
    let imports: Vec<String> = import_line(default_import, &named, &path).into_iter().collect();
    render_file(&imports, &blocks)
}

fn single_name(payload: &CreateRequestPayload) -> String {
    payload
        .component
        .normalized_name
        .clone()
        .unwrap_or_else(|| normalize_component_name(&payload.component.name))
}

fn render_single(payload: &CreateRequestPayload) -> String {
    let block = ConnectionBlock {
        component: None,
        figma_node_url: payload.component.figma_node_url.clone(),
        props: prop_mapping_from_definitions(&payload.component),
    };
    render_file(&[], &[(block, single_name(payload))])
}

// ═══════════════════════════════════════════════════════════════════════════════
// ENTRY POINT
// ═══════════════════════════════════════════════════════════════════════════════

/// Answers one CREATE request. Relative destination and source paths resolve
/// against `project_dir`. Failures are reported as error messages.
pub fn create_connection_file(payload: &CreatePayload, project_dir: &Path) -> CreateResponsePayload {
    let (name, contents) = match payload {
        CreatePayload::Multi(p) => (p.normalized_name.clone(), render_multi(p, project_dir)),
        CreatePayload::Single(p) => (single_name(p), render_single(p)),
    };

    let file_name = format!("{}.{}", name, CONNECTION_FILE_EXTENSION);
    let reported = Path::new(payload.destination_dir()).join(&file_name);
    let reported = reported.display().to_string();
    let dir = project_dir.join(payload.destination_dir());

    match write_new_file(&dir, &dir.join(&file_name), contents.as_bytes()) {
        Ok(()) => {
            tracing::debug!(path = %reported, "created connection file");
            CreateResponsePayload {
                created_files: vec![CreatedFile { file_path: reported }],
                messages: vec![],
            }
        }
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists => CreateResponsePayload {
            created_files: vec![],
            messages: vec![ParserMessage::error(format!(
                "{} already exists, not overwriting",
                reported
            ))],
        },
        Err(e) => CreateResponsePayload {
            created_files: vec![],
            messages: vec![ParserMessage::error(format!("{}: {}", reported, e))],
        },
    }
}

/// Creates `path` with `contents`, failing if it already exists. A failed write
/// removes the partial file.
fn write_new_file(dir: &Path, path: &Path, contents: &[u8]) -> io::Result<()> {
    fs::create_dir_all(dir)?;
    let mut file = OpenOptions::new().write(true).create_new(true).open(path)?;
    let written = file.write_all(contents).and_then(|_| file.sync_all());
    if let Err(e) = written {
        drop(file);
        let _ = fs::remove_file(path);
        return Err(e);
    }
    Ok(())
}
