//! Destination grouping and dispatch
//!
//! Pending connections are grouped by the source file they attach to; each
//! group becomes one CREATE request. Groups run independently and a failing
//! group never affects its siblings.

use indexmap::map::Entry;
use indexmap::IndexMap;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::config::CodeConnectConfig;
use crate::create::{normalize_component_name, CONNECTION_FILE_EXTENSION};
use crate::discovery::find_connection_files;
use crate::error::ConnectError;
use crate::ir::PropMapping;

use super::backend::ParserBackend;
use super::types::{
    ComponentDescriptor, CreatePayload, CreateRequestPayload, CreateRequestPayloadMulti,
    CreatedFile, FigmaConnection, MessageLevel, ParseOptions, ParseRequestPayload,
    ParseResponsePayload, ParserMessage, RequestMode,
};

/// One design node linked to an export of a source file, waiting to be written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingConnection {
    pub filepath: String,
    #[serde(default = "default_export")]
    pub source_export: String,
    pub component: ComponentDescriptor,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prop_mapping: Option<PropMapping>,
    #[serde(
        default,
        alias = "reactTypeSignature",
        skip_serializing_if = "Option::is_none"
    )]
    pub type_signature: Option<IndexMap<String, String>>,
}

fn default_export() -> String {
    "default".to_string()
}

// ═══════════════════════════════════════════════════════════════════════════════
// GROUPING
// ═══════════════════════════════════════════════════════════════════════════════

/// Builds one CREATE payload per source file, in first-seen order.
///
/// Multi-export parsers collect every connection of a file into one payload.
/// Single-export parsers keep only the last connection seen for a file.
pub fn group_create_payloads(
    connections: Vec<PendingConnection>,
    config: &CodeConnectConfig,
    out_dir: Option<&Path>,
) -> Vec<CreatePayload> {
    let mut payloads: IndexMap<String, CreatePayload> = IndexMap::new();

    for pending in connections {
        let source = Path::new(&pending.filepath);
        let destination_dir = out_dir
            .or_else(|| source.parent())
            .map(|dir| dir.to_string_lossy().to_string())
            .unwrap_or_default();
        let stem = source
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();
        let normalized_name = normalize_component_name(&stem);

        if config.parser.is_multi_export() {
            let connection = FigmaConnection {
                source_export: pending.source_export,
                prop_mapping: pending.prop_mapping,
                type_signature: pending.type_signature,
                component: pending.component,
            };
            match payloads.entry(pending.filepath.clone()) {
                Entry::Occupied(mut entry) => {
                    if let CreatePayload::Multi(payload) = entry.get_mut() {
                        payload.figma_connections.push(connection);
                    }
                }
                Entry::Vacant(entry) => {
                    entry.insert(CreatePayload::Multi(CreateRequestPayloadMulti {
                        mode: RequestMode::Create,
                        destination_dir,
                        source_filepath: pending.filepath,
                        normalized_name,
                        figma_connections: vec![connection],
                        config: config.clone(),
                    }));
                }
            }
        } else {
            let mut component = pending.component;
            component.normalized_name = Some(normalized_name);
            let payload = CreatePayload::Single(CreateRequestPayload {
                mode: RequestMode::Create,
                destination_dir,
                source_filepath: Some(pending.filepath.clone()),
                component,
                config: config.clone(),
            });
            if payloads.insert(pending.filepath.clone(), payload).is_some() {
                tracing::warn!(
                    file = %pending.filepath,
                    "{:?} parser takes one component per file, keeping the last one",
                    config.parser
                );
            }
        }
    }

    payloads.into_values().collect()
}

/// Names the file a payload is expected to produce.
pub fn destination_of(payload: &CreatePayload) -> String {
    let name = match payload {
        CreatePayload::Multi(p) => p.normalized_name.clone(),
        CreatePayload::Single(p) => p
            .component
            .normalized_name
            .clone()
            .unwrap_or_else(|| normalize_component_name(&p.component.name)),
    };
    Path::new(payload.destination_dir())
        .join(format!("{}.{}", name, CONNECTION_FILE_EXTENSION))
        .display()
        .to_string()
}

// ═══════════════════════════════════════════════════════════════════════════════
// MESSAGES
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MessageSummary {
    pub has_errors: bool,
    pub has_warnings: bool,
}

/// Logs every backend message at its level and reports which levels occurred.
pub fn handle_messages(messages: &[ParserMessage]) -> MessageSummary {
    let mut summary = MessageSummary::default();
    for message in messages {
        match message.level {
            MessageLevel::Error => {
                summary.has_errors = true;
                tracing::error!("{}", message.text);
            }
            MessageLevel::Warning => {
                summary.has_warnings = true;
                tracing::warn!("{}", message.text);
            }
            MessageLevel::Info => tracing::info!("{}", message.text),
        }
    }
    summary
}

// ═══════════════════════════════════════════════════════════════════════════════
// CREATE DISPATCH
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug)]
pub enum GroupStatus {
    Created(Vec<CreatedFile>),
    /// The backend answered with at least one error-level message.
    Rejected,
    Failed(ConnectError),
}

#[derive(Debug)]
pub struct GroupReport {
    pub destination: String,
    pub messages: Vec<ParserMessage>,
    pub status: GroupStatus,
}

impl GroupReport {
    pub fn succeeded(&self) -> bool {
        matches!(self.status, GroupStatus::Created(_))
    }
}

/// Reports for every destination group, in input order.
#[derive(Debug)]
pub struct CreateOutcome {
    pub groups: Vec<GroupReport>,
}

impl CreateOutcome {
    pub fn all_succeeded(&self) -> bool {
        self.groups.iter().all(GroupReport::succeeded)
    }

    pub fn succeeded(&self) -> impl Iterator<Item = &GroupReport> {
        self.groups.iter().filter(|g| g.succeeded())
    }

    pub fn failed(&self) -> impl Iterator<Item = &GroupReport> {
        self.groups.iter().filter(|g| !g.succeeded())
    }
}

fn run_group(backend: &dyn ParserBackend, payload: &CreatePayload) -> GroupReport {
    let destination = destination_of(payload);
    tracing::debug!(destination = %destination, backend = backend.name(), "dispatching CREATE");

    match backend.create(payload) {
        Ok(response) => {
            let summary = handle_messages(&response.messages);
            let status = if summary.has_errors {
                GroupStatus::Rejected
            } else {
                for file in &response.created_files {
                    tracing::info!("Created {}", file.file_path);
                }
                GroupStatus::Created(response.created_files)
            };
            GroupReport {
                destination,
                messages: response.messages,
                status,
            }
        }
        Err(e) => {
            tracing::error!(destination = %destination, "{}", e);
            GroupReport {
                destination,
                messages: vec![],
                status: GroupStatus::Failed(e),
            }
        }
    }
}

/// Sends every payload to `backend`. Groups run in parallel; the reports keep
/// the order of `payloads`.
pub fn dispatch_create(backend: &dyn ParserBackend, payloads: &[CreatePayload]) -> CreateOutcome {
    let groups = payloads
        .par_iter()
        .map(|payload| run_group(backend, payload))
        .collect();
    CreateOutcome { groups }
}

// ═══════════════════════════════════════════════════════════════════════════════
// PARSE
// ═══════════════════════════════════════════════════════════════════════════════

/// Parses the given connection files, or every connection file under
/// `project_dir` when `paths` is empty.
pub fn parse_code_connect(
    backend: &dyn ParserBackend,
    project_dir: &Path,
    paths: Vec<String>,
    config: &CodeConnectConfig,
    options: ParseOptions,
) -> Result<ParseResponsePayload, ConnectError> {
    let paths = if paths.is_empty() {
        find_connection_files(project_dir)?
    } else {
        paths
    };
    tracing::debug!(files = paths.len(), backend = backend.name(), "dispatching PARSE");

    let request = ParseRequestPayload {
        mode: RequestMode::Parse,
        paths,
        options,
        config: config.clone(),
    };
    let response = backend.parse(&request)?;
    handle_messages(&response.messages);
    Ok(response)
}
