use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use crate::config::CodeConnectConfig;
use crate::connect::{parse_connection_source, to_code_connect_json};
use crate::create::create_connection_file;
use crate::error::ConnectError;

use super::types::{
    CreatePayload, CreateResponsePayload, ParseRequestPayload, ParseResponsePayload, ParserMessage,
};

/// Something that answers PARSE and CREATE requests.
///
/// A returned `Err` fails only the request it was called for; rejections the
/// backend can explain travel as error-level messages instead.
pub trait ParserBackend: Sync {
    fn name(&self) -> &str;

    fn parse(&self, request: &ParseRequestPayload) -> Result<ParseResponsePayload, ConnectError>;

    fn create(&self, request: &CreatePayload) -> Result<CreateResponsePayload, ConnectError>;
}

// ═══════════════════════════════════════════════════════════════════════════════
// IN-PROCESS
// ═══════════════════════════════════════════════════════════════════════════════

pub struct NativeBackend {
    pub project_dir: PathBuf,
}

impl NativeBackend {
    pub fn new(project_dir: impl Into<PathBuf>) -> Self {
        Self {
            project_dir: project_dir.into(),
        }
    }
}

impl ParserBackend for NativeBackend {
    fn name(&self) -> &str {
        "native"
    }

    fn parse(&self, request: &ParseRequestPayload) -> Result<ParseResponsePayload, ConnectError> {
        let mut docs = Vec::new();
        let mut messages = Vec::new();

        for path in &request.paths {
            let full = self.project_dir.join(path);
            let source = match fs::read_to_string(&full) {
                Ok(source) => source,
                Err(e) => {
                    messages.push(ParserMessage::error(format!("{}: {}", path, e)));
                    continue;
                }
            };

            let connections = match parse_connection_source(&source, path) {
                Ok(connections) => connections,
                Err(e) => {
                    messages.push(ParserMessage::error(e.to_string()));
                    continue;
                }
            };

            if connections.is_empty() && request.options.verbose {
                messages.push(ParserMessage::info(format!("{}: no figma.connect calls found", path)));
            }

            for connection in connections {
                match connection
                    .map_err(ConnectError::from)
                    .and_then(|c| to_code_connect_json(c, path, &request.config))
                {
                    Ok(doc) => docs.push(doc),
                    Err(ConnectError::Parse(e)) => messages.push(ParserMessage::error(e.to_string())),
                    Err(e) => messages.push(ParserMessage::error(format!("{}: {}", path, e))),
                }
            }
        }

        Ok(ParseResponsePayload { docs, messages })
    }

    fn create(&self, request: &CreatePayload) -> Result<CreateResponsePayload, ConnectError> {
        Ok(create_connection_file(request, &self.project_dir))
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// EXECUTABLE
// ═══════════════════════════════════════════════════════════════════════════════

/// Runs `parserCommand` through `sh -c` in the project directory, once per request.
pub struct ExecutableBackend {
    pub command: String,
    pub cwd: PathBuf,
}

impl ExecutableBackend {
    pub fn new(command: impl Into<String>, cwd: impl Into<PathBuf>) -> Self {
        Self {
            command: command.into(),
            cwd: cwd.into(),
        }
    }

    fn call<Req, Resp>(&self, destination: &str, request: &Req) -> Result<Resp, ConnectError>
    where
        Req: Serialize,
        Resp: DeserializeOwned,
    {
        let input = serde_json::to_vec(request)
            .map_err(|e| ConnectError::Internal(format!("serializing request: {}", e)))?;
        let failure = |detail: String| ConnectError::BackendFailure {
            destination: destination.to_string(),
            detail,
        };

        tracing::debug!(command = %self.command, destination, "invoking parser executable");
        let mut child = Command::new("sh")
            .arg("-c")
            .arg(&self.command)
            .current_dir(&self.cwd)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| failure(format!("failed to start `{}`: {}", self.command, e)))?;

        // The child may fill its stdout pipe before it has drained stdin.
        let writer = child.stdin.take().map(|mut stdin| {
            std::thread::spawn(move || stdin.write_all(&input))
        });
        let output = child
            .wait_with_output()
            .map_err(|e| failure(format!("failed to read output: {}", e)))?;
        if let Some(Ok(Err(e))) = writer.map(|w| w.join()) {
            tracing::debug!(error = %e, "parser executable closed stdin early");
        }

        let stderr = String::from_utf8_lossy(&output.stderr);
        for line in stderr.lines().filter(|l| !l.trim().is_empty()) {
            tracing::debug!(target: "parser_executable", "{}", line);
        }

        if !output.status.success() {
            return Err(failure(format!("exited with {}: {}", output.status, stderr.trim())));
        }

        let de = &mut serde_json::Deserializer::from_slice(&output.stdout);
        serde_path_to_error::deserialize(de).map_err(|e| ConnectError::ProtocolViolation {
            destination: destination.to_string(),
            detail: format!("{} (at `{}`)", e.inner(), e.path()),
        })
    }
}

impl ParserBackend for ExecutableBackend {
    fn name(&self) -> &str {
        &self.command
    }

    fn parse(&self, request: &ParseRequestPayload) -> Result<ParseResponsePayload, ConnectError> {
        let destination = request.paths.join(", ");
        self.call(&destination, request)
    }

    fn create(&self, request: &CreatePayload) -> Result<CreateResponsePayload, ConnectError> {
        self.call(request.destination_dir(), request)
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// SELECTION
// ═══════════════════════════════════════════════════════════════════════════════

/// Picks the in-process backend for directly supported parsers and the
/// configured executable otherwise.
pub fn select_backend(
    config: &CodeConnectConfig,
    project_dir: &Path,
) -> Result<Box<dyn ParserBackend>, ConnectError> {
    if config.parser.is_native() {
        return Ok(Box::new(NativeBackend::new(project_dir)));
    }
    match &config.parser_command {
        Some(command) => Ok(Box::new(ExecutableBackend::new(command.clone(), project_dir))),
        None => Err(ConnectError::Config(format!(
            "`parserCommand` is required for the {:?} parser",
            config.parser
        ))),
    }
}
