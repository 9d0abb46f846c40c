//! Project configuration (`figma.config.json`).

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::ConnectError;

pub const CONFIG_FILE_NAME: &str = "figma.config.json";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ParserKind {
    #[default]
    React,
    Html,
    Swift,
    Compose,
    Custom,
}

impl ParserKind {
    /// Ecosystems answered by the in-process generator.
    pub fn is_native(self) -> bool {
        matches!(self, ParserKind::React | ParserKind::Html)
    }

    /// Multi-export ecosystems merge every connection of a source file into one payload.
    pub fn is_multi_export(self) -> bool {
        self.is_native()
    }

    pub fn default_label(self) -> &'static str {
        match self {
            ParserKind::React => "React",
            ParserKind::Html => "Web Components",
            ParserKind::Swift => "SwiftUI",
            ParserKind::Compose => "Compose",
            ParserKind::Custom => "Code",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct CodeConnectConfig {
    #[serde(default)]
    pub parser: ParserKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parser_command: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

impl CodeConnectConfig {
    pub fn label(&self) -> String {
        self.label
            .clone()
            .unwrap_or_else(|| self.parser.default_label().to_string())
    }

    pub fn language(&self) -> String {
        self.language
            .clone()
            .unwrap_or_else(|| "typescript".to_string())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectConfig {
    #[serde(default)]
    pub code_connect: CodeConnectConfig,
}

impl ProjectConfig {
    /// Loads `figma.config.json` from `dir`, falling back to defaults when absent.
    pub fn load(dir: &Path) -> Result<Self, ConnectError> {
        let path = dir.join(CONFIG_FILE_NAME);
        if !path.exists() {
            tracing::debug!(dir = %dir.display(), "no {} found, using defaults", CONFIG_FILE_NAME);
            return Ok(Self::default());
        }

        let data = fs::read_to_string(&path)
            .map_err(|e| ConnectError::io(path.display().to_string(), e))?;
        let config: ProjectConfig = serde_json::from_str(&data)
            .map_err(|e| ConnectError::Config(format!("{}: {}", path.display(), e)))?;

        if !config.code_connect.parser.is_native() && config.code_connect.parser_command.is_none() {
            return Err(ConnectError::Config(format!(
                "{}: `parserCommand` is required for the {:?} parser",
                path.display(),
                config.code_connect.parser
            )));
        }

        Ok(config)
    }
}
