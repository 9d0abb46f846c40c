#[cfg(test)]
mod tests {
    use serde_json::json;
    use std::fs;
    use std::path::PathBuf;

    use crate::config::{CodeConnectConfig, ParserKind};
    use crate::error::ConnectError;
    use crate::protocol::backend::{select_backend, ExecutableBackend, NativeBackend, ParserBackend};
    use crate::protocol::dispatch::{
        dispatch_create, group_create_payloads, handle_messages, parse_code_connect, CreateOutcome,
        GroupStatus, PendingConnection,
    };
    use crate::protocol::types::{
        ComponentDescriptor, CreatePayload, CreateResponsePayload, MessageLevel, ParseOptions,
        ParseRequestPayload, ParserMessage, RequestMode,
    };

    fn temp_dir(tag: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "connect-native-protocol-{}-{}",
            tag,
            std::process::id()
        ));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn pending(filepath: &str, export: &str, node: &str) -> PendingConnection {
        PendingConnection {
            filepath: filepath.to_string(),
            source_export: export.to_string(),
            component: ComponentDescriptor {
                figma_node_url: format!("https://figma.com/file/abc?node-id={}", node),
                id: node.replace('-', ":"),
                name: format!("Node {}", node),
                normalized_name: None,
                node_type: Some("COMPONENT".to_string()),
                component_property_definitions: None,
            },
            prop_mapping: None,
            type_signature: None,
        }
    }

    fn custom_config() -> CodeConnectConfig {
        CodeConnectConfig {
            parser: ParserKind::Custom,
            parser_command: None,
            label: Some("Custom".to_string()),
            language: None,
        }
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // GROUPING
    // ═══════════════════════════════════════════════════════════════════════════

    #[test]
    fn test_same_file_connections_share_one_group() {
        let payloads = group_create_payloads(
            vec![
                pending("src/Button.tsx", "default", "1-2"),
                pending("src/Card.tsx", "Card", "1-4"),
                pending("src/Button.tsx", "IconButton", "1-3"),
            ],
            &CodeConnectConfig::default(),
            None,
        );
        assert_eq!(payloads.len(), 2);

        let CreatePayload::Multi(button) = &payloads[0] else {
            panic!("react payloads merge exports");
        };
        assert_eq!(button.source_filepath, "src/Button.tsx");
        assert_eq!(button.normalized_name, "Button");
        assert_eq!(button.destination_dir, "src");
        let exports: Vec<&str> = button
            .figma_connections
            .iter()
            .map(|c| c.source_export.as_str())
            .collect();
        assert_eq!(exports, vec!["default", "IconButton"]);

        let CreatePayload::Multi(card) = &payloads[1] else {
            panic!("react payloads merge exports");
        };
        assert_eq!(card.figma_connections.len(), 1);
    }

    #[test]
    fn test_single_export_keeps_last_connection() {
        let out = PathBuf::from("generated");
        let payloads = group_create_payloads(
            vec![
                pending("Sources/Button.swift", "?", "1-2"),
                pending("Sources/Button.swift", "?", "1-3"),
            ],
            &CodeConnectConfig {
                parser: ParserKind::Swift,
                ..custom_config()
            },
            Some(out.as_path()),
        );
        assert_eq!(payloads.len(), 1);
        let CreatePayload::Single(payload) = &payloads[0] else {
            panic!("swift payloads are single-export");
        };
        assert_eq!(payload.destination_dir, "generated");
        assert_eq!(payload.component.id, "1:3");
        assert_eq!(payload.component.normalized_name.as_deref(), Some("Button"));
    }

    #[test]
    fn test_payload_wire_shape() {
        let payloads = group_create_payloads(
            vec![pending("src/Button.tsx", "default", "1-2")],
            &CodeConnectConfig::default(),
            None,
        );
        let value = serde_json::to_value(&payloads[0]).unwrap();
        assert_eq!(value["mode"], json!("CREATE"));
        assert_eq!(value["normalizedName"], json!("Button"));
        assert_eq!(value["figmaConnections"][0]["sourceExport"], json!("default"));
        assert_eq!(value["figmaConnections"][0]["component"]["type"], json!("COMPONENT"));
        assert_eq!(value["config"]["parser"], json!("react"));
    }

    #[test]
    fn test_create_response_requires_messages() {
        let ok: Result<CreateResponsePayload, _> = serde_json::from_value(json!({
            "createdFiles": [{ "filePath": "a.figma.tsx" }],
            "messages": [{ "level": "WARN", "message": "careful" }],
            "extra": true
        }));
        let ok = ok.unwrap();
        assert_eq!(ok.messages[0].level, MessageLevel::Warning);

        let missing: Result<CreateResponsePayload, _> =
            serde_json::from_value(json!({ "createdFiles": [] }));
        assert!(missing.is_err());
    }

    #[test]
    fn test_handle_messages_reports_levels() {
        let summary = handle_messages(&[
            ParserMessage::info("parsed"),
            ParserMessage::warning("no example"),
        ]);
        assert!(!summary.has_errors);
        assert!(summary.has_warnings);
        assert!(handle_messages(&[ParserMessage::error("bad")]).has_errors);
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // DISPATCH
    // ═══════════════════════════════════════════════════════════════════════════

    #[cfg(unix)]
    fn dispatch_with_script(tag: &str, script: &str) -> CreateOutcome {
        let dir = temp_dir(tag);
        let payloads = group_create_payloads(
            vec![
                pending("src/Alpha.swift", "?", "1-2"),
                pending("src/Beta.swift", "?", "1-3"),
            ],
            &custom_config(),
            None,
        );
        let backend = ExecutableBackend::new(script, &dir);
        let outcome = dispatch_create(&backend, &payloads);
        let _ = fs::remove_dir_all(&dir);
        outcome
    }

    #[cfg(unix)]
    #[test]
    fn test_error_messages_fail_only_their_group() {
        let outcome = dispatch_with_script(
            "isolation",
            r#"input=$(cat); case "$input" in
  *Alpha*) echo '{"createdFiles":[],"messages":[{"level":"error","text":"no template for Alpha"}]}' ;;
  *) echo '{"createdFiles":[{"filePath":"src/Beta.figma.swift"}],"messages":[{"level":"info","text":"ok"}]}' ;;
esac"#,
        );

        assert_eq!(outcome.groups.len(), 2);
        assert!(!outcome.all_succeeded());
        assert!(outcome.groups[0].destination.contains("Alpha"));
        assert!(matches!(outcome.groups[0].status, GroupStatus::Rejected));
        assert_eq!(outcome.groups[0].messages[0].level, MessageLevel::Error);
        match &outcome.groups[1].status {
            GroupStatus::Created(files) => assert_eq!(files[0].file_path, "src/Beta.figma.swift"),
            other => panic!("expected Beta to succeed, got {:?}", other),
        }
        assert_eq!(outcome.succeeded().count(), 1);
        assert_eq!(outcome.failed().count(), 1);
    }

    #[cfg(unix)]
    #[test]
    fn test_missing_messages_is_protocol_violation() {
        let outcome = dispatch_with_script(
            "violation",
            r#"input=$(cat); case "$input" in
  *Alpha*) echo '{"createdFiles":[]}' ;;
  *) echo '{"createdFiles":[],"messages":[]}' ;;
esac"#,
        );

        match &outcome.groups[0].status {
            GroupStatus::Failed(ConnectError::ProtocolViolation { detail, .. }) => {
                assert!(detail.contains("messages"), "{}", detail)
            }
            other => panic!("expected protocol violation, got {:?}", other),
        }
        assert!(outcome.groups[1].succeeded());
    }

    #[cfg(unix)]
    #[test]
    fn test_nonzero_exit_is_backend_failure() {
        let outcome = dispatch_with_script(
            "exit",
            r#"input=$(cat); case "$input" in
  *Alpha*) echo 'parser crashed' >&2; exit 3 ;;
  *) echo '{"createdFiles":[],"messages":[]}' ;;
esac"#,
        );

        match &outcome.groups[0].status {
            GroupStatus::Failed(ConnectError::BackendFailure { detail, .. }) => {
                assert!(detail.contains("parser crashed"), "{}", detail)
            }
            other => panic!("expected backend failure, got {:?}", other),
        }
        assert!(outcome.groups[1].succeeded());
    }

    #[cfg(unix)]
    #[test]
    fn test_truncated_json_is_protocol_violation() {
        let outcome = dispatch_with_script("truncated", r#"cat > /dev/null; printf '{"createdFiles":['"#);
        assert!(outcome
            .groups
            .iter()
            .all(|g| matches!(g.status, GroupStatus::Failed(ConnectError::ProtocolViolation { .. }))));
    }

    #[test]
    fn test_native_create_writes_under_project_dir() {
        let dir = temp_dir("native-create");
        let config = CodeConnectConfig::default();
        let payloads = group_create_payloads(
            vec![pending("components/Button.tsx", "default", "1-2")],
            &config,
            None,
        );
        let backend = select_backend(&config, &dir).unwrap();
        let outcome = dispatch_create(backend.as_ref(), &payloads);

        match &outcome.groups[0].status {
            GroupStatus::Created(files) => {
                assert_eq!(files[0].file_path, "components/Button.figma.tsx")
            }
            other => panic!("expected the file to be created, got {:?}", other),
        }
        assert!(dir.join("components/Button.figma.tsx").is_file());
        assert!(!PathBuf::from("components/Button.figma.tsx").exists());

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_groups_sharing_a_destination_never_overwrite() {
        let dir = temp_dir("shared-destination");
        let out = PathBuf::from("out");
        let payloads = group_create_payloads(
            vec![
                pending("a/Button.tsx", "default", "1-2"),
                pending("b/Button.tsx", "default", "1-3"),
            ],
            &CodeConnectConfig::default(),
            Some(out.as_path()),
        );
        assert_eq!(payloads.len(), 2);

        let outcome = dispatch_create(&NativeBackend::new(&dir), &payloads);
        assert_eq!(outcome.succeeded().count(), 1);
        let rejected: Vec<_> = outcome.failed().collect();
        assert_eq!(rejected.len(), 1);
        assert!(matches!(rejected[0].status, GroupStatus::Rejected));
        assert!(rejected[0].messages[0].text.contains("already exists"));

        let winner = if outcome.groups[0].succeeded() { "1-2" } else { "1-3" };
        let written = fs::read_to_string(dir.join("out/Button.figma.tsx")).unwrap();
        assert!(written.contains(&format!("node-id={}", winner)));

        let _ = fs::remove_dir_all(&dir);
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // PARSE
    // ═══════════════════════════════════════════════════════════════════════════

    #[test]
    fn test_native_parse_isolates_broken_files() {
        let dir = temp_dir("parse");
        fs::create_dir_all(dir.join("src")).unwrap();
        fs::write(
            dir.join("src/Button.figma.tsx"),
            r#"import figma from "@figma/code-connect"
import { Button } from "./Button"

figma.connect(Button, "https://figma.com/file/abc?node-id=1-2", {
  props: {
    disabled: figma.boolean("Disabled"),
    size: figma.enum("Size", { Large: "lg", Small: "sm" }),
  },
  example: ({ disabled, size }) => <Button disabled={disabled} size={size} />,
})
"#,
        )
        .unwrap();
        fs::write(dir.join("src/Broken.figma.tsx"), "figma.connect(Broken, ").unwrap();

        let config = CodeConnectConfig::default();
        let backend = select_backend(&config, &dir).unwrap();
        assert_eq!(backend.name(), "native");

        let response = parse_code_connect(
            backend.as_ref(),
            &dir,
            vec![],
            &config,
            ParseOptions::default(),
        )
        .unwrap();

        assert_eq!(response.docs.len(), 1);
        let doc = &response.docs[0];
        assert_eq!(doc.source, "src/Button.figma.tsx");
        assert_eq!(doc.source_location.line, 4);
        assert_eq!(doc.label, "React");
        assert_eq!(doc.language, "typescript");
        assert_eq!(doc.template_data.props.as_ref().unwrap().len(), 2);
        assert!(doc.template.contains("__properties__.enum('Size'"));

        assert_eq!(response.messages.len(), 1);
        assert_eq!(response.messages[0].level, MessageLevel::Error);
        assert!(response.messages[0].text.contains("src/Broken.figma.tsx"));

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_native_parse_reports_unreadable_paths() {
        let backend = NativeBackend::new(temp_dir("missing"));
        let request = ParseRequestPayload {
            mode: RequestMode::Parse,
            paths: vec!["Nope.figma.tsx".to_string()],
            options: ParseOptions::default(),
            config: CodeConnectConfig::default(),
        };
        let response = backend.parse(&request).unwrap();
        assert!(response.docs.is_empty());
        assert!(response.messages[0].text.starts_with("Nope.figma.tsx"));
    }

    #[test]
    fn test_select_backend_requires_command_for_custom_parsers() {
        let err = select_backend(&custom_config(), &PathBuf::from(".")).err().unwrap();
        assert!(matches!(err, ConnectError::Config(_)));

        let config = CodeConnectConfig {
            parser_command: Some("./parse.sh".to_string()),
            ..custom_config()
        };
        assert_eq!(select_backend(&config, &PathBuf::from(".")).unwrap().name(), "./parse.sh");
    }
}
