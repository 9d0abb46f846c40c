#[cfg(test)]
mod tests {
    use crate::connect::parse_connection_source;
    use crate::error::ParseErrorKind;
    use crate::ir::{ClassNamePart, Intrinsic, Literal, Snippet, ValueMappingKind};
    use crate::props::{parse_intrinsic_source, parse_prop_mapping_source};

    fn parse(code: &str) -> Intrinsic {
        parse_intrinsic_source(code, "Button.figma.tsx").unwrap()
    }

    fn parse_err(code: &str) -> ParseErrorKind {
        parse_intrinsic_source(code, "Button.figma.tsx").unwrap_err().kind
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // CHILDREN
    // ═══════════════════════════════════════════════════════════════════════════

    #[test]
    fn test_children_single_string_allows_wildcard() {
        match parse(r#"figma.children("Foo*")"#) {
            Intrinsic::Children(args) => assert_eq!(args.layers, vec!["Foo*"]),
            other => panic!("expected children, got {:?}", other),
        }
    }

    #[test]
    fn test_children_array_keeps_order() {
        match parse(r#"figma.children(["Foo", "Bar"])"#) {
            Intrinsic::Children(args) => assert_eq!(args.layers, vec!["Foo", "Bar"]),
            other => panic!("expected children, got {:?}", other),
        }
    }

    #[test]
    fn test_children_array_rejects_wildcard() {
        assert_eq!(
            parse_err(r#"figma.children(["Foo*", "Bar"])"#),
            ParseErrorKind::UnsupportedWildcardInArray
        );
    }

    #[test]
    fn test_children_rejects_non_literal() {
        assert_eq!(parse_err("figma.children(layerName)"), ParseErrorKind::InvalidArgument);
        assert_eq!(parse_err("figma.children([])"), ParseErrorKind::InvalidArgument);
        assert_eq!(parse_err(r#"figma.children(["A", name])"#), ParseErrorKind::InvalidArgument);
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // BOOLEAN / ENUM
    // ═══════════════════════════════════════════════════════════════════════════

    #[test]
    fn test_boolean_without_mapping() {
        match parse(r#"figma.boolean("Disabled")"#) {
            Intrinsic::Boolean(args) => {
                assert_eq!(args.figma_prop_name, "Disabled");
                assert!(args.value_mapping.is_none());
            }
            other => panic!("expected boolean, got {:?}", other),
        }
    }

    #[test]
    fn test_boolean_mapping_keys() {
        match parse(r#"figma.boolean("Disabled", { true: "A", false: "B" })"#) {
            Intrinsic::Boolean(args) => {
                let mapping = args.value_mapping.unwrap();
                let keys: Vec<&str> = mapping.keys().map(|k| k.as_str()).collect();
                assert_eq!(keys, vec!["true", "false"]);
            }
            other => panic!("expected boolean, got {:?}", other),
        }
        assert_eq!(
            parse_err(r#"figma.boolean("Disabled", { yes: "A" })"#),
            ParseErrorKind::InvalidArgument
        );
    }

    #[test]
    fn test_enum_requires_mapping() {
        assert_eq!(parse_err(r#"figma.enum("Size")"#), ParseErrorKind::InvalidArgument);
        assert_eq!(parse_err(r#"figma.enum("Size", {})"#), ParseErrorKind::InvalidArgument);
        assert_eq!(parse_err(r#"figma.enum(size, { A: 1 })"#), ParseErrorKind::InvalidArgument);
    }

    #[test]
    fn test_enum_rejects_duplicate_keys() {
        assert_eq!(
            parse_err(r#"figma.enum("Size", { Large: "lg", "Large": "xl" })"#),
            ParseErrorKind::DuplicateKey
        );
    }

    #[test]
    fn test_enum_values_cover_every_literal_kind() {
        let node = parse(
            r#"figma.enum("Variant", {
                Str: "s",
                Num: -2,
                Bool: false,
                Undef: undefined,
                Fn: () => onClick(),
                Jsx: <Icon name="x" />,
                Obj: { a: 1 },
                Tpl: `btn-${size}`,
                Ref: Theme.colors.primary,
                Paren: ("p"),
                Nested: figma.instance("Icon"),
            })"#,
        );
        let Intrinsic::Enum(args) = node else {
            panic!("expected enum");
        };
        let m = &args.value_mapping;
        let lit = |k: &str| match &m[k] {
            ValueMappingKind::Literal(l) => l.clone(),
            other => panic!("{} is not a literal: {:?}", k, other),
        };

        assert_eq!(lit("Str"), Literal::String("s".to_string()));
        assert_eq!(lit("Num"), Literal::Number(-2.0));
        assert_eq!(lit("Bool"), Literal::Boolean(false));
        assert_eq!(lit("Undef"), Literal::Undefined);
        assert_eq!(lit("Fn"), Literal::Snippet(Snippet::Function("() => onClick()".to_string())));
        assert_eq!(
            lit("Jsx"),
            Literal::Snippet(Snippet::JsxElement("<Icon name=\"x\" />".to_string()))
        );
        assert_eq!(lit("Obj"), Literal::Snippet(Snippet::Object("{ a: 1 }".to_string())));
        assert_eq!(
            lit("Tpl"),
            Literal::Snippet(Snippet::TemplateString("btn-${size}".to_string()))
        );
        assert_eq!(
            lit("Ref"),
            Literal::Snippet(Snippet::Identifier("Theme.colors.primary".to_string()))
        );
        assert_eq!(lit("Paren"), Literal::String("p".to_string()));
        assert!(matches!(m["Nested"], ValueMappingKind::Intrinsic(Intrinsic::Instance(_))));
    }

    #[test]
    fn test_unrepresentable_value_is_rejected() {
        assert_eq!(
            parse_err(r#"figma.enum("Size", { Large: a + b })"#),
            ParseErrorKind::InvalidArgument
        );
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // OTHER KINDS
    // ═══════════════════════════════════════════════════════════════════════════

    #[test]
    fn test_string_instance_text_content() {
        assert!(matches!(parse(r#"figma.string("Label")"#), Intrinsic::String(a) if a.figma_prop_name == "Label"));
        assert!(matches!(parse(r#"figma.instance("Icon")"#), Intrinsic::Instance(a) if a.figma_prop_name == "Icon"));
        assert!(matches!(parse(r#"figma.textContent("Title")"#), Intrinsic::TextContent(a) if a.layer == "Title"));
        assert_eq!(parse_err("figma.string()"), ParseErrorKind::InvalidArgument);
        assert_eq!(parse_err("figma.textContent(42)"), ParseErrorKind::InvalidArgument);
    }

    #[test]
    fn test_nested_props_recurses() {
        match parse(r#"figma.nestedProps("Label", { text: figma.textContent("Label"), bold: figma.boolean("Bold") })"#) {
            Intrinsic::NestedProps(args) => {
                assert_eq!(args.layer, "Label");
                let keys: Vec<&str> = args.props.keys().map(|k| k.as_str()).collect();
                assert_eq!(keys, vec!["text", "bold"]);
            }
            other => panic!("expected nested props, got {:?}", other),
        }
        assert_eq!(
            parse_err(r#"figma.nestedProps("Label", props)"#),
            ParseErrorKind::InvalidArgument
        );
    }

    #[test]
    fn test_class_name_keeps_literals_and_calls() {
        match parse(r#"figma.className(["btn", figma.enum("Size", { Large: "btn-lg" }), someVar])"#) {
            Intrinsic::ClassName(args) => {
                assert_eq!(args.class_name.len(), 2);
                assert_eq!(args.class_name[0], ClassNamePart::Literal("btn".to_string()));
                assert!(matches!(
                    args.class_name[1],
                    ClassNamePart::Intrinsic(Intrinsic::Enum(_))
                ));
            }
            other => panic!("expected className, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_intrinsic() {
        let err = parse_intrinsic_source(r#"figma.color("Fill")"#, "Button.figma.tsx").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::UnknownIntrinsic);
        assert!(err.message.contains("figma.color(\"Fill\")"));
    }

    #[test]
    fn test_error_location_points_at_argument() {
        let err = parse_intrinsic_source("figma.children(\n  [\"Foo*\", \"Bar\"])", "Button.figma.tsx")
            .unwrap_err();
        assert_eq!(err.file, "Button.figma.tsx");
        assert_eq!(err.line, 2);
        assert_eq!(err.column, 3);
        assert_eq!(err.context.as_deref(), Some("[\"Foo*\", \"Bar\"]"));
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // PROP MAPPINGS
    // ═══════════════════════════════════════════════════════════════════════════

    #[test]
    fn test_prop_mapping_end_to_end_shape() {
        let props = parse_prop_mapping_source(
            r#"{ disabled: figma.boolean("Disabled"), size: figma.enum("Size", { Large: "lg", Small: "sm" }) }"#,
            "Button.figma.tsx",
        )
        .unwrap();
        let keys: Vec<&str> = props.keys().map(|k| k.as_str()).collect();
        assert_eq!(keys, vec!["disabled", "size"]);
        let Intrinsic::Enum(size) = &props["size"] else {
            panic!("expected enum");
        };
        let keys: Vec<&str> = size.value_mapping.keys().map(|k| k.as_str()).collect();
        assert_eq!(keys, vec!["Large", "Small"]);
    }

    #[test]
    fn test_prop_mapping_rejects_literal_values() {
        let err = parse_prop_mapping_source(r#"{ label: "Click" }"#, "Button.figma.tsx").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::InvalidArgument);
        let err = parse_prop_mapping_source(r#"{ ...rest }"#, "Button.figma.tsx").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::InvalidArgument);
    }

    #[test]
    fn test_syntax_error() {
        let err = parse_prop_mapping_source("{ a: figma.boolean(", "Button.figma.tsx").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::Syntax);
    }

    #[test]
    fn test_syntax_error_points_at_offending_line() {
        let err = parse_prop_mapping_source(
            "{\n  a: figma.boolean(\"A\"),\n  b: ]\n}",
            "Button.figma.tsx",
        )
        .unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::Syntax);
        assert_eq!(err.line, 3);

        let err = parse_connection_source(
            "import figma from \"@figma/code-connect\"\n\nfigma.connect(Button, ])\n",
            "Button.figma.tsx",
        )
        .unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::Syntax);
        assert_eq!(err.line, 3);
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // CONNECTION FILES
    // ═══════════════════════════════════════════════════════════════════════════

    #[test]
    fn test_connection_calls_fail_independently() {
        let source = r#"import figma from "@figma/code-connect"
import { Button } from "./Button"

figma.connect(Button, "https://figma.com/file/abc?node-id=1-2", {
  props: {
    label: figma.string("Label"),
  },
  example: ({ label }) => <Button>{label}</Button>,
})

figma.connect(Button, "https://figma.com/file/abc?node-id=1-3", {
  props: {
    icons: figma.children(["Icon*", "Badge"]),
  },
  example: () => <Button />,
})
"#;
        let connections = parse_connection_source(source, "Button.figma.tsx").unwrap();
        assert_eq!(connections.len(), 2);

        let first = connections[0].as_ref().unwrap();
        assert_eq!(first.figma_node, "https://figma.com/file/abc?node-id=1-2");
        assert_eq!(first.component.as_deref(), Some("Button"));
        assert_eq!(first.location.line, 4);
        assert_eq!(first.example.as_deref(), Some("({ label }) => <Button>{label}</Button>"));

        let second = connections[1].as_ref().unwrap_err();
        assert_eq!(second.kind, ParseErrorKind::UnsupportedWildcardInArray);
        assert_eq!(second.line, 13);
    }

    #[test]
    fn test_connection_variant_and_imports() {
        let source = r#"figma.connect("https://figma.com/file/abc?node-id=1-2", {
  variant: { Type: "Primary", Disabled: true },
  imports: ["import { PrimaryButton } from './Button'"],
  example: () => <PrimaryButton />,
})"#;
        let connections = parse_connection_source(source, "Button.figma.tsx").unwrap();
        let connection = connections[0].as_ref().unwrap();
        assert!(connection.component.is_none());
        let variant = connection.variant.as_ref().unwrap();
        assert_eq!(
            variant["Disabled"],
            ValueMappingKind::Literal(Literal::Boolean(true))
        );
        assert_eq!(connection.imports, vec!["import { PrimaryButton } from './Button'"]);
        assert!(connection.props.is_empty());
    }

    #[test]
    fn test_connection_file_syntax_error_fails_whole_file() {
        let err = parse_connection_source("figma.connect(Button, ", "Broken.figma.tsx").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::Syntax);
        assert_eq!(err.file, "Broken.figma.tsx");
    }
}
