//! Node bindings, built with the `napi` feature.

use napi_derive::napi;

use crate::codegen::render_prop_mapping;
use crate::ir::PropMapping;
use crate::props::parse_prop_mapping_source;

/// Parses an object literal of helper calls into PropMapping JSON.
#[napi]
pub fn parse_props_native(code: String, file_path: String) -> napi::Result<serde_json::Value> {
    let props = parse_prop_mapping_source(&code, &file_path)
        .map_err(|e| napi::Error::from_reason(e.to_string()))?;
    serde_json::to_value(props).map_err(|e| napi::Error::from_reason(e.to_string()))
}

#[napi]
pub fn render_prop_mapping_native(
    mapping: serde_json::Value,
    selector: Option<String>,
) -> napi::Result<String> {
    let props: PropMapping =
        serde_json::from_value(mapping).map_err(|e| napi::Error::from_reason(e.to_string()))?;
    render_prop_mapping(&props, selector.as_deref()).map_err(|e| napi::Error::from_reason(e.to_string()))
}
