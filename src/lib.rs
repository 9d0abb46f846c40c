//! # Connect Native
//!
//! Compiles the `figma.*` helper calls found in connection declarations into a
//! serializable IR, renders that IR as JavaScript evaluated against the design
//! tool's current layer, and drives parser executables over the PARSE/CREATE
//! protocol.
//!
//! ## Invariants
//!
//! 1. **Closed grammar**: only the eight registered helpers are recognized. A call
//!    is matched by the textual prefix of its callee (`figma.boolean(...)`), never
//!    by symbol resolution. Anything else is `FCC-PARSE-002`.
//!
//! 2. **All or nothing**: a helper call either yields a complete [`ir::Intrinsic`]
//!    or a [`ParserError`] carrying file, line, column and the offending source.
//!    No partial IR is ever returned.
//!
//! 3. **Order**: mappings are `IndexMap`s. Source key order is kept through the
//!    IR, the JSON wire format and the rendered object literals.
//!
//! 4. **Runtime contract**: rendered expressions use `figma.currentLayer`,
//!    `__properties__.<kind>(...)`, `__findChildWithCriteria__(...)` and the
//!    `_fcc_*` snippet helpers exactly as spelled.
//!
//! 5. **Nested props**: `figma.nestedProps` parses but never renders; it must be
//!    flattened before code generation.
//!
//! 6. **Isolation**: every CREATE destination group is dispatched on its own. A
//!    backend failure, a protocol violation or an error-level message fails only
//!    that group; the outcome lists groups in input order.

#[cfg(feature = "napi")]
mod bridge;

pub mod codegen;
pub mod config;
pub mod connect;
pub mod context;
pub mod create;
pub mod declaration;
pub mod discovery;
pub mod error;
pub mod intrinsics;
pub mod ir;
pub mod literal;
pub mod props;
pub mod protocol;

#[cfg(test)]
mod parse_tests;
#[cfg(test)]
mod protocol_tests;

#[cfg(feature = "napi")]
pub use bridge::{parse_props_native, render_prop_mapping_native};

pub use codegen::{render_intrinsic, render_prop_mapping, render_value_mapping};
pub use config::{CodeConnectConfig, ParserKind, ProjectConfig};
pub use error::{ConnectError, ParseErrorKind, ParserError, RenderError};
pub use ir::{Intrinsic, Literal, PropMapping, Snippet, ValueMapping, ValueMappingKind};
pub use props::{parse_intrinsic_source, parse_prop_mapping_source};
pub use protocol::{
    dispatch_create, group_create_payloads, parse_code_connect, select_backend, CreateOutcome,
    ParserBackend, PendingConnection,
};
