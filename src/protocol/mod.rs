//! Parser-executable protocol
//!
//! PARSE and CREATE requests travel as one JSON document on a backend's stdin
//! and come back as one JSON document on its stdout. Directly supported
//! ecosystems are answered in-process with the same shapes.

pub mod backend;
pub mod dispatch;
pub mod types;

pub use backend::{select_backend, ExecutableBackend, NativeBackend, ParserBackend};
pub use dispatch::{
    dispatch_create, group_create_payloads, handle_messages, parse_code_connect, CreateOutcome,
    GroupReport, GroupStatus, MessageSummary, PendingConnection,
};
pub use types::*;
