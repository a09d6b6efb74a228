//! JSON serialization of assembled programs

use crate::program::Program;

/// Serialize a Program to compact JSON.
///
/// Absent optional fields are omitted, never emitted as null. For a
/// well-formed Program this does not fail; a failure here means the
/// Program was constructed wrongly upstream.
pub fn to_json(program: &Program) -> serde_json::Result<String> {
    serde_json::to_string(program)
}

/// Serialize a Program to pretty-printed JSON.
pub fn to_json_pretty(program: &Program) -> serde_json::Result<String> {
    serde_json::to_string_pretty(program)
}

/// Parse a Program back from its JSON form.
pub fn from_json(json: &str) -> serde_json::Result<Program> {
    serde_json::from_str(json)
}
