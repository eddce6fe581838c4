//! Decoding of server stack entries
//!
//! `GET /stacks` returns loosely-typed JSON. Entries are matched by name on
//! the raw value and only the matching entry is decoded, so a malformed
//! neighbour never hides a valid stack.

use serde_json::Value;

use portainer_openapi::{Stack, StackEntry};

use crate::errors::PortainerError;

/// JSON type expected for a field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Kind {
    String,
    Unsigned,
    Bool,
    Object,
    Array,
}

impl Kind {
    fn matches(self, value: &Value) -> bool {
        match self {
            Kind::String => value.is_string(),
            Kind::Unsigned => value.is_u64(),
            Kind::Bool => value.is_boolean(),
            Kind::Object => value.is_object(),
            Kind::Array => value.is_array(),
        }
    }

    fn describe(self) -> &'static str {
        match self {
            Kind::String => "a string",
            Kind::Unsigned => "an unsigned integer",
            Kind::Bool => "a boolean",
            Kind::Object => "an object",
            Kind::Array => "an array",
        }
    }
}

/// Required fields cannot be absent or null; optional ones may be either
const ENTRY_FIELDS: &[(&str, Kind, bool)] = &[
    ("Id", Kind::Unsigned, false),
    ("Name", Kind::String, true),
    ("EndpointId", Kind::Unsigned, true),
    ("SwarmId", Kind::String, false),
    ("GitConfig", Kind::Object, false),
    ("Env", Kind::Array, false),
    ("AdditionalFiles", Kind::Array, false),
    ("AutoUpdate", Kind::Object, false),
];

const GIT_CONFIG_FIELDS: &[(&str, Kind, bool)] = &[
    ("URL", Kind::String, true),
    ("ReferenceName", Kind::String, false),
    ("ConfigFilePath", Kind::String, false),
    ("TLSSkipVerify", Kind::Bool, false),
];

/// Short name of a JSON value's type
pub fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// The `Name` of a raw stack entry, if it is a string
pub fn entry_name(entry: &Value) -> Option<&str> {
    entry.get("Name").and_then(Value::as_str)
}

fn check_fields(
    context: &str,
    value: &Value,
    fields: &[(&str, Kind, bool)],
) -> Result<(), PortainerError> {
    let object = value
        .as_object()
        .ok_or_else(|| PortainerError::decode(context, format!("expected an object, found {}", json_kind(value))))?;

    for &(field, kind, required) in fields {
        match object.get(field) {
            None | Some(Value::Null) if required => {
                return Err(PortainerError::decode(
                    context,
                    format!("missing required field {}", field),
                ));
            }
            None | Some(Value::Null) => {}
            Some(found) if !kind.matches(found) => {
                return Err(PortainerError::decode(
                    context,
                    format!(
                        "field {} should be {}, found {}",
                        field,
                        kind.describe(),
                        json_kind(found)
                    ),
                ));
            }
            Some(_) => {}
        }
    }

    Ok(())
}

/// Decode one `GET /stacks` entry into a [`Stack`].
///
/// Absent optional sections (Git configuration, env, auto-update) decode to
/// their defaults; a present field of the wrong type is an error naming it.
pub fn decode_stack_entry(entry: Value) -> Result<Stack, PortainerError> {
    let context = match entry_name(&entry) {
        Some(name) => format!("stack {}", name),
        None => "stack entry".to_string(),
    };

    check_fields(&context, &entry, ENTRY_FIELDS)?;
    if let Some(git) = entry.get("GitConfig").filter(|git| !git.is_null()) {
        check_fields(&format!("{} GitConfig", context), git, GIT_CONFIG_FIELDS)?;
    }

    let parsed: StackEntry = serde_json::from_value(entry)
        .map_err(|e| PortainerError::decode(context, e.to_string()))?;
    Ok(Stack::from(parsed))
}
