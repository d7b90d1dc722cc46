//! Reference resolution: replaces cross-record URL references with the bare
//! identifier of the record they point to.
//!
//! Sources link entities by detail-resource URL rather than by key. Stored
//! that way, the references are useless to the downstream models, so every
//! field passes through [`resolve_value`] before load. The transformation is
//! idempotent: an already-resolved value no longer matches the base prefix
//! and passes through untouched. URLs that do not match the owning source's
//! prefix are left as-is rather than corrected.

use serde_json::Value;

/// The URL prefix that marks a value as a reference, plus the source's
/// identifier style.
#[derive(Debug, Clone, Copy)]
pub struct BaseUrl<'a> {
    prefix: &'a str,
    /// Whether the source terminates detail URLs with a trailing slash.
    /// When set, the slash is stripped before the identifier segment is
    /// taken; when unset, a slash-terminated value is not a reference.
    slash_terminated: bool,
}

impl<'a> BaseUrl<'a> {
    pub const fn new(prefix: &'a str, slash_terminated: bool) -> Self {
        Self {
            prefix,
            slash_terminated,
        }
    }
}

/// Resolve a single raw value.
///
/// - A string starting with the base prefix becomes its final path segment.
/// - A sequence resolves element-wise (order preserved, non-strings dropped)
///   and stays a sequence, stored later as one structured column value.
/// - Everything else is returned unchanged.
pub fn resolve_value(value: &Value, base: BaseUrl) -> Value {
    match value {
        Value::String(s) => match reference_id(s, base) {
            Some(id) => Value::String(id),
            None => value.clone(),
        },
        Value::Array(items) => Value::Array(
            items
                .iter()
                .filter(|item| item.is_string())
                .map(|item| resolve_value(item, base))
                .collect(),
        ),
        other => other.clone(),
    }
}

/// Resolve every field of a record except the exempt self-URL field, which
/// stays inspectable in the sink.
pub fn resolve_record(record: &crate::Record, base: BaseUrl, exempt: Option<&str>) -> crate::Record {
    record
        .iter()
        .map(|(field, value)| {
            if exempt == Some(field.as_str()) {
                (field.clone(), value.clone())
            } else {
                (field.clone(), resolve_value(value, base))
            }
        })
        .collect()
}

/// The bare identifier for a reference string, or `None` when the value is
/// not a reference of the given source.
fn reference_id(s: &str, base: BaseUrl) -> Option<String> {
    if !s.starts_with(base.prefix) {
        return None;
    }
    let tail = if base.slash_terminated {
        s.trim_end_matches('/')
    } else {
        if s.ends_with('/') {
            return None;
        }
        s
    };
    tail.rsplit('/').next().map(str::to_string)
}
