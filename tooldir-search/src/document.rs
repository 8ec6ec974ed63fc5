//! Tool record → search document
//!
//! Search documents are flat JSON objects keyed by `objectID`. Timestamps
//! become RFC 3339 strings and a `keywords` array is gathered from the
//! nested tag, category and feature fields.

use std::collections::HashSet;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use serde_json::{Map, Value};

/// Epoch values above this are taken as milliseconds.
const EPOCH_MILLIS_THRESHOLD: u64 = 100_000_000_000;

/// Fields never copied into the index
const DROPPED_FIELDS: &[&str] = &["_id", "objectID", "keywords"];

/// One record ready for the search index
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct SearchDocument(Map<String, Value>);

impl SearchDocument {
    pub fn object_id(&self) -> &str {
        self.0
            .get("objectID")
            .and_then(Value::as_str)
            .unwrap_or_default()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }
}

/// Flatten a stored tool. Returns `None` when it has no usable `unique_id`.
pub fn flatten_tool(record: &Map<String, Value>) -> Option<SearchDocument> {
    let object_id = match record.get("unique_id")? {
        Value::String(s) if !s.trim().is_empty() => s.trim().to_owned(),
        Value::Number(n) => n.to_string(),
        _ => return None,
    };

    let mut doc = Map::new();
    doc.insert("objectID".into(), Value::String(object_id));

    for (key, value) in record {
        if DROPPED_FIELDS.contains(&key.as_str()) {
            continue;
        }
        let value = if is_timestamp_field(key) || is_date_wrapper(value) {
            coerce_timestamp(value).map(Value::String).unwrap_or_else(|| value.clone())
        } else {
            value.clone()
        };
        doc.insert(key.clone(), value);
    }

    doc.insert(
        "keywords".into(),
        Value::Array(extract_keywords(record).into_iter().map(Value::String).collect()),
    );

    Some(SearchDocument(doc))
}

fn is_timestamp_field(key: &str) -> bool {
    key.ends_with("_at") || key.ends_with("At") || key == "date"
}

fn is_date_wrapper(value: &Value) -> bool {
    matches!(value, Value::Object(o) if o.contains_key("$date"))
}

/// Coerce a timestamp-ish value to RFC 3339.
///
/// Accepts RFC 3339 strings, epoch seconds or milliseconds, and
/// `{"$date": ...}` wrappers around either (including `{"$numberLong": ..}`).
pub fn coerce_timestamp(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => DateTime::parse_from_rfc3339(s.trim())
            .ok()
            .map(|dt| format_utc(dt.with_timezone(&Utc))),
        Value::Number(n) => {
            let raw = n.as_i64().or_else(|| n.as_f64().map(|f| f as i64))?;
            let dt = if raw.unsigned_abs() >= EPOCH_MILLIS_THRESHOLD {
                DateTime::from_timestamp_millis(raw)
            } else {
                DateTime::from_timestamp(raw, 0)
            }?;
            Some(format_utc(dt))
        }
        Value::Object(o) => {
            let inner = o.get("$date").or_else(|| o.get("$numberLong"))?;
            match inner {
                Value::String(s) if o.contains_key("$numberLong") || s.chars().all(|c| c.is_ascii_digit()) => {
                    s.parse::<i64>().ok().and_then(|n| coerce_timestamp(&Value::from(n)))
                }
                other => coerce_timestamp(other),
            }
        }
        _ => None,
    }
}

fn format_utc(dt: DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Lowercased, deduplicated keywords in first-seen order.
pub fn extract_keywords(record: &Map<String, Value>) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    let mut push = |raw: &str| {
        let kw = raw.trim().to_lowercase();
        if !kw.is_empty() && seen.insert(kw.clone()) {
            out.push(kw);
        }
    };

    for field in ["tags", "keywords"] {
        match record.get(field) {
            Some(Value::Array(items)) => items.iter().filter_map(Value::as_str).for_each(&mut push),
            Some(Value::String(s)) => s.split(',').for_each(&mut push),
            _ => {}
        }
    }

    for field in ["categories", "features"] {
        if let Some(Value::Array(items)) = record.get(field) {
            for item in items {
                match item {
                    Value::String(s) => push(s),
                    Value::Object(o) => {
                        if let Some(name) = o.get("name").and_then(Value::as_str) {
                            push(name);
                        }
                    }
                    _ => {}
                }
            }
        }
    }

    out
}
