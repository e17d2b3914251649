//! Parsing strategies for aggregator payloads.
//!
//! Each strategy is a pure function from a raw payload to a list of field
//! records. Strategies know nothing about summoners or matches; the typed
//! conversion happens in the parent module, which walks [`STRATEGIES`] in
//! order and keeps the first one that produces a usable value.

use serde_json::{Map, Value};

/// A flat field bag with normalized keys (see [`normalize_key`]).
pub type Record = Map<String, Value>;

pub type Strategy = fn(&Value) -> Option<Vec<Record>>;

pub const STRATEGIES: [(&str, Strategy); 3] = [
    ("direct", parse_direct),
    ("table", parse_table),
    ("nested", parse_nested),
];

// Lists of entities that a direct object may carry.
const LIST_KEYS: [&str; 4] = ["games", "matches", "history", "gamehistory"];
// Single wrapped entity.
const ENTITY_KEYS: [&str; 3] = ["summoner", "result", "data"];
// Nested objects whose fields are lifted into the parent record.
const FLATTEN_KEYS: [&str; 4] = ["stats", "mydata", "player", "summoner"];

/// `gameName`, `game_name` and `Game-Name` all become `gamename`.
pub fn normalize_key(key: &str) -> String {
    key.chars()
        .filter(|c| !matches!(c, '_' | '-' | ' '))
        .flat_map(|c| c.to_lowercase())
        .collect()
}

/// Builds a record from a JSON object, lifting fields out of well-known
/// nested objects when the parent does not already define them.
pub fn to_record(object: &Map<String, Value>) -> Record {
    let mut record: Record = object
        .iter()
        .map(|(k, v)| (normalize_key(k), v.clone()))
        .collect();

    for key in FLATTEN_KEYS {
        if let Some(Value::Object(inner)) = record.get(key).cloned() {
            for (k, v) in inner {
                record.entry(normalize_key(&k)).or_insert(v);
            }
        }
    }
    record
}

/// Strings holding JSON are decoded; everything else is returned as is.
pub fn decode_text(value: &Value) -> Value {
    match value {
        Value::String(text) => serde_json::from_str(text.trim()).unwrap_or(Value::Null),
        other => other.clone(),
    }
}

/// JSON documents carried in MCP `content[].text` items.
pub fn text_items(payload: &Value) -> Vec<Value> {
    payload
        .get("content")
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(|item| item.get("text"))
                .map(decode_text)
                .filter(|v| !v.is_null())
                .collect()
        })
        .unwrap_or_default()
}

fn is_envelope(object: &Map<String, Value>) -> bool {
    object.contains_key("content")
        || object.contains_key("headers")
        || object.contains_key("rows")
        || matches!(object.get("data"), Some(Value::Array(_)))
}

fn collect_direct(value: &Value, depth: usize, out: &mut Vec<Record>) {
    if depth > 3 {
        return;
    }
    match value {
        Value::Array(items) => {
            out.extend(items.iter().filter_map(Value::as_object).map(to_record));
        }
        Value::Object(object) if !is_envelope(object) => {
            let normalized = to_record(object);
            for key in LIST_KEYS {
                if let Some(list) = normalized.get(key).filter(|v| v.is_array()) {
                    collect_direct(list, depth + 1, out);
                    return;
                }
            }
            for key in ENTITY_KEYS {
                if let Some(inner) = object
                    .iter()
                    .find(|(k, _)| normalize_key(k) == key)
                    .map(|(_, v)| v)
                    .filter(|v| v.is_object())
                {
                    let before = out.len();
                    collect_direct(inner, depth + 1, out);
                    if out.len() > before {
                        return;
                    }
                }
            }
            out.push(normalized);
        }
        _ => {}
    }
}

/// The payload is itself the typed object (or a plain list of them).
pub fn parse_direct(payload: &Value) -> Option<Vec<Record>> {
    let mut out = Vec::new();
    collect_direct(&decode_text(payload), 0, &mut out);
    (!out.is_empty()).then_some(out)
}

fn table_rows(value: &Value) -> Option<Vec<Record>> {
    let headers: Vec<String> = value
        .get("headers")?
        .as_array()?
        .iter()
        .map(|h| h.as_str().map(normalize_key).unwrap_or_default())
        .collect();
    let rows = value.get("rows")?.as_array()?;

    let records: Vec<Record> = rows
        .iter()
        .filter_map(Value::as_array)
        .map(|cells| {
            let object: Map<String, Value> = headers
                .iter()
                .zip(cells.iter())
                .filter(|(h, _)| !h.is_empty())
                .map(|(h, c)| (h.clone(), c.clone()))
                .collect();
            to_record(&object)
        })
        .collect();

    (!records.is_empty()).then_some(records)
}

/// `{headers, rows}` at the top level, under `data`, or inside a text item.
pub fn parse_table(payload: &Value) -> Option<Vec<Record>> {
    let top = decode_text(payload);
    let mut candidates = vec![top.clone()];
    candidates.extend(text_items(&top));

    candidates.iter().find_map(|candidate| {
        table_rows(candidate).or_else(|| candidate.get("data").and_then(table_rows))
    })
}

/// Entities spread across `content` / `data` arrays, either as objects or
/// as JSON text items.
pub fn parse_nested(payload: &Value) -> Option<Vec<Record>> {
    let top = decode_text(payload);
    let mut out = Vec::new();

    for key in ["content", "data"] {
        let Some(items) = top.get(key).and_then(Value::as_array) else {
            continue;
        };
        for item in items {
            match item.get("text") {
                Some(text) => collect_direct(&decode_text(text), 0, &mut out),
                None => {
                    if let Some(object) = item.as_object() {
                        out.push(to_record(object));
                    }
                }
            }
        }
    }

    (!out.is_empty()).then_some(out)
}
