//! Redaction and cell formatting helpers for CLI commands.

use std::borrow::Cow;

use serde_json::{Map, Value};
use terrapin_output::{Record, display_value};

use crate::resources::Column;

/// Placeholder printed instead of a sensitive value.
pub(crate) const REDACTED: &str = "(sensitive)";
/// Display cells longer than this many characters are shortened in list tables.
pub(crate) const MAX_CELL_CHARS: usize = 40;

/// Replace sensitive attribute values in a JSON:API document, in place.
///
/// Applies to `data` as a single resource or an array of resources.
pub(crate) fn redact_document(document: &mut Value) {
    let Some(data) = document.get_mut("data") else {
        return;
    };
    match data {
        Value::Array(resources) => resources.iter_mut().for_each(redact_resource),
        resource => redact_resource(resource),
    }
}

/// A response body with sensitive attributes masked, for bodies printed without
/// being parsed into records. Bodies that are not JSON, or need no masking, come
/// back verbatim.
pub(crate) fn redact_body(body: &[u8]) -> Cow<'_, [u8]> {
    let Ok(original) = serde_json::from_slice::<Value>(body) else {
        return Cow::Borrowed(body);
    };
    let mut document = original.clone();
    redact_document(&mut document);
    if document == original {
        return Cow::Borrowed(body);
    }
    serde_json::to_vec(&document).map_or(Cow::Borrowed(REDACTED.as_bytes()), Cow::Owned)
}

fn redact_resource(resource: &mut Value) {
    if let Some(Value::Object(attributes)) = resource.get_mut("attributes") {
        redact_attributes(attributes);
    }
}

/// Redact `token`, keys containing `secret`, and `value` when the attributes
/// mark themselves `sensitive`.
pub(crate) fn redact_attributes(attributes: &mut Map<String, Value>) {
    let sensitive = attributes
        .get("sensitive")
        .and_then(Value::as_bool)
        .unwrap_or(false);
    for (key, value) in attributes.iter_mut() {
        if value.is_null() {
            continue;
        }
        let lowered = key.to_ascii_lowercase();
        if lowered == "token" || lowered.contains("secret") || (sensitive && lowered == "value") {
            *value = Value::String(REDACTED.to_string());
        }
    }
}

/// Shorten `text` to [`MAX_CELL_CHARS`] characters, ending in `...`.
pub(crate) fn truncate(text: &str) -> String {
    if text.chars().count() <= MAX_CELL_CHARS {
        return text.to_string();
    }
    let kept: String = text.chars().take(MAX_CELL_CHARS - 3).collect();
    format!("{kept}...")
}

/// Display rows and untruncated rows for `records`, one cell per column.
pub(crate) fn list_rows(
    records: &[Record],
    columns: &[Column],
) -> (Vec<Vec<String>>, Vec<Vec<String>>) {
    let full_rows: Vec<Vec<String>> = records
        .iter()
        .map(|record| {
            columns
                .iter()
                .map(|column| record.get(column.key).map(display_value).unwrap_or_default())
                .collect()
        })
        .collect();
    let rows = full_rows
        .iter()
        .map(|row| row.iter().map(|cell| truncate(cell)).collect())
        .collect();
    (rows, full_rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn redacts_tokens_and_secrets() {
        let mut document = json!({
            "data": {
                "id": "at-1",
                "type": "authentication-tokens",
                "attributes": {
                    "description": "ci",
                    "token": "abc.atlasv1.xyz",
                    "client-secret": "hunter2",
                    "expired-at": null
                }
            }
        });
        redact_document(&mut document);
        let attributes = &document["data"]["attributes"];
        assert_eq!(attributes["description"], "ci");
        assert_eq!(attributes["token"], REDACTED);
        assert_eq!(attributes["client-secret"], REDACTED);
        assert!(attributes["expired-at"].is_null());
    }

    #[test]
    fn redacts_value_only_when_marked_sensitive() {
        let mut document = json!({
            "data": [
                {"id": "var-1", "type": "vars", "attributes": {"key": "a", "value": "1", "sensitive": false}},
                {"id": "var-2", "type": "vars", "attributes": {"key": "b", "value": "2", "sensitive": true}}
            ]
        });
        redact_document(&mut document);
        assert_eq!(document["data"][0]["attributes"]["value"], "1");
        assert_eq!(document["data"][1]["attributes"]["value"], REDACTED);
    }

    #[test]
    fn redaction_keeps_attribute_order() {
        let mut document = json!({
            "data": {"id": "x", "type": "t", "attributes": {"z": 1, "token": "t", "a": 2}}
        });
        redact_document(&mut document);
        let keys: Vec<&String> = document["data"]["attributes"]
            .as_object()
            .map(|attributes| attributes.keys().collect())
            .unwrap_or_default();
        assert_eq!(keys, ["z", "token", "a"]);
    }

    #[test]
    fn documents_without_resources_are_untouched() {
        let mut document = json!({"errors": [{"detail": "secret"}]});
        let before = document.clone();
        redact_document(&mut document);
        assert_eq!(document, before);
    }

    #[test]
    fn redact_body_masks_unparseable_documents() {
        let body = br#"{"data":{"type":"tokens","attributes":{"ID":"dup","token":"abc"}}}"#;
        let redacted = redact_body(body);
        let text = String::from_utf8_lossy(&redacted);
        assert!(!text.contains("abc"), "{text}");
        assert!(text.contains(r#""token":"(sensitive)""#), "{text}");
        assert!(text.find("\"ID\"") < text.find("\"token\""));
    }

    #[test]
    fn redact_body_keeps_bodies_that_need_no_masking() {
        let body = br#"{"errors": [{"detail": "bad"}]}"#;
        assert!(matches!(redact_body(body), Cow::Borrowed(bytes) if bytes == body));
        assert!(matches!(redact_body(b"pong"), Cow::Borrowed(bytes) if bytes == b"pong"));
    }

    #[test]
    fn truncate_shortens_long_cells() {
        assert_eq!(truncate("short"), "short");
        let exact = "x".repeat(MAX_CELL_CHARS);
        assert_eq!(truncate(&exact), exact);
        let long = "y".repeat(MAX_CELL_CHARS + 5);
        let shortened = truncate(&long);
        assert_eq!(shortened.chars().count(), MAX_CELL_CHARS);
        assert!(shortened.ends_with("..."));
    }

    #[test]
    fn truncate_counts_characters_not_bytes() {
        let text = "é".repeat(MAX_CELL_CHARS);
        assert_eq!(truncate(&text), text);
    }

    #[test]
    fn list_rows_pick_columns_and_keep_full_values() -> Result<(), terrapin_output::RecordError> {
        let message = "a".repeat(50);
        let record = Record::from_pairs([
            ("ID", json!("run-1")),
            ("Type", json!("runs")),
            ("message", json!(message)),
        ])?;
        let columns = [
            Column {
                header: "ID",
                key: "ID",
            },
            Column {
                header: "MESSAGE",
                key: "message",
            },
            Column {
                header: "STATUS",
                key: "status",
            },
        ];
        let (rows, full_rows) = list_rows(&[record], &columns);
        assert_eq!(rows[0][0], "run-1");
        assert_eq!(rows[0][1], format!("{}...", "a".repeat(37)));
        assert_eq!(rows[0][2], "");
        assert_eq!(full_rows[0][1], message);
        Ok(())
    }
}
