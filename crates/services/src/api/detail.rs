//! Human-readable messages from FastAPI-style error bodies.

use reqwest::StatusCode;
use serde_json::Value;

/// Extract the most useful message from an error response body.
///
/// Order: `detail` (string, or a list of `{loc, msg}` validation entries),
/// then `message`, then `error`, then `HTTP {status}`.
pub(crate) fn error_message(status: StatusCode, body: &str) -> String {
    let fallback = || format!("HTTP {}", status.as_u16());

    let Ok(data) = serde_json::from_str::<Value>(body) else {
        return fallback();
    };

    match data.get("detail") {
        Some(Value::Array(entries)) => {
            let msg = entries
                .iter()
                .map(validation_entry)
                .collect::<Vec<_>>()
                .join("; ");
            if msg.is_empty() {
                "Validation error".to_string()
            } else {
                msg
            }
        }
        Some(Value::String(detail)) => detail.clone(),
        _ => ["message", "error"]
            .iter()
            .find_map(|key| data.get(*key).and_then(Value::as_str))
            .map_or_else(fallback, str::to_string),
    }
}

// `loc` is e.g. ["body", "email"]; the leading segment names the request part.
fn validation_entry(entry: &Value) -> String {
    let field = match entry.get("loc") {
        Some(Value::Array(parts)) => parts
            .iter()
            .skip(1)
            .map(scalar_text)
            .collect::<Vec<_>>()
            .join("."),
        Some(other) => scalar_text(other),
        None => String::new(),
    };
    let msg = entry.get("msg").map(scalar_text).unwrap_or_default();
    format!("{field}: {msg}")
}

fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn string_detail_is_used_verbatim() {
        let msg = error_message(StatusCode::BAD_REQUEST, r#"{"detail":"Email already registered"}"#);
        assert_eq!(msg, "Email already registered");
    }

    #[test]
    fn validation_list_is_flattened() {
        let body = r#"{"detail":[
            {"loc":["body","email"],"msg":"value is not a valid email"},
            {"loc":["body","items",0,"name"],"msg":"field required"}
        ]}"#;
        let msg = error_message(StatusCode::UNPROCESSABLE_ENTITY, body);
        assert_eq!(
            msg,
            "email: value is not a valid email; items.0.name: field required"
        );
    }

    #[test]
    fn empty_validation_list_has_generic_message() {
        let msg = error_message(StatusCode::UNPROCESSABLE_ENTITY, r#"{"detail":[]}"#);
        assert_eq!(msg, "Validation error");
    }

    #[test]
    fn falls_back_through_message_and_error() {
        assert_eq!(
            error_message(StatusCode::BAD_GATEWAY, r#"{"message":"upstream down"}"#),
            "upstream down"
        );
        assert_eq!(
            error_message(StatusCode::BAD_GATEWAY, r#"{"error":"boom"}"#),
            "boom"
        );
        assert_eq!(error_message(StatusCode::BAD_GATEWAY, r#"{"other":1}"#), "HTTP 502");
    }

    #[test]
    fn non_json_body_reports_status() {
        assert_eq!(
            error_message(StatusCode::INTERNAL_SERVER_ERROR, "<html>oops</html>"),
            "HTTP 500"
        );
    }
}
