use serde::Serialize;
use serde_json::Value;

const REDACTED: &str = "<redacted>";
const SECRET_KEYS: [&str; 2] = ["password", "password_hash"];

/// Runs `log_action` with a pretty JSON rendering of `value`, only when DEBUG is enabled.
/// Secret fields (`password`, `password_hash`) are masked at any depth.
pub(crate) fn with_pretty_json_debug<T, F>(value: &T, log_action: F)
where
    T: Serialize,
    F: FnOnce(&str),
{
    if !tracing::enabled!(tracing::Level::DEBUG) {
        return;
    }

    let pretty_json = pretty_redacted(value);
    log_action(pretty_json.as_str());
}

fn pretty_redacted<T: Serialize>(value: &T) -> String {
    let mut json = match serde_json::to_value(value) {
        Ok(json) => json,
        Err(error) => return format!("<pretty serialize failed: {error}>"),
    };
    redact(&mut json);
    serde_json::to_string_pretty(&json)
        .unwrap_or_else(|error| format!("<pretty serialize failed: {error}>"))
}

fn redact(json: &mut Value) {
    match json {
        Value::Object(map) => {
            for (key, field) in map.iter_mut() {
                if SECRET_KEYS.contains(&key.as_str()) {
                    *field = Value::String(REDACTED.to_string());
                } else {
                    redact(field);
                }
            }
        }
        Value::Array(items) => items.iter_mut().for_each(redact),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use swatchbook_schema::SignupRequest;

    #[test]
    fn masks_passwords() {
        let req = SignupRequest {
            username: "ada".to_string(),
            email: "ada@example.com".to_string(),
            password: "hunter22".to_string(),
        };
        let out = pretty_redacted(&req);
        assert!(out.contains("ada@example.com"));
        assert!(out.contains(REDACTED));
        assert!(!out.contains("hunter22"));
    }
}
