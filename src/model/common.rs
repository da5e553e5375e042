use uuid::Uuid;

pub type Id = String;

pub fn generate_id() -> Id {
    Uuid::new_v4().to_string()
}

/// Current time as an RFC 3339 string, the format every stored record uses
pub fn now_timestamp() -> String {
    chrono::Utc::now().to_rfc3339()
}

/// Trim a free-text field, mapping blank input to `None`
pub fn trimmed_optional(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
