use chrono::{DateTime, Utc};
use std::path::Path;
use uuid::Uuid;

const KEY_PREFIX: &str = "products";
const FALLBACK_EXTENSION: &str = "bin";

/// Build the object key for an uploaded product image:
/// `products/<unix-millis>-<random>.<extension>`
pub fn object_key(file_name: &str, now: DateTime<Utc>) -> String {
    let suffix = Uuid::new_v4().simple().to_string();
    format!(
        "{}/{}-{}.{}",
        KEY_PREFIX,
        now.timestamp_millis(),
        &suffix[..8],
        extension_of(file_name)
    )
}

fn extension_of(file_name: &str) -> String {
    Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .filter(|ext| !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()))
        .map(|ext| ext.to_ascii_lowercase())
        .unwrap_or_else(|| FALLBACK_EXTENSION.to_string())
}
