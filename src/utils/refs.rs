//! `$ref` synthesis and parsing

use serde_json::{json, Value};

/// Build the API URL of a record
pub fn record_url(server_name: &str, collection: &str, recid: u64) -> String {
    format!(
        "http://{}/api/{}/{}",
        server_name.trim_end_matches('/'),
        collection,
        recid
    )
}

/// Build a `{"$ref": ...}` object pointing at a record.
///
/// Returns `None` when `id` is not a record id.
pub fn get_record_ref(server_name: &str, collection: &str, id: &str) -> Option<Value> {
    let recid = id.trim().parse::<u64>().ok()?;
    Some(json!({ "$ref": record_url(server_name, collection, recid) }))
}

/// Extract the record id from a `{"$ref": ...}` object
pub fn get_recid_from_ref(reference: &Value) -> Option<u64> {
    reference
        .get("$ref")?
        .as_str()?
        .trim_end_matches('/')
        .rsplit('/')
        .next()?
        .parse()
        .ok()
}

/// Prefix relative URLs with the legacy base URL
pub fn absolute_url(legacy_base_url: &str, url: &str) -> String {
    if url.starts_with('/') {
        format!("{}{}", legacy_base_url.trim_end_matches('/'), url)
    } else {
        url.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_record_ref() {
        assert_eq!(
            get_record_ref("localhost:5000", "institutions", "902725"),
            Some(json!({ "$ref": "http://localhost:5000/api/institutions/902725" }))
        );
        assert_eq!(get_record_ref("localhost:5000", "data", "abc"), None);
        assert_eq!(get_record_ref("localhost:5000", "data", "-3"), None);
    }

    #[test]
    fn test_get_recid_from_ref() {
        let reference = json!({ "$ref": "http://localhost:5000/api/literature/1234" });
        assert_eq!(get_recid_from_ref(&reference), Some(1234));
        assert_eq!(get_recid_from_ref(&json!({ "$ref": "http://x/api/y/z" })), None);
        assert_eq!(get_recid_from_ref(&json!("1234")), None);
    }

    #[test]
    fn test_absolute_url() {
        assert_eq!(
            absolute_url("https://old.inspirehep.net/", "/record/1/files/a.pdf"),
            "https://old.inspirehep.net/record/1/files/a.pdf"
        );
        assert_eq!(absolute_url("https://x", "http://arxiv.org"), "http://arxiv.org");
    }
}
