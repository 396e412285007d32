use serde::Deserialize;
use serde_json::Value;

use super::parse_int_prefix;
use crate::database::models::{NewPost, PostStatus};

pub const TITLE_MAX_CHARS: usize = 100;
pub const TAGS_MAX_COUNT: usize = 10;
pub const TAG_MAX_CHARS: usize = 30;

pub const ERR_TITLE_REQUIRED: &str = "Title is required and cannot be empty";
pub const ERR_TITLE_TOO_LONG: &str = "Title must be less than 100 characters";
pub const ERR_BODY_REQUIRED: &str = "Body is required and cannot be empty";
pub const ERR_STATUS: &str = "Status must be either draft or published";
pub const ERR_TAGS_NOT_ARRAY: &str = "Tags must be an array";
pub const ERR_TAGS_TOO_MANY: &str = "Maximum 10 tags allowed";
pub const ERR_TAGS_INVALID: &str = "Tags must be non-empty strings with maximum length of 30 characters";
pub const ERR_POST_ID: &str = "Invalid post ID. Must be a positive number";

/// Create-post body as received; fields stay untyped so that a wrong type is a
/// validation message rather than a deserialization failure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreatePostPayload {
    #[serde(default)]
    pub title: Option<Value>,
    #[serde(default)]
    pub body: Option<Value>,
    #[serde(default)]
    pub tags: Option<Value>,
    #[serde(default)]
    pub status: Option<Value>,
}

fn as_text(value: &Option<Value>) -> Option<&str> {
    value.as_ref().and_then(Value::as_str)
}

/// Length in UTF-16 code units, the unit browsers and JS clients count in
fn text_len(s: &str) -> usize {
    s.encode_utf16().count()
}

fn is_valid_tag(tag: &Value) -> bool {
    match tag.as_str() {
        Some(s) => {
            let trimmed = s.trim();
            !trimmed.is_empty() && text_len(trimmed) <= TAG_MAX_CHARS
        }
        None => false,
    }
}

/// All rule violations for a create-post payload, in rule order
pub fn create_post_errors(payload: &CreatePostPayload) -> Vec<String> {
    let mut errors = Vec::new();

    let title = as_text(&payload.title);
    if title.map_or(true, |t| t.trim().is_empty()) {
        errors.push(ERR_TITLE_REQUIRED.to_string());
    }
    if title.map_or(false, |t| text_len(t) > TITLE_MAX_CHARS) {
        errors.push(ERR_TITLE_TOO_LONG.to_string());
    }

    if as_text(&payload.body).map_or(true, |b| b.trim().is_empty()) {
        errors.push(ERR_BODY_REQUIRED.to_string());
    }

    if as_text(&payload.status)
        .and_then(|s| s.parse::<PostStatus>().ok())
        .is_none()
    {
        errors.push(ERR_STATUS.to_string());
    }

    match &payload.tags {
        Some(Value::Array(tags)) => {
            if tags.len() > TAGS_MAX_COUNT {
                errors.push(ERR_TAGS_TOO_MANY.to_string());
            }
            if !tags.iter().all(is_valid_tag) {
                errors.push(ERR_TAGS_INVALID.to_string());
            }
        }
        _ => errors.push(ERR_TAGS_NOT_ARRAY.to_string()),
    }

    errors
}

/// Validate and convert in one step; tags are kept exactly as submitted
pub fn validate_create_post(payload: &CreatePostPayload) -> Result<NewPost, Vec<String>> {
    let errors = create_post_errors(payload);
    if !errors.is_empty() {
        return Err(errors);
    }

    // Every field below was checked above
    let text = |v: &Option<Value>| as_text(v).unwrap_or_default().to_string();
    let status = as_text(&payload.status)
        .and_then(|s| s.parse().ok())
        .ok_or_else(|| vec![ERR_STATUS.to_string()])?;
    let tags = match &payload.tags {
        Some(Value::Array(tags)) => tags
            .iter()
            .filter_map(|t| t.as_str().map(str::to_string))
            .collect(),
        _ => Vec::new(),
    };

    Ok(NewPost {
        title: text(&payload.title),
        body: text(&payload.body),
        tags,
        status,
    })
}

/// Parse a path id from its leading base-10 digits; must be >= 1
pub fn validate_post_id(raw: &str) -> Result<i64, String> {
    match parse_int_prefix(raw) {
        Some(id) if id >= 1 => Ok(id),
        _ => Err(ERR_POST_ID.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn payload(value: Value) -> CreatePostPayload {
        serde_json::from_value(value).unwrap()
    }

    fn valid() -> Value {
        json!({
            "title": "Hello",
            "body": "First post",
            "tags": ["rust", "web"],
            "status": "draft"
        })
    }

    #[test]
    fn valid_payload_has_no_errors() {
        let p = payload(valid());
        assert!(create_post_errors(&p).is_empty());

        let post = validate_create_post(&p).unwrap();
        assert_eq!(post.title, "Hello");
        assert_eq!(post.tags, vec!["rust".to_string(), "web".to_string()]);
        assert_eq!(post.status, PostStatus::Draft);
    }

    #[test]
    fn empty_payload_collects_every_error() {
        let errors = create_post_errors(&payload(json!({})));
        assert_eq!(
            errors,
            vec![ERR_TITLE_REQUIRED, ERR_BODY_REQUIRED, ERR_STATUS, ERR_TAGS_NOT_ARRAY]
        );
    }

    #[test]
    fn missing_required_fields_are_reported() {
        for field in ["title", "body", "status"] {
            let mut v = valid();
            v.as_object_mut().unwrap().remove(field);
            let errors = create_post_errors(&payload(v));
            assert_eq!(errors.len(), 1, "removing {field} gave {errors:?}");
        }
    }

    #[test]
    fn blank_and_non_string_fields_are_required_errors() {
        let mut v = valid();
        v["title"] = json!("   ");
        v["body"] = json!(42);
        let errors = create_post_errors(&payload(v));
        assert_eq!(errors, vec![ERR_TITLE_REQUIRED, ERR_BODY_REQUIRED]);
    }

    #[test]
    fn title_length_is_limited() {
        let mut v = valid();
        v["title"] = json!("x".repeat(100));
        assert!(create_post_errors(&payload(v.clone())).is_empty());

        v["title"] = json!("x".repeat(101));
        assert_eq!(create_post_errors(&payload(v)), vec![ERR_TITLE_TOO_LONG]);
    }

    #[test]
    fn status_must_match_exactly() {
        for status in [json!("Published"), json!("archived"), json!(1), json!(null)] {
            let mut v = valid();
            v["status"] = status;
            assert_eq!(create_post_errors(&payload(v)), vec![ERR_STATUS]);
        }
    }

    #[test]
    fn non_array_tags_skip_element_checks() {
        let mut v = valid();
        v["tags"] = json!("rust,web");
        assert_eq!(create_post_errors(&payload(v)), vec![ERR_TAGS_NOT_ARRAY]);
    }

    #[test]
    fn bad_tag_elements_yield_one_error() {
        let mut v = valid();
        v["tags"] = json!(["", "  ", 7, "y".repeat(31)]);
        assert_eq!(create_post_errors(&payload(v)), vec![ERR_TAGS_INVALID]);
    }

    #[test]
    fn tags_are_measured_after_trimming() {
        let mut v = valid();
        v["tags"] = json!([format!("  {}  ", "z".repeat(30))]);
        assert!(create_post_errors(&payload(v)).is_empty());
    }

    #[test]
    fn too_many_tags() {
        let mut v = valid();
        v["tags"] = json!((0..11).map(|i| format!("t{i}")).collect::<Vec<_>>());
        assert_eq!(create_post_errors(&payload(v.clone())), vec![ERR_TAGS_TOO_MANY]);

        v["tags"] = json!((0..10).map(|i| format!("t{i}")).collect::<Vec<_>>());
        assert!(create_post_errors(&payload(v)).is_empty());
    }

    #[test]
    fn too_many_and_invalid_tags_both_reported() {
        let mut v = valid();
        let mut tags: Vec<Value> = (0..11).map(|i| json!(format!("t{i}"))).collect();
        tags.push(json!(""));
        v["tags"] = Value::Array(tags);
        assert_eq!(
            create_post_errors(&payload(v)),
            vec![ERR_TAGS_TOO_MANY, ERR_TAGS_INVALID]
        );
    }

    #[test]
    fn tag_order_is_preserved() {
        let mut v = valid();
        v["tags"] = json!(["b", "a", "c"]);
        let post = validate_create_post(&payload(v)).unwrap();
        assert_eq!(post.tags, vec!["b", "a", "c"]);
    }

    #[test]
    fn post_id_rules() {
        assert_eq!(validate_post_id("17"), Ok(17));
        assert_eq!(validate_post_id("0"), Err(ERR_POST_ID.to_string()));
        assert_eq!(validate_post_id("-4"), Err(ERR_POST_ID.to_string()));
        assert_eq!(validate_post_id("abc"), Err(ERR_POST_ID.to_string()));
        assert_eq!(validate_post_id(""), Err(ERR_POST_ID.to_string()));
        assert_eq!(validate_post_id("3abc"), Ok(3));
        assert_eq!(validate_post_id("0x10"), Err(ERR_POST_ID.to_string()));
    }

    #[test]
    fn lengths_count_utf16_units() {
        let mut v = valid();
        v["tags"] = json!(["\u{1F980}".repeat(15)]);
        assert!(create_post_errors(&payload(v.clone())).is_empty());

        v["tags"] = json!(["\u{1F980}".repeat(20)]);
        assert_eq!(create_post_errors(&payload(v.clone())), vec![ERR_TAGS_INVALID]);

        v["tags"] = json!(["rust"]);
        v["title"] = json!("\u{1F980}".repeat(51));
        assert_eq!(create_post_errors(&payload(v)), vec![ERR_TITLE_TOO_LONG]);
    }
}
