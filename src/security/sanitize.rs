use serde_json::Value;

/// Tokens deleted by [`sanitize`], applied in this order.
pub const DENYLIST: [&str; 7] = ["<", ">", "\"", "'", "&", "script", "javascript"];

/// Deletes every occurrence of each denylisted token, one token at a time.
///
/// This is plain substring removal, not escaping. Matching is case-sensitive,
/// yet it still mangles legitimate text: the lowercase "script" inside
/// "Javascript" is removed, leaving "Java". It is no substitute for encoding
/// output in context. Kept as-is because stored records already went through it.
pub fn sanitize(value: &str) -> String {
    let mut cleaned = value.to_string();
    for token in DENYLIST {
        cleaned = cleaned.replace(token, "");
    }
    cleaned
}

/// Runs [`sanitize`] over the named string fields of a JSON object.
/// Non-string fields, missing fields and non-object values are left alone.
pub fn sanitize_fields(value: &mut Value, fields: &[&str]) {
    let Some(object) = value.as_object_mut() else {
        return;
    };

    for field in fields {
        if let Some(Value::String(text)) = object.get_mut(*field) {
            *text = sanitize(text);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn strips_script_tag() {
        let cleaned = sanitize("<script>alert('x')</script>");
        assert_eq!(cleaned, "alert(x)/");
        for token in DENYLIST {
            assert!(!cleaned.contains(token), "{token} survived in {cleaned}");
        }
    }

    #[test]
    fn removes_rather_than_escapes() {
        assert_eq!(sanitize("Tom & Jerry"), "Tom  Jerry");
        assert_eq!(sanitize("O'Brien"), "OBrien");
        assert_eq!(sanitize("say \"hi\""), "say hi");
    }

    #[test]
    fn keyword_removal_is_case_sensitive() {
        assert_eq!(sanitize("javascript"), "java");
        assert_eq!(sanitize("Javascript"), "Java");
        assert_eq!(sanitize("SCRIPT"), "SCRIPT");
    }

    #[test]
    fn plain_text_is_untouched() {
        assert_eq!(sanitize("Jane Student"), "Jane Student");
        assert_eq!(sanitize(""), "");
    }

    #[test]
    fn sanitize_fields_only_touches_named_strings() {
        let mut value = json!({
            "first_name": "<b>Jane</b>",
            "email": "jane&co@college.com",
            "age": 20,
        });
        sanitize_fields(&mut value, &["first_name", "age", "missing"]);

        assert_eq!(value["first_name"], "bJane/b");
        assert_eq!(value["email"], "jane&co@college.com");
        assert_eq!(value["age"], 20);
    }
}
