use serde_json::{Map, Value};

use crate::posted::parse_minutes;
use crate::record::{
    DEFAULT_DESCRIPTION, DEFAULT_ID, DEFAULT_LABEL, DEFAULT_LINK, DEFAULT_TITLE, JobRecord,
};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Below this many records the thread pool costs more than it saves.
#[cfg(feature = "parallel")]
const PARALLEL_MIN_RECORDS: usize = 4096;

// source keys in the listing export
const KEY_ID: &str = "Job No";
const KEY_TITLE: &str = "Title";
const KEY_LINK: &str = "Job Page Link";
const KEY_POSTED: &str = "Posted";
const KEY_TYPE: &str = "Type";
const KEY_LEVEL: &str = "Level";
const KEY_ESTIMATE: &str = "Estimated Time";
const KEY_SKILL: &str = "Skill";
const KEY_DETAIL: &str = "Detail";

/// Build a record from one raw listing. Never fails: each missing or falsy
/// key falls back to its own default. Non-object values give the
/// all-defaults record.
pub fn normalize(raw: &Value) -> JobRecord {
    match raw.as_object() {
        Some(obj) => normalize_object(obj),
        None => JobRecord::default(),
    }
}

pub fn normalize_object(obj: &Map<String, Value>) -> JobRecord {
    let text = |key: &str, default: &str| {
        truthy_text(obj.get(key)).unwrap_or_else(|| default.to_string())
    };

    let posted_minutes = truthy_text(obj.get(KEY_POSTED))
        .and_then(|p| parse_minutes(&p))
        .unwrap_or(0);

    JobRecord {
        id: text(KEY_ID, DEFAULT_ID),
        title: text(KEY_TITLE, DEFAULT_TITLE),
        detail_page_url: text(KEY_LINK, DEFAULT_LINK),
        posted_minutes,
        employment_type: text(KEY_TYPE, DEFAULT_LABEL),
        experience_level: text(KEY_LEVEL, DEFAULT_LABEL),
        estimated_duration: text(KEY_ESTIMATE, DEFAULT_LABEL),
        skill_tag: text(KEY_SKILL, DEFAULT_LABEL),
        description: text(KEY_DETAIL, DEFAULT_DESCRIPTION),
    }
}

/// Normalize every listing, keeping input order.
pub fn normalize_all(items: &[Value]) -> Vec<JobRecord> {
    #[cfg(feature = "parallel")]
    {
        if items.len() >= PARALLEL_MIN_RECORDS {
            return items.par_iter().map(normalize).collect();
        }
    }

    items.iter().map(normalize).collect()
}

/// Text of a value, or `None` when it is absent or falsy
/// (`null`, `false`, `0`, `""`).
fn truthy_text(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::Null | Value::Bool(false) => None,
        Value::Bool(true) => Some("true".to_string()),
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) if n.as_f64() == Some(0.0) => None,
        Value::Number(n) => Some(n.to_string()),
        other @ (Value::Array(_) | Value::Object(_)) => Some(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn empty_object_is_all_defaults() {
        assert_eq!(normalize(&json!({})), JobRecord::default());
    }

    #[test]
    fn full_object() {
        let r = normalize(&json!({
            "Job No": "J-17",
            "Title": "Rust Developer",
            "Job Page Link": "https://jobs.example/17",
            "Posted": "2 hours ago",
            "Type": "Hourly",
            "Level": "Expert",
            "Estimated Time": "1 to 3 months",
            "Skill": "Rust",
            "Detail": "Build things.\nTest things."
        }));
        assert_eq!(r.id, "J-17");
        assert_eq!(r.title, "Rust Developer");
        assert_eq!(r.detail_page_url, "https://jobs.example/17");
        assert_eq!(r.posted_minutes, 120);
        assert_eq!(r.employment_type, "Hourly");
        assert_eq!(r.experience_level, "Expert");
        assert_eq!(r.estimated_duration, "1 to 3 months");
        assert_eq!(r.skill_tag, "Rust");
        assert_eq!(r.description, "Build things.\nTest things.");
    }

    #[test]
    fn missing_field_defaults_only_that_field() {
        let r = normalize(&json!({"Title": "Dev", "Skill": "Go"}));
        assert_eq!(
            r,
            JobRecord {
                title: "Dev".into(),
                skill_tag: "Go".into(),
                ..Default::default()
            }
        );
    }

    #[test]
    fn falsy_values_count_as_missing() {
        let r = normalize(&json!({
            "Job No": 0,
            "Title": "",
            "Job Page Link": null,
            "Type": false,
            "Detail": ""
        }));
        assert_eq!(r, JobRecord::default());
    }

    #[test]
    fn truthy_non_strings_are_coerced() {
        let r = normalize(&json!({"Job No": 1234, "Level": true, "Skill": ["a", "b"]}));
        assert_eq!(r.id, "1234");
        assert_eq!(r.experience_level, "true");
        assert_eq!(r.skill_tag, r#"["a","b"]"#);
    }

    #[test]
    fn unparseable_posted_defaults_to_zero() {
        assert_eq!(normalize(&json!({"Posted": "yesterday"})).posted_minutes, 0);
        assert_eq!(normalize(&json!({"Posted": 15})).posted_minutes, 0);
        assert_eq!(normalize(&json!({"Posted": "7 fortnights"})).posted_minutes, 7);
    }

    #[test]
    fn non_object_is_all_defaults() {
        assert_eq!(normalize(&json!(42)), JobRecord::default());
        assert_eq!(normalize(&json!(null)), JobRecord::default());
        assert_eq!(normalize(&json!(["Title"])), JobRecord::default());
    }

    #[test]
    fn normalize_all_keeps_order() {
        let items = vec![json!({"Title": "b"}), json!({}), json!({"Title": "a"})];
        let titles: Vec<_> = normalize_all(&items).into_iter().map(|r| r.title).collect();
        assert_eq!(titles, vec!["b", "Unknown", "a"]);
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn parallel_path_keeps_order() {
        let n = PARALLEL_MIN_RECORDS + 37;
        let items: Vec<Value> = (0..n)
            .map(|i| json!({"Job No": i + 1, "Title": format!("t{i}"), "Posted": format!("{i} minutes ago")}))
            .collect();

        let records = normalize_all(&items);
        assert_eq!(records.len(), n);
        for (i, r) in records.iter().enumerate() {
            assert_eq!(r.id, (i + 1).to_string());
            assert_eq!(r.title, format!("t{i}"));
            assert_eq!(r.posted_minutes, i as u64);
        }
    }
}
