use memchr::memchr_iter;
use serde::{Deserialize, Serialize};

pub const DEFAULT_ID: &str = "N/A";
pub const DEFAULT_TITLE: &str = "Unknown";
pub const DEFAULT_LINK: &str = "#";
pub const DEFAULT_LABEL: &str = "Unknown";
pub const DEFAULT_DESCRIPTION: &str = "No details available";

/// One job listing with every field resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobRecord {
    pub id: String,
    pub title: String,
    pub detail_page_url: String,
    pub posted_minutes: u64,
    pub employment_type: String,
    pub experience_level: String,
    pub estimated_duration: String,
    pub skill_tag: String,
    pub description: String,
}

impl Default for JobRecord {
    fn default() -> Self {
        Self {
            id: DEFAULT_ID.to_string(),
            title: DEFAULT_TITLE.to_string(),
            detail_page_url: DEFAULT_LINK.to_string(),
            posted_minutes: 0,
            employment_type: DEFAULT_LABEL.to_string(),
            experience_level: DEFAULT_LABEL.to_string(),
            estimated_duration: DEFAULT_LABEL.to_string(),
            skill_tag: DEFAULT_LABEL.to_string(),
            description: DEFAULT_DESCRIPTION.to_string(),
        }
    }
}

impl JobRecord {
    pub fn field(&self, dim: Dimension) -> &str {
        match dim {
            Dimension::Level => &self.experience_level,
            Dimension::Type => &self.employment_type,
            Dimension::Skill => &self.skill_tag,
        }
    }

    /// Description split on line breaks, `\r\n` included. Blank lines are kept.
    pub fn description_lines(&self) -> Vec<&str> {
        let text = self.description.as_str();
        let mut lines = Vec::new();
        let mut start = 0usize;
        for nl in memchr_iter(b'\n', text.as_bytes()) {
            lines.push(trim_cr(&text[start..nl]));
            start = nl + 1;
        }
        lines.push(trim_cr(&text[start..]));
        lines
    }
}

fn trim_cr(line: &str) -> &str {
    line.strip_suffix('\r').unwrap_or(line)
}

/// A record field the user can constrain with an equality filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dimension {
    Level,
    Type,
    Skill,
}

impl Dimension {
    pub const ALL: [Dimension; 3] = [Dimension::Level, Dimension::Type, Dimension::Skill];

    /// Control name used by the interactive front end.
    pub fn name(self) -> &'static str {
        match self {
            Dimension::Level => "level",
            Dimension::Type => "type",
            Dimension::Skill => "skill",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|d| d.name() == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_all_sentinels() {
        let r = JobRecord::default();
        assert_eq!(r.id, "N/A");
        assert_eq!(r.title, "Unknown");
        assert_eq!(r.detail_page_url, "#");
        assert_eq!(r.posted_minutes, 0);
        assert_eq!(r.description, "No details available");
        for dim in Dimension::ALL {
            assert_eq!(r.field(dim), "Unknown");
        }
    }

    #[test]
    fn description_keeps_blank_lines() {
        let r = JobRecord {
            description: "Line one\r\n\nLine three".into(),
            ..Default::default()
        };
        assert_eq!(r.description_lines(), vec!["Line one", "", "Line three"]);
        assert_eq!(JobRecord::default().description_lines(), vec!["No details available"]);
    }

    #[test]
    fn dimension_names_round_trip() {
        for dim in Dimension::ALL {
            assert_eq!(Dimension::from_name(dim.name()), Some(dim));
        }
        assert_eq!(Dimension::from_name("sortBy"), None);
    }

    #[test]
    fn serializes_camel_case() {
        let v = serde_json::to_value(JobRecord::default()).unwrap();
        assert_eq!(v["postedMinutes"], 0);
        assert_eq!(v["detailPageUrl"], "#");
    }
}
