use icu_collator::{Collator, CollatorOptions, Strength};
use std::cmp::Ordering;
use std::fmt;
use tracing::warn;

use crate::record::{Dimension, JobRecord};

/// Ordering applied after filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    TitleAscending,
    TitleDescending,
    /// Descending by posted minutes.
    PostedNewestFirst,
    /// Ascending by posted minutes.
    PostedOldestFirst,
    /// Keep filtered order.
    #[default]
    Unsorted,
}

impl SortKey {
    /// Accepts the control values (`titleAsc`, `timeDesc`, ...) as well as
    /// the long names. Anything else keeps the filtered order.
    pub fn from_name(name: &str) -> Self {
        match name.trim() {
            "titleAsc" | "titleAscending" => SortKey::TitleAscending,
            "titleDesc" | "titleDescending" => SortKey::TitleDescending,
            "timeAsc" | "postedNewestFirst" => SortKey::PostedNewestFirst,
            "timeDesc" | "postedOldestFirst" => SortKey::PostedOldestFirst,
            _ => SortKey::Unsorted,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            SortKey::TitleAscending => "titleAscending",
            SortKey::TitleDescending => "titleDescending",
            SortKey::PostedNewestFirst => "postedNewestFirst",
            SortKey::PostedOldestFirst => "postedOldestFirst",
            SortKey::Unsorted => "",
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Equality constraints per dimension; an empty value means "All".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filters {
    pub level: String,
    pub kind: String,
    pub skill: String,
}

impl Filters {
    pub fn get(&self, dim: Dimension) -> &str {
        match dim {
            Dimension::Level => &self.level,
            Dimension::Type => &self.kind,
            Dimension::Skill => &self.skill,
        }
    }

    pub fn set(&mut self, dim: Dimension, value: impl Into<String>) {
        let slot = match dim {
            Dimension::Level => &mut self.level,
            Dimension::Type => &mut self.kind,
            Dimension::Skill => &mut self.skill,
        };
        *slot = value.into();
    }

    pub fn with(mut self, dim: Dimension, value: impl Into<String>) -> Self {
        self.set(dim, value);
        self
    }

    pub fn matches(&self, record: &JobRecord) -> bool {
        Dimension::ALL.into_iter().all(|dim| {
            let want = self.get(dim);
            want.is_empty() || record.field(dim) == want
        })
    }
}

/// Current filter and sort choice of the user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    pub filters: Filters,
    pub sort: SortKey,
}

/// Select and order records. The input is only borrowed; the result holds
/// references into it. Equal elements keep their input order.
pub fn evaluate<'a>(
    records: &'a [JobRecord],
    filters: &Filters,
    sort: SortKey,
) -> Vec<&'a JobRecord> {
    select_indices(records, filters, sort)
        .into_iter()
        .map(|i| &records[i])
        .collect()
}

/// Same as [`evaluate`], as positions into `records`.
pub fn select_indices(records: &[JobRecord], filters: &Filters, sort: SortKey) -> Vec<usize> {
    let mut out: Vec<usize> = (0..records.len())
        .filter(|&i| filters.matches(&records[i]))
        .collect();
    let title = |i: usize| records[i].title.as_str();
    let minutes = |i: usize| records[i].posted_minutes;

    // slice::sort_by is stable
    match sort {
        SortKey::TitleAscending => out.sort_by(|&a, &b| locale_cmp(title(a), title(b))),
        SortKey::TitleDescending => out.sort_by(|&a, &b| locale_cmp(title(b), title(a))),
        SortKey::PostedNewestFirst => out.sort_by(|&a, &b| minutes(b).cmp(&minutes(a))),
        SortKey::PostedOldestFirst => out.sort_by(|&a, &b| minutes(a).cmp(&minutes(b))),
        SortKey::Unsorted => {}
    }
    out
}

thread_local! {
    // root locale, tertiary strength: base letters, then accents, then case
    static TITLE_COLLATOR: Option<Collator> = {
        let mut options = CollatorOptions::new();
        options.strength = Some(Strength::Tertiary);
        match Collator::try_new(&Default::default(), options) {
            Ok(collator) => Some(collator),
            Err(err) => {
                warn!(error = %err, "no collation data, titles sort case-insensitively");
                None
            }
        }
    };
}

/// Locale-aware title comparison: `É` sorts next to `E`, and lowercase
/// before uppercase for strings that differ only in case.
pub fn locale_cmp(a: &str, b: &str) -> Ordering {
    TITLE_COLLATOR.with(|collator| match collator {
        Some(c) => c.compare(a, b),
        None => fold_cmp(a, b),
    })
}

fn fold_cmp(a: &str, b: &str) -> Ordering {
    let fold = |s: &str| s.chars().flat_map(char::to_lowercase).collect::<Vec<_>>();
    fold(a).cmp(&fold(b)).then_with(|| b.cmp(a))
}
