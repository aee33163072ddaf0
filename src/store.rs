use chrono::{DateTime, Utc};
use tracing::debug;

use crate::record::{Dimension, JobRecord};

/// Token handed out when a load starts. Only the newest ticket may install.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct LoadTicket(u64);

/// The loaded listings, replaced wholesale on every successful load.
#[derive(Debug, Default)]
pub struct JobStore {
    records: Vec<JobRecord>,
    issued: u64,
    loaded_at: Option<DateTime<Utc>>,
}

impl JobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole collection.
    pub fn load(&mut self, records: Vec<JobRecord>) {
        self.records = records;
        self.loaded_at = Some(Utc::now());
    }

    pub fn all(&self) -> &[JobRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn loaded_at(&self) -> Option<DateTime<Utc>> {
        self.loaded_at
    }

    /// Start a load; any ticket issued earlier becomes stale.
    pub fn begin_load(&mut self) -> LoadTicket {
        self.issued += 1;
        LoadTicket(self.issued)
    }

    /// Install the result of a load unless a newer one was started since.
    /// Returns whether the records were installed.
    pub fn complete_load(&mut self, ticket: LoadTicket, records: Vec<JobRecord>) -> bool {
        if !self.is_current(ticket) {
            debug!(ticket = ticket.0, latest = self.issued, "ignoring stale load");
            return false;
        }
        self.load(records);
        true
    }

    pub fn is_current(&self, ticket: LoadTicket) -> bool {
        ticket.0 == self.issued
    }

    /// Distinct values per filter dimension over the whole collection.
    pub fn facets(&self) -> Facets {
        Facets::collect(&self.records)
    }
}

/// Options for the filter controls, in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Facets {
    pub levels: Vec<String>,
    pub types: Vec<String>,
    pub skills: Vec<String>,
}

impl Facets {
    pub fn collect(records: &[JobRecord]) -> Self {
        let mut facets = Facets::default();
        for r in records {
            for dim in Dimension::ALL {
                let values = facets.values_mut(dim);
                let v = r.field(dim);
                if !values.iter().any(|seen| seen == v) {
                    values.push(v.to_string());
                }
            }
        }
        facets
    }

    pub fn values(&self, dim: Dimension) -> &[String] {
        match dim {
            Dimension::Level => &self.levels,
            Dimension::Type => &self.types,
            Dimension::Skill => &self.skills,
        }
    }

    fn values_mut(&mut self, dim: Dimension) -> &mut Vec<String> {
        match dim {
            Dimension::Level => &mut self.levels,
            Dimension::Type => &mut self.types,
            Dimension::Skill => &mut self.skills,
        }
    }
}
