use coursehub_shared::db::{self, DBConnection};
use coursehub_shared::models::NewCourse;

use crate::source::{Batch, CourseRecord};

/// How many malformed-record identifiers a report keeps for display.
const MALFORMED_SAMPLES: usize = 5;

#[derive(PartialEq, Clone, Copy, Debug)]
pub enum Mode {
    /// Insert records whose code is new; never touch existing rows.
    Merge,
    /// Atomically swap the whole catalog for this batch.
    Replace,
}

#[derive(PartialEq, Debug, Default)]
pub struct Report {
    pub inserted: usize,
    pub skipped_existing: usize,
    pub skipped_duplicate: usize,
    pub skipped_malformed: usize,
    pub malformed_samples: Vec<String>,
}

impl Report {
    pub fn summary(&self) -> String {
        let mut s = format!(
            "added {} courses, {} already present",
            self.inserted, self.skipped_existing
        );
        if self.skipped_duplicate > 0 {
            s.push_str(&format!(
                ", {} duplicate codes in batch",
                self.skipped_duplicate
            ));
        }
        if self.skipped_malformed > 0 {
            s.push_str(&format!(
                ", {} malformed records skipped (first: {})",
                self.skipped_malformed,
                self.malformed_samples.join(", ")
            ));
        }
        s
    }
}

/// Bring the persisted catalog into agreement with a fetched batch. All
/// writes for one run happen inside a single transaction on the shared
/// connection; a failure leaves the prior catalog intact.
pub fn reconcile(db: &mut DBConnection, batch: Batch, mode: Mode) -> db::Result<Report> {
    let rows = batch.records.iter().map(to_row).collect::<Vec<_>>();

    let stats = match mode {
        Mode::Merge => db.merge_courses(&rows)?,
        Mode::Replace => db.replace_courses(&rows)?,
    };

    if !batch.skipped.is_empty() {
        let sample = batch
            .skipped
            .iter()
            .take(MALFORMED_SAMPLES)
            .cloned()
            .collect::<Vec<_>>();
        log::warn!(
            "catalog: {} malformed records skipped this run (first: {})",
            batch.skipped.len(),
            sample.join(", ")
        );
    }

    Ok(Report {
        inserted: stats.inserted,
        skipped_existing: stats.skipped_existing,
        skipped_duplicate: stats.skipped_duplicate,
        skipped_malformed: batch.skipped.len(),
        malformed_samples: batch
            .skipped
            .into_iter()
            .take(MALFORMED_SAMPLES)
            .collect(),
    })
}

fn to_row(record: &CourseRecord) -> NewCourse {
    NewCourse {
        course_code: record.code.clone(),
        title: record.title.clone(),
        description: record.description.clone(),
        subjects: record.subjects.join(", "),
        prerequisites: record.prerequisites.clone(),
        external_ref: record.external_ref.clone(),
    }
}
