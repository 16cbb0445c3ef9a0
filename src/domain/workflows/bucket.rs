use crate::domain::entities::job::{Job, JobPhase, JobStatus};
use serde::{Deserialize, Serialize};

/// Tab grouping of the working set. Delivered jobs belong to none and surface only in the archive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Bucket {
    Pending,
    Active,
    Done,
}

impl Bucket {
    pub fn of_phase(phase: JobPhase) -> Option<Self> {
        match phase {
            JobPhase::Pending => Some(Bucket::Pending),
            JobPhase::Active => Some(Bucket::Active),
            JobPhase::Done => Some(Bucket::Done),
            JobPhase::Delivered => None,
        }
    }

    pub fn of_status(status: &JobStatus) -> Option<Self> {
        Self::of_phase(status.phase())
    }

    pub fn of(job: &Job) -> Option<Self> {
        Self::of_status(&job.status)
    }

    /// Bucket for a raw status string in either vocabulary. Unknown strings belong nowhere.
    pub fn classify(raw_status: &str) -> Option<Self> {
        JobPhase::parse(raw_status).and_then(Self::of_phase)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Bucket::Pending => "pending",
            Bucket::Active => "active",
            Bucket::Done => "done",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "pending" => Some(Bucket::Pending),
            "active" => Some(Bucket::Active),
            "done" => Some(Bucket::Done),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_raw_statuses_when_classified_should_map_to_buckets() {
        assert_eq!(Bucket::classify("waiting"), Some(Bucket::Pending));
        assert_eq!(Bucket::classify("Pending"), Some(Bucket::Pending));
        assert_eq!(Bucket::classify("in_progress"), Some(Bucket::Active));
        assert_eq!(Bucket::classify("Urgent"), Some(Bucket::Active));
        assert_eq!(Bucket::classify("Progress"), Some(Bucket::Active));
        assert_eq!(Bucket::classify("completed"), Some(Bucket::Done));
        assert_eq!(Bucket::classify("Done"), Some(Bucket::Done));
    }

    #[test]
    fn given_delivered_when_classified_should_belong_to_no_bucket() {
        assert_eq!(Bucket::classify("delivered"), None);
        assert_eq!(Bucket::of_status(&JobStatus::Delivered), None);
    }

    #[test]
    fn given_active_with_flags_when_bucketed_should_stay_active() {
        let status = JobStatus::Active {
            work_completed: true,
            quality_check_completed: false,
        };
        assert_eq!(Bucket::of_status(&status), Some(Bucket::Active));
    }
}
