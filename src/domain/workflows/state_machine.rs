use crate::domain::entities::job::JobPhase;
use crate::domain::entities::task::TaskKey;
use thiserror::Error;

/// Named, non-fatal reasons a lifecycle operation was refused.
/// Nothing is mutated when one is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransitionError {
    #[error("transition from {from:?} to {to:?} is not allowed")]
    Forbidden { from: JobPhase, to: JobPhase },
    #[error("job is delivered; no further transitions")]
    Terminal,
    #[error("job must be pending, found {0:?}")]
    NotPending(JobPhase),
    #[error("job must be active, found {0:?}")]
    NotActive(JobPhase),
    #[error("{remaining} task(s) are still pending")]
    UnresolvedTasks { remaining: usize },
    #[error("{count} task(s) are waiting for customer approval")]
    PendingApprovals { count: usize },
    #[error("work and quality check must both be complete")]
    FlagsIncomplete,
    #[error("task {0} is not part of this job")]
    UnknownTask(TaskKey),
    #[error("technician name is required")]
    EmptyTechnician,
}

pub struct JobStateMachine;

impl JobStateMachine {
    pub fn can_transition(from: JobPhase, to: JobPhase) -> bool {
        matches!(
            (from, to),
            (JobPhase::Pending, JobPhase::Active)
                | (JobPhase::Active, JobPhase::Active)
                | (JobPhase::Active, JobPhase::Done)
                | (JobPhase::Done, JobPhase::Active)
                | (JobPhase::Done, JobPhase::Done)
                | (JobPhase::Done, JobPhase::Delivered)
        )
    }

    pub fn transition(from: JobPhase, to: JobPhase) -> Result<JobPhase, TransitionError> {
        if Self::can_transition(from, to) {
            return Ok(to);
        }
        if from == JobPhase::Delivered {
            return Err(TransitionError::Terminal);
        }

        Err(TransitionError::Forbidden { from, to })
    }
}
