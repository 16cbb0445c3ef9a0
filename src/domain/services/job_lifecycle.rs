use crate::domain::entities::job::{Job, JobPhase, JobStatus};
use crate::domain::entities::task::{TaskKey, TaskStatus};
use crate::domain::workflows::checklist::ChecklistTracker;
use crate::domain::workflows::state_machine::{JobStateMachine, TransitionError};

/// A lifecycle operation requested against one job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobCommand {
    Assign { technician: String },
    ToggleTask(TaskKey),
    SetTaskStatus(TaskKey, TaskStatus),
    MarkWorkComplete,
    MarkQualityCheck,
    MarkDone,
    MarkDelivered,
}

impl JobCommand {
    /// Stable label for logs and metrics.
    pub fn name(&self) -> &'static str {
        match self {
            JobCommand::Assign { .. } => "assign",
            JobCommand::ToggleTask(_) => "toggle_task",
            JobCommand::SetTaskStatus(..) => "set_task_status",
            JobCommand::MarkWorkComplete => "mark_work_complete",
            JobCommand::MarkQualityCheck => "mark_quality_check",
            JobCommand::MarkDone => "mark_done",
            JobCommand::MarkDelivered => "mark_delivered",
        }
    }
}

/// Outcome of an accepted operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub from: JobStatus,
    pub to: JobStatus,
    /// True when the operation rolled on into `Done` (or through it) by itself.
    pub cascaded: bool,
}

fn both_flags(status: JobStatus) -> bool {
    matches!(
        status,
        JobStatus::Active {
            work_completed: true,
            quality_check_completed: true,
        }
    )
}

fn done_status(status: JobStatus) -> Result<JobStatus, TransitionError> {
    match status {
        JobStatus::Done => Ok(JobStatus::Done),
        s if both_flags(s) => Ok(JobStatus::Done),
        JobStatus::Active { .. } => Err(TransitionError::FlagsIncomplete),
        JobStatus::Pending => Err(TransitionError::NotActive(JobPhase::Pending)),
        JobStatus::Delivered => Err(TransitionError::Terminal),
    }
}

/// Validate `from -> next`, roll on to `Done` when both flags hold, then commit once.
fn settle(job: &mut Job, next: JobStatus) -> Result<Transition, TransitionError> {
    let from = job.status;
    JobStateMachine::transition(from.phase(), next.phase())?;

    let (target, cascaded) = if both_flags(next) {
        let done = done_status(next)?;
        JobStateMachine::transition(next.phase(), done.phase())?;
        (done, true)
    } else {
        (next, false)
    };

    job.status = target;
    job.touch();
    Ok(Transition {
        from,
        to: target,
        cascaded,
    })
}

fn ensure_task_editable(job: &Job, key: &TaskKey) -> Result<TaskKey, TransitionError> {
    if job.status == JobStatus::Delivered {
        return Err(TransitionError::Terminal);
    }
    job.resolve_task(key)
        .ok_or_else(|| TransitionError::UnknownTask(key.clone()))
}

// Job lifecycle rules: which operations are legal from which status, and what they change.
// Every operation validates fully before touching the job.
pub trait JobLifecycleService: Send + Sync {
    fn assign_and_activate(
        &self,
        job: &mut Job,
        technician: &str,
    ) -> Result<Transition, TransitionError> {
        // Step 1: Validate the technician and the current status.
        let technician = technician.trim();
        if technician.is_empty() {
            return Err(TransitionError::EmptyTechnician);
        }
        match job.status {
            JobStatus::Pending => {}
            JobStatus::Delivered => return Err(TransitionError::Terminal),
            other => return Err(TransitionError::NotPending(other.phase())),
        }

        // Step 2: Activate with cleared flags and record the assignment.
        let transition = settle(job, JobStatus::ACTIVE)?;
        job.assigned_technician = Some(technician.to_string());
        Ok(transition)
    }

    fn toggle_task_complete(
        &self,
        job: &mut Job,
        task: &TaskKey,
    ) -> Result<Transition, TransitionError> {
        let key = ensure_task_editable(job, task)?;
        let next = match job.tasks.status_of(&key) {
            TaskStatus::Complete => TaskStatus::Pending,
            _ => TaskStatus::Complete,
        };
        job.tasks.set(key, next);
        job.touch();
        Ok(Transition {
            from: job.status,
            to: job.status,
            cascaded: false,
        })
    }

    fn set_task_status(
        &self,
        job: &mut Job,
        task: &TaskKey,
        status: TaskStatus,
    ) -> Result<Transition, TransitionError> {
        let key = ensure_task_editable(job, task)?;
        job.tasks.set(key, status);
        job.touch();
        Ok(Transition {
            from: job.status,
            to: job.status,
            cascaded: false,
        })
    }

    fn mark_work_complete(&self, job: &mut Job) -> Result<Transition, TransitionError> {
        // Step 1: Work out the toggled status; the checklist gates only switching the flag on.
        let next = match job.status {
            JobStatus::Pending => return Err(TransitionError::NotActive(JobPhase::Pending)),
            JobStatus::Delivered => return Err(TransitionError::Terminal),
            JobStatus::Active {
                work_completed: false,
                quality_check_completed,
            } => {
                let count = ChecklistTracker::approval_count(job);
                if count > 0 {
                    return Err(TransitionError::PendingApprovals { count });
                }
                let remaining = ChecklistTracker::unresolved_count(job);
                if remaining > 0 {
                    return Err(TransitionError::UnresolvedTasks { remaining });
                }
                JobStatus::Active {
                    work_completed: true,
                    quality_check_completed,
                }
            }
            JobStatus::Active {
                work_completed: true,
                quality_check_completed,
            } => JobStatus::Active {
                work_completed: false,
                quality_check_completed,
            },
            JobStatus::Done => JobStatus::Active {
                work_completed: false,
                quality_check_completed: true,
            },
        };

        // Step 2: Commit, cascading into Done when quality check already passed.
        settle(job, next)
    }

    fn mark_quality_check(&self, job: &mut Job) -> Result<Transition, TransitionError> {
        let next = match job.status {
            JobStatus::Pending => return Err(TransitionError::NotActive(JobPhase::Pending)),
            JobStatus::Delivered => return Err(TransitionError::Terminal),
            JobStatus::Active {
                work_completed,
                quality_check_completed,
            } => JobStatus::Active {
                work_completed,
                quality_check_completed: !quality_check_completed,
            },
            JobStatus::Done => JobStatus::Active {
                work_completed: true,
                quality_check_completed: false,
            },
        };

        settle(job, next)
    }

    fn mark_done(&self, job: &mut Job) -> Result<Transition, TransitionError> {
        let from = job.status;
        let next = done_status(from)?;
        JobStateMachine::transition(from.phase(), next.phase())?;
        job.status = next;
        job.touch();
        Ok(Transition {
            from,
            to: next,
            cascaded: false,
        })
    }

    fn mark_delivered(&self, job: &mut Job) -> Result<Transition, TransitionError> {
        // Step 1: Both completion flags must hold.
        let from = job.status;
        if from == JobStatus::Delivered {
            return Err(TransitionError::Terminal);
        }
        if !(from.work_completed() && from.quality_check_completed()) {
            return Err(TransitionError::FlagsIncomplete);
        }

        // Step 2: Pass through Done if the cascade never ran, then deliver.
        let done = done_status(from)?;
        JobStateMachine::transition(from.phase(), done.phase())?;
        JobStateMachine::transition(done.phase(), JobPhase::Delivered)?;
        job.status = JobStatus::Delivered;
        job.touch();
        Ok(Transition {
            from,
            to: JobStatus::Delivered,
            cascaded: from != JobStatus::Done,
        })
    }

    fn apply(&self, job: &mut Job, command: &JobCommand) -> Result<Transition, TransitionError> {
        match command {
            JobCommand::Assign { technician } => self.assign_and_activate(job, technician),
            JobCommand::ToggleTask(key) => self.toggle_task_complete(job, key),
            JobCommand::SetTaskStatus(key, status) => self.set_task_status(job, key, *status),
            JobCommand::MarkWorkComplete => self.mark_work_complete(job),
            JobCommand::MarkQualityCheck => self.mark_quality_check(job),
            JobCommand::MarkDone => self.mark_done(job),
            JobCommand::MarkDelivered => self.mark_delivered(job),
        }
    }
}

/// Default rule set.
#[derive(Debug, Clone, Copy, Default)]
pub struct JobLifecycle;

impl JobLifecycleService for JobLifecycle {}
