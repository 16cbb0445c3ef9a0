use crate::domain::entities::vehicle::{Vehicle, VehicleStatus};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum VehicleTransitionError {
    #[error("vehicle cannot move from {from:?} to {to:?}")]
    Forbidden {
        from: VehicleStatus,
        to: VehicleStatus,
    },
    #[error("{remaining} task(s) still open")]
    OpenTasks { remaining: usize },
    #[error("vehicle is completed")]
    Closed,
}

pub struct VehicleStateMachine;

impl VehicleStateMachine {
    pub fn can_transition(from: VehicleStatus, to: VehicleStatus) -> bool {
        matches!(
            (from, to),
            (VehicleStatus::Scheduled, VehicleStatus::InShop)
                | (VehicleStatus::InShop, VehicleStatus::Ready)
                | (VehicleStatus::Ready, VehicleStatus::InShop)
                | (VehicleStatus::Ready, VehicleStatus::Completed)
        )
    }

    /// Validate moving `vehicle` to `to`. `Ready` additionally requires every task settled.
    pub fn transition(
        vehicle: &Vehicle,
        to: VehicleStatus,
    ) -> Result<VehicleStatus, VehicleTransitionError> {
        let from = vehicle.status;
        if from == VehicleStatus::Completed {
            return Err(VehicleTransitionError::Closed);
        }
        if !Self::can_transition(from, to) {
            return Err(VehicleTransitionError::Forbidden { from, to });
        }
        if to == VehicleStatus::Ready {
            let remaining = vehicle.unsettled_tasks();
            if remaining > 0 {
                return Err(VehicleTransitionError::OpenTasks { remaining });
            }
        }

        Ok(to)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::vehicle::{VehicleTask, VehicleTaskStatus};
    use crate::domain::value_objects::ids::{ScopeId, TaskId, VehicleId};
    use crate::domain::value_objects::money::Money;
    use crate::domain::value_objects::timestamps::Timestamp;

    fn vehicle(status: VehicleStatus, tasks: &[VehicleTaskStatus]) -> Vehicle {
        Vehicle {
            id: VehicleId::new(),
            scope_id: ScopeId::new(),
            plate: "KHI-221".to_string(),
            make: "Suzuki".to_string(),
            model: "Alto".to_string(),
            owner_name: "Faisal".to_string(),
            assigned_technician: Some("Ahmed Raza".to_string()),
            status,
            tasks: tasks
                .iter()
                .map(|s| VehicleTask {
                    id: TaskId::new(),
                    name: "Tuning".to_string(),
                    cost: Money::from_major(1_000),
                    status: *s,
                })
                .collect(),
            updated_at: Timestamp::now_utc(),
        }
    }

    #[test]
    fn given_all_status_pairs_when_checked_should_match_allowed_matrix() {
        let states = [
            VehicleStatus::Scheduled,
            VehicleStatus::InShop,
            VehicleStatus::Ready,
            VehicleStatus::Completed,
        ];
        let allowed = [
            (VehicleStatus::Scheduled, VehicleStatus::InShop),
            (VehicleStatus::InShop, VehicleStatus::Ready),
            (VehicleStatus::Ready, VehicleStatus::InShop),
            (VehicleStatus::Ready, VehicleStatus::Completed),
        ];

        for from in states {
            for to in states {
                assert_eq!(
                    VehicleStateMachine::can_transition(from, to),
                    allowed.contains(&(from, to))
                );
            }
        }
    }

    #[test]
    fn given_open_tasks_when_marking_ready_should_be_refused() {
        let v = vehicle(
            VehicleStatus::InShop,
            &[VehicleTaskStatus::Completed, VehicleTaskStatus::NeedApproval],
        );

        assert_eq!(
            VehicleStateMachine::transition(&v, VehicleStatus::Ready),
            Err(VehicleTransitionError::OpenTasks { remaining: 1 })
        );
    }

    #[test]
    fn given_settled_tasks_when_marking_ready_should_be_allowed() {
        let v = vehicle(
            VehicleStatus::InShop,
            &[VehicleTaskStatus::Completed, VehicleTaskStatus::Rejected],
        );

        assert_eq!(
            VehicleStateMachine::transition(&v, VehicleStatus::Ready),
            Ok(VehicleStatus::Ready)
        );
    }

    #[test]
    fn given_completed_vehicle_when_transitioning_should_be_closed() {
        let v = vehicle(VehicleStatus::Completed, &[]);

        assert_eq!(
            VehicleStateMachine::transition(&v, VehicleStatus::InShop),
            Err(VehicleTransitionError::Closed)
        );
    }
}
