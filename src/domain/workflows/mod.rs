pub mod bucket;
pub mod checklist;
pub mod state_machine;
pub mod vehicle_state_machine;
