pub mod change_watcher;
pub mod job_board;
pub mod vehicle_service;
