pub mod job;
pub mod task;
pub mod vehicle;
