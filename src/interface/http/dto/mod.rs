pub mod job;
pub mod vehicle;
