pub mod change_feed;
pub mod job_store;
pub mod vehicle_store;
