pub mod dashboard;
pub mod health;
pub mod job;
pub mod ready;
pub mod vehicle;
