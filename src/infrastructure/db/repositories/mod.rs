pub mod factory;
pub mod job_repository;
pub mod vehicle_repository;

pub use factory::Repositories;
