pub mod change_feed_postgres;
mod database;
pub mod job_store_postgres;
pub mod vehicle_store_postgres;

pub use database::PostgresDatabase;
