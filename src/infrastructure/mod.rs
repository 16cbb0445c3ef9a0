pub mod db;
pub mod local;
pub mod observability;
