pub mod change_feed_memory;
pub mod job_store_memory;
pub mod vehicle_store_memory;

pub use change_feed_memory::{MemoryChangeFeed, MemoryChangeNotifier};
pub use job_store_memory::MemoryJobStore;
pub use vehicle_store_memory::MemoryVehicleStore;
