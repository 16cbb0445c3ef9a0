pub mod job;
pub mod vehicle;

pub use job::{JobRow, ServiceItemRow};
pub use vehicle::{VehicleRow, VehicleTaskRow};
