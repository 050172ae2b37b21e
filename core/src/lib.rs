pub mod core;
pub mod timer;
pub mod types;
