pub mod intent;
pub mod section;
pub mod task;
