pub mod filter;
pub mod grouping;
pub mod ranking;
pub mod task_list;
pub mod task_service;
