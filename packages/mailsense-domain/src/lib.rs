pub mod annotation;
pub mod mailbox;
pub mod sentiment;
pub mod task;
