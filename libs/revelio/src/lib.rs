pub mod annotate;
pub mod common;
pub mod dispatch;
