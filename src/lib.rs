pub mod common;
pub mod error;
pub mod helpers;
pub mod import;
pub mod persist;
pub mod render;
pub mod state;
