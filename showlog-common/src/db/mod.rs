//! SQLite record store

pub mod init;
pub mod models;
pub mod performances;

pub use init::*;
pub use models::*;
pub use performances::*;
