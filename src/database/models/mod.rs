pub mod notification;
pub mod team;
pub mod user;

// Re-export all models for easy importing
pub use notification::*;
pub use team::*;
pub use user::*;
