pub mod event;
pub mod notification;
pub mod team;
pub mod user;
