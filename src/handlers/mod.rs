pub mod events;
pub mod notifications;
pub mod profiles;
pub mod shared;
pub mod teams;
