pub mod event_registration;
pub mod inbox;
pub mod profiles;
pub mod team_workflow;

pub use event_registration::EventRegistration;
pub use inbox::NotificationInbox;
pub use profiles::ProfileDirectory;
pub use team_workflow::TeamWorkflow;
