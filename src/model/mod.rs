pub mod attendance;
pub mod leave_request;
pub mod person;
