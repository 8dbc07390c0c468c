// Data structures shared with the backend

pub mod auth;
pub mod worker;
