//! Port traits for the collaborators the core consumes.

pub mod config_port;
pub mod data_port;
pub mod exchange_hours_port;
pub mod security_port;
