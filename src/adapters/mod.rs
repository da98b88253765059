//! Concrete adapter implementations for ports.

pub mod csv_adapter;
pub mod exchange_hours_adapter;
pub mod file_config_adapter;
pub mod in_memory_securities;
