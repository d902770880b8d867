//! Integration tests for guild music sessions

pub mod connection;
pub mod delivery;
pub mod inactivity;
