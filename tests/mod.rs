// Integration tests for smooth-migrate

pub mod helpers;
pub mod integration;
pub mod unit;
