//! Common test utilities

#![allow(dead_code)]

pub mod fritzbox_mock;
pub mod test_fixtures;
