//! Local configuration storage

pub mod settings;
