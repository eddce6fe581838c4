//! Command handling

pub mod options;
pub mod run;
