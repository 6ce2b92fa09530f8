#![deny(warnings, rust_2018_idioms)]
#![forbid(unsafe_code)]

mod cli;
pub mod ingest;
pub mod write;

pub use self::cli::{Args, LogFormat};
pub use zone_policy_core::{Error, Policy, Zone, ZoneRegistry};
