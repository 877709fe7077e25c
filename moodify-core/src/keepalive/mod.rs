//! Keep-alive probe for idle-suspending upstream hosts

pub mod service;
pub mod types;

pub use service::KeepAliveProbe;
pub use types::{LivenessTarget, ProbeOutcome};
