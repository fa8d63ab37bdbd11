//! Compass Gateway - signed inference pipeline for the Course Compass assistant
//!
//! Turns a long-lived service username/password into a short-lived, signed
//! request against AWS Bedrock: Cognito user-pool authentication, identity
//! federation, temporary-credential vending, SigV4 signing, model invocation,
//! and reply extraction. The chat front end consumes a single operation,
//! [`InferencePipeline::invoke`]; everything upstream of that call (UI,
//! knowledge-base retrieval) lives outside this crate.

pub mod config;
pub mod domain;
pub mod error;
pub mod log_messages;
pub mod pipeline;

pub use crate::config::Settings;
pub use crate::error::{Error, Result};
pub use crate::pipeline::{Endpoints, InferencePipeline};
