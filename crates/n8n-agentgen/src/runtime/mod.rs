//! External workflow runtime integration
//!
//! - [`client`]: authenticated REST client for the n8n public API
//! - [`registration`]: strategies that make a generated workflow reachable
//! - [`service`]: the agent workflow lifecycle built on both

pub mod client;
pub mod registration;
pub mod service;

pub use client::{N8nClient, WorkflowSummary};
pub use registration::{
    RegistrationStrategy, RemoteRegistration, StaticWebhookRegistration, WorkflowHandle,
};
pub use service::{WorkflowService, DEFAULT_LOCAL_RUNTIME};
