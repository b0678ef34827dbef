//! Workflow Graph Generation for n8n AI Agents
//!
//! Synthesizes an importable n8n workflow from an [`AgentDefinition`].
//!
//! # Overview
//!
//! ```text
//! AgentDefinition
//!      │
//!      ▼
//! NodeFactory ──▶ [WorkflowNode] ──▶ ConnectionBuilder ──▶ [Connection]
//!                       │                                       │
//!                       └──────────────▶ assemble ◀─────────────┘
//!                                           │
//!                                           ▼
//!                                    WorkflowDocument
//! ```
//!
//! # Usage
//!
//! ```
//! use n8n_agentgen::AgentDefinition;
//! use n8n_agentgen::workflow::WorkflowGenerator;
//!
//! let agent = AgentDefinition::new("Inbox Agent", "triages incoming email")
//!     .with_tools(["gmail", "slack"]);
//!
//! let doc = WorkflowGenerator::new().generate(&agent).unwrap();
//! assert_eq!(doc.tool_connection_count(), 2);
//! ```
//!
//! [`AgentDefinition`]: crate::agent::AgentDefinition

pub mod assembler;
pub mod connections;
pub mod document;
pub mod factory;
pub mod layout;
pub mod node;

pub use assembler::{assemble, WorkflowGenerator};
pub use connections::{
    ensure_unique_names, Connection, ConnectionBuilder, ConnectionClass, ConnectionMap,
    ConnectionTarget,
};
pub use document::{WorkflowDocument, WorkflowMeta};
pub use factory::NodeFactory;
pub use layout::{CanvasLayout, HeadlessLayout, LayoutSlot, LayoutStrategy};
pub use node::{NodeId, NodeRole, Position, WorkflowNode};
