//! snippet-sdk - High-level API for the snippet-today workspace
//!
//! This crate ties the lower layers together behind one ergonomic surface:
//! a [`Workspace`] owns a document registry over pluggable storage and adds
//! the operations an editor front end needs on top of it.
//!
//! # Quick Start
//!
//! ```rust
//! use snippet_sdk::{Workspace, WorkspaceConfig};
//!
//! fn main() -> Result<(), snippet_sdk::SdkError> {
//!     // A fresh workspace seeds a welcome document and makes it active.
//!     let mut workspace = Workspace::in_memory(WorkspaceConfig::default())?;
//!
//!     // Edit the active document.
//!     let id = workspace.registry().active_id().clone();
//!     workspace.registry_mut().update_content(&id, "<h1>Notes</h1>")?;
//!
//!     // Export it as Markdown.
//!     let export = workspace.export_active_markdown()?;
//!     assert_eq!(export.markdown, "# Notes");
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! - [`client`] - The [`Workspace`] entry point and its configuration
//! - [`assistant`] - Chat messages and the pluggable assistant backend trait
//! - [`export`] - HTML to Markdown conversion
//! - [`text`] - Plain-text extraction and word/character counts
//!
//! Sharing a document with a peer goes through `snippet-handoff`; the
//! workspace exposes it as [`Workspace::share_active`] and
//! [`Workspace::receive`].

pub mod assistant;
pub mod client;
pub mod error;
pub mod export;
pub mod text;

pub use assistant::{AssistantClient, AssistantError, AssistantRequest, Message, Role};
pub use client::{ActiveShare, TextCounts, Workspace, WorkspaceConfig, WorkspaceConfigBuilder};
pub use error::{Result, SdkError};
pub use export::MarkdownExport;

// Re-export the layers callers commonly need alongside the workspace.
pub use snippet_handoff as handoff;
pub use snippet_registry as registry;
pub use snippet_store as store;
