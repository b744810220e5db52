//! # Servlog Architecture
//!
//! Servlog keeps vehicle service records. Work starts as an editable **draft**
//! that autosaves while you type; once a draft is complete it is **promoted**
//! into an immutable-by-default **service log**, which can be listed, filtered,
//! edited and deleted.
//!
//! Like the rest of the workspace, this is a library first. The `servlog`
//! binary is one client of it.
//!
//! ## The Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI (servlog crate)                                        │
//! │  - Parses arguments, renders results, asks for confirmation │
//! │  - Runs the interactive session and its autosave timer      │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs)                                         │
//! │  - Thin facade over commands                                │
//! │  - Resolves selectors, owns filters and the autosave table  │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Command Layer (commands/*.rs)                              │
//! │  - Business logic, returns CmdResult                        │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Domain (drafts.rs, logs.rs, filters.rs, validation.rs)     │
//! │  Storage Layer (store/)                                     │
//! │  - One JSON document, transactional writes with rollback    │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Key Principle: No I/O Assumptions in Core
//!
//! From `api.rs` inward, code never writes to stdout/stderr, never prompts,
//! and never sleeps. Time enters as arguments (`Instant`, `DateTime<Utc>`), so
//! the debounce logic is tested without waiting.
//!
//! ## Module Overview
//!
//! - [`model`]: drafts, logs, service types, field names and typed updates
//! - [`dates`]: ISO date helpers
//! - [`validation`]: field rules shared by drafts and logs
//! - [`drafts`]: the normalized draft collection
//! - [`logs`]: the log collection
//! - [`filters`]: list filters and the memoized filtered view
//! - [`autosave`]: per-draft debounce table
//! - [`index`]: selectors and display indexes
//! - [`commands`]: business logic
//! - [`api`]: facade
//! - [`store`]: persistence
//! - [`config`], [`init`]: configuration and startup

pub mod api;
pub mod autosave;
pub mod commands;
pub mod config;
pub mod dates;
pub mod drafts;
pub mod error;
pub mod filters;
pub mod index;
pub mod init;
pub mod logs;
pub mod model;
pub mod store;
pub mod validation;
