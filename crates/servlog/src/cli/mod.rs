//! # CLI Behavior
//!
//! This is **one possible UI client** for servlog, not the application itself.
//! The CLI is the only place that knows about terminal I/O, exit codes, and
//! output formatting.
//!
//! ### Naked Execution (`servlog`)
//!
//! Running `servlog` with no arguments lists drafts.
//!
//! ### One-shot Commands and Autosave
//!
//! Each invocation is its own short process. Draft edits are written
//! immediately with the draft marked `saving`; the next invocation settles
//! them once the quiet period has passed. `servlog session` keeps the process
//! alive and runs the debounce live.
//!
//! ### Destructive Commands
//!
//! Deleting a draft, clearing drafts and deleting a log ask `[y/N]` first.
//! `--yes` skips the question. Without a terminal on stdin the CLI refuses
//! rather than guess.
//!
//! ## Module Structure
//!
//! - `commands`: entry point, logging setup, dispatch
//! - `handlers`: per-command handlers that call the API
//! - `render`: output formatting (tables, colors, messages)
//! - `prompt`: confirmation questions
//! - `session`: the interactive editor
//! - `setup`: argument parsing via clap

mod commands;
mod handlers;
mod prompt;
mod render;
mod session;
pub mod setup;

pub use commands::run;
