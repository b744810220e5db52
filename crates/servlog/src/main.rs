//! # Servlog CLI Architecture
//!
//! The binary is intentionally thin: the CLI lives in `src/cli/`, while this
//! file only invokes `cli::run()` and handles process termination.
//!
//! ## Workspace Structure
//!
//! - `crates/servlogapp/`: core library, UI-agnostic business logic
//! - `crates/servlog/`: this CLI, depends on the library
//!
//! ## Layering
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (crates/servlog/src/cli/)                        │
//! │  - clap argument parsing (setup.rs)                         │
//! │  - Context wiring and dispatch (commands.rs, handlers.rs)   │
//! │  - Terminal rendering with `colored` (render.rs)            │
//! │  - Confirmation prompts (prompt.rs)                         │
//! │  - Interactive session with a live autosave timer           │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (crates/servlogapp/src/api.rs)                   │
//! │  - Normalizes selectors → UUIDs                             │
//! │  - Returns structured `CmdResult` values                    │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! Everything from `api.rs` inward is UI agnostic. The CLI layer owns every
//! user-facing concern: argument parsing, logging setup, prompting, rendering
//! and exit codes.
//!
//! ## Testing Approach
//!
//! - **Library**: unit tests next to the logic, plus filesystem tests.
//! - **CLI**: parsing and rendering unit tests in `src/cli/`, and end-to-end
//!   runs of the real binary in `tests/` with `assert_cmd`, each against its
//!   own temporary data directory.

mod cli;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
