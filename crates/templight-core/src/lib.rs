//! # Templight Core
//!
//! Finds template fragments in a document and turns them into decorations.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                        ViewController                         │
//! │   ViewUpdate ──► stale ──► rebuild ──► fresh (Arc<Decorations>)│
//! │                              │                                │
//! │  ┌─────────┐   Region*   ┌───┴──────────────┐                 │
//! │  │ Scanner │ ──────────► │ DecorationBuilder│ ◄── highlight() │
//! │  └─────────┘             └──────────────────┘    (syntax crate)│
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every rebuild runs synchronously over the whole document and replaces the
//! previous decorations wholesale. Nothing survives between rebuilds except
//! the published decorations and, when enabled, the fragment cache.
//!
//! ## Learning: Module Organization
//!
//! Rust modules map to files:
//! - `mod foo;` looks for `foo.rs` or `foo/mod.rs`
//! - `pub use` re-exports items for cleaner public APIs

pub mod builder;
pub mod cache;
pub mod config;
pub mod decoration;
pub mod event;
pub mod scanner;
pub mod view;

pub use builder::DecorationBuilder;
pub use cache::FragmentCache;
pub use config::Config;
pub use decoration::{
    DecorationError, DecorationSet, DecorationSetBuilder, Decorations, LineDecoration,
    MarkDecoration,
};
pub use event::ViewUpdate;
pub use scanner::{Region, RegionKind, Scanner};
pub use view::{ViewController, ViewState};

/// Result type for core operations
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur in core operations
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Syntax error: {0}")]
    Syntax(#[from] templight_syntax::SyntaxError),

    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),
}
