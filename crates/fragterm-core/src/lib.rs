pub mod autocomplete;
pub mod commands;
pub mod config;
pub mod constants;
pub mod context;
pub mod dispatcher;
pub mod document;
pub mod error;
pub mod eval;
pub mod filters;
pub mod fragment;
pub mod history;
pub mod keys;
pub mod namespace;
pub mod persistence;
pub mod render;
pub mod session;
pub mod viewport;

// Re-export key types
pub use config::Settings;
pub use context::{Context, ContextManager, ContextOptions};
pub use dispatcher::{Mode, Outcome};
pub use document::{Direction, Document};
pub use error::{FragError, Result};
pub use eval::{EvalError, Evaluator, RunReport, ShellEvaluator};
pub use filters::{CommandFormatter, Formatter, WhitespaceFormatter};
pub use fragment::{EditState, Fragment};
pub use history::HistoryStore;
pub use keys::{InputEvent, Key, KeyCode, Modifiers};
pub use namespace::{JsonNamespace, Namespace};
pub use render::{FragmentMarker, LineKind, RenderLine, RenderModel};
pub use session::Session;
pub use viewport::Viewport;
