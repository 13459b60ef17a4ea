// Library interface for fragterm-cli
// The binary's terminal loop lives in main.rs/app.rs; these modules are
// shared with it and with the integration tests.

pub mod highlight;
pub mod input;
pub mod theme;
pub mod view;

pub use highlight::CodeHighlighter;
pub use input::translate;
pub use theme::Theme;
