/// fragterm constants.
/// Defaults, layout numbers and the built-in help text live here.

// ─── Naming ───────────────────────────────────────────────────────────────────

pub mod names {
    /// Prefix for automatically named fragments (`frag_0`, `frag_1`, ...)
    pub const FRAGMENT_PREFIX: &str = "frag_";
    /// Prefix for automatically named contexts
    pub const CONTEXT_PREFIX: &str = "ctx_";
    /// Infix used when a fragment is split in two
    pub const SPLIT_INFIX: &str = "_split_";
    /// Prefix for fragments created from a loaded file
    pub const FILE_PREFIX: &str = "file_";
}

// ─── Default Settings ─────────────────────────────────────────────────────────

pub mod defaults {
    pub const TAB_WIDTH: usize = 4;
    pub const SCROLL_SPEED: usize = 10;
    pub const FORMAT_ON_RUN: bool = true;
    pub const HIGHLIGHT: bool = true;
    pub const THEME: &str = "dark";
    pub const SHELL: &str = "bash";
    pub const SYNTAX: &str = "sh";
    pub const HIGHLIGHT_THEME: &str = "base16-ocean.dark";
}

// ─── Layout ───────────────────────────────────────────────────────────────────

pub mod layout {
    /// Rows kept above the cursor while following it
    pub const TOP_MARGIN: usize = 2;
    /// Rows kept below the cursor while following it
    pub const BOTTOM_MARGIN: usize = 2;
    /// Marker column plus separator drawn before every code line
    pub const GUTTER_WIDTH: usize = 2;
    /// Prefix put in front of an evaluated value
    pub const VALUE_PREFIX: &str = "=> ";
}

pub const HELP: &str = "\
==== fragterm, help ====
    ctrl d         - delete line
    ctrl r         - run fragment
    ctrl alt r     - run all fragments
    ctrl k         - remove fragment
    ctrl n         - clear context (keeps code)
    ctrl l         - clear all fragment outputs
    ctrl f         - find in fragment
    ctrl p         - command line (/help for commands)
    ctrl c         - exit (press twice)
    ins            - detach/attach fragment
    ctrl ins       - split fragment at cursor
    ctrl alt n     - new context
    ctrl alt k     - delete context
    ctrl alt left  - previous context
    ctrl alt right - next context
    pgUp / pgDn    - move cursor by scroll step
    ctrl pgUp/pgDn - previous / next fragment
    alt pgUp/pgDn  - scroll view (cursor stays)
    alt up / dn    - previous / next fragment revision
    ctrl up / dn   - move fragment up / down
    tab            - autocomplete word or indent
    F1             - this help";
