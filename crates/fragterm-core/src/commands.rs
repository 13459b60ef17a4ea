use std::path::PathBuf;

/// An option change requested with `/opt`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionChange {
    Format(bool),
    Highlight(bool),
    ScrollSpeed(usize),
}

/// Result of parsing a command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Show text to the user; also carries usage errors.
    Message(String),
    Quit,
    Save(PathBuf),
    Load { path: PathBuf, overwrite: bool },
    Rename {
        old: String,
        new: String,
        overwrite: bool,
    },
    Merge { into: String, from: String },
    Reorder(Vec<usize>),
    ListFragments,
    NewFragment(String),
    NewContext(String),
    ListContexts,
    SetOption(OptionChange),
    WriteScript(PathBuf),
    /// Change the working directory runs start in; `None` shows it.
    ChangeDir(Option<String>),
    /// Set a variable exported to every run.
    SetVar { name: String, value: String },
}

/// Parse a command line such as `/mv frag_0 setup !`.
pub fn parse_command(input: &str) -> Command {
    let input = input.trim();
    let mut words = input.split_whitespace();
    let cmd = words.next().unwrap_or("");
    let mut args: Vec<&str> = words.collect();
    let forced = args.last() == Some(&"!");
    if forced {
        args.pop();
    }

    match (cmd, args.as_slice()) {
        ("/help" | "/h", _) => show_help(),
        ("/quit" | "/q", _) => Command::Quit,

        ("/save", [path]) => Command::Save(PathBuf::from(path)),
        ("/save", _) => usage("/save <path>"),
        ("/load", [path]) => Command::Load {
            path: PathBuf::from(path),
            overwrite: forced,
        },
        ("/load", _) => usage("/load <path> [!]"),
        ("/script", [path]) => Command::WriteScript(PathBuf::from(path)),
        ("/script", _) => usage("/script <path>"),

        ("/mv", [old, new]) => Command::Rename {
            old: old.to_string(),
            new: new.to_string(),
            overwrite: forced,
        },
        ("/mv", _) => usage("/mv <old> <new> [!]"),
        ("/merge", [into, from]) => Command::Merge {
            into: into.to_string(),
            from: from.to_string(),
        },
        ("/merge", _) => usage("/merge <into> <from>"),
        ("/refrag", []) => usage("/refrag <i> <j> ..."),
        ("/refrag", order) => match order
            .iter()
            .map(|s| s.parse::<usize>())
            .collect::<Result<Vec<_>, _>>()
        {
            Ok(order) => Command::Reorder(order),
            Err(_) => Command::Message("Fragment numbers must be non-negative integers".into()),
        },
        ("/ls", _) => Command::ListFragments,
        ("/new", [name]) => Command::NewFragment(name.to_string()),
        ("/new", _) => usage("/new <name>"),
        ("/ctx", []) => Command::ListContexts,
        ("/ctx", [name]) => Command::NewContext(name.to_string()),
        ("/ctx", _) => usage("/ctx [name]"),

        ("/opt", [name, value]) => parse_option(name, value),
        ("/opt", _) => usage("/opt <format|highlight|scroll> <value>"),
        ("/cd", []) => Command::ChangeDir(None),
        ("/cd", [dir]) => Command::ChangeDir(Some(dir.to_string())),
        ("/cd", _) => usage("/cd [dir]"),
        ("/set", [name, value @ ..]) if !value.is_empty() => Command::SetVar {
            name: name.to_string(),
            value: value.join(" "),
        },
        ("/set", _) => usage("/set <name> <value>"),

        ("", _) => Command::Message(String::new()),
        (other, _) if other.starts_with('/') => {
            Command::Message(format!("Unknown command: {other}. Type /help for commands."))
        }
        _ => Command::Message("Commands start with '/'. Type /help for commands.".into()),
    }
}

fn parse_option(name: &str, value: &str) -> Command {
    let flag = || match value {
        "on" | "true" | "1" => Some(true),
        "off" | "false" | "0" => Some(false),
        _ => None,
    };
    let change = match name {
        "format" => flag().map(OptionChange::Format),
        "highlight" => flag().map(OptionChange::Highlight),
        "scroll" => value
            .parse::<usize>()
            .ok()
            .filter(|&n| n > 0)
            .map(OptionChange::ScrollSpeed),
        _ => {
            return Command::Message(format!(
                "Unknown option: {name}. Options: format, highlight, scroll"
            ))
        }
    };
    change
        .map(Command::SetOption)
        .unwrap_or_else(|| Command::Message(format!("Invalid value for {name}: {value}")))
}

fn usage(form: &str) -> Command {
    Command::Message(format!("Usage: {form}"))
}

fn show_help() -> Command {
    let help_text = "\
fragterm commands
  /save <path>            write attached fragments to a file
  /load <path> [!]        load a file into a fragment (! replaces)
  /script <path>          write every successfully run fragment to a file
  /mv <old> <new> [!]     rename a fragment (! replaces)
  /merge <into> <from>    append a fragment to another
  /refrag <i> <j> ...     reorder fragments by number
  /ls                     list fragments
  /new <name>             add an empty fragment
  /ctx [name]             list contexts, or create one
  /opt <name> <value>     format on|off, highlight on|off, scroll <n>
  /cd [dir]               show or change the run directory
  /set <name> <value>     set a variable exported to runs
  /help, /h               show this help
  /quit, /q               quit";

    Command::Message(help_text.into())
}
