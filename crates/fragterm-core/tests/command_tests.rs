use std::path::PathBuf;

use fragterm_core::commands::{parse_command, Command, OptionChange};

// ========================================================================
// Command Parsing Tests (commands.rs)
// ========================================================================

#[test]
fn test_help_command() {
    let result = parse_command("/help");
    if let Command::Message(msg) = result {
        assert!(msg.contains("fragterm commands"));
        assert!(msg.contains("/save"));
    } else {
        panic!("expected help text");
    }
}

#[test]
fn test_quit_aliases() {
    assert_eq!(parse_command("/quit"), Command::Quit);
    assert_eq!(parse_command("/q"), Command::Quit);
}

#[test]
fn test_save_and_load() {
    assert_eq!(
        parse_command("/save out.sh"),
        Command::Save(PathBuf::from("out.sh"))
    );
    assert_eq!(
        parse_command("/load lib.sh"),
        Command::Load {
            path: PathBuf::from("lib.sh"),
            overwrite: false
        }
    );
    assert_eq!(
        parse_command("/load lib.sh !"),
        Command::Load {
            path: PathBuf::from("lib.sh"),
            overwrite: true
        }
    );
}

#[test]
fn test_missing_arguments_show_usage() {
    for input in ["/save", "/load", "/mv a", "/merge a", "/new", "/opt format", "/set X"] {
        match parse_command(input) {
            Command::Message(msg) => assert!(msg.starts_with("Usage:"), "{input}: {msg}"),
            other => panic!("{input} parsed as {other:?}"),
        }
    }
}

#[test]
fn test_rename_with_force() {
    assert_eq!(
        parse_command("/mv frag_0 setup !"),
        Command::Rename {
            old: "frag_0".into(),
            new: "setup".into(),
            overwrite: true
        }
    );
}

#[test]
fn test_merge() {
    assert_eq!(
        parse_command("/merge a b"),
        Command::Merge {
            into: "a".into(),
            from: "b".into()
        }
    );
}

#[test]
fn test_refrag() {
    assert_eq!(parse_command("/refrag 2 0 1"), Command::Reorder(vec![2, 0, 1]));
    assert!(matches!(parse_command("/refrag 1 x"), Command::Message(_)));
}

#[test]
fn test_contexts() {
    assert_eq!(parse_command("/ctx"), Command::ListContexts);
    assert_eq!(parse_command("/ctx scratch"), Command::NewContext("scratch".into()));
}

#[test]
fn test_options() {
    assert_eq!(
        parse_command("/opt format off"),
        Command::SetOption(OptionChange::Format(false))
    );
    assert_eq!(
        parse_command("/opt scroll 5"),
        Command::SetOption(OptionChange::ScrollSpeed(5))
    );
    assert!(matches!(parse_command("/opt scroll 0"), Command::Message(_)));
    assert!(matches!(parse_command("/opt colour on"), Command::Message(_)));
}

#[test]
fn test_set_var_keeps_spaces() {
    assert_eq!(
        parse_command("/set GREETING hello there"),
        Command::SetVar {
            name: "GREETING".into(),
            value: "hello there".into()
        }
    );
}

#[test]
fn test_unknown_command() {
    match parse_command("/frobnicate") {
        Command::Message(msg) => assert!(msg.contains("Unknown command: /frobnicate")),
        other => panic!("unexpected {other:?}"),
    }
    assert!(matches!(parse_command("ls"), Command::Message(_)));
}
