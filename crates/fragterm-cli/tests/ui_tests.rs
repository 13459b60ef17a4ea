use crossterm::event::{
    Event, KeyCode as CtKeyCode, KeyEvent, KeyEventKind, KeyModifiers,
};
use fragterm_cli::{translate, view, CodeHighlighter, Theme};
use fragterm_core::{FragmentMarker, InputEvent, Key, KeyCode, LineKind, RenderLine, RenderModel};

// ========================================================================
// Input translation (input.rs)
// ========================================================================

fn press(code: CtKeyCode, mods: KeyModifiers) -> Event {
    Event::Key(KeyEvent::new(code, mods))
}

#[test]
fn test_plain_char() {
    let ev = translate(press(CtKeyCode::Char('x'), KeyModifiers::NONE));
    assert_eq!(ev, Some(InputEvent::Key(Key::char('x'))));
}

#[test]
fn test_ctrl_alt_arrow() {
    let ev = translate(press(
        CtKeyCode::Left,
        KeyModifiers::CONTROL | KeyModifiers::ALT,
    ));
    assert_eq!(ev, Some(InputEvent::Key(Key::ctrl_alt(KeyCode::Left))));
}

#[test]
fn test_function_key() {
    let ev = translate(press(CtKeyCode::F(5), KeyModifiers::NONE));
    match ev {
        Some(InputEvent::Key(key)) => assert_eq!(key.to_string(), "f5"),
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn test_release_is_dropped() {
    let release = KeyEvent::new_with_kind(
        CtKeyCode::Char('a'),
        KeyModifiers::NONE,
        KeyEventKind::Release,
    );
    assert_eq!(translate(Event::Key(release)), None);
}

#[test]
fn test_paste_and_resize() {
    assert_eq!(
        translate(Event::Paste("a\nb".into())),
        Some(InputEvent::Paste("a\nb".into()))
    );
    assert_eq!(
        translate(Event::Resize(80, 24)),
        Some(InputEvent::Resize { width: 80, height: 24 })
    );
}

#[test]
fn test_focus_is_dropped() {
    assert_eq!(translate(Event::FocusGained), None);
}

#[test]
fn test_backtab_is_unknown() {
    let ev = translate(press(CtKeyCode::BackTab, KeyModifiers::SHIFT));
    match ev {
        Some(InputEvent::Key(key)) => {
            assert_eq!(key.code, KeyCode::Unknown("backtab".into()));
            assert!(key.printable().is_none());
        }
        other => panic!("unexpected {other:?}"),
    }
}

// ========================================================================
// Themes (theme.rs)
// ========================================================================

#[test]
fn test_theme_by_name() {
    for name in Theme::all_names() {
        assert_eq!(Theme::by_name(name).name, *name);
    }
}

#[test]
fn test_unknown_theme_is_dark() {
    assert_eq!(Theme::by_name("solarized").name, "dark");
}

// ========================================================================
// Highlighting (highlight.rs)
// ========================================================================

#[test]
fn test_highlight_keeps_line_count() {
    let h = CodeHighlighter::new("sh", "base16-ocean.dark");
    let lines = h.highlight(&["echo hi", "", "ls -la # list"]).unwrap();
    assert_eq!(lines.len(), 3);
    assert!(lines[1].is_empty());
    let first: String = lines[0].iter().map(|s| s.content.as_ref()).collect();
    assert_eq!(first, "echo hi");
}

#[test]
fn test_highlight_unknown_theme_and_grammar() {
    let h = CodeHighlighter::new("no-such-ext", "no-such-theme");
    let lines = h.highlight(&["plain text"]).unwrap();
    let text: String = lines[0].iter().map(|s| s.content.as_ref()).collect();
    assert_eq!(text, "plain text");
}

// ========================================================================
// Frame layout (view.rs)
// ========================================================================

fn marker(name: &str, executed: bool, error: bool, active: bool) -> FragmentMarker {
    FragmentMarker {
        name: name.into(),
        revision: executed.then_some(0),
        executed,
        error,
        detached: false,
        active,
        parity: false,
    }
}

fn line(fragment: usize, kind: LineKind, text: &str) -> RenderLine {
    RenderLine {
        fragment,
        kind,
        text: text.into(),
    }
}

fn model() -> RenderModel {
    RenderModel {
        context: "ctx_0".into(),
        fragments: vec![marker("a", true, false, false), marker("b", true, true, true)],
        lines: vec![
            line(0, LineKind::Code { row: 0 }, "x=1"),
            line(0, LineKind::Output, "=> 1"),
            line(1, LineKind::Code { row: 0 }, "bad"),
            line(1, LineKind::Code { row: 1 }, "more"),
            line(1, LineKind::Output, "boom"),
        ],
        visible_code: vec![
            (0, vec!["x=1".into()]),
            (1, vec!["bad".into(), "more".into()]),
        ],
        first_line: 0,
        doc_height: 5,
        cursor: Some((2, 2)),
        highlight: false,
        status: "ran b".into(),
        echo: Vec::new(),
    }
}

fn text(line: &ratatui::text::Line) -> String {
    line.spans.iter().map(|s| s.content.as_ref()).collect()
}

#[test]
fn test_editor_lines_gutter() {
    let theme = Theme::dark();
    let lines = view::editor_lines(&model(), &theme, None);
    assert_eq!(lines.len(), 5);
    assert_eq!(text(&lines[0]), "* x=1");
    assert_eq!(text(&lines[1]), "  => 1");
    assert_eq!(text(&lines[2]), "! bad");
    assert_eq!(text(&lines[3]), "│ more");
}

#[test]
fn test_error_output_colour() {
    let theme = Theme::dark();
    let lines = view::editor_lines(&model(), &theme, None);
    assert_eq!(lines[1].spans[1].style.fg, Some(theme.output));
    assert_eq!(lines[4].spans[1].style.fg, Some(theme.error));
}

#[test]
fn test_highlighted_lines_keep_text() {
    let theme = Theme::dark();
    let mut m = model();
    m.highlight = true;
    let h = CodeHighlighter::new("sh", "base16-ocean.dark");
    let lines = view::editor_lines(&m, &theme, Some(&h));
    assert_eq!(text(&lines[2]), "! bad");
    assert_eq!(text(&lines[3]), "│ more");
    assert_eq!(text(&lines[4]), "│ boom");
}

#[test]
fn test_highlight_uses_rows_above_viewport() {
    let theme = Theme::dark();
    let h = CodeHighlighter::new("sh", "base16-ocean.dark");
    let code = vec!["echo \"start".to_string(), "still quoted\"".to_string()];
    let m = RenderModel {
        context: "ctx_0".into(),
        fragments: vec![marker("q", false, false, true)],
        lines: vec![line(0, LineKind::Code { row: 1 }, "still quoted\"")],
        visible_code: vec![(0, code.clone())],
        first_line: 1,
        doc_height: 2,
        cursor: None,
        highlight: true,
        status: String::new(),
        echo: Vec::new(),
    };
    let lines = view::editor_lines(&m, &theme, Some(&h));
    assert_eq!(lines.len(), 1);

    let refs: Vec<&str> = code.iter().map(String::as_str).collect();
    let full = h.highlight(&refs).unwrap();
    let drawn: Vec<_> = lines[0].spans[1..].iter().map(|s| s.style).collect();
    let expected: Vec<_> = full[1].iter().map(|s| s.style).collect();
    assert_eq!(drawn, expected);
    assert_eq!(text(&lines[0]), "│ still quoted\"");
}

#[test]
fn test_status_spans() {
    let theme = Theme::dark();
    let spans = view::status_spans(&model(), &theme);
    let bar: String = spans.iter().map(|s| s.content.as_ref()).collect();
    assert_eq!(bar, " ctx_0 | b r 0 | ran b");
}
