//! Painting a [`RenderModel`] with ratatui.

use fragterm_core::{FragmentMarker, LineKind, RenderLine, RenderModel};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::highlight::CodeHighlighter;
use crate::theme::Theme;

pub fn draw_ui(f: &mut Frame, model: &RenderModel, theme: &Theme, highlighter: &CodeHighlighter) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(1),    // fragments
            Constraint::Length(1), // status
        ])
        .split(f.area());

    let lines = editor_lines(model, theme, Some(highlighter));
    let editor = Paragraph::new(lines).style(Style::default().bg(theme.bg).fg(theme.fg));
    f.render_widget(editor, chunks[0]);

    if !model.echo.is_empty() {
        draw_echo(f, chunks[0], &model.echo, theme);
    } else if let Some((x, y)) = model.cursor {
        if y < chunks[0].height && x < chunks[0].width {
            f.set_cursor_position((chunks[0].x + x, chunks[0].y + y));
        }
    }

    draw_status_bar(f, chunks[1], model, theme);
}

/// The visible buffer as styled lines: a two column gutter, then code
/// (highlighted when enabled) or output.
pub fn editor_lines(
    model: &RenderModel,
    theme: &Theme,
    highlighter: Option<&CodeHighlighter>,
) -> Vec<Line<'static>> {
    let mut out = Vec::with_capacity(model.lines.len());
    let mut start = 0;
    while start < model.lines.len() {
        // One run of lines belongs to one fragment
        let fragment = model.lines[start].fragment;
        let end = model.lines[start..]
            .iter()
            .position(|l| l.fragment != fragment)
            .map_or(model.lines.len(), |n| start + n);
        let run = &model.lines[start..end];
        let Some(marker) = model.fragments.get(fragment) else {
            start = end;
            continue;
        };

        // Whole fragment, so open quotes and heredocs above the viewport
        // still colour the rows below.
        let highlighted = match highlighter {
            Some(h) if model.highlight => model.fragment_code(fragment).and_then(|code| {
                let code: Vec<&str> = code.iter().map(String::as_str).collect();
                h.highlight(&code)
            }),
            _ => None,
        };

        let bg = if marker.parity { theme.stripe } else { theme.bg };
        for line in run {
            let mut spans = vec![gutter(marker, line, theme)];
            match line.kind {
                LineKind::Code { row } => match highlighted.as_ref().and_then(|h| h.get(row)) {
                    Some(pieces) => spans.extend(pieces.iter().cloned()),
                    None => spans.push(Span::styled(line.text.clone(), Style::default().fg(theme.fg))),
                },
                LineKind::Output => {
                    let color = if marker.error { theme.error } else { theme.output };
                    spans.push(Span::styled(line.text.clone(), Style::default().fg(color)));
                }
            }
            out.push(Line::from(spans).style(Style::default().bg(bg)));
        }
        start = end;
    }
    out
}

fn gutter(marker: &FragmentMarker, line: &RenderLine, theme: &Theme) -> Span<'static> {
    if line.kind != (LineKind::Code { row: 0 }) {
        let bar = if marker.active { "│ " } else { "  " };
        return Span::styled(bar, Style::default().fg(theme.accent));
    }
    let (symbol, color) = if marker.detached {
        ("~ ", theme.warning)
    } else if marker.error {
        ("! ", theme.error)
    } else if marker.executed {
        ("* ", theme.success)
    } else if marker.active {
        ("│ ", theme.accent)
    } else {
        ("  ", theme.muted)
    };
    Span::styled(symbol, Style::default().fg(color).add_modifier(Modifier::BOLD))
}

fn draw_echo(f: &mut Frame, area: Rect, echo: &[String], theme: &Theme) {
    let height = (echo.len() as u16 + 2).min(area.height);
    let rect = Rect {
        x: area.x,
        y: area.y + area.height - height,
        width: area.width,
        height,
    };
    let text: Vec<Line> = echo
        .iter()
        .map(|l| Line::from(Span::styled(l.clone(), Style::default().fg(theme.fg))))
        .collect();
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.border))
        .style(Style::default().bg(theme.bg));
    f.render_widget(Clear, rect);
    f.render_widget(Paragraph::new(text).block(block), rect);
}

pub fn status_spans(model: &RenderModel, theme: &Theme) -> Vec<Span<'static>> {
    let mut spans = vec![Span::styled(
        format!(" {} ", model.context),
        Style::default().fg(theme.accent).add_modifier(Modifier::BOLD),
    )];
    if let Some(active) = model.fragments.iter().find(|m| m.active) {
        spans.push(Span::styled(
            format!("| {} ", active.name),
            Style::default().fg(theme.accent),
        ));
        if let Some(rev) = active.revision {
            spans.push(Span::styled(format!("r {rev} "), Style::default().fg(theme.muted)));
        }
    }
    if !model.status.is_empty() {
        let color = if model.status.starts_with(">>") {
            theme.warning
        } else {
            theme.fg
        };
        spans.push(Span::styled(
            format!("| {}", model.status),
            Style::default().fg(color),
        ));
    }
    spans
}

fn draw_status_bar(f: &mut Frame, area: Rect, model: &RenderModel, theme: &Theme) {
    let bar = Paragraph::new(Line::from(status_spans(model, theme)))
        .style(Style::default().bg(theme.border));
    f.render_widget(bar, area);
}
