//! Rendering functions for the application.

use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Gauge, Paragraph, Widget};

use namesake_core::{ScanProgress, Session, split_extension};
use namesake_scan::ProjectHost;

use crate::theme::Theme;
use crate::ui::modals::InputModal;
use crate::ui::{HelpOverlay, format_relative_time, format_size, truncate_left};

use super::input::InputState;
use super::rows::member_window;
use super::state::{AppMode, Row, StatusMessage};

/// Render context containing all the state needed for rendering.
pub struct RenderContext<'a> {
    pub mode: AppMode,
    pub theme: &'a Theme,
    pub path: &'a std::path::Path,
    pub session: Option<&'a Session<ProjectHost>>,
    pub rows: &'a [Row],
    pub cursor: usize,
    pub scan_progress: Option<&'a ScanProgress>,
    pub status: Option<&'a StatusMessage>,
    pub input_state: Option<&'a InputState>,
}

/// Main render function for the application.
pub fn render_app(ctx: &RenderContext, area: Rect, buf: &mut Buffer) {
    let base_style = Style::default()
        .bg(ctx.theme.background)
        .fg(ctx.theme.foreground);
    buf.set_style(area, base_style);

    // Layout: header, content, status, footer
    let [header, content, status, footer] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(5),
        Constraint::Length(1),
        Constraint::Length(1),
    ])
    .areas(area);

    render_header(ctx, header, buf);

    match ctx.session {
        Some(session) => render_groups(ctx, session, content, buf),
        None => render_scanning(ctx, content, buf),
    }

    render_status(ctx, status, buf);
    render_footer(ctx, footer, buf);

    match ctx.mode {
        AppMode::Help => {
            HelpOverlay::new(ctx.theme).render(area, buf);
        }
        AppMode::Renaming => {
            if let Some(input) = ctx.input_state {
                let key = input.context_key.as_deref().unwrap_or_default();
                let (_, ext) = split_extension(key);
                let prompt = format!("New name for selected {key}:");
                let hint = format!("extension {ext} is kept");
                InputModal::new(ctx.theme, input, "Rename", &prompt)
                    .hint(&hint)
                    .render(area, buf);
            }
        }
        AppMode::Search => {
            if let Some(input) = ctx.input_state {
                InputModal::new(ctx.theme, input, "Search", "Names containing (any case):")
                    .render(area, buf);
            }
        }
        _ => {}
    }
}

fn render_header(ctx: &RenderContext, area: Rect, buf: &mut Buffer) {
    let title = Span::styled(" namesake ", ctx.theme.title.add_modifier(Modifier::BOLD));
    let path = Span::styled(format!(" {} ", ctx.path.display()), ctx.theme.header);

    let mut spans = vec![title, path];

    if let Some(session) = ctx.session {
        let page_count = session.page_count();
        let page = if page_count == 0 {
            "page 0/0".to_string()
        } else {
            format!(
                "{}page {}/{}{}",
                if session.has_prev_page() { "‹ " } else { "" },
                session.current_page() + 1,
                page_count,
                if session.has_next_page() { " ›" } else { "" }
            )
        };
        spans.push(Span::styled(
            format!(
                " {}/{} names, {} assets, {page} ",
                session.view().len(),
                session.groups().len(),
                session.groups().record_count(),
            ),
            ctx.theme.header,
        ));

        if session.params().duplicates_only {
            spans.push(Span::styled(
                " duplicates ",
                Style::default()
                    .fg(ctx.theme.background)
                    .bg(ctx.theme.info),
            ));
        }

        let search = &session.params().search;
        if !search.is_empty() {
            spans.push(Span::raw(" "));
            spans.push(Span::styled(
                format!(" /{search} "),
                Style::default()
                    .fg(ctx.theme.background)
                    .bg(ctx.theme.success),
            ));
        }
    }

    Paragraph::new(Line::from(spans))
        .style(ctx.theme.header)
        .render(area, buf);
}

fn render_scanning(ctx: &RenderContext, area: Rect, buf: &mut Buffer) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(ctx.theme.border)
        .title(format!(" Scanning {} ", ctx.path.display()))
        .title_style(ctx.theme.title);

    let inner = block.inner(area);
    block.render(area, buf);

    let [label_area, gauge_area, path_area] = Layout::vertical([
        Constraint::Length(2),
        Constraint::Length(1),
        Constraint::Length(2),
    ])
    .areas(inner);

    Paragraph::new(Line::styled(
        "  Grouping assets...",
        Style::default()
            .fg(ctx.theme.info)
            .add_modifier(Modifier::BOLD),
    ))
    .render(label_area, buf);

    let Some(progress) = ctx.scan_progress else {
        return;
    };

    Gauge::default()
        .gauge_style(ctx.theme.progress_bar)
        .style(ctx.theme.progress_bg)
        .ratio(progress.fraction().clamp(0.0, 1.0))
        .label(format!("{}/{}", progress.processed, progress.total))
        .render(gauge_area, buf);

    let max_width = inner.width.saturating_sub(4) as usize;
    Paragraph::new(Line::styled(
        format!("  {}", truncate_left(&progress.current_path, max_width)),
        Style::default().fg(ctx.theme.muted),
    ))
    .render(path_area, buf);
}

fn render_groups(
    ctx: &RenderContext,
    session: &Session<ProjectHost>,
    area: Rect,
    buf: &mut Buffer,
) {
    let title = if session.params().duplicates_only {
        " Duplicate names "
    } else {
        " All names "
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(ctx.theme.border)
        .title(title)
        .title_style(ctx.theme.title);

    let inner = block.inner(area);
    block.render(area, buf);

    if ctx.rows.is_empty() {
        let msg = if session.groups().is_empty() {
            "No assets found in this project."
        } else {
            "No names match the current filters."
        };
        Paragraph::new(msg)
            .style(Style::default().fg(ctx.theme.muted))
            .render(inner, buf);
        return;
    }

    let visible_height = inner.height as usize;
    let selected = ctx.cursor.min(ctx.rows.len().saturating_sub(1));
    let scroll_offset = if selected >= visible_height {
        selected - visible_height + 1
    } else {
        0
    };

    for (i, row) in ctx
        .rows
        .iter()
        .enumerate()
        .skip(scroll_offset)
        .take(visible_height)
    {
        let y = inner.y + (i - scroll_offset) as u16;
        let line_area = Rect::new(inner.x, y, inner.width, 1);

        let mut line = match row {
            Row::Group { key } => group_line(ctx, session, key),
            Row::Member { key, index } => member_line(ctx, session, key, *index, inner.width),
        };

        if i == selected {
            line = line.style(ctx.theme.selected);
        }
        Paragraph::new(line).render(line_area, buf);
    }
}

fn group_line(ctx: &RenderContext, session: &Session<ProjectHost>, key: &str) -> Line<'static> {
    let members = session.groups().get(key).unwrap_or_default();
    let ui = session.view().get(key);
    let expanded = ui.is_some_and(|ui| ui.expanded);
    let selected = members.iter().filter(|m| m.is_selected()).count();

    let mut spans = vec![
        Span::styled(if expanded { " ▼ " } else { " ▶ " }, ctx.theme.tree_lines),
        Span::styled(key.to_string(), ctx.theme.group),
        Span::styled(format!(" [{}]", members.len()), ctx.theme.count),
    ];

    if selected > 0 {
        spans.push(Span::styled(format!("  {selected} selected"), ctx.theme.marked));
    }

    if let Some(ui) = ui.filter(|ui| ui.expanded) {
        let window = member_window(members.len(), ui.scroll);
        if window.len() < members.len() {
            spans.push(Span::styled(
                format!(
                    "  {}-{} of {}",
                    window.start + 1,
                    window.end,
                    members.len()
                ),
                Style::default().fg(ctx.theme.muted),
            ));
        }
        if !ui.pending_name.is_empty() && ui.pending_name != split_extension(key).0 {
            spans.push(Span::styled(
                format!("  → {}", ui.pending_name),
                Style::default().fg(ctx.theme.muted),
            ));
        }
    }

    Line::from(spans)
}

fn member_line(
    ctx: &RenderContext,
    session: &Session<ProjectHost>,
    key: &str,
    index: usize,
    width: u16,
) -> Line<'static> {
    let Some(record) = session.groups().get(key).and_then(|m| m.get(index)) else {
        return Line::raw("");
    };

    let last = session
        .groups()
        .get(key)
        .is_some_and(|m| index + 1 == m.len());
    let branch = if last { "   └ " } else { "   ├ " };

    let (checkbox, checkbox_style) = if record.is_selected() {
        ("[x] ", ctx.theme.marked)
    } else {
        ("[ ] ", ctx.theme.member)
    };

    let details = record
        .thumbnail()
        .map(|thumb| {
            let modified = thumb
                .modified
                .map(format_relative_time)
                .unwrap_or_default();
            format!("  {:>10}  {}", format_size(thumb.size), modified)
        })
        .unwrap_or_default();

    let used = branch.chars().count() + checkbox.len() + details.chars().count();
    let path = truncate_left(record.path(), (width as usize).saturating_sub(used));

    Line::from(vec![
        Span::styled(branch, ctx.theme.tree_lines),
        Span::styled(checkbox, checkbox_style),
        Span::styled(path, ctx.theme.member),
        Span::styled(details, Style::default().fg(ctx.theme.muted)),
    ])
}

fn render_status(ctx: &RenderContext, area: Rect, buf: &mut Buffer) {
    let Some(status) = ctx.status else {
        return;
    };
    let color = if status.success {
        ctx.theme.success
    } else {
        ctx.theme.error
    };
    Paragraph::new(Line::styled(
        format!(" {}", status.text),
        Style::default().fg(color),
    ))
    .render(area, buf);
}

fn render_footer(ctx: &RenderContext, area: Rect, buf: &mut Buffer) {
    let mut keys: Vec<(&str, &str)> = if ctx.session.is_some() {
        vec![
            ("j/k", "Nav"),
            ("o", "Open"),
            ("Spc", "Sel"),
            ("r", "Rename"),
            ("[/]", "Page"),
            ("/", "Search"),
            ("d", "Dups"),
        ]
    } else {
        Vec::new()
    };

    keys.extend([("?", "Help"), ("q", "Quit")]);

    let spans: Vec<Span> = keys
        .iter()
        .flat_map(|(key, desc)| {
            vec![
                Span::styled(format!(" {key} "), ctx.theme.help_key),
                Span::styled(format!("{desc} "), ctx.theme.help_desc),
            ]
        })
        .collect();

    Paragraph::new(Line::from(spans))
        .style(ctx.theme.footer)
        .render(area, buf);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    use namesake_core::ScanConfig;

    use crate::app::rows::build_rows;

    fn buffer_text(buf: &Buffer) -> String {
        let area = buf.area;
        let mut out = String::new();
        for y in area.y..area.y + area.height {
            for x in area.x..area.x + area.width {
                out.push_str(buf[(x, y)].symbol());
            }
            out.push('\n');
        }
        out
    }

    fn project() -> (TempDir, Session<ProjectHost>) {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("project");
        for rel in ["Assets/a/icon.png", "Assets/b/icon.png", "Assets/c/logo.png"] {
            let path = root.join(rel);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, b"png").unwrap();
        }
        let config = ScanConfig::new(&root);
        let host = ProjectHost::open(config.clone()).unwrap();
        let mut session = Session::new(host, config);
        session.scan().unwrap();
        (temp, session)
    }

    #[test]
    fn test_renders_groups_and_members() {
        let (_temp, mut session) = project();
        session.set_expanded("icon.png", true).unwrap();
        session.set_selected("icon.png", 1, true).unwrap();

        let theme = Theme::dark();
        let rows = build_rows(&session.current_entries());
        let status = StatusMessage::ok("Found 1 names");
        let ctx = RenderContext {
            mode: AppMode::Normal,
            theme: &theme,
            path: std::path::Path::new("/project"),
            session: Some(&session),
            rows: &rows,
            cursor: 0,
            scan_progress: None,
            status: Some(&status),
            input_state: None,
        };

        let area = Rect::new(0, 0, 80, 12);
        let mut buf = Buffer::empty(area);
        render_app(&ctx, area, &mut buf);
        let text = buffer_text(&buf);

        assert!(text.contains("▼ icon.png [2]"));
        assert!(text.contains("1 selected"));
        assert!(text.contains("[ ] Assets/a/icon.png"));
        assert!(text.contains("[x] Assets/b/icon.png"));
        assert!(text.contains("page 1/1"));
        assert!(text.contains("Found 1 names"));
        // Single-member group is filtered out
        assert!(!text.contains("logo.png"));
    }

    #[test]
    fn test_renders_scan_progress() {
        let theme = Theme::dark();
        let progress = ScanProgress {
            processed: 30,
            total: 60,
            current_path: "Assets/a/icon.png".to_string(),
        };
        let ctx = RenderContext {
            mode: AppMode::Normal,
            theme: &theme,
            path: std::path::Path::new("/project"),
            session: None,
            rows: &[],
            cursor: 0,
            scan_progress: Some(&progress),
            status: None,
            input_state: None,
        };

        let area = Rect::new(0, 0, 60, 10);
        let mut buf = Buffer::empty(area);
        render_app(&ctx, area, &mut buf);
        let text = buffer_text(&buf);

        assert!(text.contains("Scanning /project"));
        assert!(text.contains("30/60"));
        assert!(text.contains("Assets/a/icon.png"));
    }
}
