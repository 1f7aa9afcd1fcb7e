#![cfg(not(coverage))]

use jd_core::ViewMode;
use jd_runtime::{CounterStore, DialogueController};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Wrap};
use ratatui::Frame;

use crate::tui_state::{menu_rows, transcript_lines, TuiUiState, MENU_VIEWPORT_ROWS};

const ELLIPSIS: &str = "…";

pub(crate) struct TuiRenderContext {
    pub(crate) catalog_id: String,
    pub(crate) store_file: String,
}

pub(crate) fn render_tui<S: CounterStore>(
    frame: &mut Frame<'_>,
    controller: &DialogueController<S>,
    ui: &TuiUiState,
    context: &TuiRenderContext,
) {
    let terminal_width = frame.area().width as usize;
    let terminal_rows = frame.area().height as usize;

    let content_width = (terminal_width.saturating_sub(2)).max(16);
    let wrapped_text_rows = transcript_lines(controller)
        .iter()
        .flat_map(|line| wrap_line_to_width(line, content_width))
        .collect::<Vec<_>>();

    let rows = menu_rows(controller);
    let menu_header_raw = match controller.view() {
        ViewMode::Intro => "pick a scenario (up/down + enter):",
        ViewMode::Chat if controller.options_ready() => "your answer (up/down + enter):",
        ViewMode::Chat if controller.is_typing() => "typing...",
        ViewMode::Chat => " ",
        ViewMode::AllMessages => " ",
    };
    let menu_header_text = truncate_to_width(menu_header_raw, content_width);

    let mut reserved_rows = 3usize + 1usize + 1usize + MENU_VIEWPORT_ROWS + 1usize + 1usize;
    if ui.help_visible {
        reserved_rows += 1;
    }
    let visible_text_rows = terminal_rows.saturating_sub(reserved_rows).max(1);
    let clipped_text_rows = if wrapped_text_rows.len() <= visible_text_rows {
        wrapped_text_rows
    } else {
        wrapped_text_rows[wrapped_text_rows.len() - visible_text_rows..].to_vec()
    };

    let row_text_width = content_width.saturating_sub(2).max(8);
    let visible_menu_rows = (0..MENU_VIEWPORT_ROWS)
        .map(|row_index| {
            let absolute_index = ui.scroll_offset + row_index;
            let Some(row) = rows.get(absolute_index) else {
                return (" ".to_string(), false);
            };
            let first_line = row.text.lines().next().unwrap_or_default();
            (
                truncate_to_width(first_line, row_text_width),
                absolute_index == ui.selected_index,
            )
        })
        .collect::<Vec<_>>();

    let window_text = if rows.len() > MENU_VIEWPORT_ROWS {
        truncate_to_width(
            format!(
                "window {}-{} / {}",
                ui.scroll_offset + 1,
                (ui.scroll_offset + MENU_VIEWPORT_ROWS).min(rows.len()),
                rows.len()
            )
            .as_str(),
            content_width,
        )
    } else {
        " ".to_string()
    };

    let header_text = truncate_to_width(
        format!("jabdori | {}", context.catalog_id).as_str(),
        content_width,
    );
    let store_text = truncate_to_width(
        format!("store: {}", context.store_file).as_str(),
        content_width,
    );
    let status_text = truncate_to_width(format!("status: {}", ui.status).as_str(), content_width);
    let divider_line = "─".repeat(content_width);
    let key_text = truncate_to_width(
        "keys: up/down move | enter select | a all messages | b home | h help | q quit",
        content_width,
    );
    let help_text = truncate_to_width(
        "answers appear once the question is fully typed. closing messages rotate per answer and persist in the store file.",
        content_width,
    );

    let mut lines_out: Vec<Line<'_>> = Vec::new();
    lines_out.push(Line::from(header_text));
    lines_out.push(Line::from(Span::styled(
        store_text,
        Style::default().fg(Color::Gray),
    )));
    lines_out.push(Line::from(Span::styled(
        status_text,
        Style::default().fg(Color::Gray),
    )));
    for row in clipped_text_rows {
        lines_out.push(Line::from(row));
    }
    lines_out.push(Line::from(Span::styled(
        divider_line,
        Style::default().fg(Color::Gray),
    )));
    lines_out.push(Line::from(Span::styled(
        menu_header_text,
        Style::default().fg(Color::Cyan),
    )));
    for (text, selected) in visible_menu_rows {
        let prefix = if selected { "> " } else { "  " };
        let style = if selected {
            Style::default().fg(Color::Green)
        } else {
            Style::default()
        };
        lines_out.push(Line::from(Span::styled(
            format!("{}{}", prefix, text),
            style,
        )));
    }
    lines_out.push(Line::from(Span::styled(
        window_text,
        Style::default().fg(Color::Gray),
    )));
    lines_out.push(Line::from(Span::styled(
        key_text,
        Style::default().fg(Color::Yellow),
    )));
    if ui.help_visible {
        lines_out.push(Line::from(Span::styled(
            help_text,
            Style::default().fg(Color::Magenta),
        )));
    }

    let paragraph = Paragraph::new(lines_out).wrap(Wrap { trim: false });
    frame.render_widget(paragraph, frame.area());
}

fn truncate_to_width(value: &str, width: usize) -> String {
    if width == 0 {
        return String::new();
    }
    let chars = value.chars().collect::<Vec<_>>();
    if chars.len() <= width {
        return value.to_string();
    }
    if width == 1 {
        return ELLIPSIS.to_string();
    }
    let mut out = chars.into_iter().take(width - 1).collect::<String>();
    out.push_str(ELLIPSIS);
    out
}

fn wrap_line_to_width(value: &str, width: usize) -> Vec<String> {
    if width == 0 {
        return vec![String::new()];
    }
    let chars = value.chars().collect::<Vec<_>>();
    if chars.is_empty() {
        return vec![String::new()];
    }
    chars
        .chunks(width)
        .map(|chunk| chunk.iter().collect())
        .collect()
}
