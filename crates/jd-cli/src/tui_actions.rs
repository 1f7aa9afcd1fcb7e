use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use jd_core::JabdoriError;
use jd_runtime::{CounterStore, DialogueController};

use crate::tui_state::{apply_menu_action, menu_rows, MenuAction, TuiUiState};

/// Returns `Ok(true)` when the UI should quit.
pub(crate) fn handle_key<S: CounterStore>(
    key: KeyEvent,
    controller: &mut DialogueController<S>,
    ui: &mut TuiUiState,
) -> Result<bool, JabdoriError> {
    if key.code == KeyCode::Esc || matches!(key.code, KeyCode::Char('q')) {
        return Ok(true);
    }
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return Ok(true);
    }

    let rows = menu_rows(controller);
    match key.code {
        KeyCode::Char('h') => {
            ui.help_visible = !ui.help_visible;
        }
        KeyCode::Char('b') => {
            apply_menu_action(controller, &MenuAction::ReturnHome)?;
            ui.reset_selection();
            ui.status = "home".to_string();
        }
        KeyCode::Char('a') => {
            apply_menu_action(controller, &MenuAction::BrowseAll)?;
            ui.reset_selection();
            ui.status = "all messages".to_string();
        }
        KeyCode::Up => ui.move_up(),
        KeyCode::Down => ui.move_down(rows.len()),
        KeyCode::Enter => {
            let row = rows.get(ui.selected_index).ok_or_else(|| {
                JabdoriError::new("TUI_SELECTION_EMPTY", "Nothing to select")
            })?;
            apply_menu_action(controller, &row.action)?;
            ui.status = match &row.action {
                MenuAction::StartScenario { key, .. } => format!("started {}", key),
                MenuAction::BrowseAll => "all messages".to_string(),
                MenuAction::Choose(index) => format!("chose {}", index),
                MenuAction::ReturnHome => "home".to_string(),
            };
            ui.reset_selection();
        }
        _ => {}
    }

    Ok(false)
}
