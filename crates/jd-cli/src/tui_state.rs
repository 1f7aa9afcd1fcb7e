use jd_core::{Speaker, ViewMode};
use jd_runtime::{CounterStore, DialogueController, TypingTarget};

pub(crate) const MENU_VIEWPORT_ROWS: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum MenuAction {
    StartScenario { key: String, label: String },
    BrowseAll,
    Choose(usize),
    ReturnHome,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct MenuRow {
    pub(crate) text: String,
    pub(crate) action: MenuAction,
}

impl MenuRow {
    fn new(text: impl Into<String>, action: MenuAction) -> Self {
        Self {
            text: text.into(),
            action,
        }
    }
}

/// Actions the current view offers, in display order.
pub(crate) fn menu_rows<S: CounterStore>(controller: &DialogueController<S>) -> Vec<MenuRow> {
    let ui = &controller.catalog().ui;
    match controller.view() {
        ViewMode::Intro => {
            let mut rows = controller
                .catalog()
                .scenarios
                .iter()
                .map(|scenario| {
                    MenuRow::new(
                        scenario.label.clone(),
                        MenuAction::StartScenario {
                            key: scenario.key.clone(),
                            label: scenario.label.clone(),
                        },
                    )
                })
                .collect::<Vec<_>>();
            rows.push(MenuRow::new(ui.browse_all_label.clone(), MenuAction::BrowseAll));
            rows
        }
        ViewMode::Chat => {
            let mut rows = Vec::new();
            if controller.options_ready() {
                if let Some(step) = controller.pending_step() {
                    rows.extend(step.options.iter().enumerate().map(|(index, option)| {
                        MenuRow::new(option.label.clone(), MenuAction::Choose(index))
                    }));
                }
            }
            rows.push(MenuRow::new(
                ui.return_home_label.clone(),
                MenuAction::ReturnHome,
            ));
            rows
        }
        ViewMode::AllMessages => vec![MenuRow::new(
            ui.return_home_label.clone(),
            MenuAction::ReturnHome,
        )],
    }
}

/// Applies a menu action to the controller.
pub(crate) fn apply_menu_action<S: CounterStore>(
    controller: &mut DialogueController<S>,
    action: &MenuAction,
) -> Result<(), jd_core::JabdoriError> {
    match action {
        MenuAction::StartScenario { key, label } => controller.start_scenario(key, label),
        MenuAction::BrowseAll => controller.show_all_messages(),
        MenuAction::Choose(index) => controller.choose(*index)?,
        MenuAction::ReturnHome => controller.reset_to_home(),
    }
    Ok(())
}

pub(crate) fn speaker_prefix(speaker: Speaker) -> &'static str {
    match speaker {
        Speaker::Bot => "bot: ",
        Speaker::User => "you: ",
    }
}

/// Text rows of the current view. Multi-line messages keep their line
/// breaks; continuation rows are indented under the speaker prefix.
pub(crate) fn transcript_lines<S: CounterStore>(controller: &DialogueController<S>) -> Vec<String> {
    let ui = &controller.catalog().ui;
    let mut lines = Vec::new();
    match controller.view() {
        ViewMode::Intro => {
            lines.extend(ui.title.lines().map(str::to_string));
        }
        ViewMode::Chat => {
            let typing_target = controller.typing_target();
            for (index, entry) in controller.history().iter().enumerate() {
                let text = if typing_target == Some(TypingTarget::Entry(index)) {
                    controller.typewriter().visible()
                } else {
                    entry.text.as_str()
                };
                push_prefixed(&mut lines, speaker_prefix(entry.speaker), text);
            }
            if let Some(step) = controller.pending_step() {
                let text = if typing_target == Some(TypingTarget::PendingQuestion) {
                    controller.typewriter().visible()
                } else {
                    step.question.as_str()
                };
                push_prefixed(&mut lines, speaker_prefix(Speaker::Bot), text);
            }
        }
        ViewMode::AllMessages => {
            lines.push(ui.all_messages_header.clone());
            for (index, message) in controller.all_messages().iter().enumerate() {
                push_prefixed(&mut lines, &format!("{}. ", index + 1), message);
            }
        }
    }
    lines
}

fn push_prefixed(lines: &mut Vec<String>, prefix: &str, text: &str) {
    let indent = " ".repeat(prefix.chars().count());
    let mut parts = text.split('\n');
    lines.push(format!("{}{}", prefix, parts.next().unwrap_or_default()));
    for part in parts {
        lines.push(format!("{}{}", indent, part));
    }
}

#[derive(Debug, Default)]
pub(crate) struct TuiUiState {
    pub(crate) selected_index: usize,
    pub(crate) scroll_offset: usize,
    pub(crate) help_visible: bool,
    pub(crate) status: String,
}

impl TuiUiState {
    pub(crate) fn reset_selection(&mut self) {
        self.selected_index = 0;
        self.scroll_offset = 0;
    }

    /// Keeps the selection inside `row_count` rows after the menu changed.
    pub(crate) fn clamp_selection(&mut self, row_count: usize) {
        let last = row_count.saturating_sub(1);
        if self.selected_index > last {
            self.selected_index = last;
        }
        if self.scroll_offset > self.selected_index {
            self.scroll_offset = self.selected_index;
        }
    }

    pub(crate) fn move_up(&mut self) {
        self.selected_index = self.selected_index.saturating_sub(1);
        if self.selected_index < self.scroll_offset {
            self.scroll_offset = self.selected_index;
        }
    }

    pub(crate) fn move_down(&mut self, row_count: usize) {
        let last = row_count.saturating_sub(1);
        self.selected_index = (self.selected_index + 1).min(last);
        if row_count > MENU_VIEWPORT_ROWS
            && self.selected_index >= self.scroll_offset + MENU_VIEWPORT_ROWS
        {
            self.scroll_offset = self.selected_index + 1 - MENU_VIEWPORT_ROWS;
        }
    }
}
