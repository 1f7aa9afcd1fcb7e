use std::io::{self, BufRead, Write};
use std::path::Path;

use jd_core::{JabdoriError, Speaker, ViewMode};
use jd_runtime::{CounterStore, DialogueController, DialogueTiming};

use crate::counter_store::FileCounterStore;
use crate::tui_state::{apply_menu_action, menu_rows, speaker_prefix, MenuAction};
use crate::{map_tui_io, settle, LoadedCatalog, TuiCommandAction};

const LINE_HELP: &str = "commands: :help :home :all :quit";

pub(crate) fn run_tui_line_mode(
    store_file: &str,
    loaded: LoadedCatalog,
    timing: DialogueTiming,
) -> Result<i32, JabdoriError> {
    let store = FileCounterStore::open(Path::new(store_file))?;
    let mut controller = DialogueController::new(loaded.catalog, store, timing);
    let stdin = io::stdin();
    let mut reader = stdin.lock();
    let mut writer = io::stdout();
    run_tui_line_mode_with_io(&mut controller, &mut reader, &mut writer)
}

/// Line front-end: timers settle instantly, new transcript rows are printed
/// once, and the current menu is offered as numbered rows.
pub(crate) fn run_tui_line_mode_with_io<S: CounterStore>(
    controller: &mut DialogueController<S>,
    reader: &mut dyn BufRead,
    writer: &mut dyn Write,
) -> Result<i32, JabdoriError> {
    writeln!(writer, "Jabdori chat").map_err(map_tui_io)?;
    writeln!(writer, "{}", LINE_HELP).map_err(map_tui_io)?;
    let mut transcript = LineTranscript::default();

    loop {
        settle(controller);
        transcript.print_new(controller, writer)?;

        let rows = menu_rows(controller);
        writeln!(writer).map_err(map_tui_io)?;
        for (index, row) in rows.iter().enumerate() {
            writeln!(writer, "  [{}] {}", index, row.text).map_err(map_tui_io)?;
        }

        loop {
            let Some(raw) = prompt_input_from("> ", reader, writer)? else {
                return Ok(0);
            };
            let mut emit = |line: String| writeln!(writer, "{}", line);
            let action = handle_line_command(raw.trim(), controller, &mut emit)?;
            match action {
                TuiCommandAction::Continue => break,
                TuiCommandAction::Quit => return Ok(0),
                TuiCommandAction::NotHandled => {}
            }

            let Some(row) = raw
                .trim()
                .parse::<usize>()
                .ok()
                .and_then(|index| rows.get(index))
            else {
                writeln!(writer, "invalid selection: {}", raw).map_err(map_tui_io)?;
                continue;
            };
            if let MenuAction::Choose(_) = row.action {
                transcript.skip_answered_question();
            }
            apply_menu_action(controller, &row.action)?;
            break;
        }
    }
}

pub(crate) fn handle_line_command<S: CounterStore>(
    raw: &str,
    controller: &mut DialogueController<S>,
    emit: &mut dyn FnMut(String) -> io::Result<()>,
) -> Result<TuiCommandAction, JabdoriError> {
    match raw {
        ":help" => {
            emit(LINE_HELP.to_string()).map_err(map_tui_io)?;
            Ok(TuiCommandAction::Continue)
        }
        ":home" => {
            controller.reset_to_home();
            Ok(TuiCommandAction::Continue)
        }
        ":all" => {
            controller.show_all_messages();
            Ok(TuiCommandAction::Continue)
        }
        ":quit" => {
            emit("bye".to_string()).map_err(map_tui_io)?;
            Ok(TuiCommandAction::Quit)
        }
        _ => Ok(TuiCommandAction::NotHandled),
    }
}

/// Tracks which parts of the current view were already printed.
#[derive(Debug, Default)]
struct LineTranscript {
    view: Option<ViewMode>,
    printed_entries: usize,
    shown_question: Option<String>,
}

impl LineTranscript {
    /// The chosen question moves from "pending" into history; it was printed
    /// already.
    fn skip_answered_question(&mut self) {
        if self.shown_question.take().is_some() {
            self.printed_entries += 1;
        }
    }

    fn print_new<S: CounterStore>(
        &mut self,
        controller: &DialogueController<S>,
        writer: &mut dyn Write,
    ) -> Result<(), JabdoriError> {
        let view = controller.view();
        let entered_view = self.view != Some(view);
        if entered_view {
            self.view = Some(view);
            self.printed_entries = 0;
            self.shown_question = None;
        }

        match view {
            ViewMode::Intro => {
                if entered_view {
                    writeln!(writer).map_err(map_tui_io)?;
                    writeln!(writer, "{}", controller.catalog().ui.title).map_err(map_tui_io)?;
                }
            }
            ViewMode::AllMessages => {
                if entered_view {
                    writeln!(writer).map_err(map_tui_io)?;
                    writeln!(writer, "{}", controller.catalog().ui.all_messages_header)
                        .map_err(map_tui_io)?;
                    for (index, message) in controller.all_messages().iter().enumerate() {
                        writeln!(writer, "{}. {}", index + 1, message).map_err(map_tui_io)?;
                    }
                }
            }
            ViewMode::Chat => {
                // A fresh scenario clears history without leaving the view.
                if controller.history().len() < self.printed_entries {
                    self.printed_entries = 0;
                    self.shown_question = None;
                }
                for entry in &controller.history()[self.printed_entries..] {
                    writeln!(writer, "{}{}", speaker_prefix(entry.speaker), entry.text)
                        .map_err(map_tui_io)?;
                }
                self.printed_entries = controller.history().len();

                if let Some(step) = controller.pending_step() {
                    if self.shown_question.as_deref() != controller.pending_step_id() {
                        writeln!(writer, "{}{}", speaker_prefix(Speaker::Bot), step.question)
                            .map_err(map_tui_io)?;
                        self.shown_question = controller.pending_step_id().map(str::to_string);
                    }
                }
            }
        }
        Ok(())
    }
}

/// Reads one line; `None` at end of input.
pub(crate) fn prompt_input_from(
    prefix: &str,
    reader: &mut dyn BufRead,
    writer: &mut dyn Write,
) -> Result<Option<String>, JabdoriError> {
    write!(writer, "{}", prefix).map_err(map_tui_io)?;
    writer.flush().map_err(map_tui_io)?;
    let mut input = String::new();
    let read = reader.read_line(&mut input).map_err(map_tui_io)?;
    if read == 0 {
        return Ok(None);
    }
    Ok(Some(input.trim_end_matches(&['\r', '\n'][..]).to_string()))
}
