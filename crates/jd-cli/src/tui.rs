use jd_core::JabdoriError;
use jd_runtime::DialogueTiming;

use crate::LoadedCatalog;

#[cfg(coverage)]
pub(crate) fn run_tui_mode(
    store_file: &str,
    loaded: LoadedCatalog,
    timing: DialogueTiming,
) -> Result<i32, JabdoriError> {
    crate::run_tui_line_mode(store_file, loaded, timing)
}

/// Rich terminal UI on a TTY, line mode when stdin or stdout is redirected.
#[cfg(not(coverage))]
pub(crate) fn run_tui_mode(
    store_file: &str,
    loaded: LoadedCatalog,
    timing: DialogueTiming,
) -> Result<i32, JabdoriError> {
    use std::io::IsTerminal;

    if !std::io::stdin().is_terminal() || !std::io::stdout().is_terminal() {
        return crate::run_tui_line_mode(store_file, loaded, timing);
    }
    rich::run_tui_ratatui_mode(store_file, loaded, timing)
}

#[cfg(not(coverage))]
mod rich {
    use std::io;
    use std::path::Path;
    use std::time::{Duration, Instant};

    use crossterm::event::{self, Event, KeyEventKind};
    use crossterm::terminal::{
        disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
    };
    use crossterm::ExecutableCommand;
    use jd_core::JabdoriError;
    use jd_runtime::{DialogueController, DialogueTiming};
    use ratatui::backend::CrosstermBackend;
    use ratatui::Terminal;
    use tracing::debug;

    use crate::counter_store::FileCounterStore;
    use crate::tui_actions::handle_key;
    use crate::tui_render::{render_tui, TuiRenderContext};
    use crate::tui_state::{menu_rows, TuiUiState};
    use crate::{map_tui_io, LoadedCatalog};

    const FRAME_INTERVAL_MS: u64 = 16;

    struct TuiTerminal {
        terminal: Terminal<CrosstermBackend<io::Stdout>>,
    }

    impl TuiTerminal {
        fn new() -> Result<Self, JabdoriError> {
            enable_raw_mode().map_err(map_tui_io)?;
            io::stdout()
                .execute(EnterAlternateScreen)
                .map_err(map_tui_io)?;
            let backend = CrosstermBackend::new(io::stdout());
            let terminal = Terminal::new(backend).map_err(map_tui_io)?;
            Ok(Self { terminal })
        }

        fn terminal_mut(&mut self) -> &mut Terminal<CrosstermBackend<io::Stdout>> {
            &mut self.terminal
        }
    }

    impl Drop for TuiTerminal {
        fn drop(&mut self) {
            let _ = disable_raw_mode();
            let _ = io::stdout().execute(LeaveAlternateScreen);
        }
    }

    pub(super) fn run_tui_ratatui_mode(
        store_file: &str,
        loaded: LoadedCatalog,
        timing: DialogueTiming,
    ) -> Result<i32, JabdoriError> {
        let store = FileCounterStore::open(Path::new(store_file))?;
        let render_context = TuiRenderContext {
            catalog_id: loaded.id.clone(),
            store_file: store_file.to_string(),
        };
        let mut controller = DialogueController::new(loaded.catalog, store, timing);
        let mut terminal = TuiTerminal::new()?;
        let mut ui = TuiUiState {
            status: "ready".to_string(),
            ..TuiUiState::default()
        };

        let frame = Duration::from_millis(FRAME_INTERVAL_MS);
        let mut last_advance = Instant::now();

        loop {
            // Timers run on the controller's clock; feed it wall time.
            let now = Instant::now();
            controller.advance(now.duration_since(last_advance));
            last_advance = now;
            for dialogue_event in controller.drain_events() {
                debug!(event = ?dialogue_event, "dialogue event");
            }
            ui.clamp_selection(menu_rows(&controller).len());

            terminal
                .terminal_mut()
                .draw(|frame| render_tui(frame, &controller, &ui, &render_context))
                .map_err(map_tui_io)?;

            if !event::poll(frame).map_err(map_tui_io)? {
                continue;
            }

            let evt = event::read().map_err(map_tui_io)?;
            if let Event::Key(key) = evt {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                let should_quit = match handle_key(key, &mut controller, &mut ui) {
                    Ok(should_quit) => should_quit,
                    Err(error) => {
                        ui.status = error.message;
                        false
                    }
                };
                if should_quit {
                    break;
                }
            }
        }

        Ok(0)
    }
}
