use std::ffi::OsString;

use clap::Parser;
use jd_catalog::check_catalog;
use jd_core::JabdoriError;

mod agent;
mod cli_args;
mod counter_store;
mod error_map;
mod line_tui;
mod logging;
mod models;
mod session_runner;
mod source_loader;
mod tui;
#[cfg(not(coverage))]
mod tui_actions;
#[cfg(not(coverage))]
mod tui_render;
mod tui_state;

pub(crate) use cli_args::{
    AgentArgs, AgentCommand, CatalogArgs, Cli, Mode, RunArgs, TuiArgs,
};
pub(crate) use error_map::{
    emit_error, json_string, map_cli_source_path, map_cli_source_read, map_cli_source_scan,
    map_cli_store_encode, map_cli_store_read, map_cli_store_write, map_tui_io,
};
pub(crate) use line_tui::run_tui_line_mode;
pub(crate) use models::{
    LoadedCatalog, SessionEvent, SessionReport, TuiCommandAction, BUILTIN_CATALOG_ID,
    DEFAULT_STORE_FILE,
};
pub(crate) use session_runner::{emit_report, run_scripted_session, settle};
pub(crate) use source_loader::load_catalog;
#[cfg(test)]
pub(crate) use source_loader::load_catalog_by_dir;

pub fn run_cli_from_args<I, T>(args: I) -> i32
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let cli = match Cli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(error) => {
            let _ = error.print();
            return error.exit_code();
        }
    };
    logging::init_logging(&cli.log_level);
    match run(cli) {
        Ok(code) => code,
        Err(error) => emit_error(error),
    }
}

fn run(cli: Cli) -> Result<i32, JabdoriError> {
    match cli.command {
        Mode::Agent(args) => agent::run_agent(args),
        Mode::Tui(args) => run_tui(args),
        Mode::Check(args) => run_check(args),
    }
}

fn run_tui(args: TuiArgs) -> Result<i32, JabdoriError> {
    let loaded = load_catalog(args.catalog_dir.as_deref())?;
    let store_file = args
        .store_file
        .unwrap_or_else(|| DEFAULT_STORE_FILE.to_string());
    tui::run_tui_mode(&store_file, loaded, args.timing.timing())
}

fn run_check(args: CatalogArgs) -> Result<i32, JabdoriError> {
    let loaded = load_catalog(args.catalog_dir.as_deref())?;
    let issues = check_catalog(&loaded.catalog);
    if issues.is_empty() {
        println!("RESULT:OK");
        return Ok(0);
    }

    println!("RESULT:ISSUES");
    for issue in &issues {
        println!("ISSUE:{}|{}", issue.code(), json_string(&issue.message()));
    }
    Ok(1)
}

#[cfg(test)]
mod cli_test_support;
