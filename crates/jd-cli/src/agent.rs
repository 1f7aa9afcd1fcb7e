use std::path::Path;

use jd_core::JabdoriError;
use jd_runtime::{DialogueController, DialogueTiming};

use crate::counter_store::FileCounterStore;
use crate::{
    emit_report, json_string, load_catalog, run_scripted_session, AgentArgs, AgentCommand,
    CatalogArgs, RunArgs, DEFAULT_STORE_FILE,
};

pub(super) fn run_agent(args: AgentArgs) -> Result<i32, JabdoriError> {
    match args.command {
        AgentCommand::Scenarios(args) => run_scenarios(args),
        AgentCommand::Run(args) => run_session(args),
        AgentCommand::Messages(args) => run_messages(args),
    }
}

pub(super) fn run_scenarios(args: CatalogArgs) -> Result<i32, JabdoriError> {
    let loaded = load_catalog(args.catalog_dir.as_deref())?;
    println!("RESULT:OK");
    for scenario in &loaded.catalog.scenarios {
        println!("SCENARIO:{}|{}", scenario.key, json_string(&scenario.label));
    }
    Ok(0)
}

pub(super) fn run_session(args: RunArgs) -> Result<i32, JabdoriError> {
    let loaded = load_catalog(args.catalog_dir.as_deref())?;
    let label = loaded
        .catalog
        .scenario(&args.scenario)
        .map(|scenario| scenario.label.clone())
        .ok_or_else(|| {
            JabdoriError::new(
                "CLI_SCENARIO_UNKNOWN",
                format!("Unknown scenario key: {}", args.scenario),
            )
        })?;

    let store_file = args.store_file.as_deref().unwrap_or(DEFAULT_STORE_FILE);
    let store = FileCounterStore::open(Path::new(store_file))?;
    // Agent sessions run on the virtual clock, so delays cost nothing.
    let mut controller = DialogueController::new(loaded.catalog, store, DialogueTiming::default());
    let report = run_scripted_session(&mut controller, &args.scenario, &label, &args.choices)?;
    emit_report(&report);
    Ok(0)
}

pub(super) fn run_messages(args: CatalogArgs) -> Result<i32, JabdoriError> {
    let loaded = load_catalog(args.catalog_dir.as_deref())?;
    println!("RESULT:OK");
    for message in loaded.catalog.pools.default_pool() {
        println!("MESSAGE_JSON:{}", json_string(message));
    }
    Ok(0)
}
