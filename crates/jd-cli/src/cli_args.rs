use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use jd_runtime::DialogueTiming;

#[derive(Debug, Parser)]
#[command(name = "jabdori-chat")]
#[command(about = "Scripted dialogue chat with rotating closing messages")]
pub(crate) struct Cli {
    #[arg(long = "log-level", global = true, default_value = "warn")]
    pub(crate) log_level: String,
    #[command(subcommand)]
    pub(crate) command: Mode,
}

#[derive(Debug, Subcommand)]
pub(crate) enum Mode {
    Agent(AgentArgs),
    Tui(TuiArgs),
    Check(CatalogArgs),
}

#[derive(Debug, Args)]
pub(crate) struct AgentArgs {
    #[command(subcommand)]
    pub(crate) command: AgentCommand,
}

#[derive(Debug, Subcommand)]
pub(crate) enum AgentCommand {
    Scenarios(CatalogArgs),
    Run(RunArgs),
    Messages(CatalogArgs),
}

#[derive(Debug, Clone, Default, Args)]
pub(crate) struct CatalogArgs {
    #[arg(long = "catalog-dir")]
    pub(crate) catalog_dir: Option<String>,
}

#[derive(Debug, Args)]
pub(crate) struct RunArgs {
    #[arg(long = "catalog-dir")]
    pub(crate) catalog_dir: Option<String>,
    #[arg(long = "store-file")]
    pub(crate) store_file: Option<String>,
    #[arg(long = "scenario")]
    pub(crate) scenario: String,
    #[arg(long = "choice")]
    pub(crate) choices: Vec<usize>,
}

#[derive(Debug, Args)]
pub(crate) struct TuiArgs {
    #[arg(long = "catalog-dir")]
    pub(crate) catalog_dir: Option<String>,
    #[arg(long = "store-file")]
    pub(crate) store_file: Option<String>,
    #[command(flatten)]
    pub(crate) timing: TimingArgs,
}

#[derive(Debug, Clone, Default, Args)]
pub(crate) struct TimingArgs {
    #[arg(long = "type-interval-ms")]
    pub(crate) type_interval_ms: Option<u64>,
    #[arg(long = "start-delay-ms")]
    pub(crate) start_delay_ms: Option<u64>,
    #[arg(long = "step-delay-ms")]
    pub(crate) step_delay_ms: Option<u64>,
    #[arg(long = "closing-delay-ms")]
    pub(crate) closing_delay_ms: Option<u64>,
}

impl TimingArgs {
    pub(crate) fn timing(&self) -> DialogueTiming {
        let defaults = DialogueTiming::default();
        let or_default =
            |value: Option<u64>, default: Duration| value.map_or(default, Duration::from_millis);
        DialogueTiming {
            type_interval: or_default(self.type_interval_ms, defaults.type_interval),
            start_delay: or_default(self.start_delay_ms, defaults.start_delay),
            step_delay: or_default(self.step_delay_ms, defaults.step_delay),
            closing_delay: or_default(self.closing_delay_ms, defaults.closing_delay),
        }
    }
}
