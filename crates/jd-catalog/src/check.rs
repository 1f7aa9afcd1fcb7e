use std::collections::BTreeSet;
use std::sync::OnceLock;

use jd_core::Catalog;
use regex::Regex;

/// A structural problem in catalog data. Issues never stop a dialogue; the
/// controller degrades silently, so they are surfaced by `check` instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogIssue {
    UnknownEntryStep {
        scenario: String,
        step_id: String,
    },
    MissingNextStep {
        step_id: String,
        option: String,
    },
    UnknownNextStep {
        step_id: String,
        option: String,
        next_step_id: String,
    },
    FinalWithNextStep {
        step_id: String,
        option: String,
    },
    StepWithoutOptions {
        step_id: String,
    },
    InvalidStepId {
        step_id: String,
    },
    UnreachableStep {
        step_id: String,
    },
}

impl CatalogIssue {
    pub fn code(&self) -> &'static str {
        match self {
            CatalogIssue::UnknownEntryStep { .. } => "CATALOG_ENTRY_STEP_UNKNOWN",
            CatalogIssue::MissingNextStep { .. } => "CATALOG_NEXT_STEP_MISSING",
            CatalogIssue::UnknownNextStep { .. } => "CATALOG_NEXT_STEP_UNKNOWN",
            CatalogIssue::FinalWithNextStep { .. } => "CATALOG_FINAL_WITH_NEXT_STEP",
            CatalogIssue::StepWithoutOptions { .. } => "CATALOG_STEP_WITHOUT_OPTIONS",
            CatalogIssue::InvalidStepId { .. } => "CATALOG_STEP_ID_INVALID",
            CatalogIssue::UnreachableStep { .. } => "CATALOG_STEP_UNREACHABLE",
        }
    }

    pub fn message(&self) -> String {
        match self {
            CatalogIssue::UnknownEntryStep { scenario, step_id } => format!(
                "Scenario \"{}\" starts at unknown step \"{}\".",
                scenario, step_id
            ),
            CatalogIssue::MissingNextStep { step_id, option } => format!(
                "Option \"{}\" of step \"{}\" is not final and has no nextStepId.",
                option, step_id
            ),
            CatalogIssue::UnknownNextStep {
                step_id,
                option,
                next_step_id,
            } => format!(
                "Option \"{}\" of step \"{}\" points to unknown step \"{}\".",
                option, step_id, next_step_id
            ),
            CatalogIssue::FinalWithNextStep { step_id, option } => format!(
                "Option \"{}\" of step \"{}\" is final but also sets nextStepId.",
                option, step_id
            ),
            CatalogIssue::StepWithoutOptions { step_id } => {
                format!("Step \"{}\" has no options.", step_id)
            }
            CatalogIssue::InvalidStepId { step_id } => format!(
                "Step id \"{}\" must be lowercase words joined by '.', '_' or '-'.",
                step_id
            ),
            CatalogIssue::UnreachableStep { step_id } => {
                format!("Step \"{}\" is not reachable from any scenario.", step_id)
            }
        }
    }
}

fn step_id_regex() -> &'static Regex {
    static STEP_ID: OnceLock<Regex> = OnceLock::new();
    STEP_ID.get_or_init(|| {
        Regex::new(r"^[a-z0-9]+(?:[._-][a-z0-9]+)*$").expect("step id regex must compile")
    })
}

/// Reports every branch-completeness and reachability problem, in a stable
/// order: scenarios first, then steps by id.
pub fn check_catalog(catalog: &Catalog) -> Vec<CatalogIssue> {
    let mut issues = Vec::new();

    for scenario in &catalog.scenarios {
        if !catalog.steps.contains_key(&scenario.entry_step_id) {
            issues.push(CatalogIssue::UnknownEntryStep {
                scenario: scenario.key.clone(),
                step_id: scenario.entry_step_id.clone(),
            });
        }
    }

    for (step_id, step) in &catalog.steps {
        if !step_id_regex().is_match(step_id) {
            issues.push(CatalogIssue::InvalidStepId {
                step_id: step_id.clone(),
            });
        }
        if step.options.is_empty() {
            issues.push(CatalogIssue::StepWithoutOptions {
                step_id: step_id.clone(),
            });
        }
        for option in &step.options {
            match (&option.next_step_id, option.is_final) {
                (Some(_), true) => issues.push(CatalogIssue::FinalWithNextStep {
                    step_id: step_id.clone(),
                    option: option.label.clone(),
                }),
                (None, false) => issues.push(CatalogIssue::MissingNextStep {
                    step_id: step_id.clone(),
                    option: option.label.clone(),
                }),
                (Some(next_step_id), false) if !catalog.steps.contains_key(next_step_id) => {
                    issues.push(CatalogIssue::UnknownNextStep {
                        step_id: step_id.clone(),
                        option: option.label.clone(),
                        next_step_id: next_step_id.clone(),
                    })
                }
                _ => {}
            }
        }
    }

    let reachable = collect_reachable_steps(catalog);
    for step_id in catalog.steps.keys() {
        if !reachable.contains(step_id.as_str()) {
            issues.push(CatalogIssue::UnreachableStep {
                step_id: step_id.clone(),
            });
        }
    }

    issues
}

fn collect_reachable_steps(catalog: &Catalog) -> BTreeSet<&str> {
    let mut visited = BTreeSet::new();
    let mut stack = catalog
        .scenarios
        .iter()
        .map(|scenario| scenario.entry_step_id.as_str())
        .collect::<Vec<_>>();

    while let Some(step_id) = stack.pop() {
        let Some(step) = catalog.steps.get(step_id) else {
            continue;
        };
        if !visited.insert(step_id) {
            continue;
        }
        for option in &step.options {
            if option.is_final {
                continue;
            }
            if let Some(next_step_id) = &option.next_step_id {
                stack.push(next_step_id.as_str());
            }
        }
    }

    visited
}
