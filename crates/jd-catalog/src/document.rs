use std::collections::BTreeMap;

use jd_core::{Catalog, JabdoriError, ResponsePools, Scenario, Step, UiText};
use serde::{Deserialize, Serialize};

/// One catalog fragment as written on disk. Every section is optional so a
/// catalog can be split across several files.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct CatalogDocument {
    pub ui: Option<UiTextDocument>,
    pub scenarios: Vec<Scenario>,
    pub steps: BTreeMap<String, Step>,
    pub responses: BTreeMap<String, Vec<String>>,
    pub default_responses: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct UiTextDocument {
    pub title: Option<String>,
    pub browse_all_label: Option<String>,
    pub all_messages_header: Option<String>,
    pub return_home_label: Option<String>,
}

impl UiTextDocument {
    fn apply_to(self, ui: &mut UiText) {
        if let Some(title) = self.title {
            ui.title = title;
        }
        if let Some(label) = self.browse_all_label {
            ui.browse_all_label = label;
        }
        if let Some(header) = self.all_messages_header {
            ui.all_messages_header = header;
        }
        if let Some(label) = self.return_home_label {
            ui.return_home_label = label;
        }
    }
}

/// Parses every fragment and merges them in path order into one catalog.
pub fn compile_catalog_from_json_map(
    json_by_path: &BTreeMap<String, String>,
) -> Result<Catalog, JabdoriError> {
    if json_by_path.is_empty() {
        return Err(JabdoriError::new(
            "CATALOG_EMPTY",
            "No catalog documents were provided.",
        ));
    }

    let mut ui = UiText::default();
    let mut scenarios: Vec<Scenario> = Vec::new();
    let mut steps = BTreeMap::new();
    let mut responses = BTreeMap::new();
    let mut default_responses = Vec::new();

    for (path, source) in json_by_path {
        let document = parse_document(path, source)?;

        if let Some(ui_document) = document.ui {
            ui_document.apply_to(&mut ui);
        }

        for scenario in document.scenarios {
            if scenarios.iter().any(|known| known.key == scenario.key) {
                return Err(JabdoriError::new(
                    "CATALOG_DUPLICATE_SCENARIO",
                    format!(
                        "Scenario \"{}\" in \"{}\" is already defined.",
                        scenario.key, path
                    ),
                ));
            }
            scenarios.push(scenario);
        }

        for (step_id, step) in document.steps {
            if steps.contains_key(&step_id) {
                return Err(JabdoriError::new(
                    "CATALOG_DUPLICATE_STEP",
                    format!("Step \"{}\" in \"{}\" is already defined.", step_id, path),
                ));
            }
            steps.insert(step_id, step);
        }

        for (label, pool) in document.responses {
            if responses.contains_key(&label) {
                return Err(JabdoriError::new(
                    "CATALOG_DUPLICATE_RESPONSES",
                    format!(
                        "Responses for \"{}\" in \"{}\" are already defined.",
                        label, path
                    ),
                ));
            }
            responses.insert(label, pool);
        }

        default_responses.extend(document.default_responses);
    }

    let pools = ResponsePools::new(responses, default_responses)?;

    Ok(Catalog {
        ui,
        scenarios,
        steps,
        pools,
    })
}

fn parse_document(path: &str, source: &str) -> Result<CatalogDocument, JabdoriError> {
    serde_json::from_str(source).map_err(|error| {
        JabdoriError::new(
            "CATALOG_JSON_INVALID",
            format!("Failed to parse catalog \"{}\": {}", path, error),
        )
    })
}
