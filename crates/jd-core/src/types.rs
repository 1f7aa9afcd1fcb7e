use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::JabdoriError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Speaker {
    Bot,
    User,
}

impl Speaker {
    pub fn as_str(self) -> &'static str {
        match self {
            Speaker::Bot => "BOT",
            Speaker::User => "USER",
        }
    }
}

/// One line of conversation history. Never edited after it is appended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatEntry {
    pub speaker: Speaker,
    pub text: String,
}

impl ChatEntry {
    pub fn bot(text: impl Into<String>) -> Self {
        Self {
            speaker: Speaker::Bot,
            text: text.into(),
        }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self {
            speaker: Speaker::User,
            text: text.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ViewMode {
    #[default]
    Intro,
    Chat,
    AllMessages,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatOption {
    pub label: String,
    #[serde(default)]
    pub is_final: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_step_id: Option<String>,
}

impl ChatOption {
    pub fn branch(label: impl Into<String>, next_step_id: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            is_final: false,
            next_step_id: Some(next_step_id.into()),
        }
    }

    pub fn terminal(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            is_final: true,
            next_step_id: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    pub question: String,
    pub options: Vec<ChatOption>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scenario {
    pub key: String,
    pub label: String,
    pub entry_step_id: String,
}

/// Fixed texts the front-ends show around the dialogue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UiText {
    pub title: String,
    pub browse_all_label: String,
    pub all_messages_header: String,
    pub return_home_label: String,
}

impl Default for UiText {
    fn default() -> Self {
        Self {
            title: "Hello\nHow can I help you?".to_string(),
            browse_all_label: "Browse all".to_string(),
            all_messages_header: "All messages".to_string(),
            return_home_label: "Back to work".to_string(),
        }
    }
}

/// Closing messages keyed by terminal option label.
///
/// The default pool is guaranteed non-empty, so [`ResponsePools::pool_for`]
/// always yields at least one message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponsePools {
    by_label: BTreeMap<String, Vec<String>>,
    default_pool: Vec<String>,
}

impl ResponsePools {
    pub fn new(
        by_label: BTreeMap<String, Vec<String>>,
        default_pool: Vec<String>,
    ) -> Result<Self, JabdoriError> {
        if default_pool.is_empty() {
            return Err(JabdoriError::new(
                "CATALOG_DEFAULT_POOL_EMPTY",
                "Default response pool must contain at least one message",
            ));
        }
        Ok(Self {
            by_label,
            default_pool,
        })
    }

    /// Dedicated pool for `label`, or the default pool when the label has
    /// none or its pool is empty.
    pub fn pool_for(&self, label: &str) -> &[String] {
        match self.by_label.get(label) {
            Some(pool) if !pool.is_empty() => pool,
            _ => &self.default_pool,
        }
    }

    pub fn dedicated(&self, label: &str) -> Option<&[String]> {
        self.by_label.get(label).map(Vec::as_slice)
    }

    pub fn default_pool(&self) -> &[String] {
        &self.default_pool
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.by_label.keys().map(String::as_str)
    }
}

/// Read-only dialogue content: scenarios, the step graph and closing pools.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    pub ui: UiText,
    pub scenarios: Vec<Scenario>,
    pub steps: BTreeMap<String, Step>,
    pub pools: ResponsePools,
}

impl Catalog {
    pub fn scenario(&self, key: &str) -> Option<&Scenario> {
        self.scenarios.iter().find(|scenario| scenario.key == key)
    }

    pub fn step(&self, step_id: &str) -> Option<&Step> {
        self.steps.get(step_id)
    }

    /// Entry step id of a scenario, only when that step exists.
    pub fn initial_step_id(&self, scenario_key: &str) -> Option<&str> {
        let scenario = self.scenario(scenario_key)?;
        self.steps
            .contains_key(&scenario.entry_step_id)
            .then_some(scenario.entry_step_id.as_str())
    }
}
