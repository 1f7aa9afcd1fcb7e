use jd_core::{Catalog, ChatEntry};

pub(crate) const DEFAULT_STORE_FILE: &str = ".jabdori/counters.json";
pub(crate) const BUILTIN_CATALOG_ID: &str = "builtin";

#[derive(Debug, Clone)]
pub(crate) struct LoadedCatalog {
    pub(crate) id: String,
    pub(crate) catalog: Catalog,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SessionEvent {
    Choices,
    End,
}

#[derive(Debug, Clone)]
pub(crate) struct SessionReport {
    pub(crate) event: SessionEvent,
    pub(crate) entries: Vec<ChatEntry>,
    pub(crate) prompt_text: Option<String>,
    pub(crate) choices: Vec<(usize, String)>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TuiCommandAction {
    NotHandled,
    Continue,
    Quit,
}
