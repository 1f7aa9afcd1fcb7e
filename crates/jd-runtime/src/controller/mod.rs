use std::time::Duration;

use jd_core::{Catalog, ChatEntry, ChatOption, JabdoriError, Step, ViewMode};
use tracing::{debug, warn};

use crate::rotation::{next_message, CounterStore};
use crate::scheduler::{Scheduler, TimerId};
use crate::typewriter::{Typewriter, TypewriterTick};

/// Delays applied by the controller. All of them run on the controller's
/// virtual clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DialogueTiming {
    pub type_interval: Duration,
    pub start_delay: Duration,
    pub step_delay: Duration,
    pub closing_delay: Duration,
}

impl Default for DialogueTiming {
    fn default() -> Self {
        Self {
            type_interval: Duration::from_millis(50),
            start_delay: Duration::from_millis(300),
            step_delay: Duration::from_millis(300),
            closing_delay: Duration::from_millis(600),
        }
    }
}

/// What the typewriter is currently revealing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypingTarget {
    PendingQuestion,
    Entry(usize),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialogueEvent {
    ViewChanged { view: ViewMode },
    EntryAppended { index: usize },
    StepShown { step_id: String },
    TypingCompleted { target: TypingTarget },
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum DialogueTimer {
    RevealStep { step_id: String },
    DeliverClosing { label: String },
    TypewriterTick,
}

pub struct DialogueController<S: CounterStore> {
    catalog: Catalog,
    store: S,
    timing: DialogueTiming,
    scheduler: Scheduler<DialogueTimer>,
    view: ViewMode,
    history: Vec<ChatEntry>,
    pending_step_id: Option<String>,
    typing: bool,
    typewriter: Typewriter,
    typing_target: Option<TypingTarget>,
    typing_timer: Option<TimerId>,
    events: Vec<DialogueEvent>,
}

impl<S: CounterStore> DialogueController<S> {
    pub fn new(catalog: Catalog, store: S, timing: DialogueTiming) -> Self {
        Self {
            catalog,
            store,
            timing,
            scheduler: Scheduler::new(),
            view: ViewMode::Intro,
            history: Vec::new(),
            pending_step_id: None,
            typing: false,
            typewriter: Typewriter::default(),
            typing_target: None,
            typing_timer: None,
            events: Vec::new(),
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    pub fn timing(&self) -> DialogueTiming {
        self.timing
    }

    pub fn view(&self) -> ViewMode {
        self.view
    }

    pub fn history(&self) -> &[ChatEntry] {
        &self.history
    }

    pub fn pending_step_id(&self) -> Option<&str> {
        self.pending_step_id.as_deref()
    }

    pub fn pending_step(&self) -> Option<&Step> {
        self.pending_step_id
            .as_deref()
            .and_then(|step_id| self.catalog.step(step_id))
    }

    pub fn is_typing(&self) -> bool {
        self.typing
    }

    /// Options can be offered once the pending question is fully typed.
    pub fn options_ready(&self) -> bool {
        self.pending_step_id.is_some() && !self.typing
    }

    pub fn typewriter(&self) -> &Typewriter {
        &self.typewriter
    }

    pub fn typing_target(&self) -> Option<TypingTarget> {
        self.typing_target
    }

    pub fn now(&self) -> Duration {
        self.scheduler.now()
    }

    pub fn is_idle(&self) -> bool {
        self.scheduler.is_idle()
    }

    pub fn all_messages(&self) -> &[String] {
        self.catalog.pools.default_pool()
    }

    pub fn drain_events(&mut self) -> Vec<DialogueEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn start_scenario(&mut self, scenario_key: &str, display_label: &str) {
        self.scheduler.cancel_all();
        self.stop_typing();
        self.pending_step_id = None;
        self.history.clear();
        self.set_view(ViewMode::Chat);
        self.append_entry(ChatEntry::user(display_label));

        match self.catalog.initial_step_id(scenario_key).map(str::to_string) {
            Some(step_id) => {
                debug!(scenario = scenario_key, step_id = step_id.as_str(), "scenario started");
                self.scheduler
                    .schedule(self.timing.start_delay, DialogueTimer::RevealStep { step_id });
            }
            None => {
                warn!(scenario = scenario_key, "scenario has no initial step; nothing to show");
            }
        }
    }

    /// Fixes the pending question in history, records the answer and
    /// schedules whatever follows it. A no-op without a pending step.
    pub fn select_option(&mut self, option: &ChatOption) {
        let Some(step_id) = self.pending_step_id.take() else {
            debug!(option = option.label.as_str(), "no pending step; selection ignored");
            return;
        };

        if let Some(question) = self.catalog.step(&step_id).map(|step| step.question.clone()) {
            self.append_entry(ChatEntry::bot(question));
        }
        self.append_entry(ChatEntry::user(option.label.clone()));
        self.stop_typing();

        if option.is_final {
            self.scheduler.schedule(
                self.timing.closing_delay,
                DialogueTimer::DeliverClosing {
                    label: option.label.clone(),
                },
            );
            return;
        }

        match &option.next_step_id {
            Some(next_step_id) => {
                self.scheduler.schedule(
                    self.timing.step_delay,
                    DialogueTimer::RevealStep {
                        step_id: next_step_id.clone(),
                    },
                );
            }
            None => warn!(
                step_id = step_id.as_str(),
                option = option.label.as_str(),
                "non-final option has no next step"
            ),
        }
    }

    /// Selects the pending step's option at `index`.
    pub fn choose(&mut self, index: usize) -> Result<(), JabdoriError> {
        let step = self.pending_step().ok_or_else(|| {
            JabdoriError::new("DIALOGUE_NO_PENDING_STEP", "No question is waiting for an answer.")
        })?;
        let option = step.options.get(index).cloned().ok_or_else(|| {
            JabdoriError::new(
                "DIALOGUE_CHOICE_OUT_OF_RANGE",
                format!(
                    "Choice {} is out of range; {} option(s) available.",
                    index,
                    step.options.len()
                ),
            )
        })?;
        self.select_option(&option);
        Ok(())
    }

    pub fn reset_to_home(&mut self) {
        self.scheduler.cancel_all();
        self.stop_typing();
        self.history.clear();
        self.pending_step_id = None;
        self.set_view(ViewMode::Intro);
    }

    pub fn show_all_messages(&mut self) {
        self.set_view(ViewMode::AllMessages);
    }

    /// Moves the virtual clock forward, firing every timer due on the way in
    /// order.
    pub fn advance(&mut self, elapsed: Duration) {
        let until = self.scheduler.now() + elapsed;
        while let Some(timer) = self.scheduler.pop_due(until) {
            self.fire(timer);
        }
        self.scheduler.advance_to(until);
    }

    /// Fires timers until none are left and returns the virtual time spent.
    ///
    /// Always terminates: a step reveal or closing message schedules one tick
    /// per character of a finite string and nothing else.
    pub fn run_until_idle(&mut self) -> Duration {
        let started = self.scheduler.now();
        while let Some(due) = self.scheduler.next_due() {
            let elapsed = due.saturating_sub(self.scheduler.now());
            self.advance(elapsed);
        }
        self.scheduler.now() - started
    }

    fn fire(&mut self, timer: DialogueTimer) {
        match timer {
            DialogueTimer::RevealStep { step_id } => self.reveal_step(step_id),
            DialogueTimer::DeliverClosing { label } => self.deliver_closing(&label),
            DialogueTimer::TypewriterTick => self.tick_typewriter(),
        }
    }

    fn reveal_step(&mut self, step_id: String) {
        if self.view != ViewMode::Chat {
            debug!(step_id = step_id.as_str(), "left chat view; step not shown");
            return;
        }
        let Some(question) = self.catalog.step(&step_id).map(|step| step.question.clone()) else {
            warn!(step_id = step_id.as_str(), "unknown step; nothing to show");
            return;
        };
        self.pending_step_id = Some(step_id.clone());
        self.events.push(DialogueEvent::StepShown { step_id });
        self.begin_typing(question, TypingTarget::PendingQuestion);
    }

    fn deliver_closing(&mut self, label: &str) {
        if self.view != ViewMode::Chat {
            debug!(label, "left chat view; closing message dropped");
            return;
        }
        let message = next_message(&mut self.store, &self.catalog.pools, label);
        let index = self.append_entry(ChatEntry::bot(message.clone()));
        self.begin_typing(message, TypingTarget::Entry(index));
    }

    fn tick_typewriter(&mut self) {
        self.typing_timer = None;
        match self.typewriter.tick() {
            TypewriterTick::Revealed => {
                self.typing_timer = Some(
                    self.scheduler
                        .schedule(self.timing.type_interval, DialogueTimer::TypewriterTick),
                );
            }
            TypewriterTick::Completed => {
                self.typing = false;
                if let Some(target) = self.typing_target {
                    self.events.push(DialogueEvent::TypingCompleted { target });
                }
            }
            TypewriterTick::Finished => {}
        }
    }

    fn begin_typing(&mut self, text: String, target: TypingTarget) {
        if let Some(timer) = self.typing_timer.take() {
            self.scheduler.cancel(timer);
        }
        self.typewriter.restart(text);
        self.typing = true;
        self.typing_target = Some(target);
        self.typing_timer = Some(
            self.scheduler
                .schedule(self.timing.type_interval, DialogueTimer::TypewriterTick),
        );
    }

    fn stop_typing(&mut self) {
        if let Some(timer) = self.typing_timer.take() {
            self.scheduler.cancel(timer);
        }
        self.typewriter = Typewriter::default();
        self.typing = false;
        self.typing_target = None;
    }

    fn append_entry(&mut self, entry: ChatEntry) -> usize {
        self.history.push(entry);
        let index = self.history.len() - 1;
        self.events.push(DialogueEvent::EntryAppended { index });
        index
    }

    fn set_view(&mut self, view: ViewMode) {
        if self.view != view {
            self.view = view;
            self.events.push(DialogueEvent::ViewChanged { view });
        }
    }
}

#[cfg(test)]
mod tests;
