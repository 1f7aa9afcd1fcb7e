use jd_core::JabdoriError;
use jd_runtime::{CounterStore, DialogueController};
use tracing::debug;

use crate::{json_string, SessionEvent, SessionReport};

/// Fires every pending timer, including all typewriter ticks, and consumes
/// the events they produced.
pub(crate) fn settle<S: CounterStore>(controller: &mut DialogueController<S>) {
    let elapsed = controller.run_until_idle();
    for dialogue_event in controller.drain_events() {
        debug!(event = ?dialogue_event, "dialogue event");
    }
    debug!(elapsed_ms = elapsed.as_millis() as u64, "dialogue settled");
}

pub(crate) fn session_report<S: CounterStore>(controller: &DialogueController<S>) -> SessionReport {
    let pending = controller.pending_step().filter(|_| controller.options_ready());
    match pending {
        Some(step) => SessionReport {
            event: SessionEvent::Choices,
            entries: controller.history().to_vec(),
            prompt_text: Some(step.question.clone()),
            choices: step
                .options
                .iter()
                .enumerate()
                .map(|(index, option)| (index, option.label.clone()))
                .collect(),
        },
        None => SessionReport {
            event: SessionEvent::End,
            entries: controller.history().to_vec(),
            prompt_text: None,
            choices: Vec::new(),
        },
    }
}

/// Starts `scenario_key`, answers with `choices` in order and reports where
/// the dialogue came to rest.
pub(crate) fn run_scripted_session<S: CounterStore>(
    controller: &mut DialogueController<S>,
    scenario_key: &str,
    display_label: &str,
    choices: &[usize],
) -> Result<SessionReport, JabdoriError> {
    controller.start_scenario(scenario_key, display_label);
    settle(controller);
    for &choice in choices {
        controller.choose(choice)?;
        settle(controller);
    }
    Ok(session_report(controller))
}

pub(crate) fn report_lines(report: &SessionReport) -> Vec<String> {
    let mut lines = vec!["RESULT:OK".to_string()];
    lines.push(match report.event {
        SessionEvent::Choices => "EVENT:CHOICES".to_string(),
        SessionEvent::End => "EVENT:END".to_string(),
    });

    for entry in &report.entries {
        lines.push(format!(
            "ENTRY:{}|{}",
            entry.speaker.as_str(),
            json_string(&entry.text)
        ));
    }

    if let Some(prompt) = &report.prompt_text {
        lines.push(format!("PROMPT_JSON:{}", json_string(prompt)));
    }

    for (index, label) in &report.choices {
        lines.push(format!("CHOICE:{}|{}", index, json_string(label)));
    }
    lines
}

pub(crate) fn emit_report(report: &SessionReport) {
    for line in report_lines(report) {
        println!("{}", line);
    }
}
