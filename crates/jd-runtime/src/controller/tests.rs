use super::*;
use crate::rotation::{counter_key, MemoryCounterStore};
use jd_catalog::compile_catalog_from_json;
use jd_core::Speaker;

const CATALOG_JSON: &str = r#"
{
  "scenarios": [
    { "key": "a", "label": "Start A", "entryStepId": "a.start" },
    { "key": "broken", "label": "Broken", "entryStepId": "broken.missing" }
  ],
  "steps": {
    "a.start": {
      "question": "Ready?",
      "options": [
        { "label": "Not yet", "nextStepId": "a.later" },
        { "label": "Yes", "isFinal": true },
        { "label": "Lost", "nextStepId": "a.nowhere" }
      ]
    },
    "a.later": {
      "question": "Why?",
      "options": [{ "label": "Tired", "isFinal": true }]
    }
  },
  "responses": { "Yes": ["Go!", "Again!"] },
  "defaultResponses": ["Keep going."]
}
"#;

fn ms(value: u64) -> Duration {
    Duration::from_millis(value)
}

fn catalog() -> Catalog {
    compile_catalog_from_json("test.catalog.json", CATALOG_JSON).expect("catalog should compile")
}

fn controller_with_store(store: MemoryCounterStore) -> DialogueController<MemoryCounterStore> {
    DialogueController::new(catalog(), store, DialogueTiming::default())
}

fn controller() -> DialogueController<MemoryCounterStore> {
    controller_with_store(MemoryCounterStore::new())
}

fn texts(controller: &DialogueController<MemoryCounterStore>) -> Vec<(Speaker, String)> {
    controller
        .history()
        .iter()
        .map(|entry| (entry.speaker, entry.text.clone()))
        .collect()
}

fn run_to_closing(controller: &mut DialogueController<MemoryCounterStore>) -> String {
    controller.start_scenario("a", "Start A");
    controller.run_until_idle();
    controller.choose(1).expect("final option should be selectable");
    controller.run_until_idle();
    controller
        .history()
        .last()
        .map(|entry| entry.text.clone())
        .expect("closing message should be appended")
}

#[test]
fn start_scenario_shows_label_then_initial_step_after_delay() {
    let mut controller = controller();
    assert_eq!(controller.view(), ViewMode::Intro);

    controller.start_scenario("a", "Start A");
    assert_eq!(controller.view(), ViewMode::Chat);
    assert_eq!(texts(&controller), vec![(Speaker::User, "Start A".to_string())]);
    assert_eq!(controller.pending_step_id(), None);

    controller.advance(ms(299));
    assert_eq!(controller.pending_step_id(), None);

    controller.advance(ms(1));
    assert_eq!(controller.pending_step_id(), Some("a.start"));
    assert_eq!(
        controller.pending_step().map(|step| step.question.as_str()),
        Some("Ready?")
    );
    assert!(controller.is_typing());
    assert!(!controller.options_ready());
}

#[test]
fn pending_question_is_typed_one_char_per_interval() {
    let mut controller = controller();
    controller.start_scenario("a", "Start A");
    controller.advance(ms(300));
    assert_eq!(controller.typewriter().visible(), "");
    assert_eq!(controller.typing_target(), Some(TypingTarget::PendingQuestion));

    controller.advance(ms(50));
    assert_eq!(controller.typewriter().visible(), "R");

    controller.advance(ms(249));
    assert_eq!(controller.typewriter().visible(), "Ready");
    assert!(controller.is_typing());

    controller.advance(ms(1));
    assert_eq!(controller.typewriter().visible(), "Ready?");
    assert!(!controller.is_typing());
    assert!(controller.options_ready());

    let completions = controller
        .drain_events()
        .into_iter()
        .filter(|event| matches!(event, DialogueEvent::TypingCompleted { .. }))
        .count();
    assert_eq!(completions, 1);
}

#[test]
fn final_option_fixes_question_then_answer_then_delivers_closing() {
    let mut controller = controller();
    controller.start_scenario("a", "Start A");
    controller.advance(ms(600));
    assert!(controller.options_ready());

    controller.choose(1).expect("choose should pass");
    assert_eq!(
        texts(&controller),
        vec![
            (Speaker::User, "Start A".to_string()),
            (Speaker::Bot, "Ready?".to_string()),
            (Speaker::User, "Yes".to_string()),
        ]
    );
    assert_eq!(controller.pending_step_id(), None);
    assert!(!controller.is_typing());

    controller.advance(ms(599));
    assert_eq!(controller.history().len(), 3);

    controller.advance(ms(1));
    assert_eq!(controller.history().len(), 4);
    assert_eq!(controller.history()[3], ChatEntry::bot("Go!"));
    assert_eq!(controller.typing_target(), Some(TypingTarget::Entry(3)));
    assert!(controller.is_typing());
    assert_eq!(controller.store().get(&counter_key("Yes")), 1);

    controller.run_until_idle();
    assert!(!controller.is_typing());
    assert_eq!(controller.typewriter().visible(), "Go!");
}

#[test]
fn selecting_mid_reveal_cancels_the_question_typewriter() {
    let mut controller = controller();
    controller.start_scenario("a", "Start A");
    controller.advance(ms(350));
    assert_eq!(controller.typewriter().visible(), "R");

    controller.choose(1).expect("choose while typing should pass");
    assert_eq!(controller.history()[1], ChatEntry::bot("Ready?"));
    assert_eq!(controller.typewriter().visible(), "");
    assert_eq!(controller.typing_target(), None);

    controller.advance(ms(600));
    assert_eq!(controller.typewriter().text(), "Go!");
    assert_eq!(controller.typewriter().visible(), "");

    controller.advance(ms(50));
    assert_eq!(controller.typewriter().visible(), "G");
    controller.run_until_idle();
    assert_eq!(controller.typewriter().visible(), "Go!");
}

#[test]
fn non_final_option_reveals_next_step_after_step_delay() {
    let mut controller = controller();
    controller.start_scenario("a", "Start A");
    controller.run_until_idle();

    controller.choose(0).expect("branch option should be selectable");
    assert_eq!(controller.pending_step_id(), None);

    controller.advance(ms(299));
    assert_eq!(controller.pending_step_id(), None);
    controller.advance(ms(1));
    assert_eq!(controller.pending_step_id(), Some("a.later"));
    assert_eq!(controller.typewriter().text(), "Why?");

    controller.run_until_idle();
    controller.choose(0).expect("terminal option should be selectable");
    controller.run_until_idle();
    assert_eq!(
        texts(&controller),
        vec![
            (Speaker::User, "Start A".to_string()),
            (Speaker::Bot, "Ready?".to_string()),
            (Speaker::User, "Not yet".to_string()),
            (Speaker::Bot, "Why?".to_string()),
            (Speaker::User, "Tired".to_string()),
            (Speaker::Bot, "Keep going.".to_string()),
        ]
    );
}

#[test]
fn selection_without_pending_step_is_a_no_op() {
    let mut controller = controller();
    controller.select_option(&ChatOption::terminal("Yes"));
    assert!(controller.history().is_empty());
    assert!(controller.is_idle());

    controller.start_scenario("a", "Start A");
    controller.run_until_idle();
    let option = controller.pending_step().expect("pending step").options[1].clone();
    controller.select_option(&option);
    controller.select_option(&option);
    controller.run_until_idle();

    assert_eq!(controller.history().len(), 4);
    assert_eq!(controller.store().get(&counter_key("Yes")), 1);
}

#[test]
fn unknown_scenario_and_unknown_next_step_degrade_silently() {
    let mut controller = controller();
    controller.start_scenario("missing", "Missing");
    controller.run_until_idle();
    assert_eq!(controller.view(), ViewMode::Chat);
    assert_eq!(texts(&controller), vec![(Speaker::User, "Missing".to_string())]);
    assert_eq!(controller.pending_step_id(), None);

    controller.start_scenario("broken", "Broken");
    controller.run_until_idle();
    assert_eq!(controller.pending_step_id(), None);

    controller.start_scenario("a", "Start A");
    controller.run_until_idle();
    controller.choose(2).expect("dangling option is still selectable");
    controller.run_until_idle();
    assert_eq!(controller.pending_step_id(), None);
    assert_eq!(controller.history().len(), 3);
}

#[test]
fn reset_to_home_clears_session_and_cancels_timers() {
    let mut controller = controller();
    controller.start_scenario("a", "Start A");
    controller.run_until_idle();
    controller.choose(1).expect("choose should pass");

    controller.reset_to_home();
    assert_eq!(controller.view(), ViewMode::Intro);
    assert!(controller.history().is_empty());
    assert_eq!(controller.pending_step_id(), None);
    assert!(!controller.is_typing());
    assert!(controller.is_idle());

    controller.advance(ms(10_000));
    assert!(controller.history().is_empty());
    assert_eq!(controller.store().get(&counter_key("Yes")), 0);
}

#[test]
fn reset_to_home_keeps_rotation_state() {
    let mut controller = controller();
    assert_eq!(run_to_closing(&mut controller), "Go!");
    controller.reset_to_home();
    assert_eq!(controller.store().get(&counter_key("Yes")), 1);
    assert_eq!(run_to_closing(&mut controller), "Again!");
    assert_eq!(run_to_closing(&mut controller), "Go!");
}

#[test]
fn rotation_resumes_from_store_handed_to_a_new_controller() {
    let mut first = controller();
    assert_eq!(run_to_closing(&mut first), "Go!");

    let mut second = controller_with_store(first.into_store());
    assert_eq!(run_to_closing(&mut second), "Again!");
    assert_eq!(second.store().get(&counter_key("Yes")), 2);
}

#[test]
fn show_all_messages_exposes_default_pool_without_touching_history() {
    let mut controller = controller();
    controller.start_scenario("a", "Start A");
    controller.show_all_messages();
    assert_eq!(controller.view(), ViewMode::AllMessages);
    assert_eq!(controller.all_messages(), ["Keep going.".to_string()]);
    assert_eq!(controller.history().len(), 1);

    controller.run_until_idle();
    assert_eq!(controller.pending_step_id(), None);
}

#[test]
fn choose_reports_missing_step_and_out_of_range_index() {
    let mut controller = controller();
    let error = controller.choose(0).expect_err("nothing pending");
    assert_eq!(error.code, "DIALOGUE_NO_PENDING_STEP");

    controller.start_scenario("a", "Start A");
    controller.run_until_idle();
    let error = controller.choose(9).expect_err("index out of range");
    assert_eq!(error.code, "DIALOGUE_CHOICE_OUT_OF_RANGE");
    assert_eq!(controller.pending_step_id(), Some("a.start"));
}

#[test]
fn events_trace_the_dialogue() {
    let mut controller = controller();
    controller.start_scenario("a", "Start A");
    controller.run_until_idle();
    assert_eq!(
        controller.drain_events(),
        vec![
            DialogueEvent::ViewChanged {
                view: ViewMode::Chat
            },
            DialogueEvent::EntryAppended { index: 0 },
            DialogueEvent::StepShown {
                step_id: "a.start".to_string()
            },
            DialogueEvent::TypingCompleted {
                target: TypingTarget::PendingQuestion
            },
        ]
    );
    assert!(controller.drain_events().is_empty());
}

#[test]
fn run_until_idle_types_very_long_closing_messages_to_the_end() {
    let long_message = "가".repeat(150_000);
    let source = format!(
        r#"{{
          "scenarios": [{{ "key": "long", "label": "Long", "entryStepId": "long.start" }}],
          "steps": {{
            "long.start": {{ "question": "Ok?", "options": [{{ "label": "Yes", "isFinal": true }}] }}
          }},
          "defaultResponses": ["{}"]
        }}"#,
        long_message
    );
    let catalog = compile_catalog_from_json("long.catalog.json", &source).expect("catalog");
    let mut controller =
        DialogueController::new(catalog, MemoryCounterStore::new(), DialogueTiming::default());

    controller.start_scenario("long", "Long");
    controller.run_until_idle();
    controller.choose(0).expect("final option should be selectable");
    let elapsed = controller.run_until_idle();

    assert!(controller.is_idle());
    assert!(!controller.is_typing());
    assert_eq!(controller.typewriter().visible(), long_message);
    assert_eq!(controller.typewriter().revealed_chars(), 150_000);
    assert_eq!(elapsed, ms(600) + ms(50) * 150_000);
}
