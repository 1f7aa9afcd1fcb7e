mod controller;
mod rotation;
mod scheduler;
mod typewriter;

pub use controller::{DialogueController, DialogueEvent, DialogueTiming, TypingTarget};
pub use rotation::{
    counter_key, next_message, parse_counter, CounterStore, MemoryCounterStore,
    COUNTER_KEY_PREFIX,
};
pub use scheduler::{Scheduler, TimerId};
pub use typewriter::{Typewriter, TypewriterPhase, TypewriterTick};
