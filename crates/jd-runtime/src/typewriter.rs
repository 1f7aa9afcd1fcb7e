#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypewriterPhase {
    Idle,
    Revealing,
    Complete,
}

/// Outcome of a single [`Typewriter::tick`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypewriterTick {
    /// One more character became visible; more remain.
    Revealed,
    /// The whole string is visible. Returned once per string.
    Completed,
    /// The reveal already completed; nothing changed.
    Finished,
}

/// Progressive reveal of a string, one `char` per tick.
///
/// The type holds no timers. Whoever drives it owns the tick schedule and
/// must drop pending ticks when calling [`Typewriter::restart`].
#[derive(Debug, Clone, Default)]
pub struct Typewriter {
    text: String,
    visible_bytes: usize,
    revealed_chars: usize,
    completed: bool,
}

impl Typewriter {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            visible_bytes: 0,
            revealed_chars: 0,
            completed: false,
        }
    }

    pub fn restart(&mut self, text: impl Into<String>) {
        *self = Self::new(text);
    }

    pub fn tick(&mut self) -> TypewriterTick {
        if self.completed {
            return TypewriterTick::Finished;
        }

        let Some(next) = self.text[self.visible_bytes..].chars().next() else {
            self.completed = true;
            return TypewriterTick::Completed;
        };
        self.visible_bytes += next.len_utf8();
        self.revealed_chars += 1;

        if self.visible_bytes == self.text.len() {
            self.completed = true;
            return TypewriterTick::Completed;
        }
        TypewriterTick::Revealed
    }

    pub fn visible(&self) -> &str {
        &self.text[..self.visible_bytes]
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn revealed_chars(&self) -> usize {
        self.revealed_chars
    }

    pub fn is_complete(&self) -> bool {
        self.completed
    }

    pub fn phase(&self) -> TypewriterPhase {
        if self.completed {
            TypewriterPhase::Complete
        } else if self.visible_bytes == 0 {
            TypewriterPhase::Idle
        } else {
            TypewriterPhase::Revealing
        }
    }
}
