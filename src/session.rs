use crate::difficulty::{Difficulty, DifficultyProfile};
use crate::stats::{self, Stats};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Waiting for the reference text to arrive
    Loading,
    /// Text is ready, countdown not started
    Idle,
    /// At least one keystroke received, countdown running
    Running,
    /// Countdown exhausted or text completed
    Finished,
}

/// Everything that can move a session forward
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// Reference text for the fetch tagged `generation` has arrived
    TextLoaded { generation: u64, text: String },
    /// The full current content of the input, not a delta
    Input(String),
    /// One second of countdown elapsed
    Tick,
    ChangeDifficulty(Difficulty),
    Reset,
}

/// State of one typing attempt.
///
/// A session is replaced wholesale on reset or difficulty change. Every
/// replacement bumps `generation`, which is also the tag of the reference
/// text fetch belonging to the new session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub reference_text: String,
    pub typed_text: String,
    pub time_left: u32,
    pub phase: Phase,
    pub stats: Stats,
    pub difficulty: Difficulty,
    pub failed: bool,
    pub generation: u64,
}

impl Session {
    pub fn new(difficulty: Difficulty) -> Self {
        Self::fresh(difficulty, 0)
    }

    fn fresh(difficulty: Difficulty, generation: u64) -> Self {
        Self {
            reference_text: String::new(),
            typed_text: String::new(),
            time_left: difficulty.duration_secs(),
            phase: Phase::Loading,
            stats: Stats::default(),
            difficulty,
            failed: false,
            generation,
        }
    }

    pub fn profile(&self) -> &'static DifficultyProfile {
        self.difficulty.profile()
    }

    pub fn is_loading(&self) -> bool {
        self.phase == Phase::Loading
    }

    pub fn is_running(&self) -> bool {
        self.phase == Phase::Running
    }

    pub fn is_finished(&self) -> bool {
        self.phase == Phase::Finished
    }

    pub fn is_failed(&self) -> bool {
        self.failed
    }

    pub fn wpm(&self) -> u32 {
        self.stats.wpm
    }

    pub fn accuracy(&self) -> u32 {
        self.stats.accuracy
    }

    /// The input surface is disabled exactly when the countdown is exhausted
    pub fn input_disabled(&self) -> bool {
        self.time_left == 0
    }

    /// Whether the one-second countdown should currently be armed
    pub fn wants_timer(&self) -> bool {
        self.is_running() && self.time_left > 0
    }

    /// Apply one event, returning the successor session.
    ///
    /// Events that do not apply to the current phase leave the session untouched.
    pub fn reduce(self, event: Event) -> Self {
        match event {
            Event::TextLoaded { generation, text } => self.on_text_loaded(generation, text),
            Event::Input(typed) => self.on_input(typed),
            Event::Tick => self.on_tick(),
            Event::ChangeDifficulty(difficulty) => self.change_difficulty(difficulty),
            Event::Reset => self.reset(),
        }
    }

    fn on_text_loaded(mut self, generation: u64, text: String) -> Self {
        if !self.is_loading() || generation != self.generation {
            return self;
        }
        self.reference_text = text;
        self.phase = Phase::Idle;
        self
    }

    fn on_input(mut self, typed: String) -> Self {
        match self.phase {
            Phase::Idle | Phase::Running if !self.input_disabled() => {}
            _ => return self,
        }

        // the countdown only starts with the first keystroke
        self.phase = Phase::Running;
        self.stats = Stats::compute(
            &typed,
            &self.reference_text,
            self.difficulty.duration_secs(),
            self.time_left,
        );
        self.typed_text = typed;

        if self.typed_text.chars().count() == self.reference_text.chars().count() {
            self.finish();
        }
        self
    }

    fn on_tick(mut self) -> Self {
        if !self.wants_timer() {
            return self;
        }
        self.time_left -= 1;
        if self.time_left == 0 {
            self.finish();
        }
        self
    }

    /// Scores from the most recently stored stats; they are not recomputed here
    fn finish(&mut self) {
        self.phase = Phase::Finished;
        self.failed = stats::is_failing(self.stats, self.profile());
    }

    fn change_difficulty(self, difficulty: Difficulty) -> Self {
        Self::fresh(difficulty, self.generation + 1)
    }

    fn reset(self) -> Self {
        Self::fresh(self.difficulty, self.generation + 1)
    }
}
