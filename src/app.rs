use std::sync::mpsc::Sender;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use tracing::{debug, info};

use crate::difficulty::Difficulty;
use crate::quote::{fetch_reference_text, QuoteProvider};
use crate::runtime::AppEvent;
use crate::session::{Event, Phase, Session};
use crate::timer::CountdownTimer;
use crate::ui::SessionView;

/// Length of one countdown step in production
pub const COUNTDOWN_INTERVAL: Duration = Duration::from_secs(1);

/// What the event loop should do after an event was handled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Continue,
    Quit,
}

/// Session controller: owns the live session, the countdown and the quote fetches
pub struct App {
    session: Session,
    provider: Arc<dyn QuoteProvider>,
    events: Sender<AppEvent>,
    tick_interval: Duration,
    timer: Option<CountdownTimer>,
    timer_epoch: u64,
    spinner_frame: usize,
}

impl App {
    pub fn new(
        difficulty: Difficulty,
        provider: Arc<dyn QuoteProvider>,
        events: Sender<AppEvent>,
        tick_interval: Duration,
    ) -> Self {
        let app = Self {
            session: Session::new(difficulty),
            provider,
            events,
            tick_interval,
            timer: None,
            timer_epoch: 0,
            spinner_frame: 0,
        };
        app.spawn_fetch();
        app
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn difficulty(&self) -> Difficulty {
        self.session.difficulty
    }

    pub fn timer_armed(&self) -> bool {
        self.timer.is_some()
    }

    pub fn view(&self) -> SessionView<'_> {
        SessionView::new(&self.session, self.spinner_frame)
    }

    /// Route one runtime event into the session
    pub fn handle(&mut self, event: AppEvent) -> Control {
        match event {
            AppEvent::Key(key) => return self.on_key(key),
            AppEvent::Tick { epoch } => {
                if self.timer.as_ref().map(CountdownTimer::epoch) == Some(epoch) {
                    self.dispatch(Event::Tick);
                } else {
                    debug!(epoch, "dropping tick from disarmed timer");
                }
            }
            AppEvent::QuoteLoaded { generation, text } => {
                if generation != self.session.generation {
                    debug!(
                        generation,
                        current = self.session.generation,
                        "dropping superseded quote"
                    );
                }
                self.dispatch(Event::TextLoaded { generation, text });
            }
            AppEvent::Frame => {
                self.spinner_frame = self.spinner_frame.wrapping_add(1);
            }
            AppEvent::Resize => {}
        }
        Control::Continue
    }

    pub fn on_key(&mut self, key: KeyEvent) -> Control {
        if key.kind == KeyEventKind::Release {
            return Control::Continue;
        }

        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Esc => return Control::Quit,
            KeyCode::Char('c') if ctrl => return Control::Quit,
            KeyCode::Char('r') if ctrl => self.dispatch(Event::Reset),
            KeyCode::F(n @ 1..=3) => {
                let difficulty = Difficulty::ALL[usize::from(n - 1)];
                self.dispatch(Event::ChangeDifficulty(difficulty));
            }
            KeyCode::Char('r') | KeyCode::Enter if self.session.is_finished() => {
                self.dispatch(Event::Reset)
            }
            KeyCode::Backspace if self.accepts_input() => {
                let mut typed = self.session.typed_text.clone();
                if typed.pop().is_some() {
                    self.dispatch(Event::Input(typed));
                }
            }
            KeyCode::Char(c)
                if self.accepts_input()
                    && !ctrl
                    && !key.modifiers.contains(KeyModifiers::ALT) =>
            {
                let mut typed = self.session.typed_text.clone();
                typed.push(c);
                self.dispatch(Event::Input(typed));
            }
            _ => {}
        }
        Control::Continue
    }

    fn accepts_input(&self) -> bool {
        matches!(self.session.phase, Phase::Idle | Phase::Running) && !self.session.input_disabled()
    }

    /// Apply `event` to the session and reconcile the timer and fetch side effects
    pub fn dispatch(&mut self, event: Event) {
        let placeholder = Session::new(self.session.difficulty);
        let before = std::mem::replace(&mut self.session, placeholder);
        let (previous_phase, previous_generation, previous_difficulty) =
            (before.phase, before.generation, before.difficulty);

        self.session = before.reduce(event);

        if self.session.difficulty != previous_difficulty {
            info!(difficulty = %self.session.difficulty, "difficulty changed");
        }
        if self.session.phase != previous_phase {
            self.log_transition(previous_phase);
        }
        if self.session.generation != previous_generation {
            self.spawn_fetch();
        }
        self.sync_timer();
    }

    fn log_transition(&self, from: Phase) {
        let s = &self.session;
        match s.phase {
            Phase::Running => info!(difficulty = %s.difficulty, "session started"),
            Phase::Finished => info!(
                difficulty = %s.difficulty,
                wpm = s.wpm(),
                accuracy = s.accuracy(),
                failed = s.is_failed(),
                time_left = s.time_left,
                "session finished"
            ),
            _ => debug!(from = ?from, to = ?s.phase, "phase changed"),
        }
    }

    fn spawn_fetch(&self) {
        let provider = Arc::clone(&self.provider);
        let events = self.events.clone();
        let generation = self.session.generation;
        debug!(generation, "requesting reference text");

        thread::spawn(move || {
            let text = fetch_reference_text(provider.as_ref());
            let _ = events.send(AppEvent::QuoteLoaded { generation, text });
        });
    }

    /// Keep exactly one countdown armed while running with time left, none otherwise
    fn sync_timer(&mut self) {
        match (self.session.wants_timer(), self.timer.is_some()) {
            (true, false) => {
                self.timer_epoch += 1;
                self.timer = Some(CountdownTimer::arm(
                    self.tick_interval,
                    self.timer_epoch,
                    self.events.clone(),
                ));
            }
            (false, true) => {
                if let Some(timer) = self.timer.take() {
                    timer.cancel();
                }
            }
            _ => {}
        }
    }
}
