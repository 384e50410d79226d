// Library surface for the binary, headless integration tests and reuse.
pub mod app;
pub mod app_dirs;
pub mod config;
pub mod difficulty;
pub mod logging;
pub mod quote;
pub mod runtime;
pub mod session;
pub mod stats;
pub mod timer;
pub mod ui;

pub use app::{App, Control};
pub use difficulty::{Difficulty, DifficultyProfile};
pub use session::{Event, Phase, Session};
