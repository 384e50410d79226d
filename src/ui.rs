use itertools::Itertools;
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget, Wrap},
};
use unicode_width::UnicodeWidthStr;

use crate::difficulty::Difficulty;
use crate::session::{Phase, Session};
use crate::stats::ACCURACY_FLOOR;

pub const BRAND_NAME: &str = "SwiftScribe";
pub const TAGLINE: &str = "Master the Art of Speed Typing";

const HORIZONTAL_MARGIN: u16 = 5;
const VERTICAL_MARGIN: u16 = 1;
const SPINNER: [&str; 4] = ["|", "/", "-", "\\"];

/// Renders a session; the spinner frame animates the loading screen
pub struct SessionView<'a> {
    session: &'a Session,
    spinner_frame: usize,
}

impl<'a> SessionView<'a> {
    pub fn new(session: &'a Session, spinner_frame: usize) -> Self {
        Self {
            session,
            spinner_frame,
        }
    }
}

fn bold() -> Style {
    Style::default().add_modifier(Modifier::BOLD)
}

fn dim_bold() -> Style {
    bold().add_modifier(Modifier::DIM)
}

impl Widget for SessionView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .horizontal_margin(HORIZONTAL_MARGIN)
            .vertical_margin(VERTICAL_MARGIN)
            .constraints([
                Constraint::Length(2), // brand + tagline
                Constraint::Length(1), // difficulty bar
                Constraint::Length(1), // padding
                Constraint::Min(1),    // body
                Constraint::Length(1), // legend
            ])
            .split(area);

        render_header(chunks[0], buf);
        render_difficulty_bar(self.session.difficulty, chunks[1], buf);

        match self.session.phase {
            Phase::Loading => {
                let frame = SPINNER[self.spinner_frame % SPINNER.len()];
                Paragraph::new(Span::styled(
                    format!("{frame} Loading challenge..."),
                    dim_bold(),
                ))
                .alignment(Alignment::Center)
                .render(chunks[3], buf);
            }
            Phase::Idle | Phase::Running => render_typing(self.session, chunks[3], buf),
            Phase::Finished => render_result(self.session, chunks[3], buf),
        }

        render_legend(self.session, chunks[4], buf);
    }
}

fn render_header(area: Rect, buf: &mut Buffer) {
    let lines = vec![
        Line::from(Span::styled(
            BRAND_NAME,
            bold().fg(Color::Rgb(0x66, 0x7e, 0xea)),
        )),
        Line::from(Span::styled(
            TAGLINE,
            Style::default()
                .fg(Color::Rgb(0x76, 0x4b, 0xa2))
                .add_modifier(Modifier::ITALIC),
        )),
    ];
    Paragraph::new(lines)
        .alignment(Alignment::Center)
        .render(area, buf);
}

fn render_difficulty_bar(selected: Difficulty, area: Rect, buf: &mut Buffer) {
    let mut spans = Vec::with_capacity(Difficulty::ALL.len() * 2);
    for (idx, difficulty) in Difficulty::ALL.into_iter().enumerate() {
        if idx > 0 {
            spans.push(Span::raw("   "));
        }
        let style = if difficulty == selected {
            bold().fg(Color::Black).bg(Color::Cyan)
        } else {
            Style::default().add_modifier(Modifier::DIM)
        };
        spans.push(Span::styled(format!(" {} ", difficulty.label()), style));
    }

    Paragraph::new(Line::from(spans))
        .alignment(Alignment::Center)
        .render(area, buf);
}

fn render_typing(session: &Session, area: Rect, buf: &mut Buffer) {
    let max_chars_per_line = area.width.max(1);
    let reference_width = session.reference_text.width();
    let prompt_occupied_lines = if reference_width <= max_chars_per_line as usize {
        1
    } else {
        ((reference_width as f64 / max_chars_per_line as f64).ceil() + 1.0) as u16
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),                     // stats
            Constraint::Length(1),                     // padding
            Constraint::Length(prompt_occupied_lines), // quote
            Constraint::Length(1),                     // padding
            Constraint::Length(3),                     // input box
            Constraint::Min(0),
        ])
        .split(area);

    let stats = Paragraph::new(Line::from(vec![
        Span::styled("WPM ", dim_bold()),
        Span::styled(session.wpm().to_string(), bold()),
        Span::raw("     "),
        Span::styled("Accuracy ", dim_bold()),
        Span::styled(format!("{}%", session.accuracy()), bold()),
        Span::raw("     "),
        Span::styled("Time Left ", dim_bold()),
        Span::styled(format!("{}s", session.time_left), bold()),
    ]))
    .alignment(Alignment::Center);
    stats.render(chunks[0], buf);

    let quote = Paragraph::new(Line::from(quote_spans(session)))
        .alignment(if prompt_occupied_lines == 1 {
            Alignment::Center
        } else {
            Alignment::Left
        })
        .wrap(Wrap { trim: false });
    quote.render(chunks[2], buf);

    render_input(session, chunks[4], buf);
}

/// Reference text coloured by comparison against the typed text at the same index
fn quote_spans(session: &Session) -> Vec<Span<'static>> {
    let green_bold = bold().fg(Color::Green);
    let red_bold = bold().fg(Color::Red);
    let cursor = dim_bold().add_modifier(Modifier::UNDERLINED);

    let typed: Vec<char> = session.typed_text.chars().collect();
    session
        .reference_text
        .chars()
        .enumerate()
        .map(|(idx, expected)| {
            let style = match typed.get(idx) {
                Some(&c) if c == expected => green_bold,
                Some(_) => red_bold,
                None if idx == typed.len() => cursor,
                None => dim_bold(),
            };
            Span::styled(expected.to_string(), style)
        })
        .collect()
}

fn render_input(session: &Session, area: Rect, buf: &mut Buffer) {
    let disabled = session.input_disabled();
    let border_style = if disabled {
        Style::default().fg(Color::DarkGray)
    } else {
        Style::default().fg(Color::Cyan)
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style);

    let content = if session.typed_text.is_empty() {
        Span::styled(
            format!(
                "Start typing to begin... ({} Mode)",
                session.profile().label
            ),
            Style::default().add_modifier(Modifier::DIM | Modifier::ITALIC),
        )
    } else {
        // keep the tail visible once the input outgrows the box
        let inner = area.width.saturating_sub(2) as usize;
        let typed = &session.typed_text;
        let skip = typed.chars().count().saturating_sub(inner);
        Span::raw(typed.chars().skip(skip).collect::<String>())
    };

    Paragraph::new(Line::from(content))
        .block(block)
        .render(area, buf);
}

fn render_result(session: &Session, area: Rect, buf: &mut Buffer) {
    let profile = session.profile();
    let (headline, headline_style) = if session.is_failed() {
        ("Try Again!", bold().fg(Color::Red))
    } else {
        ("Great Job!", bold().fg(Color::Green))
    };

    let mut lines = vec![
        Line::from(Span::styled(headline, headline_style)),
        Line::default(),
        Line::from(format!("Words per minute: {}", session.wpm())),
        Line::from(format!("Accuracy: {}%", session.accuracy())),
        Line::from(format!("Level: {}", profile.label)),
    ];
    if session.is_failed() {
        lines.push(Line::default());
        lines.push(Line::from(Span::styled(
            format!(
                "Required: WPM > {} and Accuracy > {}%",
                profile.min_wpm, ACCURACY_FLOOR
            ),
            Style::default().fg(Color::Red),
        )));
    }

    Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .render(area, buf);
}

fn render_legend(session: &Session, area: Rect, buf: &mut Buffer) {
    let levels = Difficulty::ALL
        .iter()
        .enumerate()
        .map(|(idx, d)| format!("(f{}) {}", idx + 1, d))
        .join(" / ");
    let retry = if session.is_finished() {
        "(r)etry"
    } else {
        "(ctrl+r) retry"
    };

    Paragraph::new(Span::styled(
        format!("{levels} / {retry} / (esc)ape"),
        Style::default().add_modifier(Modifier::ITALIC),
    ))
    .render(area, buf);
}
