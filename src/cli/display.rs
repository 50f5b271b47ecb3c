// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Terminal display for the episode-search CLI.
//!
//! OneDark for dark terminals, One Light for light ones. Detection tries
//! `EPISODE_SEARCH_THEME` first (for explicit control), then `COLORFGBG` (set
//! by some terminals), then defaults to dark. Respects `NO_COLOR` and
//! non-TTY stdout so piped output stays plain.
//!
//! Results are drawn as boxed cards: title, air date and duration, the
//! highlighted snippets with their emphasis in the accent color, and the link.

use std::sync::OnceLock;

use episode_search::highlight::to_terminal;
use episode_search::view::{EpisodeCard, ResultsView, LOADING_MESSAGE, NO_RESULTS_MESSAGE, PROMPT_MESSAGE};
use episode_search::{ErrorKind, SessionStatus};

/// Width between the two vertical borders of a card.
pub const BOX_WIDTH: usize = 80;

pub const RESET: &str = "\x1b[0m";
pub const BOLD: &str = "\x1b[1m";
pub const DIM: &str = "\x1b[2m";
pub const UNDERLINE: &str = "\x1b[4m";

// ═══════════════════════════════════════════════════════════════════════════
// THEME
// ═══════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Theme {
    Dark,
    Light,
}

static THEME: OnceLock<Theme> = OnceLock::new();

/// `explicit` is `EPISODE_SEARCH_THEME`, `colorfgbg` is the terminal's
/// `"fg;bg"` hint. Backgrounds 7 and up, other than 8, are light.
fn theme_from(explicit: Option<&str>, colorfgbg: Option<&str>) -> Theme {
    match explicit.map(str::to_lowercase).as_deref() {
        Some("light" | "l") => return Theme::Light,
        Some("dark" | "d") => return Theme::Dark,
        _ => {}
    }
    let background = colorfgbg
        .and_then(|pair| pair.rsplit(';').next())
        .and_then(|bg| bg.parse::<u8>().ok());
    match background {
        Some(bg) if bg >= 7 && bg != 8 => Theme::Light,
        _ => Theme::Dark,
    }
}

fn theme() -> Theme {
    *THEME.get_or_init(|| {
        let explicit = std::env::var("EPISODE_SEARCH_THEME").ok();
        let colorfgbg = std::env::var("COLORFGBG").ok();
        theme_from(explicit.as_deref(), colorfgbg.as_deref())
    })
}

/// Every color the results area uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Accent {
    Red,
    Green,
    Yellow,
    Blue,
    Gray,
}

impl Accent {
    /// OneDark and One Light values.
    fn rgb(self, theme: Theme) -> (u8, u8, u8) {
        let (dark, light) = match self {
            Accent::Red => ((224, 108, 117), (228, 86, 73)),
            Accent::Green => ((152, 195, 121), (80, 161, 79)),
            Accent::Yellow => ((229, 192, 123), (193, 132, 1)),
            Accent::Blue => ((97, 175, 239), (64, 120, 242)),
            Accent::Gray => ((92, 99, 112), (160, 161, 167)),
        };
        match theme {
            Theme::Dark => dark,
            Theme::Light => light,
        }
    }

    fn escape(self) -> String {
        let (r, g, b) = self.rgb(theme());
        format!("\x1b[38;2;{};{};{}m", r, g, b)
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// TEXT
// ═══════════════════════════════════════════════════════════════════════════

/// Colors only on a TTY, and never with `NO_COLOR` set.
pub fn use_colors() -> bool {
    std::env::var_os("NO_COLOR").is_none() && atty::is(atty::Stream::Stdout)
}

pub fn themed(accent: Accent, modifiers: &[&str], text: &str) -> String {
    if use_colors() {
        format!("{}{}{}{}", modifiers.concat(), accent.escape(), text, RESET)
    } else {
        text.to_string()
    }
}

/// Border drawing that disappears along with the colors.
fn border(accent: Accent) -> (String, &'static str) {
    if use_colors() {
        (accent.escape(), RESET)
    } else {
        (String::new(), "")
    }
}

/// Printed width, ignoring escape sequences.
pub fn visible_len(s: &str) -> usize {
    let mut in_escape = false;
    let mut len = 0;
    for c in s.chars() {
        match c {
            '\x1b' => in_escape = true,
            'm' if in_escape => in_escape = false,
            _ if !in_escape => len += 1,
            _ => {}
        }
    }
    len
}

/// Greedy word wrap on visible width. Escape codes never count.
pub fn wrap(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut line = String::new();
    for word in text.split_whitespace() {
        let needed = visible_len(&line) + usize::from(!line.is_empty()) + visible_len(word);
        if !line.is_empty() && needed > width {
            lines.push(std::mem::take(&mut line));
        }
        if !line.is_empty() {
            line.push(' ');
        }
        line.push_str(word);
    }
    if !line.is_empty() {
        lines.push(line);
    }
    lines
}

fn centered(text: &str) -> (usize, usize) {
    let pad = BOX_WIDTH.saturating_sub(visible_len(text));
    (pad / 2, pad - pad / 2)
}

// ═══════════════════════════════════════════════════════════════════════════
// CARDS
// ═══════════════════════════════════════════════════════════════════════════

/// `│ content │`, padded to the card width.
fn card_row(content: &str) {
    let (on, off) = border(Accent::Gray);
    let pad = BOX_WIDTH.saturating_sub(visible_len(content));
    println!("{on}│{off}{}{}{on}│{off}", content, " ".repeat(pad));
}

/// `┌─ title ───┐`
fn card_top(title: &str) {
    let (on, off) = border(Accent::Gray);
    let label = format!("─ {} ", themed(Accent::Blue, &[BOLD], title));
    let fill = BOX_WIDTH.saturating_sub(visible_len(&label));
    println!("{on}┌{off}{}{on}{}┐{off}", label, "─".repeat(fill));
}

fn card_bottom() {
    let (on, off) = border(Accent::Gray);
    println!("{on}└{}┘{off}", "─".repeat(BOX_WIDTH));
}

/// The heading above the cards, in a double-line frame.
fn banner(text: &str) {
    let (on, off) = border(Accent::Blue);
    let styled = themed(Accent::Yellow, &[BOLD], text);
    let (left, right) = centered(text);
    println!("{on}╔{}╗{off}", "═".repeat(BOX_WIDTH));
    println!("{on}║{off}{}{}{}{on}║{off}", " ".repeat(left), styled, " ".repeat(right));
    println!("{on}╚{}╝{off}", "═".repeat(BOX_WIDTH));
}

// ═══════════════════════════════════════════════════════════════════════════
// SEMANTIC FORMATTERS
// ═══════════════════════════════════════════════════════════════════════════

/// Color-coded session status
pub fn status_badge(status: SessionStatus) -> String {
    let text = status.to_string();
    match status {
        SessionStatus::Idle => themed(Accent::Gray, &[], &text),
        SessionStatus::Loading => themed(Accent::Yellow, &[], &text),
        SessionStatus::Loaded => themed(Accent::Green, &[], &text),
        SessionStatus::Error(_) => themed(Accent::Red, &[BOLD], &text),
    }
}

/// Message for a failed request, by kind
pub fn failure_message(kind: ErrorKind) -> String {
    match kind {
        ErrorKind::Network => "Could not reach the episode archive.".to_string(),
        ErrorKind::Backend { status } => format!("The episode archive answered with HTTP {}.", status),
        ErrorKind::Decode => "The episode archive sent a response we could not read.".to_string(),
        ErrorKind::Timeout => "The episode archive took too long to answer.".to_string(),
    }
}

/// Highlight fragment rendered for the terminal
pub fn fragment_line(fragment_html: &str, raw_html: bool) -> String {
    if raw_html {
        fragment_html.to_string()
    } else if use_colors() {
        let on = format!("{}{}", BOLD, Accent::Yellow.escape());
        to_terminal(fragment_html, &on, RESET)
    } else {
        to_terminal(fragment_html, "*", "*")
    }
}

fn print_card(card: &EpisodeCard, raw_html: bool) {
    card_top(&card.title);
    card_row(&format!("  {}", themed(Accent::Gray, &[BOLD], &card.subtitle)));

    for field in &card.highlights {
        card_row("");
        card_row(&format!("  {}", themed(Accent::Gray, &[DIM], &field.field)));
        for fragment in &field.fragments {
            for line in wrap(&fragment_line(&fragment.fragment_html, raw_html), BOX_WIDTH - 4) {
                card_row(&format!("    {}", line));
            }
        }
    }

    card_row("");
    card_row(&format!("  {}", themed(Accent::Blue, &[UNDERLINE], &card.link)));
    card_bottom();
}

fn print_message(text: &str) {
    println!();
    println!("  {}", themed(Accent::Gray, &[], text));
    println!();
}

/// Render the whole results area. `raw_html` prints fragments as received.
pub fn print_view(view: &ResultsView, raw_html: bool) {
    match view {
        ResultsView::Prompt => print_message(PROMPT_MESSAGE),
        ResultsView::Loading => print_message(LOADING_MESSAGE),
        ResultsView::NoResults => print_message(NO_RESULTS_MESSAGE),
        ResultsView::Failed(kind) => {
            println!();
            println!("  {}", themed(Accent::Red, &[BOLD], &failure_message(*kind)));
            println!();
        }
        ResultsView::Results {
            heading,
            cards,
            load_more,
            error,
        } => {
            println!();
            banner(heading);
            for card in cards {
                print_card(card, raw_html);
            }
            if let Some(button) = load_more {
                let label = format!("[ {} ]", button.label);
                let styled = if button.enabled {
                    themed(Accent::Blue, &[BOLD], &label)
                } else {
                    themed(Accent::Gray, &[DIM], &label)
                };
                let (left, _) = centered(&label);
                println!("{}{}", " ".repeat(left), styled);
            }
            if let Some(kind) = error {
                let message = format!("Could not load more: {}", failure_message(*kind));
                let (left, _) = centered(&message);
                println!("{}{}", " ".repeat(left), themed(Accent::Red, &[BOLD], &message));
            }
            println!();
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// TESTS
// ═══════════════════════════════════════════════════════════════════════════
