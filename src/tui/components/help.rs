//! Key help for the settings dialog: the footer hint line and the `?` overlay.
//!
//! The overlay only lists the controls of widget kinds that are on screen, so
//! a tab made of a check box and sliders never shows text field editing keys.

use crossterm_actions::{AppEvent, NavigationEvent, SelectionEvent, TuiEvent};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Flex, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
};

use crate::tui::{AppAction, dispatcher};
use crate::widget::WidgetKind;

const QUIT: AppAction = AppAction::Tui(TuiEvent::App(AppEvent::Quit));
const HELP: AppAction = AppAction::Tui(TuiEvent::App(AppEvent::Help));
const REFRESH: AppAction = AppAction::Tui(TuiEvent::App(AppEvent::Refresh));
const NEXT: AppAction = AppAction::Tui(TuiEvent::Selection(SelectionEvent::Next));
const PREV: AppAction = AppAction::Tui(TuiEvent::Selection(SelectionEvent::Prev));
const UP: AppAction = AppAction::Tui(TuiEvent::Navigation(NavigationEvent::Up));
const DOWN: AppAction = AppAction::Tui(TuiEvent::Navigation(NavigationEvent::Down));
const LEFT: AppAction = AppAction::Tui(TuiEvent::Navigation(NavigationEvent::Left));
const RIGHT: AppAction = AppAction::Tui(TuiEvent::Navigation(NavigationEvent::Right));

/// Keys of a help row: looked up in the dispatcher, or fixed editor keys.
enum Keys {
    Bound(&'static [AppAction]),
    Raw(&'static str),
}

struct HelpRow {
    what: &'static str,
    keys: Keys,
}

/// A titled block of the help overlay.
pub struct HelpSection {
    pub title: &'static str,
    rows: &'static [HelpRow],
}

const DIALOG: HelpSection = HelpSection {
    title: "Dialog",
    rows: &[
        HelpRow { what: "Save to file", keys: Keys::Bound(&[AppAction::Save]) },
        HelpRow { what: "Reload file", keys: Keys::Bound(&[REFRESH]) },
        HelpRow { what: "This help", keys: Keys::Bound(&[HELP]) },
        HelpRow { what: "Quit (saves edits)", keys: Keys::Bound(&[QUIT]) },
    ],
};

const ROWS: HelpSection = HelpSection {
    title: "Moving between rows",
    rows: &[
        HelpRow { what: "Next row", keys: Keys::Bound(&[NEXT, DOWN]) },
        HelpRow { what: "Previous row", keys: Keys::Bound(&[PREV, UP]) },
    ],
};

const CHECK_BOXES: HelpSection = HelpSection {
    title: "Check boxes",
    rows: &[HelpRow { what: "Flip on/off", keys: Keys::Bound(&[AppAction::Toggle]) }],
};

const SLIDERS: HelpSection = HelpSection {
    title: "Sliders",
    rows: &[
        HelpRow {
            what: "Down/up one step",
            keys: Keys::Bound(&[
                LEFT,
                RIGHT,
                AppAction::ValueDecrementSmall,
                AppAction::ValueIncrementSmall,
            ]),
        },
        HelpRow {
            what: "Down/up ten steps",
            keys: Keys::Bound(&[AppAction::ValueDecrementLarge, AppAction::ValueIncrementLarge]),
        },
    ],
};

const SELECTORS: HelpSection = HelpSection {
    title: "Selectors",
    rows: &[HelpRow { what: "Previous/next option", keys: Keys::Bound(&[LEFT, RIGHT]) }],
};

const FIELDS: HelpSection = HelpSection {
    title: "Text and number fields",
    rows: &[
        HelpRow { what: "Edit, then confirm", keys: Keys::Raw("Enter") },
        HelpRow { what: "Discard the edit", keys: Keys::Raw("Esc") },
        HelpRow { what: "Delete a character", keys: Keys::Raw("Backspace") },
        HelpRow {
            what: "Step a number",
            keys: Keys::Bound(&[AppAction::ValueDecrementSmall, AppAction::ValueIncrementSmall]),
        },
    ],
};

/// Actions shown in the settings footer.
pub const SETTINGS_FOOTER_ACTIONS: &[AppAction] = &[NEXT, AppAction::Toggle, AppAction::Save, HELP, QUIT];

fn section_for(kind: &WidgetKind) -> &'static HelpSection {
    match kind {
        WidgetKind::Check => &CHECK_BOXES,
        WidgetKind::Range { .. } => &SLIDERS,
        WidgetKind::Select => &SELECTORS,
        WidgetKind::Text | WidgetKind::Number => &FIELDS,
    }
}

/// Help sections for a screen showing `kinds`, one per kind in order of
/// first appearance, after the dialog and row movement keys.
pub fn help_sections(kinds: &[WidgetKind]) -> Vec<&'static HelpSection> {
    let mut sections: Vec<&'static HelpSection> = vec![&DIALOG, &ROWS];
    for kind in kinds {
        let section = section_for(kind);
        if !sections.iter().any(|s| s.title == section.title) {
            sections.push(section);
        }
    }
    sections
}

/// First bound key of each action, joined with " / ".
fn bound_keys(actions: &[AppAction]) -> String {
    let entries = dispatcher().config().help_entries();
    actions
        .iter()
        .filter_map(|a| entries.get(a).and_then(|e| e.keys.first()))
        .map(|k| k.to_string())
        .collect::<Vec<_>>()
        .join(" / ")
}

fn keys_text(keys: &Keys) -> String {
    match keys {
        Keys::Bound(actions) => bound_keys(actions),
        Keys::Raw(text) => (*text).to_string(),
    }
}

/// Footer hint line: "key verb · key verb", one key per action, then `extras`
/// as (verb, keys).
pub fn format_footer(actions: &[AppAction], extras: &[(&str, &str)]) -> String {
    let entries = dispatcher().config().help_entries();
    let bound = actions.iter().filter_map(|a| {
        let entry = entries.get(a)?;
        let key = entry.keys.first()?;
        let verb = entry.description?.split_whitespace().next()?.to_lowercase();
        Some(format!("{key} {verb}"))
    });
    let extra = extras.iter().map(|(verb, keys)| format!("{keys} {verb}"));
    bound.chain(extra).collect::<Vec<_>>().join(" · ")
}

fn section_lines(sections: &[&HelpSection]) -> Vec<Line<'static>> {
    let heading = Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD);
    let key_style = Style::default().fg(Color::Yellow);

    let mut lines = Vec::new();
    for (i, section) in sections.iter().enumerate() {
        if i > 0 {
            lines.push(Line::from(""));
        }
        lines.push(Line::from(Span::styled(section.title, heading)));
        for row in section.rows {
            lines.push(Line::from(vec![
                Span::styled(format!("  {:<14}", keys_text(&row.keys)), key_style),
                Span::raw(row.what),
            ]));
        }
    }
    lines
}

/// Fixed-size box centered in `area`, shrunk to fit.
fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let [row] = Layout::vertical([Constraint::Length(height.min(area.height))])
        .flex(Flex::Center)
        .areas(area);
    let [cell] = Layout::horizontal([Constraint::Length(width.min(area.width))])
        .flex(Flex::Center)
        .areas(row);
    cell
}

/// Draw the help overlay for a screen showing widgets of `kinds`.
pub fn render_help(frame: &mut Frame, kinds: &[WidgetKind]) {
    let lines = section_lines(&help_sections(kinds));
    // Borders plus the close hint
    let height = u16::try_from(lines.len()).unwrap_or(u16::MAX).saturating_add(3);
    let area = centered(frame.area(), 48, height);
    frame.render_widget(Clear, area);

    let block = Block::default()
        .title(" Keys ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let [body, hint] = Layout::vertical([Constraint::Min(0), Constraint::Length(1)]).areas(inner);
    frame.render_widget(Paragraph::new(lines), body);
    frame.render_widget(
        Paragraph::new("Esc closes")
            .style(Style::default().add_modifier(Modifier::DIM))
            .alignment(Alignment::Right),
        hint,
    );
}
