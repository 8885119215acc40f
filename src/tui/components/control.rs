//! A single settings widget rendered as one row.

use crossterm_actions::{InputEvent, NavigationEvent, SelectionEvent, TuiEvent};
use ratatui::Frame;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};
use tuirealm::{
    Component, Event, MockComponent, State, StateValue,
    command::{Cmd, CmdResult, Direction as CmdDirection},
    event::Key,
    props::{AttrValue, Attribute, Props},
};

use crate::tui::AppAction;
use crate::tui::activities::{Msg, UserEvent};
use crate::tui::{dispatcher, handle_global_app_events};
use crate::widget::{WidgetKind, WidgetValue, WidgetView};

/// Width of the label column.
const LABEL_WIDTH: u16 = 20;

/// One settings widget: check box, slider, selector or input field.
pub struct Control {
    props: Props,
    view: WidgetView,
    /// Whether a text or number field is being edited
    editing: bool,
    edit_buffer: String,
}

impl Control {
    pub fn new(view: WidgetView) -> Self {
        Self {
            props: Props::default(),
            view,
            editing: false,
            edit_buffer: String::new(),
        }
    }

    fn focused(&self) -> bool {
        self.props
            .get_or(Attribute::Focus, AttrValue::Flag(false))
            .unwrap_flag()
    }

    fn changed(&self) -> Option<Msg> {
        Some(Msg::ValueChanged(self.view.id.clone(), self.view.value.clone()))
    }

    /// Step a slider or number by `steps`, or cycle a selector.
    fn adjust(&mut self, steps: f64) -> bool {
        match self.view.kind {
            WidgetKind::Range { min, max, step } => {
                let current = self.view.value.as_f64().unwrap_or(min);
                let next = (current + steps * step).clamp(min, max);
                if next == current {
                    return false;
                }
                self.view.value = WidgetValue::Number(next);
                true
            }
            WidgetKind::Number => {
                let current = self.view.value.as_f64().unwrap_or_default();
                self.view.value = WidgetValue::Number(current + steps);
                true
            }
            WidgetKind::Select => {
                let count = self.view.options.len();
                if count == 0 {
                    return false;
                }
                let current = match self.view.value {
                    WidgetValue::Index(Some(i)) => i,
                    _ => 0,
                };
                let next = if steps < 0.0 {
                    (current + count - 1) % count
                } else {
                    (current + 1) % count
                };
                self.view.value = WidgetValue::Index(Some(next));
                next != current
            }
            WidgetKind::Check | WidgetKind::Text => false,
        }
    }

    fn toggle(&mut self) -> bool {
        if self.view.kind != WidgetKind::Check {
            return false;
        }
        self.view.value = WidgetValue::Bool(!self.view.value.truthy());
        true
    }

    fn is_editable(&self) -> bool {
        matches!(self.view.kind, WidgetKind::Text | WidgetKind::Number)
    }

    fn start_editing(&mut self) {
        self.editing = true;
        self.edit_buffer = match &self.view.value {
            WidgetValue::Text(s) => s.clone(),
            WidgetValue::Number(n) => format!("{n}"),
            _ => String::new(),
        };
    }

    fn cancel_editing(&mut self) {
        self.editing = false;
        self.edit_buffer.clear();
    }

    fn confirm_editing(&mut self) -> bool {
        self.editing = false;
        let buffer = std::mem::take(&mut self.edit_buffer);
        match self.view.kind {
            WidgetKind::Number => match buffer.trim().parse::<f64>() {
                Ok(n) => {
                    self.view.value = WidgetValue::Number(n);
                    true
                }
                Err(_) => false,
            },
            _ => {
                self.view.value = WidgetValue::Text(buffer);
                true
            }
        }
    }

    fn type_char(&mut self, c: char) {
        let accept = match self.view.kind {
            WidgetKind::Number => {
                c.is_ascii_digit()
                    || (c == '.' && !self.edit_buffer.contains('.'))
                    || (c == '-' && self.edit_buffer.is_empty())
            }
            _ => !c.is_control(),
        };
        if accept {
            self.edit_buffer.push(c);
        }
    }

    fn draw_value(&self, frame: &mut Frame, area: Rect, focused: bool) {
        let enabled = self.view.enabled;
        let accent = if !enabled {
            Style::default().fg(Color::DarkGray)
        } else if focused {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default()
        };

        let line = match self.view.kind {
            WidgetKind::Check => {
                let mark = if self.view.value.truthy() { "x" } else { " " };
                Line::from(Span::styled(format!("[{mark}]"), accent))
            }
            WidgetKind::Range { min, max, .. } => {
                let value = self.view.value.as_f64().unwrap_or(min);
                let slider_width = area.width.saturating_sub(6) as usize;
                let ratio = if max > min {
                    (value - min) / (max - min)
                } else {
                    0.0
                };
                let pos = (ratio * slider_width as f64).round() as usize;
                let pos = pos.min(slider_width.saturating_sub(1));

                let (filled_style, empty_style, handle_style) = if focused && enabled {
                    (
                        Style::default().fg(Color::Cyan),
                        Style::default().fg(Color::DarkGray),
                        Style::default().fg(Color::White),
                    )
                } else {
                    (
                        Style::default().fg(Color::DarkGray),
                        Style::default().fg(Color::DarkGray),
                        Style::default().fg(Color::Gray),
                    )
                };

                let mut spans = Vec::with_capacity(slider_width + 1);
                for i in 0..slider_width {
                    if i == pos {
                        spans.push(Span::styled("●", handle_style));
                    } else if i < pos {
                        spans.push(Span::styled("━", filled_style));
                    } else {
                        spans.push(Span::styled("─", empty_style));
                    }
                }
                spans.push(Span::styled(format!(" {value:>3.0}"), accent));
                Line::from(spans)
            }
            WidgetKind::Select => {
                let label = match self.view.value {
                    WidgetValue::Index(Some(i)) => {
                        self.view.options.get(i).map(String::as_str).unwrap_or("")
                    }
                    _ => "",
                };
                Line::from(Span::styled(format!("◂ {label} ▸"), accent))
            }
            WidgetKind::Text | WidgetKind::Number if self.editing => Line::from(Span::styled(
                self.edit_buffer.as_str(),
                Style::default().fg(Color::White).bg(Color::DarkGray),
            )),
            WidgetKind::Text | WidgetKind::Number => {
                Line::from(Span::styled(self.view.value.to_string(), accent))
            }
        };

        frame.render_widget(Paragraph::new(line), area);
    }
}

impl MockComponent for Control {
    fn view(&mut self, frame: &mut Frame, area: Rect) {
        let focused = self.focused();

        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(LABEL_WIDTH), Constraint::Min(10)])
            .split(area);

        let label_style = if !self.view.enabled {
            Style::default().add_modifier(Modifier::DIM)
        } else if focused {
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        let mut label = vec![Span::styled(format!("{}:", self.view.label), label_style)];
        if self.view.experimental {
            label.push(Span::styled(" *", Style::default().fg(Color::Yellow)));
        }
        frame.render_widget(Paragraph::new(Line::from(label)), cols[0]);

        self.draw_value(frame, cols[1], focused);
    }

    fn query(&self, attr: Attribute) -> Option<AttrValue> {
        self.props.get(attr)
    }

    fn attr(&mut self, attr: Attribute, value: AttrValue) {
        self.props.set(attr, value);
    }

    fn state(&self) -> State {
        match &self.view.value {
            WidgetValue::Bool(b) => State::One(StateValue::Bool(*b)),
            WidgetValue::Number(n) => State::One(StateValue::F64(*n)),
            WidgetValue::Text(s) => State::One(StateValue::String(s.clone())),
            WidgetValue::Index(Some(i)) => State::One(StateValue::Usize(*i)),
            WidgetValue::Index(None) => State::None,
        }
    }

    fn perform(&mut self, cmd: Cmd) -> CmdResult {
        if !self.view.enabled {
            return CmdResult::None;
        }
        let changed = match cmd {
            Cmd::Move(CmdDirection::Left) => self.adjust(-1.0),
            Cmd::Move(CmdDirection::Right) => self.adjust(1.0),
            Cmd::Scroll(CmdDirection::Left) => self.adjust(-10.0),
            Cmd::Scroll(CmdDirection::Right) => self.adjust(10.0),
            Cmd::Toggle => self.toggle(),
            _ => false,
        };
        if changed {
            CmdResult::Changed(self.state())
        } else {
            CmdResult::None
        }
    }
}

impl Component<Msg, UserEvent> for Control {
    fn on(&mut self, ev: Event<UserEvent>) -> Option<Msg> {
        if !self.focused() {
            return None;
        }

        let Event::Keyboard(key_event) = ev else {
            return None;
        };

        // Raw key input while editing
        if self.editing {
            match key_event.code {
                Key::Enter => {
                    if self.confirm_editing() {
                        return self.changed();
                    }
                }
                Key::Esc => self.cancel_editing(),
                Key::Backspace => {
                    self.edit_buffer.pop();
                }
                Key::Char(c) => self.type_char(c),
                _ => {}
            }
            return None;
        }

        let action = dispatcher().dispatch(&key_event)?;

        if let Some(msg) = handle_global_app_events(&action) {
            return Some(msg);
        }

        let cmd = match action {
            AppAction::Tui(TuiEvent::Selection(SelectionEvent::Next))
            | AppAction::Tui(TuiEvent::Navigation(NavigationEvent::Down)) => {
                return Some(Msg::FocusNext);
            }
            AppAction::Tui(TuiEvent::Selection(SelectionEvent::Prev))
            | AppAction::Tui(TuiEvent::Navigation(NavigationEvent::Up)) => {
                return Some(Msg::FocusPrev);
            }
            AppAction::Tui(TuiEvent::Input(InputEvent::Confirm)) => {
                if self.is_editable() && self.view.enabled {
                    self.start_editing();
                    return None;
                }
                Cmd::Toggle
            }
            AppAction::Toggle => Cmd::Toggle,
            AppAction::Tui(TuiEvent::Navigation(NavigationEvent::Left))
            | AppAction::ValueDecrementSmall => Cmd::Move(CmdDirection::Left),
            AppAction::Tui(TuiEvent::Navigation(NavigationEvent::Right))
            | AppAction::ValueIncrementSmall => Cmd::Move(CmdDirection::Right),
            AppAction::ValueDecrementLarge => Cmd::Scroll(CmdDirection::Left),
            AppAction::ValueIncrementLarge => Cmd::Scroll(CmdDirection::Right),
            _ => return None,
        };

        match self.perform(cmd) {
            CmdResult::Changed(_) => self.changed(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn view(kind: WidgetKind, value: WidgetValue) -> WidgetView {
        WidgetView {
            id: "w".to_string(),
            label: "Widget".to_string(),
            kind,
            value,
            options: vec!["Low".to_string(), "High".to_string()],
            enabled: true,
            experimental: false,
        }
    }

    #[test]
    fn slider_moves_by_step_and_clamps() {
        let mut control = Control::new(view(
            WidgetKind::range(0.0, 100.0),
            WidgetValue::Number(95.0),
        ));
        assert!(matches!(
            control.perform(Cmd::Move(CmdDirection::Left)),
            CmdResult::Changed(_)
        ));
        assert_eq!(&control.view.value, &WidgetValue::Number(94.0));

        control.perform(Cmd::Scroll(CmdDirection::Right));
        assert_eq!(&control.view.value, &WidgetValue::Number(100.0));
        assert_eq!(
            control.perform(Cmd::Move(CmdDirection::Right)),
            CmdResult::None
        );
    }

    #[test]
    fn check_box_toggles() {
        let mut control = Control::new(view(WidgetKind::Check, WidgetValue::Bool(true)));
        control.perform(Cmd::Toggle);
        assert_eq!(&control.view.value, &WidgetValue::Bool(false));
    }

    #[test]
    fn selector_wraps_around() {
        let mut control = Control::new(view(WidgetKind::Select, WidgetValue::Index(Some(0))));
        control.perform(Cmd::Move(CmdDirection::Left));
        assert_eq!(&control.view.value, &WidgetValue::Index(Some(1)));
        control.perform(Cmd::Move(CmdDirection::Right));
        assert_eq!(&control.view.value, &WidgetValue::Index(Some(0)));
    }

    #[test]
    fn disabled_control_ignores_commands() {
        let mut disabled = view(WidgetKind::range(0.0, 100.0), WidgetValue::Number(50.0));
        disabled.enabled = false;
        let mut control = Control::new(disabled);
        assert_eq!(
            control.perform(Cmd::Move(CmdDirection::Right)),
            CmdResult::None
        );
        assert_eq!(&control.view.value, &WidgetValue::Number(50.0));
    }

    #[test]
    fn number_edit_rejects_garbage() {
        let mut control = Control::new(view(WidgetKind::Number, WidgetValue::Number(3.0)));
        control.start_editing();
        control.edit_buffer = "abc".to_string();
        assert!(!control.confirm_editing());
        assert_eq!(&control.view.value, &WidgetValue::Number(3.0));

        control.start_editing();
        control.edit_buffer.clear();
        for c in "-2.5x".chars() {
            control.type_char(c);
        }
        assert_eq!(control.edit_buffer, "-2.5");
        assert!(control.confirm_editing());
        assert_eq!(&control.view.value, &WidgetValue::Number(-2.5));
    }
}
