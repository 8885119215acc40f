//! Generic settings widgets.
//!
//! A [`SettingsWidget`] is one on-screen control: a check box, a text or
//! numeric input, a range slider, or a select. It owns its typed value and an
//! optional change callback. The callback does not perform side effects
//! itself; it maps the new value to an owner-defined message, and the owner
//! acts on that message (the same shape as a tui-realm `Component::on`).

use std::fmt;

use tracing::{debug, trace, warn};

/// Marker class for widgets that stay hidden unless settings debugging is on.
pub const EXPERIMENTAL_CLASS: &str = "experimental";

/// Marker class carried by the label of check box widgets.
pub const CHECK_LABEL_CLASS: &str = "checksetting";

/// The control type of a widget, which decides its value semantics.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WidgetKind {
    /// Check box holding a boolean.
    Check,
    /// Free text input.
    Text,
    /// Numeric input. Values are stored as given.
    Number,
    /// Range slider. Values are clamped to `[min, max]` and snapped to `step`.
    Range { min: f64, max: f64, step: f64 },
    /// Drop-down selection over an option list.
    Select,
}

impl WidgetKind {
    /// Range slider with an integer step.
    pub fn range(min: f64, max: f64) -> Self {
        Self::Range {
            min,
            max,
            step: 1.0,
        }
    }

    /// Short name used in error messages and logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Check => "checkbox",
            Self::Text => "text",
            Self::Number => "number",
            Self::Range { .. } => "range",
            Self::Select => "select",
        }
    }

    fn initial_value(&self) -> WidgetValue {
        match self {
            Self::Check => WidgetValue::Bool(false),
            Self::Text | Self::Number => WidgetValue::Text(String::new()),
            Self::Range { min, .. } => WidgetValue::Number(*min),
            Self::Select => WidgetValue::Index(None),
        }
    }
}

impl fmt::Display for WidgetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A value read from or written to a widget.
#[derive(Debug, Clone, PartialEq)]
pub enum WidgetValue {
    Bool(bool),
    Number(f64),
    Text(String),
    /// Selected option index of a select widget, `None` when nothing is selected.
    Index(Option<usize>),
}

impl WidgetValue {
    /// Loose boolean interpretation, used when writing to a check box.
    pub fn truthy(&self) -> bool {
        match self {
            Self::Bool(b) => *b,
            Self::Number(n) => *n != 0.0 && !n.is_nan(),
            Self::Text(s) => !s.is_empty(),
            Self::Index(i) => i.is_some(),
        }
    }

    /// Numeric interpretation. Text is parsed; booleans have none.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Text(s) => s.trim().parse().ok(),
            Self::Index(i) => i.map(|i| i as f64),
            Self::Bool(_) => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

impl From<bool> for WidgetValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<f64> for WidgetValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<i32> for WidgetValue {
    fn from(value: i32) -> Self {
        Self::Number(f64::from(value))
    }
}

impl From<&str> for WidgetValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for WidgetValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl fmt::Display for WidgetValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
            Self::Index(Some(i)) => write!(f, "#{i}"),
            Self::Index(None) => f.write_str("-"),
        }
    }
}

/// One entry of a select widget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    pub label: String,
    pub value: String,
}

/// Error type for widget operations.
#[derive(Debug, Clone, PartialEq)]
pub enum WidgetError {
    /// Operation is only valid for another widget kind.
    Unsupported {
        kind: WidgetKind,
        operation: &'static str,
    },
}

impl fmt::Display for WidgetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unsupported { kind, operation } => write!(
                f,
                "settings widget of kind \"{}\" does not support {}",
                kind, operation
            ),
        }
    }
}

impl std::error::Error for WidgetError {}

type ChangeCallback<M> = Box<dyn Fn(&WidgetValue) -> M>;

/// A settings control bound to an optional change callback.
///
/// `M` is the message type the change callback produces.
pub struct SettingsWidget<M> {
    id: String,
    label: String,
    kind: WidgetKind,
    value: WidgetValue,
    options: Vec<SelectOption>,
    enabled: bool,
    classes: Vec<&'static str>,
    label_classes: Vec<&'static str>,
    on_change: Option<ChangeCallback<M>>,
}

impl<M> SettingsWidget<M> {
    /// Create a widget of the given kind.
    ///
    /// Select widgets start without options and without a selection; see
    /// [`SettingsWidget::with_options`].
    pub fn new(id: impl Into<String>, label: impl Into<String>, kind: WidgetKind) -> Self {
        let label_classes = if kind == WidgetKind::Check {
            vec![CHECK_LABEL_CLASS]
        } else {
            Vec::new()
        };

        Self {
            id: id.into(),
            label: label.into(),
            value: kind.initial_value(),
            kind,
            options: Vec::new(),
            enabled: true,
            classes: Vec::new(),
            label_classes,
            on_change: None,
        }
    }

    /// Range slider with an integer step.
    pub fn slider(id: impl Into<String>, label: impl Into<String>, min: f64, max: f64) -> Self {
        Self::new(id, label, WidgetKind::range(min, max))
    }

    /// Populate a select widget with `(label, value)` pairs and select index 0.
    ///
    /// Options passed to any other kind are ignored.
    pub fn with_options<L, V>(mut self, options: impl IntoIterator<Item = (L, V)>) -> Self
    where
        L: AsRef<str>,
        V: AsRef<str>,
    {
        if self.kind != WidgetKind::Select {
            debug!(id = %self.id, kind = %self.kind, "options ignored for non-select widget");
            return self;
        }
        for (label, value) in options {
            self.push_option(label.as_ref(), value.as_ref());
        }
        self.select_index(0);
        self
    }

    /// Mark the widget as experimental (hidden unless settings debugging is on).
    pub fn experimental(mut self, experimental: bool) -> Self {
        if experimental && !self.classes.contains(&EXPERIMENTAL_CLASS) {
            self.classes.push(EXPERIMENTAL_CLASS);
        }
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn kind(&self) -> WidgetKind {
        self.kind
    }

    pub fn options(&self) -> &[SelectOption] {
        &self.options
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        if self.enabled != enabled {
            trace!(id = %self.id, enabled, "widget enabled state changed");
        }
        self.enabled = enabled;
    }

    pub fn is_experimental(&self) -> bool {
        self.has_class(EXPERIMENTAL_CLASS)
    }

    /// Check for a marker class on the control.
    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| *c == class)
    }

    /// Check for a marker class on the label.
    pub fn label_has_class(&self, class: &str) -> bool {
        self.label_classes.iter().any(|c| *c == class)
    }

    /// Current value.
    ///
    /// Select widgets report their selected index, check boxes their checked
    /// state, and every other kind the stored value.
    pub fn value(&self) -> WidgetValue {
        self.value.clone()
    }

    /// Write a value according to the widget kind.
    ///
    /// - select: a number is an index, a string is matched against option
    ///   values; unresolved or out-of-range selections leave it unchanged
    /// - check: checked state becomes the value's truthiness
    /// - range: clamped to the range and snapped to the step
    /// - text/number: stored as given
    ///
    /// This does not dispatch a change event; see [`SettingsWidget::change`].
    pub fn set_value(&mut self, value: impl Into<WidgetValue>) {
        let value = value.into();
        match self.kind {
            WidgetKind::Select => {
                let idx = self.requested_index(&value);
                self.select_index(idx);
            }
            WidgetKind::Check => {
                self.value = WidgetValue::Bool(value.truthy());
            }
            WidgetKind::Range { min, max, step } => match value.as_f64() {
                Some(n) if n.is_finite() => {
                    self.value = WidgetValue::Number(snap(n, min, max, step));
                }
                _ => warn!(id = %self.id, %value, "non-numeric value for range widget"),
            },
            WidgetKind::Text | WidgetKind::Number => {
                self.value = value;
            }
        }
    }

    /// Select the option at `idx`.
    ///
    /// Out-of-range indices log a warning and leave the selection unchanged;
    /// negative indices are ignored.
    pub fn set_selected(&mut self, idx: i64) -> Result<(), WidgetError> {
        if self.kind != WidgetKind::Select {
            return Err(WidgetError::Unsupported {
                kind: self.kind,
                operation: "index selection",
            });
        }
        self.select_index(idx);
        Ok(())
    }

    /// Append an option to a select widget. An empty value reuses the label.
    pub fn add_option(&mut self, label: &str, value: &str) -> Result<(), WidgetError> {
        if self.kind != WidgetKind::Select {
            return Err(WidgetError::Unsupported {
                kind: self.kind,
                operation: "adding selection options",
            });
        }
        self.push_option(label, value);
        Ok(())
    }

    /// Attach the change callback, replacing any previous one.
    pub fn on_change(&mut self, callback: impl Fn(&WidgetValue) -> M + 'static) {
        self.on_change = Some(Box::new(callback));
    }

    /// Handle a user edit: write `value`, then dispatch the change event.
    ///
    /// Disabled widgets receive no change events and return `None`, as does a
    /// widget without a callback.
    pub fn change(&mut self, value: impl Into<WidgetValue>) -> Option<M> {
        if !self.enabled {
            debug!(id = %self.id, "change ignored on disabled widget");
            return None;
        }
        self.set_value(value);
        self.dispatch_change()
    }

    /// Invoke the change callback with the current value.
    pub fn dispatch_change(&self) -> Option<M> {
        let callback = self.on_change.as_ref()?;
        debug!(id = %self.id, value = %self.value, "change event");
        Some(callback(&self.value))
    }

    /// Append this widget to a container.
    pub fn add_to(&self, column: &mut Column) {
        column.push(&self.id);
    }

    /// Snapshot for rendering.
    pub fn view(&self) -> WidgetView {
        WidgetView {
            id: self.id.clone(),
            label: self.label.clone(),
            kind: self.kind,
            value: self.value.clone(),
            options: self.options.iter().map(|o| o.label.clone()).collect(),
            enabled: self.enabled,
            experimental: self.is_experimental(),
        }
    }

    fn push_option(&mut self, label: &str, value: &str) {
        let value = if value.is_empty() { label } else { value };
        self.options.push(SelectOption {
            label: label.to_string(),
            value: value.to_string(),
        });
        // The first option of an empty select becomes selected
        if self.value == WidgetValue::Index(None) {
            self.value = WidgetValue::Index(Some(0));
        }
    }

    /// Index a select write asks for; `-1` when nothing matches.
    fn requested_index(&self, value: &WidgetValue) -> i64 {
        match value {
            WidgetValue::Number(n) if n.is_finite() => *n as i64,
            // Indices past i64::MAX still count as out of range
            WidgetValue::Index(Some(i)) => i64::try_from(*i).unwrap_or(i64::MAX),
            WidgetValue::Text(s) => self
                .options
                .iter()
                .position(|o| o.value == *s)
                .map_or(-1, |i| i64::try_from(i).unwrap_or(i64::MAX)),
            _ => -1,
        }
    }

    fn select_index(&mut self, idx: i64) {
        if idx >= self.options.len() as i64 {
            warn!(
                id = %self.id,
                idx,
                options = self.options.len(),
                "invalid index for select widget"
            );
            return;
        }
        if idx > -1 {
            self.value = WidgetValue::Index(Some(idx as usize));
        }
    }
}

impl<M> fmt::Debug for SettingsWidget<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SettingsWidget")
            .field("id", &self.id)
            .field("label", &self.label)
            .field("kind", &self.kind)
            .field("value", &self.value)
            .field("options", &self.options)
            .field("enabled", &self.enabled)
            .field("classes", &self.classes)
            .field("on_change", &self.on_change.is_some())
            .finish()
    }
}

/// Clamp to `[min, max]` after snapping to the nearest step from `min`.
fn snap(value: f64, min: f64, max: f64, step: f64) -> f64 {
    let snapped = if step > 0.0 {
        min + ((value - min) / step).round() * step
    } else {
        value
    };
    snapped.clamp(min, max)
}

/// Widgets to show: experimental ones only when `show_experimental` is set.
pub fn visible<'a, M: 'a>(
    widgets: impl Iterator<Item = &'a SettingsWidget<M>>,
    show_experimental: bool,
) -> impl Iterator<Item = &'a SettingsWidget<M>> {
    widgets.filter(move |w| show_experimental || !w.is_experimental())
}

/// Render-ready copy of a widget's state.
#[derive(Debug, Clone, PartialEq)]
pub struct WidgetView {
    pub id: String,
    pub label: String,
    pub kind: WidgetKind,
    pub value: WidgetValue,
    /// Option labels, for select widgets.
    pub options: Vec<String>,
    pub enabled: bool,
    pub experimental: bool,
}

/// An ordered container of widget ids.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Column {
    ids: Vec<String>,
}

impl Column {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&mut self, id: &str) {
        self.ids.push(id.to_string());
    }

    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}
