use serde::Serialize;
use tokio::sync::watch;
use tracing::debug;

pub const DEFAULT_TIME_LIMIT_MS: u32 = 1000;
pub const MIN_TIME_LIMIT_MS: u32 = 500;

/// Reason a field value fails validation.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValidationKind {
    #[serde(rename = "required")]
    Required,
    #[serde(rename = "min")]
    Min,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Validator {
    Required,
    Min(u32),
}

impl Validator {
    fn check(&self, value: Option<u32>) -> Option<ValidationKind> {
        match (self, value) {
            (Validator::Required, None) => Some(ValidationKind::Required),
            // `min` only judges present values, a missing one is `required`'s business
            (Validator::Min(min), Some(value)) if value < *min => Some(ValidationKind::Min),
            _ => None,
        }
    }
}

/// Live-editable numeric control that reports validity instead of rejecting writes.
#[derive(Debug)]
pub struct NumberField {
    value: watch::Sender<Option<u32>>,
    default: Option<u32>,
    validators: Vec<Validator>,
}

/// Milliseconds a player has to react, `{ default: 1000, required: true, min: 500 }`.
pub type TimeLimit = NumberField;

impl NumberField {
    pub fn new(default: Option<u32>, validators: Vec<Validator>) -> Self {
        Self {
            value: watch::Sender::new(default),
            default,
            validators,
        }
    }

    pub fn time_limit() -> TimeLimit {
        Self::new(
            Some(DEFAULT_TIME_LIMIT_MS),
            vec![Validator::Required, Validator::Min(MIN_TIME_LIMIT_MS)],
        )
    }

    pub fn value(&self) -> Option<u32> {
        *self.value.borrow()
    }

    /// Store a new value; invalid values are kept and flagged, never refused.
    pub fn set_value(&self, value: Option<u32>) {
        self.value.send_replace(value);
        debug!(?value, valid = self.is_valid(), "Field value changed");
    }

    pub fn reset(&self) {
        self.set_value(self.default);
    }

    pub fn errors(&self) -> Vec<ValidationKind> {
        let value = self.value();
        self.validators
            .iter()
            .filter_map(|validator| validator.check(value))
            .collect()
    }

    pub fn has_error(&self, kind: ValidationKind) -> bool {
        self.errors().contains(&kind)
    }

    pub fn is_valid(&self) -> bool {
        self.errors().is_empty()
    }

    /// The current value, if it passes every validator.
    pub fn valid_value(&self) -> Result<u32, Vec<ValidationKind>> {
        let errors = self.errors();
        match self.value() {
            Some(value) if errors.is_empty() => Ok(value),
            // a field without `Required` may legitimately be empty, but there is nothing to use
            None if errors.is_empty() => Err(vec![ValidationKind::Required]),
            _ => Err(errors),
        }
    }

    /// Watch every edit made to the field.
    pub fn subscribe(&self) -> watch::Receiver<Option<u32>> {
        self.value.subscribe()
    }
}
