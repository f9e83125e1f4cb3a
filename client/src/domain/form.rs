//! Declarative form handling shared by the profile and post screens.
//!
//! A screen is a static table of [`FieldSpec`] values plus a submit handler.
//! [`Form`] owns the text for each field, runs the validators, and tracks
//! whether a submission is outstanding.

use std::fmt;

use crate::domain::error::ScreenError;

/// Client-side check applied to a field before submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Validator {
    /// Must be non-blank.
    Required,
    /// Must parse (after trimming) as an integer greater than zero.
    PositiveInteger,
    /// Never blocks submission.
    Optional,
}

/// Keyboard the UI should offer for a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyboardHint {
    /// Free text.
    Text,
    /// Email address.
    Email,
    /// Digits only.
    Numeric,
}

/// Static description of one form field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    /// Stable field key.
    pub name: &'static str,
    /// Label shown next to the input.
    pub label: &'static str,
    /// Check applied on submit.
    pub validator: Validator,
    /// Keyboard hint for the input.
    pub keyboard: KeyboardHint,
    /// Whether the user may edit the field.
    pub read_only: bool,
}

impl FieldSpec {
    /// Editable field.
    pub const fn editable(
        name: &'static str,
        label: &'static str,
        validator: Validator,
        keyboard: KeyboardHint,
    ) -> Self {
        Self {
            name,
            label,
            validator,
            keyboard,
            read_only: false,
        }
    }

    /// Display-only field filled by the screen itself.
    pub const fn read_only(name: &'static str, label: &'static str, keyboard: KeyboardHint) -> Self {
        Self {
            name,
            label,
            validator: Validator::Optional,
            keyboard,
            read_only: true,
        }
    }

    fn check(&self, value: &str) -> Result<(), ScreenError> {
        match self.validator {
            Validator::Optional => Ok(()),
            Validator::Required if value.trim().is_empty() => Err(self.missing()),
            Validator::Required => Ok(()),
            Validator::PositiveInteger => {
                if value.trim().is_empty() {
                    return Err(self.missing());
                }
                match value.trim().parse::<u32>() {
                    Ok(parsed) if parsed > 0 => Ok(()),
                    _ => Err(ScreenError::validation(format!(
                        "{} must be a whole number greater than zero.",
                        self.label
                    ))),
                }
            }
        }
    }

    fn missing(&self) -> ScreenError {
        ScreenError::validation(format!("Please fill in all fields. {} is required.", self.label))
    }
}

/// Errors raised when a caller edits a field it may not touch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormEditError {
    /// No field with this name exists on the form.
    UnknownField {
        /// Name the caller used.
        name: String,
    },
    /// The field is display-only.
    ReadOnly {
        /// Name of the locked field.
        name: &'static str,
    },
    /// A submission is outstanding; inputs are locked.
    Busy,
}

impl fmt::Display for FormEditError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownField { name } => write!(f, "unknown form field: {name}"),
            Self::ReadOnly { name } => write!(f, "field {name} is read-only"),
            Self::Busy => write!(f, "form is submitting"),
        }
    }
}

impl std::error::Error for FormEditError {}

/// Live form state for a field table.
///
/// # Examples
/// ```
/// use client::domain::form::{FieldSpec, Form, KeyboardHint, Validator};
///
/// static FIELDS: [FieldSpec; 1] = [FieldSpec::editable(
///     "name",
///     "Name",
///     Validator::Required,
///     KeyboardHint::Text,
/// )];
///
/// let mut form = Form::new(&FIELDS);
/// assert!(form.validate().is_err());
/// form.set("name", "Albert").unwrap();
/// assert!(form.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Form {
    fields: &'static [FieldSpec],
    values: Vec<String>,
    submitting: bool,
}

impl Form {
    /// Empty form for a field table.
    pub fn new(fields: &'static [FieldSpec]) -> Self {
        Self {
            fields,
            values: vec![String::new(); fields.len()],
            submitting: false,
        }
    }

    /// Field table backing this form.
    pub fn fields(&self) -> &'static [FieldSpec] {
        self.fields
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|field| field.name == name)
    }

    /// Current text of a field; unknown names read as empty.
    pub fn value(&self, name: &str) -> &str {
        self.position(name)
            .and_then(|index| self.values.get(index))
            .map_or("", String::as_str)
    }

    /// Edit a field on behalf of the user.
    ///
    /// # Errors
    ///
    /// Rejects unknown and read-only fields, and any edit while submitting.
    pub fn set(&mut self, name: &str, value: impl Into<String>) -> Result<(), FormEditError> {
        if self.submitting {
            return Err(FormEditError::Busy);
        }
        let index = self
            .position(name)
            .ok_or_else(|| FormEditError::UnknownField {
                name: name.to_owned(),
            })?;
        if let Some(field) = self.fields.get(index).filter(|field| field.read_only) {
            return Err(FormEditError::ReadOnly { name: field.name });
        }
        self.store(index, value.into());
        Ok(())
    }

    /// Write any field, including read-only ones. Unknown names are ignored.
    pub(crate) fn fill(&mut self, name: &str, value: impl Into<String>) {
        if let Some(index) = self.position(name) {
            self.store(index, value.into());
        }
    }

    fn store(&mut self, index: usize, value: String) {
        if let Some(slot) = self.values.get_mut(index) {
            *slot = value;
        }
    }

    /// Run every editable field's validator in table order.
    ///
    /// # Errors
    ///
    /// Returns a validation error naming the first failing field.
    pub fn validate(&self) -> Result<(), ScreenError> {
        self.fields
            .iter()
            .zip(&self.values)
            .filter(|(field, _)| !field.read_only)
            .try_for_each(|(field, value)| field.check(value))
    }

    /// Trimmed value parsed as a positive integer.
    ///
    /// # Errors
    ///
    /// Returns a validation error when the field does not hold one.
    pub fn positive_integer(&self, name: &str) -> Result<u32, ScreenError> {
        let label = self
            .position(name)
            .and_then(|index| self.fields.get(index))
            .map_or(name, |field| field.label);
        match self.value(name).trim().parse::<u32>() {
            Ok(parsed) if parsed > 0 => Ok(parsed),
            _ => Err(ScreenError::validation(format!(
                "{label} must be a whole number greater than zero."
            ))),
        }
    }

    /// Whether a submission is outstanding.
    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    /// Lock the form for a submission. Returns `false` when already locked.
    pub fn begin_submit(&mut self) -> bool {
        if self.submitting {
            return false;
        }
        self.submitting = true;
        true
    }

    /// Release the submission lock.
    pub fn finish_submit(&mut self) {
        self.submitting = false;
    }

    /// Empty every editable field.
    pub fn clear(&mut self) {
        for (field, value) in self.fields.iter().zip(self.values.iter_mut()) {
            if !field.read_only {
                value.clear();
            }
        }
    }
}
