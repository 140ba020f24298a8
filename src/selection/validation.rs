//! Validation messages surfaced to the dialog.
//!
//! Every failure here is recoverable by the user picking another node or
//! fixing the form, so they are plain values rather than panics.

use std::fmt;

use crate::organization::TreeNode;

/// A user-facing validation failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// The field or node that failed validation
    pub field: String,
    pub message: String,
    /// Hint on how to fix it
    pub suggestion: Option<String>,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            suggestion: None,
        }
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    pub fn unit_without_leader(unit_name: &str) -> Self {
        Self::new(
            "unit",
            format!("Unit {} has not designated a leader", unit_name),
        )
        .with_suggestion("Select a staff member of this unit directly")
    }

    pub fn unit_not_checkable(unit_name: &str) -> Self {
        Self::new(
            "unit",
            format!("Unit {} cannot receive this transfer", unit_name),
        )
    }

    pub fn missing_main_handler() -> Self {
        Self::new("main", "A main handler must be selected")
            .with_suggestion("Tick one unit or staff member in the main handler column")
    }

    pub fn deadline_in_past(deadline: &str) -> Self {
        Self::new("deadline", format!("Deadline {} is already in the past", deadline))
            .with_suggestion("Pick today or a later date")
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.field, self.message)?;
        if let Some(ref suggestion) = self.suggestion {
            write!(f, ". {}", suggestion)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

/// Collection of validation errors with formatted output.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ValidationErrors {
    errors: Vec<ValidationError>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self { errors: Vec::new() }
    }

    pub fn add(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ValidationError> {
        self.errors.iter()
    }

    /// One numbered line per error, for inline display.
    pub fn to_message(&self) -> String {
        if self.errors.is_empty() {
            return String::new();
        }

        let mut parts = vec![format!("Validation failed: {} problem(s) found", self.errors.len())];
        for (i, error) in self.iter().enumerate() {
            parts.push(format!("{}. {}", i + 1, error));
        }
        parts.join("\n")
    }

    pub fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_message())
    }
}

impl std::error::Error for ValidationErrors {}

/// Whether `node` may be ticked for any role.
///
/// Staff are always selectable. A unit needs a designated leader and must be
/// checkable in the current mode.
pub fn validate_unit_selectable(node: &TreeNode) -> Result<(), ValidationError> {
    let Some(unit) = node.as_unit() else {
        return Ok(());
    };
    if !unit.has_leader() {
        return Err(ValidationError::unit_without_leader(&unit.unit.name));
    }
    if !unit.is_can_check {
        return Err(ValidationError::unit_not_checkable(&unit.unit.name));
    }
    Ok(())
}
