use thiserror::Error;

/// The constraint a raw field value violated.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConstraintError {
    /// The raw value could not be coerced to the field's semantic type.
    #[error("expected {expected}")]
    Coercion { expected: &'static str },

    /// The coerced numeric value falls outside the field's closed interval.
    #[error("out of range [{min}, {max}]")]
    Range { min: f64, max: f64 },

    /// The value is not an exact match for any allowed token.
    #[error("not one of {allowed:?}")]
    Membership { allowed: &'static [&'static str] },
}

/// A single offending field: its name, the raw value as supplied, and the
/// constraint it violated.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{field}: {constraint} (got '{raw}')")]
pub struct Violation {
    pub field: &'static str,
    pub raw: String,
    pub constraint: ConstraintError,
}

/// The structured outcome of a failed validation pass.
///
/// Carries every violation found in the pass, in declaration order, so a
/// form can surface all of them at once. Never empty.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationFailure {
    pub violations: Vec<Violation>,
}

impl ValidationFailure {
    /// True if `field` is among the offending fields.
    pub fn names(&self, field: &str) -> bool {
        self.violations.iter().any(|v| v.field == field)
    }
}

impl std::fmt::Display for ValidationFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} invalid field(s): ", self.violations.len())?;
        for (i, violation) in self.violations.iter().enumerate() {
            if i > 0 {
                write!(f, "; ")?;
            }
            write!(f, "{violation}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationFailure {}
