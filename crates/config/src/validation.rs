//! Section trait and the field rules sections check themselves against

pub use crate::error::ValidationError;

/// One `[table]` of `config.toml`
pub trait ConfigSection: Default {
    /// Every broken field rule in this section
    fn validate(&self) -> Result<(), Vec<ValidationError>>;

    /// Overlays `other` onto `self`; `other` wins where it has a value
    fn merge(&mut self, other: Self);

    /// Table name, used as the `section.` prefix of field paths
    fn section_name(&self) -> &'static str;
}

/// Inclusive range check; NaN is outside every range
pub fn in_range<T>(field: &str, value: T, min: T, max: T) -> Result<(), ValidationError>
where
    T: PartialOrd + std::fmt::Display + Copy,
{
    if min <= value && value <= max {
        Ok(())
    } else {
        Err(ValidationError::with_value(
            field,
            format!("must be between {} and {}", min, max),
            value,
        ))
    }
}

/// A single directory entry name: non-blank, no separators, not `.` or `..`
pub fn dir_name(field: &str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new(field, "must not be empty"));
    }
    if value.contains(['/', '\\']) || value == "." || value == ".." {
        return Err(ValidationError::with_value(
            field,
            "must be a single directory name",
            value,
        ));
    }
    Ok(())
}

/// Keeps the failures, `Ok` if there are none
pub fn collect(
    checks: impl IntoIterator<Item = Result<(), ValidationError>>,
) -> Result<(), Vec<ValidationError>> {
    let errors: Vec<ValidationError> = checks.into_iter().filter_map(Result::err).collect();
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
