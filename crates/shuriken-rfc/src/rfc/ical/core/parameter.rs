//! iCalendar property parameter types (RFC 5545 §3.2).

/// A property parameter.
///
/// Parameters may carry more than one value (e.g. `ROLE=REQ-PARTICIPANT,CHAIR`
/// is not legal per RFC 5545 but several clients emit comma lists for
/// `DELEGATED-TO`/`DELEGATED-FROM` and we preserve them verbatim).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Parameter {
    /// Parameter name (normalized to uppercase).
    pub name: String,
    /// Parameter values in order of appearance.
    pub values: Vec<String>,
}

impl Parameter {
    /// Creates a parameter with a single value.
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into().to_ascii_uppercase(),
            values: vec![value.into()],
        }
    }

    /// Creates a parameter with multiple values.
    #[must_use]
    pub fn with_values(name: impl Into<String>, values: Vec<String>) -> Self {
        Self {
            name: name.into().to_ascii_uppercase(),
            values,
        }
    }

    /// Creates a TZID parameter.
    #[must_use]
    pub fn tzid(value: impl Into<String>) -> Self {
        Self::new("TZID", value)
    }

    /// Creates a VALUE parameter.
    #[must_use]
    pub fn value_type(value: impl Into<String>) -> Self {
        Self::new("VALUE", value)
    }

    /// Returns the first value, if any.
    #[must_use]
    pub fn value(&self) -> Option<&str> {
        self.values.first().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parameter_single_value() {
        let p = Parameter::tzid("America/New_York");
        assert_eq!(p.name, "TZID");
        assert_eq!(p.value(), Some("America/New_York"));
    }

    #[test]
    fn parameter_multi_value() {
        let p = Parameter::with_values("ROLE", vec!["CHAIR".to_string(), "ATTENDEE".to_string()]);
        assert_eq!(p.values.len(), 2);
    }
}
