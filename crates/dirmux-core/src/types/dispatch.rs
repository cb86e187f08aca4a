//! Dispatch result values

/// Result of a single backend operation.
///
/// Dispatch never surfaces errors; a backend that cannot answer, does
/// not know the user, or refuses the operation returns `Absent`. The
/// pass-on sentinel of affinity-first dispatch is compared against
/// these values directly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OpValue {
    /// Soft not-found / refusal; every falsy path collapses to this
    Absent,
    /// Boolean success
    True,
    /// String-valued success (uid, display name, home path, ...)
    Text(String),
}

impl OpValue {
    /// Whether this value wins a broadcast dispatch.
    pub fn is_truthy(&self) -> bool {
        match self {
            OpValue::Absent => false,
            OpValue::True => true,
            OpValue::Text(s) => !s.is_empty(),
        }
    }

    /// The contained string, if this is a non-empty text value.
    pub fn into_text(self) -> Option<String> {
        match self {
            OpValue::Text(s) if !s.is_empty() => Some(s),
            _ => None,
        }
    }
}

impl From<bool> for OpValue {
    fn from(value: bool) -> Self {
        if value {
            OpValue::True
        } else {
            OpValue::Absent
        }
    }
}

impl From<Option<String>> for OpValue {
    fn from(value: Option<String>) -> Self {
        match value {
            Some(s) => OpValue::Text(s),
            None => OpValue::Absent,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truthiness() {
        assert!(!OpValue::Absent.is_truthy());
        assert!(OpValue::True.is_truthy());
        assert!(OpValue::Text("alice".to_string()).is_truthy());
        assert!(!OpValue::Text(String::new()).is_truthy());
    }

    #[test]
    fn test_conversions() {
        assert_eq!(OpValue::from(false), OpValue::Absent);
        assert_eq!(OpValue::from(true), OpValue::True);
        assert_eq!(
            OpValue::from(Some("alice".to_string())),
            OpValue::Text("alice".to_string())
        );
        assert_eq!(OpValue::from(None), OpValue::Absent);
        assert_eq!(OpValue::Text("x".to_string()).into_text().as_deref(), Some("x"));
        assert_eq!(OpValue::True.into_text(), None);
    }
}
