use scout_types::ScoutError;

/// An in-memory state change whose durable write may have failed.
///
/// The change in `value` stands either way; `persist_error` is surfaced to
/// the user once and never retried.
#[must_use]
#[derive(Debug, Clone, PartialEq)]
pub struct Applied<T> {
    pub value: T,
    pub persist_error: Option<ScoutError>,
}

impl<T> Applied<T> {
    pub fn ok(value: T) -> Self {
        Self {
            value,
            persist_error: None,
        }
    }

    pub fn with_error(value: T, error: Option<ScoutError>) -> Self {
        Self {
            value,
            persist_error: error,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Applied<U> {
        Applied {
            value: f(self.value),
            persist_error: self.persist_error,
        }
    }

    /// Split into the value and the warning to surface.
    pub fn into_parts(self) -> (T, Option<ScoutError>) {
        (self.value, self.persist_error)
    }
}
