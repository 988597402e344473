use std::fmt::{self, Debug};

use super::BoxError;

type Continuation = Box<dyn FnOnce(Option<BoxError>) + Send + 'static>;

/// One-shot continuation handed to every middleware.
///
/// Dropping a `Next` without calling it tells the host the exchange was handled.
pub struct Next {
    continuation: Continuation,
}

impl Next {
    pub fn new<F>(continuation: F) -> Self
    where
        F: FnOnce(Option<BoxError>) + Send + 'static,
    {
        Self {
            continuation: Box::new(continuation),
        }
    }

    pub fn noop() -> Self {
        Self::new(|_: Option<BoxError>| {})
    }

    pub fn proceed(self) {
        (self.continuation)(None)
    }

    pub fn fail<E>(self, err: E)
    where
        E: Into<BoxError>,
    {
        (self.continuation)(Some(err.into()))
    }
}

impl Debug for Next {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Next").finish_non_exhaustive()
    }
}
