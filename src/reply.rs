/// What a listener hands back to the dispatcher.
///
/// Returning [`Reply::Cancel`] stops the emission it was called from: no
/// further listener runs for that emission, and the sentinel is the last
/// element of the result sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Reply<R> {
    Value(R),
    Cancel,
}

impl<R> Reply<R> {
    #[inline]
    pub fn is_cancel(&self) -> bool {
        matches!(self, Reply::Cancel)
    }

    #[inline]
    pub fn value(&self) -> Option<&R> {
        match self {
            Reply::Value(value) => Some(value),
            Reply::Cancel => None,
        }
    }

    #[inline]
    pub fn into_value(self) -> Option<R> {
        match self {
            Reply::Value(value) => Some(value),
            Reply::Cancel => None,
        }
    }

    /// ```
    /// use emitkit::Reply;
    ///
    /// assert_eq!(Reply::Value(2).map(|n| n * 10), Reply::Value(20));
    /// assert_eq!(Reply::<u32>::Cancel.map(|n| n * 10), Reply::Cancel);
    /// ```
    pub fn map<U>(self, f: impl FnOnce(R) -> U) -> Reply<U> {
        match self {
            Reply::Value(value) => Reply::Value(f(value)),
            Reply::Cancel => Reply::Cancel,
        }
    }
}

impl<R> From<R> for Reply<R> {
    #[inline]
    fn from(value: R) -> Self {
        Reply::Value(value)
    }
}
