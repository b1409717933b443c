use crate::Reply;
use futures::future::join_all;
use std::ops::Deref;

/// Returns `true` if any listener in `results` cancelled its emission.
pub fn did_cancel<R>(results: &[Reply<R>]) -> bool {
    results.iter().any(Reply::is_cancel)
}

/// The replies gathered by a single `emit`/`emit_id` call, in invocation order.
///
/// When a listener cancels, its [`Reply::Cancel`] is the last element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Emission<R>(Vec<Reply<R>>);

impl<R> Emission<R> {
    pub(crate) fn new(replies: Vec<Reply<R>>) -> Self {
        Self(replies)
    }

    pub fn did_cancel(&self) -> bool {
        did_cancel(&self.0)
    }

    /// Values returned by the listeners, skipping the cancel sentinel.
    pub fn values(&self) -> impl Iterator<Item = &R> {
        self.0.iter().filter_map(Reply::value)
    }

    pub fn into_values(self) -> Vec<R> {
        self.0.into_iter().filter_map(Reply::into_value).collect()
    }

    pub fn into_vec(self) -> Vec<Reply<R>> {
        self.0
    }

    /// Awaits every pending listener result concurrently.
    ///
    /// A listener whose future resolves to [`Reply::Cancel`] shows up as a
    /// cancel in the settled emission, so `settle().await.did_cancel()`
    /// answers "did any listener, sync or async, cancel?".
    pub async fn settle<T>(self) -> Emission<T>
    where
        R: Future<Output = Reply<T>>,
    {
        let replies = join_all(self.0.into_iter().map(|reply| async move {
            match reply {
                Reply::Value(pending) => pending.await,
                Reply::Cancel => Reply::Cancel,
            }
        }))
        .await;

        Emission(replies)
    }
}

impl<R> Default for Emission<R> {
    fn default() -> Self {
        Self(Vec::new())
    }
}

impl<R> Deref for Emission<R> {
    type Target = [Reply<R>];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<R> IntoIterator for Emission<R> {
    type Item = Reply<R>;
    type IntoIter = std::vec::IntoIter<Reply<R>>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}
