use crate::event::Payload;
use crate::listener::{Handler, Listener};
use crate::Reply;

pub struct FromFn<F>(F);

impl<F> FromFn<F> {
    #[inline]
    pub fn new(f: F) -> Self {
        Self(f)
    }
}

impl<A, R, F, T> Handler<A, R> for FromFn<F>
where
    F: Fn(&A) -> T + Send + Sync + 'static,
    T: Into<Reply<R>>,
{
    #[inline]
    fn handle(&self, args: &A) -> Reply<R> {
        (self.0)(args).into()
    }
}

/// Wraps a closure into a [`Listener`].
///
/// The closure may return a plain value (wrapped in [`Reply::Value`]) or a
/// [`Reply`] directly, which is how a listener cancels an emission.
#[inline]
pub fn from_fn<A, R, T, F>(f: F) -> Listener<A, R>
where
    A: Payload,
    R: Send + 'static,
    F: Fn(&A) -> T + Send + Sync + 'static,
    T: Into<Reply<R>>,
{
    Listener::new(FromFn::new(f))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closure_values_become_replies() {
        let listener: Listener<String, usize> = from_fn(|s: &String| s.len());
        assert_eq!(listener.invoke(&"four".to_string()), Some(Reply::Value(4)));
    }

    #[test]
    fn closure_can_cancel() {
        let listener: Listener<u8, u8> = from_fn(|n: &u8| {
            if *n > 10 { Reply::Cancel } else { Reply::Value(*n) }
        });
        assert_eq!(listener.invoke(&3), Some(Reply::Value(3)));
        assert_eq!(listener.invoke(&30), Some(Reply::Cancel));
    }
}
