/// Hook called by a stepping loop for each item it produces.
///
/// `E` is what the loop hands out (an accepted [`Point`](crate::Point) when
/// stepping, the localized point when an event fires) and `A` is the set of
/// requests the loop understands. Returning `None` means "keep stepping".
///
/// Any `FnMut(&E) -> Option<A>` is an observer. Pass `()` when nothing
/// needs to watch the loop.
pub trait Observer<E, A> {
    /// Inspects `event` and may ask the loop to act on it.
    fn observe(&mut self, event: &E) -> Option<A>;
}

impl<E, A, F> Observer<E, A> for F
where
    F: FnMut(&E) -> Option<A>,
{
    fn observe(&mut self, event: &E) -> Option<A> {
        self(event)
    }
}

impl<E, A> Observer<E, A> for () {
    fn observe(&mut self, _event: &E) -> Option<A> {
        None
    }
}
