use std::sync::Arc;

use tokio::sync::watch;

/// One observable state slot.
///
/// Writes go through `send_replace`/`send_modify`, so they land even while
/// nobody is subscribed and readers never see a half-applied update.
#[derive(Debug)]
pub struct Slot<T> {
    sender: Arc<watch::Sender<T>>,
}

impl<T> Clone for Slot<T> {
    fn clone(&self) -> Self {
        Self {
            sender: Arc::clone(&self.sender),
        }
    }
}

impl<T: Clone> Slot<T> {
    pub fn new(initial: T) -> Self {
        let (sender, _) = watch::channel(initial);
        Self {
            sender: Arc::new(sender),
        }
    }

    pub fn current(&self) -> T {
        self.sender.borrow().clone()
    }

    /// Access the value without cloning.
    pub fn with<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&T) -> R,
    {
        f(&self.sender.borrow())
    }

    pub fn subscribe(&self) -> watch::Receiver<T> {
        self.sender.subscribe()
    }

    pub(crate) fn replace(&self, value: T) -> T {
        self.sender.send_replace(value)
    }

    pub(crate) fn modify<F>(&self, f: F)
    where
        F: FnOnce(&mut T),
    {
        self.sender.send_modify(f);
    }
}

impl<T: Clone + Default> Default for Slot<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}
