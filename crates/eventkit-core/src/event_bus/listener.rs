//! Listener handles.
//!
//! A [`Listener`] wraps a shared callback. Cloning a listener clones the
//! handle, not the callback, so every clone refers to the same unit of
//! behavior. Equality is identity of that shared callback: this is what
//! `EventBus::unregister` matches on.

use std::fmt;
use std::sync::Arc;

/// Type alias for listener callback functions
type ListenerFn<P> = dyn Fn(Option<&P>) -> anyhow::Result<()> + Send + Sync;

/// Handle to a callback registered on an event bus
pub struct Listener<P> {
    callback: Arc<ListenerFn<P>>,
}

impl<P> Listener<P> {
    /// Create a listener from an infallible callback
    pub fn new<F>(callback: F) -> Self
    where
        F: Fn(Option<&P>) + Send + Sync + 'static,
    {
        Self {
            callback: Arc::new(move |data: Option<&P>| -> anyhow::Result<()> {
                callback(data);
                Ok(())
            }),
        }
    }

    /// Create a listener from a callback that can fail
    ///
    /// What happens to an error depends on the bus [`ErrorPolicy`](super::ErrorPolicy).
    pub fn fallible<F>(callback: F) -> Self
    where
        F: Fn(Option<&P>) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        Self {
            callback: Arc::new(callback),
        }
    }

    /// Invoke the callback directly
    pub fn call(&self, data: Option<&P>) -> anyhow::Result<()> {
        (self.callback)(data)
    }

    /// Check whether two handles refer to the same callback
    pub fn same_as(&self, other: &Listener<P>) -> bool {
        Arc::ptr_eq(&self.callback, &other.callback)
    }
}

impl<P> Clone for Listener<P> {
    fn clone(&self) -> Self {
        Self {
            callback: Arc::clone(&self.callback),
        }
    }
}

impl<P> PartialEq for Listener<P> {
    fn eq(&self, other: &Self) -> bool {
        self.same_as(other)
    }
}

impl<P> Eq for Listener<P> {}

impl<P> fmt::Debug for Listener<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Listener({:p})", Arc::as_ptr(&self.callback) as *const ())
    }
}
