// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Callback management for device state notifications.
//!
//! - [`Callback`] - Cloneable observer handle, compared by identity
//! - [`CallbackRegistry`] - Thread-safe set of observers with dispatch

use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;

/// Handle to a zero-argument observer.
///
/// Handles compare equal when they share the same closure allocation, so
/// the handle used to register an observer (or any clone of it) is the one
/// that removes it.
///
/// # Examples
///
/// ```
/// use freeathome_lib::subscription::Callback;
///
/// let cb = Callback::new(|| println!("state changed"));
/// let same = cb.clone();
/// let other = Callback::new(|| println!("state changed"));
///
/// assert_eq!(cb, same);
/// assert_ne!(cb, other);
/// ```
#[derive(Clone)]
pub struct Callback(Arc<dyn Fn() + Send + Sync>);

impl Callback {
    /// Wraps a closure into a handle.
    pub fn new<F>(callback: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        Self(Arc::new(callback))
    }

    /// Invokes the observer.
    pub fn call(&self) {
        (self.0)();
    }
}

impl PartialEq for Callback {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for Callback {}

impl fmt::Debug for Callback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Callback({:p})", Arc::as_ptr(&self.0).cast::<()>())
    }
}

impl<F> From<F> for Callback
where
    F: Fn() + Send + Sync + 'static,
{
    fn from(callback: F) -> Self {
        Self::new(callback)
    }
}

/// Registry of observers attached to a device.
///
/// Registration has set semantics: a handle already present is not added
/// twice. Uses `parking_lot::RwLock` for interior mutability so devices can
/// be shared across tasks.
///
/// # Dispatch
///
/// [`dispatch`](Self::dispatch) snapshots the handle list and releases the
/// lock before invoking anything, so observers may register or remove
/// callbacks, including themselves, while being notified. Removing a handle
/// during a pass does not stop that pass from calling it.
#[derive(Default)]
pub struct CallbackRegistry {
    callbacks: RwLock<Vec<Callback>>,
}

impl CallbackRegistry {
    /// Creates a new empty callback registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a handle.
    ///
    /// Returns `false` if the handle was already registered.
    pub fn register(&self, callback: Callback) -> bool {
        let mut callbacks = self.callbacks.write();
        if callbacks.contains(&callback) {
            return false;
        }
        callbacks.push(callback);
        true
    }

    /// Removes a handle.
    ///
    /// Returns `true` if the handle was registered.
    pub fn remove(&self, callback: &Callback) -> bool {
        let mut callbacks = self.callbacks.write();
        let before = callbacks.len();
        callbacks.retain(|registered| registered != callback);
        callbacks.len() != before
    }

    /// Returns `true` if the handle is registered.
    #[must_use]
    pub fn contains(&self, callback: &Callback) -> bool {
        self.callbacks.read().contains(callback)
    }

    /// Invokes every registered observer once.
    ///
    /// Returns the number of observers called.
    pub fn dispatch(&self) -> usize {
        let snapshot = self.callbacks.read().clone();
        for callback in &snapshot {
            callback.call();
        }
        snapshot.len()
    }

    /// Returns the number of registered callbacks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.callbacks.read().len()
    }

    /// Returns `true` if there are no registered callbacks.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.callbacks.read().is_empty()
    }
}

impl fmt::Debug for CallbackRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallbackRegistry")
            .field("callback_count", &self.len())
            .finish()
    }
}
