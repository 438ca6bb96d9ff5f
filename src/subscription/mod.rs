// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Observer registration for device state changes.
//!
//! The transport layer pushes datapoint updates into a
//! [`Device`](crate::Device); every registered [`Callback`] is invoked once
//! after an update that changed the device state.
//!
//! # Usage
//!
//! ```
//! use freeathome_lib::subscription::{Callback, CallbackRegistry};
//!
//! let registry = CallbackRegistry::new();
//! let cb = Callback::new(|| println!("changed"));
//!
//! registry.register(cb.clone());
//! assert!(registry.contains(&cb));
//!
//! registry.remove(&cb);
//! assert!(!registry.contains(&cb));
//! ```

mod callback;

pub use callback::{Callback, CallbackRegistry};
