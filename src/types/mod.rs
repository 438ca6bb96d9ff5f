// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Value types for free@home channels.
//!
//! # Types
//!
//! - [`PairingId`] - Semantic role of a datapoint
//! - [`Direction`] - Input or output side of a channel
//! - [`Value`] - Current value of a datapoint
//! - [`Datapoint`] - Pairing id plus value
//! - [`DatapointMap`] - Insertion-ordered name to datapoint mapping

mod datapoint;
mod pairing;
mod value;

pub use datapoint::{Datapoint, DatapointMap};
pub use pairing::{Direction, PairingId};
pub use value::Value;
