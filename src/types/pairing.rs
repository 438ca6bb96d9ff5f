// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Pairing identifiers and datapoint directions.
//!
//! free@home classifies every input and output of a channel with a pairing
//! id: the semantic role of the datapoint (switch on/off, absolute dimming
//! value, ...), independent of its storage name (`idp0000`, `odp0001`).

use std::fmt;

use serde::{Deserialize, Serialize};

/// Semantic role of a channel datapoint.
///
/// Any `u16` is a valid pairing id; the associated constants name the ones
/// most device classes rely on.
///
/// # Examples
///
/// ```
/// use freeathome_lib::types::PairingId;
///
/// let id = PairingId::new(0x0001);
/// assert_eq!(id, PairingId::SWITCH_ON_OFF);
/// assert_eq!(id.to_string(), "0x0001");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PairingId(u16);

impl PairingId {
    /// Switch on/off request.
    pub const SWITCH_ON_OFF: Self = Self(0x0001);
    /// Timed start/stop request.
    pub const TIMED_START_STOP: Self = Self(0x0002);
    /// Forced position request.
    pub const FORCED: Self = Self(0x0003);
    /// Scene control.
    pub const SCENE_CONTROL: Self = Self(0x0004);
    /// Relative set value (dim up/down).
    pub const RELATIVE_SET_VALUE_CONTROL: Self = Self(0x0010);
    /// Absolute set value (dim to level).
    pub const ABSOLUTE_SET_VALUE_CONTROL: Self = Self(0x0011);
    /// On/off state reported by an actuator.
    pub const INFO_ON_OFF: Self = Self(0x0100);
    /// Forced state reported by an actuator.
    pub const INFO_FORCE: Self = Self(0x0101);
    /// Current dimming level reported by an actuator.
    pub const INFO_ACTUAL_DIMMING_VALUE: Self = Self(0x0110);

    /// Creates a pairing id from its raw value.
    #[must_use]
    pub const fn new(value: u16) -> Self {
        Self(value)
    }

    /// Returns the raw value.
    #[must_use]
    pub const fn value(&self) -> u16 {
        self.0
    }
}

impl From<u16> for PairingId {
    fn from(value: u16) -> Self {
        Self(value)
    }
}

impl From<PairingId> for u16 {
    fn from(id: PairingId) -> Self {
        id.0
    }
}

impl fmt::Display for PairingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#06x}", self.0)
    }
}

/// Which mapping of a channel a datapoint belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Datapoints written to the device (`idp...`).
    Input,
    /// Datapoints reported by the device (`odp...`).
    Output,
}

impl Direction {
    /// Returns the lowercase name of the direction.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Input => "input",
            Self::Output => "output",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pairing_id_display_is_hex() {
        assert_eq!(PairingId::new(1).to_string(), "0x0001");
        assert_eq!(PairingId::INFO_ACTUAL_DIMMING_VALUE.to_string(), "0x0110");
        assert_eq!(PairingId::new(0xFFFF).to_string(), "0xffff");
    }

    #[test]
    fn pairing_id_conversions() {
        let id = PairingId::from(0x0100_u16);
        assert_eq!(id, PairingId::INFO_ON_OFF);
        assert_eq!(u16::from(id), 0x0100);
        assert_eq!(id.value(), 256);
    }

    #[test]
    fn pairing_id_deserializes_from_number() {
        let id: PairingId = serde_json::from_str("17").unwrap();
        assert_eq!(id, PairingId::ABSOLUTE_SET_VALUE_CONTROL);
    }

    #[test]
    fn direction_display() {
        assert_eq!(Direction::Input.to_string(), "input");
        assert_eq!(Direction::Output.to_string(), "output");
    }
}
