// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the `freeathome_lib` library.
//!
//! Device lookups, API client implementations and value conversions each
//! have their own error enum; [`Error`] wraps all of them.

use thiserror::Error;

use crate::types::{Direction, PairingId};

/// The main error type for this library.
#[derive(Debug, Error)]
pub enum Error {
    /// Error raised by a device channel operation.
    #[error("device error: {0}")]
    Device(#[from] DeviceError),

    /// Error raised by an API client implementation.
    #[error("api error: {0}")]
    Api(#[from] ApiError),

    /// Error raised while converting a datapoint value.
    #[error("value error: {0}")]
    Value(#[from] ValueError),
}

/// Errors related to device channel operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DeviceError {
    /// No input or output of the channel carries the requested pairing id.
    #[error("invalid pairing id {pairing_id} for {direction} of {device_id}/{channel_id}")]
    InvalidChannelPairingId {
        /// Device the lookup ran against.
        device_id: String,
        /// Channel the lookup ran against.
        channel_id: String,
        /// The pairing id that was requested.
        pairing_id: PairingId,
        /// Which mapping was searched.
        direction: Direction,
    },
}

impl DeviceError {
    /// Returns the pairing id of an [`InvalidChannelPairingId`](Self::InvalidChannelPairingId) error.
    #[must_use]
    pub fn pairing_id(&self) -> PairingId {
        match self {
            Self::InvalidChannelPairingId { pairing_id, .. } => *pairing_id,
        }
    }

    /// Returns the searched mapping of an [`InvalidChannelPairingId`](Self::InvalidChannelPairingId) error.
    #[must_use]
    pub fn direction(&self) -> Direction {
        match self {
            Self::InvalidChannelPairingId { direction, .. } => *direction,
        }
    }
}

/// Errors reported by implementations of [`FreeAtHomeApi`](crate::api::FreeAtHomeApi).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// The request could not be delivered or was rejected by the hub.
    #[error("request failed: {0}")]
    RequestFailed(String),

    /// The hub refused the credentials.
    #[error("unauthorized")]
    Unauthorized,

    /// The hub answered with something that could not be interpreted.
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// Request timed out.
    #[error("request timed out after {0} ms")]
    Timeout(u64),
}

/// Errors related to datapoint value conversion.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValueError {
    /// The value cannot be read as a boolean.
    #[error("value {0:?} is not a boolean")]
    NotBool(String),

    /// The value cannot be read as a number.
    #[error("value {0:?} is not a number")]
    NotNumber(String),
}

/// A specialized Result type for this library.
pub type Result<T> = std::result::Result<T, Error>;
