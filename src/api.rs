// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! API client capability.
//!
//! Devices hold a shared reference to a [`FreeAtHomeApi`] implementation so
//! that concrete device classes can write datapoints back to the System
//! Access Point. The transport behind it (local REST API, WebSocket push
//! channel, authentication) lives outside this crate.

use crate::error::ApiError;

/// Trait for clients that can read and write channel datapoints on the hub.
#[allow(async_fn_in_trait)]
pub trait FreeAtHomeApi {
    /// Writes a value to a datapoint.
    ///
    /// # Arguments
    ///
    /// * `device_id` - Serial of the device
    /// * `channel_id` - Channel within the device (`ch0000`)
    /// * `datapoint` - Input datapoint name (`idp0000`)
    /// * `value` - Value in the hub's textual representation
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the hub rejects or does not answer the request.
    async fn set_datapoint(
        &self,
        device_id: &str,
        channel_id: &str,
        datapoint: &str,
        value: &str,
    ) -> Result<String, ApiError>;

    /// Reads the current values of a datapoint.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the hub rejects or does not answer the request.
    async fn get_datapoint(
        &self,
        device_id: &str,
        channel_id: &str,
        datapoint: &str,
    ) -> Result<Vec<String>, ApiError>;
}
