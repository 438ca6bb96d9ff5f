// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Generic device channel.
//!
//! A [`Device`] represents one channel of one free@home device: its
//! identity, its named inputs and outputs, the opaque channel parameters,
//! and the observers interested in its state. Concrete device classes
//! (switch actuators, dimmers, ...) build on top of it.
//!
//! # Examples
//!
//! ```
//! use std::sync::Arc;
//! use freeathome_lib::{Device, FreeAtHomeApi, ApiError, Parameters};
//! use freeathome_lib::types::{Datapoint, DatapointMap, PairingId};
//!
//! struct Offline;
//!
//! impl FreeAtHomeApi for Offline {
//!     async fn set_datapoint(&self, _: &str, _: &str, _: &str, _: &str) -> Result<String, ApiError> {
//!         Err(ApiError::RequestFailed("offline".into()))
//!     }
//!     async fn get_datapoint(&self, _: &str, _: &str, _: &str) -> Result<Vec<String>, ApiError> {
//!         Err(ApiError::RequestFailed("offline".into()))
//!     }
//! }
//!
//! let outputs: DatapointMap = [("odp0000", Datapoint::new(PairingId::INFO_ON_OFF, "0"))]
//!     .into_iter()
//!     .collect();
//!
//! let device = Device::new(
//!     "ABB7F500E17A",
//!     "Living room light",
//!     "ch0003",
//!     "Ceiling",
//!     DatapointMap::new(),
//!     outputs,
//!     Parameters::new(),
//!     Arc::new(Offline),
//! );
//!
//! let (name, value) = device.get_output_by_pairing_id(PairingId::INFO_ON_OFF).unwrap();
//! assert_eq!(name, "odp0000");
//! assert_eq!(value.as_bool(), Some(false));
//! ```

use std::fmt;
use std::sync::Arc;

use parking_lot::{ReentrantMutex, RwLock};

use crate::api::FreeAtHomeApi;
use crate::error::DeviceError;
use crate::subscription::{Callback, CallbackRegistry};
use crate::types::{Datapoint, DatapointMap, Direction, PairingId, Value};

/// Opaque channel parameters, passed through untouched.
pub type Parameters = serde_json::Map<String, serde_json::Value>;

#[derive(Debug)]
struct Datapoints {
    inputs: DatapointMap,
    outputs: DatapointMap,
}

impl Datapoints {
    fn map(&self, direction: Direction) -> &DatapointMap {
        match direction {
            Direction::Input => &self.inputs,
            Direction::Output => &self.outputs,
        }
    }
}

/// One channel of a free@home device.
///
/// Identity fields are fixed at construction. Datapoint values change only
/// through [`update_device`](Self::update_device), which notifies the
/// registered observers once the new value is visible.
///
/// # Thread Safety
///
/// `Device<A>` is `Send + Sync` whenever `A` is. Datapoints sit behind a
/// `parking_lot::RwLock`; updates are serialized so that two notification
/// passes never interleave. Observers run without any datapoint lock held
/// and may read the device from inside the callback.
pub struct Device<A: FreeAtHomeApi> {
    device_id: String,
    device_name: String,
    channel_id: String,
    channel_name: String,
    floor_name: Option<String>,
    room_name: Option<String>,
    datapoints: RwLock<Datapoints>,
    parameters: Parameters,
    api: Arc<A>,
    callbacks: CallbackRegistry,
    /// Held across mutate-then-notify.
    update_lock: ReentrantMutex<()>,
}

impl<A: FreeAtHomeApi> Device<A> {
    /// Creates a device channel. Never fails.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        device_id: impl Into<String>,
        device_name: impl Into<String>,
        channel_id: impl Into<String>,
        channel_name: impl Into<String>,
        inputs: DatapointMap,
        outputs: DatapointMap,
        parameters: Parameters,
        api: Arc<A>,
    ) -> Self {
        Self {
            device_id: device_id.into(),
            device_name: device_name.into(),
            channel_id: channel_id.into(),
            channel_name: channel_name.into(),
            floor_name: None,
            room_name: None,
            datapoints: RwLock::new(Datapoints { inputs, outputs }),
            parameters,
            api,
            callbacks: CallbackRegistry::new(),
            update_lock: ReentrantMutex::new(()),
        }
    }

    /// Sets the name of the floor the channel is placed on.
    #[must_use]
    pub fn with_floor_name(mut self, floor_name: impl Into<String>) -> Self {
        self.floor_name = Some(floor_name.into());
        self
    }

    /// Sets the name of the room the channel is placed in.
    #[must_use]
    pub fn with_room_name(mut self, room_name: impl Into<String>) -> Self {
        self.room_name = Some(room_name.into());
        self
    }

    // ========== Identity ==========

    /// Returns the device id (serial).
    #[must_use]
    pub fn device_id(&self) -> &str {
        &self.device_id
    }

    /// Returns the device display name.
    #[must_use]
    pub fn device_name(&self) -> &str {
        &self.device_name
    }

    /// Returns the channel id, unique within the device.
    #[must_use]
    pub fn channel_id(&self) -> &str {
        &self.channel_id
    }

    /// Returns the channel display name.
    #[must_use]
    pub fn channel_name(&self) -> &str {
        &self.channel_name
    }

    /// Returns the floor name, if placed.
    #[must_use]
    pub fn floor_name(&self) -> Option<&str> {
        self.floor_name.as_deref()
    }

    /// Returns the room name, if placed.
    #[must_use]
    pub fn room_name(&self) -> Option<&str> {
        self.room_name.as_deref()
    }

    /// Returns the channel parameters.
    #[must_use]
    pub fn parameters(&self) -> &Parameters {
        &self.parameters
    }

    /// Returns a single channel parameter.
    #[must_use]
    pub fn parameter(&self, name: &str) -> Option<&serde_json::Value> {
        self.parameters.get(name)
    }

    /// Returns the API client the device was created with.
    #[must_use]
    pub fn api(&self) -> &Arc<A> {
        &self.api
    }

    // ========== Datapoints ==========

    /// Returns the first input carrying `pairing_id`, as `(name, value)`.
    ///
    /// # Errors
    ///
    /// Returns `DeviceError::InvalidChannelPairingId` if no input matches.
    pub fn get_input_by_pairing_id(
        &self,
        pairing_id: PairingId,
    ) -> Result<(String, Value), DeviceError> {
        self.find_by_pairing_id(Direction::Input, pairing_id)
    }

    /// Returns the first output carrying `pairing_id`, as `(name, value)`.
    ///
    /// # Errors
    ///
    /// Returns `DeviceError::InvalidChannelPairingId` if no output matches.
    pub fn get_output_by_pairing_id(
        &self,
        pairing_id: PairingId,
    ) -> Result<(String, Value), DeviceError> {
        self.find_by_pairing_id(Direction::Output, pairing_id)
    }

    fn find_by_pairing_id(
        &self,
        direction: Direction,
        pairing_id: PairingId,
    ) -> Result<(String, Value), DeviceError> {
        let datapoints = self.datapoints.read();
        datapoints
            .map(direction)
            .find_by_pairing_id(pairing_id)
            .map(|(name, dp)| (name.to_string(), dp.value.clone()))
            .ok_or_else(|| DeviceError::InvalidChannelPairingId {
                device_id: self.device_id.clone(),
                channel_id: self.channel_id.clone(),
                pairing_id,
                direction,
            })
    }

    /// Returns the input with the given name.
    #[must_use]
    pub fn input(&self, name: &str) -> Option<Datapoint> {
        self.datapoints.read().inputs.get(name).cloned()
    }

    /// Returns the output with the given name.
    #[must_use]
    pub fn output(&self, name: &str) -> Option<Datapoint> {
        self.datapoints.read().outputs.get(name).cloned()
    }

    /// Returns a snapshot of all inputs.
    #[must_use]
    pub fn inputs(&self) -> DatapointMap {
        self.datapoints.read().inputs.clone()
    }

    /// Returns a snapshot of all outputs.
    #[must_use]
    pub fn outputs(&self) -> DatapointMap {
        self.datapoints.read().outputs.clone()
    }

    /// Applies a datapoint value pushed by the hub.
    ///
    /// `datapoint_key` is either the hub's full key
    /// (`"<device>/<channel>/<datapoint>"`) or a bare datapoint name. Inputs
    /// are searched before outputs.
    ///
    /// Returns `true` if a stored value changed; every registered observer
    /// has then been called once. Unknown datapoints and unchanged values
    /// return `false` without notifying anyone.
    ///
    /// An observer may call back into `update_device` on the same thread;
    /// the nested update completes its own notification pass first.
    pub fn update_device(&self, datapoint_key: &str, value: impl Into<Value>) -> bool {
        let value = value.into();
        let name = datapoint_key.rsplit('/').next().unwrap_or(datapoint_key);

        let _guard = self.update_lock.lock();
        let changed = {
            let mut datapoints = self.datapoints.write();
            if datapoints.inputs.contains(name) {
                datapoints.inputs.set_value(name, value.clone())
            } else {
                datapoints.outputs.set_value(name, value.clone())
            }
        };

        match changed {
            None => {
                tracing::debug!(
                    device = %self.device_id,
                    channel = %self.channel_id,
                    datapoint = %name,
                    "Ignoring update for unknown datapoint"
                );
                false
            }
            Some(false) => {
                tracing::trace!(
                    device = %self.device_id,
                    channel = %self.channel_id,
                    datapoint = %name,
                    "Datapoint value unchanged"
                );
                false
            }
            Some(true) => {
                tracing::debug!(
                    device = %self.device_id,
                    channel = %self.channel_id,
                    datapoint = %name,
                    value = %value,
                    "Datapoint updated"
                );
                let notified = self.callbacks.dispatch();
                tracing::trace!(count = notified, "Notified device observers");
                true
            }
        }
    }

    // ========== Callbacks ==========

    /// Registers an observer called after every state change.
    ///
    /// Registering a handle that is already registered has no effect.
    pub fn register_callback(&self, callback: impl Into<Callback>) {
        self.callbacks.register(callback.into());
    }

    /// Removes an observer.
    ///
    /// Returns `true` if it was registered. Removing an unknown handle is a
    /// no-op.
    pub fn remove_callback(&self, callback: &Callback) -> bool {
        self.callbacks.remove(callback)
    }

    /// Returns `true` if the observer is registered.
    #[must_use]
    pub fn has_callback(&self, callback: &Callback) -> bool {
        self.callbacks.contains(callback)
    }

    /// Returns the number of registered observers.
    #[must_use]
    pub fn callback_count(&self) -> usize {
        self.callbacks.len()
    }
}

impl<A: FreeAtHomeApi> fmt::Debug for Device<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Device")
            .field("device_id", &self.device_id)
            .field("device_name", &self.device_name)
            .field("channel_id", &self.channel_id)
            .field("channel_name", &self.channel_name)
            .field("floor_name", &self.floor_name)
            .field("room_name", &self.room_name)
            .field("datapoints", &*self.datapoints.read())
            .field("callbacks", &self.callbacks)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ApiError;
    use std::sync::atomic::{AtomicU32, Ordering};

    struct NullApi;

    impl FreeAtHomeApi for NullApi {
        async fn set_datapoint(
            &self,
            _device_id: &str,
            _channel_id: &str,
            _datapoint: &str,
            _value: &str,
        ) -> Result<String, ApiError> {
            Err(ApiError::RequestFailed("not connected".to_string()))
        }

        async fn get_datapoint(
            &self,
            _device_id: &str,
            _channel_id: &str,
            _datapoint: &str,
        ) -> Result<Vec<String>, ApiError> {
            Err(ApiError::RequestFailed("not connected".to_string()))
        }
    }

    fn device() -> Device<NullApi> {
        let inputs = [
            ("idp0000", Datapoint::new(PairingId::SWITCH_ON_OFF, "0")),
            ("idp0001", Datapoint::new(PairingId::FORCED, "")),
        ]
        .into_iter()
        .collect();
        let outputs = [("odp0000", Datapoint::new(PairingId::INFO_ON_OFF, "0"))]
            .into_iter()
            .collect();
        let mut parameters = Parameters::new();
        parameters.insert("par0001".to_string(), serde_json::json!("1"));

        Device::new(
            "ABB7F500E17A",
            "Switch actuator",
            "ch0000",
            "Hallway",
            inputs,
            outputs,
            parameters,
            Arc::new(NullApi),
        )
    }

    fn counting() -> (Callback, Arc<AtomicU32>) {
        let counter = Arc::new(AtomicU32::new(0));
        let counter_clone = counter.clone();
        let cb = Callback::new(move || {
            counter_clone.fetch_add(1, Ordering::SeqCst);
        });
        (cb, counter)
    }

    #[test]
    fn placement_metadata_defaults_to_none() {
        let device = device();
        assert_eq!(device.floor_name(), None);
        assert_eq!(device.room_name(), None);

        let device = device.with_floor_name("Ground floor").with_room_name("Hall");
        assert_eq!(device.floor_name(), Some("Ground floor"));
        assert_eq!(device.room_name(), Some("Hall"));
    }

    #[test]
    fn parameters_are_passed_through() {
        let device = device();
        assert_eq!(device.parameters().len(), 1);
        assert_eq!(device.parameter("par0001"), Some(&serde_json::json!("1")));
        assert_eq!(device.parameter("par0002"), None);
    }

    #[test]
    fn lookup_error_carries_context() {
        let err = device()
            .get_output_by_pairing_id(PairingId::SWITCH_ON_OFF)
            .unwrap_err();

        assert_eq!(
            err,
            DeviceError::InvalidChannelPairingId {
                device_id: "ABB7F500E17A".to_string(),
                channel_id: "ch0000".to_string(),
                pairing_id: PairingId::SWITCH_ON_OFF,
                direction: Direction::Output,
            }
        );
    }

    #[test]
    fn update_by_full_key_notifies_once() {
        let device = device();
        let (cb, counter) = counting();
        device.register_callback(cb);

        assert!(device.update_device("ABB7F500E17A/ch0000/odp0000", "1"));
        assert_eq!(counter.load(Ordering::SeqCst), 1);
        assert_eq!(device.output("odp0000").unwrap().value, Value::from("1"));
    }

    #[test]
    fn update_with_same_value_is_silent() {
        let device = device();
        let (cb, counter) = counting();
        device.register_callback(cb);

        assert!(!device.update_device("odp0000", "0"));
        assert_eq!(counter.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn update_unknown_datapoint_is_ignored() {
        let device = device();
        let (cb, counter) = counting();
        device.register_callback(cb);

        assert!(!device.update_device("ABB7F500E17A/ch0000/odp0099", "1"));
        assert_eq!(counter.load(Ordering::SeqCst), 0);
        assert_eq!(device.inputs().len(), 2);
        assert_eq!(device.outputs().len(), 1);
    }

    #[test]
    fn update_prefers_inputs() {
        let device = device();
        assert!(device.update_device("idp0000", "1"));
        assert_eq!(device.input("idp0000").unwrap().value, Value::from("1"));
        assert_eq!(device.output("odp0000").unwrap().value, Value::from("0"));
    }

    #[test]
    fn observer_sees_new_value() {
        let device = Arc::new(device());
        let seen = Arc::new(RwLock::new(None::<Value>));

        let device_clone = Arc::downgrade(&device);
        let seen_clone = seen.clone();
        device.register_callback(move || {
            if let Some(device) = device_clone.upgrade() {
                let (_, value) = device
                    .get_output_by_pairing_id(PairingId::INFO_ON_OFF)
                    .unwrap();
                *seen_clone.write() = Some(value);
            }
        });

        device.update_device("odp0000", "1");
        assert_eq!(*seen.read(), Some(Value::from("1")));
    }

    #[test]
    fn observer_can_update_reentrantly() {
        let device = Arc::new(device());
        let calls = Arc::new(AtomicU32::new(0));

        let device_clone = Arc::downgrade(&device);
        let calls_clone = calls.clone();
        device.register_callback(move || {
            calls_clone.fetch_add(1, Ordering::SeqCst);
            if let Some(device) = device_clone.upgrade() {
                // Mirror the switch request onto the actuator state.
                let switched = device.input("idp0000").map(|dp| dp.value);
                if switched == Some(Value::from("1")) {
                    device.update_device("ABB7F500E17A/ch0000/odp0000", "1");
                }
            }
        });

        assert!(device.update_device("ABB7F500E17A/ch0000/idp0000", "1"));

        assert_eq!(device.input("idp0000").unwrap().value, Value::from("1"));
        assert_eq!(device.output("odp0000").unwrap().value, Value::from("1"));
        // Once for idp0000, once for the nested odp0000 change; the second
        // nested write is unchanged and notifies nobody.
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn repeated_nan_update_is_silent() {
        let device = device();
        let (cb, counter) = counting();
        device.register_callback(cb);

        assert!(device.update_device("odp0000", f64::NAN));
        assert!(!device.update_device("odp0000", f64::NAN));
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn removed_observer_is_not_notified() {
        let device = device();
        let (cb, counter) = counting();
        device.register_callback(cb.clone());
        assert!(device.remove_callback(&cb));

        device.update_device("odp0000", "1");
        assert_eq!(counter.load(Ordering::SeqCst), 0);
        assert_eq!(device.callback_count(), 0);
    }

    #[test]
    fn debug_lists_identity() {
        let debug = format!("{:?}", device());
        assert!(debug.contains("ABB7F500E17A"));
        assert!(debug.contains("callback_count"));
    }
}
