// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! `freeathome_lib` - A Rust library modelling ABB free@home devices.
//!
//! A free@home System Access Point exposes every physical device as a set
//! of channels. Each channel carries named inputs and outputs whose semantic
//! role is given by a pairing id. This crate provides the generic channel
//! object that concrete device classes build on.
//!
//! # Features
//!
//! - **Identity**: device and channel ids and display names, floor and room
//! - **Datapoint lookup**: find an input or output by pairing id
//! - **State updates**: apply values pushed by the hub
//! - **Observers**: register callbacks notified after each state change
//!
//! # Quick Start
//!
//! ```
//! use std::sync::Arc;
//! use freeathome_lib::{ApiError, Callback, Device, FreeAtHomeApi, Parameters};
//! use freeathome_lib::types::{Datapoint, DatapointMap, PairingId};
//!
//! # struct Offline;
//! # impl FreeAtHomeApi for Offline {
//! #     async fn set_datapoint(&self, _: &str, _: &str, _: &str, _: &str) -> Result<String, ApiError> {
//! #         Err(ApiError::Unauthorized)
//! #     }
//! #     async fn get_datapoint(&self, _: &str, _: &str, _: &str) -> Result<Vec<String>, ApiError> {
//! #         Err(ApiError::Unauthorized)
//! #     }
//! # }
//! let inputs: DatapointMap = [("idp0000", Datapoint::new(PairingId::SWITCH_ON_OFF, "0"))]
//!     .into_iter()
//!     .collect();
//! let outputs: DatapointMap = [("odp0000", Datapoint::new(PairingId::INFO_ON_OFF, "0"))]
//!     .into_iter()
//!     .collect();
//!
//! let device = Device::new(
//!     "ABB7F500E17A",
//!     "Switch actuator",
//!     "ch0000",
//!     "Hallway",
//!     inputs,
//!     outputs,
//!     Parameters::new(),
//!     Arc::new(Offline),
//! );
//!
//! let on_change = Callback::new(|| println!("hallway light changed"));
//! device.register_callback(on_change.clone());
//!
//! // The transport layer pushes updates as they arrive.
//! assert!(device.update_device("ABB7F500E17A/ch0000/odp0000", "1"));
//!
//! let (_, value) = device.get_output_by_pairing_id(PairingId::INFO_ON_OFF)?;
//! assert_eq!(value.as_bool(), Some(true));
//!
//! device.remove_callback(&on_change);
//! # Ok::<(), freeathome_lib::Error>(())
//! ```

pub mod api;
mod device;
pub mod error;
pub mod subscription;
pub mod types;

pub use api::FreeAtHomeApi;
pub use device::{Device, Parameters};
pub use error::{ApiError, DeviceError, Error, Result, ValueError};
pub use subscription::{Callback, CallbackRegistry};
pub use types::{Datapoint, DatapointMap, Direction, PairingId, Value};
