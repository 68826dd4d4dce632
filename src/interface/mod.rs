// Copyright 2025 Au-Zone Technologies Inc.
// SPDX-License-Identifier: Apache-2.0

//! Interfaces to the driver's external collaborators.
//!
//! The core never talks to hardware or to the consumer surface directly; it
//! goes through the [`HubTransport`] trait for the remote sensor and the
//! [`SensorHost`] trait for the device/buffer framework. Both are injected
//! at attach time.

pub mod host;
pub mod transport;

pub use host::{AccessMode, DeviceHandle, SensorHost};
pub use transport::{FrameSink, HubTransport, SensorCommonData};
