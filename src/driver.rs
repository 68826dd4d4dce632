// Copyright 2025 Au-Zone Technologies Inc.
// SPDX-License-Identifier: Apache-2.0

//! Quaternion device driver: lifecycle, streaming push path and on-demand
//! reads.
//!
//! One [`QuatDriver`] exists per device instance. Attach wires the instance
//! into the host framework and registers the streaming callback with the
//! transport; every setup step that fails unwinds exactly the steps that
//! already succeeded, in reverse order. The streaming path and the
//! on-demand path share no mutable state: streaming decodes into the
//! context's reusable sample buffer, on-demand reads use their own
//! transient scratch buffer and are rejected with `Busy` while streaming
//! mode is active.

use std::sync::{Arc, Mutex};

use log::{debug, trace, warn};

use crate::channels::{channel_offset, frame_len, Channel, ChannelRole, QUAT_CHANNELS};
use crate::constants::{
    is_supported_device, DEFAULT_BATCH_BUFFER_LENGTH, DEFAULT_BATCH_MAX_EVENT_COUNT,
    DEFAULT_BATCH_TIMEOUT_MS, DEFAULT_SAMPLING_FREQUENCY_HZ,
};
use crate::decoder::decode_frame;
use crate::interface::{
    AccessMode, DeviceHandle, FrameSink, HubTransport, SensorCommonData, SensorHost,
};
use crate::{Error, SetupStep};

/// How a returned value is to be interpreted by the consumer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    /// Plain integer, no scale factor applies
    Integer,
    /// Fixed-point: consumer-side scale = value * gain / 2^N
    FractionalLog2,
}

/// Attribute-surface knobs stored in the device context.
///
/// Range validation is owned by the host framework's conventions; the core
/// just stores what the attribute surface writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceConfig {
    /// Streaming sample rate in Hz
    pub sampling_frequency_hz: u16,
    /// Batch-mode maximum event count
    pub batch_max_event_count: u32,
    /// Batch-mode buffer length in samples
    pub batch_buffer_length: u32,
    /// Batch-mode timeout in milliseconds
    pub batch_timeout_ms: u32,
    /// Whether batch mode is enabled
    pub batch_enabled: bool,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            sampling_frequency_hz: DEFAULT_SAMPLING_FREQUENCY_HZ,
            batch_max_event_count: DEFAULT_BATCH_MAX_EVENT_COUNT,
            batch_buffer_length: DEFAULT_BATCH_BUFFER_LENGTH,
            batch_timeout_ms: DEFAULT_BATCH_TIMEOUT_MS,
            batch_enabled: false,
        }
    }
}

/// Streaming push path: the [`FrameSink`] the transport dispatches to.
///
/// Holds the one reusable sample buffer for the instance, sized to the full
/// frame at attach so no per-sample allocation happens on the hot path. The
/// transport delivers pushes for one instance non-overlapping, so the lock
/// is never contended from the streaming side.
pub struct StreamBridge<H: SensorHost> {
    host: Arc<H>,
    handle: DeviceHandle,
    channels: &'static [Channel],
    buffer: Mutex<Vec<u8>>,
}

impl<H: SensorHost + Send + Sync> FrameSink for StreamBridge<H> {
    fn on_frame(&self, raw: &[u8], timestamp_ns: i64) {
        if raw.len() < frame_len() {
            warn!(
                "short frame: {} bytes, expected at least {}",
                raw.len(),
                frame_len()
            );
            return;
        }

        let mask = self.host.active_scan_mask(self.handle);
        let mut buffer = match self.buffer.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        let len = decode_frame(raw, self.channels, mask, &mut buffer);
        self.host.push_sample(self.handle, &buffer[..len], timestamp_ns);
    }
}

/// Scoped rollback action: runs on drop unless disarmed.
///
/// Attach arms one of these per completed setup step and disarms them all
/// only on full success, so an early return unwinds the completed steps in
/// reverse declaration order.
struct Unwind<F: FnOnce()> {
    action: Option<F>,
}

impl<F: FnOnce()> Unwind<F> {
    fn arm(action: F) -> Self {
        Self {
            action: Some(action),
        }
    }

    fn disarm(mut self) {
        self.action = None;
    }
}

impl<F: FnOnce()> Drop for Unwind<F> {
    fn drop(&mut self) {
        if let Some(action) = self.action.take() {
            action();
        }
    }
}

/// Per-instance device context.
///
/// Created by [`QuatDriver::attach`], destroyed by [`QuatDriver::detach`].
/// Attach and detach are expected to run strictly serialized per instance;
/// the host framework's device-model semantics guarantee that.
pub struct QuatDriver<T: HubTransport, H: SensorHost + Send + Sync + 'static> {
    transport: Arc<T>,
    host: Arc<H>,
    instance: usize,
    handle: DeviceHandle,
    cdata: SensorCommonData,
    config: DeviceConfig,
    stream: Arc<StreamBridge<H>>,
}

impl<T: HubTransport, H: SensorHost + Send + Sync + 'static> QuatDriver<T, H> {
    /// Attach a device instance: allocate the host device, read the sensor
    /// calibration, set up buffer and trigger resources, register the
    /// device and finally register the streaming callback.
    ///
    /// Every exit is either full success or full rollback; no resources
    /// stay held when an error is returned.
    pub fn attach(
        transport: Arc<T>,
        host: Arc<H>,
        instance: usize,
        name: &str,
    ) -> Result<Self, Error> {
        trace!("attach instance {} ({})", instance, name);
        if !is_supported_device(name) {
            debug!("instance name {:?} not in the identity table", name);
        }

        let handle = host
            .alloc_device(name, &QUAT_CHANNELS)
            .map_err(|e| setup_failed(SetupStep::AllocDevice, e))?;
        let free_guard = Unwind::arm(|| host.free_device(handle));

        let cdata = transport
            .common_data(instance)
            .map_err(|e| setup_failed(SetupStep::CommonData, e))?;
        if cdata.payload_len < frame_len() {
            warn!(
                "registry payload of {} bytes cannot hold a {}-byte frame",
                cdata.payload_len,
                frame_len()
            );
            return Err(Error::Setup(SetupStep::CommonData));
        }
        let config = DeviceConfig::default();

        host.setup_buffer(handle)
            .map_err(|e| setup_failed(SetupStep::BufferSetup, e))?;
        let buffer_guard = Unwind::arm(|| host.cleanup_buffer(handle));

        host.setup_trigger(handle)
            .map_err(|e| setup_failed(SetupStep::TriggerSetup, e))?;
        let trigger_guard = Unwind::arm(|| host.remove_trigger(handle));

        host.register_device(handle)
            .map_err(|e| setup_failed(SetupStep::Register, e))?;
        let register_guard = Unwind::arm(|| host.unregister_device(handle));

        let stream = Arc::new(StreamBridge {
            host: Arc::clone(&host),
            handle,
            channels: &QUAT_CHANNELS,
            buffer: Mutex::new(vec![0u8; frame_len()]),
        });
        transport
            .register_frame_sink(instance, Arc::clone(&stream) as Arc<dyn FrameSink>)
            .map_err(|e| setup_failed(SetupStep::SinkRegister, e))?;

        register_guard.disarm();
        trigger_guard.disarm();
        buffer_guard.disarm();
        free_guard.disarm();

        trace!("instance {} attached as {:?}", instance, handle);
        Ok(Self {
            transport,
            host,
            instance,
            handle,
            cdata,
            config,
            stream,
        })
    }

    /// Detach the instance: withdraw it from consumers, drop the streaming
    /// callback, remove the trigger association, release buffer resources
    /// and free the host device. The order is fixed and independent of the
    /// current access mode.
    pub fn detach(self) {
        trace!("detach instance {} ({:?})", self.instance, self.handle);
        self.host.unregister_device(self.handle);
        self.transport.unregister_frame_sink(self.instance);
        self.host.remove_trigger(self.handle);
        self.host.cleanup_buffer(self.handle);
        self.host.free_device(self.handle);
    }

    /// On-demand single-shot read of one channel.
    ///
    /// Rejected with `Busy` while the device is in triggered (streaming)
    /// mode, before any transport interaction. Otherwise runs a full
    /// enable/read/disable round-trip, extracts the channel at its fixed
    /// unmasked offset and applies the channel's right-shift for the
    /// fixed-point channels.
    pub fn read_raw(&self, channel_index: usize) -> Result<(i32, ValueKind), Error> {
        let channel = QUAT_CHANNELS
            .get(channel_index)
            .ok_or(Error::InvalidChannel(channel_index))?;

        if self.host.current_mode(self.handle) == AccessMode::Triggered {
            return Err(Error::Busy);
        }

        let value = self.read_single_frame(channel)?;
        match channel.role {
            ChannelRole::Accuracy => Ok((value, ValueKind::Integer)),
            _ => Ok((value >> channel.shift, ValueKind::FractionalLog2)),
        }
    }

    /// Scale query: the stored calibration gain, no transport interaction.
    pub fn read_scale(&self, channel_index: usize) -> Result<(i32, ValueKind), Error> {
        let channel = QUAT_CHANNELS
            .get(channel_index)
            .ok_or(Error::InvalidChannel(channel_index))?;
        if !channel.has_scale {
            return Err(Error::InvalidChannel(channel_index));
        }
        Ok((self.cdata.gain, ValueKind::Integer))
    }

    /// Run one enable/read/disable transaction and extract the channel's
    /// raw value from the full payload.
    ///
    /// The scratch buffer covers the complete multi-channel payload; the
    /// remote protocol always returns the whole frame. It is released on
    /// every exit path, and no transport call happens after a failing step.
    fn read_single_frame(&self, channel: &Channel) -> Result<i32, Error> {
        let mut scratch: Vec<u8> = Vec::new();
        scratch
            .try_reserve_exact(self.cdata.payload_len)
            .map_err(|_| Error::Alloc)?;
        scratch.resize(self.cdata.payload_len, 0);

        trace!("single-shot enable instance {}", self.instance);
        self.transport
            .set_enable(self.instance, true, true, 0, true)?;
        self.transport.read_frame(self.instance, &mut scratch)?;
        self.transport
            .set_enable(self.instance, false, true, 0, true)?;

        let offset = channel_offset(&QUAT_CHANNELS, channel.index);
        let value = match channel.byte_width() {
            1 => i32::from(scratch[offset]),
            _ => i32::from_le_bytes([
                scratch[offset],
                scratch[offset + 1],
                scratch[offset + 2],
                scratch[offset + 3],
            ]),
        };
        Ok(value)
    }

    /// The streaming sink registered with the transport
    pub fn frame_sink(&self) -> Arc<StreamBridge<H>> {
        Arc::clone(&self.stream)
    }

    /// Host handle of this instance
    pub fn handle(&self) -> DeviceHandle {
        self.handle
    }

    /// Transport registry index of this instance
    pub fn instance(&self) -> usize {
        self.instance
    }

    /// Calibration data read at attach
    pub fn common_data(&self) -> SensorCommonData {
        self.cdata
    }

    /// Attribute-surface configuration
    pub fn config(&self) -> &DeviceConfig {
        &self.config
    }

    /// Mutable access for the attribute surface
    pub fn config_mut(&mut self) -> &mut DeviceConfig {
        &mut self.config
    }
}

fn setup_failed(step: SetupStep, source: Error) -> Error {
    debug!("attach step {:?} failed: {:?}", step, source);
    Error::Setup(step)
}
