// Copyright 2025 Au-Zone Technologies Inc.
// SPDX-License-Identifier: Apache-2.0

//! Mock transport and host framework for integration tests.
//!
//! Both mocks record every call for verification and let tests inject a
//! failure at any single step.

#![allow(dead_code)]

use std::sync::{Arc, Mutex, Once};

use sthub_quat::{
    AccessMode, Channel, DeviceHandle, Error, FrameSink, HubTransport, ScanMask, SensorCommonData,
    SensorHost, SetupStep, TransportOp,
};

static INIT: Once = Once::new();

/// Initialize logger for tests (only once)
pub fn init_logger() {
    INIT.call_once(|| {
        let _ = env_logger::builder().is_test(true).try_init();
    });
}

/// One recorded transport interaction
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportCall {
    CommonData,
    Enable {
        enabled: bool,
        sync: bool,
        exclusive: bool,
    },
    ReadFrame {
        len: usize,
    },
    RegisterSink,
    UnregisterSink,
}

#[derive(Default)]
pub struct TransportState {
    pub calls: Vec<TransportCall>,
    pub frame: Vec<u8>,
    pub common: Option<SensorCommonData>,
    pub fail_common_data: bool,
    pub fail_enable: bool,
    pub fail_read: bool,
    pub fail_disable: bool,
    pub fail_register_sink: bool,
    pub sink: Option<Arc<dyn FrameSink>>,
}

/// Mock remote-sensor transport
pub struct MockTransport {
    pub state: Mutex<TransportState>,
}

impl MockTransport {
    pub fn new(common: SensorCommonData, frame: Vec<u8>) -> Self {
        Self {
            state: Mutex::new(TransportState {
                common: Some(common),
                frame,
                ..TransportState::default()
            }),
        }
    }

    pub fn calls(&self) -> Vec<TransportCall> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn call_count(&self) -> usize {
        self.state.lock().unwrap().calls.len()
    }

    pub fn sink(&self) -> Option<Arc<dyn FrameSink>> {
        self.state.lock().unwrap().sink.clone()
    }

    /// Deliver one frame to the registered sink, as the continuous-mode
    /// push path would
    pub fn push_frame(&self, raw: &[u8], timestamp_ns: i64) {
        let sink = self.sink().expect("no frame sink registered");
        sink.on_frame(raw, timestamp_ns);
    }
}

impl HubTransport for MockTransport {
    fn common_data(&self, _index: usize) -> Result<SensorCommonData, Error> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(TransportCall::CommonData);
        if state.fail_common_data {
            return Err(Error::Transport(TransportOp::CommonData));
        }
        Ok(state.common.expect("mock common data not set"))
    }

    fn set_enable(
        &self,
        _index: usize,
        enabled: bool,
        sync: bool,
        _delay_ms: u32,
        exclusive: bool,
    ) -> Result<(), Error> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(TransportCall::Enable {
            enabled,
            sync,
            exclusive,
        });
        if enabled && state.fail_enable {
            return Err(Error::Transport(TransportOp::Enable));
        }
        if !enabled && state.fail_disable {
            return Err(Error::Transport(TransportOp::Disable));
        }
        Ok(())
    }

    fn read_frame(&self, _index: usize, out: &mut [u8]) -> Result<(), Error> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(TransportCall::ReadFrame { len: out.len() });
        if state.fail_read {
            return Err(Error::Transport(TransportOp::Read));
        }
        let n = out.len().min(state.frame.len());
        out[..n].copy_from_slice(&state.frame[..n]);
        Ok(())
    }

    fn register_frame_sink(&self, _index: usize, sink: Arc<dyn FrameSink>) -> Result<(), Error> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(TransportCall::RegisterSink);
        if state.fail_register_sink {
            return Err(Error::Transport(TransportOp::RegisterSink));
        }
        state.sink = Some(sink);
        Ok(())
    }

    fn unregister_frame_sink(&self, _index: usize) {
        let mut state = self.state.lock().unwrap();
        state.calls.push(TransportCall::UnregisterSink);
        state.sink = None;
    }
}

pub struct HostState {
    pub next_handle: u32,
    pub allocated: Vec<DeviceHandle>,
    pub registered: Vec<DeviceHandle>,
    pub buffers: Vec<DeviceHandle>,
    pub triggers: Vec<DeviceHandle>,
    pub samples: Vec<(DeviceHandle, Vec<u8>, i64)>,
    pub mode: AccessMode,
    pub mask: ScanMask,
    pub fail_alloc: bool,
    pub fail_buffer: bool,
    pub fail_trigger: bool,
    pub fail_register: bool,
}

impl Default for HostState {
    fn default() -> Self {
        Self {
            next_handle: 1,
            allocated: Vec::new(),
            registered: Vec::new(),
            buffers: Vec::new(),
            triggers: Vec::new(),
            samples: Vec::new(),
            mode: AccessMode::Direct,
            mask: ScanMask::all(),
            fail_alloc: false,
            fail_buffer: false,
            fail_trigger: false,
            fail_register: false,
        }
    }
}

/// Mock host device/buffer framework
#[derive(Default)]
pub struct MockHost {
    pub state: Mutex<HostState>,
}

impl MockHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_mode(&self, mode: AccessMode) {
        self.state.lock().unwrap().mode = mode;
    }

    pub fn set_mask(&self, mask: ScanMask) {
        self.state.lock().unwrap().mask = mask;
    }

    pub fn samples(&self) -> Vec<(DeviceHandle, Vec<u8>, i64)> {
        self.state.lock().unwrap().samples.clone()
    }

    /// True when no device, buffer or trigger resources remain held
    pub fn is_clean(&self) -> bool {
        let state = self.state.lock().unwrap();
        state.allocated.is_empty()
            && state.registered.is_empty()
            && state.buffers.is_empty()
            && state.triggers.is_empty()
    }
}

fn remove(list: &mut Vec<DeviceHandle>, handle: DeviceHandle) {
    list.retain(|h| *h != handle);
}

impl SensorHost for MockHost {
    fn alloc_device(
        &self,
        _name: &str,
        _channels: &'static [Channel],
    ) -> Result<DeviceHandle, Error> {
        let mut state = self.state.lock().unwrap();
        if state.fail_alloc {
            return Err(Error::Alloc);
        }
        let handle = DeviceHandle(state.next_handle);
        state.next_handle += 1;
        state.allocated.push(handle);
        Ok(handle)
    }

    fn register_device(&self, handle: DeviceHandle) -> Result<(), Error> {
        let mut state = self.state.lock().unwrap();
        if state.fail_register {
            return Err(Error::Setup(SetupStep::Register));
        }
        state.registered.push(handle);
        Ok(())
    }

    fn unregister_device(&self, handle: DeviceHandle) {
        remove(&mut self.state.lock().unwrap().registered, handle);
    }

    fn free_device(&self, handle: DeviceHandle) {
        remove(&mut self.state.lock().unwrap().allocated, handle);
    }

    fn setup_buffer(&self, handle: DeviceHandle) -> Result<(), Error> {
        let mut state = self.state.lock().unwrap();
        if state.fail_buffer {
            return Err(Error::Setup(SetupStep::BufferSetup));
        }
        state.buffers.push(handle);
        Ok(())
    }

    fn cleanup_buffer(&self, handle: DeviceHandle) {
        remove(&mut self.state.lock().unwrap().buffers, handle);
    }

    fn setup_trigger(&self, handle: DeviceHandle) -> Result<(), Error> {
        let mut state = self.state.lock().unwrap();
        if state.fail_trigger {
            return Err(Error::Setup(SetupStep::TriggerSetup));
        }
        state.triggers.push(handle);
        Ok(())
    }

    fn remove_trigger(&self, handle: DeviceHandle) {
        remove(&mut self.state.lock().unwrap().triggers, handle);
    }

    fn current_mode(&self, _handle: DeviceHandle) -> AccessMode {
        self.state.lock().unwrap().mode
    }

    fn active_scan_mask(&self, _handle: DeviceHandle) -> ScanMask {
        self.state.lock().unwrap().mask
    }

    fn push_sample(&self, handle: DeviceHandle, sample: &[u8], timestamp_ns: i64) {
        self.state
            .lock()
            .unwrap()
            .samples
            .push((handle, sample.to_vec(), timestamp_ns));
    }
}

/// A full 17-byte raw frame with distinct per-channel byte patterns
pub fn test_frame() -> Vec<u8> {
    vec![
        0x00, 0x00, 0x80, 0x3F, // X
        0x11, 0x12, 0x13, 0x14, // Y
        0x21, 0x22, 0x23, 0x24, // Z
        0x31, 0x32, 0x33, 0x34, // W
        0x02, // accuracy
    ]
}

pub fn test_common_data() -> SensorCommonData {
    SensorCommonData {
        gain: 1_000_000,
        payload_len: 17,
    }
}

/// Attach one driver instance over fresh mocks
pub fn attach_driver(
    transport: &Arc<MockTransport>,
    host: &Arc<MockHost>,
) -> sthub_quat::QuatDriver<MockTransport, MockHost> {
    sthub_quat::QuatDriver::attach(
        Arc::clone(transport),
        Arc::clone(host),
        0,
        "lis331eb_quat",
    )
    .expect("attach failed")
}
