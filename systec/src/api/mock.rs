use std::collections::{HashMap, VecDeque};
use std::ffi::c_void;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;
use crate::can::{CanMsg, InitCanParam};
use crate::device::{ChannelInfo, HardwareFilter, HardwareInfoEx, MsgCountInfo, Status, VersionType};
use crate::status::ReturnCode;
use super::{CallbackFktEx, ConnectControlFktEx, EnumCallback, UcanApi};

/// An in-memory call table recording every native call by its exported name.
#[derive(Default)]
pub(crate) struct MockApi {
    calls: Mutex<Vec<&'static str>>,
    results: Mutex<HashMap<&'static str, ReturnCode>>,
    rx: Mutex<VecDeque<(u8, Vec<CanMsg>)>>,
    cyclic: Mutex<Vec<CanMsg>>,
    tx_limit: Mutex<Option<u32>>,
    tx_timeout: AtomicU32,
    connect_control: Mutex<Option<(ConnectControlFktEx, usize)>>,
    working: Mutex<Option<(CallbackFktEx, usize)>>,
}

impl MockApi {
    pub(crate) const HANDLE: u8 = 3;
    pub(crate) const SERIAL: u32 = 0x0123_4567;
    pub(crate) const PRODUCT_CODE: u32 = 0x1105;
    pub(crate) const FW_VERSION: u32 = 0x0003_1005;
    pub(crate) const LIB_VERSION: u32 = 0x0002_0006;
    pub(crate) const MODULE_TIME: u32 = 42_000;

    /// How often `func` has been called.
    pub(crate) fn count(&self, func: &str) -> usize {
        self.calls.lock().unwrap()
            .iter()
            .filter(|&&name| name == func)
            .count()
    }

    pub(crate) fn set_result(&self, func: &'static str, code: ReturnCode) {
        self.results.lock().unwrap().insert(func, code);
    }

    /// Queues messages returned by the next `UcanReadCanMsgEx`.
    pub(crate) fn push_rx(&self, channel: u8, msgs: &[CanMsg]) {
        self.rx.lock().unwrap().push_back((channel, msgs.to_vec()));
    }

    /// Limits the number of messages accepted by `UcanWriteCanMsgEx`.
    pub(crate) fn set_tx_limit(&self, limit: Option<u32>) {
        *self.tx_limit.lock().unwrap() = limit;
    }

    pub(crate) fn last_tx_timeout(&self) -> u32 {
        self.tx_timeout.load(Ordering::Relaxed)
    }

    /// Delivers a connect event the way the library does, through the registered callback.
    /// Returns `false` when no callback is registered on this table.
    pub(crate) fn fire_connect(&self, event: u32, param: u32) -> bool {
        let registered = *self.connect_control.lock().unwrap();
        match registered {
            Some((callback, arg)) => {
                unsafe { callback(event, param, arg as *mut c_void) };
                true
            },
            None => false,
        }
    }

    /// Delivers a working event to the callback handed over at hardware initialization.
    pub(crate) fn fire_working(&self, event: u32, channel: u8) -> bool {
        let registered = *self.working.lock().unwrap();
        match registered {
            Some((callback, arg)) => {
                unsafe { callback(Self::HANDLE, event, channel, arg as *mut c_void) };
                true
            },
            None => false,
        }
    }

    /// The callback argument handed over at hardware initialization.
    pub(crate) fn working_arg(&self) -> Option<usize> {
        self.working.lock().unwrap().map(|(_, arg)| arg)
    }

    fn call(&self, func: &'static str) -> ReturnCode {
        self.calls.lock().unwrap().push(func);
        self.results.lock().unwrap()
            .get(func)
            .copied()
            .unwrap_or(ReturnCode::SUCCESSFUL)
    }

    fn hardware_info() -> HardwareInfoEx {
        HardwareInfoEx::with_product(Self::PRODUCT_CODE, Self::FW_VERSION)
            .with_serial_nr(Self::SERIAL)
    }
}

impl UcanApi for MockApi {
    fn set_debug_mode(&self, _: u32, _: &str, _: u32) -> bool {
        self.call("UcanSetDebugMode");
        true
    }

    fn get_version_ex(&self, _: VersionType) -> u32 {
        self.call("UcanGetVersionEx");
        Self::LIB_VERSION
    }

    fn get_fw_version(&self, _: u8) -> u32 {
        self.call("UcanGetFwVersion");
        Self::FW_VERSION
    }

    fn init_hw_connect_control_ex(&self, callback: ConnectControlFktEx, arg: *mut c_void) -> ReturnCode {
        let ret = self.call("UcanInitHwConnectControlEx");
        if ret.is_success() {
            *self.connect_control.lock().unwrap() = Some((callback, arg as usize));
        }
        ret
    }

    fn deinit_hw_connect_control(&self) -> ReturnCode {
        *self.connect_control.lock().unwrap() = None;
        self.call("UcanDeinitHwConnectControl")
    }

    fn enumerate_hardware(&self, callback: EnumCallback, arg: *mut c_void, _: &HardwareFilter) -> u32 {
        self.call("UcanEnumerateHardware");
        let mut info = Self::hardware_info();
        unsafe { callback(0, 0, &mut info, std::ptr::null_mut(), arg) };
        1
    }

    fn init_hardware_ex(&self, handle: &mut u8, _: u8, callback: CallbackFktEx, arg: *mut c_void) -> ReturnCode {
        let ret = self.call("UcanInitHardwareEx");
        if ret.is_success() {
            *handle = Self::HANDLE;
            *self.working.lock().unwrap() = Some((callback, arg as usize));
        }
        ret
    }

    fn init_hardware_ex2(&self, handle: &mut u8, _: u32, callback: CallbackFktEx, arg: *mut c_void) -> ReturnCode {
        let ret = self.call("UcanInitHardwareEx2");
        if ret.is_success() {
            *handle = Self::HANDLE;
            *self.working.lock().unwrap() = Some((callback, arg as usize));
        }
        ret
    }

    fn get_module_time(&self, _: u8, time: &mut u32) -> ReturnCode {
        *time = Self::MODULE_TIME;
        self.call("UcanGetModuleTime")
    }

    fn get_hardware_info_ex2(&self, _: u8, info: &mut HardwareInfoEx, ch0: &mut ChannelInfo, ch1: &mut ChannelInfo) -> ReturnCode {
        *info = Self::hardware_info();
        *ch0 = ChannelInfo::default();
        *ch1 = ChannelInfo::default();
        self.call("UcanGetHardwareInfoEx2")
    }

    fn init_can_ex2(&self, _: u8, _: u8, _: &InitCanParam) -> ReturnCode {
        self.call("UcanInitCanEx2")
    }

    fn set_baudrate_ex(&self, _: u8, _: u8, _: u8, _: u8, _: u32) -> ReturnCode {
        self.call("UcanSetBaudrateEx")
    }

    fn set_acceptance_ex(&self, _: u8, _: u8, _: u32, _: u32) -> ReturnCode {
        self.call("UcanSetAcceptanceEx")
    }

    fn reset_can_ex(&self, _: u8, _: u8, _: u32) -> ReturnCode {
        self.call("UcanResetCanEx")
    }

    fn read_can_msg_ex(&self, _: u8, channel: &mut u8, msgs: &mut [CanMsg], count: &mut u32) -> ReturnCode {
        let ret = self.call("UcanReadCanMsgEx");
        if !ret.is_success() {
            return ret;
        }

        match self.rx.lock().unwrap().pop_front() {
            Some((ch, received)) => {
                let len = received.len().min(msgs.len()).min(*count as usize);
                msgs[..len].copy_from_slice(&received[..len]);
                *channel = ch;
                *count = len as u32;
                ReturnCode::SUCCESSFUL
            },
            None => {
                *count = 0;
                ReturnCode::WARN_NODATA
            },
        }
    }

    fn write_can_msg_ex(&self, _: u8, _: u8, msgs: &[CanMsg], count: &mut u32) -> ReturnCode {
        let ret = self.call("UcanWriteCanMsgEx");
        if !ret.is_success() {
            return ret;
        }

        let requested = (*count).min(msgs.len() as u32);
        match *self.tx_limit.lock().unwrap() {
            Some(limit) if limit < requested => {
                *count = limit;
                ReturnCode::WARN_TXLIMIT
            },
            _ => {
                *count = requested;
                ReturnCode::SUCCESSFUL
            },
        }
    }

    fn get_status_ex(&self, _: u8, _: u8, status: &mut Status) -> ReturnCode {
        *status = Status::default();
        self.call("UcanGetStatusEx")
    }

    fn get_msg_count_info_ex(&self, _: u8, _: u8, info: &mut MsgCountInfo) -> ReturnCode {
        *info = MsgCountInfo::default();
        self.call("UcanGetMsgCountInfoEx")
    }

    fn get_msg_pending(&self, _: u8, _: u8, _: u32, count: &mut u32) -> ReturnCode {
        *count = 0;
        self.call("UcanGetMsgPending")
    }

    fn get_can_error_counter(&self, _: u8, _: u8, tx: &mut u32, rx: &mut u32) -> ReturnCode {
        (*tx, *rx) = (0, 0);
        self.call("UcanGetCanErrorCounter")
    }

    fn set_tx_timeout(&self, _: u8, _: u8, timeout_ms: u32) -> ReturnCode {
        self.tx_timeout.store(timeout_ms, Ordering::Relaxed);
        self.call("UcanSetTxTimeout")
    }

    fn deinit_can_ex(&self, _: u8, _: u8) -> ReturnCode {
        self.call("UcanDeinitCanEx")
    }

    fn deinit_hardware(&self, _: u8) -> ReturnCode {
        self.call("UcanDeinitHardware")
    }

    fn define_cyclic_can_msg(&self, _: u8, _: u8, msgs: &[CanMsg], count: u32) -> ReturnCode {
        let ret = self.call("UcanDefineCyclicCanMsg");
        if ret.is_success() {
            let len = (count as usize).min(msgs.len());
            *self.cyclic.lock().unwrap() = msgs[..len].to_vec();
        }
        ret
    }

    fn read_cyclic_can_msg(&self, _: u8, _: u8, msgs: &mut [CanMsg], count: &mut u32) -> ReturnCode {
        let ret = self.call("UcanReadCyclicCanMsg");
        let cyclic = self.cyclic.lock().unwrap();
        let len = cyclic.len().min(msgs.len()).min(*count as usize);
        msgs[..len].copy_from_slice(&cyclic[..len]);
        *count = len as u32;
        ret
    }

    fn enable_cyclic_can_msg(&self, _: u8, _: u8, _: u32) -> ReturnCode {
        self.call("UcanEnableCyclicCanMsg")
    }
}
