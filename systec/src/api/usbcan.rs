use std::ffi::c_void;
use dlopen2::symbor::{Container, Symbol, SymBorApi};
use crate::api::{CallbackFktEx, ConnectControlFktEx, EnumCallback, UcanApi};
use crate::can::{CanMsg, InitCanParam};
use crate::device::{ChannelInfo, HardwareFilter, HardwareInfoEx, MsgCountInfo, Status, VersionType};
use crate::status::ReturnCode;
use crate::utils::str_to_wide;

#[allow(non_snake_case)]
#[derive(Debug, Clone, SymBorApi)]
pub(crate) struct UsbCanApi<'a> {
    /// BOOL PUBLIC UcanSetDebugMode (DWORD dwDbgLevel_p, _TCHAR* pszFilePathName_p, DWORD dwFlags_p);
    UcanSetDebugMode: Symbol<'a, unsafe extern "system" fn(level: u32, filename: *const u16, flags: u32) -> i32>,
    /// DWORD PUBLIC UcanGetVersionEx (tUcanVersionType VerType_p);
    UcanGetVersionEx: Symbol<'a, unsafe extern "system" fn(ver_type: u32) -> u32>,
    /// DWORD PUBLIC UcanGetFwVersion (tUcanHandle UcanHandle_p);
    UcanGetFwVersion: Symbol<'a, unsafe extern "system" fn(handle: u8) -> u32>,
    /// BYTE PUBLIC UcanInitHwConnectControlEx (tConnectControlFktEx fpConnectControlFktEx_p, void* pCallbackArg_p);
    UcanInitHwConnectControlEx: Symbol<'a, unsafe extern "system" fn(callback: ConnectControlFktEx, arg: *mut c_void) -> ReturnCode>,
    /// BYTE PUBLIC UcanDeinitHwConnectControl (void);
    UcanDeinitHwConnectControl: Symbol<'a, unsafe extern "system" fn() -> ReturnCode>,
    /// DWORD PUBLIC UcanEnumerateHardware (tUcanEnumCallback fpCallback_p, void* pCallbackArg_p, BOOL fEnumUsedDevs_p,
    ///     BYTE bDeviceNrLow_p, BYTE bDeviceNrHigh_p, DWORD dwSerialNrLow_p, DWORD dwSerialNrHigh_p,
    ///     DWORD dwProductCodeLow_p, DWORD dwProductCodeHigh_p);
    UcanEnumerateHardware: Symbol<'a, unsafe extern "system" fn(
        callback: EnumCallback,
        arg: *mut c_void,
        enum_used_devs: i32,
        device_nr_low: u8,
        device_nr_high: u8,
        serial_nr_low: u32,
        serial_nr_high: u32,
        product_code_low: u32,
        product_code_high: u32,
    ) -> u32>,
    /// BYTE PUBLIC UcanInitHardwareEx (tUcanHandle* pUcanHandle_p, BYTE bDeviceNr_p, tCallbackFktEx fpCallbackFktEx_p, void* pCallbackArg_p);
    UcanInitHardwareEx: Symbol<'a, unsafe extern "system" fn(handle: *mut u8, device_nr: u8, callback: CallbackFktEx, arg: *mut c_void) -> ReturnCode>,
    /// BYTE PUBLIC UcanInitHardwareEx2 (tUcanHandle* pUcanHandle_p, DWORD dwSerialNr_p, tCallbackFktEx fpCallbackFktEx_p, void* pCallbackArg_p);
    UcanInitHardwareEx2: Symbol<'a, unsafe extern "system" fn(handle: *mut u8, serial_nr: u32, callback: CallbackFktEx, arg: *mut c_void) -> ReturnCode>,
    /// BYTE PUBLIC UcanGetModuleTime (tUcanHandle UcanHandle_p, DWORD* pdwTime_p);
    UcanGetModuleTime: Symbol<'a, unsafe extern "system" fn(handle: u8, time: *mut u32) -> ReturnCode>,
    /// BYTE PUBLIC UcanGetHardwareInfoEx2 (tUcanHandle UcanHandle_p, tUcanHardwareInfoEx* pHwInfo_p, tUcanChannelInfo* pCanInfoCh0_p, tUcanChannelInfo* pCanInfoCh1_p);
    UcanGetHardwareInfoEx2: Symbol<'a, unsafe extern "system" fn(handle: u8, info: *mut HardwareInfoEx, ch0: *mut ChannelInfo, ch1: *mut ChannelInfo) -> ReturnCode>,
    /// BYTE PUBLIC UcanInitCanEx2 (tUcanHandle UcanHandle_p, BYTE bChannel_p, tUcanInitCanParam* pInitCanParam_p);
    UcanInitCanEx2: Symbol<'a, unsafe extern "system" fn(handle: u8, channel: u8, param: *const InitCanParam) -> ReturnCode>,
    /// BYTE PUBLIC UcanSetBaudrateEx (tUcanHandle UcanHandle_p, BYTE bChannel_p, BYTE bBTR0_p, BYTE bBTR1_p, DWORD dwBaudrate_p);
    UcanSetBaudrateEx: Symbol<'a, unsafe extern "system" fn(handle: u8, channel: u8, btr0: u8, btr1: u8, baudrate: u32) -> ReturnCode>,
    /// BYTE PUBLIC UcanSetAcceptanceEx (tUcanHandle UcanHandle_p, BYTE bChannel_p, DWORD dwAMR_p, DWORD dwACR_p);
    UcanSetAcceptanceEx: Symbol<'a, unsafe extern "system" fn(handle: u8, channel: u8, amr: u32, acr: u32) -> ReturnCode>,
    /// BYTE PUBLIC UcanResetCanEx (tUcanHandle UcanHandle_p, BYTE bChannel_p, DWORD dwResetFlags_p);
    UcanResetCanEx: Symbol<'a, unsafe extern "system" fn(handle: u8, channel: u8, flags: u32) -> ReturnCode>,
    /// BYTE PUBLIC UcanReadCanMsgEx (tUcanHandle UcanHandle_p, BYTE* pbChannel_p, tCanMsgStruct* pCanMsg_p, DWORD* pdwCount_p);
    UcanReadCanMsgEx: Symbol<'a, unsafe extern "system" fn(handle: u8, channel: *mut u8, msgs: *mut CanMsg, count: *mut u32) -> ReturnCode>,
    /// BYTE PUBLIC UcanWriteCanMsgEx (tUcanHandle UcanHandle_p, BYTE bChannel_p, tCanMsgStruct* pCanMsg_p, DWORD* pdwCount_p);
    UcanWriteCanMsgEx: Symbol<'a, unsafe extern "system" fn(handle: u8, channel: u8, msgs: *const CanMsg, count: *mut u32) -> ReturnCode>,
    /// BYTE PUBLIC UcanGetStatusEx (tUcanHandle UcanHandle_p, BYTE bChannel_p, tStatusStruct* pStatus_p);
    UcanGetStatusEx: Symbol<'a, unsafe extern "system" fn(handle: u8, channel: u8, status: *mut Status) -> ReturnCode>,
    /// BYTE PUBLIC UcanGetMsgCountInfoEx (tUcanHandle UcanHandle_p, BYTE bChannel_p, tUcanMsgCountInfo* pMsgCountInfo_p);
    UcanGetMsgCountInfoEx: Symbol<'a, unsafe extern "system" fn(handle: u8, channel: u8, info: *mut MsgCountInfo) -> ReturnCode>,
    /// BYTE PUBLIC UcanGetMsgPending (tUcanHandle UcanHandle_p, BYTE bChannel_p, DWORD dwFlags_p, DWORD* pdwPendingCount_p);
    UcanGetMsgPending: Symbol<'a, unsafe extern "system" fn(handle: u8, channel: u8, flags: u32, count: *mut u32) -> ReturnCode>,
    /// BYTE PUBLIC UcanGetCanErrorCounter (tUcanHandle UcanHandle_p, BYTE bChannel_p, DWORD* pdwTxErrorCounter_p, DWORD* pdwRxErrorCounter_p);
    UcanGetCanErrorCounter: Symbol<'a, unsafe extern "system" fn(handle: u8, channel: u8, tx: *mut u32, rx: *mut u32) -> ReturnCode>,
    /// BYTE PUBLIC UcanSetTxTimeout (tUcanHandle UcanHandle_p, BYTE bChannel_p, DWORD dwTxTimeout_p);
    UcanSetTxTimeout: Symbol<'a, unsafe extern "system" fn(handle: u8, channel: u8, timeout: u32) -> ReturnCode>,
    /// BYTE PUBLIC UcanDeinitCanEx (tUcanHandle UcanHandle_p, BYTE bChannel_p);
    UcanDeinitCanEx: Symbol<'a, unsafe extern "system" fn(handle: u8, channel: u8) -> ReturnCode>,
    /// BYTE PUBLIC UcanDeinitHardware (tUcanHandle UcanHandle_p);
    UcanDeinitHardware: Symbol<'a, unsafe extern "system" fn(handle: u8) -> ReturnCode>,
    /// BYTE PUBLIC UcanDefineCyclicCanMsg (tUcanHandle UcanHandle_p, BYTE bChannel_p, tCanMsgStruct* pCanMsgList_p, DWORD dwCount_p);
    UcanDefineCyclicCanMsg: Symbol<'a, unsafe extern "system" fn(handle: u8, channel: u8, msgs: *const CanMsg, count: u32) -> ReturnCode>,
    /// BYTE PUBLIC UcanReadCyclicCanMsg (tUcanHandle UcanHandle_p, BYTE bChannel_p, tCanMsgStruct* pCanMsgList_p, DWORD* pdwCount_p);
    UcanReadCyclicCanMsg: Symbol<'a, unsafe extern "system" fn(handle: u8, channel: u8, msgs: *mut CanMsg, count: *mut u32) -> ReturnCode>,
    /// BYTE PUBLIC UcanEnableCyclicCanMsg (tUcanHandle UcanHandle_p, BYTE bChannel_p, DWORD dwFlags_p);
    UcanEnableCyclicCanMsg: Symbol<'a, unsafe extern "system" fn(handle: u8, channel: u8, flags: u32) -> ReturnCode>,
}

/// The element count handed to the library never exceeds the buffer.
#[inline]
fn clamp_count(count: &mut u32, len: usize) {
    if *count as usize > len {
        *count = len as u32;
    }
}

impl UcanApi for Container<UsbCanApi<'static>> {
    fn set_debug_mode(&self, level: u32, filename: &str, flags: u32) -> bool {
        let filename = str_to_wide(filename);
        unsafe { (self.UcanSetDebugMode)(level, filename.as_ptr(), flags) != 0 }
    }

    fn get_version_ex(&self, ver_type: VersionType) -> u32 {
        unsafe { (self.UcanGetVersionEx)(ver_type as u32) }
    }

    fn get_fw_version(&self, handle: u8) -> u32 {
        unsafe { (self.UcanGetFwVersion)(handle) }
    }

    fn init_hw_connect_control_ex(&self, callback: ConnectControlFktEx, arg: *mut c_void) -> ReturnCode {
        unsafe { (self.UcanInitHwConnectControlEx)(callback, arg) }
    }

    fn deinit_hw_connect_control(&self) -> ReturnCode {
        unsafe { (self.UcanDeinitHwConnectControl)() }
    }

    fn enumerate_hardware(&self, callback: EnumCallback, arg: *mut c_void, filter: &HardwareFilter) -> u32 {
        unsafe {
            (self.UcanEnumerateHardware)(
                callback,
                arg,
                filter.enum_used_devices as i32,
                filter.device_number_low,
                filter.device_number_high,
                filter.serial_low,
                filter.serial_high,
                filter.product_code_low,
                filter.product_code_high,
            )
        }
    }

    fn init_hardware_ex(&self, handle: &mut u8, device_nr: u8, callback: CallbackFktEx, arg: *mut c_void) -> ReturnCode {
        unsafe { (self.UcanInitHardwareEx)(handle, device_nr, callback, arg) }
    }

    fn init_hardware_ex2(&self, handle: &mut u8, serial_nr: u32, callback: CallbackFktEx, arg: *mut c_void) -> ReturnCode {
        unsafe { (self.UcanInitHardwareEx2)(handle, serial_nr, callback, arg) }
    }

    fn get_module_time(&self, handle: u8, time: &mut u32) -> ReturnCode {
        unsafe { (self.UcanGetModuleTime)(handle, time) }
    }

    fn get_hardware_info_ex2(&self, handle: u8, info: &mut HardwareInfoEx, ch0: &mut ChannelInfo, ch1: &mut ChannelInfo) -> ReturnCode {
        unsafe { (self.UcanGetHardwareInfoEx2)(handle, info, ch0, ch1) }
    }

    fn init_can_ex2(&self, handle: u8, channel: u8, param: &InitCanParam) -> ReturnCode {
        unsafe { (self.UcanInitCanEx2)(handle, channel, param) }
    }

    fn set_baudrate_ex(&self, handle: u8, channel: u8, btr0: u8, btr1: u8, baudrate_ex: u32) -> ReturnCode {
        unsafe { (self.UcanSetBaudrateEx)(handle, channel, btr0, btr1, baudrate_ex) }
    }

    fn set_acceptance_ex(&self, handle: u8, channel: u8, amr: u32, acr: u32) -> ReturnCode {
        unsafe { (self.UcanSetAcceptanceEx)(handle, channel, amr, acr) }
    }

    fn reset_can_ex(&self, handle: u8, channel: u8, flags: u32) -> ReturnCode {
        unsafe { (self.UcanResetCanEx)(handle, channel, flags) }
    }

    fn read_can_msg_ex(&self, handle: u8, channel: &mut u8, msgs: &mut [CanMsg], count: &mut u32) -> ReturnCode {
        clamp_count(count, msgs.len());
        unsafe { (self.UcanReadCanMsgEx)(handle, channel, msgs.as_mut_ptr(), count) }
    }

    fn write_can_msg_ex(&self, handle: u8, channel: u8, msgs: &[CanMsg], count: &mut u32) -> ReturnCode {
        clamp_count(count, msgs.len());
        unsafe { (self.UcanWriteCanMsgEx)(handle, channel, msgs.as_ptr(), count) }
    }

    fn get_status_ex(&self, handle: u8, channel: u8, status: &mut Status) -> ReturnCode {
        unsafe { (self.UcanGetStatusEx)(handle, channel, status) }
    }

    fn get_msg_count_info_ex(&self, handle: u8, channel: u8, info: &mut MsgCountInfo) -> ReturnCode {
        unsafe { (self.UcanGetMsgCountInfoEx)(handle, channel, info) }
    }

    fn get_msg_pending(&self, handle: u8, channel: u8, flags: u32, count: &mut u32) -> ReturnCode {
        unsafe { (self.UcanGetMsgPending)(handle, channel, flags, count) }
    }

    fn get_can_error_counter(&self, handle: u8, channel: u8, tx: &mut u32, rx: &mut u32) -> ReturnCode {
        unsafe { (self.UcanGetCanErrorCounter)(handle, channel, tx, rx) }
    }

    fn set_tx_timeout(&self, handle: u8, channel: u8, timeout_ms: u32) -> ReturnCode {
        unsafe { (self.UcanSetTxTimeout)(handle, channel, timeout_ms) }
    }

    fn deinit_can_ex(&self, handle: u8, channel: u8) -> ReturnCode {
        unsafe { (self.UcanDeinitCanEx)(handle, channel) }
    }

    fn deinit_hardware(&self, handle: u8) -> ReturnCode {
        unsafe { (self.UcanDeinitHardware)(handle) }
    }

    fn define_cyclic_can_msg(&self, handle: u8, channel: u8, msgs: &[CanMsg], count: u32) -> ReturnCode {
        let count = std::cmp::min(count as usize, msgs.len()) as u32;
        unsafe { (self.UcanDefineCyclicCanMsg)(handle, channel, msgs.as_ptr(), count) }
    }

    fn read_cyclic_can_msg(&self, handle: u8, channel: u8, msgs: &mut [CanMsg], count: &mut u32) -> ReturnCode {
        clamp_count(count, msgs.len());
        unsafe { (self.UcanReadCyclicCanMsg)(handle, channel, msgs.as_mut_ptr(), count) }
    }

    fn enable_cyclic_can_msg(&self, handle: u8, channel: u8, flags: u32) -> ReturnCode {
        unsafe { (self.UcanEnableCyclicCanMsg)(handle, channel, flags) }
    }
}
