#[cfg(test)]
pub(crate) mod mock;
mod usbcan;

use std::ffi::c_void;
use std::sync::{Arc, OnceLock};
use dlopen2::symbor::Container;
use crate::can::{CanMsg, InitCanParam};
use crate::constants::{LIB_NAME, SYSTEC_ENV, SYSTEC_VAR};
use crate::device::{ChannelInfo, HardwareFilter, HardwareInfoEx, HardwareInitInfo, MsgCountInfo, Status, VersionType};
use crate::error::UcanError;
use crate::status::ReturnCode;

pub(crate) use usbcan::UsbCanApi;

/// void (PUBLIC *CallbackFktEx) (tUcanHandle UcanHandle_p, DWORD dwEvent_p, BYTE bChannel_p, void* pArg_p);
pub type CallbackFktEx = unsafe extern "system" fn(handle: u8, event: u32, channel: u8, arg: *mut c_void);
/// void (PUBLIC *ConnectControlFktEx) (DWORD dwEvent_p, DWORD dwParam_p, void* pArg_p);
pub type ConnectControlFktEx = unsafe extern "system" fn(event: u32, param: u32, arg: *mut c_void);
/// void (PUBLIC *EnumCallback) (DWORD dwIndex_p, BOOL fIsUsed_p, tUcanHardwareInfoEx* pHwInfoEx_p, tUcanHardwareInitInfo* pInitInfo_p, void* pArg_p);
pub type EnumCallback = unsafe extern "system" fn(index: u32, is_used: i32, info: *mut HardwareInfoEx, init_info: *mut HardwareInitInfo, arg: *mut c_void);

/// The call table of the USB-CAN-library.
///
/// Every method mirrors one exported function: out-parameters become mutable
/// references, arrays become slices together with the in/out element count.
/// Except for the four unchecked functions the raw [`ReturnCode`] is handed back
/// and has to be checked by the caller.
///
/// The callback argument pointers must stay valid until the matching deinitialization.
pub trait UcanApi: Send + Sync {
    /// BOOL PUBLIC UcanSetDebugMode (DWORD dwDbgLevel_p, _TCHAR* pszFilePathName_p, DWORD dwFlags_p);
    fn set_debug_mode(&self, level: u32, filename: &str, flags: u32) -> bool;
    /// DWORD PUBLIC UcanGetVersionEx (tUcanVersionType VerType_p);
    fn get_version_ex(&self, ver_type: VersionType) -> u32;
    /// DWORD PUBLIC UcanGetFwVersion (tUcanHandle UcanHandle_p);
    fn get_fw_version(&self, handle: u8) -> u32;
    /// BYTE PUBLIC UcanInitHwConnectControlEx (tConnectControlFktEx fpConnectControlFktEx_p, void* pCallbackArg_p);
    fn init_hw_connect_control_ex(&self, callback: ConnectControlFktEx, arg: *mut c_void) -> ReturnCode;
    /// BYTE PUBLIC UcanDeinitHwConnectControl (void);
    fn deinit_hw_connect_control(&self) -> ReturnCode;
    /// DWORD PUBLIC UcanEnumerateHardware (tUcanEnumCallback fpCallback_p, void* pCallbackArg_p, BOOL fEnumUsedDevs_p,
    ///     BYTE bDeviceNrLow_p, BYTE bDeviceNrHigh_p, DWORD dwSerialNrLow_p, DWORD dwSerialNrHigh_p,
    ///     DWORD dwProductCodeLow_p, DWORD dwProductCodeHigh_p);
    fn enumerate_hardware(&self, callback: EnumCallback, arg: *mut c_void, filter: &HardwareFilter) -> u32;
    /// BYTE PUBLIC UcanInitHardwareEx (tUcanHandle* pUcanHandle_p, BYTE bDeviceNr_p, tCallbackFktEx fpCallbackFktEx_p, void* pCallbackArg_p);
    fn init_hardware_ex(&self, handle: &mut u8, device_nr: u8, callback: CallbackFktEx, arg: *mut c_void) -> ReturnCode;
    /// BYTE PUBLIC UcanInitHardwareEx2 (tUcanHandle* pUcanHandle_p, DWORD dwSerialNr_p, tCallbackFktEx fpCallbackFktEx_p, void* pCallbackArg_p);
    fn init_hardware_ex2(&self, handle: &mut u8, serial_nr: u32, callback: CallbackFktEx, arg: *mut c_void) -> ReturnCode;
    /// BYTE PUBLIC UcanGetModuleTime (tUcanHandle UcanHandle_p, DWORD* pdwTime_p);
    fn get_module_time(&self, handle: u8, time: &mut u32) -> ReturnCode;
    /// BYTE PUBLIC UcanGetHardwareInfoEx2 (tUcanHandle UcanHandle_p, tUcanHardwareInfoEx* pHwInfo_p,
    ///     tUcanChannelInfo* pCanInfoCh0_p, tUcanChannelInfo* pCanInfoCh1_p);
    fn get_hardware_info_ex2(&self, handle: u8, info: &mut HardwareInfoEx, ch0: &mut ChannelInfo, ch1: &mut ChannelInfo) -> ReturnCode;
    /// BYTE PUBLIC UcanInitCanEx2 (tUcanHandle UcanHandle_p, BYTE bChannel_p, tUcanInitCanParam* pInitCanParam_p);
    fn init_can_ex2(&self, handle: u8, channel: u8, param: &InitCanParam) -> ReturnCode;
    /// BYTE PUBLIC UcanSetBaudrateEx (tUcanHandle UcanHandle_p, BYTE bChannel_p, BYTE bBTR0_p, BYTE bBTR1_p, DWORD dwBaudrate_p);
    fn set_baudrate_ex(&self, handle: u8, channel: u8, btr0: u8, btr1: u8, baudrate_ex: u32) -> ReturnCode;
    /// BYTE PUBLIC UcanSetAcceptanceEx (tUcanHandle UcanHandle_p, BYTE bChannel_p, DWORD dwAMR_p, DWORD dwACR_p);
    fn set_acceptance_ex(&self, handle: u8, channel: u8, amr: u32, acr: u32) -> ReturnCode;
    /// BYTE PUBLIC UcanResetCanEx (tUcanHandle UcanHandle_p, BYTE bChannel_p, DWORD dwResetFlags_p);
    fn reset_can_ex(&self, handle: u8, channel: u8, flags: u32) -> ReturnCode;
    /// BYTE PUBLIC UcanReadCanMsgEx (tUcanHandle UcanHandle_p, BYTE* pbChannel_p, tCanMsgStruct* pCanMsg_p, DWORD* pdwCount_p);
    fn read_can_msg_ex(&self, handle: u8, channel: &mut u8, msgs: &mut [CanMsg], count: &mut u32) -> ReturnCode;
    /// BYTE PUBLIC UcanWriteCanMsgEx (tUcanHandle UcanHandle_p, BYTE bChannel_p, tCanMsgStruct* pCanMsg_p, DWORD* pdwCount_p);
    fn write_can_msg_ex(&self, handle: u8, channel: u8, msgs: &[CanMsg], count: &mut u32) -> ReturnCode;
    /// BYTE PUBLIC UcanGetStatusEx (tUcanHandle UcanHandle_p, BYTE bChannel_p, tStatusStruct* pStatus_p);
    fn get_status_ex(&self, handle: u8, channel: u8, status: &mut Status) -> ReturnCode;
    /// BYTE PUBLIC UcanGetMsgCountInfoEx (tUcanHandle UcanHandle_p, BYTE bChannel_p, tUcanMsgCountInfo* pMsgCountInfo_p);
    fn get_msg_count_info_ex(&self, handle: u8, channel: u8, info: &mut MsgCountInfo) -> ReturnCode;
    /// BYTE PUBLIC UcanGetMsgPending (tUcanHandle UcanHandle_p, BYTE bChannel_p, DWORD dwFlags_p, DWORD* pdwPendingCount_p);
    fn get_msg_pending(&self, handle: u8, channel: u8, flags: u32, count: &mut u32) -> ReturnCode;
    /// BYTE PUBLIC UcanGetCanErrorCounter (tUcanHandle UcanHandle_p, BYTE bChannel_p, DWORD* pdwTxErrorCounter_p, DWORD* pdwRxErrorCounter_p);
    fn get_can_error_counter(&self, handle: u8, channel: u8, tx: &mut u32, rx: &mut u32) -> ReturnCode;
    /// BYTE PUBLIC UcanSetTxTimeout (tUcanHandle UcanHandle_p, BYTE bChannel_p, DWORD dwTxTimeout_p);
    fn set_tx_timeout(&self, handle: u8, channel: u8, timeout_ms: u32) -> ReturnCode;
    /// BYTE PUBLIC UcanDeinitCanEx (tUcanHandle UcanHandle_p, BYTE bChannel_p);
    fn deinit_can_ex(&self, handle: u8, channel: u8) -> ReturnCode;
    /// BYTE PUBLIC UcanDeinitHardware (tUcanHandle UcanHandle_p);
    fn deinit_hardware(&self, handle: u8) -> ReturnCode;
    /// BYTE PUBLIC UcanDefineCyclicCanMsg (tUcanHandle UcanHandle_p, BYTE bChannel_p, tCanMsgStruct* pCanMsgList_p, DWORD dwCount_p);
    fn define_cyclic_can_msg(&self, handle: u8, channel: u8, msgs: &[CanMsg], count: u32) -> ReturnCode;
    /// BYTE PUBLIC UcanReadCyclicCanMsg (tUcanHandle UcanHandle_p, BYTE bChannel_p, tCanMsgStruct* pCanMsgList_p, DWORD* pdwCount_p);
    fn read_cyclic_can_msg(&self, handle: u8, channel: u8, msgs: &mut [CanMsg], count: &mut u32) -> ReturnCode;
    /// BYTE PUBLIC UcanEnableCyclicCanMsg (tUcanHandle UcanHandle_p, BYTE bChannel_p, DWORD dwFlags_p);
    fn enable_cyclic_can_msg(&self, handle: u8, channel: u8, flags: u32) -> ReturnCode;
}

static LIBRARY: OnceLock<Arc<dyn UcanApi>> = OnceLock::new();

/// Loads `USBCAN64.dll` (`USBCAN32.dll` on 32 bit targets) once per process.
///
/// When `systec.env` sets `SYSTEC_LIBRARY` the library is loaded from that directory,
/// otherwise the search path of the operating system is used.
/// Later calls hand out the same call table, so the library stays loaded for the process.
pub fn load_library() -> Result<Arc<dyn UcanApi>, UcanError> {
    if let Some(api) = LIBRARY.get() {
        return Ok(Arc::clone(api));
    }

    let libpath = match dotenvy::from_filename(SYSTEC_ENV) {
        Ok(_) => match std::env::var(SYSTEC_VAR) {
            Ok(v) => format!("{}/{}", v, LIB_NAME),
            Err(_) => LIB_NAME.into(),
        },
        Err(_) => LIB_NAME.into(),
    };

    let api: Container<UsbCanApi<'static>> = unsafe {
        Container::load(&libpath)
            .map_err(|e| {
                log::error!("SYSTEC - the {} bit USB-CANmodul driver could not be loaded, please install it from https://www.systec-electronic.com",
                    std::mem::size_of::<usize>() * 8);
                UcanError::LibraryLoad(format!("{}: {}", libpath, e))
            })
    }?;

    let api: Arc<dyn UcanApi> = Arc::new(api);
    Ok(Arc::clone(LIBRARY.get_or_init(|| api)))
}
