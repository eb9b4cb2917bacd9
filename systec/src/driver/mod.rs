mod callback;
pub use callback::{DefaultListener, UcanListener};

use std::ffi::c_void;
use std::sync::Arc;
use std::time::Duration;
use crate::api::{load_library, UcanApi};
use crate::can::{Baudrate, BaudrateEx, CanChannelConfig, CanMsg, Channel, CyclicFlags, InitCanParam, PendingFlags, ResetFlags};
use crate::constants::{ANY_MODULE, CHANNEL_COUNT, INVALID_HANDLE, MAX_CYCLIC_CAN_MSG};
use crate::device::{ChannelInfo, EnumeratedModule, HardwareFilter, HardwareInfo, HardwareInfoEx, MsgCountInfo, Status, Version, VersionType};
use crate::error::UcanError;
use crate::status::ReturnCode;
use callback::{enumerate_callback, working_event_callback, CallbackContext, ConnectControl, CONNECT_CONTROL};

/// A session with one USB-CANmodul.
///
/// The hardware is initialized with [`init_hardware`](Self::init_hardware), its CAN
/// channels with [`init_can`](Self::init_can). Dropping the session shuts everything down.
pub struct UcanServer {
    api: Arc<dyn UcanApi>,
    handle: u8,
    hw_initialized: bool,
    ch_initialized: [bool; CHANNEL_COUNT],
    context: Box<CallbackContext>,
}

impl UcanServer {
    /// Loads the USB-CAN-library and creates a session.
    pub fn new(listener: Arc<dyn UcanListener>) -> Result<Self, UcanError> {
        let api = load_library()?;
        Ok(Self::with_api(api, listener))
    }

    /// Creates a session on an already loaded call table.
    ///
    /// The first session of the process also registers `listener` for connect events.
    pub fn with_api(api: Arc<dyn UcanApi>, listener: Arc<dyn UcanListener>) -> Self {
        Self::with_connect_control(api, listener, &CONNECT_CONTROL)
    }

    pub(crate) fn with_connect_control(
        api: Arc<dyn UcanApi>,
        listener: Arc<dyn UcanListener>,
        control: &ConnectControl,
    ) -> Self {
        control.install(&api, &listener);
        Self {
            api,
            handle: INVALID_HANDLE,
            hw_initialized: false,
            ch_initialized: Default::default(),
            context: Box::new(CallbackContext::new(listener)),
        }
    }

    #[inline]
    pub fn handle(&self) -> u8 {
        self.handle
    }

    /// Whether the hardware interface is initialized.
    #[inline]
    pub fn is_initialized(&self) -> bool {
        self.hw_initialized
    }

    #[inline]
    pub fn is_can0_initialized(&self) -> bool {
        self.ch_initialized[0]
    }

    #[inline]
    pub fn is_can1_initialized(&self) -> bool {
        self.ch_initialized[1]
    }

    /// Initializes the module by its serial number if given, otherwise by its device number
    /// ([`ANY_MODULE`] for the first one found). Does nothing when already initialized.
    pub fn init_hardware(&mut self, serial: Option<u32>, device_number: Option<u8>) -> Result<(), UcanError> {
        if self.hw_initialized {
            return Ok(());
        }

        let arg = self.context.as_arg();
        let mut handle = INVALID_HANDLE;
        match serial {
            Some(serial) => {
                self.api.init_hardware_ex2(&mut handle, serial, working_event_callback, arg)
                    .check("UcanInitHardwareEx2", &(serial, ))?;
            },
            None => {
                let device_number = device_number.unwrap_or(ANY_MODULE);
                self.api.init_hardware_ex(&mut handle, device_number, working_event_callback, arg)
                    .check("UcanInitHardwareEx", &(device_number, ))?;
            },
        }

        log::info!("SYSTEC - hardware initialized, handle: {}", handle);
        self.handle = handle;
        self.hw_initialized = true;
        Ok(())
    }

    /// Initializes a CAN channel. Does nothing when the channel is already initialized.
    pub fn init_can(&mut self, channel: Channel, cfg: &CanChannelConfig) -> Result<(), UcanError> {
        let index = self.channel_index(channel)?;
        if !self.hw_initialized {
            return Err(UcanError::HardwareNotInitialized);
        }
        if self.ch_initialized[index] {
            return Ok(());
        }

        let param = InitCanParam::from(cfg);
        self.api.init_can_ex2(self.handle, channel as u8, &param)
            .check("UcanInitCanEx2", &(self.handle, channel as u8, cfg))?;

        log::info!("SYSTEC - CAN channel: {} initialized", channel);
        self.ch_initialized[index] = true;
        Ok(())
    }

    /// Reads up to `count` messages, returns them together with the channel they came from.
    ///
    /// An empty list is returned when no message is available.
    pub fn read_can_msg(&self, channel: Channel, count: usize) -> Result<(Vec<CanMsg>, Channel), UcanError> {
        let mut msgs = vec![CanMsg::default(); count];
        let mut ch = channel as u8;
        let mut read = count as u32;
        let ret = self.api.read_can_msg_ex(self.handle, &mut ch, &mut msgs, &mut read);
        // an empty receive buffer is the usual result of polling
        if ret == ReturnCode::WARN_NODATA {
            return Ok((Vec::new(), channel));
        }
        let ret = ret.check("UcanReadCanMsgEx", &(self.handle, channel as u8, count))?;

        if !ret.is_valid_rx() {
            return Ok((Vec::new(), channel));
        }

        msgs.truncate(std::cmp::min(read as usize, count));
        log::trace!("SYSTEC - received CAN: {} on channel: {}", msgs.len(), ch);
        let ch = Channel::try_from(ch).unwrap_or(channel);
        Ok((msgs, ch))
    }

    /// Transmits messages, returns how many of them the library accepted.
    ///
    /// Fewer than `msgs.len()` means the transmit buffer was full (`WARN_TXLIMIT`).
    /// Writing to a physical channel which is not initialized fails without a native call.
    pub fn write_can_msg(&self, channel: Channel, msgs: &[CanMsg]) -> Result<usize, UcanError> {
        if let Some(index) = channel.index() {
            if !self.ch_initialized[index] {
                return Err(UcanError::ChannelNotInitialized(channel as u8));
            }
        }

        let mut count = msgs.len() as u32;
        let ret = self.api.write_can_msg_ex(self.handle, channel as u8, msgs, &mut count)
            .check("UcanWriteCanMsgEx", &(self.handle, channel as u8, msgs.len()))?;

        if ret.is_tx_not_all() {
            log::warn!("SYSTEC - only {} of {} CAN messages written on channel: {}", count, msgs.len(), channel);
        }
        log::trace!("SYSTEC - transmitted CAN: {}", count);
        Ok(count as usize)
    }

    pub fn set_baudrate(&self, channel: Channel, baudrate: Baudrate, baudrate_ex: BaudrateEx) -> Result<(), UcanError> {
        self.api.set_baudrate_ex(self.handle, channel as u8, baudrate.btr0(), baudrate.btr1(), baudrate_ex as u32)
            .check("UcanSetBaudrateEx", &(self.handle, channel as u8, baudrate, baudrate_ex))?;
        Ok(())
    }

    pub fn set_acceptance(&self, channel: Channel, amr: u32, acr: u32) -> Result<(), UcanError> {
        self.api.set_acceptance_ex(self.handle, channel as u8, amr, acr)
            .check("UcanSetAcceptanceEx", &(self.handle, channel as u8, amr, acr))?;
        Ok(())
    }

    pub fn get_status(&self, channel: Channel) -> Result<Status, UcanError> {
        let mut status = Status::default();
        self.api.get_status_ex(self.handle, channel as u8, &mut status)
            .check("UcanGetStatusEx", &(self.handle, channel as u8))?;
        Ok(status)
    }

    pub fn get_msg_count_info(&self, channel: Channel) -> Result<MsgCountInfo, UcanError> {
        let mut info = MsgCountInfo::default();
        self.api.get_msg_count_info_ex(self.handle, channel as u8, &mut info)
            .check("UcanGetMsgCountInfoEx", &(self.handle, channel as u8))?;
        Ok(info)
    }

    /// Resets a CAN channel, `flags` selects what is kept.
    pub fn reset_can(&self, channel: Channel, flags: ResetFlags) -> Result<(), UcanError> {
        self.api.reset_can_ex(self.handle, channel as u8, flags.bits())
            .check("UcanResetCanEx", &(self.handle, channel as u8, flags))?;
        Ok(())
    }

    pub fn get_hardware_info(&self) -> Result<HardwareInfo, UcanError> {
        let mut info = HardwareInfoEx::default();
        let (mut ch0, mut ch1) = (ChannelInfo::default(), ChannelInfo::default());
        self.api.get_hardware_info_ex2(self.handle, &mut info, &mut ch0, &mut ch1)
            .check("UcanGetHardwareInfoEx2", &(self.handle, ))?;
        Ok(HardwareInfo { info, channels: [ch0, ch1] })
    }

    #[inline]
    pub fn get_fw_version(&self) -> Version {
        Version(self.api.get_fw_version(self.handle))
    }

    /// Defines up to [`MAX_CYCLIC_CAN_MSG`] messages for automatic transmission,
    /// `None` or an empty list deletes the current definition.
    pub fn define_cyclic_can_msg(&self, channel: Channel, msgs: Option<&[CanMsg]>) -> Result<(), UcanError> {
        let msgs = msgs.unwrap_or_default();
        if msgs.len() > MAX_CYCLIC_CAN_MSG {
            return Err(UcanError::DataOutOfRange(msgs.len()));
        }

        let ret = if msgs.is_empty() {
            self.api.define_cyclic_can_msg(self.handle, channel as u8, &[CanMsg::default()], 0)
        } else {
            self.api.define_cyclic_can_msg(self.handle, channel as u8, msgs, msgs.len() as u32)
        };
        ret.check("UcanDefineCyclicCanMsg", &(self.handle, channel as u8, msgs.len()))?;
        Ok(())
    }

    pub fn read_cyclic_can_msg(&self, channel: Channel, count: usize) -> Result<Vec<CanMsg>, UcanError> {
        let count = std::cmp::min(count, MAX_CYCLIC_CAN_MSG);
        let mut msgs = vec![CanMsg::default(); count];
        let mut read = count as u32;
        self.api.read_cyclic_can_msg(self.handle, channel as u8, &mut msgs, &mut read)
            .check("UcanReadCyclicCanMsg", &(self.handle, channel as u8, count))?;

        msgs.truncate(std::cmp::min(read as usize, count));
        Ok(msgs)
    }

    pub fn enable_cyclic_can_msg(&self, channel: Channel, flags: CyclicFlags) -> Result<(), UcanError> {
        self.api.enable_cyclic_can_msg(self.handle, channel as u8, flags.bits())
            .check("UcanEnableCyclicCanMsg", &(self.handle, channel as u8, flags))?;
        Ok(())
    }

    /// The number of messages pending in the buffers selected by `flags`.
    pub fn get_msg_pending(&self, channel: Channel, flags: PendingFlags) -> Result<u32, UcanError> {
        let mut count = 0;
        self.api.get_msg_pending(self.handle, channel as u8, flags.bits(), &mut count)
            .check("UcanGetMsgPending", &(self.handle, channel as u8, flags))?;
        Ok(count)
    }

    /// The transmit and receive error counters of the CAN controller (not available for GW-001 and GW-002).
    pub fn get_can_error_counter(&self, channel: Channel) -> Result<(u32, u32), UcanError> {
        let (mut tx, mut rx) = (0, 0);
        self.api.get_can_error_counter(self.handle, channel as u8, &mut tx, &mut rx)
            .check("UcanGetCanErrorCounter", &(self.handle, channel as u8))?;
        Ok((tx, rx))
    }

    /// A zero timeout disables the transmit timeout.
    pub fn set_tx_timeout(&self, channel: Channel, timeout: Duration) -> Result<(), UcanError> {
        let timeout_ms = u32::try_from(timeout.as_millis())
            .map_err(|_| UcanError::parameter_not_supported(format!("timeout {:?}", timeout)))?;
        self.api.set_tx_timeout(self.handle, channel as u8, timeout_ms)
            .check("UcanSetTxTimeout", &(self.handle, channel as u8, timeout_ms))?;
        Ok(())
    }

    /// The time of the module in ms.
    pub fn get_module_time(&self) -> Result<u32, UcanError> {
        let mut time = 0;
        self.api.get_module_time(self.handle, &mut time)
            .check("UcanGetModuleTime", &(self.handle, ))?;
        Ok(time)
    }

    /// Shuts down the CAN channel(s) and, if requested, the hardware.
    ///
    /// All initialized channels are shut down for [`Channel::ALL`] or when the hardware
    /// is shut down too. Calling it again has no effect.
    pub fn shutdown(&mut self, channel: Channel, shutdown_hardware: bool) -> Result<(), UcanError> {
        let mut result = Ok(());
        for (index, initialized) in self.ch_initialized.iter_mut().enumerate() {
            let current = index as u8;
            if *initialized && (current == channel as u8 || channel == Channel::ALL || shutdown_hardware) {
                log::info!("SYSTEC - closing CAN channel: {}", current);
                if let Err(e) = self.api.deinit_can_ex(self.handle, current)
                    .check("UcanDeinitCanEx", &(self.handle, current)) {
                    result = Err(e);
                }
                *initialized = false;
            }
        }

        if self.hw_initialized && shutdown_hardware {
            log::info!("SYSTEC - closing hardware: {}", self.handle);
            if let Err(e) = self.api.deinit_hardware(self.handle)
                .check("UcanDeinitHardware", &(self.handle, )) {
                // the library may still call back with the old context
                let fresh = Box::new(CallbackContext::new(self.context.listener()));
                let _ = Box::leak(std::mem::replace(&mut self.context, fresh));
                result = Err(e);
            }
            self.hw_initialized = false;
            self.handle = INVALID_HANDLE;
        }

        result
    }

    #[inline]
    fn channel_index(&self, channel: Channel) -> Result<usize, UcanError> {
        channel.index()
            .ok_or(UcanError::ChannelNotSupported(channel as u8))
    }

    /// The version of the USB-CAN-library.
    #[inline]
    pub fn user_dll_version(api: &dyn UcanApi) -> Version {
        Version(api.get_version_ex(VersionType::USER_DLL))
    }

    /// Enables the debug log file of the USB-CAN-library, returns `false` when the file could not be created.
    #[inline]
    pub fn set_debug_mode(api: &dyn UcanApi, level: u32, filename: &str, flags: u32) -> bool {
        api.set_debug_mode(level, filename, flags)
    }

    /// Lists the connected modules matching `filter`.
    pub fn enumerate_hardware(api: &dyn UcanApi, filter: &HardwareFilter) -> Vec<EnumeratedModule> {
        let mut modules: Vec<EnumeratedModule> = Vec::new();
        let count = api.enumerate_hardware(enumerate_callback, &mut modules as *mut Vec<EnumeratedModule> as *mut c_void, filter);
        log::debug!("SYSTEC - {} module(s) enumerated", count);
        modules
    }
}

impl Drop for UcanServer {
    fn drop(&mut self) {
        self.shutdown(Channel::ALL, true)
            .unwrap_or_else(|e| log::warn!("{}", e));
    }
}
