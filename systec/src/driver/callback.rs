use std::ffi::c_void;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::{Arc, OnceLock};
use crate::api::UcanApi;
use crate::device::{CbEvent, EnumeratedModule, HardwareInfoEx, HardwareInitInfo};

/// Receives the events of the USB-CAN-library.
///
/// Working events belong to the session the listener was handed to. Connect events
/// are process wide and go to the listener of the first session created.
/// All hooks are called from a thread of the library, so they must return quickly.
#[allow(unused_variables)]
pub trait UcanListener: Send + Sync {
    /// The USB-CANmodul has been initialized.
    fn init_hw_event(&self) {}
    /// A CAN channel has been initialized.
    fn init_can_event(&self, channel: u8) {}
    /// At least one CAN message has been received, read it with `UcanServer::read_can_msg`.
    fn can_msg_received_event(&self, channel: u8) {}
    /// The error status of a channel has changed, read it with `UcanServer::get_status`.
    fn status_event(&self, channel: u8) {}
    fn deinit_can_event(&self, channel: u8) {}
    fn deinit_hw_event(&self) {}
    /// A new USB-CANmodul has been connected to the host.
    fn connect_event(&self) {}
    fn disconnect_event(&self) {}
    /// A USB-CANmodul in use has been disconnected, no function can be called for it anymore.
    fn fatal_disconnect_event(&self, device_number: u32) {}
}

/// A listener ignoring all events.
#[derive(Debug, Default, Copy, Clone)]
pub struct DefaultListener;

impl UcanListener for DefaultListener {}

pub(crate) struct CallbackContext {
    listener: Arc<dyn UcanListener>,
}

impl CallbackContext {
    pub(crate) fn new(listener: Arc<dyn UcanListener>) -> Self {
        Self { listener }
    }

    #[inline]
    pub(crate) fn listener(&self) -> Arc<dyn UcanListener> {
        Arc::clone(&self.listener)
    }

    #[inline]
    pub(crate) fn as_arg(&self) -> *mut c_void {
        self as *const Self as *mut c_void
    }
}

struct Registration {
    /// Keeps the library which holds the registration loaded.
    _api: Arc<dyn UcanApi>,
    context: CallbackContext,
}

/// The connect control callback, registered at most once.
///
/// The registration owns the call table it was installed on, so the library
/// stays loaded after the session which installed it is dropped.
pub(crate) struct ConnectControl {
    registration: OnceLock<Registration>,
}

impl ConnectControl {
    pub(crate) const fn new() -> Self {
        Self { registration: OnceLock::new() }
    }

    /// Returns `true` when this call performed the installation.
    ///
    /// A failed installation is logged and not retried.
    pub(crate) fn install(&self, api: &Arc<dyn UcanApi>, listener: &Arc<dyn UcanListener>) -> bool {
        let mut installing = false;
        let registration = self.registration.get_or_init(|| {
            installing = true;
            Registration { _api: Arc::clone(api), context: CallbackContext::new(Arc::clone(listener)) }
        });
        if !installing {
            return false;
        }

        if let Err(e) = api.init_hw_connect_control_ex(connect_control_callback, registration.context.as_arg())
            .check("UcanInitHwConnectControlEx", &()) {
            log::warn!("{}", e);
        }
        true
    }
}

/// The process wide connect control, never deinstalled by a session.
pub(crate) static CONNECT_CONTROL: ConnectControl = ConnectControl::new();

pub(crate) fn dispatch_working_event(listener: &dyn UcanListener, event: u32, channel: u8) {
    match CbEvent::try_from(event) {
        Ok(CbEvent::INITHW) => listener.init_hw_event(),
        Ok(CbEvent::INITCAN) => listener.init_can_event(channel),
        Ok(CbEvent::RECEIVE) => listener.can_msg_received_event(channel),
        Ok(CbEvent::STATUS) => listener.status_event(channel),
        Ok(CbEvent::DEINITCAN) => listener.deinit_can_event(channel),
        Ok(CbEvent::DEINITHW) => listener.deinit_hw_event(),
        Ok(other) => log::trace!("SYSTEC - ignored working event: {:?}", other),
        Err(e) => log::warn!("{}", e),
    }
}

pub(crate) fn dispatch_connect_event(listener: &dyn UcanListener, event: u32, param: u32) {
    match CbEvent::try_from(event) {
        Ok(CbEvent::CONNECT) => listener.connect_event(),
        Ok(CbEvent::DISCONNECT) => listener.disconnect_event(),
        Ok(CbEvent::FATALDISCON) => listener.fatal_disconnect_event(param),
        Ok(other) => log::trace!("SYSTEC - ignored connect event: {:?}", other),
        Err(e) => log::warn!("{}", e),
    }
}

pub(crate) unsafe extern "system" fn working_event_callback(handle: u8, event: u32, channel: u8, arg: *mut c_void) {
    log::debug!("SYSTEC - handle: {}, event: {}, channel: {}", handle, event, channel);
    if arg.is_null() {
        return;
    }
    // SAFETY: `arg` is the boxed context owned by the session, which outlives the hardware handle.
    let context = unsafe { &*(arg as *const CallbackContext) };
    if catch_unwind(AssertUnwindSafe(|| dispatch_working_event(context.listener.as_ref(), event, channel))).is_err() {
        log::error!("SYSTEC - listener panicked while handling event: {}", event);
    }
}

pub(crate) unsafe extern "system" fn connect_control_callback(event: u32, param: u32, arg: *mut c_void) {
    log::debug!("SYSTEC - event: {}, param: {}", event, param);
    if arg.is_null() {
        return;
    }
    // SAFETY: `arg` points into a connect control registration, which is never dropped while installed.
    let context = unsafe { &*(arg as *const CallbackContext) };
    if catch_unwind(AssertUnwindSafe(|| dispatch_connect_event(context.listener.as_ref(), event, param))).is_err() {
        log::error!("SYSTEC - listener panicked while handling event: {}", event);
    }
}

/// Collects the found modules into the `Vec<EnumeratedModule>` behind `arg`.
pub(crate) unsafe extern "system" fn enumerate_callback(
    index: u32,
    is_used: i32,
    info: *mut HardwareInfoEx,
    _init_info: *mut HardwareInitInfo,
    arg: *mut c_void,
) {
    if arg.is_null() || info.is_null() {
        return;
    }
    // SAFETY: `arg` is the exclusive borrow of the result vector held during `UcanEnumerateHardware`.
    let modules = unsafe { &mut *(arg as *mut Vec<EnumeratedModule>) };
    let info = unsafe { *info };
    log::trace!("SYSTEC - found module: {}, serial: {}, used: {}", index, info.serial_nr(), is_used != 0);
    modules.push(EnumeratedModule { index, is_used: is_used != 0, info });
}
