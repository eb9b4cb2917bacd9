//! **`systec`**, a driver for the SYSTEC USB-CANmodul family built on the vendor USB-CAN-library.

mod constants;
pub use constants::{
    ACR_ALL, AMR_ALL, ANY_MODULE, CAN_FRAME_MAX_SIZE, DEFAULT_BUFFER_ENTRIES,
    INVALID_HANDLE, MAX_CYCLIC_CAN_MSG, MAX_INSTANCES, MAX_MODULES,
};
mod status;
pub use status::*;

pub mod api;
pub mod can;
pub mod device;
pub mod driver;
pub mod error;
mod utils;
