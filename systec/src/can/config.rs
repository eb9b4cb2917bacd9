use std::{collections::HashMap, fs::read_to_string};
use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use crate::can::{calculate_acr, calculate_amr, Baudrate, BaudrateEx, Mode, OutputControl};
use crate::constants::{ACR_ALL, AMR_ALL, CHANNEL_CFG_FILENAME, DEFAULT_BUFFER_ENTRIES, SYSTEC_ENV, SYSTEC_VAR};
use crate::error::UcanError;

/// The configuration of a CAN channel used by `UcanServer::init_can`.
///
/// All values are the raw register values of the USB-CAN-library,
/// the default is normal mode at 1 MBit/s receiving all messages.
#[derive(Debug, Clone, Deserialize, Serialize, Getters)]
#[serde(default)]
pub struct CanChannelConfig {
    #[getter(copy)]
    mode: u8,
    /// BTR0 in the high byte, BTR1 in the low byte.
    #[getter(copy)]
    baudrate: u16,
    #[getter(copy)]
    baudrate_ex: u32,
    #[getter(copy)]
    ocr: u8,
    #[getter(copy)]
    amr: u32,
    #[getter(copy)]
    acr: u32,
    #[getter(copy)]
    rx_buffer_entries: u16,
    #[getter(copy)]
    tx_buffer_entries: u16,
}

impl Default for CanChannelConfig {
    fn default() -> Self {
        Self {
            mode: Mode::NORMAL.bits(),
            baudrate: Baudrate::BAUD_1MBit as u16,
            baudrate_ex: BaudrateEx::BAUDEX_USE_BTR01 as u32,
            ocr: OutputControl::OCR_DEFAULT as u8,
            amr: AMR_ALL,
            acr: ACR_ALL,
            rx_buffer_entries: DEFAULT_BUFFER_ENTRIES,
            tx_buffer_entries: DEFAULT_BUFFER_ENTRIES,
        }
    }
}

impl CanChannelConfig {
    pub fn new(baudrate: Baudrate, baudrate_ex: BaudrateEx) -> Self {
        Self {
            baudrate: baudrate as u16,
            baudrate_ex: baudrate_ex as u32,
            ..Default::default()
        }
    }

    pub fn set_mode(&mut self, mode: Mode) -> &mut Self {
        self.mode = mode.bits();
        self
    }

    pub fn set_baudrate(&mut self, baudrate: Baudrate) -> &mut Self {
        self.baudrate = baudrate as u16;
        self
    }

    pub fn set_baudrate_ex(&mut self, baudrate_ex: BaudrateEx) -> &mut Self {
        self.baudrate_ex = baudrate_ex as u32;
        self
    }

    pub fn set_ocr(&mut self, ocr: OutputControl) -> &mut Self {
        self.ocr = ocr as u8;
        self
    }

    pub fn set_acceptance(&mut self, amr: u32, acr: u32) -> &mut Self {
        self.amr = amr;
        self.acr = acr;
        self
    }

    /// Sets the acceptance filter to a range of CAN identifiers.
    pub fn set_acceptance_range(
        &mut self,
        from_id: u32,
        to_id: u32,
        extended: bool,
        rtr_only: bool,
        rtr_too: bool,
    ) -> &mut Self {
        self.amr = calculate_amr(extended, from_id, to_id, rtr_only, rtr_too);
        self.acr = calculate_acr(extended, from_id, to_id, rtr_only, rtr_too);
        self
    }

    pub fn set_rx_buffer_entries(&mut self, entries: u16) -> &mut Self {
        self.rx_buffer_entries = entries;
        self
    }

    pub fn set_tx_buffer_entries(&mut self, entries: u16) -> &mut Self {
        self.tx_buffer_entries = entries;
        self
    }

    /// Checks that the raw values are known register values.
    pub fn validate(&self) -> Result<(), UcanError> {
        Mode::from_bits(self.mode)
            .ok_or_else(|| UcanError::parameter_not_supported(format!("mode {:#04X}", self.mode)))?;
        Baudrate::try_from(self.baudrate)?;
        BaudrateEx::try_from(self.baudrate_ex)?;
        OutputControl::try_from(self.ocr)?;
        Ok(())
    }
}

/// The channel configurations read from `channel.cfg.yaml`, keyed by channel number.
#[derive(Debug, Default)]
pub struct ChannelCfgContext(HashMap<u8, CanChannelConfig>);

impl ChannelCfgContext {
    pub fn new() -> Result<Self, UcanError> {
        let cfg_path = match dotenvy::from_filename(SYSTEC_ENV) {
            Ok(_) => match std::env::var(SYSTEC_VAR) {
                Ok(v) => format!("{}/{}", v, CHANNEL_CFG_FILENAME),
                Err(_) => CHANNEL_CFG_FILENAME.into(),
            },
            Err(_) => CHANNEL_CFG_FILENAME.into(),
        };
        let data = read_to_string(&cfg_path)
            .map_err(|e| UcanError::config_error(format!("Unable to read `{}`: {:?}", cfg_path, e)))?;

        Self::from_yaml(&data)
    }

    pub fn from_yaml(data: &str) -> Result<Self, UcanError> {
        let result: HashMap<u8, CanChannelConfig> = serde_yaml::from_str(data)
            .map_err(|e| UcanError::config_error(format!("Error parsing YAML: {:?}", e)))?;
        for cfg in result.values() {
            cfg.validate()?;
        }

        Ok(Self(result))
    }

    #[inline]
    pub fn get(&self, channel: u8) -> Option<&CanChannelConfig> {
        self.0.get(&channel)
    }
}
