use std::sync::Arc;
use std::time::Duration;
use systec_rs::api::load_library;
use systec_rs::can::{Baudrate, BaudrateEx, CanChannelConfig, CanMsg, Channel, FrameFormat, ResetFlags};
use systec_rs::device::HardwareFilter;
use systec_rs::driver::{DefaultListener, UcanServer};

fn init_server() -> anyhow::Result<UcanServer> {
    let mut server = UcanServer::new(Arc::new(DefaultListener))?;
    server.init_hardware(None, None)?;
    let cfg = CanChannelConfig::new(Baudrate::BAUD_500kBit, BaudrateEx::BAUDEX_USE_BTR01);
    server.init_can(Channel::CH0, &cfg)?;

    Ok(server)
}

#[test]
#[ignore]   // device required
fn test_transmit() -> anyhow::Result<()> {
    let server = init_server()?;

    let msg = CanMsg::new(0x7DF, FrameFormat::STD, &[0x02, 0x10, 0x01])?;
    let count = server.write_can_msg(Channel::CH0, &[msg, ])?;
    assert_eq!(count, 1);

    std::thread::sleep(Duration::from_millis(100));
    let (msgs, channel) = server.read_can_msg(Channel::ANY, 10)?;
    msgs.into_iter()
        .for_each(|m| println!("{}: {}", channel, m));

    Ok(())
}

#[test]
#[ignore]   // device required
fn test_hardware_info() -> anyhow::Result<()> {
    let mut server = init_server()?;

    let info = server.get_hardware_info()?;
    println!("serial: {:08X}, firmware: {}, product: {:#06X}",
             info.info.serial_nr(), info.info.fw_version(), info.info.product_code());
    println!("status: {}", server.get_status(Channel::CH0)?.can_status().message());

    server.reset_can(Channel::CH0, ResetFlags::ONLY_RX_BUFF)?;
    server.shutdown(Channel::ALL, true)?;
    assert!(!server.is_initialized());

    Ok(())
}

#[test]
#[ignore]   // device required
fn test_enumerate() -> anyhow::Result<()> {
    let api = load_library()?;
    println!("library version: {}", UcanServer::user_dll_version(api.as_ref()));

    let modules = UcanServer::enumerate_hardware(api.as_ref(), &HardwareFilter::default());
    modules.iter()
        .for_each(|m| println!("{}: serial {:08X}, used: {}", m.index, m.info.serial_nr(), m.is_used));

    Ok(())
}
