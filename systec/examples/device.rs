use std::sync::Arc;
use std::time::Duration;
use systec_rs::can::{CanMsg, Channel, ChannelCfgContext, CanChannelConfig, FrameFormat};
use systec_rs::driver::{UcanListener, UcanServer};

struct Listener;

impl UcanListener for Listener {
    fn can_msg_received_event(&self, channel: u8) {
        println!("CAN message received on channel: {}", channel);
    }

    fn status_event(&self, channel: u8) {
        println!("status changed on channel: {}", channel);
    }

    fn fatal_disconnect_event(&self, device_number: u32) {
        println!("module {} disconnected", device_number);
    }
}

fn main() -> anyhow::Result<()> {
    let cfg = match ChannelCfgContext::new() {
        Ok(ctx) => ctx.get(Channel::CH0 as u8).cloned().unwrap_or_default(),
        Err(_) => CanChannelConfig::default(),
    };

    let mut server = UcanServer::new(Arc::new(Listener))?;
    server.init_hardware(None, None)?;
    server.init_can(Channel::CH0, &cfg)?;

    let msg = CanMsg::new(0x7DF, FrameFormat::STD, &[0x02, 0x10, 0x01, 0x00, 0x00, 0x00, 0x00, 0x00])?;
    server.write_can_msg(Channel::CH0, &[msg, ])?;

    std::thread::sleep(Duration::from_millis(200));
    let (msgs, _) = server.read_can_msg(Channel::ANY, 10)?;
    msgs.into_iter()
        .for_each(|m| println!("{}", m));

    server.shutdown(Channel::ALL, true)?;

    Ok(())
}
