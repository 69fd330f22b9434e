//! `T-net-rx` (optional): a read-only monitor that listens on the Art-Net
//! port and logs decoded frames. Never written to by the engine itself.

use socket2::{Domain, Socket, Type};
use std::net::{SocketAddr, UdpSocket};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

fn bind_monitor_socket() -> std::io::Result<UdpSocket> {
    let raw = Socket::new(Domain::IPV4, Type::DGRAM, None)?;
    raw.set_reuse_address(true)?;
    raw.bind(&SocketAddr::new(std::net::IpAddr::V4(std::net::Ipv4Addr::UNSPECIFIED), lumen_artnet::codec::ARTNET_PORT).into())?;
    Ok(raw.into())
}

pub fn run(running: Arc<AtomicBool>) {
    let socket = match bind_monitor_socket() {
        Ok(socket) => socket,
        Err(err) => {
            log::warn!("T-net-rx disabled: failed to bind monitor socket: {err}");
            return;
        }
    };
    if let Err(err) = socket.set_read_timeout(Some(Duration::from_millis(200))) {
        log::warn!("T-net-rx: failed to set read timeout: {err}");
    }

    let mut buf = [0u8; 600];
    while running.load(Ordering::Relaxed) {
        match socket.recv_from(&mut buf) {
            Ok((len, from)) => match lumen_artnet::codec::decode(&buf[..len]) {
                Some((universe, _)) => log::debug!("T-net-rx: universe {universe} frame from {from}"),
                None => log::trace!("T-net-rx: ignored non-Art-Net datagram from {from}"),
            },
            Err(err) if err.kind() == std::io::ErrorKind::WouldBlock || err.kind() == std::io::ErrorKind::TimedOut => continue,
            Err(err) => log::warn!("T-net-rx: recv failed: {err}"),
        }
    }
}
