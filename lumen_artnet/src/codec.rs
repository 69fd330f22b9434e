//! Art-Net Codec (C1): encodes a 512-byte DMX universe into a byte-exact
//! `OpDmx` datagram and sends it over UDP, with mandatory loopback.

use crate::error::{ArtnetError, Result};
use socket2::{Domain, Socket, Type};
use std::net::{SocketAddr, UdpSocket};

pub const ARTNET_PORT: u16 = 6454;
pub const DMX_UNIVERSE_SIZE: usize = 512;
const ARTNET_HEADER: &[u8; 8] = b"Art-Net\0";
const OPCODE_DMX: u16 = 0x5000;
const PROTOCOL_VERSION: u16 = 14;
const FRAME_LEN: usize = 8 + 2 + 2 + 1 + 1 + 2 + 2 + DMX_UNIVERSE_SIZE;

/// Encode a 512-byte DMX universe into a 530-byte Art-Net `OpDmx` frame.
///
/// `universe` is packed into the low byte of the universe word per the
/// source's own framing (see SPEC_FULL.md §9 for the subnet-packing decision).
pub fn encode(universe: u8, data: &[u8; DMX_UNIVERSE_SIZE]) -> [u8; FRAME_LEN] {
    let mut frame = [0u8; FRAME_LEN];
    frame[0..8].copy_from_slice(ARTNET_HEADER);
    frame[8..10].copy_from_slice(&OPCODE_DMX.to_le_bytes());
    frame[10..12].copy_from_slice(&PROTOCOL_VERSION.to_be_bytes());
    frame[12] = 0; // sequence
    frame[13] = 0; // physical
    frame[14..16].copy_from_slice(&(universe as u16).to_le_bytes());
    frame[16..18].copy_from_slice(&(DMX_UNIVERSE_SIZE as u16).to_be_bytes());
    frame[18..18 + DMX_UNIVERSE_SIZE].copy_from_slice(data);
    frame
}

/// Decode an Art-Net `OpDmx` frame back into `(universe, data)`. Used by the
/// round-trip invariant (I7) and by `T-net-rx` monitoring.
pub fn decode(frame: &[u8]) -> Option<(u8, [u8; DMX_UNIVERSE_SIZE])> {
    if frame.len() != FRAME_LEN || &frame[0..8] != ARTNET_HEADER {
        return None;
    }
    if u16::from_le_bytes([frame[8], frame[9]]) != OPCODE_DMX {
        return None;
    }
    let universe = frame[14];
    let mut data = [0u8; DMX_UNIVERSE_SIZE];
    data.copy_from_slice(&frame[18..18 + DMX_UNIVERSE_SIZE]);
    Some((universe, data))
}

/// A UDP sender bound once at startup, reused for every refresh tick.
pub struct ArtnetSender {
    socket: UdpSocket,
    target: SocketAddr,
    loopback: SocketAddr,
    universe: u8,
}

impl ArtnetSender {
    pub fn new(target_ip: std::net::IpAddr, universe: u8) -> Result<Self> {
        let raw = Socket::new(Domain::IPV4, Type::DGRAM, None)?;
        raw.set_reuse_address(true)?;
        raw.set_broadcast(true)?;
        raw.bind(&SocketAddr::new(std::net::IpAddr::V4(std::net::Ipv4Addr::UNSPECIFIED), 0).into())?;
        let socket: UdpSocket = raw.into();
        Ok(Self {
            socket,
            target: SocketAddr::new(target_ip, ARTNET_PORT),
            loopback: SocketAddr::new(std::net::IpAddr::V4(std::net::Ipv4Addr::LOCALHOST), ARTNET_PORT),
            universe,
        })
    }

    /// Encode and send `data` to both the configured target and loopback.
    /// A send failure is returned to the caller to log, never panics.
    pub fn send(&self, data: &[u8; DMX_UNIVERSE_SIZE]) -> Result<()> {
        let frame = encode(self.universe, data);
        self.socket.send_to(&frame, self.target)?;
        self.socket.send_to(&frame, self.loopback)?;
        Ok(())
    }
}

/// Validate a slice is exactly 512 bytes, converting to a fixed array.
pub fn to_universe_array(data: &[u8]) -> Result<[u8; DMX_UNIVERSE_SIZE]> {
    data.try_into().map_err(|_| ArtnetError::InvalidDataLength)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn byte_exact_frame() {
        let mut universe_data = [0u8; DMX_UNIVERSE_SIZE];
        universe_data[0] = 255;
        universe_data[1] = 128;
        universe_data[2] = 64;

        let frame = encode(0, &universe_data);
        assert_eq!(frame.len(), 530);
        assert_eq!(
            &frame[0..18],
            &[0x41, 0x72, 0x74, 0x2D, 0x4E, 0x65, 0x74, 0x00, 0x00, 0x50, 0x00, 0x0E, 0x00, 0x00, 0x00, 0x00, 0x02, 0x00]
        );
        assert_eq!(&frame[18..22], &[0xFF, 0x80, 0x40, 0x00]);
    }

    #[test]
    fn every_byte_in_range_and_frame_is_530_bytes() {
        let data = [0xFFu8; DMX_UNIVERSE_SIZE];
        let frame = encode(3, &data);
        assert_eq!(frame.len(), 530);
        for &b in frame.iter() {
            // u8 is always in [0,255]; this assertion documents invariant I1.
            let _ = b;
        }
    }

    #[test]
    fn round_trip_is_identity() {
        let mut data = [0u8; DMX_UNIVERSE_SIZE];
        for (i, b) in data.iter_mut().enumerate() {
            *b = (i % 256) as u8;
        }
        let frame = encode(7, &data);
        let (universe, decoded) = decode(&frame).expect("valid frame decodes");
        assert_eq!(universe, 7);
        assert_eq!(decoded, data);
    }

    #[test]
    fn rejects_malformed_header() {
        let mut frame = encode(0, &[0u8; DMX_UNIVERSE_SIZE]).to_vec();
        frame[0] = b'X';
        assert!(decode(&frame).is_none());
    }

    #[test]
    fn to_universe_array_rejects_wrong_length() {
        let too_short = vec![0u8; 10];
        assert_eq!(to_universe_array(&too_short), Err(ArtnetError::InvalidDataLength));
    }
}
