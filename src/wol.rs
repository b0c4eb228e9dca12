//! Builds a WakeOnLAN packet (so called "Magic Packet Technology") for an IEEE EUI-48 MAC
//! address and sends it to a single IPv4 endpoint as one UDP datagram.
use std::fmt;
use std::net::{Ipv4Addr, SocketAddrV4, UdpSocket};
use std::time::Duration;

use crate::error::WakeError;
use crate::report::Report;
use crate::validate;

/// Six bytes of `0xFF` that open every magic packet.
pub const SYNC_STREAM: [u8; 6] = [0xFF; 6];
pub const MAC_REPETITIONS: usize = 16;
pub const MAGIC_PACKET_LEN: usize = SYNC_STREAM.len() + MAC_REPETITIONS * 6;

pub const DEFAULT_PORT: u16 = 9;
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MacAddress([u8; 6]);

impl MacAddress {
    pub fn new(octets: [u8; 6]) -> Self {
        Self(octets)
    }

    pub fn octets(&self) -> [u8; 6] {
        self.0
    }
}

impl fmt::Display for MacAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d, e, g] = self.octets();
        write!(
            f,
            "{:02X}:{:02X}:{:02X}:{:02X}:{:02X}:{:02X}",
            a, b, c, d, e, g
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MagicPacket([u8; MAGIC_PACKET_LEN]);

impl MagicPacket {
    /// Creates the magic packet for `mac`: the sync stream followed by 16 copies of the MAC.
    pub fn new(mac: MacAddress) -> Self {
        let mut packet = [0xFFu8; MAGIC_PACKET_LEN];

        // the first 6 bytes stay as 0xFF
        for chunk in packet[SYNC_STREAM.len()..].chunks_exact_mut(6) {
            chunk.copy_from_slice(&mac.0);
        }

        log::trace!("built magic packet for {}", mac);
        MagicPacket(packet)
    }

    pub fn as_bytes(&self) -> &[u8; MAGIC_PACKET_LEN] {
        &self.0
    }

    /// The MAC address this packet wakes.
    pub fn mac(&self) -> MacAddress {
        let mut octets = [0u8; 6];
        octets.copy_from_slice(&self.0[6..12]);
        MacAddress(octets)
    }
}

/// Sends `packet` as a single UDP datagram to `endpoint`. The socket is bound to an
/// ephemeral port and dropped when this returns, on success or failure.
///
/// Success only means the datagram was handed to the network stack, WakeOnLAN has no
/// acknowledgment. A zero `timeout` falls back to [`DEFAULT_TIMEOUT`].
pub fn send_packet(
    packet: &MagicPacket,
    endpoint: SocketAddrV4,
    timeout: Duration,
) -> Result<(), WakeError> {
    let timeout = if timeout.is_zero() {
        DEFAULT_TIMEOUT
    } else {
        timeout
    };
    let send_failed = |source| WakeError::SendFailed { endpoint, source };

    let socket = UdpSocket::bind((Ipv4Addr::UNSPECIFIED, 0)).map_err(send_failed)?;
    socket.set_write_timeout(Some(timeout)).map_err(send_failed)?;
    // directed broadcast addresses are refused without SO_BROADCAST
    socket.set_broadcast(true).map_err(send_failed)?;
    socket.connect(endpoint).map_err(send_failed)?;

    log::debug!(
        "sending {} bytes from {:?} to {}",
        MAGIC_PACKET_LEN,
        socket.local_addr().ok(),
        endpoint
    );
    let sent = socket.send(packet.as_bytes()).map_err(send_failed)?;
    if sent != MAGIC_PACKET_LEN {
        return Err(send_failed(std::io::Error::new(
            std::io::ErrorKind::WriteZero,
            format!("only {} of {} bytes sent", sent, MAGIC_PACKET_LEN),
        )));
    }

    Ok(())
}

/// Validates the raw MAC, IP and port (in that order), then builds and sends one magic
/// packet. Nothing is sent if any input is rejected.
pub fn wake(mac: &str, ip: &str, port: &str, timeout: Duration) -> Result<Report, WakeError> {
    let mac = validate::parse_mac(mac)?;
    let ip = validate::parse_ipv4(ip)?;
    let port = validate::parse_port(port)?;
    let endpoint = SocketAddrV4::new(ip, port);

    let packet = MagicPacket::new(mac);
    log::debug!("waking {} via {}", packet.mac(), endpoint);
    send_packet(&packet, endpoint, timeout)?;

    Ok(Report::new(mac, endpoint))
}

#[cfg(test)]
fn loopback_receiver() -> (UdpSocket, String) {
    let receiver = UdpSocket::bind((Ipv4Addr::LOCALHOST, 0)).unwrap();
    receiver
        .set_read_timeout(Some(Duration::from_secs(2)))
        .unwrap();
    let port = receiver.local_addr().unwrap().port().to_string();
    (receiver, port)
}

#[test]
fn test_magic_len() {
    assert_eq!(MAGIC_PACKET_LEN, 102);
    let pkt = MagicPacket::new(MacAddress::new([0; 6]));
    assert_eq!(pkt.as_bytes().len(), 102);
}

#[test]
fn test_magic() {
    let mac = MacAddress::new([0xAA, 0xBB, 0xCC, 0xDD, 0xEE, 0xFF]);
    let pkt = MagicPacket::new(mac);

    // starts with the sync stream
    assert_eq!(&pkt.0[..6], &SYNC_STREAM);

    // follows with 16 copies of the mac, the last one ending the packet
    for i in 1..17 {
        assert_eq!(&pkt.0[i * 6..i * 6 + 6], &[0xAA, 0xBB, 0xCC, 0xDD, 0xEE, 0xFF]);
    }
    assert_eq!(pkt.mac(), mac);
}

#[test]
fn test_magic_mac_of_ff() {
    // an all-ones MAC makes the whole packet 0xFF
    let pkt = MagicPacket::new(MacAddress::new([0xFF; 6]));
    assert!(pkt.as_bytes().iter().all(|&b| b == 0xFF));
}

#[test]
fn test_mac_display() {
    let mac = validate::parse_mac("aabbccddeeff").unwrap();
    assert_eq!(mac.to_string(), "AA:BB:CC:DD:EE:FF");

    let mac = MacAddress::new([0x00, 0x01, 0x0a, 0x10, 0xa0, 0xff]);
    assert_eq!(mac.to_string(), "00:01:0A:10:A0:FF");
}

#[test]
fn test_packet_for_validated_input() {
    let mac = validate::parse_mac("AABBCCDDEEFF").unwrap();
    let ip = validate::parse_ipv4("192.168.1.100").unwrap();
    let port = validate::parse_port("9").unwrap();
    assert_eq!(SocketAddrV4::new(ip, port).to_string(), "192.168.1.100:9");

    let mut expected = vec![0xFF; 6];
    for _ in 0..MAC_REPETITIONS {
        expected.extend_from_slice(&[0xAA, 0xBB, 0xCC, 0xDD, 0xEE, 0xFF]);
    }
    assert_eq!(&MagicPacket::new(mac).as_bytes()[..], &expected[..]);
}

#[test]
fn test_send_packet_loopback() {
    let (receiver, _) = loopback_receiver();
    let endpoint = match receiver.local_addr().unwrap() {
        std::net::SocketAddr::V4(addr) => addr,
        addr => panic!("unexpected address {}", addr),
    };

    let pkt = MagicPacket::new(MacAddress::new([1, 2, 3, 4, 5, 6]));
    send_packet(&pkt, endpoint, Duration::ZERO).unwrap();

    let mut buf = [0u8; 256];
    let (len, _) = receiver.recv_from(&mut buf).unwrap();
    assert_eq!(&buf[..len], pkt.as_bytes());
}

#[test]
fn test_wake_end_to_end() {
    let (receiver, port) = loopback_receiver();

    let report = wake("AABBCCDDEEFF", "127.0.0.1", &port, DEFAULT_TIMEOUT).unwrap();
    assert_eq!(report.mac().to_string(), "AA:BB:CC:DD:EE:FF");
    assert_eq!(report.endpoint().ip(), &Ipv4Addr::LOCALHOST);
    assert_eq!(report.endpoint().port().to_string(), port);

    let mut buf = [0u8; 256];
    let (len, _) = receiver.recv_from(&mut buf).unwrap();
    assert_eq!(len, 102);
    assert_eq!(&buf[..6], &[0xFF; 6]);
    for chunk in buf[6..102].chunks(6) {
        assert_eq!(chunk, &[0xAA, 0xBB, 0xCC, 0xDD, 0xEE, 0xFF]);
    }
}

#[test]
fn test_wake_rejects_before_sending() {
    let (receiver, port) = loopback_receiver();
    receiver
        .set_read_timeout(Some(Duration::from_millis(200)))
        .unwrap();

    assert!(matches!(
        wake("AABBCCDDEEF", "127.0.0.1", &port, DEFAULT_TIMEOUT),
        Err(WakeError::InvalidMac { .. })
    ));
    assert!(matches!(
        wake("AABBCCDDEEFF", "192.168.1.999", "9", DEFAULT_TIMEOUT),
        Err(WakeError::InvalidIp { .. })
    ));
    assert!(matches!(
        wake("AABBCCDDEEFF", "127.0.0.1", "70000", DEFAULT_TIMEOUT),
        Err(WakeError::InvalidPort { .. })
    ));

    // nothing reached the receiver
    let mut buf = [0u8; 256];
    assert!(receiver.recv_from(&mut buf).is_err());
}

#[test]
fn test_wake_reports_mac_first() {
    // every input is bad, the MAC is checked first
    assert!(matches!(
        wake("nope", "nope", "nope", DEFAULT_TIMEOUT),
        Err(WakeError::InvalidMac { .. })
    ));
    assert!(matches!(
        wake("AABBCCDDEEFF", "nope", "nope", DEFAULT_TIMEOUT),
        Err(WakeError::InvalidIp { .. })
    ));
}
