use std::net::SocketAddrV4;

use colored::Colorize;

use crate::wol::MacAddress;

/// Renders a MAC address as six uppercase hex pairs joined by colons.
pub fn format_mac(mac: &MacAddress) -> String {
    mac.to_string()
}

/// What was sent where, returned by [`crate::wol::wake`] on success.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    mac: MacAddress,
    endpoint: SocketAddrV4,
}

impl Report {
    pub fn new(mac: MacAddress, endpoint: SocketAddrV4) -> Self {
        Self { mac, endpoint }
    }

    pub fn mac(&self) -> MacAddress {
        self.mac
    }

    pub fn endpoint(&self) -> SocketAddrV4 {
        self.endpoint
    }

    pub fn render(&self, color: bool) -> String {
        let mac = format_mac(&self.mac);
        let endpoint = self.endpoint.to_string();
        if color {
            format!(
                "Magic packet sent to {} via {}",
                mac.green().bold(),
                endpoint.cyan()
            )
        } else {
            format!("Magic packet sent to {} via {}", mac, endpoint)
        }
    }
}

#[test]
fn test_format_mac() {
    let mac = MacAddress::new([0xAA, 0xBB, 0xCC, 0xDD, 0xEE, 0xFF]);
    assert_eq!(format_mac(&mac), "AA:BB:CC:DD:EE:FF");
}

#[test]
fn test_render_plain() {
    let report = Report::new(
        MacAddress::new([0xAA, 0xBB, 0xCC, 0xDD, 0xEE, 0xFF]),
        "192.168.1.100:9".parse().unwrap(),
    );
    let text = report.render(false);
    assert_eq!(text, "Magic packet sent to AA:BB:CC:DD:EE:FF via 192.168.1.100:9");
    assert!(!text.contains('\x1b'));
}

#[test]
fn test_render_color_keeps_text() {
    let report = Report::new(
        MacAddress::new([0xAA, 0xBB, 0xCC, 0xDD, 0xEE, 0xFF]),
        "192.168.1.100:9".parse().unwrap(),
    );
    let text = report.render(true);
    assert!(text.contains("AA:BB:CC:DD:EE:FF"));
    assert!(text.contains("192.168.1.100:9"));
}
