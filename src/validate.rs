//! Checks user-supplied MAC, IPv4 and port strings before any packet is built.
use std::net::Ipv4Addr;

use crate::error::WakeError;
use crate::wol::MacAddress;

const MAC_HEX_DIGITS: usize = 12;

fn invalid_mac(input: &str, reason: &'static str) -> WakeError {
    WakeError::InvalidMac {
        input: input.to_owned(),
        reason,
    }
}

fn invalid_ip(input: &str, reason: &'static str) -> WakeError {
    WakeError::InvalidIp {
        input: input.to_owned(),
        reason,
    }
}

fn invalid_port(input: &str, reason: &'static str) -> WakeError {
    WakeError::InvalidPort {
        input: input.to_owned(),
        reason,
    }
}

/// Parses a MAC address written as exactly 12 hexadecimal digits without separators,
/// e.g. `AABBCCDDEEFF`. Upper and lower case digits are accepted.
pub fn parse_mac(raw: &str) -> Result<MacAddress, WakeError> {
    if raw.len() != MAC_HEX_DIGITS {
        return Err(invalid_mac(raw, "expected 12 hexadecimal digits"));
    }
    if !raw.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(invalid_mac(raw, "contains a non-hexadecimal character"));
    }

    let mut bytes = [0u8; 6];
    for (byte, pair) in bytes.iter_mut().zip(raw.as_bytes().chunks(2)) {
        let mut value = 0u8;
        for &c in pair {
            // checked above, every character is a hex digit
            let nibble = (c as char)
                .to_digit(16)
                .ok_or_else(|| invalid_mac(raw, "contains a non-hexadecimal character"))?;
            value = value << 4 | nibble as u8;
        }
        *byte = value;
    }

    Ok(MacAddress::new(bytes))
}

/// Parses a dotted-quad IPv4 address. Every group must be a plain decimal number in
/// `0..=255` without sign, whitespace or leading zeros.
pub fn parse_ipv4(raw: &str) -> Result<Ipv4Addr, WakeError> {
    let groups: Vec<&str> = raw.split('.').collect();
    if groups.len() != 4 {
        return Err(invalid_ip(raw, "expected four dot-separated numbers"));
    }

    let mut octets = [0u8; 4];
    for (octet, group) in octets.iter_mut().zip(groups) {
        if group.is_empty() {
            return Err(invalid_ip(raw, "empty group"));
        }
        if !group.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid_ip(raw, "groups must contain only digits"));
        }
        if group.len() > 1 && group.starts_with('0') {
            return Err(invalid_ip(raw, "leading zeros are not allowed"));
        }
        *octet = match group.parse::<u8>() {
            Ok(value) => value,
            Err(_) => return Err(invalid_ip(raw, "each group must be between 0 and 255")),
        };
    }

    Ok(Ipv4Addr::from(octets))
}

/// Parses a UDP port in `1..=65535`.
pub fn parse_port(raw: &str) -> Result<u16, WakeError> {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid_port(raw, "expected a decimal number"));
    }

    match raw.parse::<u16>() {
        Ok(0) | Err(_) => Err(invalid_port(raw, "must be between 1 and 65535")),
        Ok(port) => Ok(port),
    }
}

#[test]
fn test_mac_case_insensitive() {
    let upper = parse_mac("AABBCCDDEEFF").unwrap();
    let lower = parse_mac("aabbccddeeff").unwrap();
    let mixed = parse_mac("aAbBcCdDeEfF").unwrap();
    assert_eq!(upper, lower);
    assert_eq!(upper, mixed);
    assert_eq!(upper.octets(), [0xAA, 0xBB, 0xCC, 0xDD, 0xEE, 0xFF]);
}

#[test]
fn test_mac_digits() {
    let mac = parse_mac("0123456789ab").unwrap();
    assert_eq!(mac.octets(), [0x01, 0x23, 0x45, 0x67, 0x89, 0xAB]);
}

#[test]
fn test_mac_wrong_length() {
    for raw in ["", "AABBCCDDEEF", "AABBCCDDEEFF0", "AA"] {
        assert!(matches!(parse_mac(raw), Err(WakeError::InvalidMac { .. })), "{raw}");
    }
}

#[test]
fn test_mac_separators_rejected() {
    assert!(matches!(
        parse_mac("AA:BB:CC:DD:EE:FF"),
        Err(WakeError::InvalidMac { .. })
    ));
    assert!(matches!(
        parse_mac("AA-BB-CC-DD-EE"),
        Err(WakeError::InvalidMac { .. })
    ));
}

#[test]
fn test_mac_non_hex() {
    assert!(matches!(parse_mac("AABBCCDDEEFG"), Err(WakeError::InvalidMac { .. })));
    assert!(matches!(parse_mac("+ABBCCDDEEFF"), Err(WakeError::InvalidMac { .. })));
    // 12 bytes, but not 12 characters
    assert!(matches!(parse_mac("éééééé"), Err(WakeError::InvalidMac { .. })));
}

#[test]
fn test_ipv4_valid() {
    assert_eq!(
        parse_ipv4("192.168.1.100").unwrap(),
        Ipv4Addr::new(192, 168, 1, 100)
    );
    assert_eq!(parse_ipv4("0.0.0.0").unwrap(), Ipv4Addr::UNSPECIFIED);
    assert_eq!(parse_ipv4("255.255.255.255").unwrap(), Ipv4Addr::BROADCAST);
}

#[test]
fn test_ipv4_out_of_range() {
    for raw in ["192.168.1.999", "256.0.0.1", "1.2.3.1000"] {
        assert!(matches!(parse_ipv4(raw), Err(WakeError::InvalidIp { .. })), "{raw}");
    }
}

#[test]
fn test_ipv4_malformed() {
    for raw in [
        "",
        "192.168.1",
        "192.168.1.1.1",
        "192.168..1",
        "192.168.1.",
        "192.168.01.1",
        "192.168.+1.1",
        "192.168.-1.1",
        "192.168.1.a",
        " 192.168.1.1",
        "localhost",
    ] {
        assert!(matches!(parse_ipv4(raw), Err(WakeError::InvalidIp { .. })), "{raw}");
    }
}

#[test]
fn test_port_valid() {
    assert_eq!(parse_port("9").unwrap(), 9);
    assert_eq!(parse_port("1").unwrap(), 1);
    assert_eq!(parse_port("65535").unwrap(), 65535);
}

#[test]
fn test_port_invalid() {
    for raw in ["", "0", "70000", "65536", "99999999999999999999999", "-9", "+9", "9a", " 9"] {
        assert!(matches!(parse_port(raw), Err(WakeError::InvalidPort { .. })), "{raw}");
    }
}
