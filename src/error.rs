use std::io;
use std::net::SocketAddrV4;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum WakeError {
    /// MAC address is not 12 hexadecimal digits
    #[error("invalid MAC address '{input}': {reason}")]
    InvalidMac { input: String, reason: &'static str },

    /// IP address is not a dotted-quad IPv4 address
    #[error("invalid IP address '{input}': {reason}")]
    InvalidIp { input: String, reason: &'static str },

    /// Port is not a number in 1..=65535
    #[error("invalid port '{input}': {reason}")]
    InvalidPort { input: String, reason: &'static str },

    /// The datagram could not be handed to the network stack
    #[error("unable to send packet to {endpoint}: {source}")]
    SendFailed {
        endpoint: SocketAddrV4,
        #[source]
        source: io::Error,
    },
}

impl WakeError {
    /// True for errors caused by bad user input, detected before any network action.
    pub fn is_validation(&self) -> bool {
        !matches!(self, WakeError::SendFailed { .. })
    }

    /// Process exit code for this error: 2 for bad input, 1 for transport failures.
    pub fn exit_code(&self) -> u8 {
        if self.is_validation() {
            2
        } else {
            1
        }
    }
}

#[test]
fn test_exit_codes() {
    let err = WakeError::InvalidPort {
        input: "70000".into(),
        reason: "out of range",
    };
    assert!(err.is_validation());
    assert_eq!(err.exit_code(), 2);

    let err = WakeError::SendFailed {
        endpoint: "192.168.1.100:9".parse().unwrap(),
        source: io::Error::new(io::ErrorKind::TimedOut, "timed out"),
    };
    assert!(!err.is_validation());
    assert_eq!(err.exit_code(), 1);
}

#[test]
fn test_display_carries_input() {
    let err = WakeError::InvalidMac {
        input: "AABBCCDDEEF".into(),
        reason: "expected 12 hexadecimal digits",
    };
    assert_eq!(
        err.to_string(),
        "invalid MAC address 'AABBCCDDEEF': expected 12 hexadecimal digits"
    );
}
