use crate::connection::Endpoint;
use crate::constants::PORT_RANGE_MESSAGE;
use crate::error::connection::ConnectionError;

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

#[test]
fn given_ipv4_and_port_in_range_when_parsed_then_endpoint_is_built() {
    // GIVEN / WHEN
    let endpoint = Endpoint::parse("127.0.0.1", "8080").expect("Should parse");

    // THEN
    assert_eq!(endpoint.address(), IpAddr::V4(Ipv4Addr::LOCALHOST));
    assert_eq!(endpoint.port(), 8080);
    assert_eq!(endpoint.to_string(), "127.0.0.1:8080");
}

#[test]
fn given_ipv6_with_whitespace_when_parsed_then_endpoint_is_built() {
    let endpoint = Endpoint::parse(" ::1 ", " 49151 ").expect("Should parse");

    assert_eq!(endpoint.address(), IpAddr::V6(Ipv6Addr::LOCALHOST));
    assert_eq!(endpoint.port(), 49151);
}

#[test]
fn given_range_bounds_when_parsed_then_both_are_accepted() {
    assert!(Endpoint::parse("10.0.0.1", "1024").is_ok());
    assert!(Endpoint::parse("10.0.0.1", "49151").is_ok());
}

/// **VALUE**: Verifies ports outside [1024; 49151] are rejected with the fixed message.
///
/// **WHY THIS MATTERS**: The user sees this text verbatim. Ports above 65535 must also
/// land here rather than in a parse error.
#[test]
fn given_port_out_of_range_when_parsed_then_fails_with_range_message() {
    for port in ["99999", "1023", "49152", "0", "-5", "65536", "4294967297"] {
        // WHEN
        let err = Endpoint::parse("127.0.0.1", port).unwrap_err();

        // THEN
        match err {
            ConnectionError::InvalidPort { message, .. } => {
                assert_eq!(message, PORT_RANGE_MESSAGE, "port {port}")
            }
            other => panic!("Expected InvalidPort for {port}, got {other:?}"),
        }
    }
}

#[test]
fn given_non_numeric_port_when_parsed_then_fails_with_invalid_port() {
    let err = Endpoint::parse("127.0.0.1", "eighty").unwrap_err();

    assert!(matches!(err, ConnectionError::InvalidPort { .. }));
    assert!(err.ui_line(false).starts_with("Port: "));
}

#[test]
fn given_hostname_when_parsed_then_fails_with_invalid_address() {
    let err = Endpoint::parse("localhost", "8080").unwrap_err();

    assert!(matches!(err, ConnectionError::InvalidAddress { .. }));
    assert!(err.is_validation());
    assert!(err.ui_line(false).starts_with("IP Address: "));
}
