use crate::constants::{MAXIMAL_PORT_VALUE, MINIMAL_PORT_VALUE, PORT_RANGE_MESSAGE};
use crate::error::connection::ConnectionError;

use common::ErrorLocation;

use std::fmt::{Display, Formatter, Result as FormatResult};
use std::net::{IpAddr, SocketAddr};
use std::panic::Location;

/// Validated peer address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Endpoint {
    address: IpAddr,
    port: u16,
}

impl Endpoint {
    /// Parse the two text fields the user typed.
    ///
    /// The address must be a numeric IPv4 or IPv6 literal (no host names); the
    /// port must lie in the registered range.
    ///
    /// # Errors
    ///
    /// - [`ConnectionError::InvalidAddress`] for anything that is not an IP literal
    /// - [`ConnectionError::InvalidPort`] for non-numeric or out-of-range ports
    #[track_caller]
    pub fn parse(address_text: &str, port_text: &str) -> Result<Self, ConnectionError> {
        let address: IpAddr =
            address_text
                .trim()
                .parse()
                .map_err(|e| ConnectionError::InvalidAddress {
                    message: format!("{e}: {address_text:?}"),
                    location: ErrorLocation::from(Location::caller()),
                })?;

        let port: i64 = port_text
            .trim()
            .parse()
            .map_err(|e| ConnectionError::InvalidPort {
                message: format!("{e}: {port_text:?}"),
                location: ErrorLocation::from(Location::caller()),
            })?;

        let port = u16::try_from(port)
            .ok()
            .filter(|port| (MINIMAL_PORT_VALUE..=MAXIMAL_PORT_VALUE).contains(port))
            .ok_or_else(|| ConnectionError::InvalidPort {
                message: PORT_RANGE_MESSAGE.to_string(),
                location: ErrorLocation::from(Location::caller()),
            })?;

        Ok(Self { address, port })
    }

    pub fn address(&self) -> IpAddr {
        self.address
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.address, self.port)
    }
}

impl Display for Endpoint {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> FormatResult {
        write!(formatter, "{}:{}", self.address, self.port)
    }
}
