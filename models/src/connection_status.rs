use std::fmt::{Display, Formatter, Result as FormatResult};

use serde::{Deserialize, Serialize};

/// Connection indicator shown by the UI.
///
/// These are display states, not the lifecycle itself: a failed attempt shows
/// `Err` while the lifecycle has already returned to idle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConnectionStatus {
    Up,
    Wait,
    Down,
    Err,
}

impl ConnectionStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ConnectionStatus::Up => "up",
            ConnectionStatus::Wait => "wait",
            ConnectionStatus::Down => "down",
            ConnectionStatus::Err => "err",
        }
    }
}

impl Display for ConnectionStatus {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> FormatResult {
        formatter.write_str(self.as_str())
    }
}
