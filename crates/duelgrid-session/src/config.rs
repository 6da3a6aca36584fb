//! Session configuration.

/// Settings handed to [`Session::start_hosting`](crate::Session::start_hosting)
/// and [`Session::start_joining`](crate::Session::start_joining).
///
/// Passed explicitly at each session start; nothing is read from ambient
/// state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// Side length of the board for the new game. Must be at least 3.
    ///
    /// A joiner's board is replaced by the host's snapshot during the
    /// handshake, so both sides should agree on this value.
    pub board_size: usize,

    /// Address the listening endpoint binds to when hosting.
    ///
    /// Default: `127.0.0.1:0` (loopback, OS-assigned port).
    pub bind_addr: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            board_size: 3,
            bind_addr: "127.0.0.1:0".to_string(),
        }
    }
}
