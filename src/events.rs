//! Events driving the application loop.

use crossterm::event::{KeyEvent, MouseEvent};

/// One input event delivered to the application loop.
#[derive(Debug, Clone)]
pub enum Event {
    /// A keyboard event received from the user.
    Key(KeyEvent),
    /// A mouse event received from the user.
    Mouse(MouseEvent),
    /// The terminal window was resized.
    Resize { width: u16, height: u16 },
    /// SIGINT/SIGTERM asked the dashboard to leave.
    Shutdown,
}
