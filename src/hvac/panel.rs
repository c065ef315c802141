//! Virtual display panel message.

use crate::error::Rejection;

/// Panel buffer size.  Accepted messages are strictly shorter.
pub const PANEL_CAPACITY: usize = 64;

pub type PanelMessage = heapless::String<PANEL_CAPACITY>;

/// Printable ASCII, space through tilde.
fn is_printable(s: &str) -> bool {
    s.bytes().all(|b| (0x20..=0x7e).contains(&b))
}

pub fn accept_panel_message(text: &str) -> Result<PanelMessage, Rejection> {
    if text.len() >= PANEL_CAPACITY || !is_printable(text) {
        return Err(Rejection::InvalidPanelMessage);
    }
    PanelMessage::try_from(text).map_err(|_| Rejection::InvalidPanelMessage)
}
