//! GS305EP/GS308EP(P) firmware: `SID` cookie sessions, hidden-input markup,
//! and a per-page anti-tampering hash echoed on every write.

pub mod extract;
pub mod forms;
