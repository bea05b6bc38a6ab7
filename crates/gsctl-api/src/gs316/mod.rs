//! GS316EP(P) firmware: `Gambit` query-token sessions, div-per-port markup
//! with visible labels, and no write hash.

pub mod extract;
pub mod forms;

/// Ports 1..=15 can be power-cycled; port 16 carries no PoE.
pub const RESETTABLE_POE_PORTS: u8 = 15;
