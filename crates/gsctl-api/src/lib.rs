// gsctl-api: Async client for the HTML web-admin of Netgear GS30x/GS316 PoE switches

pub mod auth;
pub mod client;
pub mod debug;
pub mod error;
pub mod form;
pub mod gs30x;
pub mod gs316;
pub mod html;
pub mod model;
pub mod poe;
pub mod ports;
pub mod records;
pub mod transport;

pub use auth::password_digest;
pub use client::{SessionToken, SwitchClient};
pub use error::Error;
pub use form::FormPayload;
pub use model::{SwitchFamily, SwitchModel};
pub use poe::{poe_reset_form, poe_update_form};
pub use ports::port_update_form;
pub use records::{
    DebugPage, PoeConfigPage, PoePortSetting, PoePortStatus, PortIndex, PortSetting,
    PortSettingsPage, PortStatus,
};
pub use transport::TransportConfig;
