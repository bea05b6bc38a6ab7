// gsctl-core: Session handling and configuration reconciliation on top of gsctl-api.

pub mod change;
pub mod error;
pub mod mapping;
pub mod merge;
pub mod reconcile;
pub mod session;
pub mod token;

// ── Primary re-exports ──────────────────────────────────────────────
pub use change::{PoeSettingsChange, PortSettingsChange};
pub use error::CoreError;
pub use mapping::CodeTable;
pub use reconcile::Phase;
pub use session::Session;
pub use token::{MemoryTokenStore, TokenStore};

// Re-export wire types consumers need without depending on gsctl-api.
pub use gsctl_api::{
    DebugPage, PoePortSetting, PoePortStatus, PortIndex, PortSetting, PortStatus, SwitchFamily,
    SwitchModel, TransportConfig,
};
