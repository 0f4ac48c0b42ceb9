//! Local-network client for Rain Bird irrigation controllers.
//!
//! Talks to the controller's LNK WiFi module the way the mobile app does:
//! SIP command frames tunneled through an encrypted JSON-RPC `tunnelSip`
//! call.
//!
//! # Crate Structure
//!
//! - [`transport`]: HTTP exchange with the `/stick` endpoint
//! - [`sip`]: command/response registry, frame builder and reply decoder
//! - [`envelope`]: AES-256-CBC envelope and JSON-RPC bodies
//! - [`controller`]: request orchestration (behind `controller` feature)
//!
//! ```no_run
//! use rainbird::controller::{Controller, ControllerConfig};
//!
//! let rb = Controller::new(ControllerConfig::new("192.168.1.20", "password"))?;
//! let zone = rb.active_zone()?;
//! println!("running zone: {:?}", zone.number("active_zones"));
//! # Ok::<(), rainbird::controller::ControllerError>(())
//! ```

/// Re-export transport types.
pub mod transport {
    pub use rainbird_transport::*;
}

/// Re-export SIP codec types.
pub mod sip {
    pub use rainbird_sip::*;
}

/// Re-export envelope types.
pub mod envelope {
    pub use rainbird_envelope::*;
}

/// Re-export controller types (requires `controller` feature).
#[cfg(feature = "controller")]
pub mod controller {
    pub use rainbird_controller::*;
}
