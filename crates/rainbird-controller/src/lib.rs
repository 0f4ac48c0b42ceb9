//! Request orchestration for Rain Bird controllers.
//!
//! A [`Controller`] turns one named operation into one encrypted
//! `tunnelSip` exchange and returns the decoded reply or an error
//! classified by the stage that failed. The blocking and async
//! controllers share the same [`exchange`] pipeline.

#[cfg(feature = "async")]
pub mod async_controller;
pub mod config;
pub mod controller;
pub mod error;
pub mod exchange;
pub mod operation;

#[cfg(test)]
mod testing;

#[cfg(feature = "async")]
pub use async_controller::AsyncController;
pub use config::ControllerConfig;
pub use controller::Controller;
pub use error::{ControllerError, Result};
pub use exchange::{complete, prepare, PreparedRequest, Stage};
pub use operation::Operation;
pub use rainbird_sip::{DecodedResponse, FieldValue};
