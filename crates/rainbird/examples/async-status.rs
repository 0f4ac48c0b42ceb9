//! Query several values concurrently with the async controller.
//!
//! Run with:
//!   RAINBIRD_ADDRESS=192.168.1.20 RAINBIRD_PASSWORD=secret \
//!     cargo run --example async-status --features async

use rainbird::controller::{AsyncController, ControllerConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let address = std::env::var("RAINBIRD_ADDRESS")?;
    let password = std::env::var("RAINBIRD_PASSWORD")?;
    let rb = AsyncController::new(ControllerConfig::new(address, password))?;

    let (state, zone) = tokio::join!(rb.irrigation_state(), rb.active_zone());
    println!("{}", serde_json::to_string_pretty(&state?)?);
    println!("{}", serde_json::to_string_pretty(&zone?)?);
    Ok(())
}
