//! Print a one-shot status summary of a controller.
//!
//! Run with:
//!   RAINBIRD_ADDRESS=192.168.1.20 RAINBIRD_PASSWORD=secret \
//!     cargo run --example status

use rainbird::controller::{Controller, ControllerConfig};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let address = std::env::var("RAINBIRD_ADDRESS")?;
    let password = std::env::var("RAINBIRD_PASSWORD")?;
    let rb = Controller::new(ControllerConfig::new(address, password))?;

    let model = rb.model_and_version()?;
    eprintln!(
        "model {} (protocol {}.{})",
        model.hex("model_id").unwrap_or("?"),
        model.hex("protocol_revision_major").unwrap_or("?"),
        model.hex("protocol_revision_minor").unwrap_or("?"),
    );

    let time = rb.time()?;
    let date = rb.date()?;
    eprintln!(
        "clock {:04}-{:02}-{:02} {:02}:{:02}:{:02}",
        date.number("year").unwrap_or(0),
        date.number("month").unwrap_or(0),
        date.number("day").unwrap_or(0),
        time.number("hour").unwrap_or(0),
        time.number("minute").unwrap_or(0),
        time.number("second").unwrap_or(0),
    );

    let delay = rb.rain_delay()?;
    let sensor = rb.rain_sensor_state()?;
    eprintln!(
        "rain delay {} day(s), sensor {}",
        delay.number("delay_setting").unwrap_or(0),
        if sensor.flag("sensor_state") == Some(true) { "wet" } else { "dry" },
    );

    match rb.active_zone()?.number("active_zones") {
        Some(0) | None => eprintln!("idle"),
        Some(zone) => eprintln!("zone {zone} running"),
    }
    Ok(())
}
