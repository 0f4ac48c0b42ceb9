use std::time::Duration;

use rainbird_controller::{Controller, ControllerConfig, Operation};
use rainbird_transport::TransportConfig;
use tracing::debug;

use crate::cmd::ConnectionArgs;
use crate::exit::{controller_error, CliError, CliResult, SUCCESS, USAGE};
use crate::output::{print_response, OutputFormat};

const MIN_TIMEOUT: Duration = Duration::from_millis(100);

pub fn run(connection: &ConnectionArgs, operation: Operation, format: OutputFormat) -> CliResult<i32> {
    let controller = connect(connection)?;
    let response = controller
        .execute(operation)
        .map_err(|err| controller_error(operation.command_name(), err))?;
    print_response(&response, format);
    Ok(SUCCESS)
}

/// Build a controller from the global connection flags.
pub fn connect(connection: &ConnectionArgs) -> CliResult<Controller> {
    let address = connection
        .address
        .clone()
        .filter(|a| !a.is_empty())
        .ok_or_else(|| CliError::new(USAGE, "missing controller address (--address or RAINBIRD_ADDRESS)"))?;
    let password = connection
        .password
        .clone()
        .ok_or_else(|| CliError::new(USAGE, "missing controller password (--password or RAINBIRD_PASSWORD)"))?;
    let timeout = parse_timeout(&connection.timeout)?;

    let config = ControllerConfig::new(address, password).with_debug(connection.debug);
    debug!(?config, ?timeout, "connecting");
    let transport = TransportConfig {
        timeout: Some(timeout),
        ..TransportConfig::default()
    };
    Controller::with_transport_config(config, transport)
        .map_err(|err| controller_error("transport setup failed", err))
}

/// Parse `--timeout`: a whole number with an optional `ms`, `s` or `m` unit.
/// Anything under [`MIN_TIMEOUT`] is refused.
fn parse_timeout(input: &str) -> CliResult<Duration> {
    let input = input.trim();
    let split = input.find(|c: char| !c.is_ascii_digit()).unwrap_or(input.len());
    let (digits, unit) = input.split_at(split);

    let value: u64 = digits
        .parse()
        .map_err(|_| CliError::new(USAGE, format!("invalid timeout: {input:?}")))?;
    let timeout = match unit {
        "ms" => Duration::from_millis(value),
        "" | "s" => Duration::from_secs(value),
        "m" => Duration::from_secs(value.saturating_mul(60)),
        other => return Err(CliError::new(USAGE, format!("unknown timeout unit: {other:?}"))),
    };

    if timeout < MIN_TIMEOUT {
        return Err(CliError::new(
            USAGE,
            format!("timeout {input} is below {}ms", MIN_TIMEOUT.as_millis()),
        ));
    }
    Ok(timeout)
}
