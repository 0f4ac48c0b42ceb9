use clap::{Args, Subcommand, ValueEnum};
use rainbird_controller::Operation;

use crate::exit::{CliError, CliResult, INTERNAL};
use crate::output::OutputFormat;

pub mod commands;
pub mod device;
pub mod raw;
pub mod version;

/// How to reach the controller. Shared by every device command.
#[derive(Args, Debug, Clone)]
pub struct ConnectionArgs {
    /// Controller address (`host` or `host:port`).
    #[arg(long, env = "RAINBIRD_ADDRESS", global = true)]
    pub address: Option<String>,

    /// Controller password.
    #[arg(long, env = "RAINBIRD_PASSWORD", hide_env_values = true, global = true)]
    pub password: Option<String>,

    /// Request timeout (e.g. 20s, 500ms).
    #[arg(long, default_value = "20s", global = true)]
    pub timeout: String,

    /// Log frame hex and decrypted JSON bodies.
    #[arg(long, global = true)]
    pub debug: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show model id and protocol revision.
    Model,
    /// Show the controller clock.
    Time,
    /// Show the controller date.
    Date,
    /// Show the serial number.
    Serial,
    /// Show whether the rain sensor is tripped.
    RainSensor,
    /// Show the rain delay in days.
    RainDelay,
    /// Set the rain delay in days.
    SetRainDelay(SetRainDelayArgs),
    /// Show the installed zones bitmask.
    Zones,
    /// Show whether irrigation is enabled.
    IrrigationState,
    /// Show the running zone (0 when idle).
    ActiveZone,
    /// Stop all irrigation.
    Stop,
    /// Run one zone for a number of minutes.
    RunZone(RunZoneArgs),
    /// Run every zone in turn.
    RunAll(MinutesArgs),
    /// Start a program manually.
    RunProgram(ProgramArgs),
    /// Ask whether the controller supports a command opcode.
    CommandSupport(CommandSupportArgs),
    /// Show the water budget of a program.
    WaterBudget(ProgramArgs),
    /// Show per-zone seasonal adjust factors of a program.
    SeasonalAdjust(ProgramArgs),
    /// Advance the running program to a zone.
    AdvanceZone(AdvanceZoneArgs),
    /// Enable or disable irrigation.
    SetIrrigation(SetIrrigationArgs),
    /// Show the timestamp of a controller event.
    EventTimestamp(EventArgs),
    /// Show the combined controller state.
    State,
    /// Send any registered command with raw parameter values.
    Raw(RawArgs),
    /// List the command registry (no network).
    Commands,
    /// Show version information.
    Version(VersionArgs),
}

impl Command {
    /// The controller operation a device command maps to.
    pub fn operation(&self) -> Option<Operation> {
        let op = match self {
            Command::Model => Operation::ModelAndVersion,
            Command::Time => Operation::Time,
            Command::Date => Operation::Date,
            Command::Serial => Operation::SerialNumber,
            Command::RainSensor => Operation::RainSensorState,
            Command::RainDelay => Operation::RainDelay,
            Command::SetRainDelay(args) => Operation::SetRainDelay { days: args.days },
            Command::Zones => Operation::AvailableZones,
            Command::IrrigationState => Operation::IrrigationState,
            Command::ActiveZone => Operation::ActiveZone,
            Command::Stop => Operation::StopIrrigation,
            Command::RunZone(args) => Operation::RunZone {
                zone: args.zone,
                minutes: args.minutes,
            },
            Command::RunAll(args) => Operation::RunAllZones {
                minutes: args.minutes,
            },
            Command::RunProgram(args) => Operation::RunProgram {
                program: args.program,
            },
            Command::CommandSupport(args) => Operation::CommandSupport {
                opcode: args.opcode,
            },
            Command::WaterBudget(args) => Operation::WaterBudget {
                program: args.program,
            },
            Command::SeasonalAdjust(args) => Operation::SeasonalAdjust {
                program: args.program,
            },
            Command::AdvanceZone(args) => Operation::AdvanceZone { zone: args.zone },
            Command::SetIrrigation(args) => {
                Operation::SetIrrigationEnabled(matches!(args.state, Switch::On))
            }
            Command::EventTimestamp(args) => Operation::EventTimestamp { event: args.event },
            Command::State => Operation::CombinedState,
            Command::Raw(_) | Command::Commands | Command::Version(_) => return None,
        };
        Some(op)
    }
}

pub fn run(command: Command, connection: &ConnectionArgs, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Raw(args) => raw::run(args, connection, format),
        Command::Commands => commands::run(format),
        Command::Version(args) => version::run(args),
        other => match other.operation() {
            Some(operation) => device::run(connection, operation, format),
            None => Err(CliError::new(INTERNAL, format!("{other:?} has no operation"))),
        },
    }
}

#[derive(Args, Debug)]
pub struct SetRainDelayArgs {
    /// Days to suspend irrigation (0 clears the delay).
    pub days: u16,
}

#[derive(Args, Debug)]
pub struct RunZoneArgs {
    /// Zone number, starting at 1.
    pub zone: u16,
    pub minutes: u8,
}

#[derive(Args, Debug)]
pub struct MinutesArgs {
    /// Minutes per zone.
    pub minutes: u8,
}

#[derive(Args, Debug)]
pub struct ProgramArgs {
    /// Program number.
    pub program: u8,
}

#[derive(Args, Debug)]
pub struct CommandSupportArgs {
    /// Command opcode to probe (hex, e.g. 3F or 0x3F).
    #[arg(value_parser = parse_opcode)]
    pub opcode: u8,
}

#[derive(Args, Debug)]
pub struct AdvanceZoneArgs {
    pub zone: u8,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum Switch {
    On,
    Off,
}

#[derive(Args, Debug)]
pub struct SetIrrigationArgs {
    pub state: Switch,
}

#[derive(Args, Debug)]
pub struct EventArgs {
    /// Event id.
    pub event: u8,
}

#[derive(Args, Debug)]
pub struct RawArgs {
    /// Registry command name (see `rainbird commands`).
    pub name: String,
    /// Parameter values in slot order (decimal, or hex with 0x).
    #[arg(value_parser = parse_number)]
    pub params: Vec<u64>,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Also list the protocol surface this build supports.
    #[arg(long)]
    pub extended: bool,
}

fn parse_opcode(input: &str) -> Result<u8, String> {
    let digits = input.trim_start_matches("0x").trim_start_matches("0X");
    u8::from_str_radix(digits, 16).map_err(|_| format!("invalid opcode: {input}"))
}

fn parse_number(input: &str) -> Result<u64, String> {
    let parsed = match input.strip_prefix("0x").or_else(|| input.strip_prefix("0X")) {
        Some(digits) => u64::from_str_radix(digits, 16),
        None => input.parse(),
    };
    parsed.map_err(|_| format!("invalid number: {input}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opcodes_parse_as_hex() {
        assert_eq!(parse_opcode("3F"), Ok(0x3F));
        assert_eq!(parse_opcode("0x3f"), Ok(0x3F));
        assert!(parse_opcode("100").is_err());
        assert!(parse_opcode("zz").is_err());
    }

    #[test]
    fn raw_numbers_accept_decimal_and_hex() {
        assert_eq!(parse_number("14"), Ok(14));
        assert_eq!(parse_number("0x0E"), Ok(14));
        assert!(parse_number("-1").is_err());
        assert!(parse_number("0x").is_err());
    }

    #[test]
    fn non_device_commands_have_no_operation() {
        assert!(Command::Commands.operation().is_none());
        assert!(Command::Version(VersionArgs { extended: false })
            .operation()
            .is_none());
        assert_eq!(Command::Stop.operation(), Some(Operation::StopIrrigation));
    }
}
