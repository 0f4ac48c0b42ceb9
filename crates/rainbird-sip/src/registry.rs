//! Static catalog of SIP commands and responses.
//!
//! Commands are looked up by name, responses by the opcode in the first byte
//! of a decrypted reply. Every field conversion is a [`Transform`] tag on the
//! response entry, so the tables stay plain data.

use std::collections::HashMap;
use std::sync::LazyLock;

use crate::error::{Result, SipError};
use crate::hex::from_hex;

/// Opcode of the negative-acknowledge reply.
pub const NOT_ACKNOWLEDGE: u8 = 0x00;

/// Opcode of the acknowledge reply.
pub const ACKNOWLEDGE: u8 = 0x01;

/// Width, in hex digits, of a parameter that is not declared by its command.
pub const DEFAULT_PARAM_WIDTH: usize = 2;

/// One ordered parameter slot of a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParamSpec {
    pub name: &'static str,
    /// Width in hex digits.
    pub width: usize,
}

/// An outgoing SIP command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandSpec {
    pub name: &'static str,
    pub opcode: u8,
    pub params: &'static [ParamSpec],
    /// Declared payload length in bytes, opcode included.
    pub length: usize,
    /// Opcode the controller answers with on success.
    pub response: u8,
}

impl CommandSpec {
    /// Hex width of the frame implied by the parameter slots.
    pub fn slot_width(&self) -> usize {
        2 + self.params.iter().map(|p| p.width).sum::<usize>()
    }
}

/// A named window into a response payload, in hex characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub position: usize,
    pub width: usize,
}

impl FieldSpec {
    pub fn end(&self) -> usize {
        self.position + self.width
    }
}

/// Conversion applied to the raw fields of a decoded response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transform {
    /// Fields stay raw hex.
    None,
    /// Every field becomes an unsigned number.
    Decimal,
    /// Every field becomes `value != 0`.
    Boolean,
    /// Only the named field becomes `value != 0`.
    BooleanField(&'static str),
    /// Adds `active_zones`: the 1-based index of the first set station bit.
    ActiveZone,
    /// Adds `ack = true`.
    Acknowledge,
    /// Adds `ack = false`.
    NotAcknowledge,
}

/// A device reply variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResponseSpec {
    pub opcode: u8,
    /// Type discriminator attached to decoded output.
    pub name: &'static str,
    /// Declared payload length in bytes, opcode included.
    pub length: usize,
    pub fields: &'static [FieldSpec],
    pub transform: Transform,
}

// Nested slices must stay plain struct literals to be promoted to 'static.
macro_rules! param {
    ($name:literal, $width:literal) => {
        ParamSpec {
            name: $name,
            width: $width,
        }
    };
}

macro_rules! field {
    ($name:literal, $position:literal, $width:literal) => {
        FieldSpec {
            name: $name,
            position: $position,
            width: $width,
        }
    };
}

const fn command(
    name: &'static str,
    opcode: u8,
    params: &'static [ParamSpec],
    length: usize,
    response: u8,
) -> CommandSpec {
    CommandSpec {
        name,
        opcode,
        params,
        length,
        response,
    }
}

const fn response(
    opcode: u8,
    name: &'static str,
    length: usize,
    fields: &'static [FieldSpec],
    transform: Transform,
) -> ResponseSpec {
    ResponseSpec {
        opcode,
        name,
        length,
        fields,
        transform,
    }
}

/// Commands understood by LNK-attached controllers.
pub static COMMANDS: &[CommandSpec] = &[
    command("ModelAndVersionRequest", 0x02, &[], 1, 0x82),
    command("AvailableStationsRequest", 0x03, &[param!("page", 2)], 2, 0x83),
    command("CommandSupportRequest", 0x04, &[param!("command", 2)], 2, 0x84),
    command("SerialNumberRequest", 0x05, &[], 1, 0x85),
    command("CurrentTimeRequest", 0x10, &[], 1, 0x90),
    command("CurrentDateRequest", 0x12, &[], 1, 0x92),
    command("WaterBudgetRequest", 0x30, &[param!("program", 2)], 2, 0xB0),
    command(
        "ZonesSeasonalAdjustFactorRequest",
        0x32,
        &[param!("program", 2)],
        2,
        0xB2,
    ),
    command("RainDelayGetRequest", 0x36, &[], 1, 0xB6),
    command("RainDelaySetRequest", 0x37, &[param!("days", 4)], 3, ACKNOWLEDGE),
    command(
        "ManuallyRunProgramRequest",
        0x38,
        &[param!("program", 2)],
        2,
        ACKNOWLEDGE,
    ),
    command(
        "ManuallyRunStationRequest",
        0x39,
        &[param!("zone", 4), param!("minutes", 2)],
        4,
        ACKNOWLEDGE,
    ),
    command("TestStationsRequest", 0x3A, &[param!("minutes", 2)], 2, ACKNOWLEDGE),
    command("CurrentRainSensorStateRequest", 0x3E, &[], 1, 0xBE),
    command("CurrentStationsActiveRequest", 0x3F, &[param!("page", 2)], 2, 0xBF),
    command("StopIrrigationRequest", 0x40, &[], 1, ACKNOWLEDGE),
    command("AdvanceStationRequest", 0x42, &[param!("station", 2)], 2, ACKNOWLEDGE),
    command("CurrentIrrigationStateRequest", 0x48, &[], 1, 0xC8),
    command("CurrentControllerStateSet", 0x49, &[param!("state", 2)], 2, ACKNOWLEDGE),
    command(
        "ControllerEventTimestampRequest",
        0x4A,
        &[param!("event", 2)],
        2,
        0xCA,
    ),
    command("CombinedControllerStateRequest", 0x4C, &[], 1, 0xCC),
];

/// Replies a controller can send.
pub static RESPONSES: &[ResponseSpec] = &[
    response(
        NOT_ACKNOWLEDGE,
        "NotAcknowledgeResponse",
        3,
        &[field!("command_echo", 2, 2), field!("nak_code", 4, 2)],
        Transform::NotAcknowledge,
    ),
    response(
        ACKNOWLEDGE,
        "AcknowledgeResponse",
        2,
        &[field!("command_echo", 2, 2)],
        Transform::Acknowledge,
    ),
    response(
        0x82,
        "ModelAndVersionResponse",
        5,
        &[
            field!("model_id", 2, 4),
            field!("protocol_revision_major", 6, 2),
            field!("protocol_revision_minor", 8, 2),
        ],
        Transform::None,
    ),
    response(
        0x83,
        "AvailableStationsResponse",
        6,
        &[field!("page_number", 2, 2), field!("set_stations", 4, 8)],
        Transform::None,
    ),
    response(
        0x84,
        "CommandSupportResponse",
        3,
        &[field!("command_echo", 2, 2), field!("support", 4, 2)],
        Transform::BooleanField("support"),
    ),
    response(
        0x85,
        "SerialNumberResponse",
        9,
        &[field!("serial_number", 2, 16)],
        Transform::None,
    ),
    response(
        0x90,
        "CurrentTimeResponse",
        4,
        &[
            field!("hour", 2, 2),
            field!("minute", 4, 2),
            field!("second", 6, 2),
        ],
        Transform::Decimal,
    ),
    response(
        0x92,
        "CurrentDateResponse",
        4,
        &[field!("day", 2, 2), field!("month", 4, 1), field!("year", 5, 3)],
        Transform::Decimal,
    ),
    response(
        0xB0,
        "WaterBudgetResponse",
        4,
        &[field!("program_code", 2, 2), field!("seasonal_adjust", 4, 4)],
        Transform::Decimal,
    ),
    response(
        0xB2,
        "ZonesSeasonalAdjustFactorResponse",
        18,
        &[field!("program_code", 2, 2), field!("stations_sa", 4, 32)],
        Transform::None,
    ),
    response(
        0xB6,
        "RainDelaySettingResponse",
        3,
        &[field!("delay_setting", 2, 4)],
        Transform::Decimal,
    ),
    response(
        0xBE,
        "CurrentRainSensorStateResponse",
        2,
        &[field!("sensor_state", 2, 2)],
        Transform::Boolean,
    ),
    response(
        0xBF,
        "CurrentStationsActiveResponse",
        6,
        &[field!("page_number", 2, 2), field!("active_stations", 4, 8)],
        Transform::ActiveZone,
    ),
    response(
        0xC8,
        "CurrentIrrigationStateResponse",
        2,
        &[field!("irrigation_state", 2, 2)],
        Transform::Boolean,
    ),
    response(
        0xCA,
        "ControllerEventTimestampResponse",
        6,
        &[field!("event_id", 2, 2), field!("timestamp", 4, 8)],
        Transform::None,
    ),
    response(
        0xCC,
        "CombinedControllerStateResponse",
        16,
        &[
            field!("hour", 2, 2),
            field!("minute", 4, 2),
            field!("second", 6, 2),
            field!("day", 8, 2),
            field!("month", 10, 1),
            field!("year", 11, 3),
            field!("delay_setting", 14, 4),
            field!("sensor_state", 18, 2),
            field!("irrigation_state", 20, 2),
            field!("seasonal_adjust", 22, 4),
            field!("remaining_runtime", 26, 4),
            field!("active_station", 30, 2),
        ],
        Transform::None,
    ),
];

static STANDARD: LazyLock<SipRegistry> =
    LazyLock::new(|| SipRegistry::from_tables(COMMANDS, RESPONSES));

/// Name- and opcode-keyed view over command and response tables.
#[derive(Debug)]
pub struct SipRegistry {
    commands: HashMap<&'static str, &'static CommandSpec>,
    responses: HashMap<u8, &'static ResponseSpec>,
}

impl SipRegistry {
    /// The registry built from [`COMMANDS`] and [`RESPONSES`].
    pub fn standard() -> &'static SipRegistry {
        &STANDARD
    }

    /// Build a registry from explicit tables. Later entries win on duplicates.
    pub fn from_tables(
        commands: &'static [CommandSpec],
        responses: &'static [ResponseSpec],
    ) -> Self {
        Self {
            commands: commands.iter().map(|c| (c.name, c)).collect(),
            responses: responses.iter().map(|r| (r.opcode, r)).collect(),
        }
    }

    /// Look up a command by name.
    pub fn command(&self, name: &str) -> Result<&'static CommandSpec> {
        self.commands
            .get(name)
            .copied()
            .ok_or_else(|| SipError::UnknownCommand(name.to_string()))
    }

    /// Look up a response by opcode.
    pub fn response(&self, opcode: u8) -> Option<&'static ResponseSpec> {
        self.responses.get(&opcode).copied()
    }

    /// Look up a response by its two hex-digit opcode.
    pub fn response_for_code(&self, code: &str) -> Result<&'static ResponseSpec> {
        let unknown = || SipError::UnknownResponseCode(code.to_string());
        if code.len() != 2 {
            return Err(unknown());
        }
        let opcode = u8::try_from(from_hex(code)?).map_err(|_| unknown())?;
        self.response(opcode).ok_or_else(unknown)
    }

    /// Commands ordered by opcode.
    pub fn commands(&self) -> Vec<&'static CommandSpec> {
        let mut commands: Vec<_> = self.commands.values().copied().collect();
        commands.sort_unstable_by_key(|c| c.opcode);
        commands
    }

    /// Responses ordered by opcode.
    pub fn responses(&self) -> Vec<&'static ResponseSpec> {
        let mut responses: Vec<_> = self.responses.values().copied().collect();
        responses.sort_unstable_by_key(|r| r.opcode);
        responses
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_slots_fill_declared_length() {
        for spec in COMMANDS {
            assert_eq!(
                spec.slot_width(),
                spec.length * 2,
                "{} slots do not match its length",
                spec.name
            );
        }
    }

    #[test]
    fn response_fields_lie_within_declared_length() {
        for spec in RESPONSES {
            for field in spec.fields {
                assert!(field.position >= 2, "{}.{} overlaps opcode", spec.name, field.name);
                assert!(
                    field.end() <= spec.length * 2,
                    "{}.{} runs past the payload",
                    spec.name,
                    field.name
                );
            }
            for pair in spec.fields.windows(2) {
                assert!(pair[0].end() <= pair[1].position, "{} fields overlap", spec.name);
            }
        }
    }

    #[test]
    fn every_expected_response_is_registered() {
        let registry = SipRegistry::standard();
        for spec in COMMANDS {
            assert!(
                registry.response(spec.response).is_some(),
                "{} expects unregistered response {:02X}",
                spec.name,
                spec.response
            );
        }
    }

    #[test]
    fn boolean_field_transforms_name_existing_fields() {
        for spec in RESPONSES {
            if let Transform::BooleanField(name) = spec.transform {
                assert!(spec.fields.iter().any(|f| f.name == name));
            }
        }
    }

    #[test]
    fn lookup_by_name_and_code() {
        let registry = SipRegistry::standard();
        let stop = registry.command("StopIrrigationRequest").unwrap();
        assert_eq!(stop.opcode, 0x40);
        assert_eq!(stop.response, ACKNOWLEDGE);

        assert_eq!(registry.response_for_code("bf").unwrap().name, "CurrentStationsActiveResponse");
        assert_eq!(registry.response_for_code("00").unwrap().opcode, NOT_ACKNOWLEDGE);
    }

    #[test]
    fn unknown_lookups_fail() {
        let registry = SipRegistry::standard();
        assert_eq!(
            registry.command("FloodGardenRequest"),
            Err(SipError::UnknownCommand("FloodGardenRequest".to_string()))
        );
        assert_eq!(
            registry.response_for_code("7F"),
            Err(SipError::UnknownResponseCode("7F".to_string()))
        );
        assert!(matches!(registry.response_for_code("Z1"), Err(SipError::MalformedHex(_))));
    }

    #[test]
    fn listings_are_ordered_and_complete() {
        let registry = SipRegistry::standard();
        let commands = registry.commands();
        assert_eq!(commands.len(), COMMANDS.len());
        assert!(commands.windows(2).all(|w| w[0].opcode < w[1].opcode));
        assert_eq!(registry.responses().len(), RESPONSES.len());
    }
}
