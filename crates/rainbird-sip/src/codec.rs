use std::collections::BTreeMap;

use tracing::trace;

use crate::error::{Result, SipError};
use crate::hex::{from_hex, is_hex, to_hex};
use crate::registry::{CommandSpec, SipRegistry, Transform, DEFAULT_PARAM_WIDTH};
use crate::response::{DecodedResponse, FieldValue};

/// Field added to replies of [`Transform::ActiveZone`].
pub const ACTIVE_ZONES_FIELD: &str = "active_zones";

/// Field added to acknowledge and negative-acknowledge replies.
pub const ACK_FIELD: &str = "ack";

/// Field the active-zone conversion reads.
const ACTIVE_STATIONS_FIELD: &str = "active_stations";

/// Build the hex payload of a command.
///
/// Wire format:
/// ```text
/// ┌──────────────┬───────────────┬─────┬───────────────┐
/// │ Opcode (2)   │ Param 1 (w1)  │ ... │ Param n (wn)  │
/// │ uppercase hex, each param zero-padded to its slot   │
/// └──────────────┴───────────────┴─────┴───────────────┘
/// ```
///
/// Parameters are encoded first and the total length checked afterwards, so
/// a missing parameter, an extra parameter, or a value wider than its slot
/// all surface as [`SipError::ParameterLengthMismatch`].
pub fn build_frame(spec: &CommandSpec, params: &[u64]) -> Result<String> {
    let mut frame = to_hex(u64::from(spec.opcode), 2);
    for (index, value) in params.iter().enumerate() {
        let width = spec
            .params
            .get(index)
            .map_or(DEFAULT_PARAM_WIDTH, |slot| slot.width);
        frame.push_str(&to_hex(*value, width));
    }

    if frame.len() != spec.length * 2 {
        return Err(SipError::ParameterLengthMismatch {
            command: spec.name.to_string(),
            expected: spec.length,
            actual: frame.len(),
        });
    }
    Ok(frame)
}

/// Decode a reply payload using the registry's field layout.
///
/// Either the whole reply decodes or an error is returned; there is no
/// partial output.
pub fn decode_response(payload: &str, registry: &SipRegistry) -> Result<DecodedResponse> {
    if payload.len() < 2 || !is_hex(payload) {
        return Err(SipError::MalformedHex(payload.to_string()));
    }

    let spec = registry.response_for_code(&payload[..2])?;
    if payload.len() != spec.length * 2 {
        return Err(SipError::ResponseLengthMismatch {
            response: spec.name.to_string(),
            expected: spec.length,
            actual: payload.len(),
        });
    }

    let mut fields: BTreeMap<&'static str, FieldValue> = spec
        .fields
        .iter()
        .map(|field| {
            let raw = &payload[field.position..field.end()];
            (field.name, FieldValue::Hex(raw.to_string()))
        })
        .collect();

    apply_transform(spec.transform, &mut fields)?;
    trace!(response = spec.name, fields = fields.len(), "decoded response");

    Ok(DecodedResponse {
        response_type: spec.name,
        opcode: spec.opcode,
        fields,
    })
}

fn apply_transform(
    transform: Transform,
    fields: &mut BTreeMap<&'static str, FieldValue>,
) -> Result<()> {
    match transform {
        Transform::None => {}
        Transform::Decimal => {
            for value in fields.values_mut() {
                if let FieldValue::Hex(text) = value {
                    *value = FieldValue::Number(from_hex(text)?);
                }
            }
        }
        Transform::Boolean => {
            for value in fields.values_mut() {
                if let FieldValue::Hex(text) = value {
                    *value = FieldValue::Bool(from_hex(text)? != 0);
                }
            }
        }
        Transform::BooleanField(name) => {
            if let Some(value) = fields.get_mut(name) {
                if let FieldValue::Hex(text) = value {
                    *value = FieldValue::Bool(from_hex(text)? != 0);
                }
            }
        }
        Transform::ActiveZone => {
            if let Some(FieldValue::Hex(stations)) = fields.get(ACTIVE_STATIONS_FIELD) {
                let zone = active_zone(stations)?;
                fields.insert(ACTIVE_ZONES_FIELD, FieldValue::Number(zone));
            }
        }
        Transform::Acknowledge => {
            fields.insert(ACK_FIELD, FieldValue::Bool(true));
        }
        Transform::NotAcknowledge => {
            fields.insert(ACK_FIELD, FieldValue::Bool(false));
        }
    }
    Ok(())
}

/// 1-based number of the active zone in a station bitmask, or 0.
///
/// The mask is read in 2-digit groups from the left; within a group bits are
/// scanned least significant first, and numbering continues across groups
/// (`"20000000"` is zone 6, `"00010000"` is zone 9). Only the first set bit
/// counts.
pub fn active_zone(stations: &str) -> Result<u64> {
    if !is_hex(stations) {
        return Err(SipError::MalformedHex(stations.to_string()));
    }
    for (group, chunk) in stations.as_bytes().chunks(2).enumerate() {
        // ASCII was checked above, so every chunk is valid UTF-8.
        let text = std::str::from_utf8(chunk)
            .map_err(|_| SipError::MalformedHex(stations.to_string()))?;
        let bits = from_hex(text)?;
        if bits != 0 {
            return Ok(group as u64 * 8 + u64::from(bits.trailing_zeros()) + 1);
        }
    }
    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::{SipRegistry, COMMANDS};

    fn registry() -> &'static SipRegistry {
        SipRegistry::standard()
    }

    fn command(name: &str) -> &'static CommandSpec {
        registry().command(name).unwrap()
    }

    #[test]
    fn frames_fill_declared_length() {
        for spec in COMMANDS {
            let params = vec![1u64; spec.params.len()];
            let frame = build_frame(spec, &params).unwrap();
            assert_eq!(frame.len(), spec.length * 2, "{}", spec.name);
            assert_eq!(&frame[..2], to_hex(u64::from(spec.opcode), 2));
        }
    }

    #[test]
    fn rain_delay_encodes_four_digits() {
        let spec = command("RainDelaySetRequest");
        assert_eq!(build_frame(spec, &[14]).unwrap(), "37000E");
        assert_eq!(build_frame(spec, &[0]).unwrap(), "370000");
    }

    #[test]
    fn manual_zone_run_encodes_both_slots() {
        let spec = command("ManuallyRunStationRequest");
        assert_eq!(build_frame(spec, &[3, 15]).unwrap(), "3900030F");
    }

    #[test]
    fn parameterless_command_is_opcode_only() {
        assert_eq!(build_frame(command("StopIrrigationRequest"), &[]).unwrap(), "40");
    }

    #[test]
    fn missing_parameter_is_length_mismatch() {
        let err = build_frame(command("ManuallyRunStationRequest"), &[3]).unwrap_err();
        assert_eq!(
            err,
            SipError::ParameterLengthMismatch {
                command: "ManuallyRunStationRequest".to_string(),
                expected: 4,
                actual: 6,
            }
        );
    }

    #[test]
    fn extra_parameter_is_length_mismatch() {
        let err = build_frame(command("StopIrrigationRequest"), &[1]).unwrap_err();
        assert!(matches!(err, SipError::ParameterLengthMismatch { actual: 4, .. }));
    }

    #[test]
    fn overflowing_parameter_is_caught_by_length_check() {
        let err = build_frame(command("TestStationsRequest"), &[0x100]).unwrap_err();
        assert!(matches!(err, SipError::ParameterLengthMismatch { actual: 5, .. }));
    }

    #[test]
    fn acknowledge_sets_flag() {
        let decoded = decode_response("0140", registry()).unwrap();
        assert_eq!(decoded.response_type, "AcknowledgeResponse");
        assert_eq!(decoded.acknowledged(), Some(true));
        assert_eq!(decoded.hex("command_echo"), Some("40"));
        assert!(!decoded.is_not_acknowledge());
    }

    #[test]
    fn not_acknowledge_carries_nak_code() {
        let decoded = decode_response("003902", registry()).unwrap();
        assert_eq!(decoded.response_type, "NotAcknowledgeResponse");
        assert_eq!(decoded.acknowledged(), Some(false));
        assert_eq!(decoded.hex("command_echo"), Some("39"));
        assert_eq!(decoded.hex("nak_code"), Some("02"));
        assert!(decoded.is_not_acknowledge());
    }

    #[test]
    fn time_fields_become_numbers() {
        let decoded = decode_response("90173B09", registry()).unwrap();
        assert_eq!(decoded.number("hour"), Some(23));
        assert_eq!(decoded.number("minute"), Some(59));
        assert_eq!(decoded.number("second"), Some(9));
    }

    #[test]
    fn date_uses_narrow_month_field() {
        let decoded = decode_response("920C47E8", registry()).unwrap();
        assert_eq!(decoded.number("day"), Some(12));
        assert_eq!(decoded.number("month"), Some(4));
        assert_eq!(decoded.number("year"), Some(2024));
    }

    #[test]
    fn rain_sensor_becomes_boolean() {
        assert_eq!(
            decode_response("BE01", registry()).unwrap().flag("sensor_state"),
            Some(true)
        );
        assert_eq!(
            decode_response("BE00", registry()).unwrap().flag("sensor_state"),
            Some(false)
        );
    }

    #[test]
    fn command_support_converts_only_support() {
        let decoded = decode_response("840201", registry()).unwrap();
        assert_eq!(decoded.hex("command_echo"), Some("02"));
        assert_eq!(decoded.flag("support"), Some(true));
    }

    #[test]
    fn model_fields_stay_raw() {
        let decoded = decode_response("8200030209", registry()).unwrap();
        assert_eq!(decoded.response_type, "ModelAndVersionResponse");
        assert_eq!(decoded.hex("model_id"), Some("0003"));
        assert_eq!(decoded.hex("protocol_revision_major"), Some("02"));
        assert_eq!(decoded.hex("protocol_revision_minor"), Some("09"));
    }

    #[test]
    fn active_stations_resolve_to_zone_number() {
        let decoded = decode_response("BF0020000000", registry()).unwrap();
        assert_eq!(decoded.hex("active_stations"), Some("20000000"));
        assert_eq!(decoded.number(ACTIVE_ZONES_FIELD), Some(6));

        let idle = decode_response("BF0000000000", registry()).unwrap();
        assert_eq!(idle.number(ACTIVE_ZONES_FIELD), Some(0));
    }

    #[test]
    fn active_zone_scans_lsb_first_across_groups() {
        assert_eq!(active_zone("20000000").unwrap(), 6);
        assert_eq!(active_zone("00000000").unwrap(), 0);
        assert_eq!(active_zone("01000000").unwrap(), 1);
        assert_eq!(active_zone("80000000").unwrap(), 8);
        assert_eq!(active_zone("00010000").unwrap(), 9);
        assert_eq!(active_zone("00000080").unwrap(), 32);
        assert!(matches!(active_zone("2G"), Err(SipError::MalformedHex(_))));
    }

    #[test]
    fn unknown_opcode_is_rejected() {
        assert_eq!(
            decode_response("7F00", registry()),
            Err(SipError::UnknownResponseCode("7F".to_string()))
        );
    }

    #[test]
    fn wrong_length_is_rejected() {
        let err = decode_response("90173B", registry()).unwrap_err();
        assert_eq!(
            err,
            SipError::ResponseLengthMismatch {
                response: "CurrentTimeResponse".to_string(),
                expected: 4,
                actual: 6,
            }
        );
    }

    #[test]
    fn non_hex_payload_is_rejected() {
        assert!(matches!(decode_response("", registry()), Err(SipError::MalformedHex(_))));
        assert!(matches!(decode_response("9", registry()), Err(SipError::MalformedHex(_))));
        assert!(matches!(
            decode_response("90173BZZ", registry()),
            Err(SipError::MalformedHex(_))
        ));
        assert!(matches!(
            decode_response("9é173B09", registry()),
            Err(SipError::MalformedHex(_))
        ));
    }
}
