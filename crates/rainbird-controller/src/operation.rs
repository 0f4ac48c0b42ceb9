/// Typed catalog of the controller operations.
///
/// Parameter types match their slot widths, so a typed operation always
/// builds a frame of the declared length. Use
/// [`Controller::request`](crate::Controller::request) for raw access.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    ModelAndVersion,
    /// Station bitmask of page 0.
    AvailableZones,
    /// Ask whether the controller implements a command opcode.
    CommandSupport { opcode: u8 },
    SerialNumber,
    Time,
    Date,
    WaterBudget { program: u8 },
    SeasonalAdjust { program: u8 },
    RainDelay,
    SetRainDelay { days: u16 },
    RunProgram { program: u8 },
    /// Run one zone; any other running zone stops.
    RunZone { zone: u16, minutes: u8 },
    /// Run every zone in turn.
    RunAllZones { minutes: u8 },
    RainSensorState,
    ActiveZone,
    StopIrrigation,
    AdvanceZone { zone: u8 },
    IrrigationState,
    SetIrrigationEnabled(bool),
    EventTimestamp { event: u8 },
    CombinedState,
}

impl Operation {
    /// Registry name of the command this operation sends.
    pub fn command_name(&self) -> &'static str {
        match self {
            Operation::ModelAndVersion => "ModelAndVersionRequest",
            Operation::AvailableZones => "AvailableStationsRequest",
            Operation::CommandSupport { .. } => "CommandSupportRequest",
            Operation::SerialNumber => "SerialNumberRequest",
            Operation::Time => "CurrentTimeRequest",
            Operation::Date => "CurrentDateRequest",
            Operation::WaterBudget { .. } => "WaterBudgetRequest",
            Operation::SeasonalAdjust { .. } => "ZonesSeasonalAdjustFactorRequest",
            Operation::RainDelay => "RainDelayGetRequest",
            Operation::SetRainDelay { .. } => "RainDelaySetRequest",
            Operation::RunProgram { .. } => "ManuallyRunProgramRequest",
            Operation::RunZone { .. } => "ManuallyRunStationRequest",
            Operation::RunAllZones { .. } => "TestStationsRequest",
            Operation::RainSensorState => "CurrentRainSensorStateRequest",
            Operation::ActiveZone => "CurrentStationsActiveRequest",
            Operation::StopIrrigation => "StopIrrigationRequest",
            Operation::AdvanceZone { .. } => "AdvanceStationRequest",
            Operation::IrrigationState => "CurrentIrrigationStateRequest",
            Operation::SetIrrigationEnabled(_) => "CurrentControllerStateSet",
            Operation::EventTimestamp { .. } => "ControllerEventTimestampRequest",
            Operation::CombinedState => "CombinedControllerStateRequest",
        }
    }

    /// Parameter values in slot order.
    pub fn params(&self) -> Vec<u64> {
        match *self {
            Operation::AvailableZones | Operation::ActiveZone => vec![0],
            Operation::CommandSupport { opcode } => vec![opcode.into()],
            Operation::WaterBudget { program }
            | Operation::SeasonalAdjust { program }
            | Operation::RunProgram { program } => vec![program.into()],
            Operation::SetRainDelay { days } => vec![days.into()],
            Operation::RunZone { zone, minutes } => vec![zone.into(), minutes.into()],
            Operation::RunAllZones { minutes } => vec![minutes.into()],
            Operation::AdvanceZone { zone } => vec![zone.into()],
            Operation::SetIrrigationEnabled(enabled) => vec![u64::from(enabled)],
            Operation::EventTimestamp { event } => vec![event.into()],
            Operation::ModelAndVersion
            | Operation::SerialNumber
            | Operation::Time
            | Operation::Date
            | Operation::RainDelay
            | Operation::RainSensorState
            | Operation::StopIrrigation
            | Operation::IrrigationState
            | Operation::CombinedState => Vec::new(),
        }
    }
}
