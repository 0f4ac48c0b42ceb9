use rainbird_sip::{DecodedResponse, SipRegistry};
use rainbird_transport::{HttpTransport, Transport, TransportConfig};

use crate::config::ControllerConfig;
use crate::error::Result;
use crate::exchange::{complete, prepare, report};
use crate::operation::Operation;

/// Blocking client for one controller.
///
/// Every call is one independent exchange: nothing is cached, retried or
/// shared between calls apart from the configuration. A controller is
/// `Send + Sync` when its transport is, and concurrent calls each seal with
/// their own IV.
#[derive(Debug)]
pub struct Controller<T = HttpTransport> {
    config: ControllerConfig,
    transport: T,
    registry: &'static SipRegistry,
}

impl Controller<HttpTransport> {
    /// Create a controller using the default HTTP transport.
    pub fn new(config: ControllerConfig) -> Result<Self> {
        Self::with_transport_config(config, TransportConfig::default())
    }

    /// Create a controller using an HTTP transport with explicit settings.
    pub fn with_transport_config(
        config: ControllerConfig,
        transport_config: TransportConfig,
    ) -> Result<Self> {
        let transport = HttpTransport::with_config(transport_config)?;
        Ok(Self::with_transport(config, transport))
    }
}

impl<T: Transport> Controller<T> {
    pub fn with_transport(config: ControllerConfig, transport: T) -> Self {
        Self {
            config,
            transport,
            registry: SipRegistry::standard(),
        }
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Send a command by registry name with raw parameter values.
    pub fn request(&self, name: &str, params: &[u64]) -> Result<DecodedResponse> {
        report(name, self.exchange(name, params))
    }

    /// Run a typed operation.
    pub fn execute(&self, operation: Operation) -> Result<DecodedResponse> {
        self.request(operation.command_name(), &operation.params())
    }

    fn exchange(&self, name: &str, params: &[u64]) -> Result<DecodedResponse> {
        let prepared = prepare(&self.config, self.registry, name, params)?;
        let reply = self.transport.exchange(&self.config.address, prepared.body)?;
        complete(&self.config, self.registry, prepared.command, &reply)
    }

    /// Model id and protocol revision.
    pub fn model_and_version(&self) -> Result<DecodedResponse> {
        self.execute(Operation::ModelAndVersion)
    }

    pub fn time(&self) -> Result<DecodedResponse> {
        self.execute(Operation::Time)
    }

    pub fn date(&self) -> Result<DecodedResponse> {
        self.execute(Operation::Date)
    }

    pub fn serial_number(&self) -> Result<DecodedResponse> {
        self.execute(Operation::SerialNumber)
    }

    pub fn rain_sensor_state(&self) -> Result<DecodedResponse> {
        self.execute(Operation::RainSensorState)
    }

    /// Current rain delay in days.
    pub fn rain_delay(&self) -> Result<DecodedResponse> {
        self.execute(Operation::RainDelay)
    }

    /// Bitmask of the installed zones.
    pub fn available_zones(&self) -> Result<DecodedResponse> {
        self.execute(Operation::AvailableZones)
    }

    pub fn irrigation_state(&self) -> Result<DecodedResponse> {
        self.execute(Operation::IrrigationState)
    }

    /// Number of the running zone under `active_zones`, 0 when idle.
    pub fn active_zone(&self) -> Result<DecodedResponse> {
        self.execute(Operation::ActiveZone)
    }

    pub fn stop_irrigation(&self) -> Result<DecodedResponse> {
        self.execute(Operation::StopIrrigation)
    }

    pub fn set_rain_delay(&self, days: u16) -> Result<DecodedResponse> {
        self.execute(Operation::SetRainDelay { days })
    }

    pub fn run_zone(&self, zone: u16, minutes: u8) -> Result<DecodedResponse> {
        self.execute(Operation::RunZone { zone, minutes })
    }

    pub fn run_all_zones(&self, minutes: u8) -> Result<DecodedResponse> {
        self.execute(Operation::RunAllZones { minutes })
    }

    pub fn run_program(&self, program: u8) -> Result<DecodedResponse> {
        self.execute(Operation::RunProgram { program })
    }

    pub fn command_support(&self, opcode: u8) -> Result<DecodedResponse> {
        self.execute(Operation::CommandSupport { opcode })
    }

    pub fn water_budget(&self, program: u8) -> Result<DecodedResponse> {
        self.execute(Operation::WaterBudget { program })
    }

    pub fn seasonal_adjust(&self, program: u8) -> Result<DecodedResponse> {
        self.execute(Operation::SeasonalAdjust { program })
    }

    pub fn advance_zone(&self, zone: u8) -> Result<DecodedResponse> {
        self.execute(Operation::AdvanceZone { zone })
    }

    pub fn set_irrigation_enabled(&self, enabled: bool) -> Result<DecodedResponse> {
        self.execute(Operation::SetIrrigationEnabled(enabled))
    }

    pub fn event_timestamp(&self, event: u8) -> Result<DecodedResponse> {
        self.execute(Operation::EventTimestamp { event })
    }

    /// Time, date, rain and irrigation state in one reply.
    pub fn combined_state(&self) -> Result<DecodedResponse> {
        self.execute(Operation::CombinedState)
    }
}
