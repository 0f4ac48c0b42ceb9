use rainbird_sip::{DecodedResponse, SipRegistry};
use rainbird_transport::{AsyncHttpTransport, AsyncTransport, TransportConfig};

use crate::config::ControllerConfig;
use crate::error::Result;
use crate::exchange::{complete, prepare, report};
use crate::operation::Operation;

/// Async client for one controller.
///
/// Runs the same pipeline as [`Controller`](crate::Controller); the
/// transport exchange is the only await point.
#[derive(Debug)]
pub struct AsyncController<T = AsyncHttpTransport> {
    config: ControllerConfig,
    transport: T,
    registry: &'static SipRegistry,
}

impl AsyncController<AsyncHttpTransport> {
    pub fn new(config: ControllerConfig) -> Result<Self> {
        Self::with_transport_config(config, TransportConfig::default())
    }

    pub fn with_transport_config(
        config: ControllerConfig,
        transport_config: TransportConfig,
    ) -> Result<Self> {
        let transport = AsyncHttpTransport::with_config(transport_config)?;
        Ok(Self::with_transport(config, transport))
    }
}

impl<T: AsyncTransport> AsyncController<T> {
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
    pub async fn request(&self, name: &str, params: &[u64]) -> Result<DecodedResponse> {
        report(name, self.exchange(name, params).await)
    }

    pub async fn execute(&self, operation: Operation) -> Result<DecodedResponse> {
        self.request(operation.command_name(), &operation.params()).await
    }

    async fn exchange(&self, name: &str, params: &[u64]) -> Result<DecodedResponse> {
        let prepared = prepare(&self.config, self.registry, name, params)?;
        let reply = self
            .transport
            .exchange(&self.config.address, prepared.body)
            .await?;
        complete(&self.config, self.registry, prepared.command, &reply)
    }

    pub async fn model_and_version(&self) -> Result<DecodedResponse> {
        self.execute(Operation::ModelAndVersion).await
    }

    pub async fn time(&self) -> Result<DecodedResponse> {
        self.execute(Operation::Time).await
    }

    pub async fn date(&self) -> Result<DecodedResponse> {
        self.execute(Operation::Date).await
    }

    pub async fn serial_number(&self) -> Result<DecodedResponse> {
        self.execute(Operation::SerialNumber).await
    }

    pub async fn rain_sensor_state(&self) -> Result<DecodedResponse> {
        self.execute(Operation::RainSensorState).await
    }

    pub async fn rain_delay(&self) -> Result<DecodedResponse> {
        self.execute(Operation::RainDelay).await
    }

    pub async fn available_zones(&self) -> Result<DecodedResponse> {
        self.execute(Operation::AvailableZones).await
    }

    pub async fn irrigation_state(&self) -> Result<DecodedResponse> {
        self.execute(Operation::IrrigationState).await
    }

    pub async fn active_zone(&self) -> Result<DecodedResponse> {
        self.execute(Operation::ActiveZone).await
    }

    pub async fn stop_irrigation(&self) -> Result<DecodedResponse> {
        self.execute(Operation::StopIrrigation).await
    }

    pub async fn set_rain_delay(&self, days: u16) -> Result<DecodedResponse> {
        self.execute(Operation::SetRainDelay { days }).await
    }

    pub async fn run_zone(&self, zone: u16, minutes: u8) -> Result<DecodedResponse> {
        self.execute(Operation::RunZone { zone, minutes }).await
    }

    pub async fn run_all_zones(&self, minutes: u8) -> Result<DecodedResponse> {
        self.execute(Operation::RunAllZones { minutes }).await
    }

    pub async fn run_program(&self, program: u8) -> Result<DecodedResponse> {
        self.execute(Operation::RunProgram { program }).await
    }

    pub async fn command_support(&self, opcode: u8) -> Result<DecodedResponse> {
        self.execute(Operation::CommandSupport { opcode }).await
    }

    pub async fn water_budget(&self, program: u8) -> Result<DecodedResponse> {
        self.execute(Operation::WaterBudget { program }).await
    }

    pub async fn seasonal_adjust(&self, program: u8) -> Result<DecodedResponse> {
        self.execute(Operation::SeasonalAdjust { program }).await
    }

    pub async fn advance_zone(&self, zone: u8) -> Result<DecodedResponse> {
        self.execute(Operation::AdvanceZone { zone }).await
    }

    pub async fn set_irrigation_enabled(&self, enabled: bool) -> Result<DecodedResponse> {
        self.execute(Operation::SetIrrigationEnabled(enabled)).await
    }

    pub async fn event_timestamp(&self, event: u8) -> Result<DecodedResponse> {
        self.execute(Operation::EventTimestamp { event }).await
    }

    pub async fn combined_state(&self) -> Result<DecodedResponse> {
        self.execute(Operation::CombinedState).await
    }
}
