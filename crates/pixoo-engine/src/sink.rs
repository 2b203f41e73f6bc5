//! Display target selection.
//!
//! Uses enum dispatch instead of trait objects because `push` is async and
//! therefore not dyn-compatible.

use std::time::Duration;

use pixoo_core::{DisplayConfig, DisplayError, DisplaySink, DisplayTarget, MemorySink};
use pixoo_types::Rgb;
use tracing::info;

use crate::device::DeviceSink;
use crate::simulator::SimulatorSink;

/// The sink the engine renders into.
#[derive(Debug)]
pub enum EngineSink {
    /// A physical device.
    Device(DeviceSink),
    /// The web simulator.
    Simulator(SimulatorSink),
    /// In-memory only.
    Headless(MemorySink),
}

impl EngineSink {
    /// Build the sink described by `config` for frames of edge `size`.
    ///
    /// For a device with a configured brightness, the brightness is set
    /// before the first frame.
    pub async fn connect(config: &DisplayConfig, size: usize) -> Result<Self, DisplayError> {
        let timeout = Duration::from_millis(config.request_timeout_ms);
        match config.target {
            DisplayTarget::Device => {
                let sink = DeviceSink::new(
                    &config.address,
                    size,
                    config.refresh_counter_limit,
                    timeout,
                )?;
                if let Some(level) = config.brightness {
                    sink.set_brightness(level).await?;
                    info!(level, "Device brightness set");
                }
                Ok(Self::Device(sink))
            }
            DisplayTarget::Simulator => Ok(Self::Simulator(SimulatorSink::new(
                &config.address,
                size,
                timeout,
            )?)),
            DisplayTarget::Headless => Ok(Self::Headless(MemorySink::new(size))),
        }
    }

    /// Human-readable name for logging.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Device(_) => "device",
            Self::Simulator(_) => "simulator",
            Self::Headless(_) => "headless",
        }
    }
}

impl DisplaySink for EngineSink {
    fn clear(&mut self, color: Rgb) {
        match self {
            Self::Device(sink) => sink.clear(color),
            Self::Simulator(sink) => sink.clear(color),
            Self::Headless(sink) => sink.clear(color),
        }
    }

    fn draw_pixel(&mut self, x: i64, y: i64, color: Rgb) {
        match self {
            Self::Device(sink) => sink.draw_pixel(x, y, color),
            Self::Simulator(sink) => sink.draw_pixel(x, y, color),
            Self::Headless(sink) => sink.draw_pixel(x, y, color),
        }
    }

    async fn push(&mut self) -> Result<(), DisplayError> {
        match self {
            Self::Device(sink) => sink.push().await,
            Self::Simulator(sink) => sink.push().await,
            Self::Headless(sink) => sink.push().await,
        }
    }
}
