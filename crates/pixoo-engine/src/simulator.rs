//! HTTP sink for the web simulator.
//!
//! The simulator takes the whole frame as a plain byte array:
//! `POST http://{address}/api/draw` with `{"buffer": [r, g, b, ...]}`.

use std::time::Duration;

use pixoo_core::{DisplayError, DisplaySink, FrameBuffer};
use pixoo_types::Rgb;
use serde::Serialize;
use tracing::info;

use crate::device::check_reply;

/// Request body for `/api/draw`.
#[derive(Debug, Serialize)]
struct DrawRequest<'a> {
    buffer: &'a [u8],
}

/// Frame sink backed by the web simulator.
#[derive(Debug)]
pub struct SimulatorSink {
    client: reqwest::Client,
    url: String,
    frame: FrameBuffer,
}

impl SimulatorSink {
    /// Create a sink for the simulator at `address` (`host:port`).
    pub fn new(address: &str, size: usize, timeout: Duration) -> Result<Self, DisplayError> {
        let address = address.trim();
        if address.is_empty() {
            return Err(DisplayError::InvalidAddress {
                address: address.to_owned(),
            });
        }
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| DisplayError::Transport {
                message: format!("failed to build HTTP client: {e}"),
            })?;
        let url = simulator_url(address);
        info!(%url, size, "Simulator sink ready");
        Ok(Self {
            client,
            url,
            frame: FrameBuffer::new(size),
        })
    }
}

impl DisplaySink for SimulatorSink {
    fn clear(&mut self, color: Rgb) {
        self.frame.clear(color);
    }

    fn draw_pixel(&mut self, x: i64, y: i64, color: Rgb) {
        self.frame.set(x, y, color);
    }

    async fn push(&mut self) -> Result<(), DisplayError> {
        let body = DrawRequest {
            buffer: self.frame.as_bytes(),
        };
        let response = self
            .client
            .post(&self.url)
            .json(&body)
            .send()
            .await
            .map_err(|e| DisplayError::Transport {
                message: format!("simulator request failed: {e}"),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(DisplayError::Protocol {
                command: String::from("draw"),
                message: format!("HTTP {status}"),
            });
        }
        let text = response.text().await.map_err(|e| DisplayError::Transport {
            message: format!("simulator response unreadable: {e}"),
        })?;
        check_reply("draw", &text)
    }
}

/// Accepts `host:port` or a full `http(s)://` base URL.
fn simulator_url(address: &str) -> String {
    let base = address.trim_end_matches('/');
    if base.starts_with("http://") || base.starts_with("https://") {
        format!("{base}/api/draw")
    } else {
        format!("http://{base}/api/draw")
    }
}
