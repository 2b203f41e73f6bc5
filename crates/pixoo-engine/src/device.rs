//! HTTP sink for a physical Pixoo device.
//!
//! Every command is a JSON object POSTed to `http://{ip}/post`. Frames go
//! out as `Draw/SendHttpGif` with the raw RGB bytes base64-encoded. The
//! device keys frames by a picture id; after `refresh_counter_limit` pushes
//! the id is reset with `Draw/ResetHttpGifId` so the device does not stall.

use std::net::Ipv4Addr;
use std::time::Duration;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use pixoo_core::{DisplayError, DisplaySink, FrameBuffer};
use pixoo_types::Rgb;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Frames per animation; always a single still.
const PIC_NUM: u32 = 1;

/// Animation speed reported to the device, in milliseconds.
const PIC_SPEED: u32 = 1000;

/// Maximum brightness accepted by the device.
pub const MAX_BRIGHTNESS: u8 = 100;

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

/// A command understood by the device's HTTP API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "Command")]
pub enum DeviceCommand {
    /// Show one frame.
    #[serde(rename = "Draw/SendHttpGif")]
    SendHttpGif {
        /// Number of frames in the animation.
        #[serde(rename = "PicNum")]
        pic_num: u32,
        /// Edge length of the frame.
        #[serde(rename = "PicWidth")]
        pic_width: usize,
        /// Index of this frame in the animation.
        #[serde(rename = "PicOffset")]
        pic_offset: u32,
        /// Picture id; must change between frames.
        #[serde(rename = "PicID")]
        pic_id: u32,
        /// Frame duration in milliseconds.
        #[serde(rename = "PicSpeed")]
        pic_speed: u32,
        /// Base64 of the `[r, g, b, ...]` bytes.
        #[serde(rename = "PicData")]
        pic_data: String,
    },

    /// Reset the device's picture id counter.
    #[serde(rename = "Draw/ResetHttpGifId")]
    ResetHttpGifId,

    /// Set screen brightness in `[0, 100]`.
    #[serde(rename = "Channel/SetBrightness")]
    SetBrightness {
        /// Brightness level.
        #[serde(rename = "Brightness")]
        brightness: u8,
    },
}

impl DeviceCommand {
    /// Encode `frame` as a single-frame animation with picture id `pic_id`.
    pub fn send_frame(frame: &FrameBuffer, pic_id: u32) -> Self {
        Self::SendHttpGif {
            pic_num: PIC_NUM,
            pic_width: frame.size(),
            pic_offset: 0,
            pic_id,
            pic_speed: PIC_SPEED,
            pic_data: STANDARD.encode(frame.as_bytes()),
        }
    }

    /// Human-readable command name for errors and logs.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::SendHttpGif { .. } => "Draw/SendHttpGif",
            Self::ResetHttpGifId => "Draw/ResetHttpGifId",
            Self::SetBrightness { .. } => "Channel/SetBrightness",
        }
    }
}

/// The device's reply. `error_code` is 0 on success.
#[derive(Debug, Deserialize)]
struct DeviceReply {
    #[serde(default)]
    error_code: i64,
}

// ---------------------------------------------------------------------------
// Picture id counter
// ---------------------------------------------------------------------------

/// The next picture id, and whether the device counter must be reset first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NextPic {
    /// Send `Draw/ResetHttpGifId` before the frame.
    pub reset_first: bool,
    /// Picture id for the frame.
    pub pic_id: u32,
}

/// Picture id bookkeeping.
///
/// The id starts at 1 and is incremented before every push. When it reaches
/// the limit the device counter is reset and the id restarts at 1. A limit
/// of 0 disables resets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PicCounter {
    value: u32,
    limit: u32,
}

impl PicCounter {
    /// A fresh counter.
    pub const fn new(limit: u32) -> Self {
        Self { value: 1, limit }
    }

    /// Advance for the next push.
    pub const fn advance(&mut self) -> NextPic {
        self.value = self.value.saturating_add(1);
        let reset_first = self.limit > 0 && self.value >= self.limit;
        if reset_first {
            self.value = 1;
        }
        NextPic {
            reset_first,
            pic_id: self.value,
        }
    }
}

// ---------------------------------------------------------------------------
// Sink
// ---------------------------------------------------------------------------

/// Frame sink backed by a device on the local network.
#[derive(Debug)]
pub struct DeviceSink {
    client: reqwest::Client,
    url: String,
    frame: FrameBuffer,
    counter: PicCounter,
}

impl DeviceSink {
    /// Create a sink for the device at `address`.
    ///
    /// # Errors
    ///
    /// Returns [`DisplayError::InvalidAddress`] unless `address` is an IPv4
    /// address, or [`DisplayError::Transport`] if the HTTP client cannot be
    /// built.
    pub fn new(
        address: &str,
        size: usize,
        refresh_counter_limit: u32,
        timeout: Duration,
    ) -> Result<Self, DisplayError> {
        let ip = parse_ipv4(address)?;
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| DisplayError::Transport {
                message: format!("failed to build HTTP client: {e}"),
            })?;
        info!(%ip, size, refresh_counter_limit, "Device sink ready");
        Ok(Self {
            client,
            url: device_url(ip),
            frame: FrameBuffer::new(size),
            counter: PicCounter::new(refresh_counter_limit),
        })
    }

    /// Set screen brightness, clamped to `[0, 100]`.
    pub async fn set_brightness(&self, level: u8) -> Result<(), DisplayError> {
        let command = DeviceCommand::SetBrightness {
            brightness: level.min(MAX_BRIGHTNESS),
        };
        self.send(&command).await
    }

    async fn send(&self, command: &DeviceCommand) -> Result<(), DisplayError> {
        let response = self
            .client
            .post(&self.url)
            .json(command)
            .send()
            .await
            .map_err(|e| DisplayError::Transport {
                message: format!("{} request failed: {e}", command.name()),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(DisplayError::Protocol {
                command: command.name().to_owned(),
                message: format!("HTTP {status}"),
            });
        }

        // Some firmware answers with an empty body; treat that as success.
        let body = response.text().await.map_err(|e| DisplayError::Transport {
            message: format!("{} response unreadable: {e}", command.name()),
        })?;
        check_reply(command.name(), &body)
    }
}

/// Fail if a reply body carries a non-zero `error_code`.
///
/// Bodies that are not JSON objects are accepted.
pub fn check_reply(command: &str, body: &str) -> Result<(), DisplayError> {
    match serde_json::from_str::<DeviceReply>(body) {
        Ok(reply) if reply.error_code != 0 => Err(DisplayError::Protocol {
            command: command.to_owned(),
            message: format!("error_code {}", reply.error_code),
        }),
        _ => Ok(()),
    }
}

impl DisplaySink for DeviceSink {
    fn clear(&mut self, color: Rgb) {
        self.frame.clear(color);
    }

    fn draw_pixel(&mut self, x: i64, y: i64, color: Rgb) {
        self.frame.set(x, y, color);
    }

    async fn push(&mut self) -> Result<(), DisplayError> {
        let next = self.counter.advance();
        if next.reset_first {
            debug!("Resetting device picture counter");
            self.send(&DeviceCommand::ResetHttpGifId).await?;
        }
        let command = DeviceCommand::send_frame(&self.frame, next.pic_id);
        self.send(&command).await
    }
}

/// Parse a device address, which must be a bare IPv4 address.
pub fn parse_ipv4(address: &str) -> Result<Ipv4Addr, DisplayError> {
    address
        .trim()
        .parse()
        .map_err(|e: std::net::AddrParseError| DisplayError::InvalidAddress {
            address: format!("{address} ({e})"),
        })
}

fn device_url(ip: Ipv4Addr) -> String {
    format!("http://{ip}/post")
}
