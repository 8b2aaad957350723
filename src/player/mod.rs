//! Player module - playback queue state machine and the audio device it drives
//!
//! - `device`: The `AudioDevice` capability and the events it emits
//! - `controller`: Queue, play mode and transport state machine
//! - `rodio_device`: rodio-backed device that streams from the catalog server
//! - `error`: Playback failure type

mod controller;
mod device;
mod error;
mod rodio_device;

pub use controller::{PlaybackController, PlayerSnapshot, PlayerState};
pub use device::DeviceEvent;
pub use error::PlaybackError;
pub use rodio_device::RodioDevice;
