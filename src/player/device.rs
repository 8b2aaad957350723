//! Audio output device abstraction driven by the playback controller

use std::time::Duration;

/// Signals delivered asynchronously by an audio device
#[derive(Clone, Debug, PartialEq)]
pub enum DeviceEvent {
    /// Source data is decoded and ready; duration if the decoder knows it
    Loaded { duration: Option<Duration> },
    /// Output actually started after a load or resume
    Started,
    TimeUpdate(Duration),
    Ended,
    Failed(String),
}

/// A single-source audio output.
///
/// Every call is fire-and-forget: outcomes come back later as
/// [`DeviceEvent`]s on the device's event channel.
pub trait AudioDevice {
    /// Replace the current source and start playback once it is ready
    fn load(&mut self, url: &str);
    fn play(&mut self);
    fn pause(&mut self);
    /// Detach the source so the device releases whatever it holds
    fn unload(&mut self);
    fn seek(&mut self, position: Duration);
    /// Linear gain in `0.0..=1.0`
    fn set_volume(&mut self, volume: f32);
    fn set_muted(&mut self, muted: bool);
    fn has_source(&self) -> bool;
}

#[cfg(test)]
pub mod mock {
    use super::*;

    #[derive(Clone, Debug, PartialEq)]
    pub enum Call {
        Load(String),
        Play,
        Pause,
        Unload,
        Seek(Duration),
        Volume(f32),
        Muted(bool),
    }

    /// Records every call so tests can assert on what reached the device
    #[derive(Default)]
    pub struct MockDevice {
        pub calls: Vec<Call>,
        pub source: Option<String>,
        pub volume: f32,
        pub muted: bool,
    }

    impl MockDevice {
        pub fn take_calls(&mut self) -> Vec<Call> {
            std::mem::take(&mut self.calls)
        }
    }

    impl AudioDevice for MockDevice {
        fn load(&mut self, url: &str) {
            self.source = Some(url.to_string());
            self.calls.push(Call::Load(url.to_string()));
        }

        fn play(&mut self) {
            self.calls.push(Call::Play);
        }

        fn pause(&mut self) {
            self.calls.push(Call::Pause);
        }

        fn unload(&mut self) {
            self.source = None;
            self.calls.push(Call::Unload);
        }

        fn seek(&mut self, position: Duration) {
            self.calls.push(Call::Seek(position));
        }

        fn set_volume(&mut self, volume: f32) {
            self.volume = volume;
            self.calls.push(Call::Volume(volume));
        }

        fn set_muted(&mut self, muted: bool) {
            self.muted = muted;
            self.calls.push(Call::Muted(muted));
        }

        fn has_source(&self) -> bool {
            self.source.is_some()
        }
    }
}
