//! Playback queue controller: current track, queue, play mode and device state

use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::model::{Song, StreamUrls};
use super::device::{AudioDevice, DeviceEvent};
use super::error::PlaybackError;

pub const DEFAULT_VOLUME: u8 = 80;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum PlayMode {
    #[default]
    Sequential,
    RepeatOne,
    Shuffle,
}

impl PlayMode {
    pub fn next(self) -> Self {
        match self {
            PlayMode::Sequential => PlayMode::RepeatOne,
            PlayMode::RepeatOne => PlayMode::Shuffle,
            PlayMode::Shuffle => PlayMode::Sequential,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PlayMode::Sequential => "Sequential",
            PlayMode::RepeatOne => "Repeat one",
            PlayMode::Shuffle => "Shuffle",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum PlayerState {
    #[default]
    Idle,
    Loading,
    Playing,
    Paused,
}

/// Everything the UI needs to render the player, copied out under the lock
#[derive(Clone, Debug, Default)]
pub struct PlayerSnapshot {
    pub current_track: Option<Song>,
    pub state: PlayerState,
    pub elapsed: Duration,
    pub duration: Option<Duration>,
    pub volume: u8,
    pub muted: bool,
    pub mode: PlayMode,
    pub queue: Vec<Song>,
    pub current_index: Option<usize>,
    pub has_previous: bool,
    pub has_next: bool,
    pub last_error: Option<String>,
}

impl PlayerSnapshot {
    pub fn progress_percent(&self) -> f64 {
        match self.duration {
            Some(total) if !total.is_zero() => {
                (self.elapsed.as_secs_f64() / total.as_secs_f64() * 100.0).clamp(0.0, 100.0)
            }
            _ => 0.0,
        }
    }

    pub fn is_playing(&self) -> bool {
        self.state == PlayerState::Playing
    }
}

pub struct PlaybackController<D: AudioDevice> {
    device: D,
    streams: StreamUrls,
    rng: StdRng,
    current_track: Option<Song>,
    state: PlayerState,
    elapsed: Duration,
    duration: Option<Duration>,
    volume: u8,
    muted: bool,
    mode: PlayMode,
    queue: Vec<Song>,
    position: Option<usize>,
    last_error: Option<String>,
}

impl<D: AudioDevice> PlaybackController<D> {
    pub fn new(device: D, streams: StreamUrls) -> Self {
        Self::with_rng(device, streams, StdRng::from_entropy())
    }

    pub fn with_rng(device: D, streams: StreamUrls, rng: StdRng) -> Self {
        Self {
            device,
            streams,
            rng,
            current_track: None,
            state: PlayerState::Idle,
            elapsed: Duration::ZERO,
            duration: None,
            volume: DEFAULT_VOLUME,
            muted: false,
            mode: PlayMode::Sequential,
            queue: Vec::new(),
            position: None,
            last_error: None,
        }
    }

    // ========================================================================
    // Observation
    // ========================================================================

    pub fn snapshot(&self) -> PlayerSnapshot {
        PlayerSnapshot {
            current_track: self.current_track.clone(),
            state: self.state,
            elapsed: self.elapsed,
            duration: self.duration,
            volume: self.volume,
            muted: self.muted,
            mode: self.mode,
            queue: self.queue.clone(),
            current_index: self.position,
            has_previous: self.has_previous(),
            has_next: self.has_next(),
            last_error: self.last_error.clone(),
        }
    }

    pub fn state(&self) -> PlayerState {
        self.state
    }

    pub fn current_track(&self) -> Option<&Song> {
        self.current_track.as_ref()
    }

    pub fn position(&self) -> Option<usize> {
        self.position
    }

    pub fn queue(&self) -> &[Song] {
        &self.queue
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    pub fn volume(&self) -> u8 {
        self.volume
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    pub fn mode(&self) -> PlayMode {
        self.mode
    }

    // Both flags only look at queue length; wrap-around makes every
    // position have a neighbour once there are two tracks.
    pub fn has_previous(&self) -> bool {
        self.queue.len() > 1
    }

    pub fn has_next(&self) -> bool {
        self.queue.len() > 1
    }

    #[cfg(test)]
    pub(crate) fn device(&mut self) -> &mut D {
        &mut self.device
    }

    // ========================================================================
    // Transport
    // ========================================================================

    pub fn play(&mut self, track: &Song) {
        let same_track = self.current_track.as_ref().is_some_and(|t| t.id == track.id);
        if same_track && self.device.has_source() && self.state != PlayerState::Idle {
            self.toggle_play();
            return;
        }

        let url = self.streams.stream_url(track.id);
        tracing::info!(song_id = track.id, title = %track.title, "Loading track");

        self.current_track = Some(track.clone());
        self.position = self.queue.iter().position(|s| s.id == track.id);
        self.state = PlayerState::Loading;
        self.elapsed = Duration::ZERO;
        self.duration = None;
        self.last_error = None;

        self.device.load(&url);
        self.device.set_volume(self.volume as f32 / 100.0);
        self.device.set_muted(self.muted);
    }

    pub fn play_with_queue(&mut self, track: &Song, list: &[Song]) {
        self.queue = list.to_vec();

        match self.queue.iter().position(|s| s.id == track.id) {
            Some(index) => {
                self.position = Some(index);
                self.play(track);
            }
            None => {
                tracing::debug!(song_id = track.id, "Track not in supplied list, nothing to play");
                self.position = None;
            }
        }
    }

    pub fn toggle_play(&mut self) {
        match self.state {
            PlayerState::Idle => {}
            PlayerState::Playing => {
                self.device.pause();
                self.state = PlayerState::Paused;
            }
            PlayerState::Paused | PlayerState::Loading => {
                self.device.play();
                self.state = PlayerState::Playing;
            }
        }
    }

    pub fn stop(&mut self) {
        self.device.pause();
        self.device.unload();
        self.elapsed = Duration::ZERO;
        self.duration = None;
        self.current_track = None;
        self.position = None;
        self.state = PlayerState::Idle;
    }

    pub fn seek(&mut self, percentage: f64) {
        if !percentage.is_finite() {
            return;
        }
        let Some(total) = self.duration.filter(|d| !d.is_zero()) else {
            return;
        };

        let target = total.mul_f64(percentage.clamp(0.0, 100.0) / 100.0);
        self.elapsed = target;
        self.device.seek(target);
    }

    /// Seek relative to the current progress, in percentage points
    pub fn seek_by(&mut self, delta_percent: f64) {
        let current = self.snapshot_progress();
        self.seek(current + delta_percent);
    }

    fn snapshot_progress(&self) -> f64 {
        match self.duration {
            Some(total) if !total.is_zero() => self.elapsed.as_secs_f64() / total.as_secs_f64() * 100.0,
            _ => 0.0,
        }
    }

    pub fn set_volume(&mut self, volume: i32) {
        self.volume = volume.clamp(0, 100) as u8;
        self.device.set_volume(self.volume as f32 / 100.0);

        if self.volume > 0 && self.muted {
            self.toggle_mute();
        }
    }

    pub fn toggle_mute(&mut self) {
        self.muted = !self.muted;
        self.device.set_muted(self.muted);
    }

    // ========================================================================
    // Queue navigation
    // ========================================================================

    pub fn next_song(&mut self) {
        if self.mode == PlayMode::RepeatOne {
            self.restart_current();
            return;
        }

        if !self.has_next() {
            return;
        }

        match self.mode {
            PlayMode::Shuffle => self.play_random(),
            _ => {
                let len = self.queue.len();
                let next = self.position.map_or(0, |i| (i + 1) % len);
                self.play_by_index(next);
            }
        }
    }

    pub fn previous_song(&mut self) {
        if !self.has_previous() {
            return;
        }

        match self.mode {
            PlayMode::Shuffle => self.play_random(),
            _ => {
                let len = self.queue.len();
                let prev = self.position.map_or(len - 1, |i| (i + len - 1) % len);
                self.play_by_index(prev);
            }
        }
    }

    pub fn play_by_index(&mut self, index: usize) {
        let Some(track) = self.queue.get(index).cloned() else {
            return;
        };

        self.position = Some(index);
        self.play(&track);
    }

    pub fn toggle_play_mode(&mut self) {
        self.mode = self.mode.next();
        tracing::debug!(mode = self.mode.label(), "Play mode changed");
    }

    fn restart_current(&mut self) {
        let Some(track) = self.current_track.clone() else {
            return;
        };

        // A failed load leaves nothing on the device to rewind
        if self.state == PlayerState::Idle {
            self.play(&track);
            return;
        }

        self.elapsed = Duration::ZERO;
        self.device.seek(Duration::ZERO);

        if self.state != PlayerState::Loading {
            self.device.play();
            self.state = PlayerState::Playing;
        }
    }

    fn play_random(&mut self) {
        let len = self.queue.len();
        if len <= 1 {
            return;
        }

        let index = loop {
            let candidate = self.rng.gen_range(0..len);
            if Some(candidate) != self.position {
                break candidate;
            }
        };
        self.play_by_index(index);
    }

    // ========================================================================
    // Queue mutation
    // ========================================================================

    pub fn add_to_queue(&mut self, track: &Song) {
        if !self.queue.iter().any(|s| s.id == track.id) {
            self.queue.push(track.clone());
        }
    }

    pub fn remove_from_queue(&mut self, song_id: i64) {
        let Some(removed) = self.queue.iter().position(|s| s.id == song_id) else {
            return;
        };

        let was_current = self.current_track.as_ref().is_some_and(|t| t.id == song_id);
        self.queue.remove(removed);

        if was_current {
            if self.queue.is_empty() {
                self.stop();
            } else {
                self.play_by_index(removed % self.queue.len());
            }
        } else if let Some(current) = self.position {
            if removed < current {
                self.position = Some(current - 1);
            }
        }
    }

    pub fn clear_queue(&mut self) {
        self.stop();
        self.queue.clear();
    }

    // ========================================================================
    // Device events
    // ========================================================================

    /// Apply a device signal. Playback failures are absorbed into state and
    /// handed back so the caller can show them; they never propagate further.
    pub fn handle_device_event(&mut self, event: DeviceEvent) -> Option<PlaybackError> {
        if self.current_track.is_none() {
            tracing::trace!(?event, "Device event with no current track, ignoring");
            return None;
        }

        match event {
            DeviceEvent::Loaded { duration } => {
                self.duration = duration
                    .filter(|d| !d.is_zero())
                    .or_else(|| self.current_track.as_ref().and_then(Song::catalog_duration));
                None
            }
            DeviceEvent::Started => {
                if self.state == PlayerState::Loading {
                    self.state = PlayerState::Playing;
                }
                None
            }
            DeviceEvent::TimeUpdate(position) => {
                if matches!(self.state, PlayerState::Playing | PlayerState::Paused) {
                    self.elapsed = position;
                }
                None
            }
            DeviceEvent::Ended => {
                tracing::debug!("Track ended, advancing");
                self.state = PlayerState::Paused;
                self.next_song();
                None
            }
            DeviceEvent::Failed(reason) => {
                let error = PlaybackError::Device {
                    song_id: self.current_track.as_ref().map(|t| t.id).unwrap_or_default(),
                    reason,
                };
                tracing::error!(error = %error, "Audio playback error");
                self.state = PlayerState::Idle;
                self.last_error = Some(error.to_string());
                Some(error)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::device::mock::{Call, MockDevice};

    fn song(id: i64) -> Song {
        serde_json::from_value(serde_json::json!({
            "id": id,
            "title": format!("Song {id}"),
            "artist": "Artist",
            "duration": 200,
        }))
        .unwrap()
    }

    fn songs(ids: &[i64]) -> Vec<Song> {
        ids.iter().map(|&id| song(id)).collect()
    }

    fn controller() -> PlaybackController<MockDevice> {
        let streams = StreamUrls::new("http://localhost:8000").unwrap();
        PlaybackController::with_rng(MockDevice::default(), streams, StdRng::seed_from_u64(7))
    }

    fn started(ids: &[i64], start: i64) -> PlaybackController<MockDevice> {
        let mut player = controller();
        let list = songs(ids);
        let track = list.iter().find(|s| s.id == start).unwrap().clone();
        player.play_with_queue(&track, &list);
        player.handle_device_event(DeviceEvent::Loaded { duration: Some(Duration::from_secs(100)) });
        player.handle_device_event(DeviceEvent::Started);
        player
    }

    fn current_id<D: AudioDevice>(player: &PlaybackController<D>) -> Option<i64> {
        player.current_track().map(|t| t.id)
    }

    #[test]
    fn play_with_queue_points_at_track() {
        let player = started(&[1, 2, 3], 2);

        assert_eq!(current_id(&player), Some(2));
        assert_eq!(player.position(), Some(1));
        assert_eq!(player.queue()[1].id, 2);
        assert_eq!(player.state(), PlayerState::Playing);
    }

    #[test]
    fn play_with_queue_missing_track_is_noop() {
        let mut player = controller();
        player.play_with_queue(&song(9), &songs(&[1, 2]));

        assert_eq!(player.queue().len(), 2);
        assert_eq!(player.position(), None);
        assert_eq!(player.current_track(), None);
        assert_eq!(player.state(), PlayerState::Idle);
        assert!(player.device().calls.is_empty());
    }

    #[test]
    fn play_enters_loading_until_device_confirms() {
        let mut player = controller();
        player.play(&song(5));

        assert_eq!(player.state(), PlayerState::Loading);
        assert_eq!(
            player.device().calls[0],
            Call::Load("http://localhost:8000/songs/5/stream".to_string())
        );

        player.handle_device_event(DeviceEvent::Started);
        assert_eq!(player.state(), PlayerState::Playing);
    }

    #[test]
    fn play_attaches_token_as_query_parameter() {
        let streams = StreamUrls::new("http://localhost:8000").unwrap().with_token(Some("a b+c".into()));
        let mut player = PlaybackController::with_rng(MockDevice::default(), streams, StdRng::seed_from_u64(1));
        player.play(&song(5));

        assert_eq!(
            player.device().source.as_deref(),
            Some("http://localhost:8000/songs/5/stream?token=a+b%2Bc")
        );
    }

    #[test]
    fn playing_same_track_toggles() {
        let mut player = started(&[1, 2], 1);
        player.device().take_calls();

        player.play(&song(1));
        assert_eq!(player.state(), PlayerState::Paused);
        assert_eq!(player.device().take_calls(), vec![Call::Pause]);

        player.play(&song(1));
        assert_eq!(player.state(), PlayerState::Playing);
        assert_eq!(player.device().take_calls(), vec![Call::Play]);
    }

    #[test]
    fn loaded_falls_back_to_catalog_duration() {
        let mut player = controller();
        player.play(&song(1));
        player.handle_device_event(DeviceEvent::Loaded { duration: None });

        assert_eq!(player.snapshot().duration, Some(Duration::from_secs(200)));
    }

    #[test]
    fn device_failure_keeps_track_and_reports() {
        let mut player = controller();
        player.play(&song(3));

        let error = player.handle_device_event(DeviceEvent::Failed("network error".into()));

        assert!(matches!(error, Some(PlaybackError::Device { song_id: 3, .. })));
        assert_eq!(player.state(), PlayerState::Idle);
        assert_eq!(current_id(&player), Some(3));
        assert!(player.snapshot().last_error.is_some());

        // Re-selecting the failed track reloads it instead of toggling
        player.device().take_calls();
        player.play(&song(3));
        assert_eq!(player.state(), PlayerState::Loading);
        assert!(matches!(player.device().calls[0], Call::Load(_)));
        assert!(player.snapshot().last_error.is_none());
    }

    #[test]
    fn toggle_play_when_idle_is_noop() {
        let mut player = controller();
        player.toggle_play();

        assert_eq!(player.state(), PlayerState::Idle);
        assert!(player.device().calls.is_empty());
    }

    #[test]
    fn sequential_wraps_both_ways() {
        let mut player = started(&[1, 2, 3], 3);
        assert_eq!(player.position(), Some(2));

        player.next_song();
        assert_eq!(player.position(), Some(0));
        assert_eq!(current_id(&player), Some(1));

        player.previous_song();
        assert_eq!(player.position(), Some(2));
        assert_eq!(current_id(&player), Some(3));
    }

    #[test]
    fn skipping_needs_more_than_one_track() {
        let mut player = started(&[1], 1);
        player.device().take_calls();

        player.next_song();
        player.previous_song();

        assert_eq!(player.position(), Some(0));
        assert!(player.device().calls.is_empty());
    }

    #[test]
    fn repeat_one_restarts_without_moving() {
        for ids in [&[1][..], &[1, 2, 3][..]] {
            let mut player = started(ids, 1);
            player.toggle_play_mode();
            assert_eq!(player.mode(), PlayMode::RepeatOne);

            player.handle_device_event(DeviceEvent::TimeUpdate(Duration::from_secs(42)));
            assert_eq!(player.elapsed(), Duration::from_secs(42));

            player.device().take_calls();
            player.next_song();

            assert_eq!(player.position(), Some(0));
            assert_eq!(player.elapsed(), Duration::ZERO);
            assert_eq!(player.state(), PlayerState::Playing);
            assert_eq!(player.device().take_calls(), vec![Call::Seek(Duration::ZERO), Call::Play]);
        }
    }

    #[test]
    fn repeat_one_reloads_after_failure() {
        let mut player = started(&[1, 2], 1);
        player.handle_device_event(DeviceEvent::Failed("unsupported format".into()));
        player.toggle_play_mode();
        player.device().take_calls();

        player.next_song();

        assert_eq!(player.state(), PlayerState::Loading);
        assert_eq!(player.position(), Some(0));
        assert_eq!(
            player.device().calls[0],
            Call::Load("http://localhost:8000/songs/1/stream".to_string())
        );
    }

    #[test]
    fn shuffle_never_repeats_previous_index() {
        let mut player = started(&[1, 2, 3, 4], 1);
        player.toggle_play_mode();
        player.toggle_play_mode();
        assert_eq!(player.mode(), PlayMode::Shuffle);

        for _ in 0..200 {
            let before = player.position();
            player.next_song();
            assert_ne!(player.position(), before);
            assert!(player.position().unwrap() < 4);
        }
    }

    #[test]
    fn shuffle_with_two_tracks_alternates() {
        let mut player = started(&[1, 2], 1);
        player.toggle_play_mode();
        player.toggle_play_mode();

        player.next_song();
        assert_eq!(player.position(), Some(1));
        player.previous_song();
        assert_eq!(player.position(), Some(0));
    }

    #[test]
    fn play_mode_cycles() {
        assert_eq!(PlayMode::Sequential.next(), PlayMode::RepeatOne);
        assert_eq!(PlayMode::RepeatOne.next(), PlayMode::Shuffle);
        assert_eq!(PlayMode::Shuffle.next(), PlayMode::Sequential);
    }

    #[test]
    fn volume_clamps_and_unmutes() {
        let mut player = controller();

        player.set_volume(150);
        assert_eq!(player.volume(), 100);
        player.set_volume(-5);
        assert_eq!(player.volume(), 0);

        player.toggle_mute();
        assert!(player.is_muted());
        player.set_volume(0);
        assert!(player.is_muted());

        player.set_volume(30);
        assert_eq!(player.volume(), 30);
        assert!(!player.is_muted());
        assert!(!player.device().muted);
        assert_eq!(player.device().volume, 0.3);
    }

    #[test]
    fn seek_requires_known_duration() {
        let mut player = controller();
        player.play(&song(1));
        player.device().take_calls();

        player.seek(50.0);
        assert!(player.device().calls.is_empty());

        player.handle_device_event(DeviceEvent::Loaded { duration: Some(Duration::from_secs(100)) });
        player.seek(25.0);
        assert_eq!(player.elapsed(), Duration::from_secs(25));

        player.seek(140.0);
        assert_eq!(player.elapsed(), Duration::from_secs(100));
        assert_eq!(
            player.device().take_calls(),
            vec![Call::Seek(Duration::from_secs(25)), Call::Seek(Duration::from_secs(100))]
        );
    }

    #[test]
    fn seek_ignores_non_finite_percentages() {
        let mut player = started(&[1], 1);
        player.seek(25.0);
        player.device().take_calls();

        player.seek(f64::NAN);
        player.seek(f64::INFINITY);

        assert_eq!(player.elapsed(), Duration::from_secs(25));
        assert!(player.device().calls.is_empty());
    }

    #[test]
    fn stop_is_idempotent() {
        let mut player = started(&[1, 2], 2);

        player.stop();
        let first = player.snapshot();
        player.stop();
        let second = player.snapshot();

        for snap in [&first, &second] {
            assert_eq!(snap.state, PlayerState::Idle);
            assert_eq!(snap.current_track, None);
            assert_eq!(snap.current_index, None);
            assert_eq!(snap.elapsed, Duration::ZERO);
        }
        assert_eq!(first.queue, second.queue);
        assert!(!player.device().has_source());
    }

    #[test]
    fn add_to_queue_is_idempotent() {
        let mut player = controller();
        player.add_to_queue(&song(4));
        player.add_to_queue(&song(4));

        assert_eq!(player.queue().iter().filter(|s| s.id == 4).count(), 1);
    }

    #[test]
    fn removing_current_track_advances_into_slot() {
        let mut player = started(&[1, 2, 3], 2);
        player.remove_from_queue(2);

        assert_eq!(player.position(), Some(1));
        assert_eq!(current_id(&player), Some(3));
        assert_eq!(player.state(), PlayerState::Loading);
    }

    #[test]
    fn removing_current_last_slot_wraps() {
        let mut player = started(&[1, 2, 3], 3);
        player.remove_from_queue(3);

        assert_eq!(player.position(), Some(0));
        assert_eq!(current_id(&player), Some(1));
    }

    #[test]
    fn removing_earlier_track_keeps_current() {
        let mut player = started(&[1, 2, 3], 3);
        player.remove_from_queue(1);

        assert_eq!(player.position(), Some(1));
        assert_eq!(current_id(&player), Some(3));
        assert_eq!(player.queue()[1].id, 3);
    }

    #[test]
    fn removing_later_track_keeps_position() {
        let mut player = started(&[1, 2, 3], 1);
        player.remove_from_queue(3);

        assert_eq!(player.position(), Some(0));
        assert_eq!(player.state(), PlayerState::Playing);
    }

    #[test]
    fn removing_last_track_goes_idle() {
        let mut player = started(&[1], 1);
        player.remove_from_queue(1);

        assert!(player.queue().is_empty());
        assert_eq!(player.position(), None);
        assert_eq!(player.current_track(), None);
        assert_eq!(player.state(), PlayerState::Idle);
    }

    #[test]
    fn removal_never_leaves_position_out_of_bounds() {
        for target in 1..=4 {
            for start in 1..=4 {
                let mut player = started(&[1, 2, 3, 4], start);
                player.remove_from_queue(target);

                if let Some(i) = player.position() {
                    assert!(i < player.queue().len());
                    assert_eq!(player.queue()[i].id, current_id(&player).unwrap());
                }
            }
        }
    }

    #[test]
    fn removing_unknown_id_is_noop() {
        let mut player = started(&[1, 2], 1);
        player.remove_from_queue(42);

        assert_eq!(player.queue().len(), 2);
        assert_eq!(player.position(), Some(0));
    }

    #[test]
    fn clear_queue_stops_and_empties() {
        let mut player = started(&[1, 2, 3], 2);
        player.clear_queue();

        assert!(player.queue().is_empty());
        assert_eq!(player.state(), PlayerState::Idle);
        assert_eq!(player.current_track(), None);
    }

    #[test]
    fn ended_advances_sequentially() {
        let mut player = started(&[1, 2], 1);
        player.handle_device_event(DeviceEvent::Ended);

        assert_eq!(current_id(&player), Some(2));
        assert_eq!(player.state(), PlayerState::Loading);
    }

    #[test]
    fn ended_single_track_pauses() {
        let mut player = started(&[1], 1);
        player.handle_device_event(DeviceEvent::Ended);

        assert_eq!(current_id(&player), Some(1));
        assert_eq!(player.state(), PlayerState::Paused);
    }

    #[test]
    fn ended_repeat_one_restarts() {
        let mut player = started(&[1, 2, 3], 2);
        player.toggle_play_mode();
        player.handle_device_event(DeviceEvent::TimeUpdate(Duration::from_secs(99)));
        player.device().take_calls();

        player.handle_device_event(DeviceEvent::Ended);

        assert_eq!(player.position(), Some(1));
        assert_eq!(current_id(&player), Some(2));
        assert_eq!(player.elapsed(), Duration::ZERO);
        assert_eq!(player.state(), PlayerState::Playing);
        assert_eq!(player.device().take_calls(), vec![Call::Seek(Duration::ZERO), Call::Play]);
    }

    #[test]
    fn ended_shuffle_picks_other_index() {
        let mut player = started(&[1, 2, 3, 4], 3);
        player.toggle_play_mode();
        player.toggle_play_mode();

        for _ in 0..50 {
            let before = player.position();
            player.handle_device_event(DeviceEvent::Ended);

            assert_ne!(player.position(), before);
            assert_eq!(player.state(), PlayerState::Loading);
            player.handle_device_event(DeviceEvent::Started);
        }
    }

    #[test]
    fn events_after_stop_are_ignored() {
        let mut player = started(&[1, 2], 1);
        player.stop();

        assert!(player.handle_device_event(DeviceEvent::Failed("late".into())).is_none());
        player.handle_device_event(DeviceEvent::Started);
        assert_eq!(player.state(), PlayerState::Idle);
    }

    #[test]
    fn direct_play_outside_queue_clears_position() {
        let mut player = started(&[1, 2], 2);
        player.play(&song(9));

        assert_eq!(player.position(), None);
        player.next_song();
        assert_eq!(player.position(), Some(0));
    }

    #[test]
    fn neighbour_flags_follow_queue_length() {
        let mut player = controller();
        assert!(!player.snapshot().has_next);

        player.add_to_queue(&song(1));
        assert!(!player.snapshot().has_previous);

        player.add_to_queue(&song(2));
        let snap = player.snapshot();
        assert!(snap.has_previous && snap.has_next);
    }

    #[test]
    fn progress_percent_handles_unknown_duration() {
        let mut snap = PlayerSnapshot::default();
        assert_eq!(snap.progress_percent(), 0.0);

        snap.duration = Some(Duration::from_secs(200));
        snap.elapsed = Duration::from_secs(50);
        assert_eq!(snap.progress_percent(), 25.0);
    }
}
