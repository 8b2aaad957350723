//! rodio-backed audio device.
//!
//! rodio's output stream is not `Send`, so a dedicated thread owns the stream
//! and sink. The handle only forwards commands over a channel; downloads run
//! on short-lived loader threads and come back tagged with the generation of
//! the load that requested them, so the last assigned source always wins.

use std::io::Cursor;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use flume::{Receiver, RecvTimeoutError, Sender};
use rodio::{Decoder, OutputStream, Sink, Source};

use super::device::{AudioDevice, DeviceEvent};

const TICK: Duration = Duration::from_millis(250);

enum Command {
    Load { generation: u64, url: String },
    Fetched { generation: u64, result: Result<Vec<u8>, String> },
    Play,
    Pause,
    Unload { generation: u64 },
    Seek(Duration),
    Volume(f32),
    Muted(bool),
    Shutdown,
}

pub struct RodioDevice {
    commands: Sender<Command>,
    generation: u64,
    has_source: bool,
}

impl RodioDevice {
    /// Start the audio thread. Fails if no output device can be opened.
    pub fn spawn(http_timeout: Duration) -> Result<(Self, Receiver<DeviceEvent>)> {
        let (commands_tx, commands_rx) = flume::unbounded();
        let (events_tx, events_rx) = flume::unbounded();
        let (ready_tx, ready_rx) = flume::bounded::<Result<(), String>>(1);

        let loader_tx = commands_tx.clone();
        thread::Builder::new()
            .name("melody-audio".to_string())
            .spawn(move || {
                let worker = match AudioWorker::open(loader_tx, events_tx, http_timeout) {
                    Ok(worker) => {
                        let _ = ready_tx.send(Ok(()));
                        worker
                    }
                    Err(e) => {
                        let _ = ready_tx.send(Err(format!("{e:#}")));
                        return;
                    }
                };
                worker.run(commands_rx);
            })
            .context("Failed to spawn audio thread")?;

        match ready_rx.recv() {
            Ok(Ok(())) => {}
            Ok(Err(e)) => anyhow::bail!("Audio output unavailable: {e}"),
            Err(_) => anyhow::bail!("Audio thread exited during startup"),
        }

        tracing::info!("Audio device ready");

        Ok((
            Self {
                commands: commands_tx,
                generation: 0,
                has_source: false,
            },
            events_rx,
        ))
    }

    fn send(&self, command: Command) {
        if self.commands.send(command).is_err() {
            tracing::warn!("Audio thread is gone, dropping command");
        }
    }
}

impl AudioDevice for RodioDevice {
    fn load(&mut self, url: &str) {
        self.generation += 1;
        self.has_source = true;
        self.send(Command::Load {
            generation: self.generation,
            url: url.to_string(),
        });
    }

    fn play(&mut self) {
        self.send(Command::Play);
    }

    fn pause(&mut self) {
        self.send(Command::Pause);
    }

    fn unload(&mut self) {
        self.generation += 1;
        self.has_source = false;
        self.send(Command::Unload { generation: self.generation });
    }

    fn seek(&mut self, position: Duration) {
        self.send(Command::Seek(position));
    }

    fn set_volume(&mut self, volume: f32) {
        self.send(Command::Volume(volume.clamp(0.0, 1.0)));
    }

    fn set_muted(&mut self, muted: bool) {
        self.send(Command::Muted(muted));
    }

    fn has_source(&self) -> bool {
        self.has_source
    }
}

impl Drop for RodioDevice {
    fn drop(&mut self) {
        let _ = self.commands.send(Command::Shutdown);
    }
}

struct AudioWorker {
    _stream: OutputStream,
    sink: Sink,
    http: reqwest::blocking::Client,
    loader_tx: Sender<Command>,
    events: Sender<DeviceEvent>,
    generation: u64,
    data: Option<Arc<[u8]>>,
    want_playing: bool,
    ended_sent: bool,
    volume: f32,
    muted: bool,
}

impl AudioWorker {
    fn open(loader_tx: Sender<Command>, events: Sender<DeviceEvent>, http_timeout: Duration) -> Result<Self> {
        let (stream, handle) = OutputStream::try_default().context("No default output device")?;
        let sink = Sink::try_new(&handle).context("Failed to create sink")?;
        let http = reqwest::blocking::Client::builder()
            .timeout(http_timeout)
            .build()
            .context("Failed to build stream client")?;

        Ok(Self {
            _stream: stream,
            sink,
            http,
            loader_tx,
            events,
            generation: 0,
            data: None,
            want_playing: false,
            ended_sent: false,
            volume: 1.0,
            muted: false,
        })
    }

    fn run(mut self, commands: Receiver<Command>) {
        let mut last_tick = Instant::now();

        loop {
            match commands.recv_timeout(TICK) {
                Ok(Command::Shutdown) => break,
                Ok(command) => self.apply(command),
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => break,
            }

            if last_tick.elapsed() >= TICK {
                last_tick = Instant::now();
                self.tick();
            }
        }

        self.sink.stop();
        tracing::debug!("Audio thread stopped");
    }

    fn apply(&mut self, command: Command) {
        match command {
            Command::Load { generation, url } => {
                self.generation = generation;
                self.sink.clear();
                self.data = None;
                self.want_playing = true;
                self.spawn_fetch(generation, url);
            }
            Command::Fetched { generation, result } => {
                if generation != self.generation {
                    tracing::debug!(generation, current = self.generation, "Dropping stale stream data");
                    return;
                }
                match result {
                    Ok(bytes) => self.start_source(bytes.into()),
                    Err(reason) => self.emit(DeviceEvent::Failed(reason)),
                }
            }
            Command::Play => {
                self.want_playing = true;
                if self.data.is_some() {
                    self.ensure_source();
                    self.sink.play();
                    self.emit(DeviceEvent::Started);
                }
            }
            Command::Pause => {
                self.want_playing = false;
                self.sink.pause();
            }
            Command::Unload { generation } => {
                self.generation = generation;
                self.sink.clear();
                self.data = None;
                self.want_playing = false;
            }
            Command::Seek(position) => {
                if self.data.is_none() {
                    return;
                }
                self.ensure_source();
                if let Err(e) = self.sink.try_seek(position) {
                    tracing::warn!(error = %e, ?position, "Seek failed");
                }
            }
            Command::Volume(volume) => {
                self.volume = volume;
                self.apply_gain();
            }
            Command::Muted(muted) => {
                self.muted = muted;
                self.apply_gain();
            }
            Command::Shutdown => {}
        }
    }

    fn spawn_fetch(&self, generation: u64, url: String) {
        let http = self.http.clone();
        let reply = self.loader_tx.clone();

        let spawned = thread::Builder::new()
            .name("melody-loader".to_string())
            .spawn(move || {
                let result = fetch(&http, &url);
                let _ = reply.send(Command::Fetched { generation, result });
            });

        if let Err(e) = spawned {
            self.emit(DeviceEvent::Failed(format!("failed to start loader: {e}")));
        }
    }

    fn start_source(&mut self, data: Arc<[u8]>) {
        let decoder = match Decoder::new(Cursor::new(data.clone())) {
            Ok(decoder) => decoder,
            Err(e) => {
                self.emit(DeviceEvent::Failed(format!("unsupported format: {e}")));
                return;
            }
        };

        let duration = decoder.total_duration();
        self.sink.clear();
        self.sink.append(decoder);
        self.data = Some(data);
        self.ended_sent = false;
        self.apply_gain();
        self.emit(DeviceEvent::Loaded { duration });

        if self.want_playing {
            self.sink.play();
            self.emit(DeviceEvent::Started);
        }
    }

    /// Re-queue the current data if the sink already drained it
    fn ensure_source(&mut self) {
        if !self.sink.empty() {
            return;
        }
        let Some(data) = self.data.clone() else {
            return;
        };

        match Decoder::new(Cursor::new(data)) {
            Ok(decoder) => {
                let paused = self.sink.is_paused();
                self.sink.append(decoder);
                if paused {
                    self.sink.pause();
                }
                self.ended_sent = false;
            }
            Err(e) => self.emit(DeviceEvent::Failed(format!("unsupported format: {e}"))),
        }
    }

    fn apply_gain(&self) {
        self.sink.set_volume(if self.muted { 0.0 } else { self.volume });
    }

    fn tick(&mut self) {
        if self.data.is_none() || self.sink.is_paused() {
            return;
        }

        if self.sink.empty() {
            if !self.ended_sent {
                self.ended_sent = true;
                self.emit(DeviceEvent::Ended);
            }
        } else {
            self.emit(DeviceEvent::TimeUpdate(self.sink.get_pos()));
        }
    }

    fn emit(&self, event: DeviceEvent) {
        let _ = self.events.send(event);
    }
}

fn fetch(http: &reqwest::blocking::Client, url: &str) -> Result<Vec<u8>, String> {
    let response = http
        .get(url)
        .send()
        .and_then(|r| r.error_for_status())
        .map_err(|e| format!("network error: {}", e.without_url()))?;

    response
        .bytes()
        .map(|b| b.to_vec())
        .map_err(|e| format!("network error: {}", e.without_url()))
}
