//! Listener for audio device events

use flume::Receiver;

use crate::player::DeviceEvent;
use super::AppController;

impl AppController {
    /// Feed device events into the player until the device goes away or the
    /// app quits. Playback failures are shown as an error message.
    pub fn start_player_event_listener(&self, events: Receiver<DeviceEvent>) {
        let controller = self.clone();
        tracing::info!("Starting audio device event listener");

        tokio::spawn(async move {
            while let Ok(event) = events.recv_async().await {
                match &event {
                    DeviceEvent::TimeUpdate(position) => tracing::trace!(?position, "DeviceEvent::TimeUpdate"),
                    other => tracing::debug!(event = ?other, "Device event"),
                }

                let failure = controller.player.lock().await.handle_device_event(event);

                let model = controller.model.lock().await;
                if model.should_quit().await {
                    tracing::debug!("Device event listener shutting down");
                    break;
                }
                if let Some(error) = failure {
                    model.set_error(error.to_string()).await;
                }
            }
            tracing::debug!("Device event channel closed");
        });
    }
}
