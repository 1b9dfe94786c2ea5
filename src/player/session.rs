use tracing::{debug, info};

use super::controller::{AutoSelect, PlayContext, PlaybackController, PlaybackState};
use super::renderer::ListView;
use crate::device::{DeviceEvent, PlaybackDevice};
use crate::library::{MediaItem, Playlist, WatchedSet};
use crate::store::records::SEEN_VIDEOS;
use crate::store::{RecordStore, Records};

/// Everything the player knows, owned in one place and driven by the UI loop.
pub struct PlayerSession<D, S> {
    playlist: Playlist,
    watched: WatchedSet,
    records: Records<S>,
    controller: PlaybackController<D>,
    list: ListView,
    resume_pending: bool,
}

impl<D: PlaybackDevice, S: RecordStore> PlayerSession<D, S> {
    pub fn new(device: D, records: Records<S>) -> Self {
        Self {
            playlist: Playlist::new(),
            watched: WatchedSet::new(),
            records,
            controller: PlaybackController::new(device),
            list: ListView::new(),
            resume_pending: false,
        }
    }

    fn parts(&mut self) -> (&mut PlaybackController<D>, PlayContext<'_, S>) {
        (
            &mut self.controller,
            PlayContext {
                playlist: &self.playlist,
                watched: &mut self.watched,
                records: &mut self.records,
            },
        )
    }

    fn render(&mut self) {
        let current = self.controller.state().current.as_deref();
        self.list.render(&self.playlist, &self.watched, current);
    }

    /// Restore persisted state and pick up where the last run left off.
    pub fn bootstrap(&mut self, initial: Vec<MediaItem>) {
        let snapshot = self.records.get_record(SEEN_VIDEOS);
        self.watched = WatchedSet::restore(snapshot.as_deref());
        self.playlist.replace(initial);

        let (controller, mut ctx) = self.parts();
        match controller.auto_select_last(&mut ctx) {
            AutoSelect::Resumed(id) => debug!(item = %id, "startup resume armed"),
            AutoSelect::NothingSaved => {}
            AutoSelect::Unresolved(id) => {
                debug!(item = %id, "startup resume waiting for a matching selection");
                self.resume_pending = true;
            }
        }

        info!(
            items = self.playlist.len(),
            watched = self.watched.len(),
            "session restored"
        );
        self.render();
    }

    /// Install a freshly picked batch. Watched flags are reset in memory only,
    /// and anything still loaded from the previous batch is released.
    pub fn on_selection_changed(&mut self, items: Vec<MediaItem>) {
        self.playlist.rebuild(items, &mut self.watched);
        info!(
            items = self.playlist.len(),
            generation = self.playlist.generation(),
            "selection changed"
        );
        self.controller.release_stale(self.playlist.generation());

        if self.resume_pending && self.controller.state().current.is_none() {
            self.resume_pending = false;
            let (controller, mut ctx) = self.parts();
            if let AutoSelect::Resumed(id) = controller.auto_select_last(&mut ctx) {
                debug!(item = %id, "startup resume armed after selection");
            }
        }

        self.render();
    }

    pub fn play(&mut self, id: &str) -> bool {
        let (controller, mut ctx) = self.parts();
        let played = controller.play(id, &mut ctx);
        if played {
            self.resume_pending = false;
            self.render();
        }
        played
    }

    pub fn next(&mut self) -> bool {
        let (controller, mut ctx) = self.parts();
        let moved = controller.next(&mut ctx);
        if moved {
            self.render();
        }
        moved
    }

    pub fn previous(&mut self) -> bool {
        let (controller, mut ctx) = self.parts();
        let moved = controller.previous(&mut ctx);
        if moved {
            self.render();
        }
        moved
    }

    pub fn skip(&mut self, input: &str) -> bool {
        self.controller.skip(input)
    }

    pub fn toggle_pause(&mut self) -> bool {
        self.controller.toggle_pause()
    }

    pub fn handle_device_event(&mut self, event: DeviceEvent) {
        let (controller, mut ctx) = self.parts();
        if controller.handle_event(event, &mut ctx) {
            self.render();
        }
    }

    /// Drain and dispatch everything the device reported since the last tick.
    pub fn pump_device_events(&mut self) -> usize {
        let events = self.controller.poll_device();
        let count = events.len();
        for event in events {
            self.handle_device_event(event);
        }
        count
    }

    pub fn playlist(&self) -> &Playlist {
        &self.playlist
    }

    pub fn watched(&self) -> &WatchedSet {
        &self.watched
    }

    pub fn list(&self) -> &ListView {
        &self.list
    }

    pub fn state(&self) -> &PlaybackState {
        self.controller.state()
    }

    pub fn device(&self) -> &D {
        self.controller.device()
    }

    pub fn current_item(&self) -> Option<&MediaItem> {
        self.state()
            .current
            .as_deref()
            .and_then(|id| self.playlist.item(id))
    }

    #[cfg(test)]
    pub fn device_mut(&mut self) -> &mut D {
        self.controller.device_mut()
    }

    #[cfg(test)]
    pub fn records_mut(&mut self) -> &mut Records<S> {
        &mut self.records
    }
}
