use tracing::{debug, info, warn};

use crate::device::{DeviceEvent, PlaybackDevice};
use crate::library::{ItemId, Playlist, WatchedSet};
use crate::store::records::{
    item_play_time_key, CURRENT_PLAY_TIME, LAST_PLAYED_VIDEO, SEEN_VIDEOS,
};
use crate::store::{RecordStore, Records, RECORD_TTL_DAYS};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    /// Nothing selected.
    #[default]
    Idle,
    /// An item is current and the device holds its source, not advancing.
    Loaded,
    Playing,
    /// The device reported the end of the current item.
    Ended,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlaybackState {
    pub current: Option<ItemId>,
    pub position: f64,
    pub skip_offered: bool,
    pub phase: Phase,
}

/// What runs when the device reports the current item has ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionHandler {
    AdvanceToNext,
}

/// What runs once the device reports its source is ready.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetadataHandler {
    StartPlayback,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AutoSelect {
    Resumed(ItemId),
    NothingSaved,
    /// A last-played item is recorded but is not in the current playlist.
    Unresolved(ItemId),
}

/// The playlist state the controller reads and updates while it works.
pub struct PlayContext<'a, S> {
    pub playlist: &'a Playlist,
    pub watched: &'a mut WatchedSet,
    pub records: &'a mut Records<S>,
}

/// Owns the "currently playing" pointer and is the only driver of the device.
///
/// At most one completion handler is registered at any time. Registering a
/// handler always deregisters the previous one first, and a handler is
/// consumed when it fires.
pub struct PlaybackController<D> {
    device: D,
    state: PlaybackState,
    on_completion: Option<CompletionHandler>,
    on_metadata: Option<MetadataHandler>,
}

impl<D: PlaybackDevice> PlaybackController<D> {
    pub fn new(device: D) -> Self {
        Self {
            device,
            state: PlaybackState::default(),
            on_completion: None,
            on_metadata: None,
        }
    }

    pub fn state(&self) -> &PlaybackState {
        &self.state
    }

    pub fn device(&self) -> &D {
        &self.device
    }

    #[cfg(test)]
    pub fn device_mut(&mut self) -> &mut D {
        &mut self.device
    }

    #[cfg(test)]
    pub fn completion_handler(&self) -> Option<CompletionHandler> {
        self.on_completion
    }

    pub fn register_completion(&mut self, handler: CompletionHandler) {
        if let Some(previous) = self.deregister_completion() {
            debug!(?previous, "replacing completion handler");
        }
        self.on_completion = Some(handler);
    }

    pub fn deregister_completion(&mut self) -> Option<CompletionHandler> {
        self.on_completion.take()
    }

    /// Start playing `id` from its saved resume point. Unknown ids and device
    /// failures leave everything untouched and return `false`.
    pub fn play<S: RecordStore>(&mut self, id: &str, ctx: &mut PlayContext<'_, S>) -> bool {
        let Some(item) = ctx.playlist.item(id) else {
            debug!(item = id, "play ignored: not in playlist");
            return false;
        };
        let source = item.handle.playable(ctx.playlist.generation());

        if let Err(e) = self.device.set_source(source) {
            warn!(item = id, error = %e, "cannot load item");
            return false;
        }
        // A pending startup resume is superseded by an explicit play.
        self.on_metadata = None;

        let saved = ctx
            .records
            .get_seconds(&item_play_time_key(id))
            .unwrap_or(0.0);
        let resume_at = match self.device.duration() {
            Some(duration) if saved >= duration => 0.0,
            _ => saved,
        };
        self.device.set_current_time(resume_at);

        self.state.current = Some(id.to_string());
        self.state.position = resume_at;
        self.state.phase = Phase::Loaded;

        ctx.watched.mark_watched(id);
        ctx.records
            .set_record(SEEN_VIDEOS, &ctx.watched.to_json(), RECORD_TTL_DAYS);
        ctx.records
            .set_record(LAST_PLAYED_VIDEO, id, RECORD_TTL_DAYS);

        self.state.skip_offered = true;
        self.register_completion(CompletionHandler::AdvanceToNext);

        match self.device.play() {
            Ok(()) => self.state.phase = Phase::Playing,
            Err(e) => warn!(item = id, error = %e, "device refused to start"),
        }

        info!(item = id, resume_at, "playing");
        true
    }

    pub fn next<S: RecordStore>(&mut self, ctx: &mut PlayContext<'_, S>) -> bool {
        let Some(index) = self.current_index(ctx.playlist) else {
            return false;
        };
        let Some(next) = ctx.playlist.get(index + 1).map(|item| item.name.clone()) else {
            debug!("next ignored: at end of playlist");
            return false;
        };
        self.play(&next, ctx)
    }

    pub fn previous<S: RecordStore>(&mut self, ctx: &mut PlayContext<'_, S>) -> bool {
        let Some(index) = self.current_index(ctx.playlist) else {
            return false;
        };
        if index == 0 {
            debug!("previous ignored: at start of playlist");
            return false;
        }
        let Some(previous) = ctx.playlist.get(index - 1).map(|item| item.name.clone()) else {
            return false;
        };
        self.play(&previous, ctx)
    }

    fn current_index(&self, playlist: &Playlist) -> Option<usize> {
        self.state
            .current
            .as_deref()
            .and_then(|id| playlist.index_of(id))
    }

    /// Jump forward by the whole seconds in `input`, once per play.
    pub fn skip(&mut self, input: &str) -> bool {
        if !self.state.skip_offered || !self.device.has_source() {
            return false;
        }

        let offset = parse_skip_seconds(input) as f64;
        let mut target = (self.device.current_time() + offset).max(0.0);
        if let Some(duration) = self.device.duration() {
            target = target.min(duration);
        }

        self.device.set_current_time(target);
        self.state.position = target;
        self.state.skip_offered = false;
        debug!(offset, target, "skipped");
        true
    }

    pub fn toggle_pause(&mut self) -> bool {
        if !self.device.has_source() {
            return false;
        }

        if self.device.is_paused() {
            if let Err(e) = self.device.play() {
                warn!(error = %e, "cannot resume");
                return false;
            }
            if self.state.phase == Phase::Ended {
                self.register_completion(CompletionHandler::AdvanceToNext);
            }
            self.state.phase = Phase::Playing;
        } else {
            self.device.pause();
            self.state.phase = Phase::Loaded;
        }
        true
    }

    /// Drop a source minted for an older selection batch. Returns whether
    /// anything was released.
    pub fn release_stale(&mut self, generation: u64) -> bool {
        let Some(loaded) = self.device.source().map(|s| s.generation) else {
            return false;
        };
        if loaded == generation {
            return false;
        }

        self.device.eject();
        self.on_completion = None;
        self.on_metadata = None;
        let previous = std::mem::take(&mut self.state).current;
        info!(item = ?previous, loaded, generation, "released item from a replaced selection");
        true
    }

    /// Re-select the last played item after a restart. Playback begins once
    /// the device reports the source is ready.
    pub fn auto_select_last<S: RecordStore>(&mut self, ctx: &mut PlayContext<'_, S>) -> AutoSelect {
        let Some(last) = ctx.records.get_record(LAST_PLAYED_VIDEO) else {
            return AutoSelect::NothingSaved;
        };
        let Some(item) = ctx.playlist.item(&last) else {
            debug!(item = %last, "last played item not in playlist");
            return AutoSelect::Unresolved(last);
        };

        if let Err(e) = self.device.set_source(item.handle.playable(ctx.playlist.generation())) {
            warn!(item = %last, error = %e, "cannot reload last played item");
            return AutoSelect::Unresolved(last);
        }

        if let Some(position) = ctx.records.get_seconds(CURRENT_PLAY_TIME) {
            self.device.set_current_time(position);
            self.state.position = position;
        }

        self.state.current = Some(last.clone());
        self.state.phase = Phase::Loaded;
        self.on_metadata = Some(MetadataHandler::StartPlayback);
        self.register_completion(CompletionHandler::AdvanceToNext);

        info!(item = %last, position = self.state.position, "resuming last played item");
        AutoSelect::Resumed(last)
    }

    /// Persist the latest position, globally and for the current item.
    pub fn checkpoint<S: RecordStore>(&mut self, position: f64, records: &mut Records<S>) {
        self.state.position = position;
        let value = position.to_string();
        records.set_record(CURRENT_PLAY_TIME, &value, RECORD_TTL_DAYS);
        if let Some(current) = &self.state.current {
            records.set_record(&item_play_time_key(current), &value, RECORD_TTL_DAYS);
        }
    }

    pub fn poll_device(&mut self) -> Vec<DeviceEvent> {
        self.device.poll_events()
    }

    /// Dispatch one device notification. Returns whether the visible state
    /// changed.
    pub fn handle_event<S: RecordStore>(&mut self, event: DeviceEvent, ctx: &mut PlayContext<'_, S>) -> bool {
        match event {
            DeviceEvent::PositionUpdate(position) => {
                self.checkpoint(position, ctx.records);
                false
            }
            DeviceEvent::Ended if !self.device.has_source() => false,
            DeviceEvent::Ended => {
                self.state.phase = Phase::Ended;
                // A finished item starts from the beginning next time
                if let Some(current) = &self.state.current {
                    ctx.records
                        .set_record(&item_play_time_key(current), "0", RECORD_TTL_DAYS);
                }
                match self.on_completion.take() {
                    Some(CompletionHandler::AdvanceToNext) => {
                        self.next(ctx);
                        true
                    }
                    None => true,
                }
            }
            DeviceEvent::MetadataReady => match self.on_metadata.take() {
                Some(MetadataHandler::StartPlayback) => {
                    match self.device.play() {
                        Ok(()) => self.state.phase = Phase::Playing,
                        Err(e) => warn!(error = %e, "cannot start resumed item"),
                    }
                    true
                }
                None => false,
            },
        }
    }
}

/// Leading-integer parse of the skip field: optional whitespace and sign,
/// then digits. Anything unparseable is zero. Overlong digit runs saturate.
pub fn parse_skip_seconds(input: &str) -> i64 {
    let trimmed = input.trim_start();
    let (sign, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (-1, &trimmed[1..]),
        Some(b'+') => (1, &trimmed[1..]),
        _ => (1, trimmed),
    };
    rest.bytes()
        .take_while(u8::is_ascii_digit)
        .fold(0i64, |acc, digit| {
            acc.saturating_mul(10)
                .saturating_add(sign * i64::from(digit - b'0'))
        })
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::device::FakeDevice;
    use crate::library::MediaItem;
    use crate::store::MemoryJar;

    struct Fixture {
        controller: PlaybackController<FakeDevice>,
        playlist: Playlist,
        watched: WatchedSet,
        records: Records<MemoryJar>,
    }

    impl Fixture {
        fn new(names: &[&str]) -> Self {
            let mut playlist = Playlist::new();
            playlist.replace(
                names
                    .iter()
                    .map(|n| MediaItem::from_path(PathBuf::from(format!("/media/{}", n))))
                    .collect(),
            );
            Self {
                controller: PlaybackController::new(FakeDevice::new()),
                playlist,
                watched: WatchedSet::new(),
                records: Records::new(MemoryJar::new()),
            }
        }

        fn ctx(&mut self) -> (&mut PlaybackController<FakeDevice>, PlayContext<'_, MemoryJar>) {
            (
                &mut self.controller,
                PlayContext {
                    playlist: &self.playlist,
                    watched: &mut self.watched,
                    records: &mut self.records,
                },
            )
        }

        fn play(&mut self, id: &str) -> bool {
            let (controller, mut ctx) = self.ctx();
            controller.play(id, &mut ctx)
        }

        fn next(&mut self) -> bool {
            let (controller, mut ctx) = self.ctx();
            controller.next(&mut ctx)
        }

        fn previous(&mut self) -> bool {
            let (controller, mut ctx) = self.ctx();
            controller.previous(&mut ctx)
        }

        fn deliver(&mut self, event: DeviceEvent) -> bool {
            let (controller, mut ctx) = self.ctx();
            controller.handle_event(event, &mut ctx)
        }

        fn current(&self) -> Option<&str> {
            self.controller.state().current.as_deref()
        }
    }

    #[test]
    fn play_marks_watched_and_persists() {
        let mut f = Fixture::new(&["a.mp4", "b.mp4"]);
        assert!(f.play("b.mp4"));

        assert!(f.watched.is_watched("b.mp4"));
        assert_eq!(f.current(), Some("b.mp4"));
        assert_eq!(f.controller.state().phase, Phase::Playing);
        assert!(f.controller.state().skip_offered);
        assert_eq!(f.records.get_record(LAST_PLAYED_VIDEO).as_deref(), Some("b.mp4"));
        assert_eq!(
            f.records.get_record(SEEN_VIDEOS).as_deref(),
            Some(r#"[["b.mp4",true]]"#)
        );
        let loaded = &f.controller.device().loaded[0];
        assert_eq!(loaded.path, PathBuf::from("/media/b.mp4"));
        assert_eq!(loaded.generation, f.playlist.generation());
    }

    #[test]
    fn playing_twice_leaves_persisted_state_identical() {
        let mut f = Fixture::new(&["a.mp4", "b.mp4"]);
        f.play("a.mp4");
        let seen = f.records.get_record(SEEN_VIDEOS);
        let last = f.records.get_record(LAST_PLAYED_VIDEO);

        f.play("a.mp4");
        assert_eq!(f.records.get_record(SEEN_VIDEOS), seen);
        assert_eq!(f.records.get_record(LAST_PLAYED_VIDEO), last);
        assert_eq!(f.watched.len(), 1);
    }

    #[test]
    fn unknown_item_is_a_silent_noop() {
        let mut f = Fixture::new(&["a.mp4"]);
        assert!(!f.play("missing.mp4"));
        assert_eq!(f.current(), None);
        assert_eq!(f.controller.state().phase, Phase::Idle);
        assert_eq!(f.watched.len(), 0);
        assert_eq!(f.records.get_record(LAST_PLAYED_VIDEO), None);
    }

    #[test]
    fn device_failure_leaves_state_untouched() {
        let mut f = Fixture::new(&["a.mp4"]);
        f.controller.device_mut().fail_sources = true;
        assert!(!f.play("a.mp4"));
        assert_eq!(f.current(), None);
        assert_eq!(f.watched.len(), 0);
    }

    #[test]
    fn play_resumes_from_item_checkpoint() {
        let mut f = Fixture::new(&["a.mp4", "b.mp4"]);
        f.records
            .set_record(&item_play_time_key("b.mp4"), "33.5", RECORD_TTL_DAYS);
        f.records
            .set_record(&item_play_time_key("a.mp4"), "garbage", RECORD_TTL_DAYS);

        f.play("b.mp4");
        assert_eq!(f.controller.device().time, 33.5);

        f.play("a.mp4");
        assert_eq!(f.controller.device().time, 0.0);
    }

    #[test]
    fn finished_item_replays_from_the_start() {
        let mut f = Fixture::new(&["a.mp4", "b.mp4"]);
        f.play("a.mp4");
        f.deliver(DeviceEvent::PositionUpdate(1800.0));
        f.deliver(DeviceEvent::Ended);
        assert_eq!(f.current(), Some("b.mp4"));
        assert_eq!(f.records.get_seconds(&item_play_time_key("a.mp4")), Some(0.0));

        assert!(f.previous());
        assert_eq!(f.current(), Some("a.mp4"));
        assert_eq!(f.controller.device().time, 0.0);
        assert_eq!(f.controller.state().phase, Phase::Playing);
    }

    #[test]
    fn saved_position_past_the_end_replays_from_the_start() {
        let mut f = Fixture::new(&["a.mp4"]);
        f.records
            .set_record(&item_play_time_key("a.mp4"), "1e300", RECORD_TTL_DAYS);
        f.controller.device_mut().duration = Some(90.0);

        f.play("a.mp4");
        assert_eq!(f.controller.device().time, 0.0);
        assert_eq!(f.controller.state().position, 0.0);
    }

    #[test]
    fn releasing_a_stale_source_returns_to_idle() {
        let mut f = Fixture::new(&["a.mp4", "b.mp4"]);
        f.play("a.mp4");
        let generation = f.playlist.generation();
        assert!(!f.controller.release_stale(generation));
        assert_eq!(f.current(), Some("a.mp4"));

        assert!(f.controller.release_stale(generation + 1));
        assert_eq!(f.current(), None);
        assert_eq!(f.controller.state().phase, Phase::Idle);
        assert!(!f.controller.state().skip_offered);
        assert!(!f.controller.device().has_source());
        assert_eq!(f.controller.completion_handler(), None);

        // Nothing left to release or resume
        assert!(!f.controller.release_stale(generation + 1));
        assert!(!f.controller.toggle_pause());
    }

    #[test]
    fn navigation_stops_at_both_ends() {
        let mut f = Fixture::new(&["a.mp4", "b.mp4", "c.mp4"]);
        f.play("a.mp4");
        assert!(!f.previous());
        assert_eq!(f.current(), Some("a.mp4"));

        f.play("c.mp4");
        assert!(!f.next());
        assert_eq!(f.current(), Some("c.mp4"));

        assert!(f.previous());
        assert_eq!(f.current(), Some("b.mp4"));
    }

    #[test]
    fn navigation_without_current_item_does_nothing() {
        let mut f = Fixture::new(&["a.mp4", "b.mp4"]);
        assert!(!f.next());
        assert!(!f.previous());
        assert_eq!(f.current(), None);
    }

    #[test]
    fn next_then_completion_advances_through_playlist() {
        let mut f = Fixture::new(&["a.mp4", "b.mp4", "c.mp4"]);
        f.play("a.mp4");
        f.next();
        assert_eq!(f.current(), Some("b.mp4"));
        assert!(f.watched.is_watched("a.mp4"));

        f.deliver(DeviceEvent::Ended);
        assert_eq!(f.current(), Some("c.mp4"));
        assert!(f.watched.is_watched("c.mp4"));
    }

    #[test]
    fn completion_at_last_item_stays_ended() {
        let mut f = Fixture::new(&["a.mp4"]);
        f.play("a.mp4");
        f.deliver(DeviceEvent::Ended);

        assert_eq!(f.current(), Some("a.mp4"));
        assert_eq!(f.controller.state().phase, Phase::Ended);
        assert_eq!(f.controller.completion_handler(), None);
    }

    #[test]
    fn repeated_plays_keep_a_single_completion_handler() {
        let mut f = Fixture::new(&["a.mp4", "b.mp4", "c.mp4"]);
        f.play("a.mp4");
        f.play("a.mp4");
        f.play("a.mp4");

        f.deliver(DeviceEvent::Ended);
        assert_eq!(f.current(), Some("b.mp4"));

        // The handler that fired was consumed; the one re-armed by playing b is the only one.
        assert_eq!(
            f.controller.completion_handler(),
            Some(CompletionHandler::AdvanceToNext)
        );
        assert_eq!(f.controller.deregister_completion(), Some(CompletionHandler::AdvanceToNext));
        f.deliver(DeviceEvent::Ended);
        assert_eq!(f.current(), Some("b.mp4"));
    }

    #[test]
    fn skip_moves_forward_once_per_play() {
        let mut f = Fixture::new(&["a.mp4"]);
        f.play("a.mp4");
        f.controller.device_mut().time = 5.0;

        assert!(f.controller.skip("10"));
        assert_eq!(f.controller.device().time, 15.0);
        assert!(!f.controller.state().skip_offered);

        assert!(!f.controller.skip("10"));
        assert_eq!(f.controller.device().time, 15.0);

        f.play("a.mp4");
        assert!(f.controller.state().skip_offered);
    }

    #[test]
    fn skip_is_clamped_to_the_media() {
        let mut f = Fixture::new(&["a.mp4"]);
        f.play("a.mp4");
        f.controller.device_mut().duration = Some(20.0);
        f.controller.device_mut().time = 15.0;
        f.controller.skip("90");
        assert_eq!(f.controller.device().time, 20.0);

        f.play("a.mp4");
        f.controller.device_mut().time = 3.0;
        f.controller.skip("-10");
        assert_eq!(f.controller.device().time, 0.0);
    }

    #[test]
    fn skip_without_source_does_nothing() {
        let mut f = Fixture::new(&["a.mp4"]);
        assert!(!f.controller.skip("10"));
    }

    #[test]
    fn skip_input_parses_leading_integer() {
        assert_eq!(parse_skip_seconds("10"), 10);
        assert_eq!(parse_skip_seconds("  85s"), 85);
        assert_eq!(parse_skip_seconds("-5"), -5);
        assert_eq!(parse_skip_seconds("+7"), 7);
        assert_eq!(parse_skip_seconds("3.9"), 3);
        assert_eq!(parse_skip_seconds(""), 0);
        assert_eq!(parse_skip_seconds("abc"), 0);
        assert_eq!(parse_skip_seconds("-"), 0);
        assert_eq!(parse_skip_seconds("99999999999999999999"), i64::MAX);
        assert_eq!(parse_skip_seconds("-99999999999999999999x"), i64::MIN);
    }

    #[test]
    fn huge_skip_is_clamped_to_the_media() {
        let mut f = Fixture::new(&["a.mp4"]);
        f.play("a.mp4");
        f.controller.device_mut().duration = Some(600.0);
        assert!(f.controller.skip("99999999999999999999"));
        assert_eq!(f.controller.device().time, 600.0);
    }

    #[test]
    fn position_updates_checkpoint_global_and_item_records() {
        let mut f = Fixture::new(&["a.mp4"]);
        f.deliver(DeviceEvent::PositionUpdate(3.0));
        assert_eq!(f.records.get_record(CURRENT_PLAY_TIME).as_deref(), Some("3"));
        assert_eq!(f.records.get_record(&item_play_time_key("a.mp4")), None);

        f.play("a.mp4");
        f.deliver(DeviceEvent::PositionUpdate(12.25));
        assert_eq!(f.records.get_record(CURRENT_PLAY_TIME).as_deref(), Some("12.25"));
        assert_eq!(
            f.records.get_record(&item_play_time_key("a.mp4")).as_deref(),
            Some("12.25")
        );
        assert_eq!(f.controller.state().position, 12.25);
    }

    #[test]
    fn auto_select_waits_for_metadata_before_playing() {
        let mut f = Fixture::new(&["a.mp4", "b.mp4"]);
        f.records.set_record(LAST_PLAYED_VIDEO, "b.mp4", RECORD_TTL_DAYS);
        f.records.set_record(CURRENT_PLAY_TIME, "61", RECORD_TTL_DAYS);

        let outcome = {
            let (controller, mut ctx) = f.ctx();
            controller.auto_select_last(&mut ctx)
        };
        assert_eq!(outcome, AutoSelect::Resumed(String::from("b.mp4")));
        assert_eq!(f.current(), Some("b.mp4"));
        assert_eq!(f.controller.state().phase, Phase::Loaded);
        assert_eq!(f.controller.device().play_calls, 0);
        assert_eq!(f.controller.device().time, 61.0);

        f.deliver(DeviceEvent::MetadataReady);
        assert_eq!(f.controller.state().phase, Phase::Playing);
        assert_eq!(f.controller.device().play_calls, 1);

        // One-shot: a later metadata notification does not restart anything.
        f.deliver(DeviceEvent::MetadataReady);
        assert_eq!(f.controller.device().play_calls, 1);
    }

    #[test]
    fn auto_select_reports_missing_and_stale_records() {
        let mut f = Fixture::new(&["a.mp4"]);
        let outcome = {
            let (controller, mut ctx) = f.ctx();
            controller.auto_select_last(&mut ctx)
        };
        assert_eq!(outcome, AutoSelect::NothingSaved);

        f.records.set_record(LAST_PLAYED_VIDEO, "gone.mp4", RECORD_TTL_DAYS);
        let outcome = {
            let (controller, mut ctx) = f.ctx();
            controller.auto_select_last(&mut ctx)
        };
        assert_eq!(outcome, AutoSelect::Unresolved(String::from("gone.mp4")));
        assert_eq!(f.current(), None);
        assert!(f.controller.device().loaded.is_empty());
    }

    #[test]
    fn toggle_pause_switches_between_playing_and_loaded() {
        let mut f = Fixture::new(&["a.mp4"]);
        assert!(!f.controller.toggle_pause());

        f.play("a.mp4");
        assert!(f.controller.toggle_pause());
        assert_eq!(f.controller.state().phase, Phase::Loaded);
        assert!(f.controller.device().paused);

        assert!(f.controller.toggle_pause());
        assert_eq!(f.controller.state().phase, Phase::Playing);
        assert!(!f.controller.device().paused);
    }
}
