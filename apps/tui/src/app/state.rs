use crate::app::actions::{AppActions, EntryDraft};
use crate::app::submit::{SubmitEvent, SubmitMachine};
use crate::config::AppConfig;
use crate::db::models::TimelineRecord;
use crate::geography;
use color_eyre::Result;
use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;
use prefmap_core::notice::{NoticeBoard, Severity, SUBMIT_NOTICE_SECONDS};
use prefmap_core::{Effect, LoadOutcome, MapController, MapError, MapEvent, RegionKey};
use ratatui::layout::Rect;
use std::time::Instant;
use throbber_widgets_tui::ThrobberState;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppScreen {
    Map,
    EditAnnotation,
    EntryForm,
    DeleteConfirm,
    Search,
}

/// Identifies one background request and the region it was made for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestTicket {
    pub id: u64,
    pub key: RegionKey,
}

/// Results sent back to the event loop by spawned tasks.
#[derive(Debug)]
pub enum AppMessage {
    GeographyLoaded(LoadOutcome),
    TimelineLoaded {
        ticket: RequestTicket,
        result: Result<Vec<TimelineRecord>, String>,
    },
    EntrySubmitted {
        ticket: RequestTicket,
        result: Result<TimelineRecord, MapError>,
    },
    EntryDeleted {
        ticket: RequestTicket,
        result: Result<i64, MapError>,
    },
}

/// Latest request id issued per kind; older results are stale.
#[derive(Debug, Default)]
struct PendingRequests {
    timeline: Option<u64>,
    submit: Option<u64>,
    delete: Option<u64>,
}

/// Which annotation field the edit screen is typing into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnnotationField {
    Description,
    Image,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryField {
    Image,
    Description,
    Nickname,
}

impl EntryField {
    pub const ALL: [Self; 3] = [Self::Image, Self::Description, Self::Nickname];

    pub const fn label(self) -> &'static str {
        match self {
            Self::Image => "Image file",
            Self::Description => "Description",
            Self::Nickname => "Nickname",
        }
    }

    pub const fn next(self) -> Self {
        match self {
            Self::Image => Self::Description,
            Self::Description => Self::Nickname,
            Self::Nickname => Self::Image,
        }
    }

    pub const fn previous(self) -> Self {
        match self {
            Self::Image => Self::Nickname,
            Self::Description => Self::Image,
            Self::Nickname => Self::Description,
        }
    }
}

/// Holds the timeline entry being typed for one prefecture
#[derive(Debug, Clone)]
pub struct EntryForm {
    /// Prefecture the typed content belongs to
    pub key: Option<RegionKey>,
    pub field: EntryField,
    pub image_path: String,
    pub description: String,
    pub nickname: String,
}

impl EntryForm {
    pub fn new(nickname: &str) -> Self {
        Self {
            key: None,
            field: EntryField::Image,
            image_path: String::new(),
            description: String::new(),
            nickname: nickname.to_string(),
        }
    }

    pub fn value(&self, field: EntryField) -> &str {
        match field {
            EntryField::Image => &self.image_path,
            EntryField::Description => &self.description,
            EntryField::Nickname => &self.nickname,
        }
    }

    pub fn value_mut(&mut self) -> &mut String {
        match self.field {
            EntryField::Image => &mut self.image_path,
            EntryField::Description => &mut self.description,
            EntryField::Nickname => &mut self.nickname,
        }
    }

    pub fn draft(&self, prefecture: RegionKey) -> EntryDraft {
        EntryDraft {
            prefecture,
            image_path: self.image_path.clone(),
            description: self.description.clone(),
            nickname: self.nickname.clone(),
        }
    }
}

/// Timeline entries of the prefecture whose panel is open
#[derive(Debug, Default)]
pub struct TimelineView {
    pub key: Option<RegionKey>,
    pub entries: Vec<TimelineRecord>,
    pub selected: usize,
    pub loading: bool,
    pub error: Option<String>,
}

impl TimelineView {
    pub fn selected_entry(&self) -> Option<&TimelineRecord> {
        self.entries.get(self.selected)
    }

    fn reset(&mut self, key: Option<RegionKey>) {
        *self = Self {
            key,
            ..Self::default()
        };
    }
}

/// Fuzzy jump-to-prefecture state
#[derive(Debug, Default)]
pub struct SearchState {
    pub query: String,
    pub matches: Vec<(RegionKey, String)>,
    pub selected: usize,
}

/// Mouse button state between press and release
#[derive(Debug, Default, Clone, Copy)]
pub struct PointerState {
    pub pressed_at: Option<(u16, u16)>,
    pub dragging: bool,
}

pub struct App {
    pub running: bool,
    pub screen: AppScreen,
    pub show_help: bool,
    pub map: MapController,
    pub loading: bool,
    pub throbber: ThrobberState,
    pub notices: NoticeBoard,
    pub timeline: TimelineView,
    pub entry_form: EntryForm,
    pub annotation_field: AnnotationField,
    pub search: SearchState,
    pub pointer: PointerState,
    pub actions: AppActions,
    pub submit: SubmitMachine,
    /// Whole terminal area as of the last draw, for mouse mapping
    pub screen_area: Rect,
    pub geojson_source: String,
    started: Instant,
    next_request: u64,
    pending: PendingRequests,
    tx: UnboundedSender<AppMessage>,
    rx: UnboundedReceiver<AppMessage>,
}

impl App {
    pub fn new(config: &AppConfig) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            running: true,
            screen: AppScreen::Map,
            show_help: false,
            map: MapController::new(),
            loading: false,
            throbber: ThrobberState::default(),
            notices: NoticeBoard::new(),
            timeline: TimelineView::default(),
            entry_form: EntryForm::new(&config.nickname),
            annotation_field: AnnotationField::Description,
            search: SearchState::default(),
            pointer: PointerState::default(),
            actions: AppActions::new(config),
            submit: SubmitMachine::new(),
            screen_area: Rect::default(),
            geojson_source: config.geojson_source.clone(),
            started: Instant::now(),
            next_request: 0,
            pending: PendingRequests::default(),
            tx,
            rx,
        }
    }

    pub fn elapsed_seconds(&self) -> f64 {
        self.started.elapsed().as_secs_f64()
    }

    pub async fn initialize_db(&mut self) -> Result<()> {
        self.actions.initialize().await
    }

    /// Fetch the boundary dataset in the background; the map shows a spinner meanwhile.
    pub fn start_geography_load(&mut self) {
        self.loading = true;
        let source = self.geojson_source.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let outcome = geography::load(&source).await;
            tx.send(AppMessage::GeographyLoaded(outcome)).ok();
        });
    }

    /// Advance clocks and apply any finished background work
    pub fn update(&mut self) {
        let now = self.elapsed_seconds();
        self.dispatch(MapEvent::Tick(now));
        self.notices.tick(now);
        if self.loading {
            self.throbber.calc_next();
        }
        while let Ok(message) = self.rx.try_recv() {
            self.handle_message(message);
        }
    }

    pub fn dispatch(&mut self, event: MapEvent) {
        let effects = self.map.handle(event);
        self.apply_effects(effects);
    }

    fn apply_effects(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::PanelOpened(key) => {
                    if self.entry_form.key.as_ref() != Some(&key) {
                        self.reset_entry_form(None);
                    }
                    self.timeline.reset(Some(key.clone()));
                    self.request_timeline(key);
                }
                Effect::PanelClosed(key) => {
                    debug!(%key, "detail panel closed");
                    self.timeline.reset(None);
                    self.screen = AppScreen::Map;
                }
                Effect::EditOpened(_) => {
                    self.annotation_field = AnnotationField::Description;
                    self.screen = AppScreen::EditAnnotation;
                }
                Effect::EditClosed(_) => {
                    if self.screen == AppScreen::EditAnnotation {
                        self.screen = AppScreen::Map;
                    }
                }
                Effect::AnnotationUpdated(key) => {
                    info!(%key, "annotation updated");
                    self.notices.show("Annotation saved", Severity::Success);
                }
                Effect::Rejected(error) => {
                    self.notices.show(error.to_string(), Severity::Error);
                }
                Effect::Highlight(_)
                | Effect::Unhighlight(_)
                | Effect::AnimationStarted(_)
                | Effect::AnimationCancelled
                | Effect::AnimationFinished => {}
            }
        }
    }

    fn next_ticket(&mut self, key: RegionKey) -> RequestTicket {
        self.next_request += 1;
        RequestTicket {
            id: self.next_request,
            key,
        }
    }

    /// A result applies only while its region's panel is open and no newer request was made.
    fn is_current(&self, ticket: &RequestTicket, latest: Option<u64>) -> bool {
        let selection = self.map.selection();
        latest == Some(ticket.id)
            && selection.detail_open
            && selection.selected.as_ref() == Some(&ticket.key)
    }

    fn open_key(&self) -> Option<RegionKey> {
        let selection = self.map.selection();
        selection
            .detail_open
            .then(|| selection.selected.clone())
            .flatten()
    }

    pub fn refresh_timeline(&mut self) {
        if let Some(key) = self.open_key() {
            self.request_timeline(key);
        }
    }

    fn request_timeline(&mut self, key: RegionKey) {
        let ticket = self.next_ticket(key);
        self.pending.timeline = Some(ticket.id);
        self.timeline.loading = true;

        let actions = self.actions.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = actions
                .fetch_timeline(&ticket.key)
                .await
                .map_err(|e| e.to_string());
            tx.send(AppMessage::TimelineLoaded { ticket, result }).ok();
        });
    }

    pub fn open_entry_form(&mut self) {
        let Some(key) = self.open_key() else {
            return;
        };
        if self.entry_form.key.as_ref() != Some(&key) {
            self.reset_entry_form(Some(key));
        }
        self.entry_form.field = EntryField::Image;
        self.screen = AppScreen::EntryForm;
    }

    fn reset_entry_form(&mut self, key: Option<RegionKey>) {
        self.entry_form = EntryForm {
            key,
            ..EntryForm::new(&self.actions.nickname)
        };
    }

    /// Validate locally, then hand the entry to a background task.
    pub fn submit_entry(&mut self) {
        let Some(key) = self.open_key() else {
            return;
        };
        if self.submit.is_busy() {
            return;
        }
        let draft = self.entry_form.draft(key.clone());
        if let Err(error) = draft.validate() {
            self.notices
                .show_for(error.to_string(), Severity::Error, SUBMIT_NOTICE_SECONDS);
            return;
        }
        if let Err(error) = self.submit.process_event(&SubmitEvent::Start) {
            warn!(%error, "submit state machine refused to start");
            return;
        }

        let ticket = self.next_ticket(key);
        self.pending.submit = Some(ticket.id);
        let actions = self.actions.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = actions.submit_entry(&draft).await;
            tx.send(AppMessage::EntrySubmitted { ticket, result }).ok();
        });
    }

    pub fn request_delete(&mut self) {
        if self.timeline.selected_entry().is_some() {
            self.screen = AppScreen::DeleteConfirm;
        }
    }

    pub fn confirm_delete(&mut self) {
        self.screen = AppScreen::Map;
        let (Some(key), Some(entry)) = (self.open_key(), self.timeline.selected_entry()) else {
            return;
        };
        let id = entry.id;

        let ticket = self.next_ticket(key);
        self.pending.delete = Some(ticket.id);
        let actions = self.actions.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = actions.delete_entry(id).await.map(|()| id);
            tx.send(AppMessage::EntryDeleted { ticket, result }).ok();
        });
    }

    pub fn handle_message(&mut self, message: AppMessage) {
        match message {
            AppMessage::GeographyLoaded(outcome) => {
                self.loading = false;
                if let LoadOutcome::Failed(error) = &outcome {
                    self.notices.show(error.to_string(), Severity::Error);
                }
                let loaded = outcome.is_loaded();
                self.map.apply_load(outcome);
                if loaded {
                    self.update_search();
                }
            }
            AppMessage::TimelineLoaded { ticket, result } => {
                if !self.is_current(&ticket, self.pending.timeline) {
                    debug!(id = ticket.id, key = %ticket.key, "dropping stale timeline result");
                    return;
                }
                self.pending.timeline = None;
                self.timeline.loading = false;
                match result {
                    Ok(entries) => {
                        self.timeline.selected =
                            self.timeline.selected.min(entries.len().saturating_sub(1));
                        self.timeline.entries = entries;
                        self.timeline.error = None;
                    }
                    Err(error) => {
                        warn!(%error, "timeline unavailable");
                        self.timeline.error = Some(error);
                    }
                }
            }
            AppMessage::EntrySubmitted { ticket, result } => {
                if self.pending.submit != Some(ticket.id) {
                    debug!(id = ticket.id, "dropping superseded submit result");
                    return;
                }
                self.pending.submit = None;
                let event = match &result {
                    Ok(record) => SubmitEvent::Saved(record.id),
                    Err(error) => SubmitEvent::Failed(error.to_string()),
                };
                self.finish_submit(&event);

                // A saved entry must not be offered again, even if its panel has closed
                if result.is_ok() && self.entry_form.key.as_ref() == Some(&ticket.key) {
                    self.reset_entry_form(Some(ticket.key.clone()));
                }

                if !self.is_current(&ticket, Some(ticket.id)) {
                    debug!(key = %ticket.key, "panel closed before the submit finished");
                    return;
                }
                match result {
                    Ok(_) => {
                        self.notices
                            .show_for("Entry saved", Severity::Success, SUBMIT_NOTICE_SECONDS);
                        if self.screen == AppScreen::EntryForm {
                            self.screen = AppScreen::Map;
                        }
                        self.request_timeline(ticket.key);
                    }
                    Err(error) => {
                        if !error.is_validation() {
                            warn!(%error, key = %ticket.key, "timeline entry not saved");
                        }
                        self.notices
                            .show_for(error.to_string(), Severity::Error, SUBMIT_NOTICE_SECONDS);
                    }
                }
            }
            AppMessage::EntryDeleted { ticket, result } => {
                if !self.is_current(&ticket, self.pending.delete) {
                    debug!(id = ticket.id, key = %ticket.key, "dropping stale delete result");
                    return;
                }
                self.pending.delete = None;
                match result {
                    Ok(_) => {
                        self.notices.show("Entry deleted", Severity::Success);
                        self.request_timeline(ticket.key);
                    }
                    Err(error) => self.notices.show(error.to_string(), Severity::Error),
                }
            }
        }
    }

    fn finish_submit(&mut self, event: &SubmitEvent) {
        let result = self
            .submit
            .process_event(event)
            .and_then(|()| self.submit.process_event(&SubmitEvent::Reset));
        if let Err(error) = result {
            warn!(%error, "submit state machine out of step");
            self.submit = SubmitMachine::new();
        }
    }

    /// Re-rank regions against the search query
    pub fn update_search(&mut self) {
        let matcher = SkimMatcherV2::default();
        let query = self.search.query.trim();
        let mut scored: Vec<(i64, RegionKey, String)> = self
            .map
            .regions()
            .iter()
            .filter_map(|region| {
                let feature = &region.feature;
                if query.is_empty() {
                    return Some((0, feature.key.clone(), feature.display_name.clone()));
                }
                let by_name = matcher.fuzzy_match(&feature.display_name, query);
                let by_key = matcher.fuzzy_match(feature.key.as_str(), query);
                by_name
                    .max(by_key)
                    .map(|score| (score, feature.key.clone(), feature.display_name.clone()))
            })
            .collect();
        scored.sort_by(|a, b| b.0.cmp(&a.0));

        self.search.matches = scored
            .into_iter()
            .map(|(_, key, name)| (key, name))
            .collect();
        self.search.selected = 0;
    }

    pub fn quit(&mut self) {
        self.running = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    const TWO_REGIONS: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            { "type": "Feature", "properties": { "nam": "Aomori Ken", "nam_ja": "青森県" },
              "geometry": { "type": "Polygon",
                "coordinates": [[[140.0, 40.5], [141.5, 40.5], [141.5, 41.5], [140.0, 41.5], [140.0, 40.5]]] } },
            { "type": "Feature", "properties": { "nam": "Tokyo To", "nam_ja": "東京都" },
              "geometry": { "type": "Polygon",
                "coordinates": [[[139.0, 35.5], [139.9, 35.5], [139.9, 35.9], [139.0, 35.9], [139.0, 35.5]]] } }
        ]
    }"#;

    fn test_app() -> App {
        let config = AppConfig {
            database_url: "sqlite::memory:".to_string(),
            geojson_source: String::new(),
            image_dir: PathBuf::from("unused"),
            nickname: "tester".to_string(),
            log_file: PathBuf::from("test.log"),
        };
        let mut app = App::new(&config);
        app.handle_message(AppMessage::GeographyLoaded(LoadOutcome::from_body(Ok(
            TWO_REGIONS.to_string(),
        ))));
        app
    }

    fn record(id: i64, prefecture: &str) -> TimelineRecord {
        TimelineRecord {
            id,
            image_path: "file:///tmp/a.png".to_string(),
            explanatory: "snow".to_string(),
            writer_name: "tester".to_string(),
            prefecture: prefecture.to_string(),
            created_at: "2024-01-01T00:00:00.000Z".to_string(),
            updated_at: "2024-01-01T00:00:00.000Z".to_string(),
        }
    }

    fn ticket(id: u64, key: &str) -> RequestTicket {
        RequestTicket {
            id,
            key: RegionKey::from(key),
        }
    }

    #[tokio::test]
    async fn focusing_issues_a_timeline_request() {
        let mut app = test_app();
        app.dispatch(MapEvent::Focus(RegionKey::from("Aomori Ken")));
        assert_eq!(app.timeline.key, Some(RegionKey::from("Aomori Ken")));
        assert!(app.timeline.loading);
        assert_eq!(app.pending.timeline, Some(1));
    }

    #[tokio::test]
    async fn older_timeline_results_are_dropped() {
        let mut app = test_app();
        app.dispatch(MapEvent::Focus(RegionKey::from("Aomori Ken")));
        app.dispatch(MapEvent::Focus(RegionKey::from("Tokyo To")));

        app.handle_message(AppMessage::TimelineLoaded {
            ticket: ticket(1, "Aomori Ken"),
            result: Ok(vec![record(1, "Aomori Ken")]),
        });
        assert!(app.timeline.entries.is_empty());

        app.handle_message(AppMessage::TimelineLoaded {
            ticket: ticket(2, "Tokyo To"),
            result: Ok(vec![record(2, "Tokyo To")]),
        });
        assert_eq!(app.timeline.entries.len(), 1);
        assert!(!app.timeline.loading);
    }

    #[tokio::test]
    async fn results_after_close_are_dropped() {
        let mut app = test_app();
        app.dispatch(MapEvent::Focus(RegionKey::from("Aomori Ken")));
        app.dispatch(MapEvent::ClosePanel);

        app.handle_message(AppMessage::TimelineLoaded {
            ticket: ticket(1, "Aomori Ken"),
            result: Ok(vec![record(1, "Aomori Ken")]),
        });
        assert!(app.timeline.entries.is_empty());
        assert_eq!(app.screen, AppScreen::Map);
    }

    #[tokio::test]
    async fn invalid_entry_never_leaves_the_form() {
        let mut app = test_app();
        app.dispatch(MapEvent::Focus(RegionKey::from("Tokyo To")));
        app.open_entry_form();
        app.entry_form.description = "no image yet".to_string();

        app.submit_entry();
        assert!(!app.submit.is_busy());
        assert_eq!(app.screen, AppScreen::EntryForm);
        assert_eq!(
            app.notices.current().map(|notice| notice.severity),
            Some(Severity::Error)
        );
        assert_eq!(app.entry_form.description, "no image yet");
    }

    #[tokio::test]
    async fn failed_submit_keeps_the_form_for_resubmission() {
        let mut app = test_app();
        app.dispatch(MapEvent::Focus(RegionKey::from("Tokyo To")));
        app.open_entry_form();
        app.entry_form.image_path = "/tmp/photo.png".to_string();
        app.entry_form.description = "rain".to_string();

        app.submit_entry();
        assert!(app.submit.is_busy());
        let id = app.pending.submit.unwrap_or_default();

        app.handle_message(AppMessage::EntrySubmitted {
            ticket: ticket(id, "Tokyo To"),
            result: Err(MapError::PersistenceFailure("disk full".to_string())),
        });
        assert!(!app.submit.is_busy());
        assert_eq!(app.screen, AppScreen::EntryForm);
        assert_eq!(app.entry_form.description, "rain");
        assert_eq!(
            app.notices.current().map(|notice| notice.duration),
            Some(SUBMIT_NOTICE_SECONDS)
        );
    }

    #[tokio::test]
    async fn successful_submit_closes_the_form() {
        let mut app = test_app();
        app.dispatch(MapEvent::Focus(RegionKey::from("Tokyo To")));
        app.open_entry_form();
        app.entry_form.image_path = "/tmp/photo.png".to_string();

        app.submit_entry();
        let id = app.pending.submit.unwrap_or_default();
        app.handle_message(AppMessage::EntrySubmitted {
            ticket: ticket(id, "Tokyo To"),
            result: Ok(record(9, "Tokyo To")),
        });

        assert_eq!(app.screen, AppScreen::Map);
        assert!(app.entry_form.image_path.is_empty());
        assert_eq!(app.entry_form.nickname, "tester");
        assert_eq!(
            app.notices.current().map(|notice| notice.message.as_str()),
            Some("Entry saved")
        );
    }

    #[tokio::test]
    async fn saved_entry_is_not_offered_to_another_prefecture() {
        let mut app = test_app();
        app.dispatch(MapEvent::Focus(RegionKey::from("Tokyo To")));
        app.open_entry_form();
        app.entry_form.image_path = "/tmp/tokyo.png".to_string();
        app.entry_form.description = "tokyo rain".to_string();
        app.submit_entry();
        let id = app.pending.submit.unwrap_or_default();

        app.dispatch(MapEvent::Focus(RegionKey::from("Aomori Ken")));
        app.handle_message(AppMessage::EntrySubmitted {
            ticket: ticket(id, "Tokyo To"),
            result: Ok(record(9, "Tokyo To")),
        });
        assert!(!app.submit.is_busy());
        assert_ne!(
            app.notices.current().map(|notice| notice.message.as_str()),
            Some("Entry saved")
        );

        app.open_entry_form();
        assert_eq!(app.entry_form.key, Some(RegionKey::from("Aomori Ken")));
        assert!(app.entry_form.image_path.is_empty());
        assert!(app.entry_form.description.is_empty());
        assert_eq!(app.entry_form.nickname, "tester");
    }

    #[tokio::test]
    async fn submit_result_after_close_still_clears_the_saved_form() {
        let mut app = test_app();
        app.dispatch(MapEvent::Focus(RegionKey::from("Tokyo To")));
        app.open_entry_form();
        app.entry_form.image_path = "/tmp/tokyo.png".to_string();
        app.submit_entry();
        let id = app.pending.submit.unwrap_or_default();
        app.dispatch(MapEvent::ClosePanel);

        app.handle_message(AppMessage::EntrySubmitted {
            ticket: ticket(id, "Tokyo To"),
            result: Ok(record(9, "Tokyo To")),
        });
        assert_eq!(app.screen, AppScreen::Map);

        app.dispatch(MapEvent::Focus(RegionKey::from("Tokyo To")));
        app.open_entry_form();
        assert!(app.entry_form.image_path.is_empty());
    }

    #[tokio::test]
    async fn failed_submit_after_close_keeps_the_form_for_its_prefecture() {
        let mut app = test_app();
        app.dispatch(MapEvent::Focus(RegionKey::from("Tokyo To")));
        app.open_entry_form();
        app.entry_form.image_path = "/tmp/tokyo.png".to_string();
        app.submit_entry();
        let id = app.pending.submit.unwrap_or_default();
        app.dispatch(MapEvent::ClosePanel);

        app.handle_message(AppMessage::EntrySubmitted {
            ticket: ticket(id, "Tokyo To"),
            result: Err(MapError::PersistenceFailure("disk full".to_string())),
        });
        assert!(!app.submit.is_busy());

        app.dispatch(MapEvent::Focus(RegionKey::from("Tokyo To")));
        app.open_entry_form();
        assert_eq!(app.entry_form.image_path, "/tmp/tokyo.png");
    }

    #[tokio::test]
    async fn delete_result_after_close_is_dropped() {
        let mut app = test_app();
        app.dispatch(MapEvent::Focus(RegionKey::from("Tokyo To")));
        let timeline_id = app.pending.timeline.unwrap_or_default();
        app.handle_message(AppMessage::TimelineLoaded {
            ticket: ticket(timeline_id, "Tokyo To"),
            result: Ok(vec![record(4, "Tokyo To")]),
        });
        app.request_delete();
        assert_eq!(app.screen, AppScreen::DeleteConfirm);
        app.confirm_delete();
        let id = app.pending.delete.unwrap_or_default();
        app.dispatch(MapEvent::ClosePanel);

        app.handle_message(AppMessage::EntryDeleted {
            ticket: ticket(id, "Tokyo To"),
            result: Ok(4),
        });
        assert!(app.pending.timeline.is_none());
        assert!(app.timeline.entries.is_empty());
        assert_ne!(
            app.notices.current().map(|notice| notice.message.as_str()),
            Some("Entry deleted")
        );
    }

    #[test]
    fn failed_geography_load_leaves_an_empty_map() {
        let config = AppConfig {
            database_url: String::new(),
            geojson_source: String::new(),
            image_dir: PathBuf::from("unused"),
            nickname: String::new(),
            log_file: PathBuf::from("test.log"),
        };
        let mut app = App::new(&config);
        app.loading = true;
        app.handle_message(AppMessage::GeographyLoaded(LoadOutcome::Failed(
            MapError::LoadFailure("offline".to_string()),
        )));
        assert!(!app.loading);
        assert!(app.map.regions().is_empty());
        assert!(app.search.matches.is_empty());
        assert!(app.notices.current().is_some());
    }

    #[test]
    fn search_ranks_matching_prefectures() {
        let mut app = test_app();
        assert_eq!(app.search.matches.len(), 2);
        app.search.query = "tokyo".to_string();
        app.update_search();
        assert_eq!(
            app.search.matches.first().map(|(key, _)| key.as_str()),
            Some("Tokyo To")
        );
    }
}
