use std::collections::{BTreeMap, BTreeSet};

use tracing::{debug, warn};

use crate::animation::{Fade, FocusAnimation};
use crate::annotations::AnnotationTable;
use crate::domain::{RegionAnnotation, RegionFeature, RegionKey};
use crate::error::MapError;
use crate::geometry::ProjectedRegion;
use crate::loader::LoadOutcome;
use crate::projection::{Mercator, SURFACE_HEIGHT, SURFACE_WIDTH};
use crate::transform::{ViewTransform, Viewport};

/// Input the map reacts to. Coordinates are on the drawing surface
/// (`800 x 600`), already mapped from whatever the front end draws into.
#[derive(Debug, Clone, PartialEq)]
pub enum MapEvent {
    PointerMove { x: f64, y: f64 },
    PointerLeave,
    Click { x: f64, y: f64 },
    /// Focus a region by key, as a click on it would.
    Focus(RegionKey),
    /// Keyboard stand-in for the pointer: move hover through regions in load order.
    HoverNext,
    HoverPrevious,
    FocusHovered,
    DragStart { x: f64, y: f64 },
    DragMove { x: f64, y: f64 },
    DragEnd,
    /// Multiply the scale by `factor` around `anchor` (surface centre when `None`).
    Zoom {
        anchor: Option<(f64, f64)>,
        factor: f64,
    },
    Pan { dx: f64, dy: f64 },
    ClosePanel,
    OpenEdit,
    SubmitEdit,
    CancelEdit,
    /// Frame clock in seconds.
    Tick(f64),
}

/// What changed as a result of an event, for front ends that react to changes
/// rather than re-reading the whole state.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    Highlight(RegionKey),
    Unhighlight(RegionKey),
    PanelOpened(RegionKey),
    PanelClosed(RegionKey),
    EditOpened(RegionKey),
    EditClosed(RegionKey),
    AnnotationUpdated(RegionKey),
    AnimationStarted(ViewTransform),
    AnimationCancelled,
    AnimationFinished,
    Rejected(MapError),
}

/// Where the interaction currently is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Hovering(RegionKey),
    Focused(RegionKey),
    Editing(RegionKey),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionState {
    pub selected: Option<RegionKey>,
    pub hover: Option<RegionKey>,
    pub detail_open: bool,
    pub edit_open: bool,
}

/// Working copy of an annotation while the edit panel is open.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditBuffer {
    pub description: String,
    pub preview_image: String,
}

/// Content for the detail panel of the selected region.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Panel {
    pub key: RegionKey,
    pub annotation: RegionAnnotation,
    /// True when the table had no entry and placeholder content is shown.
    pub placeholder: bool,
}

/// Owns every piece of map interaction state and applies events to it.
///
/// Manual gestures (drag, zoom, pan) cancel a running focus animation and
/// continue from the transform it had reached.
#[derive(Debug)]
pub struct MapController {
    projection: Mercator,
    viewport: Viewport,
    regions: Vec<ProjectedRegion>,
    annotations: AnnotationTable,
    transform: ViewTransform,
    selection: SelectionState,
    animation: Option<FocusAnimation>,
    drag_from: Option<(f64, f64)>,
    edit: Option<EditBuffer>,
    fades: BTreeMap<RegionKey, Fade>,
    load_error: Option<MapError>,
}

impl Default for MapController {
    fn default() -> Self {
        Self::new()
    }
}

impl MapController {
    /// An empty map, as shown while the geography is still loading.
    pub fn new() -> Self {
        Self {
            projection: Mercator::japan(),
            viewport: Viewport::new(SURFACE_WIDTH, SURFACE_HEIGHT),
            regions: Vec::new(),
            annotations: AnnotationTable::default(),
            transform: ViewTransform::IDENTITY,
            selection: SelectionState::default(),
            animation: None,
            drag_from: None,
            edit: None,
            fades: BTreeMap::new(),
            load_error: None,
        }
    }

    pub fn with_features(features: Vec<RegionFeature>, annotations: AnnotationTable) -> Self {
        let mut controller = Self::new();
        controller.set_regions(features, annotations);
        controller
    }

    /// Install the result of the geography load. A failed load leaves the map empty.
    pub fn apply_load(&mut self, outcome: LoadOutcome) {
        match outcome {
            LoadOutcome::Loaded {
                features,
                annotations,
            } => self.set_regions(features, annotations),
            LoadOutcome::Failed(error) => {
                self.regions.clear();
                self.annotations = AnnotationTable::default();
                self.load_error = Some(error);
            }
        }
    }

    fn set_regions(&mut self, features: Vec<RegionFeature>, annotations: AnnotationTable) {
        let projection = self.projection;
        self.regions = features
            .into_iter()
            .filter_map(|feature| ProjectedRegion::new(feature, &projection))
            .collect();
        let loaded: BTreeSet<&RegionKey> =
            self.regions.iter().map(|region| &region.feature.key).collect();
        let mut annotations = annotations;
        annotations.retain(|key| {
            let kept = loaded.contains(key);
            if !kept {
                warn!(%key, "region has no drawable geometry, dropping its annotation");
            }
            kept
        });
        self.annotations = annotations;
        self.load_error = None;
    }

    pub fn handle(&mut self, event: MapEvent) -> Vec<Effect> {
        let mut effects = Vec::new();
        match event {
            MapEvent::PointerMove { x, y } => {
                let key = self.region_at((x, y)).map(|region| region.feature.key.clone());
                self.set_hover(key, &mut effects);
            }
            MapEvent::PointerLeave => self.set_hover(None, &mut effects),
            MapEvent::Click { x, y } => {
                if let Some(key) = self.region_at((x, y)).map(|region| region.feature.key.clone())
                {
                    self.focus(&key, &mut effects);
                }
            }
            MapEvent::Focus(key) => self.focus(&key, &mut effects),
            MapEvent::HoverNext => self.step_hover(true, &mut effects),
            MapEvent::HoverPrevious => self.step_hover(false, &mut effects),
            MapEvent::FocusHovered => {
                if let Some(key) = self.selection.hover.clone() {
                    self.focus(&key, &mut effects);
                }
            }
            MapEvent::DragStart { x, y } => {
                self.cancel_animation(&mut effects);
                self.drag_from = Some((x, y));
            }
            MapEvent::DragMove { x, y } => {
                if let Some((from_x, from_y)) = self.drag_from {
                    self.cancel_animation(&mut effects);
                    self.transform = self.transform.pan(x - from_x, y - from_y);
                    self.drag_from = Some((x, y));
                }
            }
            MapEvent::DragEnd => self.drag_from = None,
            MapEvent::Zoom { anchor, factor } => {
                self.cancel_animation(&mut effects);
                let anchor = anchor.unwrap_or_else(|| self.viewport.center());
                self.transform = self.transform.zoom_about(anchor, factor);
            }
            MapEvent::Pan { dx, dy } => {
                self.cancel_animation(&mut effects);
                self.transform = self.transform.pan(dx, dy);
            }
            MapEvent::ClosePanel => self.close_panel(&mut effects),
            MapEvent::OpenEdit => self.open_edit(&mut effects),
            MapEvent::SubmitEdit => self.submit_edit(&mut effects),
            MapEvent::CancelEdit => self.cancel_edit(&mut effects),
            MapEvent::Tick(now) => self.tick(now, &mut effects),
        }
        effects
    }

    fn set_hover(&mut self, key: Option<RegionKey>, effects: &mut Vec<Effect>) {
        if self.selection.hover == key {
            return;
        }
        if let Some(previous) = self.selection.hover.take() {
            if let Some(fade) = self.fades.get_mut(&previous) {
                fade.set_rising(false);
            }
            effects.push(Effect::Unhighlight(previous));
        }
        if let Some(next) = key {
            self.fades
                .entry(next.clone())
                .and_modify(|fade| fade.set_rising(true))
                .or_insert_with(Fade::rising);
            effects.push(Effect::Highlight(next.clone()));
            self.selection.hover = Some(next);
        }
    }

    fn step_hover(&mut self, forward: bool, effects: &mut Vec<Effect>) {
        let len = self.regions.len();
        if len == 0 {
            return;
        }
        let current = self
            .selection
            .hover
            .as_ref()
            .and_then(|key| self.region_index(key.as_str()));
        let next = match (current, forward) {
            (None, true) => 0,
            (None, false) => len - 1,
            (Some(index), true) => (index + 1) % len,
            (Some(index), false) => (index + len - 1) % len,
        };
        let key = self.regions[next].feature.key.clone();
        self.set_hover(Some(key), effects);
    }

    fn focus(&mut self, key: &RegionKey, effects: &mut Vec<Effect>) {
        let Some(region) = self.region(key.as_str()) else {
            debug!(%key, "focus requested for a region that is not loaded");
            return;
        };
        let target = ViewTransform::focus(&region.bounds, self.viewport);

        if self.selection.edit_open {
            self.cancel_edit(effects);
        }

        let already_open =
            self.selection.detail_open && self.selection.selected.as_ref() == Some(key);
        if !already_open {
            if !self.annotations.contains(key.as_str()) {
                warn!(error = %MapError::LookupMiss(key.to_string()), "showing placeholder panel");
            }
            self.selection.selected = Some(key.clone());
            self.selection.detail_open = true;
            effects.push(Effect::PanelOpened(key.clone()));
        }

        let heading_there = self
            .animation
            .as_ref()
            .is_some_and(|animation| animation.target() == target);
        if self.transform != target && !heading_there {
            self.animation = Some(FocusAnimation::new(self.transform, target));
            effects.push(Effect::AnimationStarted(target));
        }
    }

    fn cancel_animation(&mut self, effects: &mut Vec<Effect>) {
        if self.animation.take().is_some() {
            effects.push(Effect::AnimationCancelled);
        }
    }

    fn close_panel(&mut self, effects: &mut Vec<Effect>) {
        if !self.selection.detail_open {
            return;
        }
        if self.selection.edit_open {
            self.cancel_edit(effects);
        }
        self.selection.detail_open = false;
        if let Some(key) = self.selection.selected.take() {
            effects.push(Effect::PanelClosed(key));
        }
    }

    fn open_edit(&mut self, effects: &mut Vec<Effect>) {
        if !self.selection.detail_open || self.selection.edit_open {
            return;
        }
        let Some(panel) = self.panel() else {
            return;
        };
        self.edit = Some(EditBuffer {
            description: panel.annotation.description,
            preview_image: panel.annotation.preview_image,
        });
        self.selection.edit_open = true;
        effects.push(Effect::EditOpened(panel.key));
    }

    fn submit_edit(&mut self, effects: &mut Vec<Effect>) {
        let (Some(key), Some(buffer)) = (self.selection.selected.clone(), self.edit.as_ref())
        else {
            return;
        };
        if !self.selection.edit_open {
            return;
        }

        let buffer = buffer.clone();
        if let Err(error) = self
            .annotations
            .update_description(key.as_str(), &buffer.description)
            .and_then(|()| self.annotations.update_image(key.as_str(), &buffer.preview_image))
        {
            effects.push(Effect::Rejected(error));
            return;
        }

        self.edit = None;
        self.selection.edit_open = false;
        effects.push(Effect::AnnotationUpdated(key.clone()));
        effects.push(Effect::EditClosed(key));
    }

    fn cancel_edit(&mut self, effects: &mut Vec<Effect>) {
        if !self.selection.edit_open {
            return;
        }
        self.edit = None;
        self.selection.edit_open = false;
        if let Some(key) = self.selection.selected.clone() {
            effects.push(Effect::EditClosed(key));
        }
    }

    fn tick(&mut self, now: f64, effects: &mut Vec<Effect>) {
        if let Some(animation) = &mut self.animation {
            self.transform = animation.advance(now);
            if animation.is_finished() {
                self.animation = None;
                effects.push(Effect::AnimationFinished);
            }
        }
        for fade in self.fades.values_mut() {
            fade.advance(now);
        }
        self.fades.retain(|_, fade| !fade.is_gone());
    }

    /// Region under a surface point, honouring the current pan and zoom.
    pub fn region_at(&self, point: (f64, f64)) -> Option<&ProjectedRegion> {
        let (x, y) = self.transform.invert(point);
        let (lon, lat) = self.projection.invert(x, y);
        self.regions
            .iter()
            .find(|region| region.contains_lon_lat(lon, lat))
    }

    pub fn region(&self, key: &str) -> Option<&ProjectedRegion> {
        self.regions
            .iter()
            .find(|region| region.feature.key.as_str() == key)
    }

    fn region_index(&self, key: &str) -> Option<usize> {
        self.regions
            .iter()
            .position(|region| region.feature.key.as_str() == key)
    }

    pub fn phase(&self) -> Phase {
        let selection = &self.selection;
        match (&selection.selected, &selection.hover) {
            (Some(key), _) if selection.edit_open => Phase::Editing(key.clone()),
            (Some(key), _) if selection.detail_open => Phase::Focused(key.clone()),
            (_, Some(key)) => Phase::Hovering(key.clone()),
            _ => Phase::Idle,
        }
    }

    /// Detail panel content, or `None` when the panel is closed.
    pub fn panel(&self) -> Option<Panel> {
        if !self.selection.detail_open {
            return None;
        }
        let key = self.selection.selected.clone()?;
        if let Some(annotation) = self.annotations.get(key.as_str()) {
            return Some(Panel {
                key,
                annotation: annotation.clone(),
                placeholder: false,
            });
        }
        let display_name = self
            .region(key.as_str())
            .map_or_else(|| key.to_string(), |region| region.feature.display_name.clone());
        let index = self.region_index(key.as_str()).unwrap_or_default();
        Some(Panel {
            annotation: RegionAnnotation::placeholder(&display_name, index),
            key,
            placeholder: true,
        })
    }

    /// Fill intensity of the hover highlight for `key`, in `[0, 1]`.
    pub fn hover_level(&self, key: &str) -> f64 {
        self.fades.get(key).map_or(0.0, Fade::level)
    }

    pub fn edit_buffer(&self) -> Option<&EditBuffer> {
        self.edit.as_ref()
    }

    pub fn edit_buffer_mut(&mut self) -> Option<&mut EditBuffer> {
        self.edit.as_mut()
    }

    pub const fn selection(&self) -> &SelectionState {
        &self.selection
    }

    /// Transform currently on screen (mid-animation values included).
    pub const fn transform(&self) -> ViewTransform {
        self.transform
    }

    /// Where the running focus animation will end, if one is running.
    pub fn animation_target(&self) -> Option<ViewTransform> {
        self.animation.as_ref().map(FocusAnimation::target)
    }

    pub const fn is_animating(&self) -> bool {
        self.animation.is_some()
    }

    pub fn regions(&self) -> &[ProjectedRegion] {
        &self.regions
    }

    pub const fn annotations(&self) -> &AnnotationTable {
        &self.annotations
    }

    /// Replace annotations with edited entries saved elsewhere, for known regions only.
    pub fn import_annotations(&mut self, table: AnnotationTable) -> usize {
        self.annotations.merge_known(table)
    }

    pub const fn load_error(&self) -> Option<&MapError> {
        self.load_error.as_ref()
    }

    pub const fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub const fn projection(&self) -> &Mercator {
        &self.projection
    }
}
