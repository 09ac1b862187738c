use std::collections::{HashMap, HashSet};

use meadow_shared::path::ROOT_PATH;
use meadow_shared::{Category, CreateFlower, Flower, ValidationError, WorldPoint, flower_path};
use thiserror::Error;

use crate::camera::{Camera, edge_velocity};
use crate::config::FieldConfig;
use crate::culling::visible;
use crate::effects::EffectTimers;
use crate::mode::Mode;
use crate::navigation::NavigationPort;
use crate::store::{FlowerStore, StoreError};
use crate::transform::{Placement, place};
use crate::viewport::Viewport;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldError {
    #[error("couldn't load the meadow: {0}")]
    LoadFailure(String),
    #[error("couldn't find flower `{slug}`: {reason}")]
    ResolutionFailure { slug: String, reason: String },
    #[error(transparent)]
    ValidationFailure(#[from] ValidationError),
    #[error("that spot was just taken ({0}), try again")]
    CreateConflict(String),
    #[error("couldn't plant the flower: {0}")]
    CreateFailure(String),
    #[error("no planting in progress")]
    NotPlacing,
    #[error("a planting is already being submitted")]
    SubmitInProgress,
}

impl FieldError {
    /// Errors raised by the plant form, as opposed to banner-level errors.
    pub fn is_placement(&self) -> bool {
        matches!(
            self,
            FieldError::ValidationFailure(_)
                | FieldError::CreateConflict(_)
                | FieldError::CreateFailure(_)
        )
    }
}

/// Local slug → flower mapping. Append-only; the first insert for a slug wins.
#[derive(Debug, Clone, Default)]
pub struct FlowerMap {
    by_slug: HashMap<String, Flower>,
}

impl FlowerMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns false, leaving the stored value untouched, if the slug is known.
    pub fn insert(&mut self, flower: Flower) -> bool {
        if self.by_slug.contains_key(&flower.slug) {
            return false;
        }
        self.by_slug.insert(flower.slug.clone(), flower);
        true
    }

    pub fn get(&self, slug: &str) -> Option<&Flower> {
        self.by_slug.get(slug)
    }

    pub fn contains(&self, slug: &str) -> bool {
        self.by_slug.contains_key(slug)
    }

    pub fn len(&self) -> usize {
        self.by_slug.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_slug.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Flower> {
        self.by_slug.values()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadState {
    #[default]
    Idle,
    Loading,
    Ready,
    Failed,
}

impl LoadState {
    pub fn is_settled(self) -> bool {
        matches!(self, LoadState::Ready | LoadState::Failed)
    }
}

/// Raw contents of the plant form. The world point comes from the mode.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlantForm {
    pub title: String,
    pub message: String,
    pub author: String,
    pub category: Category,
}

impl PlantForm {
    fn into_create(self, position: WorldPoint) -> CreateFlower {
        CreateFlower {
            title: self.title,
            message: self.message,
            author: Some(self.author),
            category: self.category,
            position,
        }
    }
}

/// An in-flight create. Hand `input` to the store and the answer back to
/// `Field::finish_placement_submit`; cancelling the placement makes it stale.
#[derive(Debug, Clone, PartialEq)]
pub struct Submission {
    pub input: CreateFlower,
    nonce: u64,
}

/// One flower of a render pass.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedFlower<'a> {
    pub flower: &'a Flower,
    pub placement: Placement,
    pub highlighted: bool,
    pub twinkling: bool,
    pub tooltip: bool,
}

/// The meadow's interaction state: camera, mode, local flowers, effects and
/// the last error. Every change goes through a method here; the browser shell
/// only forwards events and reads the result.
pub struct Field<N: NavigationPort> {
    config: FieldConfig,
    viewport: Viewport,
    camera: Camera,
    mode: Mode,
    flowers: FlowerMap,
    load: LoadState,
    /// Nonce of the submission the open placement is waiting on.
    in_flight: Option<u64>,
    submit_nonce: u64,
    /// Latest clock the field has been told about, for arming new effects.
    clock_ms: f64,
    error: Option<FieldError>,
    highlights: EffectTimers<String>,
    hover: EffectTimers<String>,
    tooltip: Option<String>,
    twinkle: EffectTimers<String>,
    twinkling: HashSet<String>,
    nav: N,
}

impl<N: NavigationPort> Field<N> {
    pub fn new(config: FieldConfig, viewport: Viewport, nav: N) -> Self {
        Self {
            config,
            viewport,
            camera: Camera::default(),
            mode: Mode::Browsing,
            flowers: FlowerMap::new(),
            load: LoadState::Idle,
            in_flight: None,
            submit_nonce: 0,
            clock_ms: 0.0,
            error: None,
            highlights: EffectTimers::new(),
            hover: EffectTimers::new(),
            tooltip: None,
            twinkle: EffectTimers::new(),
            twinkling: HashSet::new(),
            nav,
        }
    }

    pub fn config(&self) -> &FieldConfig {
        &self.config
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn offset(&self) -> i64 {
        self.camera.offset()
    }

    pub fn mode(&self) -> &Mode {
        &self.mode
    }

    pub fn flowers(&self) -> &FlowerMap {
        &self.flowers
    }

    pub fn load_state(&self) -> LoadState {
        self.load
    }

    pub fn is_submitting(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn error(&self) -> Option<&FieldError> {
        self.error.as_ref()
    }

    pub fn dismiss_error(&mut self) -> bool {
        self.error.take().is_some()
    }

    pub fn tooltip(&self) -> Option<&str> {
        self.tooltip.as_deref()
    }

    pub fn is_highlighted(&self, slug: &str) -> bool {
        self.highlights.is_armed(slug)
    }

    pub fn nav(&self) -> &N {
        &self.nav
    }

    /// Adds a flower and arms its idle twinkle.
    pub fn insert_flower(&mut self, flower: Flower) -> bool {
        let slug = flower.slug.clone();
        if !self.flowers.insert(flower) {
            return false;
        }
        let period = self.config.twinkle_ms;
        let delay = period + twinkle_stagger(&slug, period);
        self.twinkle.arm(slug, self.clock_ms, delay);
        true
    }

    // ---- transitions ----

    fn enter_inspecting(&mut self, flower: Flower) {
        self.camera.save();
        self.camera.halt();
        self.clear_hover();
        log::debug!("inspecting {} at offset {}", flower.slug, self.camera.offset());
        self.mode = Mode::Inspecting { flower };
    }

    fn enter_placing(&mut self, point: WorldPoint) {
        self.camera.save();
        self.camera.halt();
        self.clear_hover();
        log::debug!("placing at ({}, {})", point.x, point.y);
        self.mode = Mode::Placing { point };
    }

    fn leave_zoom(&mut self) -> bool {
        if self.mode.is_browsing() {
            return false;
        }
        self.camera.restore();
        self.camera.halt();
        self.in_flight = None;
        log::debug!("leaving {} for offset {}", self.mode.name(), self.camera.offset());
        self.mode = Mode::Browsing;
        true
    }

    /// Click on a flower sprite. Ignored unless browsing.
    pub fn select_flower(&mut self, slug: &str) -> bool {
        if !self.mode.is_browsing() {
            return false;
        }
        let Some(flower) = self.flowers.get(slug).cloned() else {
            log::warn!("select_flower: unknown slug {slug}");
            return false;
        };
        self.enter_inspecting(flower);
        self.nav.push_location(&flower_path(slug));
        true
    }

    /// Click on empty canvas at screen `(px, py)`.
    pub fn click_canvas(&mut self, px: f64, py: f64) -> bool {
        match self.mode {
            Mode::Inspecting { .. } => self.close(),
            Mode::Placing { .. } => false,
            Mode::Browsing => {
                if !self.config.in_plantable_band(py) || !px.is_finite() {
                    return false;
                }
                let (x, y) = self.viewport.screen_to_world(px, py, self.camera.offset());
                self.enter_placing(WorldPoint::new(x, y));
                true
            }
        }
    }

    pub fn close(&mut self) -> bool {
        if !matches!(self.mode, Mode::Inspecting { .. }) {
            return false;
        }
        self.leave_zoom();
        self.nav.replace_location(ROOT_PATH);
        true
    }

    pub fn cancel(&mut self) -> bool {
        if !matches!(self.mode, Mode::Placing { .. }) {
            return false;
        }
        if self.error.as_ref().is_some_and(FieldError::is_placement) {
            self.error = None;
        }
        self.leave_zoom()
    }

    /// Escape: close an inspection, cancel a placement, else drop the error.
    pub fn dismiss(&mut self) -> bool {
        match self.mode {
            Mode::Inspecting { .. } => self.close(),
            Mode::Placing { .. } => self.cancel(),
            Mode::Browsing => self.dismiss_error(),
        }
    }

    /// Navigation-driven inspect; never writes history.
    pub(crate) fn inspect_from_navigation(&mut self, flower: Flower) -> bool {
        if self.mode.selected_slug() == Some(flower.slug.as_str()) {
            return false;
        }
        self.leave_zoom();
        self.enter_inspecting(flower);
        true
    }

    /// Navigation-driven return to browsing; never writes history.
    pub(crate) fn browse_from_navigation(&mut self) -> bool {
        self.leave_zoom()
    }

    pub(crate) fn fail_resolution(&mut self, slug: &str, err: &StoreError) {
        log::warn!("deep link {slug} failed: {err}");
        self.error = Some(FieldError::ResolutionFailure {
            slug: slug.to_owned(),
            reason: err.to_string(),
        });
        self.nav.replace_location(ROOT_PATH);
    }

    // ---- placement ----

    /// Validates the form against the pending point and marks the field as
    /// submitting.
    pub fn begin_placement_submit(&mut self, form: PlantForm) -> Result<Submission, FieldError> {
        let Some(point) = self.mode.placement_point() else {
            return Err(FieldError::NotPlacing);
        };
        if self.in_flight.is_some() {
            return Err(FieldError::SubmitInProgress);
        }

        match form.into_create(point).normalized() {
            Ok(input) => {
                if self.error.as_ref().is_some_and(FieldError::is_placement) {
                    self.error = None;
                }
                self.submit_nonce += 1;
                self.in_flight = Some(self.submit_nonce);
                Ok(Submission {
                    input,
                    nonce: self.submit_nonce,
                })
            }
            Err(err) => {
                let err = FieldError::from(err);
                self.error = Some(err.clone());
                Err(err)
            }
        }
    }

    /// Applies the store's answer. A created flower is always added and
    /// highlighted; only the placement that is still waiting on `submission`
    /// closes or shows the error.
    pub fn finish_placement_submit(
        &mut self,
        submission: &Submission,
        result: Result<Flower, StoreError>,
        now_ms: f64,
    ) -> Result<String, FieldError> {
        self.clock_ms = self.clock_ms.max(now_ms);
        let current = self.in_flight == Some(submission.nonce);
        if current {
            self.in_flight = None;
        }

        let err = match result {
            Ok(flower) => {
                let slug = flower.slug.clone();
                self.insert_flower(flower);
                self.highlights
                    .arm(slug.clone(), now_ms, self.config.highlight_ms);
                if current {
                    self.leave_zoom();
                    if self.error.as_ref().is_some_and(FieldError::is_placement) {
                        self.error = None;
                    }
                }
                log::debug!("planted {slug}");
                return Ok(slug);
            }
            Err(StoreError::Conflict(message)) => FieldError::CreateConflict(message),
            Err(other) => FieldError::CreateFailure(other.to_string()),
        };

        if current {
            log::warn!("planting failed: {err}");
            self.error = Some(err.clone());
        } else {
            log::debug!("ignoring stale planting failure: {err}");
        }
        Err(err)
    }

    pub async fn confirm_placement<S: FlowerStore>(
        &mut self,
        store: &S,
        form: PlantForm,
        now_ms: f64,
    ) -> Result<String, FieldError> {
        let submission = self.begin_placement_submit(form)?;
        let result = store.create(submission.input.clone()).await;
        self.finish_placement_submit(&submission, result, now_ms)
    }

    // ---- bulk load ----

    pub fn start_bulk_load(&mut self) {
        self.load = LoadState::Loading;
    }

    /// Returns how many new flowers were added.
    pub fn finish_bulk_load(&mut self, result: Result<Vec<Flower>, StoreError>) -> usize {
        match result {
            Ok(flowers) => {
                let added = flowers
                    .into_iter()
                    .map(|flower| self.insert_flower(flower))
                    .filter(|added| *added)
                    .count();
                self.load = LoadState::Ready;
                if matches!(self.error, Some(FieldError::LoadFailure(_))) {
                    self.error = None;
                }
                log::debug!("loaded {added} flowers");
                added
            }
            Err(err) => {
                log::warn!("bulk load failed: {err}");
                self.load = LoadState::Failed;
                self.error = Some(FieldError::LoadFailure(err.to_string()));
                0
            }
        }
    }

    pub async fn load_all<S: FlowerStore>(&mut self, store: &S) -> usize {
        self.start_bulk_load();
        let result = store.list(None).await;
        self.finish_bulk_load(result)
    }

    // ---- camera ----

    pub fn set_velocity(&mut self, velocity: f64) {
        self.camera.set_velocity(velocity, &self.mode);
    }

    /// Edge-scroll from the pointer's x within the viewport.
    pub fn pointer_moved(&mut self, px: f64) -> bool {
        let velocity = edge_velocity(px, self.viewport.width, self.config.edge);
        self.camera.set_velocity(velocity, &self.mode);
        self.camera.is_moving()
    }

    pub fn pointer_left(&mut self) {
        self.camera.set_velocity(0.0, &self.mode);
    }

    /// One animation frame. Returns whether another frame is wanted.
    pub fn tick(&mut self) -> bool {
        self.camera.tick(&self.mode)
    }

    /// Returns whether the key was handled.
    pub fn key_down(&mut self, key: &str) -> bool {
        match key {
            "Escape" => {
                self.dismiss();
                true
            }
            "ArrowLeft" => {
                self.set_velocity(self.config.edge.max_velocity);
                true
            }
            "ArrowRight" => {
                self.set_velocity(-self.config.edge.max_velocity);
                true
            }
            _ => false,
        }
    }

    pub fn key_up(&mut self, key: &str) -> bool {
        match key {
            "ArrowLeft" | "ArrowRight" => {
                self.set_velocity(0.0);
                true
            }
            _ => false,
        }
    }

    // ---- effects ----

    pub fn hover_enter(&mut self, slug: &str, now_ms: f64) {
        if !self.mode.is_browsing() {
            return;
        }
        if self.tooltip.as_deref() != Some(slug) {
            self.tooltip = None;
        }
        self.hover.clear();
        self.hover
            .arm(slug.to_owned(), now_ms, self.config.hover_delay_ms);
    }

    pub fn hover_leave(&mut self, slug: &str) {
        self.hover.cancel(slug);
        if self.tooltip.as_deref() == Some(slug) {
            self.tooltip = None;
        }
    }

    fn clear_hover(&mut self) {
        self.hover.clear();
        self.tooltip = None;
    }

    /// Fires every effect deadline at or before `now_ms`. Returns whether
    /// anything visible changed.
    pub fn advance(&mut self, now_ms: f64) -> bool {
        self.clock_ms = self.clock_ms.max(now_ms);
        let mut changed = !self.highlights.expire(now_ms).is_empty();

        if let Some(slug) = self.hover.expire(now_ms).pop()
            && self.mode.is_browsing()
        {
            self.tooltip = Some(slug);
            changed = true;
        }

        let period = self.config.twinkle_ms;
        for slug in self.twinkle.expire(now_ms) {
            if !self.twinkling.remove(&slug) {
                self.twinkling.insert(slug.clone());
            }
            self.twinkle.arm(slug, now_ms, period);
            changed = true;
        }

        changed
    }

    /// Earliest pending effect deadline, for scheduling the next `advance`.
    pub fn next_wake(&self) -> Option<f64> {
        [
            self.highlights.next_deadline(),
            self.hover.next_deadline(),
            self.twinkle.next_deadline(),
        ]
        .into_iter()
        .flatten()
        .reduce(f64::min)
    }

    /// Cancels every timer and stops the camera.
    pub fn teardown(&mut self) {
        self.highlights.clear();
        self.hover.clear();
        self.twinkle.clear();
        self.twinkling.clear();
        self.tooltip = None;
        self.camera.halt();
    }

    // ---- render ----

    /// Culled and placed flowers, back to front.
    pub fn render_list(&self) -> Vec<PlacedFlower<'_>> {
        let offset = self.camera.offset();
        let saved = self.camera.saved_offset();
        let mut out: Vec<PlacedFlower<'_>> = visible(
            self.flowers.iter(),
            &self.mode,
            offset,
            self.viewport.width,
            self.config.cull_buffer,
        )
        .into_iter()
        .map(|flower| PlacedFlower {
            flower,
            placement: place(flower, &self.mode, offset, saved, &self.viewport),
            highlighted: self.highlights.is_armed(flower.slug.as_str()),
            twinkling: self.twinkling.contains(&flower.slug),
            tooltip: self.tooltip.as_deref() == Some(flower.slug.as_str()),
        })
        .collect();

        out.sort_by(|a, b| {
            a.placement
                .stack_order
                .cmp(&b.placement.stack_order)
                .then_with(|| a.flower.y().cmp(&b.flower.y()))
                .then_with(|| a.flower.slug.cmp(&b.flower.slug))
        });
        out
    }
}

/// Spreads first twinkles over one period so the meadow doesn't blink in unison.
fn twinkle_stagger(slug: &str, period: f64) -> f64 {
    let hash = slug
        .bytes()
        .fold(0u32, |h, b| h.wrapping_mul(31).wrapping_add(u32::from(b)));
    f64::from(hash % 1000) / 1000.0 * period
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use futures::executor::block_on;

    use super::*;
    use crate::navigation::MemoryHistory;
    use crate::store::fake::FakeStore;
    use crate::transform::Treatment;

    fn flower(slug: &str, x: i64, y: i64) -> Flower {
        Flower {
            slug: slug.into(),
            title: format!("{slug} title"),
            message: "hello".into(),
            author: None,
            category: Category::Daisy,
            position: WorldPoint::new(x, y),
            created_at: Utc.timestamp_opt(1_700_000_000, 0).unwrap(),
        }
    }

    fn field() -> Field<MemoryHistory> {
        Field::new(
            FieldConfig::default(),
            Viewport::new(1024.0, 768.0),
            MemoryHistory::default(),
        )
    }

    fn scroll_to(field: &mut Field<MemoryHistory>, offset: i64) {
        let step = if offset < field.offset() { -1.0 } else { 1.0 };
        field.set_velocity(step);
        while field.offset() != offset {
            assert!(field.tick());
        }
        field.set_velocity(0.0);
    }

    fn form(title: &str) -> PlantForm {
        PlantForm {
            title: title.into(),
            message: "planted here".into(),
            author: String::new(),
            category: Category::Poppy,
        }
    }

    #[test]
    fn insert_is_idempotent_and_keeps_first_value() {
        let mut map = FlowerMap::new();
        assert!(map.insert(flower("a", 1, 1)));
        assert!(!map.insert(flower("a", 99, 99)));
        assert_eq!(map.len(), 1);
        assert_eq!(map.get("a").map(Flower::x), Some(1));
    }

    #[test]
    fn select_pushes_history_and_close_restores() {
        let mut field = field();
        field.insert_flower(flower("a", 100, 200));
        scroll_to(&mut field, -30);
        field.set_velocity(4.0);

        assert!(field.select_flower("a"));
        assert_eq!(field.mode().selected_slug(), Some("a"));
        assert_eq!(field.camera().velocity(), 0.0);
        assert_eq!(field.nav().entries(), ["/", "/f/a"]);
        assert!(!field.tick());

        assert!(field.close());
        assert!(field.mode().is_browsing());
        assert_eq!(field.offset(), -30);
        assert_eq!(field.nav().entries(), ["/", "/"]);
    }

    #[test]
    fn select_is_ignored_outside_browsing() {
        let mut field = field();
        field.insert_flower(flower("a", 0, 200));
        field.insert_flower(flower("b", 50, 200));
        assert!(field.select_flower("a"));
        assert!(!field.select_flower("b"));
        assert!(!field.select_flower("a"));
        assert_eq!(field.mode().selected_slug(), Some("a"));

        field.close();
        assert!(field.click_canvas(300.0, 200.0));
        assert!(!field.select_flower("a"));
        assert!(!field.select_flower("missing"));
    }

    #[test]
    fn click_canvas_respects_plantable_band() {
        let mut field = field();
        assert!(!field.click_canvas(500.0, 10.0));
        assert!(field.mode().is_browsing());
        assert!(field.click_canvas(500.0, 120.0));
        assert!(!field.click_canvas(600.0, 300.0));
        assert_eq!(
            field.mode().placement_point(),
            Some(WorldPoint::new(500, 120))
        );
    }

    #[test]
    fn click_canvas_while_inspecting_closes() {
        let mut field = field();
        field.insert_flower(flower("a", 0, 200));
        field.select_flower("a");
        assert!(field.click_canvas(10.0, 10.0));
        assert!(field.mode().is_browsing());
    }

    #[test]
    fn placement_scenario_highlights_then_clears() {
        let mut field = field();
        let store = FakeStore::default();
        scroll_to(&mut field, -50);

        assert!(field.click_canvas(500.0, 120.0));
        assert_eq!(
            field.mode().placement_point(),
            Some(WorldPoint::new(550, 120))
        );

        let slug = block_on(field.confirm_placement(&store, form("New bloom"), 10_000.0))
            .expect("placement succeeds");
        assert!(field.mode().is_browsing());
        assert_eq!(field.offset(), -50);
        assert_eq!(field.flowers().get(&slug).map(|f| f.position), Some(WorldPoint::new(550, 120)));
        assert!(field.is_highlighted(&slug));

        let highlight_ms = field.config().highlight_ms;
        field.advance(10_000.0 + highlight_ms - 1.0);
        assert!(field.is_highlighted(&slug));
        field.advance(10_000.0 + highlight_ms);
        assert!(!field.is_highlighted(&slug));
    }

    #[test]
    fn validation_failure_keeps_form_open() {
        let mut field = field();
        field.click_canvas(300.0, 300.0);
        let err = field.begin_placement_submit(form("   ")).unwrap_err();
        assert_eq!(err, FieldError::ValidationFailure(ValidationError::MissingTitle));
        assert_eq!(field.error(), Some(&err));
        assert!(!field.is_submitting());
        assert!(matches!(field.mode(), Mode::Placing { .. }));
    }

    #[test]
    fn submit_is_not_reentrant() {
        let mut field = field();
        assert_eq!(
            field.begin_placement_submit(form("x")),
            Err(FieldError::NotPlacing)
        );
        field.click_canvas(300.0, 300.0);
        field.begin_placement_submit(form("x")).expect("first submit");
        assert_eq!(
            field.begin_placement_submit(form("x")),
            Err(FieldError::SubmitInProgress)
        );
    }

    #[test]
    fn conflict_keeps_placing_for_retry() {
        let mut field = field();
        field.click_canvas(300.0, 300.0);
        let submission = field.begin_placement_submit(form("dup")).expect("submit");
        let err = field
            .finish_placement_submit(
                &submission,
                Err(StoreError::Conflict("dup-aaaaaa".into())),
                0.0,
            )
            .unwrap_err();
        assert_eq!(err, FieldError::CreateConflict("dup-aaaaaa".into()));
        assert!(matches!(field.mode(), Mode::Placing { .. }));
        assert!(!field.is_submitting());

        field.begin_placement_submit(form("dup")).expect("retry");
        assert_eq!(field.error(), None);
    }

    #[test]
    fn late_success_after_cancel_still_inserts() {
        let mut field = field();
        field.click_canvas(300.0, 300.0);
        let submission = field.begin_placement_submit(form("late")).expect("submit");
        assert!(field.cancel());
        let slug = field
            .finish_placement_submit(&submission, Ok(flower("late-000001", 300, 300)), 0.0)
            .expect("success");
        assert!(field.flowers().contains(&slug));
        assert!(field.is_highlighted(&slug));
        assert!(field.mode().is_browsing());
    }

    #[test]
    fn earlier_submission_does_not_close_a_newer_placement() {
        let mut field = field();
        field.click_canvas(300.0, 300.0);
        let first = field.begin_placement_submit(form("first")).expect("first submit");
        assert!(field.key_down("Escape"));
        assert!(field.click_canvas(700.0, 400.0));
        let second = field.begin_placement_submit(form("second")).expect("second submit");

        field
            .finish_placement_submit(&first, Ok(flower("first-000001", 300, 300)), 0.0)
            .expect("first lands");
        assert!(field.flowers().contains("first-000001"));
        assert_eq!(
            field.mode().placement_point(),
            Some(WorldPoint::new(700, 400))
        );
        assert!(field.is_submitting());

        let err = field
            .finish_placement_submit(&first, Err(StoreError::Status(500)), 0.0)
            .unwrap_err();
        assert_eq!(err, FieldError::CreateFailure("HTTP 500".into()));
        assert_eq!(field.error(), None);
        assert!(field.is_submitting());

        field
            .finish_placement_submit(&second, Ok(flower("second-000002", 700, 400)), 0.0)
            .expect("second lands");
        assert!(field.mode().is_browsing());
        assert!(!field.is_submitting());
    }

    #[test]
    fn offset_restores_across_mixed_sequences() {
        let mut field = field();
        let store = FakeStore::default();
        field.insert_flower(flower("a", 10, 200));

        for (round, target) in [-50i64, 30, -120, 0].into_iter().enumerate() {
            scroll_to(&mut field, target);
            match round % 3 {
                0 => {
                    field.click_canvas(400.0, 200.0);
                    field.set_velocity(8.0);
                    field.tick();
                    field.cancel();
                }
                1 => {
                    field.click_canvas(400.0, 200.0);
                    block_on(field.confirm_placement(&store, form("r"), 0.0)).expect("confirm");
                }
                _ => {
                    field.select_flower("a");
                    field.tick();
                    field.dismiss();
                }
            }
            assert!(field.mode().is_browsing());
            assert_eq!(field.offset(), target);
            assert_eq!(field.camera().saved_offset(), target);
        }
    }

    #[test]
    fn keys_drive_scroll_and_dismiss() {
        let mut field = field();
        assert!(field.key_down("ArrowLeft"));
        assert_eq!(field.camera().velocity(), 8.0);
        field.tick();
        assert_eq!(field.offset(), 8);
        assert!(field.key_up("ArrowLeft"));
        assert_eq!(field.camera().velocity(), 0.0);

        field.click_canvas(300.0, 300.0);
        assert!(field.key_down("Escape"));
        assert!(field.mode().is_browsing());
        assert!(!field.key_down("q"));
    }

    #[test]
    fn pointer_edge_scroll_and_leave() {
        let mut field = field();
        assert!(field.pointer_moved(0.0));
        assert_eq!(field.camera().velocity(), 8.0);
        assert!(!field.pointer_moved(512.0));
        field.pointer_moved(1024.0);
        assert_eq!(field.camera().velocity(), -8.0);
        field.pointer_left();
        assert!(!field.camera().is_moving());
    }

    #[test]
    fn failed_bulk_load_sets_banner_and_settles() {
        let mut field = field();
        let store = FakeStore::failing(StoreError::Status(503));
        assert_eq!(block_on(field.load_all(&store)), 0);
        assert_eq!(field.load_state(), LoadState::Failed);
        assert!(matches!(field.error(), Some(FieldError::LoadFailure(_))));
        assert!(field.dismiss());
        assert_eq!(field.error(), None);
    }

    #[test]
    fn hover_tooltip_appears_after_delay() {
        let mut field = field();
        field.insert_flower(flower("a", 10, 200));
        field.hover_enter("a", 0.0);
        field.advance(field.config().hover_delay_ms - 1.0);
        assert_eq!(field.tooltip(), None);
        field.advance(field.config().hover_delay_ms);
        assert_eq!(field.tooltip(), Some("a"));
        field.hover_leave("a");
        assert_eq!(field.tooltip(), None);
    }

    #[test]
    fn inserted_flower_arms_its_twinkle_without_a_wake() {
        let mut field = field();
        field.advance(5_000.0);
        assert_eq!(field.next_wake(), None);

        assert!(field.insert_flower(flower("late", 10, 200)));
        let wake = field.next_wake().expect("twinkle armed on insert");
        assert!(wake >= 5_000.0 + field.config().twinkle_ms);

        assert!(!field.insert_flower(flower("late", 10, 200)));
        assert_eq!(field.next_wake(), Some(wake));
    }

    #[test]
    fn twinkle_toggles_and_rearms() {
        let mut field = field();
        field.insert_flower(flower("a", 10, 200));
        field.advance(0.0);
        let first = field.next_wake().expect("twinkle armed");
        assert!(first >= field.config().twinkle_ms);

        assert!(field.advance(first));
        assert!(field.render_list()[0].twinkling);
        let second = field.next_wake().expect("re-armed");
        assert_eq!(second, first + field.config().twinkle_ms);
        field.advance(second);
        assert!(!field.render_list()[0].twinkling);

        field.teardown();
        assert_eq!(field.next_wake(), None);
    }

    #[test]
    fn render_list_culls_and_orders_focus_last() {
        let mut field = field();
        field.insert_flower(flower("near", 100, 300));
        field.insert_flower(flower("far", 5_000, 300));
        field.insert_flower(flower("other", 200, 100));

        let slugs: Vec<&str> = field
            .render_list()
            .iter()
            .map(|p| p.flower.slug.as_str())
            .collect();
        assert_eq!(slugs, vec!["other", "near"]);

        field.select_flower("near");
        let list = field.render_list();
        assert_eq!(list.len(), 3);
        let last = list.last().expect("non-empty");
        assert_eq!(last.flower.slug, "near");
        assert_eq!(last.placement.treatment, Treatment::Focused);
        assert!(list[..2].iter().all(|p| p.placement.opacity == 0.0));
    }
}
