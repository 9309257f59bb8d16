use alloc::format;
use alloc::rc::{Rc, Weak};
use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::cell::{Cell, RefCell};
use core::fmt;

use crate::mount::{Components, Factories};
use crate::pipeline::{Context, Pipeline, TransformStage};
use crate::run::{NavigationState, Navigator};
use crate::transition::{Timers, Transition};
use crate::{
    Command, Error, Event, EventBus, Geometry, Kind, OffsetKind, Settings, Subscription, Topics,
    topics,
};

const TRANSFORM: &str = "transform";

/// Component factories mounted onto a [`Carousel`].
pub type Extensions = Factories<Carousel>;

struct Inner {
    settings: RefCell<Settings>,
    state: Cell<NavigationState>,
    count: Cell<usize>,
    geometry: Cell<Geometry>,
    nudge: Cell<f32>,
    translate: Cell<f32>,
    mounted: Cell<bool>,
    transition: RefCell<Transition>,
    timers: RefCell<Timers>,
    pipeline: RefCell<Pipeline>,
    bus: EventBus,
    components: Components,
}

/// A headless carousel.
///
/// This type is UI-agnostic:
/// - It does not hold any UI objects; the track position is exposed as a number
///   ([`Carousel::translate`]) and a transform descriptor.
/// - Your adapter provides the item count, the measured [`Geometry`] and the clock
///   ([`Carousel::tick`]).
/// - Everything else talks to it through [`Carousel::run`] / [`Carousel::nudge`] and the bus.
///
/// `Carousel` is a cheap handle (clones share one instance) and is meant for a single UI
/// thread. Event handlers and scheduled callbacks may call back into it.
#[derive(Clone)]
pub struct Carousel {
    inner: Rc<Inner>,
}

/// A non-owning [`Carousel`] handle, for components and callbacks that must not keep the
/// instance alive.
#[derive(Clone, Debug, Default)]
pub struct WeakCarousel {
    inner: Weak<Inner>,
}

impl WeakCarousel {
    pub fn upgrade(&self) -> Option<Carousel> {
        self.inner.upgrade().map(|inner| Carousel { inner })
    }
}

fn sanitize(mut settings: Settings) -> Settings {
    if settings.per_view == 0 {
        cwarn!("`per_view` must be at least 1, falling back to 1");
        settings.per_view = 1;
    }
    settings
}

impl Carousel {
    /// Creates a carousel over `count` items, positioned at `settings.start_at`.
    ///
    /// Nothing is published until [`Carousel::mount`].
    pub fn new(settings: Settings, count: usize) -> Self {
        let settings = sanitize(settings);
        cdebug!(
            count,
            per_view = settings.per_view,
            start_at = settings.start_at,
            "Carousel::new"
        );
        let state = NavigationState {
            index: settings.start_at,
            ..NavigationState::default()
        };
        Self {
            inner: Rc::new(Inner {
                settings: RefCell::new(settings),
                state: Cell::new(state),
                count: Cell::new(count),
                geometry: Cell::new(Geometry::default()),
                nudge: Cell::new(0.0),
                translate: Cell::new(0.0),
                mounted: Cell::new(false),
                transition: RefCell::new(Transition::new()),
                timers: RefCell::new(Timers::new()),
                pipeline: RefCell::new(Pipeline::standard()),
                bus: EventBus::new(),
                components: Components::new(),
            }),
        }
    }

    /// Splices caller stages into the transform chain, before the RTL mirror.
    pub fn with_transformers(self, stages: Vec<Box<dyn TransformStage>>) -> Self {
        *self.inner.pipeline.borrow_mut() = Pipeline::with_transformers(stages);
        self
    }

    /// Same as `with_transformers`, one stage at a time.
    pub fn push_transformer(&self, stage: impl TransformStage + 'static) {
        self.inner.pipeline.borrow_mut().push(stage);
    }

    /// Replaces the whole transform chain.
    pub fn set_pipeline(&self, pipeline: Pipeline) {
        *self.inner.pipeline.borrow_mut() = pipeline;
    }

    pub fn downgrade(&self) -> WeakCarousel {
        WeakCarousel {
            inner: Rc::downgrade(&self.inner),
        }
    }

    /// Mounts `extensions` and positions the track.
    ///
    /// Publishes `mount.before`, runs both mount passes, applies the start position without a
    /// transition, then publishes `mount.after`. Returns the extensions that were skipped.
    pub fn mount(&self, extensions: Extensions) -> Vec<Error> {
        self.publish(topics::MOUNT_BEFORE, &Event::Empty);
        let skipped = self
            .inner
            .components
            .mount(self, extensions, &self.inner.bus);
        self.inner.mounted.set(true);
        self.build();
        self.publish(topics::MOUNT_AFTER, &Event::Empty);
        skipped
    }

    pub fn is_mounted(&self) -> bool {
        self.inner.mounted.get()
    }

    /// Tears the instance down: publishes `destroy`, then drops every listener, component and
    /// pending callback.
    pub fn destroy(&self) {
        self.publish(topics::DESTROY, &Event::Empty);
        self.inner.bus.clear();
        self.inner.components.clear();
        self.inner.timers.borrow_mut().clear();
        self.inner.transition.borrow_mut().remove();
        self.inner.mounted.set(false);
    }

    pub fn bus(&self) -> &EventBus {
        &self.inner.bus
    }

    pub fn components(&self) -> &Components {
        &self.inner.components
    }

    /// Subscribes to one or more topics on the carousel's bus.
    pub fn on<T>(&self, topics: &T, handler: impl Fn(&Event) + 'static) -> Subscription
    where
        T: Topics + ?Sized,
    {
        self.inner.bus.subscribe(topics, handler)
    }

    fn publish(&self, topic: &str, event: &Event) {
        self.inner.bus.publish(topic, event);
    }

    // --- settings -----------------------------------------------------------------------

    /// A copy of the current settings.
    pub fn settings(&self) -> Settings {
        self.inner.settings.borrow().clone()
    }

    pub fn kind(&self) -> Kind {
        self.inner.settings.borrow().kind
    }

    pub fn is_type(&self, kind: Kind) -> bool {
        self.kind() == kind
    }

    pub fn set_settings(&self, settings: Settings) {
        self.update_settings(|s| *s = settings);
    }

    /// Clones the current settings, applies `f`, then installs the result.
    ///
    /// A changed `start_at` moves the index there. Publishes `update` and, once mounted,
    /// re-applies the position without a transition.
    pub fn update_settings(&self, f: impl FnOnce(&mut Settings)) {
        let mut next = self.settings();
        f(&mut next);
        let next = sanitize(next);

        let start_at = next.start_at;
        let start_changed = start_at != self.inner.settings.borrow().start_at;
        *self.inner.settings.borrow_mut() = next;
        if start_changed {
            self.update_state(|s| s.index = start_at);
        }
        ctrace!(start_changed, "Carousel::update_settings");

        self.publish(topics::UPDATE, &Event::Empty);
        if self.is_mounted() {
            self.build();
        }
    }

    // --- collaborator facts -------------------------------------------------------------

    pub fn count(&self) -> usize {
        self.inner.count.get()
    }

    /// Updates the number of items. Once mounted, re-applies the position without a transition.
    pub fn set_count(&self, count: usize) {
        if self.count() == count {
            return;
        }
        self.inner.count.set(count);
        if self.is_mounted() {
            self.build();
        }
    }

    pub fn geometry(&self) -> Geometry {
        self.inner.geometry.get()
    }

    /// Installs freshly measured geometry.
    ///
    /// Publishes `resize` and, once mounted, re-applies the position without a transition.
    pub fn set_geometry(&self, geometry: Geometry) {
        if self.geometry() == geometry {
            return;
        }
        self.inner.geometry.set(geometry);
        self.publish(topics::RESIZE, &Event::Empty);
        if self.is_mounted() {
            self.build();
        }
    }

    /// Measures from a viewport width (see [`Geometry::measure`]) and installs the result.
    pub fn measure(&self, viewport_width: f32) {
        let geometry = {
            let settings = self.inner.settings.borrow();
            Geometry::measure(viewport_width, self.count(), &settings)
        };
        self.set_geometry(geometry);
    }

    /// Rewrites `command` for the configured writing direction.
    pub fn resolve(&self, command: Command) -> Command {
        self.inner.settings.borrow().direction.resolve(command)
    }

    // --- navigation state ---------------------------------------------------------------

    pub fn state(&self) -> NavigationState {
        self.inner.state.get()
    }

    fn update_state(&self, f: impl FnOnce(&mut NavigationState)) {
        let mut state = self.inner.state.get();
        f(&mut state);
        self.inner.state.set(state);
    }

    pub fn index(&self) -> usize {
        self.state().index
    }

    /// Assigns the index directly, without moving the track or publishing anything.
    pub fn set_index(&self, index: usize) -> Result<(), Error> {
        let count = self.count();
        if index >= count {
            return Err(Error::IndexOutOfRange { index, count });
        }
        self.update_state(|s| s.index = index);
        Ok(())
    }

    /// Suspends navigation: `run` calls are ignored until [`Carousel::enable`].
    pub fn disable(&self) {
        self.update_state(|s| s.disabled = true);
    }

    pub fn enable(&self) {
        self.update_state(|s| s.disabled = false);
    }

    pub fn is_disabled(&self) -> bool {
        self.state().disabled
    }

    /// Whether the current run overflowed a boundary and has not completed yet.
    pub fn is_offset(&self) -> bool {
        self.state().offset
    }

    /// Like [`Carousel::is_offset`], restricted to one kind of move.
    pub fn is_offset_toward(&self, kind: OffsetKind) -> bool {
        let state = self.state();
        state.offset && state.last_move.is_some_and(|m| kind.matches(&m))
    }

    fn navigator_last_index(&self) -> i64 {
        let settings = self.inner.settings.borrow();
        Navigator::new(&settings, self.count()).last_index()
    }

    /// The last index navigation may settle on (see [`Navigator::last_index`]).
    pub fn last_index(&self) -> i64 {
        self.navigator_last_index()
    }

    pub fn is_start(&self) -> bool {
        self.index() == 0
    }

    pub fn is_end(&self) -> bool {
        crate::run::widen(self.index()) >= self.last_index()
    }

    // --- run ----------------------------------------------------------------------------

    /// Parses `pattern` and runs it (see [`Carousel::go`]).
    pub fn run(&self, pattern: &str) -> Result<bool, Error> {
        let command = pattern.parse::<Command>().inspect_err(|_| {
            cwarn!(pattern, "Carousel::run: invalid direction pattern");
        })?;
        self.go(command)
    }

    /// Navigates.
    ///
    /// Returns `Ok(false)` when navigation is suspended (the call is ignored) and `Err` for a
    /// malformed command (state is left untouched). Otherwise publishes `run.before`, moves the
    /// index, publishes `run`, commits the new translate, and schedules the completion events
    /// (`run.start` / `run.end` / `run.offset` / `run.after`) on the transition hook.
    pub fn go(&self, command: Command) -> Result<bool, Error> {
        if !command.is_well_formed() {
            cwarn!(pattern = %command, "Carousel::go: invalid direction pattern");
            return Err(Error::InvalidCommand {
                pattern: command.to_string(),
            });
        }
        if self.is_disabled() {
            ctrace!(pattern = %command, "Carousel::go: navigation disabled, ignoring");
            return Ok(false);
        }
        if self.inner.settings.borrow().wait_for_transition {
            self.disable();
        }

        self.update_state(|s| s.last_move = Some(command));
        self.publish(topics::RUN_BEFORE, &Event::Run(command));

        let step = {
            let settings = self.inner.settings.borrow();
            Navigator::new(&settings, self.count()).calculate(self.index(), command)
        };
        self.update_state(|s| {
            s.index = step.index;
            s.offset |= step.offset;
        });
        cdebug!(
            pattern = %command,
            index = step.index,
            offset = step.offset,
            "Carousel::go"
        );
        self.publish(topics::RUN, &Event::Run(command));

        self.set_transition_disabled(false);
        self.commit(0.0);

        let weak = self.downgrade();
        self.after(move || {
            if let Some(carousel) = weak.upgrade() {
                carousel.complete_run();
            }
        });
        Ok(true)
    }

    fn complete_run(&self) {
        let event = self.state().last_move.map_or(Event::Empty, Event::Run);
        if self.is_start() {
            self.publish(topics::RUN_START, &event);
        }
        if self.is_end() {
            self.publish(topics::RUN_END, &event);
        }
        if self.is_offset() {
            self.update_state(|s| s.offset = false);
            self.publish(topics::RUN_OFFSET, &event);
        }
        self.publish(topics::RUN_AFTER, &event);
        self.enable();
    }

    // --- move ---------------------------------------------------------------------------

    /// Shifts the track by `px` from the current index without a transition (drag in progress).
    ///
    /// The nudge is stored until the next commit; `run` always commits with a zero nudge.
    pub fn nudge(&self, px: f32) {
        self.set_transition_disabled(true);
        self.commit(px);
    }

    /// Animates the track back to the current index, dropping any drag nudge.
    pub fn snap_back(&self) {
        self.set_transition_disabled(false);
        self.commit(0.0);
    }

    /// The pending drag nudge.
    pub fn nudge_value(&self) -> f32 {
        self.inner.nudge.get()
    }

    /// `item_width * index`.
    pub fn base_translate(&self) -> f32 {
        self.geometry().item_width * self.index() as f32
    }

    /// The movement value before the transform chain: the base translate minus the nudge (plus
    /// the nudge for RTL tracks).
    pub fn movement(&self) -> f32 {
        let base = self.base_translate();
        let nudge = self.nudge_value();
        if self.inner.settings.borrow().direction.is_rtl() {
            base + nudge
        } else {
            base - nudge
        }
    }

    fn build(&self) {
        self.set_transition_disabled(true);
        self.commit(0.0);
    }

    fn commit(&self, nudge: f32) {
        self.inner.nudge.set(nudge);
        let movement = self.movement();
        self.apply_movement(movement);
        self.apply_transition();
        self.publish(topics::MOVE, &Event::Movement(movement));

        let weak = self.downgrade();
        self.after(move || {
            if let Some(carousel) = weak.upgrade() {
                let movement = carousel.movement();
                carousel.publish(topics::MOVE_AFTER, &Event::Movement(movement));
            }
        });
    }

    fn apply_movement(&self, movement: f32) {
        if !(self.is_type(Kind::Carousel) && self.is_offset()) {
            self.set_translate(movement);
            return;
        }

        // Travel one view in the requested direction from the clones, then silently reset
        // the track onto the real item once the transition is over.
        let weak = self.downgrade();
        self.after(move || {
            if let Some(carousel) = weak.upgrade() {
                carousel.publish(topics::TRANSLATE_JUMP, &Event::Empty);
                carousel.set_transition_disabled(true);
                carousel.set_translate(carousel.base_translate());
            }
        });

        let start = self.geometry().item_width * self.jump_start_index() as f32;
        self.set_translate(start - self.travel_distance());
    }

    fn is_forward_offset(&self) -> bool {
        self.is_offset_toward(OffsetKind::Forward) || self.is_offset_toward(OffsetKind::PageForward)
    }

    /// Index the wraparound animation starts from.
    fn jump_start_index(&self) -> i64 {
        let count = self.count() as i64;
        if count == 0 {
            return 0;
        }
        let index = self.index() as i64;
        let per_view = self.inner.settings.borrow().view_size() as i64;
        if self.is_forward_offset() {
            return count + (index - per_view);
        }
        // Modulo turns an index equal to `count` into 0.
        (index + per_view) % count
    }

    fn travel_distance(&self) -> f32 {
        let per_view = self.inner.settings.borrow().view_size() as f32;
        let distance = self.geometry().item_width * per_view;
        if self.is_forward_offset() {
            -distance
        } else {
            distance
        }
    }

    fn set_translate(&self, value: f32) {
        let translate = {
            let settings = self.inner.settings.borrow();
            let cx = Context {
                settings: &settings,
                geometry: self.geometry(),
                index: self.index(),
                count: self.count(),
            };
            self.inner.pipeline.borrow().mutate(value, &cx)
        };
        ctrace!(value, translate, "set_translate");
        self.inner.translate.set(translate);
    }

    /// The final translate after the transform chain.
    pub fn translate(&self) -> f32 {
        self.inner.translate.get()
    }

    /// `translate3d(..)` descriptor for the track (the track moves left for positive values).
    pub fn transform(&self) -> String {
        let x = 0.0 - self.translate();
        format!("translate3d({x}px, 0px, 0px)")
    }

    // --- transition ---------------------------------------------------------------------

    /// `rewind_duration` for a slider run that overflowed, `animation_duration` otherwise.
    pub fn duration(&self) -> u64 {
        let settings = self.inner.settings.borrow();
        if settings.is_slider() && self.is_offset() {
            settings.rewind_duration
        } else {
            settings.animation_duration
        }
    }

    /// The current transition descriptor, e.g. `"transform 400ms ease"`.
    pub fn transition(&self) -> String {
        self.inner.transition.borrow().descriptor().to_string()
    }

    pub fn is_transition_disabled(&self) -> bool {
        self.inner.transition.borrow().is_disabled()
    }

    fn set_transition_disabled(&self, disabled: bool) {
        self.inner.transition.borrow_mut().set_disabled(disabled);
        self.apply_transition();
    }

    fn apply_transition(&self) {
        let duration = self.duration();
        let settings = self.inner.settings.borrow();
        self.inner
            .transition
            .borrow_mut()
            .set(TRANSFORM, duration, &settings.animation_timing_func);
    }

    /// Runs `callback` once the current transition duration has elapsed on the clock.
    pub fn after(&self, callback: impl FnOnce() + 'static) {
        let duration = self.duration();
        self.inner.timers.borrow_mut().schedule(duration, callback);
    }

    /// Advances the clock and fires every callback that is due, including ones scheduled by
    /// callbacks fired in this call. Returns the number of callbacks fired.
    pub fn tick(&self, now_ms: u64) -> usize {
        self.inner.timers.borrow_mut().advance(now_ms);
        let mut fired = 0;
        loop {
            let Some(callback) = self.inner.timers.borrow_mut().pop_due() else {
                break;
            };
            callback();
            fired += 1;
        }
        fired
    }

    pub fn now_ms(&self) -> u64 {
        self.inner.timers.borrow().now_ms()
    }

    pub fn pending_callbacks(&self) -> usize {
        self.inner.timers.borrow().len()
    }
}

impl fmt::Debug for Carousel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Carousel")
            .field("settings", &*self.inner.settings.borrow())
            .field("state", &self.state())
            .field("count", &self.count())
            .field("geometry", &self.geometry())
            .field("translate", &self.translate())
            .field("pending_callbacks", &self.pending_callbacks())
            .finish_non_exhaustive()
    }
}
