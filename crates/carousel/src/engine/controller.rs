use super::autoplay::AutoplayScheduler;
use super::cycle::IndexCycle;
use super::gesture::{self, Gesture};
use super::timer::{Tick, Timer};
use super::viewport::{self, CardSlot, ViewportConfig};
use super::{DEFAULT_INTERVAL, DEFAULT_WIDTH};
use derive_more::{AsRef, Deref, Display, From, Into};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use strum::Display as StrumDisplay;

/// Stable identity of one carousel item, used by the presentation layer for
/// keying.
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display, Deref, From, Into, AsRef,
)]
#[serde(transparent)]
pub struct ItemKey(String);

impl ItemKey {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }
}

/// Sign of the most recent index change; selects transition visuals only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, StrumDisplay)]
#[strum(serialize_all = "lowercase")]
pub enum Direction {
    Backward,
    #[default]
    None,
    Forward,
}

impl Direction {
    pub fn from_sign(delta: i64) -> Self {
        match delta.signum() {
            -1 => Self::Backward,
            1 => Self::Forward,
            _ => Self::None,
        }
    }

    pub fn as_sign(&self) -> i8 {
        match self {
            Self::Backward => -1,
            Self::None => 0,
            Self::Forward => 1,
        }
    }
}

/// In-progress drag. Offsets are relative to where the drag started.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DragState {
    pub start_x: f32,
    pub current_x: f32,
    pub velocity_x: f32,
}

impl DragState {
    pub fn offset(&self) -> f32 {
        self.current_x - self.start_x
    }
}

#[derive(Debug, Clone)]
pub struct CarouselOptions {
    pub autoplay: bool,
    pub interval: Duration,
    pub viewport: ViewportConfig,
    pub width: f32,
}

impl Default for CarouselOptions {
    fn default() -> Self {
        Self {
            autoplay: true,
            interval: DEFAULT_INTERVAL,
            viewport: ViewportConfig::default(),
            width: DEFAULT_WIDTH,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Card {
    pub key: ItemKey,
    pub slot: CardSlot,
}

/// Everything the presentation layer needs for one frame.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderFrame {
    Empty,
    Cards {
        current: usize,
        direction: Direction,
        drag_offset: f32,
        cards: Vec<Card>,
    },
}

impl RenderFrame {
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    pub fn cards(&self) -> &[Card] {
        match self {
            Self::Empty => &[],
            Self::Cards { cards, .. } => cards,
        }
    }
}

impl fmt::Display for RenderFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => writeln!(f, "empty"),
            Self::Cards {
                current,
                direction,
                drag_offset,
                cards,
            } => {
                writeln!(
                    f,
                    "current={} direction={} drag={:.1}",
                    current, direction, drag_offset
                )?;
                for card in cards {
                    writeln!(f, "{} {}", card.key, card.slot)?;
                }
                Ok(())
            }
        }
    }
}

/// One mounted carousel: index, autoplay, drag and viewport state behind a
/// single set of navigation commands.
#[derive(Debug)]
pub struct CarouselController<T: Timer> {
    items: Vec<ItemKey>,
    cycle: IndexCycle,
    current: usize,
    direction: Direction,
    viewport: ViewportConfig,
    width: f32,
    visible_count: usize,
    autoplay: AutoplayScheduler<T>,
    drag: Option<DragState>,
    disposed: bool,
}

impl<T: Timer> CarouselController<T> {
    pub fn new(items: Vec<ItemKey>, options: CarouselOptions, timer: T) -> Self {
        let cycle = IndexCycle::new(items.len());
        let visible_count = options.viewport.visible_count(options.width);
        let mut autoplay = AutoplayScheduler::new(timer, options.autoplay, options.interval);
        autoplay.set_item_count(items.len());
        autoplay.start();

        Self {
            items,
            cycle,
            current: 0,
            direction: Direction::None,
            viewport: options.viewport,
            width: options.width,
            visible_count,
            autoplay,
            drag: None,
            disposed: false,
        }
    }

    fn can_navigate(&self) -> bool {
        !self.disposed && self.cycle.len() > 1
    }

    pub fn next(&mut self) {
        self.step(1);
    }

    pub fn prev(&mut self) {
        self.step(-1);
    }

    fn step(&mut self, step: i64) {
        if !self.can_navigate() {
            return;
        }
        let target = self.cycle.advance(self.current, step);
        self.land(target, Direction::from_sign(step));
        self.autoplay.restart();
    }

    /// Jumps straight to `index` (wrapped into range). The direction follows
    /// the shorter way around, not the raw difference.
    pub fn go_to(&mut self, index: i64) {
        if !self.can_navigate() {
            return;
        }
        let target = self.cycle.wrap(index);
        let distance = self.cycle.signed_distance(self.current, target);
        self.land(target, Direction::from_sign(distance));
        self.autoplay.restart();
    }

    fn land(&mut self, target: usize, direction: Direction) {
        log::debug!("Carousel {} -> {} ({})", self.current, target, direction);
        self.current = target;
        self.direction = direction;
    }

    pub fn on_resize(&mut self, width: f32) {
        self.width = width;
        let visible_count = self.viewport.visible_count(width);
        if visible_count != self.visible_count {
            log::debug!("Viewport {} shows {} cards", width, visible_count);
            self.visible_count = visible_count;
        }
    }

    pub fn drag_start(&mut self) {
        if self.disposed || self.drag.is_some() {
            return;
        }
        self.drag = Some(DragState::default());
        self.autoplay.suspend();
    }

    pub fn drag_move(&mut self, offset_x: f32, velocity_x: f32) {
        if let Some(drag) = self.drag.as_mut() {
            let offset_x = if offset_x.is_finite() { offset_x } else { 0.0 };
            drag.current_x = drag.start_x + offset_x;
            drag.velocity_x = if velocity_x.is_finite() { velocity_x } else { 0.0 };
        }
    }

    /// Ends the drag, navigating when the release commits, and lets autoplay
    /// resume whatever the outcome. Without a release velocity the last one
    /// seen by [`drag_move`](Self::drag_move) is used.
    pub fn drag_end(&mut self, offset_x: f32, velocity_x: Option<f32>) -> Gesture {
        let Some(drag) = self.drag.take() else {
            log::warn!("Drag end without a drag in progress");
            return Gesture::Ignore;
        };

        let velocity_x = velocity_x.unwrap_or(drag.velocity_x);
        let gesture = Gesture::classify(offset_x, velocity_x);
        match gesture {
            Gesture::Advance => self.next(),
            Gesture::Retreat => self.prev(),
            Gesture::Ignore => {}
        }
        self.autoplay.resume();
        gesture
    }

    pub fn pause(&mut self) {
        self.autoplay.suspend();
    }

    pub fn resume(&mut self) {
        self.autoplay.resume();
    }

    /// Applies an autoplay tick. Returns `true` if the carousel moved.
    pub fn on_tick(&mut self, tick: Tick) -> bool {
        if !self.can_navigate() || !self.autoplay.on_tick(tick) {
            return false;
        }
        let target = self.cycle.advance(self.current, 1);
        self.land(target, Direction::Forward);
        true
    }

    /// Swaps in a new item list and settings, keeping the live width.
    pub fn reconfigure(&mut self, items: Vec<ItemKey>, options: CarouselOptions) {
        if self.disposed {
            return;
        }
        self.cycle = IndexCycle::new(items.len());
        self.current = self.cycle.wrap(self.current as i64);
        self.items = items;
        self.viewport = options.viewport;
        self.visible_count = self.viewport.visible_count(self.width);
        self.autoplay.set_item_count(self.items.len());
        self.autoplay.configure(options.autoplay, options.interval);
    }

    /// Stops autoplay and drops any drag. Safe to call repeatedly.
    pub fn dispose(&mut self) {
        if !self.disposed {
            log::debug!("Disposing carousel of {} items", self.items.len());
        }
        self.autoplay.stop();
        self.drag = None;
        self.disposed = true;
    }

    pub fn render(&self) -> RenderFrame {
        if self.cycle.is_empty() {
            return RenderFrame::Empty;
        }

        let cards = viewport::compute_slots(self.cycle, self.current, self.visible_count)
            .into_iter()
            .map(|slot| Card {
                key: self.items[slot.source_index].clone(),
                slot,
            })
            .collect();

        RenderFrame::Cards {
            current: self.current,
            direction: self.direction,
            drag_offset: self.drag_offset(),
            cards,
        }
    }

    fn drag_offset(&self) -> f32 {
        let span = self.width / self.visible_count.max(1) as f32;
        self.drag
            .map(|d| gesture::elastic_offset(d.offset(), span))
            .unwrap_or(0.0)
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    pub fn visible_count(&self) -> usize {
        self.visible_count
    }

    pub fn drag(&self) -> Option<&DragState> {
        self.drag.as_ref()
    }

    pub fn autoplay(&self) -> &AutoplayScheduler<T> {
        &self.autoplay
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }
}
