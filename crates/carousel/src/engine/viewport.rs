use super::cycle::IndexCycle;
use super::{
    CENTER_OPACITY, CENTER_SCALE, DEFAULT_FALLBACK_VISIBLE, SIDE_OPACITY, SIDE_SCALE, TOP_Z_INDEX,
};
use serde::{Deserialize, Serialize};
use serde_with::DeserializeFromStr;
use std::fmt;
use strum::{Display as StrumDisplay, EnumString};

/// Presentation built on top of the engine.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    DeserializeFromStr,
    EnumString,
    StrumDisplay,
)]
#[strum(ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    /// Multi-card perspective stack sized by the breakpoint table.
    #[default]
    #[strum(to_string = "stack", serialize = "perspective")]
    Stack,
    /// Single-focus content slider: always one card.
    #[strum(to_string = "slider", serialize = "single")]
    Slider,
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct Breakpoint {
    /// Widths strictly below this use `visible`.
    pub max_width: f32,
    pub visible: usize,
}

impl Breakpoint {
    pub fn new(max_width: f32, visible: usize) -> Self {
        Self { max_width, visible }
    }
}

/// Maps viewport widths to a visible-card count.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewportConfig {
    variant: Variant,
    breakpoints: Vec<Breakpoint>,
    fallback: usize,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self::new(Variant::Stack, default_breakpoints(), DEFAULT_FALLBACK_VISIBLE)
    }
}

pub fn default_breakpoints() -> Vec<Breakpoint> {
    vec![Breakpoint::new(768.0, 1), Breakpoint::new(1024.0, 3)]
}

impl ViewportConfig {
    /// Sorts the table by width and bumps even counts to the next odd one so
    /// every window has a centered card.
    pub fn new(variant: Variant, mut breakpoints: Vec<Breakpoint>, fallback: usize) -> Self {
        breakpoints.retain(|b| !b.max_width.is_nan());
        breakpoints.sort_by(|a, b| a.max_width.total_cmp(&b.max_width));
        for bp in &mut breakpoints {
            bp.visible = odd_biased(bp.visible);
        }

        Self {
            variant,
            breakpoints,
            fallback: odd_biased(fallback),
        }
    }

    pub fn breakpoints(&self) -> &[Breakpoint] {
        &self.breakpoints
    }

    pub fn visible_count(&self, width: f32) -> usize {
        if self.variant == Variant::Slider {
            return 1;
        }
        self.breakpoints
            .iter()
            .find(|bp| width < bp.max_width)
            .map_or(self.fallback, |bp| bp.visible)
    }
}

fn odd_biased(count: usize) -> usize {
    match count {
        0 => 1,
        n if n % 2 == 0 => {
            log::warn!("Visible count {} has no center card, using {}", n, n + 1);
            n + 1
        }
        n => n,
    }
}

/// Slots on each side of center, including the hidden staging slot.
pub fn half_window(visible_count: usize) -> usize {
    visible_count.div_ceil(2)
}

/// Target placement of one card relative to the centered item.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CardSlot {
    pub source_index: usize,
    pub position: i64,
    pub scale: f32,
    pub opacity: f32,
    pub z_index: i32,
    pub visible: bool,
}

impl CardSlot {
    fn styled(source_index: usize, position: i64, visible_count: usize) -> Self {
        let distance = position.unsigned_abs() as usize;

        if distance > visible_count / 2 {
            return Self {
                source_index,
                position,
                scale: 0.0,
                opacity: 0.0,
                z_index: 0,
                visible: false,
            };
        }

        let (scale, opacity) = if position == 0 {
            (CENTER_SCALE, CENTER_OPACITY)
        } else {
            (SIDE_SCALE, SIDE_OPACITY)
        };

        Self {
            source_index,
            position,
            scale,
            opacity,
            z_index: TOP_Z_INDEX - distance as i32,
            visible: true,
        }
    }
}

impl fmt::Display for CardSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.visible {
            return write!(f, "#{} @{:+} hidden", self.source_index, self.position);
        }
        write!(
            f,
            "#{} @{:+} scale={:.2} opacity={:.2} z={}",
            self.source_index, self.position, self.scale, self.opacity, self.z_index
        )
    }
}

/// Lays out the window around `current`, outermost-left first.
///
/// The window spans `half_window` slots on each side; the outermost pair is
/// staged hidden so the presentation layer has something to animate in from.
/// Small collections legitimately repeat source indices.
pub fn compute_slots(cycle: IndexCycle, current: usize, visible_count: usize) -> Vec<CardSlot> {
    if cycle.is_empty() {
        return Vec::new();
    }
    let half = half_window(visible_count) as i64;

    (-half..=half)
        .map(|offset| {
            let source = cycle.advance(current, offset);
            CardSlot::styled(source, offset, visible_count)
        })
        .collect()
}
