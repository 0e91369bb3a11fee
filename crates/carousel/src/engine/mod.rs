use std::time::Duration;

pub mod autoplay;
pub mod controller;
pub mod cycle;
pub mod gesture;
pub mod timer;
pub mod viewport;

pub use autoplay::{AutoplayScheduler, Phase};
pub use controller::{
    Card, CarouselController, CarouselOptions, Direction, DragState, ItemKey, RenderFrame,
};
pub use cycle::IndexCycle;
pub use gesture::Gesture;
pub use timer::{ManualTimer, Tick, TickEpoch, Timer};
pub use viewport::{Breakpoint, CardSlot, Variant, ViewportConfig};

pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(4000);
pub const DEFAULT_WIDTH: f32 = 1280.0;
pub const DEFAULT_FALLBACK_VISIBLE: usize = 5;

pub const OFFSET_THRESHOLD: f32 = 50.0; // drag distance that commits a slide
pub const VELOCITY_THRESHOLD: f32 = 500.0; // release speed that commits a slide
pub const ELASTIC_FACTOR: f32 = 0.35; // resistance past one slide span
pub const ELASTIC_CAP: f32 = 1.5; // max displacement, in slide spans

pub const CENTER_SCALE: f32 = 1.0;
pub const CENTER_OPACITY: f32 = 1.0;
pub const SIDE_SCALE: f32 = 0.85;
pub const SIDE_OPACITY: f32 = 0.6;
pub const TOP_Z_INDEX: i32 = 10;
