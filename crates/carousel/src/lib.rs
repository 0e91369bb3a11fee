//! Circular carousel navigation engine.
//!
//! [`engine`] holds the headless core: wraparound index math, the visible
//! window and its per-card styling, autoplay scheduling and drag
//! classification, composed by [`engine::CarouselController`]. The remaining
//! modules run one controller as a daemon driven over a unix socket.

pub mod app;
pub mod config;
pub mod engine;
pub mod events;
pub mod protocol;
pub mod sys;
