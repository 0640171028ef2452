//! Widgets: reusable components that plug into a model's update loop.

mod animation;

pub use animation::{load_frames, parse_frames, Animation, DEFAULT_SPEED};
