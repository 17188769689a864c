pub mod app;
pub mod camera3d;
pub mod cli;
pub mod config;
pub mod debug_draw;
pub mod debug_overlay;
pub mod grab;
pub mod harness;
pub mod hud;
pub mod input;
pub mod physics;
pub mod renderer;
pub mod scenes;
pub mod time;

pub use app::{run, run_with_overrides, App};
pub use harness::{FrameOutcome, Harness};
