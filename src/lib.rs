#![no_std]

pub mod button;
pub mod color;
pub mod command;
pub mod controller;
pub mod engine;
pub mod gamma;
pub mod grid;
pub mod hash;
pub mod math8;
pub mod pattern;
pub mod settings;

pub use button::{ButtonDebouncer, ButtonEvent};
pub use command::{Command, CommandQueue, CommandReceiver, CommandSender};
pub use controller::{Controller, ControllerConfig, PollResult, StatusPort};
pub use engine::{Engine, EngineConfig, Snapshot, StateError};
pub use grid::Grid;
pub use pattern::{PatternId, PatternSlot};
pub use settings::{Settings, SettingsStore};

pub use color::{Rgb, hsv_to_rgb, pack_rgb, rgb_from_u32, unpack_rgb};
pub use embassy_time::{Duration, Instant};

/// Abstract LED strip output trait
///
/// Implement this trait to support different hardware platforms.
/// The controller hands it one brightness-scaled frame per render tick,
/// in serpentine strip order.
pub trait PixelSink {
    /// Write colors to the LED strip
    fn write(&mut self, frame: &[Rgb]);
}
