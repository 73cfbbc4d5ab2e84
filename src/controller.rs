//! Cooperative controller loop.
//!
//! One `poll` call services everything the firmware loop owes the light
//! engine: pending remote commands, the paced render tick, the
//! auto-cycle timer, the physical button, the heartbeat log and the
//! periodic status rebroadcast. The embedding firmware calls `poll` at
//! a short cadence (about 10 ms) and services its own network stack
//! around it; nothing in here blocks.

use embassy_time::{Duration, Instant};

#[cfg(feature = "esp32-log")]
use esp_println::println;

use crate::PixelSink;
use crate::button::{self, ButtonDebouncer, ButtonEvent};
use crate::command::{Command, CommandReceiver};
use crate::engine::{Engine, Snapshot};
use crate::settings::SettingsStore;

const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(1);

/// Status publication port (WebSocket broadcast on the target).
///
/// Invoked after every applied command, on button gestures, on each
/// auto-cycle advance and on the periodic rebroadcast.
pub trait StatusPort {
    fn publish(&mut self, snapshot: &Snapshot);
}

/// Timing and input tuning for the controller.
#[derive(Debug, Clone)]
pub struct ControllerConfig {
    /// Minimum spacing between applied color/brightness commands;
    /// faster senders (a dragged web UI slider) are thinned out.
    pub command_throttle: Duration,
    /// Periodic full-status rebroadcast keeping remote observers in
    /// sync. `None` publishes only on change.
    pub broadcast_interval: Option<Duration>,
    /// Raw button levels shorter than this are ignored as bounce.
    pub button_debounce: Duration,
    /// Hold time that turns a press into the brightness toggle.
    pub button_long_press: Duration,
    /// The two levels the long-press brightness toggle alternates
    /// between.
    pub brightness_levels: (u8, u8),
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            command_throttle: Duration::from_millis(50),
            broadcast_interval: Some(Duration::from_millis(100)),
            button_debounce: button::DEBOUNCE,
            button_long_press: button::LONG_PRESS,
            brightness_levels: (64, 128),
        }
    }
}

/// What a single poll did.
#[derive(Debug, Clone, Copy, Default)]
pub struct PollResult {
    /// A frame was rendered and written to the pixel sink.
    pub rendered: bool,
    /// The auto-cycle timer advanced the pattern.
    pub cycled: bool,
}

/// Owns the engine, drains the command queue and paces all soft timers
/// against the caller-provided monotonic clock.
pub struct Controller<'a, S, P, T, const MAX_PIXELS: usize, const QUEUE_DEPTH: usize>
where
    S: PixelSink,
    P: StatusPort,
    T: SettingsStore,
{
    engine: Engine<MAX_PIXELS>,
    commands: CommandReceiver<'a, QUEUE_DEPTH>,
    sink: S,
    status: P,
    store: T,
    config: ControllerConfig,
    button: ButtonDebouncer,
    last_tick: Option<Instant>,
    last_cycle: Option<Instant>,
    last_heartbeat: Option<Instant>,
    last_broadcast: Option<Instant>,
    last_color_command: Option<Instant>,
    last_brightness_command: Option<Instant>,
}

impl<'a, S, P, T, const MAX_PIXELS: usize, const QUEUE_DEPTH: usize>
    Controller<'a, S, P, T, MAX_PIXELS, QUEUE_DEPTH>
where
    S: PixelSink,
    P: StatusPort,
    T: SettingsStore,
{
    /// Build the controller around an engine and its ports, restoring
    /// persisted settings if the store has any.
    pub fn new(
        mut engine: Engine<MAX_PIXELS>,
        commands: CommandReceiver<'a, QUEUE_DEPTH>,
        sink: S,
        status: P,
        mut store: T,
        config: ControllerConfig,
    ) -> Self {
        if let Some(settings) = store.load() {
            engine.apply_settings(&settings);
        }
        let debouncer =
            ButtonDebouncer::new(config.button_debounce, config.button_long_press);
        Self {
            engine,
            commands,
            sink,
            status,
            store,
            config,
            button: debouncer,
            last_tick: None,
            last_cycle: None,
            last_heartbeat: None,
            last_broadcast: None,
            last_color_command: None,
            last_brightness_command: None,
        }
    }

    /// One cooperative step. Call continuously with the monotonic clock
    /// and the raw button level.
    pub fn poll(&mut self, now: Instant, button_level: bool) -> PollResult {
        let mut result = PollResult::default();

        self.drain_commands(now);
        self.heartbeat(now);

        // Paced render tick at the active pattern's interval.
        let interval = self.engine.tick_interval();
        let tick_due = match self.last_tick {
            None => true,
            Some(last) => now.duration_since(last) >= interval,
        };
        if tick_due {
            self.last_tick = Some(now);
            let frame = self.engine.tick();
            self.sink.write(frame);
            result.rendered = true;
        }

        // Auto-cycle: exactly one advance per elapsed interval, however
        // coarse the polling.
        if self.engine.auto_cycle() {
            match self.last_cycle {
                None => self.last_cycle = Some(now),
                Some(last)
                    if now.duration_since(last)
                        >= self.engine.auto_cycle_interval() =>
                {
                    self.last_cycle = Some(now);
                    self.engine.cycle_pattern();
                    self.publish(now);
                    result.cycled = true;
                }
                Some(_) => {}
            }
        } else {
            // Re-enabling restarts the window.
            self.last_cycle = None;
        }

        match self.button.update(now, button_level) {
            Some(ButtonEvent::ShortPress) => {
                self.engine.cycle_pattern();
                self.publish(now);
            }
            Some(ButtonEvent::LongPress) => {
                let (low, high) = self.config.brightness_levels;
                let next = if self.engine.brightness() == low { high } else { low };
                if self.engine.set_brightness(u16::from(next)).is_ok() {
                    self.save();
                    self.publish(now);
                }
            }
            None => {}
        }

        if let Some(interval) = self.config.broadcast_interval {
            let broadcast_due = match self.last_broadcast {
                None => true,
                Some(last) => now.duration_since(last) >= interval,
            };
            if broadcast_due {
                self.publish(now);
            }
        }

        result
    }

    pub fn engine(&self) -> &Engine<MAX_PIXELS> {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut Engine<MAX_PIXELS> {
        &mut self.engine
    }

    /// Apply every pending command. Valid commands mutate state and
    /// publish a snapshot; rejects are dropped without a trace.
    fn drain_commands(&mut self, now: Instant) {
        while let Some(command) = self.commands.try_receive() {
            if self.apply_command(now, command) {
                self.publish(now);
            }
        }
    }

    fn apply_command(&mut self, now: Instant, command: Command) -> bool {
        match command {
            Command::SetPattern(id) => {
                self.engine.set_pattern(id);
                true
            }
            Command::CyclePattern => {
                self.engine.cycle_pattern();
                true
            }
            Command::SetColor(color) => {
                if !throttle_open(self.last_color_command, now, self.config.command_throttle) {
                    return false;
                }
                self.last_color_command = Some(now);
                self.engine.set_static_color(color);
                self.save();
                true
            }
            Command::SetBrightness(value) => {
                if !throttle_open(
                    self.last_brightness_command,
                    now,
                    self.config.command_throttle,
                ) {
                    return false;
                }
                if self.engine.set_brightness(value).is_err() {
                    return false;
                }
                self.last_brightness_command = Some(now);
                self.save();
                true
            }
            Command::SetAutoCycle(enabled) => {
                self.engine.set_auto_cycle(enabled);
                self.save();
                true
            }
            Command::SetAutoCycleInterval(interval) => {
                if self.engine.set_auto_cycle_interval(interval).is_err() {
                    return false;
                }
                self.save();
                true
            }
        }
    }

    fn publish(&mut self, now: Instant) {
        self.last_broadcast = Some(now);
        self.status.publish(&self.engine.snapshot());
    }

    fn save(&mut self) {
        self.store.save(&self.engine.settings());
    }

    fn heartbeat(&mut self, now: Instant) {
        let due = match self.last_heartbeat {
            None => true,
            Some(last) => now.duration_since(last) >= HEARTBEAT_INTERVAL,
        };
        if !due {
            return;
        }
        self.last_heartbeat = Some(now);
        #[cfg(feature = "esp32-log")]
        println!(
            "pattern: {}, brightness: {}",
            self.engine.pattern_id().as_str(),
            self.engine.brightness()
        );
    }
}

/// True when enough time passed since the last accepted command.
fn throttle_open(last: Option<Instant>, now: Instant, throttle: Duration) -> bool {
    match last {
        None => true,
        Some(last) => now.duration_since(last) >= throttle,
    }
}
