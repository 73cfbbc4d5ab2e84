mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::vec::Vec;

    use embassy_time::{Duration, Instant};
    use glowgrid::color::{Rgb, rgb_from_u32};
    use glowgrid::{
        Command, CommandQueue, Controller, ControllerConfig, Engine, EngineConfig,
        Grid, PatternId, PixelSink, Settings, SettingsStore, Snapshot, StatusPort,
    };

    const GRID: Grid = Grid::new(6, 10);

    #[derive(Clone, Default)]
    struct SharedSink(Rc<RefCell<usize>>);

    impl SharedSink {
        fn frames(&self) -> usize {
            *self.0.borrow()
        }
    }

    impl PixelSink for SharedSink {
        fn write(&mut self, _frame: &[Rgb]) {
            *self.0.borrow_mut() += 1;
        }
    }

    #[derive(Clone, Default)]
    struct SharedStatus(Rc<RefCell<Vec<Snapshot>>>);

    impl SharedStatus {
        fn published(&self) -> usize {
            self.0.borrow().len()
        }

        fn last(&self) -> Snapshot {
            *self.0.borrow().last().expect("nothing published")
        }
    }

    impl StatusPort for SharedStatus {
        fn publish(&mut self, snapshot: &Snapshot) {
            self.0.borrow_mut().push(*snapshot);
        }
    }

    #[derive(Clone, Default)]
    struct SharedStore {
        stored: Option<Settings>,
        saved: Rc<RefCell<Vec<Settings>>>,
    }

    impl SettingsStore for SharedStore {
        fn load(&mut self) -> Option<Settings> {
            self.stored
        }

        fn save(&mut self, settings: &Settings) {
            self.saved.borrow_mut().push(*settings);
        }
    }

    /// Change-driven publishing only, so publish counts are exact.
    fn quiet_config() -> ControllerConfig {
        ControllerConfig {
            broadcast_interval: None,
            ..ControllerConfig::default()
        }
    }

    fn at(ms: u64) -> Instant {
        Instant::from_millis(ms)
    }

    type TestController<'a> =
        Controller<'a, SharedSink, SharedStatus, SharedStore, 60, 8>;

    fn controller<'a>(
        queue: &'a CommandQueue<8>,
        sink: &SharedSink,
        status: &SharedStatus,
        store: &SharedStore,
        config: ControllerConfig,
    ) -> TestController<'a> {
        Controller::new(
            Engine::new(&EngineConfig::new(GRID)),
            queue.receiver(),
            sink.clone(),
            status.clone(),
            store.clone(),
            config,
        )
    }

    #[test]
    fn test_render_is_paced_by_frame_interval() {
        let queue = CommandQueue::new();
        let sink = SharedSink::default();
        let status = SharedStatus::default();
        let store = SharedStore::default();
        let mut controller =
            controller(&queue, &sink, &status, &store, quiet_config());

        assert!(controller.poll(at(0), false).rendered);
        assert_eq!(sink.frames(), 1);

        // Inside the 50 ms window nothing renders.
        assert!(!controller.poll(at(10), false).rendered);
        assert!(!controller.poll(at(40), false).rendered);
        assert_eq!(sink.frames(), 1);

        assert!(controller.poll(at(50), false).rendered);
        assert_eq!(sink.frames(), 2);
    }

    #[test]
    fn test_pulse_renders_at_its_fixed_rate() {
        let queue = CommandQueue::new();
        let sink = SharedSink::default();
        let status = SharedStatus::default();
        let store = SharedStore::default();
        let mut controller =
            controller(&queue, &sink, &status, &store, quiet_config());
        controller.engine_mut().set_pattern(PatternId::Pulse);

        assert!(controller.poll(at(0), false).rendered);
        assert!(!controller.poll(at(10), false).rendered);
        assert!(controller.poll(at(20), false).rendered);
        assert!(controller.poll(at(40), false).rendered);
        assert_eq!(sink.frames(), 3);
    }

    #[test]
    fn test_auto_cycle_advances_exactly_once() {
        let queue = CommandQueue::new();
        let sink = SharedSink::default();
        let status = SharedStatus::default();
        let store = SharedStore::default();
        let mut controller =
            controller(&queue, &sink, &status, &store, quiet_config());

        let engine = controller.engine_mut();
        engine.set_pattern(PatternId::Rainbow);
        engine.set_auto_cycle(true);
        assert_eq!(
            engine.set_auto_cycle_interval(Duration::from_millis(6000)),
            Ok(())
        );

        // First poll arms the timer; the jump to 6000 ms fires it once.
        assert!(!controller.poll(at(0), false).cycled);
        assert!(!controller.poll(at(5999), false).cycled);
        assert!(controller.poll(at(6000), false).cycled);
        assert_eq!(controller.engine().pattern_id(), PatternId::Static);
        assert_eq!(status.published(), 1);

        // No double-advance right after, however fast the polling.
        assert!(!controller.poll(at(6010), false).cycled);
        assert_eq!(controller.engine().pattern_id(), PatternId::Static);

        // The next full interval advances again.
        assert!(controller.poll(at(12_000), false).cycled);
        assert_eq!(controller.engine().pattern_id(), PatternId::Wave);
    }

    #[test]
    fn test_commands_apply_and_publish() {
        let queue = CommandQueue::new();
        let sink = SharedSink::default();
        let status = SharedStatus::default();
        let store = SharedStore::default();
        let mut controller =
            controller(&queue, &sink, &status, &store, quiet_config());
        let sender = queue.sender();

        sender.try_send(Command::SetBrightness(200)).unwrap();
        let _ = controller.poll(at(0), false);
        assert_eq!(controller.engine().brightness(), 200);
        assert_eq!(status.published(), 1);
        assert_eq!(status.last().brightness, 200);
        // Brightness is persisted.
        assert_eq!(store.saved.borrow().last().unwrap().brightness, 200);

        sender.try_send(Command::SetPattern(PatternId::Fire)).unwrap();
        let _ = controller.poll(at(100), false);
        assert_eq!(controller.engine().pattern_id(), PatternId::Fire);
        assert_eq!(status.last().pattern, PatternId::Fire);
    }

    #[test]
    fn test_rejected_commands_change_nothing_and_stay_silent() {
        let queue = CommandQueue::new();
        let sink = SharedSink::default();
        let status = SharedStatus::default();
        let store = SharedStore::default();
        let mut controller =
            controller(&queue, &sink, &status, &store, quiet_config());
        let sender = queue.sender();

        sender.try_send(Command::SetBrightness(0)).unwrap();
        sender.try_send(Command::SetBrightness(256)).unwrap();
        sender
            .try_send(Command::SetAutoCycleInterval(Duration::from_millis(0)))
            .unwrap();
        let _ = controller.poll(at(0), false);

        assert_eq!(controller.engine().brightness(), 128);
        assert_eq!(status.published(), 0);
        assert!(store.saved.borrow().is_empty());
    }

    #[test]
    fn test_color_and_brightness_commands_are_throttled() {
        let queue = CommandQueue::new();
        let sink = SharedSink::default();
        let status = SharedStatus::default();
        let store = SharedStore::default();
        let mut controller =
            controller(&queue, &sink, &status, &store, quiet_config());
        let sender = queue.sender();

        // Two slider updates land in the same drain: only the first wins.
        sender.try_send(Command::SetBrightness(100)).unwrap();
        sender.try_send(Command::SetBrightness(150)).unwrap();
        let _ = controller.poll(at(0), false);
        assert_eq!(controller.engine().brightness(), 100);
        assert_eq!(status.published(), 1);

        // After the throttle window the next one applies.
        sender.try_send(Command::SetBrightness(150)).unwrap();
        let _ = controller.poll(at(50), false);
        assert_eq!(controller.engine().brightness(), 150);
        assert_eq!(status.published(), 2);
    }

    #[test]
    fn test_color_command_sets_and_persists() {
        let queue = CommandQueue::new();
        let sink = SharedSink::default();
        let status = SharedStatus::default();
        let store = SharedStore::default();
        let mut controller =
            controller(&queue, &sink, &status, &store, quiet_config());
        let sender = queue.sender();

        let blue = rgb_from_u32(0x0000_00FF);
        sender.try_send(Command::SetColor(blue)).unwrap();
        let _ = controller.poll(at(0), false);

        assert_eq!(controller.engine().color(), blue);
        assert_eq!(status.last().color, blue);
        assert_eq!(store.saved.borrow().last().unwrap().static_color, blue);
        // A color change does not switch the pattern.
        assert_eq!(controller.engine().pattern_id(), PatternId::Wave);
    }

    #[test]
    fn test_persisted_settings_restore_but_pattern_resets_to_wave() {
        let queue = CommandQueue::new();
        let sink = SharedSink::default();
        let status = SharedStatus::default();
        let store = SharedStore {
            stored: Some(Settings {
                brightness: 42,
                auto_cycle: true,
                auto_cycle_interval_ms: 8000,
                static_color: rgb_from_u32(0x0000_FF00),
            }),
            ..SharedStore::default()
        };
        let controller = controller(&queue, &sink, &status, &store, quiet_config());

        let snapshot = controller.engine().snapshot();
        assert_eq!(snapshot.brightness, 42);
        assert!(snapshot.auto_cycle);
        assert_eq!(snapshot.auto_cycle_interval, Duration::from_millis(8000));
        assert_eq!(snapshot.color, rgb_from_u32(0x0000_FF00));
        // The pattern is never persisted.
        assert_eq!(snapshot.pattern, PatternId::Wave);
    }

    #[test]
    fn test_corrupt_persisted_settings_fall_back_to_defaults() {
        let queue = CommandQueue::new();
        let sink = SharedSink::default();
        let status = SharedStatus::default();
        let store = SharedStore {
            stored: Some(Settings {
                brightness: 0,
                auto_cycle: false,
                auto_cycle_interval_ms: 0,
                static_color: rgb_from_u32(0x0012_3456),
            }),
            ..SharedStore::default()
        };
        let controller = controller(&queue, &sink, &status, &store, quiet_config());

        let snapshot = controller.engine().snapshot();
        assert_eq!(snapshot.brightness, 128);
        assert_eq!(snapshot.auto_cycle_interval, Duration::from_millis(10_000));
        // Valid fields still apply.
        assert_eq!(snapshot.color, rgb_from_u32(0x0012_3456));
    }

    #[test]
    fn test_button_short_press_cycles_pattern() {
        let queue = CommandQueue::new();
        let sink = SharedSink::default();
        let status = SharedStatus::default();
        let store = SharedStore::default();
        let mut controller =
            controller(&queue, &sink, &status, &store, quiet_config());

        let _ = controller.poll(at(0), false);
        let _ = controller.poll(at(10), true); // press
        let _ = controller.poll(at(100), true); // still held
        let _ = controller.poll(at(150), false); // release after 140 ms

        assert_eq!(controller.engine().pattern_id(), PatternId::Fire);
        assert_eq!(status.published(), 1);
        assert_eq!(status.last().pattern, PatternId::Fire);
    }

    #[test]
    fn test_button_bounce_is_ignored() {
        let queue = CommandQueue::new();
        let sink = SharedSink::default();
        let status = SharedStatus::default();
        let store = SharedStore::default();
        let mut controller =
            controller(&queue, &sink, &status, &store, quiet_config());

        let _ = controller.poll(at(0), false);
        let _ = controller.poll(at(10), true);
        let _ = controller.poll(at(20), false); // released after 10 ms

        assert_eq!(controller.engine().pattern_id(), PatternId::Wave);
        assert_eq!(status.published(), 0);
    }

    #[test]
    fn test_button_long_press_toggles_brightness() {
        let queue = CommandQueue::new();
        let sink = SharedSink::default();
        let status = SharedStatus::default();
        let store = SharedStore::default();
        let mut controller =
            controller(&queue, &sink, &status, &store, quiet_config());

        let _ = controller.poll(at(0), true); // press
        let _ = controller.poll(at(500), true); // held
        let _ = controller.poll(at(1000), true); // crosses the threshold
        assert_eq!(controller.engine().brightness(), 64);
        assert_eq!(store.saved.borrow().last().unwrap().brightness, 64);
        assert_eq!(status.published(), 1);

        // Holding longer does not fire again; release is quiet.
        let _ = controller.poll(at(1500), true);
        let _ = controller.poll(at(1600), false);
        assert_eq!(status.published(), 1);

        // A second hold toggles back to the high level.
        let _ = controller.poll(at(2000), true);
        let _ = controller.poll(at(3100), true);
        assert_eq!(controller.engine().brightness(), 128);
    }

    #[test]
    fn test_periodic_broadcast_keeps_observers_synced() {
        let queue = CommandQueue::new();
        let sink = SharedSink::default();
        let status = SharedStatus::default();
        let store = SharedStore::default();
        let mut controller = controller(
            &queue,
            &sink,
            &status,
            &store,
            ControllerConfig::default(),
        );

        let _ = controller.poll(at(0), false); // initial broadcast
        assert_eq!(status.published(), 1);
        let _ = controller.poll(at(50), false);
        assert_eq!(status.published(), 1);
        let _ = controller.poll(at(100), false);
        assert_eq!(status.published(), 2);
    }

    #[test]
    fn test_queue_refuses_overflow() {
        let queue: CommandQueue<2> = CommandQueue::new();
        let sender = queue.sender();
        assert!(sender.try_send(Command::CyclePattern).is_ok());
        assert!(sender.try_send(Command::CyclePattern).is_ok());
        assert!(sender.try_send(Command::CyclePattern).is_err());

        // Draining frees the slots again.
        assert!(queue.receiver().try_receive().is_some());
        assert!(sender.try_send(Command::CyclePattern).is_ok());
    }
}
