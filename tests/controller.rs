mod common;

mod tests {
    use arcade_cabinet_controller::{
        CabinetIo, Controller, ControllerConfig, ControllerError, Duration, LightMode,
        PowerPhase, PowerStatus, RemoteChannel, RemoteCommand, TickReport,
    };
    use embedded_hal::digital::ErrorKind;

    use super::common::{ByteQueue, FakeInput, FakeOutput, RecordingDriver, at, relays};

    const PIXELS: usize = 34;

    type TestController<'a> =
        Controller<'a, ByteQueue, RecordingDriver, FakeOutput, FakeInput, PIXELS, 4>;

    fn io() -> CabinetIo<FakeOutput, FakeInput> {
        CabinetIo {
            relays: relays(),
            button: FakeInput::high(),
            button_mirror: FakeOutput::default(),
            shutdown_signal: FakeInput::low(),
            status_led: FakeOutput::default(),
        }
    }

    fn config() -> ControllerConfig {
        ControllerConfig {
            startup_delay: Duration::from_millis(100),
            ..ControllerConfig::default()
        }
    }

    fn controller(channel: &RemoteChannel<4>, config: ControllerConfig) -> TestController<'_> {
        Controller::new(
            ByteQueue::default(),
            RecordingDriver::default(),
            io(),
            channel.receiver(),
            config,
        )
    }

    /// Tick every 5 ms over `[from, to)`, collecting reports
    fn run(controller: &mut TestController<'_>, from: u64, to: u64) -> Vec<TickReport> {
        (from..to)
            .step_by(5)
            .map(|now| controller.tick(at(now)).unwrap())
            .collect()
    }

    fn power_reports(reports: &[TickReport]) -> Vec<PowerStatus> {
        reports.iter().filter_map(|report| report.power).collect()
    }

    /// Hold the start button over `[from, from + held)` then release it
    fn press(controller: &mut TestController<'_>, from: u64, held: u64) -> Vec<TickReport> {
        controller.io_mut().button.level = false;
        let mut reports = run(controller, from, from + held);
        controller.io_mut().button.level = true;
        reports.extend(run(controller, from + held, from + held + 50));
        reports
    }

    #[test]
    fn test_startup_indicator() {
        let channel = RemoteChannel::new();
        let mut cabinet = controller(&channel, config());

        let report = cabinet.tick(at(0)).unwrap();
        assert_eq!(report.power, Some(PowerStatus::Off));
        assert_eq!(report.parental_mode, Some(false));
        assert!(cabinet.io_mut().status_led.level);
        assert!(cabinet.io_mut().relays.iter().all(|relay| relay.writes == [false]));

        cabinet.tick(at(50)).unwrap();
        assert!(!cabinet.startup_complete());
        assert!(cabinet.io_mut().status_led.level);

        let report = cabinet.tick(at(100)).unwrap();
        assert_eq!(report, TickReport::default());
        assert!(cabinet.startup_complete());
        assert!(!cabinet.io_mut().status_led.level);
    }

    #[test]
    fn test_button_is_ignored_during_startup() {
        let channel = RemoteChannel::new();
        let mut cabinet = controller(
            &channel,
            ControllerConfig {
                startup_delay: Duration::from_millis(5_000),
                ..ControllerConfig::default()
            },
        );
        press(&mut cabinet, 0, 1_500);
        run(&mut cabinet, 1_550, 2_500);
        assert!(cabinet.power().is_off());
        assert!(!cabinet.power().target());
    }

    #[test]
    fn test_short_press_powers_on_in_sequence() {
        let channel = RemoteChannel::new();
        let mut cabinet = controller(&channel, config());
        run(&mut cabinet, 0, 200);

        cabinet.io_mut().button.level = false;
        run(&mut cabinet, 200, 1_700);
        assert!(!cabinet.power().target());
        cabinet.io_mut().button.level = true;

        let mut energized_at = [None; 4];
        let mut reports = Vec::new();
        for now in (1_700..3_000).step_by(5) {
            reports.push(cabinet.tick(at(now)).unwrap());
            for (index, relay) in cabinet.io_mut().relays.iter().enumerate() {
                if relay.level && energized_at[index].is_none() {
                    energized_at[index] = Some(now);
                }
            }
        }

        let [Some(mains), Some(amplifier), Some(leds), Some(five_volt)] = energized_at else {
            panic!("not every relay was energized: {energized_at:?}");
        };
        assert_eq!(amplifier, 1_705);
        assert_eq!(amplifier, leds);
        assert!(five_volt - amplifier >= 250);
        assert!(mains - five_volt >= 250);

        assert_eq!(cabinet.power().phase(), PowerPhase::On);
        assert_eq!(cabinet.lighting().mode, LightMode::Rainbow);
        assert_eq!(power_reports(&reports), [PowerStatus::On]);
        assert!(cabinet.lighting().brightness() > 0);
    }

    #[test]
    fn test_long_press_powers_off_after_fade() {
        let channel = RemoteChannel::new();
        let mut cabinet = controller(&channel, config());
        run(&mut cabinet, 0, 200);
        cabinet.request_power(true);
        run(&mut cabinet, 200, 1_500);
        assert!(cabinet.power().is_on());
        assert!(cabinet.lighting().brightness() > 0);

        let mut reports = press(&mut cabinet, 1_500, 10_500);
        assert_eq!(cabinet.lighting().mode, LightMode::Off);
        reports.extend(run(&mut cabinet, 12_050, 16_000));

        assert!(cabinet.power().is_off());
        assert_eq!(cabinet.lighting().brightness(), 0);
        assert!(cabinet.io_mut().relays.iter().all(|relay| !relay.level));
        assert_eq!(power_reports(&reports), [PowerStatus::Off]);
        // A long hold never turns the cabinet back on
        assert!(!cabinet.power().target());
    }

    #[test]
    fn test_bus_mode_write_does_not_stall_power_off() {
        let channel = RemoteChannel::new();
        let mut cabinet = controller(&channel, config());
        run(&mut cabinet, 0, 200);
        cabinet.request_power(true);
        run(&mut cabinet, 200, 4_000);
        assert_eq!(cabinet.lighting().brightness(), 255);

        cabinet.request_power(false);
        cabinet.tick(at(4_000)).unwrap();
        assert_eq!(cabinet.power().phase(), PowerPhase::PoweringOff);

        cabinet.transport_mut().push(&[0x10, 1]);
        cabinet.tick(at(4_005)).unwrap();
        let brightness = cabinet.lighting().brightness();
        assert!(brightness < 255);

        run(&mut cabinet, 4_010, 8_000);
        assert!(cabinet.power().is_off());
        assert_eq!(cabinet.lighting().brightness(), 0);
        assert_eq!(cabinet.lighting().mode, LightMode::Off);
        assert!(cabinet.io_mut().relays.iter().all(|relay| !relay.level));
    }

    #[test]
    fn test_quick_tap_changes_nothing() {
        let channel = RemoteChannel::new();
        let mut cabinet = controller(&channel, config());
        run(&mut cabinet, 0, 200);
        press(&mut cabinet, 200, 400);
        run(&mut cabinet, 650, 1_000);
        assert!(cabinet.power().is_off());
        assert!(cabinet.io_mut().relays.iter().all(|relay| relay.high_writes() == 0));
    }

    #[test]
    fn test_shutdown_signal_powers_off() {
        let channel = RemoteChannel::new();
        let mut cabinet = controller(&channel, config());
        run(&mut cabinet, 0, 200);

        // Ignored while off
        cabinet.io_mut().shutdown_signal.level = true;
        run(&mut cabinet, 200, 300);
        cabinet.io_mut().shutdown_signal.level = false;

        cabinet.request_power(true);
        run(&mut cabinet, 300, 1_000);
        assert!(cabinet.power().is_on());

        cabinet.io_mut().shutdown_signal.level = true;
        run(&mut cabinet, 1_000, 5_000);
        assert!(cabinet.power().is_off());
    }

    #[test]
    fn test_button_is_mirrored() {
        let channel = RemoteChannel::new();
        let mut cabinet = controller(&channel, config());
        cabinet.tick(at(0)).unwrap();

        cabinet.io_mut().button.level = false;
        cabinet.tick(at(10)).unwrap();
        assert_eq!(cabinet.io_mut().button_mirror.writes, [false]);

        cabinet.io_mut().button.level = true;
        cabinet.tick(at(20)).unwrap();
        assert_eq!(cabinet.io_mut().button_mirror.writes, [false]);
        cabinet.tick(at(45)).unwrap();
        assert_eq!(cabinet.io_mut().button_mirror.writes, [false, true]);
    }

    #[test]
    fn test_bus_commands_reach_lighting() {
        let channel = RemoteChannel::new();
        let mut cabinet = controller(&channel, config());
        cabinet
            .transport_mut()
            .push(&[0x10, 1, 0x02, 10, 20, 30, 0x01, 80]);
        cabinet.tick(at(0)).unwrap();

        let lighting = cabinet.lighting();
        assert_eq!(lighting.mode, LightMode::Solid);
        assert_eq!(lighting.color, [10, 20, 30]);
        assert_eq!(lighting.target_brightness, 80);
        assert_eq!(cabinet.output().writes, 1);
    }

    #[test]
    fn test_bus_drain_is_bounded_per_tick() {
        let channel = RemoteChannel::new();
        let mut cabinet = controller(
            &channel,
            ControllerConfig {
                bus_bytes_per_tick: 2,
                ..config()
            },
        );
        cabinet.transport_mut().push(&[0x02, 1, 2, 3]);

        cabinet.tick(at(0)).unwrap();
        assert_eq!(cabinet.transport_mut().bytes.len(), 2);
        assert_eq!(cabinet.framer().position(), 2);

        cabinet.tick(at(1)).unwrap();
        assert!(cabinet.transport_mut().bytes.is_empty());
        assert_eq!(cabinet.lighting().color, [1, 2, 3]);
    }

    #[test]
    fn test_stalled_frame_is_dropped_between_ticks() {
        let channel = RemoteChannel::new();
        let mut cabinet = controller(&channel, config());
        cabinet.transport_mut().push(&[0x02, 9]);
        cabinet.tick(at(0)).unwrap();

        cabinet.transport_mut().push(&[0x01, 40]);
        cabinet.tick(at(150)).unwrap();
        assert_eq!(cabinet.lighting().color, [9, 255, 255]);
        assert_eq!(cabinet.lighting().target_brightness, 40);
    }

    #[test]
    fn test_remote_commands() {
        let channel = RemoteChannel::new();
        let sender = channel.sender();
        let mut cabinet = controller(&channel, config());
        run(&mut cabinet, 0, 200);

        sender.try_send(RemoteCommand::PowerOn).unwrap();
        let reports = run(&mut cabinet, 200, 1_000);
        assert!(cabinet.power().is_on());
        assert_eq!(power_reports(&reports), [PowerStatus::On]);

        sender.try_send(RemoteCommand::PressPowerButton).unwrap();
        let reports = run(&mut cabinet, 1_000, 5_000);
        assert!(cabinet.power().is_off());
        assert_eq!(power_reports(&reports), [PowerStatus::Off]);

        sender.try_send(RemoteCommand::SetParentalMode(true)).unwrap();
        let report = cabinet.tick(at(5_000)).unwrap();
        assert_eq!(report.parental_mode, Some(true));
        assert!(cabinet.parental_mode());
    }

    #[test]
    fn test_remote_queue_is_bounded() {
        let channel = RemoteChannel::<4>::new();
        let sender = channel.sender();
        for _ in 0..4 {
            sender.try_send(RemoteCommand::PowerOn).unwrap();
        }
        let rejected = sender.try_send(RemoteCommand::PowerOff).unwrap_err();
        assert_eq!(rejected.0, RemoteCommand::PowerOff);
    }

    #[test]
    fn test_parental_mode_blocks_button_power_on() {
        let channel = RemoteChannel::new();
        let sender = channel.sender();
        let mut cabinet = controller(&channel, config());
        run(&mut cabinet, 0, 200);
        sender.try_send(RemoteCommand::SetParentalMode(true)).unwrap();

        press(&mut cabinet, 200, 1_500);
        run(&mut cabinet, 1_750, 2_500);
        assert!(cabinet.power().is_off());

        sender.try_send(RemoteCommand::PowerOn).unwrap();
        run(&mut cabinet, 2_500, 3_500);
        assert!(cabinet.power().is_on());
    }

    #[test]
    fn test_pin_error_is_reported_and_retried() {
        let channel = RemoteChannel::new();
        let mut cabinet = controller(&channel, config());
        cabinet.io_mut().status_led.fail = true;

        assert_eq!(
            cabinet.tick(at(0)),
            Err(ControllerError::StatusLed(ErrorKind::Other))
        );

        cabinet.io_mut().status_led.fail = false;
        assert!(cabinet.tick(at(5)).is_ok());
        assert!(cabinet.io_mut().status_led.level);
    }
}
