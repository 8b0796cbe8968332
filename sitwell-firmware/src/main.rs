//! Sitwell - Seat Posture Monitor Firmware
//!
//! Main firmware binary for RP2040-based seat cushions. A handful of
//! force-sensitive resistors are sampled every tick; the core engine
//! decides whether posture is stable and drives an RGB light and buzzer.
//! Wiring and tuning come from the embedded `seat.toml`.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::adc::{Adc, Config as AdcConfig};
use embassy_rp::bind_interrupts;
use embassy_rp::peripherals::UART0;
use embassy_rp::uart::{BufferedInterruptHandler, Config as UartConfig, Uart};
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use sitwell_core::config::{parse_config, ConfigError, PinConfig, SeatConfig};
use sitwell_core::telemetry::boot_record;
use sitwell_core::Monitor;
use sitwell_drivers::feedback::{GpioBuzzer, GpioRgbLed};
use sitwell_drivers::input::button::DEFAULT_STOP_POLLS;
use sitwell_drivers::input::StopButton;
use sitwell_drivers::sensor::{Divider, FsrArray};
use sitwell_hal::Polarity;
use sitwell_hal_rp2040::adc::AllocError;
use sitwell_hal_rp2040::gpio::GpioError;
use sitwell_hal_rp2040::pins::RemainingPeripherals;
use sitwell_hal_rp2040::{
    AdcAllocator, AdcBank, AdcPins, GpioAllocator, PinBank, PinError, RpInput, RpOutput,
};

use crate::channels::publish;
use crate::tasks::{MonitorSettings, SeatMonitor};

/// Embedded configuration (compiled into firmware)
/// Edit seat.toml and rebuild to customize
const EMBEDDED_CONFIG: &str = include_str!("../seat.toml");

mod channels;
mod tasks;

bind_interrupts!(struct Irqs {
    UART0_IRQ => BufferedInterruptHandler<UART0>;
});

// Static cells for UART buffers (must live forever)
static TX_BUF: StaticCell<[u8; 256]> = StaticCell::new();
static RX_BUF: StaticCell<[u8; 16]> = StaticCell::new();

/// Hardware setup failures
#[derive(Debug)]
enum SetupError {
    /// Pin missing from the bank or reserved
    Pin(u8, PinError),
    /// Digital pin used twice
    Gpio(u8, GpioError),
    /// Sensor pin without an ADC channel, or used twice
    Adc(u8, AllocError),
    /// More sensor channels than ADC inputs
    TooManySensors,
    /// Config rejected by the engine
    Config(ConfigError),
}

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Sitwell firmware starting...");

    // Initialize RP2040 peripherals
    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    let config = load_config();
    let settings = MonitorSettings {
        tick_interval_ms: config.engine.tick_interval_ms,
        snapshot_interval_ms: config.board.snapshot_interval_ms,
    };

    let (mut bank, mut adc_pins, remaining) = PinBank::from_peripherals(p);

    // Setup UART for telemetry
    // GPIO0 TX, GPIO1 RX (unused)
    let mut uart_config = UartConfig::default();
    uart_config.baudrate = config.board.telemetry_baud;

    let tx_buf = TX_BUF.init([0u8; 256]);
    let rx_buf = RX_BUF.init([0u8; 16]);

    let RemainingPeripherals {
        adc,
        uart0,
        uart_tx,
        uart_rx,
    } = remaining;

    let uart = Uart::new_blocking(uart0, uart_tx, uart_rx, uart_config);
    let uart = uart.into_buffered(Irqs, tx_buf, rx_buf);
    let (tx, _rx) = uart.split();

    info!("UART initialized for telemetry at {} baud", config.board.telemetry_baud);

    spawner.spawn(tasks::telemetry_task(tx)).unwrap();
    publish(boot_record(&config));

    // Setup ADC for the pressure sensors
    let adc = Adc::new_blocking(adc, AdcConfig::default());

    match build_monitor(config, adc, &mut bank, &mut adc_pins) {
        Ok(monitor) => {
            info!("Sensors, light and buzzer initialized");
            spawner.spawn(tasks::monitor_task(monitor, settings)).unwrap();
        }
        Err(e) => {
            error!("Hardware setup failed: {:?}", defmt::Debug2Format(&e));
            error!("Monitor not started, check [board] in seat.toml");
        }
    }

    info!("All tasks spawned, firmware running");

    // Main task has nothing else to do - all work happens in spawned tasks
    loop {
        embassy_time::Timer::after_secs(60).await;
        trace!("Main loop heartbeat");
    }
}

/// Load the embedded configuration
///
/// Falls back to the built-in defaults if seat.toml does not parse or
/// does not validate. build.rs catches both cases at compile time, so
/// this only happens when the two checks disagree.
fn load_config() -> SeatConfig {
    let config = match parse_config(EMBEDDED_CONFIG) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to parse embedded config: {:?}", e);
            error!("Using default configuration");
            return SeatConfig::default();
        }
    };

    match config.validate() {
        Ok(()) => {
            info!(
                "Parsed embedded configuration: {} channels, {} zones",
                config.channel_count,
                config.zones.len()
            );
            config
        }
        Err(e) => {
            error!("Embedded config rejected: {:?}", e);
            error!("Using default configuration");
            SeatConfig::default()
        }
    }
}

/// Claim every configured pin and assemble the monitor
fn build_monitor(
    config: SeatConfig,
    adc: Adc<'static, embassy_rp::adc::Blocking>,
    bank: &mut PinBank,
    adc_pins: &mut AdcPins,
) -> Result<SeatMonitor, SetupError> {
    let board = &config.board;

    // Catch duplicate digital pins before touching any of them
    let mut gpio = GpioAllocator::new();
    gpio.allocate_all(&board.digital_pins())
        .map_err(|(pin, e)| SetupError::Gpio(pin, e))?;

    // Pressure sensors, in channel order
    let mut adc_alloc = AdcAllocator::new();
    let mut analog = AdcBank::new(adc);
    for &gpio_pin in board.sensor_pins.iter().take(config.channel_count as usize) {
        adc_alloc
            .allocate_gpio(gpio_pin)
            .map_err(|e| SetupError::Adc(gpio_pin, e))?;
        let channel = adc_pins
            .take_channel(gpio_pin)
            .map_err(|e| SetupError::Pin(gpio_pin, e))?;
        analog
            .push(channel)
            .map_err(|_| SetupError::TooManySensors)?;
        debug!("Sensor channel on gpio{}", gpio_pin);
    }
    let sensors = FsrArray::new(
        analog,
        board.vref_mv,
        Divider::from_inverted(board.sensors_inverted),
    );

    // Status LED (all dies share one common pin, so one polarity)
    let led = board.led;
    let light = GpioRgbLed::new(
        output(bank, led.red)?,
        output(bank, led.green)?,
        output(bank, led.blue)?,
        Polarity::from_inverted(led.red.inverted),
    );

    let buzzer = match board.buzzer {
        Some(pin) => Some(GpioBuzzer::new(
            output(bank, pin)?,
            Polarity::from_inverted(pin.inverted),
        )),
        None => {
            info!("No buzzer configured");
            None
        }
    };

    let stop = match board.stop_button {
        Some(pin) => {
            let input = bank
                .take(pin.pin)
                .map_err(|e| SetupError::Pin(pin.pin, e))?;
            Some(StopButton::new(
                RpInput::new(input, pin.pull_up),
                Polarity::from_inverted(pin.inverted),
                DEFAULT_STOP_POLLS,
            ))
        }
        None => {
            info!("No stop button configured");
            None
        }
    };

    Monitor::new(config, sensors, light, buzzer, stop).map_err(SetupError::Config)
}

/// Take a pin from the bank as a push-pull output
fn output(bank: &mut PinBank, pin: PinConfig) -> Result<RpOutput, SetupError> {
    bank.take(pin.pin)
        .map(RpOutput::new)
        .map_err(|e| SetupError::Pin(pin.pin, e))
}
