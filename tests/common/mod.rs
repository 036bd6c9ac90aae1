//! Shared helpers for the driver integration tests.
#![allow(dead_code)]

use std::cell::RefCell;

use embedded_hal::spi::{ErrorKind, ErrorType, Operation};
use embedded_hal_mock::eh1::digital::{
    Mock as PinMock, State as PinState, Transaction as PinTransaction,
};
use embedded_hal_mock::eh1::spi::{Mock as SpiMock, Transaction as SpiTransaction};
use gp1294ai_async::{Config, GP1294AI, GRAM_SIZE, Timer};

pub type TestDriver<'b> = GP1294AI<'b, SpiMock<u8>, PinMock, PinMock, RecordingTimer>;

thread_local! {
    static DELAYS: RefCell<Vec<u64>> = const { RefCell::new(Vec::new()) };
}

/// Timer that records every requested delay for the current test thread.
pub struct RecordingTimer;

impl Timer for RecordingTimer {
    async fn delay_ms(milliseconds: u64) {
        DELAYS.with(|d| d.borrow_mut().push(milliseconds));
    }
}

/// Drain the delays recorded so far on this thread.
pub fn take_delays() -> Vec<u64> {
    DELAYS.with(|d| d.borrow_mut().drain(..).collect())
}

/// Bytes as they appear on the wire: LSB-first, i.e. bit-reversed.
pub fn wire(bytes: &[u8]) -> Vec<u8> {
    bytes.iter().map(|b| b.reverse_bits()).collect()
}

/// One `send_command` call: a single chip-select framed write.
pub fn command(frame: &[u8]) -> [SpiTransaction<u8>; 3] {
    [
        SpiTransaction::transaction_start(),
        SpiTransaction::write_vec(wire(frame)),
        SpiTransaction::transaction_end(),
    ]
}

/// One GRAM write: header and payload inside the same chip-select assertion.
pub fn gram_write(x_start: u8, y_start: u8, payload: &[u8]) -> [SpiTransaction<u8>; 4] {
    [
        SpiTransaction::transaction_start(),
        SpiTransaction::write_vec(wire(&[0xF0, x_start, y_start])),
        SpiTransaction::write_vec(wire(payload)),
        SpiTransaction::transaction_end(),
    ]
}

/// A blank GRAM image with the trigger byte set.
pub fn cleared_gram() -> Vec<u8> {
    let mut gram = vec![0u8; GRAM_SIZE];
    gram[0] = 0xFF;
    gram
}

/// Every SPI transaction of one `init()` with the given brightness.
pub fn init_spi_transactions(brightness: u16) -> Vec<SpiTransaction<u8>> {
    let [lo, hi] = brightness.to_le_bytes();
    let mut txns = Vec::new();
    txns.extend(command(&[0xAA]));
    txns.extend(command(&[0xCC, 0x01, 0x1F, 0x00, 0xFF, 0x3F, 0x00, 0x20]));
    txns.extend(command(&[0xA0, lo, hi]));
    txns.extend(gram_write(0, 0, &cleared_gram()));
    txns.extend(command(&[0xC0, 0x00, 0x38]));
    txns.extend(command(&[0x80, 0x00]));
    txns.extend(command(&[0x78, 0x08]));
    txns
}

/// Delays of one `init()`: reset pulse, reset settle, soft reset settle, clear settle.
pub const INIT_DELAYS: [u64; 4] = [10, 50, 50, 20];

/// RST expectations of one hardware reset.
pub fn reset_pulse() -> [PinTransaction; 2] {
    [
        PinTransaction::set(PinState::Low),
        PinTransaction::set(PinState::High),
    ]
}

pub fn idle_pin() -> PinMock {
    PinMock::new(&[])
}

pub fn driver<'b>(
    config: Config,
    spi: &SpiMock<u8>,
    rst: &PinMock,
    fil: &PinMock,
    buffer: &'b mut [u8; GRAM_SIZE],
) -> TestDriver<'b> {
    GP1294AI::new(config, spi.clone(), rst.clone(), fil.clone(), buffer)
}

/// SPI device whose every transaction fails.
pub struct FailingSpi;

impl ErrorType for FailingSpi {
    type Error = ErrorKind;
}

impl embedded_hal_async::spi::SpiDevice for FailingSpi {
    async fn transaction(&mut self, _operations: &mut [Operation<'_, u8>]) -> Result<(), ErrorKind> {
        Err(ErrorKind::Other)
    }
}
