//! End-to-end scenarios: canvas content to GRAM image, and lifecycle edge cases.
#![cfg(feature = "async")]

mod common;

use common::*;
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_hal_mock::eh1::digital::{
    Mock as PinMock, State as PinState, Transaction as PinTransaction,
};
use embedded_hal_mock::eh1::spi::Mock as SpiMock;
use gp1294ai_async::gram::{self, GRAM_STRIDE};
use gp1294ai_async::{Canvas, Config, GRAM_SIZE, State};

fn transformed(canvas: &Canvas) -> [u8; GRAM_SIZE] {
    let mut out = [0u8; GRAM_SIZE];
    gram::transform(canvas, &mut out);
    out
}

#[test]
fn test_blank_canvas() {
    let out = transformed(&Canvas::new());

    assert_eq!(out.len(), 4096);
    assert_eq!(out[0], 0xFF);
    assert!(out[1..].iter().all(|&b| b == 0));
}

#[test]
fn test_full_canvas() {
    let mut canvas = Canvas::new();
    canvas.fill(BinaryColor::On);
    let out = transformed(&canvas);

    // rows 48..64 do not exist on the panel
    for column in out.chunks_exact(GRAM_STRIDE) {
        assert_eq!(column, &[0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0x00, 0x00]);
    }
}

#[test]
fn test_single_pixel() {
    let mut canvas = Canvas::new();
    canvas.set_pixel(5, 3, BinaryColor::On);
    let out = transformed(&canvas);

    assert_eq!(out[10 * GRAM_STRIDE], 0b0000_1000);
    assert_eq!(out[11 * GRAM_STRIDE], 0b0000_1000);
    for (i, &b) in out.iter().enumerate() {
        if i != 0 && i != 10 * GRAM_STRIDE && i != 11 * GRAM_STRIDE {
            assert_eq!(b, 0, "unexpected byte at {}", i);
        }
    }
}

#[tokio::test]
async fn test_deinit_without_init() {
    let mut spi = SpiMock::new(&[]);
    let mut rst = idle_pin();
    let mut fil = PinMock::new(&[PinTransaction::set(PinState::Low)]);
    let mut buffer = [0u8; GRAM_SIZE];

    let mut drv = driver(Config::default(), &spi, &rst, &fil, &mut buffer);
    drv.deinit().await.expect("deinit before init must not fail");
    assert_eq!(drv.state(), State::Unpowered);

    spi.done();
    rst.done();
    fil.done();
}

#[tokio::test]
async fn test_init_twice() {
    let mut txns = init_spi_transactions(0x0028);
    txns.extend(init_spi_transactions(0x0028));
    let mut spi = SpiMock::new(&txns);
    let mut rst_txns = reset_pulse().to_vec();
    rst_txns.extend(reset_pulse());
    let mut rst = PinMock::new(&rst_txns);
    let mut fil = PinMock::new(&[
        PinTransaction::set(PinState::High),
        PinTransaction::set(PinState::High),
    ]);
    let mut buffer = [0u8; GRAM_SIZE];
    take_delays();

    let mut drv = driver(Config::default(), &spi, &rst, &fil, &mut buffer);
    drv.init().await.unwrap();
    drv.init().await.unwrap();

    assert_eq!(drv.state(), State::Active);
    let delays = take_delays();
    assert_eq!(&delays[..4], &INIT_DELAYS);
    assert_eq!(&delays[4..], &INIT_DELAYS);

    spi.done();
    rst.done();
    fil.done();
}

#[tokio::test]
async fn test_show_transmits_transformed_canvas() {
    let mut canvas = Canvas::new();
    canvas.set_pixel(5, 3, BinaryColor::On);
    canvas.set_pixel(255, 47, BinaryColor::On);
    let expected = transformed(&canvas);

    let mut spi = SpiMock::new(&gram_write(0, 0, &expected));
    let mut rst = idle_pin();
    let mut fil = idle_pin();
    let mut buffer = [0u8; GRAM_SIZE];

    let mut drv = driver(Config::default(), &spi, &rst, &fil, &mut buffer);
    drv.show(&canvas).await.unwrap();

    spi.done();
    rst.done();
    fil.done();
}
