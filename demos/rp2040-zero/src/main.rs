#![no_std]
#![no_main]

//! GP1294AI demo for the RP2040-Zero.
//!
//! | Signal | Pin  |
//! |--------|------|
//! | FIL_EN | GP0  |
//! | CS#    | GP1  |
//! | SCK    | GP2 (SPI0) |
//! | MOSI   | GP3 (SPI0) |
//! | RST#   | GP4  |

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::gpio::{Level, Output};
use embassy_rp::spi::{Config as SpiConfig, Phase, Polarity, Spi};
use embassy_time::Timer;
use embedded_graphics::mono_font::{MonoTextStyle, ascii::FONT_6X10};
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{Circle, Line, PrimitiveStyle, Rectangle};
use embedded_graphics::text::{Alignment, Text};
use embedded_hal_bus::spi::ExclusiveDevice;
use gp1294ai_async::{Canvas, Config as DisplayConfig, EmbassyTimer, GP1294AI, GRAM_SIZE, Vfd};
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

static GRAM_BUFFER: StaticCell<[u8; GRAM_SIZE]> = StaticCell::new();

const BRIGHTNESS_STEPS: [u16; 6] = [0x08, 0x28, 0x60, 0xA0, 0xFF, 0x28];

#[embassy_executor::main]
async fn main(_spawner: Spawner) {
    info!("GP1294AI demo starting...");

    let p = embassy_rp::init(Default::default());

    let display_config = DisplayConfig::default();

    // Mode 3: clock idles high, data sampled on the trailing edge
    let mut spi_config = SpiConfig::default();
    spi_config.frequency = display_config.spi_frequency;
    spi_config.polarity = Polarity::IdleHigh;
    spi_config.phase = Phase::CaptureOnSecondTransition;

    let spi_bus = Spi::new_blocking_txonly(p.SPI0, p.PIN_2, p.PIN_3, spi_config);

    let fil_en = Output::new(p.PIN_0, Level::Low);
    let cs = Output::new(p.PIN_1, Level::High);
    let rst = Output::new(p.PIN_4, Level::High);

    let spi = unwrap!(ExclusiveDevice::new_no_delay(spi_bus, cs));

    let buffer = GRAM_BUFFER.init([0; GRAM_SIZE]);
    let driver = GP1294AI::<_, _, _, EmbassyTimer>::new(display_config, spi, rst, fil_en, buffer);
    let mut vfd = Vfd::new(driver);

    info!("Initializing display...");
    if let Err(e) = vfd.init() {
        error!("Display initialization failed: {}", Debug2Format(&e));
        return;
    }
    info!("Display initialized");

    let mut frame = 0u32;
    loop {
        let drawn = match frame % 3 {
            0 => {
                info!("Text");
                vfd.draw(draw_text)
            }
            1 => {
                info!("Shapes");
                vfd.draw(draw_shapes)
            }
            _ => {
                info!("Inverted shapes");
                vfd.draw(|canvas| {
                    draw_shapes(canvas);
                    canvas.invert();
                })
            }
        };
        if let Err(e) = drawn {
            warn!("Frame {} not drawn: {}", frame, Debug2Format(&e));
        }
        if let Err(e) = vfd.show() {
            warn!("Frame {} not shown: {}", frame, Debug2Format(&e));
        }
        Timer::after_secs(2).await;

        if frame % 3 == 2 {
            for level in BRIGHTNESS_STEPS {
                info!("Brightness {=u16:#x}", level);
                if let Err(e) = vfd.set_brightness(level) {
                    warn!("Brightness {=u16:#x} not set: {}", level, Debug2Format(&e));
                }
                Timer::after_millis(400).await;
            }
        }
        frame = frame.wrapping_add(1);
    }
}

fn draw_text(canvas: &mut Canvas) {
    canvas.fill(BinaryColor::Off);
    let style = MonoTextStyle::new(&FONT_6X10, BinaryColor::On);
    let _ = Text::new("GP1294AI", Point::new(0, 8), style).draw(canvas);
    let _ = Text::new("256x48 VFD", Point::new(0, 20), style).draw(canvas);
    let _ = Text::with_alignment("RP2040-Zero", Point::new(255, 44), style, Alignment::Right)
        .draw(canvas);
}

fn draw_shapes(canvas: &mut Canvas) {
    canvas.fill(BinaryColor::Off);
    let stroke = PrimitiveStyle::with_stroke(BinaryColor::On, 1);
    let _ = Rectangle::new(Point::zero(), Size::new(256, 48))
        .into_styled(stroke)
        .draw(canvas);
    let _ = Circle::new(Point::new(60, 6), 36).into_styled(stroke).draw(canvas);
    let _ = Circle::new(Point::new(110, 9), 30)
        .into_styled(PrimitiveStyle::with_fill(BinaryColor::On))
        .draw(canvas);
    let _ = Line::new(Point::new(150, 5), Point::new(190, 42))
        .into_styled(stroke)
        .draw(canvas);
    let _ = Line::new(Point::new(150, 42), Point::new(190, 5))
        .into_styled(stroke)
        .draw(canvas);
}
