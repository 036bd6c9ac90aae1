#![cfg_attr(not(test), no_std)]
//! Driver for the GP1294AI vacuum fluorescent display controller (256 x 48 pixels).
//!
//! The controller expects LSB-first SPI in mode 3, a column-major GRAM with
//! two GRAM columns per visible pixel column, and a forced trigger byte in
//! every frame. [`GP1294AI`] handles the framing and power sequencing,
//! [`gram`] the memory layout and [`bitrev`] the bit order. [`Vfd`] pairs the
//! driver with a [`Canvas`] for `embedded-graphics` drawing.
//!
//! The driver is async by default; disable the `async` feature for the
//! blocking `embedded-hal` variant.

use core::convert::Infallible;
use core::fmt;

use embedded_hal::digital::OutputPin;
use embedded_hal::spi::{Mode, Operation, MODE_3};
#[cfg(not(feature = "async"))]
use embedded_hal::spi::SpiDevice;
#[cfg(feature = "async")]
use embedded_hal_async::spi::SpiDevice;

pub mod bitrev;
pub mod canvas;
pub mod command;
mod display;
pub mod gram;

pub use canvas::{CANVAS_SIZE, Canvas};
pub use command::Instruction;
use command::{DISPLAY_OFFSET_Y, MAX_PAYLOAD_LEN, OSCILLATOR_CONFIG, VFD_MODE_CONFIG};
pub use display::Vfd;
pub use gram::{FramebufferSource, GRAM_SIZE, HEIGHT, WIDTH};

/// SPI mode required by the controller (clock idle high, sample on trailing edge).
pub const SPI_MODE: Mode = MODE_3;
/// Default SPI clock in Hz.
pub const DEFAULT_SPI_FREQUENCY: u32 = 500_000;
/// Brightness applied by `init` unless configured otherwise.
pub const DEFAULT_BRIGHTNESS: u16 = 0x0028;

// Hardware settle times (ms)
const RESET_PULSE_MS: u64 = 10;
const RESET_SETTLE_MS: u64 = 50;
const SOFT_RESET_SETTLE_MS: u64 = 50;
const CLEAR_SETTLE_MS: u64 = 20;

#[derive(Clone, Copy, Debug)]
pub struct Config {
    /// Initial brightness; the low byte is significant (0x00 - 0xFF).
    pub brightness: u16,
    /// SPI clock for the bus configuration. The driver itself does not program the bus.
    pub spi_frequency: u32,
    /// Initial auto-show state of [`Vfd`].
    pub auto_show: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            brightness: DEFAULT_BRIGHTNESS,
            spi_frequency: DEFAULT_SPI_FREQUENCY,
            auto_show: false,
        }
    }
}

/// Controller lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum State {
    /// Constructed, controller state unknown.
    Unpowered,
    /// Hardware reset completed.
    Reset,
    /// Software reset sent, configuration in progress.
    Configuring,
    /// Configured, filament still off.
    Ready,
    /// Filament on, content visible.
    Active,
    /// Filament off and controller in standby. Only `init` leaves this state.
    Standby,
}

#[derive(Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<E = (), P = Infallible> {
    /// Communication error
    Comm(E),
    /// Pin setting error
    Pin(P),
    /// GRAM image of the wrong size; carries the rejected length
    GramLength(usize),
    /// Payload does not match the fixed shape of the instruction
    PayloadShape { instruction: Instruction, len: usize },
}

impl<E: fmt::Debug, P: fmt::Debug> fmt::Display for Error<E, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Comm(e) => write!(f, "SPI error: {:?}", e),
            Error::Pin(e) => write!(f, "pin error: {:?}", e),
            Error::GramLength(len) => {
                write!(f, "GRAM image is {} bytes, expected {}", len, GRAM_SIZE)
            }
            Error::PayloadShape { instruction, len } => {
                write!(f, "{:?} does not take a {} byte payload", instruction, len)
            }
        }
    }
}

fn comm_failed<E, P>(err: E) -> Error<E, P> {
    #[cfg(feature = "defmt")]
    defmt::warn!("gp1294ai: SPI transaction failed");
    Error::Comm(err)
}

pub struct GP1294AI<'b, SPI, RST, FIL, TIMER>
where
    SPI: SpiDevice,
    RST: OutputPin,
    FIL: OutputPin,
    TIMER: Timer,
{
    spi: SPI,
    rst: RST,
    fil_en: FIL,
    config: Config,
    state: State,
    brightness: u16,
    /// Transmit scratch; holds the bit-reversed GRAM image.
    buffer: &'b mut [u8; GRAM_SIZE],
    _timer: core::marker::PhantomData<TIMER>,
}

#[maybe_async_cfg::maybe(
    sync(cfg(not(feature = "async")), self = "GP1294AI",),
    async(feature = "async", keep_self)
)]
impl<'b, SPI, RST, FIL, E, P, TIMER> GP1294AI<'b, SPI, RST, FIL, TIMER>
where
    SPI: SpiDevice<Error = E>,
    RST: OutputPin<Error = P>,
    FIL: OutputPin<Error = P>,
    TIMER: Timer,
{
    /// Create a driver. No bus or pin traffic happens until [`init`](Self::init).
    ///
    /// `fil_en` should already be driven low by the caller.
    pub fn new(
        config: Config,
        spi: SPI,
        rst: RST,
        fil_en: FIL,
        buffer: &'b mut [u8; GRAM_SIZE],
    ) -> Self {
        Self {
            spi,
            rst,
            fil_en,
            config,
            state: State::Unpowered,
            brightness: config.brightness,
            buffer,
            _timer: core::marker::PhantomData,
        }
    }

    /// Run the full power-up sequence and switch the filament on.
    ///
    /// Always starts with a hardware reset, so it is also the way back from
    /// [`State::Standby`] and may be repeated while active. On error the
    /// driver stays in the last state reached.
    pub async fn init(&mut self) -> Result<(), Error<E, P>> {
        self.hardware_reset().await?;
        self.software_reset().await?;

        self.set_vfd_mode().await?;
        self.set_brightness(self.brightness).await?;

        self.clear().await?;
        TIMER::delay_ms(CLEAR_SETTLE_MS).await;

        self.set_display_offset(0, DISPLAY_OFFSET_Y).await?;
        self.set_display_mode(0).await?;
        self.set_oscillator().await?;
        self.set_state(State::Ready);

        self.filament_on()?;
        self.set_state(State::Active);
        Ok(())
    }

    /// Switch the filament off and put the controller into standby.
    ///
    /// Before the controller has been reset and configured there is nothing
    /// to put into standby, so only the filament line is driven.
    pub async fn deinit(&mut self) -> Result<(), Error<E, P>> {
        self.filament_off()?;
        match self.state {
            State::Configuring | State::Ready | State::Active => {
                self.enter_standby().await?;
                self.set_state(State::Standby);
            }
            State::Unpowered | State::Reset | State::Standby => {}
        }
        Ok(())
    }

    /// Pulse RST low for 10 ms and wait 50 ms for the controller to come up.
    pub async fn hardware_reset(&mut self) -> Result<(), Error<E, P>> {
        self.rst.set_low().map_err(Error::Pin)?;
        TIMER::delay_ms(RESET_PULSE_MS).await;
        self.rst.set_high().map_err(Error::Pin)?;
        TIMER::delay_ms(RESET_SETTLE_MS).await;
        self.set_state(State::Reset);
        Ok(())
    }

    pub async fn software_reset(&mut self) -> Result<(), Error<E, P>> {
        self.send_command(Instruction::Reset, &[]).await?;
        TIMER::delay_ms(SOFT_RESET_SETTLE_MS).await;
        self.set_state(State::Configuring);
        Ok(())
    }

    pub fn filament_on(&mut self) -> Result<(), Error<E, P>> {
        self.fil_en.set_high().map_err(Error::Pin)
    }

    pub fn filament_off(&mut self) -> Result<(), Error<E, P>> {
        self.fil_en.set_low().map_err(Error::Pin)
    }

    /// Set the dimming level. Sent as a little-endian 16-bit value; the panel
    /// uses the low byte, higher values are passed through unchanged.
    pub async fn set_brightness(&mut self, brightness: u16) -> Result<(), Error<E, P>> {
        self.brightness = brightness;
        self.send_command(Instruction::Brightness, &brightness.to_le_bytes())
            .await
    }

    pub async fn set_display_offset(&mut self, x: u8, y: u8) -> Result<(), Error<E, P>> {
        self.send_command(Instruction::DisplayOffset, &[x, y]).await
    }

    pub async fn set_display_mode(&mut self, mode: u8) -> Result<(), Error<E, P>> {
        self.send_command(Instruction::DisplayMode, &[mode]).await
    }

    pub async fn set_vfd_mode(&mut self) -> Result<(), Error<E, P>> {
        self.send_command(Instruction::VfdMode, &VFD_MODE_CONFIG).await
    }

    pub async fn set_oscillator(&mut self) -> Result<(), Error<E, P>> {
        self.send_command(Instruction::OscillatorSetting, &[OSCILLATOR_CONFIG])
            .await
    }

    pub async fn frame_sync(&mut self) -> Result<(), Error<E, P>> {
        self.send_command(Instruction::FrameSync, &[]).await
    }

    /// Send the standby command. Does not change [`state`](Self::state); use
    /// [`deinit`](Self::deinit) for the full power-down.
    pub async fn enter_standby(&mut self) -> Result<(), Error<E, P>> {
        self.send_command(Instruction::EnterStandby, &[]).await
    }

    /// Send the exit-standby command. Does not change [`state`](Self::state).
    pub async fn exit_standby(&mut self) -> Result<(), Error<E, P>> {
        self.send_command(Instruction::ExitStandby, &[]).await
    }

    /// Send one instruction with its payload in a single SPI transaction.
    pub async fn send_command(
        &mut self,
        instruction: Instruction,
        payload: &[u8],
    ) -> Result<(), Error<E, P>> {
        if instruction.payload_len() != Some(payload.len()) {
            return Err(Error::PayloadShape {
                instruction,
                len: payload.len(),
            });
        }

        let len = payload.len() + 1;
        let mut frame = [0u8; MAX_PAYLOAD_LEN + 1];
        frame[0] = instruction.opcode();
        frame[1..len].copy_from_slice(payload);
        bitrev::reverse_all(&mut frame[..len]);

        self.spi.write(&frame[..len]).await.map_err(comm_failed)
    }

    /// Write a complete GRAM image (exactly [`GRAM_SIZE`] bytes, natural bit order).
    ///
    /// The caller is responsible for the trigger byte, see [`gram::apply_trigger`].
    pub async fn write_gram(
        &mut self,
        data: &[u8],
        x_start: u8,
        y_start: u8,
    ) -> Result<(), Error<E, P>> {
        if data.len() != GRAM_SIZE {
            #[cfg(feature = "defmt")]
            defmt::warn!("gp1294ai: rejected {} byte GRAM image", data.len());
            return Err(Error::GramLength(data.len()));
        }

        bitrev::reverse_into(data, &mut self.buffer[..])
            .ok_or(Error::GramLength(data.len()))?;
        self.transmit_buffer(x_start, y_start).await
    }

    /// Convert `source` to GRAM (trigger byte included) and write it.
    pub async fn show<S>(&mut self, source: &S) -> Result<(), Error<E, P>>
    where
        S: FramebufferSource + ?Sized,
    {
        gram::transform(source, self.buffer);
        bitrev::reverse_all(&mut self.buffer[..]);
        self.transmit_buffer(0, 0).await
    }

    /// Blank the display, keeping the trigger byte.
    pub async fn clear(&mut self) -> Result<(), Error<E, P>> {
        self.buffer.fill(0);
        gram::apply_trigger(self.buffer);
        bitrev::reverse_all(&mut self.buffer[..]);
        self.transmit_buffer(0, 0).await
    }

    /// Light every GRAM pixel.
    pub async fn fill(&mut self) -> Result<(), Error<E, P>> {
        self.buffer.fill(0xFF);
        self.transmit_buffer(0, 0).await
    }

    /// Header and the (already reversed) scratch buffer in one chip-select assertion.
    async fn transmit_buffer(&mut self, x_start: u8, y_start: u8) -> Result<(), Error<E, P>> {
        let mut header = [Instruction::WriteGram.opcode(), x_start, y_start];
        bitrev::reverse_all(&mut header);

        self.spi
            .transaction(&mut [
                Operation::Write(&header),
                Operation::Write(&self.buffer[..]),
            ])
            .await
            .map_err(comm_failed)
    }

    fn set_state(&mut self, state: State) {
        #[cfg(feature = "defmt")]
        defmt::debug!("gp1294ai: {} -> {}", self.state, state);
        self.state = state;
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn is_initialized(&self) -> bool {
        self.state == State::Active
    }

    pub fn brightness(&self) -> u16 {
        self.brightness
    }

    pub fn config(&self) -> &Config {
        &self.config
    }
}

#[maybe_async_cfg::maybe(
    sync(cfg(not(feature = "async")), self = "Timer",),
    async(feature = "async", keep_self)
)]
/// Simplified timer trait for delay operations.
pub trait Timer {
    /// Delay for the specified number of milliseconds.
    async fn delay_ms(milliseconds: u64);
}

/// [`Timer`] backed by `embassy-time`.
#[cfg(feature = "embassy-time")]
pub struct EmbassyTimer;

#[cfg(all(feature = "embassy-time", feature = "async"))]
impl Timer for EmbassyTimer {
    async fn delay_ms(milliseconds: u64) {
        embassy_time::Timer::after_millis(milliseconds).await;
    }
}

#[cfg(all(feature = "embassy-time", not(feature = "async")))]
impl Timer for EmbassyTimer {
    fn delay_ms(milliseconds: u64) {
        embassy_time::block_for(embassy_time::Duration::from_millis(milliseconds));
    }
}
