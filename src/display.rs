use embedded_graphics_core::pixelcolor::BinaryColor;
use embedded_hal::digital::OutputPin;
#[cfg(not(feature = "async"))]
use embedded_hal::spi::SpiDevice;
#[cfg(feature = "async")]
use embedded_hal_async::spi::SpiDevice;

use crate::{Canvas, Error, GP1294AI, Timer};

/// A [`GP1294AI`] together with the [`Canvas`] it displays.
///
/// Draw on [`canvas_mut`](Self::canvas_mut) (or through [`draw`](Self::draw))
/// and call [`show`](Self::show) to push the frame.
pub struct Vfd<'b, SPI, RST, FIL, TIMER>
where
    SPI: SpiDevice,
    RST: OutputPin,
    FIL: OutputPin,
    TIMER: Timer,
{
    driver: GP1294AI<'b, SPI, RST, FIL, TIMER>,
    canvas: Canvas,
    auto_show: bool,
}

#[maybe_async_cfg::maybe(
    sync(cfg(not(feature = "async")), self = "Vfd",),
    async(feature = "async", keep_self)
)]
impl<'b, SPI, RST, FIL, E, P, TIMER> Vfd<'b, SPI, RST, FIL, TIMER>
where
    SPI: SpiDevice<Error = E>,
    RST: OutputPin<Error = P>,
    FIL: OutputPin<Error = P>,
    TIMER: Timer,
{
    /// Auto-show starts as configured in [`Config::auto_show`](crate::Config::auto_show).
    pub fn new(driver: GP1294AI<'b, SPI, RST, FIL, TIMER>) -> Self {
        let auto_show = driver.config().auto_show;
        Self {
            driver,
            canvas: Canvas::new(),
            auto_show,
        }
    }

    /// Initialize the controller and blank the canvas.
    pub async fn init(&mut self) -> Result<(), Error<E, P>> {
        self.driver.init().await?;
        self.canvas.fill(BinaryColor::Off);
        Ok(())
    }

    /// Transfer the canvas to the display.
    pub async fn show(&mut self) -> Result<(), Error<E, P>> {
        self.driver.show(&self.canvas).await
    }

    /// Blank the canvas and show it.
    pub async fn clear(&mut self) -> Result<(), Error<E, P>> {
        self.canvas.fill(BinaryColor::Off);
        self.show().await
    }

    /// Run `f` on the canvas, then [`show`](Self::show) if auto-show is enabled.
    pub async fn draw<F>(&mut self, f: F) -> Result<(), Error<E, P>>
    where
        F: FnOnce(&mut Canvas),
    {
        f(&mut self.canvas);
        if self.auto_show {
            self.show().await?;
        }
        Ok(())
    }

    /// With auto-show enabled every [`draw`](Self::draw) transmits a full frame,
    /// which is slow for drawings built from many small steps.
    pub fn set_auto_show(&mut self, enabled: bool) {
        self.auto_show = enabled;
    }

    pub fn auto_show(&self) -> bool {
        self.auto_show
    }

    pub async fn set_brightness(&mut self, brightness: u16) -> Result<(), Error<E, P>> {
        self.driver.set_brightness(brightness).await
    }

    /// Enter (`true`) or leave (`false`) controller standby.
    ///
    /// The filament and [`State`](crate::State) are left alone; use
    /// [`deinit`](Self::deinit) for a full power-down.
    pub async fn standby(&mut self, enable: bool) -> Result<(), Error<E, P>> {
        if enable {
            self.driver.enter_standby().await
        } else {
            self.driver.exit_standby().await
        }
    }

    pub fn filament_on(&mut self) -> Result<(), Error<E, P>> {
        self.driver.filament_on()
    }

    pub fn filament_off(&mut self) -> Result<(), Error<E, P>> {
        self.driver.filament_off()
    }

    pub async fn deinit(&mut self) -> Result<(), Error<E, P>> {
        self.driver.deinit().await
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    pub fn canvas_mut(&mut self) -> &mut Canvas {
        &mut self.canvas
    }

    pub fn driver(&self) -> &GP1294AI<'b, SPI, RST, FIL, TIMER> {
        &self.driver
    }

    pub fn driver_mut(&mut self) -> &mut GP1294AI<'b, SPI, RST, FIL, TIMER> {
        &mut self.driver
    }
}
