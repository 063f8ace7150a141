//! High-level interface for the AD5272/AD5274 digital potentiometer.
//!
//! [`Ad5272`] wraps the low-level transport with presence tracking, range
//! validation, the unlock → write → verify sequence and a cached wiper
//! position that backs the telemetry accessors.

use embassy_time::Instant;
use embedded_hal_async::delay::DelayNs;
use embedded_hal_async::i2c::I2c;

use crate::calibration::{position_to_resistance, resistance_to_position};
use crate::config::Ad5272Config;
use crate::driver::Ad5272Bus;
use crate::error::{Ad5272Error, ConfigError};
use crate::protocol::Command;
use crate::registers::{CONTROL_RDAC_WRITE_ENABLE, VERIFY_DELAY_MS, WIPER_MAX, WIPER_MIDSCALE};
use crate::status::{DeviceState, Status};

/// Driver for one AD5272/AD5274 on the bus.
///
/// All bus traffic is sequential: each multi-step operation runs to
/// completion or to its first failure, and no operation retries. Retry
/// policy belongs to the caller.
///
/// # Example
///
/// ```no_run
/// use ad5272_driver::{Ad5272, Ad5272Config};
///
/// # async fn example<I: embedded_hal_async::i2c::I2c>(i2c: I, delay: embassy_time::Delay) {
/// let mut pot = Ad5272::new(i2c, delay, Ad5272Config::default()).unwrap();
/// pot.init().await;
///
/// if pot.set_resistance(10_000.0).await.is_ok() {
///     let ohms = pot.current_resistance().await;
/// }
/// # }
/// ```
pub struct Ad5272<I2C, D> {
    bus: Ad5272Bus<I2C, D>,
    config: Ad5272Config,
    /// Last known wiper step, always within `0..=WIPER_MAX`.
    current_wiper: u16,
    state: DeviceState,
    /// Whether any presence check has ever succeeded.
    ever_available: bool,
    status: Status,
    /// Instant of the last scheduled presence check, advanced only by the
    /// host through `poll` or `start_health_interval`.
    last_check: Option<Instant>,
}

impl<I2C, D> Ad5272<I2C, D>
where
    I2C: I2c,
    D: DelayNs,
{
    /// Create a driver. No I2C traffic is generated until [`init`](Self::init).
    ///
    /// # Arguments
    /// * `i2c` — I2C peripheral (takes ownership for exclusive access)
    /// * `delay` — delay source for the settling waits
    /// * `config` — address and full-scale resistance
    ///
    /// # Errors
    /// Returns the [`ConfigError`] from [`Ad5272Config::validate`].
    pub fn new(i2c: I2C, delay: D, config: Ad5272Config) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            bus: Ad5272Bus::new(i2c, delay, config.address),
            config,
            current_wiper: WIPER_MIDSCALE,
            state: DeviceState::Uninitialized,
            ever_available: false,
            status: Status::Initializing,
            last_check: None,
        })
    }

    /// Give back the I2C peripheral and delay source.
    pub fn release(self) -> (I2C, D) {
        self.bus.release()
    }

    // -----------------------------------------------------------------------
    // Lifecycle
    // -----------------------------------------------------------------------

    /// Check the device is present and load the current wiper position.
    ///
    /// Always leaves the driver in [`DeviceState::Available`] or
    /// [`DeviceState::Unavailable`]. If the device answers but the wiper
    /// read fails, the cached position falls back to mid-scale instead of
    /// failing initialisation.
    pub async fn init(&mut self) -> DeviceState {
        #[cfg(feature = "defmt")]
        defmt::info!("Setting up AD5272 at {:#x}", self.bus.address());

        if !self.check_device_presence().await {
            #[cfg(feature = "defmt")]
            defmt::error!("AD5272 not found at {:#x}", self.bus.address());
            self.state = DeviceState::Unavailable;
            self.set_status(Status::DeviceNotFound);
            return self.state;
        }

        self.mark_available();
        self.set_status(Status::DeviceConnected);

        match self.bus.command_read(Command::RdacRead).await {
            Ok(position) => {
                self.current_wiper = position;
                #[cfg(feature = "defmt")]
                defmt::info!(
                    "Current wiper position: {} ({} ohm)",
                    position,
                    position_to_resistance(position, self.config.max_resistance)
                );
            }
            Err(_e) => {
                #[cfg(feature = "defmt")]
                defmt::warn!("Failed to read initial wiper position, assuming mid-scale");
                self.current_wiper = WIPER_MIDSCALE;
            }
        }

        self.set_status(Status::InitializedSuccessfully);
        self.state
    }

    /// Run the presence check if the configured interval has elapsed since
    /// the last one.
    ///
    /// `now` is supplied by the host's scheduler; the driver never reads a
    /// clock itself. Without a prior [`start_health_interval`] the first
    /// call always runs a check. Returns `true` if a check was performed.
    ///
    /// [`start_health_interval`]: Self::start_health_interval
    pub async fn poll(&mut self, now: Instant) -> bool {
        let due = match self.last_check {
            None => true,
            Some(last) => {
                now.saturating_duration_since(last) > self.config.health_check_interval
            }
        };
        if !due {
            return false;
        }

        self.last_check = Some(now);
        self.check_health().await;
        true
    }

    /// Start the health-check interval at `now` without touching the bus.
    ///
    /// Call right after [`init`](Self::init), which has just checked
    /// presence, so the next check runs one full interval later.
    pub fn start_health_interval(&mut self, now: Instant) {
        self.last_check = Some(now);
    }

    /// Run a presence check now and update availability and status.
    ///
    /// Touches nothing but the availability and status fields, so calling
    /// it repeatedly against an unchanged bus is idempotent. Returns the
    /// new availability.
    pub async fn check_health(&mut self) -> bool {
        if self.check_device_presence().await {
            if self.state != DeviceState::Available {
                #[cfg(feature = "defmt")]
                defmt::info!("AD5272 reconnected");
                self.mark_available();
                self.set_status(Status::DeviceConnected);
            }
            true
        } else {
            if self.state == DeviceState::Available {
                #[cfg(feature = "defmt")]
                defmt::warn!("AD5272 stopped responding");
            }
            self.state = DeviceState::Unavailable;
            self.set_status(Status::DeviceDisconnected);
            false
        }
    }

    // -----------------------------------------------------------------------
    // Write operations
    // -----------------------------------------------------------------------

    /// Move the wiper to the step closest to `target_ohms`.
    ///
    /// Unlocks the RDAC, writes the step, waits for it to settle and reads
    /// it back. The cached position only changes on full success.
    ///
    /// # Errors
    /// * [`Ad5272Error::DeviceUnavailable`] if the device is not available
    /// * [`Ad5272Error::OutOfRange`] if `target_ohms` is negative, above the
    ///   configured max, or NaN; no bus traffic is generated
    /// * [`Ad5272Error::UnlockFailed`], [`Ad5272Error::WriteFailed`] or
    ///   [`Ad5272Error::VerificationFailed`] for the step that failed
    pub async fn set_resistance(
        &mut self,
        target_ohms: f32,
    ) -> Result<(), Ad5272Error<I2C::Error>> {
        self.ensure_available()?;

        if !(0.0..=self.config.max_resistance).contains(&target_ohms) {
            #[cfg(feature = "defmt")]
            defmt::error!(
                "Target resistance {} ohm is out of range (0 to {} ohm)",
                target_ohms,
                self.config.max_resistance
            );
            self.set_status(Status::InvalidResistance);
            return Err(Ad5272Error::OutOfRange);
        }

        let position = resistance_to_position(target_ohms, self.config.max_resistance);

        #[cfg(feature = "defmt")]
        defmt::info!(
            "Setting resistance to {} ohm (wiper position: {}/{})",
            target_ohms,
            position,
            WIPER_MAX
        );

        self.write_verified(position).await
    }

    /// Move the wiper to a raw step (0–1023).
    ///
    /// Same sequence and errors as [`set_resistance`](Self::set_resistance),
    /// with [`Ad5272Error::OutOfRange`] for positions above 1023.
    pub async fn set_wiper_position(
        &mut self,
        position: u16,
    ) -> Result<(), Ad5272Error<I2C::Error>> {
        self.ensure_available()?;

        if position > WIPER_MAX {
            #[cfg(feature = "defmt")]
            defmt::error!("Wiper position {} is out of range (0 to {})", position, WIPER_MAX);
            self.set_status(Status::InvalidPosition);
            return Err(Ad5272Error::OutOfRange);
        }

        self.write_verified(position).await
    }

    /// Enable wiper writes in the control register and confirm the bit
    /// latched.
    ///
    /// # Errors
    /// * [`Ad5272Error::UnlockFailed`] with the bus error if either
    ///   transaction fails
    /// * [`Ad5272Error::UnlockFailed`] with `None` if the enable bit reads
    ///   back clear
    pub async fn unlock_rdac(&mut self) -> Result<(), Ad5272Error<I2C::Error>> {
        self.bus
            .command_write(Command::ControlWrite, CONTROL_RDAC_WRITE_ENABLE)
            .await
            .map_err(|e| Ad5272Error::UnlockFailed(Some(e)))?;

        let control = self
            .bus
            .command_read(Command::ControlRead)
            .await
            .map_err(|e| Ad5272Error::UnlockFailed(Some(e)))?;

        if control & CONTROL_RDAC_WRITE_ENABLE != 0 {
            Ok(())
        } else {
            Err(Ad5272Error::UnlockFailed(None))
        }
    }

    /// Read the control register and report whether wiper writes are
    /// enabled.
    pub async fn verify_rdac_unlock(&mut self) -> Result<bool, Ad5272Error<I2C::Error>> {
        let control = self.bus.command_read(Command::ControlRead).await?;
        Ok(control & CONTROL_RDAC_WRITE_ENABLE != 0)
    }

    // -----------------------------------------------------------------------
    // Read operations
    // -----------------------------------------------------------------------

    /// Resistance currently selected by the wiper.
    ///
    /// Returns `NaN` when the device is unavailable. Otherwise reads the
    /// wiper fresh; if that read fails the last cached position is used
    /// instead and no error is surfaced.
    pub async fn current_resistance(&mut self) -> f32 {
        if !self.is_available() {
            return f32::NAN;
        }

        self.refresh_wiper().await;
        position_to_resistance(self.current_wiper, self.config.max_resistance)
    }

    /// Current wiper step, with the same stale-read fallback as
    /// [`current_resistance`](Self::current_resistance).
    ///
    /// While unavailable this returns the cached step without bus traffic,
    /// or 0 if the device has never been seen.
    pub async fn current_wiper_position(&mut self) -> u16 {
        if !self.is_available() {
            return if self.ever_available { self.current_wiper } else { 0 };
        }

        self.refresh_wiper().await;
        self.current_wiper
    }

    /// Read the wiper without falling back to the cache.
    ///
    /// Updates the cache on success.
    ///
    /// # Errors
    /// * [`Ad5272Error::DeviceUnavailable`] if the device is not available
    /// * [`Ad5272Error::I2c`] on communication failure
    pub async fn read_wiper_position(&mut self) -> Result<u16, Ad5272Error<I2C::Error>> {
        if !self.is_available() {
            return Err(Ad5272Error::DeviceUnavailable);
        }

        let position = self.bus.command_read(Command::RdacRead).await?;
        self.current_wiper = position;
        Ok(position)
    }

    // -----------------------------------------------------------------------
    // Accessors (no I2C traffic)
    // -----------------------------------------------------------------------

    pub fn is_available(&self) -> bool {
        self.state == DeviceState::Available
    }

    pub fn state(&self) -> DeviceState {
        self.state
    }

    pub fn status(&self) -> Status {
        self.status
    }

    /// Text of the current [`Status`].
    pub fn status_message(&self) -> &'static str {
        self.status.as_str()
    }

    /// Last known wiper step.
    pub fn cached_wiper_position(&self) -> u16 {
        self.current_wiper
    }

    /// 7-bit I2C address the driver talks to.
    pub fn address(&self) -> u8 {
        self.bus.address()
    }

    pub fn max_resistance(&self) -> f32 {
        self.config.max_resistance
    }

    pub fn config(&self) -> &Ad5272Config {
        &self.config
    }

    /// Log the configuration and cached state.
    pub fn log_config(&self) {
        #[cfg(feature = "defmt")]
        {
            defmt::info!("AD5272 Digital Potentiometer:");
            defmt::info!("  Address: {:#x}", self.config.address);
            defmt::info!("  Max Resistance: {} ohm", self.config.max_resistance);
            defmt::info!("  Current Wiper: {}", self.current_wiper);
            defmt::info!(
                "  Current Resistance: {} ohm",
                position_to_resistance(self.current_wiper, self.config.max_resistance)
            );
            defmt::info!("  Device Available: {}", self.is_available());
        }
    }

    // ── Private helpers ──────────────────────────────────────────────

    /// Any successful control-register read counts as present; the value
    /// itself is ignored.
    async fn check_device_presence(&mut self) -> bool {
        self.bus.command_read(Command::ControlRead).await.is_ok()
    }

    fn mark_available(&mut self) {
        self.state = DeviceState::Available;
        self.ever_available = true;
    }

    fn ensure_available(&mut self) -> Result<(), Ad5272Error<I2C::Error>> {
        if self.is_available() {
            return Ok(());
        }
        #[cfg(feature = "defmt")]
        defmt::error!("Device not available for resistance setting");
        self.set_status(Status::DeviceNotAvailable);
        Err(Ad5272Error::DeviceUnavailable)
    }

    async fn refresh_wiper(&mut self) {
        if let Ok(position) = self.bus.command_read(Command::RdacRead).await {
            self.current_wiper = position;
        }
    }

    /// Unlock, write and read back `position`. `position` is already
    /// validated.
    async fn write_verified(&mut self, position: u16) -> Result<(), Ad5272Error<I2C::Error>> {
        if let Err(e) = self.unlock_rdac().await {
            #[cfg(feature = "defmt")]
            defmt::error!("Failed to unlock RDAC");
            self.set_status(Status::UnlockFailed);
            return Err(e);
        }

        if let Err(e) = self.bus.command_write(Command::RdacWrite, position).await {
            #[cfg(feature = "defmt")]
            defmt::error!("Failed to write wiper position");
            self.set_status(Status::WriteFailed);
            return Err(Ad5272Error::WriteFailed(e));
        }

        self.bus.delay_ms(VERIFY_DELAY_MS).await;

        let read = self.bus.command_read(Command::RdacRead).await.ok();
        if read != Some(position) {
            #[cfg(feature = "defmt")]
            defmt::error!(
                "Write verification failed. Expected: {}, Got: {}",
                position,
                read
            );
            self.set_status(Status::VerificationFailed);
            return Err(Ad5272Error::VerificationFailed {
                expected: position,
                read,
            });
        }

        self.current_wiper = position;

        #[cfg(feature = "defmt")]
        defmt::info!(
            "Successfully set resistance to {} ohm",
            position_to_resistance(position, self.config.max_resistance)
        );
        self.set_status(Status::ResistanceSet);
        Ok(())
    }

    fn set_status(&mut self, status: Status) {
        self.status = status;
        #[cfg(feature = "defmt")]
        defmt::debug!("Status: {}", status.as_str());
    }
}
