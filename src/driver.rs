//! Low-level AD5272 transport.
//!
//! Sends 16-bit command frames and reads back 16-bit responses, honouring
//! the settling time the part needs between a command and the read that
//! follows it.
//!
//! This module is crate-private — consumers interact with [`Ad5272`]
//! in `ad5272.rs` instead.
//!
//! [`Ad5272`]: crate::Ad5272

use embedded_hal_async::delay::DelayNs;
use embedded_hal_async::i2c::I2c;

use crate::protocol::{decode, encode, Command};
use crate::registers::READ_DELAY_MS;

/// Low-level AD5272 bus driver.
///
/// Owns the I2C peripheral and a delay source for exclusive access.
pub(crate) struct Ad5272Bus<I2C, D> {
    i2c: I2C,
    delay: D,
    address: u8,
}

impl<I2C, D> Ad5272Bus<I2C, D>
where
    I2C: I2c,
    D: DelayNs,
{
    pub fn new(i2c: I2C, delay: D, address: u8) -> Self {
        Self { i2c, delay, address }
    }

    pub fn address(&self) -> u8 {
        self.address
    }

    /// Give back the peripheral and delay source.
    pub fn release(self) -> (I2C, D) {
        (self.i2c, self.delay)
    }

    /// Block the sequence for `ms` milliseconds.
    pub async fn delay_ms(&mut self, ms: u32) {
        self.delay.delay_ms(ms).await;
    }

    // -----------------------------------------------------------------------
    // Core protocol primitives
    // -----------------------------------------------------------------------

    /// Send one command frame. `data` is masked to 10 bits.
    pub async fn command_write(
        &mut self,
        command: Command,
        data: u16,
    ) -> Result<(), I2C::Error> {
        let frame = encode(command, data);
        if let Err(e) = self.i2c.write(self.address, &frame).await {
            #[cfg(feature = "defmt")]
            defmt::error!("I2C write failed ({}): {}", command, defmt::Debug2Format(&e));
            return Err(e);
        }
        Ok(())
    }

    /// Send a read command, wait for the part to latch the response, then
    /// read and decode it.
    ///
    /// Uses separate `write()` and `read()` transactions rather than
    /// `write_read()`; the repeated start leaves no room for the settling
    /// delay.
    pub async fn command_read(
        &mut self,
        command: Command,
    ) -> Result<u16, I2C::Error> {
        self.command_write(command, 0x00).await?;

        self.delay.delay_ms(READ_DELAY_MS).await;

        let mut buf = [0u8; 2];
        if let Err(e) = self.i2c.read(self.address, &mut buf).await {
            #[cfg(feature = "defmt")]
            defmt::error!("I2C read failed ({}): {}", command, defmt::Debug2Format(&e));
            return Err(e);
        }

        Ok(decode(buf))
    }
}
