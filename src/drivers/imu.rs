use defmt::*;
use embassy_stm32::i2c;
use embassy_stm32::mode::Async;
use embassy_time::{Duration, Timer};
use glove_core::imu::{MotionSensor, Vector3};

// LSM9DS1 accelerometer/gyroscope I2C addresses (SDO_AG high / low)
pub const LSM9DS1_ADDRESS_AG: u8 = 0x6B;
pub const LSM9DS1_ADDRESS_AG_ALT: u8 = 0x6A;

// Register addresses
const LSM9DS1_WHO_AM_I: u8 = 0x0F;
const LSM9DS1_CTRL_REG1_G: u8 = 0x10;
const LSM9DS1_STATUS_REG: u8 = 0x17;
const LSM9DS1_OUT_X_L_G: u8 = 0x18;
const LSM9DS1_CTRL_REG6_XL: u8 = 0x20;
const LSM9DS1_CTRL_REG8: u8 = 0x22;
const LSM9DS1_OUT_X_L_XL: u8 = 0x28;

const LSM9DS1_ID: u8 = 0x68;

// CTRL_REG8: register auto-increment + software reset
const CTRL_REG8_SW_RESET: u8 = 0x05;
// 119 Hz, 2000 dps
const CTRL_REG1_G_119HZ_2000DPS: u8 = 0x78;
// 119 Hz, ±4 g
const CTRL_REG6_XL_119HZ_4G: u8 = 0x70;

// STATUS_REG data-ready bits
const STATUS_XLDA: u8 = 0x01;
const STATUS_GDA: u8 = 0x02;

const ACCEL_G_PER_LSB: f32 = 4.0 / 32768.0;
const GYRO_DPS_PER_LSB: f32 = 2000.0 / 32768.0;

#[derive(Debug, Format, Clone, Copy, PartialEq, Eq)]
pub enum ImuError {
    Bus(i2c::Error),
    WrongId(u8),
    ConfigRejected { reg: u8, expected: u8, got: u8 },
    Timeout,
}

impl From<i2c::Error> for ImuError {
    fn from(e: i2c::Error) -> Self {
        ImuError::Bus(e)
    }
}

pub struct Lsm9ds1 {
    i2c: i2c::I2c<'static, Async>,
    addr: u8,
}

impl Lsm9ds1 {
    pub async fn new(i2c: i2c::I2c<'static, Async>, addr: u8) -> Result<Self, ImuError> {
        let mut imu = Self { i2c, addr };

        info!("Starting LSM9DS1 initialization sequence...");

        // Boot time after power-up is ~10ms
        Timer::after(Duration::from_millis(20)).await;

        let mut last_error = ImuError::Timeout;
        for attempt in 1..=3 {
            match imu.try_init().await {
                Ok(()) => {
                    info!("LSM9DS1 initialized on attempt {}", attempt);
                    return Ok(imu);
                }
                Err(e) => {
                    warn!("LSM9DS1 init attempt {} failed: {:?}", attempt, e);
                    last_error = e;

                    // 50ms, 100ms, 200ms
                    let delay_ms = 50u64 << (attempt - 1);
                    Timer::after(Duration::from_millis(delay_ms)).await;
                }
            }
        }

        error!("LSM9DS1 initialization failed after 3 attempts");
        Err(last_error)
    }

    async fn try_init(&mut self) -> Result<(), ImuError> {
        let id = self.read_byte_with_retries(LSM9DS1_WHO_AM_I, 5).await?;
        if id != LSM9DS1_ID {
            error!(
                "Invalid LSM9DS1 ID: 0x{:02X}, expected 0x{:02X}",
                id, LSM9DS1_ID
            );
            return Err(ImuError::WrongId(id));
        }
        info!("LSM9DS1 chip ID verified: 0x{:02X}", id);

        self.write_byte_with_retries(LSM9DS1_CTRL_REG8, CTRL_REG8_SW_RESET, 3)
            .await?;
        Timer::after(Duration::from_millis(10)).await;
        self.wait_for_chip_ready().await?;

        self.configure(LSM9DS1_CTRL_REG1_G, CTRL_REG1_G_119HZ_2000DPS)
            .await?;
        self.configure(LSM9DS1_CTRL_REG6_XL, CTRL_REG6_XL_119HZ_4G)
            .await?;

        info!("LSM9DS1 running: accel 119Hz ±4g, gyro 119Hz 2000dps");
        Ok(())
    }

    async fn wait_for_chip_ready(&mut self) -> Result<(), ImuError> {
        for _ in 0..20 {
            if let Ok(LSM9DS1_ID) = self.read_byte(LSM9DS1_WHO_AM_I).await {
                return Ok(());
            }
            Timer::after(Duration::from_millis(10)).await;
        }
        error!("Timeout waiting for LSM9DS1 after reset");
        Err(ImuError::Timeout)
    }

    // Write then read back
    async fn configure(&mut self, reg: u8, value: u8) -> Result<(), ImuError> {
        self.write_byte_with_retries(reg, value, 3).await?;
        let got = self.read_byte_with_retries(reg, 3).await?;
        if got != value {
            error!(
                "LSM9DS1 reg 0x{:02X}: wrote 0x{:02X}, read 0x{:02X}",
                reg, value, got
            );
            return Err(ImuError::ConfigRejected {
                reg,
                expected: value,
                got,
            });
        }
        Ok(())
    }

    async fn read_byte_with_retries(&mut self, reg: u8, retries: u8) -> Result<u8, i2c::Error> {
        let mut last_error = i2c::Error::Timeout;

        for attempt in 1..=retries {
            match self.read_byte(reg).await {
                Ok(value) => return Ok(value),
                Err(e) => {
                    last_error = e;
                    if attempt < retries {
                        Timer::after(Duration::from_millis(10)).await;
                    }
                }
            }
        }

        Err(last_error)
    }

    async fn write_byte_with_retries(
        &mut self,
        reg: u8,
        value: u8,
        retries: u8,
    ) -> Result<(), i2c::Error> {
        let mut last_error = i2c::Error::Timeout;

        for attempt in 1..=retries {
            match self.write_byte(reg, value).await {
                Ok(()) => return Ok(()),
                Err(e) => {
                    last_error = e;
                    if attempt < retries {
                        Timer::after(Duration::from_millis(10)).await;
                    }
                }
            }
        }

        Err(last_error)
    }

    async fn status(&mut self) -> Result<u8, i2c::Error> {
        self.read_byte(LSM9DS1_STATUS_REG).await
    }

    async fn read_axes(&mut self, reg: u8, scale: f32) -> Result<Vector3, i2c::Error> {
        let raw = self.read_bytes::<6>(reg).await?;
        Ok(Vector3 {
            x: i16::from_le_bytes([raw[0], raw[1]]) as f32 * scale,
            y: i16::from_le_bytes([raw[2], raw[3]]) as f32 * scale,
            z: i16::from_le_bytes([raw[4], raw[5]]) as f32 * scale,
        })
    }

    async fn write_byte(&mut self, reg: u8, value: u8) -> Result<(), i2c::Error> {
        self.i2c.write(self.addr, &[reg, value]).await
    }

    async fn read_byte(&mut self, reg: u8) -> Result<u8, i2c::Error> {
        let mut buf = [0u8; 1];
        self.i2c.write_read(self.addr, &[reg], &mut buf).await?;
        Ok(buf[0])
    }

    async fn read_bytes<const N: usize>(&mut self, reg: u8) -> Result<[u8; N], i2c::Error> {
        let mut buf = [0u8; N];
        self.i2c.write_read(self.addr, &[reg], &mut buf).await?;
        Ok(buf)
    }
}

impl MotionSensor for Lsm9ds1 {
    type Error = i2c::Error;

    async fn acceleration_available(&mut self) -> Result<bool, i2c::Error> {
        Ok(self.status().await? & STATUS_XLDA != 0)
    }

    async fn read_acceleration(&mut self) -> Result<Vector3, i2c::Error> {
        self.read_axes(LSM9DS1_OUT_X_L_XL, ACCEL_G_PER_LSB).await
    }

    async fn gyroscope_available(&mut self) -> Result<bool, i2c::Error> {
        Ok(self.status().await? & STATUS_GDA != 0)
    }

    async fn read_gyroscope(&mut self) -> Result<Vector3, i2c::Error> {
        self.read_axes(LSM9DS1_OUT_X_L_G, GYRO_DPS_PER_LSB).await
    }
}

// Factory function to create the default IMU (LSM9DS1, SDO_AG high)
pub async fn create_default_imu(i2c: i2c::I2c<'static, Async>) -> Result<Lsm9ds1, ImuError> {
    Lsm9ds1::new(i2c, LSM9DS1_ADDRESS_AG).await
}
