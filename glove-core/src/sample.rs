//! Per-tick sample records and their text renderings.

use core::fmt::Write;
use core::str::FromStr;

use heapless::String;

use crate::adc::{clamp_raw, raw_to_voltage};
use crate::config::{ADC_MAX_RAW, CSV_FIELD_COUNT, IMU_DECIMALS, LINE_CAPACITY, VOLTAGE_DECIMALS};
use crate::imu::Vector3;

/// One rendered output line, without terminator.
pub type Line = String<LINE_CAPACITY>;

/// The rendered record did not fit into [`Line`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LineOverflow;

impl From<core::fmt::Error> for LineOverflow {
    fn from(_: core::fmt::Error) -> Self {
        LineOverflow
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct VoltageSample {
    pub raw_velostat: u16,
    pub voltage_velostat: f32,
    pub raw_fsr: u16,
    pub voltage_fsr: f32,
}

impl VoltageSample {
    pub fn from_raw(raw_velostat: u16, raw_fsr: u16) -> Self {
        let raw_velostat = clamp_raw(raw_velostat);
        let raw_fsr = clamp_raw(raw_fsr);
        Self {
            raw_velostat,
            voltage_velostat: raw_to_voltage(raw_velostat),
            raw_fsr,
            voltage_fsr: raw_to_voltage(raw_fsr),
        }
    }

    /// Human readable line for bench debugging.
    pub fn to_line(&self) -> Result<Line, LineOverflow> {
        let mut line = Line::new();
        write!(
            line,
            "Velostat -> brut: {}  |  V: {:.prec$} V   ||   FSR -> brut: {}  |  V: {:.prec$} V",
            self.raw_velostat,
            self.voltage_velostat,
            self.raw_fsr,
            self.voltage_fsr,
            prec = VOLTAGE_DECIMALS,
        )?;
        Ok(line)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct GloveSample {
    pub timestamp_ms: u32,
    pub flex_thumb: u16,
    pub flex_index: u16,
    pub fsr_thumb: u16,
    pub fsr_index: u16,
    pub accel: Vector3,
    pub gyro: Vector3,
}

impl GloveSample {
    /// CSV data line matching [`crate::config::CSV_HEADER`].
    pub fn to_csv_line(&self) -> Result<Line, LineOverflow> {
        let mut line = Line::new();
        write!(
            line,
            "{},{},{},{},{}",
            self.timestamp_ms, self.flex_thumb, self.flex_index, self.fsr_thumb, self.fsr_index
        )?;
        for v in [
            self.accel.x,
            self.accel.y,
            self.accel.z,
            self.gyro.x,
            self.gyro.y,
            self.gyro.z,
        ] {
            write!(line, ",{:.prec$}", v, prec = IMU_DECIMALS)?;
        }
        Ok(line)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CsvError {
    Empty,
    Header,
    FieldCount(usize),
    BadTimestamp,
    BadCount(usize),
    CountOutOfRange(usize),
    BadFloat(usize),
}

impl FromStr for GloveSample {
    type Err = CsvError;

    /// Parses one data line as printed on the serial link.
    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        if line.is_empty() {
            return Err(CsvError::Empty);
        }
        if line.starts_with("t_ms") {
            return Err(CsvError::Header);
        }

        let mut fields: heapless::Vec<&str, CSV_FIELD_COUNT> = heapless::Vec::new();
        let mut count = 0;
        for field in line.split(',') {
            count += 1;
            // extra fields are only counted for the error
            let _ = fields.push(field.trim());
        }
        if count != CSV_FIELD_COUNT {
            return Err(CsvError::FieldCount(count));
        }

        let timestamp_ms = fields[0].parse().map_err(|_| CsvError::BadTimestamp)?;
        let count_at = |i: usize| -> Result<u16, CsvError> {
            let raw: u16 = fields[i].parse().map_err(|_| CsvError::BadCount(i))?;
            if raw > ADC_MAX_RAW {
                return Err(CsvError::CountOutOfRange(i));
            }
            Ok(raw)
        };
        let float_at = |i: usize| -> Result<f32, CsvError> {
            fields[i].parse().map_err(|_| CsvError::BadFloat(i))
        };

        Ok(Self {
            timestamp_ms,
            flex_thumb: count_at(1)?,
            flex_index: count_at(2)?,
            fsr_thumb: count_at(3)?,
            fsr_index: count_at(4)?,
            accel: Vector3::new(float_at(5)?, float_at(6)?, float_at(7)?),
            gyro: Vector3::new(float_at(8)?, float_at(9)?, float_at(10)?),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CSV_HEADER;

    fn glove() -> GloveSample {
        GloveSample {
            timestamp_ms: 1011,
            flex_thumb: 512,
            flex_index: 0,
            fsr_thumb: 1023,
            fsr_index: 77,
            accel: Vector3::new(0.01, -0.5, 0.98),
            gyro: Vector3::new(-1999.5, 0.0, 12.25),
        }
    }

    #[test]
    fn velostat_midscale_prints_three_decimals() {
        let sample = VoltageSample::from_raw(512, 0);
        let line = sample.to_line().unwrap();
        assert_eq!(
            line.as_str(),
            "Velostat -> brut: 512  |  V: 1.652 V   ||   FSR -> brut: 0  |  V: 0.000 V"
        );
    }

    #[test]
    fn voltage_extremes() {
        let sample = VoltageSample::from_raw(0, 1023);
        assert_eq!(sample.voltage_velostat, 0.0);
        let line = sample.to_line().unwrap();
        assert!(line.contains("brut: 0  |  V: 0.000 V"));
        assert!(line.ends_with("FSR -> brut: 1023  |  V: 3.300 V"));
    }

    #[test]
    fn glove_line_layout() {
        let line = glove().to_csv_line().unwrap();
        assert_eq!(
            line.as_str(),
            "1011,512,0,1023,77,0.010000,-0.500000,0.980000,-1999.500000,0.000000,12.250000"
        );
    }

    #[test]
    fn glove_fields_have_declared_types_and_precision() {
        let line = glove().to_csv_line().unwrap();
        let fields: Vec<&str> = line.split(',').collect();
        assert_eq!(fields.len(), CSV_FIELD_COUNT);
        assert_eq!(CSV_HEADER.split(',').count(), CSV_FIELD_COUNT);

        for int_field in &fields[..5] {
            assert!(!int_field.contains('.'), "{int_field}");
            assert!(int_field.parse::<u32>().is_ok(), "{int_field}");
        }
        for float_field in &fields[5..] {
            let (_, decimals) = float_field.split_once('.').expect("float has a point");
            assert_eq!(decimals.len(), IMU_DECIMALS, "{float_field}");
            assert!(float_field.parse::<f32>().is_ok(), "{float_field}");
        }
    }

    #[test]
    fn widest_line_fits() {
        let sample = GloveSample {
            timestamp_ms: u32::MAX,
            flex_thumb: 1023,
            flex_index: 1023,
            fsr_thumb: 1023,
            fsr_index: 1023,
            accel: Vector3::new(-16.0, -16.0, -16.0),
            gyro: Vector3::new(-2000.0, -2000.0, -2000.0),
        };
        assert!(sample.to_csv_line().is_ok());
    }

    #[test]
    fn parses_emitted_line() {
        let line = glove().to_csv_line().unwrap();
        let parsed: GloveSample = line.parse().unwrap();
        assert_eq!(parsed.timestamp_ms, 1011);
        assert_eq!(parsed.fsr_thumb, 1023);
        assert!((parsed.accel.z - 0.98).abs() < 1e-6);
        assert!((parsed.gyro.x + 1999.5).abs() < 1e-3);
    }

    #[test]
    fn rejects_non_data_lines() {
        assert_eq!("".parse::<GloveSample>(), Err(CsvError::Empty));
        assert_eq!(CSV_HEADER.parse::<GloveSample>(), Err(CsvError::Header));
        assert_eq!("1,2,3".parse::<GloveSample>(), Err(CsvError::FieldCount(3)));
        assert_eq!(
            "1,2,3,4,5,6,7,8,9,10,11,12".parse::<GloveSample>(),
            Err(CsvError::FieldCount(12))
        );
        assert_eq!(
            "x,1,2,3,4,0.0,0.0,0.0,0.0,0.0,0.0".parse::<GloveSample>(),
            Err(CsvError::BadTimestamp)
        );
        assert_eq!(
            "5,1,2.5,3,4,0.0,0.0,0.0,0.0,0.0,0.0".parse::<GloveSample>(),
            Err(CsvError::BadCount(2))
        );
        assert_eq!(
            "5,1,2,3,4096,0.0,0.0,0.0,0.0,0.0,0.0".parse::<GloveSample>(),
            Err(CsvError::CountOutOfRange(4))
        );
        assert_eq!(
            "5,1,2,3,4,0.0,nope,0.0,0.0,0.0,0.0".parse::<GloveSample>(),
            Err(CsvError::BadFloat(6))
        );
    }

    #[test]
    fn tolerates_line_terminator() {
        let parsed: GloveSample = "7,1,2,3,4,0.000000,0.000000,1.000000,0.000000,0.000000,0.000000\r\n"
            .parse()
            .unwrap();
        assert_eq!(parsed.timestamp_ms, 7);
        assert_eq!(parsed.accel.z, 1.0);
    }
}
