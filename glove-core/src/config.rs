// Centralize all sampling and formatting constants
pub const ADC_RESOLUTION_BITS: u8 = 10;
pub const ADC_MAX_RAW: u16 = (1 << ADC_RESOLUTION_BITS) - 1;
pub const ADC_VREF: f32 = 3.3;

pub const GLOVE_SAMPLE_INTERVAL_MS: u32 = 10;
pub const VOLTAGE_PACING_MS: u64 = 20;
pub const SERIAL_BAUDRATE: u32 = 115_200;

// Fixed decimal precision of the float fields
pub const VOLTAGE_DECIMALS: usize = 3;
pub const IMU_DECIMALS: usize = 6;

// Longest glove line is ~110 bytes (u32 stamp, four counts, six ±2000.000000 floats)
pub const LINE_CAPACITY: usize = 160;
pub const LINE_TERMINATOR: &[u8] = b"\r\n";

pub const CSV_FIELD_COUNT: usize = 11;
pub const CSV_HEADER: &str =
    "t_ms,flex_thumb,flex_index,fsr_thumb,fsr_index,ax_g,ay_g,az_g,gx_dps,gy_dps,gz_dps";

pub const VOLTAGE_BANNER: [&str; 2] = [
    "Demarrage mesure : Velostat (A0) + FSR (A1)",
    "Colonnes : brut_velostat, V_velostat, brut_FSR, V_FSR",
];

pub const LOG_FILE_NAME: &str = "log.csv";

// Rate limit for IMU bus error warnings
pub const IMU_ERROR_LOG_EVERY: u32 = 100;

// One-line diagnostics printed on the serial link
pub const IMU_INIT_FAILED_LINE: &str = "ERROR: IMU init failed, halting";
pub const LOG_OPEN_FAILED_LINE: &str = "ERROR: cannot open log.csv, serial only";
pub const LOG_WRITE_FAILED_LINE: &str = "ERROR: log.csv write failed, serial only";
