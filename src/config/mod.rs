//! 설정 모듈: 상수와 TOML 설정 파일

pub mod constants;
pub mod settings;

pub use constants::Constants;
pub use settings::{GeodesicConfig, ReportConfig, Settings};
