//! TOML 설정 파일
//!
//! 모든 필드에 기본값이 있으므로 빈 파일도 유효하다.
//!
//! ```toml
//! [report]
//! output = "kerr.tex"
//! index_labels = "coordinate"
//!
//! [report.metric]
//! family = "kerr"
//!
//! [geodesic]
//! metric = "schwarzschild"
//! metric_params = []
//! position = [40.0, 1.5707963267948966, 0.0]
//! momentum = [0.0, 0.0, 3.83405]
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::constants::Constants;
use crate::error::{Error, Result};
use crate::report::IndexLabels;
use crate::spacetimes::{MetricDefinition, MetricFamily};
use crate::tensors::VelocityConvention;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub report: ReportConfig,
    pub geodesic: GeodesicConfig,
}

impl Settings {
    pub fn from_toml_str(src: &str) -> Result<Self> {
        toml::from_str(src).map_err(|e| Error::Config(e.to_string()))
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let src = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("{}: {e}", path.display())))?;
        let settings = Self::from_toml_str(&src)?;
        log::debug!("loaded settings from {}", path.display());
        Ok(settings)
    }
}

/// 곡률 리포트 설정
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// 출력 `.tex` 경로 (매 실행마다 덮어쓴다)
    pub output: PathBuf,
    pub metric: MetricDefinition,
    pub index_labels: IndexLabels,
    pub velocity: VelocityConvention,
}

impl Default for ReportConfig {
    fn default() -> Self {
        ReportConfig {
            output: PathBuf::from(Constants::DEFAULT_REPORT_FILE),
            metric: MetricDefinition::default(),
            index_labels: IndexLabels::default(),
            velocity: VelocityConvention::default(),
        }
    }
}

/// 시간꼴 측지선 적분 설정 (단위계 G = c = M = 1)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeodesicConfig {
    pub metric: MetricFamily,
    /// Kerr: `[a]`, Kerr-Newman: `[a, Q]`, 그 외: `[]`
    pub metric_params: Vec<f64>,
    /// 초기 위치 (r, θ, φ)
    pub position: [f64; 3],
    /// 초기 공변 운동량 (p_r, p_θ, p_φ)
    pub momentum: [f64; 3],
    pub steps: usize,
    /// 아핀 파라미터 간격
    pub delta: f64,
    /// `false`이면 질량껍질 조건을 0으로 둔다 (널 측지선)
    pub timelike: bool,
    pub return_cartesian: bool,
}

impl Default for GeodesicConfig {
    fn default() -> Self {
        GeodesicConfig {
            metric: MetricFamily::Kerr,
            metric_params: vec![Constants::DEFAULT_SPIN],
            position: Constants::DEFAULT_POSITION,
            momentum: Constants::DEFAULT_MOMENTUM,
            steps: Constants::DEFAULT_STEPS,
            delta: Constants::DEFAULT_DELTA,
            timelike: true,
            return_cartesian: true,
        }
    }
}

impl GeodesicConfig {
    /// 적분 전에 잡을 수 있는 입력 오류 검사
    pub fn validate(&self) -> Result<()> {
        if self.metric == MetricFamily::StaticSpherical {
            return Err(Error::InvalidParameters(
                "static-spherical has undefined metric functions and cannot be integrated"
                    .to_string(),
            ));
        }
        self.metric.numeric_parameters(&self.metric_params)?;
        if self.steps == 0 {
            return Err(Error::Config("steps must be positive".to_string()));
        }
        if !(self.delta.is_finite() && self.delta > 0.0) {
            return Err(Error::Config(format!(
                "delta must be a positive number, got {}",
                self.delta
            )));
        }
        if self
            .position
            .iter()
            .chain(&self.momentum)
            .any(|v| !v.is_finite())
        {
            return Err(Error::InvalidInitialData(
                "position and momentum must be finite".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_uses_defaults() {
        let settings = Settings::from_toml_str("").unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.geodesic.metric, MetricFamily::Kerr);
        assert_eq!(settings.geodesic.metric_params, vec![0.9]);
        assert_eq!(settings.geodesic.steps, 5500);
        assert_eq!(settings.report.output, PathBuf::from("tensor_output.tex"));
    }

    #[test]
    fn parses_preset_and_component_metrics() {
        let settings = Settings::from_toml_str(
            r#"
            [report]
            output = "out.tex"
            index_labels = "coordinate"
            velocity = "proper-time"

            [report.metric]
            family = "kerr-newman"

            [geodesic]
            metric = "schwarzschild"
            metric_params = []
            steps = 10
            "#,
        )
        .unwrap();
        assert_eq!(
            settings.report.metric,
            MetricDefinition::Preset {
                family: MetricFamily::KerrNewman
            }
        );
        assert_eq!(settings.report.index_labels, IndexLabels::Coordinate);
        assert_eq!(settings.report.velocity, VelocityConvention::ProperTime);
        assert_eq!(settings.geodesic.steps, 10);
        assert!(settings.geodesic.timelike);
        settings.geodesic.validate().unwrap();

        let custom = Settings::from_toml_str(
            r#"
            [report.metric]
            coordinates = ["t", "x"]
            components = [["-1", "0"], ["0", "1"]]
            "#,
        )
        .unwrap();
        assert_eq!(custom.report.metric.assemble().unwrap().dims(), 2);
    }

    #[test]
    fn malformed_toml_is_a_config_error() {
        assert!(matches!(
            Settings::from_toml_str("[geodesic]\nsteps = \"many\""),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn validation_rejects_bad_input() {
        let mut config = GeodesicConfig {
            metric_params: vec![],
            ..GeodesicConfig::default()
        };
        assert!(matches!(config.validate(), Err(Error::InvalidParameters(_))));

        config.metric_params = vec![0.9];
        config.delta = 0.0;
        assert!(matches!(config.validate(), Err(Error::Config(_))));

        config.delta = 1.0;
        config.position[0] = f64::NAN;
        assert!(matches!(config.validate(), Err(Error::InvalidInitialData(_))));
    }
}
