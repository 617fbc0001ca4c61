//! 설정 파일에서 읽는 계량 정의
//!
//! ```toml
//! [report.metric]
//! family = "schwarzschild"
//! ```
//!
//! 또는 좌표와 모든 성분을 문자열로 직접 지정한다.
//!
//! ```toml
//! [report.metric]
//! coordinates = ["t", "r", "theta", "phi"]
//! components = [
//!     ["A(r)", "0", "0", "0"],
//!     ["0", "-B(r)", "0", "0"],
//!     ["0", "0", "-r^2", "0"],
//!     ["0", "0", "0", "-r^2*sin(theta)^2"],
//! ]
//! ```

use serde::{Deserialize, Serialize};

use super::metric::{Metric, MetricBuilder};
use super::presets::MetricFamily;
use crate::error::{Error, Result};
use crate::symbolic::{parse, Symbol};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetricDefinition {
    Preset {
        family: MetricFamily,
    },
    Components {
        coordinates: Vec<String>,
        components: Vec<Vec<String>>,
    },
}

impl Default for MetricDefinition {
    fn default() -> Self {
        MetricDefinition::Preset {
            family: MetricFamily::Schwarzschild,
        }
    }
}

impl MetricDefinition {
    /// 계량 조립. 성분 문자열이 하나라도 빠지면 `Error::IncompleteMetric`.
    pub fn assemble(&self) -> Result<Metric> {
        match self {
            MetricDefinition::Preset { family } => family.metric(),
            MetricDefinition::Components {
                coordinates,
                components,
            } => {
                let coords: Vec<Symbol> = coordinates.iter().map(|c| Symbol::new(c)).collect();
                let n = coords.len();
                if components.len() > n || components.iter().any(|row| row.len() > n) {
                    return Err(Error::Shape(format!(
                        "metric components exceed {n}x{n} for {n} coordinates"
                    )));
                }
                let mut builder = MetricBuilder::new(coords);
                for (i, row) in components.iter().enumerate() {
                    for (j, src) in row.iter().enumerate() {
                        let value = parse(src).map_err(|e| {
                            Error::Config(format!("metric component ({i}, {j}) `{src}`: {e}"))
                        })?;
                        builder = builder.entry(i, j, value)?;
                    }
                }
                builder.build()
            }
        }
    }

    pub fn label(&self) -> String {
        match self {
            MetricDefinition::Preset { family } => family.to_string(),
            MetricDefinition::Components { .. } => "custom".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows(src: &[&[&str]]) -> Vec<Vec<String>> {
        src.iter()
            .map(|row| row.iter().map(|s| s.to_string()).collect())
            .collect()
    }

    #[test]
    fn component_strings_assemble() {
        let def = MetricDefinition::Components {
            coordinates: vec!["t".into(), "x".into()],
            components: rows(&[&["-1", "0"], &["0", "1"]]),
        };
        let g = def.assemble().unwrap();
        assert_eq!(g.dims(), 2);
        assert!(g.is_diagonal());
    }

    #[test]
    fn short_row_is_incomplete() {
        let def = MetricDefinition::Components {
            coordinates: vec!["t".into(), "x".into()],
            components: rows(&[&["-1", "0"], &["0"]]),
        };
        assert!(matches!(
            def.assemble(),
            Err(Error::IncompleteMetric { row: 1, col: 1 })
        ));
    }

    #[test]
    fn bad_component_is_a_config_error() {
        let def = MetricDefinition::Components {
            coordinates: vec!["t".into()],
            components: rows(&[&["-(1"]]),
        };
        assert!(matches!(def.assemble(), Err(Error::Config(_))));
    }
}
