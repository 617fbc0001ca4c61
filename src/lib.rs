//! spacetime_curvature: 시공간 계량의 곡률 텐서 유도와 측지선 시뮬레이션
//!
//! 기호 계량으로부터 크리스토펠 기호, 리만/리치 텐서, 리치 스칼라,
//! 측지선 방정식을 정확한 유리함수 연산으로 유도하고 0이 아닌 성분을
//! LaTeX 문서로 내보낸다. 커 계열 시공간에서의 시간꼴 측지선 적분과
//! SVG 플롯도 제공한다.

pub mod config;
pub mod error;
pub mod geodesic;
pub mod report;
pub mod spacetimes;
pub mod symbolic;
pub mod tensors;
pub mod utils;

#[cfg(feature = "python")]
pub mod python;

pub use error::{Error, Result};
pub use geodesic::{plot_trajectory, Timelike, Trajectory};
pub use report::{generate_report, CurvatureReport, IndexLabels};
pub use spacetimes::{Metric, MetricBuilder, MetricDefinition, MetricFamily};
pub use symbolic::{parse, symbols, Expr, Symbol};
pub use tensors::{CurvatureEngine, LeviCivita, VelocityConvention};

/// 자주 사용되는 핵심 기능들을 쉽게 가져올 수 있는 prelude 모듈
pub mod prelude {
    pub use crate::config::{GeodesicConfig, ReportConfig, Settings};
    pub use crate::{
        generate_report, parse, plot_trajectory, symbols, CurvatureEngine, CurvatureReport, Error,
        Expr, IndexLabels, LeviCivita, Metric, MetricBuilder, MetricDefinition, MetricFamily,
        Result, Symbol, Timelike, Trajectory, VelocityConvention,
    };
}
