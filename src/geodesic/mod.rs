//! 커 시공간 등에서의 시간꼴 측지선 수치 시뮬레이션
//!
//! 계량 성분과 편미분은 기호적으로 한 번 유도한 뒤 컴파일하고,
//! 적분 중에는 수치 평가만 한다.

pub mod integrator;
pub mod metric;
pub mod plot;

pub use integrator::{Timelike, Trajectory};
pub use metric::NumericMetric;
pub use plot::plot_trajectory;

use crate::config::GeodesicConfig;
use crate::error::Result;

/// 설정대로 적분하고 궤적을 돌려준다
pub fn simulate(config: GeodesicConfig) -> Result<Trajectory> {
    Timelike::new(config)?.integrate()
}
