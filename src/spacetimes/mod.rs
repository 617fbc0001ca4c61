//! 시공간 계량 정의 모듈

pub mod definition;
pub mod metric;
pub mod presets;

pub use definition::MetricDefinition;
pub use metric::{Metric, MetricBuilder};
pub use presets::MetricFamily;
