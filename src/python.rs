//! 파이썬 바인딩 (`python` 기능)

use numpy::{IntoPyArray, PyArray2};
use pyo3::exceptions::{PyIOError, PyValueError};
use pyo3::prelude::*;

use crate::config::{GeodesicConfig, ReportConfig};
use crate::error::Error;
use crate::report::IndexLabels;
use crate::spacetimes::{MetricDefinition, MetricFamily};
use crate::tensors::VelocityConvention;

impl From<Error> for PyErr {
    fn from(err: Error) -> PyErr {
        match err {
            Error::Io(e) => PyIOError::new_err(e.to_string()),
            other => PyValueError::new_err(other.to_string()),
        }
    }
}

/// 프리셋 계량의 곡률 리포트를 `output`에 쓰고 LaTeX 문자열을 돌려준다
#[pyfunction]
#[pyo3(signature = (
    metric = "schwarzschild",
    output = None,
    coordinate_labels = false,
    proper_time = false,
))]
fn curvature_report(
    metric: &str,
    output: Option<String>,
    coordinate_labels: bool,
    proper_time: bool,
) -> PyResult<String> {
    let family: MetricFamily = metric.parse()?;
    let mut config = ReportConfig {
        metric: MetricDefinition::Preset { family },
        ..ReportConfig::default()
    };
    if let Some(path) = output {
        config.output = path.into();
    }
    if coordinate_labels {
        config.index_labels = IndexLabels::Coordinate;
    }
    if proper_time {
        config.velocity = VelocityConvention::ProperTime;
    }
    Ok(crate::report::run(&config)?.render())
}

/// 측지선을 적분해 `(n, 8)` 또는 데카르트 `(n, 4)` 배열을 돌려준다 (지평선에서 멈추면 n < steps)
#[pyfunction]
#[pyo3(signature = (
    metric = "kerr",
    metric_params = vec![0.9],
    position = [40.0, std::f64::consts::FRAC_PI_2, 0.0],
    momentum = [0.0, 0.0, 3.83405],
    steps = 5500,
    delta = 1.0,
    timelike = true,
    return_cartesian = true,
))]
#[allow(clippy::too_many_arguments)]
fn timelike_geodesic<'py>(
    py: Python<'py>,
    metric: &str,
    metric_params: Vec<f64>,
    position: [f64; 3],
    momentum: [f64; 3],
    steps: usize,
    delta: f64,
    timelike: bool,
    return_cartesian: bool,
) -> PyResult<&'py PyArray2<f64>> {
    let config = GeodesicConfig {
        metric: metric.parse()?,
        metric_params,
        position,
        momentum,
        steps,
        delta,
        timelike,
        return_cartesian,
    };
    let trajectory = py.allow_threads(|| crate::geodesic::simulate(config))?;
    let array = match trajectory.cartesian {
        Some(cartesian) => cartesian,
        None => trajectory.states,
    };
    Ok(array.into_pyarray(py))
}

#[pymodule]
fn spacetime_curvature(_py: Python, m: &PyModule) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(curvature_report, m)?)?;
    m.add_function(wrap_pyfunction!(timelike_geodesic, m)?)?;
    m.add("__version__", env!("CARGO_PKG_VERSION"))?;
    Ok(())
}
