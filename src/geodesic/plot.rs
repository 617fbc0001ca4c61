//! 궤적의 x–y 투영을 SVG로 그린다

use std::path::Path;

use plotters::prelude::*;

use super::integrator::Trajectory;
use crate::error::{Error, Result};

fn plot_err<E: std::fmt::Display>(err: E) -> Error {
    Error::Plot(err.to_string())
}

/// 궤적과 중심 질량(원점)을 `path`에 SVG로 저장
pub fn plot_trajectory<P: AsRef<Path>>(trajectory: &Trajectory, path: P) -> Result<()> {
    let path = path.as_ref();
    let points = trajectory.xy();
    if points.is_empty() {
        return Err(Error::Plot("trajectory has no samples".to_string()));
    }

    // 원점을 중심으로 하는 정사각형 범위
    let extent = points
        .iter()
        .fold(0.0f64, |m, &(x, y)| m.max(x.abs()).max(y.abs()))
        .max(1.0)
        * 1.1;

    let root = SVGBackend::new(path, (800, 800)).into_drawing_area();
    root.fill(&WHITE).map_err(plot_err)?;
    let mut chart = ChartBuilder::on(&root)
        .caption("Geodesic (x-y projection)", ("sans-serif", 20))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d(-extent..extent, -extent..extent)
        .map_err(plot_err)?;

    chart
        .configure_mesh()
        .x_desc("x")
        .y_desc("y")
        .draw()
        .map_err(plot_err)?;

    chart
        .draw_series(LineSeries::new(points.iter().copied(), &BLUE))
        .map_err(plot_err)?;
    chart
        .draw_series(std::iter::once(Circle::new((0.0, 0.0), 4, BLACK.filled())))
        .map_err(plot_err)?;
    if let Some(&start) = points.first() {
        chart
            .draw_series(std::iter::once(Circle::new(start, 3, RED.filled())))
            .map_err(plot_err)?;
    }

    root.present().map_err(plot_err)?;
    log::info!("geodesic plot written to: {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{Array1, Array2};

    #[test]
    fn empty_trajectory_is_a_plot_error() {
        let traj = Trajectory {
            affine: Array1::zeros(0),
            states: Array2::zeros((0, 8)),
            cartesian: None,
        };
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            plot_trajectory(&traj, dir.path().join("empty.svg")),
            Err(Error::Plot(_))
        ));
    }
}
