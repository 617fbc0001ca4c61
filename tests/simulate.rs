use std::fs;

use spacetime_curvature::config::GeodesicConfig;
use spacetime_curvature::geodesic::simulate;
use spacetime_curvature::prelude::*;

fn short_kerr_run() -> GeodesicConfig {
    GeodesicConfig {
        steps: 50,
        ..GeodesicConfig::default()
    }
}

#[test]
fn trajectory_csv_has_header_and_rows() {
    let traj = simulate(short_kerr_run()).unwrap();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("orbit.csv");
    traj.write_csv(&path).unwrap();

    let text = fs::read_to_string(&path).unwrap();
    let mut lines = text.lines();
    assert_eq!(
        lines.next().unwrap(),
        "lambda,t,r,theta,phi,p_t,p_r,p_theta,p_phi,x,y,z"
    );
    let rows: Vec<_> = lines.collect();
    assert_eq!(rows.len(), 50);
    assert!(rows.iter().all(|row| row.split(',').count() == 12));
}

#[test]
fn plot_is_written_as_svg() {
    let traj = simulate(short_kerr_run()).unwrap();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("geodesic.svg");
    plot_trajectory(&traj, &path).unwrap();
    let svg = fs::read_to_string(&path).unwrap();
    assert!(svg.contains("<svg"));
}

#[test]
fn kerr_newman_and_schwarzschild_integrate() {
    let kn = GeodesicConfig {
        metric: MetricFamily::KerrNewman,
        metric_params: vec![0.5, 0.3],
        steps: 20,
        ..GeodesicConfig::default()
    };
    assert_eq!(simulate(kn).unwrap().len(), 20);

    let schw = GeodesicConfig {
        metric: MetricFamily::Schwarzschild,
        metric_params: vec![],
        steps: 20,
        return_cartesian: false,
        ..GeodesicConfig::default()
    };
    let traj = simulate(schw).unwrap();
    assert!(traj.cartesian.is_none());
    assert_eq!(traj.xy().len(), 20);
}

#[test]
fn static_spherical_cannot_be_simulated() {
    let config = GeodesicConfig {
        metric: MetricFamily::StaticSpherical,
        metric_params: vec![],
        ..GeodesicConfig::default()
    };
    assert!(matches!(
        Timelike::new(config),
        Err(Error::InvalidParameters(_))
    ));
}

#[test]
fn default_kerr_orbit_stays_bound() {
    let geod = Timelike::new(GeodesicConfig::default()).unwrap();
    let traj = geod.integrate().unwrap();
    assert_eq!(traj.len(), 5500);
    assert_eq!(traj.cartesian.as_ref().unwrap().nrows(), 5500);

    let r_min = traj.states.column(1).iter().copied().fold(f64::INFINITY, f64::min);
    assert!(r_min > 6.0 && r_min < 9.0, "periapsis {r_min}");

    let last = traj.states.row(5499).to_vec();
    let h = geod.hamiltonian(&last).unwrap();
    assert!((h + 0.5).abs() < 1e-6, "H = {h}");
}

#[test]
fn plunge_into_kerr_newman_hole_is_truncated() {
    let config = GeodesicConfig {
        metric: MetricFamily::KerrNewman,
        metric_params: vec![0.5, 0.3],
        position: [10.0, std::f64::consts::FRAC_PI_2, 0.0],
        momentum: [0.0, 0.0, 0.0],
        steps: 200,
        ..GeodesicConfig::default()
    };
    let geod = Timelike::new(config).unwrap();
    // r₊ = 1 + √(1 − 0.25 − 0.09)
    let r_plus = 1.0 + 0.66f64.sqrt();
    assert!((geod.stop_radius() - 1.01 * r_plus).abs() < 1e-12);

    let traj = geod.integrate().unwrap();
    assert!(traj.len() > 1 && traj.len() < 200, "{} samples", traj.len());
    assert_eq!(traj.cartesian.as_ref().unwrap().nrows(), traj.len());
    assert!(traj.states.column(1).iter().all(|&r| r > geod.stop_radius()));
    // 각운동량 0 이어도 끌림 효과로 φ가 증가한다
    assert!(traj.states[[traj.len() - 1, 3]] > 0.0);
}
