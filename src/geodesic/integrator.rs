//! 해밀토니안 형식의 측지선 적분
//!
//! 상태는 (x^μ, p_μ)이고 H = ½ g^{μν} p_μ p_ν 이다.
//!
//! dx^μ/dλ = g^{μν} p_ν,  dp_μ/dλ = ½ ∂_μ g_{αβ} u^α u^β
//!
//! 샘플 사이 구간은 RKF7(8) 적응 스텝으로 적분하고, 지평선 바로 바깥에서
//! 멈춘다.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use nalgebra::Vector4;
use ndarray::{s, Array1, Array2};
use rkf78::{
    EventConfig, EventDirection, EventFunction, IntegrationResult, OdeSystem, Rkf78, Tolerances,
};

use super::metric::NumericMetric;
use crate::config::{Constants, GeodesicConfig};
use crate::error::{Error, Result};
use crate::spacetimes::MetricFamily;
use crate::utils::numeric::boyer_lindquist_to_cartesian;

/// 적분 결과
#[derive(Debug, Clone)]
pub struct Trajectory {
    /// 아핀 파라미터 λ
    pub affine: Array1<f64>,
    /// `(n × 8)`: t, r, θ, φ, p_t, p_r, p_θ, p_φ
    pub states: Array2<f64>,
    /// `(n × 4)`: t, x, y, z
    pub cartesian: Option<Array2<f64>>,
}

impl Trajectory {
    pub fn len(&self) -> usize {
        self.states.nrows()
    }

    pub fn is_empty(&self) -> bool {
        self.states.nrows() == 0
    }

    /// 플롯용 (x, y) 투영. 데카르트 좌표가 없으면 적도면으로 변환한다.
    pub fn xy(&self) -> Vec<(f64, f64)> {
        match &self.cartesian {
            Some(c) => c.outer_iter().map(|row| (row[1], row[2])).collect(),
            None => self
                .states
                .outer_iter()
                .map(|row| {
                    let [x, y, _] = boyer_lindquist_to_cartesian(row[1], row[2], row[3], 0.0);
                    (x, y)
                })
                .collect(),
        }
    }

    /// CSV 저장: `lambda,t,r,theta,phi,p_t,p_r,p_theta,p_phi[,x,y,z]`
    pub fn write_csv<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let mut out = BufWriter::new(File::create(path)?);
        write!(out, "lambda,t,r,theta,phi,p_t,p_r,p_theta,p_phi")?;
        if self.cartesian.is_some() {
            write!(out, ",x,y,z")?;
        }
        writeln!(out)?;
        for (k, row) in self.states.outer_iter().enumerate() {
            write!(out, "{}", self.affine[k])?;
            for v in row.iter() {
                write!(out, ",{v}")?;
            }
            if let Some(c) = &self.cartesian {
                for v in c.slice(s![k, 1..]).iter() {
                    write!(out, ",{v}")?;
                }
            }
            writeln!(out)?;
        }
        out.flush()?;
        log::info!("trajectory written to: {}", path.display());
        Ok(())
    }
}

/// (x^μ, p_μ)에 대한 해밀턴 방정식
struct HamiltonFlow<'a> {
    metric: &'a NumericMetric,
}

impl OdeSystem<8> for HamiltonFlow<'_> {
    fn rhs(&self, _lambda: f64, y: &[f64; 8], dydt: &mut [f64; 8]) {
        let x = &y[..4];
        let g_inv = match self.metric.inverse_at(x) {
            Ok(g_inv) => g_inv,
            // 특이점에서는 NaN을 넘겨 솔버가 비유한 상태로 중단하게 한다
            Err(_) => {
                dydt.fill(f64::NAN);
                return;
            }
        };
        let p = Vector4::new(y[4], y[5], y[6], y[7]);
        let u = g_inv * p;
        let dg = self.metric.derivatives_at(x);
        for mu in 0..4 {
            dydt[mu] = u[mu];
            dydt[4 + mu] = 0.5 * u.dot(&(dg[mu] * u));
        }
    }
}

/// r − r_stop. 위에서 아래로 0을 지나면 적분을 멈춘다.
struct HorizonCrossing {
    radius: f64,
}

impl EventFunction<8> for HorizonCrossing {
    fn eval(&self, _lambda: f64, y: &[f64; 8]) -> f64 {
        y[1] - self.radius
    }
}

/// 시간꼴(또는 널) 측지선 적분기
#[derive(Debug, Clone)]
pub struct Timelike {
    config: GeodesicConfig,
    metric: NumericMetric,
    /// 데카르트 변환에 쓰는 스핀 파라미터
    spin: f64,
    /// 이 반지름 아래로 내려가면 적분을 멈춘다
    stop_radius: f64,
    initial: [f64; 8],
}

impl Timelike {
    /// 설정 검증, 계량 컴파일, 질량껍질 조건으로 p_t 계산
    pub fn new(config: GeodesicConfig) -> Result<Self> {
        config.validate()?;
        let metric = NumericMetric::new(config.metric, &config.metric_params)?;
        let spin = match config.metric {
            MetricFamily::Kerr | MetricFamily::KerrNewman => config.metric_params[0],
            _ => 0.0,
        };
        let stop_radius = config
            .metric
            .outer_horizon(&config.metric_params)?
            .map_or(0.0, |r_plus| r_plus * (1.0 + Constants::HORIZON_BUFFER));

        let [r, theta, phi] = config.position;
        if r <= stop_radius {
            return Err(Error::InvalidInitialData(format!(
                "initial radius {r} is not outside the horizon stop radius {stop_radius}"
            )));
        }
        let [p_r, p_theta, p_phi] = config.momentum;
        let x = [0.0, r, theta, phi];
        let mass_shell = if config.timelike { 1.0 } else { 0.0 };
        let p_t = solve_energy(&metric, &x, [p_r, p_theta, p_phi], mass_shell)?;

        let initial = [0.0, r, theta, phi, p_t, p_r, p_theta, p_phi];
        log::debug!("initial state {initial:?}, stop radius {stop_radius}");
        Ok(Timelike {
            config,
            metric,
            spin,
            stop_radius,
            initial,
        })
    }

    pub fn config(&self) -> &GeodesicConfig {
        &self.config
    }

    /// 초기 상태 (t, r, θ, φ, p_t, p_r, p_θ, p_φ)
    pub fn initial_state(&self) -> &[f64; 8] {
        &self.initial
    }

    pub fn stop_radius(&self) -> f64 {
        self.stop_radius
    }

    /// H = ½ g^{μν} p_μ p_ν, `state`는 8개 성분
    pub fn hamiltonian(&self, state: &[f64]) -> Result<f64> {
        if state.len() != 8 {
            return Err(Error::Shape(format!(
                "phase-space state has 8 components, got {}",
                state.len()
            )));
        }
        let g_inv = self.metric.inverse_at(&state[..4])?;
        let p = Vector4::new(state[4], state[5], state[6], state[7]);
        Ok(0.5 * p.dot(&(g_inv * p)))
    }

    /// λ = k·delta (k < `steps`) 에서 샘플링한 궤적. 지평선에 닿으면 그 전까지만.
    pub fn integrate(&self) -> Result<Trajectory> {
        let steps = self.config.steps;
        let delta = self.config.delta;
        let flow = HamiltonFlow {
            metric: &self.metric,
        };
        let horizon = HorizonCrossing {
            radius: self.stop_radius,
        };
        let event = EventConfig {
            direction: EventDirection::Falling,
            ..EventConfig::default()
        };
        let mut solver = Rkf78::new(Tolerances::new(
            Constants::ODE_TOLERANCE,
            Constants::ODE_TOLERANCE,
        ));

        let mut samples = Vec::with_capacity(steps);
        let mut state = self.initial;
        samples.push(state);
        for k in 1..steps {
            let start = (k - 1) as f64 * delta;
            let end = k as f64 * delta;
            let result = solver
                .integrate_to_event(&flow, &horizon, &event, start, &state, end, delta)
                .map_err(|e| Error::Numerical(format!("at lambda = {start}: {e}")))?;
            match result {
                IntegrationResult::Completed { y, .. } => state = y,
                IntegrationResult::Event(hit) => {
                    log::warn!(
                        "geodesic reached r = {:.6} near the horizon at lambda = {:.6}; \
                         stopping after {} of {steps} samples",
                        hit.y[1],
                        hit.t,
                        samples.len()
                    );
                    break;
                }
            }
            samples.push(state);
            if k % Constants::LOG_EVERY == 0 {
                log::debug!("step {k}/{steps}: r = {:.6}", state[1]);
            }
        }
        log::debug!(
            "rkf78: {} accepted, {} rejected steps, {} evaluations",
            solver.stats.accepted_steps,
            solver.stats.rejected_steps,
            solver.stats.fn_evals
        );

        let n = samples.len();
        let states = Array2::from_shape_fn((n, 8), |(k, j)| samples[k][j]);
        let affine = Array1::from_shape_fn(n, |k| k as f64 * delta);
        let cartesian = self.config.return_cartesian.then(|| {
            Array2::from_shape_fn((n, 4), |(k, j)| {
                let row = &samples[k];
                match j {
                    0 => row[0],
                    _ => boyer_lindquist_to_cartesian(row[1], row[2], row[3], self.spin)[j - 1],
                }
            })
        });
        log::info!(
            "integrated {} geodesic: {n} samples, delta = {delta}",
            self.config.metric
        );
        Ok(Trajectory {
            affine,
            states,
            cartesian,
        })
    }
}

/// g^{μν} p_μ p_ν = −μ² 를 p_t에 대해 풀고 u^t > 0 인 근을 고른다.
fn solve_energy(
    metric: &NumericMetric,
    x: &[f64],
    spatial: [f64; 3],
    mass_shell: f64,
) -> Result<f64> {
    let g_inv = metric.inverse_at(x)?;
    let a = g_inv[(0, 0)];
    let mut b = 0.0;
    let mut c = mass_shell;
    for i in 1..4 {
        b += 2.0 * g_inv[(0, i)] * spatial[i - 1];
        for j in 1..4 {
            c += g_inv[(i, j)] * spatial[i - 1] * spatial[j - 1];
        }
    }
    if a.abs() < Constants::MIN_PIVOT {
        return Err(Error::InvalidInitialData(
            "g^tt vanishes at the initial position".to_string(),
        ));
    }
    let disc = b * b - 4.0 * a * c;
    if disc.is_nan() || disc <= 0.0 {
        return Err(Error::InvalidInitialData(format!(
            "no future-directed p_t for momentum {spatial:?} (discriminant {disc})"
        )));
    }
    // u^t = a p_t + b/2 = ±√disc / 2
    Ok((-b + disc.sqrt()) / (2.0 * a))
}
