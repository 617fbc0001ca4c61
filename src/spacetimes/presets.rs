//! 자주 쓰는 시공간 계량 프리셋

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::metric::{Metric, MetricBuilder};
use crate::error::{Error, Result};
use crate::symbolic::{parse, symbols, Expr, Symbol};

/// 지원하는 계량 계열
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MetricFamily {
    /// 구면 좌표의 평탄 시공간
    Minkowski,
    /// 질량 `M`의 슈바르츠실트 계량
    Schwarzschild,
    /// 보이어-린드퀴스트 좌표의 커 계량 (`M`, `a`)
    Kerr,
    /// 전하 `Q`를 가진 커-뉴먼 계량 (`M`, `a`, `Q`)
    KerrNewman,
    /// 일반 정적 구대칭 계량 diag(A(r), -B(r), -r², -r² sin²θ)
    StaticSpherical,
}

impl MetricFamily {
    pub const ALL: [MetricFamily; 5] = [
        MetricFamily::Minkowski,
        MetricFamily::Schwarzschild,
        MetricFamily::Kerr,
        MetricFamily::KerrNewman,
        MetricFamily::StaticSpherical,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            MetricFamily::Minkowski => "minkowski",
            MetricFamily::Schwarzschild => "schwarzschild",
            MetricFamily::Kerr => "kerr",
            MetricFamily::KerrNewman => "kerr-newman",
            MetricFamily::StaticSpherical => "static-spherical",
        }
    }

    /// 좌표 (t, r, θ, φ)
    pub fn coordinates(&self) -> Vec<Symbol> {
        spherical_coordinates()
    }

    /// 수치 적분 시 사용자가 넘기는 파라미터 기호 (질량 `M`은 1로 고정)
    pub fn parameters(&self) -> Vec<Symbol> {
        match self {
            MetricFamily::Kerr => symbols("a"),
            MetricFamily::KerrNewman => symbols("a Q"),
            _ => Vec::new(),
        }
    }

    /// 기호 계량 조립
    pub fn metric(&self) -> Result<Metric> {
        match self {
            MetricFamily::Minkowski => diagonal(&["-1", "1", "r^2", "r^2*sin(theta)^2"]),
            MetricFamily::Schwarzschild => diagonal(&[
                "-(1 - 2*M/r)",
                "1/(1 - 2*M/r)",
                "r^2",
                "r^2*sin(theta)^2",
            ]),
            MetricFamily::Kerr => kerr_newman(false),
            MetricFamily::KerrNewman => kerr_newman(true),
            MetricFamily::StaticSpherical => {
                diagonal(&["A(r)", "-B(r)", "-r^2", "-r^2*sin(theta)^2"])
            }
        }
    }

    /// 수치 평가용 파라미터 바인딩. `M = 1` 단위계.
    pub fn numeric_parameters(&self, values: &[f64]) -> Result<HashMap<Symbol, f64>> {
        let names = self.parameters();
        if names.len() != values.len() {
            return Err(Error::InvalidParameters(format!(
                "{} takes {} parameter(s) {:?}, got {}",
                self.name(),
                names.len(),
                names.iter().map(Symbol::name).collect::<Vec<_>>(),
                values.len()
            )));
        }
        if let Some(v) = values.iter().find(|v| !v.is_finite()) {
            return Err(Error::InvalidParameters(format!("non-finite parameter {v}")));
        }
        let mut env: HashMap<Symbol, f64> = names.into_iter().zip(values.iter().copied()).collect();
        env.insert(Symbol::new("M"), 1.0);
        Ok(env)
    }

    /// 바깥 사건의 지평선 r₊ = M + √(M² − a² − Q²) (`M = 1`).
    /// 지평선이 없으면 (평탄 시공간, 벌거숭이 특이점) `None`.
    pub fn outer_horizon(&self, values: &[f64]) -> Result<Option<f64>> {
        let env = self.numeric_parameters(values)?;
        let get = |name: &str| env.get(&Symbol::new(name)).copied().unwrap_or(0.0);
        let (a, q) = (get("a"), get("Q"));
        let disc = match self {
            MetricFamily::Schwarzschild => 1.0,
            MetricFamily::Kerr | MetricFamily::KerrNewman => 1.0 - a * a - q * q,
            MetricFamily::Minkowski | MetricFamily::StaticSpherical => return Ok(None),
        };
        Ok((disc >= 0.0).then(|| 1.0 + disc.sqrt()))
    }
}

impl fmt::Display for MetricFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for MetricFamily {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let key = s.trim().to_ascii_lowercase().replace(['_', ' '], "-");
        MetricFamily::ALL
            .into_iter()
            .find(|family| {
                family.name() == key || (key == "kerrnewman" && *family == MetricFamily::KerrNewman)
            })
            .ok_or_else(|| Error::UnknownMetric(s.to_string()))
    }
}

fn spherical_coordinates() -> Vec<Symbol> {
    symbols("t r theta phi")
}

fn diagonal(entries: &[&str]) -> Result<Metric> {
    let diag = entries.iter().map(|e| parse(e)).collect::<Result<Vec<Expr>>>()?;
    MetricBuilder::new(spherical_coordinates())
        .diagonal(diag)?
        .build()
}

/// Σ = r² + a²cos²θ, Δ = r² − 2Mr + a² + Q²
fn kerr_newman(charged: bool) -> Result<Metric> {
    let charge = if charged { "Q^2" } else { "0" };
    let sigma = parse("r^2 + a^2*cos(theta)^2")?;
    let delta = parse(&format!("r^2 - 2*M*r + a^2 + {charge}"))?;
    let mass_term = parse(&format!("2*M*r - {charge}"))?;
    let sin2 = parse("sin(theta)^2")?;
    let a = Expr::symbol(&Symbol::new("a"));
    let ratio = mass_term.try_div(&sigma)?;

    let g_tt = -(Expr::one() - &ratio);
    let g_tphi = -(&a * &sin2 * &ratio);
    let g_rr = sigma.try_div(&delta)?;
    let g_thth = sigma.clone();
    let g_phph = (parse("r^2 + a^2")? + a.pow(2)? * &sin2 * &ratio) * &sin2;

    let zero = Expr::zero;
    MetricBuilder::new(spherical_coordinates())
        .entry(0, 0, g_tt)?
        .symmetric_entry(0, 1, zero())?
        .symmetric_entry(0, 2, zero())?
        .symmetric_entry(0, 3, g_tphi)?
        .entry(1, 1, g_rr)?
        .symmetric_entry(1, 2, zero())?
        .symmetric_entry(1, 3, zero())?
        .entry(2, 2, g_thth)?
        .symmetric_entry(2, 3, zero())?
        .entry(3, 3, g_phph)?
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip() {
        for family in MetricFamily::ALL {
            assert_eq!(family.name().parse::<MetricFamily>().unwrap(), family);
        }
        assert_eq!("Kerr_Newman".parse::<MetricFamily>().unwrap(), MetricFamily::KerrNewman);
        assert!(matches!("de-sitter".parse::<MetricFamily>(), Err(Error::UnknownMetric(_))));
    }

    #[test]
    fn every_preset_assembles_four_dimensions() {
        for family in MetricFamily::ALL {
            let g = family.metric().unwrap();
            assert_eq!(g.dims(), 4, "{family}");
            assert_eq!(g.coordinates(), family.coordinates().as_slice());
        }
    }

    #[test]
    fn kerr_reduces_to_schwarzschild_without_spin() {
        let kerr = MetricFamily::Kerr.metric().unwrap();
        let schw = MetricFamily::Schwarzschild.metric().unwrap();
        let env = HashMap::from([
            (Symbol::new("M"), 1.0),
            (Symbol::new("a"), 0.0),
            (Symbol::new("r"), 7.5),
            (Symbol::new("theta"), 1.1),
        ]);
        for i in 0..4 {
            for j in 0..4 {
                let k = kerr.component(i, j).eval(&env).unwrap();
                let s = schw.component(i, j).eval(&env).unwrap();
                assert!((k - s).abs() < 1e-12, "g[{i}][{j}]: {k} vs {s}");
            }
        }
    }

    #[test]
    fn numeric_parameters_check_arity() {
        let env = MetricFamily::Kerr.numeric_parameters(&[0.9]).unwrap();
        assert_eq!(env[&Symbol::new("a")], 0.9);
        assert_eq!(env[&Symbol::new("M")], 1.0);
        assert!(matches!(
            MetricFamily::Schwarzschild.numeric_parameters(&[0.5]),
            Err(Error::InvalidParameters(_))
        ));
    }

    #[test]
    fn outer_horizons() {
        let schw = MetricFamily::Schwarzschild.outer_horizon(&[]).unwrap();
        assert_eq!(schw, Some(2.0));
        let kerr = MetricFamily::Kerr.outer_horizon(&[0.6]).unwrap().unwrap();
        assert!((kerr - 1.8).abs() < 1e-12);
        let kn = MetricFamily::KerrNewman.outer_horizon(&[0.6, 0.8]).unwrap();
        assert_eq!(kn, Some(1.0));
        assert_eq!(MetricFamily::Kerr.outer_horizon(&[1.2]).unwrap(), None);
        assert_eq!(MetricFamily::Minkowski.outer_horizon(&[]).unwrap(), None);
    }
}
