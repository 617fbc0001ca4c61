//! 측지선 방정식 d²x^α/ds² = −Γ^α_{βγ} u^β u^γ

use serde::{Deserialize, Serialize};

use super::christoffel::Christoffel;
use crate::spacetimes::Metric;
use crate::symbolic::{Expr, Symbol};

/// 속도 성분 u^β의 표현 방식
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum VelocityConvention {
    /// 자유 기호 `v0, v1, ...`
    #[default]
    Placeholder,
    /// 고유시간 τ에 대한 좌표 함수의 1계 도함수 `dx^β(τ)/dτ`
    ProperTime,
}

impl VelocityConvention {
    /// 좌표별 속도 식
    pub fn velocities(&self, coordinates: &[Symbol]) -> Vec<Expr> {
        match self {
            VelocityConvention::Placeholder => (0..coordinates.len())
                .map(|i| Expr::symbol(&Symbol::new(&format!("v{i}"))))
                .collect(),
            VelocityConvention::ProperTime => {
                let tau = Symbol::new("tau");
                coordinates
                    .iter()
                    .map(|c| Expr::function(c.name(), &tau).diff(&tau))
                    .collect()
            }
        }
    }

    /// 이계도함수 라벨 `\frac{d^2 r}{ds^2}`
    pub fn label(&self, coordinate: &Symbol) -> String {
        let param = match self {
            VelocityConvention::Placeholder => "s",
            VelocityConvention::ProperTime => "\\tau",
        };
        format!("\\frac{{d^2 {}}}{{d{}^2}}", coordinate.to_latex(), param)
    }
}

/// 좌표 하나당 하나의 가속도 식
#[derive(Debug, Clone)]
pub struct GeodesicEquations {
    convention: VelocityConvention,
    coordinates: Vec<Symbol>,
    accelerations: Vec<Expr>,
}

impl GeodesicEquations {
    pub fn from_christoffel(
        metric: &Metric,
        gamma: &Christoffel,
        convention: VelocityConvention,
    ) -> Self {
        let n = metric.dims();
        let u = convention.velocities(metric.coordinates());
        let accelerations = (0..n)
            .map(|alpha| {
                let mut sum = Expr::zero();
                for beta in 0..n {
                    for gamma_idx in 0..n {
                        let g = gamma.get(alpha, beta, gamma_idx);
                        if g.is_zero() {
                            continue;
                        }
                        sum = sum + g * &(&u[beta] * &u[gamma_idx]);
                    }
                }
                -sum
            })
            .collect();
        GeodesicEquations {
            convention,
            coordinates: metric.coordinates().to_vec(),
            accelerations,
        }
    }

    pub fn convention(&self) -> VelocityConvention {
        self.convention
    }

    pub fn len(&self) -> usize {
        self.accelerations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accelerations.is_empty()
    }

    pub fn acceleration(&self, alpha: usize) -> &Expr {
        &self.accelerations[alpha]
    }

    /// `(라벨, 식)` 쌍을 좌표 순서대로
    pub fn iter(&self) -> impl Iterator<Item = (String, &Expr)> + '_ {
        self.coordinates
            .iter()
            .zip(&self.accelerations)
            .map(|(c, e)| (self.convention.label(c), e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spacetimes::MetricFamily;
    use crate::symbolic::parse;

    #[test]
    fn flat_space_keeps_centripetal_terms() {
        let g = MetricFamily::Minkowski.metric().unwrap();
        let gamma = Christoffel::from_metric(&g).unwrap();
        let eqs = GeodesicEquations::from_christoffel(&g, &gamma, VelocityConvention::Placeholder);
        assert_eq!(eqs.len(), 4);
        assert!(eqs.acceleration(0).is_zero());
        // d²r/ds² = r v2² + r sin²θ v3²
        let expected = parse("r*v2^2 + r*sin(theta)^2*v3^2").unwrap();
        assert!(eqs.acceleration(1).equivalent(&expected));
    }

    #[test]
    fn labels_follow_convention() {
        let r = Symbol::new("r");
        assert_eq!(VelocityConvention::Placeholder.label(&r), "\\frac{d^2 r}{ds^2}");
        let theta = Symbol::new("theta");
        assert_eq!(
            VelocityConvention::ProperTime.label(&theta),
            "\\frac{d^2 \\theta}{d\\tau^2}"
        );
    }

    #[test]
    fn proper_time_velocities_are_derivatives() {
        let coords = crate::symbolic::symbols("t r");
        let u = VelocityConvention::ProperTime.velocities(&coords);
        assert_eq!(
            u[1].to_latex(),
            "\\frac{d}{d \\tau} r{\\left(\\tau \\right)}"
        );
    }
}
