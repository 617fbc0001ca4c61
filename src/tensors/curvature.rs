//! 리만 곡률 텐서와 리치 축약

use ndarray::{Array2, Array4};

use super::christoffel::Christoffel;
use super::collect_components;
use crate::error::Result;
use crate::spacetimes::Metric;
use crate::symbolic::Expr;

/// R^ρ_{σμν}, 인덱스 `[ρ, σ, μ, ν]`
#[derive(Debug, Clone)]
pub struct Riemann {
    components: Array4<Expr>,
}

impl Riemann {
    /// R^ρ_{σμν} = ∂_μ Γ^ρ_{νσ} − ∂_ν Γ^ρ_{μσ} + Γ^ρ_{μλ}Γ^λ_{νσ} − Γ^ρ_{νλ}Γ^λ_{μσ}
    ///
    /// (μ, ν)에 대해 반대칭이므로 μ < ν만 계산한다.
    pub fn from_christoffel(metric: &Metric, gamma: &Christoffel) -> Self {
        let n = metric.dims();
        let coords = metric.coordinates();

        let upper: Vec<(usize, usize, usize, usize)> = (0..n)
            .flat_map(|rho| {
                (0..n).flat_map(move |sigma| {
                    (0..n).flat_map(move |mu| ((mu + 1)..n).map(move |nu| (rho, sigma, mu, nu)))
                })
            })
            .collect();
        let values = collect_components(upper.len(), |idx| {
            let (rho, sigma, mu, nu) = upper[idx];
            let mut value = &gamma.get(rho, nu, sigma).diff(&coords[mu])
                - &gamma.get(rho, mu, sigma).diff(&coords[nu]);
            for lambda in 0..n {
                let a = gamma.get(rho, mu, lambda);
                let b = gamma.get(lambda, nu, sigma);
                if !a.is_zero() && !b.is_zero() {
                    value = value + a * b;
                }
                let c = gamma.get(rho, nu, lambda);
                let d = gamma.get(lambda, mu, sigma);
                if !c.is_zero() && !d.is_zero() {
                    value = value - c * d;
                }
            }
            value
        });

        let mut components = Array4::from_elem((n, n, n, n), Expr::zero());
        for (&(rho, sigma, mu, nu), value) in upper.iter().zip(values) {
            components[[rho, sigma, nu, mu]] = -&value;
            components[[rho, sigma, mu, nu]] = value;
        }
        Riemann { components }
    }

    pub fn dims(&self) -> usize {
        self.components.shape()[0]
    }

    pub fn get(&self, rho: usize, sigma: usize, mu: usize, nu: usize) -> &Expr {
        &self.components[[rho, sigma, mu, nu]]
    }

    pub fn components(&self) -> &Array4<Expr> {
        &self.components
    }

    /// R_{ij} = R^k_{ikj}
    pub fn contract(&self) -> RicciTensor {
        let n = self.dims();
        let values = collect_components(n * n, |idx| {
            let (i, j) = (idx / n, idx % n);
            (0..n).fold(Expr::zero(), |acc, k| acc + self.get(k, i, k, j))
        });
        let mut components = Array2::from_elem((n, n), Expr::zero());
        for (idx, value) in values.into_iter().enumerate() {
            components[[idx / n, idx % n]] = value;
        }
        RicciTensor { components }
    }
}

/// R_{ij}
#[derive(Debug, Clone)]
pub struct RicciTensor {
    components: Array2<Expr>,
}

impl RicciTensor {
    pub fn dims(&self) -> usize {
        self.components.shape()[0]
    }

    pub fn get(&self, i: usize, j: usize) -> &Expr {
        &self.components[[i, j]]
    }

    pub fn components(&self) -> &Array2<Expr> {
        &self.components
    }

    /// R = g^{ij} R_{ij}
    pub fn scalar(&self, metric: &Metric) -> Result<Expr> {
        let g_inv = metric.inverse()?;
        let mut total = Expr::zero();
        for ((i, j), r_ij) in self.components.indexed_iter() {
            let g_ij = &g_inv[[i, j]];
            if g_ij.is_zero() || r_ij.is_zero() {
                continue;
            }
            total = total + g_ij * r_ij;
        }
        Ok(total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spacetimes::{MetricBuilder, MetricFamily};
    use crate::symbolic::{parse, symbols};

    fn curvature_of(metric: &Metric) -> (Riemann, RicciTensor, Expr) {
        let gamma = Christoffel::from_metric(metric).unwrap();
        let riemann = Riemann::from_christoffel(metric, &gamma);
        let ricci = riemann.contract();
        let scalar = ricci.scalar(metric).unwrap();
        (riemann, ricci, scalar)
    }

    #[test]
    fn two_sphere_has_constant_positive_curvature() {
        let g = MetricBuilder::new(symbols("theta phi"))
            .diagonal(vec![parse("R^2").unwrap(), parse("R^2*sin(theta)^2").unwrap()])
            .unwrap()
            .build()
            .unwrap();
        let (riemann, _, scalar) = curvature_of(&g);
        assert!(scalar.equivalent(&parse("2/R^2").unwrap()));
        // R^θ_{φθφ} = sin²θ
        assert!(riemann.get(0, 1, 0, 1).equivalent(&parse("sin(theta)^2").unwrap()));
    }

    #[test]
    fn schwarzschild_is_ricci_flat() {
        let g = MetricFamily::Schwarzschild.metric().unwrap();
        let (riemann, ricci, scalar) = curvature_of(&g);
        assert!(ricci.components().iter().all(Expr::is_zero));
        assert!(scalar.is_zero());
        // R^t_{rtr} = 2M / (r²(r - 2M))
        let expected = parse("2*M/(r^2*(r - 2*M))").unwrap();
        assert!(riemann.get(0, 1, 0, 1).equivalent(&expected));
    }

    #[test]
    fn flat_space_in_spherical_coordinates_has_no_curvature() {
        let g = MetricFamily::Minkowski.metric().unwrap();
        let (riemann, ricci, scalar) = curvature_of(&g);
        assert!(riemann.components().iter().all(Expr::is_zero));
        assert!(ricci.components().iter().all(Expr::is_zero));
        assert!(scalar.is_zero());
    }

    #[test]
    fn riemann_is_antisymmetric_in_last_pair() {
        let g = MetricFamily::StaticSpherical.metric().unwrap();
        let gamma = Christoffel::from_metric(&g).unwrap();
        let riemann = Riemann::from_christoffel(&g, &gamma);
        for rho in 0..4 {
            for sigma in 0..4 {
                for mu in 0..4 {
                    assert!(riemann.get(rho, sigma, mu, mu).is_zero());
                    for nu in 0..4 {
                        let sum = riemann.get(rho, sigma, mu, nu) + riemann.get(rho, sigma, nu, mu);
                        assert!(sum.is_zero());
                    }
                }
            }
        }
    }
}
