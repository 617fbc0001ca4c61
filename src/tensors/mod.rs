//! 계량으로부터 곡률 텐서를 유도하는 모듈

pub mod christoffel;
pub mod curvature;
pub mod geodesic;

pub use christoffel::Christoffel;
pub use curvature::{RicciTensor, Riemann};
pub use geodesic::{GeodesicEquations, VelocityConvention};

use crate::error::Result;
use crate::spacetimes::Metric;
use crate::symbolic::Expr;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// 인덱스 `0..len`의 성분을 계산해 순서대로 모은다.
/// `parallel` 기능이 켜져 있으면 rayon으로 나누어 계산하지만 결과 순서는 같다.
pub(crate) fn collect_components<F>(len: usize, f: F) -> Vec<Expr>
where
    F: Fn(usize) -> Expr + Sync + Send,
{
    #[cfg(feature = "parallel")]
    {
        (0..len).into_par_iter().map(f).collect()
    }
    #[cfg(not(feature = "parallel"))]
    {
        (0..len).map(f).collect()
    }
}

/// 한 계량에 대해 유도된 모든 곡률 양
#[derive(Debug, Clone)]
pub struct Curvature {
    pub christoffel: Christoffel,
    pub geodesics: GeodesicEquations,
    pub ricci: RicciTensor,
    pub ricci_scalar: Expr,
    pub riemann: Riemann,
}

/// 텐서 미적분 엔진
pub trait CurvatureEngine {
    fn christoffel(&self, metric: &Metric) -> Result<Christoffel>;

    fn riemann(&self, metric: &Metric, christoffel: &Christoffel) -> Result<Riemann>;

    fn ricci_tensor(&self, riemann: &Riemann) -> Result<RicciTensor>;

    fn ricci_scalar(&self, metric: &Metric, ricci: &RicciTensor) -> Result<Expr>;

    fn geodesics(
        &self,
        metric: &Metric,
        christoffel: &Christoffel,
        convention: VelocityConvention,
    ) -> Result<GeodesicEquations>;

    /// 크리스토펠 → 측지선 → 리만 → 리치 → 스칼라 순으로 모두 유도
    fn derive(&self, metric: &Metric, convention: VelocityConvention) -> Result<Curvature> {
        let christoffel = self.christoffel(metric)?;
        log::debug!("christoffel symbols derived for {} coordinates", metric.dims());
        let geodesics = self.geodesics(metric, &christoffel, convention)?;
        let riemann = self.riemann(metric, &christoffel)?;
        log::debug!("riemann tensor derived");
        let ricci = self.ricci_tensor(&riemann)?;
        let ricci_scalar = self.ricci_scalar(metric, &ricci)?;
        Ok(Curvature {
            christoffel,
            geodesics,
            ricci,
            ricci_scalar,
            riemann,
        })
    }
}

/// 레비-치비타 접속 기반 엔진
#[derive(Debug, Clone, Copy, Default)]
pub struct LeviCivita;

impl CurvatureEngine for LeviCivita {
    fn christoffel(&self, metric: &Metric) -> Result<Christoffel> {
        Christoffel::from_metric(metric)
    }

    fn riemann(&self, metric: &Metric, christoffel: &Christoffel) -> Result<Riemann> {
        Ok(Riemann::from_christoffel(metric, christoffel))
    }

    fn ricci_tensor(&self, riemann: &Riemann) -> Result<RicciTensor> {
        Ok(riemann.contract())
    }

    fn ricci_scalar(&self, metric: &Metric, ricci: &RicciTensor) -> Result<Expr> {
        ricci.scalar(metric)
    }

    fn geodesics(
        &self,
        metric: &Metric,
        christoffel: &Christoffel,
        convention: VelocityConvention,
    ) -> Result<GeodesicEquations> {
        Ok(GeodesicEquations::from_christoffel(
            metric,
            christoffel,
            convention,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::spacetimes::{MetricBuilder, MetricFamily};
    use crate::symbolic::symbols;

    #[test]
    fn derive_bundles_every_quantity() {
        let g = MetricFamily::Schwarzschild.metric().unwrap();
        let curvature = LeviCivita.derive(&g, VelocityConvention::Placeholder).unwrap();
        assert_eq!(curvature.geodesics.len(), 4);
        assert!(curvature.ricci_scalar.is_zero());
        assert_eq!(curvature.riemann.dims(), 4);
    }

    #[test]
    fn singular_metric_propagates() {
        let g = MetricBuilder::new(symbols("x y"))
            .diagonal(vec![Expr::one(), Expr::zero()])
            .unwrap()
            .build()
            .unwrap();
        assert!(matches!(
            LeviCivita.derive(&g, VelocityConvention::Placeholder),
            Err(Error::SingularMetric { .. })
        ));
    }
}
