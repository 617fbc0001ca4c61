//! 기호 계량을 수치 평가 가능한 형태로 컴파일

use std::collections::HashMap;

use nalgebra::Matrix4;

use crate::error::{Error, Result};
use crate::spacetimes::{Metric, MetricFamily};
use crate::symbolic::{CompiledExpr, Symbol};

/// g_{ij}와 ∂_k g_{ij}의 0이 아닌 성분만 컴파일해 둔 4차원 계량
#[derive(Debug, Clone)]
pub struct NumericMetric {
    /// (i, j, g_ij), i ≤ j
    components: Vec<(usize, usize, CompiledExpr)>,
    /// (k, i, j, ∂_k g_ij), i ≤ j
    derivatives: Vec<(usize, usize, usize, CompiledExpr)>,
}

impl NumericMetric {
    /// `params`의 순서는 `MetricFamily::parameters`를 따른다 (`M = 1` 고정)
    pub fn new(family: MetricFamily, params: &[f64]) -> Result<Self> {
        let env = family.numeric_parameters(params)?;
        let metric = family.metric()?;
        Self::compile(&metric, &env)
    }

    pub fn compile(metric: &Metric, params: &HashMap<Symbol, f64>) -> Result<Self> {
        let n = metric.dims();
        if n != 4 {
            return Err(Error::Shape(format!(
                "geodesic integration needs a 4-dimensional metric, got {n}"
            )));
        }
        let coords = metric.coordinates();
        let mut components = Vec::new();
        for i in 0..n {
            for j in i..n {
                let g = metric.component(i, j);
                if !g.is_zero() {
                    components.push((i, j, g.compile(coords, params)?));
                }
            }
        }
        let dg = metric.derivatives();
        let mut derivatives = Vec::new();
        for k in 0..n {
            for i in 0..n {
                for j in i..n {
                    let d = &dg[[k, i, j]];
                    if !d.is_zero() {
                        derivatives.push((k, i, j, d.compile(coords, params)?));
                    }
                }
            }
        }
        log::debug!(
            "compiled metric: {} components, {} derivatives",
            components.len(),
            derivatives.len()
        );
        Ok(NumericMetric {
            components,
            derivatives,
        })
    }

    /// g_{ij}(x)
    pub fn at(&self, x: &[f64]) -> Matrix4<f64> {
        let mut g = Matrix4::zeros();
        for (i, j, e) in &self.components {
            let v = e.eval(x);
            g[(*i, *j)] = v;
            g[(*j, *i)] = v;
        }
        g
    }

    /// g^{ij}(x)
    pub fn inverse_at(&self, x: &[f64]) -> Result<Matrix4<f64>> {
        match self.at(x).try_inverse() {
            Some(inv) if inv.iter().all(|v| v.is_finite()) => Ok(inv),
            _ => Err(Error::SingularPoint(x.to_vec())),
        }
    }

    /// ∂_k g_{ij}(x), `dg[k][(i, j)]`
    pub fn derivatives_at(&self, x: &[f64]) -> [Matrix4<f64>; 4] {
        let mut dg = [Matrix4::zeros(); 4];
        for (k, i, j, e) in &self.derivatives {
            let v = e.eval(x);
            dg[*k][(*i, *j)] = v;
            dg[*k][(*j, *i)] = v;
        }
        dg
    }
}
