//! 레비-치비타 접속 계수 (크리스토펠 기호)

use ndarray::Array3;

use super::collect_components;
use crate::error::Result;
use crate::spacetimes::Metric;
use crate::symbolic::Expr;

/// Γ^i_{jk}, 인덱스 `[i, j, k]`
#[derive(Debug, Clone)]
pub struct Christoffel {
    components: Array3<Expr>,
}

impl Christoffel {
    /// Γ^i_{jk} = ½ g^{il} (∂_j g_{lk} + ∂_k g_{lj} − ∂_l g_{jk})
    ///
    /// 아래 두 인덱스에 대해 대칭이므로 j ≤ k만 계산하고 나머지는 복사한다.
    pub fn from_metric(metric: &Metric) -> Result<Self> {
        let n = metric.dims();
        let g_inv = metric.inverse()?;
        let dg = metric.derivatives();
        let half = Expr::rational(1, 2)?;

        let upper: Vec<(usize, usize, usize)> = (0..n)
            .flat_map(|i| (0..n).flat_map(move |j| (j..n).map(move |k| (i, j, k))))
            .collect();
        let values = collect_components(upper.len(), |idx| {
            let (i, j, k) = upper[idx];
            let mut sum = Expr::zero();
            for l in 0..n {
                let g_il = &g_inv[[i, l]];
                if g_il.is_zero() {
                    continue;
                }
                let bracket = &(&dg[[j, l, k]] + &dg[[k, l, j]]) - &dg[[l, j, k]];
                if bracket.is_zero() {
                    continue;
                }
                sum = sum + g_il * &bracket;
            }
            &half * &sum
        });

        let mut components = Array3::from_elem((n, n, n), Expr::zero());
        for (&(i, j, k), value) in upper.iter().zip(values) {
            if j != k {
                components[[i, k, j]] = value.clone();
            }
            components[[i, j, k]] = value;
        }
        Ok(Christoffel { components })
    }

    pub fn dims(&self) -> usize {
        self.components.shape()[0]
    }

    pub fn get(&self, i: usize, j: usize, k: usize) -> &Expr {
        &self.components[[i, j, k]]
    }

    pub fn components(&self) -> &Array3<Expr> {
        &self.components
    }
}
