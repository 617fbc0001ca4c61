//! 계량 텐서와 조립기

use ndarray::{Array2, Array3};
use once_cell::sync::OnceCell;

use crate::error::{Error, Result};
use crate::symbolic::{Expr, Symbol};

/// 좌표 목록 위에서 정의된 기호 계량 g_{ij}
///
/// 생성 후에는 불변이다. 역계량은 처음 요청될 때 한 번만 계산된다.
#[derive(Debug, Clone)]
pub struct Metric {
    coordinates: Vec<Symbol>,
    components: Array2<Expr>,
    inverse: OnceCell<Array2<Expr>>,
}

impl Metric {
    /// 정사각 성분 행렬로 계량 생성
    ///
    /// 대칭성·부호수·가역성은 검사하지 않는다. 가역성 문제는 유도 단계에서
    /// `Error::SingularMetric`으로 드러난다.
    pub fn new(coordinates: Vec<Symbol>, components: Array2<Expr>) -> Result<Self> {
        let n = coordinates.len();
        if n == 0 {
            return Err(Error::Shape("metric needs at least one coordinate".into()));
        }
        for (i, c) in coordinates.iter().enumerate() {
            if coordinates[..i].contains(c) {
                return Err(Error::DuplicateCoordinate(c.to_string()));
            }
        }
        if components.shape() != [n, n] {
            return Err(Error::Shape(format!(
                "metric is {:?} but there are {n} coordinates",
                components.shape()
            )));
        }
        Ok(Metric {
            coordinates,
            components,
            inverse: OnceCell::new(),
        })
    }

    /// 행 목록으로 계량 생성 (각 행 길이가 좌표 수와 같아야 함)
    pub fn from_rows(coordinates: Vec<Symbol>, rows: Vec<Vec<Expr>>) -> Result<Self> {
        let n = coordinates.len();
        if rows.len() != n || rows.iter().any(|row| row.len() != n) {
            let lens: Vec<usize> = rows.iter().map(Vec::len).collect();
            return Err(Error::Shape(format!(
                "expected {n}x{n} rows for {n} coordinates, got row lengths {lens:?}"
            )));
        }
        let flat: Vec<Expr> = rows.into_iter().flatten().collect();
        let components = Array2::from_shape_vec((n, n), flat)
            .map_err(|e| Error::Shape(e.to_string()))?;
        Metric::new(coordinates, components)
    }

    pub fn dims(&self) -> usize {
        self.coordinates.len()
    }

    pub fn coordinates(&self) -> &[Symbol] {
        &self.coordinates
    }

    pub fn components(&self) -> &Array2<Expr> {
        &self.components
    }

    pub fn component(&self, i: usize, j: usize) -> &Expr {
        &self.components[[i, j]]
    }

    pub fn is_diagonal(&self) -> bool {
        self.components
            .indexed_iter()
            .all(|((i, j), g)| i == j || g.is_zero())
    }

    /// 역계량 g^{ij}
    pub fn inverse(&self) -> Result<&Array2<Expr>> {
        self.inverse.get_or_try_init(|| self.compute_inverse())
    }

    /// ∂_k g_{ij}, 인덱스 순서 `[k, i, j]`
    pub fn derivatives(&self) -> Array3<Expr> {
        let n = self.dims();
        Array3::from_shape_fn((n, n, n), |(k, i, j)| {
            self.components[[i, j]].diff(&self.coordinates[k])
        })
    }

    fn compute_inverse(&self) -> Result<Array2<Expr>> {
        let n = self.dims();
        if self.is_diagonal() {
            let mut inv = Array2::from_elem((n, n), Expr::zero());
            for i in 0..n {
                inv[[i, i]] = self.components[[i, i]]
                    .recip()
                    .map_err(|_| Error::SingularMetric { column: i })?;
            }
            return Ok(inv);
        }

        // 유리함수 체 위의 가우스-조던 소거
        let mut a = self.components.clone();
        let mut inv = Array2::from_shape_fn((n, n), |(i, j)| {
            if i == j {
                Expr::one()
            } else {
                Expr::zero()
            }
        });
        for col in 0..n {
            let pivot = (col..n)
                .find(|&row| !a[[row, col]].is_zero())
                .ok_or(Error::SingularMetric { column: col })?;
            if pivot != col {
                for j in 0..n {
                    a.swap([pivot, j], [col, j]);
                    inv.swap([pivot, j], [col, j]);
                }
            }
            let scale = a[[col, col]].recip()?;
            for j in 0..n {
                a[[col, j]] = &a[[col, j]] * &scale;
                inv[[col, j]] = &inv[[col, j]] * &scale;
            }
            for row in 0..n {
                if row == col || a[[row, col]].is_zero() {
                    continue;
                }
                let factor = a[[row, col]].clone();
                for j in 0..n {
                    a[[row, j]] = &a[[row, j]] - &(&factor * &a[[col, j]]);
                    inv[[row, j]] = &inv[[row, j]] - &(&factor * &inv[[col, j]]);
                }
            }
        }
        Ok(inv)
    }
}

/// 16개(일반적으로 n²개) 성분을 모두 명시해야만 완성되는 계량 조립기
///
/// 빠진 성분은 `build` 시점에 `Error::IncompleteMetric`으로 거부된다.
#[derive(Debug, Clone)]
pub struct MetricBuilder {
    coordinates: Vec<Symbol>,
    entries: Array2<Option<Expr>>,
}

impl MetricBuilder {
    pub fn new(coordinates: Vec<Symbol>) -> Self {
        let n = coordinates.len();
        MetricBuilder {
            coordinates,
            entries: Array2::from_elem((n, n), None),
        }
    }

    fn check(&self, i: usize, j: usize) -> Result<()> {
        let n = self.coordinates.len();
        if i >= n || j >= n {
            return Err(Error::Shape(format!(
                "entry ({i}, {j}) outside a {n}x{n} metric"
            )));
        }
        Ok(())
    }

    /// g_{ij} 한 성분 지정
    pub fn entry(mut self, i: usize, j: usize, value: Expr) -> Result<Self> {
        self.check(i, j)?;
        self.entries[[i, j]] = Some(value);
        Ok(self)
    }

    /// g_{ij} = g_{ji} 동시 지정
    pub fn symmetric_entry(self, i: usize, j: usize, value: Expr) -> Result<Self> {
        let this = self.entry(i, j, value.clone())?;
        this.entry(j, i, value)
    }

    /// 대각 성분을 지정하고 나머지를 모두 0으로 명시
    pub fn diagonal(mut self, diag: Vec<Expr>) -> Result<Self> {
        let n = self.coordinates.len();
        if diag.len() != n {
            return Err(Error::Shape(format!(
                "diagonal has {} entries for {n} coordinates",
                diag.len()
            )));
        }
        for (i, d) in diag.into_iter().enumerate() {
            for j in 0..n {
                self.entries[[i, j]] = Some(if i == j { d.clone() } else { Expr::zero() });
            }
        }
        Ok(self)
    }

    pub fn build(self) -> Result<Metric> {
        if let Some(((row, col), _)) = self.entries.indexed_iter().find(|(_, e)| e.is_none()) {
            return Err(Error::IncompleteMetric { row, col });
        }
        let components = self.entries.mapv(|e| e.unwrap_or_default());
        Metric::new(self.coordinates, components)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbolic::{parse, symbols};

    fn sphere(radius: &str) -> Metric {
        let coords = symbols("theta phi");
        let rho = parse(radius).unwrap();
        MetricBuilder::new(coords)
            .diagonal(vec![
                rho.pow(2).unwrap(),
                rho.pow(2).unwrap() * parse("sin(theta)^2").unwrap(),
            ])
            .unwrap()
            .build()
            .unwrap()
    }

    #[test]
    fn builder_rejects_missing_entries() {
        let err = MetricBuilder::new(symbols("t x"))
            .entry(0, 0, Expr::integer(-1))
            .unwrap()
            .entry(1, 1, Expr::one())
            .unwrap()
            .entry(0, 1, Expr::zero())
            .unwrap()
            .build()
            .unwrap_err();
        assert!(matches!(err, Error::IncompleteMetric { row: 1, col: 0 }));
    }

    #[test]
    fn shape_and_duplicate_coordinates_are_rejected() {
        let rows = vec![vec![Expr::one(), Expr::zero()], vec![Expr::zero()]];
        assert!(matches!(
            Metric::from_rows(symbols("t x"), rows),
            Err(Error::Shape(_))
        ));
        let dup = Metric::from_rows(
            symbols("x x"),
            vec![vec![Expr::one(), Expr::zero()], vec![Expr::zero(), Expr::one()]],
        );
        assert!(matches!(dup, Err(Error::DuplicateCoordinate(_))));
    }

    #[test]
    fn diagonal_inverse_is_reciprocal() {
        let g = sphere("R");
        let inv = g.inverse().unwrap();
        let expected = parse("1/(R^2*sin(theta)^2)").unwrap();
        assert!(inv[[1, 1]].equivalent(&expected));
        assert!(inv[[0, 1]].is_zero());
    }

    #[test]
    fn gauss_jordan_inverts_off_diagonal_metric() {
        let coords = symbols("u v");
        let g = Metric::from_rows(
            coords,
            vec![
                vec![parse("0").unwrap(), parse("x").unwrap()],
                vec![parse("x").unwrap(), parse("1").unwrap()],
            ],
        )
        .unwrap();
        let inv = g.inverse().unwrap();
        // g · g⁻¹ = I
        for i in 0..2 {
            for j in 0..2 {
                let mut sum = Expr::zero();
                for k in 0..2 {
                    sum = sum + g.component(i, k) * &inv[[k, j]];
                }
                let id = if i == j { Expr::one() } else { Expr::zero() };
                assert!(sum.equivalent(&id), "entry ({i}, {j})");
            }
        }
    }

    #[test]
    fn singular_metric_is_reported() {
        let g = Metric::from_rows(
            symbols("u v"),
            vec![
                vec![parse("r").unwrap(), parse("r").unwrap()],
                vec![parse("r").unwrap(), parse("r").unwrap()],
            ],
        )
        .unwrap();
        assert!(matches!(g.inverse(), Err(Error::SingularMetric { column: 1 })));
    }
}
