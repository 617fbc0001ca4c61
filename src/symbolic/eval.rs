//! 기호식의 수치 평가
//!
//! 측지선 적분처럼 같은 식을 수천 번 평가할 때는 `Expr::compile`로
//! 계수를 `f64`로 미리 바꾸고 파라미터 기호를 상수로 접어 둔다.

use std::collections::HashMap;

use num::ToPrimitive;

use super::atom::{Atom, Symbol};
use super::expr::Expr;
use super::poly::Polynomial;
use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy)]
enum Slot {
    Var(usize),
    Sin(usize),
    Cos(usize),
}

#[derive(Debug, Clone)]
struct Term {
    coeff: f64,
    factors: Vec<(Slot, i32)>,
}

/// 좌표 값 배열만으로 평가 가능한 컴파일된 식
#[derive(Debug, Clone)]
pub struct CompiledExpr {
    num: Vec<Term>,
    den: Vec<(Vec<Term>, i32)>,
}

impl CompiledExpr {
    /// `x[i]`는 컴파일 시 넘긴 `vars[i]`의 값
    pub fn eval(&self, x: &[f64]) -> f64 {
        let mut value = eval_terms(&self.num, x);
        for (factor, exp) in &self.den {
            value /= eval_terms(factor, x).powi(*exp);
        }
        value
    }
}

fn eval_terms(terms: &[Term], x: &[f64]) -> f64 {
    terms
        .iter()
        .map(|term| {
            term.factors.iter().fold(term.coeff, |acc, (slot, exp)| {
                let base = match *slot {
                    Slot::Var(i) => x[i],
                    Slot::Sin(i) => x[i].sin(),
                    Slot::Cos(i) => x[i].cos(),
                };
                acc * base.powi(*exp)
            })
        })
        .sum()
}

fn compile_poly(
    poly: &Polynomial,
    vars: &[Symbol],
    params: &HashMap<Symbol, f64>,
) -> Result<Vec<Term>> {
    let mut terms = Vec::with_capacity(poly.len());
    for (mono, coeff) in poly.terms() {
        let mut coeff = coeff
            .to_f64()
            .ok_or_else(|| Error::Numerical(format!("coefficient {coeff} out of f64 range")))?;
        let mut factors = Vec::new();
        for (atom, exp) in mono.iter() {
            let exp = *exp as i32;
            let (arg, wrap): (&Symbol, fn(usize) -> Slot) = match atom {
                Atom::Symbol(s) => (s, Slot::Var),
                Atom::Sin(s) => (s, Slot::Sin),
                Atom::Cos(s) => (s, Slot::Cos),
                Atom::Function { name, arg, .. } => {
                    return Err(Error::UnboundSymbol(format!("{name}({arg})")))
                }
            };
            if let Some(i) = vars.iter().position(|v| v == arg) {
                factors.push((wrap(i), exp));
                continue;
            }
            let value = *params
                .get(arg)
                .ok_or_else(|| Error::UnboundSymbol(arg.to_string()))?;
            let base = match atom {
                Atom::Sin(_) => value.sin(),
                Atom::Cos(_) => value.cos(),
                _ => value,
            };
            coeff *= base.powi(exp);
        }
        terms.push(Term { coeff, factors });
    }
    Ok(terms)
}

impl Expr {
    /// `vars`는 평가 때 값이 바뀌는 기호, `params`는 상수로 접을 기호
    pub fn compile(&self, vars: &[Symbol], params: &HashMap<Symbol, f64>) -> Result<CompiledExpr> {
        let num = compile_poly(self.numerator(), vars, params)?;
        let den = self
            .denominator()
            .iter()
            .map(|(f, e)| Ok((compile_poly(f, vars, params)?, *e as i32)))
            .collect::<Result<Vec<_>>>()?;
        Ok(CompiledExpr { num, den })
    }

    /// 모든 기호에 값이 주어진 경우의 수치 값
    pub fn eval(&self, env: &HashMap<Symbol, f64>) -> Result<f64> {
        Ok(self.compile(&[], env)?.eval(&[]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbolic::parse;

    #[test]
    fn evaluates_with_bound_parameters() {
        let e = parse("-(1 - 2*M/r)").unwrap();
        let env = HashMap::from([(Symbol::new("M"), 1.0), (Symbol::new("r"), 4.0)]);
        assert!((e.eval(&env).unwrap() + 0.5).abs() < 1e-12);
    }

    #[test]
    fn compiled_form_tracks_variables() {
        let e = parse("r^2*sin(theta)^2 + a").unwrap();
        let vars = [Symbol::new("r"), Symbol::new("theta")];
        let params = HashMap::from([(Symbol::new("a"), 0.5)]);
        let compiled = e.compile(&vars, &params).unwrap();
        let v = compiled.eval(&[2.0, std::f64::consts::FRAC_PI_2]);
        assert!((v - 4.5).abs() < 1e-12);
    }

    #[test]
    fn unbound_symbols_are_reported() {
        let e = parse("A(r) + M").unwrap();
        let env = HashMap::from([(Symbol::new("r"), 1.0), (Symbol::new("M"), 1.0)]);
        assert!(matches!(e.eval(&env), Err(Error::UnboundSymbol(_))));
    }
}
