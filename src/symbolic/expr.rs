//! 유리함수 형태의 기호식
//!
//! `Expr`는 (삼각 정규화된 분자 다항식) / (정규화된 인수들의 거듭제곱 곱)이다.
//! 분모를 인수분해된 상태로 유지하기 때문에 통분 시 다항식 gcd 없이도
//! 식이 불필요하게 커지지 않는다. 0 판정은 분자가 0 다항식인지로
//! 정확하게 이루어진다.

use std::collections::BTreeSet;
use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};

use num::{BigInt, BigRational, One};

use super::atom::{Atom, Symbol};
use super::latex;
use super::poly::Polynomial;
use crate::error::{Error, Result};

type Factors = Vec<(Polynomial, u32)>;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Expr {
    num: Polynomial,
    /// 정렬되고 중복 없는 분모 인수. 각 인수는 원시(primitive)이고
    /// 선두 계수가 양수이며 상수가 아니다.
    den: Factors,
}

impl Default for Expr {
    fn default() -> Self {
        Expr::zero()
    }
}

impl Expr {
    pub fn zero() -> Self {
        Expr {
            num: Polynomial::zero(),
            den: Vec::new(),
        }
    }

    pub fn one() -> Self {
        Expr::integer(1)
    }

    pub fn integer(v: i64) -> Self {
        Expr::from_rational(BigRational::from_integer(BigInt::from(v)))
    }

    /// `numer / denom` 유리수 상수. `denom`이 0이면 `Error::DivisionByZero`.
    pub fn rational(numer: i64, denom: i64) -> Result<Self> {
        if denom == 0 {
            return Err(Error::DivisionByZero);
        }
        Ok(Expr::from_rational(BigRational::new(
            BigInt::from(numer),
            BigInt::from(denom),
        )))
    }

    pub fn from_rational(c: BigRational) -> Self {
        Expr::from_polynomial(Polynomial::constant(c))
    }

    pub fn from_polynomial(p: Polynomial) -> Self {
        Expr {
            num: p.reduce_trig(),
            den: Vec::new(),
        }
    }

    pub fn symbol(s: &Symbol) -> Self {
        Expr::from_polynomial(Polynomial::atom(Atom::Symbol(s.clone())))
    }

    pub fn sin(s: &Symbol) -> Self {
        Expr::from_polynomial(Polynomial::atom(Atom::Sin(s.clone())))
    }

    pub fn cos(s: &Symbol) -> Self {
        Expr::from_polynomial(Polynomial::atom(Atom::Cos(s.clone())))
    }

    /// 미정 함수 `name(arg)`
    pub fn function(name: &str, arg: &Symbol) -> Self {
        Expr::from_polynomial(Polynomial::atom(Atom::function(name, arg)))
    }

    pub fn is_zero(&self) -> bool {
        self.num.is_zero()
    }

    /// 상수식이면 그 값
    pub fn as_constant(&self) -> Option<BigRational> {
        if self.den.is_empty() {
            self.num.as_constant()
        } else {
            None
        }
    }

    pub fn numerator(&self) -> &Polynomial {
        &self.num
    }

    pub fn denominator(&self) -> &[(Polynomial, u32)] {
        &self.den
    }

    /// 두 식이 같은 함수를 나타내는지 (차이가 정확히 0인지)
    pub fn equivalent(&self, other: &Expr) -> bool {
        (self - other).is_zero()
    }

    pub fn free_symbols(&self) -> BTreeSet<Symbol> {
        let mut out = BTreeSet::new();
        let polys = std::iter::once(&self.num).chain(self.den.iter().map(|(f, _)| f));
        for poly in polys {
            for atom in poly.atoms() {
                out.insert(atom.argument().clone());
            }
        }
        out
    }

    pub fn atoms(&self) -> Vec<Atom> {
        let mut atoms = self.num.atoms();
        for (f, _) in &self.den {
            atoms.extend(f.atoms());
        }
        atoms.sort();
        atoms.dedup();
        atoms
    }

    /// 분모 인수로 나누어떨어지는 분자를 다시 약분한 정규형
    pub fn simplify(&self) -> Expr {
        Expr::normalized(self.num.clone(), self.den.clone())
    }

    pub fn to_latex(&self) -> String {
        latex::expr_to_latex(self)
    }

    pub fn try_div(&self, rhs: &Expr) -> Result<Expr> {
        Ok(self * &rhs.recip()?)
    }

    /// 역수
    pub fn recip(&self) -> Result<Expr> {
        if self.is_zero() {
            return Err(Error::DivisionByZero);
        }
        let mut num = Polynomial::one();
        for (f, e) in &self.den {
            num = &num * &f.pow(*e);
        }
        let mut den = Vec::new();
        let unit = split_into_factors(&self.num, 1, &mut den);
        Ok(Expr::normalized(num.scale(&unit.recip()), den))
    }

    /// 정수 거듭제곱 (음수 지수는 역수를 거친다)
    pub fn pow(&self, exp: i32) -> Result<Expr> {
        if exp < 0 {
            return self.recip()?.pow(-exp);
        }
        let exp = exp as u32;
        if exp == 0 {
            return Ok(Expr::one());
        }
        let num = self.num.pow(exp).reduce_trig();
        let den = self.den.iter().map(|(f, e)| (f.clone(), e * exp)).collect();
        Ok(Expr { num, den })
    }

    /// `x`에 대한 편미분
    pub fn diff(&self, x: &Symbol) -> Expr {
        let d_num = self.num.derivative(x);
        let moving: Vec<(usize, Polynomial)> = self
            .den
            .iter()
            .enumerate()
            .filter(|(_, (f, _))| f.depends_on(x))
            .map(|(i, (f, _))| (i, f.derivative(x)))
            .collect();
        if moving.is_empty() {
            return Expr::normalized(d_num.reduce_trig(), self.den.clone());
        }

        // (N / Π f^e)' = (N' Π f − N Σ e_k f_k' Π_{j≠k} f_j) / (Π f^e · Π f)
        let product_except = |skip: Option<usize>| {
            moving
                .iter()
                .filter(|(i, _)| Some(*i) != skip)
                .fold(Polynomial::one(), |acc, (i, _)| &acc * &self.den[*i].0)
        };
        let mut num = &d_num * &product_except(None);
        for (i, df) in &moving {
            let e = BigRational::from_integer(BigInt::from(self.den[*i].1));
            let term = &(&self.num * df) * &product_except(Some(*i));
            num = &num - &term.scale(&e);
        }
        let mut den = self.den.clone();
        for (i, _) in &moving {
            den[*i].1 += 1;
        }
        Expr::normalized(num.reduce_trig(), den)
    }

    /// 분모 인수로 가능한 만큼 분자를 약분
    fn normalized(num: Polynomial, den: Factors) -> Expr {
        if num.is_zero() {
            return Expr::zero();
        }
        let (num, den) = cancel(num, den);
        Expr { num, den }
    }
}

/// 분자를 분모 인수로 나누어떨어지는 만큼 약분
fn cancel(mut num: Polynomial, den: Factors) -> (Polynomial, Factors) {
    let mut kept = Vec::with_capacity(den.len());
    for (factor, mut exp) in den {
        while exp > 0 {
            match num.exact_div(&factor) {
                Some(q) => {
                    num = q.reduce_trig();
                    exp -= 1;
                }
                None => break,
            }
        }
        if exp > 0 {
            kept.push((factor, exp));
        }
    }
    (num, kept)
}

/// `p^exp`를 정규화된 분모 인수들로 쪼개 `den`에 넣고, 남는 유리수 배수를 반환
///
/// p = unit · (단항식) · rest 로 분해하며, 단항식의 각 원자와 rest가
/// 각각 하나의 인수가 된다.
fn split_into_factors(p: &Polynomial, exp: u32, den: &mut Factors) -> BigRational {
    let mono = p.monomial_content();
    let mut rest = p.clone();
    if !mono.is_one() {
        rest = rest.exact_div(&Polynomial::term(mono.clone(), BigRational::one())).unwrap_or(rest);
    }
    let mut unit = rest.content();
    if rest.leading_is_negative() {
        unit = -unit;
    }
    let rest = rest.scale(&unit.recip());

    for (atom, e) in mono.iter() {
        insert_factor(den, Polynomial::atom(atom.clone()), e * exp);
    }
    match rest.as_constant() {
        Some(_) => {}
        None => insert_factor(den, rest, exp),
    }
    let mut total = BigRational::one();
    for _ in 0..exp {
        total *= &unit;
    }
    total
}

fn insert_factor(den: &mut Factors, factor: Polynomial, exp: u32) {
    if exp == 0 {
        return;
    }
    match den.binary_search_by(|(f, _)| f.cmp(&factor)) {
        Ok(i) => den[i].1 += exp,
        Err(i) => den.insert(i, (factor, exp)),
    }
}

/// 두 분모의 최소공배수와 각 분모를 그것으로 올리는 보정 다항식
fn lcm_factors(a: &Factors, b: &Factors) -> (Factors, Polynomial, Polynomial) {
    let mut lcm = Vec::with_capacity(a.len() + b.len());
    let mut fix_a = Polynomial::one();
    let mut fix_b = Polynomial::one();
    let (mut i, mut j) = (0, 0);
    while i < a.len() || j < b.len() {
        let ord = match (a.get(i), b.get(j)) {
            (Some((fa, _)), Some((fb, _))) => fa.cmp(fb),
            (Some(_), None) => std::cmp::Ordering::Less,
            _ => std::cmp::Ordering::Greater,
        };
        match ord {
            std::cmp::Ordering::Less => {
                let (f, e) = &a[i];
                fix_b = &fix_b * &f.pow(*e);
                lcm.push((f.clone(), *e));
                i += 1;
            }
            std::cmp::Ordering::Greater => {
                let (f, e) = &b[j];
                fix_a = &fix_a * &f.pow(*e);
                lcm.push((f.clone(), *e));
                j += 1;
            }
            std::cmp::Ordering::Equal => {
                let (f, ea) = &a[i];
                let eb = b[j].1;
                let e = (*ea).max(eb);
                fix_a = &fix_a * &f.pow(e - ea);
                fix_b = &fix_b * &f.pow(e - eb);
                lcm.push((f.clone(), e));
                i += 1;
                j += 1;
            }
        }
    }
    (lcm, fix_a, fix_b)
}

fn merge_product(a: &Factors, b: &Factors) -> Factors {
    let mut out = a.clone();
    for (f, e) in b {
        insert_factor(&mut out, f.clone(), *e);
    }
    out
}

impl Add for &Expr {
    type Output = Expr;

    fn add(self, rhs: &Expr) -> Expr {
        if self.is_zero() {
            return rhs.clone();
        }
        if rhs.is_zero() {
            return self.clone();
        }
        if self.den.is_empty() && rhs.den.is_empty() {
            return Expr::from_polynomial(&self.num + &rhs.num);
        }
        let (den, fix_a, fix_b) = lcm_factors(&self.den, &rhs.den);
        let num = &(&self.num * &fix_a) + &(&rhs.num * &fix_b);
        Expr::normalized(num.reduce_trig(), den)
    }
}

impl Sub for &Expr {
    type Output = Expr;

    fn sub(self, rhs: &Expr) -> Expr {
        self + &(-rhs)
    }
}

impl Mul for &Expr {
    type Output = Expr;

    fn mul(self, rhs: &Expr) -> Expr {
        if self.is_zero() || rhs.is_zero() {
            return Expr::zero();
        }
        // 곱하기 전에 교차 약분해서 분자를 작게 유지
        let (lhs_num, rhs_den) = cancel(self.num.clone(), rhs.den.clone());
        let (rhs_num, lhs_den) = cancel(rhs.num.clone(), self.den.clone());
        let num = (&lhs_num * &rhs_num).reduce_trig();
        Expr::normalized(num, merge_product(&lhs_den, &rhs_den))
    }
}

impl Neg for &Expr {
    type Output = Expr;

    fn neg(self) -> Expr {
        Expr {
            num: -&self.num,
            den: self.den.clone(),
        }
    }
}

macro_rules! forward_owned_binop {
    ($($trait:ident :: $method:ident),*) => {$(
        impl $trait for Expr {
            type Output = Expr;
            fn $method(self, rhs: Expr) -> Expr {
                (&self).$method(&rhs)
            }
        }

        impl $trait<&Expr> for Expr {
            type Output = Expr;
            fn $method(self, rhs: &Expr) -> Expr {
                (&self).$method(rhs)
            }
        }

        impl $trait<Expr> for &Expr {
            type Output = Expr;
            fn $method(self, rhs: Expr) -> Expr {
                self.$method(&rhs)
            }
        }
    )*};
}

forward_owned_binop!(Add::add, Sub::sub, Mul::mul);

impl Neg for Expr {
    type Output = Expr;

    fn neg(self) -> Expr {
        -&self
    }
}

impl From<i64> for Expr {
    fn from(v: i64) -> Self {
        Expr::integer(v)
    }
}

impl From<&Symbol> for Expr {
    fn from(s: &Symbol) -> Self {
        Expr::symbol(s)
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_latex())
    }
}
