//! 유리수 계수 다변수 다항식

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::ops::{Add, Mul, Neg, Sub};

use num::{BigInt, BigRational, Integer, One, Signed, Zero};

use super::atom::{Atom, Symbol};

/// 원자들의 거듭제곱 곱
///
/// 순서는 graded-lex: 총 차수가 먼저, 같으면 `Atom` 순서상 앞선 원자의
/// 지수가 큰 쪽이 크다. 곱셈과 양립하는 단항식 순서이므로 나눗셈의
/// 선두항 계산에 그대로 쓸 수 있다.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Monomial(BTreeMap<Atom, u32>);

impl Monomial {
    pub fn one() -> Self {
        Monomial(BTreeMap::new())
    }

    pub fn atom(atom: Atom, exp: u32) -> Self {
        let mut map = BTreeMap::new();
        if exp > 0 {
            map.insert(atom, exp);
        }
        Monomial(map)
    }

    pub fn is_one(&self) -> bool {
        self.0.is_empty()
    }

    pub fn degree(&self) -> u32 {
        self.0.values().sum()
    }

    pub fn exponent(&self, atom: &Atom) -> u32 {
        self.0.get(atom).copied().unwrap_or(0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Atom, &u32)> {
        self.0.iter()
    }

    pub fn atom_count(&self) -> usize {
        self.0.len()
    }

    pub fn mul(&self, other: &Monomial) -> Monomial {
        let mut out = self.0.clone();
        for (atom, exp) in &other.0 {
            *out.entry(atom.clone()).or_insert(0) += exp;
        }
        Monomial(out)
    }

    /// `other`가 나누어떨어질 때만 몫을 반환
    pub fn checked_div(&self, other: &Monomial) -> Option<Monomial> {
        let mut out = self.0.clone();
        for (atom, exp) in &other.0 {
            let have = out.get_mut(atom)?;
            match (*have).cmp(exp) {
                Ordering::Less => return None,
                Ordering::Equal => {
                    out.remove(atom);
                }
                Ordering::Greater => *have -= exp,
            }
        }
        Some(Monomial(out))
    }

    /// 공통 인수 (지수의 최솟값)
    pub fn gcd(&self, other: &Monomial) -> Monomial {
        let map = self
            .0
            .iter()
            .filter_map(|(atom, exp)| {
                let e = (*exp).min(other.exponent(atom));
                (e > 0).then(|| (atom.clone(), e))
            })
            .collect();
        Monomial(map)
    }

    fn depends_on(&self, x: &Symbol) -> bool {
        self.0.keys().any(|a| a.depends_on(x))
    }

    /// 지수가 2 이상인 첫 번째 `cos` 원자
    fn cos_squared(&self) -> Option<&Symbol> {
        self.0.iter().find_map(|(atom, exp)| match atom {
            Atom::Cos(s) if *exp >= 2 => Some(s),
            _ => None,
        })
    }

    fn lex_cmp(&self, other: &Monomial) -> Ordering {
        let mut lhs = self.0.iter().peekable();
        let mut rhs = other.0.iter().peekable();
        loop {
            match (lhs.peek(), rhs.peek()) {
                (None, None) => return Ordering::Equal,
                (Some(_), None) => return Ordering::Greater,
                (None, Some(_)) => return Ordering::Less,
                (Some((ka, ea)), Some((kb, eb))) => match ka.cmp(kb) {
                    Ordering::Less => return Ordering::Greater,
                    Ordering::Greater => return Ordering::Less,
                    Ordering::Equal => match ea.cmp(eb) {
                        Ordering::Equal => {
                            lhs.next();
                            rhs.next();
                        }
                        ord => return ord,
                    },
                },
            }
        }
    }
}

impl Ord for Monomial {
    fn cmp(&self, other: &Self) -> Ordering {
        self.degree()
            .cmp(&other.degree())
            .then_with(|| self.lex_cmp(other))
    }
}

impl PartialOrd for Monomial {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// 단항식 → 계수 사상으로 표현된 다항식 (계수 0인 항은 저장하지 않음)
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Polynomial {
    terms: BTreeMap<Monomial, BigRational>,
}

impl Polynomial {
    pub fn zero() -> Self {
        Polynomial::default()
    }

    pub fn one() -> Self {
        Polynomial::constant(BigRational::one())
    }

    pub fn constant(c: BigRational) -> Self {
        Polynomial::term(Monomial::one(), c)
    }

    pub fn atom(atom: Atom) -> Self {
        Polynomial::term(Monomial::atom(atom, 1), BigRational::one())
    }

    pub fn term(mono: Monomial, coeff: BigRational) -> Self {
        let mut p = Polynomial::zero();
        p.add_term(mono, coeff);
        p
    }

    pub fn is_zero(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// 상수 다항식이면 그 값
    pub fn as_constant(&self) -> Option<BigRational> {
        match self.terms.len() {
            0 => Some(BigRational::zero()),
            1 => self
                .terms
                .iter()
                .next()
                .filter(|(m, _)| m.is_one())
                .map(|(_, c)| c.clone()),
            _ => None,
        }
    }

    /// 단항식 순서상 가장 큰 항
    pub fn leading(&self) -> Option<(&Monomial, &BigRational)> {
        self.terms.iter().next_back()
    }

    pub fn terms(&self) -> impl DoubleEndedIterator<Item = (&Monomial, &BigRational)> {
        self.terms.iter()
    }

    pub fn degree(&self) -> u32 {
        self.leading().map(|(m, _)| m.degree()).unwrap_or(0)
    }

    pub fn add_term(&mut self, mono: Monomial, coeff: BigRational) {
        if coeff.is_zero() {
            return;
        }
        match self.terms.get_mut(&mono) {
            Some(c) => {
                *c += coeff;
                if c.is_zero() {
                    self.terms.remove(&mono);
                }
            }
            None => {
                self.terms.insert(mono, coeff);
            }
        }
    }

    pub fn scale(&self, factor: &BigRational) -> Polynomial {
        if factor.is_zero() {
            return Polynomial::zero();
        }
        Polynomial {
            terms: self
                .terms
                .iter()
                .map(|(m, c)| (m.clone(), c * factor))
                .collect(),
        }
    }

    pub fn mul_term(&self, mono: &Monomial, coeff: &BigRational) -> Polynomial {
        if coeff.is_zero() {
            return Polynomial::zero();
        }
        Polynomial {
            terms: self
                .terms
                .iter()
                .map(|(m, c)| (m.mul(mono), c * coeff))
                .collect(),
        }
    }

    pub fn pow(&self, exp: u32) -> Polynomial {
        let mut out = Polynomial::one();
        for _ in 0..exp {
            out = &out * self;
        }
        out
    }

    pub fn depends_on(&self, x: &Symbol) -> bool {
        self.terms.keys().any(|m| m.depends_on(x))
    }

    /// 모든 원자 (중복 없이, 순서대로)
    pub fn atoms(&self) -> Vec<Atom> {
        let mut atoms: Vec<Atom> = self
            .terms
            .keys()
            .flat_map(|m| m.iter().map(|(a, _)| a.clone()))
            .collect();
        atoms.sort();
        atoms.dedup();
        atoms
    }

    /// `x`에 대한 편미분 (곱의 법칙)
    pub fn derivative(&self, x: &Symbol) -> Polynomial {
        let mut out = Polynomial::zero();
        for (mono, coeff) in &self.terms {
            for (atom, exp) in mono.iter() {
                let d_atom = atom.derivative(x);
                if d_atom.is_zero() {
                    continue;
                }
                let rest = mono
                    .checked_div(&Monomial::atom(atom.clone(), 1))
                    .unwrap_or_default();
                let factor = coeff * BigRational::from_integer(BigInt::from(*exp));
                for (dm, dc) in d_atom.terms() {
                    out.add_term(rest.mul(dm), &factor * dc);
                }
            }
        }
        out
    }

    /// `cos²x → 1 − sin²x` 치환으로 cos 지수를 1 이하로 낮춘 정규형
    pub fn reduce_trig(&self) -> Polynomial {
        if !self.terms.keys().any(|m| m.cos_squared().is_some()) {
            return self.clone();
        }
        let mut out = Polynomial::zero();
        let mut work: Vec<(Monomial, BigRational)> = self
            .terms
            .iter()
            .map(|(m, c)| (m.clone(), c.clone()))
            .collect();
        while let Some((mono, coeff)) = work.pop() {
            let Some(s) = mono.cos_squared().cloned() else {
                out.add_term(mono, coeff);
                continue;
            };
            let base = mono
                .checked_div(&Monomial::atom(Atom::Cos(s.clone()), 2))
                .unwrap_or_default();
            let with_sin = base.mul(&Monomial::atom(Atom::Sin(s), 2));
            work.push((with_sin, -coeff.clone()));
            work.push((base, coeff));
        }
        out
    }

    /// 자유 다항식환에서의 정확한 나눗셈. 나머지가 생기면 `None`.
    pub fn exact_div(&self, divisor: &Polynomial) -> Option<Polynomial> {
        let (lead_mono, lead_coeff) = divisor.leading()?;
        if self.is_zero() {
            return Some(Polynomial::zero());
        }
        if divisor.degree() > self.degree() {
            return None;
        }
        let mut rem = self.clone();
        let mut quotient = Polynomial::zero();
        while let Some((mono, coeff)) = rem.leading() {
            let q_mono = mono.checked_div(lead_mono)?;
            let q_coeff = coeff / lead_coeff;
            let sub = divisor.mul_term(&q_mono, &q_coeff);
            rem = &rem - &sub;
            quotient.add_term(q_mono, q_coeff);
        }
        Some(quotient)
    }

    /// 양의 유리수 내용(content): 분자들의 gcd / 분모들의 lcm
    pub fn content(&self) -> BigRational {
        if self.is_zero() {
            return BigRational::one();
        }
        let mut numer = BigInt::zero();
        let mut denom = BigInt::one();
        for c in self.terms.values() {
            numer = numer.gcd(c.numer());
            denom = denom.lcm(c.denom());
        }
        BigRational::new(numer, denom)
    }

    /// 모든 항의 공통 단항식 인수
    pub fn monomial_content(&self) -> Monomial {
        let mut keys = self.terms.keys();
        let Some(first) = keys.next() else {
            return Monomial::one();
        };
        keys.fold(first.clone(), |acc, m| acc.gcd(m))
    }

    /// 계수 분모들의 최소공배수
    pub fn denominator_lcm(&self) -> BigInt {
        self.terms
            .values()
            .fold(BigInt::one(), |acc, c| acc.lcm(c.denom()))
    }

    /// 선두 계수가 음수인지
    pub fn leading_is_negative(&self) -> bool {
        self.leading().map(|(_, c)| c.is_negative()).unwrap_or(false)
    }
}

impl Add for &Polynomial {
    type Output = Polynomial;

    fn add(self, rhs: &Polynomial) -> Polynomial {
        let mut out = self.clone();
        for (m, c) in &rhs.terms {
            out.add_term(m.clone(), c.clone());
        }
        out
    }
}

impl Sub for &Polynomial {
    type Output = Polynomial;

    fn sub(self, rhs: &Polynomial) -> Polynomial {
        let mut out = self.clone();
        for (m, c) in &rhs.terms {
            out.add_term(m.clone(), -c.clone());
        }
        out
    }
}

impl Mul for &Polynomial {
    type Output = Polynomial;

    fn mul(self, rhs: &Polynomial) -> Polynomial {
        let mut out = Polynomial::zero();
        for (ma, ca) in &self.terms {
            for (mb, cb) in &rhs.terms {
                out.add_term(ma.mul(mb), ca * cb);
            }
        }
        out
    }
}

impl Neg for &Polynomial {
    type Output = Polynomial;

    fn neg(self) -> Polynomial {
        Polynomial {
            terms: self
                .terms
                .iter()
                .map(|(m, c)| (m.clone(), -c.clone()))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sym(name: &str) -> Polynomial {
        Polynomial::atom(Atom::Symbol(Symbol::new(name)))
    }

    fn int(v: i64) -> BigRational {
        BigRational::from_integer(BigInt::from(v))
    }

    #[test]
    fn monomial_order_is_graded() {
        let r = Atom::Symbol(Symbol::new("r"));
        let m = Atom::Symbol(Symbol::new("M"));
        let r2 = Monomial::atom(r.clone(), 2);
        let mr = Monomial::atom(m.clone(), 1).mul(&Monomial::atom(r, 1));
        let m1 = Monomial::atom(m, 1);
        assert!(r2 > m1);
        assert!(mr > m1);
        assert!(Monomial::one() < m1);
    }

    #[test]
    fn exact_division_recovers_factor() {
        let r = sym("r");
        let m = sym("M");
        let f = &r - &m.scale(&int(2));
        let product = &(&r * &r) * &f;
        let q = product.exact_div(&f).expect("divisible");
        assert_eq!(q, &r * &r);
        assert!((&r + &m).exact_div(&f).is_none());
    }

    #[test]
    fn trig_reduction_collapses_pythagorean_identity() {
        let theta = Symbol::new("theta");
        let s = Polynomial::atom(Atom::Sin(theta.clone()));
        let c = Polynomial::atom(Atom::Cos(theta));
        let identity = &(&(&s * &s) + &(&c * &c)) - &Polynomial::one();
        assert!(identity.reduce_trig().is_zero());
    }

    #[test]
    fn content_and_monomial_content() {
        let r = sym("r");
        let p = &(&r * &r).scale(&int(6)) - &r.scale(&int(4));
        assert_eq!(p.content(), int(2));
        assert_eq!(p.monomial_content(), Monomial::atom(Atom::Symbol(Symbol::new("r")), 1));
    }

    #[test]
    fn derivative_uses_product_rule() {
        let x = Symbol::new("x");
        let px = sym("x");
        let p = &(&px * &px) * &px;
        assert_eq!(p.derivative(&x), (&px * &px).scale(&int(3)));
    }
}
