//! 기호(symbol)와 다항식의 기본 원자(atom) 정의

use std::fmt;
use std::sync::Arc;

use super::poly::Polynomial;

/// 이름으로 식별되는 기호 변수
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Symbol(Arc<str>);

impl Symbol {
    /// 새 기호 생성
    pub fn new(name: &str) -> Self {
        Symbol(Arc::from(name))
    }

    pub fn name(&self) -> &str {
        &self.0
    }

    /// LaTeX 표기 (그리스 문자, 숫자 첨자 처리)
    pub fn to_latex(&self) -> String {
        name_to_latex(&self.0)
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// 공백으로 구분된 이름들로 기호 목록 생성 (`symbols("t r theta phi")`)
pub fn symbols(names: &str) -> Vec<Symbol> {
    names.split_whitespace().map(Symbol::new).collect()
}

/// 다항식 변수로 쓰이는 원자
///
/// `sin`/`cos`와 미정 함수는 단일 기호만 인자로 받는다.
/// 서로 다른 원자는 대수적으로 독립이며, 유일한 관계식은
/// `sin²x + cos²x = 1`이다 (`Polynomial::reduce_trig` 참고).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Atom {
    Symbol(Symbol),
    Sin(Symbol),
    Cos(Symbol),
    /// 미정 함수 `name(arg)`의 `order`계 도함수
    Function {
        name: Arc<str>,
        arg: Symbol,
        order: u32,
    },
}

impl Atom {
    pub fn function(name: &str, arg: &Symbol) -> Self {
        Atom::Function {
            name: Arc::from(name),
            arg: arg.clone(),
            order: 0,
        }
    }

    /// 원자가 `x`에 의존하는지 여부
    pub fn depends_on(&self, x: &Symbol) -> bool {
        match self {
            Atom::Symbol(s) | Atom::Sin(s) | Atom::Cos(s) => s == x,
            Atom::Function { arg, .. } => arg == x,
        }
    }

    /// 원자의 인자 기호
    pub fn argument(&self) -> &Symbol {
        match self {
            Atom::Symbol(s) | Atom::Sin(s) | Atom::Cos(s) => s,
            Atom::Function { arg, .. } => arg,
        }
    }

    /// `x`에 대한 편미분
    pub fn derivative(&self, x: &Symbol) -> Polynomial {
        if !self.depends_on(x) {
            return Polynomial::zero();
        }
        match self {
            Atom::Symbol(_) => Polynomial::one(),
            Atom::Sin(s) => Polynomial::atom(Atom::Cos(s.clone())),
            Atom::Cos(s) => -&Polynomial::atom(Atom::Sin(s.clone())),
            Atom::Function { name, arg, order } => Polynomial::atom(Atom::Function {
                name: name.clone(),
                arg: arg.clone(),
                order: order + 1,
            }),
        }
    }

    /// `exp`제곱된 원자의 LaTeX 표기
    pub fn power_to_latex(&self, exp: u32) -> String {
        match self {
            Atom::Symbol(s) => {
                let base = s.to_latex();
                if exp == 1 {
                    base
                } else {
                    format!("{base}^{{{exp}}}")
                }
            }
            Atom::Sin(s) => trig_latex("sin", s, exp),
            Atom::Cos(s) => trig_latex("cos", s, exp),
            Atom::Function { name, arg, order } => {
                let call = format!("{}{{\\left({} \\right)}}", name_to_latex(name), arg.to_latex());
                if *order == 0 {
                    if exp == 1 {
                        call
                    } else {
                        format!(
                            "{}^{{{exp}}}{{\\left({} \\right)}}",
                            name_to_latex(name),
                            arg.to_latex()
                        )
                    }
                } else {
                    let var = arg.to_latex();
                    let deriv = if *order == 1 {
                        format!("\\frac{{d}}{{d {var}}} {call}")
                    } else {
                        format!("\\frac{{d^{{{order}}}}}{{d {var}^{{{order}}}}} {call}")
                    };
                    if exp == 1 {
                        deriv
                    } else {
                        format!("\\left({deriv}\\right)^{{{exp}}}")
                    }
                }
            }
        }
    }
}

fn trig_latex(func: &str, arg: &Symbol, exp: u32) -> String {
    if exp == 1 {
        format!("\\{func}{{\\left({} \\right)}}", arg.to_latex())
    } else {
        format!("\\{func}^{{{exp}}}{{\\left({} \\right)}}", arg.to_latex())
    }
}

const GREEK: &[&str] = &[
    "alpha", "beta", "gamma", "delta", "epsilon", "varepsilon", "zeta", "eta", "theta",
    "vartheta", "iota", "kappa", "lambda", "mu", "nu", "xi", "pi", "rho", "sigma", "tau",
    "upsilon", "phi", "varphi", "chi", "psi", "omega", "Gamma", "Delta", "Theta", "Lambda",
    "Xi", "Pi", "Sigma", "Upsilon", "Phi", "Psi", "Omega",
];

fn base_to_latex(base: &str) -> String {
    if GREEK.contains(&base) {
        format!("\\{base}")
    } else {
        base.to_string()
    }
}

/// 기호 이름을 LaTeX로 변환: `theta` → `\theta`, `v0` → `v_{0}`, `x_mu` → `x_{\mu}`
pub fn name_to_latex(name: &str) -> String {
    if let Some((base, sub)) = name.split_once('_') {
        if !base.is_empty() && !sub.is_empty() {
            return format!("{}_{{{}}}", base_to_latex(base), name_to_latex(sub));
        }
    }
    let digits = name.len() - name.trim_end_matches(|c: char| c.is_ascii_digit()).len();
    if digits > 0 && digits < name.len() {
        let (base, sub) = name.split_at(name.len() - digits);
        return format!("{}_{{{}}}", base_to_latex(base), sub);
    }
    base_to_latex(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn greek_and_subscripts() {
        assert_eq!(name_to_latex("theta"), "\\theta");
        assert_eq!(name_to_latex("v0"), "v_{0}");
        assert_eq!(name_to_latex("x_mu"), "x_{\\mu}");
        assert_eq!(name_to_latex("M"), "M");
    }

    #[test]
    fn trig_derivatives_cycle() {
        let theta = Symbol::new("theta");
        let r = Symbol::new("r");
        let d_sin = Atom::Sin(theta.clone()).derivative(&theta);
        assert_eq!(d_sin, Polynomial::atom(Atom::Cos(theta.clone())));
        assert!(Atom::Sin(theta).derivative(&r).is_zero());
    }

    #[test]
    fn function_derivative_latex() {
        let r = Symbol::new("r");
        let a = Atom::function("A", &r);
        let da = a.derivative(&r);
        let (mono, _) = da.leading().expect("non-zero derivative");
        let (atom, exp) = mono.iter().next().expect("single atom");
        assert_eq!(atom.power_to_latex(*exp), "\\frac{d}{d r} A{\\left(r \\right)}");
        assert_eq!(a.power_to_latex(2), "A^{2}{\\left(r \\right)}");
    }
}
