//! 기호식의 LaTeX 표기

use num::{BigInt, BigRational, One, Signed};

use super::expr::Expr;
use super::poly::{Monomial, Polynomial};

/// 유리함수 전체를 LaTeX로 변환
pub fn expr_to_latex(expr: &Expr) -> String {
    let den = expr.denominator();
    if den.is_empty() {
        return poly_to_latex(expr.numerator());
    }

    // 분자의 분수 계수를 분모 상수로 옮긴다
    let scale = expr.numerator().denominator_lcm();
    let mut num = expr.numerator().scale(&BigRational::from_integer(scale.clone()));
    let negative = num.len() == 1 && num.leading_is_negative();
    if negative {
        num = -&num;
    }

    let mut parts = Vec::new();
    if !scale.is_one() {
        parts.push(scale.to_string());
    }
    let lone_factor = den.len() == 1 && scale.is_one();
    // 단일 원자 인수를 먼저, 다항식 인수를 뒤에
    let (atoms, compound): (Vec<_>, Vec<_>) = den
        .iter()
        .partition(|(factor, _)| single_atom_power(factor, 1).is_some());
    for (factor, exp) in atoms.into_iter().chain(compound) {
        parts.push(factor_to_latex(factor, *exp, lone_factor));
    }

    let sign = if negative { "- " } else { "" };
    format!(
        "{sign}\\frac{{{}}}{{{}}}",
        poly_to_latex(&num),
        parts.join(" ")
    )
}

fn factor_to_latex(factor: &Polynomial, exp: u32, lone: bool) -> String {
    if let Some(atom_tex) = single_atom_power(factor, exp) {
        return atom_tex;
    }
    let body = poly_to_latex(factor);
    match (exp, lone) {
        (1, true) => body,
        (1, false) => format!("\\left({body}\\right)"),
        _ => format!("\\left({body}\\right)^{{{exp}}}"),
    }
}

/// 인수가 계수 1인 원자 하나이면 그 거듭제곱 표기
fn single_atom_power(factor: &Polynomial, exp: u32) -> Option<String> {
    if factor.len() != 1 {
        return None;
    }
    let (mono, coeff) = factor.leading()?;
    if !coeff.is_one() || mono.atom_count() != 1 {
        return None;
    }
    let (atom, e) = mono.iter().next()?;
    Some(atom.power_to_latex(e * exp))
}

/// 다항식 (항은 단항식 순서의 내림차순)
pub fn poly_to_latex(poly: &Polynomial) -> String {
    if poly.is_zero() {
        return "0".to_string();
    }
    let mut out = String::new();
    for (i, (mono, coeff)) in poly.terms().rev().enumerate() {
        let body = term_to_latex(mono, &coeff.abs());
        match (i, coeff.is_negative()) {
            (0, false) => out.push_str(&body),
            (0, true) => {
                out.push_str("- ");
                out.push_str(&body);
            }
            (_, false) => {
                out.push_str(" + ");
                out.push_str(&body);
            }
            (_, true) => {
                out.push_str(" - ");
                out.push_str(&body);
            }
        }
    }
    out
}

fn term_to_latex(mono: &Monomial, coeff: &BigRational) -> String {
    if mono.is_one() {
        return rational_to_latex(coeff);
    }
    let atoms: Vec<String> = mono
        .iter()
        .map(|(atom, exp)| atom.power_to_latex(*exp))
        .collect();
    let atoms = atoms.join(" ");
    if coeff.is_one() {
        atoms
    } else {
        format!("{} {}", rational_to_latex(coeff), atoms)
    }
}

fn rational_to_latex(c: &BigRational) -> String {
    if c.is_integer() {
        c.numer().to_string()
    } else {
        let sign = if c.is_negative() { "- " } else { "" };
        let numer: BigInt = c.numer().abs();
        format!("{sign}\\frac{{{}}}{{{}}}", numer, c.denom())
    }
}

#[cfg(test)]
mod tests {
    use crate::symbolic::{parse, Expr, Symbol};

    fn tex(src: &str) -> String {
        parse(src).expect("valid expression").to_latex()
    }

    #[test]
    fn polynomials_render_in_descending_order() {
        assert_eq!(tex("r^2 - 2*M*r"), "- 2 M r + r^{2}");
        assert_eq!(tex("0"), "0");
        assert_eq!(tex("-3/2"), "- \\frac{3}{2}");
    }

    #[test]
    fn fractions_pull_sign_and_coefficients_out() {
        assert_eq!(tex("-M/r^2"), "- \\frac{M}{r^{2}}");
        assert_eq!(tex("M/(2*r)"), "\\frac{M}{2 r}");
        assert_eq!(tex("1/(r - 2*M)"), "- \\frac{1}{2 M - r}");
    }

    #[test]
    fn trig_and_functions() {
        assert_eq!(
            tex("r^2*sin(theta)^2"),
            "r^{2} \\sin^{2}{\\left(\\theta \\right)}"
        );
        let r = Symbol::new("r");
        assert_eq!(Expr::function("A", &r).to_latex(), "A{\\left(r \\right)}");
    }

    #[test]
    fn compound_denominators_are_parenthesized() {
        assert_eq!(tex("M/(r*(r - 2*M))"), "- \\frac{M}{r \\left(2 M - r\\right)}");
    }
}
