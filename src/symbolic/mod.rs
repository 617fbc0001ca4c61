//! 정확한 기호 계산 엔진
//!
//! 계량 성분과 그로부터 유도되는 모든 텐서 성분은 원자(기호, `sin`, `cos`,
//! 미정 함수와 그 도함수)에 대한 유리함수로 표현된다. 계수는 `BigRational`로
//! 정확하게 유지되며, 0 판정은 수치 허용오차 없이 이루어진다.

mod atom;
mod eval;
mod expr;
pub mod latex;
mod parse;
mod poly;

pub use atom::{name_to_latex, symbols, Atom, Symbol};
pub use eval::CompiledExpr;
pub use expr::Expr;
pub use parse::parse;
pub use poly::{Monomial, Polynomial};
