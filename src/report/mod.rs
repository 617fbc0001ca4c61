//! 0이 아닌 곡률 성분을 LaTeX 문서로 내보내는 리포트 생성기
//!
//! 섹션 순서는 크리스토펠 기호, 측지선 방정식, 리치 텐서, 리치 스칼라,
//! 리만 텐서이다. 측지선 방정식과 리치 스칼라는 0이어도 항상 출력한다.

use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::config::ReportConfig;
use crate::error::Result;
use crate::spacetimes::Metric;
use crate::symbolic::Expr;
use crate::tensors::{Curvature, CurvatureEngine, LeviCivita, VelocityConvention};

const PREAMBLE: &str = "\\documentclass{article}\n\
\\usepackage{amsmath}\n\
\\usepackage{geometry}\n\
\\geometry{margin=1in}\n\
\\begin{document}\n";

/// 성분 라벨의 인덱스 표기
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IndexLabels {
    /// `\Gamma^{0}_{01}`
    #[default]
    Numeric,
    /// `\Gamma^{t}_{t r}`
    Coordinate,
}

impl IndexLabels {
    fn render(&self, metric: &Metric, indices: &[usize]) -> String {
        match self {
            IndexLabels::Numeric => indices.iter().map(usize::to_string).collect(),
            IndexLabels::Coordinate => indices
                .iter()
                .map(|&i| metric.coordinates()[i].to_latex())
                .collect::<Vec<_>>()
                .join(" "),
        }
    }
}

/// `label &= latex` 한 줄
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Equation {
    pub label: String,
    pub latex: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SectionBody {
    /// `align*` 환경에 들어가는 여러 줄
    Aligned(Vec<Equation>),
    /// `\[ ... \]` 한 줄
    Display(Equation),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub title: &'static str,
    pub body: SectionBody,
}

impl Section {
    pub fn equations(&self) -> &[Equation] {
        match &self.body {
            SectionBody::Aligned(lines) => lines,
            SectionBody::Display(eq) => std::slice::from_ref(eq),
        }
    }

    fn render_into(&self, out: &mut String) {
        let _ = writeln!(out, "\\section*{{{}}}", self.title);
        match &self.body {
            SectionBody::Aligned(lines) => {
                out.push_str("\\begin{align*}\n");
                for eq in lines {
                    let _ = writeln!(out, "{} &= {} \\\\", eq.label, eq.latex);
                }
                out.push_str("\\end{align*}\n");
            }
            SectionBody::Display(eq) => {
                let _ = writeln!(out, "\\[ {} = {} \\]", eq.label, eq.latex);
            }
        }
    }
}

/// 완성된 리포트 문서
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurvatureReport {
    sections: Vec<Section>,
}

impl CurvatureReport {
    pub const CHRISTOFFEL: &'static str = "Non-zero Christoffel Symbols";
    pub const GEODESICS: &'static str = "Geodesic Equations";
    pub const RICCI: &'static str = "Non-zero Ricci Tensor Components";
    pub const RICCI_SCALAR: &'static str = "Ricci Scalar";
    pub const RIEMANN: &'static str = "Non-zero Riemann Tensor Components";

    /// 유도된 곡률 양에서 0이 아닌 성분만 골라 섹션을 구성
    pub fn from_curvature(metric: &Metric, curvature: &Curvature, labels: IndexLabels) -> Self {
        let n = metric.dims();

        let mut christoffel = Vec::new();
        for i in 0..n {
            for j in 0..n {
                for k in 0..n {
                    push_nonzero(&mut christoffel, curvature.christoffel.get(i, j, k), || {
                        format!(
                            "\\Gamma^{{{}}}_{{{}}}",
                            labels.render(metric, &[i]),
                            labels.render(metric, &[j, k])
                        )
                    });
                }
            }
        }

        let geodesics = curvature
            .geodesics
            .iter()
            .map(|(label, expr)| Equation {
                label,
                latex: expr.simplify().to_latex(),
            })
            .collect();

        let mut ricci = Vec::new();
        for i in 0..n {
            for j in 0..n {
                push_nonzero(&mut ricci, curvature.ricci.get(i, j), || {
                    format!("R_{{{}}}", labels.render(metric, &[i, j]))
                });
            }
        }

        let mut riemann = Vec::new();
        for rho in 0..n {
            for sigma in 0..n {
                for mu in 0..n {
                    for nu in 0..n {
                        push_nonzero(
                            &mut riemann,
                            curvature.riemann.get(rho, sigma, mu, nu),
                            || {
                                format!(
                                    "R^{{{}}}_{{{}}}",
                                    labels.render(metric, &[rho]),
                                    labels.render(metric, &[sigma, mu, nu])
                                )
                            },
                        );
                    }
                }
            }
        }

        log::debug!(
            "report components: christoffel={} ricci={} riemann={}",
            christoffel.len(),
            ricci.len(),
            riemann.len()
        );

        CurvatureReport {
            sections: vec![
                Section {
                    title: Self::CHRISTOFFEL,
                    body: SectionBody::Aligned(christoffel),
                },
                Section {
                    title: Self::GEODESICS,
                    body: SectionBody::Aligned(geodesics),
                },
                Section {
                    title: Self::RICCI,
                    body: SectionBody::Aligned(ricci),
                },
                Section {
                    title: Self::RICCI_SCALAR,
                    body: SectionBody::Display(Equation {
                        label: "R".to_string(),
                        latex: curvature.ricci_scalar.simplify().to_latex(),
                    }),
                },
                Section {
                    title: Self::RIEMANN,
                    body: SectionBody::Aligned(riemann),
                },
            ],
        }
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn section(&self, title: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.title == title)
    }

    /// 제목으로 찾은 섹션의 줄 수 (없으면 0)
    pub fn count(&self, title: &str) -> usize {
        self.section(title).map_or(0, |s| s.equations().len())
    }

    /// 전체 LaTeX 문서
    pub fn render(&self) -> String {
        let mut out = String::from(PREAMBLE);
        for section in &self.sections {
            section.render_into(&mut out);
        }
        out.push_str("\\end{document}\n");
        out
    }

    /// 파일로 저장 (기존 파일은 덮어쓴다)
    pub fn write_to_path<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        fs::write(path, self.render())?;
        log::info!("LaTeX output written to: {}", path.display());
        Ok(())
    }
}

fn push_nonzero(lines: &mut Vec<Equation>, value: &Expr, label: impl FnOnce() -> String) {
    let value = value.simplify();
    if value.is_zero() {
        return;
    }
    lines.push(Equation {
        label: label(),
        latex: value.to_latex(),
    });
}

/// 계량 → 곡률 유도 → 리포트
pub fn generate_report<E: CurvatureEngine + ?Sized>(
    engine: &E,
    metric: &Metric,
    labels: IndexLabels,
    convention: VelocityConvention,
) -> Result<CurvatureReport> {
    let curvature = engine.derive(metric, convention)?;
    Ok(CurvatureReport::from_curvature(metric, &curvature, labels))
}

/// 설정대로 계량을 조립하고 리포트를 생성해 `config.output`에 저장
pub fn run(config: &ReportConfig) -> Result<CurvatureReport> {
    let metric = config.metric.assemble()?;
    log::info!(
        "deriving curvature for `{}` metric over ({})",
        config.metric.label(),
        metric
            .coordinates()
            .iter()
            .map(|c| c.name())
            .collect::<Vec<_>>()
            .join(", ")
    );
    let report = generate_report(&LeviCivita, &metric, config.index_labels, config.velocity)?;
    report.write_to_path(&config.output)?;
    Ok(report)
}
