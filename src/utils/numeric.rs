//! 수치 계산 유틸리티 함수들

/// 보이어-린드퀴스트 (r, θ, φ) → 데카르트 (x, y, z)
///
/// x = √(r² + a²) sinθ cosφ, y = √(r² + a²) sinθ sinφ, z = r cosθ
pub fn boyer_lindquist_to_cartesian(r: f64, theta: f64, phi: f64, a: f64) -> [f64; 3] {
    let rho = (r * r + a * a).sqrt();
    let (sin_t, cos_t) = theta.sin_cos();
    let (sin_p, cos_p) = phi.sin_cos();
    [rho * sin_t * cos_p, rho * sin_t * sin_p, r * cos_t]
}
