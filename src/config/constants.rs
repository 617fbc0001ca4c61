//! 계산 전반에 쓰이는 상수값 정의

/// 곡률 리포트와 측지선 적분의 기본값 및 수치 안정성 상수들
pub struct Constants;

impl Constants {
    /// 리포트 기본 출력 파일
    pub const DEFAULT_REPORT_FILE: &'static str = "tensor_output.tex";

    /// 궤적 플롯 기본 출력 파일
    pub const DEFAULT_PLOT_FILE: &'static str = "geodesic.svg";

    /// 이보다 작은 g^tt는 0으로 본다
    pub const MIN_PIVOT: f64 = 1e-14;

    /// RKF7(8) 적분기의 절대/상대 허용 오차
    pub const ODE_TOLERANCE: f64 = 1e-12;

    /// 지평선 r₊ 바깥에서 적분을 멈추는 상대 여유 (r ≤ r₊ (1 + 여유))
    pub const HORIZON_BUFFER: f64 = 0.01;

    /// 진행 상황 로그 간격 (적분 스텝 수)
    pub const LOG_EVERY: usize = 1000;

    /// 기본 초기 위치 (r, θ, φ)
    pub const DEFAULT_POSITION: [f64; 3] = [40.0, std::f64::consts::FRAC_PI_2, 0.0];

    /// 기본 초기 공변 운동량 (p_r, p_θ, p_φ)
    pub const DEFAULT_MOMENTUM: [f64; 3] = [0.0, 0.0, 3.83405];

    /// 기본 Kerr 스핀 파라미터
    pub const DEFAULT_SPIN: f64 = 0.9;

    pub const DEFAULT_STEPS: usize = 5500;

    pub const DEFAULT_DELTA: f64 = 1.0;
}
