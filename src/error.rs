//! 크레이트 전역 에러 타입

use thiserror::Error;

/// 곡률 계산, 리포트 생성, 측지선 적분 과정의 모든 실패
#[derive(Error, Debug)]
pub enum Error {
    /// 계량 행렬 크기가 좌표 수와 맞지 않음
    #[error("shape error: {0}")]
    Shape(String),

    /// 명시적으로 채워지지 않은 계량 성분
    #[error("metric entry ({row}, {col}) was never supplied")]
    IncompleteMetric { row: usize, col: usize },

    /// 같은 이름의 좌표가 두 번 등장
    #[error("duplicate coordinate `{0}`")]
    DuplicateCoordinate(String),

    /// 역행렬이 존재하지 않는 계량
    #[error("metric is singular (no invertible pivot in column {column})")]
    SingularMetric { column: usize },

    /// 수치 계량이 주어진 점에서 역행렬을 갖지 않음
    #[error("metric is singular at x = {0:?}")]
    SingularPoint(Vec<f64>),

    /// 항등적으로 0인 식으로 나누기
    #[error("division by an identically zero expression")]
    DivisionByZero,

    /// 식 문자열 파싱 실패
    #[error("parse error at byte {position}: {message}")]
    Parse { position: usize, message: String },

    /// 알 수 없는 계량 이름
    #[error("unknown metric `{0}`")]
    UnknownMetric(String),

    /// 계량 파라미터 개수/값 오류
    #[error("invalid metric parameters: {0}")]
    InvalidParameters(String),

    /// 초기 위치/운동량으로 질량껍질 조건을 풀 수 없음
    #[error("invalid initial data: {0}")]
    InvalidInitialData(String),

    /// 수치 평가 시 값이 주어지지 않은 기호
    #[error("no numeric value bound for `{0}`")]
    UnboundSymbol(String),

    /// NaN/Inf 발생
    #[error("numerical error: {0}")]
    Numerical(String),

    /// 설정 파일 오류
    #[error("config error: {0}")]
    Config(String),

    /// 플롯 렌더링 실패
    #[error("plot error: {0}")]
    Plot(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
