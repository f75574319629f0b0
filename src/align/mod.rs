pub mod matrix;
pub mod result;
pub mod strategy;
pub mod traceback;

pub use matrix::{build_matrix, DpMatrix, FillOrder};
pub use result::AlignmentResult;
pub use strategy::{Cell, SemiGlobalStart, Strategy};
pub use traceback::{traceback, Move, TracePath};

use log::debug;

use crate::error::AlignError;
use crate::scoring::ScoringModel;
use crate::sequence::Sequence;

/// 单次比对的配置
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AlignConfig {
    pub strategy: Strategy,
    pub semi_global_start: SemiGlobalStart,
    pub fill: FillOrder,
}

impl AlignConfig {
    pub fn new(strategy: Strategy) -> Self {
        Self { strategy, ..Self::default() }
    }
}

/// 比对输出：结果三行 + 完整矩阵
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PairAlignment {
    pub result: AlignmentResult,
    pub matrix: DpMatrix,
    /// 最优得分所在单元
    pub optimum: Cell,
    /// 回溯开始的单元
    pub trace_start: Cell,
}

/// 对两条序列做一次两两比对：建矩阵 -> 定位最优单元 -> 回溯 -> 组装结果
pub fn align_pair(
    first: &Sequence,
    second: &Sequence,
    scoring: &ScoringModel,
    config: &AlignConfig,
) -> Result<PairAlignment, AlignError> {
    scoring.check_range(first.len(), second.len())?;
    let strategy = config.strategy;
    let matrix = build_matrix(first, second, scoring, strategy, config.fill);

    let optimum = strategy.optimum(&matrix);
    let score = matrix.get(optimum.i, optimum.j);
    let trace_start = strategy.trace_start(&matrix, optimum, config.semi_global_start);
    debug!("{} optimum {} = {}, tracing from {}", strategy, optimum, score, trace_start);

    let mut path = traceback(&matrix, first, second, scoring, strategy, trace_start)?;
    if strategy == Strategy::SemiGlobal && config.semi_global_start == SemiGlobalStart::BestCell {
        traceback::extend_to_end(&mut path, first.len(), second.len());
    }

    let result = AlignmentResult::from_path(first, second, path, score);
    Ok(PairAlignment { result, matrix, optimum, trace_start })
}
