use log::debug;

use crate::error::AlignError;
use crate::scoring::ScoringModel;
use crate::sequence::Sequence;

use super::matrix::DpMatrix;
use super::strategy::{Cell, Strategy};

/// 回溯中的一步
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Move {
    /// 序列 1 与序列 2 各出一个残基
    Diagonal,
    /// 序列 1 的残基对空位
    Up,
    /// 序列 2 的残基对空位
    Left,
}

impl Move {
    #[inline]
    pub fn cigar_op(self) -> char {
        match self {
            Move::Diagonal => 'M',
            Move::Up => 'I',
            Move::Left => 'D',
        }
    }
}

/// 一条回溯路径，moves 按序列正向排列
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TracePath {
    pub moves: Vec<Move>,
    /// 路径左上端（回溯停下的单元）
    pub begin: Cell,
    /// 路径右下端（回溯开始的单元）
    pub end: Cell,
}

/// 从 start 回溯到策略的终止条件。
/// 优先级固定为 对角 > 上 > 左；边界上只允许沿边界移动。
pub fn traceback(
    dp: &DpMatrix,
    first: &Sequence,
    second: &Sequence,
    scoring: &ScoringModel,
    strategy: Strategy,
    start: Cell,
) -> Result<TracePath, AlignError> {
    let a = first.codes();
    let b = second.codes();
    let gap = scoring.gap_penalty();

    let mut moves: Vec<Move> = Vec::with_capacity(start.i + start.j);
    let mut i = start.i;
    let mut j = start.j;

    while strategy.keep_walking(dp, Cell::new(i, j)) {
        let mv = if i == 0 {
            Move::Left
        } else if j == 0 {
            Move::Up
        } else {
            let here = dp.get(i, j);
            if here == dp.get(i - 1, j - 1) + scoring.substitution_code(a[i - 1], b[j - 1]) {
                Move::Diagonal
            } else if here == dp.get(i - 1, j) - gap {
                Move::Up
            } else if here == dp.get(i, j - 1) - gap {
                Move::Left
            } else {
                return Err(AlignError::TracebackStalled { row: i, col: j });
            }
        };

        match mv {
            Move::Diagonal => {
                i -= 1;
                j -= 1;
            }
            Move::Up => i -= 1,
            Move::Left => j -= 1,
        }
        moves.push(mv);
    }

    moves.reverse();
    debug!("traceback {} -> ({}, {}): {} columns", start, i, j, moves.len());

    Ok(TracePath { moves, begin: Cell::new(i, j), end: start })
}

/// 把 path.end 之后直到 (n, m) 的剩余残基作为末端空位补在路径后面
pub fn extend_to_end(path: &mut TracePath, n: usize, m: usize) {
    let Cell { i, j } = path.end;
    path.moves.extend(std::iter::repeat(Move::Up).take(n.saturating_sub(i)));
    path.moves.extend(std::iter::repeat(Move::Left).take(m.saturating_sub(j)));
    path.end = Cell::new(n, m);
}
