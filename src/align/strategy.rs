use std::fmt;

use crate::error::AlignError;

use super::matrix::DpMatrix;

/// 矩阵中的一个单元 (i, j)：i 为序列 1 前缀长度，j 为序列 2 前缀长度
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Cell {
    pub i: usize,
    pub j: usize,
}

impl Cell {
    pub fn new(i: usize, j: usize) -> Self {
        Self { i, j }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.i, self.j)
    }
}

/// 比对策略。边界初始化、截断规则、最优单元定位、回溯起点与终止条件都由它决定。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Strategy {
    #[default]
    Global,
    Local,
    SemiGlobal,
}

/// 半全局比对的回溯起点
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SemiGlobalStart {
    /// 总是从 (n, m) 开始回溯；定位到的最优得分只用于报告
    #[default]
    SequenceEnd,
    /// 从定位到的最优单元开始回溯，其后未比对的残基作为免费末端空位输出
    BestCell,
}

impl Strategy {
    pub const ALL: [Strategy; 3] = [Strategy::Global, Strategy::Local, Strategy::SemiGlobal];

    /// 由三个互斥开关选出策略；必须恰好选中一个
    pub fn from_flags(global: bool, local: bool, semi_global: bool) -> Result<Self, AlignError> {
        let picked: Vec<Strategy> = [(global, Strategy::Global), (local, Strategy::Local), (semi_global, Strategy::SemiGlobal)]
            .into_iter()
            .filter_map(|(on, s)| on.then_some(s))
            .collect();
        match picked.as_slice() {
            [only] => Ok(*only),
            other => Err(AlignError::StrategySelection { selected: other.len() }),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Strategy::Global => "global",
            Strategy::Local => "local",
            Strategy::SemiGlobal => "semi-global",
        }
    }

    /// 第 0 行 / 第 0 列上距原点 k 步的边界值
    #[inline]
    pub fn boundary(self, k: usize, gap_penalty: i32) -> i32 {
        match self {
            Strategy::Global => -(k as i32) * gap_penalty,
            Strategy::Local | Strategy::SemiGlobal => 0,
        }
    }

    /// 是否把负分截断为 0
    #[inline]
    pub fn clamps(self) -> bool {
        matches!(self, Strategy::Local)
    }

    /// 最优得分所在单元。并列时取行优先扫描中最先遇到的一个。
    ///
    /// 半全局只扫描 i >= 1、j >= 1 的末行与末列；任一序列为空时取 (n, m)。
    pub fn optimum(self, m: &DpMatrix) -> Cell {
        let (n, mm) = (m.rows() - 1, m.cols() - 1);
        match self {
            Strategy::Global => Cell::new(n, mm),
            Strategy::Local => first_max(m, (0..=n).flat_map(|i| (0..=mm).map(move |j| Cell::new(i, j)))),
            Strategy::SemiGlobal if n == 0 || mm == 0 => Cell::new(n, mm),
            Strategy::SemiGlobal => first_max(
                m,
                (1..=n).flat_map(|i| {
                    let from = if i == n { 1 } else { mm };
                    (from..=mm).map(move |j| Cell::new(i, j))
                }),
            ),
        }
    }

    /// 回溯起点
    pub fn trace_start(self, m: &DpMatrix, optimum: Cell, semi_global_start: SemiGlobalStart) -> Cell {
        match (self, semi_global_start) {
            (Strategy::Local, _) | (Strategy::SemiGlobal, SemiGlobalStart::BestCell) => optimum,
            _ => Cell::new(m.rows() - 1, m.cols() - 1),
        }
    }

    /// 回溯是否继续
    #[inline]
    pub fn keep_walking(self, m: &DpMatrix, at: Cell) -> bool {
        match self {
            Strategy::Local => m.get(at.i, at.j) > 0,
            Strategy::Global | Strategy::SemiGlobal => at.i > 0 || at.j > 0,
        }
    }
}

fn first_max(m: &DpMatrix, cells: impl Iterator<Item = Cell>) -> Cell {
    let mut best = Cell::new(0, 0);
    let mut best_score: Option<i32> = None;
    for c in cells {
        let v = m.get(c.i, c.j);
        if best_score.map_or(true, |b| v > b) {
            best_score = Some(v);
            best = c;
        }
    }
    best
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
