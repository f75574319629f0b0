use log::debug;
use rayon::prelude::*;

use crate::scoring::ScoringModel;
use crate::sequence::Sequence;

use super::strategy::Strategy;

/// (n+1) x (m+1) 打分矩阵，行优先展平：cells[i * cols + j]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DpMatrix {
    rows: usize,
    cols: usize,
    cells: Vec<i32>,
}

impl DpMatrix {
    pub fn new(rows: usize, cols: usize) -> Self {
        Self { rows, cols, cells: vec![0; rows * cols] }
    }

    #[cfg(test)]
    pub(crate) fn from_rows(rows: Vec<Vec<i32>>) -> Self {
        let cols = rows.first().map_or(0, Vec::len);
        let n = rows.len();
        let cells: Vec<i32> = rows.into_iter().flatten().collect();
        assert_eq!(cells.len(), n * cols);
        Self { rows: n, cols, cells }
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    #[inline]
    pub fn get(&self, i: usize, j: usize) -> i32 {
        self.cells[i * self.cols + j]
    }

    #[inline]
    fn set(&mut self, i: usize, j: usize, v: i32) {
        self.cells[i * self.cols + j] = v;
    }

    pub fn row(&self, i: usize) -> &[i32] {
        &self.cells[i * self.cols..(i + 1) * self.cols]
    }

    pub fn iter_rows(&self) -> impl Iterator<Item = &[i32]> {
        self.cells.chunks(self.cols)
    }

    pub fn max_value(&self) -> i32 {
        self.cells.iter().copied().max().unwrap_or(0)
    }
}

/// 矩阵填充顺序。两种顺序得到的矩阵完全一致。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FillOrder {
    /// 逐行从左到右
    #[default]
    RowMajor,
    /// 按反对角线 i + j = d 推进，同一条对角线上的单元用 rayon 并行计算
    AntiDiagonal,
}

/// 按策略构建完整的 DP 矩阵
pub fn build_matrix(
    first: &Sequence,
    second: &Sequence,
    scoring: &ScoringModel,
    strategy: Strategy,
    fill: FillOrder,
) -> DpMatrix {
    let a = first.codes();
    let b = second.codes();
    let n = a.len();
    let m = b.len();
    let gap = scoring.gap_penalty();

    let mut dp = DpMatrix::new(n + 1, m + 1);
    for i in 0..=n {
        dp.set(i, 0, strategy.boundary(i, gap));
    }
    for j in 0..=m {
        dp.set(0, j, strategy.boundary(j, gap));
    }

    match fill {
        FillOrder::RowMajor => {
            for i in 1..=n {
                for j in 1..=m {
                    let v = cell_value(&dp, a, b, i, j, scoring, strategy);
                    dp.set(i, j, v);
                }
            }
        }
        FillOrder::AntiDiagonal => {
            // cells on diagonal d only read diagonals d-1 and d-2
            let mut diag: Vec<i32> = Vec::with_capacity(n.min(m));
            for d in 2..=(n + m) {
                let i_lo = if d > m { d - m } else { 1 };
                let i_hi = n.min(d - 1);
                if i_lo > i_hi {
                    continue;
                }
                diag.clear();
                (i_lo..i_hi + 1)
                    .into_par_iter()
                    .map(|i| cell_value(&dp, a, b, i, d - i, scoring, strategy))
                    .collect_into_vec(&mut diag);
                for (k, &v) in diag.iter().enumerate() {
                    let i = i_lo + k;
                    dp.set(i, d - i, v);
                }
            }
        }
    }

    debug!("filled {}x{} {} matrix ({:?})", dp.rows(), dp.cols(), strategy, fill);
    dp
}

#[inline]
fn cell_value(dp: &DpMatrix, a: &[u8], b: &[u8], i: usize, j: usize, scoring: &ScoringModel, strategy: Strategy) -> i32 {
    let gap = scoring.gap_penalty();
    let diag = dp.get(i - 1, j - 1) + scoring.substitution_code(a[i - 1], b[j - 1]);
    let up = dp.get(i - 1, j) - gap;
    let left = dp.get(i, j - 1) - gap;
    let mut val = diag.max(up).max(left);
    if strategy.clamps() && val < 0 {
        val = 0;
    }
    val
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::MatrixKind;

    fn seq(s: &str) -> Sequence {
        Sequence::new("t", s).unwrap()
    }

    /// 与 build_matrix 无关的逐单元重算，用于核对递推
    fn check_recurrence(dp: &DpMatrix, a: &Sequence, b: &Sequence, scoring: &ScoringModel, strategy: Strategy) {
        let gap = scoring.gap_penalty();
        for i in 1..dp.rows() {
            for j in 1..dp.cols() {
                let diag = dp.get(i - 1, j - 1)
                    + scoring.substitution(a.residues()[i - 1], b.residues()[j - 1]).unwrap();
                let up = dp.get(i - 1, j) - gap;
                let left = dp.get(i, j - 1) - gap;
                let here = dp.get(i, j);
                assert!(here >= diag && here >= up && here >= left, "cell ({i},{j}) underestimates");
                let mut expected = diag.max(up).max(left);
                if strategy == Strategy::Local {
                    expected = expected.max(0);
                }
                assert_eq!(here, expected, "cell ({i},{j})");
            }
        }
    }

    fn pseudo_protein(len: usize, seed: u32) -> Sequence {
        let alphabet = b"ARNDCQEGHILKMFPSTWYV";
        let mut x = seed;
        let residues: Vec<u8> = (0..len)
            .map(|_| {
                x = x.wrapping_mul(1_103_515_245).wrapping_add(12_345);
                alphabet[(x >> 16) as usize % alphabet.len()]
            })
            .collect();
        Sequence::new("rand", residues).unwrap()
    }

    #[test]
    fn global_boundaries_and_values() {
        let scoring = ScoringModel::builtin(MatrixKind::Identity, 1).unwrap();
        let dp = build_matrix(&seq("AB"), &seq("AB"), &scoring, Strategy::Global, FillOrder::RowMajor);
        assert_eq!(dp.row(0), &[0, -1, -2]);
        assert_eq!(dp.row(1), &[-1, 1, 0]);
        assert_eq!(dp.row(2), &[-2, 0, 2]);
    }

    #[test]
    fn local_and_semi_global_boundaries_are_zero() {
        let scoring = ScoringModel::builtin(MatrixKind::Blosum62, 4).unwrap();
        for strategy in [Strategy::Local, Strategy::SemiGlobal] {
            let dp = build_matrix(&seq("HEAGAW"), &seq("PAWHE"), &scoring, strategy, FillOrder::RowMajor);
            assert!(dp.row(0).iter().all(|&v| v == 0));
            assert!((0..dp.rows()).all(|i| dp.get(i, 0) == 0));
        }
    }

    #[test]
    fn local_never_negative() {
        let scoring = ScoringModel::builtin(MatrixKind::Pam250, 8).unwrap();
        let dp = build_matrix(&seq("WWWW"), &seq("CCCC"), &scoring, Strategy::Local, FillOrder::RowMajor);
        assert!(dp.iter_rows().flatten().all(|&v| v >= 0));
        assert_eq!(dp.max_value(), 0);
    }

    #[test]
    fn recurrence_is_exact_for_every_strategy() {
        let a = pseudo_protein(37, 7);
        let b = pseudo_protein(29, 11);
        for kind in MatrixKind::ALL {
            for gap in [0, 1, 4] {
                let scoring = ScoringModel::builtin(kind, gap).unwrap();
                for strategy in Strategy::ALL {
                    let dp = build_matrix(&a, &b, &scoring, strategy, FillOrder::RowMajor);
                    check_recurrence(&dp, &a, &b, &scoring, strategy);
                }
            }
        }
    }

    #[test]
    fn dimensions_follow_sequence_lengths() {
        let scoring = ScoringModel::builtin(MatrixKind::Blosum62, 2).unwrap();
        for (x, y) in [("", ""), ("A", ""), ("", "WY"), ("HEAGAWGHEE", "PAWHEAE")] {
            for strategy in Strategy::ALL {
                let dp = build_matrix(&seq(x), &seq(y), &scoring, strategy, FillOrder::RowMajor);
                assert_eq!(dp.rows(), x.len() + 1);
                assert_eq!(dp.cols(), y.len() + 1);
                assert_eq!(dp.iter_rows().count(), x.len() + 1);
            }
        }
    }

    #[test]
    fn empty_inputs_give_boundary_only_matrix() {
        let scoring = ScoringModel::builtin(MatrixKind::Identity, 3).unwrap();
        let dp = build_matrix(&seq(""), &seq(""), &scoring, Strategy::Global, FillOrder::RowMajor);
        assert_eq!((dp.rows(), dp.cols()), (1, 1));
        assert_eq!(dp.get(0, 0), 0);

        let dp = build_matrix(&seq(""), &seq("ABC"), &scoring, Strategy::Global, FillOrder::AntiDiagonal);
        assert_eq!(dp.row(0), &[0, -3, -6, -9]);
    }

    #[test]
    fn anti_diagonal_fill_matches_row_major() {
        let a = pseudo_protein(53, 3);
        let b = pseudo_protein(41, 5);
        let scoring = ScoringModel::builtin(MatrixKind::Blosum62, 3).unwrap();
        for strategy in Strategy::ALL {
            let seq_fill = build_matrix(&a, &b, &scoring, strategy, FillOrder::RowMajor);
            let par_fill = build_matrix(&a, &b, &scoring, strategy, FillOrder::AntiDiagonal);
            assert_eq!(seq_fill, par_fill, "{strategy}");
            // and with the shorter sequence first
            let seq_fill = build_matrix(&b, &a, &scoring, strategy, FillOrder::RowMajor);
            let par_fill = build_matrix(&b, &a, &scoring, strategy, FillOrder::AntiDiagonal);
            assert_eq!(seq_fill, par_fill, "{strategy}");
        }
    }
}
