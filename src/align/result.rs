use std::fmt::Write as _;
use std::ops::Range;

use crate::sequence::Sequence;

use super::traceback::{Move, TracePath};

pub const GAP: char = '-';
pub const MATCH_MARK: char = '|';
pub const MISMATCH_MARK: char = ' ';
pub const GAP_MARK: char = ' ';

/// 比对结果：上行（序列 1）、标记行、下行（序列 2）与最优得分
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlignmentResult {
    pub top: String,
    pub middle: String,
    pub bottom: String,
    pub score: i32,
    /// 序列 1 参与比对的区间 [start, end)
    pub first_range: Range<usize>,
    /// 序列 2 参与比对的区间 [start, end)
    pub second_range: Range<usize>,
    moves: Vec<Move>,
}

impl AlignmentResult {
    pub fn from_path(first: &Sequence, second: &Sequence, path: TracePath, score: i32) -> Self {
        let a = first.residues();
        let b = second.residues();
        let cap = path.moves.len();
        let mut top = String::with_capacity(cap);
        let mut middle = String::with_capacity(cap);
        let mut bottom = String::with_capacity(cap);

        let mut i = path.begin.i;
        let mut j = path.begin.j;
        for &mv in &path.moves {
            match mv {
                Move::Diagonal => {
                    let (x, y) = (a[i] as char, b[j] as char);
                    top.push(x);
                    bottom.push(y);
                    middle.push(if x == y { MATCH_MARK } else { MISMATCH_MARK });
                    i += 1;
                    j += 1;
                }
                Move::Up => {
                    top.push(a[i] as char);
                    middle.push(GAP_MARK);
                    bottom.push(GAP);
                    i += 1;
                }
                Move::Left => {
                    top.push(GAP);
                    middle.push(GAP_MARK);
                    bottom.push(b[j] as char);
                    j += 1;
                }
            }
        }

        Self {
            top,
            middle,
            bottom,
            score,
            first_range: path.begin.i..i,
            second_range: path.begin.j..j,
            moves: path.moves,
        }
    }

    /// 比对列数
    pub fn len(&self) -> usize {
        self.moves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    pub fn rows(&self) -> [&str; 3] {
        [&self.top, &self.middle, &self.bottom]
    }

    pub fn moves(&self) -> &[Move] {
        &self.moves
    }

    /// 两侧残基相同的列数
    pub fn identities(&self) -> usize {
        self.middle.chars().filter(|&c| c == MATCH_MARK).count()
    }

    /// 含空位的列数
    pub fn gaps(&self) -> usize {
        self.moves.iter().filter(|&&m| m != Move::Diagonal).count()
    }

    /// 相同列占全部列的比例；空比对返回 0
    pub fn identity(&self) -> f64 {
        if self.is_empty() {
            0.0
        } else {
            self.identities() as f64 / self.len() as f64
        }
    }

    pub fn cigar(&self) -> String {
        let ops: Vec<char> = self.moves.iter().copied().map(Move::cigar_op).collect();
        ops_to_cigar(&ops)
    }
}

pub fn ops_to_cigar(ops: &[char]) -> String {
    let mut cigar = String::new();
    if ops.is_empty() {
        return cigar;
    }
    let mut cur = ops[0];
    let mut len = 1usize;
    for &op in &ops[1..] {
        if op == cur {
            len += 1;
        } else {
            let _ = write!(&mut cigar, "{}{}", len, cur);
            cur = op;
            len = 1;
        }
    }
    let _ = write!(&mut cigar, "{}{}", len, cur);
    cigar
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::align::strategy::Cell;

    fn seq(s: &str) -> Sequence {
        Sequence::new("t", s).unwrap()
    }

    #[test]
    fn rows_from_mixed_path() {
        let path = TracePath {
            moves: vec![Move::Diagonal, Move::Up, Move::Diagonal, Move::Left],
            begin: Cell::new(0, 0),
            end: Cell::new(3, 3),
        };
        let r = AlignmentResult::from_path(&seq("AQC"), &seq("ADW"), path, 5);
        assert_eq!(r.top, "AQC-");
        assert_eq!(r.middle, "|   ");
        assert_eq!(r.bottom, "A-DW");
        assert_eq!(r.first_range, 0..3);
        assert_eq!(r.second_range, 0..3);
        assert_eq!(r.len(), 4);
        assert_eq!(r.identities(), 1);
        assert_eq!(r.gaps(), 2);
        assert_eq!(r.cigar(), "1M1I1M1D");
        assert!((r.identity() - 0.25).abs() < 1e-12);
    }

    #[test]
    fn path_starting_inside_matrix() {
        let path = TracePath { moves: vec![Move::Diagonal; 2], begin: Cell::new(2, 1), end: Cell::new(4, 3) };
        let r = AlignmentResult::from_path(&seq("XXHEXX"), &seq("YHEY"), path, 13);
        assert_eq!(r.rows(), ["HE", "||", "HE"]);
        assert_eq!(r.first_range, 2..4);
        assert_eq!(r.second_range, 1..3);
    }

    #[test]
    fn rows_never_share_a_gap_column() {
        let path = TracePath {
            moves: vec![Move::Left, Move::Up, Move::Up, Move::Diagonal, Move::Left],
            begin: Cell::new(0, 0),
            end: Cell::new(3, 3),
        };
        let r = AlignmentResult::from_path(&seq("ABC"), &seq("DEF"), path, 0);
        for (t, b) in r.top.chars().zip(r.bottom.chars()) {
            assert!(!(t == GAP && b == GAP));
        }
        assert_eq!(r.top.len(), r.bottom.len());
        assert_eq!(r.middle.len(), r.top.len());
    }

    #[test]
    fn empty_alignment() {
        let path = TracePath { moves: Vec::new(), begin: Cell::new(0, 0), end: Cell::new(0, 0) };
        let r = AlignmentResult::from_path(&seq(""), &seq(""), path, 0);
        assert!(r.is_empty());
        assert_eq!(r.cigar(), "");
        assert_eq!(r.identity(), 0.0);
    }

    #[test]
    fn cigar_run_lengths() {
        assert_eq!(ops_to_cigar(&['M', 'M', 'I', 'M', 'M', 'D', 'D']), "2M1I2M2D");
        assert_eq!(ops_to_cigar(&[]), "");
    }
}
