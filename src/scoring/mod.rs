//! 打分模型：26 字母替换矩阵 + 线性空位罚分。

pub mod tables;

use std::fmt;
use std::io::{Read, Write};
use std::str::FromStr;

use anyhow::Result;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::AlignError;
use crate::util::protein::{self, SIGMA};

/// 内置替换矩阵名称
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MatrixKind {
    #[default]
    Pam250,
    Blosum62,
    Identity,
}

impl MatrixKind {
    pub const ALL: [MatrixKind; 3] = [MatrixKind::Pam250, MatrixKind::Blosum62, MatrixKind::Identity];

    pub fn name(self) -> &'static str {
        match self {
            MatrixKind::Pam250 => "pam250",
            MatrixKind::Blosum62 => "blosum62",
            MatrixKind::Identity => "identity",
        }
    }
}

impl fmt::Display for MatrixKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for MatrixKind {
    type Err = AlignError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        MatrixKind::ALL
            .into_iter()
            .find(|k| k.name() == lower)
            .ok_or_else(|| AlignError::UnknownMatrix(s.to_string()))
    }
}

/// 矩阵来源信息（仅在持久化时填写）
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatrixMeta {
    pub source: Option<String>,
    pub created: Option<String>,
}

/// A..Z x A..Z 替换得分表，行优先展平：scores[a * SIGMA + b]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubstitutionMatrix {
    pub name: String,
    scores: Vec<i32>,
    pub meta: MatrixMeta,
}

impl SubstitutionMatrix {
    pub fn from_scores(name: impl Into<String>, scores: Vec<i32>) -> Result<Self, AlignError> {
        let m = Self { name: name.into(), scores, meta: MatrixMeta::default() };
        m.validate()?;
        Ok(m)
    }

    pub fn builtin(kind: MatrixKind) -> Self {
        match kind {
            MatrixKind::Pam250 => Self::from_ncbi(kind.name(), &tables::PAM250),
            MatrixKind::Blosum62 => Self::from_ncbi(kind.name(), &tables::BLOSUM62),
            MatrixKind::Identity => Self::identity(),
        }
    }

    /// 对角线 1，其余 0
    pub fn identity() -> Self {
        let mut scores = vec![0i32; SIGMA * SIGMA];
        for i in 0..SIGMA {
            scores[i * SIGMA + i] = 1;
        }
        Self { name: MatrixKind::Identity.name().to_string(), scores, meta: MatrixMeta::default() }
    }

    fn from_ncbi(name: &str, table: &[i32; tables::NCBI_DIM * tables::NCBI_DIM]) -> Self {
        let rows: Vec<usize> = (0..SIGMA).map(|i| tables::ncbi_row(protein::from_index(i))).collect();
        let mut scores = Vec::with_capacity(SIGMA * SIGMA);
        for &ra in &rows {
            for &rb in &rows {
                scores.push(table[ra * tables::NCBI_DIM + rb]);
            }
        }
        Self { name: name.to_string(), scores, meta: MatrixMeta::default() }
    }

    fn validate(&self) -> Result<(), AlignError> {
        if self.scores.len() != SIGMA * SIGMA {
            return Err(AlignError::MalformedMatrix {
                name: self.name.clone(),
                len: self.scores.len(),
                expected: SIGMA * SIGMA,
            });
        }
        Ok(())
    }

    /// 按字母表下标取分，调用方保证下标 < SIGMA
    #[inline]
    pub fn score_index(&self, a: usize, b: usize) -> i32 {
        self.scores[a * SIGMA + b]
    }

    pub fn score(&self, a: u8, b: u8) -> Result<i32, AlignError> {
        let ia = protein::to_index(a).ok_or(AlignError::UnknownResidue(a as char))?;
        let ib = protein::to_index(b).ok_or(AlignError::UnknownResidue(b as char))?;
        Ok(self.score_index(ia, ib))
    }

    /// 表中最大的得分绝对值
    pub fn max_abs_score(&self) -> u32 {
        self.scores.iter().map(|s| s.unsigned_abs()).max().unwrap_or(0)
    }

    pub fn is_symmetric(&self) -> bool {
        (0..SIGMA).all(|a| (0..SIGMA).all(|b| self.score_index(a, b) == self.score_index(b, a)))
    }

    pub fn set_meta(&mut self, meta: MatrixMeta) {
        self.meta = meta;
    }

    pub fn write_to<W: Write>(&self, w: W) -> Result<()> {
        bincode::serialize_into(w, self)?;
        Ok(())
    }

    pub fn read_from<R: Read>(r: R) -> Result<Self> {
        let m: Self = bincode::deserialize_from(r)?;
        m.validate()?;
        if !m.is_symmetric() {
            debug!("substitution matrix '{}' is asymmetric; scores are looked up as (seq1, seq2)", m.name);
        }
        Ok(m)
    }

    pub fn save_to_file(&self, path: &str) -> Result<()> {
        let f = std::fs::File::create(path)?;
        self.write_to(std::io::BufWriter::new(f))
    }

    pub fn load_from_file(path: &str) -> Result<Self> {
        let f = std::fs::File::open(path)?;
        Self::read_from(std::io::BufReader::new(f))
    }
}

/// 打分模型：替换矩阵 + 每个空位列的罚分（非负）
#[derive(Debug, Clone)]
pub struct ScoringModel {
    matrix: SubstitutionMatrix,
    gap_penalty: i32,
}

impl ScoringModel {
    pub fn new(matrix: SubstitutionMatrix, gap_penalty: i32) -> Result<Self, AlignError> {
        if gap_penalty < 0 {
            return Err(AlignError::NegativeGapPenalty(gap_penalty));
        }
        Ok(Self { matrix, gap_penalty })
    }

    pub fn builtin(kind: MatrixKind, gap_penalty: i32) -> Result<Self, AlignError> {
        Self::new(SubstitutionMatrix::builtin(kind), gap_penalty)
    }

    /// 字符 a（序列 1）对字符 b（序列 2）的替换得分
    pub fn substitution(&self, a: u8, b: u8) -> Result<i32, AlignError> {
        self.matrix.score(a, b)
    }

    /// 同上，参数为 `protein::encode` 产生的下标
    #[inline]
    pub fn substitution_code(&self, a: u8, b: u8) -> i32 {
        self.matrix.score_index(a as usize, b as usize)
    }

    /// 检查 n x m 的比对能否在 i32 内完成：任一单元的绝对值不超过
    /// (n + m) * (gap + max|score|)
    pub fn check_range(&self, n: usize, m: usize) -> Result<(), AlignError> {
        let max_score = self.matrix.max_abs_score();
        let per_step = i64::from(self.gap_penalty) + i64::from(max_score);
        let fits = i64::try_from(n + m)
            .ok()
            .and_then(|steps| steps.checked_mul(per_step))
            .is_some_and(|worst| worst <= i64::from(i32::MAX));
        if fits {
            Ok(())
        } else {
            Err(AlignError::ScoreOverflow { gap_penalty: self.gap_penalty, max_score, rows: n + 1, cols: m + 1 })
        }
    }

    #[inline]
    pub fn gap_penalty(&self) -> i32 {
        self.gap_penalty
    }

    pub fn matrix(&self) -> &SubstitutionMatrix {
        &self.matrix
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn builtin_lookups() {
        let b62 = SubstitutionMatrix::builtin(MatrixKind::Blosum62);
        assert_eq!(b62.score(b'A', b'A').unwrap(), 4);
        assert_eq!(b62.score(b'W', b'W').unwrap(), 11);
        assert_eq!(b62.score(b'H', b'R').unwrap(), 0);
        assert_eq!(b62.score(b'J', b'A').unwrap(), 0); // X row

        let pam = SubstitutionMatrix::builtin(MatrixKind::Pam250);
        assert_eq!(pam.score(b'C', b'C').unwrap(), 12);
        assert_eq!(pam.score(b'W', b'C').unwrap(), -8);
        assert!(pam.is_symmetric());

        let id = SubstitutionMatrix::identity();
        assert_eq!(id.score(b'Q', b'Q').unwrap(), 1);
        assert_eq!(id.score(b'Q', b'E').unwrap(), 0);
    }

    #[test]
    fn matrix_kind_parsing() {
        assert_eq!("PAM250".parse::<MatrixKind>().unwrap(), MatrixKind::Pam250);
        assert_eq!("blosum62".parse::<MatrixKind>().unwrap(), MatrixKind::Blosum62);
        assert_eq!(" identity ".parse::<MatrixKind>().unwrap(), MatrixKind::Identity);
        assert_eq!(
            "blosum80".parse::<MatrixKind>(),
            Err(AlignError::UnknownMatrix("blosum80".to_string()))
        );
        assert_eq!(MatrixKind::default(), MatrixKind::Pam250);
    }

    #[test]
    fn rejects_out_of_alphabet_lookup() {
        let model = ScoringModel::builtin(MatrixKind::Identity, 1).unwrap();
        assert_eq!(model.substitution(b'a', b'A'), Err(AlignError::UnknownResidue('a')));
        assert_eq!(model.substitution(b'A', b'*'), Err(AlignError::UnknownResidue('*')));
    }

    #[test]
    fn rejects_negative_gap_penalty() {
        let err = ScoringModel::builtin(MatrixKind::Pam250, -1).unwrap_err();
        assert_eq!(err, AlignError::NegativeGapPenalty(-1));
        assert!(ScoringModel::builtin(MatrixKind::Pam250, 0).is_ok());
    }

    #[test]
    fn rejects_wrong_size_table() {
        let err = SubstitutionMatrix::from_scores("tiny", vec![0; 10]).unwrap_err();
        assert!(matches!(err, AlignError::MalformedMatrix { len: 10, .. }));
    }

    #[test]
    fn persisted_matrix_keeps_scores_and_meta() {
        let mut m = SubstitutionMatrix::builtin(MatrixKind::Blosum62);
        m.set_meta(MatrixMeta {
            source: Some("builtin:blosum62".to_string()),
            created: Some("2024-01-01T00:00:00+00:00".to_string()),
        });
        let mut buf: Vec<u8> = Vec::new();
        m.write_to(&mut buf).unwrap();
        let loaded = SubstitutionMatrix::read_from(Cursor::new(buf)).unwrap();
        assert_eq!(loaded, m);
    }

    #[test]
    fn asymmetric_table_still_loads() {
        let mut scores = vec![0; SIGMA * SIGMA];
        scores[1] = 5; // A -> B only
        let m = SubstitutionMatrix::from_scores("skew", scores).unwrap();
        assert!(!m.is_symmetric());
        let mut buf: Vec<u8> = Vec::new();
        m.write_to(&mut buf).unwrap();
        let loaded = SubstitutionMatrix::read_from(Cursor::new(buf)).unwrap();
        assert_eq!(loaded.score(b'A', b'B').unwrap(), 5);
        assert_eq!(loaded.score(b'B', b'A').unwrap(), 0);
    }

    #[test]
    fn score_range_check() {
        let id = ScoringModel::builtin(MatrixKind::Identity, 1).unwrap();
        assert_eq!(SubstitutionMatrix::identity().max_abs_score(), 1);
        assert!(id.check_range(0, 0).is_ok());
        assert!(id.check_range(1_000, 1_000).is_ok());

        // (1 + 1) * (gap + 1) lands one past i32::MAX
        let edge = ScoringModel::builtin(MatrixKind::Identity, (i32::MAX - 1) / 2).unwrap();
        assert!(edge.check_range(1, 1).is_err());
        let half = ScoringModel::builtin(MatrixKind::Identity, i32::MAX / 2 - 1).unwrap();
        assert!(half.check_range(1, 1).is_ok());

        let pam = ScoringModel::builtin(MatrixKind::Pam250, i32::MAX).unwrap();
        assert!(matches!(pam.check_range(2, 2), Err(AlignError::ScoreOverflow { max_score: 17, rows: 3, cols: 3, .. })));
    }

    #[test]
    fn loading_malformed_table_fails() {
        let bad = SubstitutionMatrix { name: "bad".to_string(), scores: vec![1, 2, 3], meta: MatrixMeta::default() };
        let mut buf: Vec<u8> = Vec::new();
        bad.write_to(&mut buf).unwrap();
        assert!(SubstitutionMatrix::read_from(Cursor::new(buf)).is_err());
    }
}
