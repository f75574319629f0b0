/// 比对核心的错误类型。CLI 层通过 anyhow 附加上下文后再报告。
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum AlignError {
    #[error("sequence '{label}' has invalid residue '{residue}' at position {position}; only A-Z are supported")]
    InvalidResidue {
        label: String,
        residue: char,
        position: usize,
    },
    #[error("residue '{0}' is outside the A-Z alphabet")]
    UnknownResidue(char),
    #[error("gap penalty must be >= 0, got {0}")]
    NegativeGapPenalty(i32),
    #[error("exactly one alignment strategy (global, local or semi-global) must be selected, got {selected}")]
    StrategySelection { selected: usize },
    #[error("unknown substitution matrix '{0}' (expected pam250, blosum62 or identity)")]
    UnknownMatrix(String),
    #[error("substitution matrix '{name}' has {len} scores, expected {expected}")]
    MalformedMatrix {
        name: String,
        len: usize,
        expected: usize,
    },
    #[error("gap penalty {gap_penalty} with substitution scores up to {max_score} may overflow i32 for a {rows}x{cols} matrix")]
    ScoreOverflow {
        gap_penalty: i32,
        max_score: u32,
        rows: usize,
        cols: usize,
    },
    #[error("traceback stalled at cell ({row}, {col}): no predecessor reproduces its score")]
    TracebackStalled { row: usize, col: usize },
}
