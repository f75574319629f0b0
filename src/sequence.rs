use std::fmt;

use crate::error::AlignError;
use crate::util::protein;

/// 已校验的蛋白序列：标签 + A..Z 残基。构建后不可变。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sequence {
    label: String,
    residues: Vec<u8>,
    codes: Vec<u8>,
}

impl Sequence {
    pub fn new(label: impl Into<String>, residues: impl Into<Vec<u8>>) -> Result<Self, AlignError> {
        let label = label.into();
        let residues = residues.into();
        let codes = protein::encode(&residues).map_err(|(position, b)| AlignError::InvalidResidue {
            label: label.clone(),
            residue: b as char,
            position,
        })?;
        Ok(Self { label, residues, codes })
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn residues(&self) -> &[u8] {
        &self.residues
    }

    /// 字母表下标形式（0..26）
    pub fn codes(&self) -> &[u8] {
        &self.codes
    }

    pub fn len(&self) -> usize {
        self.residues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.residues.is_empty()
    }
}

impl fmt::Display for Sequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, ">{}\n{}", self.label, String::from_utf8_lossy(&self.residues))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_valid_sequence() {
        let s = Sequence::new("p1", "HEAGAWGHEE").unwrap();
        assert_eq!(s.label(), "p1");
        assert_eq!(s.len(), 10);
        assert_eq!(s.codes()[0], 7);
        assert_eq!(s.to_string(), ">p1\nHEAGAWGHEE");
    }

    #[test]
    fn empty_sequence_is_allowed() {
        let s = Sequence::new("empty", "").unwrap();
        assert!(s.is_empty());
        assert!(s.codes().is_empty());
    }

    #[test]
    fn reports_invalid_residue_with_position() {
        let err = Sequence::new("bad", "AC1D").unwrap_err();
        assert_eq!(
            err,
            AlignError::InvalidResidue { label: "bad".to_string(), residue: '1', position: 2 }
        );
        assert!(Sequence::new("lower", "acd").is_err());
    }
}
