pub const SIGMA: usize = 26; // A..Z

#[inline]
pub fn to_index(b: u8) -> Option<usize> {
    match b {
        b'A'..=b'Z' => Some((b - b'A') as usize),
        _ => None,
    }
}

#[inline]
pub fn from_index(i: usize) -> u8 {
    debug_assert!(i < SIGMA);
    b'A' + i as u8
}

/// 将残基序列编码为字母表下标；遇到字母表外的字符时返回其在序列中的位置与字符。
pub fn encode(seq: &[u8]) -> Result<Vec<u8>, (usize, u8)> {
    let mut out = Vec::with_capacity(seq.len());
    for (pos, &b) in seq.iter().enumerate() {
        match to_index(b) {
            Some(i) => out.push(i as u8),
            None => return Err((pos, b)),
        }
    }
    Ok(out)
}
