//! 结果输出：比对文件、带行列标题的打分矩阵文件，以及屏幕上的定宽显示。

use anyhow::{Context, Result};
use std::io::Write;

use crate::align::{AlignmentResult, DpMatrix};
use crate::sequence::Sequence;

/// 屏幕显示时每个单元占的宽度
pub const SCREEN_WIDTH: usize = 5;

pub fn score_line(result: &AlignmentResult) -> String {
    format!("score = {}", result.score)
}

/// 三行比对 + 得分行
pub fn write_alignment<W: Write>(mut w: W, result: &AlignmentResult) -> Result<()> {
    for row in result.rows() {
        writeln!(w, "{}", row)?;
    }
    writeln!(w, "{}", score_line(result))?;
    Ok(())
}

/// 给矩阵加上行列标题：首行为 "", "-", 序列 2 残基；每行以 "-" 或序列 1 残基开头
pub fn labeled_matrix(matrix: &DpMatrix, first: &Sequence, second: &Sequence) -> Vec<Vec<String>> {
    let mut grid = Vec::with_capacity(matrix.rows() + 1);

    let mut header = vec![String::new(), "-".to_string()];
    header.extend(second.residues().iter().map(|&b| (b as char).to_string()));
    grid.push(header);

    for (i, row) in matrix.iter_rows().enumerate() {
        let label = if i == 0 { "-".to_string() } else { (first.residues()[i - 1] as char).to_string() };
        let mut line = Vec::with_capacity(row.len() + 1);
        line.push(label);
        line.extend(row.iter().map(i32::to_string));
        grid.push(line);
    }
    grid
}

/// 制表符分隔的打分矩阵
pub fn write_score_matrix<W: Write>(mut w: W, matrix: &DpMatrix, first: &Sequence, second: &Sequence) -> Result<()> {
    for line in labeled_matrix(matrix, first, second) {
        writeln!(w, "{}", line.join("\t"))?;
    }
    Ok(())
}

/// 每个单元右对齐到 width
pub fn pad_row<S: AsRef<str>>(cells: impl IntoIterator<Item = S>, width: usize) -> String {
    let mut out = String::new();
    for c in cells {
        out.push_str(&format!("{:>w$}", c.as_ref(), w = width));
    }
    out
}

pub fn render_alignment(result: &AlignmentResult, width: usize) -> String {
    let mut out = String::new();
    for row in result.rows() {
        out.push_str(&pad_row(row.chars().map(String::from), width));
        out.push('\n');
    }
    out.push_str(&score_line(result));
    out.push('\n');
    out
}

pub fn render_matrix(matrix: &DpMatrix, first: &Sequence, second: &Sequence, width: usize) -> String {
    let mut out = String::new();
    for line in labeled_matrix(matrix, first, second) {
        out.push_str(&pad_row(&line, width));
        out.push('\n');
    }
    out
}

pub fn save_alignment(path: &str, result: &AlignmentResult) -> Result<()> {
    let f = std::fs::File::create(path).with_context(|| format!("cannot create alignment file '{}'", path))?;
    let mut w = std::io::BufWriter::new(f);
    write_alignment(&mut w, result)?;
    w.flush()?;
    Ok(())
}

pub fn save_score_matrix(path: &str, matrix: &DpMatrix, first: &Sequence, second: &Sequence) -> Result<()> {
    let f = std::fs::File::create(path).with_context(|| format!("cannot create score matrix file '{}'", path))?;
    let mut w = std::io::BufWriter::new(f);
    write_score_matrix(&mut w, matrix, first, second)?;
    w.flush()?;
    Ok(())
}
