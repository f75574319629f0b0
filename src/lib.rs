//! # pairalign
//!
//! 基于动态规划的两两蛋白序列比对。
//!
//! 本 crate 提供：
//!
//! - **打分模型**：A..Z 替换矩阵（内置 PAM250 / BLOSUM62 / identity，可持久化）+ 线性空位罚分
//! - **矩阵构建**：全局、局部、半全局三种边界/截断规则，支持按反对角线并行填充
//! - **回溯**：固定优先级（对角 > 上 > 左）重建唯一一条最优路径
//! - **结果输出**：三行比对、带标题的打分矩阵、屏幕定宽显示
//!
//! ## 快速示例
//!
//! ```rust
//! use pairalign::align::{align_pair, AlignConfig, Strategy};
//! use pairalign::scoring::{MatrixKind, ScoringModel};
//! use pairalign::sequence::Sequence;
//!
//! let a = Sequence::new("a", "HEAGAWGHEE").unwrap();
//! let b = Sequence::new("b", "PAWHEAE").unwrap();
//! let scoring = ScoringModel::builtin(MatrixKind::Blosum62, 8).unwrap();
//!
//! let out = align_pair(&a, &b, &scoring, &AlignConfig::new(Strategy::Local)).unwrap();
//! assert_eq!(out.matrix.rows(), a.len() + 1);
//! assert_eq!(out.result.score, out.matrix.max_value());
//! println!("{}\n{}\n{}", out.result.top, out.result.middle, out.result.bottom);
//! ```
//!
//! ## 模块说明
//!
//! - [`sequence`] — 已校验的序列类型
//! - [`scoring`] — 替换矩阵与打分模型
//! - [`align`] — 矩阵构建、回溯与结果组装
//! - [`io`] — FASTA 解析与结果输出
//! - [`util`] — 字母表编码

pub mod align;
pub mod error;
pub mod io;
pub mod scoring;
pub mod sequence;
pub mod util;

pub use error::AlignError;
