//! 演示如何在 library 模式下使用 pairalign 进行两两比对。
//!
//! 运行方式：
//! ```bash
//! cargo run --example simple_align
//! ```

use pairalign::align::{align_pair, AlignConfig, SemiGlobalStart, Strategy};
use pairalign::io::report;
use pairalign::scoring::{MatrixKind, ScoringModel};
use pairalign::sequence::Sequence;

fn main() -> anyhow::Result<()> {
    // 1. 构建两条序列
    let a = Sequence::new("seq1", "HEAGAWGHEE")?;
    let b = Sequence::new("seq2", "PAWHEAE")?;
    println!("{}\n{}", a, b);

    // 2. 打分模型：BLOSUM62，空位罚分 8
    let scoring = ScoringModel::builtin(MatrixKind::Blosum62, 8)?;

    // 3. 三种策略各跑一次
    for strategy in Strategy::ALL {
        let out = align_pair(&a, &b, &scoring, &AlignConfig::new(strategy))?;
        println!("\n{} 比对（CIGAR {}）:", strategy, out.result.cigar());
        print!("{}", report::render_alignment(&out.result, 1));
    }

    // 4. 半全局：从最优末端单元开始回溯
    let config = AlignConfig {
        strategy: Strategy::SemiGlobal,
        semi_global_start: SemiGlobalStart::BestCell,
        ..AlignConfig::default()
    };
    let out = align_pair(&a, &b, &scoring, &config)?;
    println!("\n半全局（从最优单元 {} 回溯）:", out.optimum);
    print!("{}", report::render_alignment(&out.result, 1));

    // 5. 打分矩阵
    println!("\n打分矩阵:");
    print!("{}", report::render_matrix(&out.matrix, &a, &b, report::SCREEN_WIDTH));

    Ok(())
}
