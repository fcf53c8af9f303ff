//! 形態素辞書のビルドモジュール
//!
//! `<語>\t<タグ>[,<タグ>]*`形式のレキシコンからバイナリ辞書を構築します。

use std::path::PathBuf;
use std::time::Instant;

use morphgram::{Dictionary, DictionaryBuilder, errors::MorphgramError};

use clap::Parser;

/// ビルドコマンドの引数
#[derive(Parser, Debug)]
#[clap(name = "build", about = "A program to build the morphological dictionary.")]
pub struct Args {
    /// Lexicon file (one `word<TAB>tags` line per reading).
    #[clap(short = 'l', long)]
    lexicon_in: PathBuf,

    /// File to which the binary dictionary is output.
    #[clap(short = 'o', long)]
    db_out: PathBuf,

    /// Loads the written dictionary again and verifies its layout.
    #[clap(long)]
    verify: bool,
}

/// ビルド処理中に発生する可能性のあるエラー
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    /// 辞書構築エラー
    #[error("Dictionary building failed: {0}")]
    Morphgram(#[from] MorphgramError),
}

/// ビルドコマンドを実行する
///
/// 辞書は一時ファイルに書き出された後で`--db-out`に移動されるため、
/// 失敗した場合に不完全な辞書が残ることはありません。
///
/// # エラー
///
/// レキシコンの読み込みや辞書の書き出しに失敗した場合、`BuildError`を返します。
pub fn run(args: Args) -> Result<(), BuildError> {
    eprintln!("Compiling the dictionary...");
    let start = Instant::now();
    DictionaryBuilder::build_file(&args.lexicon_in, &args.db_out)?;
    eprintln!("{} seconds", start.elapsed().as_secs_f64());

    if args.verify {
        eprintln!("Verifying the dictionary...");
        let dict = Dictionary::from_path(&args.db_out)?;
        eprintln!(
            "{} readings of {} words",
            dict.len(),
            dict.num_words()
        );
    }

    eprintln!("Successfully built the dictionary to {}", args.db_out.display());
    Ok(())
}
