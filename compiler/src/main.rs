//! morphgram 辞書コンパイラのメインエントリーポイント
//!
//! このモジュールは、レキシコンから形態素辞書ファイルを構築し、
//! 構築した辞書の内容を確認するためのサブコマンドを提供します。

mod build;
mod lookup;

use clap::Parser;
use thiserror::Error;

use crate::{build::BuildError, lookup::LookupError};

/// コマンドライン引数の構造体
#[derive(Parser, Debug)]
#[clap(name = "compile", version)]
struct Cli {
    /// 実行するサブコマンド
    #[clap(subcommand)]
    command: Command,
}

/// 利用可能なサブコマンド
#[derive(Parser, Debug)]
enum Command {
    /// レキシコンからバイナリ辞書を構築します
    Build(build::Args),

    /// 辞書に格納された語の読みを表示します
    Lookup(lookup::Args),
}

/// コンパイラの実行中に発生する可能性のあるエラー
#[derive(Debug, Error)]
pub enum CompileError {
    /// 辞書ビルド中のエラー
    #[error(transparent)]
    BuildError(#[from] BuildError),
    /// 辞書検索中のエラー
    #[error(transparent)]
    LookupError(#[from] LookupError),
}

fn main() -> Result<(), CompileError> {
    let cli = Cli::parse();
    match cli.command {
        Command::Build(args) => Ok(build::run(args)?),
        Command::Lookup(args) => Ok(lookup::run(args)?),
    }
}
