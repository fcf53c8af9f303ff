//! 辞書の検索モジュール
//!
//! 構築済みの辞書から語の読みを引き、1行に1つずつ表示します。

use std::io::{self, BufRead, BufWriter, Write};
use std::path::PathBuf;

use morphgram::{Dictionary, errors::MorphgramError, utils::normalize_str};

use clap::Parser;

/// 検索コマンドの引数
#[derive(Parser, Debug)]
#[clap(name = "lookup", about = "Prints the readings stored for words.")]
pub struct Args {
    /// Binary dictionary file.
    #[clap(short = 'i', long)]
    db_in: PathBuf,

    /// Separator of multi-word entries. Pass an empty string to disable them.
    #[clap(short = 'S', long, default_value = " ")]
    separator: String,

    /// Words to look up. Reads one word per line from stdin if omitted.
    words: Vec<String>,
}

/// 検索処理中に発生する可能性のあるエラー
#[derive(Debug, thiserror::Error)]
pub enum LookupError {
    /// 入出力エラー
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// 辞書の読み込みエラー
    #[error("Dictionary loading failed: {0}")]
    Morphgram(#[from] MorphgramError),
}

/// 検索コマンドを実行する
///
/// 各読みを`<語>\t<属性>`の形式で出力し、語ごとに空行で区切ります。
///
/// # エラー
///
/// 辞書の読み込みや入出力に失敗した場合、`LookupError`を返します。
pub fn run(args: Args) -> Result<(), LookupError> {
    eprintln!("Loading the dictionary...");
    let dict = Dictionary::from_path(&args.db_in)?;

    let out = io::stdout();
    let mut out = BufWriter::new(out.lock());

    if args.words.is_empty() {
        for line in io::stdin().lock().lines() {
            write_readings(&dict, &line?, &args.separator, &mut out)?;
        }
    } else {
        for word in &args.words {
            write_readings(&dict, word, &args.separator, &mut out)?;
        }
    }
    out.flush()?;
    Ok(())
}

fn write_readings<W>(dict: &Dictionary, word: &str, separator: &str, out: &mut W) -> io::Result<()>
where
    W: Write,
{
    let word = normalize_str(word.trim());
    for form in dict.lookup_with_separator(&word, separator) {
        writeln!(out, "{}\t{}", form.text, form.features)?;
    }
    writeln!(out)
}
