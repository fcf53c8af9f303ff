//! 文法パターンの照合を実行するユーティリティ
//!
//! このバイナリは、標準入力から読み込んだ文を文法の開始記号で照合し、
//! 指定された出力形式(brief、tree)で導出を出力します。

use std::fs::File;
use std::io::{BufRead, BufWriter, Write};
use std::path::PathBuf;
use std::str::FromStr;

use morphgram::errors::MorphgramError;
use morphgram::matcher::derivation::{Child, Derivation};
use morphgram::{Dictionary, Grammar, Parser};

/// 出力モード
#[derive(Clone, Debug)]
enum OutputMode {
    Brief,
    Tree,
}

impl FromStr for OutputMode {
    type Err = &'static str;

    fn from_str(mode: &str) -> Result<Self, Self::Err> {
        match mode {
            "brief" => Ok(Self::Brief),
            "tree" => Ok(Self::Tree),
            _ => Err("Could not parse a mode"),
        }
    }
}

/// コマンドライン引数
#[derive(clap::Parser, Debug)]
#[clap(name = "parse", about = "Matches sentences against a grammar")]
struct Args {
    /// Binary dictionary file.
    #[clap(short = 'i', long)]
    db_in: PathBuf,

    /// Grammar file (one `name -> pattern` line per alternative).
    #[clap(short = 'g', long)]
    grammar: PathBuf,

    /// Name of the start symbol.
    #[clap(short = 's', long, default_value = "sentence")]
    start: String,

    /// Output mode. Choices are brief and tree.
    #[clap(short = 'O', long, default_value = "brief")]
    output_mode: OutputMode,

    /// Also reports derivations that do not cover the whole sentence.
    #[clap(long)]
    allow_partial: bool,

    /// Separator of multi-word entries. Pass an empty string to disable them.
    #[clap(short = 'S', long, default_value = " ")]
    separator: String,

    /// Maximum number of derivations per expansion. 0 means unlimited.
    #[clap(short = 'M', long, default_value = "0")]
    max_derivations: usize,
}

/// 照合処理中に発生する可能性のあるエラー
#[derive(Debug, thiserror::Error)]
enum ParseError {
    /// 入出力エラー
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// 辞書・文法の読み込みや照合のエラー
    #[error(transparent)]
    Morphgram(#[from] MorphgramError),
}

fn write_tree<W>(out: &mut W, d: &Derivation, depth: usize) -> std::io::Result<()>
where
    W: Write,
{
    let indent = "  ".repeat(depth);
    writeln!(
        out,
        "{indent}{}\t{}\t{:?}\t{}",
        d.name(),
        d.surface(),
        d.range_char(),
        d.attributes()
    )?;
    for child in d.children() {
        match child {
            Child::Word(w) => {
                writeln!(out, "{indent}  {}\t{}", w.surface(), w.features())?;
            }
            Child::Phrase(p) => write_tree(out, &p, depth + 1)?,
        }
    }
    Ok(())
}

fn main() -> Result<(), ParseError> {
    let args = <Args as clap::Parser>::parse();

    eprintln!("Loading the dictionary...");
    let dict = Dictionary::from_path(&args.db_in)?;

    eprintln!("Loading the grammar...");
    let grammar = Grammar::from_reader(File::open(&args.grammar)?)?;
    for name in grammar.undefined_symbols() {
        eprintln!("warning: `{name}` has no rules and matches dictionary words");
    }

    let parser = Parser::new(dict, grammar)
        .separator(args.separator)
        .max_derivations(args.max_derivations);
    let mut worker = parser.new_worker();

    eprintln!("Ready to parse");

    let is_tty = atty::is(atty::Stream::Stdout);

    let out = std::io::stdout();
    let mut out = BufWriter::new(out.lock());
    let lines = std::io::stdin().lock().lines();
    for line in lines {
        let line = line?;
        worker.reset_sentence(line);
        if args.allow_partial {
            worker.parse(&args.start, 0)?;
        } else {
            worker.parse_complete(&args.start)?;
        }
        match args.output_mode {
            OutputMode::Brief => {
                for d in worker.derivation_iter() {
                    writeln!(&mut out, "{}\t{:?}\t{}", d.surface(), d.range_char(), d.attributes())?;
                }
            }
            OutputMode::Tree => {
                for d in worker.derivation_iter() {
                    write_tree(&mut out, &d, 0)?;
                }
            }
        }
        out.write_all(b"EOS\n")?;
        if is_tty {
            out.flush()?;
        }
    }
    out.flush()?;

    Ok(())
}
