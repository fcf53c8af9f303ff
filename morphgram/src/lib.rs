//! # morphgram
//!
//! morphgramは、コンパクトな形態素辞書と、属性の一致(格・数・品詞)を
//! 単一化で扱う文法パターンマッチャーの実装です。
//!
//! ## 概要
//!
//! - **形態素辞書**: 語ごとに品詞・数・格の組を格納した固定レイアウトのバイナリ辞書。
//!   二分探索による完全一致検索と、複数語の見出し(慣用句)の検索を提供します。
//! - **文法**: 非終端記号ごとに順序付きの選択肢(パターン)を持ち、読み込み時に
//!   すべてコンパイルされます。
//! - **マッチャー**: 入力文の指定位置から開始記号を照合し、公開された属性を持つ
//!   導出木をすべて返します。部分問題はメモ化されます。
//!
//! ## 使用例
//!
//! ```
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use morphgram::{DictionaryBuilder, Grammar, Parser};
//!
//! let lexicon = "большой\tADJF,Qual masc,sing,nomn
//! дом\tNOUN,inan,masc sing,nomn
//! дом\tNOUN,inan,masc sing,accs";
//! let dict = DictionaryBuilder::from_text(lexicon)?;
//! let grammar = Grammar::from_reader(
//!     "np -> {pos=adjf case=@1 number=@2} {pos=noun !case=@1 !number=@2}".as_bytes(),
//! )?;
//!
//! let parser = Parser::new(dict, grammar);
//! let mut worker = parser.new_worker();
//!
//! worker.reset_sentence("Большой дом");
//! assert_eq!(worker.parse_complete("np")?, 1);
//!
//! let d = worker.derivation(0);
//! assert_eq!(d.name(), "np");
//! assert_eq!(d.surface(), "Большой дом");
//! assert_eq!(d.range_char(), 0..11);
//! assert_eq!(d.range_byte(), 0..21);
//! assert_eq!(d.attributes().to_string(), "sing,nomn");
//! # Ok(())
//! # }
//! ```

#[cfg(not(any(target_pointer_width = "32", target_pointer_width = "64")))]
compile_error!("`target_pointer_width` must be 32 or 64");

/// 形態素辞書とビルダー
pub mod dictionary;

/// エラー型の定義
pub mod errors;

/// 文法とパターンコンパイラ
pub mod grammar;

/// 単一化に基づくマッチャー
pub mod matcher;

/// 入力文の内部表現
mod sentence;

/// 辞書の読み込みと解放を管理するセッション
pub mod session;

/// 内部ユーティリティ関数
pub mod utils;

#[cfg(test)]
mod tests;

// Re-exports
pub use dictionary::{Dictionary, DictionaryBuilder};
pub use grammar::{Grammar, Pattern};
pub use matcher::Parser;
pub use session::Session;

/// このライブラリのバージョン番号
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
