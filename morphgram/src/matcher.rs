//! 単一化に基づくパターンマッチャー。
//!
//! このモジュールは、文法と形態素辞書を使って入力文を照合するパーサーを提供します。
//! 文法の各項は属性制約を持ち、同じ変数を共有する項の属性は一致しなければなりません
//! (例えば形容詞と名詞の格と数の一致)。
//!
//! # 主要な構造体
//!
//! - [`Parser`]: 辞書と文法を保持する、スレッド間で共有可能なパーサー
//! - [`Worker`]: 1つの文に対する照合を行うワーカー
//!
//! # 例
//!
//! ```
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use morphgram::{DictionaryBuilder, Grammar, Parser};
//!
//! let dict = DictionaryBuilder::from_text(
//!     "большой\tadjf,sing,nomn\nдом\tnoun,sing,nomn\nдома\tnoun,sing,gent",
//! )?;
//! let grammar = Grammar::from_rules([
//!     ("np", "{pos=adjf case=@1 number=@2} {pos=noun !case=@1 !number=@2}"),
//! ])?;
//!
//! let parser = Parser::new(dict, grammar);
//! let mut worker = parser.new_worker();
//!
//! worker.reset_sentence("Большой дом");
//! assert_eq!(worker.parse("np", 0)?, 1);
//! assert_eq!(worker.derivation(0).attributes().to_string(), "sing,nomn");
//!
//! worker.reset_sentence("Большой дома");
//! assert_eq!(worker.parse("np", 0)?, 0);
//! # Ok(())
//! # }
//! ```
pub mod derivation;
pub mod worker;

use std::sync::Arc;

use crate::dictionary::Dictionary;
use crate::grammar::Grammar;
use crate::matcher::worker::Worker;

/// 複数語の見出しで語を区切る既定の文字列
pub const DEFAULT_SEPARATOR: &str = " ";

/// 辞書と文法を保持するパーサー。
///
/// 辞書と文法は読み込み後に変更されないため、[`Parser`]は安価に複製でき、
/// 複数のスレッドでそれぞれの[`Worker`]を使って同時に照合できます。
#[derive(Clone)]
pub struct Parser {
    dict: Arc<Dictionary>,
    grammar: Arc<Grammar>,
    separator: String,
    max_derivations: Option<usize>,
}

impl Parser {
    /// 新しいパーサーを作成します。
    ///
    /// # 引数
    ///
    /// * `dict` - 形態素辞書
    /// * `grammar` - 文法
    pub fn new(dict: Dictionary, grammar: Grammar) -> Self {
        Self::from_shared(Arc::new(dict), Arc::new(grammar))
    }

    /// 共有された辞書と文法から新しいパーサーを作成します。
    pub fn from_shared(dict: Arc<Dictionary>, grammar: Arc<Grammar>) -> Self {
        Self {
            dict,
            grammar,
            separator: DEFAULT_SEPARATOR.to_string(),
            max_derivations: None,
        }
    }

    /// 複数語の見出しで語を区切る文字列を設定します。
    ///
    /// 空文字列を指定すると、辞書の語は入力の1語とだけ照合されます。
    ///
    /// # 引数
    ///
    /// * `separator` - 区切り文字列。既定値は[`DEFAULT_SEPARATOR`]。
    pub fn separator<S>(mut self, separator: S) -> Self
    where
        S: Into<String>,
    {
        self.separator = separator.into();
        self
    }

    /// 1回の非終端記号の展開が返す導出の最大数を設定します。
    ///
    /// 曖昧な文法では導出の数が組み合わせ的に増えるため、上限を設けることで
    /// 照合時間を抑えられます。上限に達した時点で残りの選択肢は試されません。
    ///
    /// # 引数
    ///
    /// * `max_derivations` - 最大数。0の場合は上限なし。
    pub fn max_derivations(mut self, max_derivations: usize) -> Self {
        self.max_derivations = if max_derivations == 0 {
            None
        } else {
            Some(max_derivations)
        };
        self
    }

    /// 新しいワーカーを作成します。
    pub fn new_worker(&self) -> Worker {
        Worker::new(self.clone())
    }

    /// 辞書への参照を返します。
    #[inline(always)]
    pub fn dictionary(&self) -> &Dictionary {
        &self.dict
    }

    /// 文法への参照を返します。
    #[inline(always)]
    pub fn grammar(&self) -> &Grammar {
        &self.grammar
    }

    #[inline(always)]
    pub(crate) fn shared_grammar(&self) -> &Arc<Grammar> {
        &self.grammar
    }

    #[inline(always)]
    pub(crate) fn separator_str(&self) -> &str {
        &self.separator
    }

    #[inline(always)]
    pub(crate) fn derivation_limit(&self) -> Option<usize> {
        self.max_derivations
    }
}
