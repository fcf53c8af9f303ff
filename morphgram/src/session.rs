//! 辞書の読み込みと解放を管理するセッション
//!
//! [`Session`]は文法を所有し、辞書ファイルの読み込み([`Session::init`])と
//! 解放([`Session::finalize`])の間だけ照合を受け付けます。
//! プロセス全体で共有される状態は持たないため、複数のセッションを
//! 独立に使うことができます。

use std::path::Path;
use std::sync::Arc;

use crate::dictionary::Dictionary;
use crate::errors::{MorphgramError, Result};
use crate::grammar::Grammar;
use crate::matcher::derivation::ParseMatch;
use crate::matcher::{DEFAULT_SEPARATOR, Parser};

/// 辞書の読み込み状態を持つ照合セッション
///
/// # 例
///
/// ```no_run
/// use morphgram::{Grammar, Session};
///
/// let grammar = Grammar::from_reader(std::fs::File::open("grammar.txt")?)?;
/// let mut session = Session::new(grammar);
/// session.init("morph.db")?;
/// for m in session.parse("Большой дом", "np", 0)? {
///     println!("{} {}", m.text, m.attributes);
/// }
/// session.finalize();
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub struct Session {
    grammar: Arc<Grammar>,
    parser: Option<Parser>,
    separator: String,
    max_derivations: usize,
}

impl Session {
    /// 辞書を読み込んでいない新しいセッションを作成します。
    pub fn new(grammar: Grammar) -> Self {
        Self {
            grammar: Arc::new(grammar),
            parser: None,
            separator: DEFAULT_SEPARATOR.to_string(),
            max_derivations: 0,
        }
    }

    /// 次の[`Session::init`]以降に使う区切り文字列を設定します。
    ///
    /// [`Parser::separator`]を参照してください。
    pub fn separator<S>(mut self, separator: S) -> Self
    where
        S: Into<String>,
    {
        self.separator = separator.into();
        self
    }

    /// 次の[`Session::init`]以降に使う導出数の上限を設定します。
    ///
    /// [`Parser::max_derivations`]を参照してください。
    pub fn max_derivations(mut self, max_derivations: usize) -> Self {
        self.max_derivations = max_derivations;
        self
    }

    /// 辞書ファイルを読み込みます。
    ///
    /// 読み込み済みの辞書がある場合は、先にそれを解放します。
    ///
    /// # エラー
    ///
    /// 辞書の読み込みに失敗した場合にエラーを返します。
    /// この場合、セッションは辞書を保持しません。
    pub fn init<P>(&mut self, db_path: P) -> Result<()>
    where
        P: AsRef<Path>,
    {
        self.finalize();
        let dict = Dictionary::from_path(db_path)?;
        self.parser = Some(
            Parser::from_shared(Arc::new(dict), Arc::clone(&self.grammar))
                .separator(self.separator.as_str())
                .max_derivations(self.max_derivations),
        );
        Ok(())
    }

    /// 読み込んだ辞書を解放します。辞書がない場合は何もしません。
    pub fn finalize(&mut self) {
        if self.parser.take().is_some() {
            log::info!("Released the dictionary");
        }
    }

    /// 辞書が読み込まれている場合に`true`を返します。
    #[inline(always)]
    pub fn is_loaded(&self) -> bool {
        self.parser.is_some()
    }

    /// 読み込まれた辞書と文法を持つパーサーを返します。
    ///
    /// # エラー
    ///
    /// 辞書が読み込まれていない場合に[`MorphgramError::InvalidState`]を返します。
    pub fn parser(&self) -> Result<&Parser> {
        self.parser.as_ref().ok_or_else(|| {
            MorphgramError::invalid_state(
                "no dictionary is loaded",
                "call init() before parsing",
            )
        })
    }

    /// `text`の`offset`から始まる`start`の導出を求めます。
    ///
    /// # 引数
    ///
    /// * `text` - 入力文
    /// * `start` - 開始記号の名前
    /// * `offset` - 正規化後の文字位置
    ///
    /// # 戻り値
    ///
    /// 選択肢の宣言順に並んだ導出木
    ///
    /// # エラー
    ///
    /// 辞書が読み込まれていない場合に[`MorphgramError::InvalidState`]を、
    /// `offset`が文の終端を超える場合に[`MorphgramError::InvalidArgument`]を返します。
    pub fn parse(&self, text: &str, start: &str, offset: usize) -> Result<Vec<ParseMatch>> {
        let mut worker = self.parser()?.new_worker();
        worker.reset_sentence(text);
        worker.parse(start, offset)?;
        Ok(worker.to_matches())
    }

    /// 文法への参照を返します。
    pub fn grammar(&self) -> &Grammar {
        &self.grammar
    }
}
