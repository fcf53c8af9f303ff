//! エラー型の定義
//!
//! このモジュールは、morphgramライブラリで使用されるすべてのエラー型を定義します。

use std::error::Error;
use std::fmt::{self, Debug};

/// morphgram専用のResult型
///
/// エラー型としてデフォルトで[`MorphgramError`]を使用します。
pub type Result<T, E = MorphgramError> = std::result::Result<T, E>;

/// morphgramのエラー型
///
/// このライブラリで発生する可能性のあるすべてのエラーを表現します。
/// 辞書ファイルが「読めない」場合(I/O)と「壊れている」場合(フォーマット)は
/// 別のバリアントとして区別されます。
#[derive(Debug, thiserror::Error)]
pub enum MorphgramError {
    /// 無効な引数エラー
    ///
    /// [`InvalidArgumentError`]のエラーバリアント。
    #[error(transparent)]
    InvalidArgument(InvalidArgumentError),

    /// 無効なフォーマットエラー
    ///
    /// [`InvalidFormatError`]のエラーバリアント。
    #[error(transparent)]
    InvalidFormat(InvalidFormatError),

    /// 無効な状態エラー
    ///
    /// [`InvalidStateError`]のエラーバリアント。
    #[error(transparent)]
    InvalidState(InvalidStateError),

    /// 文法パターンのコンパイルエラー
    ///
    /// [`InvalidPatternError`]のエラーバリアント。
    #[error(transparent)]
    InvalidPattern(InvalidPatternError),

    /// 辞書ファイルのマジックナンバー不一致
    #[error("BadMagic: expected {expected:#010x}, found {found:#010x}")]
    BadMagic {
        /// 期待されるマジックナンバー
        expected: u32,
        /// ファイルに書かれていた値
        found: u32,
    },

    /// 辞書ファイルがヘッダの宣言より短い
    #[error("Truncated: {section} declares {declared} bytes, but only {available} are available")]
    Truncated {
        /// 不足しているセクション名
        section: &'static str,
        /// ヘッダが宣言するバイト数
        declared: usize,
        /// 実際に読み込めたバイト数
        available: usize,
    },

    /// 整数変換エラー
    ///
    /// [`TryFromIntError`](std::num::TryFromIntError)のエラーバリアント。
    #[error(transparent)]
    TryFromInt(std::num::TryFromIntError),

    /// 標準I/Oエラー
    ///
    /// [`std::io::Error`]のエラーバリアント。
    #[error(transparent)]
    StdIo(#[from] std::io::Error),

    /// UTF-8エンコーディングエラー
    ///
    /// [`std::str::Utf8Error`]のエラーバリアント。
    #[error(transparent)]
    Utf8(std::str::Utf8Error),

    /// 一時ファイルの永続化エラー
    ///
    /// [`tempfile::PersistError`](tempfile::PersistError)のエラーバリアント。
    #[error(transparent)]
    PathPersist(#[from] tempfile::PersistError),
}

impl MorphgramError {
    /// 無効な引数エラーを生成します
    ///
    /// # 引数
    ///
    /// * `arg` - 引数の名前
    /// * `msg` - エラーメッセージ
    pub(crate) fn invalid_argument<S>(arg: &'static str, msg: S) -> Self
    where
        S: Into<String>,
    {
        Self::InvalidArgument(InvalidArgumentError {
            arg,
            msg: msg.into(),
        })
    }

    /// 無効なフォーマットエラーを生成します
    ///
    /// # 引数
    ///
    /// * `arg` - フォーマット名
    /// * `msg` - エラーメッセージ
    pub(crate) fn invalid_format<S>(arg: &'static str, msg: S) -> Self
    where
        S: Into<String>,
    {
        Self::InvalidFormat(InvalidFormatError {
            arg,
            msg: msg.into(),
        })
    }

    /// 無効な状態エラーを生成します
    ///
    /// # 引数
    ///
    /// * `msg` - エラーメッセージ
    /// * `cause` - エラーの原因
    pub(crate) fn invalid_state<S, M>(msg: S, cause: M) -> Self
    where
        S: Into<String>,
        M: Into<String>,
    {
        Self::InvalidState(InvalidStateError {
            msg: msg.into(),
            cause: cause.into(),
        })
    }

    /// パターンのコンパイルエラーを生成します
    ///
    /// # 引数
    ///
    /// * `pattern` - コンパイルに失敗したパターン文字列
    /// * `msg` - エラーメッセージ
    pub(crate) fn invalid_pattern<P, S>(pattern: P, msg: S) -> Self
    where
        P: Into<String>,
        S: Into<String>,
    {
        Self::InvalidPattern(InvalidPatternError {
            nonterminal: None,
            pattern: pattern.into(),
            msg: msg.into(),
        })
    }

    /// パターンエラーに、それが属する非終端記号の名前を付与します。
    pub(crate) fn in_nonterminal(self, name: &str) -> Self {
        match self {
            Self::InvalidPattern(mut e) => {
                e.nonterminal = Some(name.to_string());
                Self::InvalidPattern(e)
            }
            e => e,
        }
    }
}

/// 引数が無効な場合に使用されるエラー
#[derive(Debug)]
pub struct InvalidArgumentError {
    /// 引数の名前
    pub(crate) arg: &'static str,

    /// エラーメッセージ
    pub(crate) msg: String,
}

impl fmt::Display for InvalidArgumentError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "InvalidArgumentError: {}: {}", self.arg, self.msg)
    }
}

impl Error for InvalidArgumentError {}

/// 入力フォーマットが無効な場合に使用されるエラー
#[derive(Debug)]
pub struct InvalidFormatError {
    /// フォーマットの名前
    pub(crate) arg: &'static str,

    /// エラーメッセージ
    pub(crate) msg: String,
}

impl fmt::Display for InvalidFormatError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "InvalidFormatError: {}: {}", self.arg, self.msg)
    }
}

impl Error for InvalidFormatError {}

/// 状態が無効な場合に使用されるエラー
#[derive(Debug)]
pub struct InvalidStateError {
    /// エラーメッセージ
    pub(crate) msg: String,

    /// エラーの根本原因
    pub(crate) cause: String,
}

impl fmt::Display for InvalidStateError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "InvalidStateError: {}: {}", self.msg, self.cause)
    }
}

impl Error for InvalidStateError {}

/// 文法パターンが不正な場合に使用されるエラー
#[derive(Debug)]
pub struct InvalidPatternError {
    /// パターンが属する非終端記号
    pub(crate) nonterminal: Option<String>,

    /// パターン文字列
    pub(crate) pattern: String,

    /// エラーメッセージ
    pub(crate) msg: String,
}

impl fmt::Display for InvalidPatternError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match &self.nonterminal {
            Some(name) => write!(
                f,
                "InvalidPatternError: {}: {:?}: {}",
                name, self.pattern, self.msg
            ),
            None => write!(f, "InvalidPatternError: {:?}: {}", self.pattern, self.msg),
        }
    }
}

impl Error for InvalidPatternError {}

impl From<std::num::TryFromIntError> for MorphgramError {
    fn from(error: std::num::TryFromIntError) -> Self {
        Self::TryFromInt(error)
    }
}

impl From<std::str::Utf8Error> for MorphgramError {
    fn from(error: std::str::Utf8Error) -> Self {
        Self::Utf8(error)
    }
}
