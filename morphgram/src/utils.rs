//! ユーティリティ関数と型変換トレイトを提供するモジュール
//!
//! 主に以下の機能を提供します：
//!
//! - `FromU32`: u32からの型変換トレイト
//! - 辞書構築時と解析時で共通の文字正規化
//! - テスト用のマクロ

/// u32から他の型への変換を提供するトレイト
///
/// 標準ライブラリのFromトレイトとは異なり、特定の最適化や
/// プラットフォーム固有の仮定を行うことができます。
pub trait FromU32 {
    /// u32値から実装型を生成する
    fn from_u32(src: u32) -> Self;
}

#[cfg(any(target_pointer_width = "32", target_pointer_width = "64"))]
impl FromU32 for usize {
    /// u32値をusizeに変換する
    ///
    /// ポインタ幅が32ビットまたは64ビットであることが保証されているため、
    /// この変換は常に成功します。
    #[inline(always)]
    fn from_u32(src: u32) -> Self {
        // Since the pointer width is guaranteed to be 32 or 64,
        // the following process always succeeds.
        unsafe { Self::try_from(src).unwrap_unchecked() }
    }
}

/// 1文字を小文字に正規化する
///
/// 辞書のビルド時と入力文の解析時の両方で同じ規則を使う必要があります。
/// 小文字化の結果が複数文字に展開される文字(例: `İ`)は元の文字のまま残し、
/// 入力と正規化後の文字位置が常に1対1に対応するようにします。
///
/// # 引数
///
/// * `c` - 正規化する文字
///
/// # 戻り値
///
/// 正規化された文字
#[inline(always)]
pub fn normalize_char(c: char) -> char {
    let mut lower = c.to_lowercase();
    match (lower.next(), lower.next()) {
        (Some(l), None) => l,
        _ => c,
    }
}

/// 文字列全体を[`normalize_char`]で正規化する
///
/// # 例
///
/// ```
/// # use morphgram::utils::normalize_str;
/// assert_eq!(normalize_str("Большой ДОМ"), "большой дом");
/// ```
pub fn normalize_str(s: &str) -> String {
    s.chars().map(normalize_char).collect()
}

/// 単語を構成する文字かどうかを判定する
///
/// 英数字とハイフン(`из-за`のような複合語のため)を単語構成文字とみなします。
/// それ以外の文字(空白、句読点)は単語境界になります。
#[inline(always)]
pub fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '-'
}

#[cfg(test)]
/// HashMapリテラルを簡潔に記述するためのマクロ
///
/// # 例
///
/// ```ignore
/// let map = hashmap! {
///     "key1" => "value1",
///     "key2" => "value2",
/// };
/// ```
///
/// # 注意
///
/// このマクロはテスト時のみ利用可能です。
macro_rules! hashmap {
    ( $($k:expr => $v:expr,)* ) => {
        {
            #[allow(unused_mut)]
            let mut h = hashbrown::HashMap::new();
            $(
                h.insert($k, $v);
            )*
            h
        }
    };
    ( $($k:expr => $v:expr),* ) => {
        hashmap![$( $k => $v, )*]
    };
}

#[cfg(test)]
pub(crate) use hashmap;
