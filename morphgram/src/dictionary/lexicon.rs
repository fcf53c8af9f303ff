//! 辞書ソース(レキシコン)の読み込み
//!
//! レキシコンは1行1エントリのUTF-8テキストで、
//! `<語>\t<タグ>[,<タグ>| <タグ>]*` の形式です。

use crate::dictionary::feature::Features;

/// レキシコンの1行を解釈したもの
///
/// 並べ替えは語を第1キー、属性を第2キーとして行われます。
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd)]
pub struct RawWordEntry<'a> {
    pub word: &'a str,
    pub features: Features,
}

/// 正規化済みのレキシコンから、語でソートされ重複を除いたエントリ列を作成します。
///
/// タブを含まない行(見出し番号の行など)と空行は読み飛ばされます。
/// 同じ語の中で属性の組が同一になる行は1つにまとめられます。
/// 未知のタグは無視されるため、元の行が異なっていても同じ組になる場合があります。
///
/// # 引数
///
/// * `normalized` - [`normalize_str`](crate::utils::normalize_str)で小文字化されたレキシコン全体
pub fn parse_lexicon(normalized: &str) -> Vec<RawWordEntry<'_>> {
    let mut entries = vec![];
    for line in normalized.lines() {
        let Some((word, tags)) = line.split_once('\t') else {
            continue;
        };
        if word.is_empty() {
            log::warn!("Skipped an empty word, {line:?}");
            continue;
        }
        let tags = tags.split([',', ' ']).filter(|t| !t.is_empty());
        entries.push(RawWordEntry {
            word,
            features: Features::from_tags(tags),
        });
    }

    // Sorted by (word, features): the readings of a word form one contiguous run
    // and identical readings become adjacent.
    entries.sort_unstable();
    entries.dedup();
    entries
}
