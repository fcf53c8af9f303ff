//! 入力文の内部表現を提供するモジュール
//!
//! 照合は正規化済みの文字列に対して行われます。各文字は[`normalize_char`]で
//! 小文字化され、連続する空白は1つの`' '`にまとめられます。正規化後の
//! 文字位置から元の入力のバイト位置へは`c2b`で対応付けます。

use crate::utils::{is_word_char, normalize_char};

/// 入力文の内部表現
///
/// # フィールド
///
/// * `input` - 元の入力文字列
/// * `chars` - 正規化された文字の配列
/// * `c2b` - 正規化後の文字位置から元の入力のバイト位置への対応。長さは`chars.len() + 1`
#[derive(Default, Clone, Debug)]
pub struct Sentence {
    input: String,
    chars: Vec<char>,
    c2b: Vec<usize>,
}

impl Sentence {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline(always)]
    pub fn clear(&mut self) {
        self.input.clear();
        self.chars.clear();
        self.c2b.clear();
    }

    /// 入力文字列を設定し、正規化します。
    pub fn set_sentence<S>(&mut self, input: S)
    where
        S: AsRef<str>,
    {
        self.clear();
        self.input.push_str(input.as_ref());

        for (bi, c) in self.input.char_indices() {
            if c.is_whitespace() {
                if self.chars.last() == Some(&' ') {
                    continue;
                }
                self.chars.push(' ');
            } else {
                self.chars.push(normalize_char(c));
            }
            self.c2b.push(bi);
        }
        self.c2b.push(self.input.len());
    }

    #[inline(always)]
    pub fn raw(&self) -> &str {
        &self.input
    }

    #[inline(always)]
    pub fn chars(&self) -> &[char] {
        &self.chars
    }

    #[inline(always)]
    pub fn len_char(&self) -> usize {
        self.chars.len()
    }

    /// 正規化後の文字位置に対応する元の入力のバイト位置を返します。
    #[inline(always)]
    pub fn byte_position(&self, pos: usize) -> usize {
        self.c2b[pos]
    }

    /// `pos`から始まる単語構成文字の連続の終端位置を返します。
    pub fn word_end(&self, pos: usize) -> usize {
        pos + self.chars[pos..]
            .iter()
            .take_while(|&&c| is_word_char(c))
            .count()
    }

    /// `pos`から`text`が続く場合に、その終端位置を返します。
    pub fn match_at(&self, pos: usize, text: &str) -> Option<usize> {
        let mut end = pos;
        for c in text.chars() {
            if self.chars.get(end) != Some(&c) {
                return None;
            }
            end += 1;
        }
        Some(end)
    }

    /// `pos`以降の最初の空白でない文字の位置を返します。
    pub fn skip_space(&self, pos: usize) -> usize {
        if self.chars.get(pos) == Some(&' ') {
            pos + 1
        } else {
            pos
        }
    }

    /// `end`以降が空白だけの場合に`true`を返します。
    pub fn is_end(&self, end: usize) -> bool {
        self.skip_space(end) >= self.chars.len()
    }
}
