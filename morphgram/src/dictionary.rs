//! 形態素辞書モジュール。
//!
//! このモジュールは、語の表層形から形態素属性の組(品詞・数・格)を引くための
//! コンパクトなバイナリ辞書の読み込み、書き出し、検索を提供します。
//!
//! # ファイル形式
//!
//! すべての整数はリトルエンディアンです。
//!
//! ```text
//! ヘッダ (16バイト): magic:u32=0xFC1290C8, textBytes:u32, entryBytes:u32, reserved:u32
//! テキスト領域:      textBytes バイト。異なる語をそれぞれ 0x00 で終端して連結したもの
//! エントリ表:        entryBytes / 8 個のレコード。textOffset:u32, pos:u8, number:u8, case:u8, reserved:u8
//! ```
//!
//! エントリは参照する語の順にソートされているため、二分探索で検索できます。
//!
//! # 辞書の読み込み方法
//!
//! - [`Dictionary::from_path`]: メモリマップを使ってファイルから読み込む
//! - [`Dictionary::read`]: リーダーから読み込む
//!
//! # 辞書のビルド
//!
//! [`DictionaryBuilder`]を使用して、レキシコンから辞書を構築できます。
pub mod builder;
pub mod entry;
pub mod feature;
pub(crate) mod lexicon;

use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use memmap2::Mmap;

use crate::dictionary::entry::{ENTRY_LEN, EntryRecord, HEADER_LEN, Header, MORPH_DB_MAGIC};
use crate::errors::{MorphgramError, Result};
use crate::utils::FromU32;

pub use crate::dictionary::builder::DictionaryBuilder;
pub use crate::dictionary::feature::{AttrKind, Case, Feature, Features, Number, PartOfSpeech};

/// 辞書中の1つの読み(語と属性の組)
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct WordEntry {
    text: u32,
    len: u32,
    features: Features,
}

/// 検索結果として返される語形
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct WordForm<'a> {
    /// 辞書に格納された(小文字化済みの)語
    pub text: &'a str,

    /// 語の属性
    pub features: Features,
}

/// 読み取り専用の形態素辞書。
///
/// 一度読み込まれた辞書は変更されないため、複数のスレッドから
/// 同時に検索できます。
#[derive(Clone, Default)]
pub struct Dictionary {
    text: String,
    entries: Vec<WordEntry>,
}

impl Dictionary {
    /// ビルダーが作成したテキスト領域とエントリから辞書を作成します。
    pub(crate) fn from_parts(text: String, entries: Vec<WordEntry>) -> Self {
        Self { text, entries }
    }

    /// メモリマッピングを使用してファイルパスから辞書を読み込みます。
    ///
    /// # 引数
    ///
    /// * `path` - 辞書ファイルへのパス
    ///
    /// # エラー
    ///
    /// この関数は以下の場合にエラーを返します:
    /// - ファイルを開けない、または読み込めない場合(I/Oエラー)。
    /// - マジックナンバーが一致しない場合([`MorphgramError::BadMagic`])。
    /// - ファイルがヘッダの宣言より短い場合([`MorphgramError::Truncated`])。
    /// - 内容が不正な場合([`MorphgramError::InvalidFormat`])。
    pub fn from_path<P>(path: P) -> Result<Self>
    where
        P: AsRef<Path>,
    {
        let path = path.as_ref();
        let file = File::open(path)?;
        let file_len = usize::try_from(file.metadata()?.len())?;
        if file_len < HEADER_LEN {
            return Err(MorphgramError::Truncated {
                section: "header",
                declared: HEADER_LEN,
                available: file_len,
            });
        }

        let mmap = unsafe { Mmap::map(&file)? };
        let dict = Self::from_bytes(&mmap)?;
        log::info!(
            "Loaded {} readings of {} words from {}",
            dict.len(),
            dict.num_words(),
            path.display()
        );
        Ok(dict)
    }

    /// すべてのデータをヒープバッファに読み込むことで、リーダーから辞書を作成します。
    ///
    /// # 引数
    ///
    /// * `rdr` - `std::io::Read`を実装するリーダー。
    ///
    /// # エラー
    ///
    /// データを読み込めない場合、または内容が無効な場合にエラーを返します。
    pub fn read<R>(mut rdr: R) -> Result<Self>
    where
        R: Read,
    {
        let mut buf = vec![];
        rdr.read_to_end(&mut buf)?;
        Self::from_bytes(&buf)
    }

    /// バイト列から辞書をデコードします。
    ///
    /// ヘッダを検証した後、テキスト領域とエントリ表を読み込み、
    /// 各エントリの参照先と並び順を検証します。
    ///
    /// # エラー
    ///
    /// [`Dictionary::from_path`]と同じ条件でエラーを返します。
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let Some(header_bytes) = bytes.first_chunk::<HEADER_LEN>() else {
            return Err(MorphgramError::Truncated {
                section: "header",
                declared: HEADER_LEN,
                available: bytes.len(),
            });
        };
        let header = Header::decode(header_bytes);
        if header.magic != MORPH_DB_MAGIC {
            return Err(MorphgramError::BadMagic {
                expected: MORPH_DB_MAGIC,
                found: header.magic,
            });
        }

        let text_len = usize::from_u32(header.text_bytes);
        let entry_len = usize::from_u32(header.entry_bytes);
        let body = &bytes[HEADER_LEN..];

        let Some(text_bytes) = body.get(..text_len) else {
            return Err(MorphgramError::Truncated {
                section: "text",
                declared: text_len,
                available: body.len(),
            });
        };
        let body = &body[text_len..];
        let Some(entry_bytes) = body.get(..entry_len) else {
            return Err(MorphgramError::Truncated {
                section: "entries",
                declared: entry_len,
                available: body.len(),
            });
        };
        if entry_len % ENTRY_LEN != 0 {
            return Err(MorphgramError::invalid_format(
                "db",
                format!("entryBytes {entry_len} is not a multiple of {ENTRY_LEN}"),
            ));
        }

        let text = std::str::from_utf8(text_bytes)?;
        if !text.is_empty() && !text.ends_with('\0') {
            return Err(MorphgramError::invalid_format(
                "db",
                "the text blob is not terminated by NUL",
            ));
        }

        let mut entries = Vec::with_capacity(entry_len / ENTRY_LEN);
        for chunk in entry_bytes.chunks_exact(ENTRY_LEN) {
            let record = EntryRecord::decode(chunk);
            let len = word_len_at(text, record.text).ok_or_else(|| {
                MorphgramError::invalid_format(
                    "db",
                    format!("textOffset {} does not point at a word", record.text),
                )
            })?;
            entries.push(WordEntry {
                text: record.text,
                len,
                features: record.features()?,
            });
        }

        let dict = Self::from_parts(text.to_string(), entries);
        if !dict.is_sorted() {
            return Err(MorphgramError::invalid_format(
                "db",
                "entries are not sorted by text",
            ));
        }
        Ok(dict)
    }

    /// 辞書を固定レイアウトでライターに書き出します。
    ///
    /// この関数の出力は[`Dictionary::read`]や[`Dictionary::from_path`]が
    /// 期待する形式です。
    ///
    /// # エラー
    ///
    /// 書き込みに失敗した場合、または辞書が大きすぎてヘッダに
    /// 収まらない場合にエラーを返します。
    pub fn write<W>(&self, mut wtr: W) -> Result<()>
    where
        W: Write,
    {
        wtr.write_all(&self.header()?.encode())?;
        self.write_payload(&mut wtr)?;
        Ok(())
    }

    /// このインスタンスに対応するヘッダを計算します。
    pub(crate) fn header(&self) -> Result<Header> {
        let text_bytes = u32::try_from(self.text.len())?;
        let entry_bytes = u32::try_from(self.entries.len() * ENTRY_LEN)?;
        Ok(Header::new(text_bytes, entry_bytes))
    }

    /// ヘッダに続くテキスト領域とエントリ表を書き出します。
    pub(crate) fn write_payload<W>(&self, mut wtr: W) -> Result<()>
    where
        W: Write,
    {
        wtr.write_all(self.text.as_bytes())?;
        for e in &self.entries {
            wtr.write_all(&EntryRecord::new(e.text, &e.features).encode())?;
        }
        Ok(())
    }

    /// 語に完全一致するすべての読みを返します。
    ///
    /// `word`を接頭辞として持つだけの別の語(例: `дом`に対する`домик`)は
    /// 決して返されません。
    ///
    /// # 引数
    ///
    /// * `word` - 小文字化された語
    ///
    /// # 戻り値
    ///
    /// 一致した語形の列。見つからない場合は空の列。
    pub fn lookup(&self, word: &str) -> Vec<WordForm<'_>> {
        self.lookup_with_separator(word, "")
    }

    /// 語に完全一致する読みに加え、`word + separator`で始まる複数語の見出し
    /// (慣用句など)の読みも返します。
    ///
    /// `separator`が空の場合は[`Dictionary::lookup`]と同じです。
    ///
    /// # 引数
    ///
    /// * `word` - 小文字化された語
    /// * `separator` - 複数語の見出しで語を区切る文字列
    ///
    /// # 戻り値
    ///
    /// 完全一致の読み、続いて複数語の見出しの読みを辞書順に並べた列。
    pub fn lookup_with_separator(&self, word: &str, separator: &str) -> Vec<WordForm<'_>> {
        let start = self
            .entries
            .partition_point(|e| self.entry_text(e) < word);
        let end = start
            + self.entries[start..]
                .iter()
                .take_while(|e| self.entry_text(e) == word)
                .count();

        let mut matches: Vec<_> = self.entries[start..end]
            .iter()
            .map(|e| self.word_form(e))
            .collect();

        if separator.is_empty() {
            return matches;
        }

        let mut prefix = String::with_capacity(word.len() + separator.len());
        prefix.push_str(word);
        prefix.push_str(separator);

        let rest = &self.entries[end..];
        let start = rest.partition_point(|e| self.entry_text(e) < prefix.as_str());
        matches.extend(
            rest[start..]
                .iter()
                .take_while(|e| self.entry_text(e).starts_with(&prefix))
                .map(|e| self.word_form(e)),
        );
        matches
    }

    /// すべての読みを語の順に列挙します。
    pub fn iter(&self) -> impl Iterator<Item = WordForm<'_>> + '_ {
        self.entries.iter().map(|e| self.word_form(e))
    }

    /// 読みの総数を返します。
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// 読みを1つも持たない場合に`true`を返します。
    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 異なる語の数を返します。
    pub fn num_words(&self) -> usize {
        self.text.bytes().filter(|&b| b == 0).count()
    }

    #[inline(always)]
    fn entry_text(&self, e: &WordEntry) -> &str {
        let from = usize::from_u32(e.text);
        &self.text[from..from + usize::from_u32(e.len)]
    }

    #[inline(always)]
    fn word_form(&self, e: &WordEntry) -> WordForm<'_> {
        WordForm {
            text: self.entry_text(e),
            features: e.features,
        }
    }

    fn is_sorted(&self) -> bool {
        self.entries
            .windows(2)
            .all(|w| self.entry_text(&w[0]) <= self.entry_text(&w[1]))
    }
}

impl WordEntry {
    #[inline(always)]
    pub(crate) const fn new(text: u32, len: u32, features: Features) -> Self {
        Self {
            text,
            len,
            features,
        }
    }
}

/// `offset`から始まるNUL終端の語の長さを返します。
///
/// `offset`が語の先頭でない場合は`None`を返します。
fn word_len_at(text: &str, offset: u32) -> Option<u32> {
    let offset = usize::from_u32(offset);
    if offset >= text.len() || (offset > 0 && text.as_bytes()[offset - 1] != 0) {
        return None;
    }
    let len = text[offset..].find('\0')?;
    u32::try_from(len).ok()
}
