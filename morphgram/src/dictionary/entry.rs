//! 辞書ファイルのバイナリレコード
//!
//! ヘッダとエントリレコードを、フィールドごとにリトルエンディアンで
//! エンコード・デコードします。メモリ上の論理的な型と
//! ファイル上のバイト列は共有しません。

use crate::dictionary::feature::{Case, Features, Number, PartOfSpeech};
use crate::errors::{MorphgramError, Result};

/// 辞書ファイルを識別するマジックナンバー。
pub const MORPH_DB_MAGIC: u32 = 0xFC12_90C8;

/// ヘッダのバイト長
pub const HEADER_LEN: usize = 16;

/// エントリレコード1件のバイト長
pub const ENTRY_LEN: usize = 8;

/// 辞書ファイルのヘッダ
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Header {
    pub magic: u32,
    pub text_bytes: u32,
    pub entry_bytes: u32,
}

impl Header {
    /// 正しいマジックナンバーを持つヘッダを作成します。
    pub const fn new(text_bytes: u32, entry_bytes: u32) -> Self {
        Self {
            magic: MORPH_DB_MAGIC,
            text_bytes,
            entry_bytes,
        }
    }

    pub fn encode(&self) -> [u8; HEADER_LEN] {
        let mut buf = [0; HEADER_LEN];
        buf[0..4].copy_from_slice(&self.magic.to_le_bytes());
        buf[4..8].copy_from_slice(&self.text_bytes.to_le_bytes());
        buf[8..12].copy_from_slice(&self.entry_bytes.to_le_bytes());
        // The last four bytes are reserved and stay zero.
        buf
    }

    pub fn decode(buf: &[u8; HEADER_LEN]) -> Self {
        Self {
            magic: read_u32(buf, 0),
            text_bytes: read_u32(buf, 4),
            entry_bytes: read_u32(buf, 8),
        }
    }
}

/// ファイル上のエントリレコード
///
/// 属性はまだ検証されていないコードのまま保持します。
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct EntryRecord {
    pub text: u32,
    pub codes: [u8; 3],
}

impl EntryRecord {
    pub fn new(text: u32, features: &Features) -> Self {
        Self {
            text,
            codes: features.codes(),
        }
    }

    pub fn encode(&self) -> [u8; ENTRY_LEN] {
        let mut buf = [0; ENTRY_LEN];
        buf[0..4].copy_from_slice(&self.text.to_le_bytes());
        buf[4..7].copy_from_slice(&self.codes);
        buf
    }

    pub fn decode(buf: &[u8]) -> Self {
        debug_assert_eq!(buf.len(), ENTRY_LEN);
        Self {
            text: read_u32(buf, 0),
            codes: [buf[4], buf[5], buf[6]],
        }
    }

    /// 属性コードを検証して[`Features`]に変換します。
    ///
    /// # エラー
    ///
    /// いずれかのコードが列挙の範囲外の場合にエラーを返します。
    pub fn features(&self) -> Result<Features> {
        let [pos, number, case] = self.codes;
        Ok(Features {
            pos: decode_code(pos, PartOfSpeech::from_code, "pos")?,
            number: decode_code(number, Number::from_code, "number")?,
            case: decode_code(case, Case::from_code, "case")?,
        })
    }
}

fn decode_code<T>(code: u8, from_code: fn(u8) -> Option<T>, name: &str) -> Result<Option<T>> {
    if code == 0 {
        return Ok(None);
    }
    from_code(code).map(Some).ok_or_else(|| {
        MorphgramError::invalid_format(
            "db",
            format!("{name} index {code} is out of range"),
        )
    })
}

#[inline(always)]
fn read_u32(buf: &[u8], at: usize) -> u32 {
    u32::from_le_bytes([buf[at], buf[at + 1], buf[at + 2], buf[at + 3]])
}
