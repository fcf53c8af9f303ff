//! 辞書構築のためのビルダー
//!
//! このモジュールは、レキシコンから [`Dictionary`] を構築し、
//! 辞書ファイルとして書き出すためのビルダーを提供します。

use std::fs;
use std::io::{BufWriter, Read, Seek, SeekFrom, Write};
use std::path::Path;

use crate::dictionary::entry::HEADER_LEN;
use crate::dictionary::lexicon::parse_lexicon;
use crate::dictionary::{Dictionary, WordEntry};
use crate::errors::{MorphgramError, Result};
use crate::utils::normalize_str;

/// レキシコンから [`Dictionary`] を構築するビルダー
pub struct DictionaryBuilder {}

impl DictionaryBuilder {
    /// レキシコンのリーダーから新しい [`Dictionary`] を作成します。
    ///
    /// # 引数
    ///
    ///  - `lexicon_rdr`: レキシコンファイルのリーダー
    ///
    /// # エラー
    ///
    /// 読み込みに失敗した場合、または入力がUTF-8でない場合に
    /// [`MorphgramError`] を返します。
    pub fn from_reader<R>(mut lexicon_rdr: R) -> Result<Dictionary>
    where
        R: Read,
    {
        let mut buf = vec![];
        lexicon_rdr.read_to_end(&mut buf)?;
        Self::from_text(std::str::from_utf8(&buf)?)
    }

    /// レキシコンの内容から新しい [`Dictionary`] を作成します。
    ///
    /// 内容全体を小文字化し、語の順に並べ、語ごとに1つのテキスト領域を割り当てます。
    /// 同じ語の中で属性の組が同一の行は1つにまとめられます。
    ///
    /// # エラー
    ///
    /// テキスト領域が`u32`で表現できる大きさを超えた場合にエラーを返します。
    pub fn from_text(lexicon: &str) -> Result<Dictionary> {
        let normalized = normalize_str(lexicon);
        let raw_entries = parse_lexicon(&normalized);

        let mut text = String::new();
        let mut entries = Vec::with_capacity(raw_entries.len());
        let mut prev_word = None;
        let mut offset = 0;
        for e in &raw_entries {
            if prev_word != Some(e.word) {
                offset = u32::try_from(text.len())?;
                text.push_str(e.word);
                text.push('\0');
                prev_word = Some(e.word);
            }
            entries.push(WordEntry::new(
                offset,
                u32::try_from(e.word.len())?,
                e.features,
            ));
        }

        Ok(Dictionary::from_parts(text, entries))
    }

    /// レキシコンファイルから辞書ファイルを構築します。
    ///
    /// 辞書は書き出し先と同じディレクトリの一時ファイルに書き込まれます。
    /// ヘッダの位置はまず0で埋め、本体をすべて書き終えてから正しいヘッダで
    /// 上書きし、最後に一時ファイルを`db_path`へ移動します。そのため、
    /// 途中で失敗しても有効に見える不完全なファイルが残ることはありません。
    ///
    /// # 引数
    ///
    /// * `lexicon_path` - レキシコンファイルへのパス
    /// * `db_path` - 辞書ファイルの書き出し先
    ///
    /// # エラー
    ///
    /// レキシコンを読めない場合、書き出し先を作成できない場合、
    /// または書き込みに失敗した場合にエラーを返します。
    pub fn build_file<P, Q>(lexicon_path: P, db_path: Q) -> Result<()>
    where
        P: AsRef<Path>,
        Q: AsRef<Path>,
    {
        let lexicon_path = lexicon_path.as_ref();
        let db_path = db_path.as_ref();

        let dict = Self::from_reader(fs::File::open(lexicon_path)?)?;
        let header = dict.header()?;

        let out_dir = match db_path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            Some(_) => Path::new("."),
            None => {
                return Err(MorphgramError::invalid_argument(
                    "db_path",
                    "the output path must name a file",
                ));
            }
        };
        let mut temp_file = tempfile::NamedTempFile::new_in(out_dir)?;
        {
            let mut wtr = BufWriter::new(temp_file.as_file_mut());
            wtr.write_all(&[0; HEADER_LEN])?;
            dict.write_payload(&mut wtr)?;
            wtr.flush()?;
        }

        let file = temp_file.as_file_mut();
        file.seek(SeekFrom::Start(0))?;
        file.write_all(&header.encode())?;
        file.sync_all()?;
        temp_file.persist(db_path)?;

        log::info!(
            "Built {} readings of {} words from {} into {}",
            dict.len(),
            dict.num_words(),
            lexicon_path.display(),
            db_path.display()
        );
        Ok(())
    }
}
