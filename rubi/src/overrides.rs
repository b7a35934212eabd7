//! 上書き辞書
//!
//! 利用者が登録した「表層形 → 読み」の対応を保持します。
//! 抽出時には読み取り専用の入力として渡され、解析器が推定した読みよりも優先されます。
//!
//! 永続化形式は UTF-8 の JSON オブジェクトで、登録順を保ったまま読み書きします。
//!
//! ```json
//! {
//!   "東京タワー": "とうきょうタワー",
//!   "都庁": "とちょう"
//! }
//! ```

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::hash::BuildHasher;
use std::io::{self, Read, Write};
use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;

use crate::errors::{Result, RubiError};

/// 表層形に対する読みを引くための読み取り専用インターフェース
///
/// 抽出処理はこのトレイトを通してのみ辞書を参照するため、
/// [`OverrideDictionary`] のほか、標準のマップ型もそのまま渡せます。
/// 辞書が利用できない場合は `None::<OverrideDictionary>` を渡すと空の辞書として扱われます。
pub trait ReadingOverrides {
    /// 表層形に登録された読みを返します。
    fn reading_for(&self, surface: &str) -> Option<&str>;
}

impl<S: BuildHasher> ReadingOverrides for HashMap<String, String, S> {
    fn reading_for(&self, surface: &str) -> Option<&str> {
        self.get(surface).map(String::as_str)
    }
}

impl ReadingOverrides for BTreeMap<String, String> {
    fn reading_for(&self, surface: &str) -> Option<&str> {
        self.get(surface).map(String::as_str)
    }
}

impl<S: BuildHasher> ReadingOverrides for IndexMap<String, String, S> {
    fn reading_for(&self, surface: &str) -> Option<&str> {
        self.get(surface).map(String::as_str)
    }
}

impl<O: ReadingOverrides> ReadingOverrides for Option<O> {
    fn reading_for(&self, surface: &str) -> Option<&str> {
        self.as_ref().and_then(|o| o.reading_for(surface))
    }
}

/// 登録順を保持する上書き辞書
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OverrideDictionary {
    entries: IndexMap<String, String>,
}

impl OverrideDictionary {
    /// 空の辞書を作成します。
    pub fn new() -> Self {
        Self::default()
    }

    /// JSONファイルから辞書を読み込みます。
    ///
    /// ファイルが存在しない場合や空の場合は空の辞書を返します。
    ///
    /// # エラー
    ///
    /// JSONとして解析できない場合や、値が文字列でない項目がある場合は
    /// [`RubiError::Dictionary`] を返します。
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let bytes = match fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Self::new()),
            Err(e) => return Err(e.into()),
        };
        Self::parse(&bytes, &path.display().to_string())
    }

    /// 任意のリーダー(アップロードされた内容など)から辞書を読み込みます。
    pub fn from_reader<R: Read>(mut rdr: R) -> Result<Self> {
        let mut bytes = vec![];
        rdr.read_to_end(&mut bytes)?;
        Self::parse(&bytes, "<reader>")
    }

    fn parse(bytes: &[u8], origin: &str) -> Result<Self> {
        let text = std::str::from_utf8(bytes)
            .map_err(|e| RubiError::dictionary(origin, format!("not valid UTF-8: {}", e)))?;
        let text = text.trim_start_matches('\u{feff}');
        if text.trim().is_empty() {
            return Ok(Self::new());
        }

        let entries: IndexMap<String, String> =
            serde_json::from_str(text).map_err(|e| RubiError::dictionary(origin, e.to_string()))?;

        Ok(entries
            .into_iter()
            .filter(|(word, reading)| !word.is_empty() && !reading.is_empty())
            .collect())
    }

    /// 辞書をJSONファイルに書き出します。
    ///
    /// 一時ファイルに書き込んでから置き換えるため、途中で失敗しても既存のファイルは壊れません。
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(dir)?;

        let mut tmp = NamedTempFile::new_in(dir)?;
        self.write(&mut tmp)?;
        tmp.as_file().sync_all()?;
        tmp.persist(path).map_err(|e| e.error)?;
        Ok(())
    }

    /// 辞書を整形済みのJSONとして書き出します。
    pub fn write<W: Write>(&self, mut wtr: W) -> Result<()> {
        serde_json::to_writer_pretty(&mut wtr, &self.entries)
            .map_err(|e| RubiError::IoError(e.into()))?;
        wtr.write_all(b"\n")?;
        Ok(())
    }

    /// 登録件数を返します。
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// 登録がない場合に `true` を返します。
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 表層形の読みを取得します。
    pub fn get(&self, word: &str) -> Option<&str> {
        self.entries.get(word).map(String::as_str)
    }

    /// 表層形が登録されているかどうかを返します。
    pub fn contains(&self, word: &str) -> bool {
        self.entries.contains_key(word)
    }

    /// 登録順に項目を返すイテレータを返します。
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(w, r)| (w.as_str(), r.as_str()))
    }

    /// 読みを登録します。既存の登録があれば置き換え、以前の読みを返します。
    ///
    /// # エラー
    ///
    /// 表層形または読みが空の場合は [`RubiError::Dictionary`] を返します。
    pub fn set<W, R>(&mut self, word: W, reading: R) -> Result<Option<String>>
    where
        W: Into<String>,
        R: Into<String>,
    {
        let word = word.into();
        let reading = reading.into();
        check_entry(&word, &reading)?;
        Ok(self.entries.insert(word, reading))
    }

    /// 既存の項目を削除し、新しい表層形と読みで登録し直します。
    ///
    /// 登録し直した項目は辞書の末尾に移動します。
    pub fn rename<W, R>(&mut self, old_word: &str, new_word: W, reading: R) -> Result<()>
    where
        W: Into<String>,
        R: Into<String>,
    {
        let new_word = new_word.into();
        let reading = reading.into();
        check_entry(&new_word, &reading)?;
        self.entries.shift_remove(old_word);
        self.entries.shift_remove(&new_word);
        self.entries.insert(new_word, reading);
        Ok(())
    }

    /// 項目を削除し、削除した読みを返します。
    pub fn remove(&mut self, word: &str) -> Option<String> {
        self.entries.shift_remove(word)
    }
}

fn check_entry(word: &str, reading: &str) -> Result<()> {
    if word.is_empty() {
        return Err(RubiError::dictionary("entry", "the word must not be empty"));
    }
    if reading.is_empty() {
        return Err(RubiError::dictionary(
            "entry",
            format!("the reading of '{}' must not be empty", word),
        ));
    }
    Ok(())
}

impl ReadingOverrides for OverrideDictionary {
    fn reading_for(&self, surface: &str) -> Option<&str> {
        self.get(surface)
    }
}

impl FromIterator<(String, String)> for OverrideDictionary {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl<'a> FromIterator<(&'a str, &'a str)> for OverrideDictionary {
    fn from_iter<I: IntoIterator<Item = (&'a str, &'a str)>>(iter: I) -> Self {
        iter.into_iter()
            .map(|(w, r)| (w.to_string(), r.to_string()))
            .collect()
    }
}
