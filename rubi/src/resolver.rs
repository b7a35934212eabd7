//! 語句の抽出と読みの決定
//!
//! 本文テキストを形態素解析し、ルビを振る価値のある表層形だけを残して読みを決めます。
//!
//! 1. テキストを [`SplitMode`] に従って形態素に分割する
//! 2. 各形態素について、次のいずれかに当たるものは読み飛ばす
//!    - 表層形が1文字以下
//!    - 表層形がすでに結果に含まれている(最初の出現を採用)
//!    - 表層形がすべてひらがな
//! 3. 読みは上書き辞書を優先し、なければ解析器の読みをひらがなに変換したものを使う
//! 4. 表層形と読みが同じものは読み飛ばす
//!
//! 重複の判定は表層形の文字列そのもので行います。同じ表層形が文脈によって
//! 異なる読みを持つ場合でも、最初の出現の読みだけが使われます。

use std::path::Path;

use indexmap::IndexMap;

use crate::analyzer::{Analyzer, Morpheme, SplitMode};
use crate::document;
use crate::errors::Result;
use crate::kana;
use crate::overrides::ReadingOverrides;
use crate::term::{Term, TermList};

/// 語句抽出器
///
/// 形態素解析器を1つ保持し、文書ごとに呼び出されます。
/// 抽出処理は呼び出しごとに独立しており、内部状態を持ちません。
pub struct TermResolver<A> {
    analyzer: A,
    mode: SplitMode,
}

impl<A: Analyzer> TermResolver<A> {
    /// 既定の分割モード([`SplitMode::Coarse`])で抽出器を作成します。
    pub fn new(analyzer: A) -> Self {
        Self {
            analyzer,
            mode: SplitMode::default(),
        }
    }

    /// 分割モードを設定します。
    pub fn split_mode(mut self, mode: SplitMode) -> Self {
        self.mode = mode;
        self
    }

    /// 保持している形態素解析器を返します。
    pub fn analyzer(&self) -> &A {
        &self.analyzer
    }

    /// 本文テキストから語句と読みを抽出します。
    ///
    /// 結果は文書中で最初に現れた順に並びます。
    ///
    /// # エラー
    ///
    /// 形態素解析に失敗した場合は [`RubiError::Analyzer`](crate::errors::RubiError::Analyzer) を返し、
    /// 途中までの結果は返しません。
    pub fn resolve_terms<O>(&self, text: &str, overrides: &O) -> Result<TermList>
    where
        O: ReadingOverrides + ?Sized,
    {
        let morphemes = self.analyzer.analyze(text, self.mode)?;

        let mut words: IndexMap<String, String> = IndexMap::new();
        for Morpheme {
            surface, reading, ..
        } in morphemes
        {
            if surface.chars().count() <= 1
                || words.contains_key(&surface)
                || kana::is_all_hiragana(&surface)
            {
                continue;
            }

            let reading = match overrides.reading_for(&surface) {
                Some(reading) => reading.to_string(),
                None => match analyzed_reading(&surface, reading.as_deref()) {
                    Some(reading) => reading,
                    None => continue,
                },
            };

            if surface == reading {
                continue;
            }
            words.insert(surface, reading);
        }

        Ok(words
            .into_iter()
            .map(|(word, reading)| Term { word, reading })
            .collect())
    }

    /// .docx ファイルを読み込み、語句と読みを抽出します。
    ///
    /// # エラー
    ///
    /// 文書を読み込めない場合は [`RubiError::Format`](crate::errors::RubiError::Format)
    /// または [`RubiError::IoError`](crate::errors::RubiError::IoError) を返します。
    pub fn extract_terms<P, O>(&self, path: P, overrides: &O) -> Result<TermList>
    where
        P: AsRef<Path>,
        O: ReadingOverrides + ?Sized,
    {
        let text = document::load_text(path)?;
        self.resolve_terms(&text, overrides)
    }
}

/// 解析器の読みをひらがなにする
///
/// 読みのない形態素は表層形そのものを変換し、仮名だけになる場合(カタカナ語など)に限り採用する。
fn analyzed_reading(surface: &str, reading: Option<&str>) -> Option<String> {
    match reading {
        Some(reading) => Some(kana::kata2hira(reading)),
        None => {
            let reading = kana::kata2hira(surface);
            kana::is_kana_reading(&reading).then_some(reading)
        }
    }
}
