//! 語句と読みの組

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::overrides::ReadingOverrides;

/// 表層形と読み(ひらがな)の組
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Term {
    /// 文書中に現れた表層形
    pub word: String,

    /// 読み
    pub reading: String,
}

impl Term {
    /// 新しい語句を作成します。
    pub fn new<W, R>(word: W, reading: R) -> Self
    where
        W: Into<String>,
        R: Into<String>,
    {
        Self {
            word: word.into(),
            reading: reading.into(),
        }
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}\t{}", self.word, self.reading)
    }
}

/// 語句リストの並び順
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TermOrder {
    /// 文書中で最初に現れた順
    #[default]
    FirstSeen,

    /// 表層形のコードポイント順
    Sorted,
}

impl FromStr for TermOrder {
    type Err = &'static str;

    fn from_str(order: &str) -> Result<Self, Self::Err> {
        match order {
            "first-seen" => Ok(Self::FirstSeen),
            "sorted" => Ok(Self::Sorted),
            _ => Err("Could not parse a term order"),
        }
    }
}

/// 抽出結果の語句リスト
///
/// 1回の抽出で得られる語句の並びです。抽出のたびに新しく作られ、
/// 文書をまたいで再利用されることはありません。
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TermList {
    terms: Vec<Term>,
}

impl TermList {
    /// 空の語句リストを作成します。
    pub fn new() -> Self {
        Self::default()
    }

    /// 語句の数を返します。
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    /// 語句が1つもない場合に `true` を返します。
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// 語句を末尾に追加します。
    pub fn push(&mut self, term: Term) {
        self.terms.push(term);
    }

    /// 語句のイテレータを返します。
    pub fn iter(&self) -> std::slice::Iter<'_, Term> {
        self.terms.iter()
    }

    /// 語句のスライスを返します。
    pub fn as_slice(&self) -> &[Term] {
        &self.terms
    }

    /// 表層形を取得します。
    pub fn get(&self, word: &str) -> Option<&Term> {
        self.terms.iter().find(|t| t.word == word)
    }

    /// 表層形(同じなら読み)のコードポイント順に並べ替えます。
    pub fn sort_by_word(&mut self) {
        self.terms.sort();
    }

    /// 指定された並び順に整えます。
    pub fn arrange(&mut self, order: TermOrder) {
        if order == TermOrder::Sorted {
            self.sort_by_word();
        }
    }

    /// 上書き辞書を既存の語句リストに再適用します。
    ///
    /// 辞書に登録されている表層形の読みを辞書の値で置き換え、
    /// 辞書に該当した語句の数を返します。
    /// 置き換えた読みが表層形と同じになった語句はリストから取り除きます。
    pub fn apply_overrides<O>(&mut self, overrides: &O) -> usize
    where
        O: ReadingOverrides + ?Sized,
    {
        let mut updated = 0;
        self.terms.retain_mut(|term| {
            let Some(reading) = overrides.reading_for(&term.word) else {
                return true;
            };
            updated += 1;
            if reading == term.word {
                return false;
            }
            term.reading = reading.to_string();
            true
        });
        updated
    }

    /// 語句のベクタに変換します。
    pub fn into_vec(self) -> Vec<Term> {
        self.terms
    }
}

impl From<Vec<Term>> for TermList {
    fn from(terms: Vec<Term>) -> Self {
        Self { terms }
    }
}

impl FromIterator<Term> for TermList {
    fn from_iter<I: IntoIterator<Item = Term>>(iter: I) -> Self {
        Self {
            terms: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for TermList {
    type Item = Term;
    type IntoIter = std::vec::IntoIter<Term>;

    fn into_iter(self) -> Self::IntoIter {
        self.terms.into_iter()
    }
}

impl<'a> IntoIterator for &'a TermList {
    type Item = &'a Term;
    type IntoIter = std::slice::Iter<'a, Term>;

    fn into_iter(self) -> Self::IntoIter {
        self.terms.iter()
    }
}
