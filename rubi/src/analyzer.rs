//! 形態素解析器とのアダプタ境界
//!
//! 語句抽出は [`Analyzer`] トレイトを通してのみ形態素解析器を利用します。
//! 解析器は表層形・読み(カタカナ)・品詞を持つ [`Morpheme`] の列を返します。
//!
//! ## 分割単位
//!
//! ルビ付けでは「東京タワー」のような自然な長さの単位が求められるため、
//! 既定の分割モードは [`SplitMode::Coarse`] です。IPADICやUniDicのように
//! 短い単位で分割する辞書では、接頭辞・名詞・接尾辞の連続を1つの複合語にまとめます。

mod vibrato;

use std::ops::Range;
use std::str::FromStr;

use csv_core::ReadFieldResult;

use crate::errors::Result;

pub use self::vibrato::VibratoAnalyzer;

#[cfg(feature = "download")]
pub use vibrato_rkyv::dictionary::PresetDictionaryKind;

/// 分割モード
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SplitMode {
    /// 辞書の分割単位をそのまま使います。
    Fine,

    /// 複合語をまとめた、より長く自然な単位を使います。
    #[default]
    Coarse,
}

impl FromStr for SplitMode {
    type Err = &'static str;

    fn from_str(mode: &str) -> Result<Self, Self::Err> {
        match mode {
            "fine" => Ok(Self::Fine),
            "coarse" => Ok(Self::Coarse),
            _ => Err("Could not parse a split mode"),
        }
    }
}

/// 形態素解析の結果得られる1単位
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Morpheme {
    /// 表層形
    pub surface: String,

    /// 読み(カタカナ)。辞書に読みがない場合は `None`。
    pub reading: Option<String>,

    /// 品詞(大分類から順に)
    pub pos: Vec<String>,

    /// 入力文字列中のバイト位置
    pub range: Range<usize>,
}

impl Morpheme {
    /// 品詞を持たない形態素を作成します。
    pub fn new<S: Into<String>>(surface: S, reading: Option<&str>) -> Self {
        let surface = surface.into();
        let range = 0..surface.len();
        Self {
            surface,
            reading: reading.map(str::to_string),
            pos: vec![],
            range,
        }
    }

    /// 品詞を設定します。
    pub fn with_pos<I, S>(mut self, pos: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.pos = pos.into_iter().map(Into::into).collect();
        self
    }

    /// 入力文字列中の開始位置を設定します。
    pub fn at(mut self, start: usize) -> Self {
        self.range = start..start + self.surface.len();
        self
    }
}

/// 形態素解析器
///
/// 実装は一度だけ初期化され、抽出のたびに読み取り専用で共有されることを想定しています。
pub trait Analyzer {
    /// テキストを形態素に分割します。
    ///
    /// # エラー
    ///
    /// 解析器が動作できない場合は [`RubiError::Analyzer`](crate::errors::RubiError::Analyzer) を返します。
    fn analyze(&self, text: &str, mode: SplitMode) -> Result<Vec<Morpheme>>;
}

impl<A: Analyzer + ?Sized> Analyzer for &A {
    fn analyze(&self, text: &str, mode: SplitMode) -> Result<Vec<Morpheme>> {
        (**self).analyze(text, mode)
    }
}

impl<A: Analyzer + ?Sized> Analyzer for Box<A> {
    fn analyze(&self, text: &str, mode: SplitMode) -> Result<Vec<Morpheme>> {
        (**self).analyze(text, mode)
    }
}

/// 辞書の素性列のうち、品詞と読みが何番目の列にあるかを表します。
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FeatureLayout {
    /// 品詞の列数(先頭から)
    pub pos_len: usize,

    /// 読み(カタカナ)の列番号
    pub reading_index: usize,
}

impl FeatureLayout {
    /// MeCab IPADIC: `品詞,品詞細分類1,品詞細分類2,品詞細分類3,活用型,活用形,原形,読み,発音`
    pub const IPADIC: Self = Self {
        pos_len: 4,
        reading_index: 7,
    };

    /// UniDic (cwj/csj): 21列目の `kana` が書字形に対応する読み
    pub const UNIDIC: Self = Self {
        pos_len: 4,
        reading_index: 20,
    };

    /// 素性文字列から形態素を作成します。
    ///
    /// 読みの列が存在しない、または `*` の場合は読みなしとして扱います。
    pub fn morpheme(&self, surface: &str, feature: &str, range: Range<usize>) -> Morpheme {
        let fields = parse_csv_row(feature);
        let pos = fields.iter().take(self.pos_len).cloned().collect();
        let reading = fields
            .get(self.reading_index)
            .filter(|r| !r.is_empty() && r.as_str() != "*")
            .cloned();
        Morpheme {
            surface: surface.to_string(),
            reading,
            pos,
            range,
        }
    }
}

impl FromStr for FeatureLayout {
    type Err = &'static str;

    fn from_str(layout: &str) -> Result<Self, Self::Err> {
        match layout {
            "ipadic" => Ok(Self::IPADIC),
            "unidic" => Ok(Self::UNIDIC),
            _ => Err("Could not parse a feature layout"),
        }
    }
}

/// CSV行をパースして素性のベクトルに変換する
fn parse_csv_row(row: &str) -> Vec<String> {
    let mut features = vec![];
    let mut rdr = csv_core::Reader::new();
    let mut bytes = row.as_bytes();
    let mut output = [0; 4096];
    loop {
        let (result, nin, nout) = rdr.read_field(bytes, &mut output);
        let end = match result {
            ReadFieldResult::InputEmpty => true,
            ReadFieldResult::Field { .. } => false,
            ReadFieldResult::OutputFull | ReadFieldResult::End => true,
        };
        features.push(String::from_utf8_lossy(&output[..nout]).into_owned());
        if end {
            break;
        }
        bytes = &bytes[nin..];
    }
    features
}

/// 複合語を構成するときの形態素の役割
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum UnitClass {
    /// 接頭辞(後続の名詞に付く)
    Prefix,
    /// 名詞(複合語の中心になれる)
    Head,
    /// 名詞的な接尾辞(先行する名詞に付く)
    Tail,
    /// 複合語に含めない
    Other,
}

fn unit_class(pos: &[String]) -> UnitClass {
    let pos1 = pos.first().map(String::as_str).unwrap_or("");
    let pos2 = pos.get(1).map(String::as_str).unwrap_or("");
    match (pos1, pos2) {
        ("接頭詞", _) | ("接頭辞", _) => UnitClass::Prefix,
        ("名詞", "接尾") | ("接尾辞", "名詞的") => UnitClass::Tail,
        ("名詞", "代名詞") | ("名詞", "非自立") | ("名詞", "助動詞語幹") => UnitClass::Other,
        ("名詞", _) => UnitClass::Head,
        _ => UnitClass::Other,
    }
}

/// 連続する形態素を複合語にまとめる
///
/// 接頭辞*・名詞・(名詞|接尾辞)* の並びで、かつ入力中で隙間なく連続しているものを
/// 1つの形態素にします。
pub(crate) fn join_compounds(morphemes: Vec<Morpheme>) -> Vec<Morpheme> {
    let mut joiner = CompoundJoiner::default();
    let mut out = Vec::with_capacity(morphemes.len());

    for m in morphemes {
        let class = unit_class(&m.pos);
        if !joiner.is_adjacent(&m) {
            joiner.flush(&mut out);
        }
        match class {
            UnitClass::Prefix => {
                if joiner.has_head {
                    joiner.flush(&mut out);
                }
                joiner.push(m, false);
            }
            UnitClass::Head => joiner.push(m, true),
            UnitClass::Tail if joiner.has_head => joiner.push(m, false),
            UnitClass::Tail | UnitClass::Other => {
                joiner.flush(&mut out);
                out.push(m);
            }
        }
    }
    joiner.flush(&mut out);

    out
}

#[derive(Default)]
struct CompoundJoiner {
    run: Vec<Morpheme>,
    head_pos: Option<Vec<String>>,
    has_head: bool,
}

impl CompoundJoiner {
    fn is_adjacent(&self, m: &Morpheme) -> bool {
        self.run.last().map_or(true, |last| last.range.end == m.range.start)
    }

    fn push(&mut self, m: Morpheme, is_head: bool) {
        if is_head && !self.has_head {
            self.head_pos = Some(m.pos.clone());
            self.has_head = true;
        }
        self.run.push(m);
    }

    fn flush(&mut self, out: &mut Vec<Morpheme>) {
        let has_head = std::mem::take(&mut self.has_head);
        let head_pos = self.head_pos.take();
        if !has_head || self.run.len() < 2 {
            out.append(&mut self.run);
            return;
        }

        let mut surface = String::new();
        let mut reading = Some(String::new());
        for m in &self.run {
            surface.push_str(&m.surface);
            reading = match (reading, &m.reading) {
                (Some(mut acc), Some(r)) => {
                    acc.push_str(r);
                    Some(acc)
                }
                _ => None,
            };
        }
        let start = self.run.first().map_or(0, |m| m.range.start);
        let end = self.run.last().map_or(start, |m| m.range.end);
        self.run.clear();

        out.push(Morpheme {
            surface,
            reading,
            pos: head_pos.unwrap_or_default(),
            range: start..end,
        });
    }
}
