//! テスト用ユーティリティ
//!
//! 小さなIPADIC形式の辞書と、メモリ上で .docx を組み立てる関数を提供します。

use std::io::{Cursor, Write};

use vibrato_rkyv::{SystemDictionaryBuilder, Tokenizer};
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

use crate::analyzer::{Analyzer, FeatureLayout, Morpheme, SplitMode, VibratoAnalyzer};
use crate::errors::{Result, RubiError};

pub(crate) const LEXICON_CSV: &str = "\
東京,0,0,10,名詞,固有名詞,地域,一般,*,*,東京,トウキョウ,トーキョー
タワー,0,0,10,名詞,一般,*,*,*,*,タワー,タワー,タワー
都庁,0,0,10,名詞,一般,*,*,*,*,都庁,トチョウ,トチョー
田中,0,0,10,名詞,固有名詞,人名,姓,*,*,田中,タナカ,タナカ
さん,0,0,10,名詞,接尾,人名,*,*,*,さん,サン,サン
お,0,0,10,接頭詞,名詞接続,*,*,*,*,お,オ,オ
茶,0,0,10,名詞,一般,*,*,*,*,茶,チャ,チャ
これ,0,0,10,名詞,代名詞,一般,*,*,*,これ,コレ,コレ
本,0,0,10,名詞,一般,*,*,*,*,本,ホン,ホン
日本,0,0,10,名詞,固有名詞,地域,国,*,*,日本,ニッポン,ニッポン
ああ,0,0,10,感動詞,*,*,*,*,*,ああ,アア,アー
に,0,0,10,助詞,格助詞,一般,*,*,*,に,ニ,ニ
は,0,0,10,助詞,係助詞,*,*,*,*,は,ハ,ワ
を,0,0,10,助詞,格助詞,一般,*,*,*,を,ヲ,ヲ
の,0,0,10,助詞,連体化,*,*,*,*,の,ノ,ノ
です,0,0,10,助動詞,*,*,*,特殊・デス,基本形,です,デス,デス
行っ,0,0,10,動詞,自立,*,*,五段・カ行促音便,連用タ接続,行く,イッ,イッ
た,0,0,10,助動詞,*,*,*,特殊・タ,基本形,た,タ,タ
。,0,0,10,記号,句点,*,*,*,*,。,。,。
、,0,0,10,記号,読点,*,*,*,*,、,、,、";

pub(crate) const MATRIX_DEF: &str = "1 1\n0 0 0";
pub(crate) const CHAR_DEF: &str = "DEFAULT 0 1 0";
pub(crate) const UNK_DEF: &str = "DEFAULT,0,0,100,名詞,一般,*,*,*,*,*";

/// テスト用の辞書で解析器を作成する
///
/// 辞書にない文字から始まる部分は、文末までが1つの未知語になる。
pub(crate) fn test_analyzer() -> VibratoAnalyzer {
    let dict = SystemDictionaryBuilder::from_readers(
        LEXICON_CSV.as_bytes(),
        MATRIX_DEF.as_bytes(),
        CHAR_DEF.as_bytes(),
        UNK_DEF.as_bytes(),
    )
    .unwrap();
    VibratoAnalyzer::from_tokenizer(Tokenizer::from_inner(dict), FeatureLayout::IPADIC)
}

/// 本文XMLを与えて .docx のバイト列を作る
pub(crate) fn docx_with_document_xml(document_xml: &str) -> Vec<u8> {
    docx_with_parts(&[
        ("[Content_Types].xml", CONTENT_TYPES_XML),
        ("word/document.xml", document_xml),
    ])
}

/// 段落ごとのテキストから .docx のバイト列を作る
///
/// 各段落は2つの `w:r` に分けて格納する。
pub(crate) fn docx_with_paragraphs(paragraphs: &[&str]) -> Vec<u8> {
    docx_with_document_xml(&document_xml(paragraphs))
}

pub(crate) fn document_xml(paragraphs: &[&str]) -> String {
    let mut body = String::new();
    for paragraph in paragraphs {
        let mid = paragraph
            .char_indices()
            .nth(paragraph.chars().count() / 2)
            .map_or(paragraph.len(), |(i, _)| i);
        let (head, tail) = paragraph.split_at(mid);
        body.push_str(&format!(
            "<w:p><w:r><w:t>{}</w:t></w:r><w:r><w:rPr><w:b/></w:rPr><w:t xml:space=\"preserve\">{}</w:t></w:r></w:p>",
            head, tail
        ));
    }
    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\
<w:document xmlns:w=\"http://schemas.openxmlformats.org/wordprocessingml/2006/main\"><w:body>{}</w:body></w:document>",
        body
    )
}

/// 任意のパートから .docx (ZIP) のバイト列を作る
pub(crate) fn docx_with_parts(parts: &[(&str, &str)]) -> Vec<u8> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default();
    for (name, content) in parts {
        zip.start_file(*name, options).unwrap();
        zip.write_all(content.as_bytes()).unwrap();
    }
    zip.finish().unwrap().into_inner()
}

const CONTENT_TYPES_XML: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\
<Types xmlns=\"http://schemas.openxmlformats.org/package/2006/content-types\">\
<Override PartName=\"/word/document.xml\" ContentType=\"application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml\"/>\
</Types>";

/// 決められた形態素列を返す解析器
pub(crate) struct StubAnalyzer {
    pub(crate) morphemes: Vec<Morpheme>,
}

impl StubAnalyzer {
    pub(crate) fn new(morphemes: &[(&str, Option<&str>)]) -> Self {
        let mut start = 0;
        let morphemes = morphemes
            .iter()
            .map(|&(surface, reading)| {
                let m = Morpheme::new(surface, reading).at(start);
                start += surface.len();
                m
            })
            .collect();
        Self { morphemes }
    }
}

impl Analyzer for StubAnalyzer {
    fn analyze(&self, _text: &str, _mode: SplitMode) -> Result<Vec<Morpheme>> {
        Ok(self.morphemes.clone())
    }
}

/// 常に失敗する解析器
pub(crate) struct BrokenAnalyzer;

impl Analyzer for BrokenAnalyzer {
    fn analyze(&self, _text: &str, _mode: SplitMode) -> Result<Vec<Morpheme>> {
        Err(RubiError::analyzer("analysis failed", "the analyzer is broken"))
    }
}
