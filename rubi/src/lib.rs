//! # rubi
//!
//! Word文書(.docx)の本文から、ルビ(ふりがな)を振る語句とその読みを抽出するライブラリです。
//!
//! ## 概要
//!
//! 本文のテキストを形態素解析し、漢字やカタカナを含む語句について読みをひらがなで決定します。
//! 読みは利用者が管理する上書き辞書を優先し、辞書にない語句は形態素解析器の読みを使います。
//! 結果は Wordマクロ向けのタブ区切りファイル(TSV)として書き出せます。
//!
//! ## 主な機能
//!
//! - **本文の読み込み**: .docx から `w:t` 要素のテキストを文書順に連結
//! - **語句の抽出**: 1文字以下・ひらがなのみ・重複・読みと同じ表記の語句を除外
//! - **上書き辞書**: 登録順を保持するJSON辞書の読み込み、編集、保存
//! - **TSV出力**: cp932 / CRLF のルビデータと、その再読み込み
//! - **一括処理**: フォルダ内の文書をまとめて処理し、壊れた文書はスキップ
//!
//! ## 使用例
//!
//! ```
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use std::collections::HashMap;
//!
//! use rubi::{FeatureLayout, TermResolver, VibratoAnalyzer};
//! use vibrato_rkyv::{SystemDictionaryBuilder, Tokenizer};
//!
//! let lexicon_csv = "東京,0,0,10,名詞,固有名詞,地域,一般,*,*,東京,トウキョウ,トーキョー
//! 都庁,0,0,10,名詞,一般,*,*,*,*,都庁,トチョウ,トチョー
//! に,0,0,10,助詞,格助詞,一般,*,*,*,に,ニ,ニ
//! 行っ,0,0,10,動詞,自立,*,*,五段・カ行促音便,連用タ接続,行く,イッ,イッ
//! た,0,0,10,助動詞,*,*,*,特殊・タ,基本形,た,タ,タ";
//! let dict = SystemDictionaryBuilder::from_readers(
//!     lexicon_csv.as_bytes(),
//!     "1 1\n0 0 0".as_bytes(),
//!     "DEFAULT 0 1 0".as_bytes(),
//!     "DEFAULT,0,0,100,名詞,一般,*,*,*,*,*".as_bytes(),
//! )?;
//! let analyzer = VibratoAnalyzer::from_tokenizer(Tokenizer::from_inner(dict), FeatureLayout::IPADIC);
//! let resolver = TermResolver::new(analyzer);
//!
//! let overrides = HashMap::from([("行っ".to_string(), "いっ".to_string())]);
//! let terms = resolver.resolve_terms("東京都庁に行った", &overrides)?;
//!
//! let pairs: Vec<_> = terms.iter().map(|t| (t.word.as_str(), t.reading.as_str())).collect();
//! assert_eq!(pairs, [("東京都庁", "とうきょうとちょう"), ("行っ", "いっ")]);
//! # Ok(())
//! # }
//! ```

/// 形態素解析器とのアダプタ
pub mod analyzer;

/// フォルダ単位の一括処理
pub mod batch;

/// .docx からの本文テキストの読み込み
pub mod document;

/// エラー型の定義
pub mod errors;

/// 仮名の判定と変換
pub mod kana;

/// 上書き辞書
pub mod overrides;

/// 語句の抽出
pub mod resolver;

/// 語句と読みの組
pub mod term;

/// ルビデータ(TSV)の読み書き
pub mod tsv;

#[cfg(test)]
mod test_utils;

// Re-exports
pub use analyzer::{Analyzer, FeatureLayout, Morpheme, SplitMode, VibratoAnalyzer};
pub use batch::{BatchReport, BatchRunner};
pub use errors::{Result, RubiError};
pub use overrides::{OverrideDictionary, ReadingOverrides};
pub use resolver::TermResolver;
pub use term::{Term, TermList, TermOrder};
pub use tsv::{OutputLayout, TsvOptions};

/// このライブラリのバージョン番号
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
