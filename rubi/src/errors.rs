//! エラー型の定義
//!
//! このモジュールは、rubiライブラリで使用されるすべてのエラー型を定義します。
//! 文書の読み込み、形態素解析器、上書き辞書、TSV出力のそれぞれに対応する
//! エラーを [`RubiError`] にまとめています。

use std::error::Error;
use std::fmt;

/// rubi専用のResult型
///
/// エラー型としてデフォルトで[`RubiError`]を使用します。
pub type Result<T, E = RubiError> = std::result::Result<T, E>;

/// rubiのエラー型
///
/// このライブラリで発生する可能性のあるすべてのエラーを表現します。
#[derive(Debug, thiserror::Error)]
pub enum RubiError {
    /// 文書フォーマットエラー
    ///
    /// [`FormatError`]のエラーバリアント。文書を開けない、または解析できない場合に発生します。
    /// 一括処理ではその文書だけをスキップして続行します。
    #[error(transparent)]
    Format(FormatError),

    /// 形態素解析器エラー
    ///
    /// [`AnalyzerError`]のエラーバリアント。解析器の初期化や解析に失敗した場合に発生し、
    /// プロセス全体にとって致命的です。
    #[error(transparent)]
    Analyzer(AnalyzerError),

    /// 上書き辞書エラー
    ///
    /// [`DictionaryError`]のエラーバリアント。
    #[error(transparent)]
    Dictionary(DictionaryError),

    /// 出力エラー
    ///
    /// [`OutputError`]のエラーバリアント。TSVとして表現できない語句がある場合に発生します。
    #[error(transparent)]
    Output(OutputError),

    /// I/Oエラー
    ///
    /// [`std::io::Error`]のエラーバリアント。
    #[error(transparent)]
    IoError(#[from] std::io::Error),
}

impl RubiError {
    /// 文書フォーマットエラーを生成します
    ///
    /// # 引数
    ///
    /// * `part` - 問題のあったパッケージ内の部位
    /// * `msg` - エラーメッセージ
    pub(crate) fn format<S>(part: &'static str, msg: S) -> Self
    where
        S: Into<String>,
    {
        Self::Format(FormatError {
            part,
            msg: msg.into(),
        })
    }

    /// 形態素解析器エラーを生成します
    ///
    /// # 引数
    ///
    /// * `msg` - エラーメッセージ
    /// * `cause` - エラーの原因
    pub(crate) fn analyzer<S, M>(msg: S, cause: M) -> Self
    where
        S: Into<String>,
        M: Into<String>,
    {
        Self::Analyzer(AnalyzerError {
            msg: msg.into(),
            cause: cause.into(),
        })
    }

    /// 上書き辞書エラーを生成します
    ///
    /// # 引数
    ///
    /// * `origin` - 辞書の取得元(ファイルパスなど)
    /// * `msg` - エラーメッセージ
    pub(crate) fn dictionary<O, S>(origin: O, msg: S) -> Self
    where
        O: Into<String>,
        S: Into<String>,
    {
        Self::Dictionary(DictionaryError {
            origin: origin.into(),
            msg: msg.into(),
        })
    }

    /// 出力エラーを生成します
    ///
    /// # 引数
    ///
    /// * `line` - 問題のあった行番号(1始まり)
    /// * `msg` - エラーメッセージ
    pub(crate) fn output<S>(line: usize, msg: S) -> Self
    where
        S: Into<String>,
    {
        Self::Output(OutputError {
            line,
            msg: msg.into(),
        })
    }

    /// 一括処理を中断すべきエラーかどうかを返します
    ///
    /// 解析器のエラーだけが致命的です。それ以外は該当する文書のみの失敗として扱えます。
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Analyzer(_))
    }
}

/// 文書を開けない、または解析できない場合に使用されるエラー
#[derive(Debug)]
pub struct FormatError {
    /// 問題のあった部位
    pub(crate) part: &'static str,

    /// エラーメッセージ
    pub(crate) msg: String,
}

impl fmt::Display for FormatError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "FormatError: {}: {}", self.part, self.msg)
    }
}

impl Error for FormatError {}

/// 形態素解析器の初期化や実行に失敗した場合に使用されるエラー
#[derive(Debug)]
pub struct AnalyzerError {
    /// エラーメッセージ
    pub(crate) msg: String,

    /// エラーの根本原因
    pub(crate) cause: String,
}

impl fmt::Display for AnalyzerError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "AnalyzerError: {}: {}", self.msg, self.cause)
    }
}

impl Error for AnalyzerError {}

/// 上書き辞書の内容が不正な場合に使用されるエラー
#[derive(Debug)]
pub struct DictionaryError {
    /// 辞書の取得元
    pub(crate) origin: String,

    /// エラーメッセージ
    pub(crate) msg: String,
}

impl fmt::Display for DictionaryError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "DictionaryError: {}: {}", self.origin, self.msg)
    }
}

impl Error for DictionaryError {}

/// 語句リストをTSVとして書き出せない、または読み込めない場合に使用されるエラー
#[derive(Debug)]
pub struct OutputError {
    /// 行番号(1始まり)
    pub(crate) line: usize,

    /// エラーメッセージ
    pub(crate) msg: String,
}

impl fmt::Display for OutputError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "OutputError: line {}: {}", self.line, self.msg)
    }
}

impl Error for OutputError {}

impl From<vibrato_rkyv::errors::VibratoError> for RubiError {
    fn from(error: vibrato_rkyv::errors::VibratoError) -> Self {
        Self::analyzer("vibrato", error.to_string())
    }
}
