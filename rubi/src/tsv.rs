//! ルビデータ(TSV)の読み書き
//!
//! 語句リストは、Wordマクロが読み込むタブ区切りの2列形式で受け渡します。
//! 1行に `語句<TAB>読み` を1組書き、ヘッダー行はありません。
//! マクロ側の都合により、既定の文字コードは cp932、改行は CRLF です。

use std::fs;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use encoding_rs::SHIFT_JIS;
use tempfile::NamedTempFile;

use crate::errors::{Result, RubiError};
use crate::term::{Term, TermList};

/// 既定のTSV出力ディレクトリ名
pub const TSV_DIR_NAME: &str = "ルビデータ";

/// TSVファイル名に付ける接尾辞
pub const TSV_FILE_SUFFIX: &str = "（ルビ）";

/// TSVの文字コード
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TsvEncoding {
    /// Windows-31J (WHATWG Shift_JIS)
    #[default]
    Cp932,

    /// UTF-8 (BOMなし)
    Utf8,
}

impl FromStr for TsvEncoding {
    type Err = &'static str;

    fn from_str(encoding: &str) -> Result<Self, Self::Err> {
        match encoding.to_ascii_lowercase().as_str() {
            "cp932" | "shift_jis" | "sjis" | "windows-31j" => Ok(Self::Cp932),
            "utf-8" | "utf8" => Ok(Self::Utf8),
            _ => Err("Could not parse an encoding"),
        }
    }
}

/// TSVの改行コード
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LineEnding {
    #[default]
    CrLf,
    Lf,
}

impl LineEnding {
    fn as_str(self) -> &'static str {
        match self {
            Self::CrLf => "\r\n",
            Self::Lf => "\n",
        }
    }
}

impl FromStr for LineEnding {
    type Err = &'static str;

    fn from_str(ending: &str) -> Result<Self, Self::Err> {
        match ending {
            "crlf" => Ok(Self::CrLf),
            "lf" => Ok(Self::Lf),
            _ => Err("Could not parse a line ending"),
        }
    }
}

/// TSVの書式設定
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TsvOptions {
    /// 文字コード
    pub encoding: TsvEncoding,

    /// 改行コード(書き込み時のみ使用)
    pub line_ending: LineEnding,
}

/// 語句リストをTSVとして書き出します。
///
/// すべての行を変換してから書き込むため、エラーの場合は何も書き込みません。
///
/// # エラー
///
/// 語句や読みにタブや改行が含まれる場合、または指定の文字コードで表現できない文字が
/// 含まれる場合は [`RubiError::Output`] を返します。
pub fn write_tsv<'a, I, W>(terms: I, mut wtr: W, options: &TsvOptions) -> Result<()>
where
    I: IntoIterator<Item = &'a Term>,
    W: Write,
{
    let newline = options.line_ending.as_str();
    let mut out = vec![];

    for (i, term) in terms.into_iter().enumerate() {
        let line_no = i + 1;
        for field in [&term.word, &term.reading] {
            if field.contains(['\t', '\r', '\n']) {
                return Err(RubiError::output(
                    line_no,
                    format!("'{}' contains a tab or a line break", field.escape_debug()),
                ));
            }
        }

        let line = format!("{}\t{}{}", term.word, term.reading, newline);
        match options.encoding {
            TsvEncoding::Utf8 => out.extend_from_slice(line.as_bytes()),
            TsvEncoding::Cp932 => {
                let (encoded, _, had_errors) = SHIFT_JIS.encode(&line);
                if had_errors {
                    return Err(RubiError::output(
                        line_no,
                        format!("'{}' cannot be encoded in cp932", term.word),
                    ));
                }
                out.extend_from_slice(&encoded);
            }
        }
    }

    wtr.write_all(&out)?;
    wtr.flush()?;
    Ok(())
}

/// TSVを読み込んで語句リストを返します。
///
/// 空行は無視します。改行コードは CRLF と LF のどちらも受け付けます。
///
/// # エラー
///
/// 指定の文字コードとして不正な場合や、2列でない行がある場合は
/// [`RubiError::Output`] を返します。
pub fn read_tsv<R: Read>(mut rdr: R, options: &TsvOptions) -> Result<TermList> {
    let mut bytes = vec![];
    rdr.read_to_end(&mut bytes)?;

    let text = match options.encoding {
        TsvEncoding::Utf8 => std::str::from_utf8(&bytes)
            .map_err(|e| RubiError::output(0, format!("not valid UTF-8: {}", e)))?
            .trim_start_matches('\u{feff}')
            .to_string(),
        TsvEncoding::Cp932 => SHIFT_JIS
            .decode_without_bom_handling_and_without_replacement(&bytes)
            .ok_or_else(|| RubiError::output(0, "not valid cp932"))?
            .into_owned(),
    };

    let mut terms = TermList::new();
    for (i, line) in text.lines().enumerate() {
        if line.is_empty() {
            continue;
        }
        let mut fields = line.split('\t');
        match (fields.next(), fields.next(), fields.next()) {
            (Some(word), Some(reading), None) => terms.push(Term::new(word, reading)),
            _ => {
                return Err(RubiError::output(
                    i + 1,
                    "expected exactly two tab-separated fields",
                ))
            }
        }
    }

    Ok(terms)
}

/// TSVファイルを書き出します。
///
/// 親ディレクトリがなければ作成し、一時ファイルを経由して置き換えます。
pub fn save_tsv<'a, P, I>(path: P, terms: I, options: &TsvOptions) -> Result<()>
where
    P: AsRef<Path>,
    I: IntoIterator<Item = &'a Term>,
{
    let path = path.as_ref();
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir)?;

    let mut tmp = NamedTempFile::new_in(dir)?;
    write_tsv(terms, &mut tmp, options)?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

/// TSVファイルを読み込みます。
pub fn load_tsv<P: AsRef<Path>>(path: P, options: &TsvOptions) -> Result<TermList> {
    read_tsv(fs::File::open(path)?, options)
}

/// 文書に対応するTSVファイルの置き場所
///
/// 既定では、文書のあるフォルダの1つ上に [`TSV_DIR_NAME`] フォルダを置き、
/// `<文書名>（ルビ）.tsv` として保存します。
///
/// ```text
/// ルビ振り/
/// ├── 元データ/
/// │   └── 第1章.docx
/// └── ルビデータ/
///     └── 第1章（ルビ）.tsv
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OutputLayout {
    dir: Option<PathBuf>,
}

impl OutputLayout {
    /// 文書フォルダの隣の [`TSV_DIR_NAME`] に保存する既定の配置を返します。
    pub fn project() -> Self {
        Self::default()
    }

    /// 指定したディレクトリにまとめて保存する配置を返します。
    pub fn in_dir<P: Into<PathBuf>>(dir: P) -> Self {
        Self {
            dir: Some(dir.into()),
        }
    }

    /// 文書に対応するTSVファイルのパスを返します。
    ///
    /// # エラー
    ///
    /// 文書のパスを解決できない場合は [`RubiError::IoError`] を返します。
    pub fn tsv_path<P: AsRef<Path>>(&self, document: P) -> Result<PathBuf> {
        let document = document.as_ref();
        let stem = document.file_stem().ok_or_else(|| {
            std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("{} has no file name", document.display()),
            )
        })?;
        let file_name = format!("{}{}.tsv", stem.to_string_lossy(), TSV_FILE_SUFFIX);

        let dir = match &self.dir {
            Some(dir) => dir.clone(),
            None => {
                let document = fs::canonicalize(document)?;
                document
                    .parent()
                    .and_then(Path::parent)
                    .map(|project| project.join(TSV_DIR_NAME))
                    .ok_or_else(|| {
                        std::io::Error::new(
                            std::io::ErrorKind::InvalidInput,
                            format!("{} has no project directory", document.display()),
                        )
                    })?
            }
        };

        Ok(dir.join(file_name))
    }
}
