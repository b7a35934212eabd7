//! Word文書(.docx)からの本文テキストの読み込み
//!
//! .docx はZIPアーカイブで、本文は `word/document.xml` に
//! WordprocessingML として格納されています。このモジュールは本文中の
//! すべてのテキスト要素 `w:t` の内容を文書順に連結し、1つの文字列として返します。
//!
//! 段落や実行(run)の区切りは意図的に取り除かれます。形態素解析器には
//! 文書の構造ではなく文字の並びだけを渡すためです。

use std::fs::File;
use std::io::{BufRead, BufReader, Cursor, Read, Seek};
use std::path::Path;

use quick_xml::events::Event;
use quick_xml::name::{Namespace, ResolveResult};
use quick_xml::reader::NsReader;
use zip::result::ZipError;
use zip::ZipArchive;

use crate::errors::{Result, RubiError};

/// 本文パートのアーカイブ内パス
pub const MAIN_DOCUMENT_PART: &str = "word/document.xml";

/// WordprocessingML の名前空間URI
pub const WORDPROCESSINGML_NS: &[u8] = b"http://schemas.openxmlformats.org/wordprocessingml/2006/main";

/// テキスト要素のローカル名
const TEXT_ELEMENT: &[u8] = b"t";

/// .docx ファイルを開き、本文のテキストを連結して返します。
///
/// # エラー
///
/// - ファイルを開けない場合は [`RubiError::IoError`]
/// - ZIPアーカイブとして開けない場合、本文パートがない場合、
///   XMLとして解析できない場合は [`RubiError::Format`]
pub fn load_text<P: AsRef<Path>>(path: P) -> Result<String> {
    let file = File::open(path)?;
    read_text(BufReader::new(file))
}

/// メモリ上の .docx データから本文のテキストを連結して返します。
pub fn text_from_bytes(bytes: &[u8]) -> Result<String> {
    read_text(Cursor::new(bytes))
}

/// 任意のシーク可能なリーダーから .docx を読み、本文のテキストを連結して返します。
pub fn read_text<R: Read + Seek>(rdr: R) -> Result<String> {
    let mut archive = ZipArchive::new(rdr)
        .map_err(|e| RubiError::format("archive", format!("failed to open the archive: {}", e)))?;

    let part = match archive.by_name(MAIN_DOCUMENT_PART) {
        Ok(part) => part,
        Err(ZipError::FileNotFound) => {
            return Err(RubiError::format(
                MAIN_DOCUMENT_PART,
                "the main document part is missing",
            ))
        }
        Err(e) => return Err(RubiError::format(MAIN_DOCUMENT_PART, e.to_string())),
    };

    collect_text_runs(BufReader::new(part))
}

/// WordprocessingML から `w:t` 要素の内容を文書順に連結する
///
/// 閉じられていない要素、複数のルート要素、宣言されていない名前空間接頭辞は
/// 整形式でないものとしてエラーにします。
fn collect_text_runs<R: BufRead>(xml: R) -> Result<String> {
    let mut reader = NsReader::from_reader(xml);
    let mut buf = Vec::new();
    let mut text = String::new();
    let mut depth = 0usize;
    let mut text_depth = 0usize;
    let mut has_root = false;

    loop {
        match reader
            .read_resolved_event_into(&mut buf)
            .map_err(|e| RubiError::format(MAIN_DOCUMENT_PART, e.to_string()))?
        {
            (ref ns, Event::Start(ref e)) => {
                open_element(ns, depth, &mut has_root)?;
                depth += 1;
                if is_text_element(ns, e.local_name().as_ref()) {
                    text_depth += 1;
                }
            }
            (ref ns, Event::End(ref e)) => {
                depth = depth.checked_sub(1).ok_or_else(|| {
                    RubiError::format(MAIN_DOCUMENT_PART, "unexpected end tag")
                })?;
                if text_depth > 0 && is_text_element(ns, e.local_name().as_ref()) {
                    text_depth -= 1;
                }
            }
            (ref ns, Event::Empty(_)) => open_element(ns, depth, &mut has_root)?,
            (_, Event::Text(ref e)) if text_depth > 0 => {
                let unescaped = e
                    .unescape()
                    .map_err(|e| RubiError::format(MAIN_DOCUMENT_PART, e.to_string()))?;
                text.push_str(&unescaped);
            }
            (_, Event::CData(ref e)) if text_depth > 0 => {
                let raw = std::str::from_utf8(e)
                    .map_err(|e| RubiError::format(MAIN_DOCUMENT_PART, e.to_string()))?;
                text.push_str(raw);
            }
            (_, Event::Eof) => break,
            _ => {}
        }
        buf.clear();
    }

    if !has_root {
        return Err(RubiError::format(MAIN_DOCUMENT_PART, "no root element found"));
    }
    if depth != 0 {
        return Err(RubiError::format(
            MAIN_DOCUMENT_PART,
            "unexpected end of document",
        ));
    }

    Ok(text)
}

/// 開始タグ(空要素タグを含む)を検査する
fn open_element(ns: &ResolveResult, depth: usize, has_root: &mut bool) -> Result<()> {
    if let ResolveResult::Unknown(prefix) = ns {
        return Err(RubiError::format(
            MAIN_DOCUMENT_PART,
            format!(
                "unbound namespace prefix '{}'",
                String::from_utf8_lossy(prefix)
            ),
        ));
    }
    if depth == 0 {
        if *has_root {
            return Err(RubiError::format(
                MAIN_DOCUMENT_PART,
                "multiple root elements",
            ));
        }
        *has_root = true;
    }
    Ok(())
}

#[inline]
fn is_text_element(ns: &ResolveResult, local_name: &[u8]) -> bool {
    matches!(ns, ResolveResult::Bound(Namespace(uri)) if *uri == WORDPROCESSINGML_NS)
        && local_name == TEXT_ELEMENT
}
