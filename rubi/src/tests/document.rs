use std::io::Write;

use crate::document::*;
use crate::errors::RubiError;
use crate::test_utils::*;

/// 段落と実行(run)をまたいでテキストが連結されるテスト
#[test]
fn test_concatenates_runs_and_paragraphs() {
    let docx = docx_with_paragraphs(&["東京タワーに", "行った。"]);
    let text = text_from_bytes(&docx).unwrap();
    assert_eq!(text, "東京タワーに行った。");
}

/// 本文が空の文書は空文字列になるテスト
#[test]
fn test_empty_body() {
    let docx = docx_with_paragraphs(&[]);
    assert_eq!(text_from_bytes(&docx).unwrap(), "");
}

/// 文字参照と実体参照が展開されるテスト
#[test]
fn test_unescapes_entities() {
    let xml = r#"<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body><w:p><w:r><w:t>A&amp;B &lt;東京&gt; &#x90FD;庁</w:t></w:r></w:p></w:body></w:document>"#;
    let docx = docx_with_document_xml(xml);
    assert_eq!(text_from_bytes(&docx).unwrap(), "A&B <東京> 都庁");
}

/// w名前空間以外の `t` 要素や、`w:t` 以外の要素のテキストは無視するテスト
#[test]
fn test_ignores_other_elements() {
    let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"
            xmlns:m="http://schemas.openxmlformats.org/officeDocument/2006/math">
  <w:body>
    <w:p>
      <w:r><w:t>本文</w:t></w:r>
      <w:r><w:instrText>PAGE</w:instrText></w:r>
      <m:oMath><m:r><m:t>x</m:t></m:r></m:oMath>
      <w:r><w:tab/><w:t xml:space="preserve"> です</w:t></w:r>
    </w:p>
  </w:body>
</w:document>"#;
    let docx = docx_with_document_xml(xml);
    assert_eq!(text_from_bytes(&docx).unwrap(), "本文 です");
}

/// 既定の名前空間で書かれた本文も読めるテスト
#[test]
fn test_default_namespace() {
    let xml = r#"<document xmlns="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><body><p><r><t>都庁</t></r></p></body></document>"#;
    let docx = docx_with_document_xml(xml);
    assert_eq!(text_from_bytes(&docx).unwrap(), "都庁");
}

/// CDATAセクションの内容も取り込まれるテスト
#[test]
fn test_cdata() {
    let xml = r#"<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body><w:p><w:r><w:t><![CDATA[A<B]]></w:t></w:r></w:p></w:body></w:document>"#;
    let docx = docx_with_document_xml(xml);
    assert_eq!(text_from_bytes(&docx).unwrap(), "A<B");
}

/// 本文パートがない場合のテスト
#[test]
fn test_missing_main_part() {
    let docx = docx_with_parts(&[("word/styles.xml", "<w:styles/>")]);
    let err = text_from_bytes(&docx).unwrap_err();
    assert!(matches!(err, RubiError::Format(_)));
    assert!(err.to_string().contains("word/document.xml"));
}

/// ZIPアーカイブでない場合のテスト
#[test]
fn test_not_an_archive() {
    let err = text_from_bytes(b"this is not a zip archive").unwrap_err();
    assert!(matches!(err, RubiError::Format(_)));
}

/// 本文が整形式のXMLでない場合のテスト
#[test]
fn test_malformed_xml() {
    let xml = r#"<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body><w:p><w:t>壊れ</w:p></w:document>"#;
    let docx = docx_with_document_xml(xml);
    let err = text_from_bytes(&docx).unwrap_err();
    assert!(matches!(err, RubiError::Format(_)));
}

/// 途中で切れた本文は部分的な結果を返さずにエラーになるテスト
#[test]
fn test_truncated_xml() {
    let xml = r#"<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body><w:p><w:r><w:t>東京タワー"#;
    let docx = docx_with_document_xml(xml);
    let err = text_from_bytes(&docx).unwrap_err();
    assert!(matches!(err, RubiError::Format(_)));
    assert!(err.to_string().contains("unexpected end of document"));
}

/// ルート要素が複数ある場合のテスト
#[test]
fn test_multiple_root_elements() {
    let xml = r#"<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:t>A</w:t></w:document><w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:t>B</w:t></w:document>"#;
    let docx = docx_with_document_xml(xml);
    let err = text_from_bytes(&docx).unwrap_err();
    assert!(matches!(err, RubiError::Format(_)));
    assert!(err.to_string().contains("multiple root elements"));
}

/// 空要素のルートの後に要素が続く場合のテスト
#[test]
fn test_element_after_empty_root() {
    let docx = docx_with_document_xml("<root/><root/>");
    let err = text_from_bytes(&docx).unwrap_err();
    assert!(matches!(err, RubiError::Format(_)));
}

/// 宣言されていない名前空間接頭辞のテスト
#[test]
fn test_unbound_prefix() {
    let docx = docx_with_document_xml("<x:document><x:t>C</x:t></x:document>");
    let err = text_from_bytes(&docx).unwrap_err();
    assert!(matches!(err, RubiError::Format(_)));
    assert!(err.to_string().contains("unbound namespace prefix 'x'"));
}

/// 本文パートが空の場合のテスト
#[test]
fn test_empty_main_part() {
    let docx = docx_with_document_xml("");
    let err = text_from_bytes(&docx).unwrap_err();
    assert!(matches!(err, RubiError::Format(_)));
}

/// ファイルから読み込むテスト
#[test]
fn test_load_text_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(&docx_with_paragraphs(&["日本の本"])).unwrap();
    assert_eq!(load_text(file.path()).unwrap(), "日本の本");
}

/// 存在しないファイルはI/Oエラーになるテスト
#[test]
fn test_load_text_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = load_text(dir.path().join("missing.docx")).unwrap_err();
    assert!(matches!(err, RubiError::IoError(_)));
}
