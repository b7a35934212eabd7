//! フォルダ単位の一括処理
//!
//! フォルダ直下の .docx をすべて処理し、文書ごとにTSVを書き出します。
//! 文書が壊れているなど、その文書だけの問題であれば警告を出して次の文書へ進みます。
//! 形態素解析器のエラーは以降の文書でも必ず起きるため、その時点で中断します。

use std::io;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::analyzer::Analyzer;
use crate::errors::Result;
use crate::overrides::ReadingOverrides;
use crate::resolver::TermResolver;
use crate::term::TermOrder;
use crate::tsv::{self, OutputLayout, TsvOptions};

/// Wordが編集中に作るロックファイルの接頭辞
const LOCK_FILE_PREFIX: &str = "~$";

/// フォルダ直下の .docx ファイルをパス順に列挙します。
///
/// サブフォルダは探索せず、Wordのロックファイル(`~$` で始まるもの)は除外します。
///
/// # エラー
///
/// フォルダを読めない場合は [`RubiError::IoError`](crate::errors::RubiError::IoError) を返します。
pub fn collect_documents<P: AsRef<Path>>(folder: P) -> Result<Vec<PathBuf>> {
    let mut documents = vec![];
    for entry in WalkDir::new(folder).min_depth(1).max_depth(1) {
        let entry = entry.map_err(io::Error::from)?;
        if !entry.file_type().is_file() {
            continue;
        }
        if is_document(entry.path()) {
            documents.push(entry.into_path());
        }
    }
    documents.sort();
    Ok(documents)
}

fn is_document(path: &Path) -> bool {
    let is_docx = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("docx"));
    let is_lock_file = path
        .file_name()
        .is_some_and(|name| name.to_string_lossy().starts_with(LOCK_FILE_PREFIX));
    is_docx && !is_lock_file
}

/// 処理できた文書
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProcessedDocument {
    pub document: PathBuf,
    pub tsv: PathBuf,
    pub terms: usize,
}

/// スキップした文書
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FailedDocument {
    pub document: PathBuf,
    pub message: String,
}

/// 一括処理の結果
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BatchReport {
    pub processed: Vec<ProcessedDocument>,
    pub failed: Vec<FailedDocument>,
}

impl BatchReport {
    /// 出力した語句の総数を返します。
    pub fn total_terms(&self) -> usize {
        self.processed.iter().map(|p| p.terms).sum()
    }
}

/// 一括処理の実行器
///
/// 抽出器と上書き辞書は実行中に変更されません。
pub struct BatchRunner<A, O> {
    resolver: TermResolver<A>,
    overrides: O,
    layout: OutputLayout,
    tsv_options: TsvOptions,
    order: TermOrder,
}

impl<A, O> BatchRunner<A, O>
where
    A: Analyzer,
    O: ReadingOverrides,
{
    /// 既定の出力設定で実行器を作成します。
    pub fn new(resolver: TermResolver<A>, overrides: O) -> Self {
        Self {
            resolver,
            overrides,
            layout: OutputLayout::default(),
            tsv_options: TsvOptions::default(),
            order: TermOrder::default(),
        }
    }

    /// TSVの保存先を設定します。
    pub fn output_layout(mut self, layout: OutputLayout) -> Self {
        self.layout = layout;
        self
    }

    /// TSVの書式を設定します。
    pub fn tsv_options(mut self, options: TsvOptions) -> Self {
        self.tsv_options = options;
        self
    }

    /// 語句の並び順を設定します。
    pub fn order(mut self, order: TermOrder) -> Self {
        self.order = order;
        self
    }

    /// 1つの文書を処理してTSVを書き出します。
    pub fn process<P: AsRef<Path>>(&self, document: P) -> Result<ProcessedDocument> {
        let document = document.as_ref();
        let mut terms = self.resolver.extract_terms(document, &self.overrides)?;
        terms.arrange(self.order);

        let tsv_path = self.layout.tsv_path(document)?;
        tsv::save_tsv(&tsv_path, &terms, &self.tsv_options)?;

        Ok(ProcessedDocument {
            document: document.to_path_buf(),
            tsv: tsv_path,
            terms: terms.len(),
        })
    }

    /// フォルダ直下の文書をすべて処理します。
    ///
    /// # エラー
    ///
    /// フォルダを読めない場合と、形態素解析器のエラーが起きた場合に中断してエラーを返します。
    /// それ以外の文書ごとのエラーは [`BatchReport::failed`] に記録されます。
    pub fn run<P: AsRef<Path>>(&self, folder: P) -> Result<BatchReport> {
        let mut report = BatchReport::default();

        for document in collect_documents(folder)? {
            match self.process(&document) {
                Ok(processed) => {
                    log::info!(
                        "{}: {} terms -> {}",
                        document.display(),
                        processed.terms,
                        processed.tsv.display()
                    );
                    report.processed.push(processed);
                }
                Err(e) if e.is_fatal() => return Err(e),
                Err(e) => {
                    log::warn!("skipped {}: {}", document.display(), e);
                    report.failed.push(FailedDocument {
                        document,
                        message: e.to_string(),
                    });
                }
            }
        }

        Ok(report)
    }
}
