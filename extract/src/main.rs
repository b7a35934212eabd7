//! ルビ語句を抽出するユーティリティ
//!
//! このバイナリは、Word文書(.docx)の本文から語句と読みを抽出してTSVに書き出します。
//! 1文書の処理、フォルダの一括処理、保存済みTSVへの上書き辞書の再適用、
//! 上書き辞書の編集の各サブコマンドを提供します。

use std::io::{BufWriter, Write};
use std::path::PathBuf;
use std::str::FromStr;

use clap::Parser;

use rubi::analyzer::{FeatureLayout, SplitMode, VibratoAnalyzer};
use rubi::batch::BatchRunner;
use rubi::errors::RubiError;
use rubi::overrides::OverrideDictionary;
use rubi::resolver::TermResolver;
use rubi::term::TermOrder;
use rubi::tsv::{self, LineEnding, OutputLayout, TsvEncoding, TsvOptions};

/// コマンドラインのエラー
#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Rubi(#[from] RubiError),

    #[error("no analyzer dictionary is given; specify it with --sysdic")]
    NoDictionary,

    #[error("preset dictionaries require the `download` feature")]
    DownloadDisabled,

    #[error("'{0}' is not registered in the override dictionary")]
    UnknownWord(String),

    #[error(transparent)]
    IoError(#[from] std::io::Error),
}

/// コマンドライン引数
#[derive(Parser, Debug)]
#[clap(
    name = "rubi-extract",
    version,
    about = "Extracts words and their furigana readings from Word documents"
)]
struct Args {
    /// Override dictionary (JSON). A missing file is treated as empty.
    #[clap(long, global = true, default_value = "override.json")]
    overrides: PathBuf,

    #[clap(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand, Debug)]
enum Command {
    /// Extracts terms from a single document.
    Extract {
        #[clap(flatten)]
        analyzer: AnalyzerArgs,

        #[clap(flatten)]
        output: OutputArgs,

        /// Word document (.docx).
        document: PathBuf,

        /// TSV file to write. Defaults to ../ルビデータ/<name>（ルビ）.tsv next to the document.
        #[clap(short = 'o', long, conflicts_with = "stdout")]
        output_file: Option<PathBuf>,

        /// Writes the TSV to stdout instead of a file.
        #[clap(long)]
        stdout: bool,
    },

    /// Extracts terms from every .docx directly under a folder.
    Batch {
        #[clap(flatten)]
        analyzer: AnalyzerArgs,

        #[clap(flatten)]
        output: OutputArgs,

        /// Folder containing Word documents.
        folder: PathBuf,
    },

    /// Re-applies the override dictionary to a saved TSV file.
    Reapply {
        #[clap(flatten)]
        tsv: TsvArgs,

        /// TSV file to update in place.
        file: PathBuf,
    },

    /// Edits the override dictionary.
    Dict {
        #[clap(subcommand)]
        action: DictCommand,
    },
}

#[derive(clap::Subcommand, Debug)]
enum DictCommand {
    /// Prints all entries.
    List,

    /// Registers a reading.
    Set {
        word: String,
        reading: String,

        /// Replaces the entry of this word.
        #[clap(long)]
        from: Option<String>,
    },

    /// Removes an entry.
    Remove { word: String },
}

#[derive(clap::Args, Debug)]
struct AnalyzerArgs {
    /// System dictionary (rkyv, or zstd if the extension is .zst).
    #[clap(short = 'i', long)]
    sysdic: Option<PathBuf>,

    /// Preset dictionary to download. Choices are ipadic, unidic-cwj, and unidic-csj.
    #[clap(long, conflicts_with = "sysdic")]
    preset: Option<Preset>,

    /// Feature layout of the dictionary. Choices are ipadic and unidic.
    #[clap(long, default_value = "ipadic")]
    layout: FeatureLayout,

    /// Split mode. Choices are coarse and fine.
    #[clap(long, default_value = "coarse")]
    split_mode: SplitMode,

    /// Ignores white spaces in input strings.
    #[clap(short = 'S', long)]
    ignore_space: bool,

    /// Maximum length of unknown words.
    #[clap(short = 'M', long)]
    max_grouping_len: Option<usize>,
}

#[derive(clap::Args, Debug)]
struct OutputArgs {
    /// Term order. Choices are first-seen and sorted.
    #[clap(long, default_value = "first-seen")]
    order: TermOrder,

    /// Directory to which TSV files are written.
    #[clap(long)]
    output_dir: Option<PathBuf>,

    #[clap(flatten)]
    tsv: TsvArgs,
}

#[derive(clap::Args, Debug)]
struct TsvArgs {
    /// TSV encoding. Choices are cp932 and utf-8.
    #[clap(long, default_value = "cp932")]
    encoding: TsvEncoding,

    /// TSV line ending. Choices are crlf and lf.
    #[clap(long, default_value = "crlf")]
    line_ending: LineEnding,
}

impl TsvArgs {
    fn options(&self) -> TsvOptions {
        TsvOptions {
            encoding: self.encoding,
            line_ending: self.line_ending,
        }
    }
}

impl OutputArgs {
    fn layout(&self) -> OutputLayout {
        match &self.output_dir {
            Some(dir) => OutputLayout::in_dir(dir),
            None => OutputLayout::project(),
        }
    }
}

/// ダウンロード可能なプリセット辞書
#[derive(Clone, Copy, Debug)]
enum Preset {
    Ipadic,
    UnidicCwj,
    UnidicCsj,
}

impl FromStr for Preset {
    type Err = &'static str;

    fn from_str(kind: &str) -> Result<Self, Self::Err> {
        match kind {
            "ipadic" => Ok(Self::Ipadic),
            "unidic-cwj" => Ok(Self::UnidicCwj),
            "unidic-csj" => Ok(Self::UnidicCsj),
            _ => Err("Could not parse a preset dictionary"),
        }
    }
}

#[cfg(feature = "download")]
fn load_preset(preset: Preset) -> Result<VibratoAnalyzer, CliError> {
    use rubi::analyzer::PresetDictionaryKind;

    let kind = match preset {
        Preset::Ipadic => PresetDictionaryKind::Ipadic,
        Preset::UnidicCwj => PresetDictionaryKind::UnidicCwj,
        Preset::UnidicCsj => PresetDictionaryKind::UnidicCsj,
    };
    eprintln!("Preparing the {} dictionary...", kind.name());
    Ok(VibratoAnalyzer::from_preset(kind)?)
}

#[cfg(not(feature = "download"))]
fn load_preset(_preset: Preset) -> Result<VibratoAnalyzer, CliError> {
    Err(CliError::DownloadDisabled)
}

impl AnalyzerArgs {
    /// 辞書を読み込んで抽出器を作る
    fn resolver(&self) -> Result<TermResolver<VibratoAnalyzer>, CliError> {
        eprintln!("Loading the dictionary...");
        let analyzer = self.load_analyzer()?;
        let analyzer = analyzer
            .ignore_space(self.ignore_space)?
            .max_grouping_len(self.max_grouping_len.unwrap_or(0));
        eprintln!("Ready to extract");
        Ok(TermResolver::new(analyzer).split_mode(self.split_mode))
    }

    fn load_analyzer(&self) -> Result<VibratoAnalyzer, CliError> {
        if let Some(preset) = self.preset {
            return load_preset(preset);
        }

        let sysdic = self.sysdic.as_ref().ok_or(CliError::NoDictionary)?;
        Ok(VibratoAnalyzer::open(sysdic, self.layout)?)
    }
}

fn main() -> Result<(), CliError> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    match args.command {
        Command::Extract {
            analyzer,
            output,
            document,
            output_file,
            stdout,
        } => {
            let resolver = analyzer.resolver()?;
            let overrides = OverrideDictionary::load(&args.overrides)?;
            let options = output.tsv.options();

            let mut terms = resolver.extract_terms(&document, &overrides)?;
            terms.arrange(output.order);

            if stdout {
                let out = std::io::stdout();
                let mut out = BufWriter::new(out.lock());
                tsv::write_tsv(&terms, &mut out, &options)?;
                out.flush()?;
            } else {
                let path = match output_file {
                    Some(path) => path,
                    None => output.layout().tsv_path(&document)?,
                };
                tsv::save_tsv(&path, &terms, &options)?;
                log::info!(
                    "{}: {} terms -> {}",
                    document.display(),
                    terms.len(),
                    path.display()
                );
            }
        }
        Command::Batch {
            analyzer,
            output,
            folder,
        } => {
            let resolver = analyzer.resolver()?;
            let overrides = OverrideDictionary::load(&args.overrides)?;

            let runner = BatchRunner::new(resolver, overrides)
                .output_layout(output.layout())
                .tsv_options(output.tsv.options())
                .order(output.order);
            let report = runner.run(&folder)?;

            eprintln!(
                "Processed {} documents ({} terms), skipped {}",
                report.processed.len(),
                report.total_terms(),
                report.failed.len()
            );
            for failed in &report.failed {
                eprintln!("  {}: {}", failed.document.display(), failed.message);
            }
        }
        Command::Reapply { tsv: tsv_args, file } => {
            let overrides = OverrideDictionary::load(&args.overrides)?;
            let options = tsv_args.options();

            let mut terms = tsv::load_tsv(&file, &options)?;
            let updated = terms.apply_overrides(&overrides);
            tsv::save_tsv(&file, &terms, &options)?;
            eprintln!("Updated {} of {} terms", updated, terms.len());
        }
        Command::Dict { action } => {
            let mut dict = OverrideDictionary::load(&args.overrides)?;
            match action {
                DictCommand::List => {
                    let out = std::io::stdout();
                    let mut out = BufWriter::new(out.lock());
                    for (word, reading) in dict.iter() {
                        writeln!(&mut out, "{}\t{}", word, reading)?;
                    }
                    out.flush()?;
                    return Ok(());
                }
                DictCommand::Set {
                    word,
                    reading,
                    from: Some(old_word),
                } => {
                    if !dict.contains(&old_word) {
                        return Err(CliError::UnknownWord(old_word));
                    }
                    dict.rename(&old_word, word, reading)?;
                }
                DictCommand::Set {
                    word,
                    reading,
                    from: None,
                } => {
                    dict.set(word, reading)?;
                }
                DictCommand::Remove { word } => {
                    if dict.remove(&word).is_none() {
                        return Err(CliError::UnknownWord(word));
                    }
                }
            }
            dict.save(&args.overrides)?;
            eprintln!(
                "Saved {} entries to {}",
                dict.len(),
                args.overrides.display()
            );
        }
    }

    Ok(())
}
