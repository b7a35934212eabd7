//! vibrato-rkyv による形態素解析器の実装

use std::path::Path;

use vibrato_rkyv::{CacheStrategy, Dictionary, LoadMode, Tokenizer};

use crate::analyzer::{join_compounds, Analyzer, FeatureLayout, Morpheme, SplitMode};
use crate::errors::{Result, RubiError};

/// vibrato-rkyv のトークナイザーを使う [`Analyzer`]
///
/// トークナイザー(辞書)は生成時に一度だけ読み込まれ、以降は読み取り専用で共有されます。
/// 解析のたびに新しいワーカーを作るため、`&self` のまま何度でも呼び出せます。
///
/// # 例
///
/// ```
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// use rubi::analyzer::{Analyzer, FeatureLayout, SplitMode, VibratoAnalyzer};
/// use vibrato_rkyv::{SystemDictionaryBuilder, Tokenizer};
///
/// let lexicon_csv = "東京,0,0,10,名詞,固有名詞,地域,一般,*,*,東京,トウキョウ,トーキョー
/// タワー,0,0,10,名詞,一般,*,*,*,*,タワー,タワー,タワー";
/// let dict = SystemDictionaryBuilder::from_readers(
///     lexicon_csv.as_bytes(),
///     "1 1\n0 0 0".as_bytes(),
///     "DEFAULT 0 1 0".as_bytes(),
///     "DEFAULT,0,0,100,名詞,一般,*,*,*,*,*".as_bytes(),
/// )?;
/// let analyzer = VibratoAnalyzer::from_tokenizer(Tokenizer::from_inner(dict), FeatureLayout::IPADIC);
///
/// let morphemes = analyzer.analyze("東京タワー", SplitMode::Coarse)?;
/// assert_eq!(morphemes.len(), 1);
/// assert_eq!(morphemes[0].surface, "東京タワー");
/// assert_eq!(morphemes[0].reading.as_deref(), Some("トウキョウタワー"));
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct VibratoAnalyzer {
    tokenizer: Tokenizer,
    layout: FeatureLayout,
}

impl VibratoAnalyzer {
    /// 既存のトークナイザーから解析器を作成します。
    pub fn from_tokenizer(tokenizer: Tokenizer, layout: FeatureLayout) -> Self {
        Self { tokenizer, layout }
    }

    /// コンパイル済みの辞書ファイルから解析器を作成します。
    ///
    /// 拡張子が `.zst` の場合はZstandard圧縮辞書として読み込み、
    /// 展開した辞書をユーザーのキャッシュディレクトリに保存します。
    ///
    /// # エラー
    ///
    /// 辞書を読み込めない場合は [`RubiError::Analyzer`] を返します。
    pub fn open<P: AsRef<Path>>(path: P, layout: FeatureLayout) -> Result<Self> {
        let path = path.as_ref();
        let is_zstd = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("zst"));
        if is_zstd {
            Self::from_zstd(path, CacheStrategy::GlobalCache, layout)
        } else {
            Self::from_path(path, layout)
        }
    }

    /// rkyv形式の辞書ファイルから解析器を作成します。
    ///
    /// 辞書は毎回検証してから使用します。
    pub fn from_path<P: AsRef<Path>>(path: P, layout: FeatureLayout) -> Result<Self> {
        let path = path.as_ref();
        let dict = Dictionary::from_path(path, LoadMode::Validate).map_err(|e| {
            RubiError::analyzer(
                format!("failed to load the dictionary {}", path.display()),
                e.to_string(),
            )
        })?;
        Ok(Self::from_tokenizer(Tokenizer::new(dict), layout))
    }

    /// Zstandard圧縮された辞書ファイルから解析器を作成します。
    pub fn from_zstd<P: AsRef<Path>>(
        path: P,
        strategy: CacheStrategy,
        layout: FeatureLayout,
    ) -> Result<Self> {
        let path = path.as_ref();
        let dict = Dictionary::from_zstd(path, strategy).map_err(|e| {
            RubiError::analyzer(
                format!("failed to load the dictionary {}", path.display()),
                e.to_string(),
            )
        })?;
        Ok(Self::from_tokenizer(Tokenizer::new(dict), layout))
    }

    /// プリセット辞書をダウンロードして解析器を作成します。
    ///
    /// 辞書はユーザーのキャッシュディレクトリに保存され、2回目以降はそこから読み込まれます。
    /// 素性の並びはプリセットの種類から決まります。
    #[cfg(feature = "download")]
    pub fn from_preset(kind: vibrato_rkyv::dictionary::PresetDictionaryKind) -> Result<Self> {
        use vibrato_rkyv::dictionary::PresetDictionaryKind;

        let cache_dir = dirs::cache_dir()
            .ok_or_else(|| {
                RubiError::analyzer("failed to prepare a preset dictionary", "no cache directory")
            })?
            .join("rubi-assets")
            .join(kind.name());
        std::fs::create_dir_all(&cache_dir)?;

        let layout = match kind {
            PresetDictionaryKind::Ipadic => FeatureLayout::IPADIC,
            _ => FeatureLayout::UNIDIC,
        };
        let dict = Dictionary::from_preset_with_download(kind, &cache_dir).map_err(|e| {
            RubiError::analyzer(
                format!("failed to prepare the preset dictionary {}", kind.name()),
                e.to_string(),
            )
        })?;
        Ok(Self::from_tokenizer(Tokenizer::new(dict), layout))
    }

    /// 入力中の空白を無視するかどうかを設定します。
    ///
    /// # エラー
    ///
    /// 辞書に `SPACE` カテゴリが定義されていない場合は [`RubiError::Analyzer`] を返します。
    pub fn ignore_space(mut self, yes: bool) -> Result<Self> {
        self.tokenizer = self.tokenizer.ignore_space(yes)?;
        Ok(self)
    }

    /// 未知語の最大長を設定します。`0` は無制限を表します。
    pub fn max_grouping_len(mut self, max_grouping_len: usize) -> Self {
        self.tokenizer = self.tokenizer.max_grouping_len(max_grouping_len);
        self
    }

    /// 素性の並びを返します。
    pub fn layout(&self) -> FeatureLayout {
        self.layout
    }
}

impl Analyzer for VibratoAnalyzer {
    fn analyze(&self, text: &str, mode: SplitMode) -> Result<Vec<Morpheme>> {
        let mut worker = self.tokenizer.new_worker();
        worker.reset_sentence(text);
        worker.tokenize();

        let morphemes = worker
            .token_iter()
            .map(|t| self.layout.morpheme(t.surface(), t.feature(), t.range_byte()))
            .collect();

        Ok(match mode {
            SplitMode::Fine => morphemes,
            SplitMode::Coarse => join_compounds(morphemes),
        })
    }
}
