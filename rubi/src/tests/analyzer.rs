use crate::analyzer::*;
use crate::test_utils::test_analyzer;

fn surfaces(morphemes: &[Morpheme]) -> Vec<&str> {
    morphemes.iter().map(|m| m.surface.as_str()).collect()
}

/// 辞書の分割単位のまま解析するテスト
#[test]
fn test_fine_mode() {
    let analyzer = test_analyzer();
    let morphemes = analyzer.analyze("東京タワーに行った", SplitMode::Fine).unwrap();

    assert_eq!(surfaces(&morphemes), ["東京", "タワー", "に", "行っ", "た"]);
    assert_eq!(morphemes[0].reading.as_deref(), Some("トウキョウ"));
    assert_eq!(morphemes[0].pos, ["名詞", "固有名詞", "地域", "一般"]);
    assert_eq!(morphemes[0].range, 0..6);
    assert_eq!(morphemes[1].range, 6..15);
    assert_eq!(morphemes[3].reading.as_deref(), Some("イッ"));
}

/// 名詞の連続が1つの複合語にまとまるテスト
#[test]
fn test_coarse_mode_joins_nouns() {
    let analyzer = test_analyzer();
    let morphemes = analyzer.analyze("東京タワーに行った", SplitMode::Coarse).unwrap();

    assert_eq!(surfaces(&morphemes), ["東京タワー", "に", "行っ", "た"]);
    assert_eq!(morphemes[0].reading.as_deref(), Some("トウキョウタワー"));
    assert_eq!(morphemes[0].pos, ["名詞", "固有名詞", "地域", "一般"]);
    assert_eq!(morphemes[0].range, 0..15);
}

/// 接頭辞と接尾辞が名詞に付くテスト
#[test]
fn test_coarse_mode_prefix_and_suffix() {
    let analyzer = test_analyzer();

    let morphemes = analyzer.analyze("田中さんのお茶", SplitMode::Coarse).unwrap();
    assert_eq!(surfaces(&morphemes), ["田中さん", "の", "お茶"]);
    assert_eq!(morphemes[0].reading.as_deref(), Some("タナカサン"));
    assert_eq!(morphemes[2].reading.as_deref(), Some("オチャ"));
}

/// 代名詞は複合語に含まれないテスト
#[test]
fn test_coarse_mode_keeps_pronoun() {
    let analyzer = test_analyzer();
    let morphemes = analyzer.analyze("これ本", SplitMode::Coarse).unwrap();
    assert_eq!(surfaces(&morphemes), ["これ", "本"]);
}

/// 名詞に続かない接尾辞はそのまま残るテスト
#[test]
fn test_coarse_mode_orphan_suffix() {
    let analyzer = test_analyzer();
    let morphemes = analyzer.analyze("はさん", SplitMode::Coarse).unwrap();
    assert_eq!(surfaces(&morphemes), ["は", "さん"]);
}

/// 未知語は読みを持たないテスト
#[test]
fn test_unknown_word_has_no_reading() {
    let analyzer = test_analyzer();
    let morphemes = analyzer.analyze("東京に高層", SplitMode::Fine).unwrap();

    assert_eq!(surfaces(&morphemes), ["東京", "に", "高層"]);
    assert_eq!(morphemes[2].reading, None);
    assert_eq!(morphemes[2].pos, ["名詞", "一般", "*", "*"]);
}

/// 読みが欠けた部分を含む複合語は読みを持たないテスト
#[test]
fn test_join_without_reading() {
    let morphemes = vec![
        Morpheme::new("東京", Some("トウキョウ"))
            .with_pos(["名詞", "固有名詞"])
            .at(0),
        Morpheme::new("ドーム", None).with_pos(["名詞", "一般"]).at(6),
    ];
    let joined = join_compounds(morphemes);

    assert_eq!(joined.len(), 1);
    assert_eq!(joined[0].surface, "東京ドーム");
    assert_eq!(joined[0].reading, None);
}

/// 入力中で離れている形態素はまとめないテスト
#[test]
fn test_join_requires_adjacency() {
    let morphemes = vec![
        Morpheme::new("東京", Some("トウキョウ"))
            .with_pos(["名詞", "固有名詞"])
            .at(0),
        Morpheme::new("タワー", Some("タワー"))
            .with_pos(["名詞", "一般"])
            .at(7),
    ];
    let joined = join_compounds(morphemes);
    assert_eq!(surfaces(&joined), ["東京", "タワー"]);
}

/// 接頭辞だけの並びはまとめないテスト
#[test]
fn test_join_prefix_without_head() {
    let morphemes = vec![
        Morpheme::new("お", Some("オ")).with_pos(["接頭詞"]).at(0),
        Morpheme::new("に", Some("ニ")).with_pos(["助詞"]).at(3),
    ];
    let joined = join_compounds(morphemes);
    assert_eq!(surfaces(&joined), ["お", "に"]);
}

/// UniDic形式の素性から読みを取り出すテスト
#[test]
fn test_unidic_layout() {
    let feature = "名詞,普通名詞,一般,*,*,*,トウ,塔,塔,トー,塔,トー,漢,*,*,*,*,*,*,体,トウ,トウ,トウ,トウ,*,*,*,*,*";
    let m = FeatureLayout::UNIDIC.morpheme("塔", feature, 0..3);

    assert_eq!(m.reading.as_deref(), Some("トウ"));
    assert_eq!(m.pos, ["名詞", "普通名詞", "一般", "*"]);
}

/// 引用符で囲まれた素性を解析するテスト
#[test]
fn test_quoted_feature() {
    let m = FeatureLayout::IPADIC.morpheme(
        "1,000",
        "名詞,数,*,*,*,*,\"1,000\",センエン,センエン",
        0..5,
    );
    assert_eq!(m.reading.as_deref(), Some("センエン"));
}

/// 読みが `*` の素性は読みなしとして扱うテスト
#[test]
fn test_asterisk_reading() {
    let m = FeatureLayout::IPADIC.morpheme("ｘ", "名詞,一般,*,*,*,*,*,*,*", 0..3);
    assert_eq!(m.reading, None);
}

#[test]
fn test_parse_options() {
    assert_eq!("fine".parse::<SplitMode>(), Ok(SplitMode::Fine));
    assert_eq!("coarse".parse::<SplitMode>(), Ok(SplitMode::Coarse));
    assert!("middle".parse::<SplitMode>().is_err());
    assert_eq!(SplitMode::default(), SplitMode::Coarse);

    assert_eq!("ipadic".parse::<FeatureLayout>(), Ok(FeatureLayout::IPADIC));
    assert_eq!("unidic".parse::<FeatureLayout>(), Ok(FeatureLayout::UNIDIC));
    assert!("jumandic".parse::<FeatureLayout>().is_err());
}
