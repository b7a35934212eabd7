//! 仮名の判定と変換
//!
//! 形態素解析器が返す読み(カタカナ)を、ルビとして出力するひらがなに変換します。
//! 変換は文字単位の置換で、長音符 `ー` や中黒 `・` などの記号はそのまま残します。

/// ひらがなブロックの範囲 (U+3040..=U+309F)
const HIRAGANA_BLOCK: std::ops::RangeInclusive<char> = '\u{3040}'..='\u{309F}';

/// 全角カタカナとひらがなのコードポイント差
const KATA_HIRA_OFFSET: u32 = 0x60;

/// 結合用濁点 (U+3099)
const COMBINING_VOICED_MARK: char = '\u{3099}';

/// 半角カタカナ `ｦ` (U+FF66) から `ﾝ` (U+FF9D) までに対応するひらがな
const HALFWIDTH_TO_HIRAGANA: &str =
    "をぁぃぅぇぉゃゅょっーあいうえおかきくけこさしすせそたちつてとなにぬねのはひふへほまみむめもやゆよらりるれろわん";

/// 半角濁点 `ﾞ`
const HALFWIDTH_VOICED_MARK: char = '\u{FF9E}';

/// 半角半濁点 `ﾟ`
const HALFWIDTH_SEMI_VOICED_MARK: char = '\u{FF9F}';

/// 文字がひらがなブロックに属するかどうかを返します。
#[inline]
pub fn is_hiragana(c: char) -> bool {
    HIRAGANA_BLOCK.contains(&c)
}

/// 文字列のすべての文字がひらがなブロックに属するかどうかを返します。
///
/// 空文字列に対しては `true` を返します。
pub fn is_all_hiragana(text: &str) -> bool {
    text.chars().all(is_hiragana)
}

/// ルビとして使える読みかどうか(ひらがなと長音符のみで構成されているか)を返します。
pub fn is_kana_reading(text: &str) -> bool {
    !text.is_empty() && text.chars().all(|c| is_hiragana(c) || c == 'ー')
}

/// カタカナをひらがなに変換します。
///
/// - 全角カタカナ `ァ`〜`ヶ` と踊り字 `ヽヾ` は対応するひらがなへ
/// - `ヷヸヹヺ` は対応するひらがなに結合用濁点を付けた形へ
/// - 半角カタカナは全角ひらがなへ(後続の `ﾞ` `ﾟ` は可能なら合成)
/// - それ以外の文字は変換しません
///
/// # 例
///
/// ```
/// use rubi::kana::kata2hira;
///
/// assert_eq!(kata2hira("トウキョウタワー"), "とうきょうたわー");
/// assert_eq!(kata2hira("ｶﾞｯｺｳ"), "がっこう");
/// ```
pub fn kata2hira(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '\u{30A1}'..='\u{30F6}' | 'ヽ' | 'ヾ' => out.push(shift_down(c)),
            'ヷ' => push_voiced(&mut out, 'わ'),
            'ヸ' => push_voiced(&mut out, 'ゐ'),
            'ヹ' => push_voiced(&mut out, 'ゑ'),
            'ヺ' => push_voiced(&mut out, 'を'),
            '\u{FF66}'..='\u{FF9D}' => {
                let base = halfwidth_base(c);
                let composed = match chars.peek() {
                    Some(&HALFWIDTH_VOICED_MARK) => voiced(base),
                    Some(&HALFWIDTH_SEMI_VOICED_MARK) => semi_voiced(base),
                    _ => None,
                };
                match composed {
                    Some(composed) => {
                        chars.next();
                        out.push(composed);
                    }
                    None => out.push(base),
                }
            }
            HALFWIDTH_VOICED_MARK => out.push('゛'),
            HALFWIDTH_SEMI_VOICED_MARK => out.push('゜'),
            _ => out.push(c),
        }
    }

    out
}

#[inline]
fn shift_down(c: char) -> char {
    // The full-width katakana and hiragana blocks share the same layout.
    char::from_u32(c as u32 - KATA_HIRA_OFFSET).unwrap_or(c)
}

#[inline]
fn push_voiced(out: &mut String, base: char) {
    out.push(base);
    out.push(COMBINING_VOICED_MARK);
}

fn halfwidth_base(c: char) -> char {
    let idx = (c as u32 - 0xFF66) as usize;
    HALFWIDTH_TO_HIRAGANA.chars().nth(idx).unwrap_or(c)
}

fn voiced(base: char) -> Option<char> {
    if base == 'う' {
        return Some('ゔ');
    }
    if "かきくけこさしすせそたちつてとはひふへほ".contains(base) {
        return char::from_u32(base as u32 + 1);
    }
    None
}

fn semi_voiced(base: char) -> Option<char> {
    if "はひふへほ".contains(base) {
        return char::from_u32(base as u32 + 2);
    }
    None
}
