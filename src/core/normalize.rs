//! Character normalization to a single comparison form.
//!
//! Three layers, applied in order:
//! 1. Unicode compatibility (NFKC) normalization, iterated to a fixed point
//! 2. a manual fold of CJK Radicals Supplement code points whose visual
//!    form is identical to a base CJK character
//! 3. an optional caller-supplied grapheme-variant fold
//!
//! Non-single-character input passes through unchanged at every step.

use std::collections::{BTreeMap, HashSet};

use unicode_normalization::UnicodeNormalization;

/// CJK Radicals Supplement (U+2E80-2EFF) mappings.
///
/// Only positional variants whose visual form is essentially identical to
/// the base character are folded. NFKC does not touch this block.
///
/// Deliberately not folded - visually different:
/// - U+2E84 ⺄ SECOND - different shape from 乙
/// - U+2E86 ⺆ BOX - different from 匚
/// - U+2E8C ⺌ SMALL ONE - missing strokes vs 小
/// - U+2E8D ⺍ SMALL TWO - missing strokes vs 小
const RADICAL_SUPPLEMENT_FOLD: &[(char, char)] = &[
    // Heart variants -> 忄
    ('\u{2E96}', '忄'), // ⺖ HEART ONE
    ('\u{2E97}', '忄'), // ⺗ HEART TWO
    // Dog -> 犭
    ('\u{2EA8}', '犭'), // ⺨ DOG
    // Sheep/Ram/Ewe -> 羊
    ('\u{2EB6}', '羊'), // ⺶ SHEEP
    ('\u{2EB7}', '羊'), // ⺷ RAM
    ('\u{2EB8}', '羊'), // ⺸ EWE
    // Walk variants -> 辶
    ('\u{2ECC}', '辶'), // ⻌ SIMPLIFIED WALK
    ('\u{2ECD}', '辶'), // ⻍ WALK ONE
    ('\u{2ECE}', '辶'), // ⻎ WALK TWO
    // Ear radical (city/mound) -> 阝
    ('\u{2ECF}', '阝'), // ⻏ CITY
    ('\u{2ED6}', '阝'), // ⻖ MOUND TWO
    // Eat variants -> 食
    ('\u{2EDE}', '食'), // ⻞ EAT TWO
    ('\u{2EDF}', '食'), // ⻟ EAT THREE
    ('\u{2EE0}', '食'), // ⻠ C-SIMPLIFIED EAT
];

/// NFKC, applied repeatedly until stable or a previously-seen form recurs.
///
/// The seen-set cap guarantees termination even if platform normalization
/// oscillates between forms.
fn compatibility(input: &str) -> String {
    if input.chars().count() != 1 {
        return input.to_string();
    }

    let mut seen: HashSet<String> = HashSet::new();
    seen.insert(input.to_string());
    let mut result = input.to_string();

    loop {
        let normalized: String = result.nfkc().collect();
        if normalized == result || seen.contains(&normalized) {
            return result;
        }
        seen.insert(normalized.clone());
        result = normalized;
    }
}

fn fold_radical_supplement(input: String) -> String {
    let mut chars = input.chars();
    if let (Some(c), None) = (chars.next(), chars.next()) {
        if let Some(&(_, base)) = RADICAL_SUPPLEMENT_FOLD.iter().find(|&&(from, _)| from == c) {
            return base.to_string();
        }
    }
    input
}

/// Canonicalizes characters for comparison.
///
/// Idempotent and total over single characters; multi-character strings
/// pass through unchanged.
#[derive(Clone, Debug, Default)]
pub struct Normalizer {
    variant_fold: BTreeMap<String, String>,
}

impl Normalizer {
    /// Compatibility normalization plus the radical-supplement fold only.
    pub fn plain() -> Self {
        Self::default()
    }

    /// Additionally folds known grapheme variant symbols to their canonical
    /// symbol. The map is dictionary-sourced and distinct from the static
    /// radical-supplement table.
    pub fn with_variant_fold(variant_fold: BTreeMap<String, String>) -> Self {
        Self { variant_fold }
    }

    pub fn normalize(&self, input: &str) -> String {
        let result = fold_radical_supplement(compatibility(input));
        match self.variant_fold.get(&result) {
            Some(canonical) => canonical.clone(),
            None => result,
        }
    }
}
