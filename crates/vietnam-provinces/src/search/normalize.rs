//! Name canonicalisation for comparison.
//!
//! Normalized text is lower case, free of diacritics (`đ` becomes `d`), has a single leading
//! administrative-type prefix removed and whitespace collapsed. Prefix detection works on the
//! diacritic form, so once a name is normalized no prefix can match again and
//! `normalize(normalize(x)) == normalize(x)`.
use ahash::AHashSet as HashSet;
use itertools::Itertools;
use once_cell::sync::Lazy;
use regex::Regex;
use unicode_normalization::UnicodeNormalization;
use vietnam_provinces_data::{DivisionKind, strip_diacritics};

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).expect("Invalid division prefix pattern")
}

static PROVINCE_PREFIX: Lazy<Regex> = Lazy::new(|| compile(r"^(?:tỉnh|thành phố)\s+"));
static DISTRICT_PREFIX: Lazy<Regex> =
    Lazy::new(|| compile(r"^(?:quận|huyện|thị xã|thành phố)\s+"));
static WARD_PREFIX: Lazy<Regex> = Lazy::new(|| compile(r"^(?:xã|phường|thị trấn|đặc khu)\s+"));

static PROVINCE_PREFIX_CI: Lazy<Regex> = Lazy::new(|| compile(r"(?i)^(?:tỉnh|thành phố)\s+"));
static DISTRICT_PREFIX_CI: Lazy<Regex> =
    Lazy::new(|| compile(r"(?i)^(?:quận|huyện|thị xã|thành phố)\s+"));
static WARD_PREFIX_CI: Lazy<Regex> =
    Lazy::new(|| compile(r"(?i)^(?:xã|phường|thị trấn|đặc khu)\s+"));

static PROVINCE_PREFIX_ASCII: Lazy<Regex> = Lazy::new(|| compile(r"^(?:tinh|thanh pho)\s+"));
static DISTRICT_PREFIX_ASCII: Lazy<Regex> =
    Lazy::new(|| compile(r"^(?:quan|huyen|thi xa|thanh pho)\s+"));
static WARD_PREFIX_ASCII: Lazy<Regex> =
    Lazy::new(|| compile(r"^(?:xa|phuong|thi tran|dac khu)\s+"));

const PROVINCE_TYPE_WORDS: &[&str] = &["tinh", "thanh", "pho"];
const DISTRICT_TYPE_WORDS: &[&str] = &["quan", "huyen", "thi", "xa", "thanh", "pho"];
const WARD_TYPE_WORDS: &[&str] = &["xa", "phuong", "thi", "tran", "dac", "khu"];

/// Lower-case prefix pattern with diacritics.
pub(crate) fn prefix(kind: DivisionKind) -> &'static Regex {
    match kind {
        DivisionKind::Province => &PROVINCE_PREFIX,
        DivisionKind::District => &DISTRICT_PREFIX,
        DivisionKind::Ward => &WARD_PREFIX,
    }
}

/// Same prefixes, any case, for display names.
pub(crate) fn prefix_any_case(kind: DivisionKind) -> &'static Regex {
    match kind {
        DivisionKind::Province => &PROVINCE_PREFIX_CI,
        DivisionKind::District => &DISTRICT_PREFIX_CI,
        DivisionKind::Ward => &WARD_PREFIX_CI,
    }
}

/// Prefixes as they look after normalization.
pub(crate) fn prefix_ascii(kind: DivisionKind) -> &'static Regex {
    match kind {
        DivisionKind::Province => &PROVINCE_PREFIX_ASCII,
        DivisionKind::District => &DISTRICT_PREFIX_ASCII,
        DivisionKind::Ward => &WARD_PREFIX_ASCII,
    }
}

fn type_words(kind: DivisionKind) -> &'static [&'static str] {
    match kind {
        DivisionKind::Province => PROVINCE_TYPE_WORDS,
        DivisionKind::District => DISTRICT_TYPE_WORDS,
        DivisionKind::Ward => WARD_TYPE_WORDS,
    }
}

/// Ward-level normalization.
pub fn normalize(raw: &str) -> String {
    normalize_for(DivisionKind::Ward, raw)
}

/// Province-level normalization, with the shorter "tỉnh"/"thành phố" prefix set.
pub fn normalize_province(raw: &str) -> String {
    normalize_for(DivisionKind::Province, raw)
}

pub fn normalize_for(kind: DivisionKind, raw: &str) -> String {
    let lowered = raw.nfc().collect::<String>().to_lowercase();
    let unprefixed = prefix(kind).replace(lowered.trim_start(), "");
    strip_diacritics(&unprefixed).split_whitespace().join(" ")
}

/// Whole words of normalized text. Hyphens separate words too.
pub fn words(normalized: &str) -> impl Iterator<Item = &str> {
    normalized
        .split(|c: char| c.is_whitespace() || c == '-')
        .filter(|w| !w.is_empty())
}

/// A tokenised query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedQuery {
    /// Normalized text with at most one full type prefix removed. Scoring and the substring
    /// check use this, so "thanh hoa" stays "thanh hoa".
    pub text: String,
    /// Words of `text` after its leading run of type words; used only for the whole-word
    /// filter. Falls back to every word of `text` when nothing else is left.
    pub words: Vec<String>,
}

impl NormalizedQuery {
    /// `None` when the query is empty or nothing but a type prefix.
    pub fn parse(kind: DivisionKind, raw: &str) -> Option<Self> {
        let normalized = normalize_for(kind, raw);
        let text = prefix_ascii(kind).replace(&normalized, "").into_owned();
        if text.is_empty() {
            return None;
        }

        let skip = type_words(kind);
        let mut kept: Vec<String> = words(&text)
            .skip_while(|word| skip.contains(word))
            .map(str::to_string)
            .collect();
        if kept.is_empty() {
            kept = words(&text).map(str::to_string).collect();
        }
        if kept.is_empty() {
            return None;
        }
        Some(Self { text, words: kept })
    }

    /// Every query word appears as a whole word of the candidate.
    pub fn matches_words(&self, candidate_words: &HashSet<&str>) -> bool {
        self.words
            .iter()
            .all(|word| candidate_words.contains(word.as_str()))
    }
}
