use itertools::Itertools;
use once_cell::sync::Lazy;
use regex::Regex;
use unicode_normalization::{UnicodeNormalization, char::is_combining_mark};

static THI_XA: Lazy<Regex> = Lazy::new(|| Regex::new(r"^Thị Xã").expect("Invalid Thị xã pattern"));
static THI_TRAN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^Thị Trấn").expect("Invalid Thị trấn pattern"));

/// Canonical display form of a division name.
///
/// NFC, trimmed, inner whitespace collapsed, and the two capitalisation variants
/// "Thị Xã" / "Thị Trấn" at the start rewritten to the official spelling.
pub fn clean_name(raw: &str) -> String {
    let composed: String = raw.nfc().collect();
    let collapsed = composed.split_whitespace().join(" ");
    let fixed = THI_XA.replace(&collapsed, "Thị xã");
    THI_TRAN.replace(&fixed, "Thị trấn").into_owned()
}

/// Remove every diacritical mark. `đ`/`Đ` have no decomposition and are mapped by hand.
pub fn strip_diacritics(text: &str) -> String {
    text.nfd()
        .filter(|c| !is_combining_mark(*c))
        .map(|c| match c {
            'đ' => 'd',
            'Đ' => 'D',
            other => other,
        })
        .nfc()
        .collect()
}

/// Machine-safe slug: `"Thành phố Hồ Chí Minh"` becomes `thanh_pho_ho_chi_minh`.
pub fn convert_to_codename(name: &str) -> String {
    strip_diacritics(name)
        .to_lowercase()
        .replace(['-', '.'], " ")
        .replace('\'', "")
        .split_whitespace()
        .join("_")
}
