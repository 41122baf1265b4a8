// src/lang.rs
//! Language normalization and text-based detection.
//!
//! Every language comparison in the crate goes through [`normalize`], so the
//! resolver's free-text answer ("Português"), platform metadata ("pt-BR") and
//! whatlang's ISO 639-3 output ("por") all land in the same ISO 639-1 space
//! before being compared.

/// Sentinel for "we could not work out the language". Never matches anything.
pub const UNKNOWN: &str = "unknown";

struct LangEntry {
    iso1: &'static str,
    iso3: &'static str,
    english: &'static str,
    native: &'static [&'static str],
}

// Keyed by the codes and names we expect to see in model replies and in
// YouTube metadata. Name matching is lowercase-exact.
//
// The iso3 column must hold the exact code whatlang emits for languages it
// covers (`whatlang::Lang::*.code()`), or `detect` can never match that row.
// Rows for languages outside whatlang's set (kaz, swh, yor, hau, ibo, som,
// zsm, nno, hat) only serve code/name normalization.
const LANGS: &[LangEntry] = &[
    LangEntry { iso1: "en", iso3: "eng", english: "english", native: &[] },
    LangEntry { iso1: "es", iso3: "spa", english: "spanish", native: &["español", "espanol", "castellano"] },
    LangEntry { iso1: "pt", iso3: "por", english: "portuguese", native: &["português", "portugues"] },
    LangEntry { iso1: "fr", iso3: "fra", english: "french", native: &["français", "francais"] },
    LangEntry { iso1: "de", iso3: "deu", english: "german", native: &["deutsch"] },
    LangEntry { iso1: "it", iso3: "ita", english: "italian", native: &["italiano"] },
    LangEntry { iso1: "nl", iso3: "nld", english: "dutch", native: &["nederlands"] },
    LangEntry { iso1: "sv", iso3: "swe", english: "swedish", native: &["svenska"] },
    LangEntry { iso1: "da", iso3: "dan", english: "danish", native: &["dansk"] },
    LangEntry { iso1: "fi", iso3: "fin", english: "finnish", native: &["suomi"] },
    LangEntry { iso1: "no", iso3: "nob", english: "norwegian", native: &["norsk", "bokmål", "bokmal"] },
    LangEntry { iso1: "no", iso3: "nno", english: "nynorsk", native: &[] },
    LangEntry { iso1: "ru", iso3: "rus", english: "russian", native: &["русский"] },
    LangEntry { iso1: "uk", iso3: "ukr", english: "ukrainian", native: &["українська"] },
    LangEntry { iso1: "be", iso3: "bel", english: "belarusian", native: &["беларуская"] },
    LangEntry { iso1: "pl", iso3: "pol", english: "polish", native: &["polski"] },
    LangEntry { iso1: "cs", iso3: "ces", english: "czech", native: &["čeština", "cestina"] },
    LangEntry { iso1: "sk", iso3: "slk", english: "slovak", native: &["slovenčina", "slovencina"] },
    LangEntry { iso1: "sl", iso3: "slv", english: "slovenian", native: &["slovenščina"] },
    LangEntry { iso1: "hr", iso3: "hrv", english: "croatian", native: &["hrvatski"] },
    LangEntry { iso1: "sr", iso3: "srp", english: "serbian", native: &["српски", "srpski"] },
    LangEntry { iso1: "bg", iso3: "bul", english: "bulgarian", native: &["български"] },
    LangEntry { iso1: "mk", iso3: "mkd", english: "macedonian", native: &["македонски"] },
    LangEntry { iso1: "ro", iso3: "ron", english: "romanian", native: &["română", "romana"] },
    LangEntry { iso1: "hu", iso3: "hun", english: "hungarian", native: &["magyar"] },
    LangEntry { iso1: "el", iso3: "ell", english: "greek", native: &["ελληνικά"] },
    LangEntry { iso1: "tr", iso3: "tur", english: "turkish", native: &["türkçe", "turkce"] },
    LangEntry { iso1: "az", iso3: "aze", english: "azerbaijani", native: &["azərbaycan"] },
    LangEntry { iso1: "kk", iso3: "kaz", english: "kazakh", native: &["қазақша"] },
    LangEntry { iso1: "uz", iso3: "uzb", english: "uzbek", native: &["oʻzbek", "ozbek"] },
    LangEntry { iso1: "et", iso3: "est", english: "estonian", native: &["eesti"] },
    LangEntry { iso1: "lv", iso3: "lav", english: "latvian", native: &["latviešu"] },
    LangEntry { iso1: "lt", iso3: "lit", english: "lithuanian", native: &["lietuvių"] },
    LangEntry { iso1: "ka", iso3: "kat", english: "georgian", native: &["ქართული"] },
    LangEntry { iso1: "hy", iso3: "hye", english: "armenian", native: &["հայերեն"] },
    LangEntry { iso1: "ar", iso3: "arb", english: "arabic", native: &["العربية", "عربي"] },
    LangEntry { iso1: "he", iso3: "heb", english: "hebrew", native: &["עברית"] },
    LangEntry { iso1: "fa", iso3: "pes", english: "persian", native: &["farsi", "فارسی"] },
    LangEntry { iso1: "ur", iso3: "urd", english: "urdu", native: &["اردو"] },
    LangEntry { iso1: "hi", iso3: "hin", english: "hindi", native: &["हिन्दी", "हिंदी"] },
    LangEntry { iso1: "bn", iso3: "ben", english: "bengali", native: &["বাংলা", "bangla"] },
    LangEntry { iso1: "pa", iso3: "pan", english: "punjabi", native: &["ਪੰਜਾਬੀ"] },
    LangEntry { iso1: "gu", iso3: "guj", english: "gujarati", native: &["ગુજરાતી"] },
    LangEntry { iso1: "mr", iso3: "mar", english: "marathi", native: &["मराठी"] },
    LangEntry { iso1: "ne", iso3: "nep", english: "nepali", native: &["नेपाली"] },
    LangEntry { iso1: "ta", iso3: "tam", english: "tamil", native: &["தமிழ்"] },
    LangEntry { iso1: "te", iso3: "tel", english: "telugu", native: &["తెలుగు"] },
    LangEntry { iso1: "kn", iso3: "kan", english: "kannada", native: &["ಕನ್ನಡ"] },
    LangEntry { iso1: "ml", iso3: "mal", english: "malayalam", native: &["മലയാളം"] },
    LangEntry { iso1: "si", iso3: "sin", english: "sinhala", native: &["සිංහල", "sinhalese"] },
    LangEntry { iso1: "th", iso3: "tha", english: "thai", native: &["ไทย"] },
    LangEntry { iso1: "km", iso3: "khm", english: "khmer", native: &["ខ្មែរ"] },
    LangEntry { iso1: "my", iso3: "mya", english: "burmese", native: &["မြန်မာ"] },
    LangEntry { iso1: "vi", iso3: "vie", english: "vietnamese", native: &["tiếng việt"] },
    LangEntry { iso1: "id", iso3: "ind", english: "indonesian", native: &["bahasa indonesia"] },
    LangEntry { iso1: "ms", iso3: "zsm", english: "malay", native: &["bahasa melayu", "melayu"] },
    LangEntry { iso1: "tl", iso3: "tgl", english: "tagalog", native: &["filipino"] },
    LangEntry { iso1: "jv", iso3: "jav", english: "javanese", native: &["basa jawa"] },
    LangEntry { iso1: "ja", iso3: "jpn", english: "japanese", native: &["日本語"] },
    LangEntry { iso1: "ko", iso3: "kor", english: "korean", native: &["한국어"] },
    LangEntry { iso1: "zh", iso3: "cmn", english: "chinese", native: &["中文", "mandarin", "普通话"] },
    LangEntry { iso1: "sw", iso3: "swh", english: "swahili", native: &["kiswahili"] },
    LangEntry { iso1: "am", iso3: "amh", english: "amharic", native: &["አማርኛ"] },
    LangEntry { iso1: "so", iso3: "som", english: "somali", native: &["soomaali"] },
    LangEntry { iso1: "ha", iso3: "hau", english: "hausa", native: &[] },
    LangEntry { iso1: "yo", iso3: "yor", english: "yoruba", native: &["yorùbá"] },
    LangEntry { iso1: "ig", iso3: "ibo", english: "igbo", native: &[] },
    LangEntry { iso1: "zu", iso3: "zul", english: "zulu", native: &["isizulu"] },
    LangEntry { iso1: "sn", iso3: "sna", english: "shona", native: &[] },
    LangEntry { iso1: "af", iso3: "afr", english: "afrikaans", native: &[] },
    LangEntry { iso1: "ht", iso3: "hat", english: "haitian creole", native: &["kreyòl"] },
];

/// Normalize a language code or name to ISO 639-1.
///
/// Accepts ISO 639-1 ("pt"), BCP 47 tags with a region subtag ("pt-BR"),
/// ISO 639-3 ("por"), English names ("Portuguese") and common native names
/// ("Português"). Returns `None` for anything unrecognized, including the
/// [`UNKNOWN`] sentinel, so unresolved languages can never spuriously match.
pub fn normalize(raw: &str) -> Option<&'static str> {
    let tag = raw.trim().to_lowercase();
    if tag.is_empty() || tag == UNKNOWN {
        return None;
    }
    // "pt-BR" / "pt_BR" -> "pt"
    let primary = tag.split(['-', '_']).next().unwrap_or(tag.as_str());
    for e in LANGS {
        if primary == e.iso1 || primary == e.iso3 {
            return Some(e.iso1);
        }
    }
    normalize_name(&tag)
}

/// Like [`normalize`], but matches language *names* only (English or native),
/// never bare codes. Used when scanning free-text model replies, where a
/// two-letter word like "it" or "is" must not be mistaken for a code.
pub fn normalize_name(raw: &str) -> Option<&'static str> {
    let name = raw.trim().to_lowercase();
    if name.is_empty() {
        return None;
    }
    for e in LANGS {
        if name == e.english || e.native.contains(&name.as_str()) {
            return Some(e.iso1);
        }
    }
    None
}

/// Detect the language of `text` and return its ISO 639-1 code.
///
/// Detection over short or mixed-language text is inherently imprecise; the
/// caller treats a miss as "does not match", not as an error.
pub fn detect(text: &str) -> Option<&'static str> {
    let info = whatlang::detect(text)?;
    let code = info.lang().code();
    LANGS.iter().find(|e| e.iso3 == code).map(|e| e.iso1)
}

/// Case- and codespace-insensitive language equality.
pub fn matches(a: &str, b: &str) -> bool {
    match (normalize(a), normalize(b)) {
        (Some(x), Some(y)) => x == y,
        _ => false,
    }
}
