use super::LanguageEntry;

const fn entry(name: &'static str, code: &'static str) -> LanguageEntry {
    LanguageEntry { name, code }
}

/// Languages accepted by the Google translation endpoint, keyed by lowercase
/// English name. Order is alphabetical and drives the listing pages.
pub static SUPPORTED_LANGUAGES: &[LanguageEntry] = &[
    entry("afrikaans", "af"),
    entry("albanian", "sq"),
    entry("amharic", "am"),
    entry("arabic", "ar"),
    entry("armenian", "hy"),
    entry("assamese", "as"),
    entry("aymara", "ay"),
    entry("azerbaijani", "az"),
    entry("bambara", "bm"),
    entry("basque", "eu"),
    entry("belarusian", "be"),
    entry("bengali", "bn"),
    entry("bhojpuri", "bho"),
    entry("bosnian", "bs"),
    entry("bulgarian", "bg"),
    entry("catalan", "ca"),
    entry("cebuano", "ceb"),
    entry("chichewa", "ny"),
    entry("chinese (simplified)", "zh-CN"),
    entry("chinese (traditional)", "zh-TW"),
    entry("corsican", "co"),
    entry("croatian", "hr"),
    entry("czech", "cs"),
    entry("danish", "da"),
    entry("dhivehi", "dv"),
    entry("dogri", "doi"),
    entry("dutch", "nl"),
    entry("english", "en"),
    entry("esperanto", "eo"),
    entry("estonian", "et"),
    entry("ewe", "ee"),
    entry("filipino", "tl"),
    entry("finnish", "fi"),
    entry("french", "fr"),
    entry("frisian", "fy"),
    entry("galician", "gl"),
    entry("georgian", "ka"),
    entry("german", "de"),
    entry("greek", "el"),
    entry("guarani", "gn"),
    entry("gujarati", "gu"),
    entry("haitian creole", "ht"),
    entry("hausa", "ha"),
    entry("hawaiian", "haw"),
    entry("hebrew", "iw"),
    entry("hindi", "hi"),
    entry("hmong", "hmn"),
    entry("hungarian", "hu"),
    entry("icelandic", "is"),
    entry("igbo", "ig"),
    entry("ilocano", "ilo"),
    entry("indonesian", "id"),
    entry("irish", "ga"),
    entry("italian", "it"),
    entry("japanese", "ja"),
    entry("javanese", "jw"),
    entry("kannada", "kn"),
    entry("kazakh", "kk"),
    entry("khmer", "km"),
    entry("kinyarwanda", "rw"),
    entry("konkani", "gom"),
    entry("korean", "ko"),
    entry("krio", "kri"),
    entry("kurdish (kurmanji)", "ku"),
    entry("kurdish (sorani)", "ckb"),
    entry("kyrgyz", "ky"),
    entry("lao", "lo"),
    entry("latin", "la"),
    entry("latvian", "lv"),
    entry("lingala", "ln"),
    entry("lithuanian", "lt"),
    entry("luganda", "lg"),
    entry("luxembourgish", "lb"),
    entry("macedonian", "mk"),
    entry("maithili", "mai"),
    entry("malagasy", "mg"),
    entry("malay", "ms"),
    entry("malayalam", "ml"),
    entry("maltese", "mt"),
    entry("maori", "mi"),
    entry("marathi", "mr"),
    entry("meiteilon (manipuri)", "mni-Mtei"),
    entry("mizo", "lus"),
    entry("mongolian", "mn"),
    entry("myanmar", "my"),
    entry("nepali", "ne"),
    entry("norwegian", "no"),
    entry("odia (oriya)", "or"),
    entry("oromo", "om"),
    entry("pashto", "ps"),
    entry("persian", "fa"),
    entry("polish", "pl"),
    entry("portuguese", "pt"),
    entry("punjabi", "pa"),
    entry("quechua", "qu"),
    entry("romanian", "ro"),
    entry("russian", "ru"),
    entry("samoan", "sm"),
    entry("sanskrit", "sa"),
    entry("scots gaelic", "gd"),
    entry("sepedi", "nso"),
    entry("serbian", "sr"),
    entry("sesotho", "st"),
    entry("shona", "sn"),
    entry("sindhi", "sd"),
    entry("sinhala", "si"),
    entry("slovak", "sk"),
    entry("slovenian", "sl"),
    entry("somali", "so"),
    entry("spanish", "es"),
    entry("sundanese", "su"),
    entry("swahili", "sw"),
    entry("swedish", "sv"),
    entry("tajik", "tg"),
    entry("tamil", "ta"),
    entry("tatar", "tt"),
    entry("telugu", "te"),
    entry("thai", "th"),
    entry("tigrinya", "ti"),
    entry("tsonga", "ts"),
    entry("turkish", "tr"),
    entry("turkmen", "tk"),
    entry("twi", "ak"),
    entry("ukrainian", "uk"),
    entry("urdu", "ur"),
    entry("uyghur", "ug"),
    entry("uzbek", "uz"),
    entry("vietnamese", "vi"),
    entry("welsh", "cy"),
    entry("xhosa", "xh"),
    entry("yiddish", "yi"),
    entry("yoruba", "yo"),
    entry("zulu", "zu"),
];
