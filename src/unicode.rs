//! Character classification for the RegExp grammar, plus the ES2018 Unicode
//! property tables backing `\p{...}` / `\P{...}` validation.

pub fn is_line_terminator(cp: u32) -> bool {
    cp == 0x0a || cp == 0x0d || cp == 0x2028 || cp == 0x2029
}

/// SyntaxCharacter :: one of `^ $ \ . * + ? ( ) [ ] { } |`
pub fn is_syntax_character(cp: u32) -> bool {
    matches!(
        cp,
        0x24 | 0x28 | 0x29 | 0x2a | 0x2b | 0x2e | 0x3f | 0x5b..=0x5e | 0x7b..=0x7d
    )
}

pub fn is_decimal_digit(cp: u32) -> bool {
    (0x30..=0x39).contains(&cp)
}

pub fn is_octal_digit(cp: u32) -> bool {
    (0x30..=0x37).contains(&cp)
}

pub fn is_hex_digit(cp: u32) -> bool {
    is_decimal_digit(cp) || (0x41..=0x46).contains(&cp) || (0x61..=0x66).contains(&cp)
}

/// Numeric value of a hex digit; must only be called on hex digits.
pub fn hex_digit_value(cp: u32) -> u32 {
    match cp {
        0x30..=0x39 => cp - 0x30,
        0x41..=0x46 => cp - 0x41 + 10,
        _ => cp - 0x61 + 10,
    }
}

pub fn is_latin_letter(cp: u32) -> bool {
    (0x41..=0x5a).contains(&cp) || (0x61..=0x7a).contains(&cp)
}

pub fn is_valid_unicode(cp: u64) -> bool {
    cp <= 0x10ffff
}

// Group names use ID_Start/ID_Continue, but `unicode_ident` implements the
// XID variants. XID removes the code points whose identifier status does not
// survive NFKC (UAX #31 NFKC modifications), so those have to be added back.

/// ID_Start − XID_Start.
fn is_other_id_start(cp: u32) -> bool {
    matches!(
        cp,
        0x037a
            | 0x0e33
            | 0x0eb3
            | 0x309b..=0x309c
            | 0xfc5e..=0xfc63
            | 0xfdfa..=0xfdfb
            | 0xfe70
            | 0xfe72
            | 0xfe74
            | 0xfe76
            | 0xfe78
            | 0xfe7a
            | 0xfe7c
            | 0xfe7e
            | 0xff9e..=0xff9f
    )
}

/// ID_Continue − XID_Continue (the start delta minus the code points XID
/// keeps as continue characters).
fn is_other_id_continue(cp: u32) -> bool {
    is_other_id_start(cp) && !matches!(cp, 0x0e33 | 0x0eb3 | 0xff9e..=0xff9f)
}

/// ID_Start, via the same classifier the rest of the engine front end uses.
pub fn is_id_start(cp: u32) -> bool {
    match char::from_u32(cp) {
        Some(ch) => {
            ch.is_ascii_alphabetic()
                || (!ch.is_ascii() && (unicode_ident::is_xid_start(ch) || is_other_id_start(cp)))
        }
        None => false,
    }
}

/// ID_Continue (includes `_` but not `$`).
pub fn is_id_continue(cp: u32) -> bool {
    match char::from_u32(cp) {
        Some(ch) => {
            ch.is_ascii_alphanumeric()
                || ch == '_'
                || (!ch.is_ascii()
                    && (unicode_ident::is_xid_continue(ch) || is_other_id_continue(cp)))
        }
        None => false,
    }
}

// Value sets for \p{...}, per the Unicode 10 snapshot that ES2018 property
// escapes were standardized against. Canonical names and their aliases are
// both listed; lookups are infrequent enough that a linear scan is fine.

const GENERAL_CATEGORY_VALUES: &[&str] = &[
    "C",
    "C&",
    "Cased_Letter",
    "Cc",
    "Cf",
    "Close_Punctuation",
    "Cn",
    "Co",
    "Combining_Mark",
    "Connector_Punctuation",
    "Control",
    "Cs",
    "Currency_Symbol",
    "Dash_Punctuation",
    "Decimal_Number",
    "Enclosing_Mark",
    "Final_Punctuation",
    "Format",
    "Initial_Punctuation",
    "L",
    "LC",
    "Letter",
    "Letter_Number",
    "Line_Separator",
    "Ll",
    "Lm",
    "Lo",
    "Lowercase_Letter",
    "Lt",
    "Lu",
    "M",
    "Mark",
    "Math_Symbol",
    "Mc",
    "Me",
    "Mn",
    "Modifier_Letter",
    "Modifier_Symbol",
    "N",
    "Nd",
    "Nl",
    "No",
    "Nonspacing_Mark",
    "Number",
    "Open_Punctuation",
    "Other",
    "Other_Letter",
    "Other_Number",
    "Other_Punctuation",
    "Other_Symbol",
    "P",
    "Paragraph_Separator",
    "Pc",
    "Pd",
    "Pe",
    "Pf",
    "Pi",
    "Po",
    "Private_Use",
    "Ps",
    "Punctuation",
    "S",
    "Sc",
    "Separator",
    "Sk",
    "Sm",
    "So",
    "Space_Separator",
    "Spacing_Mark",
    "Surrogate",
    "Symbol",
    "Titlecase_Letter",
    "Unassigned",
    "Uppercase_Letter",
    "Z",
    "Zl",
    "Zp",
    "Zs",
    "cntrl",
    "digit",
    "punct",
];

const SCRIPT_VALUES: &[&str] = &[
    "Adlam",
    "Adlm",
    "Aghb",
    "Ahom",
    "Anatolian_Hieroglyphs",
    "Arab",
    "Arabic",
    "Armenian",
    "Armi",
    "Armn",
    "Avestan",
    "Avst",
    "Bali",
    "Balinese",
    "Bamu",
    "Bamum",
    "Bass",
    "Bassa_Vah",
    "Batak",
    "Batk",
    "Beng",
    "Bengali",
    "Bhaiksuki",
    "Bhks",
    "Bopo",
    "Bopomofo",
    "Brah",
    "Brahmi",
    "Brai",
    "Braille",
    "Bugi",
    "Buginese",
    "Buhd",
    "Buhid",
    "Cakm",
    "Canadian_Aboriginal",
    "Cans",
    "Cari",
    "Carian",
    "Caucasian_Albanian",
    "Chakma",
    "Cham",
    "Cher",
    "Cherokee",
    "Common",
    "Copt",
    "Coptic",
    "Cprt",
    "Cuneiform",
    "Cypriot",
    "Cyrillic",
    "Cyrl",
    "Deseret",
    "Deva",
    "Devanagari",
    "Dsrt",
    "Dupl",
    "Duployan",
    "Egyp",
    "Egyptian_Hieroglyphs",
    "Elba",
    "Elbasan",
    "Ethi",
    "Ethiopic",
    "Geor",
    "Georgian",
    "Glag",
    "Glagolitic",
    "Gonm",
    "Goth",
    "Gothic",
    "Gran",
    "Grantha",
    "Greek",
    "Grek",
    "Gujarati",
    "Gujr",
    "Gurmukhi",
    "Guru",
    "Han",
    "Hang",
    "Hangul",
    "Hani",
    "Hano",
    "Hanunoo",
    "Hatr",
    "Hatran",
    "Hebr",
    "Hebrew",
    "Hira",
    "Hiragana",
    "Hluw",
    "Hmng",
    "Hung",
    "Imperial_Aramaic",
    "Inherited",
    "Inscriptional_Pahlavi",
    "Inscriptional_Parthian",
    "Ital",
    "Java",
    "Javanese",
    "Kaithi",
    "Kali",
    "Kana",
    "Kannada",
    "Katakana",
    "Kayah_Li",
    "Khar",
    "Kharoshthi",
    "Khmer",
    "Khmr",
    "Khoj",
    "Khojki",
    "Khudawadi",
    "Knda",
    "Kthi",
    "Lana",
    "Lao",
    "Laoo",
    "Latin",
    "Latn",
    "Lepc",
    "Lepcha",
    "Limb",
    "Limbu",
    "Lina",
    "Linb",
    "Linear_A",
    "Linear_B",
    "Lisu",
    "Lyci",
    "Lycian",
    "Lydi",
    "Lydian",
    "Mahajani",
    "Mahj",
    "Malayalam",
    "Mand",
    "Mandaic",
    "Mani",
    "Manichaean",
    "Marc",
    "Marchen",
    "Masaram_Gondi",
    "Meetei_Mayek",
    "Mend",
    "Mende_Kikakui",
    "Merc",
    "Mero",
    "Meroitic_Cursive",
    "Meroitic_Hieroglyphs",
    "Miao",
    "Mlym",
    "Modi",
    "Mong",
    "Mongolian",
    "Mro",
    "Mroo",
    "Mtei",
    "Mult",
    "Multani",
    "Myanmar",
    "Mymr",
    "Nabataean",
    "Narb",
    "Nbat",
    "New_Tai_Lue",
    "Newa",
    "Nko",
    "Nkoo",
    "Nshu",
    "Nushu",
    "Ogam",
    "Ogham",
    "Ol_Chiki",
    "Olck",
    "Old_Hungarian",
    "Old_Italic",
    "Old_North_Arabian",
    "Old_Permic",
    "Old_Persian",
    "Old_South_Arabian",
    "Old_Turkic",
    "Oriya",
    "Orkh",
    "Orya",
    "Osage",
    "Osge",
    "Osma",
    "Osmanya",
    "Pahawh_Hmong",
    "Palm",
    "Palmyrene",
    "Pau_Cin_Hau",
    "Pauc",
    "Perm",
    "Phag",
    "Phags_Pa",
    "Phli",
    "Phlp",
    "Phnx",
    "Phoenician",
    "Plrd",
    "Prti",
    "Psalter_Pahlavi",
    "Qaac",
    "Qaai",
    "Rejang",
    "Rjng",
    "Runic",
    "Runr",
    "Samaritan",
    "Samr",
    "Sarb",
    "Saur",
    "Saurashtra",
    "Sgnw",
    "Sharada",
    "Shavian",
    "Shaw",
    "Shrd",
    "Sidd",
    "Siddham",
    "SignWriting",
    "Sind",
    "Sinh",
    "Sinhala",
    "Sora",
    "Sora_Sompeng",
    "Soyo",
    "Soyombo",
    "Sund",
    "Sundanese",
    "Sylo",
    "Syloti_Nagri",
    "Syrc",
    "Syriac",
    "Tagalog",
    "Tagb",
    "Tagbanwa",
    "Tai_Le",
    "Tai_Tham",
    "Tai_Viet",
    "Takr",
    "Takri",
    "Tale",
    "Talu",
    "Tamil",
    "Taml",
    "Tang",
    "Tangut",
    "Tavt",
    "Telu",
    "Telugu",
    "Tfng",
    "Tglg",
    "Thaa",
    "Thaana",
    "Thai",
    "Tibetan",
    "Tibt",
    "Tifinagh",
    "Tirh",
    "Tirhuta",
    "Ugar",
    "Ugaritic",
    "Unknown",
    "Vai",
    "Vaii",
    "Wara",
    "Warang_Citi",
    "Xpeo",
    "Xsux",
    "Yi",
    "Yiii",
    "Zanabazar_Square",
    "Zanb",
    "Zinh",
    "Zyyy",
    "Zzzz",
];

const LONE_BINARY_PROPERTIES: &[&str] = &[
    "AHex",
    "ASCII",
    "ASCII_Hex_Digit",
    "Alpha",
    "Alphabetic",
    "Any",
    "Assigned",
    "Bidi_C",
    "Bidi_Control",
    "Bidi_M",
    "Bidi_Mirrored",
    "CI",
    "CWCF",
    "CWCM",
    "CWKCF",
    "CWL",
    "CWT",
    "CWU",
    "Case_Ignorable",
    "Cased",
    "Changes_When_Casefolded",
    "Changes_When_Casemapped",
    "Changes_When_Lowercased",
    "Changes_When_NFKC_Casefolded",
    "Changes_When_Titlecased",
    "Changes_When_Uppercased",
    "DI",
    "Dash",
    "Default_Ignorable_Code_Point",
    "Dep",
    "Deprecated",
    "Dia",
    "Diacritic",
    "Emoji",
    "Emoji_Component",
    "Emoji_Modifier",
    "Emoji_Modifier_Base",
    "Emoji_Presentation",
    "Ext",
    "Extender",
    "Gr_Base",
    "Gr_Ext",
    "Grapheme_Base",
    "Grapheme_Extend",
    "Hex",
    "Hex_Digit",
    "IDC",
    "IDS",
    "IDSB",
    "IDST",
    "IDS_Binary_Operator",
    "IDS_Trinary_Operator",
    "ID_Continue",
    "ID_Start",
    "Ideo",
    "Ideographic",
    "Join_C",
    "Join_Control",
    "LOE",
    "Logical_Order_Exception",
    "Lower",
    "Lowercase",
    "Math",
    "NChar",
    "Noncharacter_Code_Point",
    "Pat_Syn",
    "Pat_WS",
    "Pattern_Syntax",
    "Pattern_White_Space",
    "QMark",
    "Quotation_Mark",
    "RI",
    "Radical",
    "Regional_Indicator",
    "SD",
    "STerm",
    "Sentence_Terminal",
    "Soft_Dotted",
    "Term",
    "Terminal_Punctuation",
    "UIdeo",
    "Unified_Ideograph",
    "Upper",
    "Uppercase",
    "VS",
    "Variation_Selector",
    "White_Space",
    "XIDC",
    "XIDS",
    "XID_Continue",
    "XID_Start",
    "space",
];

/// Checks a `\p{Name=Value}` pair (or `\p{Value}` with the implied
/// General_Category key).
pub fn is_valid_unicode_property(name: &str, value: &str) -> bool {
    match name {
        "General_Category" | "gc" => GENERAL_CATEGORY_VALUES.contains(&value),
        "Script" | "sc" | "Script_Extensions" | "scx" => SCRIPT_VALUES.contains(&value),
        _ => false,
    }
}

/// Checks a lone `\p{Name}` binary property name.
pub fn is_valid_lone_unicode_property(name: &str) -> bool {
    LONE_BINARY_PROPERTIES.contains(&name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn syntax_characters() {
        for ch in "^$\\.*+?()[]{}|".chars() {
            assert!(is_syntax_character(u32::from(ch)), "{ch}");
        }
        assert!(!is_syntax_character(u32::from('a')));
        assert!(!is_syntax_character(u32::from('-')));
    }

    #[test]
    fn hex_digits() {
        assert_eq!(hex_digit_value(u32::from('0')), 0);
        assert_eq!(hex_digit_value(u32::from('a')), 10);
        assert_eq!(hex_digit_value(u32::from('F')), 15);
        assert!(is_hex_digit(u32::from('c')));
        assert!(!is_hex_digit(u32::from('g')));
    }

    #[test]
    fn identifier_classes() {
        assert!(is_id_start(u32::from('a')));
        assert!(is_id_start(u32::from('\u{00e9}')));
        assert!(!is_id_start(u32::from('$')));
        assert!(!is_id_start(u32::from('1')));
        assert!(is_id_continue(u32::from('_')));
        assert!(is_id_continue(u32::from('9')));
        assert!(!is_id_start(0xd83d)); // lone surrogate
    }

    #[test]
    fn identifier_classes_cover_the_id_minus_xid_delta() {
        // Katakana-hiragana voiced sound marks, Thai/Lao SARA AM, and the
        // Arabic presentation forms are ID_Start but not XID_Start.
        for cp in [0x309b, 0x309c, 0x0e33, 0x0eb3, 0xfdfa, 0xfe70, 0xff9e] {
            assert!(is_id_start(cp), "{cp:#x}");
            assert!(is_id_continue(cp), "{cp:#x}");
        }
        assert!(is_id_continue(0x037a));
        // Not identifier characters in either vocabulary.
        assert!(!is_id_start(0x2014));
        assert!(!is_id_continue(0x2014));
    }

    #[test]
    fn property_lookups() {
        assert!(is_valid_unicode_property("General_Category", "Letter"));
        assert!(is_valid_unicode_property("gc", "Lu"));
        assert!(is_valid_unicode_property("Script", "Greek"));
        assert!(is_valid_unicode_property("scx", "Hira"));
        assert!(!is_valid_unicode_property("Script", "Letter"));
        assert!(!is_valid_unicode_property("Bogus", "Greek"));
        assert!(is_valid_lone_unicode_property("Alphabetic"));
        assert!(is_valid_lone_unicode_property("AHex"));
        assert!(!is_valid_lone_unicode_property("Greek"));
    }
}
