//! Ranges backing the named classes.
//!
//! Perl (`\d`, `\s`, `\w`) and POSIX (`[:alpha:]`, …) classes are ASCII-only
//! and live here as sorted, inclusive range tables. Unicode general
//! categories, scripts and binary properties (`\pL`, `\p{Greek}`) are
//! resolved through `regex-syntax`'s Unicode tables.

use regex_syntax::hir::{Class, ClassUnicode, ClassUnicodeRange, HirKind};

pub(crate) type Table = &'static [(char, char)];

const DIGIT: Table = &[('0', '9')];
const SPACE_PERL: Table = &[('\t', '\n'), ('\x0C', '\r'), (' ', ' ')];
const WORD: Table = &[('0', '9'), ('A', 'Z'), ('_', '_'), ('a', 'z')];

const ALNUM: Table = &[('0', '9'), ('A', 'Z'), ('a', 'z')];
const ALPHA: Table = &[('A', 'Z'), ('a', 'z')];
const ASCII: Table = &[('\x00', '\x7F')];
const BLANK: Table = &[('\t', '\t'), (' ', ' ')];
const CNTRL: Table = &[('\x00', '\x1F'), ('\x7F', '\x7F')];
const GRAPH: Table = &[('!', '~')];
const LOWER: Table = &[('a', 'z')];
const PRINT: Table = &[(' ', '~')];
pub(crate) const PUNCT: Table = &[('!', '/'), (':', '@'), ('[', '`'), ('{', '~')];
const SPACE: Table = &[('\t', '\r'), (' ', ' ')];
const UPPER: Table = &[('A', 'Z')];
const XDIGIT: Table = &[('0', '9'), ('A', 'F'), ('a', 'f')];

/// Perl class for the lower-case escape letter, e.g. `d` for `\d`.
pub(crate) fn perl(letter: char) -> Option<Table> {
    match letter {
        'd' => Some(DIGIT),
        's' => Some(SPACE_PERL),
        'w' => Some(WORD),
        _ => None,
    }
}

/// POSIX class by name, e.g. `alpha` for `[:alpha:]`.
pub(crate) fn posix(name: &str) -> Option<Table> {
    let table = match name {
        "alnum" => ALNUM,
        "alpha" => ALPHA,
        "ascii" => ASCII,
        "blank" => BLANK,
        "cntrl" => CNTRL,
        "digit" => DIGIT,
        "graph" => GRAPH,
        "lower" => LOWER,
        "print" => PRINT,
        "punct" => PUNCT,
        "space" => SPACE,
        "upper" => UPPER,
        "word" => WORD,
        "xdigit" => XDIGIT,
        _ => return None,
    };
    Some(table)
}

/// Two-letter general categories. Unassigned code points (`Cn`) have none.
const CATEGORIES: &[&str] = &[
    "Cc", "Cf", "Co", "Cs", "Ll", "Lm", "Lo", "Lt", "Lu", "Mc", "Me", "Mn", "Nd", "Nl", "No",
    "Pc", "Pd", "Pe", "Pf", "Pi", "Po", "Ps", "Sc", "Sk", "Sm", "So", "Zl", "Zp", "Zs",
];

const PROPERTIES: &[&str] = &[
    "ASCII_Hex_Digit",
    "Bidi_Control",
    "Dash",
    "Deprecated",
    "Diacritic",
    "Extender",
    "Hex_Digit",
    "Hyphen",
    "IDS_Binary_Operator",
    "IDS_Trinary_Operator",
    "Ideographic",
    "Join_Control",
    "Logical_Order_Exception",
    "Noncharacter_Code_Point",
    "Other_Alphabetic",
    "Other_Default_Ignorable_Code_Point",
    "Other_Grapheme_Extend",
    "Other_ID_Continue",
    "Other_ID_Start",
    "Other_Lowercase",
    "Other_Math",
    "Other_Uppercase",
    "Pattern_Syntax",
    "Pattern_White_Space",
    "Prepended_Concatenation_Mark",
    "Quotation_Mark",
    "Radical",
    "Regional_Indicator",
    "Sentence_Terminal",
    "Soft_Dotted",
    "Terminal_Punctuation",
    "Unified_Ideograph",
    "Variation_Selector",
    "White_Space",
];

const SCRIPTS: &[&str] = &[
    "Adlam", "Ahom", "Anatolian_Hieroglyphs", "Arabic", "Armenian", "Avestan", "Balinese",
    "Bamum", "Bassa_Vah", "Batak", "Bengali", "Bhaiksuki", "Bopomofo", "Brahmi", "Braille",
    "Buginese", "Buhid", "Canadian_Aboriginal", "Carian", "Caucasian_Albanian", "Chakma", "Cham",
    "Cherokee", "Chorasmian", "Common", "Coptic", "Cuneiform", "Cypriot", "Cypro_Minoan",
    "Cyrillic", "Deseret", "Devanagari", "Dives_Akuru", "Dogra", "Duployan",
    "Egyptian_Hieroglyphs", "Elbasan", "Elymaic", "Ethiopic", "Georgian", "Glagolitic", "Gothic",
    "Grantha", "Greek", "Gujarati", "Gunjala_Gondi", "Gurmukhi", "Han", "Hangul",
    "Hanifi_Rohingya", "Hanunoo", "Hatran", "Hebrew", "Hiragana", "Imperial_Aramaic",
    "Inherited", "Inscriptional_Pahlavi", "Inscriptional_Parthian", "Javanese", "Kaithi",
    "Kannada", "Katakana", "Kawi", "Kayah_Li", "Kharoshthi", "Khitan_Small_Script", "Khmer",
    "Khojki", "Khudawadi", "Lao", "Latin", "Lepcha", "Limbu", "Linear_A", "Linear_B", "Lisu",
    "Lycian", "Lydian", "Mahajani", "Makasar", "Malayalam", "Mandaic", "Manichaean", "Marchen",
    "Masaram_Gondi", "Medefaidrin", "Meetei_Mayek", "Mende_Kikakui", "Meroitic_Cursive",
    "Meroitic_Hieroglyphs", "Miao", "Modi", "Mongolian", "Mro", "Multani", "Myanmar",
    "Nabataean", "Nag_Mundari", "Nandinagari", "New_Tai_Lue", "Newa", "Nko", "Nushu",
    "Nyiakeng_Puachue_Hmong", "Ogham", "Ol_Chiki", "Old_Hungarian", "Old_Italic",
    "Old_North_Arabian", "Old_Permic", "Old_Persian", "Old_Sogdian", "Old_South_Arabian",
    "Old_Turkic", "Old_Uyghur", "Oriya", "Osage", "Osmanya", "Pahawh_Hmong", "Palmyrene",
    "Pau_Cin_Hau", "Phags_Pa", "Phoenician", "Psalter_Pahlavi", "Rejang", "Runic", "Samaritan",
    "Saurashtra", "Sharada", "Shavian", "Siddham", "SignWriting", "Sinhala", "Sogdian",
    "Sora_Sompeng", "Soyombo", "Sundanese", "Syloti_Nagri", "Syriac", "Tagalog", "Tagbanwa",
    "Tai_Le", "Tai_Tham", "Tai_Viet", "Takri", "Tamil", "Tangsa", "Tangut", "Telugu", "Thaana",
    "Thai", "Tibetan", "Tifinagh", "Tirhuta", "Toto", "Ugaritic", "Vai", "Vithkuqi", "Wancho",
    "Warang_Citi", "Yezidi", "Yi", "Zanabazar_Square",
];

/// Ranges of a Unicode category, script or property, by its exact name.
///
/// A single letter selects every two-letter category starting with it, so
/// `N` covers `Nd`, `Nl` and `No`.
pub(crate) fn unicode(name: &str) -> Option<Vec<(char, char)>> {
    let names: Vec<&str> = if name.chars().count() == 1 {
        CATEGORIES
            .iter()
            .copied()
            .filter(|category| category.starts_with(name))
            .collect()
    } else {
        CATEGORIES
            .iter()
            .chain(PROPERTIES)
            .chain(SCRIPTS)
            .copied()
            .filter(|&known| known == name)
            .collect()
    };

    let mut class = ClassUnicode::empty();
    let mut found = false;
    for name in names {
        if let Some(ranges) = resolve(name) {
            class.union(&ranges);
            found = true;
        }
    }
    if !found {
        return None;
    }
    Some(
        class
            .ranges()
            .iter()
            .map(|range| (range.start(), range.end()))
            .collect(),
    )
}

/// Look a canonical name up in `regex-syntax`'s tables.
fn resolve(name: &str) -> Option<ClassUnicode> {
    let hir = regex_syntax::Parser::new()
        .parse(&format!(r"\p{{{}}}", name))
        .ok()?;
    match hir.kind() {
        HirKind::Class(Class::Unicode(class)) => Some(class.clone()),
        // Classes with nothing in them, such as surrogates, come back empty.
        HirKind::Class(Class::Bytes(class)) if class.ranges().is_empty() => {
            Some(ClassUnicode::empty())
        }
        // Single code point classes such as `Zl` come back as literals.
        HirKind::Literal(literal) => {
            let mut chars = std::str::from_utf8(&literal.0).ok()?.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Some(ClassUnicode::new([ClassUnicodeRange::new(c, c)])),
                _ => None,
            }
        }
        _ => None,
    }
}

/// Binary search over sorted, non-overlapping inclusive ranges.
pub(crate) fn contains(table: &[(char, char)], c: char) -> bool {
    table
        .binary_search_by(|&(lo, hi)| {
            if hi < c {
                std::cmp::Ordering::Less
            } else if lo > c {
                std::cmp::Ordering::Greater
            } else {
                std::cmp::Ordering::Equal
            }
        })
        .is_ok()
}

/// ASCII word character, as used by `\b` and `\B`.
pub(crate) fn is_word(c: char) -> bool {
    contains(WORD, c)
}

#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn ascii_tables() {
        assert_eq!(true, contains(posix("alpha").unwrap(), 'q'));
        assert_eq!(false, contains(posix("alpha").unwrap(), '1'));
        assert_eq!(true, contains(posix("punct").unwrap(), '`'));
        assert_eq!(true, contains(posix("punct").unwrap(), '~'));
        assert_eq!(false, contains(posix("punct").unwrap(), 'a'));
        assert_eq!(true, contains(perl('s').unwrap(), '\x0C'));
        assert_eq!(false, contains(perl('s').unwrap(), '\x0B'));
        assert_eq!(true, contains(posix("space").unwrap(), '\x0B'));
        assert_eq!(None, posix("nope"));
        assert_eq!(None, perl('x'));
    }

    #[test]
    fn word() {
        assert_eq!(true, is_word('_'));
        assert_eq!(true, is_word('Z'));
        assert_eq!(false, is_word(' '));
        assert_eq!(false, is_word('é'));
    }

    #[test]
    fn unicode_classes() {
        let n = unicode("N").unwrap();
        assert_eq!(true, contains(&n, '7'));
        assert_eq!(true, contains(&n, '٣'));
        assert_eq!(true, contains(&n, 'Ⅻ'));
        assert_eq!(false, contains(&n, 'a'));

        let nd = unicode("Nd").unwrap();
        assert_eq!(false, contains(&nd, 'Ⅻ'));

        let greek = unicode("Greek").unwrap();
        assert_eq!(true, contains(&greek, 'λ'));
        assert_eq!(false, contains(&greek, 'l'));

        assert_eq!(Some(vec![('\u{2028}', '\u{2028}')]), unicode("Zl"));

        assert_eq!(None, unicode("Klingon"));
        assert_eq!(None, unicode(""));
        assert_eq!(None, unicode("^L"));
    }

    #[test]
    fn exact_names() {
        assert_eq!(None, unicode("l"));
        assert_eq!(None, unicode("greek"));
        assert_eq!(None, unicode("GREEK"));
        assert_eq!(None, unicode("Grek"));
        assert_eq!(None, unicode("Script=Greek"));
        assert_eq!(None, unicode("Letter"));
        assert_eq!(None, unicode("X"));

        let space = unicode("White_Space").unwrap();
        assert_eq!(true, contains(&space, '\u{3000}'));
        assert_eq!(false, contains(&space, 'a'));
        assert_eq!(true, contains(&unicode("Old_Italic").unwrap(), '\u{10300}'));
    }

    #[test]
    fn letter_prefix_skips_unassigned() {
        let c = unicode("C").unwrap();
        assert_eq!(true, contains(&c, '\u{7}'));
        assert_eq!(true, contains(&c, '\u{AD}'));
        assert_eq!(true, contains(&c, '\u{E000}'));
        assert_eq!(false, contains(&c, '\u{378}'));
        assert_eq!(false, contains(&c, 'a'));
    }
}
