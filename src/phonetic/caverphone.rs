use crate::regex::must_parse;

/// Plain substitutions applied in order, before and after vowels are
/// folded.
const CONSONANTS: &[(&str, &str)] = &[
    ("cq", "2q"),
    ("ci", "si"),
    ("ce", "se"),
    ("cy", "sy"),
    ("tch", "2ch"),
    ("c", "k"),
    ("q", "k"),
    ("x", "k"),
    ("v", "f"),
    ("dg", "2g"),
    ("tio", "sio"),
    ("tia", "sia"),
    ("d", "t"),
    ("ph", "fh"),
    ("b", "p"),
    ("sh", "s2"),
    ("z", "s"),
];

const GUTTURALS: &[(&str, &str)] = &[("3gh3", "3kh3"), ("gh", "22"), ("g", "k")];

/// Caverphone 2.0 code of `text`: ten characters, padded with `1`.
///
/// Only the ASCII letters of `text` count, case aside. Empty if `text` is.
pub fn caverphone(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }
    let mut rv: String = text
        .to_lowercase()
        .chars()
        .filter(char::is_ascii_lowercase)
        .collect();
    if rv.ends_with('e') {
        rv.pop();
    }

    let caps = must_parse("^([crt]|(en)|(tr))ough").extract(&rv, 3);
    if caps.len() > 1 {
        rv = format!("{}ou2f{}", caps[1], &rv[caps[0].len()..]);
    }
    if must_parse("^gn").is_match(&rv) {
        rv.replace_range(..2, "2n");
    }
    if must_parse("mb$").is_match(&rv) {
        let len = rv.len();
        rv.replace_range(len - 2.., "m2");
    }
    rv = replace_all(rv, CONSONANTS);

    if must_parse("^[aiueo]").is_match(&rv) {
        rv.replace_range(..1, "A");
    }
    rv = replace_all(rv, &[("a", "3"), ("e", "3"), ("i", "3"), ("o", "3"), ("u", "3")]);

    rv = rv.replace('j', "y");
    if rv.starts_with("y3") {
        rv.replace_range(..2, "Y3");
    }
    if rv.starts_with('y') {
        rv.replace_range(..1, "A");
    }
    rv = rv.replace('y', "3");
    rv = replace_all(rv, GUTTURALS);

    for c in ['s', 't', 'p', 'k', 'f', 'm', 'n'] {
        rv = squeeze(&rv, c);
    }

    rv = replace_all(rv, &[("w3", "W3"), ("wh3", "Wh3")]);
    rv = last_to_vowel(rv, 'w').replace('w', "2");
    if rv.starts_with('h') {
        rv.replace_range(..1, "A");
    }
    rv = rv.replace('h', "2");
    rv = last_to_vowel(rv.replace("r3", "R3"), 'r').replace('r', "2");
    rv = last_to_vowel(rv.replace("l3", "L3"), 'l').replace('l', "2");
    rv = rv.replace('2', "");
    if rv.ends_with('3') {
        rv.pop();
        rv.push('A');
    }
    rv = rv.replace('3', "");

    rv.push_str("1111111111");
    rv.truncate(10);
    rv
}

fn replace_all(text: String, rules: &[(&str, &str)]) -> String {
    rules
        .iter()
        .fold(text, |text, (from, to)| text.replace(from, to))
}

/// Turn a final `c` into the vowel placeholder `3`.
fn last_to_vowel(mut text: String, c: char) -> String {
    if text.ends_with(c) {
        text.pop();
        text.push('3');
    }
    text
}

/// Collapse every run of `c` into a single upper case `c`.
fn squeeze(text: &str, c: char) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_run = false;
    for ch in text.chars() {
        if ch == c {
            if !in_run {
                out.push(c.to_ascii_uppercase());
            }
            in_run = true;
        } else {
            out.push(ch);
            in_run = false;
        }
    }
    out
}

#[cfg(test)]
mod test {
    use super::{caverphone, squeeze};
    use pretty_assertions::assert_eq;

    #[test]
    fn names() {
        assert_eq!("MA11111111", caverphone("mayer"));
        assert_eq!("MA11111111", caverphone("meier"));
        assert_eq!("ANRKSN1111", caverphone("Henrichsen"));
        assert_eq!("ANRKSN1111", caverphone("Henricsson"));
        assert_eq!("ANRKSN1111", caverphone("Henriksson"));
        assert_eq!("ANRKSN1111", caverphone("Hinrichsen"));
        assert_eq!("STFNSN1111", caverphone("Stevenson"));
        assert_eq!("PTA1111111", caverphone("Peter"));
        assert_eq!("KLN1111111", caverphone("Karleen,"));
        assert_eq!("TMPSN11111", caverphone("Thompson"));
        assert_eq!("WTLM111111", caverphone("Whitlam"));
    }

    #[test]
    fn ough_prefix() {
        assert_eq!(caverphone("enouf"), caverphone("enough"));
        assert_eq!(caverphone("touf"), caverphone("tough"));
    }

    #[test]
    fn empty() {
        assert_eq!("", caverphone(""));
        assert_eq!("1111111111", caverphone("!!"));
    }

    #[test]
    fn runs() {
        assert_eq!("aSbS", squeeze("assbs", 's'));
        assert_eq!("", squeeze("", 's'));
    }
}
