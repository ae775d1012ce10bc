use std::iter;

/// Digit for each of `A` to `Z`.
const DIGITS: &[u8; 26] = b"01230120022455012623010202";

/// American Soundex of the ASCII letters in `name`: the first letter, then
/// the digits of the consonants that follow, padded with `0` or cut to
/// `length`.
///
/// Adjacent letters with the same digit count once. Empty if `name` has no
/// ASCII letters.
pub fn soundex(name: &str, length: usize) -> String {
    let mut first = None;
    let mut digits = String::new();
    for c in name
        .chars()
        .map(|c| c.to_ascii_uppercase())
        .filter(char::is_ascii_uppercase)
    {
        if first.is_none() {
            first = Some(c);
        }
        let digit = DIGITS[usize::from(c as u8 - b'A')] as char;
        if !digits.ends_with(digit) {
            digits.push(digit);
        }
    }

    let first = match first {
        Some(first) => first,
        None => return String::new(),
    };
    let mut code: String = iter::once(first)
        .chain(digits.chars().skip(1).filter(|&d| d != '0'))
        .chain(iter::repeat('0').take(length))
        .collect();
    code.truncate(length);
    code
}

#[cfg(test)]
mod test {
    use super::soundex;
    use pretty_assertions::assert_eq;

    #[test]
    fn names() {
        assert_eq!("R1500", soundex("robin", 5));
        assert_eq!("A5200", soundex("anis", 5));
        assert_eq!("Y2546", soundex("YouKnowYouAllRight", 5));
        assert_eq!("R163", soundex("Robert", 4));
        assert_eq!("R163", soundex("Rupert", 4));
    }

    #[test]
    fn edges() {
        assert_eq!("", soundex("", 4));
        assert_eq!("", soundex("123 !", 4));
        assert_eq!("", soundex("robin", 0));
        assert_eq!("R", soundex("robin", 1));
        assert_eq!("R15000", soundex("r-o-b-i-n", 6));
    }
}
