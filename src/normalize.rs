//! Expansion of shorthand accent notation typed at the prompt.
//!
//! `'a` becomes `á`, `~n` becomes `ñ` and so on. A leading backslash is
//! accepted as an escape (`\'e` becomes `é`).

use regex::Regex;
use std::sync::LazyLock;

static ACCENT_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"\\?(?:['`^"][aeiouAEIOU]|~[nN])"#).expect("accent pattern is valid")
});

/// Replace every accent shorthand in `word` with its accented character.
///
/// Each pass replaces the leftmost match and shortens the string, so the
/// loop reaches a fixed point.
pub fn normalize(word: &str) -> String {
    let mut current = word.to_string();

    while let Some(found) = ACCENT_PATTERN.find(&current) {
        let shorthand = found.as_str().trim_start_matches('\\');
        let replacement = match accented(shorthand) {
            Some(c) => c,
            None => break,
        };

        let mut next = String::with_capacity(current.len());
        next.push_str(&current[..found.start()]);
        next.push(replacement);
        next.push_str(&current[found.end()..]);
        current = next;
    }

    current
}

fn accented(shorthand: &str) -> Option<char> {
    let mut chars = shorthand.chars();
    let marker = chars.next()?;
    let letter = chars.next()?;

    let c = match (marker, letter) {
        ('\'', 'a') => 'á',
        ('\'', 'e') => 'é',
        ('\'', 'i') => 'í',
        ('\'', 'o') => 'ó',
        ('\'', 'u') => 'ú',
        ('\'', 'A') => 'Á',
        ('\'', 'E') => 'É',
        ('\'', 'I') => 'Í',
        ('\'', 'O') => 'Ó',
        ('\'', 'U') => 'Ú',
        ('`', 'a') => 'à',
        ('`', 'e') => 'è',
        ('`', 'i') => 'ì',
        ('`', 'o') => 'ò',
        ('`', 'u') => 'ù',
        ('`', 'A') => 'À',
        ('`', 'E') => 'È',
        ('`', 'I') => 'Ì',
        ('`', 'O') => 'Ò',
        ('`', 'U') => 'Ù',
        ('^', 'a') => 'â',
        ('^', 'e') => 'ê',
        ('^', 'i') => 'î',
        ('^', 'o') => 'ô',
        ('^', 'u') => 'û',
        ('^', 'A') => 'Â',
        ('^', 'E') => 'Ê',
        ('^', 'I') => 'Î',
        ('^', 'O') => 'Ô',
        ('^', 'U') => 'Û',
        ('"', 'a') => 'ä',
        ('"', 'e') => 'ë',
        ('"', 'i') => 'ï',
        ('"', 'o') => 'ö',
        ('"', 'u') => 'ü',
        ('"', 'A') => 'Ä',
        ('"', 'E') => 'Ë',
        ('"', 'I') => 'Ï',
        ('"', 'O') => 'Ö',
        ('"', 'U') => 'Ü',
        ('~', 'n') => 'ñ',
        ('~', 'N') => 'Ñ',
        _ => return None,
    };
    Some(c)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expands_acute_vowels() {
        assert_eq!(normalize("cami'on"), "camión");
        assert_eq!(normalize("'arbol"), "árbol");
        assert_eq!(normalize("ping\"uino"), "pingüino");
    }

    #[test]
    fn test_expands_tilde_n() {
        assert_eq!(normalize("a~no"), "año");
        assert_eq!(normalize("ESPA~NA"), "ESPAÑA");
    }

    #[test]
    fn test_strips_escape() {
        assert_eq!(normalize("caf\\'e"), "café");
        assert_eq!(normalize("ma\\~nana"), "mañana");
    }

    #[test]
    fn test_multiple_patterns() {
        assert_eq!(normalize("coraz'on y a~nos"), "corazón y años");
    }

    #[test]
    fn test_untouched_without_pattern() {
        assert_eq!(normalize("casa"), "casa");
        assert_eq!(normalize("don't"), "don't");
        assert_eq!(normalize(""), "");
    }

    #[test]
    fn test_idempotent() {
        let inputs = [
            "cami'on", "a~no", "caf\\'e", "''a", "\\\\'e", "~~n", "^e`a\"u", "casa", "'~n",
        ];
        for input in inputs {
            let once = normalize(input);
            assert_eq!(normalize(&once), once, "input {:?}", input);
        }
    }
}
