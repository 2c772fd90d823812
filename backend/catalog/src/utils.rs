use std::sync::LazyLock;

use regex::Regex;

static UNDERSCORES: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[_]").expect("valid regex"));
static NON_SLUG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-z0-9- ]").expect("valid regex"));
static SPACES: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));
static DASHES: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"-+").expect("valid regex"));

/// Trims and collapses whitespace, keeps the original casing and diacritics.
pub fn sanitize(input: &str) -> String {
    SPACES.replace_all(input.trim(), " ").into_owned()
}

/// Lowercase ASCII slug, diacritics folded: `"Kváskový chlieb"` -> `"kvaskovy-chlieb"`.
pub fn slugify(input: &str) -> String {
    let folded: String = input.chars().map(fold).collect::<String>().to_lowercase();

    let s = UNDERSCORES.replace_all(&folded, " ");
    let s = NON_SLUG.replace_all(&s, "");
    let s = SPACES.replace_all(s.trim(), "-");

    DASHES
        .replace_all(&s, "-")
        .trim_matches('-')
        .to_string()
}

fn fold(c: char) -> char {
    match c {
        'á' | 'ä' | 'à' | 'â' => 'a',
        'Á' | 'Ä' | 'À' | 'Â' => 'A',
        'č' | 'ç' => 'c',
        'Č' | 'Ç' => 'C',
        'ď' => 'd',
        'Ď' => 'D',
        'é' | 'ě' | 'è' | 'ê' | 'ë' => 'e',
        'É' | 'Ě' | 'È' | 'Ê' | 'Ë' => 'E',
        'í' | 'î' | 'ï' => 'i',
        'Í' | 'Î' | 'Ï' => 'I',
        'ĺ' | 'ľ' => 'l',
        'Ĺ' | 'Ľ' => 'L',
        'ň' | 'ñ' => 'n',
        'Ň' | 'Ñ' => 'N',
        'ó' | 'ô' | 'ö' | 'ò' => 'o',
        'Ó' | 'Ô' | 'Ö' | 'Ò' => 'O',
        'ŕ' | 'ř' => 'r',
        'Ŕ' | 'Ř' => 'R',
        'š' => 's',
        'Š' => 'S',
        'ť' => 't',
        'Ť' => 'T',
        'ú' | 'ů' | 'ü' | 'ù' => 'u',
        'Ú' | 'Ů' | 'Ü' | 'Ù' => 'U',
        'ý' | 'ÿ' => 'y',
        'Ý' => 'Y',
        'ž' => 'z',
        'Ž' => 'Z',
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::{sanitize, slugify};

    #[test]
    fn test_basic() {
        assert_eq!(slugify("hello_world"), "hello-world");
        assert_eq!(slugify("Rust-lang"), "rust-lang");
        assert_eq!(slugify("clean-this_text!"), "clean-this-text");
    }

    #[test]
    fn test_diacritics() {
        assert_eq!(slugify("Kváskový chlieb"), "kvaskovy-chlieb");
        assert_eq!(slugify("Rožok s maslom"), "rozok-s-maslom");
        assert_eq!(slugify("ŤAHANÝ ŠTRÚDĽA"), "tahany-strudla");
    }

    #[test]
    fn test_leading_trailing_spaces() {
        assert_eq!(slugify("   hello   "), "hello");
        assert_eq!(slugify("  multiple   spaces  "), "multiple-spaces");
        assert_eq!(slugify("--dash -- soup--"), "dash-soup");
    }

    #[test]
    fn test_special_characters() {
        assert_eq!(slugify("!@#$%^&*()"), "");
        assert_eq!(slugify("abc123!@#"), "abc123");
    }

    #[test]
    fn test_sanitize_keeps_casing() {
        assert_eq!(sanitize("  Makový   koláč "), "Makový koláč");
        assert_eq!(sanitize(""), "");
    }
}
