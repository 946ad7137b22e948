//! String normalisation shared by facets, sorting and slugs.

use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

/// Comparison key for type/tag facets: case-insensitive, `-` and `_` equivalent.
pub fn facet_key(value: &str) -> String {
    value
        .trim()
        .chars()
        .flat_map(char::to_lowercase)
        .map(|c| if c == '-' { '_' } else { c })
        .collect()
}

/// Case- and accent-insensitive key used for locale-aware ordering.
pub fn collation_key(value: &str) -> String {
    value
        .trim()
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .collect()
}

/// URL-safe identifier: accents stripped, lowercase, other runs collapsed to `-`.
pub fn slugify(value: &str) -> String {
    let mut slug = String::with_capacity(value.len());
    let mut pending_hyphen = false;

    for c in collation_key(value).chars() {
        if c.is_alphanumeric() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(c);
        } else {
            pending_hyphen = true;
        }
    }
    slug
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn facet_key_ignores_case_and_separators() {
        assert_eq!(facet_key("tourist-spot"), facet_key("TOURIST_SPOT"));
        assert_eq!(facet_key(" Wine-Bar "), "wine_bar");
        assert_ne!(facet_key("bars"), facet_key("bar"));
    }

    #[test]
    fn collation_key_strips_accents() {
        assert_eq!(collation_key("Café"), "cafe");
        assert_eq!(collation_key("ÁGUA Branca"), "agua branca");
        assert!(collation_key("Açaí") < collation_key("Bar"));
    }

    #[test]
    fn slugify_examples() {
        assert_eq!(slugify("Vila Madalena"), "vila-madalena");
        assert_eq!(slugify("  São João / Centro  "), "sao-joao-centro");
        assert_eq!(slugify("Itaim Bibi!!"), "itaim-bibi");
        assert_eq!(slugify("---"), "");
        assert_eq!(slugify("vila-madalena"), "vila-madalena");
    }
}
