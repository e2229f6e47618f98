//! Keysym names, resolved by xkbcommon.
//!
//! A name is looked up case-sensitively in the keysym table. A single
//! character that has no name of its own (`é`, `€`) maps to the keysym
//! for that character.

use xkbcommon::xkb::{self, Keysym};

/// Keysym called `name`, or `None` if there is no such key.
pub fn from_name(name: &str) -> Option<u32> {
    let keysym = xkb::keysym_from_name(name, 0);
    if keysym != Keysym::NoSymbol {
        return Some(keysym.raw());
    }

    let mut chars = name.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => from_char(c),
        _ => None,
    }
}

/// Keysym typed as `c`.
pub fn from_char(c: char) -> Option<u32> {
    let keysym = xkb::utf32_to_keysym(u32::from(c));
    (keysym != Keysym::NoSymbol).then_some(keysym.raw())
}

/// Name of `keysym`, for display.
pub fn name(keysym: u32) -> Option<String> {
    let name = xkb::keysym_get_name(Keysym::new(keysym));
    (!name.is_empty()).then_some(name)
}

/// Lowercase form of a letter keysym; other keysyms are returned unchanged.
///
/// Events report the shifted keysym (`A` for Shift+a) while binding files
/// name the unshifted key.
pub fn to_lower(keysym: u32) -> u32 {
    let Some(c) = char::from_u32(xkb::keysym_to_utf32(Keysym::new(keysym))) else {
        return keysym;
    };
    let mut lower = c.to_lowercase();
    let (Some(l), None) = (lower.next(), lower.next()) else {
        return keysym;
    };
    // Keypad and control keys share their character with other keysyms.
    if l == c {
        return keysym;
    }
    from_char(l).unwrap_or(keysym)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_named_keys() {
        assert_eq!(from_name("Return"), Some(0xff0d));
        assert_eq!(from_name("Page_Down"), from_name("Next"));
        assert_eq!(from_name("plus"), Some(u32::from('+')));
        assert_eq!(from_name("return"), None);
        assert_eq!(from_name("NoSuchKey"), None);
    }

    #[test]
    fn test_vendor_and_international_keys() {
        assert_eq!(from_name("XF86AudioPlay"), Some(0x1008_ff14));
        assert_eq!(from_name("XF86Search"), Some(0x1008_ff1b));
        assert_eq!(from_name("eacute"), Some(0xe9));
        assert_eq!(from_name("KP_F1"), Some(0xff91));
        assert_eq!(from_name("ISO_Level3_Shift"), Some(0xfe03));
        assert_eq!(from_name("Cyrillic_a"), Some(0x6c1));
    }

    #[test]
    fn test_function_keys() {
        assert_eq!(from_name("F1"), Some(0xffbe));
        assert_eq!(from_name("F35"), Some(0xffbe + 34));
        assert_eq!(from_name("F0"), None);
    }

    #[test]
    fn test_single_characters() {
        assert_eq!(from_name("a"), Some(0x61));
        assert_eq!(from_name("7"), Some(0x37));
        assert_eq!(from_name("é"), from_name("eacute"));
        assert!(from_name("€").is_some());
        assert_eq!(from_name("ab"), None);
    }

    #[test]
    fn test_names_for_display() {
        assert_eq!(name(0xffc2).as_deref(), Some("F5"));
        assert_eq!(name(0xff0d).as_deref(), Some("Return"));
        assert_eq!(name(0x61).as_deref(), Some("a"));
        assert_eq!(name(0x2b).as_deref(), Some("plus"));
        assert_eq!(name(0x1008_ff14).as_deref(), Some("XF86AudioPlay"));
    }

    #[test]
    fn test_to_lower() {
        assert_eq!(to_lower(u32::from('Q')), u32::from('q'));
        assert_eq!(to_lower(u32::from('q')), u32::from('q'));
        assert_eq!(to_lower(0xc9), 0xe9);
        assert_eq!(to_lower(0x6e1), 0x6c1);
        assert_eq!(to_lower(0xff0d), 0xff0d);
        assert_eq!(to_lower(0xff8d), 0xff8d);
        assert_eq!(to_lower(0xffc2), 0xffc2);
    }
}
