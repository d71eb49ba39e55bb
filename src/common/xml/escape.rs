use aho_corasick::AhoCorasick;
use once_cell::sync::Lazy;

// Static initialization: automaton is built only once, thread-safe
static XML_ESCAPER: Lazy<AhoCorasick> = Lazy::new(|| {
    AhoCorasick::builder()
        .build(["&", "<", ">", "\"", "'"])
        .expect("Failed to build XML escaper")
});

/// Escape the five XML metacharacters.
///
/// # Examples
///
/// ```
/// use wordkit::common::xml::escape_xml;
/// assert_eq!(escape_xml("Smith & Jones <Legal>"), "Smith &amp; Jones &lt;Legal&gt;");
/// assert_eq!(escape_xml("\"it's\""), "&quot;it&apos;s&quot;");
/// ```
#[inline]
pub fn escape_xml(s: &str) -> String {
    XML_ESCAPER.replace_all(s, &["&amp;", "&lt;", "&gt;", "&quot;", "&apos;"])
}

/// Resolve the body of an entity reference (the part between `&` and `;`).
///
/// Handles the five predefined entities plus decimal and hexadecimal
/// character references. Unknown entities return `None`.
///
/// # Examples
///
/// ```
/// use wordkit::common::xml::resolve_entity;
/// assert_eq!(resolve_entity("amp"), Some('&'));
/// assert_eq!(resolve_entity("#65"), Some('A'));
/// assert_eq!(resolve_entity("#x263A"), Some('\u{263A}'));
/// assert_eq!(resolve_entity("nbsp"), None);
/// ```
pub fn resolve_entity(name: &str) -> Option<char> {
    match name {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        _ => {
            let code = name.strip_prefix('#')?;
            let value = match code.strip_prefix('x').or_else(|| code.strip_prefix('X')) {
                Some(hex) => u32::from_str_radix(hex, 16).ok()?,
                None => code.parse::<u32>().ok()?,
            };
            char::from_u32(value)
        },
    }
}
