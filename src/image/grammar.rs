//! Lexical rules for each piece of an image reference
//!
//! Every rule here is an unanchored regular expression fragment without
//! capture groups, so rules nest inside one another freely. The parsers
//! compose them with [capture] and [anchored] into whole-string matchers.

use regex::Regex;

/// Lowercase alphanumeric run, the body of a repository path component
pub(crate) const ALPHANUMERIC: &str = "[a-z0-9]+";

/// Separators allowed inside a repository path component: a single period, one
/// or two underscores, or any number of dashes
pub(crate) const SEPARATOR: &str = "(?:[._]|__|-+)";

/// One dot-separated label of a registry domain name
pub(crate) const DOMAIN_COMPONENT: &str = concat!(
    "(?:",
    /* */ "[a-zA-Z0-9]|",
    /* */ "[a-zA-Z0-9][a-zA-Z0-9-]*[a-zA-Z0-9]",
    ")",
);

pub(crate) const PORT: &str = "[0-9]+";

/// Tags are up to 128 characters, and may not begin with a dot or dash
pub(crate) const TAG: &str = "[a-zA-Z0-9_][a-zA-Z0-9_.-]{0,127}";

pub(crate) const DIGEST_ALGORITHM_COMPONENT: &str = "[a-z0-9]+";

pub(crate) const DIGEST_ALGORITHM_SEPARATOR: &str = "[+._]";

/// At least 128 bits, always lowercase
pub(crate) const DIGEST_HEX: &str = "[a-f0-9]{32,}";

lazy_static! {
    /// Domain name with an optional port number
    pub(crate) static ref DOMAIN: String = group(&[
        DOMAIN_COMPONENT,
        &optional(&[&repeated(&[&literal("."), DOMAIN_COMPONENT])]),
        &optional(&[&literal(":"), PORT]),
    ]);

    pub(crate) static ref PATH_COMPONENT: String = group(&[
        ALPHANUMERIC,
        &optional(&[&repeated(&[SEPARATOR, ALPHANUMERIC])]),
    ]);

    /// Path components joined by slashes, with no registry domain
    pub(crate) static ref REPOSITORY_PATH: String = group(&[
        &PATH_COMPONENT,
        &optional(&[&repeated(&[&literal("/"), &PATH_COMPONENT])]),
    ]);

    /// Full repository name: an optional domain, then the repository path
    pub(crate) static ref NAME: String = group(&[
        &optional(&[&DOMAIN, &literal("/")]),
        &REPOSITORY_PATH,
    ]);

    pub(crate) static ref DIGEST_ALGORITHM: String = group(&[
        DIGEST_ALGORITHM_COMPONENT,
        &optional(&[&repeated(&[
            DIGEST_ALGORITHM_SEPARATOR,
            DIGEST_ALGORITHM_COMPONENT,
        ])]),
    ]);

    /// Generic digest shape, accepting any algorithm name and hex length
    pub(crate) static ref DIGEST: String = group(&[
        &DIGEST_ALGORITHM,
        &literal(":"),
        DIGEST_HEX,
    ]);
}

/// Concatenate expressions into a non-capturing group
pub(crate) fn group(exprs: &[&str]) -> String {
    format!("(?:{})", exprs.concat())
}

/// Concatenated expressions, matched zero or one times
pub(crate) fn optional(exprs: &[&str]) -> String {
    format!("{}?", group(exprs))
}

/// Concatenated expressions, matched one or more times
pub(crate) fn repeated(exprs: &[&str]) -> String {
    format!("{}+", group(exprs))
}

/// Concatenated expressions in a named capture group
pub(crate) fn capture(name: &str, exprs: &[&str]) -> String {
    format!("(?P<{}>{})", name, exprs.concat())
}

/// Match a string exactly, with no special characters
pub(crate) fn literal(s: &str) -> String {
    regex::escape(s)
}

/// Compile concatenated expressions so they must match the entire input
///
/// Patterns are all built from the constant rules in this module, so a failure
/// to compile is a bug here rather than an input error.
pub(crate) fn anchored(exprs: &[&str]) -> Regex {
    Regex::new(&format!("^{}$", group(exprs))).unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matches(rule: &str, s: &str) -> bool {
        anchored(&[rule]).is_match(s)
    }

    #[test]
    fn domain() {
        assert!(matches(&DOMAIN, "localhost"));
        assert!(matches(&DOMAIN, "localhost:5000"));
        assert!(matches(&DOMAIN, "sub-dom1.foo.com"));
        assert!(matches(&DOMAIN, "xn--7o8h.com"));
        assert!(matches(&DOMAIN, "Test.Example.COM:443"));
        assert!(!matches(&DOMAIN, "-foo.com"));
        assert!(!matches(&DOMAIN, "foo-.com"));
        assert!(!matches(&DOMAIN, "foo..com"));
        assert!(!matches(&DOMAIN, "foo_bar.com"));
        assert!(!matches(&DOMAIN, "foo.com:"));
        assert!(!matches(&DOMAIN, "foo.com:lol"));
    }

    #[test]
    fn path_component() {
        assert!(matches(&PATH_COMPONENT, "a"));
        assert!(matches(&PATH_COMPONENT, "foo_bar.com"));
        assert!(matches(&PATH_COMPONENT, "a__b"));
        assert!(matches(&PATH_COMPONENT, "a---b"));
        assert!(matches(&PATH_COMPONENT, "a.b-c_d"));
        assert!(!matches(&PATH_COMPONENT, "a___b"));
        assert!(!matches(&PATH_COMPONENT, "a..b"));
        assert!(!matches(&PATH_COMPONENT, "a._b"));
        assert!(!matches(&PATH_COMPONENT, "_a"));
        assert!(!matches(&PATH_COMPONENT, "a-"));
        assert!(!matches(&PATH_COMPONENT, "Abc"));
        assert!(!matches(&PATH_COMPONENT, "a/b"));
    }

    #[test]
    fn repository_path() {
        assert!(matches(&REPOSITORY_PATH, "library/busybox"));
        assert!(matches(&REPOSITORY_PATH, "a/b/c/d"));
        assert!(!matches(&REPOSITORY_PATH, "a//b"));
        assert!(!matches(&REPOSITORY_PATH, "/a"));
        assert!(!matches(&REPOSITORY_PATH, "a/"));
        assert!(!matches(&REPOSITORY_PATH, "test:5000/repo"));
    }

    #[test]
    fn name() {
        assert!(matches(&NAME, "test:5000/repo"));
        assert!(matches(&NAME, "Registry.local/repo"));
        assert!(!matches(&NAME, "test:5000"));
        assert!(!matches(&NAME, "Repo"));
    }

    #[test]
    fn tag() {
        assert!(matches(TAG, "latest"));
        assert!(matches(TAG, "_"));
        assert!(matches(TAG, "v1.0-RC_2"));
        assert!(matches(TAG, &"t".repeat(128)));
        assert!(!matches(TAG, &"t".repeat(129)));
        assert!(!matches(TAG, ".hidden"));
        assert!(!matches(TAG, "-dash"));
        assert!(!matches(TAG, "with/slash"));
        assert!(!matches(TAG, ""));
    }

    #[test]
    fn digest() {
        let hex = "0123456789abcdef0123456789abcdef";
        assert!(matches(&DIGEST, &format!("sha256:{}", hex)));
        assert!(matches(&DIGEST, &format!("multihash+base58:{}", hex)));
        assert!(matches(&DIGEST, &format!("a.b_c+d:{}", hex)));
        assert!(!matches(&DIGEST, &format!("a++b:{}", hex)));
        assert!(!matches(&DIGEST, &format!("+ab:{}", hex)));
        assert!(!matches(&DIGEST, &format!("SHA256:{}", hex)));
        assert!(!matches(&DIGEST, &format!("sha256:{}", hex.to_uppercase())));
        assert!(!matches(&DIGEST, &format!("sha256:{}", &hex[1..])));
        assert!(!matches(&DIGEST, &format!(":{}", hex)));
        assert!(!matches(&DIGEST, "sha256"));
    }

    #[test]
    fn combinators() {
        assert_eq!(group(&["a", "b"]), "(?:ab)");
        assert_eq!(optional(&["a"]), "(?:a)?");
        assert_eq!(repeated(&["a"]), "(?:a)+");
        assert_eq!(capture("x", &["a", "b"]), "(?P<x>ab)");
        assert_eq!(literal("."), "\\.");
    }
}
