use crate::{
    errors::ReferenceError,
    image::{
        grammar::{anchored, capture, literal, optional, DIGEST, DOMAIN, NAME, REPOSITORY_PATH, TAG},
        Digest,
    },
};
use regex::Regex;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::{
    cmp::{Ord, Ordering, PartialOrd},
    fmt,
    hash::{Hash, Hasher},
    ops::Range,
    str::FromStr,
};

/// Longest repository name we accept, including any hostname
pub const NAME_TOTAL_LENGTH_MAX: usize = 255;

/// Parsed Docker-style image reference
///
/// This is an owned struct representing a docker "reference" (like a URI)
/// which names an image, optionally at a specific version. A reference is a
/// repository name, then an optional tag beginning with `:`, then an optional
/// [Digest] beginning with `@`. Only the name is mandatory.
///
/// The name itself may begin with a registry hostname. Where the hostname ends
/// and the repository path begins is not decided during parsing: the grammar
/// only confirms that some split exists, and [Reference::split_hostname]
/// applies the tie-break afterwards. No defaults are filled in; a reference
/// without a tag has no tag.
#[derive(Clone)]
pub struct Reference {
    serialized: String,
    name_pos: Range<usize>,
    tag_pos: Option<Range<usize>>,
    digest: Option<Digest>,
}

impl Reference {
    /// Returns a reference to the existing string representation of a
    /// [Reference]
    pub fn as_str(&self) -> &str {
        &self.serialized
    }

    /// Parse a [prim@str] as a [Reference]
    ///
    /// A colon after the last slash always starts a tag, even when it looks
    /// like a port number. Once `@algorithm:hex` text is recognized, digest
    /// errors are reported in preference to a generic format error.
    ///
    /// ```
    /// # use image_reference::Reference;
    /// let reference = Reference::parse("test:5000/repo:tag").unwrap();
    /// assert_eq!(reference.name(), "test:5000/repo");
    /// assert_eq!(reference.split_hostname(), ("test:5000", "repo"));
    /// assert_eq!(reference.tag(), Some("tag"));
    ///
    /// let reference = Reference::parse("test.com:5000").unwrap();
    /// assert_eq!(reference.name(), "test.com");
    /// assert_eq!(reference.tag(), Some("5000"));
    /// assert_eq!(reference.hostname(), None);
    /// ```
    pub fn parse(s: &str) -> Result<Self, ReferenceError> {
        lazy_static! {
            static ref RE: Regex = anchored(&[
                &capture("name", &[&NAME]),
                &optional(&[&literal(":"), &capture("tag", &[TAG])]),
                &optional(&[&literal("@"), &capture("digest", &[&DIGEST])]),
            ]);
        }
        if s.is_empty() {
            log::debug!("rejecting empty reference");
            return Err(ReferenceError::NameEmpty);
        }
        let captures = match RE.captures(s) {
            Some(captures) => captures,
            None => {
                log::debug!("rejecting malformed reference, {:?}", s);
                return Err(ReferenceError::ReferenceInvalidFormat(s.to_owned()));
            }
        };
        let name_pos = match captures.name("name") {
            Some(name) => name.range(),
            None => return Err(ReferenceError::ReferenceInvalidFormat(s.to_owned())),
        };
        if name_pos.len() > NAME_TOTAL_LENGTH_MAX {
            log::debug!("rejecting reference with {} character name", name_pos.len());
            return Err(ReferenceError::NameTooLong(name_pos.len()));
        }
        let digest = captures
            .name("digest")
            .map(|m| Digest::parse(m.as_str()))
            .transpose()?;
        let reference = Reference {
            serialized: s.to_owned(),
            name_pos,
            tag_pos: captures.name("tag").map(|m| m.range()),
            digest,
        };
        log::trace!("parsed reference, {:?}", reference.as_parts());
        Ok(reference)
    }

    /// Assemble a [Reference] from its component pieces
    ///
    /// This fails if any piece is invalid, or if the assembled string would
    /// parse back into different pieces than the ones given.
    pub fn from_parts(
        name: &str,
        tag: Option<&str>,
        digest: Option<&str>,
    ) -> Result<Self, ReferenceError> {
        let mut combined = name.to_owned();
        if let Some(tag) = tag {
            combined.push(':');
            combined.push_str(tag);
        }
        if let Some(digest) = digest {
            combined.push('@');
            combined.push_str(digest);
        }
        let parsed = Reference::parse(&combined)?;
        if parsed.as_parts() == (name, tag, digest) {
            Ok(parsed)
        } else {
            // Parsing ambiguity
            Err(ReferenceError::ReferenceInvalidFormat(combined))
        }
    }

    /// Return references to the name, tag, and digest within this [Reference]
    pub fn as_parts(&self) -> (&str, Option<&str>, Option<&str>) {
        (
            self.name(),
            self.tag(),
            self.digest().map(|digest| digest.as_str()),
        )
    }

    /// Full repository name, including the hostname if there is one
    ///
    /// Always between 1 and [NAME_TOTAL_LENGTH_MAX] characters.
    pub fn name(&self) -> &str {
        &self.serialized[self.name_pos.clone()]
    }

    /// Returns a reference to the optional tag portion of the string
    pub fn tag(&self) -> Option<&str> {
        self.tag_pos
            .as_ref()
            .map(|pos| &self.serialized[pos.clone()])
    }

    /// Returns the validated digest, if present
    pub fn digest(&self) -> Option<&Digest> {
        self.digest.as_ref()
    }

    /// Split the name into a hostname and the remaining repository path
    ///
    /// The first slash-separated segment is the hostname when it is a valid
    /// domain with optional port and at least one path component follows it.
    /// Otherwise the hostname is empty and the remainder is the whole name.
    ///
    /// ```
    /// # use image_reference::Reference;
    /// let reference = Reference::parse("foo/foo_bar.com:8080").unwrap();
    /// assert_eq!(reference.split_hostname(), ("foo", "foo_bar.com"));
    ///
    /// let reference = Reference::parse("foo_bar.com/foo").unwrap();
    /// assert_eq!(reference.split_hostname(), ("", "foo_bar.com/foo"));
    /// ```
    pub fn split_hostname(&self) -> (&str, &str) {
        lazy_static! {
            static ref HOSTNAME: Regex = anchored(&[&DOMAIN]);
            static ref REMAINDER: Regex = anchored(&[&REPOSITORY_PATH]);
        }
        let name = self.name();
        match name.split_once('/') {
            Some((hostname, remainder))
                if HOSTNAME.is_match(hostname) && REMAINDER.is_match(remainder) =>
            {
                (hostname, remainder)
            }
            _ => ("", name),
        }
    }

    /// The hostname from [Reference::split_hostname], if any
    pub fn hostname(&self) -> Option<&str> {
        match self.split_hostname() {
            ("", _) => None,
            (hostname, _) => Some(hostname),
        }
    }

    /// The name with any hostname removed
    pub fn repository_path(&self) -> &str {
        self.split_hostname().1
    }

    /// The hostname, if it looks like a registry server
    ///
    /// Docker clients only treat the leading hostname as a registry when it
    /// includes a dot (.) or colon (:), or is exactly `localhost`. Any other
    /// hostname is more likely a namespace on the default registry, and this
    /// returns `None` for it.
    pub fn registry(&self) -> Option<&str> {
        self.hostname().filter(|hostname| {
            hostname.contains(|c: char| c == '.' || c == ':') || *hostname == "localhost"
        })
    }
}

impl Eq for Reference {}

impl PartialEq for Reference {
    fn eq(&self, other: &Self) -> bool {
        self.serialized.eq(&other.serialized)
    }
}

impl FromStr for Reference {
    type Err = ReferenceError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Reference::parse(s)
    }
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl fmt::Debug for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self)
    }
}

impl Hash for Reference {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.serialized.hash(state);
    }
}

impl Ord for Reference {
    fn cmp(&self, other: &Self) -> Ordering {
        self.serialized.cmp(&other.serialized)
    }
}

impl PartialOrd for Reference {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.serialized.partial_cmp(&other.serialized)
    }
}

impl Serialize for Reference {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Reference {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Reference::parse(&s).map_err(de::Error::custom)
    }
}
