use crate::{
    errors::ReferenceError,
    image::grammar::{anchored, capture, DIGEST_ALGORITHM, DIGEST_HEX},
};
use regex::Regex;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use sha2::{Digest as _, Sha256, Sha384, Sha512};
use std::{
    cmp::{Ord, Ordering, PartialOrd},
    fmt,
    hash::{Hash, Hasher},
    str::FromStr,
};

/// Hash algorithms a [Digest] may be validated against
///
/// The generic digest grammar accepts any algorithm name. Only the names
/// listed here are considered supported, and each one has a fixed length for
/// its hex encoding.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum Algorithm {
    Sha256,
    Sha384,
    Sha512,
}

impl Algorithm {
    /// Look up a supported algorithm by its name within a digest string
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "sha256" => Some(Algorithm::Sha256),
            "sha384" => Some(Algorithm::Sha384),
            "sha512" => Some(Algorithm::Sha512),
            _ => None,
        }
    }

    /// Name of the algorithm as it appears before the colon in a digest
    pub fn as_str(&self) -> &'static str {
        match self {
            Algorithm::Sha256 => "sha256",
            Algorithm::Sha384 => "sha384",
            Algorithm::Sha512 => "sha512",
        }
    }

    /// Number of hex digits in a digest produced by this algorithm
    pub fn hex_len(&self) -> usize {
        match self {
            Algorithm::Sha256 => 64,
            Algorithm::Sha384 => 96,
            Algorithm::Sha512 => 128,
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A digest securely identifies the specific contents of a binary object
///
/// Digests are an algorithm name and a lowercase hex string, separated by a
/// single colon. Only digests using a supported [Algorithm] with a hex string
/// of exactly the right length can be constructed.
#[derive(Clone)]
pub struct Digest {
    serialized: String,
    algorithm: Algorithm,
}

impl Digest {
    /// Returns a reference to the existing string representation of a
    /// [Digest]
    pub fn as_str(&self) -> &str {
        &self.serialized
    }

    /// Parse and validate a [prim@str] as a [Digest]
    ///
    /// ```
    /// # use image_reference::{Algorithm, Digest};
    /// let digest = Digest::parse(&format!("sha256:{}", "f".repeat(64))).unwrap();
    /// assert_eq!(digest.algorithm(), Algorithm::Sha256);
    /// assert_eq!(digest.hex(), "f".repeat(64));
    /// ```
    pub fn parse(s: &str) -> Result<Self, ReferenceError> {
        lazy_static! {
            static ref RE: Regex = anchored(&[
                &capture("algorithm", &[&DIGEST_ALGORITHM]),
                ":",
                &capture("hex", &[DIGEST_HEX]),
            ]);
        }
        match RE.captures(s) {
            None => {
                log::debug!("rejecting malformed digest, {:?}", s);
                Err(ReferenceError::DigestInvalidFormat(s.to_owned()))
            }
            Some(captures) => Digest::validate(&captures["algorithm"], &captures["hex"]),
        }
    }

    /// Check an algorithm name and hex string which already match the digest
    /// grammar against the table of supported algorithms
    fn validate(algorithm_name: &str, hex: &str) -> Result<Self, ReferenceError> {
        let algorithm = match Algorithm::from_name(algorithm_name) {
            Some(algorithm) => algorithm,
            None => {
                log::debug!("unsupported digest algorithm, {:?}", algorithm_name);
                return Err(ReferenceError::DigestUnsupported(algorithm_name.to_owned()));
            }
        };
        if hex.len() != algorithm.hex_len() {
            log::debug!(
                "{} digest has {} hex digits, expected {}",
                algorithm,
                hex.len(),
                algorithm.hex_len()
            );
            return Err(ReferenceError::DigestInvalidLength {
                algorithm: algorithm.to_string(),
                expected: algorithm.hex_len(),
                found: hex.len(),
            });
        }
        Ok(Digest {
            serialized: format!("{}:{}", algorithm, hex),
            algorithm,
        })
    }

    /// Create a new [Digest] by hashing some content
    ///
    /// ```
    /// # use image_reference::{Algorithm, Digest};
    /// let digest = Digest::from_content(Algorithm::Sha256, b"cat");
    /// assert_eq!(digest.as_str(), "sha256:77af778b51abd4a3c51c5ddd97204a9c3ae614ebccb75a606c3b6865aed6744e");
    /// ```
    pub fn from_content(algorithm: Algorithm, content_bytes: &[u8]) -> Self {
        let hex = match algorithm {
            Algorithm::Sha256 => format!("{:x}", Sha256::digest(content_bytes)),
            Algorithm::Sha384 => format!("{:x}", Sha384::digest(content_bytes)),
            Algorithm::Sha512 => format!("{:x}", Sha512::digest(content_bytes)),
        };
        Digest {
            serialized: format!("{}:{}", algorithm, hex),
            algorithm,
        }
    }

    /// Does this digest match the hash of some content?
    pub fn verify(&self, content_bytes: &[u8]) -> bool {
        Digest::from_content(self.algorithm, content_bytes) == *self
    }

    /// The supported algorithm named before the colon
    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    /// Return a reference to the hexadecimal string portion of this digest.
    ///
    /// Its length always equals [Algorithm::hex_len] for this digest's
    /// algorithm.
    pub fn hex(&self) -> &str {
        &self.serialized[self.algorithm.as_str().len() + 1..]
    }
}

impl Eq for Digest {}

impl PartialEq for Digest {
    fn eq(&self, other: &Self) -> bool {
        self.serialized.eq(&other.serialized)
    }
}

impl FromStr for Digest {
    type Err = ReferenceError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Digest::parse(s)
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl fmt::Debug for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self)
    }
}

impl Hash for Digest {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.serialized.hash(state);
    }
}

impl Ord for Digest {
    fn cmp(&self, other: &Self) -> Ordering {
        self.serialized.cmp(&other.serialized)
    }
}

impl PartialOrd for Digest {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.serialized.partial_cmp(&other.serialized)
    }
}

impl Serialize for Digest {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Digest {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Digest::parse(&s).map_err(de::Error::custom)
    }
}
