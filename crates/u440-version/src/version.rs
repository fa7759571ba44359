use std::borrow::Borrow;
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use std::sync::LazyLock;

use regex::{Captures, Regex};
#[cfg(feature = "serde")]
use serde::{Deserialize, Deserializer, Serialize, Serializer, de};

/// A regex copied from <https://peps.python.org/pep-0440/#appendix-b-parsing-version-strings-with-regular-expressions>,
/// extended to accept a post release after the dev release (`1.0.dev1.post1`)
pub(crate) const VERSION_RE_INNER: &str = r"
(?:
    (?:v?)                                            # <https://peps.python.org/pep-0440/#preceding-v-character>
    (?:(?P<epoch>[0-9]+)!)?                           # epoch
    (?P<release>[0-9]+(?:\.[0-9]+)*)                  # release segment
    (?P<pre_field>                                    # pre-release
        [-_\.]?
        (?P<pre_name>(a|b|c|rc|alpha|beta|pre|preview))
        [-_\.]?
        (?P<pre>[0-9]+)?
    )?
    (?P<post_field>                                   # post release
        (?:-(?P<post_old>[0-9]+))
        |
        (?:
            [-_\.]?
            (?P<post_l>post|rev|r)
            [-_\.]?
            (?P<post_new>[0-9]+)?
        )
    )?
    (?P<dev_field>                                    # dev release
        [-_\.]?
        (?P<dev_l>dev)
        [-_\.]?
        (?P<dev>[0-9]+)?
    )?
    (?P<late_post_field>                              # post release spelled after the dev release
        [-_\.]?
        (?P<late_post_l>post|rev|r)
        [-_\.]?
        (?P<late_post>[0-9]+)?
    )?
)
(?:\+(?P<local>[a-z0-9]+(?:[-_\.][a-z0-9]+)*))?       # local version
";

/// Matches a python version, such as `1.19.a1`. Based on the PEP 440 regex
static VERSION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"(?xi)^(?:\s*){VERSION_RE_INNER}(?:\s*)$")).unwrap()
});

/// Parse a version such as `1.19`, `1.0a1`, `1.0+abc.5` or `1!2012.2`.
pub fn parse(version: &str) -> Result<Version, VersionParseError> {
    Version::from_str(version)
}

/// The kind of a version's [pre-release](https://peps.python.org/pep-0440/#pre-releases), with
/// [`ReleaseType::Final`] standing for "no pre-release marker".
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ReleaseType {
    /// alpha prerelease
    Alpha,
    /// beta prerelease
    Beta,
    /// release candidate prerelease
    Rc,
    /// not a prerelease
    #[default]
    Final,
}

impl ReleaseType {
    /// The two-bit ordinal stored by schemes with a dedicated pre-release type flag.
    pub(crate) const fn ordinal(self) -> u64 {
        match self {
            Self::Alpha => 0,
            Self::Beta => 1,
            Self::Rc => 2,
            Self::Final => 3,
        }
    }

    pub(crate) const fn from_ordinal(ordinal: u64) -> Option<Self> {
        match ordinal {
            0 => Some(Self::Alpha),
            1 => Some(Self::Beta),
            2 => Some(Self::Rc),
            3 => Some(Self::Final),
            _ => None,
        }
    }

    /// Returns `true` for [`ReleaseType::Final`].
    pub fn is_final(self) -> bool {
        self == Self::Final
    }

    /// The canonical spelling, as used in normalized versions.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Alpha => "a",
            Self::Beta => "b",
            Self::Rc => "rc",
            Self::Final => "final",
        }
    }
}

impl FromStr for ReleaseType {
    type Err = ReleaseTypeParseError;

    fn from_str(release_type: &str) -> Result<Self, Self::Err> {
        match release_type.to_ascii_lowercase().as_str() {
            "a" | "alpha" => Ok(Self::Alpha),
            "b" | "beta" => Ok(Self::Beta),
            "c" | "rc" | "pre" | "preview" => Ok(Self::Rc),
            "final" => Ok(Self::Final),
            _ => Err(ReleaseTypeParseError(release_type.to_string())),
        }
    }
}

impl Display for ReleaseType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A numeric part of a version, used to locate numbers that don't fit in a `u64`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Component {
    Epoch,
    /// The release segment at this index.
    Release(usize),
    Pre,
    Post,
    Dev,
}

/// An unknown pre-release spelling.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("`{0}` isn't recognized as alpha, beta, release candidate or final")]
pub struct ReleaseTypeParseError(String);

/// A version number such as `1.2.3` or `4!5.6.7-a8.post9.dev0`, in canonical form.
///
/// A `Version` is only a value: it has no ordering of its own. Versions are ordered by packing
/// them under a [`MaskScheme`](crate::MaskScheme), see [`VersionOrder`](crate::VersionOrder).
///
/// Parse with [`Version::from_str`] or [`parse`]:
///
/// ```rust
/// use std::str::FromStr;
/// use u440_version::Version;
///
/// let version = Version::from_str("1.19").unwrap();
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Version {
    /// The [versioning epoch](https://peps.python.org/pep-0440/#version-epochs). Normally just 0,
    /// but you can increment it if you switched the versioning scheme.
    epoch: u64,
    /// The normal number part of the version, such a `1.2.3` in `4!1.2.3-a8.post9.dev1`. Never
    /// empty.
    release: Vec<u64>,
    release_type: ReleaseType,
    /// Only set when `release_type` isn't [`ReleaseType::Final`].
    pre: Option<u64>,
    post: Option<u64>,
    dev: Option<u64>,
    /// The raw local version label, such as `deadbeef` in `1.2.3+deadbeef`. Never interpreted.
    local: Option<String>,
    /// Digits of the numbers that don't fit in a `u64`, without leading zeros, in text order. The
    /// numeric field itself holds `u64::MAX`.
    oversized: Vec<(Component, Box<str>)>,
}

impl Version {
    /// Create a final release version such as `3.8`.
    ///
    /// An empty release is treated as `0`.
    pub fn new<I, R>(release: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: Borrow<u64>,
    {
        let mut release: Vec<u64> = release.into_iter().map(|segment| *segment.borrow()).collect();
        if release.is_empty() {
            release.push(0);
        }
        Self {
            epoch: 0,
            release,
            release_type: ReleaseType::Final,
            pre: None,
            post: None,
            dev: None,
            local: None,
            oversized: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_epoch(mut self, epoch: u64) -> Self {
        self.epoch = epoch;
        self.forget_oversized(Component::Epoch);
        self
    }

    /// Set the pre-release. A [`ReleaseType::Final`] pre-release clears it.
    #[must_use]
    pub fn with_pre(mut self, pre: Option<(ReleaseType, u64)>) -> Self {
        self.forget_oversized(Component::Pre);
        match pre {
            Some((release_type, number)) if !release_type.is_final() => {
                self.release_type = release_type;
                self.pre = Some(number);
            }
            _ => {
                self.release_type = ReleaseType::Final;
                self.pre = None;
            }
        }
        self
    }

    #[must_use]
    pub fn with_post(mut self, post: Option<u64>) -> Self {
        self.post = post;
        self.forget_oversized(Component::Post);
        self
    }

    #[must_use]
    pub fn with_dev(mut self, dev: Option<u64>) -> Self {
        self.dev = dev;
        self.forget_oversized(Component::Dev);
        self
    }

    #[must_use]
    pub fn with_local(mut self, local: Option<String>) -> Self {
        self.local = local;
        self
    }

    /// The same version with the local segment removed.
    #[must_use]
    pub fn without_local(&self) -> Self {
        Self {
            local: None,
            ..self.clone()
        }
    }

    /// Numbers larger than `u64::MAX` read as `u64::MAX`, see [`Version::oversized`].
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn release(&self) -> &[u64] {
        &self.release
    }

    pub fn release_type(&self) -> ReleaseType {
        self.release_type
    }

    /// The pre-release number, `None` for final releases.
    pub fn pre_number(&self) -> Option<u64> {
        self.pre
    }

    /// The pre-release type and number, `None` for final releases.
    pub fn pre(&self) -> Option<(ReleaseType, u64)> {
        self.pre.map(|number| (self.release_type, number))
    }

    pub fn post(&self) -> Option<u64> {
        self.post
    }

    pub fn dev(&self) -> Option<u64> {
        self.dev
    }

    pub fn local(&self) -> Option<&str> {
        self.local.as_deref()
    }

    /// The digits of `component` when the number in the text doesn't fit in a `u64`.
    ///
    /// ```rust
    /// use u440_version::{Component, Version};
    ///
    /// let version: Version = "1.0.post0099999999999999999999".parse().unwrap();
    /// assert_eq!(version.post(), Some(u64::MAX));
    /// assert_eq!(version.oversized(Component::Post), Some("99999999999999999999"));
    /// ```
    pub fn oversized(&self, component: Component) -> Option<&str> {
        self.oversized
            .iter()
            .find(|(oversized, _)| *oversized == component)
            .map(|(_, digits)| digits.as_ref())
    }

    /// Whether any number in the text doesn't fit in a `u64`.
    pub fn is_oversized(&self) -> bool {
        !self.oversized.is_empty()
    }

    fn forget_oversized(&mut self, component: Component) {
        self.oversized.retain(|(oversized, _)| *oversized != component);
    }

    /// Write a number, or its original digits when it doesn't fit in a `u64`.
    fn write_number(
        &self,
        f: &mut Formatter<'_>,
        component: Component,
        number: u64,
    ) -> std::fmt::Result {
        match self.oversized(component) {
            Some(digits) => f.write_str(digits),
            None => write!(f, "{number}"),
        }
    }

    /// Whether this is an alpha/beta/rc or dev version
    pub fn any_prerelease(&self) -> bool {
        self.is_pre() || self.is_dev()
    }

    /// Whether this is an alpha/beta/rc version
    pub fn is_pre(&self) -> bool {
        self.pre.is_some()
    }

    pub fn is_dev(&self) -> bool {
        self.dev.is_some()
    }

    pub fn is_post(&self) -> bool {
        self.post.is_some()
    }

    /// Whether this is a local version (e.g. `1.2.3+localsuffixesareweird`)
    pub fn is_local(&self) -> bool {
        self.local.is_some()
    }

    /// The canonical display form, e.g. `1.0a1.post2.dev3+local`.
    ///
    /// Two versions that differ in any field but the local segment normalize differently.
    pub fn normalize(&self) -> String {
        self.to_string()
    }

    /// Build the canonical version from the captures of [`VERSION_RE`].
    fn from_captures(version: &str, captures: &Captures) -> Result<Self, VersionParseError> {
        let mut oversized = Vec::new();

        // "If no explicit epoch is given, the implicit epoch is 0"
        let epoch = captures
            .name("epoch")
            .map(|digits| parse_number(Component::Epoch, digits.as_str(), &mut oversized))
            .unwrap_or_default();
        let release = captures
            .name("release")
            .ok_or_else(|| VersionParseError::InvalidVersionText(version.to_string()))?
            .as_str()
            .split('.')
            .enumerate()
            .map(|(index, segment)| {
                parse_number(Component::Release(index), segment, &mut oversized)
            })
            .collect::<Vec<u64>>();
        let release_type = captures
            .name("pre_name")
            .map(|name| ReleaseType::from_str(name.as_str()))
            .transpose()
            // Shouldn't fail due to the regex
            .map_err(|_| VersionParseError::InvalidVersionText(version.to_string()))?
            .unwrap_or(ReleaseType::Final);
        // <https://peps.python.org/pep-0440/#implicit-pre-release-number>
        let pre = if release_type.is_final() {
            None
        } else {
            Some(
                captures
                    .name("pre")
                    .map(|digits| parse_number(Component::Pre, digits.as_str(), &mut oversized))
                    .unwrap_or_default(),
            )
        };
        let post_digits = match (
            captures.name("post_field").is_some(),
            captures.name("late_post_field").is_some(),
        ) {
            (true, false) => Some(
                captures
                    .name("post_new")
                    .or_else(|| captures.name("post_old")),
            ),
            (false, true) => Some(captures.name("late_post")),
            (false, false) => None,
            // Two post releases, e.g. `1.0.post1.post2`
            (true, true) => {
                return Err(VersionParseError::InvalidVersionText(version.to_string()));
            }
        };
        // While PEP 440 says .post is "followed by a non-negative integer value",
        // packaging defaults it to 0
        let post = post_digits.map(|digits| {
            digits
                .map(|digits| parse_number(Component::Post, digits.as_str(), &mut oversized))
                .unwrap_or_default()
        });
        let dev = if captures.name("dev_field").is_some() {
            // <https://peps.python.org/pep-0440/#implicit-development-release-number>
            Some(
                captures
                    .name("dev")
                    .map(|digits| parse_number(Component::Dev, digits.as_str(), &mut oversized))
                    .unwrap_or_default(),
            )
        } else {
            None
        };
        let local = captures
            .name("local")
            .map(|local| local.as_str().to_string());

        Ok(Self {
            epoch,
            release,
            release_type,
            pre,
            post,
            dev,
            local,
            oversized,
        })
    }
}

/// Parse a digit run matched by [`VERSION_RE`].
///
/// A number that doesn't fit in a `u64` reads as `u64::MAX`, and its digits are kept in
/// `oversized`.
fn parse_number(
    component: Component,
    digits: &str,
    oversized: &mut Vec<(Component, Box<str>)>,
) -> u64 {
    // The regex only matches ASCII digits, so parsing can only fail on overflow
    digits.parse::<u64>().unwrap_or_else(|_| {
        oversized.push((component, digits.trim_start_matches('0').into()));
        u64::MAX
    })
}

impl FromStr for Version {
    type Err = VersionParseError;

    /// Parses a version such as `1.19`, `1.0a1`,`1.0+abc.5` or `1!2012.2`
    fn from_str(version: &str) -> Result<Self, Self::Err> {
        let captures = VERSION_RE
            .captures(version)
            .ok_or_else(|| VersionParseError::InvalidVersionText(version.to_string()))?;
        Self::from_captures(version, &captures)
    }
}

/// Shows normalized version
impl Display for Version {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.epoch != 0 {
            self.write_number(f, Component::Epoch, self.epoch)?;
            f.write_str("!")?;
        }
        for (index, segment) in self.release.iter().enumerate() {
            if index > 0 {
                f.write_str(".")?;
            }
            self.write_number(f, Component::Release(index), *segment)?;
        }
        if let Some((release_type, number)) = self.pre() {
            write!(f, "{release_type}")?;
            self.write_number(f, Component::Pre, number)?;
        }
        if let Some(post) = self.post {
            f.write_str(".post")?;
            self.write_number(f, Component::Post, post)?;
        }
        if let Some(dev) = self.dev {
            f.write_str(".dev")?;
            self.write_number(f, Component::Dev, dev)?;
        }
        if let Some(local) = &self.local {
            write!(f, "+{local}")?;
        }
        Ok(())
    }
}

/// <https://github.com/serde-rs/serde/issues/1316#issue-332908452>
#[cfg(feature = "serde")]
impl<'de> Deserialize<'de> for Version {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        FromStr::from_str(&s).map_err(de::Error::custom)
    }
}

/// <https://github.com/serde-rs/serde/issues/1316#issue-332908452>
#[cfg(feature = "serde")]
impl Serialize for Version {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

/// A version text that can't be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VersionParseError {
    #[error("Version `{0}` doesn't match PEP 440 rules")]
    InvalidVersionText(String),
}
