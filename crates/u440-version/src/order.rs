use std::cmp::Ordering;
use std::fmt::{Display, Formatter};

#[cfg(feature = "tracing")]
use tracing::debug;

use crate::packed::{NoRepresentation, PackedVersion};
use crate::scheme::MaskScheme;
use crate::version::Version;

/// The total order of versions under one [`MaskScheme`]: plain comparison of the packed
/// integers.
///
/// Every operation first checks that both sides have a representation and fails with
/// [`Incomparable`] otherwise.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct VersionOrder {
    scheme: MaskScheme,
}

impl VersionOrder {
    pub const fn new(scheme: MaskScheme) -> Self {
        Self { scheme }
    }

    pub const fn scheme(self) -> MaskScheme {
        self.scheme
    }

    /// The sort key of `version`.
    pub fn key(self, version: &Version) -> Result<PackedVersion, Incomparable> {
        self.scheme
            .try_encode(version)
            .map_err(|reason| Incomparable {
                version: version.to_string(),
                scheme: self.scheme,
                reason,
            })
    }

    pub fn compare(self, a: &Version, b: &Version) -> Result<Ordering, Incomparable> {
        Ok(self.key(a)?.cmp(&self.key(b)?))
    }

    pub fn equal(self, a: &Version, b: &Version) -> Result<bool, Incomparable> {
        Ok(self.compare(a, b)? == Ordering::Equal)
    }

    pub fn less_than(self, a: &Version, b: &Version) -> Result<bool, Incomparable> {
        Ok(self.compare(a, b)? == Ordering::Less)
    }

    /// Sort `versions` ascending. The sort is stable: equal versions keep their input order.
    ///
    /// Each version is packed exactly once.
    pub fn sort(
        self,
        versions: impl IntoIterator<Item = Version>,
    ) -> Result<SortedVersions, Incomparable> {
        self.sort_keyed(
            versions
                .into_iter()
                .map(|version| (self.key(&version), version)),
        )
    }

    /// Sort versions paired with their [`VersionOrder::key`] under this order, without packing
    /// them again.
    ///
    /// Fails with the first incomparable version in input order.
    pub fn sort_keyed(
        self,
        keyed: impl IntoIterator<Item = (Result<PackedVersion, Incomparable>, Version)>,
    ) -> Result<SortedVersions, Incomparable> {
        let mut entries = keyed
            .into_iter()
            .map(|(key, version)| Ok((key?, version)))
            .collect::<Result<Vec<_>, Incomparable>>()?;
        entries.sort_by_key(|(packed, _)| *packed);
        #[cfg(feature = "tracing")]
        debug!("Sorted {} versions under `{}`", entries.len(), self.scheme);
        Ok(SortedVersions {
            scheme: self.scheme,
            entries,
        })
    }
}

/// Compare two versions under `scheme`.
pub fn compare(a: &Version, b: &Version, scheme: MaskScheme) -> Result<Ordering, Incomparable> {
    VersionOrder::new(scheme).compare(a, b)
}

/// Whether two versions pack to the same value under `scheme`.
pub fn equal(a: &Version, b: &Version, scheme: MaskScheme) -> Result<bool, Incomparable> {
    VersionOrder::new(scheme).equal(a, b)
}

pub fn less_than(a: &Version, b: &Version, scheme: MaskScheme) -> Result<bool, Incomparable> {
    VersionOrder::new(scheme).less_than(a, b)
}

/// Stable ascending sort under `scheme`.
pub fn sort(
    versions: impl IntoIterator<Item = Version>,
    scheme: MaskScheme,
) -> Result<SortedVersions, Incomparable> {
    VersionOrder::new(scheme).sort(versions)
}

/// Render the sorted `versions` as a chain such as `1.0 = 1.0.0 < 2.0`.
pub fn display_ordered(
    versions: impl IntoIterator<Item = Version>,
    scheme: MaskScheme,
) -> Result<String, Incomparable> {
    Ok(sort(versions, scheme)?.to_string())
}

/// Versions in ascending packed order, alongside their packed values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortedVersions {
    scheme: MaskScheme,
    entries: Vec<(PackedVersion, Version)>,
}

impl SortedVersions {
    pub fn scheme(&self) -> MaskScheme {
        self.scheme
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (PackedVersion, &Version)> {
        self.entries.iter().map(|(packed, version)| (*packed, version))
    }

    pub fn into_versions(self) -> Vec<Version> {
        self.entries.into_iter().map(|(_, version)| version).collect()
    }
}

/// Joins neighbours with `=` when they pack to the same value and `<` otherwise.
impl Display for SortedVersions {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let mut previous = None;
        for (packed, version) in self.iter() {
            match previous {
                None => write!(f, "{version}")?,
                Some(previous) if previous == packed => write!(f, " = {version}")?,
                Some(_) => write!(f, " < {version}")?,
            }
            previous = Some(packed);
        }
        Ok(())
    }
}

/// An attempt to order a version that has no representation under the scheme in use.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Can't order `{version}` under the `{scheme}` scheme")]
pub struct Incomparable {
    version: String,
    scheme: MaskScheme,
    #[source]
    reason: NoRepresentation,
}

impl Incomparable {
    /// The normalized form of the version without a representation.
    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn scheme(&self) -> MaskScheme {
        self.scheme
    }

    pub fn reason(&self) -> &NoRepresentation {
        &self.reason
    }
}
