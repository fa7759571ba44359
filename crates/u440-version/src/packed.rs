use std::fmt::{self, Display, Formatter};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
#[cfg(feature = "tracing")]
use tracing::{debug, trace};

use crate::scheme::{Field, MaskScheme};
use crate::version::{Component, ReleaseType, Version};

/// The tag of the dev, pre or post component stored in a merged slot.
///
/// The ordinals follow PEP 440 precedence for the same release: `.devN` < `aN` < `bN` < `rcN` <
/// final < `.postN`. `0` and `7` are reserved.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ExtraKind {
    Dev = 1,
    Alpha = 2,
    Beta = 3,
    Rc = 4,
    Final = 5,
    Post = 6,
}

impl ExtraKind {
    pub const fn ordinal(self) -> u64 {
        self as u64
    }

    pub const fn from_ordinal(ordinal: u64) -> Option<Self> {
        match ordinal {
            1 => Some(Self::Dev),
            2 => Some(Self::Alpha),
            3 => Some(Self::Beta),
            4 => Some(Self::Rc),
            5 => Some(Self::Final),
            6 => Some(Self::Post),
            _ => None,
        }
    }

    /// The single extra component of `version` and its number, or `None` if it has more than
    /// one. A version without any is [`ExtraKind::Final`] with number `0`.
    pub fn of(version: &Version) -> Option<(Self, u64)> {
        let components = [
            version.dev().map(|number| (Self::Dev, number)),
            version
                .pre()
                .map(|(release_type, number)| (Self::from(release_type), number)),
            version.post().map(|number| (Self::Post, number)),
        ];
        let mut present = components.into_iter().flatten();
        match (present.next(), present.next()) {
            (None, _) => Some((Self::Final, 0)),
            (Some(extra), None) => Some(extra),
            (Some(_), Some(_)) => None,
        }
    }
}

impl From<ReleaseType> for ExtraKind {
    fn from(release_type: ReleaseType) -> Self {
        match release_type {
            ReleaseType::Alpha => Self::Alpha,
            ReleaseType::Beta => Self::Beta,
            ReleaseType::Rc => Self::Rc,
            ReleaseType::Final => Self::Final,
        }
    }
}

/// A version packed under a [`MaskScheme`].
///
/// Only packed values of the same scheme can be compared meaningfully.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct PackedVersion(u64);

impl PackedVersion {
    pub const fn from_u64(bits: u64) -> Self {
        Self(bits)
    }

    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl From<PackedVersion> for u64 {
    fn from(packed: PackedVersion) -> Self {
        packed.0
    }
}

impl Display for PackedVersion {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Display::fmt(&self.0, f)
    }
}

/// Renders the packed word, e.g. `{:064b}` for the full width.
impl fmt::Binary for PackedVersion {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        fmt::Binary::fmt(&self.0, f)
    }
}

impl MaskScheme {
    /// Pack `version` under this scheme, or `None` if it has no representation.
    pub fn encode(self, version: &Version) -> Option<PackedVersion> {
        self.try_encode(version).ok()
    }

    /// Pack `version` under this scheme, reporting why it has no representation.
    ///
    /// Never truncates: a field that doesn't fit is an error.
    pub fn try_encode(self, version: &Version) -> Result<PackedVersion, NoRepresentation> {
        let result = self.pack(version);
        #[cfg(feature = "tracing")]
        match &result {
            Ok(packed) => trace!("Packed `{version}` under `{self}` as {:#018x}", packed.as_u64()),
            Err(err) => debug!("`{version}` has no `{self}` representation: {err}"),
        }
        result
    }

    fn pack(self, version: &Version) -> Result<PackedVersion, NoRepresentation> {
        let slots = self.release_slots();
        if version.release().len() > slots {
            return Err(NoRepresentation::TooManySegments {
                scheme: self,
                segments: version.release().len(),
                slots,
            });
        }

        let extra =
            || ExtraKind::of(version).ok_or(NoRepresentation::AmbiguousExtra { scheme: self });

        let mut packed = 0u64;
        for descriptor in self.fields() {
            let value = match descriptor.field {
                Field::Epoch => version.epoch(),
                Field::Release(index) => {
                    version.release().get(index).copied().unwrap_or_default()
                }
                Field::NotDev => u64::from(!version.is_dev()),
                Field::HasPost => u64::from(version.is_post()),
                Field::PreKind => version.release_type().ordinal(),
                Field::DevNumber => version.dev().unwrap_or_default(),
                Field::PostNumber => version.post().unwrap_or_default(),
                Field::PreNumber => version.pre_number().unwrap_or_default(),
                Field::ExtraKind => extra()?.0.ordinal(),
                Field::ExtraNumber => extra()?.1,
            };
            if value > descriptor.mask {
                if let Some(digits) = oversized_digits(version, descriptor.field) {
                    return Err(NoRepresentation::NumberTooLarge {
                        scheme: self,
                        field: descriptor.field,
                        digits: digits.to_string(),
                        max: descriptor.mask,
                    });
                }
                return Err(NoRepresentation::FieldOverflow {
                    scheme: self,
                    field: descriptor.field,
                    value,
                    max: descriptor.mask,
                });
            }
            packed |= (value & descriptor.mask) << descriptor.shift;
        }
        Ok(PackedVersion(packed))
    }

    /// Unpack a value produced by [`MaskScheme::encode`].
    ///
    /// Trailing zero release segments are dropped (keeping at least one) and the local segment
    /// is lost, so the result packs to the same value but may differ from the original version.
    pub fn decode(self, packed: PackedVersion) -> Result<Version, DecodeError> {
        let bits = packed.as_u64();
        let stray = bits & !self.used_bits();
        if stray != 0 {
            return Err(DecodeError::UnusedBits {
                scheme: self,
                bits: stray,
            });
        }

        let mut unpacked = Unpacked {
            release: vec![0; self.release_slots()],
            ..Unpacked::default()
        };
        for descriptor in self.fields() {
            let value = (bits >> descriptor.shift) & descriptor.mask;
            match descriptor.field {
                Field::Epoch => unpacked.epoch = value,
                Field::Release(index) => {
                    if let Some(segment) = unpacked.release.get_mut(index) {
                        *segment = value;
                    }
                }
                Field::NotDev => unpacked.has_dev = value == 0,
                Field::HasPost => unpacked.has_post = value == 1,
                Field::PreKind => {
                    unpacked.release_type =
                        ReleaseType::from_ordinal(value).unwrap_or(ReleaseType::Final);
                }
                Field::DevNumber => unpacked.dev = value,
                Field::PostNumber => unpacked.post = value,
                Field::PreNumber => unpacked.pre = value,
                Field::ExtraKind => {
                    let kind =
                        ExtraKind::from_ordinal(value).ok_or(DecodeError::ReservedKind(value))?;
                    unpacked.extra_kind = Some(kind);
                }
                Field::ExtraNumber => unpacked.extra = value,
            }
        }
        unpacked.into_version()
    }
}

/// The digits stored in `field` when the version text holds a number beyond `u64`.
fn oversized_digits(version: &Version, field: Field) -> Option<&str> {
    let component = match field {
        Field::Epoch => Component::Epoch,
        Field::Release(index) => Component::Release(index),
        Field::DevNumber => Component::Dev,
        Field::PostNumber => Component::Post,
        Field::PreNumber => Component::Pre,
        Field::ExtraNumber => match ExtraKind::of(version)?.0 {
            ExtraKind::Dev => Component::Dev,
            ExtraKind::Alpha | ExtraKind::Beta | ExtraKind::Rc => Component::Pre,
            ExtraKind::Post => Component::Post,
            ExtraKind::Final => return None,
        },
        Field::NotDev | Field::HasPost | Field::PreKind | Field::ExtraKind => return None,
    };
    version.oversized(component)
}

/// The raw field values read back from a packed word.
#[derive(Default)]
struct Unpacked {
    epoch: u64,
    release: Vec<u64>,
    has_dev: bool,
    has_post: bool,
    release_type: ReleaseType,
    dev: u64,
    post: u64,
    pre: u64,
    extra_kind: Option<ExtraKind>,
    extra: u64,
}

impl Unpacked {
    fn into_version(self) -> Result<Version, DecodeError> {
        let mut release = self.release;
        while release.len() > 1 && release.last() == Some(&0) {
            release.pop();
        }
        let version = Version::new(release).with_epoch(self.epoch);

        if let Some(kind) = self.extra_kind {
            let number = self.extra;
            return Ok(match kind {
                ExtraKind::Dev => version.with_dev(Some(number)),
                ExtraKind::Alpha => version.with_pre(Some((ReleaseType::Alpha, number))),
                ExtraKind::Beta => version.with_pre(Some((ReleaseType::Beta, number))),
                ExtraKind::Rc => version.with_pre(Some((ReleaseType::Rc, number))),
                ExtraKind::Final if number != 0 => {
                    return Err(DecodeError::OrphanNumber {
                        field: Field::ExtraNumber,
                    });
                }
                ExtraKind::Final => version,
                ExtraKind::Post => version.with_post(Some(number)),
            });
        }

        let orphan = [
            (!self.has_dev && self.dev != 0, Field::DevNumber),
            (!self.has_post && self.post != 0, Field::PostNumber),
            (self.release_type.is_final() && self.pre != 0, Field::PreNumber),
        ];
        if let Some((_, field)) = orphan.into_iter().find(|(orphan, _)| *orphan) {
            return Err(DecodeError::OrphanNumber { field });
        }
        Ok(version
            .with_pre(Some((self.release_type, self.pre)))
            .with_post(self.has_post.then_some(self.post))
            .with_dev(self.has_dev.then_some(self.dev)))
    }
}

/// A structurally valid version that doesn't fit a [`MaskScheme`].
///
/// This is an expected outcome for unusual versions, not a bug.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NoRepresentation {
    #[error("{segments} release segments exceed the {slots} slots of the `{scheme}` scheme")]
    TooManySegments {
        scheme: MaskScheme,
        segments: usize,
        slots: usize,
    },
    #[error("The {field} {value} exceeds the maximum of {max} in the `{scheme}` scheme")]
    FieldOverflow {
        scheme: MaskScheme,
        field: Field,
        value: u64,
        max: u64,
    },
    /// The version text holds a number that doesn't even fit in a `u64`.
    #[error("The {field} {digits} exceeds the maximum of {max} in the `{scheme}` scheme")]
    NumberTooLarge {
        scheme: MaskScheme,
        field: Field,
        digits: String,
        max: u64,
    },
    #[error(
        "The `{scheme}` scheme stores only one of a dev, pre-release or post-release component"
    )]
    AmbiguousExtra { scheme: MaskScheme },
}

/// A packed word the encoder can't have produced.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    #[error("Packed value sets bits {bits:#x} outside of the `{scheme}` layout")]
    UnusedBits { scheme: MaskScheme, bits: u64 },
    #[error("Packed value uses the reserved dev/pre/post kind {0}")]
    ReservedKind(u64),
    #[error("Packed value has a non-zero {field} without the matching component")]
    OrphanNumber { field: Field },
}
