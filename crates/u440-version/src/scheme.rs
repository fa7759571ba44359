use std::fmt::{Display, Formatter};
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The source of the value stored in one bit range of a [`MaskScheme`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Field {
    /// The version epoch.
    Epoch,
    /// The release segment at the given index, `0` when the release is shorter.
    Release(usize),
    /// `0` when a dev marker is present, `1` otherwise, so dev releases sort first.
    NotDev,
    /// `1` when a post marker is present.
    HasPost,
    /// The pre-release type: `a` = 0, `b` = 1, `rc` = 2, final = 3.
    PreKind,
    DevNumber,
    PostNumber,
    PreNumber,
    /// The [`ExtraKind`](crate::ExtraKind) of the single dev, pre or post component.
    ExtraKind,
    /// The number of the single dev, pre or post component.
    ExtraNumber,
}

impl Display for Field {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Epoch => f.write_str("epoch"),
            Self::Release(index) => write!(f, "release segment {index}"),
            Self::NotDev => f.write_str("dev flag"),
            Self::HasPost => f.write_str("post flag"),
            Self::PreKind => f.write_str("pre-release type"),
            Self::DevNumber => f.write_str("dev number"),
            Self::PostNumber => f.write_str("post-release number"),
            Self::PreNumber => f.write_str("pre-release number"),
            Self::ExtraKind => f.write_str("dev/pre/post kind"),
            Self::ExtraNumber => f.write_str("dev/pre/post number"),
        }
    }
}

/// Where a [`Field`] lives in the packed word: `(value & mask) << shift`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct FieldDescriptor {
    pub field: Field,
    /// The largest storable value; a contiguous run of low bits. `0` means the scheme has no room
    /// for the field, so only a zero value is representable.
    pub mask: u64,
    pub shift: u32,
}

impl FieldDescriptor {
    const fn new(field: Field, mask: u64, shift: u32) -> Self {
        Self { field, mask, shift }
    }

    /// The width of the field in bits.
    pub const fn bits(self) -> u32 {
        self.mask.count_ones()
    }

    /// The bits of the packed word occupied by this field.
    pub const fn range(self) -> u64 {
        self.mask << self.shift
    }
}

/// First attempt at a universal layout, with all the features of PEP 440 combined: separate
/// slots for the pre, post and dev numbers plus their presence flags. Only uses 56 of the 64
/// bits.
const U56_FIELDS: &[FieldDescriptor] = &[
    FieldDescriptor::new(Field::Epoch, 0x3, 62),         // 2-bit = 0..3
    FieldDescriptor::new(Field::Release(0), 0x3FFF, 48), // 14-bit = 0..16383
    FieldDescriptor::new(Field::Release(1), 0xFF, 40),   // 8-bit = 0..255
    FieldDescriptor::new(Field::Release(2), 0xFF, 32),   // 8-bit = 0..255
    FieldDescriptor::new(Field::Release(3), 0xFF, 24),   // 8-bit = 0..255
    FieldDescriptor::new(Field::NotDev, 0x1, 23),        // 1-bit = dev, no dev
    FieldDescriptor::new(Field::HasPost, 0x1, 22),       // 1-bit = no post, post
    FieldDescriptor::new(Field::PreKind, 0x3, 20),       // 2-bit = a, b, rc, final
    FieldDescriptor::new(Field::DevNumber, 0xF, 16),     // 4-bit = 0..15
    FieldDescriptor::new(Field::PostNumber, 0xF, 12),    // 4-bit = 0..15
    FieldDescriptor::new(Field::PreNumber, 0xF, 8),      // 4-bit = 0..15
];

/// Only one extra version component (dev, a, b, rc or post), tagged by a 3-bit kind. All
/// numbers get 12 bits, which represents most release segments seen in the wild.
const U64_FIELDS: &[FieldDescriptor] = &[
    FieldDescriptor::new(Field::Epoch, 0x0, 0),         // 0-bit = 0
    FieldDescriptor::new(Field::Release(0), 0xFFF, 52), // 12-bit = 0..4095
    FieldDescriptor::new(Field::Release(1), 0xFFF, 40), // 12-bit = 0..4095
    FieldDescriptor::new(Field::Release(2), 0xFFF, 28), // 12-bit = 0..4095
    FieldDescriptor::new(Field::Release(3), 0xFFF, 16), // 12-bit = 0..4095
    FieldDescriptor::new(Field::ExtraKind, 0x7, 12),    // 3-bit = 1..6
    FieldDescriptor::new(Field::ExtraNumber, 0xFFF, 0), // 12-bit = 0..4095
];

/// The uv layout: a wide first segment and a 21-bit extra number, which fits `YYYYMM` style
/// dev/pre/post numbers.
const UV64_FIELDS: &[FieldDescriptor] = &[
    FieldDescriptor::new(Field::Epoch, 0x0, 0),             // 0-bit = 0
    FieldDescriptor::new(Field::Release(0), 0xFFFF, 48),    // 16-bit = 0..65535
    FieldDescriptor::new(Field::Release(1), 0xFF, 40),      // 8-bit = 0..255
    FieldDescriptor::new(Field::Release(2), 0xFF, 32),      // 8-bit = 0..255
    FieldDescriptor::new(Field::Release(3), 0xFF, 24),      // 8-bit = 0..255
    FieldDescriptor::new(Field::ExtraKind, 0x7, 21),        // 3-bit = 1..6
    FieldDescriptor::new(Field::ExtraNumber, 0x1F_FFFF, 0), // 21-bit = 0..2097151
];

/// A named bit layout for packing a [`Version`](crate::Version) into a `u64`.
///
/// Within a scheme the fields are disjoint, ordered from the most significant (epoch, then
/// release segments left to right) to the least significant (the dev/pre/post numbers), so that
/// comparing packed integers compares versions.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum MaskScheme {
    /// Independent pre, post and dev slots with presence flags; 4-bit numbers.
    #[cfg_attr(feature = "clap", value(name = "u56"))]
    U56,
    /// A single dev, pre or post component; 12-bit numbers.
    #[default]
    #[cfg_attr(feature = "clap", value(name = "u64"))]
    U64,
    /// A single dev, pre or post component; wider first segment and extra number, no epoch.
    #[cfg_attr(feature = "clap", value(name = "uv64"))]
    Uv64,
}

impl MaskScheme {
    /// Every preset.
    pub const ALL: [Self; 3] = [Self::U56, Self::U64, Self::Uv64];

    pub fn name(self) -> &'static str {
        match self {
            Self::U56 => "u56",
            Self::U64 => "u64",
            Self::Uv64 => "uv64",
        }
    }

    /// The field descriptors of this scheme.
    pub fn fields(self) -> &'static [FieldDescriptor] {
        match self {
            Self::U56 => U56_FIELDS,
            Self::U64 => U64_FIELDS,
            Self::Uv64 => UV64_FIELDS,
        }
    }

    /// The number of release segments the scheme can store.
    pub fn release_slots(self) -> usize {
        self.fields()
            .iter()
            .filter(|descriptor| matches!(descriptor.field, Field::Release(_)))
            .count()
    }

    /// Whether the dev, pre and post components share one kind-tagged slot.
    pub fn has_merged_extra(self) -> bool {
        self.fields()
            .iter()
            .any(|descriptor| descriptor.field == Field::ExtraKind)
    }

    /// The union of all field ranges. Bits outside of it are always zero.
    pub fn used_bits(self) -> u64 {
        self.fields()
            .iter()
            .fold(0, |used, descriptor| used | descriptor.range())
    }
}

impl FromStr for MaskScheme {
    type Err = UnknownSchemeError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|scheme| scheme.name().eq_ignore_ascii_case(name))
            .ok_or_else(|| UnknownSchemeError(name.to_string()))
    }
}

impl Display for MaskScheme {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown mask scheme `{0}`, expected one of `u56`, `u64` or `uv64`")]
pub struct UnknownSchemeError(String);

#[cfg(test)]
mod tests;
