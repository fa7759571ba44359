//! PEP 440 versions packed into order-preserving 64-bit integers.
//!
//! A [`Version`] is parsed once and then packed under one of the [`MaskScheme`] presets. For any
//! two versions that fit the scheme, comparing the packed integers gives the
//! [PEP 440](https://peps.python.org/pep-0440) order:
//!
//! ```rust
//! use u440_version::{MaskScheme, parse};
//!
//! let dev = parse("1.0.dev1").unwrap();
//! let alpha = parse("1.0a1").unwrap();
//! assert!(MaskScheme::U64.encode(&dev) < MaskScheme::U64.encode(&alpha));
//! ```
//!
//! Versions that don't fit a scheme (too many release segments, numbers too large for their bit
//! field, or more than one of dev/pre/post in a merged-slot scheme) have no representation:
//! [`MaskScheme::encode`] returns `None` and ordering them fails with [`Incomparable`] instead of
//! guessing a position.
//!
//! Packing is pure; the three schemes are constants and any number of threads may pack and
//! compare concurrently.

pub use {
    order::{
        Incomparable, SortedVersions, VersionOrder, compare, display_ordered, equal, less_than,
        sort,
    },
    packed::{DecodeError, ExtraKind, NoRepresentation, PackedVersion},
    scheme::{Field, FieldDescriptor, MaskScheme, UnknownSchemeError},
    version::{
        Component, ReleaseType, ReleaseTypeParseError, Version, VersionParseError, parse,
    },
};

mod order;
mod packed;
mod scheme;
mod version;
