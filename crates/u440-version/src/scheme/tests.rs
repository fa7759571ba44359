use std::str::FromStr;

use super::*;

#[test]
fn fields_are_disjoint() {
    for scheme in MaskScheme::ALL {
        let mut used = 0u64;
        for descriptor in scheme.fields() {
            // Contiguous low bits: `mask + 1` is a power of two.
            assert_eq!(
                descriptor.mask & descriptor.mask.wrapping_add(1),
                0,
                "{scheme} {}",
                descriptor.field
            );
            assert!(
                descriptor.mask == 0 || descriptor.shift + descriptor.bits() <= 64,
                "{scheme} {}",
                descriptor.field
            );
            assert_eq!(
                used & descriptor.range(),
                0,
                "{scheme} {}",
                descriptor.field
            );
            used |= descriptor.range();
        }
        assert_eq!(used, scheme.used_bits());
    }
}

/// Fields are listed from the most significant to the least significant.
#[test]
fn fields_descend() {
    for scheme in MaskScheme::ALL {
        let ranges: Vec<u64> = scheme
            .fields()
            .iter()
            .map(|descriptor| descriptor.range())
            .filter(|range| *range != 0)
            .collect();
        for pair in ranges.windows(2) {
            assert!(pair[0] > pair[1], "{scheme} {:#x} {:#x}", pair[0], pair[1]);
        }
    }
}

#[test]
fn used_bits() {
    assert_eq!(MaskScheme::U56.used_bits(), 0xFFFF_FFFF_FFFF_FF00);
    assert_eq!(MaskScheme::U56.used_bits().count_ones(), 56);
    assert_eq!(MaskScheme::U64.used_bits(), 0xFFFF_FFFF_FFFF_7FFF);
    assert_eq!(MaskScheme::Uv64.used_bits(), u64::MAX);
}

#[test]
fn release_slots() {
    for scheme in MaskScheme::ALL {
        assert_eq!(scheme.release_slots(), 4, "{scheme}");
    }
    assert!(!MaskScheme::U56.has_merged_extra());
    assert!(MaskScheme::U64.has_merged_extra());
    assert!(MaskScheme::Uv64.has_merged_extra());
}

#[test]
fn descriptor_widths() {
    let widths = |scheme: MaskScheme| {
        scheme
            .fields()
            .iter()
            .map(|descriptor| format!("{}: {}", descriptor.field, descriptor.bits()))
            .collect::<Vec<_>>()
            .join("\n")
    };
    insta::assert_snapshot!(widths(MaskScheme::U56), @r"
    epoch: 2
    release segment 0: 14
    release segment 1: 8
    release segment 2: 8
    release segment 3: 8
    dev flag: 1
    post flag: 1
    pre-release type: 2
    dev number: 4
    post-release number: 4
    pre-release number: 4
    ");
    insta::assert_snapshot!(widths(MaskScheme::U64), @r"
    epoch: 0
    release segment 0: 12
    release segment 1: 12
    release segment 2: 12
    release segment 3: 12
    dev/pre/post kind: 3
    dev/pre/post number: 12
    ");
    insta::assert_snapshot!(widths(MaskScheme::Uv64), @r"
    epoch: 0
    release segment 0: 16
    release segment 1: 8
    release segment 2: 8
    release segment 3: 8
    dev/pre/post kind: 3
    dev/pre/post number: 21
    ");
}

#[test]
fn scheme_names() {
    for scheme in MaskScheme::ALL {
        assert_eq!(MaskScheme::from_str(&scheme.to_string()).unwrap(), scheme);
    }
    assert_eq!(MaskScheme::from_str("UV64").unwrap(), MaskScheme::Uv64);
    assert_eq!(MaskScheme::default(), MaskScheme::U64);
    assert_eq!(
        MaskScheme::from_str("u128").unwrap_err().to_string(),
        "Unknown mask scheme `u128`, expected one of `u56`, `u64` or `uv64`"
    );
}

#[cfg(feature = "serde")]
#[test]
fn scheme_serde() {
    assert_eq!(
        serde_json::to_string(&MaskScheme::Uv64).unwrap(),
        r#""uv64""#
    );
    assert_eq!(
        serde_json::from_str::<MaskScheme>(r#""u56""#).unwrap(),
        MaskScheme::U56
    );
}
