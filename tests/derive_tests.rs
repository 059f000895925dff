//! Integration tests for the `StateTag` derive macro.
//!
//! These tests verify the generated conversions by using them on local enums
//! and on the crate's own `Species` and `Phase`.

use kinetics::{Phase, Species, StateTag};

// ============================================================================
// Local enums
// ============================================================================

#[derive(StateTag, Clone, Copy, PartialEq, Debug)]
enum Signal {
    Idle,
    Charging,
    Firing,
}

#[test]
fn test_state_tag_into_u32() {
    let idle: u32 = Signal::Idle.into();
    let charging: u32 = Signal::Charging.into();
    let firing: u32 = Signal::Firing.into();

    assert_eq!(idle, 0);
    assert_eq!(charging, 1);
    assert_eq!(firing, 2);
}

#[test]
fn test_state_tag_from_u32() {
    let idle: Signal = 0u32.into();
    let charging: Signal = 1u32.into();
    let firing: Signal = 2u32.into();

    assert_eq!(idle, Signal::Idle);
    assert_eq!(charging, Signal::Charging);
    assert_eq!(firing, Signal::Firing);
}

#[test]
fn test_state_tag_invalid_u32_defaults_to_first() {
    let invalid: Signal = 99u32.into();
    assert_eq!(invalid, Signal::Idle);
}

#[test]
fn test_state_tag_count_and_all() {
    assert_eq!(Signal::count(), 3);
    assert_eq!(Signal::ALL, [Signal::Idle, Signal::Charging, Signal::Firing]);
}

#[test]
fn test_state_tag_name() {
    assert_eq!(Signal::Charging.name(), "Charging");
}

#[derive(StateTag, Clone, Copy, PartialEq, Debug)]
enum Single {
    Only,
}

#[test]
fn test_single_variant_state_tag() {
    let only: u32 = Single::Only.into();
    assert_eq!(only, 0);
    assert_eq!(Single::count(), 1);

    let back: Single = 5u32.into();
    assert_eq!(back, Single::Only);
}

#[derive(StateTag, Clone, Copy, PartialEq, Debug)]
#[allow(dead_code)]
enum Explicit {
    Low = 10,
    High = 20,
}

#[test]
fn test_explicit_discriminants_are_ignored() {
    // Tags follow declaration order, not the discriminant
    assert_eq!(u32::from(Explicit::Low), 0);
    assert_eq!(u32::from(Explicit::High), 1);
}

// ============================================================================
// Crate enums
// ============================================================================

#[test]
fn test_species_round_trip_through_tags() {
    for species in Species::ALL {
        let tag: u32 = species.into();
        assert_eq!(Species::from(tag), species);
    }
    assert_eq!(Species::count(), 4);
    assert_eq!(Species::from(99u32), Species::Neutral);
}

#[test]
fn test_phase_tags_follow_ordering() {
    let tags: Vec<u32> = Phase::ALL.iter().map(|&p| p.into()).collect();
    assert_eq!(tags, vec![0, 1, 2, 3]);
    assert_eq!(Phase::Plasma.name(), "Plasma");
}
