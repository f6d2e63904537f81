//! Tests for built-in and file-based domain profiles.

use std::io::Write;

use geotax_model::{DomainProfile, LabelFallback, ModelError};
use tempfile::NamedTempFile;

#[test]
fn builtin_profiles_load_and_validate() {
    for name in DomainProfile::builtin_names() {
        let profile = DomainProfile::builtin(name).expect("load builtin profile");
        assert_eq!(profile.name, name);
        profile.validate().expect("builtin profile is valid");
    }
}

#[test]
fn agriculture_profile_contents() {
    let profile = DomainProfile::builtin("agriculture").unwrap();
    assert_eq!(profile.taxonomy.fallback(), LabelFallback::Passthrough);
    assert_eq!(profile.taxonomy.canonical("Chicken hatchery"), "poultry_farm");
    assert_eq!(profile.taxonomy.canonical("Seafood farm"), "aquaculture_farm");
    assert!(profile.keywords.narrow.contains("livestock_farm"));
    assert!(!profile.keywords.reclassify.contains("livestock_farm"));
    let derived = profile.derived.expect("agriculture defines animal type");
    assert_eq!(derived.column, "animal_type");
    assert_eq!(derived.value_for(Some("shrimp_farm")), "fish");
    assert_eq!(derived.value_for(Some("multiple")), "other");
}

#[test]
fn laboratory_profile_slugs_labels() {
    let profile = DomainProfile::builtin("Laboratory").unwrap();
    assert_eq!(profile.taxonomy.fallback(), LabelFallback::Slug);
    assert_eq!(profile.taxonomy.canonical("Medical Laboratory"), "medical_laboratory");
    assert!(profile.derived.is_none());
    assert_eq!(profile.keywords.reclassify, profile.keywords.narrow);
}

#[test]
fn unknown_builtin_lists_available() {
    let err = DomainProfile::builtin("fisheries").unwrap_err();
    assert!(matches!(err, ModelError::UnknownProfile { .. }));
    insta::assert_snapshot!(
        err.to_string(),
        @"unknown profile 'fisheries' (built-in profiles: agriculture, laboratory)"
    );
}

#[test]
fn custom_profile_resolves_relative_boundaries() {
    let mut file = NamedTempFile::with_suffix(".toml").unwrap();
    write!(
        file,
        r#"
name = "bees"
[taxonomy]
"Apiary" = "apiary"
[keywords]
broad = ["apiary", "farm"]
narrow = ["apiary"]
reclassify = ["apiary"]
[boundaries]
path = "gadm41_PRT_2.json"
state_field = "REGION"
"#
    )
    .unwrap();

    let profile = DomainProfile::resolve(file.path().to_str().unwrap()).unwrap();
    assert_eq!(profile.name, "bees");
    let parent = file.path().parent().unwrap();
    assert_eq!(
        profile.boundaries.path.as_deref(),
        Some(parent.join("gadm41_PRT_2.json").as_path())
    );
    assert_eq!(profile.boundaries.country_field, "COUNTRY");
    assert_eq!(profile.boundaries.state_field, "REGION");
}

#[test]
fn custom_profile_rejects_unknown_keys() {
    let mut file = NamedTempFile::with_suffix(".toml").unwrap();
    write!(
        file,
        r#"
name = "typo"
[keywords]
broad = ["a"]
narrow = ["a"]
reclasify = ["a"]
"#
    )
    .unwrap();

    let err = DomainProfile::load(file.path()).unwrap_err();
    assert!(matches!(err, ModelError::Toml { .. }));
}
