//! Typed settings view: defaults and validation.

use sdc_config::{load_layered_yaml_from_strings, Settings, DEFAULT_PRODUCT_DISPLAY_NAMES};

#[test]
fn empty_settings_use_defaults() {
    let s = load_layered_yaml_from_strings(&[]).unwrap().settings().unwrap();

    assert_eq!(s, Settings::default());
    assert_eq!(s.trust_zone.escalated_subkey, "EscDomains");
    assert_eq!(s.trust_zone.normal_subkey, "Domains");
    assert_eq!(s.trust_zone.value_name, "file");
    assert!(s.trust_zone.root.ends_with(r"Internet Settings\ZoneMap"));
    assert_eq!(s.search_path.variable, "PSModulePath");
    assert_eq!(s.product.display_names, DEFAULT_PRODUCT_DISPLAY_NAMES);
}

#[test]
fn product_names_layer_replaces_defaults() {
    let s = load_layered_yaml_from_strings(&["product:\n  display_names: [Contoso Server]\n"])
        .unwrap()
        .settings()
        .unwrap();

    assert_eq!(s.product.display_names, vec!["Contoso Server".to_string()]);
}

#[test]
fn partial_section_keeps_other_defaults() {
    let s = load_layered_yaml_from_strings(&["search_path:\n  variable: PATH\n"])
        .unwrap()
        .settings()
        .unwrap();

    assert_eq!(s.search_path.variable, "PATH");
    assert_eq!(s.trust_zone.value_name, "file");
}

#[test]
fn empty_required_value_is_rejected() {
    let loaded = load_layered_yaml_from_strings(&["trust_zone:\n  value_name: ''\n"]).unwrap();
    let err = loaded.settings().unwrap_err();
    assert!(err.to_string().contains("trust_zone.value_name"));
}

#[test]
fn identical_subkeys_are_rejected() {
    let yaml = "trust_zone:\n  escalated_subkey: Domains\n  normal_subkey: domains\n";
    let err = load_layered_yaml_from_strings(&[yaml]).unwrap().settings().unwrap_err();
    assert!(err.to_string().contains("must differ"));
}

#[test]
fn wrong_shape_is_rejected() {
    let loaded = load_layered_yaml_from_strings(&["product:\n  display_names: 5\n"]).unwrap();
    assert!(loaded.settings().is_err());
}
