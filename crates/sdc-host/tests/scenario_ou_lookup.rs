//! Scenario: organizational-unit lookup
//!
//! # Invariants under test
//!
//! 1. The desired OU is found by name among organizational-unit objects only.
//! 2. The relative path drops domain components.
//! 3. An existing OU given as relative path or full DN matches (case-insensitive).
//! 4. A different existing OU does not match.
//! 5. No match is an `OuNotFound` error, recoverable by downcast.
//! 6. The first result wins when several OUs share a name.

use sdc_host::memory::MemoryDirectory;
use sdc_host::{lookup_organizational_unit, OuNotFound};

fn directory() -> MemoryDirectory {
    MemoryDirectory::new()
        .with_object("container", "Servers", "CN=Servers,DC=contoso,DC=com")
        .with_ou("Servers", "OU=Servers,OU=Datacenter,DC=contoso,DC=com")
        .with_ou("Servers", "OU=Servers,OU=Branch,DC=contoso,DC=com")
        .with_ou("Workstations", "OU=Workstations,DC=contoso,DC=com")
}

#[test]
fn existing_relative_path_matches() {
    let m =
        lookup_organizational_unit(&directory(), "Servers", "OU=Servers,OU=Datacenter").unwrap();

    assert_eq!(m.distinguished_name, "OU=Servers,OU=Datacenter,DC=contoso,DC=com");
    assert_eq!(m.relative_path, "OU=Servers,OU=Datacenter");
    assert!(m.matches);
}

#[test]
fn existing_full_dn_matches_case_insensitively() {
    let m = lookup_organizational_unit(
        &directory(),
        "servers",
        "ou=servers, ou=datacenter, dc=CONTOSO, dc=com",
    )
    .unwrap();
    assert!(m.matches);
}

#[test]
fn different_existing_ou_does_not_match() {
    let m = lookup_organizational_unit(&directory(), "Workstations", "OU=Servers,OU=Datacenter")
        .unwrap();

    assert_eq!(m.relative_path, "OU=Workstations");
    assert!(!m.matches);
}

#[test]
fn empty_existing_ou_does_not_match() {
    let m = lookup_organizational_unit(&directory(), "Workstations", "").unwrap();
    assert!(!m.matches);
}

#[test]
fn missing_ou_is_not_found() {
    let err = lookup_organizational_unit(&directory(), "Kiosks", "OU=Kiosks").unwrap_err();

    let not_found = err
        .downcast_ref::<OuNotFound>()
        .expect("error must be OuNotFound");
    assert_eq!(not_found.ou_name, "Kiosks");
    assert_eq!(err.to_string(), "organizational unit 'Kiosks' not found");
}

#[test]
fn containers_are_not_organizational_units() {
    let dir = MemoryDirectory::new().with_object(
        "container",
        "Computers",
        "CN=Computers,DC=contoso,DC=com",
    );
    let err = lookup_organizational_unit(&dir, "Computers", "CN=Computers").unwrap_err();
    assert!(err.downcast_ref::<OuNotFound>().is_some());
}
