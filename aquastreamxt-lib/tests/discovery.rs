//! Tests for device discovery ordering and failure behavior.

use std::path::PathBuf;

use aquastreamxt_lib::device::{AquastreamXt, candidate_paths};
use aquastreamxt_lib::error::Error;

#[test]
fn discovery_probes_the_full_search_space_in_order() {
    let paths: Vec<PathBuf> = candidate_paths().collect();

    assert_eq!(paths.len(), 45, "3 naming schemes x 15 suffixes");
    assert_eq!(paths[0], PathBuf::from("/dev/usb/hiddev0"));
    assert_eq!(paths[14], PathBuf::from("/dev/usb/hiddev14"));
    assert_eq!(paths[15], PathBuf::from("/dev/usb/hid/hiddev0"));
    assert_eq!(paths[29], PathBuf::from("/dev/usb/hid/hiddev14"));
    assert_eq!(paths[30], PathBuf::from("/dev/hiddev0"));
    assert_eq!(paths[44], PathBuf::from("/dev/hiddev14"));
}

#[test]
fn discovery_is_template_major() {
    // every suffix of one naming scheme is probed before the next scheme
    let paths: Vec<String> = candidate_paths()
        .map(|p| p.to_string_lossy().into_owned())
        .collect();
    let first_alternate = paths
        .iter()
        .position(|p| p.starts_with("/dev/usb/hid/"))
        .unwrap();
    assert!(paths[..first_alternate]
        .iter()
        .all(|p| p.starts_with("/dev/usb/hiddev")));
}

#[test]
fn open_fails_cleanly_when_no_device_matches() {
    // No hardware answers to this pair: every candidate either fails to open
    // or fails validation and is dropped (closed) again.
    match AquastreamXt::open_with_ids(0xdead, 0xbeef) {
        Err(Error::DeviceNotFound {
            vendor_id,
            product_id,
        }) => {
            assert_eq!(vendor_id, 0xdead);
            assert_eq!(product_id, 0xbeef);
        }
        Err(other) => panic!("expected DeviceNotFound, got {other}"),
        Ok(_) => panic!("expected DeviceNotFound, got an open session"),
    }
}
