//! The process-wide adapter binding
//!
//! Kept in its own test binary with a single test, since the binding cannot
//! be undone once made.

use cmdapi_nms::{active, bind_active, AdapterError, AdapterRegistry};

#[test]
fn test_bind_once_then_read_everywhere() {
    assert!(matches!(active(), Err(AdapterError::NotResolved)));

    let registry = AdapterRegistry::builtin();
    let adapter = registry.resolve_bukkit("1.15.2-R0.1-SNAPSHOT").unwrap();
    let bound = bind_active(adapter).unwrap();
    assert_eq!(bound.release(), "1_15_R1");
    assert_eq!(active().unwrap().release(), "1_15_R1");

    let other = registry.resolve("1.16.1").unwrap();
    match bind_active(other) {
        Err(AdapterError::AlreadyBound(release)) => assert_eq!(release, "1_15_R1"),
        other => panic!("second bind should fail, got {:?}", other.map(|a| a.release())),
    }
    assert_eq!(active().unwrap().release(), "1_15_R1");
}
