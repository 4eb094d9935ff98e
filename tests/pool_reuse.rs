mod harness;

use harness::{instant_options, Harness};
use window_stack::{Scene, WindowOptions, WindowState};

#[test]
fn pool_ids_count_up_from_zero() {
    let harness = Harness::new();
    let key = harness.register_dialog("Dialogs", "Confirm", instant_options());

    let ids: Vec<u32> = (0..3).map(|_| harness.create(&key).id()).collect();
    assert_eq!(ids, [0, 1, 2]);
}

#[test]
fn removed_id_is_reassigned_first() {
    let harness = Harness::new();
    let key = harness.register_dialog("Dialogs", "Confirm", instant_options());

    let windows: Vec<_> = (0..3).map(|_| harness.create(&key)).collect();
    windows[1].destroy(false);

    let replacement = harness.create(&key);
    assert_eq!(replacement.id(), 1);
    assert!(!replacement.same(&windows[1]));
}

#[test]
fn closed_pooled_window_is_reused_with_same_id() {
    let harness = Harness::new();
    let options = WindowOptions {
        destroy_on_close: false,
        restore_hierarchy: true,
        ..instant_options()
    };
    let key = harness.register_dialog("Dialogs", "Confirm", options);

    let first = harness.create(&key);
    assert_eq!(first.id(), 0);
    first.show();
    harness.run_until_idle();
    first.close();

    assert_eq!(first.state(), WindowState::Hidden);
    assert!(first.exists());
    assert!(!first.is_active());
    assert!(first.is_reusable());

    let second = harness.create(&key);
    assert!(second.same(&first));
    assert_eq!(second.id(), 0);
    assert!(!second.is_reusable());
    assert!(!second.is_active());

    // The reused instance runs the full lifecycle again.
    second.show();
    harness.run_until_idle();
    assert_eq!(second.state(), WindowState::Visible);
}

#[test]
fn active_windows_are_not_reused() {
    let harness = Harness::new();
    let options = WindowOptions {
        destroy_on_close: false,
        ..instant_options()
    };
    let key = harness.register_dialog("Dialogs", "Confirm", options);

    let first = harness.create(&key);
    first.show();
    harness.run_until_idle();

    let second = harness.create(&key);
    assert!(!second.same(&first));
    assert_eq!(second.id(), 1);
}

#[test]
fn has_windows_tracks_active_instances() {
    let harness = Harness::new();
    let options = WindowOptions {
        destroy_on_close: false,
        ..instant_options()
    };
    let key = harness.register_dialog("Dialogs", "Confirm", options);
    let identity = key.identity();

    assert!(!harness.manager.has_windows(&identity));

    let window = harness.create(&key);
    // Created windows come back deactivated.
    assert!(!harness.manager.has_windows(&identity));

    window.show();
    assert!(harness.manager.has_windows(&identity));

    harness.run_until_idle();
    window.close();
    assert!(!harness.manager.has_windows(&identity));
}

#[test]
fn get_all_windows_filters_by_activity() {
    let harness = Harness::new();
    let options = WindowOptions {
        destroy_on_close: false,
        ..instant_options()
    };
    let key = harness.register_dialog("Dialogs", "Confirm", options);
    let identity = key.identity();

    let shown = harness.create(&key);
    shown.show();
    harness.run_until_idle();
    let dormant = harness.create(&key);

    let all = harness.manager.get_all_windows(Some(&identity), false);
    assert_eq!(all.len(), 2);
    let active = harness.manager.get_all_windows(Some(&identity), true);
    assert_eq!(active.len(), 1);
    assert!(active[0].same(&shown));
    assert!(!active[0].same(&dormant));
}

#[test]
fn compact_drops_externally_destroyed_entries() {
    let harness = Harness::new();
    let key = harness.register_dialog("Dialogs", "Confirm", instant_options());
    let identity = key.identity();

    let window = harness.create(&key);
    // Something outside the manager tears the scene object down.
    harness.scene.borrow_mut().destroy(window.root());

    assert_eq!(
        harness.manager.get_all_windows(Some(&identity), false).len(),
        1
    );
    harness.manager.compact();
    assert!(harness
        .manager
        .get_all_windows(Some(&identity), false)
        .is_empty());
    assert!(harness.manager.loaded_identities().is_empty());
}

#[test]
fn destroying_last_window_drops_the_pool() {
    let harness = Harness::new();
    let key = harness.register_dialog("Dialogs", "Confirm", instant_options());
    let identity = key.identity();

    let window = harness.create(&key);
    assert_eq!(harness.manager.loaded_identities(), [identity.clone()]);

    window.show();
    harness.run_until_idle();
    window.close();
    harness.run_until_idle();

    assert!(!window.exists());
    assert!(harness.manager.loaded_identities().is_empty());
    assert!(harness.manager.get_window(&identity, 0).is_none());
}
