use leadgen_core::{update, AppState, Msg, MAX_NOTIFICATIONS};

#[test]
fn no_op_and_tick_leave_state_untouched() {
    let state = AppState::new();
    let (next, effects) = update(state.clone(), Msg::NoOp);
    assert!(effects.is_empty());
    assert_eq!(next, state);

    let (next, effects) = update(state.clone(), Msg::Tick);
    assert!(effects.is_empty());
    assert_eq!(next, state);
}

#[test]
fn notifications_are_bounded_and_dismissed_oldest_first() {
    let mut state = AppState::new();
    for _ in 0..MAX_NOTIFICATIONS + 2 {
        state = update(state, Msg::BulkAnalyzeClicked).0;
    }
    assert_eq!(state.view().notifications.len(), MAX_NOTIFICATIONS);

    let (mut state, _) = update(state, Msg::NotificationDismissed);
    assert_eq!(state.view().notifications.len(), MAX_NOTIFICATIONS - 1);
    assert!(state.consume_dirty());
}
