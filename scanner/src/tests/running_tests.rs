use crate::running::RunningTasks;

#[test]
fn test_claim_is_exclusive_per_task() {
    let running = RunningTasks::new();

    let first = running.try_claim(7).expect("free task");
    assert!(running.is_running(7));
    assert!(running.try_claim(7).is_none());

    let other = running.try_claim(8).expect("other tasks are unaffected");
    assert_eq!(running.count(), 2);
    assert_eq!(first.task(), 7);
    assert_eq!(other.task(), 8);
}

#[test]
fn test_dropping_the_guard_frees_the_task() {
    let running = RunningTasks::new();

    drop(running.try_claim(7));
    assert!(!running.is_running(7));
    assert!(running.try_claim(7).is_some());
}
