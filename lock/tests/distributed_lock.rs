use std::sync::Arc;
use std::time::Duration;

use lock::{DistributedLock, LockBackend, LockError, MemoryLockBackend};

const TTL: Duration = Duration::from_secs(5);

fn pair() -> (Arc<MemoryLockBackend>, DistributedLock, DistributedLock) {
    let backend = Arc::new(MemoryLockBackend::new());
    let a = DistributedLock::new(backend.clone() as Arc<dyn LockBackend>);
    let b = DistributedLock::new(backend.clone() as Arc<dyn LockBackend>);
    (backend, a, b)
}

#[test]
fn test_tokens_are_random_and_hex() {
    let (_, a, b) = pair();
    assert_ne!(a.token(), b.token());
    assert_eq!(a.token().len(), 32);
    assert!(a.token().chars().all(|c| c.is_ascii_hexdigit()));
}

#[tokio::test]
async fn test_racing_instances_exactly_one_wins() {
    let (_, a, b) = pair();
    let (a, b) = (Arc::new(a), Arc::new(b));

    let first = tokio::spawn({
        let a = a.clone();
        async move { a.acquire("task:1", TTL).await }
    });
    let second = tokio::spawn({
        let b = b.clone();
        async move { b.acquire("task:1", TTL).await }
    });

    let first = first.await.unwrap().unwrap();
    let second = second.await.unwrap().unwrap();
    assert!(first ^ second, "exactly one acquire must succeed");
}

#[tokio::test]
async fn test_loser_times_out_while_holder_keeps_the_lock() {
    let (_, a, b) = pair();
    assert!(a.acquire("task:1", TTL).await.unwrap());

    let started = tokio::time::Instant::now();
    let result = b
        .blocking_acquire("task:1", TTL, Duration::from_millis(250))
        .await;

    match result {
        Err(LockError::Timeout { key, waited }) => {
            assert_eq!(key, "task:1");
            assert_eq!(waited, Duration::from_millis(250));
        }
        other => panic!("expected timeout, got {other:?}"),
    }
    assert!(started.elapsed() >= Duration::from_millis(250));
}

#[tokio::test]
async fn test_blocking_acquire_succeeds_once_holder_releases() {
    let (_, a, b) = pair();
    let a = Arc::new(a);
    assert!(a.acquire("task:1", TTL).await.unwrap());

    let holder = a.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(150)).await;
        holder.release("task:1").await.unwrap();
    });

    b.blocking_acquire("task:1", TTL, Duration::from_secs(2))
        .await
        .unwrap();
    assert!(b.release("task:1").await.unwrap());
}

#[tokio::test]
async fn test_release_is_limited_to_the_holder() {
    let (backend, a, b) = pair();
    assert!(a.acquire("K", TTL).await.unwrap());

    match b.release("K").await {
        Err(LockError::NotHeld { key }) => assert_eq!(key, "K"),
        other => panic!("expected NotHeld, got {other:?}"),
    }
    assert_eq!(backend.holder("K").as_deref(), Some(a.token()));

    assert!(a.release("K").await.unwrap());
    assert!(b.acquire("K", TTL).await.unwrap());
    assert_eq!(backend.holder("K").as_deref(), Some(b.token()));
}

#[tokio::test]
async fn test_releasing_an_unheld_key_fails() {
    let (_, a, _) = pair();
    assert!(matches!(
        a.release("never-taken").await,
        Err(LockError::NotHeld { .. })
    ));
}

#[tokio::test]
async fn test_expired_lease_can_be_taken_over_and_not_released_by_old_holder() {
    let (_, a, b) = pair();
    assert!(a.acquire("K", Duration::from_millis(50)).await.unwrap());

    tokio::time::sleep(Duration::from_millis(80)).await;
    assert!(b.acquire("K", TTL).await.unwrap());

    assert!(matches!(a.release("K").await, Err(LockError::NotHeld { .. })));
    assert!(matches!(
        a.extend("K", TTL).await,
        Err(LockError::NotHeld { .. })
    ));
    assert!(b.release("K").await.unwrap());
}

#[tokio::test]
async fn test_extend_keeps_the_lease_alive() {
    let (_, a, b) = pair();
    assert!(a.acquire("K", Duration::from_millis(100)).await.unwrap());

    for _ in 0..3 {
        tokio::time::sleep(Duration::from_millis(50)).await;
        a.extend("K", Duration::from_millis(100)).await.unwrap();
    }

    assert!(!b.acquire("K", TTL).await.unwrap());
}
