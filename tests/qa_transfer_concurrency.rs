//! Concurrency properties of the transfer engine, exercised with real threads.

use std::sync::{Arc, Barrier};
use std::thread;

use account_ledger::{
    Account, AccountStore, AccountsService, InMemoryAccountRepository, KeyLockManager,
    LockPolicy, LoggingNotificationService, TransferEngine, TransferError, TransferRequest,
};
use rust_decimal::Decimal;

fn dec(v: i64) -> Decimal {
    Decimal::from(v)
}

fn setup(policy: LockPolicy, accounts: &[(&str, i64)]) -> (Arc<TransferEngine>, Arc<InMemoryAccountRepository>) {
    let repo = Arc::new(InMemoryAccountRepository::new());
    for (id, bal) in accounts {
        repo.create(Account::with_balance(*id, dec(*bal))).unwrap();
    }
    let engine = Arc::new(TransferEngine::with_policy(
        repo.clone(),
        Arc::new(KeyLockManager::new()),
        policy,
    ));
    (engine, repo)
}

fn balance(repo: &InMemoryAccountRepository, id: &str) -> Decimal {
    repo.get(id).unwrap().balance
}

/// Retry on Busy until the attempt reaches any other outcome
fn transfer_until_settled(
    engine: &TransferEngine,
    from: &str,
    to: &str,
    amount: Decimal,
) -> Result<(), TransferError> {
    loop {
        match engine.transfer(from, to, amount) {
            Err(TransferError::Busy { .. }) => thread::yield_now(),
            other => return other.map(|_| ()),
        }
    }
}

#[test]
fn qa_contended_pair_reflects_exactly_the_successes() {
    const THREADS: usize = 32;
    const ATTEMPTS: usize = 50;

    let (engine, repo) = setup(LockPolicy::FailFast, &[("A", 100_000), ("B", 100_000)]);
    let barrier = Arc::new(Barrier::new(THREADS));

    let handles: Vec<_> = (0..THREADS)
        .map(|t| {
            let engine = Arc::clone(&engine);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                // even threads push A→B, odd threads push B→A
                let (from, to) = if t % 2 == 0 { ("A", "B") } else { ("B", "A") };
                let amount = dec(t as i64 + 1);
                barrier.wait();

                let mut net_a_out = Decimal::ZERO;
                let mut busy = 0usize;
                for _ in 0..ATTEMPTS {
                    match engine.transfer(from, to, amount) {
                        Ok(_) if from == "A" => net_a_out += amount,
                        Ok(_) => net_a_out -= amount,
                        Err(TransferError::Busy { .. }) => busy += 1,
                        Err(e) => panic!("unexpected outcome: {e}"),
                    }
                }
                (net_a_out, busy)
            })
        })
        .collect();

    let mut net_a_out = Decimal::ZERO;
    for h in handles {
        let (n, _busy) = h.join().unwrap();
        net_a_out += n;
    }

    assert_eq!(balance(&repo, "A"), dec(100_000) - net_a_out);
    assert_eq!(balance(&repo, "B"), dec(100_000) + net_a_out);
    assert!(engine.locks().is_empty(), "lock registry must converge");
}

#[test]
fn qa_disjoint_pairs_never_busy() {
    const PAIRS: usize = 8;
    const TRANSFERS: usize = 200;

    let ids: Vec<(String, String)> = (0..PAIRS)
        .map(|i| (format!("P{i}-src"), format!("P{i}-dst")))
        .collect();
    let mut seed = Vec::new();
    for (src, dst) in &ids {
        seed.push((src.as_str(), TRANSFERS as i64));
        seed.push((dst.as_str(), 0));
    }
    let (engine, repo) = setup(LockPolicy::FailFast, &seed);
    let barrier = Arc::new(Barrier::new(PAIRS));

    let handles: Vec<_> = ids
        .iter()
        .cloned()
        .map(|(src, dst)| {
            let engine = Arc::clone(&engine);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                for _ in 0..TRANSFERS {
                    engine.transfer(&src, &dst, Decimal::ONE).unwrap();
                }
            })
        })
        .collect();
    for h in handles {
        h.join().unwrap();
    }

    for (src, dst) in &ids {
        assert_eq!(balance(&repo, src), Decimal::ZERO);
        assert_eq!(balance(&repo, dst), dec(TRANSFERS as i64));
    }
    assert!(engine.locks().is_empty());
}

#[test]
fn qa_no_overdraft_under_contention() {
    const THREADS: usize = 20;
    const PER_THREAD: usize = 10;

    // 200 attempts of 1 against a balance of 50
    let (engine, repo) = setup(LockPolicy::FailFast, &[("SRC", 50), ("DST", 0)]);
    let barrier = Arc::new(Barrier::new(THREADS));

    let handles: Vec<_> = (0..THREADS)
        .map(|_| {
            let engine = Arc::clone(&engine);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                let mut ok = 0usize;
                for _ in 0..PER_THREAD {
                    match transfer_until_settled(&engine, "SRC", "DST", Decimal::ONE) {
                        Ok(()) => ok += 1,
                        Err(TransferError::InsufficientBalance { .. }) => {}
                        Err(e) => panic!("unexpected outcome: {e}"),
                    }
                }
                ok
            })
        })
        .collect();

    let succeeded: usize = handles.into_iter().map(|h| h.join().unwrap()).sum();
    assert_eq!(succeeded, 50);
    assert_eq!(balance(&repo, "SRC"), Decimal::ZERO);
    assert_eq!(balance(&repo, "DST"), dec(50));
    assert!(engine.locks().is_empty());
}

#[test]
fn qa_ring_transfers_conserve_total() {
    const ACCOUNTS: usize = 5;
    const THREADS: usize = 10;
    const ROUNDS: usize = 100;

    let names: Vec<String> = (0..ACCOUNTS).map(|i| format!("R{i}")).collect();
    let seed: Vec<(&str, i64)> = names.iter().map(|n| (n.as_str(), 1_000)).collect();
    let (engine, repo) = setup(LockPolicy::FailFast, &seed);
    let names = Arc::new(names);
    let barrier = Arc::new(Barrier::new(THREADS));

    let handles: Vec<_> = (0..THREADS)
        .map(|t| {
            let engine = Arc::clone(&engine);
            let names = Arc::clone(&names);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                for r in 0..ROUNDS {
                    let from = &names[(t + r) % ACCOUNTS];
                    let to = &names[(t + r + 1 + t % 3) % ACCOUNTS];
                    let amount = dec(((t * 7 + r) % 13 + 1) as i64);
                    match transfer_until_settled(&engine, from, to, amount) {
                        Ok(()) | Err(TransferError::InsufficientBalance { .. }) => {}
                        Err(e) => panic!("unexpected outcome: {e}"),
                    }
                }
            })
        })
        .collect();
    for h in handles {
        h.join().unwrap();
    }

    let total: Decimal = names.iter().map(|n| balance(&repo, n)).sum();
    assert_eq!(total, dec(1_000 * ACCOUNTS as i64));
    for n in names.iter() {
        assert!(balance(&repo, n) >= Decimal::ZERO);
    }
    assert!(engine.locks().is_empty());
}

#[test]
fn qa_ordered_policy_opposite_directions_all_complete() {
    const THREADS: usize = 16;
    const TRANSFERS: usize = 100;

    let (engine, repo) = setup(LockPolicy::Ordered, &[("X", 10_000), ("Y", 10_000)]);
    let barrier = Arc::new(Barrier::new(THREADS));

    let handles: Vec<_> = (0..THREADS)
        .map(|t| {
            let engine = Arc::clone(&engine);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                let (from, to) = if t % 2 == 0 { ("X", "Y") } else { ("Y", "X") };
                barrier.wait();
                for _ in 0..TRANSFERS {
                    // blocking policy: every attempt completes, none is Busy
                    engine.transfer(from, to, Decimal::ONE).unwrap();
                }
            })
        })
        .collect();
    for h in handles {
        h.join().unwrap();
    }

    // equal numbers of threads in each direction
    assert_eq!(balance(&repo, "X"), dec(10_000));
    assert_eq!(balance(&repo, "Y"), dec(10_000));
    assert!(engine.locks().is_empty());
}

#[test]
fn qa_busy_attempts_leave_no_registry_residue() {
    let (engine, repo) = setup(LockPolicy::FailFast, &[("A", 10), ("B", 10)]);

    let held = engine.locks().try_acquire("A").unwrap();
    for _ in 0..100 {
        assert!(matches!(
            engine.transfer("B", "A", Decimal::ONE),
            Err(TransferError::Busy { .. })
        ));
    }
    assert_eq!(engine.locks().ref_count("A"), 1);
    assert_eq!(engine.locks().ref_count("B"), 0);
    held.release();

    assert!(engine.locks().is_empty());
    assert_eq!(balance(&repo, "A"), dec(10));
    assert_eq!(balance(&repo, "B"), dec(10));
}

#[test]
fn qa_service_on_global_registry_end_to_end() {
    let service = AccountsService::in_memory(
        LockPolicy::FailFast,
        Arc::new(LoggingNotificationService),
    );
    service
        .create_account(Account::with_balance("Id-123", dec(1000)))
        .unwrap();
    service
        .create_account(Account::with_balance("Id-345", dec(500)))
        .unwrap();

    service
        .transfer_amount(&TransferRequest::new("Id-123", "Id-345", dec(1000)))
        .unwrap();

    assert_eq!(service.get_account("Id-345").unwrap().balance, dec(1500));
    assert_eq!(service.get_account("Id-123").unwrap().balance, dec(0));
    assert!(KeyLockManager::global().is_empty());
}
