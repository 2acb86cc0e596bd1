//! Property tests: random init/lock/unlock/free sequences over a small pool.
//!
//! TEST_SCOPE:
//!   - pool slots in use == logical mutexes in ValidBorrowed
//!   - no two mutexes share a pool slot
//!   - valid mutexes never exceed pool capacity + static mutexes
//!   - exhaustion is the only init that aborts

mod common;

use std::collections::HashSet;

use cc3xx_platform::{LogicalMutex, MutexKind, MutexManager, SlotPool, TicketLock};
use common::{aborts, RecordingAbort};
use proptest::prelude::*;

const POOL: usize = 3;
const POOLED: usize = 5;
const STATIC: usize = 2;

#[derive(Debug, Clone, Copy)]
enum Op {
    Init(usize),
    LockUnlock(usize),
    Free(usize),
}

fn arb_op() -> impl Strategy<Value = Op> {
    let idx = 0..POOLED + STATIC;
    prop_oneof![
        idx.clone().prop_map(Op::Init),
        idx.clone().prop_map(Op::LockUnlock),
        idx.prop_map(Op::Free),
    ]
}

proptest! {
    #[test]
    fn pool_accounting_matches_mutex_states(ops in prop::collection::vec(arb_op(), 1..64)) {
        let pool: SlotPool<TicketLock, POOL> = SlotPool::new();
        let statics: [TicketLock; STATIC] = [const { TicketLock::new() }; STATIC];
        let abort = RecordingAbort::default();
        let mgr = MutexManager::new(&pool, &abort);

        let mut mutexes: Vec<LogicalMutex<'_>> = (0..POOLED).map(|_| LogicalMutex::new()).collect();
        mutexes.extend(statics.iter().map(LogicalMutex::with_static));

        let mut expected_aborts = 0;
        for op in ops {
            match op {
                Op::Init(i) => {
                    let m = &mutexes[i];
                    let needs_slot = m.kind() == MutexKind::Invalid && m.static_slot().is_none();
                    if needs_slot && pool.available() == 0 {
                        prop_assert!(aborts(|| mgr.init(Some(m))));
                        expected_aborts += 1;
                    } else {
                        mgr.init(Some(m));
                    }
                }
                Op::LockUnlock(i) => {
                    let m = &mutexes[i];
                    if m.kind() == MutexKind::Invalid {
                        prop_assert!(mgr.lock(Some(m)).is_err());
                    } else {
                        mgr.lock(Some(m)).unwrap();
                        mgr.unlock(Some(m));
                    }
                }
                Op::Free(i) => mgr.free(Some(&mutexes[i])),
            }

            let borrowed: Vec<usize> = mutexes.iter().filter_map(|m| m.slot_index()).collect();
            let distinct: HashSet<usize> = borrowed.iter().copied().collect();
            prop_assert_eq!(borrowed.len(), distinct.len());
            prop_assert_eq!(pool.in_use(), borrowed.len());
            for &i in &borrowed {
                prop_assert!(pool.is_slot_in_use(i));
            }

            let valid = mutexes.iter().filter(|m| m.kind() != MutexKind::Invalid).count();
            prop_assert!(valid <= POOL + STATIC);
        }
        prop_assert_eq!(abort.reasons().len(), expected_aborts);
    }
}
