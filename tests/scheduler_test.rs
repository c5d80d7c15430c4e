/*!
 * Scheduler Tests
 * Round-robin dispatch, preemption, blocking, and statistics through the manager
 */

use coop_kernel::{NoopWork, ProcessManager, ProcessState, ScheduleOutcome};
use pretty_assertions::assert_eq;
use std::thread;
use std::time::Duration;

fn long_quantum() -> ProcessManager {
    ProcessManager::builder()
        .with_quantum(Duration::from_secs(60))
        .build()
}

fn state(pm: &ProcessManager, pid: u64) -> ProcessState {
    pm.get_by_id(pid).unwrap().state
}

#[test]
fn test_fifo_admission() {
    let pm = long_quantum();
    let a = pm.spawn("A", NoopWork);
    let b = pm.spawn("B", NoopWork);
    let c = pm.spawn("C", NoopWork);

    let order: Vec<_> = (0..3).filter_map(|_| pm.advance().pid()).collect();
    assert_eq!(order, vec![a, b, c]);
}

#[test]
fn test_priority_does_not_reorder() {
    let pm = long_quantum();
    let a = pm.create_process("A", NoopWork, 1);
    let b = pm.create_process("B", NoopWork, 5);

    assert_eq!(pm.advance(), ScheduleOutcome::Dispatched { pid: a });
    assert_eq!(pm.advance(), ScheduleOutcome::Dispatched { pid: b });
    assert_eq!(pm.scheduler_statistics().context_switches, 2);
}

#[test]
fn test_set_priority_keeps_queue_order() {
    let pm = long_quantum();
    let a = pm.spawn("A", NoopWork);
    let b = pm.spawn("B", NoopWork);

    assert!(pm.set_priority(b, 99));
    assert_eq!(pm.ready_queue(), vec![a, b]);
    assert_eq!(pm.get_by_id(b).unwrap().priority, 99);
    assert!(!pm.set_priority(404, 1));
}

#[test]
fn test_preemption_round_trip() {
    let pm = long_quantum();
    let a = pm.spawn("A", NoopWork);
    assert!(pm.set_quantum(a, Duration::ZERO));

    assert_eq!(pm.advance(), ScheduleOutcome::Dispatched { pid: a });

    // Admitted after A was dispatched, before the preemption
    let b = pm.spawn("B", NoopWork);

    assert_eq!(pm.advance(), ScheduleOutcome::Dispatched { pid: b });
    assert_eq!(pm.ready_queue(), vec![a]);
    assert_eq!(state(&pm, a), ProcessState::Ready);

    let stats = pm.scheduler_statistics();
    assert_eq!(stats.preemptions, 1);
    assert_eq!(stats.context_switches, 3);
}

#[test]
fn test_preempted_lone_process_is_redispatched() {
    let pm = ProcessManager::builder().with_quantum(Duration::ZERO).build();
    let a = pm.spawn("A", NoopWork);

    assert_eq!(pm.advance(), ScheduleOutcome::Dispatched { pid: a });
    assert_eq!(pm.advance(), ScheduleOutcome::Dispatched { pid: a });
    assert_eq!(pm.scheduler_statistics().preemptions, 1);
    assert_eq!(pm.get_by_id(a).unwrap().burst_count, 2);
}

#[test]
fn test_quantum_expiry_over_time() {
    let pm = ProcessManager::builder()
        .with_quantum(Duration::from_millis(10))
        .build();
    let a = pm.spawn("A", NoopWork);

    pm.advance();
    assert_eq!(pm.advance(), ScheduleOutcome::Continued { pid: a });
    assert_eq!(pm.scheduler_statistics().preemptions, 0);

    thread::sleep(Duration::from_millis(15));
    assert_eq!(pm.advance(), ScheduleOutcome::Dispatched { pid: a });
    assert_eq!(pm.scheduler_statistics().preemptions, 1);
}

#[test]
fn test_running_process_yields_to_waiting_one() {
    let pm = long_quantum();
    let a = pm.spawn("A", NoopWork);
    pm.advance();
    let b = pm.spawn("B", NoopWork);

    assert_eq!(pm.advance(), ScheduleOutcome::Dispatched { pid: b });
    assert_eq!(pm.ready_queue(), vec![a]);

    let stats = pm.scheduler_statistics();
    assert_eq!(stats.yields, 1);
    assert_eq!(stats.preemptions, 0);
}

#[test]
fn test_block_running_then_unblock() {
    let pm = long_quantum();
    let a = pm.spawn("A", NoopWork);
    pm.advance();
    assert_eq!(pm.running(), Some(a));

    assert!(pm.block(a));
    assert_eq!(state(&pm, a), ProcessState::Blocked);
    assert!(pm.ready_queue().is_empty());
    assert_eq!(pm.running(), None);
    assert_eq!(pm.advance(), ScheduleOutcome::Idle);

    assert!(pm.unblock(a));
    assert_eq!(pm.advance(), ScheduleOutcome::Dispatched { pid: a });
    assert_eq!(state(&pm, a), ProcessState::Running);
}

#[test]
fn test_block_ready_process_removes_it_from_queue() {
    let pm = long_quantum();
    let a = pm.spawn("A", NoopWork);
    let b = pm.spawn("B", NoopWork);
    let c = pm.spawn("C", NoopWork);

    assert!(pm.block(b));
    assert_eq!(pm.ready_queue(), vec![a, c]);
    assert_eq!(pm.blocked(), vec![b]);

    // Unblocked processes rejoin at the tail
    assert!(pm.unblock(b));
    assert_eq!(pm.ready_queue(), vec![a, c, b]);
}

#[test]
fn test_block_unblock_idempotence() {
    let pm = long_quantum();
    let a = pm.spawn("A", NoopWork);

    assert!(!pm.unblock(a));
    assert_eq!(pm.ready_queue(), vec![a]);
    assert!(pm.blocked().is_empty());

    assert!(pm.block(a));
    assert!(!pm.block(a));
    assert_eq!(pm.blocked(), vec![a]);

    let stats = pm.scheduler_statistics();
    assert_eq!(stats.blocked_count, 1);
    assert_eq!(stats.unblocked_count, 0);
}

#[test]
fn test_unknown_pid_lookups() {
    let pm = long_quantum();
    assert!(!pm.block(7));
    assert!(!pm.unblock(7));
    assert!(!pm.terminate(7));
    assert!(pm.get_by_id(7).is_none());
    assert!(pm.get_by_name("nobody").is_none());
}

#[test]
fn test_idle_scheduler() {
    let pm = long_quantum();
    assert!(pm.advance().is_idle());
    assert_eq!(pm.scheduler_statistics().context_switches, 0);
}

#[test]
fn test_statistics_counts_by_state() {
    let pm = long_quantum();
    let a = pm.spawn("A", NoopWork);
    pm.spawn("B", NoopWork);
    let c = pm.spawn("C", NoopWork);
    pm.advance();
    pm.block(c);

    let stats = pm.get_statistics();
    assert_eq!(stats.total, 3);
    assert_eq!(stats.running, 1);
    assert_eq!(stats.ready, 1);
    assert_eq!(stats.blocked, 1);
    assert_eq!(pm.running(), Some(a));
}

#[test]
fn test_statistics_monotonic() {
    let pm = ProcessManager::builder().with_quantum(Duration::ZERO).build();
    let pids: Vec<_> = (0..4).map(|i| pm.spawn(format!("p{i}"), NoopWork)).collect();

    let mut last = pm.scheduler_statistics();
    for tick in 0..40 {
        let pid = pids[tick % pids.len()];
        match tick % 5 {
            0 => {
                pm.block(pid);
            }
            1 => {
                pm.unblock(pid);
            }
            _ => {
                pm.advance();
            }
        }

        let now = pm.scheduler_statistics();
        assert!(now.context_switches >= last.context_switches);
        assert!(now.preemptions >= last.preemptions);
        assert!(now.blocked_count >= last.blocked_count);
        assert!(now.unblocked_count >= last.unblocked_count);
        assert!(now.total_scheduling_time_micros >= last.total_scheduling_time_micros);
        last = now;
    }
}
