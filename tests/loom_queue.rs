#![cfg(loom)]

use lb_queue::Queue;
use loom::thread;

// Loom explores every interleaving of the threads below, including the ones where a
// wake-up would be lost: a thread left waiting forever is reported as a deadlock.
//
// Run all tests:
//
// RUSTFLAGS="--cfg loom" cargo test --package lb-queue --test loom_queue --release
//
// Add `LOOM_MAX_PREEMPTIONS=2` (or =3) to the command above to reduce the duration of the tests.

// RUSTFLAGS="--cfg loom" cargo test --package lb-queue --test loom_queue --release -- test_blocking_hand_off --exact
#[test]
fn test_blocking_hand_off() {
    loom::model(|| {
        const COUNT: usize = 3;
        let queue: Queue<usize> = Queue::with_capacity(1);

        let q1 = queue.clone();
        let th1 = thread::spawn(move || {
            for i in 0..COUNT {
                q1.push(i);
            }
        });

        for i in 0..COUNT {
            assert_eq!(i, queue.pop());
        }

        th1.join().unwrap();
        assert!(queue.is_empty());
    });
}

// RUSTFLAGS="--cfg loom" cargo test --package lb-queue --test loom_queue --release -- test_bounded_mpsc --exact
#[test]
fn test_bounded_mpsc() {
    loom::model(|| {
        let queue: Queue<usize> = Queue::with_capacity(1);

        let q1 = queue.clone();
        let th1 = thread::spawn(move || q1.push(1));

        let q2 = queue.clone();
        let th2 = thread::spawn(move || q2.push(2));

        let a = queue.pop();
        let b = queue.pop();
        assert_eq!(3, a + b);

        th1.join().unwrap();
        th2.join().unwrap();
        assert!(queue.try_pop().is_none());
    });
}

// RUSTFLAGS="--cfg loom" cargo test --package lb-queue --test loom_queue --release -- test_spmc --exact
#[test]
fn test_spmc() {
    loom::model(|| {
        let queue: Queue<usize> = Queue::new();

        let q1 = queue.clone();
        let th1 = thread::spawn(move || q1.pop());

        let q2 = queue.clone();
        let th2 = thread::spawn(move || q2.pop());

        queue.push(1);
        assert!(queue.try_push(2).is_ok());

        let a = th1.join().unwrap();
        let b = th2.join().unwrap();
        assert_eq!(3, a + b);
        assert!(queue.is_empty());
    });
}

// RUSTFLAGS="--cfg loom" cargo test --package lb-queue --test loom_queue --release -- test_set_capacity_wakes_producer --exact
#[test]
fn test_set_capacity_wakes_producer() {
    loom::model(|| {
        let queue: Queue<usize> = Queue::with_capacity(0);

        let q1 = queue.clone();
        let th1 = thread::spawn(move || q1.push(1));

        queue.set_capacity(1);

        th1.join().unwrap();
        assert_eq!(Some(1), queue.try_pop());
    });
}
