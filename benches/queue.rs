#![feature(test)]
extern crate test;

use lb_queue::Queue;

// cargo +nightly bench
#[cfg(test)]
mod tests {
    use super::*;
    use test::Bencher;

    // cargo +nightly bench --package lb-queue --bench queue -- tests::mpmc_bounded --exact
    #[bench]
    fn mpmc_bounded(b: &mut Bencher) {
        const COUNT: usize = 1_000;
        const CONCURRENCY: usize = 4;
        let queue: Queue<usize> = Queue::with_capacity(64);

        b.iter(|| {
            let ths: Vec<_> = (0..CONCURRENCY)
                .map(|_| {
                    let q = queue.clone();
                    std::thread::spawn(move || {
                        for _ in 0..COUNT {
                            let _ = q.pop();
                        }
                    })
                })
                .chain((0..CONCURRENCY).map(|_| {
                    let q = queue.clone();
                    std::thread::spawn(move || {
                        for i in 0..COUNT {
                            q.push(i);
                        }
                    })
                }))
                .collect();

            for th in ths {
                th.join().unwrap();
            }
        });
    }

    // cargo +nightly bench --package lb-queue --bench queue -- tests::spsc_unbounded --exact
    #[bench]
    fn spsc_unbounded(b: &mut Bencher) {
        const COUNT: usize = 1_000;
        let queue: Queue<usize> = Queue::new();

        b.iter(|| {
            for i in 0..COUNT {
                queue.push(i);
            }
            for _ in 0..COUNT {
                let _ = queue.pop();
            }
        });
    }
}
