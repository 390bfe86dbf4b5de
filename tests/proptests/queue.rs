//! Property Tests: Message Queue
//!
//! Several producers enqueue concurrently; one drain afterwards must return
//! every entry exactly once, with each producer's entries in the order that
//! producer enqueued them.

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use std::thread;
    use testlog::logging::{LogEntry, MessageQueue};

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn test_drain_keeps_per_producer_order(counts in prop::collection::vec(0usize..40, 1..6)) {
            let queue = MessageQueue::new();
            let handles: Vec<_> = counts
                .iter()
                .enumerate()
                .map(|(p, &n)| {
                    let queue = queue.clone();
                    thread::spawn(move || {
                        for i in 0..n {
                            queue.enqueue(LogEntry::serial(format!("{}:{}", p, i), &format!("vm{}", p)));
                        }
                    })
                })
                .collect();
            for handle in handles {
                handle.join().unwrap();
            }

            let drained = queue.drain();
            prop_assert_eq!(drained.len(), counts.iter().sum::<usize>());
            prop_assert!(queue.is_empty());

            let mut next = vec![0usize; counts.len()];
            for entry in drained {
                let (p, i) = entry.message.split_once(':').unwrap();
                let (p, i): (usize, usize) = (p.parse().unwrap(), i.parse().unwrap());
                prop_assert_eq!(i, next[p]);
                next[p] += 1;
            }
            prop_assert_eq!(next, counts);
        }
    }
}
