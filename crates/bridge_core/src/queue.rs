//! Owned in-memory job queue
//!
//! Jobs are held in arrival order and handed out all at once. Reading is
//! consuming: a drain empties the queue whether or not the caller goes on
//! to act on what it received.

use parking_lot::Mutex;

use crate::job::Job;

/// FIFO queue of pending jobs, shared between request handlers.
///
/// Both [`push`](Self::push) and [`drain`](Self::drain) take the same lock,
/// so a job pushed concurrently with a drain ends up in exactly one drain
/// result.
#[derive(Debug, Default)]
pub struct JobQueue {
    jobs: Mutex<Vec<Job>>,
}

impl JobQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a job to the tail. Returns the queue length after the push.
    pub fn push(&self, job: Job) -> usize {
        let mut jobs = self.jobs.lock();
        jobs.push(job);
        jobs.len()
    }

    /// Take every pending job, leaving the queue empty.
    pub fn drain(&self) -> Vec<Job> {
        std::mem::take(&mut *self.jobs.lock())
    }

    pub fn len(&self) -> usize {
        self.jobs.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.lock().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::sync::Arc;

    #[test]
    fn drain_returns_jobs_in_arrival_order() {
        let queue = JobQueue::new();
        assert_eq!(queue.push(Job::clean(3)), 1);
        assert_eq!(queue.push(Job::clean(1)), 2);
        assert_eq!(queue.push(Job::clean(2)), 3);

        assert_eq!(
            queue.drain(),
            vec![Job::clean(3), Job::clean(1), Job::clean(2)]
        );
        assert!(queue.is_empty());
    }

    #[test]
    fn second_drain_is_empty() {
        let queue = JobQueue::new();
        queue.push(Job::clean(42));

        assert_eq!(queue.drain(), vec![Job::clean(42)]);
        assert_eq!(queue.drain(), Vec::<Job>::new());
    }

    #[test]
    fn jobs_pushed_after_drain_land_in_next_drain() {
        let queue = JobQueue::new();
        queue.push(Job::clean(1));
        let first = queue.drain();
        queue.push(Job::clean(2));

        assert_eq!(first, vec![Job::clean(1)]);
        assert_eq!(queue.drain(), vec![Job::clean(2)]);
    }

    #[test]
    fn duplicate_jobs_are_kept() {
        let queue = JobQueue::new();
        queue.push(Job::clean(7));
        queue.push(Job::clean(7));
        assert_eq!(queue.len(), 2);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_push_and_drain_lose_nothing() {
        let queue = Arc::new(JobQueue::new());
        let producers = 8;
        let per_producer = 250;

        let mut handles = Vec::new();
        for p in 0..producers {
            let queue = queue.clone();
            handles.push(tokio::spawn(async move {
                for i in 0..per_producer {
                    queue.push(Job::clean(p * per_producer + i));
                    tokio::task::yield_now().await;
                }
            }));
        }

        let drainer = {
            let queue = queue.clone();
            tokio::spawn(async move {
                let mut seen = Vec::new();
                for _ in 0..200 {
                    seen.extend(queue.drain());
                    tokio::task::yield_now().await;
                }
                seen
            })
        };

        for handle in handles {
            handle.await.unwrap();
        }
        let mut seen = drainer.await.unwrap();
        seen.extend(queue.drain());

        let mut ids: Vec<i64> = seen.iter().map(|j| j.user_id).collect();
        ids.sort_unstable();
        let expected: Vec<i64> = (0..producers * per_producer).collect();
        assert_eq!(ids, expected);
    }
}
