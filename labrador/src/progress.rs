use std::fmt::Debug;

/// Receives iteration counts from long-running computations (normalization
/// iterations, TAD caller bins).
///
/// Implementations must be thread-safe, as the TAD caller reports progress
/// from its worker threads.
pub trait ProgressNotifier: Debug + Send + Sync {
    fn set_iter_num(&self, num_iter: u64);

    fn inc_iter(&self);
}

impl<T: ProgressNotifier> ProgressNotifier for &T {
    fn set_iter_num(&self, num_iter: u64) {
        T::set_iter_num(self, num_iter)
    }

    fn inc_iter(&self) {
        T::inc_iter(self)
    }
}

#[derive(Clone, Debug)]
pub(crate) struct DummyProgressNotifier;

impl ProgressNotifier for DummyProgressNotifier {
    fn set_iter_num(&self, _num_iter: u64) {
        // do nothing
    }

    fn inc_iter(&self) {
        // do nothing
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::sync::atomic::{AtomicU64, Ordering};

    use crate::progress::{DummyProgressNotifier, ProgressNotifier};

    /// Notifier remembering the values it was given, for assertions.
    #[derive(Debug, Default)]
    pub(crate) struct CountingProgressNotifier {
        pub iter_num: AtomicU64,
        pub iters: AtomicU64,
    }

    impl ProgressNotifier for CountingProgressNotifier {
        fn set_iter_num(&self, num_iter: u64) {
            self.iter_num.store(num_iter, Ordering::SeqCst);
        }

        fn inc_iter(&self) {
            self.iters.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn test_dummy_progress_notifier() {
        let notifier = DummyProgressNotifier;
        notifier.set_iter_num(1337);
        let notifier_2 = notifier;
        notifier_2.inc_iter();
    }

    #[test]
    fn test_reference_forwards_calls() {
        let notifier = CountingProgressNotifier::default();
        let reference = &notifier;
        reference.set_iter_num(3);
        reference.inc_iter();
        reference.inc_iter();

        assert_eq!(notifier.iter_num.load(Ordering::SeqCst), 3);
        assert_eq!(notifier.iters.load(Ordering::SeqCst), 2);
    }
}
