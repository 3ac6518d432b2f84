//! The unit of work dispatched to a pool worker

/// A boxed unit of work executed once on a worker thread.
///
/// This is the idiomatic Rust rendering of the C source's `(function, arg)`
/// pair: the closure's captured environment carries whatever the producer
/// would otherwise have passed as an opaque argument pointer, and Rust's
/// ownership rules replace the "caller keeps the referent alive" contract
/// the source relied on.
pub struct Task {
    func: Box<dyn FnOnce() + Send + 'static>,
}

impl Task {
    /// Wrap a closure as a Task
    pub fn new<F>(f: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        Task { func: Box::new(f) }
    }

    /// Run the task, consuming it
    pub fn run(self) {
        (self.func)()
    }
}

impl std::fmt::Debug for Task {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Task").finish_non_exhaustive()
    }
}
