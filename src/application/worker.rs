//! Background execution of the book discovery loop.
//!
//! The terminal event loop must keep drawing while a search is running, so
//! each search runs on its own thread and reports back over a channel. The
//! UI thread polls the channel between frames.

use std::io;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread::{self, JoinHandle};

use crate::domain::{Book, BookDiscovery, BookLookup, CancelToken, DiscoveryError, Isbn13};
use crate::infrastructure::panic_message;

/// Progress and completion messages sent by a running search.
#[derive(Debug)]
pub enum FetchEvent {
    /// A new candidate is about to be looked up
    Attempt { number: u32, isbn: Isbn13 },
    /// The search ended; always the last event
    Finished(Result<Book, DiscoveryError>),
}

/// The search thread stopped without reporting a result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerCrashed(pub String);

/// Handle to one running search.
///
/// Dropping the handle cancels the search. The thread is not joined on drop:
/// it notices the cancellation before its next attempt or during its retry
/// delay and exits on its own.
#[derive(Debug)]
pub struct FetchHandle {
    cancel: CancelToken,
    events: Receiver<FetchEvent>,
    thread: Option<JoinHandle<()>>,
}

impl FetchHandle {
    /// Starts `discovery` on a new thread.
    ///
    /// # Errors
    ///
    /// Returns an IO error if the thread cannot be spawned.
    pub fn spawn<L>(discovery: BookDiscovery<L>) -> io::Result<Self>
    where
        L: BookLookup + Send + 'static,
    {
        let cancel = CancelToken::new();
        let token = cancel.clone();
        let (sender, events) = mpsc::channel();

        let thread = thread::Builder::new()
            .name("book-discovery".to_string())
            .spawn(move || {
                let mut rng = rand::rng();
                let progress = sender.clone();
                let result = discovery.discover(&mut rng, &token, |number, isbn| {
                    // The receiver may already be gone after cancellation.
                    let _ = progress.send(FetchEvent::Attempt {
                        number,
                        isbn: isbn.clone(),
                    });
                });
                let _ = sender.send(FetchEvent::Finished(result));
            })?;

        Ok(Self {
            cancel,
            events,
            thread: Some(thread),
        })
    }

    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Returns the next pending event without blocking.
    ///
    /// # Errors
    ///
    /// Returns [`WorkerCrashed`] with the panic message if the thread died
    /// before sending [`FetchEvent::Finished`].
    pub fn try_next(&mut self) -> Result<Option<FetchEvent>, WorkerCrashed> {
        match self.events.try_recv() {
            Ok(event) => Ok(Some(event)),
            Err(TryRecvError::Empty) => Ok(None),
            Err(TryRecvError::Disconnected) => {
                let message = match self.thread.take().map(JoinHandle::join) {
                    Some(Err(payload)) => panic_message(&*payload)
                        .unwrap_or_else(|| "book search panicked".to_string()),
                    _ => "book search stopped unexpectedly".to_string(),
                };
                Err(WorkerCrashed(message))
            }
        }
    }
}

impl Drop for FetchHandle {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{IsbnGenerator, LookupError, RetryPolicy, VolumeMetadata};
    use std::time::{Duration, Instant};

    struct Found;

    impl BookLookup for Found {
        fn lookup(&self, _: &Isbn13) -> Result<Option<VolumeMetadata>, LookupError> {
            Ok(Some(VolumeMetadata {
                title: Some("Threaded".to_string()),
                ..VolumeMetadata::default()
            }))
        }
    }

    struct NeverFound;

    impl BookLookup for NeverFound {
        fn lookup(&self, _: &Isbn13) -> Result<Option<VolumeMetadata>, LookupError> {
            Ok(None)
        }
    }

    struct Exploding;

    impl BookLookup for Exploding {
        fn lookup(&self, _: &Isbn13) -> Result<Option<VolumeMetadata>, LookupError> {
            panic!("lookup exploded");
        }
    }

    fn discovery<L: BookLookup>(lookup: L, delay: Duration) -> BookDiscovery<L> {
        let policy = RetryPolicy {
            delay,
            max_attempts: None,
        };
        BookDiscovery::new(lookup, IsbnGenerator::default(), policy)
    }

    fn collect(handle: &mut FetchHandle) -> (Vec<FetchEvent>, Option<WorkerCrashed>) {
        let deadline = Instant::now() + Duration::from_secs(10);
        let mut events = Vec::new();
        while Instant::now() < deadline {
            match handle.try_next() {
                Ok(Some(event)) => {
                    let done = matches!(event, FetchEvent::Finished(_));
                    events.push(event);
                    if done {
                        return (events, None);
                    }
                }
                Ok(None) => thread::sleep(Duration::from_millis(5)),
                Err(crashed) => return (events, Some(crashed)),
            }
        }
        panic!("search did not finish in time");
    }

    #[test]
    fn test_reports_attempt_then_result() {
        let mut handle = FetchHandle::spawn(discovery(Found, Duration::ZERO)).unwrap();
        let (events, crashed) = collect(&mut handle);

        assert!(crashed.is_none());
        assert_eq!(events.len(), 2);
        let isbn = match &events[0] {
            FetchEvent::Attempt { number: 1, isbn } => isbn.clone(),
            other => panic!("unexpected event: {other:?}"),
        };
        match &events[1] {
            FetchEvent::Finished(Ok(book)) => {
                assert_eq!(book.title, "Threaded");
                assert_eq!(book.id, isbn.as_str());
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[test]
    fn test_cancel_ends_search() {
        let mut handle = FetchHandle::spawn(discovery(NeverFound, Duration::from_secs(30))).unwrap();
        handle.cancel();
        assert!(handle.is_cancelled());

        let (events, crashed) = collect(&mut handle);
        assert!(crashed.is_none());
        assert!(matches!(
            events.last(),
            Some(FetchEvent::Finished(Err(DiscoveryError::Cancelled)))
        ));
    }

    #[test]
    fn test_panic_is_reported_as_crash() {
        let mut handle = FetchHandle::spawn(discovery(Exploding, Duration::ZERO)).unwrap();
        let (_, crashed) = collect(&mut handle);
        assert_eq!(crashed, Some(WorkerCrashed("lookup exploded".to_string())));
    }
}
