//! Application state management for the book discovery terminal UI.
//!
//! This module contains the main application state, the swipe state machine
//! and mode management for the terminal user interface.

use std::sync::Arc;

use tracing::{error, info};

use crate::application::worker::{FetchEvent, FetchHandle};
use crate::domain::{
    Book, BookDiscovery, BookLookup, DiscoveryError, IsbnGenerator, LikedBooks, RetryPolicy,
};

/// Lookup service shared with every search thread.
pub type SharedLookup = Arc<dyn BookLookup + Send + Sync>;

/// Represents the current mode of the application.
///
/// The mode decides which view is drawn and how key presses are interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppMode {
    /// One book at a time, skip or like
    Swipe,
    /// Gallery of liked books
    Liked,
    /// Help screen is displayed over the previous view
    Help,
    /// CSV export dialog is open over the liked view
    ExportCsv,
}

/// Direction of a swipe decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwipeDirection {
    /// Skip the current book
    Left,
    /// Like the current book
    Right,
}

/// What the swipe view currently shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SwipeState {
    /// A search is running
    Loading {
        /// Candidates tried so far
        attempts: u32,
        /// Most recent candidate identifier
        candidate: Option<String>,
    },
    /// A book is ready for a decision
    Showing(Book),
    /// The search failed; the user may retry
    Failed(String),
}

/// Main application state.
///
/// Owns the liked-books store and hands it to the views by reference, and
/// owns at most one running search at a time.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use bookswipe::application::{App, AppMode};
/// use bookswipe::domain::{
///     BookLookup, Isbn13, IsbnGenerator, LookupError, RetryPolicy, VolumeMetadata,
/// };
///
/// struct Offline;
///
/// impl BookLookup for Offline {
///     fn lookup(&self, _: &Isbn13) -> Result<Option<VolumeMetadata>, LookupError> {
///         Err(LookupError::Transport("offline".to_string()))
///     }
/// }
///
/// let app = App::new(Arc::new(Offline), IsbnGenerator::default(), RetryPolicy::default());
/// assert_eq!(app.mode, AppMode::Swipe);
/// assert!(app.liked.is_empty());
/// ```
pub struct App {
    /// Books liked during this session
    pub liked: LikedBooks,
    /// Current application mode
    pub mode: AppMode,
    /// Mode to return to when the help screen closes
    pub help_return: AppMode,
    /// Content of the swipe view
    pub swipe: SwipeState,
    /// Selected row in the liked view
    pub liked_selected: usize,
    /// Scroll position in help text
    pub help_scroll: usize,
    /// Temporary status message to display
    pub status_message: Option<String>,
    /// Input buffer for filename entry
    pub filename_input: String,
    /// Cursor position within the filename buffer
    pub cursor_position: usize,
    lookup: SharedLookup,
    generator: IsbnGenerator,
    policy: RetryPolicy,
    fetch: Option<FetchHandle>,
}

impl App {
    pub fn new(lookup: SharedLookup, generator: IsbnGenerator, policy: RetryPolicy) -> Self {
        Self {
            liked: LikedBooks::default(),
            mode: AppMode::Swipe,
            help_return: AppMode::Swipe,
            swipe: SwipeState::Loading {
                attempts: 0,
                candidate: None,
            },
            liked_selected: 0,
            help_scroll: 0,
            status_message: None,
            filename_input: String::new(),
            cursor_position: 0,
            lookup,
            generator,
            policy,
            fetch: None,
        }
    }

    /// Starts a search for the next book, abandoning any search in progress.
    ///
    /// Events from an abandoned search are never applied: its handle, and with
    /// it the channel, is dropped here.
    pub fn start_fetch(&mut self) {
        if let Some(previous) = self.fetch.take() {
            previous.cancel();
        }

        self.swipe = SwipeState::Loading {
            attempts: 0,
            candidate: None,
        };

        let discovery = BookDiscovery::new(
            Arc::clone(&self.lookup),
            self.generator.clone(),
            self.policy,
        );
        match FetchHandle::spawn(discovery) {
            Ok(handle) => {
                info!("searching for a book");
                self.fetch = Some(handle);
            }
            Err(err) => {
                error!(error = %err, "cannot start book search");
                self.swipe = SwipeState::Failed(format!("Could not start book search: {err}"));
            }
        }
    }

    /// Applies every event the running search has produced so far.
    ///
    /// Call this between frames.
    pub fn poll_fetch(&mut self) {
        while let Some(handle) = self.fetch.as_mut() {
            match handle.try_next() {
                Ok(Some(FetchEvent::Attempt { number, isbn })) => {
                    self.swipe = SwipeState::Loading {
                        attempts: number,
                        candidate: Some(isbn.to_string()),
                    };
                }
                Ok(Some(FetchEvent::Finished(result))) => {
                    self.fetch = None;
                    self.finish_fetch(result);
                }
                Ok(None) => break,
                Err(crashed) => {
                    error!(message = %crashed.0, "book search crashed");
                    self.fetch = None;
                    self.swipe = SwipeState::Failed(crashed.0);
                }
            }
        }
    }

    fn finish_fetch(&mut self, result: Result<Book, DiscoveryError>) {
        match result {
            Ok(book) => self.swipe = SwipeState::Showing(book),
            // Only reachable through shutdown, which also drops the handle.
            Err(DiscoveryError::Cancelled) => {}
            Err(err) => {
                error!(error = %err, "book search failed");
                self.swipe = SwipeState::Failed(err.to_string());
            }
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.swipe, SwipeState::Loading { .. })
    }

    /// Swipes are accepted only while a book is on screen.
    pub fn can_swipe(&self) -> bool {
        matches!(self.swipe, SwipeState::Showing(_))
    }

    pub fn current_book(&self) -> Option<&Book> {
        match &self.swipe {
            SwipeState::Showing(book) => Some(book),
            _ => None,
        }
    }

    /// Records the decision on the current book and starts the next search.
    ///
    /// A right swipe adds the book to the liked store before the next search
    /// begins. Ignored while loading or after a failure.
    pub fn swipe(&mut self, direction: SwipeDirection) {
        let Some(book) = self.current_book().cloned() else {
            return;
        };

        match direction {
            SwipeDirection::Right => {
                if self.liked.add(book.clone()) {
                    info!(id = %book.id, "liked book");
                    self.status_message = Some(format!("Liked \"{}\"", book.title));
                } else {
                    self.status_message = Some(format!("\"{}\" is already liked", book.title));
                }
            }
            SwipeDirection::Left => {
                self.status_message = None;
            }
        }

        self.start_fetch();
    }

    /// Manual retry from the error panel.
    pub fn retry(&mut self) {
        if matches!(self.swipe, SwipeState::Failed(_)) {
            self.status_message = None;
            self.start_fetch();
        }
    }

    pub fn show_liked(&mut self) {
        self.mode = AppMode::Liked;
        self.clamp_liked_selection();
    }

    pub fn show_swipe(&mut self) {
        self.mode = AppMode::Swipe;
    }

    pub fn show_help(&mut self) {
        if self.mode != AppMode::Help {
            self.help_return = self.mode;
        }
        self.mode = AppMode::Help;
        self.help_scroll = 0;
    }

    pub fn close_help(&mut self) {
        self.mode = self.help_return;
    }

    pub fn select_next_liked(&mut self) {
        if self.liked_selected + 1 < self.liked.len() {
            self.liked_selected += 1;
        }
    }

    pub fn select_previous_liked(&mut self) {
        self.liked_selected = self.liked_selected.saturating_sub(1);
    }

    pub fn selected_liked(&self) -> Option<&Book> {
        self.liked.get(self.liked_selected)
    }

    /// Removes the selected book from the liked store.
    pub fn remove_selected_liked(&mut self) {
        let Some(id) = self.selected_liked().map(|book| book.id.clone()) else {
            return;
        };
        if self.liked.remove(&id) {
            info!(%id, "removed liked book");
            self.status_message = Some(format!("Removed {id}"));
        }
        self.clamp_liked_selection();
    }

    fn clamp_liked_selection(&mut self) {
        self.liked_selected = self.liked_selected.min(self.liked.len().saturating_sub(1));
    }

    /// Switches to CSV export mode to prompt for a filename.
    pub fn start_csv_export(&mut self) {
        self.mode = AppMode::ExportCsv;
        self.filename_input = "liked_books.csv".to_string();
        self.cursor_position = self.filename_input.len();
        self.status_message = None;
    }

    /// Returns the filename input if not empty, otherwise the default CSV filename.
    pub fn get_csv_export_filename(&self) -> String {
        if self.filename_input.is_empty() {
            "liked_books.csv".to_string()
        } else {
            self.filename_input.clone()
        }
    }

    /// Processes the result of a CSV export and returns to the liked view.
    pub fn set_csv_export_result(&mut self, result: Result<String, String>) {
        match result {
            Ok(filename) => {
                self.status_message = Some(format!("Exported to {}", filename));
            }
            Err(error) => {
                self.status_message = Some(format!("Export failed: {}", error));
            }
        }

        self.mode = AppMode::Liked;
        self.filename_input.clear();
        self.cursor_position = 0;
    }

    /// Cancels filename input and returns to the liked view.
    pub fn cancel_filename_input(&mut self) {
        self.mode = AppMode::Liked;
        self.filename_input.clear();
        self.cursor_position = 0;
    }

    /// Stops the running search, if any. No further state updates follow.
    pub fn shutdown(&mut self) {
        if let Some(handle) = self.fetch.take() {
            handle.cancel();
        }
    }
}

impl Drop for App {
    fn drop(&mut self) {
        self.shutdown();
    }
}
