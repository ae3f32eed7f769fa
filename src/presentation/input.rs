use crate::application::{App, AppMode, SwipeDirection};
use crate::infrastructure::FileRepository;
use crossterm::event::{KeyCode, KeyModifiers};

pub struct InputHandler;

impl InputHandler {
    pub fn handle_key_event(app: &mut App, key: KeyCode, modifiers: KeyModifiers) {
        match app.mode {
            AppMode::Swipe => Self::handle_swipe_mode(app, key),
            AppMode::Liked => Self::handle_liked_mode(app, key, modifiers),
            AppMode::Help => Self::handle_help_mode(app, key),
            AppMode::ExportCsv => Self::handle_filename_input_mode(app, key),
        }
    }

    fn handle_swipe_mode(app: &mut App, key: KeyCode) {
        match key {
            KeyCode::Left | KeyCode::Char('h') | KeyCode::Char('x') => {
                app.swipe(SwipeDirection::Left);
            }
            KeyCode::Right | KeyCode::Char('l') | KeyCode::Enter => {
                app.swipe(SwipeDirection::Right);
            }
            KeyCode::Char('r') => {
                app.retry();
            }
            KeyCode::Tab | KeyCode::Char('b') => {
                app.status_message = None;
                app.show_liked();
            }
            KeyCode::F(1) | KeyCode::Char('?') => {
                app.show_help();
            }
            KeyCode::Char('q') => {
                // Will be handled by main loop
            }
            _ => {}
        }
    }

    fn handle_liked_mode(app: &mut App, key: KeyCode, modifiers: KeyModifiers) {
        if modifiers.contains(KeyModifiers::CONTROL) {
            if let KeyCode::Char('e') = key {
                app.start_csv_export();
            }
            return;
        }

        match key {
            KeyCode::Up | KeyCode::Char('k') => {
                app.select_previous_liked();
            }
            KeyCode::Down | KeyCode::Char('j') => {
                app.select_next_liked();
            }
            KeyCode::Char('d') | KeyCode::Delete | KeyCode::Backspace => {
                app.remove_selected_liked();
            }
            KeyCode::Tab | KeyCode::Esc => {
                app.status_message = None;
                app.show_swipe();
            }
            KeyCode::F(1) | KeyCode::Char('?') => {
                app.show_help();
            }
            _ => {}
        }
    }

    fn handle_help_mode(app: &mut App, key: KeyCode) {
        match key {
            KeyCode::Esc | KeyCode::F(1) | KeyCode::Char('?') | KeyCode::Char('q') => {
                app.close_help();
            }
            KeyCode::Up | KeyCode::Char('k') => {
                if app.help_scroll > 0 {
                    app.help_scroll -= 1;
                }
            }
            KeyCode::Down | KeyCode::Char('j') => {
                app.help_scroll += 1;
            }
            KeyCode::PageUp => {
                app.help_scroll = app.help_scroll.saturating_sub(5);
            }
            KeyCode::PageDown => {
                app.help_scroll += 5;
            }
            KeyCode::Home => {
                app.help_scroll = 0;
            }
            _ => {}
        }
    }

    fn handle_filename_input_mode(app: &mut App, key: KeyCode) {
        match key {
            KeyCode::Enter => {
                let filename = app.get_csv_export_filename();
                let result = FileRepository::export_liked_csv(&app.liked, &filename)
                    .map_err(|e| e.to_string());
                app.set_csv_export_result(result);
            }
            KeyCode::Esc => {
                app.cancel_filename_input();
            }
            KeyCode::Backspace => {
                if app.cursor_position > 0 {
                    app.filename_input.remove(app.cursor_position - 1);
                    app.cursor_position -= 1;
                }
            }
            KeyCode::Delete => {
                if app.cursor_position < app.filename_input.len() {
                    app.filename_input.remove(app.cursor_position);
                }
            }
            KeyCode::Left => {
                if app.cursor_position > 0 {
                    app.cursor_position -= 1;
                }
            }
            KeyCode::Right => {
                if app.cursor_position < app.filename_input.len() {
                    app.cursor_position += 1;
                }
            }
            KeyCode::Home => {
                app.cursor_position = 0;
            }
            KeyCode::End => {
                app.cursor_position = app.filename_input.len();
            }
            KeyCode::Char(c) if c.is_ascii() => {
                app.filename_input.insert(app.cursor_position, c);
                app.cursor_position += 1;
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::SwipeState;
    use crate::domain::{
        Book, BookLookup, Isbn13, IsbnGenerator, LookupError, RetryPolicy, VolumeMetadata,
    };
    use std::sync::Arc;
    use std::time::Duration;

    struct NeverFound;

    impl BookLookup for NeverFound {
        fn lookup(&self, _: &Isbn13) -> Result<Option<VolumeMetadata>, LookupError> {
            Ok(None)
        }
    }

    fn test_app() -> App {
        let policy = RetryPolicy {
            delay: Duration::from_secs(30),
            max_attempts: None,
        };
        App::new(Arc::new(NeverFound), IsbnGenerator::default(), policy)
    }

    fn book(id: &str) -> Book {
        Book::from_metadata(id, &VolumeMetadata::default())
    }

    fn press(app: &mut App, key: KeyCode) {
        InputHandler::handle_key_event(app, key, KeyModifiers::NONE);
    }

    #[test]
    fn test_like_key_adds_current_book() {
        let mut app = test_app();
        app.swipe = SwipeState::Showing(book("111"));

        press(&mut app, KeyCode::Right);
        assert!(app.liked.contains("111"));
        assert!(app.is_loading());
    }

    #[test]
    fn test_skip_key_leaves_store_alone() {
        let mut app = test_app();
        app.swipe = SwipeState::Showing(book("111"));

        press(&mut app, KeyCode::Char('h'));
        assert!(app.liked.is_empty());
        assert!(app.is_loading());
    }

    #[test]
    fn test_swipe_keys_disabled_while_loading() {
        let mut app = test_app();
        press(&mut app, KeyCode::Char('l'));
        assert!(app.liked.is_empty());
    }

    #[test]
    fn test_retry_key_from_error_panel() {
        let mut app = test_app();
        app.swipe = SwipeState::Failed("boom".to_string());
        press(&mut app, KeyCode::Char('r'));
        assert!(app.is_loading());
    }

    #[test]
    fn test_liked_view_remove_and_back() {
        let mut app = test_app();
        app.liked.add(book("111"));
        app.liked.add(book("222"));

        press(&mut app, KeyCode::Tab);
        assert_eq!(app.mode, AppMode::Liked);

        press(&mut app, KeyCode::Char('j'));
        press(&mut app, KeyCode::Char('d'));
        assert!(!app.liked.contains("222"));
        assert!(app.liked.contains("111"));

        press(&mut app, KeyCode::Esc);
        assert_eq!(app.mode, AppMode::Swipe);
    }

    #[test]
    fn test_csv_export_key_binding() {
        let mut app = test_app();
        app.show_liked();

        InputHandler::handle_key_event(&mut app, KeyCode::Char('e'), KeyModifiers::CONTROL);
        assert_eq!(app.mode, AppMode::ExportCsv);
        assert_eq!(app.filename_input, "liked_books.csv");
    }

    #[test]
    fn test_export_filename_editing() {
        let mut app = test_app();
        app.show_liked();
        app.start_csv_export();

        press(&mut app, KeyCode::Char('x'));
        assert_eq!(app.filename_input, "liked_books.csvx");

        press(&mut app, KeyCode::Backspace);
        assert_eq!(app.filename_input, "liked_books.csv");

        press(&mut app, KeyCode::Esc);
        assert_eq!(app.mode, AppMode::Liked);
        assert!(app.filename_input.is_empty());
    }

    #[test]
    fn test_export_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");

        let mut app = test_app();
        app.liked.add(book("111"));
        app.show_liked();
        app.start_csv_export();
        app.filename_input = path.to_str().unwrap().to_string();
        press(&mut app, KeyCode::Enter);

        assert_eq!(app.mode, AppMode::Liked);
        assert!(app.status_message.as_deref().unwrap().starts_with("Exported to"));
        assert!(std::fs::read_to_string(&path).unwrap().contains("111"));
    }

    #[test]
    fn test_help_toggle() {
        let mut app = test_app();
        press(&mut app, KeyCode::Char('?'));
        assert_eq!(app.mode, AppMode::Help);

        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::PageDown);
        assert_eq!(app.help_scroll, 6);
        press(&mut app, KeyCode::Home);
        assert_eq!(app.help_scroll, 0);

        press(&mut app, KeyCode::Char('q'));
        assert_eq!(app.mode, AppMode::Swipe);
    }
}
