//! # Screen view models
//!
//! Presentation state for each screen of the app. View models own no
//! rendering; they load data through the shared core components and expose
//! what the host needs to draw and which actions it may trigger.
//!
//! | Screen                | Backed by                                        |
//! |-----------------------|--------------------------------------------------|
//! | [`HomeScreen`]        | `ContentRepository::list_all`                    |
//! | [`SearchScreen`]      | one `list_all` plus `ContentQuery` filtering     |
//! | [`LibraryScreen`]     | `list_all` narrowed by the favorites store       |
//! | [`PlayerScreen`]      | `get_by_id`, favorites, the playback coordinator |
//! | [`ProfileScreen`]     | `AuthManager`, the playback coordinator          |
//! | [`AdminUploadScreen`] | `ContentUploader`                                |
//!
//! Retrieval failures never surface as errors here: the repository already
//! logs them and hands back an empty list, so screens show their empty state.

mod home;
mod library;
mod player;
mod profile;
mod search;
mod upload;

pub use home::{HomeScreen, DEFAULT_GREETING_NAME};
pub use library::LibraryScreen;
pub use player::{PlayerScreen, PlayerSurface, UnavailableReason};
pub use profile::ProfileScreen;
pub use search::SearchScreen;
pub use upload::AdminUploadScreen;
