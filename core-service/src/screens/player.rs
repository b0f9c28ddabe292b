//! Player route: one lesson, rendered according to its type.

use core_catalog::{ContentItem, ContentRepository, ContentType, FavoritesStore};
use core_playback::{InlinePlayer, PlaybackCoordinator};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, instrument, warn};

/// Why a lesson cannot be shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnavailableReason {
    NotFound,
    /// Audio or video lesson without a media URL.
    MissingMedia,
    /// Text lesson with neither body nor script.
    MissingText,
}

impl fmt::Display for UnavailableReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let message = match self {
            UnavailableReason::NotFound => "Content not found",
            UnavailableReason::MissingMedia => "This lesson has no media yet",
            UnavailableReason::MissingText => "This lesson has no text yet",
        };
        f.write_str(message)
    }
}

/// What the player route renders.
pub enum PlayerSurface {
    /// Inline audio player, already loaded and paused.
    Audio(InlinePlayer),
    /// Native video view, looping, with the cover image as poster.
    Video { url: String, poster_url: String },
    Text { body: String },
    Unavailable(UnavailableReason),
}

impl fmt::Debug for PlayerSurface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlayerSurface::Audio(player) => f.debug_tuple("Audio").field(&player.state()).finish(),
            PlayerSurface::Video { url, .. } => f.debug_struct("Video").field("url", url).finish(),
            PlayerSurface::Text { body } => {
                f.debug_struct("Text").field("len", &body.len()).finish()
            }
            PlayerSurface::Unavailable(reason) => {
                f.debug_tuple("Unavailable").field(reason).finish()
            }
        }
    }
}

pub struct PlayerScreen {
    item: Option<ContentItem>,
    surface: PlayerSurface,
    favorites: Arc<FavoritesStore>,
}

impl PlayerScreen {
    /// Resolve `id` and build its surface.
    ///
    /// A media load failure does not fail the screen: the audio surface is
    /// returned in its `Failed` state so the host can offer a retry.
    #[instrument(skip(repository, favorites, coordinator))]
    pub async fn open(
        id: &str,
        repository: &dyn ContentRepository,
        favorites: Arc<FavoritesStore>,
        coordinator: Arc<PlaybackCoordinator>,
    ) -> Self {
        let item = repository.get_by_id(id).await;

        let surface = match &item {
            None => {
                debug!("Content not found");
                PlayerSurface::Unavailable(UnavailableReason::NotFound)
            }
            Some(item) => Self::surface_for(item, coordinator).await,
        };

        Self {
            item,
            surface,
            favorites,
        }
    }

    async fn surface_for(
        item: &ContentItem,
        coordinator: Arc<PlaybackCoordinator>,
    ) -> PlayerSurface {
        match (item.content_type, item.content_url.as_deref()) {
            (ContentType::Text, _) => match item.text_payload() {
                Some(body) => PlayerSurface::Text {
                    body: body.to_string(),
                },
                None => PlayerSurface::Unavailable(UnavailableReason::MissingText),
            },
            (ContentType::Audio, Some(url)) => {
                let player = InlinePlayer::new(coordinator);
                if let Err(e) = player.load(url).await {
                    warn!(content_id = %item.id, error = %e, "Audio surface failed to load");
                }
                PlayerSurface::Audio(player)
            }
            (ContentType::Video, Some(url)) => PlayerSurface::Video {
                url: url.to_string(),
                poster_url: item.image_url.clone(),
            },
            (ContentType::Audio | ContentType::Video, None) => {
                PlayerSurface::Unavailable(UnavailableReason::MissingMedia)
            }
        }
    }

    pub fn item(&self) -> Option<&ContentItem> {
        self.item.as_ref()
    }

    pub fn surface(&self) -> &PlayerSurface {
        &self.surface
    }

    /// The inline player, for audio lessons.
    pub fn player(&self) -> Option<&InlinePlayer> {
        match &self.surface {
            PlayerSurface::Audio(player) => Some(player),
            _ => None,
        }
    }

    /// Header label: the category in upper case.
    pub fn header(&self) -> Option<String> {
        self.item.as_ref().map(|item| item.category.to_uppercase())
    }

    pub fn is_favorite(&self) -> bool {
        self.item
            .as_ref()
            .is_some_and(|item| self.favorites.is_favorite(&item.id))
    }

    /// Heart button. Returns the new membership; `false` when nothing was found.
    pub fn toggle_favorite(&self) -> bool {
        match &self.item {
            Some(item) => self.favorites.toggle(&item.id),
            None => false,
        }
    }

    /// Leaving the route releases the audio player's media.
    pub async fn close(self) {
        if let PlayerSurface::Audio(player) = self.surface {
            player.unload().await;
        }
    }
}
