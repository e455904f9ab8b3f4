use serde::{Deserialize, Serialize};

/// Upstream playback payload, deserialized permissively: every nested field
/// the projection touches may be absent.
#[derive(Debug, Clone, Deserialize)]
pub struct PlaybackState {
    pub item: Option<Track>,
    #[serde(default)]
    pub is_playing: bool,
    pub progress_ms: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Track {
    pub name: Option<String>,
    pub duration_ms: Option<u64>,
    pub artists: Option<Vec<Artist>>,
    pub album: Option<Album>,
    pub external_urls: Option<ExternalUrls>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Artist {
    pub name: Option<String>,
    pub external_urls: Option<ExternalUrls>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Album {
    pub images: Option<Vec<Image>>,
    pub external_urls: Option<ExternalUrls>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Image {
    pub url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExternalUrls {
    pub spotify: Option<String>,
}

/// The simplified projection served to the frontend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NowPlaying {
    pub album_image_url: Option<String>,
    pub artist: Option<String>,
    pub is_playing: bool,
    pub song_url: Option<String>,
    pub album_url: Option<String>,
    pub title: Option<String>,
    pub time_played: u64,
    pub time_total: u64,
    pub artist_url: Option<String>,
}

impl NowPlaying {
    /// Projects the upstream payload into the simplified shape. Total over
    /// every shape the upstream can return; an absent `item` projects to `None`.
    #[must_use]
    pub fn project(state: PlaybackState) -> Option<Self> {
        let track = state.item?;

        let album_image_url = track
            .album
            .as_ref()
            .and_then(|album| album.images.as_ref())
            .and_then(|images| images.first())
            .and_then(|image| image.url.clone());
        let album_url = track
            .album
            .as_ref()
            .and_then(|album| album.external_urls.as_ref())
            .and_then(|urls| urls.spotify.clone());
        let artist = track.artists.as_ref().map(|artists| {
            artists.iter().filter_map(|a| a.name.as_deref()).collect::<Vec<_>>().join(", ")
        });
        let artist_url = track
            .artists
            .as_ref()
            .and_then(|artists| artists.first())
            .and_then(|a| a.external_urls.as_ref())
            .and_then(|urls| urls.spotify.clone());
        let song_url = track.external_urls.as_ref().and_then(|urls| urls.spotify.clone());

        Some(Self {
            album_image_url,
            artist,
            is_playing: state.is_playing,
            song_url,
            album_url,
            title: track.name,
            time_played: state.progress_ms.unwrap_or(0),
            time_total: track.duration_ms.unwrap_or(0),
            artist_url,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(value: serde_json::Value) -> PlaybackState {
        serde_json::from_value(value).expect("playback payload should deserialize")
    }

    #[test]
    fn full_payload_projects_every_field() {
        let state = parse(json!({
            "is_playing": true,
            "progress_ms": 42_000,
            "item": {
                "name": "Paranoid Android",
                "duration_ms": 383_000,
                "artists": [
                    { "name": "Radiohead", "external_urls": { "spotify": "https://open.spotify.com/artist/radiohead" } }
                ],
                "album": {
                    "images": [{ "url": "https://i.scdn.co/image/okc" }],
                    "external_urls": { "spotify": "https://open.spotify.com/album/okc" }
                },
                "external_urls": { "spotify": "https://open.spotify.com/track/pa" }
            }
        }));

        let simplified = NowPlaying::project(state).expect("item present");
        assert_eq!(simplified.title.as_deref(), Some("Paranoid Android"));
        assert_eq!(simplified.artist.as_deref(), Some("Radiohead"));
        assert_eq!(simplified.album_image_url.as_deref(), Some("https://i.scdn.co/image/okc"));
        assert_eq!(simplified.song_url.as_deref(), Some("https://open.spotify.com/track/pa"));
        assert_eq!(simplified.album_url.as_deref(), Some("https://open.spotify.com/album/okc"));
        assert_eq!(simplified.artist_url.as_deref(), Some("https://open.spotify.com/artist/radiohead"));
        assert!(simplified.is_playing);
        assert_eq!(simplified.time_played, 42_000);
        assert_eq!(simplified.time_total, 383_000);
    }

    #[test]
    fn multiple_artists_join_with_comma() {
        let state = parse(json!({
            "item": {
                "artists": [{ "name": "Nujabes" }, { "name": "Shing02" }]
            }
        }));

        let simplified = NowPlaying::project(state).expect("item present");
        assert_eq!(simplified.artist.as_deref(), Some("Nujabes, Shing02"));
    }

    #[test]
    fn absent_item_projects_to_none() {
        assert!(NowPlaying::project(parse(json!({ "is_playing": false }))).is_none());
        assert!(NowPlaying::project(parse(json!({ "item": null }))).is_none());
    }

    #[test]
    fn missing_album_images_yields_null_art() {
        let state = parse(json!({
            "item": {
                "name": "Untitled",
                "album": { "external_urls": { "spotify": "https://open.spotify.com/album/x" } }
            }
        }));

        let simplified = NowPlaying::project(state).expect("item present");
        assert_eq!(simplified.album_image_url, None);
        assert_eq!(simplified.album_url.as_deref(), Some("https://open.spotify.com/album/x"));
    }

    #[test]
    fn empty_image_list_yields_null_art() {
        let state = parse(json!({
            "item": { "album": { "images": [] } }
        }));

        assert_eq!(NowPlaying::project(state).expect("item present").album_image_url, None);
    }

    #[test]
    fn missing_durations_default_to_zero() {
        let state = parse(json!({ "item": {} }));

        let simplified = NowPlaying::project(state).expect("item present");
        assert_eq!(simplified.time_played, 0);
        assert_eq!(simplified.time_total, 0);
        assert!(!simplified.is_playing);
        assert_eq!(simplified.title, None);
        assert_eq!(simplified.artist, None);
    }

    #[test]
    fn serializes_with_camel_case_keys() {
        let simplified = NowPlaying {
            album_image_url: None,
            artist: Some("Radiohead".into()),
            is_playing: true,
            song_url: None,
            album_url: None,
            title: Some("Let Down".into()),
            time_played: 1,
            time_total: 2,
            artist_url: None,
        };

        let value = serde_json::to_value(&simplified).expect("serializes");
        assert!(value.get("albumImageUrl").is_some());
        assert!(value.get("isPlaying").is_some());
        assert!(value.get("timePlayed").is_some());
    }
}
