//! Video platform metadata strategy.
//!
//! Resolves playlist and video details through the YouTube Data API and
//! combines them into a single preview. The playlist and video lookups are
//! independent and run concurrently; only the position of the video inside
//! the playlist needs both.

use std::sync::LazyLock;

use serde::Deserialize;
use serde::de::DeserializeOwned;
use url::Url;

use crate::classify::ClassifiedSource;
use crate::error::FetchError;

/// Public site used to build canonical watch/playlist URLs.
static SITE_URL: LazyLock<Url> =
    LazyLock::new(|| Url::parse("https://www.youtube.com").expect("site URL should parse"));

/// Separator between the playlist bracket and the video title.
const TITLE_SEPARATOR: &str = "|";

/// Page size for playlist item listing (API maximum).
const PLAYLIST_PAGE_SIZE: &str = "50";

/// Upper bound on playlist item pages read while looking for a video.
const MAX_PLAYLIST_PAGES: usize = 100;

const UNTITLED_PLAYLIST: &str = "Untitled Playlist";
const UNTITLED_VIDEO: &str = "Untitled Video";
const NO_DESCRIPTION: &str = "No description available";

/// Playlist details needed for the preview.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlaylistInfo {
    pub title: Option<String>,
    pub total_items: u64,
    pub subtitle: String,
    pub thumbnail: Option<String>,
    /// Video ids in playlist order, read until the requested video was seen.
    pub item_ids: Vec<String>,
}

/// Video details needed for the preview.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VideoInfo {
    pub title: Option<String>,
    pub description: Option<String>,
    pub thumbnail: Option<String>,
}

/// Where the requested video sits inside the playlist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaylistPosition {
    /// No video id was given alongside the playlist.
    NotRequested,
    /// Zero-based index of the video in the playlist.
    Found(usize),
    /// A video id was given but is not in the playlist's item list.
    Unknown,
}

impl PlaylistPosition {
    fn locate(item_ids: &[String], video_id: Option<&str>) -> Self {
        match video_id {
            None => Self::NotRequested,
            Some(id) => item_ids
                .iter()
                .position(|item| item == id)
                .map_or(Self::Unknown, Self::Found),
        }
    }

    /// Human readable prefix; empty unless the position is known.
    fn prefix(self) -> String {
        match self {
            Self::Found(i) => format!("#{} out of ", i + 1),
            Self::NotRequested | Self::Unknown => String::new(),
        }
    }
}

/// Preview fields produced by this strategy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoPreview {
    pub title: String,
    pub description: String,
    pub image: String,
    pub url: String,
}

/// YouTube Data API client.
#[derive(Debug, Clone)]
pub struct YouTubeClient {
    http: reqwest::Client,
    api_base: String,
    api_key: Option<String>,
}

impl YouTubeClient {
    pub fn new(http: reqwest::Client, api_base: &str, api_key: Option<String>) -> Self {
        Self {
            http,
            api_base: api_base.trim_end_matches('/').to_string(),
            api_key,
        }
    }

    /// Resolve a classified video platform URL into preview fields.
    ///
    /// Any API failure aborts the whole resolution.
    pub async fn resolve(&self, source: &ClassifiedSource) -> Result<VideoPreview, FetchError> {
        let video_id = source.video_id.as_deref();
        let playlist_id = source.playlist_id.as_deref();

        let (playlist, video) = tokio::try_join!(
            async {
                match playlist_id {
                    Some(id) => self.fetch_playlist(id, video_id).await.map(Some),
                    None => Ok(None),
                }
            },
            async {
                match video_id {
                    Some(id) => self.fetch_video(id).await.map(Some),
                    None => Ok(None),
                }
            },
        )?;

        tracing::debug!(
            video_id = ?video_id,
            playlist_id = ?playlist_id,
            has_playlist = playlist.is_some(),
            has_video = video.is_some(),
            "video platform metadata fetched"
        );

        Ok(combine(
            playlist.as_ref().zip(playlist_id),
            video.as_ref(),
            video_id,
        ))
    }

    /// Fetch playlist details, plus its item list when a video id must be located.
    pub async fn fetch_playlist(
        &self,
        playlist_id: &str,
        video_id: Option<&str>,
    ) -> Result<PlaylistInfo, FetchError> {
        let params = [("part", "snippet,contentDetails"), ("id", playlist_id)];
        let (response, item_ids) = tokio::try_join!(
            self.get_json::<ListResponse<PlaylistResource>>("playlists", &params),
            async {
                match video_id {
                    Some(video_id) => self.fetch_playlist_item_ids(playlist_id, video_id).await,
                    None => Ok(Vec::new()),
                }
            },
        )?;

        let Some(playlist) = response.items.into_iter().next() else {
            return Ok(PlaylistInfo {
                subtitle: subtitle_text(None),
                item_ids,
                ..PlaylistInfo::default()
            });
        };

        let snippet = playlist.snippet.unwrap_or_default();
        let total_items = playlist
            .content_details
            .and_then(|d| d.item_count)
            .unwrap_or(0);

        Ok(PlaylistInfo {
            title: non_empty(snippet.title),
            total_items,
            subtitle: subtitle_text(snippet.channel_title.as_deref()),
            thumbnail: snippet.thumbnails.and_then(Thumbnails::best),
            item_ids,
        })
    }

    /// Read the playlist's video ids page by page, stopping once `video_id` is seen.
    async fn fetch_playlist_item_ids(
        &self,
        playlist_id: &str,
        video_id: &str,
    ) -> Result<Vec<String>, FetchError> {
        let mut ids = Vec::new();
        let mut page_token: Option<String> = None;

        for _ in 0..MAX_PLAYLIST_PAGES {
            let mut params = vec![
                ("part", "contentDetails"),
                ("playlistId", playlist_id),
                ("maxResults", PLAYLIST_PAGE_SIZE),
            ];
            if let Some(token) = page_token.as_deref() {
                params.push(("pageToken", token));
            }

            let page: ListResponse<PlaylistItemResource> =
                self.get_json("playlistItems", &params).await?;

            ids.extend(
                page.items
                    .into_iter()
                    .filter_map(|item| item.content_details.and_then(|d| d.video_id)),
            );

            if ids.iter().any(|id| id == video_id) {
                break;
            }
            match page.next_page_token {
                Some(token) if !token.is_empty() => page_token = Some(token),
                _ => break,
            }
        }

        Ok(ids)
    }

    /// Fetch title, description and thumbnail for a video.
    pub async fn fetch_video(&self, video_id: &str) -> Result<VideoInfo, FetchError> {
        let response: ListResponse<VideoResource> = self
            .get_json("videos", &[("part", "snippet"), ("id", video_id)])
            .await?;

        let snippet = response
            .items
            .into_iter()
            .next()
            .and_then(|v| v.snippet)
            .unwrap_or_default();

        Ok(VideoInfo {
            title: non_empty(snippet.title),
            description: non_empty(snippet.description),
            thumbnail: snippet.thumbnails.and_then(Thumbnails::best),
        })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        params: &[(&str, &str)],
    ) -> Result<T, FetchError> {
        let url = format!("{}/{endpoint}", self.api_base);

        let mut request = self.http.get(&url).query(params);
        if let Some(key) = &self.api_key {
            request = request.query(&[("key", key.as_str())]);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status { url, status });
        }

        response.json::<T>().await.map_err(|e| FetchError::Decode {
            url,
            reason: e.to_string(),
        })
    }
}

/// Combine resolved playlist and video data into preview fields.
///
/// `playlist` carries the playlist id it was resolved from.
pub fn combine(
    playlist: Option<(&PlaylistInfo, &str)>,
    video: Option<&VideoInfo>,
    video_id: Option<&str>,
) -> VideoPreview {
    let video_title = video
        .and_then(|v| v.title.clone())
        .unwrap_or_else(|| UNTITLED_VIDEO.to_string());
    let video_description = video
        .and_then(|v| v.description.clone())
        .unwrap_or_else(|| NO_DESCRIPTION.to_string());
    let video_thumbnail = video.and_then(|v| v.thumbnail.clone());

    let Some((playlist, playlist_id)) = playlist else {
        return VideoPreview {
            title: video_title,
            description: video_description,
            image: video_thumbnail.unwrap_or_default(),
            url: site_url("/watch", &[("v", video_id.unwrap_or_default())]),
        };
    };

    let playlist_title = playlist.title.as_deref().unwrap_or(UNTITLED_PLAYLIST);
    let position = PlaylistPosition::locate(&playlist.item_ids, video_id);
    if position == PlaylistPosition::Unknown {
        tracing::debug!(
            playlist_id = %playlist_id,
            video_id = ?video_id,
            "video not found in playlist, omitting position"
        );
    }

    let playlist_description = format!(
        "{}{} {}",
        position.prefix(),
        playlist.total_items,
        playlist.subtitle
    );

    VideoPreview {
        title: format!("[Playlist: {playlist_title}] {TITLE_SEPARATOR} {video_title}"),
        description: format!("{playlist_description}\n\n{video_description}"),
        image: playlist
            .thumbnail
            .clone()
            .or(video_thumbnail)
            .unwrap_or_default(),
        url: site_url(
            "/playlist",
            &[("list", playlist_id), ("v", video_id.unwrap_or_default())],
        ),
    }
}

/// Canonical site URL with the given ids re-encoded as query pairs.
fn site_url(path: &str, pairs: &[(&str, &str)]) -> String {
    let mut url = SITE_URL.clone();
    url.set_path(path);
    url.query_pairs_mut().extend_pairs(pairs);
    url.into()
}

fn subtitle_text(channel: Option<&str>) -> String {
    match channel.filter(|c| !c.is_empty()) {
        Some(channel) => format!("videos · {channel}"),
        None => "videos".to_string(),
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

// Data API response shapes (only the fields we read).

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListResponse<T> {
    #[serde(default = "Vec::new")]
    items: Vec<T>,
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlaylistResource {
    snippet: Option<Snippet>,
    content_details: Option<PlaylistContentDetails>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlaylistContentDetails {
    item_count: Option<u64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlaylistItemResource {
    content_details: Option<PlaylistItemContentDetails>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlaylistItemContentDetails {
    video_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct VideoResource {
    snippet: Option<Snippet>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Snippet {
    title: Option<String>,
    description: Option<String>,
    channel_title: Option<String>,
    thumbnails: Option<Thumbnails>,
}

#[derive(Debug, Deserialize)]
struct Thumbnails {
    maxres: Option<Thumbnail>,
    standard: Option<Thumbnail>,
    high: Option<Thumbnail>,
    medium: Option<Thumbnail>,
    default: Option<Thumbnail>,
}

impl Thumbnails {
    /// Largest available thumbnail URL.
    fn best(self) -> Option<String> {
        [
            self.maxres,
            self.standard,
            self.high,
            self.medium,
            self.default,
        ]
        .into_iter()
        .flatten()
        .map(|t| t.url)
        .find(|url| !url.is_empty())
    }
}

#[derive(Debug, Deserialize)]
struct Thumbnail {
    url: String,
}
