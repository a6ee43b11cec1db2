//! Subreddit hot posts and their top comments via Reddit's public JSON API.

use chrono::{DateTime, Utc};
use scraper::Html;
use serde::Deserialize;
use tracing::{debug, info, instrument, warn};

use bleacher_shared::{RedditData, RedditPost, Result, collapse_whitespace, truncate_with_ellipsis};

use crate::FeedClient;

/// Hot posts kept per cycle.
pub const REDDIT_POST_LIMIT: usize = 8;

/// Top-level comments kept per post.
pub const REDDIT_COMMENT_LIMIT: usize = 3;

const SELFTEXT_MAX_CHARS: usize = 300;
const COMMENT_MAX_CHARS: usize = 280;

const EMPTY_REDDIT_BLOB: &str = "No Reddit activity found this week.";

/// Domains whose links are always images or video.
const MEDIA_DOMAINS: &[&str] = &["i.redd.it", "v.redd.it", "imgur.com", "i.imgur.com"];

/// `post_hint` values that mark a media post.
const MEDIA_HINTS: &[&str] = &["image", "hosted:video", "rich:video"];

// ---------------------------------------------------------------------------
// Wire format
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct PostListing {
    data: PostListingData,
}

#[derive(Debug, Deserialize)]
struct PostListingData {
    #[serde(default)]
    children: Vec<PostThing>,
}

#[derive(Debug, Deserialize)]
struct PostThing {
    data: RawPost,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawPost {
    id: String,
    title: String,
    author: String,
    permalink: String,
    url: String,
    domain: String,
    selftext: String,
    created_utc: f64,
    stickied: bool,
    is_video: bool,
    post_hint: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CommentListing {
    data: CommentListingData,
}

#[derive(Debug, Deserialize)]
struct CommentListingData {
    #[serde(default)]
    children: Vec<CommentThing>,
}

#[derive(Debug, Deserialize)]
struct CommentThing {
    kind: String,
    #[serde(default)]
    data: RawComment,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawComment {
    body: String,
    author: String,
    stickied: bool,
}

/// A post from the hot listing plus the id needed to fetch its comments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListedPost {
    pub id: String,
    pub post: RedditPost,
}

// ---------------------------------------------------------------------------
// Fetch
// ---------------------------------------------------------------------------

/// Fetch hot posts from `r/{subreddit}` with their top comments.
///
/// A failed comment request leaves that post without comments; only the
/// listing request itself can fail the whole fetch.
#[instrument(skip_all, fields(subreddit = %subreddit))]
pub async fn fetch_reddit(
    client: &FeedClient,
    subreddit: &str,
    now: DateTime<Utc>,
) -> Result<RedditData> {
    let base = &client.endpoints().reddit_base;
    let url = format!("{base}/r/{subreddit}/hot.json?limit={REDDIT_POST_LIMIT}");
    info!(%url, "fetching subreddit hot posts");

    let listing: PostListing = client.get_json(&url).await?;
    let listed = listed_posts(listing, base, now);

    if listed.is_empty() {
        warn!("no usable posts in listing");
        return Ok(RedditData {
            posts: Vec::new(),
            posts_text: EMPTY_REDDIT_BLOB.into(),
        });
    }

    let mut posts = Vec::with_capacity(listed.len());
    for ListedPost { id, mut post } in listed {
        let comments_url = format!(
            "{base}/r/{subreddit}/comments/{id}.json?limit={REDDIT_COMMENT_LIMIT}&sort=top"
        );
        match client.get_json::<Vec<CommentListing>>(&comments_url).await {
            Ok(listings) => post.comments = top_comments(listings),
            Err(e) => warn!(post_id = %id, error = %e, "could not fetch comments"),
        }
        posts.push(post);
    }

    info!(posts = posts.len(), "reddit fetch complete");

    let posts_text = posts_text(&posts);
    Ok(RedditData { posts, posts_text })
}

/// Parse a hot listing into at most [`REDDIT_POST_LIMIT`] posts.
///
/// AutoModerator and stickied posts are dropped. `base` prefixes permalinks.
pub fn parse_listing(body: &str, base: &str, now: DateTime<Utc>) -> Result<Vec<ListedPost>> {
    let listing: PostListing = serde_json::from_str(body).map_err(|e| {
        bleacher_shared::BleacherError::parse(format!("invalid reddit listing: {e}"))
    })?;
    Ok(listed_posts(listing, base, now))
}

fn listed_posts(listing: PostListing, base: &str, now: DateTime<Utc>) -> Vec<ListedPost> {
    listing
        .data
        .children
        .into_iter()
        .map(|thing| thing.data)
        .filter(|raw| !raw.stickied && !is_automoderator(&raw.author))
        .take(REDDIT_POST_LIMIT)
        .map(|raw| to_listed_post(raw, base, now))
        .collect()
}

fn to_listed_post(raw: RawPost, base: &str, now: DateTime<Utc>) -> ListedPost {
    let is_media = is_media(&raw);
    let selftext = if is_media {
        String::new()
    } else {
        truncate_with_ellipsis(&clean_reddit_text(&raw.selftext), SELFTEXT_MAX_CHARS)
    };

    let url = if raw.permalink.is_empty() {
        raw.url
    } else {
        format!("{base}{}", raw.permalink)
    };

    debug!(post_id = %raw.id, is_media, "parsed post");

    ListedPost {
        id: raw.id,
        post: RedditPost {
            title: collapse_whitespace(&raw.title),
            author: raw.author,
            url,
            age: age_label(raw.created_utc, now),
            selftext,
            comments: Vec::new(),
            is_media,
        },
    }
}

/// The comments endpoint returns `[post listing, comment listing]`.
fn top_comments(listings: Vec<CommentListing>) -> Vec<String> {
    let Some(comments) = listings.into_iter().nth(1) else {
        return Vec::new();
    };

    comments
        .data
        .children
        .into_iter()
        .filter(|thing| thing.kind == "t1")
        .map(|thing| thing.data)
        .filter(|c| !c.stickied && !is_automoderator(&c.author))
        .map(|c| clean_reddit_text(&c.body))
        .filter(|body| !body.is_empty())
        .take(REDDIT_COMMENT_LIMIT)
        .map(|body| truncate_with_ellipsis(&body, COMMENT_MAX_CHARS))
        .collect()
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Decode entities and strip markup from Reddit text, drop removal markers
/// and collapse whitespace.
pub fn clean_reddit_text(raw: &str) -> String {
    let fragment = Html::parse_fragment(raw);
    let text: String = fragment.root_element().text().collect();
    let text = text.replace("[removed]", " ").replace("[deleted]", " ");
    collapse_whitespace(&text)
}

fn is_automoderator(author: &str) -> bool {
    author.eq_ignore_ascii_case("automoderator")
}

fn is_media(raw: &RawPost) -> bool {
    if raw.is_video {
        return true;
    }
    if raw
        .post_hint
        .as_deref()
        .is_some_and(|hint| MEDIA_HINTS.contains(&hint))
    {
        return true;
    }
    let domain = raw.domain.to_ascii_lowercase();
    let url = raw.url.to_ascii_lowercase();
    MEDIA_DOMAINS
        .iter()
        .any(|d| domain == *d || url.contains(d))
}

fn age_label(created_utc: f64, now: DateTime<Utc>) -> String {
    let now_secs = now.timestamp() as f64;
    let hours = ((now_secs - created_utc) / 3600.0).max(0.0);

    if hours < 1.0 {
        "< 1 hour ago".into()
    } else if hours < 24.0 {
        format!("{}h ago", hours as i64)
    } else {
        format!("{}d ago", (hours / 24.0) as i64)
    }
}

fn posts_text(posts: &[RedditPost]) -> String {
    let mut lines = Vec::new();
    for post in posts {
        lines.push(format!("### {} ({})", post.title, post.age));
        if post.is_media {
            lines.push("  [image/video post]".to_string());
        } else if !post.selftext.is_empty() {
            lines.push(format!("  {}", post.selftext));
        }
        for comment in &post.comments {
            lines.push(format!("  > {comment}"));
        }
        lines.push(format!("  posted by u/{}", post.author));
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use serde_json::json;

    use super::*;
    use crate::FeedEndpoints;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 2, 20, 12, 0, 0).unwrap()
    }

    fn ts(hours_ago: i64) -> f64 {
        (now().timestamp() - hours_ago * 3600) as f64
    }

    fn listing() -> serde_json::Value {
        json!({
            "kind": "Listing",
            "data": {
                "children": [
                    { "kind": "t3", "data": {
                        "id": "mod1", "title": "Weekly Free Talk Thread",
                        "author": "AutoModerator", "permalink": "/r/miamidolphins/comments/mod1/",
                        "created_utc": ts(2), "stickied": true
                    }},
                    { "kind": "t3", "data": {
                        "id": "abc", "title": "Is the  O-line fixed?",
                        "author": "finsfan", "permalink": "/r/miamidolphins/comments/abc/",
                        "selftext": "They signed two guards &amp; a tackle.\n\n[removed]",
                        "created_utc": ts(5), "domain": "self.miamidolphins"
                    }},
                    { "kind": "t3", "data": {
                        "id": "img", "title": "Stadium at sunset",
                        "author": "photog", "permalink": "/r/miamidolphins/comments/img/",
                        "url": "https://i.redd.it/xyz.jpg", "domain": "i.redd.it",
                        "selftext": "", "created_utc": ts(50)
                    }},
                    { "kind": "t3", "data": {
                        "id": "vid", "title": "Hype video",
                        "author": "editor", "permalink": "/r/miamidolphins/comments/vid/",
                        "is_video": true, "created_utc": ts(0)
                    }}
                ]
            }
        })
    }

    #[test]
    fn listing_drops_automoderator_and_stickied() {
        let posts = parse_listing(&listing().to_string(), "https://www.reddit.com", now()).unwrap();
        let ids: Vec<_> = posts.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, ["abc", "img", "vid"]);
    }

    #[test]
    fn listing_cleans_text_and_builds_urls() {
        let posts = parse_listing(&listing().to_string(), "https://www.reddit.com", now()).unwrap();
        let post = &posts[0].post;
        assert_eq!(post.title, "Is the O-line fixed?");
        assert_eq!(post.selftext, "They signed two guards & a tackle.");
        assert_eq!(post.url, "https://www.reddit.com/r/miamidolphins/comments/abc/");
        assert!(!post.is_media);
    }

    #[test]
    fn media_detection() {
        let posts = parse_listing(&listing().to_string(), "https://www.reddit.com", now()).unwrap();
        assert!(posts[1].post.is_media, "i.redd.it domain");
        assert!(posts[2].post.is_media, "is_video flag");
        assert!(posts[1].post.selftext.is_empty());
    }

    #[test]
    fn age_labels() {
        assert_eq!(age_label(ts(0), now()), "< 1 hour ago");
        assert_eq!(age_label(ts(5), now()), "5h ago");
        assert_eq!(age_label(ts(50), now()), "2d ago");
    }

    #[test]
    fn listing_caps_at_limit() {
        let children: Vec<_> = (0..12)
            .map(|i| json!({ "kind": "t3", "data": { "id": format!("p{i}"), "title": "t", "author": "a" }}))
            .collect();
        let body = json!({ "data": { "children": children } }).to_string();
        let posts = parse_listing(&body, "", now()).unwrap();
        assert_eq!(posts.len(), REDDIT_POST_LIMIT);
    }

    #[test]
    fn long_selftext_is_capped() {
        let body = json!({ "data": { "children": [
            { "kind": "t3", "data": { "id": "x", "title": "t", "author": "a", "selftext": "word ".repeat(200) }}
        ]}})
        .to_string();
        let posts = parse_listing(&body, "", now()).unwrap();
        assert_eq!(posts[0].post.selftext.chars().count(), SELFTEXT_MAX_CHARS);
        assert!(posts[0].post.selftext.ends_with('…'));
    }

    #[test]
    fn clean_text_strips_markup_and_markers() {
        assert_eq!(
            clean_reddit_text("<p>Hello&nbsp;<b>world</b></p> [deleted]"),
            "Hello world"
        );
        assert_eq!(clean_reddit_text("[removed]"), "");
    }

    #[test]
    fn comments_skip_more_and_bots() {
        let body = json!([
            { "data": { "children": [ { "kind": "t3", "data": { "title": "post" } } ] } },
            { "data": { "children": [
                { "kind": "t1", "data": { "body": "Sticky rules", "author": "AutoModerator", "stickied": true } },
                { "kind": "t1", "data": { "body": "Great move", "author": "a" } },
                { "kind": "t1", "data": { "body": "[deleted]", "author": "b" } },
                { "kind": "t1", "data": { "body": "Overpaid", "author": "c" } },
                { "kind": "more", "data": { "count": 10 } }
            ]}}
        ]);
        let listings: Vec<CommentListing> = serde_json::from_value(body).unwrap();
        assert_eq!(top_comments(listings), ["Great move", "Overpaid"]);
    }

    #[test]
    fn blob_lists_posts_comments_and_authors() {
        let posts = vec![RedditPost {
            title: "Trade talk".into(),
            author: "finsfan".into(),
            url: "u".into(),
            age: "3h ago".into(),
            selftext: "Thoughts?".into(),
            comments: vec!["Do it".into()],
            is_media: false,
        }];
        assert_eq!(
            posts_text(&posts),
            "### Trade talk (3h ago)\n  Thoughts?\n  > Do it\n  posted by u/finsfan"
        );
    }

    #[tokio::test]
    async fn fetch_reddit_degrades_failed_comments() {
        use wiremock::matchers::{method, path, query_param};
        use wiremock::{Mock, MockServer, ResponseTemplate};

        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/r/miamidolphins/hot.json"))
            .and(query_param("limit", "8"))
            .respond_with(ResponseTemplate::new(200).set_body_json(listing()))
            .mount(&server)
            .await;
        Mock::given(path("/r/miamidolphins/comments/abc.json"))
            .and(query_param("sort", "top"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                { "data": { "children": [] } },
                { "data": { "children": [ { "kind": "t1", "data": { "body": "Finally!", "author": "x" } } ] } }
            ])))
            .mount(&server)
            .await;
        // Comments for the other posts are not mocked and return 404.

        let client = FeedClient::with_endpoints(FeedEndpoints {
            news_base: server.uri(),
            reddit_base: server.uri(),
        })
        .unwrap();

        let data = fetch_reddit(&client, "miamidolphins", now()).await.unwrap();
        assert_eq!(data.posts.len(), 3);
        assert_eq!(data.posts[0].comments, ["Finally!"]);
        assert!(data.posts[1].comments.is_empty());
        assert!(data.posts_text.contains("> Finally!"));
    }

    #[tokio::test]
    async fn malformed_listing_is_parse_error_and_bad_comments_degrade() {
        use wiremock::{Mock, MockServer, ResponseTemplate, matchers::path};

        let server = MockServer::start().await;
        Mock::given(path("/r/broken/hot.json"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>rate limited"))
            .mount(&server)
            .await;
        Mock::given(path("/r/miamidolphins/hot.json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(listing()))
            .mount(&server)
            .await;
        Mock::given(path("/r/miamidolphins/comments/abc.json"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let client = FeedClient::with_endpoints(FeedEndpoints {
            news_base: server.uri(),
            reddit_base: server.uri(),
        })
        .unwrap();

        let err = fetch_reddit(&client, "broken", now()).await.unwrap_err();
        assert!(matches!(err, bleacher_shared::BleacherError::Parse { .. }));

        let data = fetch_reddit(&client, "miamidolphins", now()).await.unwrap();
        assert_eq!(data.posts.len(), 3);
        assert!(data.posts[0].comments.is_empty());
    }

    #[tokio::test]
    async fn empty_listing_uses_placeholder() {
        use wiremock::{Mock, MockServer, ResponseTemplate, matchers::path};

        let server = MockServer::start().await;
        Mock::given(path("/r/empty/hot.json"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({ "data": { "children": [] } })),
            )
            .mount(&server)
            .await;

        let client = FeedClient::with_endpoints(FeedEndpoints {
            news_base: server.uri(),
            reddit_base: server.uri(),
        })
        .unwrap();

        let data = fetch_reddit(&client, "empty", now()).await.unwrap();
        assert!(data.posts.is_empty());
        assert_eq!(data.posts_text, EMPTY_REDDIT_BLOB);
    }
}
