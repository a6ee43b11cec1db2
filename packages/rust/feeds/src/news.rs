//! Google News RSS search feed.
//!
//! Google News appends `" - Outlet Name"` to every title; we split that off
//! into [`NewsItem::source`]. Publication dates become short relative labels
//! computed against a caller-supplied `now`, so parsing stays deterministic.

use chrono::{DateTime, Utc};
use quick_xml::events::Event;
use quick_xml::reader::Reader;
use tracing::{info, instrument, warn};
use url::Url;

use bleacher_shared::{BleacherError, NewsData, NewsItem, Result, seasonal_keyword};

use crate::FeedClient;

/// Headlines kept per feed.
pub const NEWS_ITEM_LIMIT: usize = 6;

/// Blob used when a feed has no entries.
const EMPTY_NEWS_BLOB: &str = "No news articles found for this team this week.";

/// Blob used when the seasonal feed has no entries.
const EMPTY_OFFSEASON_BLOB: &str = "No offseason news found for this team this week.";

/// Fetch general team headlines.
#[instrument(skip_all, fields(query = %query))]
pub async fn fetch_news(client: &FeedClient, query: &str, now: DateTime<Utc>) -> Result<NewsData> {
    let url = search_url(&client.endpoints().news_base, query)?;
    info!(%url, "fetching general news");

    let xml = client.get_text(url.as_str()).await?;
    let data = parse_news_feed(&xml, now, NEWS_ITEM_LIMIT, EMPTY_NEWS_BLOB)?;

    if data.items.is_empty() {
        warn!("no general news entries found");
    }
    Ok(data)
}

/// Fetch headlines for `query` narrowed by the seasonal keyword for `month`.
#[instrument(skip_all, fields(query = %query, month))]
pub async fn fetch_offseason_news(
    client: &FeedClient,
    query: &str,
    month: u32,
    now: DateTime<Utc>,
) -> Result<NewsData> {
    let keyword = seasonal_keyword(month).replace([' ', '/'], "+");
    let url = search_url(&client.endpoints().news_base, &format!("{query}+{keyword}"))?;
    info!(%url, "fetching offseason/seasonal news");

    let xml = client.get_text(url.as_str()).await?;
    let data = parse_news_feed(&xml, now, NEWS_ITEM_LIMIT, EMPTY_OFFSEASON_BLOB)?;

    if data.items.is_empty() {
        warn!("no offseason news entries found");
    }
    Ok(data)
}

/// `query` is `+`-joined; every other character is percent-encoded.
fn search_url(base: &str, query: &str) -> Result<Url> {
    let terms = query
        .split('+')
        .filter(|term| !term.is_empty())
        .collect::<Vec<_>>()
        .join(" ");
    Url::parse_with_params(
        &format!("{}/rss/search", base.trim_end_matches('/')),
        &[("q", terms.as_str()), ("hl", "en-US"), ("gl", "US"), ("ceid", "US:en")],
    )
    .map_err(|e| BleacherError::config(format!("invalid news endpoint '{base}': {e}")))
}

// ---------------------------------------------------------------------------
// RSS parsing
// ---------------------------------------------------------------------------

/// Raw fields of one `<item>`.
#[derive(Debug, Default)]
struct RssEntry {
    title: String,
    link: String,
    pub_date: String,
    source: String,
}

#[derive(Debug, Clone, Copy)]
enum Field {
    Title,
    Link,
    PubDate,
    Source,
}

/// Parse an RSS document into at most `limit` headlines.
///
/// `empty_blob` becomes the text blob when the feed has no items.
pub fn parse_news_feed(
    xml: &str,
    now: DateTime<Utc>,
    limit: usize,
    empty_blob: &str,
) -> Result<NewsData> {
    let entries = read_entries(xml, limit)?;

    if entries.is_empty() {
        return Ok(NewsData {
            items: Vec::new(),
            text_blob: empty_blob.to_string(),
        });
    }

    let items: Vec<NewsItem> = entries.into_iter().map(|e| to_news_item(e, now)).collect();
    let text_blob = items
        .iter()
        .map(|item| format!("• [{}] {} ({})", item.source, item.title, item.date))
        .collect::<Vec<_>>()
        .join("\n");

    Ok(NewsData { items, text_blob })
}

fn read_entries(xml: &str, limit: usize) -> Result<Vec<RssEntry>> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut entries = Vec::new();
    let mut current: Option<RssEntry> = None;
    let mut field: Option<Field> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => match e.local_name().as_ref() {
                b"item" => current = Some(RssEntry::default()),
                b"title" if current.is_some() => field = Some(Field::Title),
                b"link" if current.is_some() => field = Some(Field::Link),
                b"pubDate" if current.is_some() => field = Some(Field::PubDate),
                b"source" if current.is_some() => field = Some(Field::Source),
                _ => field = None,
            },
            Ok(Event::Text(t)) => {
                let text = match t.unescape() {
                    Ok(s) => s.into_owned(),
                    // Unknown named entities (e.g. &nbsp;) keep their raw form.
                    Err(_) => String::from_utf8_lossy(&t).into_owned(),
                };
                push_field(&mut current, field, &text);
            }
            Ok(Event::CData(c)) => {
                let text = String::from_utf8_lossy(&c.into_inner()).into_owned();
                push_field(&mut current, field, &text);
            }
            Ok(Event::End(e)) => {
                if e.local_name().as_ref() == b"item" {
                    if let Some(entry) = current.take() {
                        entries.push(entry);
                        if entries.len() >= limit {
                            break;
                        }
                    }
                }
                field = None;
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(BleacherError::parse(format!(
                    "malformed RSS at byte {}: {e}",
                    reader.error_position()
                )));
            }
            _ => {}
        }
    }

    Ok(entries)
}

fn push_field(current: &mut Option<RssEntry>, field: Option<Field>, text: &str) {
    let (Some(entry), Some(field)) = (current.as_mut(), field) else {
        return;
    };
    let target = match field {
        Field::Title => &mut entry.title,
        Field::Link => &mut entry.link,
        Field::PubDate => &mut entry.pub_date,
        Field::Source => &mut entry.source,
    };
    target.push_str(text);
}

fn to_news_item(entry: RssEntry, now: DateTime<Utc>) -> NewsItem {
    let raw_title = entry.title.trim();
    let (title, source) = match raw_title.rsplit_once(" - ") {
        Some((title, outlet)) => (title.trim().to_string(), outlet.trim().to_string()),
        None if !entry.source.trim().is_empty() => {
            (raw_title.to_string(), entry.source.trim().to_string())
        }
        None => (raw_title.to_string(), "News".to_string()),
    };

    NewsItem {
        title,
        source,
        url: entry.link.trim().to_string(),
        date: date_label(&entry.pub_date, now),
    }
}

/// Relative label for an RFC 2822 `pubDate`; empty when unparsable.
fn date_label(pub_date: &str, now: DateTime<Utc>) -> String {
    let Ok(published) = DateTime::parse_from_rfc2822(pub_date.trim()) else {
        return String::new();
    };
    let published = published.with_timezone(&Utc);
    let hours = (now - published).num_seconds() as f64 / 3600.0;

    if hours < 1.0 {
        "< 1 hr ago".into()
    } else if hours < 24.0 {
        format!("{} hrs ago", hours as i64)
    } else if hours < 48.0 {
        "Yesterday".into()
    } else {
        published.format("%b %d").to_string()
    }
}
