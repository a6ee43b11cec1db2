//! Deterministic HTML renderer for Bleacher reports.
//!
//! [`render`] is a pure function of the [`Report`] and its [`Sources`]: no
//! I/O, no clock, no randomness. Every string taken from either input is
//! escaped before insertion, attribute values included. Sections with
//! nothing to show are omitted rather than rendered empty.

pub mod style;

use bleacher_shared::{CommunityTake, NewsItem, RedditPost, Report, Sources, truncate_with_ellipsis};

use crate::style::{GAUGE_RADIUS, INLINE_CSS, Impact, Tone};

/// Headline titles in the feed are capped at this many characters.
pub const HEADLINE_TITLE_MAX_CHARS: usize = 110;

/// Related-reading titles in the sidebar are capped at this many characters.
pub const RELATED_TITLE_MAX_CHARS: usize = 90;

/// Related-reading links shown in the sidebar.
pub const RELATED_READING_LIMIT: usize = 4;

/// A rendered report, ready for a delivery sink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub subject: String,
    pub html: String,
}

/// Render `report` and `sources` into a self-contained HTML document.
pub fn render(report: &Report, sources: &Sources) -> Document {
    let subject = format!("{} Weekly Brief — {}", report.team_name, report.date);

    let mut html = String::with_capacity(16 * 1024);

    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html.push_str("<meta charset=\"UTF-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n");
    html.push_str(&format!("<title>{}</title>\n", escape_html(&subject)));
    html.push_str("<style>");
    html.push_str(INLINE_CSS);
    html.push_str("</style>\n</head>\n<body>\n<div class=\"page\">\n");

    push_masthead(&mut html, report);

    html.push_str("<div class=\"layout\">\n<main class=\"main\">\n");
    push_executive_summary(&mut html, report);
    if !sources.news.items.is_empty() {
        push_headlines(&mut html, &sources.news.items);
    }
    push_sentiment(&mut html, report);
    if !report.community_takes.is_empty() && !sources.reddit_posts.is_empty() {
        push_hot_takes(&mut html, &report.community_takes, &sources.reddit_posts);
    }
    html.push_str("</main>\n<aside class=\"sidebar\">\n");
    push_war_room(&mut html, report, &sources.offseason_news.items);
    html.push_str("</aside>\n</div>\n");

    push_footer(&mut html, report);
    html.push_str("</div>\n</body>\n</html>\n");

    Document { subject, html }
}

/// Escape `& < > " '` for use in text and attribute values.
pub fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

// ---------------------------------------------------------------------------
// Sections
// ---------------------------------------------------------------------------

fn push_masthead(html: &mut String, report: &Report) {
    html.push_str("<header class=\"masthead\">\n");
    html.push_str(&format!("<h1>{}</h1>\n", escape_html(&report.team_name)));
    html.push_str(&format!("<p class=\"date\">{}</p>\n", escape_html(&report.date)));
    html.push_str(&format!(
        "<p class=\"season\">{}</p>\n",
        escape_html(&report.season_note)
    ));
    html.push_str("</header>\n");
}

fn push_executive_summary(html: &mut String, report: &Report) {
    html.push_str("<section class=\"card summary\">\n<h2>Executive Summary</h2>\n");
    html.push_str(&format!("<p>{}</p>\n", escape_html(&report.executive_summary)));
    html.push_str("</section>\n");
}

fn push_headlines(html: &mut String, items: &[NewsItem]) {
    html.push_str("<section class=\"card headlines-card\">\n<h2>Headlines</h2>\n");
    html.push_str("<ul class=\"headlines\">\n");
    for (index, item) in items.iter().enumerate() {
        let impact = Impact::for_position(index);
        html.push_str("<li class=\"headline\">");
        html.push_str(&format!(
            "<span class=\"impact\" style=\"background:{}\">{}</span>",
            impact.color(),
            impact.label()
        ));
        html.push_str(&format!(
            "<div><a href=\"{}\">{}</a>",
            escape_html(&item.url),
            escape_html(&truncate_with_ellipsis(&item.title, HEADLINE_TITLE_MAX_CHARS))
        ));
        html.push_str(&format!(
            "<div class=\"meta\">{}",
            escape_html(&item.source)
        ));
        if !item.date.is_empty() {
            html.push_str(&format!(" &middot; {}", escape_html(&item.date)));
        }
        html.push_str("</div></div></li>\n");
    }
    html.push_str("</ul>\n</section>\n");
}

fn push_sentiment(html: &mut String, report: &Report) {
    let score = report.sentiment_score;
    let color = Tone::for_score(score).color();
    let breakdown = report.sentiment_breakdown;

    html.push_str("<section class=\"card sentiment\">\n<h2>Fan Sentiment</h2>\n");

    html.push_str("<div class=\"gauge\">\n");
    html.push_str("<svg viewBox=\"0 0 36 36\" aria-hidden=\"true\">");
    html.push_str(&format!(
        "<circle cx=\"18\" cy=\"18\" r=\"{GAUGE_RADIUS}\" fill=\"none\" stroke=\"#E2DED9\" stroke-width=\"3.2\"/>"
    ));
    html.push_str(&format!(
        "<circle cx=\"18\" cy=\"18\" r=\"{GAUGE_RADIUS}\" fill=\"none\" stroke=\"{color}\" stroke-width=\"3.2\" stroke-dasharray=\"{score} 100\"/>"
    ));
    html.push_str("</svg>\n");
    html.push_str(&format!(
        "<div><div class=\"score\" style=\"color:{color}\">{score}</div>\
         <div class=\"label\">{}</div><div class=\"meta\">{}</div></div>\n",
        escape_html(&report.sentiment_label),
        escape_html(&report.sentiment_trend)
    ));
    html.push_str("</div>\n");

    html.push_str("<div class=\"breakdown\">");
    html.push_str(&format!(
        "<span class=\"positive\" style=\"width:{}%\"></span>",
        breakdown.positive
    ));
    html.push_str(&format!(
        "<span class=\"neutral\" style=\"width:{}%\"></span>",
        breakdown.neutral
    ));
    html.push_str(&format!(
        "<span class=\"negative\" style=\"width:{}%\"></span>",
        breakdown.negative
    ));
    html.push_str("</div>\n");
    html.push_str(&format!(
        "<div class=\"meta\">{}% positive &middot; {}% neutral &middot; {}% negative</div>\n",
        breakdown.positive, breakdown.neutral, breakdown.negative
    ));

    if !report.sentiment_keywords.is_empty() {
        html.push_str("<div class=\"chips\">");
        for keyword in &report.sentiment_keywords {
            html.push_str(&format!("<span class=\"chip\">{}</span>", escape_html(keyword)));
        }
        html.push_str("</div>\n");
    }

    html.push_str("</section>\n");
}

fn push_hot_takes(html: &mut String, takes: &[CommunityTake], posts: &[RedditPost]) {
    html.push_str("<section class=\"card hot-takes\">\n<h2>Hot Takes</h2>\n");
    for (take, post) in takes.iter().zip(posts) {
        html.push_str("<article class=\"take\">\n");
        html.push_str(&format!(
            "<h3><a href=\"{}\">{}</a></h3>\n",
            escape_html(&post.url),
            escape_html(&take.title)
        ));
        html.push_str(&format!("<p>{}</p>\n", escape_html(&take.summary)));
        html.push_str(&format!(
            "<p class=\"meta\">u/{} &middot; {}</p>\n",
            escape_html(&post.author),
            escape_html(&post.age)
        ));
        html.push_str("</article>\n");
    }
    html.push_str("</section>\n");
}

fn push_war_room(html: &mut String, report: &Report, related: &[NewsItem]) {
    html.push_str("<section class=\"card war-room\">\n<h2>War Room</h2>\n");
    html.push_str(&format!("<p>{}</p>\n", escape_html(&report.war_room_intro)));
    if !report.war_room_items.is_empty() {
        html.push_str("<ul>\n");
        for item in &report.war_room_items {
            html.push_str(&format!(
                "<li><strong>{}</strong>{}</li>\n",
                escape_html(&item.title),
                escape_html(&item.summary)
            ));
        }
        html.push_str("</ul>\n");
    }
    html.push_str("</section>\n");

    if !related.is_empty() {
        html.push_str("<section class=\"card related\">\n<h2>Related Reading</h2>\n<ul>\n");
        for item in related.iter().take(RELATED_READING_LIMIT) {
            html.push_str(&format!(
                "<li><a href=\"{}\">{}</a> <span class=\"meta\">{}</span></li>\n",
                escape_html(&item.url),
                escape_html(&truncate_with_ellipsis(&item.title, RELATED_TITLE_MAX_CHARS)),
                escape_html(&item.source)
            ));
        }
        html.push_str("</ul>\n</section>\n");
    }
}

fn push_footer(html: &mut String, report: &Report) {
    html.push_str(&format!(
        "<footer class=\"footer\">Bleacher &middot; {} weekly brief &middot; {}</footer>\n",
        escape_html(&report.team_name),
        escape_html(&report.date)
    ));
}
