// src/services/feed.rs

//! RSS feed emitter.
//!
//! The whole document is rendered in memory before anything touches disk,
//! so a feed is either written completely or not at all.

use chrono::{DateTime, SecondsFormat, Utc};
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};

use crate::error::{AppError, Result};
use crate::models::ArticleRecord;

const ATOM_NS: &str = "http://www.w3.org/2005/Atom";
const DC_NS: &str = "http://purl.org/dc/elements/1.1/";

/// Channel-level metadata, set once per feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelInfo {
    pub title: String,
    pub link: String,
    pub description: String,
    pub language: String,
    pub author: String,
    pub generator: String,
}

impl Default for ChannelInfo {
    fn default() -> Self {
        Self {
            title: "AFL.com.au News".to_string(),
            link: "https://www.afl.com.au/news".to_string(),
            description: "Latest news from AFL.com.au".to_string(),
            language: "en".to_string(),
            author: "AFL.com.au".to_string(),
            generator: "AFL RSS Feed Generator".to_string(),
        }
    }
}

/// Accumulates articles into an RSS 2.0 document.
#[derive(Debug, Clone, Default)]
pub struct FeedEmitter {
    channel: ChannelInfo,
    entries: Vec<ArticleRecord>,
}

impl FeedEmitter {
    pub fn new(channel: ChannelInfo) -> Self {
        Self {
            channel,
            entries: Vec::new(),
        }
    }

    pub fn add_article(&mut self, article: &ArticleRecord) {
        self.entries.push(article.clone());
    }

    pub fn add_articles<'a>(&mut self, articles: impl IntoIterator<Item = &'a ArticleRecord>) {
        self.entries.extend(articles.into_iter().cloned());
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Render the feed as indented XML.
    pub fn render(&self, built_at: DateTime<Utc>) -> Result<Vec<u8>> {
        let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
        write(&mut writer, Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

        let mut rss = BytesStart::new("rss");
        rss.push_attribute(("version", "2.0"));
        rss.push_attribute(("xmlns:atom", ATOM_NS));
        rss.push_attribute(("xmlns:dc", DC_NS));
        write(&mut writer, Event::Start(rss))?;
        write(&mut writer, Event::Start(BytesStart::new("channel")))?;

        let channel = &self.channel;
        write_text_element(&mut writer, "title", &channel.title)?;
        write_text_element(&mut writer, "link", &channel.link)?;
        write_text_element(&mut writer, "description", &channel.description)?;
        write_text_element(&mut writer, "language", &channel.language)?;
        write_text_element(&mut writer, "dc:creator", &channel.author)?;
        write_text_element(&mut writer, "generator", &channel.generator)?;
        write_text_element(&mut writer, "lastBuildDate", &built_at.to_rfc2822())?;

        for article in &self.entries {
            write_item(&mut writer, article)?;
        }

        write(&mut writer, Event::End(BytesEnd::new("channel")))?;
        write(&mut writer, Event::End(BytesEnd::new("rss")))?;

        let mut out = writer.into_inner();
        out.push(b'\n');
        Ok(out)
    }
}

fn write_item(writer: &mut Writer<Vec<u8>>, article: &ArticleRecord) -> Result<()> {
    write(writer, Event::Start(BytesStart::new("item")))?;
    write_text_element(writer, "title", &article.title)?;
    write_text_element(writer, "link", &article.url)?;
    write_text_element(writer, "description", &article.description)?;

    let mut guid = BytesStart::new("guid");
    guid.push_attribute(("isPermaLink", "false"));
    write(writer, Event::Start(guid))?;
    write(writer, Event::Text(BytesText::new(&sanitize_text(&article.url))))?;
    write(writer, Event::End(BytesEnd::new("guid")))?;

    write_text_element(writer, "pubDate", &article.published.to_rfc2822())?;
    write_text_element(
        writer,
        "atom:updated",
        &article.published.to_rfc3339_opts(SecondsFormat::Secs, true),
    )?;
    write(writer, Event::End(BytesEnd::new("item")))
}

fn write_text_element(writer: &mut Writer<Vec<u8>>, name: &str, text: &str) -> Result<()> {
    write(writer, Event::Start(BytesStart::new(name)))?;
    write(writer, Event::Text(BytesText::new(&sanitize_text(text))))?;
    write(writer, Event::End(BytesEnd::new(name)))
}

fn write(writer: &mut Writer<Vec<u8>>, event: Event<'_>) -> Result<()> {
    writer.write_event(event).map_err(AppError::feed)
}

/// Strip control characters that are not allowed in XML 1.0.
fn sanitize_text(input: &str) -> String {
    input
        .chars()
        .filter(|&c| matches!(c, '\t' | '\n' | '\r') || c >= ' ')
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn article(n: u32, title: &str) -> ArticleRecord {
        ArticleRecord {
            title: title.to_string(),
            url: format!("https://www.afl.com.au/news/{n}"),
            description: format!("Summary {n}"),
            published: Utc.with_ymd_and_hms(2024, 3, 15, 8, 40, 0).unwrap(),
        }
    }

    fn render(articles: &[ArticleRecord]) -> String {
        let mut emitter = FeedEmitter::default();
        emitter.add_articles(articles);
        let built = Utc.with_ymd_and_hms(2024, 3, 15, 9, 0, 0).unwrap();
        String::from_utf8(emitter.render(built).unwrap()).unwrap()
    }

    #[test]
    fn test_channel_metadata() {
        let xml = render(&[article(1, "One")]);
        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
        assert!(xml.contains("<rss version=\"2.0\""));
        assert!(xml.contains("<title>AFL.com.au News</title>"));
        assert!(xml.contains("<link>https://www.afl.com.au/news</link>"));
        assert!(xml.contains("<description>Latest news from AFL.com.au</description>"));
        assert!(xml.contains("<language>en</language>"));
        assert!(xml.contains("<dc:creator>AFL.com.au</dc:creator>"));
        assert!(xml.contains("<generator>AFL RSS Feed Generator</generator>"));
    }

    #[test]
    fn test_item_fields() {
        let xml = render(&[article(7, "Match Report")]);
        assert!(xml.contains("<title>Match Report</title>"));
        assert!(xml.contains("<link>https://www.afl.com.au/news/7</link>"));
        assert!(xml.contains("<description>Summary 7</description>"));
        assert!(
            xml.contains("<guid isPermaLink=\"false\">https://www.afl.com.au/news/7</guid>")
        );
        assert!(xml.contains("<pubDate>Fri, 15 Mar 2024 08:40:00 +0000</pubDate>"));
        assert!(xml.contains("<atom:updated>2024-03-15T08:40:00Z</atom:updated>"));
    }

    #[test]
    fn test_one_item_per_article_in_order() {
        let xml = render(&[article(1, "First"), article(2, "Second")]);
        assert_eq!(xml.matches("<item>").count(), 2);
        let first = xml.find("<title>First</title>").unwrap();
        let second = xml.find("<title>Second</title>").unwrap();
        assert!(first < second);
    }

    #[test]
    fn test_text_is_escaped_and_sanitized() {
        let xml = render(&[article(1, "Tigers & Blues <live>\u{0007}")]);
        assert!(xml.contains("Tigers &amp; Blues &lt;live&gt;"));
        assert!(!xml.contains('\u{0007}'));
    }

    #[test]
    fn test_output_is_indented() {
        let xml = render(&[article(1, "One")]);
        assert!(xml.contains("\n  <channel>"));
        assert!(xml.contains("\n    <item>"));
    }
}
