//! Feed assembly and RSS 2.0 serialization.
//!
//! [`assemble`] orders the extracted items (newest first, undated items
//! last) and caps the feed size. [`render`] serializes the result into a
//! fixed-shape RSS 2.0 document with the Media RSS namespace, and
//! [`write_feed`] puts the bytes on disk, creating the output directory
//! when needed.
//!
//! # Item Shape
//!
//! ```text
//! <item>
//!   <title>…</title>
//!   <link>…</link>
//!   <guid isPermaLink="true">…</guid>
//!   <pubDate>…</pubDate>              (only when a date was resolved)
//!   <description>…</description>
//!   <media:content url="…" medium="image"/>   (only when an image is known)
//!   <enclosure url="…" type="image/…"/>       (only when an image is known)
//! </item>
//! ```

use crate::models::ArticleItem;
use chrono::Utc;
use quick_xml::Writer;
use quick_xml::escape::escape;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use std::cmp::Ordering;
use std::error::Error;
use std::path::Path;
use tokio::fs;
use tracing::{error, info, instrument};

/// Media RSS namespace, used for the `media:content` image element.
pub const MEDIA_NAMESPACE: &str = "http://search.yahoo.com/mrss/";

const CHANNEL_TITLE: &str = "Articles (unofficial RSS)";
const CHANNEL_DESCRIPTION: &str = "Automatically generated feed for a page without a native one";

/// Order items and cap the feed size.
///
/// Dated items come first, newest first. Undated items keep their
/// encounter order and sort after every dated item (stable sort). The cap
/// is clamped to at least one item; a non-positive configuration is a
/// correctable mistake, not a fatal one.
pub fn assemble(mut items: Vec<ArticleItem>, max_items: usize) -> Vec<ArticleItem> {
    items.sort_by(|a, b| match (&a.pub_date, &b.pub_date) {
        (Some(x), Some(y)) => y.cmp(x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
    items.truncate(max_items.max(1));
    items
}

/// Infer the enclosure MIME type from the image URL's extension.
///
/// Feed readers expect a type on `<enclosure>`; JPEG is the default for
/// anything that is not recognizably PNG or WebP.
pub fn enclosure_mime(image_url: &str) -> &'static str {
    let lower = image_url.to_lowercase();
    if lower.ends_with(".png") {
        "image/png"
    } else if lower.ends_with(".webp") {
        "image/webp"
    } else {
        "image/jpeg"
    }
}

/// Render the assembled items as an RSS 2.0 document.
///
/// # Arguments
///
/// * `items` - The assembled items, already ordered and capped
/// * `list_url` - The source listing URL, used as the channel link
/// * `ttl_minutes` - Refresh interval, emitted as the channel `ttl`
///
/// # Returns
///
/// The complete UTF-8 XML document, starting with an XML declaration.
pub fn render(
    items: &[ArticleItem],
    list_url: &str,
    ttl_minutes: u32,
) -> Result<String, Box<dyn Error>> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))?;

    let mut rss = BytesStart::new("rss");
    rss.push_attribute(("version", "2.0"));
    rss.push_attribute(("xmlns:media", MEDIA_NAMESPACE));
    writer.write_event(Event::Start(rss))?;
    writer.write_event(Event::Start(BytesStart::new("channel")))?;

    write_text_element(&mut writer, "title", CHANNEL_TITLE)?;
    write_text_element(&mut writer, "link", list_url)?;
    write_text_element(&mut writer, "description", CHANNEL_DESCRIPTION)?;
    write_text_element(&mut writer, "lastBuildDate", &Utc::now().to_rfc2822())?;
    write_text_element(&mut writer, "ttl", &ttl_minutes.to_string())?;

    for item in items {
        write_item(&mut writer, item)?;
    }

    writer.write_event(Event::End(BytesEnd::new("channel")))?;
    writer.write_event(Event::End(BytesEnd::new("rss")))?;

    Ok(String::from_utf8(writer.into_inner())?)
}

fn write_item(writer: &mut Writer<Vec<u8>>, item: &ArticleItem) -> Result<(), Box<dyn Error>> {
    writer.write_event(Event::Start(BytesStart::new("item")))?;

    write_text_element(writer, "title", &item.title)?;
    write_text_element(writer, "link", &item.link)?;

    let mut guid = BytesStart::new("guid");
    guid.push_attribute(("isPermaLink", "true"));
    writer.write_event(Event::Start(guid))?;
    writer.write_event(Event::Text(BytesText::new(&item.guid)))?;
    writer.write_event(Event::End(BytesEnd::new("guid")))?;

    if let Some(date) = &item.pub_date {
        write_text_element(writer, "pubDate", &date.to_rfc2822())?;
    }

    // The description carries one explicit round of HTML escaping on top
    // of the writer's own text escaping, so readers that unescape the
    // element body still see inert markup.
    write_text_element(writer, "description", &escape(item.description.as_str()))?;

    if let Some(image) = &item.image {
        let mut media = BytesStart::new("media:content");
        media.push_attribute(("url", image.as_str()));
        media.push_attribute(("medium", "image"));
        writer.write_event(Event::Empty(media))?;

        let mut enclosure = BytesStart::new("enclosure");
        enclosure.push_attribute(("url", image.as_str()));
        enclosure.push_attribute(("type", enclosure_mime(image)));
        writer.write_event(Event::Empty(enclosure))?;
    }

    writer.write_event(Event::End(BytesEnd::new("item")))?;
    Ok(())
}

fn write_text_element(
    writer: &mut Writer<Vec<u8>>,
    name: &str,
    text: &str,
) -> Result<(), Box<dyn Error>> {
    writer.write_event(Event::Start(BytesStart::new(name)))?;
    writer.write_event(Event::Text(BytesText::new(text)))?;
    writer.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}

/// Write the rendered feed to disk, creating parent directories as needed.
#[instrument(level = "info", skip(xml), fields(path = %out_path))]
pub async fn write_feed(xml: &str, out_path: &str) -> Result<(), Box<dyn Error>> {
    if let Some(parent) = Path::new(out_path).parent() {
        if !parent.as_os_str().is_empty() {
            if let Err(e) = fs::create_dir_all(parent).await {
                error!(parent = %parent.display(), error = %e, "Failed to create output dir");
                return Err(e.into());
            }
        }
    }

    fs::write(out_path, xml).await?;
    info!(bytes = xml.len(), "Wrote feed document");
    Ok(())
}
