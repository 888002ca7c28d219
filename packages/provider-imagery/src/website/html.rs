//! Social-preview meta tag scanning.

use scraper::{Html, Selector};
use url::Url;

use crate::types::resolution::PreviewImage;

const OG_IMAGE: &str = r#"meta[property="og:image"]"#;
const TWITTER_IMAGE: &str = r#"meta[name="twitter:image"]"#;

/// Find the preview image declared by an HTML document.
///
/// Open Graph wins over Twitter cards. Attribute order inside the tag does
/// not matter. Relative `content` values are resolved against `base` when one
/// is given; absolute values are returned untouched.
pub fn scan_preview_image(html: &str, base: Option<&Url>) -> PreviewImage {
    let document = Html::parse_document(html);

    if let Some(url) = meta_content(&document, OG_IMAGE, base) {
        return PreviewImage::OpenGraph(url);
    }
    if let Some(url) = meta_content(&document, TWITTER_IMAGE, base) {
        return PreviewImage::TwitterCard(url);
    }
    PreviewImage::NotFound
}

/// `content` of the first matching tag that has a non-blank one.
fn meta_content(document: &Html, selector: &str, base: Option<&Url>) -> Option<String> {
    let selector = Selector::parse(selector).ok()?;

    document
        .select(&selector)
        .filter_map(|element| element.value().attr("content"))
        .map(str::trim)
        .find(|content| !content.is_empty())
        .map(|content| absolutize(content, base))
}

fn absolutize(content: &str, base: Option<&Url>) -> String {
    if Url::parse(content).is_ok() {
        return content.to_string();
    }
    base.and_then(|base| base.join(content).ok())
        .map(|url| url.to_string())
        .unwrap_or_else(|| content.to_string())
}
