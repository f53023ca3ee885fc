//! Markdown assembly: resolve image placeholders and join pages.
//!
//! The OCR endpoint returns each page's Markdown with images referenced as
//! `![img-0.jpeg](img-0.jpeg)` and the image payloads listed separately. Here
//! each placeholder is rewritten to `![img-0.jpeg](<payload>)` and the pages
//! are concatenated in order.
//!
//! A placeholder without a matching image is left untouched; that is not an
//! error.

use crate::client::{OcrPage, OcrResponse};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;
use tracing::warn;

/// Separator placed between consecutive pages.
pub const PAGE_SEPARATOR: &str = "\n\n";

/// Combine every page of `response` into one Markdown document.
pub fn get_combined_markdown(response: &OcrResponse) -> String {
    let markdown = response
        .pages
        .iter()
        .map(page_markdown)
        .collect::<Vec<_>>()
        .join(PAGE_SEPARATOR);

    let unresolved = unresolved_placeholders(&markdown);
    if !unresolved.is_empty() {
        warn!(
            "{} image placeholder(s) left unresolved: {}",
            unresolved.len(),
            unresolved.join(", ")
        );
    }
    markdown
}

/// One page's Markdown with its own images substituted.
fn page_markdown(page: &OcrPage) -> String {
    let images: HashMap<&str, &str> = page
        .images
        .iter()
        .filter_map(|img| img.image_base64.as_deref().map(|b64| (img.id.as_str(), b64)))
        .collect();
    replace_images_in_markdown(&page.markdown, &images)
}

/// Replace every `![id](id)` with `![id](payload)` for each entry of `images`.
///
/// Payloads are inserted verbatim.
pub fn replace_images_in_markdown(markdown: &str, images: &HashMap<&str, &str>) -> String {
    let mut out = markdown.to_string();
    for (id, payload) in images {
        let placeholder = format!("![{id}]({id})");
        if out.contains(&placeholder) {
            out = out.replace(&placeholder, &format!("![{id}]({payload})"));
        }
    }
    out
}

static RE_IMAGE_LINK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"!\[([^\]\n]+)\]\(([^)\s]+)\)").unwrap());

/// Ids of image links whose target still equals their alt text.
pub fn unresolved_placeholders(markdown: &str) -> Vec<String> {
    RE_IMAGE_LINK
        .captures_iter(markdown)
        .filter(|c| c[1] == c[2])
        .map(|c| c[1].to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::OcrImage;

    fn page(markdown: &str, images: &[(&str, &str)]) -> OcrPage {
        OcrPage {
            markdown: markdown.to_string(),
            images: images
                .iter()
                .map(|(id, b64)| OcrImage {
                    id: id.to_string(),
                    image_base64: Some(b64.to_string()),
                    ..Default::default()
                })
                .collect(),
            ..Default::default()
        }
    }

    #[test]
    fn two_pages_joined_with_blank_line() {
        let response = OcrResponse {
            pages: vec![page("![img-0](img-0)", &[("img-0", "AAAA")]), page("Hello", &[])],
            ..Default::default()
        };
        assert_eq!(get_combined_markdown(&response), "![img-0](AAAA)\n\nHello");
    }

    #[test]
    fn unmatched_placeholder_is_left_alone() {
        let response = OcrResponse {
            pages: vec![
                page("Intro ![img-0](img-0)", &[("img-9", "ZZZZ")]),
                page("![img-1](img-1)", &[]),
            ],
            ..Default::default()
        };
        assert_eq!(
            get_combined_markdown(&response),
            "Intro ![img-0](img-0)\n\n![img-1](img-1)"
        );
    }

    #[test]
    fn images_only_resolve_on_their_own_page() {
        let response = OcrResponse {
            pages: vec![
                page("![img-1](img-1)", &[]),
                page("![img-1](img-1)", &[("img-1", "QQ==")]),
            ],
            ..Default::default()
        };
        assert_eq!(
            get_combined_markdown(&response),
            "![img-1](img-1)\n\n![img-1](QQ==)"
        );
    }

    #[test]
    fn image_without_payload_is_skipped() {
        let mut p = page("![img-0](img-0)", &[]);
        p.images.push(OcrImage {
            id: "img-0".into(),
            image_base64: None,
            ..Default::default()
        });
        let response = OcrResponse {
            pages: vec![p],
            ..Default::default()
        };
        assert_eq!(get_combined_markdown(&response), "![img-0](img-0)");
    }

    #[test]
    fn every_occurrence_is_replaced() {
        let images = HashMap::from([("a.png", "data:image/png;base64,AA"), ("b.png", "BB")]);
        let out = replace_images_in_markdown(
            "![a.png](a.png) text ![b.png](b.png) again ![a.png](a.png)",
            &images,
        );
        assert_eq!(
            out,
            "![a.png](data:image/png;base64,AA) text ![b.png](BB) again ![a.png](data:image/png;base64,AA)"
        );
    }

    #[test]
    fn no_pages_yields_empty_document() {
        assert_eq!(get_combined_markdown(&OcrResponse::default()), "");
    }

    #[test]
    fn unresolved_placeholders_ignores_real_links() {
        let md = "![img-0](img-0) ![logo](https://x/logo.png) ![img-1](AAAA)";
        assert_eq!(unresolved_placeholders(md), vec!["img-0".to_string()]);
    }
}
