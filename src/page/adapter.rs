//! Selector-driven implementation of the page adapter

use crate::config::{FieldSelector, LinkSelector, SelectorConfig};
use crate::page::PageError;
use crate::ConfigError;
use scraper::{ElementRef, Html, Selector};
use url::Url;

/// Book metadata parsed from the first catalogue page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookMeta {
    pub name: String,
    pub author: String,
    pub category: String,
    pub status: String,
}

/// One chapter link extracted from a catalogue page
#[derive(Debug, Clone)]
pub struct ChapterLink {
    pub title: String,
    pub url: Url,
}

/// Extraction contract between the harvest pipeline and one source's markup
pub trait PageAdapter {
    /// Parses book metadata from a catalogue page
    fn book_meta(&self, html: &str) -> Result<BookMeta, PageError>;

    /// Parses the chapter list of one catalogue page; hrefs are resolved
    /// against `base`. An empty list is a parse failure.
    fn catalogue_entries(&self, html: &str, base: &Url) -> Result<Vec<ChapterLink>, PageError>;

    /// Finds the link to the next catalogue page, if any
    fn next_catalogue_page(&self, html: &str, base: &Url) -> Result<Option<Url>, PageError>;

    /// Extracts the chapter body text of one page (unnormalized)
    fn chapter_text(&self, html: &str) -> Result<String, PageError>;

    /// Finds the link to the next page within a chapter, if any
    fn next_chapter_page(&self, html: &str, base: &Url) -> Result<Option<Url>, PageError>;
}

struct Field {
    name: String,
    selector: Selector,
    strip_prefix: Option<String>,
}

struct NextLink {
    selector: Selector,
    label: Option<String>,
}

/// Page adapter configured from CSS selectors
pub struct SelectorAdapter {
    book_name: Field,
    author: Field,
    category: Field,
    book_status: Field,
    entry_list: Selector,
    entry_list_source: String,
    next_catalogue: NextLink,
    content: Selector,
    content_source: String,
    next_page: NextLink,
}

fn parse_selector(name: &str, source: &str) -> Result<Selector, ConfigError> {
    Selector::parse(source)
        .map_err(|e| ConfigError::InvalidSelector(name.to_string(), e.to_string()))
}

fn parse_field(name: &str, config: &FieldSelector) -> Result<Field, ConfigError> {
    Ok(Field {
        name: name.to_string(),
        selector: parse_selector(name, &config.selector)?,
        strip_prefix: config.strip_prefix.clone(),
    })
}

fn parse_next(name: &str, config: &LinkSelector) -> Result<NextLink, ConfigError> {
    Ok(NextLink {
        selector: parse_selector(name, &config.selector)?,
        label: config.label.clone(),
    })
}

impl SelectorAdapter {
    /// Compiles all configured selectors; a malformed selector is a
    /// configuration error caught before any network traffic
    pub fn from_config(config: &SelectorConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            book_name: parse_field("selectors.book-name", &config.book_name)?,
            author: parse_field("selectors.author", &config.author)?,
            category: parse_field("selectors.category", &config.category)?,
            book_status: parse_field("selectors.book-status", &config.book_status)?,
            entry_list: parse_selector("selectors.entry-list", &config.entry_list)?,
            entry_list_source: config.entry_list.clone(),
            next_catalogue: parse_next("selectors.next-catalogue", &config.next_catalogue)?,
            content: parse_selector("selectors.content", &config.content)?,
            content_source: config.content.clone(),
            next_page: parse_next("selectors.next-page", &config.next_page)?,
        })
    }

    fn extract_field(&self, document: &Html, field: &Field) -> Result<String, PageError> {
        let element = document
            .select(&field.selector)
            .next()
            .ok_or_else(|| PageError::Missing(field.name.clone()))?;

        let mut text = element.text().collect::<String>().trim().to_string();
        if let Some(prefix) = &field.strip_prefix {
            if let Some(rest) = text.strip_prefix(prefix.as_str()) {
                text = rest.trim().to_string();
            }
        }

        if text.is_empty() {
            return Err(PageError::Missing(field.name.clone()));
        }
        Ok(text)
    }

    fn find_next(
        &self,
        document: &Html,
        next: &NextLink,
        base: &Url,
    ) -> Result<Option<Url>, PageError> {
        for element in document.select(&next.selector) {
            if let Some(label) = &next.label {
                let text = element.text().collect::<String>();
                if text.trim() != label {
                    continue;
                }
            }
            return resolve_href(element, base).map(Some);
        }
        Ok(None)
    }
}

fn resolve_href(element: ElementRef, base: &Url) -> Result<Url, PageError> {
    let href = element.value().attr("href").ok_or(PageError::MissingHref)?;

    base.join(href.trim()).map_err(|source| PageError::BadHref {
        href: href.to_string(),
        source,
    })
}

impl PageAdapter for SelectorAdapter {
    fn book_meta(&self, html: &str) -> Result<BookMeta, PageError> {
        let document = Html::parse_document(html);

        Ok(BookMeta {
            name: self.extract_field(&document, &self.book_name)?,
            author: self.extract_field(&document, &self.author)?,
            category: self.extract_field(&document, &self.category)?,
            status: self.extract_field(&document, &self.book_status)?,
        })
    }

    fn catalogue_entries(&self, html: &str, base: &Url) -> Result<Vec<ChapterLink>, PageError> {
        let document = Html::parse_document(html);

        let mut entries = Vec::new();
        for element in document.select(&self.entry_list) {
            let title = element.text().collect::<String>().trim().to_string();
            let url = resolve_href(element, base)?;
            entries.push(ChapterLink { title, url });
        }

        if entries.is_empty() {
            return Err(PageError::Missing(format!(
                "catalogue entry list ({})",
                self.entry_list_source
            )));
        }
        Ok(entries)
    }

    fn next_catalogue_page(&self, html: &str, base: &Url) -> Result<Option<Url>, PageError> {
        let document = Html::parse_document(html);
        self.find_next(&document, &self.next_catalogue, base)
    }

    fn chapter_text(&self, html: &str) -> Result<String, PageError> {
        let document = Html::parse_document(html);

        let region = document.select(&self.content).next().ok_or_else(|| {
            PageError::Missing(format!("content region ({})", self.content_source))
        })?;

        // Text nodes become candidate lines; <br>-separated paragraphs
        // fall out naturally and normalization tidies the rest
        let text = region.text().collect::<Vec<_>>().join("\n");
        Ok(text)
    }

    fn next_chapter_page(&self, html: &str, base: &Url) -> Result<Option<Url>, PageError> {
        let document = Html::parse_document(html);
        self.find_next(&document, &self.next_page, base)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{FieldSelector, LinkSelector, SelectorConfig};

    fn test_adapter() -> SelectorAdapter {
        let config = SelectorConfig {
            book_name: FieldSelector {
                selector: "div.info h1".to_string(),
                strip_prefix: None,
            },
            author: FieldSelector {
                selector: "div.info p.author".to_string(),
                strip_prefix: Some("Author:".to_string()),
            },
            category: FieldSelector {
                selector: "div.info p.category".to_string(),
                strip_prefix: Some("Category:".to_string()),
            },
            book_status: FieldSelector {
                selector: "div.info p.state".to_string(),
                strip_prefix: Some("Status:".to_string()),
            },
            entry_list: "ul.chapters li a".to_string(),
            next_catalogue: LinkSelector {
                selector: "a.pager".to_string(),
                label: Some("Next".to_string()),
            },
            content: "div#content".to_string(),
            next_page: LinkSelector {
                selector: "a.pagenext".to_string(),
                label: None,
            },
        };
        SelectorAdapter::from_config(&config).unwrap()
    }

    fn base() -> Url {
        Url::parse("http://example.com/book/6114/").unwrap()
    }

    const CATALOGUE_PAGE: &str = r#"
        <html><body>
        <div class="info">
            <h1>Sample</h1>
            <p class="author">Author: A</p>
            <p class="category">Category: Fantasy</p>
            <p class="state">Status: Ongoing</p>
        </div>
        <ul class="chapters">
            <li><a href="/c1">Ch1</a></li>
            <li><a href="/c2">Ch2</a></li>
        </ul>
        <a class="pager" href="/book/6114/">First</a>
        <a class="pager" href="/book/6114/2/">Next</a>
        </body></html>
    "#;

    #[test]
    fn test_book_meta_extraction() {
        let meta = test_adapter().book_meta(CATALOGUE_PAGE).unwrap();
        assert_eq!(
            meta,
            BookMeta {
                name: "Sample".to_string(),
                author: "A".to_string(),
                category: "Fantasy".to_string(),
                status: "Ongoing".to_string(),
            }
        );
    }

    #[test]
    fn test_book_meta_missing_field_is_error() {
        let html = r#"<div class="info"><h1>Sample</h1></div>"#;
        let result = test_adapter().book_meta(html);
        assert!(matches!(result, Err(PageError::Missing(f)) if f.contains("author")));
    }

    #[test]
    fn test_catalogue_entries_resolved_against_base() {
        let entries = test_adapter()
            .catalogue_entries(CATALOGUE_PAGE, &base())
            .unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].title, "Ch1");
        assert_eq!(entries[0].url.as_str(), "http://example.com/c1");
        assert_eq!(entries[1].title, "Ch2");
    }

    #[test]
    fn test_empty_entry_list_is_error() {
        let html = "<html><body><p>nothing here</p></body></html>";
        let result = test_adapter().catalogue_entries(html, &base());
        assert!(matches!(result, Err(PageError::Missing(_))));
    }

    #[test]
    fn test_next_catalogue_filtered_by_label() {
        let next = test_adapter()
            .next_catalogue_page(CATALOGUE_PAGE, &base())
            .unwrap();
        assert_eq!(next.unwrap().as_str(), "http://example.com/book/6114/2/");
    }

    #[test]
    fn test_absent_next_link_is_none() {
        let html = r#"<html><body><a class="pager" href="/x">First</a></body></html>"#;
        let next = test_adapter().next_catalogue_page(html, &base()).unwrap();
        assert!(next.is_none());
    }

    #[test]
    fn test_chapter_text_extraction() {
        let html = r#"<div id="content">Hello.<br/>Second line.</div>"#;
        let text = test_adapter().chapter_text(html).unwrap();
        assert!(text.contains("Hello."));
        assert!(text.contains("Second line."));
    }

    #[test]
    fn test_missing_content_region_is_error() {
        let html = "<html><body><p>no content div</p></body></html>";
        let result = test_adapter().chapter_text(html);
        assert!(matches!(result, Err(PageError::Missing(_))));
    }

    #[test]
    fn test_next_chapter_page() {
        let html = r#"<div id="content">x</div><a class="pagenext" href="/c1_2">next</a>"#;
        let next = test_adapter().next_chapter_page(html, &base()).unwrap();
        assert_eq!(next.unwrap().as_str(), "http://example.com/c1_2");
    }

    #[test]
    fn test_invalid_selector_rejected_at_build() {
        let mut config = SelectorConfig {
            book_name: FieldSelector {
                selector: "h1".to_string(),
                strip_prefix: None,
            },
            author: FieldSelector {
                selector: "p".to_string(),
                strip_prefix: None,
            },
            category: FieldSelector {
                selector: "p".to_string(),
                strip_prefix: None,
            },
            book_status: FieldSelector {
                selector: "p".to_string(),
                strip_prefix: None,
            },
            entry_list: "li a".to_string(),
            next_catalogue: LinkSelector {
                selector: "a".to_string(),
                label: None,
            },
            content: "div".to_string(),
            next_page: LinkSelector {
                selector: "a".to_string(),
                label: None,
            },
        };
        config.entry_list = ":::not a selector".to_string();
        let result = SelectorAdapter::from_config(&config);
        assert!(matches!(
            result,
            Err(crate::ConfigError::InvalidSelector(_, _))
        ));
    }
}
