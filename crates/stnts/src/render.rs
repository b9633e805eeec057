//! Page rendering: the site plus the clock, through the template cache.

use chrono::{DateTime, FixedOffset};
use serde::Serialize;

use crate::assets::{BASE_HTML, INDEX_HTML};
use crate::error::AppError;
use crate::site::Site;
use crate::template::TemplateCache;

/// Fragments of the index page, base layout first.
pub const INDEX_FRAGMENTS: &[&str] = &[BASE_HTML, INDEX_HTML];

/// Pipeline value for the index page.
#[derive(Debug, Serialize)]
pub struct IndexPage<'a> {
    pub site: &'a Site,
    pub now: Clock,
}

/// The current time, preformatted for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Clock {
    /// RFC 3339 timestamp, for `<time datetime>`.
    pub iso: String,
    /// e.g. "Sunday 18 October 2026".
    pub date: String,
    /// e.g. "14:05".
    pub time: String,
}

impl Clock {
    pub fn new(now: DateTime<FixedOffset>) -> Self {
        Self {
            iso: now.to_rfc3339(),
            date: now.format("%A %-d %B %Y").to_string(),
            time: now.format("%H:%M").to_string(),
        }
    }
}

/// Render the index page for `site` at the current time.
pub fn render_index(templates: &TemplateCache, site: &Site) -> Result<Vec<u8>, AppError> {
    render_index_at(templates, site, site.now())
}

/// Render the index page for `site` at a given time.
pub fn render_index_at(
    templates: &TemplateCache,
    site: &Site,
    now: DateTime<FixedOffset>,
) -> Result<Vec<u8>, AppError> {
    let template = templates.resolve(INDEX_FRAGMENTS)?;
    let page = IndexPage {
        site,
        now: Clock::new(now),
    };
    Ok(template.render(&page)?)
}
