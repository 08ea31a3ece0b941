//! Statement template configuration and the page content filter.
//!
//! All constants are tied to the Alfa-Bank statement template as rendered in
//! extractor units (see `rbste_parse::ExtractOptions`). They are not expected to
//! carry over to other banks.

use crate::fragment::{Page, PageRole};

/// A closed vertical range `[top, bottom]` in extractor units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct YBand {
    pub top: f64,
    pub bottom: f64,
}

impl YBand {
    pub fn new(top: f64, bottom: f64) -> Self {
        Self { top, bottom }
    }

    /// Whether `y` lies inside the band. Both edges are inclusive.
    pub fn contains(&self, y: f64) -> bool {
        y >= self.top && y <= self.bottom
    }
}

/// Options describing where the transaction table lives on a statement page
/// and how wrapped description lines are recognised.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutOptions {
    /// Table body band on the first page, below the account header.
    pub first_page_band: YBand,
    /// Table body band on every later page.
    pub continuation_band: YBand,
    /// A row closer than this to the previous independent row is a wrapped
    /// continuation of that row's description.
    pub merge_threshold: f64,
    /// Currency suffix stripped from the amount cell, including the leading space.
    pub currency_suffix: String,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            first_page_band: YBand::new(24.0, 44.0),
            continuation_band: YBand::new(7.0, 44.0),
            merge_threshold: 1.2,
            currency_suffix: " RUR".to_string(),
        }
    }
}

impl LayoutOptions {
    /// Content band for a page in the given role.
    pub fn band_for(&self, role: PageRole) -> YBand {
        match role {
            PageRole::First => self.first_page_band,
            PageRole::Continuation => self.continuation_band,
        }
    }
}

/// Keep only the fragments inside the template band for `role`.
///
/// Width and height are preserved; fragment order is unchanged.
pub fn filter_page(page: &Page, role: PageRole, options: &LayoutOptions) -> Page {
    let band = options.band_for(role);
    Page {
        width: page.width,
        height: page.height,
        texts: page
            .texts
            .iter()
            .filter(|t| band.contains(t.y))
            .cloned()
            .collect(),
    }
}
