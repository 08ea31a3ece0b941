//! Row reconstruction: grouping fragments by y, merging wrapped description
//! lines, and flattening the result into string rows.

use crate::error::LayoutError;
use crate::fragment::{Page, TextFragment};
use crate::table::{Column, Row};

/// Fragments sharing one y-coordinate, in extraction order.
#[derive(Debug, Clone, PartialEq)]
pub struct RowGroup {
    pub y: f64,
    pub fragments: Vec<TextFragment>,
}

impl RowGroup {
    /// Fragment contents in order.
    pub fn contents(&self) -> Vec<String> {
        self.fragments.iter().map(|f| f.content.clone()).collect()
    }

    /// Append `text` to the cell of `column`.
    fn append_to(&mut self, column: Column, text: &str) -> Result<(), LayoutError> {
        let cells = self.fragments.len();
        match self.fragments.get_mut(column.index()) {
            Some(fragment) => {
                fragment.content.push_str(text);
                Ok(())
            }
            None => Err(LayoutError::MissingDescription {
                page: 0,
                y: self.y,
                cells,
                required: column.index() + 1,
            }),
        }
    }
}

/// Group a page's fragments by exact y equality.
///
/// Groups are returned in ascending y order. Within a group, fragments keep
/// their original relative order. Values that differ only by sub-unit noise
/// land in different groups; coalescing them is [`merge_paragraphs`]' job.
pub fn group_rows(page: &Page) -> Vec<RowGroup> {
    let mut groups: Vec<RowGroup> = Vec::new();
    for fragment in &page.texts {
        match groups.iter_mut().find(|g| g.y == fragment.y) {
            Some(group) => group.fragments.push(fragment.clone()),
            None => groups.push(RowGroup {
                y: fragment.y,
                fragments: vec![fragment.clone()],
            }),
        }
    }
    groups.sort_by(|a, b| a.y.total_cmp(&b.y));
    groups
}

/// Merge wrapped continuation lines into the row they belong to.
///
/// Walks `groups` in ascending y. The first group is always independent. A
/// later group whose distance from the last independent row is below
/// `threshold` is a continuation: its single fragment is appended to that
/// row's [`Column::Description`] cell. Otherwise the group becomes the new
/// independent row.
///
/// Errors carry page index 0; callers working on a specific page should
/// re-attribute them with [`LayoutError::on_page`].
pub fn merge_paragraphs(
    mut groups: Vec<RowGroup>,
    threshold: f64,
) -> Result<Vec<RowGroup>, LayoutError> {
    groups.sort_by(|a, b| a.y.total_cmp(&b.y));

    let mut merged: Vec<RowGroup> = Vec::with_capacity(groups.len());
    for group in groups {
        let target = match merged.last_mut() {
            Some(prev) if group.y - prev.y < threshold => prev,
            _ => {
                merged.push(group);
                continue;
            }
        };

        let continuation = match group.fragments.as_slice() {
            [] => return Err(LayoutError::EmptyContinuation { page: 0, y: group.y }),
            [only] => only,
            many => {
                return Err(LayoutError::AmbiguousContinuation {
                    page: 0,
                    y: group.y,
                    fragments: many.len(),
                });
            }
        };
        target.append_to(Column::Description, &continuation.content)?;
        tracing::trace!(y = group.y, into = target.y, "merged continuation line");
    }
    Ok(merged)
}

/// Flatten row groups into string rows, one per group in ascending y order.
pub fn serialize_rows(groups: &[RowGroup]) -> Vec<Row> {
    let mut ordered: Vec<&RowGroup> = groups.iter().collect();
    ordered.sort_by(|a, b| a.y.total_cmp(&b.y));
    ordered.into_iter().map(|g| Row::new(g.contents())).collect()
}
