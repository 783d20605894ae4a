//! The display projection: how the catalog becomes table rows.
//!
//! The table shows a sorted, grouped view of the catalog with synthetic
//! category header rows interleaved, so display order never equals storage
//! order. Every row-addressed operation resolves back to the catalog through
//! the index map built here; a header row maps to `None`. The projection is
//! rebuilt wholesale on every mutation, column scroll, or resize rather than
//! patched in place.

use crate::project::{Project, UNCATEGORIZED};

/// One table column with its nominal width.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    pub title: &'static str,
    pub width: u16,
}

/// All columns, in display order.
pub const COLUMNS: [Column; 5] = [
    Column { title: "Name", width: 30 },
    Column { title: "Path", width: 35 },
    Column { title: "Command", width: 35 },
    Column { title: "Category", width: 15 },
    Column { title: "Link", width: 30 },
];

/// Horizontal chrome (borders, highlight gutter) the columns cannot use.
const FRAME_WIDTH: u16 = 6;

/// The visible column window for a pane width and horizontal scroll offset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnLayout {
    /// Visible columns with their final widths.
    pub columns: Vec<Column>,
    /// Clamped scroll offset: index of the first visible column.
    pub start: usize,
}

impl ColumnLayout {
    /// Selects the widest run of columns that fits the pane.
    ///
    /// At least one column is always visible; when the pane is narrower than
    /// even one nominal width, that column is clamped to the available width.
    /// Leftover width goes to the last visible column.
    pub fn fit(pane_width: u16, scroll_offset: usize) -> Self {
        let available = pane_width.saturating_sub(FRAME_WIDTH).max(1);

        let mut visible = 0;
        let mut used: u16 = 0;
        for column in COLUMNS {
            if used + column.width > available {
                break;
            }
            used += column.width;
            visible += 1;
        }
        let visible = visible.max(1);

        let start = scroll_offset.min(COLUMNS.len() - visible);
        let mut columns = COLUMNS[start..start + visible].to_vec();

        let used: u16 = columns.iter().map(|column| column.width).sum();
        if used > available {
            columns[0].width = available;
        } else if let Some(last) = columns.last_mut() {
            last.width += available - used;
        }

        Self { columns, start }
    }

    /// Whether more columns exist than currently fit.
    pub fn is_scrollable(&self) -> bool {
        self.columns.len() < COLUMNS.len()
    }

    /// Largest valid scroll offset for the current window size.
    pub fn max_offset(&self) -> usize {
        COLUMNS.len() - self.columns.len()
    }
}

/// Sorted, grouped rows plus the per-row link back to the sorted catalog copy.
#[derive(Debug, Clone, Default)]
pub struct Projection {
    /// Row cells, already sliced to the visible column window.
    pub rows: Vec<Vec<String>>,
    /// Per display row: position in the sorted copy, or `None` for headers.
    pub backing: Vec<Option<usize>>,
}

impl Projection {
    /// Rebuilds the full row set from the catalog.
    pub fn build(projects: &[Project], layout: &ColumnLayout) -> Self {
        let sorted = sorted_catalog(projects);
        let mut rows = Vec::new();
        let mut backing = Vec::new();
        let mut last_category: Option<String> = None;

        for (sorted_index, project) in sorted.iter().enumerate() {
            let category = project.display_category();
            if last_category.as_deref() != Some(category) {
                rows.push(header_cells(category, layout));
                backing.push(None);
                last_category = Some(category.to_string());
            }
            rows.push(project_cells(project, layout));
            backing.push(Some(sorted_index));
        }

        Self { rows, backing }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_header(&self, row: usize) -> bool {
        matches!(self.backing.get(row), Some(None))
    }
}

/// Catalog copy sorted for display: category groups ascending,
/// case-insensitive, with the "N/A" fallback group last, then names
/// ascending, case-insensitive. The sort is stable, so records that compare
/// equal keep their catalog order.
pub fn sorted_catalog(projects: &[Project]) -> Vec<Project> {
    let mut sorted = projects.to_vec();
    sorted.sort_by(|a, b| sort_key(a).cmp(&sort_key(b)));
    sorted
}

fn sort_key(project: &Project) -> (bool, String, String) {
    let category = project.display_category();
    (
        category.eq_ignore_ascii_case(UNCATEGORIZED),
        category.to_lowercase(),
        project.name.to_lowercase(),
    )
}

/// Catalog index of the record behind a display row, or `None` for header
/// rows and out-of-range indices.
///
/// The sorted copy holds values, not references, so the catalog entry is
/// located by matching (name, path, command). Duplicate triples resolve to
/// the first matching entry; see DESIGN.md.
pub fn original_index_for_row(
    projects: &[Project],
    projection: &Projection,
    row: usize,
) -> Option<usize> {
    let sorted_index = (*projection.backing.get(row)?)?;
    let sorted = sorted_catalog(projects);
    let entry = sorted.get(sorted_index)?;
    projects.iter().position(|project| {
        project.name == entry.name
            && project.path == entry.path
            && project.command == entry.command
    })
}

/// The record behind a display row, under the same exclusions as
/// [`original_index_for_row`].
pub fn project_for_row<'a>(
    projects: &'a [Project],
    projection: &Projection,
    row: usize,
) -> Option<&'a Project> {
    original_index_for_row(projects, projection, row).map(|index| &projects[index])
}

/// Display row currently showing the given catalog entry, used to place the
/// cursor after an append.
pub fn display_row_for_index(
    projects: &[Project],
    projection: &Projection,
    index: usize,
) -> Option<usize> {
    let target = projects.get(index)?;
    let sorted = sorted_catalog(projects);
    projection.backing.iter().position(|slot| {
        slot.and_then(|sorted_index| sorted.get(sorted_index))
            .is_some_and(|entry| {
                entry.name == target.name
                    && entry.path == target.path
                    && entry.command == target.command
            })
    })
}

// Header labels live in absolute column 0, so scrolling right leaves header
// rows blank just like the data cells that scrolled away.
fn header_cells(category: &str, layout: &ColumnLayout) -> Vec<String> {
    (0..layout.columns.len())
        .map(|offset| {
            if layout.start + offset == 0 {
                category.to_string()
            } else {
                String::new()
            }
        })
        .collect()
}

fn project_cells(project: &Project, layout: &ColumnLayout) -> Vec<String> {
    let full = [
        project.name.clone(),
        project.path.clone(),
        project.command.clone(),
        project.display_category().to_string(),
        project.link.clone(),
    ];
    full[layout.start..layout.start + layout.columns.len()].to_vec()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn project(name: &str, category: &str) -> Project {
        Project {
            name: name.to_string(),
            path: format!("/home/x/{}", name.to_lowercase()),
            command: "make run".to_string(),
            link: String::new(),
            category: category.to_string(),
        }
    }

    fn wide_layout() -> ColumnLayout {
        ColumnLayout::fit(200, 0)
    }

    #[test]
    fn projection_groups_categories_with_fallback_last() {
        let projects = vec![
            project("Zeta", "Web"),
            project("Alpha", "Web"),
            project("Beta", ""),
        ];
        let projection = Projection::build(&projects, &wide_layout());

        let first_cells: Vec<&str> = projection
            .rows
            .iter()
            .map(|cells| cells[0].as_str())
            .collect();
        assert_eq!(first_cells, vec!["Web", "Alpha", "Zeta", "N/A", "Beta"]);
        assert_eq!(
            projection.backing,
            vec![None, Some(0), Some(1), None, Some(2)]
        );
    }

    #[test]
    fn one_header_per_distinct_category_and_groups_contiguous() {
        let projects = vec![
            project("c", "Tools"),
            project("b", "Web"),
            project("a", "Tools"),
            project("d", ""),
            project("e", "Web"),
        ];
        let projection = Projection::build(&projects, &wide_layout());

        let headers: Vec<&str> = projection
            .rows
            .iter()
            .enumerate()
            .filter(|(row, _)| projection.is_header(*row))
            .map(|(_, cells)| cells[0].as_str())
            .collect();
        assert_eq!(headers, vec!["Tools", "Web", "N/A"]);

        // No data row may sit under a header of a different category.
        let sorted = sorted_catalog(&projects);
        let mut current_header = String::new();
        for (row, cells) in projection.rows.iter().enumerate() {
            match projection.backing[row] {
                None => current_header = cells[0].clone(),
                Some(sorted_index) => {
                    assert_eq!(sorted[sorted_index].display_category(), current_header)
                }
            }
        }
    }

    #[test]
    fn sort_is_case_insensitive_and_stable() {
        let mut first = project("alpha", "Web");
        first.path = "/one".to_string();
        let mut second = project("ALPHA", "web");
        second.path = "/two".to_string();
        let projects = vec![first.clone(), second.clone()];

        let sorted = sorted_catalog(&projects);
        assert_eq!(sorted[0].path, "/one");
        assert_eq!(sorted[1].path, "/two");
    }

    #[test]
    fn original_indices_are_valid_and_distinct() {
        let projects = vec![
            project("Zeta", "Web"),
            project("Alpha", "Web"),
            project("Beta", ""),
            project("Gamma", "Tools"),
        ];
        let projection = Projection::build(&projects, &wide_layout());
        let sorted = sorted_catalog(&projects);

        let mut seen = Vec::new();
        for row in 0..projection.len() {
            let Some(sorted_index) = projection.backing[row] else {
                assert!(original_index_for_row(&projects, &projection, row).is_none());
                continue;
            };
            let index = original_index_for_row(&projects, &projection, row)
                .expect("data row must resolve");
            assert!(!seen.contains(&index), "index {} resolved twice", index);
            seen.push(index);
            assert_eq!(projects[index], sorted[sorted_index]);
        }
        assert_eq!(seen.len(), projects.len());
    }

    #[test]
    fn lookups_reject_headers_and_out_of_range_rows() {
        let projects = vec![project("Alpha", "Web")];
        let projection = Projection::build(&projects, &wide_layout());

        assert!(projection.is_header(0));
        assert!(project_for_row(&projects, &projection, 0).is_none());
        assert!(project_for_row(&projects, &projection, 99).is_none());
        assert_eq!(
            project_for_row(&projects, &projection, 1).map(|p| p.name.as_str()),
            Some("Alpha")
        );
    }

    #[test]
    fn duplicate_triples_resolve_to_first_catalog_entry() {
        // Known limitation of identity-by-value matching: two records with
        // the same name, path, and command are indistinguishable, and both
        // display rows resolve to the first of them.
        let mut original = project("Twin", "Web");
        original.link = "https://first.example".to_string();
        let mut copy = original.clone();
        copy.link = "https://second.example".to_string();
        let projects = vec![original, copy];
        let projection = Projection::build(&projects, &wide_layout());

        assert_eq!(original_index_for_row(&projects, &projection, 1), Some(0));
        assert_eq!(original_index_for_row(&projects, &projection, 2), Some(0));
    }

    #[test]
    fn display_row_found_after_append() {
        let mut projects = vec![project("Zeta", "Web"), project("Alpha", "Web")];
        projects.push(project("Middle", "Tools"));
        let projection = Projection::build(&projects, &wide_layout());

        let row = display_row_for_index(&projects, &projection, 2).unwrap();
        assert_eq!(projection.rows[row][0], "Middle");
    }

    #[test]
    fn layout_fits_maximal_prefix_and_pads_last_column() {
        // Name (30) + Path (35) fit in 70; Command (35) does not.
        let layout = ColumnLayout::fit(70 + FRAME_WIDTH, 0);
        assert_eq!(layout.columns.len(), 2);
        assert_eq!(layout.columns[0].width, 30);
        assert_eq!(layout.columns[1].width, 35 + 5);
        assert_eq!(layout.start, 0);
        assert!(layout.is_scrollable());
    }

    #[test]
    fn layout_clamps_offset_to_trailing_window() {
        let layout = ColumnLayout::fit(70 + FRAME_WIDTH, 10);
        assert_eq!(layout.start, 3);
        assert_eq!(layout.columns[0].title, "Category");
        assert_eq!(layout.columns[1].title, "Link");
    }

    #[test]
    fn narrow_pane_still_shows_one_clamped_column() {
        let layout = ColumnLayout::fit(20, 0);
        assert_eq!(layout.columns.len(), 1);
        assert_eq!(layout.columns[0].title, "Name");
        assert_eq!(layout.columns[0].width, 20 - FRAME_WIDTH);
    }

    #[test]
    fn all_columns_visible_on_a_wide_pane() {
        let layout = ColumnLayout::fit(200, 0);
        assert_eq!(layout.columns.len(), COLUMNS.len());
        assert!(!layout.is_scrollable());
        assert_eq!(layout.max_offset(), 0);
        let total: u16 = layout.columns.iter().map(|column| column.width).sum();
        assert_eq!(total, 200 - FRAME_WIDTH);
    }

    #[test]
    fn scrolled_projection_slices_cells_and_blanks_headers() {
        let projects = vec![project("Alpha", "Web")];
        let layout = ColumnLayout::fit(70 + FRAME_WIDTH, 1);
        let projection = Projection::build(&projects, &layout);

        // Header text lives in absolute column 0, which scrolled away.
        assert_eq!(projection.rows[0], vec!["", ""]);
        // Data row shows Path and Command.
        assert_eq!(projection.rows[1][0], "/home/x/alpha");
        assert_eq!(projection.rows[1][1], "make run");
    }
}
