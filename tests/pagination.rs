mod common;

use maintrack_report::LayoutError;
use maintrack_report::canvas::DrawOp;
use maintrack_report::report::table::{
    HEADER_ROW_HEIGHT, RowPlacement, TRAILING_GAP, TableRenderer, TableState, render_table,
};
use maintrack_report::{Column, Row};

fn place_all(k: usize, n: usize) -> (maintrack_report::canvas::Document, Vec<RowPlacement>) {
    let mut doc = common::table_document(common::setup_for_rows(k));
    let cols = common::columns();
    let mut table = TableRenderer::begin(&mut doc, &cols).expect("valid columns");
    let placements = common::rows(n)
        .iter()
        .map(|row| table.append_row(&mut doc, row).expect("row fits contract"))
        .collect();
    table.finish(&mut doc);
    (doc, placements)
}

#[test]
fn capacity_helper_matches_page_geometry() {
    for k in [1, 3, 5, 12] {
        let doc = common::table_document(common::setup_for_rows(k));
        assert_eq!(TableRenderer::rows_per_page(&doc), k);
    }
}

#[test]
fn exactly_k_rows_stay_on_one_page() {
    let (doc, placements) = place_all(5, 5);
    assert_eq!(doc.page_count(), 1);
    assert!(placements.iter().all(|p| !p.page_broke && p.page_index == 0));
}

#[test]
fn one_row_past_capacity_breaks_to_second_page_with_fresh_header() {
    let k = 5;
    let (doc, placements) = place_all(k, k + 1);

    assert_eq!(doc.page_count(), 2);
    let last = placements[k];
    assert!(last.page_broke);
    assert_eq!(last.page_index, 1);
    assert_eq!(placements.iter().filter(|p| p.page_broke).count(), 1);

    let setup = doc.setup();
    let second = doc.page(1).unwrap();
    assert_eq!(common::header_band_tops(second), vec![setup.printable_top()]);
    for label in ["Asset ID", "Name", "Assigned To"] {
        assert!(second.contains_text(label), "page 2 lacks header label {label}");
    }
    assert_eq!(last.top, setup.printable_top() + HEADER_ROW_HEIGHT);
    assert!(second.contains_text("AST-0005"));
}

#[test]
fn page_count_is_ceiling_of_rows_over_capacity() {
    let k = 4;
    for n in 1..=25 {
        let mut doc = common::table_document(common::setup_for_rows(k));
        render_table(&mut doc, &common::columns(), &common::rows(n)).unwrap();
        assert_eq!(doc.page_count(), n.div_ceil(k), "rows={n}");
        for (i, page) in doc.pages().iter().enumerate() {
            assert_eq!(common::header_band_tops(page).len(), 1, "rows={n} page={i}");
        }
    }
}

#[test]
fn zero_rows_render_only_the_header_band() {
    let mut doc = common::table_document(common::setup_for_rows(10));
    let cols = vec![Column::new("A", 100.0)];
    let summary = render_table(&mut doc, &cols, &[]).unwrap();

    assert_eq!(summary.rows, 0);
    assert_eq!(doc.page_count(), 1);
    let page = doc.page(0).unwrap();
    assert_eq!(common::header_band_tops(page).len(), 1);
    assert!(common::zebra_tops(page).is_empty());
    assert_eq!(common::separator_count(page, doc.setup()), 0);
    assert_eq!(common::texts(page), vec!["A".to_string()]);
    assert_eq!(
        page.cursor_y(),
        doc.setup().printable_top() + HEADER_ROW_HEIGHT + TRAILING_GAP
    );
}

#[test]
fn zebra_parity_follows_global_row_index_across_breaks() {
    let k = 4;
    let n = 2 * k + 1;
    let (doc, broken) = place_all(k, n);
    let (_, unbroken) = place_all(100, n);

    assert_eq!(doc.page_count(), 3);
    let shading = |ps: &[RowPlacement]| ps.iter().map(|p| p.shaded).collect::<Vec<_>>();
    assert_eq!(shading(&broken), shading(&unbroken));
    for p in &broken {
        assert_eq!(p.shaded, p.row_index % 2 == 1);
    }

    // Row 4 opens page 2 unshaded, row 5 under it is shaded.
    let second = doc.page(1).unwrap();
    let first_row_top = doc.setup().printable_top() + HEADER_ROW_HEIGHT;
    assert_eq!(broken[4].page_index, 1);
    assert!(!broken[4].shaded);
    assert_eq!(common::zebra_tops(second), vec![first_row_top + 20.0, first_row_top + 60.0]);
}

#[test]
fn every_row_gets_a_separator() {
    let (doc, _) = place_all(4, 10);
    let total: usize = doc
        .pages()
        .iter()
        .map(|p| common::separator_count(p, doc.setup()))
        .sum();
    assert_eq!(total, 10);
}

#[test]
fn state_machine_walks_pages() {
    let mut doc = common::table_document(common::setup_for_rows(2));
    let cols = common::columns();
    let rows = common::rows(3);
    let mut table = TableRenderer::begin(&mut doc, &cols).unwrap();
    assert_eq!(table.state(), TableState::DrawingRows { page: 0, row_index: 0 });

    table.append_row(&mut doc, &rows[0]).unwrap();
    table.append_row(&mut doc, &rows[1]).unwrap();
    assert_eq!(table.state(), TableState::DrawingRows { page: 0, row_index: 2 });

    let placed = table.append_row(&mut doc, &rows[2]).unwrap();
    assert!(placed.page_broke);
    assert_eq!(table.state(), TableState::DrawingRows { page: 1, row_index: 3 });

    let summary = table.finish(&mut doc);
    assert_eq!(table.state(), TableState::Done);
    assert_eq!(summary.page_breaks, 1);
    assert_eq!((summary.first_page, summary.last_page), (0, 1));
    assert_eq!(
        table.append_row(&mut doc, &rows[0]),
        Err(LayoutError::TableClosed)
    );
}

#[test]
fn table_starts_on_new_page_when_cursor_is_near_bottom() {
    let mut doc = common::table_document(common::setup_for_rows(5));
    let low = doc.setup().printable_bottom() - HEADER_ROW_HEIGHT;
    doc.set_cursor_y(low);

    let summary = render_table(&mut doc, &common::columns(), &common::rows(2)).unwrap();

    assert_eq!(doc.page_count(), 2);
    assert!(doc.page(0).unwrap().ops().is_empty());
    assert_eq!(
        common::header_band_tops(doc.page(1).unwrap()),
        vec![doc.setup().printable_top()]
    );
    assert_eq!((summary.first_page, summary.last_page, summary.page_breaks), (1, 1, 0));
}

#[test]
fn arity_mismatch_fails_before_drawing() {
    let mut doc = common::table_document(common::setup_for_rows(5));
    let mut rows = common::rows(3);
    rows[2].pop();

    let err = render_table(&mut doc, &common::columns(), &rows).unwrap_err();
    assert_eq!(
        err,
        LayoutError::RowArity {
            row: 2,
            expected: 3,
            found: 2
        }
    );
    assert!(doc.page(0).unwrap().ops().is_empty());
}

#[test]
fn non_positive_width_is_rejected() {
    let mut doc = common::table_document(common::setup_for_rows(5));
    for width in [0.0, -12.0, f32::NAN] {
        let cols = vec![Column::new("A", 50.0), Column::new("B", width)];
        let rows: Vec<Row> = vec![vec!["1".into(), "2".into()]];
        let err = render_table(&mut doc, &cols, &rows).unwrap_err();
        assert!(matches!(err, LayoutError::NonPositiveColumnWidth { column: 1, .. }));
    }
    assert!(doc.page(0).unwrap().ops().is_empty());
}

#[test]
fn cells_are_truncated_by_column_width() {
    let mut doc = common::table_document(common::setup_for_rows(5));
    let cols = vec![Column::new("Narrow", 80.0), Column::new("Wide", 300.0)];
    let email = "maintenance.lead@company.com".to_string();
    render_table(&mut doc, &cols, &[vec![email.clone(), email.clone()]]).unwrap();

    let page = doc.page(0).unwrap();
    assert!(page.contains_text("maintenance.l…"));
    assert!(page.contains_text(&email));
}

#[test]
fn overwide_columns_are_not_reflowed() {
    let mut doc = common::table_document(common::setup_for_rows(5));
    let cols = vec![Column::new("A", 400.0), Column::new("B", 400.0)];
    render_table(&mut doc, &cols, &[vec!["left".into(), "right".into()]]).unwrap();

    let setup = *doc.setup();
    let xs: Vec<f32> = doc
        .page(0)
        .unwrap()
        .ops()
        .iter()
        .filter_map(|op| match op {
            DrawOp::Text(t) if t.text == "right" => Some(t.x),
            _ => None,
        })
        .collect();
    assert_eq!(xs, vec![setup.printable_left() + 400.0 + 6.0]);
    assert!(xs[0] > setup.printable_right());
}
