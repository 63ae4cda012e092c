//! Fixed-width table rendering. Column widths come from the header labels;
//! overlong values are not re-aligned, matching the report's historical
//! output.

use crate::report::{AssigneePoints, EpicTotals};

const HEADER: [[&str; 6]; 2] = [
    [
        "        ",
        "Estimated",
        "Planned",
        "Completed",
        "  Delta  ",
        "  Delta  ",
    ],
    [
        "        ",
        "         ",
        "       ",
        "         ",
        "(Est-Pla)",
        "(Pla-Cmp)",
    ],
];

/// Column widths, derived from the first header line.
pub fn column_widths() -> [usize; 6] {
    let mut widths = [0usize; 6];
    for (i, label) in HEADER[0].iter().enumerate() {
        widths[i] = label.len();
    }
    widths
}

/// The two header lines.
pub fn header_lines() -> Vec<String> {
    HEADER.iter().map(|line| line.join(" ")).collect()
}

/// One right-aligned epic row, ending with the epic's summary text when
/// there is one.
pub fn epic_row(key: &str, totals: &EpicTotals, summary: &str, widths: &[usize; 6]) -> String {
    let mut row = format!(
        "{key:>kw$} {est:>ew$} {pla:>pw$} {cmp:>cw$} {d1:>dw1$} {d2:>dw2$}",
        key = key,
        est = totals.estimated,
        pla = totals.planned,
        cmp = totals.completed,
        d1 = totals.delta_est_pla(),
        d2 = totals.delta_pla_cmp(),
        kw = widths[0],
        ew = widths[1],
        pw = widths[2],
        cw = widths[3],
        dw1 = widths[4],
        dw2 = widths[5],
    );
    if !summary.is_empty() {
        row.push(' ');
        row.push_str(summary);
    }
    row
}

/// One assignee row under an epic: estimated/assigned/done shares, then
/// the name.
pub fn assignee_row(points: &AssigneePoints, name: &str, widths: &[usize; 6]) -> String {
    format!(
        "{blank:>kw$} {est:>ew$} {assigned:>pw$} {done:>cw$} {name}",
        blank = "",
        est = points.estimated,
        assigned = points.assigned,
        done = points.done,
        name = name,
        kw = widths[0],
        ew = widths[1],
        pw = widths[2],
        cw = widths[3],
    )
}

/// One summary-footer row: an assignee and the accumulated estimate.
pub fn estimate_row(name: &str, estimated: i64, widths: &[usize; 6]) -> String {
    format!(
        "{name:>kw$} {est:>ew$}",
        name = name,
        est = estimated,
        kw = widths[0],
        ew = widths[1],
    )
}
