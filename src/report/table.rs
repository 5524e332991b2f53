// Plain-text column layout

#[derive(Clone, Copy, PartialEq, Eq)]
pub(super) enum Align {
    Left,
    Right,
}

pub(super) struct Column {
    pub title: &'static str,
    pub align: Align,
}

impl Column {
    pub const fn left(title: &'static str) -> Self {
        Self { title, align: Align::Left }
    }

    pub const fn right(title: &'static str) -> Self {
        Self { title, align: Align::Right }
    }
}

/// Columns separated by two spaces; the last left-aligned column is not padded
/// so lines carry no trailing whitespace.
pub(super) fn render_table(columns: &[Column], rows: &[Vec<String>], out: &mut String) {
    let mut widths: Vec<usize> = columns.iter().map(|c| c.title.chars().count()).collect();
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let header: Vec<String> = columns.iter().map(|c| c.title.to_string()).collect();
    push_row(columns, &widths, &header, out);
    for row in rows {
        push_row(columns, &widths, row, out);
    }
}

fn push_row(columns: &[Column], widths: &[usize], cells: &[String], out: &mut String) {
    let last = columns.len().saturating_sub(1);
    let mut line = String::new();
    for (index, ((column, width), cell)) in columns.iter().zip(widths).zip(cells).enumerate() {
        if index > 0 {
            line.push_str("  ");
        }
        let pad = width.saturating_sub(cell.chars().count());
        match column.align {
            Align::Right => {
                line.push_str(&" ".repeat(pad));
                line.push_str(cell);
            }
            Align::Left => {
                line.push_str(cell);
                if index != last {
                    line.push_str(&" ".repeat(pad));
                }
            }
        }
    }
    out.push_str(line.trim_end());
    out.push('\n');
}
