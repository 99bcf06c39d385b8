//! Text table rendering.

use crate::natsort::natural_cmp;
use crate::report::Row;

const GUTTER: &str = "  ";

/// Sorts `rows` naturally by their first cell.
pub fn sort_rows(rows: &mut [Row]) {
    rows.sort_by(|a, b| {
        let a = a.first().map(String::as_str).unwrap_or_default();
        let b = b.first().map(String::as_str).unwrap_or_default();
        natural_cmp(a, b)
    });
}

/// Renders a header, a dashed rule and the rows as right-aligned columns.
pub fn render_table(header: &[&str], rows: &[Row]) -> String {
    let mut widths: Vec<usize> = header.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            let len = cell.chars().count();
            match widths.get_mut(i) {
                Some(width) => *width = (*width).max(len),
                None => widths.push(len),
            }
        }
    }

    let mut out = String::new();
    write_line(&mut out, header.iter().copied(), &widths);
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    write_line(&mut out, rule.iter().map(String::as_str), &widths);
    for row in rows {
        write_line(&mut out, row.iter().map(String::as_str), &widths);
    }
    out
}

fn write_line<'a>(out: &mut String, cells: impl Iterator<Item = &'a str>, widths: &[usize]) {
    let line = cells
        .zip(widths)
        .map(|(cell, width)| format!("{:>width$}", cell, width = width))
        .collect::<Vec<_>>()
        .join(GUTTER);
    out.push_str(&line);
    out.push('\n');
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn row(cells: &[&str]) -> Row {
        cells.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_sort_rows() {
        let mut rows = vec![
            row(&["PortChannel1"]),
            row(&["Ethernet12"]),
            row(&["Ethernet4"]),
            row(&["Ethernet0"]),
        ];
        sort_rows(&mut rows);
        let first: Vec<&str> = rows.iter().map(|r| r[0].as_str()).collect();
        assert_eq!(first, vec!["Ethernet0", "Ethernet4", "Ethernet12", "PortChannel1"]);
    }

    #[test]
    fn test_render_table() {
        let rendered = render_table(
            &["Interface", "Oper"],
            &[row(&["Ethernet0", "up"]), row(&["Ethernet100", "down"])],
        );
        assert_eq!(
            rendered,
            "  Interface  Oper\n\
             -----------  ----\n  \
             Ethernet0    up\n\
             Ethernet100  down\n"
        );
    }

    #[test]
    fn test_render_empty() {
        assert_eq!(render_table(&["Interface"], &[]), "Interface\n---------\n");
    }
}
