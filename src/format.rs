/*!
format.rs

Plain-text table rendering for usage / help output.

  - StyleOptions::plain()  : no ANSI, unbounded width (used by `Display`)
  - StyleOptions::detect() : NO_COLOR + COLUMNS aware (used by the shell)
  - table(headers, rows, TableOpts, &StyleOptions) -> String
  - color(role, text, &StyleOptions) -> String

Column widths are derived from content; when a width limit is set the widest
columns shrink first and overflowing cells are cut with an ellipsis.
*/

use std::borrow::Cow;

#[derive(Debug, Clone)]
pub struct StyleOptions {
    pub use_color: bool,
    /// 0 means unbounded.
    pub term_width: usize,
}

impl Default for StyleOptions {
    fn default() -> Self {
        Self::plain()
    }
}

impl StyleOptions {
    pub fn plain() -> Self {
        Self {
            use_color: false,
            term_width: 0,
        }
    }

    pub fn detect() -> Self {
        let use_color = std::env::var_os("NO_COLOR").is_none();
        let term_width = std::env::var("COLUMNS")
            .ok()
            .and_then(|v| v.parse::<usize>().ok())
            .map(|w| w.clamp(40, 220))
            .unwrap_or(100);
        Self {
            use_color,
            term_width,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub enum Role {
    Heading,
    Accent,
    Error,
    Dim,
}

pub fn color(role: Role, text: impl AsRef<str>, style: &StyleOptions) -> String {
    if !style.use_color {
        return text.as_ref().to_string();
    }
    let code = match role {
        Role::Heading => "1",
        Role::Accent => "38;5;45",
        Role::Error => "38;5;196",
        Role::Dim => "2",
    };
    format!("\x1b[{code}m{}\x1b[0m", text.as_ref())
}

#[derive(Debug, Clone)]
pub struct TableOpts {
    /// Leading spaces on every line.
    pub indent: usize,
    /// Spaces between columns.
    pub gap: usize,
    pub header_sep: bool,
    pub min_col_width: usize,
}

impl Default for TableOpts {
    fn default() -> Self {
        Self {
            indent: 3,
            gap: 3,
            header_sep: true,
            min_col_width: 4,
        }
    }
}

/// Render rows under headers. The last column is never padded.
pub fn table(
    headers: &[&str],
    rows: &[Vec<String>],
    opts: TableOpts,
    style: &StyleOptions,
) -> String {
    if headers.is_empty() {
        return String::new();
    }
    let cols = headers.len();

    let mut widths: Vec<usize> = headers.iter().map(|h| display_width(h)).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate().take(cols) {
            widths[i] = widths[i].max(display_width(cell));
        }
    }

    if style.term_width > 0 {
        let total = opts.indent + widths.iter().sum::<usize>() + (cols - 1) * opts.gap;
        if total > style.term_width {
            let mut overflow = total - style.term_width;
            let mut order: Vec<usize> = (0..cols).collect();
            order.sort_by(|a, b| widths[*b].cmp(&widths[*a]));
            for idx in order {
                if overflow == 0 {
                    break;
                }
                if widths[idx] > opts.min_col_width {
                    let shrink = (widths[idx] - opts.min_col_width).min(overflow);
                    widths[idx] -= shrink;
                    overflow -= shrink;
                }
            }
        }
    }

    let indent = " ".repeat(opts.indent);
    let gap = " ".repeat(opts.gap);
    let mut lines = Vec::with_capacity(rows.len() + 2);

    let header_cells: Vec<String> = headers
        .iter()
        .enumerate()
        .map(|(i, h)| color(Role::Accent, fit(h, widths[i], i + 1 == cols), style))
        .collect();
    lines.push(format!("{indent}{}", header_cells.join(gap.as_str())));

    if opts.header_sep {
        let sep: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
        lines.push(format!("{indent}{}", color(Role::Dim, sep.join(gap.as_str()), style)));
    }

    for row in rows {
        let cells: Vec<String> = (0..cols)
            .map(|c| {
                let raw = row.get(c).map(String::as_str).unwrap_or("");
                fit(raw, widths[c], c + 1 == cols)
            })
            .collect();
        lines.push(format!("{indent}{}", cells.join(gap.as_str())).trim_end().to_string());
    }

    lines.join("\n")
}

/// Pad to `width`, or truncate with an ellipsis. `last` skips right padding.
fn fit(s: &str, width: usize, last: bool) -> String {
    let len = display_width(s);
    if len <= width {
        if last {
            return s.to_string();
        }
        return format!("{s}{}", " ".repeat(width - len));
    }
    truncate_ellipsis(&strip_ansi(s), width)
}

pub fn truncate_ellipsis(s: &str, max_chars: usize) -> String {
    if max_chars == 0 {
        return String::new();
    }
    if s.chars().count() <= max_chars {
        return s.to_string();
    }
    let mut out: String = s.chars().take(max_chars - 1).collect();
    out.push('…');
    out
}

fn strip_ansi(s: &str) -> Cow<'_, str> {
    if !s.contains('\x1b') {
        return Cow::Borrowed(s);
    }
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\x1b' && chars.peek() == Some(&'[') {
            chars.next();
            for t in chars.by_ref() {
                if t.is_ascii_alphabetic() {
                    break;
                }
            }
            continue;
        }
        out.push(c);
    }
    Cow::Owned(out)
}

fn display_width(s: &str) -> usize {
    strip_ansi(s).chars().count()
}
