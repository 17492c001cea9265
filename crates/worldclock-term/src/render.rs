//! Turns the clock panel into terminal output.
//!
//! Layout is computed as plain rows of styled segments first
//! ([`layout`], [`fit`]), then painted with crossterm ([`draw`]).

use std::io::{self, Write};

use crossterm::style::{
    Attribute, Color, Print, SetAttribute, SetBackgroundColor, SetForegroundColor,
};
use crossterm::terminal::{Clear, ClearType};
use crossterm::{cursor, queue};
use worldclock_core::ClockPanel;
use worldclock_core::config::{DisplayConfig, Orientation, parse_hex_color};

use crate::digits;

/// What a piece of text is, which decides its color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    City,
    Time,
    Blank,
}

/// A run of text in one role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub role: Role,
    pub text: String,
}

impl Segment {
    fn new(role: Role, text: impl Into<String>) -> Self {
        Self {
            role,
            text: text.into(),
        }
    }

    fn width(&self) -> usize {
        self.text.chars().count()
    }
}

/// One screen row.
pub type Row = Vec<Segment>;

/// Text of a row without styling.
pub fn plain(row: &Row) -> String {
    row.iter().map(|s| s.text.as_str()).collect()
}

/// The rows for one clock: city label, a spacer, then the time.
fn clock_block(city: &str, time: &str, big_digits: bool) -> Vec<Segment> {
    let mut lines = vec![Segment::new(Role::City, city), Segment::new(Role::Blank, "")];
    if big_digits {
        lines.extend(
            digits::render(time)
                .into_iter()
                .map(|row| Segment::new(Role::Time, row)),
        );
    } else {
        lines.push(Segment::new(Role::Time, time));
    }
    lines
}

/// Lays the panel out as rows, without margins or colors.
pub fn layout(panel: &ClockPanel, display: &DisplayConfig) -> Vec<Row> {
    let blocks: Vec<Vec<Segment>> = panel
        .units()
        .iter()
        .map(|u| clock_block(u.city(), u.text(), display.big_digits))
        .collect();

    match display.orientation {
        Orientation::Vertical => stack_vertical(blocks, display.spacing),
        Orientation::Horizontal => stack_horizontal(blocks, display.spacing),
    }
}

fn stack_vertical(blocks: Vec<Vec<Segment>>, spacing: u16) -> Vec<Row> {
    let mut rows = Vec::new();
    for (i, block) in blocks.into_iter().enumerate() {
        if i > 0 {
            rows.extend((0..spacing).map(|_| vec![Segment::new(Role::Blank, "")]));
        }
        rows.extend(block.into_iter().map(|segment| vec![segment]));
    }
    rows
}

fn stack_horizontal(blocks: Vec<Vec<Segment>>, spacing: u16) -> Vec<Row> {
    let height = blocks.iter().map(Vec::len).max().unwrap_or(0);
    let widths: Vec<usize> = blocks
        .iter()
        .map(|b| b.iter().map(Segment::width).max().unwrap_or(0))
        .collect();
    let gap = " ".repeat(usize::from(spacing.max(1)) * 2);

    (0..height)
        .map(|line| {
            let mut row = Vec::new();
            for (i, block) in blocks.iter().enumerate() {
                if i > 0 {
                    row.push(Segment::new(Role::Blank, gap.clone()));
                }
                let segment = block
                    .get(line)
                    .cloned()
                    .unwrap_or_else(|| Segment::new(Role::Blank, ""));
                let pad = widths[i].saturating_sub(segment.width());
                row.push(segment);
                // The last column needs no padding.
                if i + 1 < blocks.len() && pad > 0 {
                    row.push(Segment::new(Role::Blank, " ".repeat(pad)));
                }
            }
            row
        })
        .collect()
}

/// Lays the panel out to fit in `columns`, returning the rows and the
/// left margin to use.
///
/// When the configured layout is too wide, horizontal panels stack
/// vertically first, then big digits fall back to plain text. Whatever
/// still does not fit is clipped so no row ever wraps.
pub fn fit(panel: &ClockPanel, display: &DisplayConfig, columns: Option<u16>) -> (Vec<Row>, u16) {
    let Some(columns) = columns else {
        return (layout(panel, display), display.margin_left);
    };
    let columns = usize::from(columns);
    let mut display = display.clone();

    let mut rows = layout(panel, &display);
    if width(&rows) > columns && display.orientation == Orientation::Horizontal {
        display.orientation = Orientation::Vertical;
        rows = layout(panel, &display);
    }
    if width(&rows) > columns && display.big_digits {
        display.big_digits = false;
        rows = layout(panel, &display);
    }

    let margin = usize::from(display.margin_left).min(columns.saturating_sub(width(&rows)));
    let rows = rows
        .into_iter()
        .map(|row| clip(row, columns - margin))
        .collect();
    (rows, u16::try_from(margin).unwrap_or(0))
}

fn width(rows: &[Row]) -> usize {
    rows.iter()
        .map(|row| row.iter().map(Segment::width).sum())
        .max()
        .unwrap_or(0)
}

fn clip(row: Row, max: usize) -> Row {
    let mut left = max;
    row.into_iter()
        .filter_map(|segment| {
            if left == 0 {
                return None;
            }
            let text: String = segment.text.chars().take(left).collect();
            left -= text.chars().count();
            Some(Segment::new(segment.role, text))
        })
        .collect()
}

fn color(hex: &str, fallback: (u8, u8, u8)) -> Color {
    let (r, g, b) = parse_hex_color(hex).unwrap_or(fallback);
    Color::Rgb { r, g, b }
}

/// Paints a full frame: background, every row, and a clear below the
/// last row so stale output never lingers.
///
/// Each row is cleared to the end of the line so the background covers
/// the whole screen.
pub fn draw<W: Write>(
    out: &mut W,
    panel: &ClockPanel,
    display: &DisplayConfig,
    columns: Option<u16>,
) -> io::Result<()> {
    let (rows, margin) = fit(panel, display, columns);
    let city = color(&display.city_color, (255, 255, 255));
    let time = color(&display.foreground, (255, 255, 255));

    queue!(
        out,
        cursor::MoveTo(0, 0),
        SetBackgroundColor(color(&display.background, (0, 0, 0)))
    )?;
    let mut y: u16 = 0;
    for _ in 0..display.margin_top {
        queue!(out, cursor::MoveTo(0, y), Clear(ClearType::UntilNewLine))?;
        y = y.saturating_add(1);
    }
    for row in rows {
        queue!(
            out,
            cursor::MoveTo(0, y),
            Clear(ClearType::UntilNewLine),
            cursor::MoveToColumn(margin)
        )?;
        for segment in row {
            match segment.role {
                Role::City => queue!(
                    out,
                    SetAttribute(Attribute::Bold),
                    SetForegroundColor(city)
                )?,
                Role::Time => queue!(
                    out,
                    SetAttribute(Attribute::NormalIntensity),
                    SetForegroundColor(time)
                )?,
                Role::Blank => {}
            }
            queue!(out, Print(segment.text))?;
        }
        y = y.saturating_add(1);
    }
    queue!(out, cursor::MoveTo(0, y), Clear(ClearType::FromCursorDown))
}
