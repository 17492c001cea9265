//! Large block-digit glyphs for the time label.

/// Rows per glyph.
pub const HEIGHT: usize = 5;

const BLANK: [&str; HEIGHT] = ["     ", "     ", "     ", "     ", "     "];

fn glyph(c: char) -> [&'static str; HEIGHT] {
    match c {
        '0' => ["█████", "█   █", "█   █", "█   █", "█████"],
        '1' => ["    █", "    █", "    █", "    █", "    █"],
        '2' => ["█████", "    █", "█████", "█    ", "█████"],
        '3' => ["█████", "    █", "█████", "    █", "█████"],
        '4' => ["█   █", "█   █", "█████", "    █", "    █"],
        '5' => ["█████", "█    ", "█████", "    █", "█████"],
        '6' => ["█████", "█    ", "█████", "█   █", "█████"],
        '7' => ["█████", "    █", "    █", "    █", "    █"],
        '8' => ["█████", "█   █", "█████", "█   █", "█████"],
        '9' => ["█████", "█   █", "█████", "    █", "█████"],
        ':' => ["   ", " █ ", "   ", " █ ", "   "],
        _ => BLANK,
    }
}

/// Renders `text` as [`HEIGHT`] rows of block glyphs, one column apart.
pub fn render(text: &str) -> Vec<String> {
    (0..HEIGHT)
        .map(|row| {
            text.chars()
                .map(|c| glyph(c)[row])
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect()
}
