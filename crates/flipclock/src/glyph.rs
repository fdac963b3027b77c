//! Block digits drawn on the flip cards

use flipclock::CardSize;

/// Rows in every glyph
pub const GLYPH_ROWS: usize = 5;
const GLYPH_COLS: usize = 3;

#[rustfmt::skip]
static DIGITS: [[&str; GLYPH_ROWS]; 10] = [
    ["###", "# #", "# #", "# #", "###"],
    [" # ", "## ", " # ", " # ", "###"],
    ["###", "  #", "###", "#  ", "###"],
    ["###", "  #", "###", "  #", "###"],
    ["# #", "# #", "###", "  #", "  #"],
    ["###", "#  ", "###", "  #", "###"],
    ["###", "#  ", "###", "# #", "###"],
    ["###", "  #", "  #", "  #", "  #"],
    ["###", "# #", "###", "# #", "###"],
    ["###", "# #", "###", "  #", "###"],
];

static BLANK: [&str; GLYPH_ROWS] = ["   "; GLYPH_ROWS];

/// Terminal columns per glyph pixel
fn pixel_width(size: CardSize) -> usize {
    match size {
        CardSize::Large => 2,
        CardSize::Small => 1,
    }
}

/// Columns taken by `text` once rendered
pub fn width(text: &str, size: CardSize) -> usize {
    let chars = text.chars().count();
    if chars == 0 {
        return 0;
    }
    chars * GLYPH_COLS * pixel_width(size) + (chars - 1)
}

/// Render `text` as block rows, one space between glyphs.
/// Anything that isn't a digit renders blank.
pub fn render(text: &str, size: CardSize) -> Vec<String> {
    let px = pixel_width(size);
    let glyphs: Vec<&[&str; GLYPH_ROWS]> = text
        .chars()
        .map(|c| match c.to_digit(10) {
            Some(d) => &DIGITS[d as usize],
            None => &BLANK,
        })
        .collect();

    (0..GLYPH_ROWS)
        .map(|row| {
            glyphs
                .iter()
                .map(|glyph| {
                    glyph[row]
                        .chars()
                        .map(|c| {
                            let cell = if c == '#' { "█" } else { " " };
                            cell.repeat(px)
                        })
                        .collect::<String>()
                })
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rows_have_declared_width() {
        for size in [CardSize::Large, CardSize::Small] {
            let rows = render("09", size);
            assert_eq!(rows.len(), GLYPH_ROWS);
            for row in &rows {
                assert_eq!(row.chars().count(), width("09", size));
            }
        }
    }

    #[test]
    fn test_one() {
        let rows = render("1", CardSize::Small);
        assert_eq!(rows[0], " █ ");
        assert_eq!(rows[4], "███");
    }

    #[test]
    fn test_non_digits_are_blank() {
        let rows = render("-", CardSize::Large);
        assert!(rows.iter().all(|r| r.trim().is_empty()));
        assert_eq!(width("", CardSize::Large), 0);
    }
}
