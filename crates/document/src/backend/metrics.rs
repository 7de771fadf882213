//! Text measurement and line breaking.

use crate::layout::{TextRun, TextStyle, Weight};

/// Advance widths (1/1000 em) of the standard Helvetica fonts for WinAnsi
/// codes `0x20..=0xFF`. Codes with no glyph carry the font's default width.
const HELVETICA: [u16; 224] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // 0x20
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556, // 0x30
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778, // 0x40
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556, // 0x50
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556, // 0x60
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584, 350, // 0x70
    556, 350, 222, 556, 333, 1000, 556, 556, 333, 1000, 667, 333, 1000, 350, 611, 350, // 0x80
    350, 222, 222, 333, 333, 350, 556, 1000, 333, 1000, 500, 333, 944, 350, 500, 667, // 0x90
    278, 333, 556, 556, 556, 556, 260, 556, 333, 737, 370, 556, 584, 333, 737, 333, // 0xA0
    400, 584, 333, 333, 333, 556, 537, 278, 333, 333, 365, 556, 834, 834, 834, 611, // 0xB0
    667, 667, 667, 667, 667, 667, 1000, 722, 667, 667, 667, 667, 278, 278, 278, 278, // 0xC0
    722, 722, 778, 778, 778, 778, 778, 584, 778, 722, 722, 722, 722, 667, 667, 611, // 0xD0
    556, 556, 556, 556, 556, 556, 889, 500, 556, 556, 556, 556, 278, 278, 278, 278, // 0xE0
    556, 556, 556, 556, 556, 556, 556, 584, 611, 556, 556, 556, 556, 500, 556, 500, // 0xF0
];

const HELVETICA_BOLD: [u16; 224] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278, // 0x20
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611, // 0x30
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778, // 0x40
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556, // 0x50
    333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611, // 0x60
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584, 350, // 0x70
    556, 350, 278, 556, 500, 1000, 556, 556, 333, 1000, 667, 333, 1000, 350, 611, 350, // 0x80
    350, 278, 278, 500, 500, 350, 556, 1000, 333, 1000, 556, 333, 944, 350, 500, 667, // 0x90
    278, 333, 556, 556, 556, 556, 280, 556, 333, 737, 370, 556, 584, 333, 737, 333, // 0xA0
    400, 584, 333, 333, 333, 611, 556, 278, 333, 333, 365, 556, 834, 834, 834, 611, // 0xB0
    722, 722, 722, 722, 722, 722, 1000, 722, 667, 667, 667, 667, 278, 278, 278, 278, // 0xC0
    722, 722, 778, 778, 778, 778, 778, 584, 778, 722, 722, 722, 722, 667, 667, 611, // 0xD0
    556, 556, 556, 556, 556, 556, 889, 556, 556, 556, 556, 556, 278, 278, 278, 278, // 0xE0
    611, 611, 611, 611, 611, 611, 611, 584, 611, 611, 611, 611, 611, 556, 611, 556, // 0xF0
];

/// Characters CP1252 places at `0x80..=0x9F`; `None` marks unassigned codes.
const WINANSI_HIGH: [Option<char>; 32] = [
    Some('€'), None, Some('‚'), Some('ƒ'), Some('„'), Some('…'), Some('†'), Some('‡'),
    Some('ˆ'), Some('‰'), Some('Š'), Some('‹'), Some('Œ'), None, Some('Ž'), None,
    None, Some('‘'), Some('’'), Some('“'), Some('”'), Some('•'), Some('–'), Some('—'),
    Some('˜'), Some('™'), Some('š'), Some('›'), Some('œ'), None, Some('ž'), Some('Ÿ'),
];

/// WinAnsi (CP1252) code of a printable character, the encoding the standard
/// PDF fonts are drawn in. Control characters and anything CP1252 lacks give `None`.
pub fn winansi_code(c: char) -> Option<u8> {
    match u32::from(c) {
        code @ (0x20..=0x7E | 0xA0..=0xFF) => u8::try_from(code).ok(),
        _ => WINANSI_HIGH
            .iter()
            .position(|&high| high == Some(c))
            .and_then(|i| u8::try_from(0x80 + i).ok()),
    }
}

/// Width in points of `text` set in Helvetica at `style`.
pub fn helvetica_width(text: &str, style: &TextStyle) -> f32 {
    let table = match style.weight {
        Weight::Regular => &HELVETICA,
        Weight::Bold => &HELVETICA_BOLD,
    };
    let units: u32 = text
        .chars()
        .map(|c| match winansi_code(c) {
            Some(code) => u32::from(table[usize::from(code) - 0x20]),
            None => 556,
        })
        .sum();
    units as f32 * style.size / 1000.0
}

/// Width of `text` counted in characters (monospace output).
pub fn char_width(text: &str, _style: &TextStyle) -> f32 {
    text.chars().count() as f32
}

/// Width of a whole line of runs.
pub fn line_width<F>(line: &[TextRun], measure: &F) -> f32
where
    F: Fn(&str, &TextStyle) -> f32,
{
    line.iter().map(|run| measure(&run.text, &run.style)).sum()
}

/// Greedy word wrap of styled runs into lines no wider than `max_width`.
///
/// Breaks after spaces. A word wider than a whole line is broken after `@`,
/// `/` or `-` first and between characters only when a piece still does not
/// fit. Spaces at line ends are dropped. A blank input gives no lines.
pub fn wrap_runs<F>(runs: &[TextRun], max_width: f32, measure: &F) -> Vec<Vec<TextRun>>
where
    F: Fn(&str, &TextStyle) -> f32,
{
    let mut lines = Vec::new();
    let mut line: Vec<TextRun> = Vec::new();
    let mut width = 0.0;

    for run in runs {
        for word in run.text.split_inclusive(' ') {
            let visible = measure(word.trim_end_matches(' '), &run.style);
            if visible <= max_width {
                if width > 0.0 && width + visible > max_width {
                    flush(&mut lines, &mut line);
                    width = 0.0;
                }
                push_piece(&mut line, word, run.style);
                width += measure(word, &run.style);
                continue;
            }

            for piece in word.split_inclusive(is_break_after) {
                let piece_width = measure(piece.trim_end_matches(' '), &run.style);
                if width > 0.0 && width + piece_width > max_width {
                    flush(&mut lines, &mut line);
                    width = 0.0;
                }
                if piece_width <= max_width {
                    push_piece(&mut line, piece, run.style);
                    width += measure(piece, &run.style);
                    continue;
                }

                let mut buf = [0u8; 4];
                for ch in piece.chars() {
                    let glyph: &str = ch.encode_utf8(&mut buf);
                    let w = measure(glyph, &run.style);
                    if width > 0.0 && width + w > max_width {
                        flush(&mut lines, &mut line);
                        width = 0.0;
                    }
                    push_piece(&mut line, glyph, run.style);
                    width += w;
                }
            }
        }
    }
    flush(&mut lines, &mut line);

    lines
}

fn is_break_after(c: char) -> bool {
    matches!(c, '@' | '/' | '-')
}

fn push_piece(line: &mut Vec<TextRun>, text: &str, style: TextStyle) {
    match line.last_mut() {
        Some(last) if last.style == style => last.text.push_str(text),
        _ => line.push(TextRun::new(text, style)),
    }
}

fn flush(lines: &mut Vec<Vec<TextRun>>, line: &mut Vec<TextRun>) {
    while let Some(last) = line.last_mut() {
        let trimmed = last.text.trim_end_matches(' ').len();
        last.text.truncate(trimmed);
        if last.text.is_empty() {
            line.pop();
        } else {
            break;
        }
    }
    if !line.is_empty() {
        lines.push(std::mem::take(line));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(lines: &[Vec<TextRun>]) -> Vec<String> {
        lines
            .iter()
            .map(|l| l.iter().map(|r| r.text.as_str()).collect())
            .collect()
    }

    #[test]
    fn digits_are_half_an_em() {
        let style = TextStyle::regular(10.0);
        assert!((helvetica_width("10,000.00", &style) - 44.48).abs() < 0.01);
        assert!(helvetica_width("Total", &TextStyle::bold(10.0)) > helvetica_width("Total", &TextStyle::regular(10.0)));
    }

    #[test]
    fn wraps_on_spaces() {
        let runs = [TextRun::new("17 MM ISI Mark Calibrated Plywood", TextStyle::regular(9.0))];
        let lines = wrap_runs(&runs, 12.0, &char_width);
        assert_eq!(texts(&lines), ["17 MM ISI", "Mark", "Calibrated", "Plywood"]);
    }

    #[test]
    fn splits_words_longer_than_a_line() {
        let runs = [TextRun::new("abcdefgh", TextStyle::regular(9.0))];
        let lines = wrap_runs(&runs, 3.0, &char_width);
        assert_eq!(texts(&lines), ["abc", "def", "gh"]);
    }

    #[test]
    fn keeps_styles_apart_and_merges_equal_ones() {
        let plain = TextStyle::regular(8.0);
        let link = plain.with_color(crate::layout::Rgb::BLUE);
        let runs = [
            TextRun::new("Mob.: ", plain),
            TextRun::new("9579455022", link),
            TextRun::new(", ", plain),
            TextRun::new("7588552035", link),
        ];
        let lines = wrap_runs(&runs, 100.0, &char_width);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].len(), 4);
        assert_eq!(texts(&lines), ["Mob.: 9579455022, 7588552035"]);
    }

    #[test]
    fn latin1_letters_have_their_own_widths() {
        let style = TextStyle::regular(10.0);
        assert!((helvetica_width("é", &style) - 5.56).abs() < 0.01);
        assert!((helvetica_width("½", &style) - 8.34).abs() < 0.01);
        assert!((helvetica_width("Ü", &TextStyle::bold(10.0)) - 7.22).abs() < 0.01);
        assert!((helvetica_width("–", &style) - 5.56).abs() < 0.01);
    }

    #[test]
    fn winansi_covers_cp1252_only() {
        assert_eq!(winansi_code('A'), Some(0x41));
        assert_eq!(winansi_code('é'), Some(0xE9));
        assert_eq!(winansi_code('€'), Some(0x80));
        assert_eq!(winansi_code('–'), Some(0x96));
        assert_eq!(winansi_code('₹'), None);
        assert_eq!(winansi_code('\n'), None);
        assert_eq!(winansi_code('\u{81}'), None);
    }

    #[test]
    fn long_addresses_break_after_the_at_sign() {
        let small = TextStyle::regular(8.0);
        let runs = [
            TextRun::new("Email: ", small),
            TextRun::new("shreebalajiinteriors12@gmail.com", small.with_color(crate::layout::Rgb::BLUE)),
        ];
        let lines = wrap_runs(&runs, 108.0, &helvetica_width);
        assert_eq!(texts(&lines), ["Email:", "shreebalajiinteriors12@", "gmail.com"]);
    }

    #[test]
    fn blank_text_has_no_lines() {
        assert!(wrap_runs(&[], 10.0, &char_width).is_empty());
        let runs = [TextRun::new("", TextStyle::regular(9.0))];
        assert!(wrap_runs(&runs, 10.0, &char_width).is_empty());
    }
}
