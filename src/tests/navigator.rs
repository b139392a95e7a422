use super::{NavError, Navigator, NoteLayout, PdfLocation, PREAMBLE_PATTERN};
use crate::buffer::{NoteBuffer, TextBuffer};
use crate::template::HeaderTemplate;
use regex::Regex;

fn preamble_layout() -> NoteLayout {
    NoteLayout {
        slide: HeaderTemplate::slide("## Slide %d").unwrap(),
        pdf: PdfLocation::Preamble(Regex::new(PREAMBLE_PATTERN).unwrap()),
    }
}

fn inline_layout(pdf_format: &str) -> NoteLayout {
    NoteLayout {
        slide: HeaderTemplate::slide("## Slide %d").unwrap(),
        pdf: PdfLocation::Inline(HeaderTemplate::pdf(pdf_format).unwrap()),
    }
}

fn buffer(lines: &[&str]) -> TextBuffer {
    TextBuffer::from_lines(lines.iter().map(|l| (*l).to_string()).collect())
}

fn talk_notes() -> TextBuffer {
    buffer(&[
        "pdf: \"talk.pdf\"",
        "",
        "## Slide 3",
        "- intro",
        "- motivation",
        "",
        "## Slide 5",
        "- results",
    ])
}

#[test]
fn test_matching_lines_only_counts_matches_at_line_start() {
    let layout = preamble_layout();
    let mut buf = buffer(&["Slide deck", "## Slide 3", "Slide 4"]);
    let nav = Navigator::new(&mut buf, &layout, "talk.pdf");

    let pattern = Regex::new("Slide").unwrap();
    let found = nav.matching_lines(&pattern, None);
    assert_eq!(found, vec![(0, "Slide deck"), (2, "Slide 4")]);

    let restricted = nav.matching_lines(&pattern, Some(1..3));
    assert_eq!(restricted, vec![(2, "Slide 4")]);

    let none = nav.matching_lines(&Regex::new("^# ").unwrap(), None);
    assert!(none.is_empty());
}

#[test]
fn test_ranges_partition_without_gaps() {
    let layout = preamble_layout();
    let mut buf = talk_notes();
    let nav = Navigator::new(&mut buf, &layout, "talk.pdf");

    let ranges = nav.ranges_by_pattern(layout.slide.pattern(), None);
    assert_eq!(ranges, vec![(2..6, "## Slide 3"), (6..8, "## Slide 5")]);

    let sub = nav.ranges_by_pattern(layout.slide.pattern(), Some(0..5));
    assert_eq!(sub, vec![(2..5, "## Slide 3")]);
}

#[test]
fn test_pdf_region_selects_named_document() {
    let layout = inline_layout("pdf: %s");
    let mut buf = buffer(&["pdf: a.pdf", "## Slide 1", "- a", "pdf: b.pdf", "## Slide 1", "- b"]);
    let nav = Navigator::new(&mut buf, &layout, "b.pdf");

    assert_eq!(nav.pdf_region(), Ok(3..6));
}

#[test]
fn test_pdf_region_missing_document_is_no_match() {
    let layout = inline_layout("pdf: %s");
    let mut buf = buffer(&["pdf: a.pdf", "## Slide 1"]);
    let nav = Navigator::new(&mut buf, &layout, "c.pdf");

    assert_eq!(
        nav.pdf_region(),
        Err(NavError::NoMatch {
            needle: "c.pdf".to_string()
        })
    );
}

#[test]
fn test_preamble_pdf_region_is_whole_buffer() {
    let layout = preamble_layout();
    let mut buf = talk_notes();
    let nav = Navigator::new(&mut buf, &layout, "talk.pdf");

    assert_eq!(nav.pdf_region(), Ok(0..8));
}

#[test]
fn test_slide_region_spans_to_next_header() {
    let layout = preamble_layout();
    let mut buf = talk_notes();
    let nav = Navigator::new(&mut buf, &layout, "talk.pdf");

    assert_eq!(nav.slide_region(3), Ok(Some(2..6)));
    assert_eq!(nav.slide_region(5), Ok(Some(6..8)));
    assert_eq!(nav.slide_region(4), Ok(None));
}

#[test]
fn test_slide_region_is_scoped_to_pdf_region() {
    let layout = inline_layout("# %s");
    let mut buf = buffer(&["# a.pdf", "", "# b.pdf", "## Slide 1", "- only in b"]);
    let nav = Navigator::new(&mut buf, &layout, "a.pdf");

    assert_eq!(nav.slide_region(1), Ok(None));
}

#[test]
fn test_substring_headers_first_match_wins() {
    let layout = preamble_layout();
    let mut buf = buffer(&["## Slide 30", "- late", "## Slide 3", "- early"]);
    let nav = Navigator::new(&mut buf, &layout, "talk.pdf");

    assert_eq!(nav.slide_region(3), Ok(Some(0..2)));
}

#[test]
fn test_last_non_blank_line_scans_upward() {
    let layout = preamble_layout();
    let mut buf = buffer(&["a", "", "  ", ""]);
    let nav = Navigator::new(&mut buf, &layout, "talk.pdf");

    assert_eq!(nav.last_non_blank_line(3), Some(0));
    assert_eq!(nav.last_non_blank_line(0), Some(0));
    assert_eq!(nav.last_non_blank_line(100), Some(0));

    let mut blank = buffer(&["", ""]);
    let nav = Navigator::new(&mut blank, &layout, "talk.pdf");
    assert_eq!(nav.last_non_blank_line(1), None);
}

#[test]
fn test_last_non_blank_line_handles_large_buffers() {
    let layout = preamble_layout();
    let mut lines = vec!["top".to_string()];
    lines.extend(std::iter::repeat_n(String::new(), 200_000));
    let mut buf = TextBuffer::from_lines(lines);
    let nav = Navigator::new(&mut buf, &layout, "talk.pdf");

    assert_eq!(nav.last_non_blank_line(200_000), Some(0));
}

#[test]
fn test_last_note_before_page() {
    let layout = preamble_layout();
    let mut buf = talk_notes();
    let nav = Navigator::new(&mut buf, &layout, "talk.pdf");

    assert_eq!(nav.last_note_before_page(5), Ok(Some(3)));
    assert_eq!(nav.last_note_before_page(9), Ok(Some(5)));
    assert_eq!(nav.last_note_before_page(3), Ok(None));
    assert_eq!(nav.last_note_before_page(1), Ok(None));
}

#[test]
fn test_jump_to_slide_note_lands_below_last_text() {
    let layout = preamble_layout();
    let mut buf = talk_notes();
    let mut nav = Navigator::new(&mut buf, &layout, "talk.pdf");

    assert_eq!(nav.jump_to_slide_note(3), Ok(5));
    assert_eq!(nav.jump_to_slide_note(4), Err(NavError::NoNote(4)));
    assert_eq!(buf.cursor_line(), 5);
}

#[test]
fn test_jump_at_end_of_buffer_appends_blank_line() {
    let layout = preamble_layout();
    let mut buf = talk_notes();
    let mut nav = Navigator::new(&mut buf, &layout, "talk.pdf");

    assert_eq!(nav.jump_to_slide_note(5), Ok(8));
    assert_eq!(nav.jump_to_slide_note(5), Ok(8));

    assert_eq!(buf.line_count(), 9);
    assert_eq!(buf.line(7), Some("- results"));
    assert_eq!(buf.line(8), Some(""));
}

#[test]
fn test_create_note_after_previous_note() {
    let layout = preamble_layout();
    let mut buf = talk_notes();
    let mut nav = Navigator::new(&mut buf, &layout, "talk.pdf");

    assert_eq!(nav.create_or_jump_to_slide_note(4), Ok(9));

    let expected: Vec<String> = [
        "pdf: \"talk.pdf\"",
        "",
        "## Slide 3",
        "- intro",
        "- motivation",
        "",
        "## Slide 4",
        "",
        "- ",
        "",
        "## Slide 5",
        "- results",
    ]
    .iter()
    .map(|l| (*l).to_string())
    .collect();
    assert_eq!(buf.lines(), expected.as_slice());
    assert_eq!(buf.cursor_line(), 9);
    assert_eq!(buf.line(9), Some(""));
}

#[test]
fn test_create_existing_note_only_jumps() {
    let layout = preamble_layout();
    let mut buf = talk_notes();
    let before = buf.clone();
    let mut nav = Navigator::new(&mut buf, &layout, "talk.pdf");

    assert_eq!(nav.create_or_jump_to_slide_note(3), Ok(5));
    assert_eq!(buf.lines(), before.lines());
}

#[test]
fn test_create_first_note_appends_to_pdf_region_with_separator() {
    let layout = preamble_layout();
    let mut buf = buffer(&["pdf: \"talk.pdf\"", "", "## Slide 5", "- results"]);
    let mut nav = Navigator::new(&mut buf, &layout, "talk.pdf");

    assert_eq!(nav.create_or_jump_to_slide_note(2), Ok(8));

    assert_eq!(buf.line(4), Some(""));
    assert_eq!(buf.line(5), Some("## Slide 2"));
    assert_eq!(buf.line(7), Some("- "));
    assert_eq!(buf.line_count(), 9);
}

#[test]
fn test_create_note_stays_inside_inline_pdf_region() {
    let layout = inline_layout("# %s");
    let mut buf = buffer(&["# a.pdf", "", "# b.pdf", "## Slide 1"]);
    let mut nav = Navigator::new(&mut buf, &layout, "a.pdf");

    assert_eq!(nav.create_or_jump_to_slide_note(1), Ok(5));

    assert_eq!(buf.line(2), Some("## Slide 1"));
    assert_eq!(buf.line(4), Some("- "));
    assert_eq!(buf.line(6), Some("# b.pdf"));
}

#[test]
fn test_page_at_cursor() {
    let layout = preamble_layout();
    let mut buf = talk_notes();
    buf.set_cursor_line(7);
    let nav = Navigator::new(&mut buf, &layout, "talk.pdf");
    assert_eq!(nav.page_at_cursor(), Ok(5));

    let mut buf = talk_notes();
    buf.set_cursor_line(1);
    let nav = Navigator::new(&mut buf, &layout, "talk.pdf");
    assert_eq!(nav.page_at_cursor(), Err(NavError::NotInNote));
}

#[test]
fn test_document_name_from_preamble() {
    let layout = preamble_layout();
    let mut buf = talk_notes();
    buf.set_cursor_line(6);

    assert_eq!(layout.document_name(&buf), Ok("talk.pdf".to_string()));
}

#[test]
fn test_document_name_prefers_header_above_cursor() {
    let layout = inline_layout("# %s");
    let mut buf = buffer(&["intro", "# a.pdf", "## Slide 1", "# b.pdf", "## Slide 2"]);

    buf.set_cursor_line(4);
    assert_eq!(layout.document_name(&buf), Ok("b.pdf".to_string()));

    buf.set_cursor_line(2);
    assert_eq!(layout.document_name(&buf), Ok("a.pdf".to_string()));

    buf.set_cursor_line(0);
    assert_eq!(layout.document_name(&buf), Ok("a.pdf".to_string()));

    let empty = buffer(&["no headers here"]);
    assert_eq!(layout.document_name(&empty), Err(NavError::NoDocument));
}
