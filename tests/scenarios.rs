use std::io::Write;

use flate2::write::GzEncoder;
use flate2::Compression;

use msablocks::acquire::read_text;
use msablocks::consensus::CellClass;
use msablocks::fasta::parse_alignment;
use msablocks::layout::{layout_blocks, CellKey, RowSpan};
use msablocks::render::{render_text, RenderOptions};
use msablocks::session::{AlignmentSession, SessionOutcome};

fn session(text: &str, width: &str) -> AlignmentSession {
    match AlignmentSession::open(text, width).unwrap() {
        SessionOutcome::Ready(session) => session,
        SessionOutcome::NoSequences => panic!("expected sequences"),
    }
}

#[test]
fn two_records_parse() {
    let aln = parse_alignment(">s1\nACGT\n>s2\nAC-T\n").unwrap();
    let ids: Vec<&str> = aln.sequences.iter().map(|r| r.id.as_str()).collect();
    let lengths: Vec<usize> = aln.sequences.iter().map(|r| r.ungapped_len()).collect();
    assert_eq!(ids, ["s1", "s2"]);
    assert_eq!(lengths, [4, 3]);
}

#[test]
fn seven_columns_in_blocks_of_three() {
    let aln = parse_alignment(">a\nACGTACG\n>b\nAC-TAC-\n").unwrap();
    let layout = layout_blocks(&aln, 3).unwrap();
    let ranges: Vec<(usize, usize, usize)> = layout
        .blocks
        .iter()
        .map(|b| (b.width(), b.start_label(), b.end_label()))
        .collect();
    assert_eq!(ranges, [(3, 1, 3), (3, 4, 6), (1, 7, 7)]);
}

#[test]
fn internal_gap_against_residue() {
    let s = session(">r0\nAC-GT\n>r1\nACGGT\n", "5");
    let block = &s.layout().blocks[0];

    // Row 0's gap follows a residue, so it counts as a character of its own
    let gap = CellKey { row: 0, col: 2 };
    let g = CellKey { row: 1, col: 2 };
    assert_eq!(block.consensus[2].members(), b"-G");
    assert_eq!(block.cell(gap), Some(CellClass::TieMatch));
    assert_eq!(block.cell(g), Some(CellClass::TieMatch));
    assert_eq!(block.cell(gap).unwrap().tags(), &["aligned-char", "tie-match"]);

    assert_eq!(block.rows[0].span, RowSpan { start: 1, end: 4 });
    assert_eq!(block.rows[1].span, RowSpan { start: 1, end: 5 });
}

#[test]
fn no_sequences_short_circuits() {
    for text in ["", "   \n", ">header_only\n", ">a\n>b\n"] {
        assert!(matches!(
            AlignmentSession::open(text, "60").unwrap(),
            SessionOutcome::NoSequences
        ));
    }
}

#[test]
fn trailing_and_leading_gaps_in_lookup() {
    let s = session(">a\n---ACG---\n>b\nTTTACGTTT\n", "3");

    let lead = s.lookup(0, 0, 2).unwrap();
    assert_eq!(lead.class, CellClass::EndGap);
    assert_eq!(lead.sequence_position, 0);

    let first = s.lookup(1, 0, 0).unwrap();
    assert_eq!(first.class, CellClass::Aligned);
    assert_eq!(first.sequence_position, 1);

    let trail = s.lookup(2, 0, 1).unwrap();
    assert_eq!(trail.class, CellClass::EndGap);
    assert_eq!(trail.alignment_column, 8);
    assert_eq!(trail.sequence_position, 4);

    // End-gap columns only hold b, so b is never a mismatch there
    assert_eq!(s.lookup(0, 1, 0).unwrap().class, CellClass::Aligned);
    assert!(s.lookup(3, 0, 0).is_err());
}

#[test]
fn gzip_file_to_text_view() {
    let fasta = ">a desc\nAC-GT\n>bb\nACGGT\n";
    let mut enc = GzEncoder::new(Vec::new(), Compression::default());
    enc.write_all(fasta.as_bytes()).unwrap();
    let mut file = tempfile::Builder::new().suffix(".fa.gz").tempfile().unwrap();
    file.write_all(&enc.finish().unwrap()).unwrap();

    let text = read_text(file.path()).unwrap();
    let s = session(&text, "5");
    let mut out = Vec::new();
    render_text(s.layout(), &RenderOptions::default(), &mut out).unwrap();

    let expected = "       1   5
 a [1] AC-GT [4] a
bb [1] ACGGT [5] bb
";
    assert_eq!(String::from_utf8(out).unwrap(), expected);
    assert_eq!(s.record_info(0).unwrap().header, ">a desc");
}
