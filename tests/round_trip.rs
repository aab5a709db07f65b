//! Retrieval followed by conversion, through real files.

use std::fs;

use amrseq::annotation::RowPolicy;
use amrseq::convert::{convert, default_output_path};
use amrseq::extract::{retrieve, OutputLocation};
use amrseq::fasta::read_fasta_file;
use amrseq::table::{write_table, Cell};
use tempfile::TempDir;

fn coordinate_row(id: &str, start: i64, end: i64, resistance: &str) -> Vec<Cell> {
    let mut cells = vec![Cell::Empty; 13];
    cells[0] = Cell::text("hit");
    cells[1] = Cell::text(id);
    cells[2] = Cell::Int(start);
    cells[3] = Cell::Int(end);
    cells[12] = Cell::text(resistance);
    cells
}

#[test]
fn retrieve_then_convert_round_trip() {
    let dir = TempDir::new().unwrap();

    let fasta = dir.path().join("plate-3_[S7].fasta");
    fs::write(
        &fasta,
        ">S1 chromosome\nACGTACGTAC\n>S2\nTTTTGGGGCCCC\n>S3\nAAAA\n",
    )
    .unwrap();

    let coords = dir.path().join("coords.xlsx");
    let header: Vec<String> = (1..=13).map(|i| format!("col{}", i)).collect();
    let header: Vec<&str> = header.iter().map(String::as_str).collect();
    write_table(
        &coords,
        &header,
        &[
            coordinate_row("S1", 2, 5, "ampC"),
            coordinate_row("S2", 5, 8, "tetA"),
            coordinate_row("S1", 7, 10, "blaZ"),
        ],
    )
    .unwrap();

    let report = retrieve(&fasta, &coords, &OutputLocation::BesideInput, RowPolicy::default())
        .unwrap();
    assert_eq!(report.output, dir.path().join("S7_AMR.xlsx"));
    assert_eq!(report.rows, 3);
    assert_eq!(report.gaps.len(), 1);
    assert_eq!(report.gaps[0].id, "S3");
    assert_eq!(report.notice, None);

    let fasta_out = default_output_path(&report.output);
    convert(&report.output, &fasta_out).unwrap();

    let entries = read_fasta_file(&fasta_out).unwrap();
    let pairs: Vec<(&str, &str)> = entries
        .iter()
        .map(|e| (e.id.as_str(), e.sequence.as_str()))
        .collect();
    assert_eq!(
        pairs,
        vec![
            ("S1_S7", "CGTA"),
            ("S1_S7_1", "GTAC"),
            ("S2_S7", "GGGG"),
        ]
    );
}

#[test]
fn long_contig_round_trips_through_tsv() {
    let dir = TempDir::new().unwrap();
    let fasta = dir.path().join("assembly_S9.fasta");
    let contig: String = "GATTACA".repeat(6_000);
    fs::write(&fasta, format!(">contig1 circular\n{}\n", contig)).unwrap();

    let coords = dir.path().join("coords.xlsx");
    let header: Vec<String> = (1..=13).map(|i| format!("col{}", i)).collect();
    let header: Vec<&str> = header.iter().map(String::as_str).collect();
    write_table(&coords, &header, &[coordinate_row("contig1", 2, 5, "ampC")]).unwrap();

    let report = retrieve(&fasta, &coords, &OutputLocation::BesideInput, RowPolicy::default())
        .unwrap();
    assert_eq!(report.output, dir.path().join("S9_AMR.tsv"));
    assert!(report.notice.is_some());

    let fasta_out = default_output_path(&report.output);
    convert(&report.output, &fasta_out).unwrap();
    assert_eq!(fs::read_to_string(&fasta_out).unwrap(), ">contig1_S9\nATTA\n");
}

#[test]
fn malformed_coordinates_leave_no_output() {
    let dir = TempDir::new().unwrap();
    let fasta = dir.path().join("sample_Q.fasta");
    fs::write(&fasta, ">S1\nACGT\n").unwrap();

    let coords = dir.path().join("coords.csv");
    fs::write(
        &coords,
        "a,id,start,end,,,,,,,,,res\nx,S1,two,4,,,,,,,,,ampC\n",
    )
    .unwrap();

    let result = retrieve(&fasta, &coords, &OutputLocation::BesideInput, RowPolicy::default());
    let message = result.unwrap_err().to_string();
    assert!(message.contains("'two'"), "{message}");
    assert!(!dir.path().join("Q_AMR.xlsx").exists());
}
