use assert_cmd::cargo_bin;
use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::io::Write;
use std::process::Command;
use tempfile::NamedTempFile;

fn feed(rows: &[&str]) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "type, order, stage, amount, note, attachment").unwrap();
    for row in rows {
        writeln!(file, "{row}").unwrap();
    }
    file
}

#[test]
fn test_order_progression_summary() {
    let file = feed(&[
        "open, 1, , 5000, ,",
        "update, 1, fitting, 3000, First fitting held,",
        "update, 1, ready, 2000, Ready for pickup,",
        "update, 1, , , Pressed and bagged,",
    ]);

    let mut cmd = Command::new(cargo_bin!("atelier"));
    cmd.arg(file.path());

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("1,ready,5000,5000,0,fully_paid,3"));
}

#[test]
fn test_rejected_rows_do_not_stop_the_run() {
    let file = feed(&[
        "open, 1, , 1000, ,",
        "update, 1, sewing, , Sewing started,",
        "update, 1, concept, , Backwards move,",
        "update, 1, picked_up, 1000, Release attempt before fitting,",
    ]);

    let mut cmd = Command::new(cargo_bin!("atelier"));
    cmd.arg(file.path());

    // Both illegal rows are skipped; neither their stage nor their payment
    // lands.
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("1,sewing,1000,0,1000,no_payment,1"));
}

#[test]
fn test_multiple_orders_sorted_by_id() {
    let file = feed(&[
        "open, 2, , 800, ,",
        "open, 1, , 400, ,",
        "update, 2, designing, 100, Sketch approved,",
    ]);

    let mut cmd = Command::new(cargo_bin!("atelier"));
    cmd.arg(file.path());

    cmd.assert().success().stdout(
        predicate::str::contains(
            "1,concept,400,0,400,no_payment,0\n2,designing,800,100,700,partial_payment,1",
        ),
    );
}

#[test]
fn test_malformed_rows_are_skipped() {
    let file = feed(&[
        "open, 1, , 500, ,",
        "update, 1, embroidery, , Not a real stage,",
        "close, 1, , , ,",
        "update, 1, cutting, , Fabric cut,",
    ]);

    let mut cmd = Command::new(cargo_bin!("atelier"));
    cmd.arg(file.path());

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("1,cutting,500,0,500,no_payment,1"));
}

#[test]
fn test_json_report_carries_history_and_progress() {
    let file = feed(&[
        "open, 1, , 5000, ,",
        "update, 1, fitting, 5000, Fitted and settled, updates/1/fit.jpg",
    ]);

    let mut cmd = Command::new(cargo_bin!("atelier"));
    cmd.arg(file.path()).arg("--json");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("\"current_stage\": \"fitting\""))
        .stdout(predicate::str::contains("\"payment_status\": \"fully_paid\""))
        .stdout(predicate::str::contains("\"percent_complete\""))
        .stdout(predicate::str::contains("updates/1/fit.jpg"));
}

#[test]
fn test_missing_input_file_fails() {
    let mut cmd = Command::new(cargo_bin!("atelier"));
    cmd.arg("no-such-feed.csv");
    cmd.assert().failure();
}
