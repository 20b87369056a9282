use std::io::Write;

use assert_cmd::Command;
use predicates as pred;
use tempfile::NamedTempFile;

#[test]
fn end_to_end_outputs_expected_balances() {
    // user 1: +100.00, -30.00, duplicate tx-3 rejected, bad amount rejected
    // user 2: +50.00, overdraft of 80.00 rejected
    // user 3: 9.999 normalizes to 10.00
    // user 4: account auto-opens, first lose bounces off the zero balance
    let mut file = NamedTempFile::new().expect("create temp file");
    writeln!(
        file,
        "user,tx,amount,source,type\n\
         1,tx-1,100.0,game,win\n\
         2,tx-2,50.0,server,win\n\
         1,tx-3,30.0,game,lose\n\
         1,tx-3,30.0,game,lose\n\
         2,tx-4,80.0,payment,lose\n\
         3,tx-5,9.999,game,win\n\
         1,tx-6,abc,game,win\n\
         4,tx-7,20.0,game,lose"
    )
    .unwrap();

    let exe = env!("CARGO_BIN_EXE_wallet_ledger");
    let mut cmd = Command::new(exe);
    cmd.arg(file.path());

    cmd.assert()
        .success()
        .stdout(pred::str::contains("user,currency,balance"))
        .stdout(pred::str::contains("1,EUR,70.00"))
        .stdout(pred::str::contains("2,EUR,50.00"))
        .stdout(pred::str::contains("3,EUR,10.00"))
        .stdout(pred::str::contains("4,EUR,0.00"))
        .stderr(pred::str::contains("transaction rejected"))
        .stderr(pred::str::contains("tx-3 already exists"))
        .stderr(pred::str::contains("insufficient balance"))
        .stderr(pred::str::contains("invalid amount format"));
}

#[test]
fn malformed_rows_are_skipped_not_fatal() {
    let mut file = NamedTempFile::new().expect("create temp file");
    writeln!(
        file,
        "user,tx,amount,source,type\n\
         nope,tx-1,10.0,game,win\n\
         1,tx-2,10.0,game,win"
    )
    .unwrap();

    let exe = env!("CARGO_BIN_EXE_wallet_ledger");
    let mut cmd = Command::new(exe);
    cmd.arg(file.path());

    cmd.assert()
        .success()
        .stdout(pred::str::contains("1,EUR,10.00"))
        .stderr(pred::str::contains("discarding unreadable record"));
}

#[test]
fn missing_input_path_is_a_usage_error() {
    let exe = env!("CARGO_BIN_EXE_wallet_ledger");
    Command::new(exe)
        .assert()
        .failure()
        .stderr(pred::str::contains("usage:"));
}
