mod common;

use assert_fs::prelude::*;
use predicates::prelude::*;
use predicates::str::contains;

use common::script_cmd;

#[test]
fn expense_create_flow_prints_notification_and_sorted_list() {
    let home = assert_fs::TempDir::new().unwrap();
    let input = "expenses new\n\
                 expenses submit 2024-07-08 \"Printer Ink\" 35.5 Supplies\n\
                 expenses list\n\
                 exit\n";

    script_cmd(home.path())
        .write_stdin(input)
        .assert()
        .success()
        .stdout(contains("Add New Expense Entry"))
        .stdout(contains(
            "OK: Expense Entry Saved: Printer Ink for $35.50 has been recorded.",
        ))
        .stdout(contains("=== Expense Log ==="))
        .stdout(
            predicate::str::is_match(r"(?s)Office Rent.*Printer Ink.*Software Subscription")
                .unwrap(),
        );
}

#[test]
fn validation_errors_are_reported_per_field() {
    let home = assert_fs::TempDir::new().unwrap();
    let input = "income new\nincome submit 2024-07-08 X -5 Services\nincome state\n";

    script_cmd(home.path())
        .write_stdin(input)
        .assert()
        .success()
        .stdout(contains("ERROR: description: Description must be at least 2 characters."))
        .stdout(contains("ERROR: amount: Amount must be positive."))
        .stdout(contains("Income workflow is creating a record."));
}

#[test]
fn delete_needs_confirmation() {
    let home = assert_fs::TempDir::new().unwrap();
    let input = "expenses delete 1\n\
                 expenses dismiss\n\
                 expenses delete 1\n\
                 expenses confirm\n\
                 expenses list\n";

    script_cmd(home.path())
        .write_stdin(input)
        .assert()
        .success()
        .stdout(contains("Delete \"Office Rent\"?"))
        .stdout(contains("Deletion cancelled."))
        .stdout(contains(
            "WARNING: Expense Deleted: Office Rent successfully deleted.",
        ));
}

#[test]
fn submit_without_open_form_is_rejected() {
    let home = assert_fs::TempDir::new().unwrap();
    script_cmd(home.path())
        .write_stdin("income submit 2024-07-08 Workshop 300 Services\n")
        .assert()
        .success()
        .stdout(contains("ERROR: Cannot submit a form while idle"));
}

#[test]
fn appointments_day_view_uses_fixed_today() {
    let home = assert_fs::TempDir::new().unwrap();
    let input = "appointments day\n\
                 appointments new\n\
                 appointments submit \"Vendor Call\" 2024-07-12 08:00 08:45 \"Quarterly order\"\n\
                 appointments day 2024-07-12\n\
                 appointments booked\n";

    script_cmd(home.path())
        .write_stdin(input)
        .assert()
        .success()
        .stdout(contains("Appointments for July 10th, 2024"))
        .stdout(contains("10:00 - 11:00"))
        .stdout(contains("Appointment Created: Scheduled \"Vendor Call\" for July 12th, 2024."))
        .stdout(predicate::str::is_match(r"(?s)Vendor Call.*Dentist Appointment").unwrap());
}

#[test]
fn summary_reports_seeded_totals() {
    let home = assert_fs::TempDir::new().unwrap();
    script_cmd(home.path())
        .write_stdin("summary\n")
        .assert()
        .success()
        .stdout(contains("Total Revenue"))
        .stdout(contains("$1,650.00"))
        .stdout(contains("$850.00"))
        .stdout(contains("Calculated as Revenue - Expenses"))
        .stdout(contains("Jul 2024"));
}

#[test]
fn config_set_is_persisted() {
    let home = assert_fs::TempDir::new().unwrap();
    script_cmd(home.path())
        .write_stdin("config set currency eur\nexpenses list\n")
        .assert()
        .success()
        .stdout(contains("currency set to eur."))
        .stdout(contains("€800.00"));

    home.child("config.json")
        .assert(predicate::str::contains("\"currency\": \"EUR\""));
}

#[test]
fn unknown_command_suggests_closest_match() {
    let home = assert_fs::TempDir::new().unwrap();
    script_cmd(home.path())
        .write_stdin("expnses list\n")
        .assert()
        .success()
        .stdout(contains("Unknown command `expnses`"))
        .stdout(contains("Did you mean `expenses`?"));
}

#[test]
fn bad_today_override_fails_fast() {
    let home = assert_fs::TempDir::new().unwrap();
    script_cmd(home.path())
        .env("BIZDASH_TODAY", "yesterday")
        .write_stdin("exit\n")
        .assert()
        .failure()
        .stderr(contains("BIZDASH_TODAY must be YYYY-MM-DD"));
}
