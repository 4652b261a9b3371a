mod common;

use bizdash_core::config::Config;
use bizdash_core::currency::DateFormatStyle;
use bizdash_core::domain::{EntryDraft, Field};
use bizdash_core::engine::{FixedClock, Session};
use bizdash_core::errors::{ConfigError, WorkflowError};
use common::{setup_config_manager, today};

#[test]
fn saved_config_survives_reload() {
    let manager = setup_config_manager();
    let mut config = manager.load().unwrap();
    config.set("locale", "de-DE").unwrap();
    config.set("currency", "EUR").unwrap();
    config.set("date_style", "medium").unwrap();
    manager.save(&config).unwrap();

    let reloaded = manager.load().unwrap();
    assert_eq!(reloaded.date_style, DateFormatStyle::Medium);
    assert_eq!(reloaded.money_format().format(1200.5), "€1.200,50");
}

#[test]
fn corrupt_file_reports_serde_error() {
    let manager = setup_config_manager();
    std::fs::write(manager.path(), "{ not json").unwrap();
    assert!(matches!(manager.load(), Err(ConfigError::Serde(_))));
}

#[test]
fn invalid_currency_in_file_is_rejected() {
    let manager = setup_config_manager();
    std::fs::write(manager.path(), r#"{"currency":"DOLLARS"}"#).unwrap();
    assert!(matches!(manager.load(), Err(ConfigError::Invalid(_))));
}

#[test]
fn disallowing_future_dates_flows_into_entry_validation() {
    let mut config = Config::default();
    config.set("allow_future_dates", "false").unwrap();
    let settings = config.workflow_settings(today()).unwrap();
    let mut session = Session::empty(settings, &FixedClock::new(today()));

    session.income.open_new().unwrap();
    let err = session
        .income
        .submit(EntryDraft::new("2024-07-11", "Retainer", "300", "Services"))
        .unwrap_err();
    match err {
        WorkflowError::Validation(errors) => {
            assert_eq!(errors.first(Field::Date), Some("Date cannot be after 2024-07-10."));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn appointment_defaults_prefill_new_form() {
    let mut config = Config::default();
    config.set("default_start", "13:15").unwrap();
    config.set("default_end", "14:00").unwrap();
    let settings = config.workflow_settings(today()).unwrap();
    let mut session = Session::empty(settings, &FixedClock::new(today()));

    let draft = session.appointments.open_new().unwrap();
    assert_eq!(draft.start_time, "13:15");
    assert_eq!(draft.end_time, "14:00");
    assert_eq!(draft.date, "2024-07-10");
}
