//! CLI integration tests for command orchestration.
//!
//! Tests cover:
//! - Settings resolution (build_settings) with defaults and overrides
//! - Config loading fallbacks (load_config)
//! - End-to-end command runs with real INI, quote and state files on disk

mod common;

use papertrader::adapters::file_config_adapter::FileConfigAdapter;
use papertrader::cli::{self, Cli, Command};
use papertrader::domain::error::PapertraderError;
use papertrader::domain::ledger::LedgerState;
use std::io::Write;
use std::path::PathBuf;
use tempfile::TempDir;

fn write_temp_ini(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

mod settings_resolution {
    use super::*;

    #[test]
    fn empty_config_resolves_to_builtin_defaults() {
        let settings = cli::build_settings(&FileConfigAdapter::empty()).unwrap();

        assert!((settings.starting_balance - 500_000.0).abs() < f64::EPSILON);
        assert_eq!(settings.state_file, PathBuf::from("stock_data.json"));
        assert_eq!(settings.quotes_dir, PathBuf::from("quotes"));
        assert_eq!(settings.symbols.len(), 6);
        assert!(settings.symbols.contains(&"RELIANCE.NS".to_string()));
    }

    #[test]
    fn configured_values_override_defaults() {
        let ini = r#"
[ledger]
starting_balance = 25000.5
state_file = /tmp/ledger.json

[market]
symbols = abc.ns, DEF.NS
quotes_dir = /srv/quotes
"#;
        let adapter = FileConfigAdapter::from_string(ini).unwrap();
        let settings = cli::build_settings(&adapter).unwrap();

        assert!((settings.starting_balance - 25_000.5).abs() < f64::EPSILON);
        assert_eq!(settings.state_file, PathBuf::from("/tmp/ledger.json"));
        assert_eq!(settings.quotes_dir, PathBuf::from("/srv/quotes"));
        assert_eq!(settings.symbols, vec!["ABC.NS", "DEF.NS"]);
    }

    #[test]
    fn non_positive_starting_balance_is_invalid() {
        let adapter =
            FileConfigAdapter::from_string("[ledger]\nstarting_balance = -5\n").unwrap();
        let err = cli::build_settings(&adapter).unwrap_err();
        assert!(matches!(
            err,
            PapertraderError::ConfigInvalid { key, .. } if key == "starting_balance"
        ));
    }

    #[test]
    fn malformed_symbol_list_is_rejected() {
        let adapter =
            FileConfigAdapter::from_string("[market]\nsymbols = TCS.NS,,INFY.NS\n").unwrap();
        let err = cli::build_settings(&adapter).unwrap_err();
        assert!(matches!(err, PapertraderError::Universe(_)));
    }
}

mod config_loading {
    use super::*;

    #[test]
    fn no_config_path_falls_back_to_defaults() {
        let adapter = cli::load_config(None).unwrap();
        let settings = cli::build_settings(&adapter).unwrap();
        assert!((settings.starting_balance - 500_000.0).abs() < f64::EPSILON);
    }

    #[test]
    fn explicit_missing_config_path_fails() {
        let path = PathBuf::from("/nonexistent/papertrader.ini");
        assert!(cli::load_config(Some(&path)).is_err());
    }

    #[test]
    fn real_ini_file_loads() {
        let file = write_temp_ini("[ledger]\nstarting_balance = 750000\n");
        let adapter = cli::load_config(Some(&file.path().to_path_buf())).unwrap();
        let settings = cli::build_settings(&adapter).unwrap();
        assert!((settings.starting_balance - 750_000.0).abs() < f64::EPSILON);
    }
}

mod end_to_end {
    use super::*;

    struct Fixture {
        _dir: TempDir,
        config: PathBuf,
        state_file: PathBuf,
        export_file: PathBuf,
    }

    fn setup() -> Fixture {
        let dir = TempDir::new().unwrap();
        let root = dir.path().to_path_buf();

        let quotes_dir = root.join("quotes");
        std::fs::create_dir(&quotes_dir).unwrap();
        std::fs::write(
            quotes_dir.join("TCS.NS.csv"),
            "date,close\n2024-01-15,100.0\n2024-01-16,110.0\n",
        )
        .unwrap();

        let state_file = root.join("stock_data.json");
        let config = root.join("papertrader.ini");
        std::fs::write(
            &config,
            format!(
                "[ledger]\nstarting_balance = 500000\nstate_file = {}\n\n\
                 [market]\nsymbols = TCS.NS, INFY.NS\nquotes_dir = {}\n",
                state_file.display(),
                quotes_dir.display(),
            ),
        )
        .unwrap();

        Fixture {
            _dir: dir,
            config,
            state_file,
            export_file: root.join("stock_transactions.csv"),
        }
    }

    fn run_command(command: Command) {
        let _ = cli::run(Cli { command });
    }

    fn read_state(fixture: &Fixture) -> LedgerState {
        let content = std::fs::read_to_string(&fixture.state_file).unwrap();
        serde_json::from_str(&content).unwrap()
    }

    #[test]
    fn reset_writes_a_fresh_ledger() {
        let fixture = setup();

        run_command(Command::Reset {
            config: Some(fixture.config.clone()),
        });

        let state = read_state(&fixture);
        assert!((state.balance - 500_000.0).abs() < f64::EPSILON);
        assert!(state.holdings.is_empty());
        assert!(state.transactions.is_empty());
    }

    #[test]
    fn buy_uses_the_latest_quoted_close() {
        let fixture = setup();

        run_command(Command::Buy {
            symbol: "tcs.ns".to_string(),
            quantity: 10,
            price: None,
            config: Some(fixture.config.clone()),
        });

        let state = read_state(&fixture);
        // latest close is the 2024-01-16 row
        assert!((state.balance - 498_900.0).abs() < f64::EPSILON);
        assert_eq!(state.total_quantity("TCS.NS"), 10);
        assert!(state.is_watched("TCS.NS"));
    }

    #[test]
    fn explicit_price_override_skips_the_quote_lookup() {
        let fixture = setup();

        // INFY.NS has no quote file; the override makes the trade possible
        run_command(Command::Buy {
            symbol: "INFY.NS".to_string(),
            quantity: 4,
            price: Some(50.0),
            config: Some(fixture.config.clone()),
        });

        let state = read_state(&fixture);
        assert_eq!(state.total_quantity("INFY.NS"), 4);
        assert!((state.balance - 499_800.0).abs() < f64::EPSILON);
    }

    #[test]
    fn buy_then_sell_then_export() {
        let fixture = setup();

        run_command(Command::Buy {
            symbol: "TCS.NS".to_string(),
            quantity: 10,
            price: Some(100.0),
            config: Some(fixture.config.clone()),
        });
        run_command(Command::Sell {
            symbol: "TCS.NS".to_string(),
            quantity: 10,
            price: Some(150.0),
            config: Some(fixture.config.clone()),
        });
        run_command(Command::Export {
            output: Some(fixture.export_file.clone()),
            config: Some(fixture.config.clone()),
        });

        let state = read_state(&fixture);
        assert!(!state.has_holding("TCS.NS"));
        assert!((state.balance - 500_500.0).abs() < f64::EPSILON);

        let content = std::fs::read_to_string(&fixture.export_file).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines[0], "Action,Stock,Quantity,Price,Profit/Loss,Time");
        assert_eq!(lines.len(), 3);
        assert!(lines[2].starts_with("sell,TCS.NS,10,150,500,"));
    }

    #[test]
    fn unknown_symbol_never_touches_the_ledger() {
        let fixture = setup();

        run_command(Command::Buy {
            symbol: "AAPL".to_string(),
            quantity: 1,
            price: Some(10.0),
            config: Some(fixture.config.clone()),
        });

        // rejected before state was loaded or created
        assert!(!fixture.state_file.exists());
    }

    #[test]
    fn watch_and_unwatch_persist_across_runs() {
        let fixture = setup();

        run_command(Command::Watch {
            symbol: "INFY.NS".to_string(),
            config: Some(fixture.config.clone()),
        });
        assert!(read_state(&fixture).is_watched("INFY.NS"));

        run_command(Command::Unwatch {
            symbol: "INFY.NS".to_string(),
            config: Some(fixture.config.clone()),
        });
        assert!(!read_state(&fixture).is_watched("INFY.NS"));
    }
}
