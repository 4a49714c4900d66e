// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use anyhow::Result;
use clap::Parser;
use cmd::commands::run_command;
use cmd::common::{EXIT_BAD_REQUEST, EXIT_FAILURE};
use cmd::{Cli, Commands, Outcome, exit_code_for, open_standings};
use std::path::{Path, PathBuf};
use tempfile::{TempDir, tempdir};

/// Write a small snapshot store and a configuration file pointing at it.
fn setup_store() -> Result<(TempDir, PathBuf)> {
    let tmp = tempdir()?;
    let database = tmp.path().join("kudos.duckdb");
    {
        let conn = duckdb::Connection::open(&database)?;
        conn.execute_batch(
            "CREATE TABLE syncs (sync_id VARCHAR, sync_date VARCHAR);
             INSERT INTO syncs VALUES ('s1', '2024-11-26 17:00:00'), ('s2', '2024-11-27 09:00:00');
             CREATE TABLE leaderboard (\"rank\" INTEGER, name VARCHAR, kudos INTEGER, folder_date VARCHAR, sync_id VARCHAR);
             INSERT INTO leaderboard VALUES
               (1, 'A', 100, '2024-11-26 17:00:00', 's1'),
               (2, 'B',  90, '2024-11-26 17:00:00', 's1'),
               (1, 'A', 120, '2024-11-27 09:00:00', 's2');
             CREATE TABLE archive (column2 VARCHAR, column3 VARCHAR, column9 VARCHAR, column10 VARCHAR);
             INSERT INTO archive VALUES ('1', 'C', '40', '2024-11-25 08:00:00');",
        )?;
    }

    let config = tmp.path().join("standings.yaml");
    std::fs::write(
        &config,
        format!(
            "database: {}\ntables:\n  - name: leaderboard\n  - name: archive\n    naming: generic\ndefault_top: 5\n",
            database.display()
        ),
    )?;
    Ok((tmp, config))
}

fn run(config: &Path, args: &[&str]) -> Result<(Outcome, String)> {
    let mut argv = vec!["standings"];
    argv.extend_from_slice(args);
    let cli = Cli::try_parse_from(argv)?;

    let standings = open_standings(Some(config.to_path_buf()))?;
    let mut output = String::new();
    let outcome = run_command(&standings, cli.command, |text| output.push_str(text))?;
    Ok((outcome, output))
}

#[test]
fn test_parse_commands() -> Result<()> {
    let cli = Cli::try_parse_from(["standings", "--config", "/etc/s.yaml", "top", "-n", "3"])?;
    assert_eq!(cli.config, Some(PathBuf::from("/etc/s.yaml")));
    assert_eq!(
        cli.command,
        Commands::Top {
            metric: "kudos".to_string(),
            count: Some(3)
        }
    );

    let cli = Cli::try_parse_from(["standings", "series", "--metric", "finishes", "A", "B"])?;
    assert_eq!(
        cli.command,
        Commands::Series {
            metric: "finishes".to_string(),
            names: vec!["A".to_string(), "B".to_string()]
        }
    );

    let cli = Cli::try_parse_from(["standings", "closest", "2024-11-26 17"])?;
    assert_eq!(
        cli.command,
        Commands::Closest {
            timestamp: "2024-11-26 17".to_string()
        }
    );

    assert!(Cli::try_parse_from(["standings", "series"]).is_err());
    assert!(Cli::try_parse_from(["standings"]).is_err());
    Ok(())
}

#[test]
fn test_top_command_outputs_json() -> Result<()> {
    let (_tmp, config) = setup_store()?;
    let (outcome, output) = run(&config, &["top"])?;
    assert_eq!(outcome, Outcome::Found);

    let value: serde_json::Value = serde_json::from_str(&output)?;
    // The archive has no sync_id, so its own newest capture counts as its latest run.
    assert_eq!(
        value,
        serde_json::json!([{ "name": "A", "value": 120 }, { "name": "C", "value": 40 }])
    );

    let (_, output) = run(&config, &["top", "-n", "1"])?;
    let value: serde_json::Value = serde_json::from_str(&output)?;
    assert_eq!(value.as_array().map(Vec::len), Some(1));
    Ok(())
}

#[test]
fn test_closest_command() -> Result<()> {
    let (_tmp, config) = setup_store()?;
    let (outcome, output) = run(&config, &["closest", "2024-11-25"])?;
    assert_eq!(outcome, Outcome::Found);

    let value: serde_json::Value = serde_json::from_str(&output)?;
    assert_eq!(value["bucket"]["key"], "2024-11-25 08:00:00");
    assert_eq!(value["bucket"]["exact"], false);
    assert_eq!(value["rows"][0]["name"], "C");
    assert_eq!(value["rows"][0]["kudos"], 40);
    Ok(())
}

#[test]
fn test_latest_and_history_commands() -> Result<()> {
    let (_tmp, config) = setup_store()?;
    let (_, output) = run(&config, &["latest"])?;
    let value: serde_json::Value = serde_json::from_str(&output)?;
    assert_eq!(value["sync"]["sync_id"], "s2");
    assert_eq!(value["rows"].as_array().map(Vec::len), Some(1));

    let (_, output) = run(&config, &["history"])?;
    let value: serde_json::Value = serde_json::from_str(&output)?;
    assert_eq!(value["metric"], "kudos");
    assert_eq!(value["series"]["A"][1], serde_json::json!({ "day": "2024-11-27", "value": 120 }));
    Ok(())
}

#[test]
fn test_no_data_outcomes() -> Result<()> {
    let (_tmp, config) = setup_store()?;
    let (outcome, output) = run(&config, &["series", "Nobody"])?;
    assert!(matches!(outcome, Outcome::NoData(_)));
    assert!(output.is_empty());
    Ok(())
}

#[test]
fn test_error_exit_codes() -> Result<()> {
    let (tmp, config) = setup_store()?;

    let err = run(&config, &["closest", "last tuesday"]).expect_err("malformed");
    assert_eq!(exit_code_for(&err), EXIT_BAD_REQUEST);

    let err = run(&config, &["top", "--metric", "name"]).expect_err("not numeric");
    assert_eq!(exit_code_for(&err), EXIT_BAD_REQUEST);

    let missing = tmp.path().join("missing.yaml");
    let err = run(&missing, &["latest"]).expect_err("no config");
    assert_eq!(exit_code_for(&err), EXIT_FAILURE);
    Ok(())
}
