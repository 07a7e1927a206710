use std::process::Command;

const UNREACHABLE: &str = "http://127.0.0.1:9";

fn temp_path(label: &str) -> std::path::PathBuf {
    std::env::temp_dir().join(format!(
        "solvetrack-cli-{label}-{}.json",
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos()
    ))
}

#[test]
fn cli_list_users_reads_the_local_overlay_offline() {
    let exe = env!("CARGO_BIN_EXE_solvetrack");
    let data = temp_path("list");
    std::fs::write(
        &data,
        r#"{
  "solvetrack.custom.usernames": ["cy"],
  "solvetrack.custom.mappings": { "cy": "Cy D" }
}"#,
    )
    .expect("seed data file");

    let output = Command::new(exe)
        .args([
            "--roster",
            UNREACHABLE,
            "--api",
            UNREACHABLE,
            "--timeout",
            "2",
            "--data",
        ])
        .arg(&data)
        .arg("list-users")
        .output()
        .expect("run cli");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("cy"));
    assert!(stdout.contains("Cy D"));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("locally added users only"));
}

#[test]
fn cli_add_user_fails_cleanly_when_backend_unreachable() {
    let exe = env!("CARGO_BIN_EXE_solvetrack");
    let data = temp_path("add");

    let output = Command::new(exe)
        .args([
            "--roster",
            UNREACHABLE,
            "--api",
            UNREACHABLE,
            "--timeout",
            "2",
            "--data",
        ])
        .arg(&data)
        .args(["add-user", "ghost"])
        .output()
        .expect("run cli");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("could not be verified"));
    assert!(!data.exists());
}

#[test]
fn cli_board_falls_back_to_cached_figures_offline() {
    let exe = env!("CARGO_BIN_EXE_solvetrack");
    let data = temp_path("board");
    std::fs::write(
        &data,
        r#"{
  "solvetrack.custom.usernames": ["cy"],
  "solvetrack.custom.mappings": { "cy": "Cy D" },
  "solvetrack.user.cy": {
    "startOfDayTotal": 90,
    "startOfMonthTotal": 50,
    "total": 100,
    "dailyIncrease": 10,
    "monthlyIncrease": 50,
    "easy": 60,
    "medium": 30,
    "hard": 10,
    "lastUpdatedDay": "2024-05-01",
    "lastUpdatedMonth": "2024-05"
  }
}"#,
    )
    .expect("seed data file");

    let output = Command::new(exe)
        .args([
            "--roster",
            UNREACHABLE,
            "--api",
            UNREACHABLE,
            "--timeout",
            "2",
            "--data",
        ])
        .arg(&data)
        .arg("board")
        .output()
        .expect("run cli");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Solvetrack Leaderboard"));
    assert!(stdout.contains("Cy D *"));
    assert!(stdout.contains("100"));
    assert!(stdout.contains("figures cached or missing"));
}

#[test]
fn cli_board_with_no_users_suggests_add_user() {
    let exe = env!("CARGO_BIN_EXE_solvetrack");
    let data = temp_path("empty");

    let output = Command::new(exe)
        .args([
            "--roster",
            UNREACHABLE,
            "--api",
            UNREACHABLE,
            "--timeout",
            "2",
            "--data",
        ])
        .arg(&data)
        .arg("board")
        .output()
        .expect("run cli");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("No users tracked yet"));
}
