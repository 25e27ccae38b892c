use std::fs::File;
use std::io::Write;

use super::*;

/// Records every launch; fails any launch whose args contain `fail_on`.
#[derive(Default)]
struct RecordingLauncher {
    calls: Vec<Vec<String>>,
    fail_on: Option<String>,
}

impl Launcher for RecordingLauncher {
    fn launch(
        &mut self,
        _program: &Path,
        args: &[String],
        mut stdout: File,
    ) -> std::result::Result<(), LaunchError> {
        self.calls.push(args.to_vec());
        if let Some(ref bad) = self.fail_on {
            if args.iter().any(|a| a == bad) {
                return Err(LaunchError::Failed {
                    status: "exit status: 1".to_string(),
                    stderr: "unsupported".to_string(),
                });
            }
        }
        writeln!(stdout, "There are 0 instances.").unwrap();
        Ok(())
    }
}

fn small_config(dir: &Path, rank: usize) -> SweepConfig {
    SweepConfig {
        rank,
        min_size: 16,
        max_size: 128,
        max_product: 1024,
        step: 2,
        data_types: vec!["F32".to_string(), "F16".to_string()],
        command: PathBuf::from("./permutation_tuning_test"),
        output_dir: dir.join("data"),
    }
}

// --- Presets ---

#[test]
fn test_presets_follow_rank() {
    let two = SweepConfig::preset(2).unwrap();
    assert_eq!(two.step, 2);
    assert_eq!(two.command, PathBuf::from("./permutation_tuning_2"));
    assert_eq!(two.output_dir, PathBuf::from("data2"));
    assert_eq!(two.max_product, 1 << 31);

    let four = SweepConfig::preset(4).unwrap();
    assert_eq!(four.step, 8);
    assert_eq!(four.data_types, vec!["F32", "F16"]);
}

#[test]
fn test_invalid_rank_rejected() {
    assert!(matches!(
        SweepConfig::preset(0),
        Err(TuneError::InvalidRank(0))
    ));
    assert!(SweepConfig::preset(MAX_RANK + 1).is_err());
}

#[test]
fn test_validate_rejects_unit_step() {
    let mut config = SweepConfig::preset(2).unwrap();
    config.step = 1;
    assert!(matches!(config.validate(), Err(TuneError::Config(_))));
}

// --- Enumeration ---

#[test]
fn test_permutations_lexicographic() {
    assert_eq!(permutations(2), vec![vec![0, 1], vec![1, 0]]);
    let three = permutations(3);
    assert_eq!(
        three,
        vec![
            vec![0, 1, 2],
            vec![0, 2, 1],
            vec![1, 0, 2],
            vec![1, 2, 0],
            vec![2, 0, 1],
            vec![2, 1, 0],
        ]
    );
    assert_eq!(permutations(4).len(), 24);
    assert_eq!(permutations(1), vec![vec![0]]);
}

#[test]
fn test_axis_values() {
    let dir = tempfile::tempdir().unwrap();
    let config = small_config(dir.path(), 2);
    assert_eq!(axis_values(&config), vec![16, 32, 64, 128]);
}

#[test]
fn test_size_tuples_respect_ceiling() {
    let dir = tempfile::tempdir().unwrap();
    let config = small_config(dir.path(), 2);
    let tuples = size_tuples(&config);
    // 16*16 = 256, 16*32 = 512, 32*16 = 512; everything else reaches 1024.
    assert_eq!(tuples, vec![vec![16, 16], vec![16, 32], vec![32, 16]]);
}

#[test]
fn test_product_equal_to_ceiling_is_excluded() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = small_config(dir.path(), 2);
    config.max_product = 512;
    assert_eq!(size_tuples(&config), vec![vec![16, 16]]);
}

#[test]
fn test_default_rank2_plan_never_reaches_ceiling() {
    let config = SweepConfig::preset(2).unwrap();
    let points = plan(&config).unwrap();
    assert!(!points.is_empty());
    assert!(points
        .iter()
        .all(|p| p.product() < config.max_product as u128));
    // Largest single axis still reachable when the other axis is minimal.
    assert!(points.iter().any(|p| p.sizes == vec![16, 1 << 26]));
    assert!(!points.iter().any(|p| p.sizes == vec![16, 1 << 27]));
}

#[test]
fn test_default_rank4_plan_uses_octave_steps() {
    let config = SweepConfig::preset(4).unwrap();
    let points = plan(&config).unwrap();
    assert!(points
        .iter()
        .all(|p| p.product() < config.max_product as u128));
    assert!(points
        .iter()
        .flat_map(|p| p.sizes.iter())
        .all(|s| [16u64, 128, 1024, 8192, 65536].contains(s)));
}

#[test]
fn test_plan_order_perm_then_sizes_then_type() {
    let dir = tempfile::tempdir().unwrap();
    let config = small_config(dir.path(), 2);
    let points = plan(&config).unwrap();
    assert_eq!(points.len(), 2 * 3 * 2);
    assert_eq!(points[0].file_name(), "F32_16_16_0_1.txt");
    assert_eq!(points[1].file_name(), "F16_16_16_0_1.txt");
    assert_eq!(points[2].file_name(), "F32_16_32_0_1.txt");
    assert_eq!(points[6].file_name(), "F32_16_16_1_0.txt");
}

#[test]
fn test_point_args_and_command_line() {
    let point = SweepPoint {
        data_type: "F16".to_string(),
        sizes: vec![16, 32, 64],
        perm: vec![2, 0, 1],
    };
    assert_eq!(
        point.args(),
        vec!["F16", "16", "32", "64", "2", "0", "1"]
    );
    assert_eq!(
        point.command_line(Path::new("./permutation_tuning_3")),
        "./permutation_tuning_3 F16 16 32 64 2 0 1"
    );
    assert_eq!(point.file_name(), "F16_16_32_64_2_0_1.txt");
}

// --- Running ---

#[test]
fn test_run_sweep_launches_every_point() {
    let dir = tempfile::tempdir().unwrap();
    let config = small_config(dir.path(), 2);
    let mut launcher = RecordingLauncher::default();
    let mut running = Vec::new();

    let report = run_sweep(&config, &mut launcher, false, |event| {
        if let SweepEvent::Running { command } = event {
            running.push(command.to_string());
        }
    })
    .unwrap();

    assert_eq!(report.planned, 12);
    assert_eq!(report.launched, 12);
    assert_eq!(report.succeeded, 12);
    assert!(report.failures.is_empty());
    assert_eq!(launcher.calls.len(), 12);
    assert_eq!(running[0], "./permutation_tuning_test F32 16 16 0 1");
    for call in &launcher.calls {
        let product: u64 = call[1..3].iter().map(|s| s.parse::<u64>().unwrap()).product();
        assert!(product < config.max_product);
    }

    let written = std::fs::read_to_string(config.output_dir.join("F16_32_16_1_0.txt")).unwrap();
    assert_eq!(written, "There are 0 instances.\n");
}

#[test]
fn test_failure_does_not_abort_sweep() {
    let dir = tempfile::tempdir().unwrap();
    let config = small_config(dir.path(), 2);
    let mut launcher = RecordingLauncher {
        fail_on: Some("F16".to_string()),
        ..Default::default()
    };
    let mut failed = Vec::new();

    let report = run_sweep(&config, &mut launcher, false, |event| {
        if let SweepEvent::Failed { command, message } = event {
            failed.push((command.to_string(), message.to_string()));
        }
    })
    .unwrap();

    assert_eq!(launcher.calls.len(), 12);
    assert_eq!(report.succeeded, 6);
    assert_eq!(report.failures.len(), 6);
    assert!(failed[0].0.contains(" F16 "));
    assert!(failed[0].1.contains("unsupported"));
}

#[test]
fn test_dry_run_launches_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let config = small_config(dir.path(), 3);
    let mut launcher = RecordingLauncher::default();
    let mut events = 0;

    let report = run_sweep(&config, &mut launcher, true, |_| events += 1).unwrap();

    assert!(launcher.calls.is_empty());
    assert_eq!(report.launched, 0);
    assert_eq!(events, report.planned);
    assert!(!config.output_dir.exists());
}

#[test]
fn test_report_json() {
    let report = SweepReport {
        rank: 2,
        planned: 4,
        launched: 4,
        succeeded: 3,
        dry_run: false,
        failures: vec![SweepFailure {
            command: "./t F32 16 16 0 1".to_string(),
            output: PathBuf::from("data2/F32_16_16_0_1.txt"),
            message: "boom".to_string(),
        }],
    };
    let json = report.to_json().unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["succeeded"], 3);
    assert_eq!(value["failures"][0]["message"], "boom");
}
