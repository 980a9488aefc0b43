// tests/cli_tests.rs
//
// Runs the l1probe binary itself. Sweeps are kept deterministic by shrinking
// the configuration through L1PROBE_* variables.

use std::process::{Command, Output};

#[cfg(test)]
mod cli_tests {
    use super::*;

    fn run_l1probe(vars: &[(&str, &str)]) -> Output {
        // empty working directory so no l1probe.toml is picked up
        let dir = tempfile::tempdir().unwrap();
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_l1probe"));
        cmd.current_dir(dir.path()).env("L1PROBE_LOG", "info");
        for (key, value) in vars {
            cmd.env(key, value);
        }
        cmd.output().expect("failed to start l1probe")
    }

    #[test]
    fn test_associativity_not_found_exits_nonzero_without_summary() {
        // a single way-size row can never confirm a cliff
        let output = run_l1probe(&[
            ("L1PROBE_ASSOCIATIVITY__MAX_WAY_SIZE_LOG", "3"),
            ("L1PROBE_PROBE__ITERATIONS", "1000"),
            ("L1PROBE_PROBE__ARENA_SLOTS", "4096"),
        ]);

        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);

        assert!(!output.status.success(), "expected failure, stdout:\n{}", stdout);
        assert_eq!(output.status.code(), Some(1));
        assert!(stdout.contains("CURRENT ASSOC = 98; CURRENT WAY SIZE = 8;"));
        assert!(!stdout.contains("===="));
        assert!(!stdout.contains("LEVEL1_DCACHE"));
        assert!(stderr.contains("assoc not found"), "stderr was:\n{}", stderr);
    }

    #[test]
    fn test_invalid_config_exits_nonzero_before_probing() {
        let output = run_l1probe(&[("L1PROBE_PROBE__ITERATIONS", "0")]);

        let stderr = String::from_utf8_lossy(&output.stderr);
        assert_eq!(output.status.code(), Some(1));
        assert!(output.stdout.is_empty());
        assert!(stderr.contains("iteration counts must be positive"), "stderr was:\n{}", stderr);
    }
}
