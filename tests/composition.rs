// Composition tests: the whole pipeline against a stand-in selection tool.
//
// The real selection script is Perl and not available in CI, so these tests
// write small /bin/sh scripts that honor the same flag contract and produce
// a result file. Everything happens inside temporary directories.

#![cfg(unix)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use cynical_prep::corpus::equivalence::{prepare_corpora, EquivalencePlan};
use cynical_prep::corpus::ratio::RatioTable;
use cynical_prep::selection::artifacts::{
    write_artifacts, AVAILABLE_VOCAB_FILE, REPRESENTATIVE_VOCAB_FILE, SEED_VOCAB_FILE,
};
use cynical_prep::{run_selection, SelectionConfig, SelectionError};

/// Selects every available line, last line first, and echoes its arguments.
const REVERSE_TOOL: &str = r#"#!/bin/sh
for arg in "$@"; do
  case "$arg" in
    --jaded=*) jaded="${arg#--jaded=}" ;;
    --available=*) avail="${arg#--available=}" ;;
  esac
done
echo "args: $*"
echo "selecting" >&2
n=$(wc -l < "$avail")
rank=1
i=$n
: > "$jaded"
while [ "$i" -ge 1 ]; do
  printf '%s\t%s\t0.5\t0.1\t0.4\t%s\troot\tWGE\tsentence\n' "$i" "$rank" "$rank" >> "$jaded"
  rank=$((rank + 1))
  i=$((i - 1))
done
"#;

const FAILING_TOOL: &str = "#!/bin/sh\necho 'boom: no perl here' >&2\nexit 3\n";

const SHORT_LINE_TOOL: &str = r#"#!/bin/sh
for arg in "$@"; do
  case "$arg" in
    --jaded=*) jaded="${arg#--jaded=}" ;;
  esac
done
printf '1\t1\t0.5\n' > "$jaded"
"#;

const SILENT_TOOL: &str = "#!/bin/sh\nexit 0\n";

/// Floods both pipes well past any OS pipe buffer before exiting.
const CHATTY_TOOL: &str = r#"#!/bin/sh
for arg in "$@"; do
  case "$arg" in
    --jaded=*) jaded="${arg#--jaded=}" ;;
  esac
done
yes stdout-noise | head -n 200000
yes stderr-noise | head -n 200000 >&2
printf '1\t1\t0.5\t0.1\t0.4\t1\troot\tWGE\n' > "$jaded"
"#;

fn install_tool(dir: &Path, name: &str, body: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, body).unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    path
}

fn config_for(tool: &Path, outdir: PathBuf) -> SelectionConfig {
    SelectionConfig {
        tool: tool.to_string_lossy().into_owned(),
        outdir,
        ..SelectionConfig::default()
    }
}

fn lines(raw: &[&str]) -> Vec<String> {
    raw.iter().map(|s| s.to_string()).collect()
}

// ============================================================
// Happy path
// ============================================================

#[test]
fn selection_maps_results_onto_original_lines() {
    let tmp = tempfile::tempdir().unwrap();
    let tool = install_tool(tmp.path(), "cynical.sh", REVERSE_TOOL);
    let outdir = tmp.path().join("work");
    let config = SelectionConfig {
        save_output: true,
        ..config_for(&tool, outdir.clone())
    };

    let repr = lines(&["The cat sat", "a dog"]);
    let avail = lines(&["The  CAT sat", "a bird\u{a0}flew", "Fill __ blank"]);
    let seed: Vec<String> = Vec::new();

    let mapping = run_selection(&repr, &avail, &seed, &config).unwrap();

    assert_eq!(mapping.len(), 3);
    // Keys are the caller's raw lines, not the normalized ones.
    assert_eq!(mapping.get("Fill __ blank").unwrap().output_rank, 1);
    assert_eq!(mapping.get("The  CAT sat").unwrap().output_rank, 3);
    assert_eq!(mapping.get("a bird\u{a0}flew").unwrap().input_line_id, 2);

    let order: Vec<&str> = mapping.iter().map(|(line, _)| line).collect();
    assert_eq!(order, vec!["Fill __ blank", "a bird\u{a0}flew", "The  CAT sat"]);

    assert_eq!(
        fs::read_to_string(outdir.join("avail.corpus")).unwrap(),
        "the cat sat\na bird flew\nfill @__@ blank\n"
    );
    let stdout = fs::read_to_string(outdir.join("cynical.stdout")).unwrap();
    assert!(stdout.contains("--mincount=3"), "stdout: {stdout}");
    assert!(stdout.contains("--keep_boring"));
    assert!(!stdout.contains("--batchmode"));
    assert_eq!(
        fs::read_to_string(outdir.join("cynical.stderr")).unwrap(),
        "selecting\n"
    );
}

#[test]
fn working_dir_removed_after_success_unless_saved() {
    let tmp = tempfile::tempdir().unwrap();
    let tool = install_tool(tmp.path(), "cynical.sh", REVERSE_TOOL);
    let outdir = tmp.path().join("scratch");
    let config = config_for(&tool, outdir.clone());

    let avail = lines(&["one line", "two line"]);
    let mapping = run_selection(&avail, &avail, &[], &config).unwrap();

    assert_eq!(mapping.len(), 2);
    assert!(!outdir.exists(), "working dir should be cleaned up");
}

#[test]
fn large_tool_output_does_not_stall() {
    let tmp = tempfile::tempdir().unwrap();
    let tool = install_tool(tmp.path(), "chatty.sh", CHATTY_TOOL);
    let outdir = tmp.path().join("work");
    let config = SelectionConfig {
        save_output: true,
        ..config_for(&tool, outdir.clone())
    };

    let avail = lines(&["only line"]);
    let mapping = run_selection(&avail, &avail, &avail, &config).unwrap();

    assert_eq!(mapping.get("only line").unwrap().output_rank, 1);
    let stdout = fs::read_to_string(outdir.join("cynical.stdout")).unwrap();
    let stderr = fs::read_to_string(outdir.join("cynical.stderr")).unwrap();
    assert_eq!(stdout.lines().count(), 200_000);
    assert_eq!(stderr.lines().count(), 200_000);
}

// ============================================================
// Failure paths keep diagnostics on disk
// ============================================================

#[test]
fn failed_tool_keeps_working_dir() {
    let tmp = tempfile::tempdir().unwrap();
    let tool = install_tool(tmp.path(), "broken.sh", FAILING_TOOL);
    let outdir = tmp.path().join("work");
    let config = config_for(&tool, outdir.clone());
    assert!(!config.save_output);

    let avail = lines(&["some text"]);
    let err = run_selection(&avail, &avail, &[], &config).unwrap_err();

    match err {
        SelectionError::ExternalToolFailure { status, stderr } => {
            assert_eq!(status.code(), Some(3));
            assert!(stderr.contains("boom"), "stderr: {stderr}");
        }
        other => panic!("expected ExternalToolFailure, got {other:?}"),
    }

    assert!(outdir.join("cynical.stderr").exists());
    assert!(fs::read_dir(&outdir).unwrap().count() > 0);
}

#[test]
fn malformed_result_is_reported_and_dir_kept() {
    let tmp = tempfile::tempdir().unwrap();
    let tool = install_tool(tmp.path(), "short.sh", SHORT_LINE_TOOL);
    let outdir = tmp.path().join("work");
    let config = config_for(&tool, outdir.clone());

    let avail = lines(&["a", "b"]);
    let err = run_selection(&avail, &avail, &[], &config).unwrap_err();

    assert!(matches!(err, SelectionError::MalformedOutput { line: 1, .. }));
    assert!(outdir.join("jaded.output").exists());
}

#[test]
fn successful_tool_without_result_file_is_malformed() {
    let tmp = tempfile::tempdir().unwrap();
    let tool = install_tool(tmp.path(), "silent.sh", SILENT_TOOL);
    let outdir = tmp.path().join("work");
    let config = config_for(&tool, outdir.clone());

    let avail = lines(&["a"]);
    let err = run_selection(&avail, &avail, &[], &config).unwrap_err();

    assert!(matches!(err, SelectionError::MalformedOutput { line: 0, .. }));
    assert!(outdir.join("avail.corpus").exists());
}

#[test]
fn missing_tool_fails_before_writing_anything() {
    let tmp = tempfile::tempdir().unwrap();
    let outdir = tmp.path().join("never-created");
    let config = config_for(&tmp.path().join("no-such-tool.pl"), outdir.clone());

    let avail = lines(&["a"]);
    let err = run_selection(&avail, &avail, &[], &config).unwrap_err();

    assert!(matches!(err, SelectionError::ToolNotFound(_)));
    assert!(!outdir.exists());
}

// ============================================================
// Equivalence reuse is invisible in the artifacts
// ============================================================

#[test]
fn equivalence_reuse_produces_identical_vocab_files() {
    let tmp = tempfile::tempdir().unwrap();
    let corpus = lines(&["The quick  fox", "the lazy dog", "___ fox"]);
    let copy = corpus.clone();

    let reused_dir = tmp.path().join("reused");
    let plan = EquivalencePlan::detect(&corpus, &copy, &copy);
    assert_ne!(plan, EquivalencePlan::all_distinct());
    let prepared = prepare_corpora(plan, &corpus, &copy, &copy, true);
    let ratios = RatioTable::compute(&prepared.representative_vocab, &prepared.available_vocab);
    write_artifacts(&reused_dir, &prepared, &ratios).unwrap();

    let fresh_dir = tmp.path().join("fresh");
    let prepared = prepare_corpora(EquivalencePlan::all_distinct(), &corpus, &copy, &copy, true);
    let ratios = RatioTable::compute(&prepared.representative_vocab, &prepared.available_vocab);
    write_artifacts(&fresh_dir, &prepared, &ratios).unwrap();

    for name in [REPRESENTATIVE_VOCAB_FILE, AVAILABLE_VOCAB_FILE, SEED_VOCAB_FILE] {
        assert_eq!(
            fs::read(reused_dir.join(name)).unwrap(),
            fs::read(fresh_dir.join(name)).unwrap(),
            "{name} differs"
        );
    }
    assert_eq!(
        fs::read(reused_dir.join(REPRESENTATIVE_VOCAB_FILE)).unwrap(),
        fs::read(reused_dir.join(AVAILABLE_VOCAB_FILE)).unwrap(),
    );
}
