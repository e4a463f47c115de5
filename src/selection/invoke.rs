// Running the external selection tool.
//
// The flag contract belongs to the tool and must not change. Both output
// streams are drained into their capture files while the process runs, so
// a chatty tool can never block on a full pipe.

use std::env;
use std::fs::{self, File};
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::thread::{self, JoinHandle};

use tracing::{debug, info};

use super::artifacts::ArtifactPaths;
use crate::config::SelectionConfig;
use crate::error::{Result, SelectionError};

/// Resolve the tool the way a shell would.
///
/// A value containing a path separator is checked as-is; a bare name is
/// searched for on PATH. The match must be an executable regular file.
pub fn resolve_tool(tool: &str) -> Result<PathBuf> {
    let candidate = Path::new(tool);
    if candidate.components().count() > 1 {
        return if is_executable(candidate) {
            Ok(candidate.to_path_buf())
        } else {
            Err(SelectionError::ToolNotFound(tool.to_string()))
        };
    }

    env::var_os("PATH")
        .iter()
        .flat_map(env::split_paths)
        .map(|dir| dir.join(tool))
        .find(|path| is_executable(path))
        .ok_or_else(|| SelectionError::ToolNotFound(tool.to_string()))
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    fs::metadata(path).is_ok_and(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    fs::metadata(path).is_ok_and(|m| m.is_file())
}

/// Flags passed after the executable path.
///
/// Count limits are only passed when positive, switches only when on.
pub fn build_args(config: &SelectionConfig, paths: &ArtifactPaths) -> Vec<String> {
    let mut args = vec![
        format!("--task_vocab={}", paths.representative_vocab.display()),
        format!("--unadapt_vocab={}", paths.available_vocab.display()),
        format!("--available={}", paths.available_corpus.display()),
        format!("--seed_vocab={}", paths.seed_vocab.display()),
        format!("--working_dir={}", paths.working_dir.display()),
        format!("--stats={}", paths.ratios.display()),
        format!("--jaded={}", paths.jaded.display()),
        format!("--mincount={}", config.min_count),
    ];

    if config.num_lines > 0 {
        args.push(format!("--numlines={}", config.num_lines));
    }
    if config.max_count > 0 {
        args.push(format!("--maxcount={}", config.max_count));
    }
    if config.batch_mode {
        args.push("--batchmode".to_string());
    }
    if config.keep_boring {
        args.push("--keep_boring".to_string());
    }
    if config.save_memory {
        args.push("--save_memory".to_string());
    }

    args
}

/// Run the tool to completion, capturing stdout and stderr into the
/// working directory. A nonzero exit is `ExternalToolFailure`.
///
/// There is no timeout; callers needing one must watch the process
/// themselves.
pub fn run_tool(tool: &Path, args: &[String], paths: &ArtifactPaths) -> Result<()> {
    info!(tool = %tool.display(), "Running selection tool");
    debug!(args = %args.join(" "), "Selection tool arguments");

    let mut child = Command::new(tool)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| match e.kind() {
            io::ErrorKind::NotFound | io::ErrorKind::PermissionDenied => {
                SelectionError::ToolNotFound(format!("{}: {e}", tool.display()))
            }
            _ => SelectionError::Io(e),
        })?;

    let stdout = child
        .stdout
        .take()
        .map(|pipe| drain_to_file(pipe, paths.stdout.clone()));
    let stderr = child
        .stderr
        .take()
        .map(|pipe| drain_to_file(pipe, paths.stderr.clone()));

    let status = child.wait()?;
    for drain in [stdout, stderr].into_iter().flatten() {
        join_drain(drain)?;
    }

    if status.success() {
        info!(%status, "Selection tool finished");
        Ok(())
    } else {
        let stderr = fs::read(&paths.stderr)
            .map(|bytes| String::from_utf8_lossy(&bytes).into_owned())
            .unwrap_or_default();
        Err(SelectionError::ExternalToolFailure { status, stderr })
    }
}

fn drain_to_file<R>(mut pipe: R, dest: PathBuf) -> JoinHandle<io::Result<u64>>
where
    R: Read + Send + 'static,
{
    thread::spawn(move || {
        let mut file = File::create(&dest)?;
        io::copy(&mut pipe, &mut file)
    })
}

fn join_drain(handle: JoinHandle<io::Result<u64>>) -> io::Result<u64> {
    handle
        .join()
        .map_err(|_| io::Error::other("output drain thread panicked"))?
}
