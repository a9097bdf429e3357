// src/system/executor.rs

use std::env;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::{Command as StdCommand, ExitStatus, Stdio};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExecutionError {
    #[error("Command could not be parsed: {0}")]
    CommandParse(String),
    #[error("No command specified to run.")]
    EmptyCommand,
    #[error("Command '{0}' could not be executed: {1}")]
    CommandFailed(String, #[source] std::io::Error),
    #[error("Command '{command}' exited with a non-zero status ({status}) in '{cwd}'.")]
    NonZeroExitStatus {
        command: String,
        cwd: String,
        status: String,
    },
    #[error("The command '{0}' does not exist on PATH.")]
    MissingDependency(String),
}

/// The boundary between command composition and the operating system.
///
/// Every external process the tool starts goes through this trait, which lets tests
/// substitute a recorder for the real [`SystemRunner`].
pub trait CommandRunner {
    /// Runs `command_line` in `cwd`, blocking until it exits. A non-zero exit is an error.
    fn run_command(&mut self, command_line: &str, cwd: &Path) -> Result<(), ExecutionError>;

    /// Fails with [`ExecutionError::MissingDependency`] when `name` is not on PATH.
    fn validate_command_exists(&self, name: &str) -> Result<(), ExecutionError>;
}

/// Runs commands as real child processes that inherit stdout and stderr.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run_command(&mut self, command_line: &str, cwd: &Path) -> Result<(), ExecutionError> {
        execute_command(command_line, cwd)
    }

    fn validate_command_exists(&self, name: &str) -> Result<(), ExecutionError> {
        log::debug!("Checking command: {}", name);
        match find_executable_in_path(name) {
            Some(path) => {
                log::trace!("Found '{}' at '{}'", name, path.display());
                Ok(())
            }
            None => Err(ExecutionError::MissingDependency(name.to_string())),
        }
    }
}

/// Checks every name in `commands`, stopping at the first one missing.
pub fn validate_commands_exist<R: CommandRunner + ?Sized>(
    runner: &R,
    commands: &[String],
) -> Result<(), ExecutionError> {
    commands
        .iter()
        .try_for_each(|command| runner.validate_command_exists(command))
}

/// Executes a command line, splitting it with POSIX shell quoting rules.
///
/// The child inherits stdout/stderr. On windows a program that cannot be found is retried
/// through `cmd /C` so shell built-ins keep working.
pub fn execute_command(command_line: &str, cwd: &Path) -> Result<(), ExecutionError> {
    let trimmed_command = command_line.trim();
    if trimmed_command.is_empty() {
        return Err(ExecutionError::EmptyCommand);
    }

    let parts = shlex::split(trimmed_command)
        .ok_or_else(|| ExecutionError::CommandParse(trimmed_command.to_string()))?;
    let Some((program, args)) = parts.split_first() else {
        return Err(ExecutionError::EmptyCommand);
    };
    let clean_cwd = dunce::simplified(cwd);

    log::debug!(
        "Run command: \"{}\" at: \"{}\"",
        trimmed_command,
        clean_cwd.display()
    );

    let status = match StdCommand::new(program)
        .args(args)
        .current_dir(clean_cwd)
        .stdin(Stdio::inherit())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .status()
    {
        Ok(status) => status,
        Err(e) if e.kind() == ErrorKind::NotFound && cfg!(target_os = "windows") => {
            log::debug!("Command '{}' not found. Retrying with cmd /C.", program);
            StdCommand::new("cmd")
                .arg("/C")
                .arg(trimmed_command)
                .current_dir(clean_cwd)
                .status()
                .map_err(|e| ExecutionError::CommandFailed(trimmed_command.to_string(), e))?
        }
        Err(e) => {
            return Err(ExecutionError::CommandFailed(
                trimmed_command.to_string(),
                e,
            ));
        }
    };

    check_status(status, trimmed_command, clean_cwd)
}

fn check_status(status: ExitStatus, command: &str, cwd: &Path) -> Result<(), ExecutionError> {
    if status.success() {
        return Ok(());
    }
    Err(ExecutionError::NonZeroExitStatus {
        command: command.to_string(),
        cwd: cwd.display().to_string(),
        status: status
            .code()
            .map_or_else(|| "terminated by signal".to_string(), |c| format!("exit code {}", c)),
    })
}

/// Searches PATH for `name`, honouring PATHEXT on windows.
pub fn find_executable_in_path(name: &str) -> Option<PathBuf> {
    let candidate = Path::new(name);
    if candidate.components().count() > 1 {
        return candidate.is_file().then(|| candidate.to_path_buf());
    }

    let path_var = env::var_os("PATH")?;
    let extensions: Vec<String> = if cfg!(target_os = "windows") {
        let pathext = env::var("PATHEXT").unwrap_or_else(|_| ".COM;.EXE;.BAT;.CMD".to_string());
        std::iter::once(String::new())
            .chain(pathext.split(';').map(str::to_string))
            .collect()
    } else {
        vec![String::new()]
    };

    env::split_paths(&path_var).find_map(|dir| {
        extensions.iter().find_map(|ext| {
            let full = dir.join(format!("{}{}", name, ext));
            full.is_file().then_some(full)
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[test]
    fn test_missing_dependency_is_reported_by_name() {
        let err = SystemRunner
            .validate_command_exists("ntt-definitely-not-a-real-command")
            .unwrap_err();
        assert!(matches!(err, ExecutionError::MissingDependency(ref n) if n == "ntt-definitely-not-a-real-command"));
        assert_eq!(
            err.to_string(),
            "The command 'ntt-definitely-not-a-real-command' does not exist on PATH."
        );
    }

    #[test]
    fn test_empty_command_is_rejected() {
        assert!(matches!(
            execute_command("   ", Path::new(".")),
            Err(ExecutionError::EmptyCommand)
        ));
    }

    #[test]
    fn test_unbalanced_quotes_fail_to_parse() {
        assert!(matches!(
            execute_command("cmake -G \"Ninja", Path::new(".")),
            Err(ExecutionError::CommandParse(_))
        ));
    }

    #[cfg(unix)]
    #[test]
    fn test_exit_status_is_propagated() {
        let cwd = std::env::temp_dir();
        assert!(execute_command("true", &cwd).is_ok());
        let err = execute_command("false", &cwd).unwrap_err();
        assert!(matches!(err, ExecutionError::NonZeroExitStatus { ref status, .. } if status == "exit code 1"));
    }

    #[cfg(unix)]
    #[test]
    fn test_quoted_arguments_reach_the_child_intact() {
        let dir = tempfile::TempDir::new().unwrap();
        execute_command("sh -c 'printf %s \"$1\" > out.txt' sh \"-DOPT=-O2 -g\"", dir.path())
            .unwrap();
        let written = std::fs::read_to_string(dir.path().join("out.txt")).unwrap();
        assert_eq!(written, "-DOPT=-O2 -g");
    }

    struct StubRunner {
        known: Vec<&'static str>,
        checked: RefCell<Vec<String>>,
    }

    impl CommandRunner for StubRunner {
        fn run_command(&mut self, _: &str, _: &Path) -> Result<(), ExecutionError> {
            Ok(())
        }

        fn validate_command_exists(&self, name: &str) -> Result<(), ExecutionError> {
            self.checked.borrow_mut().push(name.to_string());
            if self.known.contains(&name) {
                Ok(())
            } else {
                Err(ExecutionError::MissingDependency(name.to_string()))
            }
        }
    }

    #[test]
    fn test_validate_commands_stops_at_first_missing() {
        let runner = StubRunner {
            known: vec!["cmake"],
            checked: RefCell::new(Vec::new()),
        };
        let commands = vec!["cmake".to_string(), "uv".to_string(), "git".to_string()];
        let err = validate_commands_exist(&runner, &commands).unwrap_err();
        assert!(matches!(err, ExecutionError::MissingDependency(ref n) if n == "uv"));
        assert_eq!(*runner.checked.borrow(), vec!["cmake", "uv"]);
    }
}
