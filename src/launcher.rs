//! Launching projects on the right host.
//!
//! A project whose path lives under the Windows drive mount is launched
//! through the Windows shell with a translated path; everything else runs in
//! the native shell, detached into its own process group so quitting the
//! dashboard never takes the child with it. Spawns are fire-and-forget: the
//! child is never waited on and no handle outlives the spawn call.

use std::process::{Command, Stdio};

use crate::project::Project;

/// POSIX mount point of the Windows host's primary drive.
const WINDOWS_MOUNT: &str = "/mnt/c";

/// Which host executes a launch, decided once per launch from the path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostTarget {
    Native,
    Windows,
}

impl HostTarget {
    pub fn classify(path: &str) -> Self {
        match path.strip_prefix(WINDOWS_MOUNT) {
            Some(rest) if rest.starts_with('/') => Self::Windows,
            _ => Self::Native,
        }
    }
}

/// How the command reaches the host shell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaunchMethod {
    /// `bash -c` in the project directory.
    NativeShell,
    /// `powershell.exe -Command` running the command inline.
    WindowsShell,
    /// `powershell.exe -Command` with Start-Process, for executables that
    /// must outlive the shell.
    WindowsStartProcess,
}

/// A fully resolved spawn, built without side effects so that path
/// translation and quoting stay testable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchPlan {
    pub program: &'static str,
    pub args: Vec<String>,
    pub cwd: Option<String>,
    pub method: LaunchMethod,
    pub new_process_group: bool,
}

/// What a launch attempt produced, for the status line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub message: String,
    pub ok: bool,
}

/// Rewrites a mount path into Windows drive-letter syntax:
/// `/mnt/c/Users/x` becomes `C:\Users\x`.
pub fn windows_path(path: &str) -> String {
    path.replacen(WINDOWS_MOUNT, "C:", 1).replace('/', "\\")
}

/// Builds the spawn plan for a project without spawning anything.
pub fn plan_launch(project: &Project) -> LaunchPlan {
    match HostTarget::classify(&project.path) {
        HostTarget::Windows => {
            let dir = windows_path(&project.path);
            if project.command.ends_with(".exe") {
                LaunchPlan {
                    program: "powershell.exe",
                    args: vec![
                        "-Command".to_string(),
                        format!("Set-Location '{}'; Start-Process '{}'", dir, project.command),
                    ],
                    cwd: None,
                    method: LaunchMethod::WindowsStartProcess,
                    new_process_group: false,
                }
            } else {
                LaunchPlan {
                    program: "powershell.exe",
                    args: vec![
                        "-Command".to_string(),
                        format!("Set-Location '{}'; {}", dir, project.command),
                    ],
                    cwd: None,
                    method: LaunchMethod::WindowsShell,
                    new_process_group: false,
                }
            }
        }
        HostTarget::Native => LaunchPlan {
            program: "bash",
            args: vec![
                "-c".to_string(),
                format!("cd '{}' && {}", project.path, project.command),
            ],
            cwd: Some(project.path.clone()),
            method: LaunchMethod::NativeShell,
            new_process_group: true,
        },
    }
}

/// Launches the project's command, detached, and reports how it went.
pub fn launch(project: &Project) -> Outcome {
    let plan = plan_launch(project);
    match spawn(&plan) {
        Ok(()) => {
            let message = match plan.method {
                LaunchMethod::NativeShell => format!("Launched {}", project.name),
                LaunchMethod::WindowsShell => {
                    format!("Launched {} (Windows via PowerShell)", project.name)
                }
                LaunchMethod::WindowsStartProcess => format!(
                    "Launched {} (Windows via PowerShell Start-Process)",
                    project.name
                ),
            };
            Outcome { message, ok: true }
        }
        Err(err) => Outcome {
            message: format!("Failed to launch {}: {}", project.name, err),
            ok: false,
        },
    }
}

/// Opens the project's link in the Windows default browser, or reports that
/// there is nothing to open.
pub fn open_link(project: &Project) -> Outcome {
    if project.link.is_empty() {
        return Outcome {
            message: "No link associated".to_string(),
            ok: true,
        };
    }
    let plan = LaunchPlan {
        program: "cmd.exe",
        args: vec!["/c".to_string(), "start".to_string(), project.link.clone()],
        cwd: None,
        method: LaunchMethod::WindowsShell,
        new_process_group: false,
    };
    match spawn(&plan) {
        Ok(()) => Outcome {
            message: format!("Opened {} link in browser", project.name),
            ok: true,
        },
        Err(err) => Outcome {
            message: format!("Failed to open link: {}", err),
            ok: false,
        },
    }
}

// Performs the single spawn side effect. The child handle is dropped
// immediately: this launcher's contract ends at process creation.
fn spawn(plan: &LaunchPlan) -> std::io::Result<()> {
    let mut command = Command::new(plan.program);
    command.args(&plan.args);
    if let Some(cwd) = &plan.cwd {
        command.current_dir(cwd);
    }
    // The child must not inherit the dashboard's terminal streams.
    command
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null());

    #[cfg(unix)]
    if plan.new_process_group {
        use std::os::unix::process::CommandExt;
        unsafe {
            command.pre_exec(|| {
                // Become a process-group leader so signals aimed at the
                // dashboard's group never reach the launched program.
                let _ = libc::setpgid(0, 0);
                Ok(())
            });
        }
    }

    command.spawn().map(drop)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn project(path: &str, command: &str) -> Project {
        Project {
            name: "demo".to_string(),
            path: path.to_string(),
            command: command.to_string(),
            link: String::new(),
            category: String::new(),
        }
    }

    #[test]
    fn classify_splits_on_the_drive_mount() {
        assert_eq!(
            HostTarget::classify("/mnt/c/Users/x/app"),
            HostTarget::Windows
        );
        assert_eq!(HostTarget::classify("/home/x/api"), HostTarget::Native);
        assert_eq!(HostTarget::classify("/mnt/cdrom/x"), HostTarget::Native);
    }

    #[test]
    fn windows_path_translates_prefix_and_separators() {
        assert_eq!(windows_path("/mnt/c/Users/x/app"), "C:\\Users\\x\\app");
    }

    #[test]
    fn executable_on_windows_path_uses_start_process() {
        let plan = plan_launch(&project("/mnt/c/Users/x/app", "app.exe"));
        assert_eq!(plan.method, LaunchMethod::WindowsStartProcess);
        assert_eq!(plan.program, "powershell.exe");
        assert_eq!(
            plan.args,
            vec![
                "-Command".to_string(),
                "Set-Location 'C:\\Users\\x\\app'; Start-Process 'app.exe'".to_string(),
            ]
        );
        assert!(plan.cwd.is_none());
        assert!(!plan.new_process_group);
    }

    #[test]
    fn script_on_windows_path_runs_inline() {
        let plan = plan_launch(&project("/mnt/c/Users/x/tool", "python main.py"));
        assert_eq!(plan.method, LaunchMethod::WindowsShell);
        assert_eq!(
            plan.args[1],
            "Set-Location 'C:\\Users\\x\\tool'; python main.py"
        );
    }

    #[test]
    fn native_path_builds_detached_shell_command() {
        let plan = plan_launch(&project("/home/x/api", "python main.py"));
        assert_eq!(plan.method, LaunchMethod::NativeShell);
        assert_eq!(plan.program, "bash");
        assert_eq!(
            plan.args,
            vec![
                "-c".to_string(),
                "cd '/home/x/api' && python main.py".to_string(),
            ]
        );
        assert_eq!(plan.cwd.as_deref(), Some("/home/x/api"));
        assert!(plan.new_process_group);
    }

    #[test]
    fn empty_link_reports_without_spawning() {
        let outcome = open_link(&project("/home/x/api", "make"));
        assert!(outcome.ok);
        assert_eq!(outcome.message, "No link associated");
    }

    #[test]
    fn failed_spawn_is_reported_not_fatal() {
        let plan = LaunchPlan {
            program: "launchpad-test-binary-that-does-not-exist",
            args: Vec::new(),
            cwd: None,
            method: LaunchMethod::NativeShell,
            new_process_group: false,
        };
        assert!(spawn(&plan).is_err());
    }
}
