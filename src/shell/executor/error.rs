use std::error::Error;
use std::fmt;
use std::io;

use nix::errno::Errno;

/// fork 之后子进程里的失败，只影响出错的那个进程
#[derive(Debug)]
pub enum ProcessError {
    Pipe(Errno),
    Fork(Errno),
    Redirect { stream: &'static str, source: Errno },
    Open { path: String, source: io::Error },
    Exec { program: String, source: Errno },
}

impl ProcessError {
    /// exec 失败沿用 127，其余都是 1
    pub fn exit_code(&self) -> i32 {
        match self {
            ProcessError::Exec { .. } => 127,
            _ => 1,
        }
    }
}

impl fmt::Display for ProcessError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProcessError::Pipe(e) => write!(f, "trouble creating pipe: {}", e.desc()),
            ProcessError::Fork(e) => write!(f, "trouble forking: {}", e.desc()),
            ProcessError::Redirect { stream, source } => {
                write!(f, "trouble redirecting {}: {}", stream, source.desc())
            }
            ProcessError::Open { path, source } => write!(f, "{}: {}", path, source),
            ProcessError::Exec { program, source } => write!(f, "{}: {}", program, source.desc()),
        }
    }
}

impl Error for ProcessError {}

/// 父进程这边的失败，报告后继续下一条命令
#[derive(Debug)]
pub enum LaunchError {
    InvalidArgument(String),
    Fork(Errno),
    Wait(Errno),
    Io(io::Error),
}

impl fmt::Display for LaunchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LaunchError::InvalidArgument(arg) => {
                write!(f, "argument contains a NUL byte: {:?}", arg)
            }
            LaunchError::Fork(e) => write!(f, "trouble forking: {}", e.desc()),
            LaunchError::Wait(e) => write!(f, "trouble waiting for child: {}", e.desc()),
            LaunchError::Io(e) => write!(f, "{}", e),
        }
    }
}

impl Error for LaunchError {}

impl From<io::Error> for LaunchError {
    fn from(err: io::Error) -> Self {
        LaunchError::Io(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        let exec = ProcessError::Exec {
            program: "nope".to_string(),
            source: Errno::ENOENT,
        };
        assert_eq!(exec.exit_code(), 127);
        assert_eq!(ProcessError::Pipe(Errno::EMFILE).exit_code(), 1);
        assert_eq!(ProcessError::Fork(Errno::EAGAIN).exit_code(), 1);
    }

    #[test]
    fn test_messages_name_the_cause() {
        let exec = ProcessError::Exec {
            program: "nope".to_string(),
            source: Errno::ENOENT,
        };
        assert_eq!(exec.to_string(), "nope: No such file or directory");

        let dup = ProcessError::Redirect {
            stream: "stdout",
            source: Errno::EBADF,
        };
        assert!(dup.to_string().starts_with("trouble redirecting stdout: "));

        let open = ProcessError::Open {
            path: "missing.txt".to_string(),
            source: io::Error::from(io::ErrorKind::NotFound),
        };
        assert!(open.to_string().starts_with("missing.txt: "));
    }
}
