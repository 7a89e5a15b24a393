use std::fs::{File, OpenOptions};
use std::os::fd::{AsRawFd, RawFd};
use std::os::unix::fs::OpenOptionsExt;

use nix::unistd::dup2;

use super::error::ProcessError;

#[derive(Debug, Clone, Copy)]
pub enum Stream {
    Stdin,
    Stdout,
}

impl Stream {
    fn fd(self) -> RawFd {
        match self {
            Stream::Stdin => libc::STDIN_FILENO,
            Stream::Stdout => libc::STDOUT_FILENO,
        }
    }

    fn name(self) -> &'static str {
        match self {
            Stream::Stdin => "stdin",
            Stream::Stdout => "stdout",
        }
    }
}

/// 把 `fd` 复制到标准输入/输出上；原来的 fd 由调用方关闭
pub fn replace<F: AsRawFd>(stream: Stream, fd: &F) -> Result<(), ProcessError> {
    dup2(fd.as_raw_fd(), stream.fd())
        .map(drop)
        .map_err(|source| ProcessError::Redirect {
            stream: stream.name(),
            source,
        })
}

pub fn stdout_to(path: &str) -> Result<(), ProcessError> {
    let file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(0o644)
        .open(path)
        .map_err(|source| ProcessError::Open {
            path: path.to_string(),
            source,
        })?;
    replace(Stream::Stdout, &file)
}

pub fn stdin_from(path: &str) -> Result<(), ProcessError> {
    let file = File::open(path).map_err(|source| ProcessError::Open {
        path: path.to_string(),
        source,
    })?;
    replace(Stream::Stdin, &file)
}
