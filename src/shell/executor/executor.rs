use std::convert::Infallible;
use std::ffi::CString;
use std::io::{self, Write};

use log::{debug, warn};
use nix::errno::Errno;
use nix::sys::wait::{waitpid, WaitStatus};
use nix::unistd::{execvp, fork, pipe, ForkResult, Pid};

use crate::shell::parser::{CommandLine, CommandSegment, ParsedCommand, RedirectionSpec};

use super::builtins::{self, Builtin};
use super::error::{LaunchError, ProcessError};
use super::redirect::{self, Stream};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaunchOutcome {
    Continue,
    Exit,
}

/// fork 之前准备好的 argv，子进程里不再做转换
#[derive(Debug)]
struct Program {
    builtin: Option<Builtin>,
    argv: Vec<CString>,
}

impl TryFrom<&CommandSegment> for Program {
    type Error = LaunchError;

    fn try_from(segment: &CommandSegment) -> Result<Self, Self::Error> {
        let argv = segment
            .argv
            .iter()
            .map(|arg| {
                CString::new(arg.as_str()).map_err(|_| LaunchError::InvalidArgument(arg.clone()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Program {
            builtin: Builtin::lookup(segment.program()),
            argv,
        })
    }
}

impl Program {
    fn name(&self) -> String {
        self.argv
            .first()
            .map(|arg| arg.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

enum Plan {
    Single(Program),
    Piped(Program, Program),
}

pub struct Executor {
    name: String,
}

impl Executor {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
        }
    }

    /// 执行一整行命令并等待直接子进程结束。命令在这里被消费，返回时已释放。
    pub fn execute(&self, line: CommandLine) -> Result<LaunchOutcome, LaunchError> {
        let CommandLine {
            command,
            redirections,
        } = line;
        debug!("执行命令: {:?} {:?}", command, redirections);

        // 不带重定向的 help 直接在 shell 里处理，不创建进程
        if let ParsedCommand::Single(segment) = &command {
            if Builtin::lookup(segment.program()) == Some(Builtin::Help) && redirections.is_empty()
            {
                builtins::display_help(&mut io::stdout().lock())?;
                return Ok(LaunchOutcome::Continue);
            }
        }

        let outcome = match Builtin::lookup(command.first().program()) {
            Some(Builtin::Exit) => LaunchOutcome::Exit,
            _ => LaunchOutcome::Continue,
        };

        let plan = match &command {
            ParsedCommand::Single(segment) => Plan::Single(Program::try_from(segment)?),
            ParsedCommand::Piped(first, second) => {
                Plan::Piped(Program::try_from(first)?, Program::try_from(second)?)
            }
        };

        // 缓冲区里没写出去的内容会被子进程复制一份
        io::stdout().flush()?;
        io::stderr().flush()?;

        match unsafe { fork() }.map_err(LaunchError::Fork)? {
            ForkResult::Child => self.run_child(plan, &redirections),
            ForkResult::Parent { child } => {
                let status = wait_for(child)?;
                debug!("子进程 {} 结束: {:?}", child, status);
                Ok(outcome)
            }
        }
    }

    fn run_child(&self, plan: Plan, redirections: &RedirectionSpec) -> ! {
        let result = match plan {
            Plan::Single(program) => run_single(program, redirections),
            Plan::Piped(first, second) => run_piped(first, second, redirections),
        };
        match result {
            Ok(never) => match never {},
            Err(err) => {
                eprintln!("{}: {}", self.name, err);
                terminate(err.exit_code())
            }
        }
    }
}

fn wait_for(child: Pid) -> Result<WaitStatus, LaunchError> {
    loop {
        match waitpid(child, None) {
            Err(Errno::EINTR) => continue,
            Ok(status @ WaitStatus::Exited(_, 0)) => return Ok(status),
            Ok(status) => {
                warn!("子进程 {} 异常结束: {:?}", child, status);
                return Ok(status);
            }
            Err(err) => return Err(LaunchError::Wait(err)),
        }
    }
}

fn run_single(program: Program, redirections: &RedirectionSpec) -> Result<Infallible, ProcessError> {
    if let Some(path) = &redirections.output {
        redirect::stdout_to(path)?;
    }
    if let Some(path) = &redirections.input {
        redirect::stdin_from(path)?;
    }
    exec(program)
}

/// 直接子进程负责读端（第二段），再 fork 出的孙进程负责写端（第一段），
/// 这样 shell 等到直接子进程结束时管道输出也已经结束。
fn run_piped(
    first: Program,
    second: Program,
    redirections: &RedirectionSpec,
) -> Result<Infallible, ProcessError> {
    let (read_end, write_end) = pipe().map_err(ProcessError::Pipe)?;

    match unsafe { fork() }.map_err(ProcessError::Fork)? {
        ForkResult::Child => {
            drop(read_end);
            if let Some(path) = &redirections.input {
                redirect::stdin_from(path)?;
            }
            redirect::replace(Stream::Stdout, &write_end)?;
            drop(write_end);
            exec(first)
        }
        ForkResult::Parent { .. } => {
            // 写端必须关掉，否则读端永远等不到 EOF
            drop(write_end);
            redirect::replace(Stream::Stdin, &read_end)?;
            drop(read_end);
            if let Some(path) = &redirections.output {
                redirect::stdout_to(path)?;
            }
            exec(second)
        }
    }
}

fn exec(program: Program) -> Result<Infallible, ProcessError> {
    match program.builtin {
        Some(Builtin::Help) => {
            let code = match builtins::display_help(&mut io::stdout().lock()) {
                Ok(()) => 0,
                Err(_) => 1,
            };
            terminate(code)
        }
        Some(Builtin::Exit) => terminate(0),
        None => {
            let Some(path) = program.argv.first() else {
                return Err(ProcessError::Exec {
                    program: program.name(),
                    source: Errno::ENOENT,
                });
            };
            execvp(path, &program.argv).map_err(|source| ProcessError::Exec {
                program: program.name(),
                source,
            })
        }
    }
}

/// 子进程退出：先刷新缓冲，再跳过父进程注册的 atexit 处理
fn terminate(code: i32) -> ! {
    let _ = io::stdout().flush();
    let _ = io::stderr().flush();
    unsafe { libc::_exit(code) }
}
