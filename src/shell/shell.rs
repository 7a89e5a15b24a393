use log::{debug, error, warn};
use std::error::Error;
use std::io::{self, IsTerminal};

use crate::shell::executor::{Executor, LaunchOutcome};
use crate::shell::parser;
use crate::shell::readline::{
    BufferedSource, LineSource, LineStatus, ReadlineManager, MAX_COMMAND_SIZE,
};
use crate::shell::signals;
use crate::utils::config::Config;
use crate::utils::theme::Theme;

pub struct Shell<'a> {
    config: &'a Config,
    theme: Theme,
    executor: Executor,
}

impl<'a> Shell<'a> {
    pub fn new(config: &'a Config, theme: Theme) -> Self {
        Self {
            config,
            theme,
            executor: Executor::new(&config.name),
        }
    }

    pub fn run(&self) -> Result<(), Box<dyn Error>> {
        debug!("初始化 shell208...");

        // Ctrl-C 只打断前台子进程，不退出 shell
        signals::install_interrupt_handler()?;

        if io::stdin().is_terminal() {
            let mut readline = ReadlineManager::new(self.config)?;
            readline.load_history();
            let prompt = (self.theme.prompt_style)(&self.config.prompt);

            let result = self.run_loop(&mut readline, &prompt);
            readline.save_history();
            result?;
        } else {
            debug!("标准输入不是终端，逐行读取");
            let mut source = BufferedSource::new(io::stdin().lock(), io::stdout());
            self.run_loop(&mut source, &self.config.prompt)?;
        }

        debug!("退出 shell208...");
        Ok(())
    }

    fn run_loop<S: LineSource>(&self, source: &mut S, prompt: &str) -> io::Result<()> {
        loop {
            match source.next_line(prompt) {
                Ok(LineStatus::Line(line)) => {
                    if self.handle_input(line.as_str()) == LaunchOutcome::Exit {
                        debug!("exit 命令，退出 shell208...");
                        break;
                    }
                }
                Ok(LineStatus::TooLong) => {
                    warn!("输入超过 {} 字节，已丢弃", MAX_COMMAND_SIZE);
                    eprintln!(
                        "{}",
                        (self.theme.warning_style)(&format!(
                            "Commands are limited to length {}. Please try again.",
                            MAX_COMMAND_SIZE
                        ))
                    );
                }
                Ok(LineStatus::InvalidEncoding) => {
                    warn!("输入不是合法的 UTF-8，已丢弃");
                    self.report(&io::Error::new(
                        io::ErrorKind::InvalidData,
                        "input is not valid UTF-8",
                    ));
                }
                Ok(LineStatus::Interrupted) => {
                    debug!("接收到中断信号...");
                }
                Ok(LineStatus::EndOfInput) => {
                    debug!("接收到 EOF，退出 shell208...");
                    break;
                }
                Err(err) => {
                    error!("读取命令失败: {}", err);
                    eprintln!(
                        "{}",
                        (self.theme.error_style)(
                            "There was a problem reading your command. Please try again."
                        )
                    );
                    return Err(err);
                }
            }
        }
        Ok(())
    }

    fn handle_input(&self, line: &str) -> LaunchOutcome {
        if line.trim().is_empty() {
            return LaunchOutcome::Continue;
        }

        // 使用 parser 解析命令
        let command = match parser::parse(line) {
            Ok(command) => command,
            Err(e) => {
                debug!("解析失败: {:?} {}", line, e);
                self.report(&e);
                return LaunchOutcome::Continue;
            }
        };

        match self.executor.execute(command) {
            Ok(outcome) => outcome,
            Err(e) => {
                error!("执行失败: {:?} {}", line, e);
                self.report(&e);
                LaunchOutcome::Continue
            }
        }
    }

    fn report(&self, err: &dyn Error) {
        eprintln!(
            "{}",
            (self.theme.error_style)(&format!("{}: {}", self.config.name, err))
        );
    }
}
