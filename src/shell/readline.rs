use std::fs;
use std::io::{self, BufRead, ErrorKind, Read, Write};

use crate::utils::config::Config;
use log::{debug, error, warn};
pub use rustyline::error::ReadlineError;
use rustyline::history::FileHistory;
use rustyline::Editor;
use rustyline::{CompletionType, Config as RLConfig};

/// 一行命令的最大字节数，不含换行符
pub const MAX_COMMAND_SIZE: usize = 100;

/// 去掉换行并通过长度检查的一行输入
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawLine(String);

impl RawLine {
    /// 超过 `MAX_COMMAND_SIZE` 时返回 `None`
    pub fn new(mut line: String) -> Option<Self> {
        if line.ends_with('\n') {
            line.pop();
            if line.ends_with('\r') {
                line.pop();
            }
        }
        if line.len() > MAX_COMMAND_SIZE {
            None
        } else {
            Some(Self(line))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineStatus {
    Line(RawLine),
    TooLong,
    /// 不是合法的 UTF-8，整行丢弃
    InvalidEncoding,
    /// 读取被 Ctrl-C 打断，重新提示即可
    Interrupted,
    EndOfInput,
}

impl From<Option<RawLine>> for LineStatus {
    fn from(line: Option<RawLine>) -> Self {
        match line {
            Some(line) => LineStatus::Line(line),
            None => LineStatus::TooLong,
        }
    }
}

pub trait LineSource {
    /// 显示提示符并读取下一行；`Err` 表示终端读取失败
    fn next_line(&mut self, prompt: &str) -> io::Result<LineStatus>;
}

/// 交互终端使用 rustyline，带历史记录
pub struct ReadlineManager<'a> {
    config: &'a Config,
    editor: Editor<(), FileHistory>,
}

impl<'a> ReadlineManager<'a> {
    pub fn new(config: &'a Config) -> Result<Self, ReadlineError> {
        let rl_config = RLConfig::builder()
            .history_ignore_space(true)
            .auto_add_history(false)
            .completion_type(CompletionType::List)
            .edit_mode(config.get_edit_mode())
            .build();

        let editor = Editor::with_config(rl_config)?;
        Ok(Self { config, editor })
    }

    pub fn load_history(&mut self) {
        // 确保历史文件目录存在
        if let Some(parent) = self.config.history_file.parent() {
            if let Err(err) = fs::create_dir_all(parent) {
                warn!("无法创建历史记录目录: {} {}", parent.display(), err);
            }
        }

        if let Err(err) = self.editor.load_history(&self.config.history_file) {
            warn!(
                "无法加载历史记录: {} {}",
                self.config.history_file.display(),
                err
            );
        } else {
            debug!("历史记录加载成功");
        }
    }

    pub fn save_history(&mut self) {
        if let Err(err) = self.editor.save_history(&self.config.history_file) {
            error!("保存历史记录失败: {}", err);
        } else {
            debug!("历史记录保存成功");
        }
    }
}

impl LineSource for ReadlineManager<'_> {
    fn next_line(&mut self, prompt: &str) -> io::Result<LineStatus> {
        match self.editor.readline(prompt) {
            Ok(line) => {
                if !line.trim().is_empty() {
                    if let Err(err) = self.editor.add_history_entry(line.as_str()) {
                        warn!("添加历史记录失败: {}", err);
                    }
                }
                Ok(RawLine::new(line).into())
            }
            Err(ReadlineError::Interrupted) => Ok(LineStatus::Interrupted),
            Err(ReadlineError::Eof) => Ok(LineStatus::EndOfInput),
            Err(ReadlineError::Io(err)) => Err(err),
            Err(err) => Err(io::Error::new(ErrorKind::Other, err.to_string())),
        }
    }
}

/// 非终端输入（管道、文件）逐行读取，超长行的剩余部分直接丢弃
pub struct BufferedSource<R, W> {
    reader: R,
    prompt_out: W,
}

impl<R: BufRead, W: Write> BufferedSource<R, W> {
    pub fn new(reader: R, prompt_out: W) -> Self {
        Self { reader, prompt_out }
    }

    /// 丢掉当前行剩下的内容，包括换行符
    fn discard_line(&mut self) -> io::Result<()> {
        loop {
            let available = match self.reader.fill_buf() {
                Ok(available) => available,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(err),
            };
            if available.is_empty() {
                return Ok(());
            }
            match available.iter().position(|&b| b == b'\n') {
                Some(index) => {
                    self.reader.consume(index + 1);
                    return Ok(());
                }
                None => {
                    let len = available.len();
                    self.reader.consume(len);
                }
            }
        }
    }
}

impl<R: BufRead, W: Write> LineSource for BufferedSource<R, W> {
    fn next_line(&mut self, prompt: &str) -> io::Result<LineStatus> {
        write!(self.prompt_out, "{}", prompt)?;
        self.prompt_out.flush()?;

        // 留出 "\r\n" 的位置
        let limit = MAX_COMMAND_SIZE + 2;
        let mut buf = Vec::with_capacity(limit);
        let read = (&mut self.reader)
            .take(limit as u64)
            .read_until(b'\n', &mut buf)?;

        if read == 0 {
            return Ok(LineStatus::EndOfInput);
        }

        if !buf.ends_with(b"\n") && read == limit {
            self.discard_line()?;
            return Ok(LineStatus::TooLong);
        }

        match String::from_utf8(buf) {
            Ok(line) => Ok(RawLine::new(line).into()),
            Err(err) => {
                debug!("输入不是合法的 UTF-8: {}", err);
                Ok(LineStatus::InvalidEncoding)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn line(text: &str) -> LineStatus {
        LineStatus::Line(RawLine(text.to_string()))
    }

    #[test]
    fn test_raw_line_strips_newline() {
        assert_eq!(RawLine::new("ls -l\n".to_string()), Some(RawLine("ls -l".to_string())));
        assert_eq!(RawLine::new("ls\r\n".to_string()), Some(RawLine("ls".to_string())));
        assert_eq!(RawLine::new("ls".to_string()), Some(RawLine("ls".to_string())));
        assert_eq!(RawLine::new("\n".to_string()), Some(RawLine(String::new())));
    }

    #[test]
    fn test_raw_line_length_bound() {
        let exact = "a".repeat(MAX_COMMAND_SIZE);
        assert!(RawLine::new(format!("{}\n", exact)).is_some());
        assert!(RawLine::new(format!("{}b\n", exact)).is_none());
    }

    #[allow(clippy::unwrap_used)]
    #[test]
    fn test_buffered_source_reads_lines_and_prompts() {
        let input = Cursor::new("ls -l\necho hi | cat\n");
        let mut prompts = Vec::new();
        let mut source = BufferedSource::new(input, &mut prompts);

        assert_eq!(source.next_line("p> ").unwrap(), line("ls -l"));
        assert_eq!(source.next_line("p> ").unwrap(), line("echo hi | cat"));
        assert_eq!(source.next_line("p> ").unwrap(), LineStatus::EndOfInput);
        drop(source);
        assert_eq!(String::from_utf8_lossy(&prompts), "p> p> p> ");
    }

    #[allow(clippy::unwrap_used)]
    #[test]
    fn test_too_long_line_does_not_bleed_into_next() {
        let input = format!("{}\necho next\n", "x".repeat(150));
        let mut source = BufferedSource::new(Cursor::new(input), io::sink());

        assert_eq!(source.next_line("").unwrap(), LineStatus::TooLong);
        assert_eq!(source.next_line("").unwrap(), line("echo next"));
        assert_eq!(source.next_line("").unwrap(), LineStatus::EndOfInput);
    }

    #[allow(clippy::unwrap_used)]
    #[test]
    fn test_boundary_lengths() {
        let exact = "a".repeat(MAX_COMMAND_SIZE);
        let over = "b".repeat(MAX_COMMAND_SIZE + 1);
        let input = format!("{}\n{}\n{}\r\nok\n", exact, over, exact);
        let mut source = BufferedSource::new(Cursor::new(input), io::sink());

        assert_eq!(source.next_line("").unwrap(), line(&exact));
        assert_eq!(source.next_line("").unwrap(), LineStatus::TooLong);
        assert_eq!(source.next_line("").unwrap(), line(&exact));
        assert_eq!(source.next_line("").unwrap(), line("ok"));
    }

    #[allow(clippy::unwrap_used)]
    #[test]
    fn test_last_line_without_newline() {
        let mut source = BufferedSource::new(Cursor::new("exit"), io::sink());
        assert_eq!(source.next_line("").unwrap(), line("exit"));
        assert_eq!(source.next_line("").unwrap(), LineStatus::EndOfInput);
    }

    #[allow(clippy::unwrap_used)]
    #[test]
    fn test_too_long_line_at_end_of_input() {
        let input = "y".repeat(300);
        let mut source = BufferedSource::new(Cursor::new(input), io::sink());
        assert_eq!(source.next_line("").unwrap(), LineStatus::TooLong);
        assert_eq!(source.next_line("").unwrap(), LineStatus::EndOfInput);
    }

    #[allow(clippy::unwrap_used)]
    #[test]
    fn test_invalid_utf8_line_is_rejected_whole() {
        let input: &[u8] = b"ls \xff\xfe\nok\n\xc3\n";
        let mut source = BufferedSource::new(input, io::sink());

        assert_eq!(source.next_line("").unwrap(), LineStatus::InvalidEncoding);
        assert_eq!(source.next_line("").unwrap(), line("ok"));
        assert_eq!(source.next_line("").unwrap(), LineStatus::InvalidEncoding);
        assert_eq!(source.next_line("").unwrap(), LineStatus::EndOfInput);
    }
}
