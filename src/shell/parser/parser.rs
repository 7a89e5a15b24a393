use std::error::Error;
use std::fmt;

use super::ast::{CommandLine, CommandSegment, ParsedCommand, RedirectionSpec};
use super::lexer::{Lexer, Token};

/// 重定向路径的上限，含结尾的 NUL
const PATH_MAX: usize = libc::PATH_MAX as usize;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// 第 `segment` 段（0 或 1）没有任何参数
    EmptyCommand { segment: usize },
    MissingRedirectTarget(char),
    UnexpectedWord(String),
    PathTooLong(usize),
    MultiplePipes,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::EmptyCommand { segment: 0 } => write!(f, "missing command"),
            ParseError::EmptyCommand { .. } => write!(f, "missing command after '|'"),
            ParseError::MissingRedirectTarget(op) => {
                write!(f, "expected a file name after '{}'", op)
            }
            ParseError::UnexpectedWord(word) => {
                write!(f, "unexpected argument '{}' after redirection", word)
            }
            ParseError::PathTooLong(len) => write!(
                f,
                "path too long ({} bytes, limit is {})",
                len,
                PATH_MAX - 1
            ),
            ParseError::MultiplePipes => write!(f, "only a single pipe is supported"),
        }
    }
}

impl Error for ParseError {}

/// 解析一整行：词法分析只走一遍，在 `Token::Pipe` 处切成两段
pub fn parse(line: &str) -> Result<CommandLine, ParseError> {
    let mut parser = Parser::new(line);
    let mut redirections = RedirectionSpec::default();

    let first = parser.parse_segment(0, &mut redirections)?;
    if parser.current_token != Token::Pipe {
        return Ok(CommandLine {
            command: ParsedCommand::Single(first),
            redirections,
        });
    }

    parser.next_token(); // 跳过 `|`
    let second = parser.parse_segment(1, &mut redirections);
    // 第二段后面还有管道（包括 `a || b`）都算多管道
    if parser.current_token == Token::Pipe {
        return Err(ParseError::MultiplePipes);
    }

    Ok(CommandLine {
        command: ParsedCommand::Piped(first, second?),
        redirections,
    })
}

struct Parser<'a> {
    lexer: Lexer<'a>,
    current_token: Token,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Self {
        let mut lexer = Lexer::new(input);
        let current_token = lexer.next_token();
        Parser {
            lexer,
            current_token,
        }
    }

    fn next_token(&mut self) {
        self.current_token = self.lexer.next_token();
    }

    /// 解析到行尾或 `|` 为止，`|` 留给调用方处理
    fn parse_segment(
        &mut self,
        segment: usize,
        redirections: &mut RedirectionSpec,
    ) -> Result<CommandSegment, ParseError> {
        // 参数部分，遇到元字符即停
        let mut argv = Vec::new();
        while let Token::Word(word) = &self.current_token {
            argv.push(word.clone());
            self.next_token();
        }
        let command = CommandSegment::new(argv).ok_or(ParseError::EmptyCommand { segment })?;

        // 剩下的只能是重定向，同一个操作符后出现的覆盖前面的
        loop {
            match &self.current_token {
                Token::End | Token::Pipe => break,
                Token::RedirectOut => redirections.output = Some(self.parse_target('>')?),
                Token::RedirectIn => redirections.input = Some(self.parse_target('<')?),
                Token::Word(word) => return Err(ParseError::UnexpectedWord(word.clone())),
            }
        }

        Ok(command)
    }

    fn parse_target(&mut self, op: char) -> Result<String, ParseError> {
        self.next_token(); // 跳过重定向操作符

        match &self.current_token {
            Token::Word(path) if path.len() >= PATH_MAX => {
                Err(ParseError::PathTooLong(path.len()))
            }
            Token::Word(path) => {
                let path = path.clone();
                self.next_token();
                Ok(path)
            }
            _ => Err(ParseError::MissingRedirectTarget(op)),
        }
    }
}
