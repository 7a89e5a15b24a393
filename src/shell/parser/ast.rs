/// 一个可执行程序及其参数，至少包含程序名
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSegment {
    pub argv: Vec<String>,
}

impl CommandSegment {
    pub fn new(argv: Vec<String>) -> Option<Self> {
        if argv.is_empty() {
            None
        } else {
            Some(Self { argv })
        }
    }

    pub fn program(&self) -> &str {
        self.argv.first().map(String::as_str).unwrap_or_default()
    }
}

/// 整行共享一份重定向：管道时输入给第一个进程，输出给第二个进程
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RedirectionSpec {
    pub output: Option<String>,
    pub input: Option<String>,
}

impl RedirectionSpec {
    pub fn is_empty(&self) -> bool {
        self.output.is_none() && self.input.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedCommand {
    Single(CommandSegment),
    Piped(CommandSegment, CommandSegment),
}

impl ParsedCommand {
    /// 第一段的程序名，`exit` 判断只看这里
    pub fn first(&self) -> &CommandSegment {
        match self {
            ParsedCommand::Single(segment) => segment,
            ParsedCommand::Piped(first, _) => first,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    pub command: ParsedCommand,
    pub redirections: RedirectionSpec,
}
