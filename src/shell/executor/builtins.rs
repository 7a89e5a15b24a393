use std::io::{self, Write};

/// 在 exec 之前拦截的保留命令
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Builtin {
    Help,
    Exit,
}

impl Builtin {
    pub fn lookup(program: &str) -> Option<Self> {
        match program {
            "help" => Some(Builtin::Help),
            "exit" => Some(Builtin::Exit),
            _ => None,
        }
    }
}

const HELP_TEXT: &str = "\
shell208 - a minimal command interpreter

Supported:
  command [args...]        run a program found on PATH
  command > file           send standard output to file (truncates)
  command < file           read standard input from file
  cmd1 | cmd2              connect cmd1's output to cmd2's input (one pipe only)
  help                     show this message
  exit                     leave the shell

Ctrl-C interrupts the running command, not the shell. Ctrl-D exits.
Lines are limited to 100 characters. No quoting, globbing or variables.
";

pub fn display_help<W: Write>(out: &mut W) -> io::Result<()> {
    out.write_all(HELP_TEXT.as_bytes())?;
    out.flush()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup() {
        assert_eq!(Builtin::lookup("help"), Some(Builtin::Help));
        assert_eq!(Builtin::lookup("exit"), Some(Builtin::Exit));
        assert_eq!(Builtin::lookup("ls"), None);
        assert_eq!(Builtin::lookup("EXIT"), None);
    }

    #[allow(clippy::unwrap_used)]
    #[test]
    fn test_help_is_multi_line() {
        let mut out = Vec::new();
        display_help(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.lines().count() > 5);
        assert!(text.contains("exit"));
        assert!(text.ends_with('\n'));
    }
}
