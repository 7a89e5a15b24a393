use std::iter::Peekable;
use std::str::Chars;

#[derive(Debug, PartialEq, Clone)]
pub enum Token {
    Word(String),
    RedirectOut, // >
    RedirectIn,  // <
    Pipe,
    End,
}

/// 只有空格是分隔符，制表符等仍算作单词的一部分
const SEPARATOR: char = ' ';

fn is_metachar(c: char) -> bool {
    matches!(c, '>' | '<' | '|')
}

pub struct Lexer<'a> {
    input: Peekable<Chars<'a>>,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            input: input.chars().peekable(),
        }
    }

    pub fn next_token(&mut self) -> Token {
        self.skip_separators();

        match self.peek_char() {
            None => Token::End,
            Some(c) => match c {
                '|' => {
                    self.read_char();
                    Token::Pipe
                }
                '<' => {
                    self.read_char();
                    Token::RedirectIn
                }
                '>' => {
                    self.read_char();
                    Token::RedirectOut
                }
                _ => self.read_word(),
            },
        }
    }

    fn read_char(&mut self) -> Option<char> {
        self.input.next()
    }

    fn peek_char(&mut self) -> Option<char> {
        self.input.peek().copied()
    }

    fn skip_separators(&mut self) {
        while self.peek_char() == Some(SEPARATOR) {
            self.read_char();
        }
    }

    fn read_word(&mut self) -> Token {
        let mut word = String::new();

        while let Some(c) = self.peek_char() {
            if c == SEPARATOR || is_metachar(c) {
                break;
            }
            word.push(c);
            self.read_char();
        }

        Token::Word(word)
    }
}

impl Iterator for Lexer<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        match self.next_token() {
            Token::End => None,
            token => Some(token),
        }
    }
}
