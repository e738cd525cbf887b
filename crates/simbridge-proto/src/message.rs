//! Command tokenizer.
//!
//! Grammar: `[:<origin> ]<COMMAND>[ <param>]*[ :<trailing free text>]`.
//! Tokens are separated by single spaces, so runs of spaces produce empty
//! middle parameters exactly as they appear on the wire.

use std::fmt;

/// One tokenized protocol line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Message {
    /// Origin marker without its leading `:`, if the line carried one.
    pub origin: Option<String>,
    /// Command verb, exactly as sent.
    pub command: String,
    /// Ordered parameters; the trailing parameter, if any, is last.
    pub params: Vec<String>,
    /// Whether the last parameter was introduced by `:`.
    pub trailing: bool,
}

impl Message {
    /// Tokenize a framed line (terminator already stripped).
    ///
    /// Returns `None` for lines with fewer than two space-separated tokens
    /// or an empty command token. Such lines carry no command and are
    /// dropped by the caller without a reply.
    pub fn parse(line: &str) -> Option<Message> {
        let tokens: Vec<&str> = line.split(' ').collect();
        if tokens.len() < 2 {
            return None;
        }

        let (origin, command_index) = match tokens[0].strip_prefix(':') {
            Some(origin) => (Some(origin.to_owned()), 1),
            None => (None, 0),
        };
        let command = tokens[command_index];
        if command.is_empty() {
            return None;
        }

        let mut params = Vec::new();
        let mut trailing = false;
        let rest = &tokens[command_index + 1..];
        for (i, token) in rest.iter().enumerate() {
            if let Some(first) = token.strip_prefix(':') {
                let mut text = String::from(first);
                for more in &rest[i + 1..] {
                    text.push(' ');
                    text.push_str(more);
                }
                params.push(text);
                trailing = true;
                break;
            }
            params.push((*token).to_owned());
        }

        Some(Message {
            origin,
            command: command.to_owned(),
            params,
            trailing,
        })
    }

    /// Parameter at `index`, if present.
    pub fn arg(&self, index: usize) -> Option<&str> {
        self.params.get(index).map(String::as_str)
    }

    /// Number of parameters.
    pub fn arg_count(&self) -> usize {
        self.params.len()
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(origin) = &self.origin {
            write!(f, ":{} ", origin)?;
        }
        f.write_str(&self.command)?;
        let last = self.params.len().saturating_sub(1);
        for (i, param) in self.params.iter().enumerate() {
            if self.trailing && i == last {
                write!(f, " :{}", param)?;
            } else {
                write!(f, " {}", param)?;
            }
        }
        Ok(())
    }
}
