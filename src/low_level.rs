use crate::error::{ParseError, SpecError};
use crate::value::{FlagValue, Value};
use std::collections::HashMap;
use std::iter;
use tracing::trace;

/// A registered flag: its name, usage text and backing value.
#[derive(Debug)]
pub struct Flag {
    pub name: String,
    pub usage: String,
    pub value: FlagValue,
    default: Option<String>,
}

impl Flag {
    /// The value's rendering at registration time, when it is not the zero value.
    pub fn default_text(&self) -> Option<&str> {
        self.default.as_deref()
    }
}

#[derive(Debug, PartialEq, Eq)]
enum Token {
    Name(String),
    Word(String),
    Assignment { name: String, value: String },
    Separator,
}

impl Token {
    fn parse(s: String) -> Result<Self, ParseError> {
        if s == "--" {
            return Ok(Token::Separator);
        }
        if s.len() < 2 || !s.starts_with('-') {
            return Ok(Token::Word(s));
        }
        let name = s.strip_prefix("--").unwrap_or(&s[1..]);
        if name.starts_with('-') || name.starts_with('=') {
            return Err(ParseError::BadSyntax(s));
        }
        Ok(match name.split_once('=') {
            Some((name, value)) => Token::Assignment {
                name: name.to_string(),
                value: value.to_string(),
            },
            None => Token::Name(name.to_string()),
        })
    }
}

/// Flag table plus the token loop that feeds arguments to it.
#[derive(Debug, Default)]
pub struct LowLevelParser {
    flags: Vec<Flag>,
    name_to_index: HashMap<String, usize>,
    visited: Vec<usize>,
}

impl LowLevelParser {
    pub fn register(
        &mut self,
        name: &str,
        usage: &str,
        value: FlagValue,
    ) -> Result<(), SpecError> {
        if name.is_empty() {
            return Err(SpecError::EmptyName);
        }
        if name.starts_with('-') {
            return Err(SpecError::LeadingDash(name.to_string()));
        }
        if name.contains('=') {
            return Err(SpecError::ContainsEquals(name.to_string()));
        }
        if self.name_to_index.contains_key(name) {
            return Err(SpecError::NameUsedMultipleTimes(name.to_string()));
        }
        self.name_to_index
            .insert(name.to_string(), self.flags.len());
        self.flags.push(Flag {
            name: name.to_string(),
            usage: usage.to_string(),
            default: value.default_text(),
            value,
        });
        Ok(())
    }

    /// Parses flags until the first non-flag argument or `--`, returning the
    /// unconsumed arguments. The visited set is reset at the start of each call.
    pub fn parse<A: IntoIterator<Item = String>>(
        &mut self,
        args: A,
    ) -> Result<Vec<String>, ParseError> {
        self.visited.clear();
        let mut args_iter = args.into_iter();
        while let Some(arg) = args_iter.next() {
            match Token::parse(arg)? {
                Token::Separator => break,
                Token::Word(word) => return Ok(iter::once(word).chain(args_iter).collect()),
                Token::Name(name) => {
                    let index = self.lookup(&name)?;
                    let value = if self.flags[index].value.is_bool() {
                        "true".to_string()
                    } else {
                        args_iter
                            .next()
                            .ok_or_else(|| ParseError::ArgumentLacksParameter(name.clone()))?
                    };
                    self.set(index, value)?;
                }
                Token::Assignment { name, value } => {
                    let index = self.lookup(&name)?;
                    self.set(index, value)?;
                }
            }
        }
        Ok(args_iter.collect())
    }

    fn lookup(&self, name: &str) -> Result<usize, ParseError> {
        match self.name_to_index.get(name) {
            Some(index) => Ok(*index),
            None if name == "h" || name == "help" => Err(ParseError::Help),
            None => Err(ParseError::UnknownName(name.to_string())),
        }
    }

    fn set(&mut self, index: usize, value: String) -> Result<(), ParseError> {
        let flag = &mut self.flags[index];
        trace!(flag = %flag.name, value = %value, "setting flag");
        flag.value
            .set(&value)
            .map_err(|source| ParseError::InvalidValue {
                name: flag.name.clone(),
                value,
                source,
            })?;
        if !self.visited.contains(&index) {
            self.visited.push(index);
        }
        Ok(())
    }

    pub fn flags(&self) -> &[Flag] {
        &self.flags
    }

    pub fn get(&self, name: &str) -> Option<&Flag> {
        self.name_to_index.get(name).map(|&index| &self.flags[index])
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Flag> {
        match self.name_to_index.get(name) {
            Some(&index) => Some(&mut self.flags[index]),
            None => None,
        }
    }

    /// Flags assigned during the last parse, in the order they were first set.
    pub fn visited(&self) -> impl Iterator<Item = &Flag> {
        self.visited.iter().map(move |&index| &self.flags[index])
    }

    pub fn is_visited(&self, name: &str) -> bool {
        self.name_to_index
            .get(name)
            .map_or(false, |index| self.visited.contains(index))
    }
}
