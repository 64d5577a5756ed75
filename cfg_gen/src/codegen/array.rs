/* Array-size folding: turn a raw size token into an element count */

use cfg_types::Macro;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ArraySizeError {
  #[error("`{0}` is neither an integer nor a macro name")]
  InvalidToken(String),

  #[error("macro `{0}` is not defined")]
  UndefinedMacro(String),

  #[error("macro `{name}` has non-integer value `{value}`")]
  NotAnInteger { name: String, value: String },

  #[error("macro `{0}` is defined in terms of itself")]
  RecursiveMacro(String),

  #[error("array size arithmetic overflows or divides by zero")]
  Arithmetic,

  #[error("array size must be positive, got {0}")]
  NonPositive(i64),
}

/// Resolve `token` to a positive element count. Numerals are taken as is;
/// names are looked up in `macros` (first definition wins). A macro value
/// may be an integer expression over numerals and other macros, using
/// `+ - * / %` and parentheses.
pub fn resolve_array_size(token: &str, macros: &[Macro]) -> Result<usize, ArraySizeError> {
  let mut evaluator = SizeEvaluator { macros, expanding: Vec::new() };
  let value = evaluator.eval_text(token)?;
  match usize::try_from(value) {
    Ok(size) if size > 0 => Ok(size),
    _ => Err(ArraySizeError::NonPositive(value)),
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Token<'a> {
  Number(i64),
  Name(&'a str),
  Op(char),
  Open,
  Close,
}

/* None when the text holds something other than integers, names and operators */
fn tokenize(text: &str) -> Option<Vec<Token<'_>>> {
  let mut tokens = Vec::new();
  let mut rest = text.trim_start();

  while let Some(c) = rest.chars().next() {
    let len = if c.is_ascii_alphanumeric() || c == '_' {
      let len = rest
        .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
        .unwrap_or(rest.len());
      let word = &rest[..len];
      if c.is_ascii_digit() {
        tokens.push(Token::Number(parse_integer(word)?));
      } else {
        tokens.push(Token::Name(word));
      }
      len
    } else {
      tokens.push(match c {
        '+' | '-' | '*' | '/' | '%' => Token::Op(c),
        '(' => Token::Open,
        ')' => Token::Close,
        _ => return None,
      });
      1
    };
    rest = rest[len..].trim_start();
  }

  Some(tokens)
}

/* Decimal or 0x-prefixed hexadecimal */
fn parse_integer(word: &str) -> Option<i64> {
  match word.strip_prefix("0x").or_else(|| word.strip_prefix("0X")) {
    Some(hex) => i64::from_str_radix(hex, 16).ok(),
    None if word.bytes().all(|b| b.is_ascii_digit()) => word.parse().ok(),
    None => None,
  }
}

struct SizeEvaluator<'m> {
  macros: &'m [Macro],
  /* Macros currently being expanded, innermost last */
  expanding: Vec<&'m str>,
}

impl<'m> SizeEvaluator<'m> {
  fn eval_text(&mut self, text: &str) -> Result<i64, ArraySizeError> {
    let invalid = || ArraySizeError::InvalidToken(text.to_string());
    let tokens = tokenize(text).ok_or_else(invalid)?;
    let mut pos = 0;
    let value = self.expr(&tokens, &mut pos).map_err(|err| match err {
      ArraySizeError::InvalidToken(_) => invalid(),
      other => other,
    })?;
    if pos != tokens.len() {
      return Err(invalid());
    }
    Ok(value)
  }

  fn eval_name(&mut self, name: &str) -> Result<i64, ArraySizeError> {
    if self.expanding.iter().any(|expanding| *expanding == name) {
      return Err(ArraySizeError::RecursiveMacro(name.to_string()));
    }
    let macros = self.macros;
    let definition = macros
      .iter()
      .find(|m| m.name == name)
      .ok_or_else(|| ArraySizeError::UndefinedMacro(name.to_string()))?;

    self.expanding.push(&definition.name);
    let value = self.eval_text(&definition.value).map_err(|err| match err {
      ArraySizeError::InvalidToken(_) => ArraySizeError::NotAnInteger {
        name: definition.name.clone(),
        value: definition.value.clone(),
      },
      other => other,
    });
    self.expanding.pop();
    value
  }

  /* expr := term (('+' | '-') term)* */
  fn expr(&mut self, tokens: &[Token], pos: &mut usize) -> Result<i64, ArraySizeError> {
    let mut value = self.term(tokens, pos)?;
    while let Some(&Token::Op(op @ ('+' | '-'))) = tokens.get(*pos) {
      *pos += 1;
      let rhs = self.term(tokens, pos)?;
      value = if op == '+' { value.checked_add(rhs) } else { value.checked_sub(rhs) }
        .ok_or(ArraySizeError::Arithmetic)?;
    }
    Ok(value)
  }

  /* term := factor (('*' | '/' | '%') factor)* */
  fn term(&mut self, tokens: &[Token], pos: &mut usize) -> Result<i64, ArraySizeError> {
    let mut value = self.factor(tokens, pos)?;
    while let Some(&Token::Op(op @ ('*' | '/' | '%'))) = tokens.get(*pos) {
      *pos += 1;
      let rhs = self.factor(tokens, pos)?;
      value = match op {
        '*' => value.checked_mul(rhs),
        '/' => value.checked_div(rhs),
        _ => value.checked_rem(rhs),
      }
      .ok_or(ArraySizeError::Arithmetic)?;
    }
    Ok(value)
  }

  fn factor(&mut self, tokens: &[Token], pos: &mut usize) -> Result<i64, ArraySizeError> {
    let token = tokens.get(*pos).copied();
    *pos += 1;
    match token {
      Some(Token::Number(value)) => Ok(value),
      Some(Token::Name(name)) => self.eval_name(name),
      Some(Token::Op('-')) => {
        let value = self.factor(tokens, pos)?;
        value.checked_neg().ok_or(ArraySizeError::Arithmetic)
      }
      Some(Token::Op('+')) => self.factor(tokens, pos),
      Some(Token::Open) => {
        let value = self.expr(tokens, pos)?;
        if tokens.get(*pos) != Some(&Token::Close) {
          return Err(ArraySizeError::InvalidToken(String::new()));
        }
        *pos += 1;
        Ok(value)
      }
      _ => Err(ArraySizeError::InvalidToken(String::new())),
    }
  }
}
