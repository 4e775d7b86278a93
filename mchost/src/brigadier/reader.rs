//! Cursor over a command line

use super::CommandSyntaxError;

#[derive(Debug, Clone)]
pub struct StringReader<'a> {
    input: &'a str,
    cursor: usize,
}

impl<'a> StringReader<'a> {
    pub fn new(input: &'a str) -> Self {
        Self { input, cursor: 0 }
    }

    pub fn input(&self) -> &'a str {
        self.input
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn set_cursor(&mut self, cursor: usize) {
        self.cursor = cursor.min(self.input.len());
    }

    /// Text from `start` up to the cursor
    pub fn read_since(&self, start: usize) -> &'a str {
        &self.input[start..self.cursor]
    }

    pub fn remaining(&self) -> &'a str {
        &self.input[self.cursor..]
    }

    pub fn can_read(&self) -> bool {
        self.cursor < self.input.len()
    }

    pub fn peek(&self) -> Option<char> {
        self.remaining().chars().next()
    }

    pub fn skip(&mut self) {
        if let Some(c) = self.peek() {
            self.cursor += c.len_utf8();
        }
    }

    pub fn read(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.cursor += c.len_utf8();
        Some(c)
    }

    pub fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.skip();
        }
    }

    /// Advance while `pred` holds and return what was consumed
    pub fn read_while(&mut self, pred: impl Fn(char) -> bool) -> &'a str {
        let start = self.cursor;
        while self.peek().is_some_and(&pred) {
            self.skip();
        }
        self.read_since(start)
    }

    pub fn is_allowed_number(c: char) -> bool {
        c.is_ascii_digit() || c == '.' || c == '-'
    }

    pub fn is_allowed_in_unquoted_string(c: char) -> bool {
        c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.' | '+')
    }

    pub fn read_int(&mut self) -> Result<i32, CommandSyntaxError> {
        let start = self.cursor;
        let number = self.read_while(Self::is_allowed_number);
        if number.is_empty() {
            return Err(self.error("parsing.int.expect", "Expected integer"));
        }
        number.parse().map_err(|_| {
            self.set_cursor(start);
            self.error("parsing.int.invalid", format!("Invalid integer '{}'", number))
        })
    }

    pub fn read_double(&mut self) -> Result<f64, CommandSyntaxError> {
        let start = self.cursor;
        let number = self.read_while(Self::is_allowed_number);
        if number.is_empty() {
            return Err(self.error("parsing.double.expect", "Expected double"));
        }
        number.parse().map_err(|_| {
            self.set_cursor(start);
            self.error("parsing.double.invalid", format!("Invalid double '{}'", number))
        })
    }

    pub fn read_float(&mut self) -> Result<f32, CommandSyntaxError> {
        let start = self.cursor;
        let number = self.read_while(Self::is_allowed_number);
        if number.is_empty() {
            return Err(self.error("parsing.float.expect", "Expected float"));
        }
        number.parse().map_err(|_| {
            self.set_cursor(start);
            self.error("parsing.float.invalid", format!("Invalid float '{}'", number))
        })
    }

    pub fn read_unquoted_string(&mut self) -> &'a str {
        self.read_while(Self::is_allowed_in_unquoted_string)
    }

    pub fn read_quoted_string(&mut self) -> Result<String, CommandSyntaxError> {
        let quote = match self.peek() {
            Some(c @ ('"' | '\'')) => c,
            _ => {
                return Err(self.error(
                    "parsing.quote.expected.start",
                    "Expected quote to start a string",
                ))
            }
        };
        self.skip();
        let mut out = String::new();
        let mut escaped = false;
        while let Some(c) = self.read() {
            if escaped {
                if c == quote || c == '\\' {
                    out.push(c);
                    escaped = false;
                } else {
                    self.set_cursor(self.cursor - c.len_utf8());
                    return Err(self.error(
                        "parsing.quote.escape",
                        format!("Invalid escape sequence '{}' in quoted string", c),
                    ));
                }
            } else if c == '\\' {
                escaped = true;
            } else if c == quote {
                return Ok(out);
            } else {
                out.push(c);
            }
        }
        Err(self.error(
            "parsing.quote.expected.end",
            "Unclosed quoted string",
        ))
    }

    /// A quoted string, or an unquoted word
    pub fn read_string(&mut self) -> Result<String, CommandSyntaxError> {
        match self.peek() {
            Some('"' | '\'') => self.read_quoted_string(),
            _ => Ok(self.read_unquoted_string().to_string()),
        }
    }

    pub fn read_boolean(&mut self) -> Result<bool, CommandSyntaxError> {
        let start = self.cursor;
        let value = self.read_string()?;
        match value.as_str() {
            "true" => Ok(true),
            "false" => Ok(false),
            "" => Err(self.error("parsing.bool.expected", "Expected bool")),
            other => {
                self.set_cursor(start);
                Err(self.error(
                    "parsing.bool.invalid",
                    format!("Invalid bool, expected true or false but found '{}'", other),
                ))
            }
        }
    }

    pub fn expect(&mut self, c: char) -> Result<(), CommandSyntaxError> {
        if self.peek() == Some(c) {
            self.skip();
            Ok(())
        } else {
            Err(self.error("parsing.expected", format!("Expected '{}'", c)))
        }
    }

    /// A syntax error positioned at the cursor
    pub fn error(&self, key: &'static str, message: impl Into<String>) -> CommandSyntaxError {
        CommandSyntaxError::new(key, message).with_context(self.input, self.cursor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_int_and_whitespace() {
        let mut reader = StringReader::new("10 -64");
        assert_eq!(reader.read_int().unwrap(), 10);
        reader.skip_whitespace();
        assert_eq!(reader.read_int().unwrap(), -64);
        assert!(!reader.can_read());
    }

    #[test]
    fn test_read_int_rejects_decimal() {
        let mut reader = StringReader::new("10.5");
        let err = reader.read_int().unwrap_err();
        assert_eq!(err.key(), "parsing.int.invalid");
        assert_eq!(reader.cursor(), 0);
    }

    #[test]
    fn test_quoted_string_escapes() {
        let mut reader = StringReader::new(r#""a \"b\"" rest"#);
        assert_eq!(reader.read_quoted_string().unwrap(), r#"a "b""#);
        assert_eq!(reader.remaining(), " rest");
    }

    #[test]
    fn test_error_context() {
        let mut reader = StringReader::new("tp @p sixty");
        reader.set_cursor(6);
        let err = reader.read_int().unwrap_err();
        assert_eq!(err.to_string(), "Expected integer at position 6: tp @p <--[HERE]");
    }
}
