use svgplot_geom::V2;

use crate::ast::{ArcArg, PathCommand};
use crate::F;

/// A fatal error from the path-data parser, naming the position at which
/// parsing failed and the category of token that was expected.
#[non_exhaustive]
#[derive(thiserror::Error, Clone, Debug, PartialEq)]
pub enum ParseError {
    #[error("Line {line} Column {column}: expected a command letter, found '{found}'")]
    ExpectedCommand { line: u32, column: u32, found: String },
    #[error("Line {line} Column {column}: expected a number, found end of input")]
    ExpectedNumber { line: u32, column: u32 },
    #[error("Line {line} Column {column}: malformed number '{text}'")]
    BadNumber { line: u32, column: u32, text: String },
    #[error("Line {line} Column {column}: expected an arc flag ('0' or '1'), found '{found}'")]
    BadFlag { line: u32, column: u32, found: String },
    #[error("Line {line} Column {column}: a path must start with a moveto command")]
    MissingInitialMoveTo { line: u32, column: u32 },
    #[error("Line {line} Column {column}: unrecognised command letter '{letter}'")]
    UnknownCommand { line: u32, column: u32, letter: char },
}

/// A char stream over the path-data string that tracks line/column
/// position for diagnostics.
struct Source {
    chars: Vec<char>,
    pos: usize,
    line: u32,
    column: u32,
}

impl Source {
    fn new(s: &str) -> Self {
        Source { chars: s.chars().collect(), pos: 0, line: 1, column: 1 }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += 1;
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    fn at_end(&self) -> bool {
        self.pos >= self.chars.len()
    }

    fn position(&self) -> (u32, u32) {
        (self.line, self.column)
    }

    fn skip_separators(&mut self) {
        while let Some(c) = self.peek() {
            if c.is_whitespace() || c == ',' {
                self.advance();
            } else {
                break;
            }
        }
    }

    fn is_command_letter(c: char) -> bool {
        matches!(
            c.to_ascii_uppercase(),
            'M' | 'L' | 'H' | 'V' | 'C' | 'S' | 'Q' | 'T' | 'A' | 'Z'
        )
    }

    fn parse_number(&mut self) -> Result<F, ParseError> {
        self.skip_separators();
        let (line, column) = self.position();
        let start = self.pos;
        if let Some(c) = self.peek() {
            if c == '+' || c == '-' {
                self.advance();
            }
        }
        let mut saw_digit = false;
        while let Some(c) = self.peek() {
            if c.is_ascii_digit() {
                saw_digit = true;
                self.advance();
            } else {
                break;
            }
        }
        if self.peek() == Some('.') {
            self.advance();
            while let Some(c) = self.peek() {
                if c.is_ascii_digit() {
                    saw_digit = true;
                    self.advance();
                } else {
                    break;
                }
            }
        }
        if !saw_digit {
            self.pos = start;
            if self.at_end() {
                return Err(ParseError::ExpectedNumber { line, column });
            }
            let text: String = self.chars[start..].iter().take(8).collect();
            return Err(ParseError::BadNumber { line, column, text });
        }
        if matches!(self.peek(), Some('e') | Some('E')) {
            let exp_start = self.pos;
            self.advance();
            if matches!(self.peek(), Some('+') | Some('-')) {
                self.advance();
            }
            let mut saw_exp_digit = false;
            while let Some(c) = self.peek() {
                if c.is_ascii_digit() {
                    saw_exp_digit = true;
                    self.advance();
                } else {
                    break;
                }
            }
            if !saw_exp_digit {
                // Not actually an exponent suffix; back off and let the
                // 'e'/'E' be re-tokenised by whatever comes next.
                self.pos = exp_start;
            }
        }
        let text: String = self.chars[start..self.pos].iter().collect();
        text.parse::<F>().map_err(|_| ParseError::BadNumber { line, column, text })
    }

    fn parse_point(&mut self) -> Result<V2, ParseError> {
        let x = self.parse_number()?;
        let y = self.parse_number()?;
        Ok(V2::new(x, y))
    }

    fn parse_flag(&mut self) -> Result<bool, ParseError> {
        self.skip_separators();
        let (line, column) = self.position();
        match self.advance() {
            Some('0') => Ok(false),
            Some('1') => Ok(true),
            Some(c) => Err(ParseError::BadFlag { line, column, found: c.to_string() }),
            None => Err(ParseError::ExpectedNumber { line, column }),
        }
    }

    /// True if another number could plausibly start here: a digit, `.`, or
    /// a sign. Used to decide whether a repeated-command payload
    /// continues without a fresh command letter.
    fn at_number_start(&mut self) -> bool {
        self.skip_separators();
        match self.peek() {
            Some(c) => c.is_ascii_digit() || c == '.' || c == '+' || c == '-',
            None => false,
        }
    }
}

/// Parses an SVG path-data `d` attribute string into a command stream.
pub fn parse_path(d: &str) -> Result<Vec<PathCommand>, ParseError> {
    let mut src = Source::new(d);
    let mut commands = Vec::new();

    src.skip_separators();
    if src.at_end() {
        return Ok(commands);
    }

    let (line, column) = src.position();
    let first = src.peek().ok_or(ParseError::MissingInitialMoveTo { line, column })?;
    if first.to_ascii_uppercase() != 'M' {
        return Err(ParseError::MissingInitialMoveTo { line, column });
    }

    let mut current_letter = 'M';
    let mut current_relative = false;

    loop {
        src.skip_separators();
        if src.at_end() {
            break;
        }
        if let Some(c) = src.peek() {
            if Source::is_command_letter(c) {
                src.advance();
                current_letter = c.to_ascii_uppercase();
                current_relative = c.is_ascii_lowercase();
            } else if !src.at_number_start() {
                let (line, column) = src.position();
                return Err(ParseError::ExpectedCommand { line, column, found: c.to_string() });
            }
            // else: repeat the previous command with a fresh payload group
        } else {
            break;
        }

        match current_letter {
            'M' => {
                let mut points = Vec::new();
                points.push(src.parse_point()?);
                // Implicit LineTo run: subsequent pairs on the same
                // command group become LineTo, inheriting relativity.
                let mut implicit = Vec::new();
                while src.at_number_start() {
                    implicit.push(src.parse_point()?);
                }
                commands.push(PathCommand::MoveTo { relative: current_relative, points });
                if !implicit.is_empty() {
                    commands.push(PathCommand::LineTo { relative: current_relative, points: implicit });
                }
                current_letter = 'L';
            }
            'L' => {
                let mut points = Vec::new();
                points.push(src.parse_point()?);
                while src.at_number_start() {
                    points.push(src.parse_point()?);
                }
                commands.push(PathCommand::LineTo { relative: current_relative, points });
            }
            'H' => {
                let mut coords = Vec::new();
                coords.push(src.parse_number()?);
                while src.at_number_start() {
                    coords.push(src.parse_number()?);
                }
                commands.push(PathCommand::HLineTo { relative: current_relative, coords });
            }
            'V' => {
                let mut coords = Vec::new();
                coords.push(src.parse_number()?);
                while src.at_number_start() {
                    coords.push(src.parse_number()?);
                }
                commands.push(PathCommand::VLineTo { relative: current_relative, coords });
            }
            'C' => {
                let mut points = Vec::new();
                points.push(src.parse_point()?);
                points.push(src.parse_point()?);
                points.push(src.parse_point()?);
                while src.at_number_start() {
                    points.push(src.parse_point()?);
                    points.push(src.parse_point()?);
                    points.push(src.parse_point()?);
                }
                commands.push(PathCommand::CurveTo { relative: current_relative, points });
            }
            'S' => {
                let mut points = Vec::new();
                points.push(src.parse_point()?);
                points.push(src.parse_point()?);
                while src.at_number_start() {
                    points.push(src.parse_point()?);
                    points.push(src.parse_point()?);
                }
                commands.push(PathCommand::SmoothCurveTo { relative: current_relative, points });
            }
            'Q' => {
                let mut points = Vec::new();
                points.push(src.parse_point()?);
                points.push(src.parse_point()?);
                while src.at_number_start() {
                    points.push(src.parse_point()?);
                    points.push(src.parse_point()?);
                }
                commands.push(PathCommand::QuadraticBezierTo { relative: current_relative, points });
            }
            'T' => {
                let mut points = Vec::new();
                points.push(src.parse_point()?);
                while src.at_number_start() {
                    points.push(src.parse_point()?);
                }
                commands.push(PathCommand::SmoothQuadraticBezierTo { relative: current_relative, points });
            }
            'A' => {
                let mut arcs = Vec::new();
                loop {
                    let rx = src.parse_number()?;
                    let ry = src.parse_number()?;
                    let x_axis_deg = src.parse_number()?;
                    let large = src.parse_flag()?;
                    let sweep = src.parse_flag()?;
                    let to = src.parse_point()?;
                    arcs.push(ArcArg { r: V2::new(rx, ry), x_axis_deg, large, sweep, to });
                    if !src.at_number_start() {
                        break;
                    }
                }
                commands.push(PathCommand::EllipticalArc { relative: current_relative, arcs });
            }
            'Z' => {
                commands.push(PathCommand::ClosePath);
            }
            other => {
                let (line, column) = src.position();
                return Err(ParseError::UnknownCommand { line, column, letter: other });
            }
        }
    }

    Ok(commands)
}
