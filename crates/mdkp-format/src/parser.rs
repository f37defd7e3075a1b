use std::str::FromStr;

use mdkp_solver::{Instance, InstanceError};
use thiserror::Error;
use tracing::debug;

use crate::lexer::{Lexer, Token, TokenKind};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum FormatError {
    #[error("Unexpected end of input at line {line}: expected {expected}")]
    UnexpectedEof { expected: String, line: usize },
    #[error("Invalid number '{text}' in {section} at line {line}")]
    InvalidNumber {
        text: String,
        section: String,
        line: usize,
    },
    #[error("Line {line} must hold exactly {expected} tokens for {section}, found {found}")]
    TokenCount {
        section: String,
        expected: usize,
        found: usize,
        line: usize,
    },
    #[error("Expected {expected} values for {section}, found {found} by the end of line {line}")]
    CountMismatch {
        section: String,
        expected: usize,
        found: usize,
        line: usize,
    },
    #[error("Unexpected input after the last instance at line {line}")]
    TrailingInput { line: usize },
    #[error("Instance {index} ending at line {line} is invalid: {source}")]
    Instance {
        index: usize,
        line: usize,
        #[source]
        source: InstanceError,
    },
}

/// Non-blank source line
#[derive(Debug, Clone)]
struct Line {
    number: usize,
    tokens: Vec<Token>,
}

/// Parser for multi-instance knapsack files.
///
/// The file starts with an instance count. Each instance is a
/// `n_projects m_resources optimal_value` header followed by the profits, one
/// row of `n_projects` weights per resource, and the capacities. Every list may
/// wrap over several lines but ends at a line boundary. Blank lines are ignored.
pub struct Parser {
    lines: Vec<Line>,
    pos: usize,
}

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        let mut lines: Vec<Line> = Vec::new();
        for token in tokens {
            if token.kind != TokenKind::Word {
                continue;
            }
            match lines.last_mut() {
                Some(line) if line.number == token.line => line.tokens.push(token),
                _ => lines.push(Line {
                    number: token.line,
                    tokens: vec![token],
                }),
            }
        }
        Self { lines, pos: 0 }
    }

    pub fn parse(source: &str) -> Result<Vec<Instance>, FormatError> {
        let tokens = Lexer::tokenize(source);
        let mut parser = Parser::new(tokens);
        parser.parse_file()
    }

    fn last_line_number(&self) -> usize {
        self.pos
            .checked_sub(1)
            .and_then(|i| self.lines.get(i))
            .map(|l| l.number)
            .unwrap_or(0)
    }

    fn next_line(&mut self, expected: &str) -> Result<&Line, FormatError> {
        let line = self.last_line_number();
        match self.lines.get(self.pos) {
            Some(next) => {
                self.pos += 1;
                Ok(next)
            }
            None => Err(FormatError::UnexpectedEof {
                expected: expected.to_string(),
                line,
            }),
        }
    }

    /// Next line, which must contain exactly `expected` tokens
    fn fixed_line(&mut self, section: &str, expected: usize) -> Result<&Line, FormatError> {
        let line = self.next_line(section)?;
        if line.tokens.len() != expected {
            return Err(FormatError::TokenCount {
                section: section.to_string(),
                expected,
                found: line.tokens.len(),
                line: line.number,
            });
        }
        Ok(line)
    }

    fn parse_file(&mut self) -> Result<Vec<Instance>, FormatError> {
        let count: usize = {
            let line = self.fixed_line("instance count", 1)?;
            parse_number(&line.tokens[0], "instance count")?
        };

        let mut instances = Vec::new();
        for index in 0..count {
            instances.push(self.parse_instance(index)?);
        }

        if let Some(extra) = self.lines.get(self.pos) {
            return Err(FormatError::TrailingInput { line: extra.number });
        }

        debug!(instances = instances.len(), "parsed instance file");
        Ok(instances)
    }

    fn parse_instance(&mut self, index: usize) -> Result<Instance, FormatError> {
        let (n_projects, m_resources, optimal_value) = {
            let section = "instance header";
            let line = self.fixed_line(section, 3)?;
            let n: usize = parse_number(&line.tokens[0], section)?;
            let m: usize = parse_number(&line.tokens[1], section)?;
            let optimum: f64 = parse_number(&line.tokens[2], section)?;
            (n, m, optimum)
        };

        // Every row must consume at least one line, or a huge resource count
        // would loop without reading input
        let empty = if n_projects == 0 {
            Some(InstanceError::NoProjects)
        } else if m_resources == 0 {
            Some(InstanceError::NoResources)
        } else {
            None
        };
        if let Some(source) = empty {
            return Err(FormatError::Instance {
                index,
                line: self.last_line_number(),
                source,
            });
        }

        let profits: Vec<f64> = self.parse_values("profits", n_projects)?;
        let weights = (0..m_resources)
            .map(|row| self.parse_values(&format!("resource row {}", row), n_projects))
            .collect::<Result<Vec<Vec<u64>>, _>>()?;
        let capacities: Vec<u64> = self.parse_values("capacities", m_resources)?;

        Instance::new(n_projects, m_resources, optimal_value, profits, weights, capacities).map_err(|source| {
            FormatError::Instance {
                index,
                line: self.last_line_number(),
                source,
            }
        })
    }

    /// Reads whole lines until `count` values are collected.
    ///
    /// `count` comes from the file, so nothing is reserved up front.
    fn parse_values<T: FromStr>(&mut self, section: &str, count: usize) -> Result<Vec<T>, FormatError> {
        let mut values = Vec::new();
        let mut last_line = self.last_line_number();
        while values.len() < count {
            let line = self.next_line(section)?;
            last_line = line.number;
            for token in &line.tokens {
                values.push(parse_number(token, section)?);
            }
        }
        if values.len() != count {
            return Err(FormatError::CountMismatch {
                section: section.to_string(),
                expected: count,
                found: values.len(),
                line: last_line,
            });
        }
        Ok(values)
    }
}

fn parse_number<T: FromStr>(token: &Token, section: &str) -> Result<T, FormatError> {
    token.text.parse().map_err(|_| FormatError::InvalidNumber {
        text: token.text.clone(),
        section: section.to_string(),
        line: token.line,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = include_str!("../../../data/sample.txt");

    #[test]
    fn test_parse_sample_file() {
        let instances = Parser::parse(SAMPLE).unwrap();
        assert_eq!(instances.len(), 3);

        let first = &instances[0];
        assert_eq!(first.num_projects(), 3);
        assert_eq!(first.num_resources(), 1);
        assert_eq!(first.optimal_value(), 30.0);
        assert_eq!(first.profits(), &[10.0, 20.0, 15.0]);
        assert_eq!(first.weights(), &[vec![2, 3, 4]]);
        assert_eq!(first.capacities(), &[5]);
    }

    #[test]
    fn test_parse_wrapped_lines() {
        let instances = Parser::parse(SAMPLE).unwrap();
        let second = &instances[1];
        assert_eq!(second.optimal_value(), 36.5);
        assert_eq!(second.profits(), &[12.0, 7.0, 9.0, 4.0, 15.0, 3.0]);
        assert_eq!(second.weights()[0], vec![4, 2, 3, 1, 6, 1]);
        assert_eq!(second.weights()[1], vec![1, 3, 2, 2, 1, 1]);
        assert_eq!(second.capacities(), &[8, 5]);
    }

    #[test]
    fn test_parse_wrapped_capacities() {
        let source = "1\n2 3 7\n1 2\n1 1\n2 2\n3 3\n4\n5 6\n";
        let instances = Parser::parse(source).unwrap();
        assert_eq!(instances[0].capacities(), &[4, 5, 6]);
    }

    #[test]
    fn test_integral_and_fractional_optimum() {
        let source = "2\n1 1 7\n3\n1\n1\n1 1 7.25\n3\n1\n1\n";
        let instances = Parser::parse(source).unwrap();
        assert_eq!(instances[0].optimal_value(), 7.0);
        assert_eq!(instances[1].optimal_value(), 7.25);
    }

    #[test]
    fn test_short_profits_hit_eof() {
        let result = Parser::parse("1\n3 1 10\n1 2\n");
        assert_eq!(
            result,
            Err(FormatError::UnexpectedEof {
                expected: "profits".to_string(),
                line: 3,
            })
        );
    }

    #[test]
    fn test_truncated_resource_row() {
        let result = Parser::parse("1\n3 1 10\n1 2 3\n4 5\n");
        assert!(matches!(
            result,
            Err(FormatError::UnexpectedEof { ref expected, .. }) if expected == "resource row 0"
        ));
    }

    #[test]
    fn test_overlong_line_is_rejected() {
        let result = Parser::parse("1\n2 1 10\n1 2 3\n4 5\n6\n");
        assert_eq!(
            result,
            Err(FormatError::CountMismatch {
                section: "profits".to_string(),
                expected: 2,
                found: 3,
                line: 3,
            })
        );
    }

    #[test]
    fn test_bad_header() {
        let result = Parser::parse("1\n2 1\n1 2\n4 5\n6\n");
        assert!(matches!(
            result,
            Err(FormatError::TokenCount { expected: 3, found: 2, line: 2, .. })
        ));
    }

    #[test]
    fn test_missing_instances() {
        let result = Parser::parse("2\n1 1 3\n3\n1\n1\n");
        assert!(matches!(
            result,
            Err(FormatError::UnexpectedEof { ref expected, line: 5 }) if expected == "instance header"
        ));
    }

    #[test]
    fn test_trailing_input() {
        let result = Parser::parse("1\n1 1 3\n3\n1\n1\n\n9 9\n");
        assert_eq!(result, Err(FormatError::TrailingInput { line: 7 }));
    }

    #[test]
    fn test_invalid_numbers() {
        let result = Parser::parse("1\n1 1 3\n3\n1.5\n1\n");
        assert!(matches!(
            result,
            Err(FormatError::InvalidNumber { ref text, line: 4, .. }) if text == "1.5"
        ));

        let result = Parser::parse("x\n");
        assert!(matches!(result, Err(FormatError::InvalidNumber { line: 1, .. })));

        let result = Parser::parse("1\n1 1 3\n3\n-1\n1\n");
        assert!(matches!(result, Err(FormatError::InvalidNumber { .. })));
    }

    #[test]
    fn test_invalid_instance_is_wrapped() {
        let result = Parser::parse("1\n1 1 3\n-3\n1\n1\n");
        assert!(matches!(
            result,
            Err(FormatError::Instance {
                index: 0,
                line: 5,
                source: InstanceError::InvalidProfit { project: 0, .. },
            })
        ));

        let result = Parser::parse("1\n0 1 3\n1\n");
        assert!(matches!(
            result,
            Err(FormatError::Instance { source: InstanceError::NoProjects, .. })
        ));
    }

    #[test]
    fn test_huge_instance_count() {
        let result = Parser::parse("1000000000000000000\n1 1 3\n3\n1\n1\n");
        assert!(matches!(
            result,
            Err(FormatError::UnexpectedEof { ref expected, line: 5 }) if expected == "instance header"
        ));
    }

    #[test]
    fn test_huge_project_count() {
        let result = Parser::parse("1\n1000000000000000000 1 3\n3\n1\n1\n");
        assert!(matches!(
            result,
            Err(FormatError::UnexpectedEof { ref expected, line: 5 }) if expected == "profits"
        ));
    }

    #[test]
    fn test_huge_resource_count() {
        let result = Parser::parse("1\n2 1000000000000000000 3\n3 4\n1 1\n");
        assert!(matches!(
            result,
            Err(FormatError::UnexpectedEof { ref expected, line: 4 }) if expected == "resource row 1"
        ));

        let result = Parser::parse("1\n0 1000000000000000000 3\n");
        assert!(matches!(
            result,
            Err(FormatError::Instance { source: InstanceError::NoProjects, line: 2, .. })
        ));
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(
            Parser::parse("\n\n"),
            Err(FormatError::UnexpectedEof {
                expected: "instance count".to_string(),
                line: 0,
            })
        );
    }
}
