//! Textual rule syntax for configuration files.
//!
//! Rules are written as `name` or `name(arg, ...)`:
//!
//! - entry: `always`, `price_above(104.5)`, `price_below(98.0)`,
//!   `ma_crossover(3, 8)`
//! - exit: `never`, `profit_target(2.5)`, `price_below(98.0)`,
//!   `ma_crossunder(3, 8)`
//!
//! Errors carry the byte position of the offending token so the CLI can
//! point a caret at it.

use crate::domain::error::ParseError;
use crate::domain::strategy::{EntryRule, ExitRule};

pub fn parse_entry(input: &str) -> Result<EntryRule, ParseError> {
    let form = parse_form(input)?;
    match form.name.as_str() {
        "always" => {
            form.expect_args(0)?;
            Ok(EntryRule::Always)
        }
        "price_above" => {
            form.expect_args(1)?;
            Ok(EntryRule::PriceAbove(form.price_arg(0)?))
        }
        "price_below" => {
            form.expect_args(1)?;
            Ok(EntryRule::PriceBelow(form.price_arg(0)?))
        }
        "ma_crossover" => {
            form.expect_args(2)?;
            Ok(EntryRule::MaCrossover {
                short: form.period_arg(0)?,
                long: form.period_arg(1)?,
            })
        }
        other => Err(ParseError {
            message: format!("unknown entry rule '{}'", other),
            position: form.name_position,
        }),
    }
}

pub fn parse_exit(input: &str) -> Result<ExitRule, ParseError> {
    let form = parse_form(input)?;
    match form.name.as_str() {
        "never" => {
            form.expect_args(0)?;
            Ok(ExitRule::Never)
        }
        "profit_target" => {
            form.expect_args(1)?;
            Ok(ExitRule::ProfitTarget {
                pct: form.price_arg(0)?,
            })
        }
        "price_below" => {
            form.expect_args(1)?;
            Ok(ExitRule::PriceBelow(form.price_arg(0)?))
        }
        "ma_crossunder" => {
            form.expect_args(2)?;
            Ok(ExitRule::MaCrossunder {
                short: form.period_arg(0)?,
                long: form.period_arg(1)?,
            })
        }
        other => Err(ParseError {
            message: format!("unknown exit rule '{}'", other),
            position: form.name_position,
        }),
    }
}

/// A parsed `name(args)` form; argument positions are byte offsets into the
/// original input.
struct RuleForm {
    name: String,
    name_position: usize,
    args: Vec<(String, usize)>,
}

impl RuleForm {
    fn expect_args(&self, count: usize) -> Result<(), ParseError> {
        if self.args.len() != count {
            return Err(ParseError {
                message: format!(
                    "rule '{}' takes {} argument(s), found {}",
                    self.name,
                    count,
                    self.args.len()
                ),
                position: self.name_position,
            });
        }
        Ok(())
    }

    fn arg(&self, index: usize) -> Result<&(String, usize), ParseError> {
        self.args.get(index).ok_or_else(|| ParseError {
            message: format!("rule '{}' is missing argument {}", self.name, index + 1),
            position: self.name_position,
        })
    }

    fn price_arg(&self, index: usize) -> Result<f64, ParseError> {
        let (text, position) = self.arg(index)?;
        text.parse::<f64>().map_err(|_| ParseError {
            message: format!("expected a number, found '{}'", text),
            position: *position,
        })
    }

    fn period_arg(&self, index: usize) -> Result<usize, ParseError> {
        let (text, position) = self.arg(index)?;
        text.parse::<usize>().map_err(|_| ParseError {
            message: format!("expected a whole number of bars, found '{}'", text),
            position: *position,
        })
    }
}

fn parse_form(input: &str) -> Result<RuleForm, ParseError> {
    let trimmed = input.trim_start();
    let name_position = input.len() - trimmed.len();
    let trimmed = trimmed.trim_end();

    if trimmed.is_empty() {
        return Err(ParseError {
            message: "empty rule".into(),
            position: 0,
        });
    }

    let (name, rest) = match trimmed.find('(') {
        None => (trimmed, None),
        Some(open) => {
            if !trimmed.ends_with(')') {
                return Err(ParseError {
                    message: "missing closing parenthesis".into(),
                    position: name_position + trimmed.len(),
                });
            }
            let inner = &trimmed[open + 1..trimmed.len() - 1];
            (&trimmed[..open], Some((inner, name_position + open + 1)))
        }
    };

    let name = name.trim_end();
    if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(ParseError {
            message: format!("invalid rule name '{}'", name),
            position: name_position,
        });
    }

    let mut args = Vec::new();
    if let Some((inner, inner_position)) = rest {
        if !inner.trim().is_empty() {
            let mut offset = 0;
            for piece in inner.split(',') {
                let arg = piece.trim();
                let arg_position = inner_position + offset + (piece.len() - piece.trim_start().len());
                if arg.is_empty() {
                    return Err(ParseError {
                        message: "empty argument".into(),
                        position: arg_position,
                    });
                }
                args.push((arg.to_string(), arg_position));
                offset += piece.len() + 1;
            }
        }
    }

    Ok(RuleForm {
        name: name.to_lowercase(),
        name_position,
        args,
    })
}
