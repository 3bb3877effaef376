// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use console::style;
use kestrel_vm::ecmascript::{
    abstract_operations::{
        operations_on_objects::call, type_conversion::string_to_number,
    },
    builtins::{
        ArgumentsList, Array, ordinary::type_feedback::CompareSite,
    },
    execution::{Agent, ExceptionType, JsError, JsResult},
    types::{OrdinaryObject, PropertyKey, Value},
};

/// Parse a REPL literal: `undefined`, `null`, `true`, `false`, a number or
/// a string. Strings may be quoted with `"` or `'`; anything that is not
/// another literal is taken as a string.
pub fn parse_literal(agent: &mut Agent, text: &str) -> Value {
    match text {
        "undefined" => return Value::Undefined,
        "null" => return Value::Null,
        "true" => return Value::Boolean(true),
        "false" => return Value::Boolean(false),
        "NaN" => return Value::nan(),
        _ => {}
    }
    let unquoted = text
        .strip_prefix('"')
        .and_then(|t| t.strip_suffix('"'))
        .or_else(|| text.strip_prefix('\'').and_then(|t| t.strip_suffix('\'')));
    if let Some(string) = unquoted {
        return Value::from_str(agent, string);
    }
    let number = string_to_number(text);
    if number.is_nan() {
        Value::from_str(agent, text)
    } else {
        Value::from(number)
    }
}

/// Parse command line numbers with StringToNumber.
///
/// Text that does not parse is a TypeError rather than NaN; only the literal
/// `NaN` gives NaN.
pub fn parse_numbers(agent: &mut Agent, texts: &[String]) -> JsResult<Vec<f64>> {
    texts
        .iter()
        .map(|text| {
            let number = string_to_number(text);
            if number.is_nan() && text.trim() != "NaN" {
                return Err(agent.throw_exception(
                    ExceptionType::TypeError,
                    format!("Cannot convert {text:?} to a Number"),
                ));
            }
            Ok(number)
        })
        .collect()
}

/// Sum the numbers with `Math.sumPrecise`.
pub fn sum_precise(agent: &mut Agent, numbers: &[f64]) -> JsResult<Value> {
    let values = numbers.iter().copied().map(Value::from).collect::<Vec<_>>();
    let items = Array::from_slice(agent, &values);
    let math = agent.current_realm().intrinsics().math();
    let key = PropertyKey::from_str(agent, "sumPrecise");
    let sum_precise = math.get(agent, key);
    call(
        agent,
        sum_precise,
        math.into(),
        Some(ArgumentsList::new(&[items.into_value()])),
    )
}

pub fn print_uncaught(agent: &Agent, error: JsError) {
    eprintln!("Uncaught exception: {}", error.to_display_string(agent));
}

/// Property store console state: a single object and the comparison sites
/// created by `eq` commands.
pub struct Session {
    object: OrdinaryObject,
    sites: Vec<CompareSite>,
}

impl Session {
    pub fn new(agent: &mut Agent) -> Self {
        Self {
            object: OrdinaryObject::create_empty_object(agent),
            sites: Vec::new(),
        }
    }

    /// Run one command. Returns the text to print, or None to exit.
    pub fn execute(&mut self, agent: &mut Agent, line: &str) -> JsResult<Option<String>> {
        let line = line.trim();
        let (command, rest) = line.split_once(' ').unwrap_or((line, ""));
        let rest = rest.trim();
        let (key, argument) = rest.split_once(' ').unwrap_or((rest, ""));
        let argument = argument.trim();
        let object = self.object;
        let output = match command {
            "exit" => return Ok(None),
            "" => String::new(),
            "set" if !key.is_empty() => {
                let key = PropertyKey::from_str(agent, key);
                let value = parse_literal(agent, argument);
                object.set(agent, key, value);
                value.to_display_string(agent)
            }
            "get" if !key.is_empty() => {
                let key = PropertyKey::from_str(agent, key);
                object.get(agent, key).to_display_string(agent)
            }
            "delete" if !key.is_empty() => {
                let key = PropertyKey::from_str(agent, key);
                object.delete(agent, key).to_string()
            }
            "keys" => {
                let keys = object.enumerate_keys().iter(agent).collect::<Vec<_>>();
                let keys = keys
                    .into_iter()
                    .map(|key| key.convert_to_value(agent).to_display_string(agent))
                    .collect::<Vec<_>>();
                let mode = if object.is_dictionary(agent) {
                    "dictionary"
                } else {
                    "shaped"
                };
                format!("[{}] {}", keys.join(", "), style(mode).dim())
            }
            "eq" if !key.is_empty() => {
                let key = PropertyKey::from_str(agent, key);
                let literal = parse_literal(agent, argument);
                let site = match self.sites.iter_mut().position(|site| site.key() == key) {
                    Some(index) => &mut self.sites[index],
                    None => {
                        self.sites.push(CompareSite::new(agent, key));
                        let last = self.sites.len() - 1;
                        &mut self.sites[last]
                    }
                };
                let result = site.compare_equals(agent, object.into(), literal)?;
                let counts = format!(
                    "(fast {}, generic {})",
                    site.fast_comparisons(),
                    site.generic_comparisons()
                );
                format!("{result} {}", style(counts).dim())
            }
            "tag" if !key.is_empty() => {
                let key = PropertyKey::from_str(agent, key);
                match object.property_type_tag(agent, key) {
                    Some(tag) => tag.name().to_string(),
                    None => "absent".to_string(),
                }
            }
            _ => format!(
                "{} set <key> <value> | get <key> | delete <key> | keys | eq <key> <literal> | tag <key> | exit",
                style("usage:").red()
            ),
        };
        Ok(Some(output))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn session_commands() {
        let mut agent = Agent::default();
        let mut session = Session::new(&mut agent);
        let mut run = |agent: &mut Agent, line: &str| session.execute(agent, line).unwrap();
        assert_eq!(run(&mut agent, "set b 1").as_deref(), Some("1"));
        run(&mut agent, "set a \"hello\"");
        run(&mut agent, "set 0 null");
        assert_eq!(run(&mut agent, "get a").as_deref(), Some("\"hello\""));
        assert_eq!(run(&mut agent, "tag a").as_deref(), Some("string"));
        assert_eq!(run(&mut agent, "tag zz").as_deref(), Some("absent"));
        assert!(run(&mut agent, "eq b '1'").unwrap().starts_with("true"));
        assert!(run(&mut agent, "eq a hello").unwrap().starts_with("true"));
        assert!(run(&mut agent, "keys").unwrap().starts_with("[\"0\", \"b\", \"a\"]"));
        assert_eq!(run(&mut agent, "delete b").as_deref(), Some("true"));
        assert_eq!(run(&mut agent, "get b").as_deref(), Some("undefined"));
        assert_eq!(run(&mut agent, "exit"), None);
    }

    #[test]
    fn unparsable_numbers_are_type_errors() {
        let mut agent = Agent::default();
        let texts = ["1", " 0x10 ", "-2.5e1", "NaN"].map(String::from);
        let numbers = parse_numbers(&mut agent, &texts).unwrap();
        assert_eq!(numbers[..3], [1.0, 16.0, -25.0]);
        assert!(numbers[3].is_nan());

        let texts = ["1", "abc"].map(String::from);
        let error = parse_numbers(&mut agent, &texts).unwrap_err();
        assert_eq!(error.kind(&agent), Some(ExceptionType::TypeError));
        assert_eq!(
            error.to_display_string(&agent),
            "TypeError: Cannot convert \"abc\" to a Number"
        );
    }

    #[test]
    fn sums_precisely() {
        let mut agent = Agent::default();
        let sum = sum_precise(&mut agent, &[1e20, 0.1, -1e20]).unwrap();
        assert_eq!(sum, Value::from(0.1));
    }
}
