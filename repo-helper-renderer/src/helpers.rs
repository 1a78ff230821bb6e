//! Filters and functions registered on every engine.
//!
//! | name            | kind     | use                                            |
//! |-----------------|----------|------------------------------------------------|
//! | `enquote_value` | filter   | render a value as a Python literal             |
//! | `underline`     | filter   | reST rule as long as the input (`char="="`)     |
//! | `bash_block`    | function | fenced shell block for Markdown or Sphinx      |

use std::collections::HashMap;

use tera::{Tera, Value};

pub(crate) fn register(tera: &mut Tera) {
    tera.register_filter("enquote_value", enquote_value_filter);
    tera.register_filter("underline", underline_filter);
    tera.register_function("bash_block", bash_block_fn);
}

// ---------------------------------------------------------------------------
// enquote_value
// ---------------------------------------------------------------------------

/// Python literal for a JSON value: `'text'`, `True`, `None`, `[1, 'a']`, `{'k': 'v'}`.
pub fn enquote_value(value: &Value) -> String {
    match value {
        Value::Null => "None".to_owned(),
        Value::Bool(true) => "True".to_owned(),
        Value::Bool(false) => "False".to_owned(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => quote_str(s),
        Value::Array(items) => {
            let inner: Vec<String> = items.iter().map(enquote_value).collect();
            format!("[{}]", inner.join(", "))
        }
        Value::Object(map) => {
            let inner: Vec<String> = map
                .iter()
                .map(|(k, v)| format!("{}: {}", quote_str(k), enquote_value(v)))
                .collect();
            format!("{{{}}}", inner.join(", "))
        }
    }
}

/// Single quotes unless the text contains one and no double quote.
fn quote_str(s: &str) -> String {
    let escaped = s.replace('\\', "\\\\");
    if s.contains('\'') && !s.contains('"') {
        format!("\"{escaped}\"")
    } else {
        format!("'{}'", escaped.replace('\'', "\\'"))
    }
}

fn enquote_value_filter(value: &Value, _args: &HashMap<String, Value>) -> tera::Result<Value> {
    Ok(Value::String(enquote_value(value)))
}

// ---------------------------------------------------------------------------
// underline
// ---------------------------------------------------------------------------

fn underline_filter(value: &Value, args: &HashMap<String, Value>) -> tera::Result<Value> {
    let text = value
        .as_str()
        .ok_or_else(|| tera::Error::msg("underline: value must be a string"))?;
    let rule = args.get("char").and_then(Value::as_str).unwrap_or("=");
    Ok(Value::String(rule.repeat(text.chars().count())))
}

// ---------------------------------------------------------------------------
// bash_block
// ---------------------------------------------------------------------------

/// Fenced shell block. GitHub Markdown style by default; with `sphinx` set,
/// a `.. prompt:: bash` directive.
pub fn bash_block(commands: &[String], sphinx: bool) -> String {
    let mut out = String::new();
    if sphinx {
        out.push_str(".. prompt:: bash\n\n");
        for command in commands {
            out.push_str("    ");
            out.push_str(command);
            out.push('\n');
        }
    } else {
        out.push_str("```bash\n");
        for command in commands {
            out.push_str(command);
            out.push('\n');
        }
        out.push_str("```\n");
    }
    out
}

fn bash_block_fn(args: &HashMap<String, Value>) -> tera::Result<Value> {
    let commands = match args.get("commands") {
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| {
                item.as_str()
                    .map(str::to_owned)
                    .ok_or_else(|| tera::Error::msg("bash_block: commands must be strings"))
            })
            .collect::<tera::Result<Vec<_>>>()?,
        Some(Value::String(single)) => vec![single.clone()],
        _ => return Err(tera::Error::msg("bash_block: missing `commands` argument")),
    };
    let sphinx = args.get("sphinx").and_then(Value::as_bool).unwrap_or(false);
    Ok(Value::String(bash_block(&commands, sphinx)))
}
