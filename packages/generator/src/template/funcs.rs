//! Template functions
//!
//! `opt` and `hasOpt` read `Definition.Options` first and fall back to
//! `Global.Options` in the render data.

use super::value::Value;

pub const BUILTINS: &[&str] = &["join", "conjoin", "opt", "hasOpt", "eq", "not", "upper", "lower"];

pub fn is_builtin(name: &str) -> bool {
    BUILTINS.contains(&name)
}

/// Join items into an English list: "a", "a and b", "a, b, and c".
pub fn conjoin(conj: &str, items: &[String]) -> String {
    match items {
        [] => String::new(),
        [only] => only.clone(),
        [first, second] => format!("{} {} {}", first, conj, second),
        [init @ .., last] => format!("{}, {} {}", init.join(", "), conj, last),
    }
}

fn option_value<'v>(root: &'v Value, name: &str) -> Option<&'v Value> {
    ["Definition", "Global"]
        .iter()
        .find_map(|scope| root.get(scope)?.get("Options")?.get(name))
}

fn arity(name: &str, args: &[Value], expected: usize) -> Result<(), String> {
    if args.len() == expected {
        Ok(())
    } else {
        Err(format!(
            "wrong number of args for {}: want {} got {}",
            name,
            expected,
            args.len()
        ))
    }
}

fn string_arg(name: &str, value: &Value) -> Result<String, String> {
    match value {
        Value::Str(s) => Ok(s.clone()),
        other => Err(format!("{} expects a string, got {}", name, other.kind())),
    }
}

fn list_arg(name: &str, value: &Value) -> Result<Vec<String>, String> {
    match value {
        Value::List(items) => items.iter().map(Value::print).collect(),
        Value::Null => Ok(Vec::new()),
        other => Err(format!("{} expects a list, got {}", name, other.kind())),
    }
}

/// Call a builtin. `root` is the full render data.
pub fn call(root: &Value, name: &str, args: Vec<Value>) -> Result<Value, String> {
    match name {
        "join" => {
            arity(name, &args, 2)?;
            let sep = string_arg(name, &args[0])?;
            Ok(Value::Str(list_arg(name, &args[1])?.join(&sep)))
        }
        "conjoin" => {
            arity(name, &args, 2)?;
            let conj = string_arg(name, &args[0])?;
            Ok(Value::Str(conjoin(&conj, &list_arg(name, &args[1])?)))
        }
        "opt" => {
            arity(name, &args, 1)?;
            let key = string_arg(name, &args[0])?;
            option_value(root, &key)
                .cloned()
                .ok_or_else(|| format!("option {:?} is not set", key))
        }
        "hasOpt" => {
            arity(name, &args, 1)?;
            let key = string_arg(name, &args[0])?;
            Ok(Value::Bool(option_value(root, &key).is_some()))
        }
        "eq" => {
            if args.len() < 2 {
                return Err(String::from("missing argument for comparison"));
            }
            Ok(Value::Bool(args[1..].iter().any(|other| *other == args[0])))
        }
        "not" => {
            arity(name, &args, 1)?;
            Ok(Value::Bool(!args[0].is_truthy()))
        }
        "upper" => {
            arity(name, &args, 1)?;
            Ok(Value::Str(args[0].print()?.to_uppercase()))
        }
        "lower" => {
            arity(name, &args, 1)?;
            Ok(Value::Str(args[0].print()?.to_lowercase()))
        }
        _ => Err(format!("function {:?} not defined", name)),
    }
}
