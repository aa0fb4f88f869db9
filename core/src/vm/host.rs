//! file: core/src/vm/host.rs
//! description: the print routine as seen by the interpreter.
//!
//! Calls to the configured print external land here. A leading string
//! argument is treated as a printf-style format where `%d` consumes the
//! next integer and `%%` is a literal percent sign; without one the
//! integers are printed separated by spaces and followed by a newline.
//!
use crate::ir::IrModule;
use crate::vm::value::Value;

pub(crate) fn run_print(module: &IrModule, args: &[Value]) -> Result<String, String> {
    let (format, rest) = match args.split_first() {
        Some((Value::Str(g), rest)) => {
            let f = module.global(*g).ok_or_else(|| format!("print: unknown string global {}", g))?;
            (Some(f), rest)
        }
        _ => (None, args),
    };

    let mut ints = Vec::with_capacity(rest.len());
    for v in rest {
        match v {
            Value::Int(i) => ints.push(*i),
            other => return Err(format!("print: cannot print a {}", other.describe())),
        }
    }

    let Some(format) = format else {
        let line = ints.iter().map(|i| i.to_string()).collect::<Vec<_>>().join(" ");
        return Ok(format!("{}\n", line));
    };

    let mut out = String::new();
    let mut next = ints.into_iter();
    let mut chars = format.chars();
    while let Some(ch) = chars.next() {
        if ch != '%' {
            out.push(ch);
            continue;
        }
        match chars.next() {
            Some('%') => out.push('%'),
            Some('d') | Some('i') => {
                let v = next.next().ok_or_else(|| "print: format expects more arguments".to_string())?;
                out.push_str(&v.to_string());
            }
            Some(other) => return Err(format!("print: unsupported conversion '%{}'", other)),
            None => return Err("print: format string ends with '%'".to_string()),
        }
    }
    Ok(out)
}
