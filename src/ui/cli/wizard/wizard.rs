use anyhow::{Context, Result};
use serde_json::{Map, Value};
use strum::{EnumMessage, IntoEnumIterator};

use crate::ui::cli::drivers::PromptDriver;
use crate::ui::types::choices::{FieldKind, FieldSpec, UIChoice, specs_for_kind};

const DIM_ITALIC: &str = "\x1b[2m\x1b[3m";
const RESET: &str = "\x1b[0m";

fn kind_label<K>(kind: K) -> String
where
    K: Copy + Into<&'static str> + EnumMessage,
{
    let label = kind.get_message().unwrap_or_else(|| kind.into());
    match kind.get_detailed_message() {
        Some(desc) if !desc.is_empty() => format!("{label}  {DIM_ITALIC}{desc}{RESET}"),
        _ => label.to_string(),
    }
}

/// Asks for a variant of `C`, then for each of its parameters using the
/// titles, ranges and defaults of `C`'s JSON schema.
pub fn prompt_choice<C: UIChoice, D: PromptDriver>(driver: &D) -> Result<C> {
    let kinds: Vec<C::Kind> = C::Kind::iter().collect();
    let labels: Vec<String> = kinds.iter().map(|k| kind_label(*k)).collect();

    let picked = driver.choose(C::prompt_label(), C::prompt_help(), &labels)?;
    let kind = *kinds
        .get(picked)
        .with_context(|| format!("selection {picked} out of range"))?;

    let key: &'static str = kind.into();
    let specs = specs_for_kind(&C::schema(), key)?;
    let defaults = C::default_params(kind);

    let mut params = Map::new();
    for spec in &specs {
        let init = spec
            .default
            .clone()
            .filter(|v| !v.is_null())
            .or_else(|| defaults.get(&spec.name).cloned());

        if let Some(value) = ask_field(driver, spec, init)? {
            params.insert(spec.name.clone(), value);
        }
    }

    C::from_parts(kind, Value::Object(params))
}

fn ask_field<D: PromptDriver>(
    driver: &D,
    spec: &FieldSpec,
    init: Option<Value>,
) -> Result<Option<Value>> {
    let help = spec.help();
    let init = init.filter(|v| !v.is_null());

    let optional_numeric = spec.nullable
        && !spec.required
        && matches!(spec.kind, FieldKind::Integer | FieldKind::Number)
        && init.is_none();
    if optional_numeric {
        return ask_optional_number(driver, spec);
    }

    let value = match spec.kind {
        FieldKind::Boolean => {
            let def = init.and_then(|v| v.as_bool()).unwrap_or(false);
            Value::Bool(driver.ask_bool(&spec.title, help, def)?)
        }
        FieldKind::String => {
            let def = init
                .and_then(|v| v.as_str().map(str::to_string))
                .unwrap_or_default();
            Value::String(driver.ask_string(&spec.title, help, &def)?)
        }
        FieldKind::Integer => {
            let def = init.and_then(|v| v.as_u64()).unwrap_or(0);
            let lo = spec.min.map(|x| x.max(0.0) as u64);
            let hi = spec.max.map(|x| x.max(0.0) as u64);
            Value::from(driver.ask_u64(&spec.title, help, def, lo, hi)?)
        }
        FieldKind::Number => {
            let def = init.and_then(|v| v.as_f64()).unwrap_or(0.0);
            Value::from(driver.ask_f64(&spec.title, help, def, spec.min, spec.max)?)
        }
    };
    Ok(Some(value))
}

/// Free-text prompt where a blank answer leaves the field unset.
fn ask_optional_number<D: PromptDriver>(driver: &D, spec: &FieldSpec) -> Result<Option<Value>> {
    let answer = driver.ask_string(
        &spec.title,
        &format!("{}\n(leave blank for none)", spec.help()),
        "",
    )?;
    let answer = answer.trim();
    if answer.is_empty() {
        return Ok(None);
    }

    let value = if spec.kind == FieldKind::Integer {
        let n: u64 = answer
            .parse()
            .with_context(|| format!("invalid integer for {}", spec.title))?;
        Value::from(n)
    } else {
        let x: f64 = answer
            .parse()
            .with_context(|| format!("invalid number for {}", spec.title))?;
        Value::from(x)
    };
    Ok(Some(value))
}
