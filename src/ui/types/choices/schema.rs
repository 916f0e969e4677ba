//! Reads prompt metadata for one choice variant out of its JSON schema.

use anyhow::{Context, Result, bail};
use schemars::Schema;
use serde_json::{Map, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    String,
    Integer,
    Number,
    Boolean,
}

impl FieldKind {
    fn from_type_name(name: &str) -> Option<Self> {
        match name {
            "string" => Some(Self::String),
            "integer" => Some(Self::Integer),
            "number" => Some(Self::Number),
            "boolean" => Some(Self::Boolean),
            _ => None,
        }
    }

    /// `"number"` or a nullable union such as `["number", "null"]`.
    fn detect(ty: Option<&Value>) -> Option<(Self, bool)> {
        match ty? {
            Value::String(s) => Self::from_type_name(s).map(|k| (k, false)),
            Value::Array(names) => {
                let names: Vec<&str> = names.iter().filter_map(Value::as_str).collect();
                let nullable = names.contains(&"null");
                names
                    .iter()
                    .find_map(|n| Self::from_type_name(n))
                    .map(|k| (k, nullable))
            }
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldSpec {
    pub name: String,
    pub title: String,
    pub description: Option<String>,
    pub required: bool,
    pub nullable: bool,
    pub kind: FieldKind,
    pub default: Option<Value>,
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl FieldSpec {
    /// `None` for fields whose type the wizard cannot prompt for.
    fn from_schema(name: &str, field: &Map<String, Value>, required: bool) -> Option<Self> {
        let (kind, nullable) = FieldKind::detect(field.get("type"))?;
        let text = |key: &str| field.get(key).and_then(Value::as_str).map(str::to_string);
        let bound = |inclusive: &str, exclusive: &str| {
            field
                .get(inclusive)
                .or_else(|| field.get(exclusive))
                .and_then(Value::as_f64)
        };

        Some(Self {
            name: name.to_string(),
            title: text("title").unwrap_or_else(|| name.to_string()),
            description: text("description"),
            required,
            nullable,
            kind,
            default: field.get("default").cloned(),
            min: bound("minimum", "exclusiveMinimum"),
            max: bound("maximum", "exclusiveMaximum"),
        })
    }

    pub fn help(&self) -> &str {
        self.description.as_deref().unwrap_or("")
    }
}

/// Field specs of the `params` object of the variant tagged `kind_key`, in
/// declaration order. A unit variant yields no fields.
pub fn specs_for_kind(root: &Schema, kind_key: &str) -> Result<Vec<FieldSpec>> {
    let root = root.as_object().context("root schema is not an object")?;
    let branch = find_branch(root, kind_key)?;

    let Some(params) = branch.get("params").and_then(Value::as_object) else {
        return Ok(vec![]);
    };
    let params = resolve_ref(root, params)
        .with_context(|| format!("unresolved params $ref for type={kind_key}"))?;
    let Some(props) = params.get("properties").and_then(Value::as_object) else {
        return Ok(vec![]);
    };

    let required: Vec<&str> = params
        .get("required")
        .and_then(Value::as_array)
        .map(|a| a.iter().filter_map(Value::as_str).collect())
        .unwrap_or_default();

    let mut out = Vec::with_capacity(props.len());
    for (name, field) in props {
        let field = field
            .as_object()
            .with_context(|| format!("field schema for '{name}' is not an object"))?;
        let field = resolve_ref(root, field)
            .with_context(|| format!("unresolved $ref for field '{name}'"))?;
        if let Some(spec) = FieldSpec::from_schema(name, field, required.contains(&name.as_str())) {
            out.push(spec);
        }
    }
    Ok(out)
}

/// Properties of the `oneOf`/`anyOf` branch whose `type` discriminant is
/// `kind_key`.
fn find_branch<'a>(root: &'a Map<String, Value>, kind_key: &str) -> Result<&'a Map<String, Value>> {
    let branches = root
        .get("oneOf")
        .or_else(|| root.get("anyOf"))
        .and_then(Value::as_array)
        .context("schema has no oneOf/anyOf")?;

    let found = branches
        .iter()
        .filter_map(|b| b.get("properties")?.as_object())
        .find(|props| {
            props
                .get("type")
                .is_some_and(|tag| tag_names(tag).any(|k| k == kind_key))
        });

    match found {
        Some(props) => Ok(props),
        None => bail!("no branch found for type={kind_key}"),
    }
}

fn tag_names(tag: &Value) -> impl Iterator<Item = &str> {
    let konst = tag.get("const").and_then(Value::as_str);
    let single = tag
        .get("enum")
        .and_then(Value::as_array)
        .filter(|a| a.len() == 1)
        .and_then(|a| a[0].as_str());
    konst.into_iter().chain(single)
}

/// Follows a local `#/...` JSON pointer; objects without `$ref` pass through.
fn resolve_ref<'a>(
    root: &'a Map<String, Value>,
    obj: &'a Map<String, Value>,
) -> Option<&'a Map<String, Value>> {
    let Some(reference) = obj.get("$ref") else {
        return Some(obj);
    };
    let path = reference.as_str()?.strip_prefix("#/")?;
    path.split('/').try_fold(root, |cur, seg| {
        let seg = seg.replace("~1", "/").replace("~0", "~");
        cur.get(&seg)?.as_object()
    })
}
