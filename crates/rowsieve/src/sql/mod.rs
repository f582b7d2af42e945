
use crate::{
    expr::{check_arity, child_slices, EvalError, Expr},
    path::{PathError, PropertyPath},
    sort::SortMethod,
    value::Value,
};
use thiserror::Error as ThisError;

///
/// RenderError
///

#[derive(Clone, Debug, PartialEq, ThisError)]
pub enum RenderError {
    #[error(transparent)]
    Path(#[from] PathError),

    #[error(transparent)]
    Eval(#[from] EvalError),

    #[error("cannot render `{function}` over a {shape} operand")]
    UnsupportedShape {
        function: &'static str,
        shape: &'static str,
    },
}

///
/// SqlClause
///
/// A rendered SQL fragment plus the parameters its numbered placeholders
/// (`?0`, `?1`, ...) bind to, numbered in the order the parameters appear.
///

#[derive(Clone, Debug, Default, PartialEq)]
pub struct SqlClause {
    text: String,
    params: Vec<Value>,
}

impl SqlClause {
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn params(&self) -> &[Value] {
        &self.params
    }

    #[must_use]
    pub fn into_parts(self) -> (String, Vec<Value>) {
        (self.text, self.params)
    }
}

///
/// JoinResolver
///
/// Consumed collaborator mapping a property path to the SQL column reference
/// that addresses it in the query under construction. Takes `&mut self`
/// because resolving a path may register new joins.
///

pub trait JoinResolver {
    fn column_reference(&mut self, path: &PropertyPath) -> Result<String, PathError>;
}

/// Render a boolean condition to a WHERE-clause fragment.
///
/// All paths are resolved up front into a flat column list positionally
/// aligned to [`Expr::paths`]; the tree walk then slices that list exactly
/// like the in-memory `apply` slices its value row.
pub fn render_condition<R>(condition: &Expr, resolver: &mut R) -> Result<SqlClause, RenderError>
where
    R: JoinResolver,
{
    let paths = condition.paths();
    let mut columns = Vec::with_capacity(paths.len());
    for path in paths {
        columns.push(resolver.column_reference(path)?);
    }

    log::debug!("rendering condition over {} columns", columns.len());

    let mut params = Vec::new();
    let text = render(condition, &columns, &mut params)?;

    Ok(SqlClause { text, params })
}

/// Render a sort method list to the item list of an ORDER BY clause.
pub fn render_order_by<R>(sort_methods: &[SortMethod], resolver: &mut R) -> Result<String, RenderError>
where
    R: JoinResolver,
{
    let mut items = Vec::with_capacity(sort_methods.len());
    for method in sort_methods {
        let column = resolver.column_reference(method.path())?;
        let direction = if method.direction().is_ascending() {
            "ASC"
        } else {
            "DESC"
        };
        items.push(format!("{column} {direction}"));
    }

    Ok(items.join(", "))
}

fn render(expr: &Expr, columns: &[String], params: &mut Vec<Value>) -> Result<String, RenderError> {
    match expr {
        Expr::Value(value) => Ok(bind(value.clone(), params)),
        Expr::Property(_) => Ok(columns[0].clone()),

        Expr::AllTrue(children) => {
            check_arity("allTrue", children, 1)?;
            connective(children, columns, params, " AND ")
        }
        Expr::AnyTrue(children) => {
            check_arity("anyTrue", children, 1)?;
            connective(children, columns, params, " OR ")
        }
        Expr::Not(child) => Ok(format!("NOT ({})", render(child, columns, params)?)),

        Expr::AllEqual(children) => {
            check_arity("allEqual", children, 2)?;
            let rendered = render_each(children, columns, params)?;
            let pairs: Vec<String> = rendered[1..]
                .iter()
                .map(|right| format!("{} = {right}", rendered[0]))
                .collect();
            Ok(group(&pairs, " AND "))
        }
        Expr::AnyEqual(children) => {
            check_arity("anyEqual", children, 2)?;
            let rendered = render_each(children, columns, params)?;
            let mut pairs = Vec::new();
            for (index, left) in rendered.iter().enumerate() {
                for right in &rendered[index + 1..] {
                    pairs.push(format!("{left} = {right}"));
                }
            }
            Ok(group(&pairs, " OR "))
        }

        Expr::Greater(lhs, rhs) => binary(lhs, rhs, columns, params, ">"),
        Expr::GreaterEquals(lhs, rhs) => binary(lhs, rhs, columns, params, ">="),
        Expr::Smaller(lhs, rhs) => binary(lhs, rhs, columns, params, "<"),
        Expr::SmallerEquals(lhs, rhs) => binary(lhs, rhs, columns, params, "<="),

        Expr::Between { min, max, value } => {
            // parameters bind in declaration order: min, max, value
            let first = min.path_count();
            let second = first + max.path_count();
            let min_sql = render(min, &columns[..first], params)?;
            let max_sql = render(max, &columns[first..second], params)?;
            let value_sql = render(value, &columns[second..], params)?;
            Ok(format!("({value_sql} BETWEEN {min_sql} AND {max_sql})"))
        }

        Expr::OneOf { haystack, needle } => {
            let Expr::Value(Value::List(items)) = haystack.as_ref() else {
                return Err(RenderError::UnsupportedShape {
                    function: "oneOf",
                    shape: "non-literal haystack",
                });
            };
            if items.is_empty() {
                return Ok("1 = 0".to_string());
            }
            // the literal haystack declares no paths, so every column is the
            // needle's
            let needle_sql = render(needle, columns, params)?;
            let bound: Vec<String> = items
                .iter()
                .map(|item| bind(item.clone(), params))
                .collect();
            Ok(format!("{needle_sql} IN ({})", bound.join(", ")))
        }
        Expr::MemberOf { needle, haystack } => {
            let split = needle.path_count();
            let needle_sql = render(needle, &columns[..split], params)?;
            let haystack_sql = render(haystack, &columns[split..], params)?;
            Ok(format!("({needle_sql} MEMBER OF {haystack_sql})"))
        }

        Expr::Sum(children) => {
            check_arity("sum", children, 2)?;
            let rendered = render_each(children, columns, params)?;
            Ok(group(&rendered, " + "))
        }
        Expr::Product(children) => {
            check_arity("product", children, 2)?;
            let rendered = render_each(children, columns, params)?;
            Ok(group(&rendered, " * "))
        }

        Expr::StringContains { haystack, needle } => {
            like(haystack, needle, columns, params, true, true)
        }
        Expr::StartsWith { haystack, needle } => {
            like(haystack, needle, columns, params, false, true)
        }
        Expr::EndsWith { haystack, needle } => {
            like(haystack, needle, columns, params, true, false)
        }

        Expr::IsNull(child) => Ok(format!("({} IS NULL)", render(child, columns, params)?)),
        Expr::Lower(child) => Ok(format!("LOWER({})", render(child, columns, params)?)),
        Expr::Upper(child) => Ok(format!("UPPER({})", render(child, columns, params)?)),
        Expr::Size(child) => Ok(format!("SIZE({})", render(child, columns, params)?)),
    }
}

fn render_each(
    children: &[Expr],
    columns: &[String],
    params: &mut Vec<Value>,
) -> Result<Vec<String>, RenderError> {
    let mut rendered = Vec::with_capacity(children.len());
    for (child, slice) in child_slices(children, columns) {
        rendered.push(render(child, slice, params)?);
    }

    Ok(rendered)
}

fn connective(
    children: &[Expr],
    columns: &[String],
    params: &mut Vec<Value>,
    separator: &str,
) -> Result<String, RenderError> {
    let rendered = render_each(children, columns, params)?;
    Ok(group(&rendered, separator))
}

fn binary(
    lhs: &Expr,
    rhs: &Expr,
    columns: &[String],
    params: &mut Vec<Value>,
    operator: &str,
) -> Result<String, RenderError> {
    let split = lhs.path_count();
    let left = render(lhs, &columns[..split], params)?;
    let right = render(rhs, &columns[split..], params)?;

    Ok(format!("({left} {operator} {right})"))
}

// Case-insensitive LIKE. A literal needle folds into one escaped pattern
// parameter; anything else falls back to the CONCAT form.
fn like(
    haystack: &Expr,
    needle: &Expr,
    columns: &[String],
    params: &mut Vec<Value>,
    leading: bool,
    trailing: bool,
) -> Result<String, RenderError> {
    let split = haystack.path_count();
    let haystack_sql = render(haystack, &columns[..split], params)?;

    if let Expr::Value(Value::Text(text)) = needle {
        let mut pattern = String::new();
        if leading {
            pattern.push('%');
        }
        pattern.push_str(&escape_like(&text.to_lowercase()));
        if trailing {
            pattern.push('%');
        }
        let param = bind(Value::Text(pattern), params);
        return Ok(format!("LOWER({haystack_sql}) LIKE {param}"));
    }

    let needle_sql = render(needle, &columns[split..], params)?;
    let mut pieces = Vec::with_capacity(3);
    if leading {
        pieces.push("'%'".to_string());
    }
    pieces.push(format!("LOWER({needle_sql})"));
    if trailing {
        pieces.push("'%'".to_string());
    }

    Ok(format!(
        "LOWER({haystack_sql}) LIKE CONCAT({})",
        pieces.join(", ")
    ))
}

// Escape LIKE metacharacters so a literal needle matches itself.
fn escape_like(needle: &str) -> String {
    let mut escaped = String::with_capacity(needle.len());
    for c in needle.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

fn bind(value: Value, params: &mut Vec<Value>) -> String {
    let index = params.len();
    params.push(value);
    format!("?{index}")
}

fn group(pieces: &[String], separator: &str) -> String {
    if pieces.len() == 1 {
        pieces[0].clone()
    } else {
        format!("({})", pieces.join(separator))
    }
}
