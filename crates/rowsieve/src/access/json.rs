use crate::{access::PropertyAccessor, path::PathError, value::Value};
use serde_json::Value as Json;

///
/// JsonAccessor
///
/// Reference `PropertyAccessor` over `serde_json::Value` object graphs.
/// Objects are entities, arrays are to-many relationships, null is an absent
/// to-one.
///

#[derive(Clone, Copy, Debug, Default)]
pub struct JsonAccessor;

impl PropertyAccessor<Json> for JsonAccessor {
    fn values_by_path(
        &self,
        root: &Json,
        access_depth: usize,
        segments: &[String],
    ) -> Result<Vec<Value>, PathError> {
        let length = segments.len();
        if length == 0 {
            return Err(PathError::EmptyPath);
        }

        let mut frontier: Vec<&Json> = vec![root];

        for (index, segment) in segments.iter().enumerate() {
            let unpack = index >= length - access_depth;
            let terminal = index == length - 1;
            let mut next = Vec::with_capacity(frontier.len());

            for node in frontier {
                match read_segment(node, segment, segments, index)? {
                    None => {}
                    Some(Json::Array(items)) if unpack => next.extend(items.iter()),
                    Some(value @ Json::Array(_)) if terminal => next.push(value),
                    Some(Json::Array(_)) => {
                        return Err(PathError::UnexpectedToMany {
                            path: dotted_prefix(segments, index),
                        });
                    }
                    Some(value) => next.push(value),
                }
            }

            frontier = next;
        }

        frontier
            .into_iter()
            .filter(|node| !node.is_null())
            .map(|node| to_value(node, segments))
            .collect()
    }
}

// Read one segment off one frontier node. `Ok(None)` means the node resolved
// to nothing (absent to-one) and contributes no values.
fn read_segment<'a>(
    node: &'a Json,
    segment: &str,
    segments: &[String],
    index: usize,
) -> Result<Option<&'a Json>, PathError> {
    match node {
        Json::Null => Ok(None),
        Json::Object(map) => match map.get(segment) {
            Some(value) => Ok(Some(value)),
            None => Err(PathError::SegmentNotFound {
                segment: segment.to_string(),
                path: dotted_prefix(segments, index),
            }),
        },
        _ => Err(PathError::NotTraversable {
            segment: segment.to_string(),
            path: dotted_prefix(segments, index),
        }),
    }
}

fn to_value(node: &Json, segments: &[String]) -> Result<Value, PathError> {
    match node {
        Json::Null => Ok(Value::Null),
        Json::Bool(b) => Ok(Value::Bool(*b)),
        Json::String(s) => Ok(Value::Text(s.clone())),
        Json::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(Value::Int(i))
            } else if let Some(u) = n.as_u64() {
                Ok(Value::Uint(u))
            } else {
                // serde_json numbers outside i64/u64 are always f64.
                Ok(Value::Float(n.as_f64().unwrap_or(f64::NAN)))
            }
        }
        Json::Array(items) => items
            .iter()
            .map(|item| to_value(item, segments))
            .collect::<Result<Vec<_>, _>>()
            .map(Value::List),
        Json::Object(_) => Err(PathError::UnsupportedValue {
            path: segments.join("."),
        }),
    }
}

fn dotted_prefix(segments: &[String], index: usize) -> String {
    segments[..=index].join(".")
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn author() -> Json {
        json!({
            "name": "Ada",
            "pseudonym": null,
            "tags": ["classic", "scifi"],
            "books": [
                { "title": "A", "pages": 100 },
                { "title": "B", "pages": 250 },
            ],
        })
    }

    fn values(root: &Json, depth: usize, segments: &[&str]) -> Result<Vec<Value>, PathError> {
        let segments: Vec<String> = segments.iter().map(ToString::to_string).collect();
        JsonAccessor.values_by_path(root, depth, &segments)
    }

    #[test]
    fn reads_scalar_to_one() {
        assert_eq!(
            values(&author(), 1, &["name"]).unwrap(),
            vec![Value::Text("Ada".into())]
        );
    }

    #[test]
    fn null_to_one_contributes_nothing() {
        assert_eq!(values(&author(), 1, &["pseudonym"]).unwrap(), vec![]);
    }

    #[test]
    fn fans_out_over_to_many() {
        assert_eq!(
            values(&author(), 2, &["books", "title"]).unwrap(),
            vec![Value::Text("A".into()), Value::Text("B".into())]
        );
    }

    #[test]
    fn terminal_collection_stays_packed_at_depth_zero() {
        assert_eq!(
            values(&author(), 0, &["tags"]).unwrap(),
            vec![Value::List(vec![
                Value::Text("classic".into()),
                Value::Text("scifi".into()),
            ])]
        );
    }

    #[test]
    fn mid_path_to_many_without_depth_is_an_error() {
        let err = values(&author(), 0, &["books", "title"]).unwrap_err();
        assert_eq!(
            err,
            PathError::UnexpectedToMany {
                path: "books".into()
            }
        );
    }

    #[test]
    fn missing_segment_is_an_error() {
        let err = values(&author(), 1, &["missing"]).unwrap_err();
        assert_eq!(
            err,
            PathError::SegmentNotFound {
                segment: "missing".into(),
                path: "missing".into(),
            }
        );
    }

    #[test]
    fn scalar_traversal_is_an_error() {
        let err = values(&author(), 2, &["name", "length"]).unwrap_err();
        assert_eq!(
            err,
            PathError::NotTraversable {
                segment: "length".into(),
                path: "name.length".into(),
            }
        );
    }

    #[test]
    fn empty_to_many_yields_empty_column() {
        let root = json!({ "books": [] });
        assert_eq!(values(&root, 2, &["books", "title"]).unwrap(), vec![]);
    }
}
