use psyl::{Arguments, Error, Keyword, Result, Value};

/// Split resolved argument values into positional and keyword arguments.
///
/// A keyword claims the element right after it as its value; neither is
/// positional. Two keywords in a row, or a keyword with nothing after it,
/// is an invocation error.
pub fn split_arguments(values: Vec<Value>) -> Result<Arguments> {
    let mut args = Arguments::default();
    let mut pending: Option<Keyword> = None;

    for value in values {
        match (pending.take(), value) {
            (Some(key), Value::Keyword(next)) => {
                return Err(Error::invocation(format!(
                    "keyword {key} is followed by keyword {next} instead of a value"
                )));
            }
            (Some(key), value) => {
                args.keywords.insert(key.name().to_string(), value);
            }
            (None, Value::Keyword(key)) => pending = Some(key),
            (None, value) => args.positional.push(value),
        }
    }

    match pending {
        Some(key) => Err(Error::invocation(format!("keyword {key} is missing a value"))),
        None => Ok(args),
    }
}

/// Invoke `head` with already evaluated argument values.
pub fn apply(head: Value, values: Vec<Value>) -> Result<Value> {
    match head {
        Value::Procedure(procedure) => procedure.call(split_arguments(values)?),
        other => Err(Error::invocation(format!(
            "cannot apply non-procedure {} {other}",
            other.type_name()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kw(name: &str) -> Value {
        Value::Keyword(Keyword::new(name))
    }

    #[test]
    fn test_positional_only() {
        let args = split_arguments(vec![Value::Int(1), Value::Int(2)]).unwrap();
        assert_eq!(args.positional, vec![Value::Int(1), Value::Int(2)]);
        assert!(args.keywords.is_empty());
    }

    #[test]
    fn test_mixed_arguments_keep_order() {
        let args = split_arguments(vec![
            Value::Int(1),
            kw("b"),
            Value::Int(2),
            Value::Int(3),
            kw("c"),
            Value::from("x"),
        ])
        .unwrap();
        assert_eq!(args.positional, vec![Value::Int(1), Value::Int(3)]);
        assert_eq!(args.keyword("b"), Some(&Value::Int(2)));
        assert_eq!(args.keyword("c"), Some(&Value::from("x")));
    }

    #[test]
    fn test_later_duplicate_keyword_wins() {
        let args = split_arguments(vec![kw("a"), Value::Int(1), kw("a"), Value::Int(2)]).unwrap();
        assert_eq!(args.keyword("a"), Some(&Value::Int(2)));
        assert_eq!(args.keywords.len(), 1);
    }

    #[test]
    fn test_adjacent_keywords_fail() {
        let err = split_arguments(vec![kw("a"), kw("b"), Value::Int(1)]).unwrap_err();
        assert!(matches!(err, Error::Invocation(_)));
    }

    #[test]
    fn test_dangling_keyword_fails() {
        let err = split_arguments(vec![Value::Int(1), kw("a")]).unwrap_err();
        assert!(matches!(err, Error::Invocation(_)));
    }

    #[test]
    fn test_apply_non_procedure() {
        let err = apply(Value::Int(3), vec![]).unwrap_err();
        assert!(matches!(err, Error::Invocation(_)));
    }
}
