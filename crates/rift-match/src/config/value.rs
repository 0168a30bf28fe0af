//! Conversion of YAML/JSON criterion values into builder values.

use crate::pattern::Value;
use serde_yaml::Value as YamlValue;

/// Convert a document value; `Ok(None)` means "not specified".
///
/// Scalars become text or numbers, mappings and sequences of `[key, value]`
/// pairs become query pairs. `null` and `false` are skipped.
pub fn criterion_value(value: &YamlValue) -> Result<Option<Value>, anyhow::Error> {
    match value {
        YamlValue::Null | YamlValue::Bool(false) => Ok(None),
        YamlValue::Tagged(tagged) => criterion_value(&tagged.value),
        YamlValue::Mapping(mapping) => {
            let pairs = mapping
                .iter()
                .map(|(k, v)| Ok((scalar(k)?, scalar(v)?)))
                .collect::<Result<Vec<_>, anyhow::Error>>()?;
            Ok(Some(Value::Pairs(pairs)))
        }
        YamlValue::Sequence(items) => {
            let pairs = items
                .iter()
                .map(pair)
                .collect::<Result<Vec<_>, anyhow::Error>>()?;
            Ok(Some(Value::Pairs(pairs)))
        }
        YamlValue::Number(n) => match n.as_i64() {
            Some(i) => Ok(Some(Value::Number(i))),
            None => Ok(Some(Value::Text(n.to_string()))),
        },
        scalar_value => Ok(Some(Value::Text(scalar(scalar_value)?))),
    }
}

fn pair(item: &YamlValue) -> Result<(String, String), anyhow::Error> {
    match item {
        YamlValue::Sequence(kv) if kv.len() == 2 => Ok((scalar(&kv[0])?, scalar(&kv[1])?)),
        other => anyhow::bail!("Expected a [key, value] pair, got {other:?}"),
    }
}

fn scalar(value: &YamlValue) -> Result<String, anyhow::Error> {
    match value {
        YamlValue::String(s) => Ok(s.clone()),
        YamlValue::Number(n) => Ok(n.to_string()),
        YamlValue::Bool(b) => Ok(b.to_string()),
        YamlValue::Null => Ok(String::new()),
        YamlValue::Tagged(tagged) => scalar(&tagged.value),
        other => anyhow::bail!("Expected a scalar, got {other:?}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(yaml: &str) -> Option<Value> {
        criterion_value(&serde_yaml::from_str(yaml).unwrap()).unwrap()
    }

    #[test]
    fn test_scalars() {
        assert!(matches!(parse("GET"), Some(Value::Text(s)) if s == "GET"));
        assert!(matches!(parse("443"), Some(Value::Number(443))));
        assert!(parse("null").is_none());
        assert!(parse("false").is_none());
    }

    #[test]
    fn test_mapping_becomes_pairs() {
        let value = parse("{ color: red, page: 2 }").unwrap();
        assert!(matches!(value, Value::Pairs(ref pairs) if pairs == &[
            ("color".to_string(), "red".to_string()),
            ("page".to_string(), "2".to_string()),
        ]));
    }

    #[test]
    fn test_sequence_of_pairs_keeps_duplicates() {
        let value = parse("[[a, '1'], [a, '2']]").unwrap();
        assert!(matches!(value, Value::Pairs(ref pairs) if pairs.len() == 2));
    }

    #[test]
    fn test_rejects_nested_structures() {
        let doc: YamlValue = serde_yaml::from_str("[[a, [b]]]").unwrap();
        assert!(criterion_value(&doc).is_err());
        let doc: YamlValue = serde_yaml::from_str("[a, b]").unwrap();
        assert!(criterion_value(&doc).is_err());
    }
}
