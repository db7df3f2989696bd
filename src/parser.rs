use tracing::{debug, trace};

use crate::options::ParseOptions;
use crate::query::{Field, KeywordValue, Query, RangeValue, TEXT_FIELD};
use crate::tokenizer::{normalize, tokenize};

const KEY_SEPARATOR: char = ':';
const VALUE_SEPARATOR: char = ',';
const RANGE_SEPARATOR: char = '-';

/// Parses a search string into free text and the fields named in `options`.
///
/// Never fails: anything that isn't a recognized `key:value` pair ends up as
/// free text.
pub fn parse(input: &str, options: &ParseOptions) -> Query {
    let normalized = normalize(input);
    let mut query = Query::default();

    for token in tokenize(&normalized) {
        // Left behind when a closing quote is followed by a space.
        if token.is_empty() {
            continue;
        }

        classify(&mut query, &token, options);
    }

    query
}

fn classify(query: &mut Query, token: &str, options: &ParseOptions) {
    let Some((key, value)) = token.split_once(KEY_SEPARATOR) else {
        trace!(token, "free text");
        push_text(query, token);
        return;
    };

    if key == TEXT_FIELD {
        trace!(token, "reserved key, free text");
        push_text(query, token);
    } else if options.is_keyword(key) {
        add_keyword(query, key, value);
    } else if options.is_range(key) {
        set_range(query, key, value);
    } else {
        debug!(token, key, "unregistered key, folding into free text");
        push_text(query, token);
    }
}

fn push_text(query: &mut Query, token: &str) {
    query.text.push(token.trim().to_string());
}

/// First occurrence: split on commas, kept as a scalar when there is only one
/// value. Later occurrences grow a list; when the previous value was a scalar
/// the new raw value is appended without splitting.
fn add_keyword(query: &mut Query, key: &str, value: &str) {
    if value.is_empty() {
        debug!(key, "empty keyword value, dropping token");
        return;
    }

    let values: Vec<&str> = value.split(VALUE_SEPARATOR).collect();
    trace!(key, value, count = values.len(), "keyword");

    let next = match query.keyword(key) {
        None => {
            if values.len() > 1 {
                KeywordValue::List(to_owned(&values))
            } else {
                KeywordValue::Scalar(value.to_string())
            }
        }
        Some(KeywordValue::List(existing)) => {
            let mut list = existing.clone();
            if values.len() > 1 {
                list.extend(to_owned(&values));
            } else {
                list.push(value.to_string());
            }
            KeywordValue::List(list)
        }
        Some(KeywordValue::Scalar(existing)) => {
            KeywordValue::List(vec![existing.clone(), value.to_string()])
        }
    };

    query.set(key, Field::Keyword(next));
}

/// `from-to` when the value has exactly one dash, otherwise the whole value
/// becomes `from`.
fn set_range(query: &mut Query, key: &str, value: &str) {
    let range = match value.split_once(RANGE_SEPARATOR) {
        Some((from, to)) if !to.contains(RANGE_SEPARATOR) => RangeValue {
            from: from.to_string(),
            to: Some(to.to_string()),
        },
        _ => {
            debug!(key, value, "range without a single dash, keeping whole value");
            RangeValue {
                from: value.to_string(),
                to: None,
            }
        }
    };

    trace!(key, ?range, "range");
    query.set(key, Field::Range(range));
}

fn to_owned(values: &[&str]) -> Vec<String> {
    values.iter().map(|s| s.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::TextValue;
    use test_case::test_case;

    fn keywords(names: &[&str]) -> ParseOptions {
        ParseOptions::new().with_keywords(names.iter().copied())
    }

    fn ranges(names: &[&str]) -> ParseOptions {
        ParseOptions::new().with_ranges(names.iter().copied())
    }

    fn list(values: &[&str]) -> KeywordValue {
        KeywordValue::List(values.iter().map(|s| s.to_string()).collect())
    }

    fn scalar(value: &str) -> KeywordValue {
        KeywordValue::Scalar(value.to_string())
    }

    #[test]
    fn single_word() {
        let q = parse("foo", &ParseOptions::default());
        assert_eq!(q.text(), Some(TextValue::Scalar("foo")));
        assert_eq!(q.fields().count(), 0);
    }

    #[test]
    fn words_keep_order() {
        let q = parse("foo  bar baz", &ParseOptions::default());
        assert_eq!(q.text, vec!["foo", "bar", "baz"]);
    }

    #[test]
    fn quoted_phrase_is_one_term() {
        let q = parse("\"foo bar\"", &ParseOptions::default());
        assert_eq!(q.text(), Some(TextValue::Scalar("foo bar")));
    }

    #[test]
    fn phrase_followed_by_word() {
        let q = parse("\"foo bar\" baz", &ParseOptions::default());
        assert_eq!(q.text, vec!["foo bar", "baz"]);
    }

    #[test]
    fn quoted_phrase_is_trimmed() {
        let q = parse("\" foo \"", &ParseOptions::default());
        assert_eq!(q.text, vec!["foo"]);
    }

    #[test]
    fn blank_input_is_empty() {
        assert!(parse("   ", &ParseOptions::default()).is_empty());
    }

    #[test_case("tags:a,b,c", &["tags"] => list(&["a", "b", "c"]) ; "first occurrence splits")]
    #[test_case("tag:a", &["tag"] => scalar("a") ; "single value stays scalar")]
    #[test_case("tag:a tag:b,c", &["tag"] => list(&["a", "b,c"]) ; "second occurrence not split")]
    #[test_case("tag:a tag:b tag:c,d", &["tag"] => list(&["a", "b", "c", "d"]) ; "list grows by split values")]
    #[test_case("tag:a,b tag:c", &["tag"] => list(&["a", "b", "c"]) ; "list grows by single value")]
    #[test_case("tag:a, tag:b", &["tag"] => list(&["a", "", "b"]) ; "trailing comma yields empty entry")]
    #[test_case("tag:a tag: tag:b", &["tag"] => list(&["a", "b"]) ; "empty value ignored between")]
    #[test_case("tag:a:b", &["tag"] => scalar("a:b") ; "only first colon splits")]
    fn keyword_accumulation(input: &str, names: &[&str]) -> KeywordValue {
        parse(input, &keywords(names)).keyword(names[0]).unwrap().clone()
    }

    #[test]
    fn empty_keyword_value_vanishes() {
        let q = parse("flag:", &keywords(&["flag"]));
        assert!(q.is_empty());
        assert_eq!(serde_json::to_string(&q).unwrap(), "{}");
    }

    #[test_case("from:1-2" => RangeValue { from: "1".into(), to: Some("2".into()) } ; "two parts")]
    #[test_case("from:2016-01-01-2016-02-01" => RangeValue { from: "2016-01-01-2016-02-01".into(), to: None } ; "many parts")]
    #[test_case("from:2016" => RangeValue { from: "2016".into(), to: None } ; "one part")]
    #[test_case("from:" => RangeValue { from: "".into(), to: None } ; "empty value")]
    #[test_case("from:1-" => RangeValue { from: "1".into(), to: Some("".into()) } ; "open end")]
    #[test_case("from:-2" => RangeValue { from: "".into(), to: Some("2".into()) } ; "open start")]
    #[test_case("from:a-b,c-d" => RangeValue { from: "a-b,c-d".into(), to: None } ; "pairs are not supported")]
    fn range_values(input: &str) -> RangeValue {
        parse(input, &ranges(&["from"])).range("from").unwrap().clone()
    }

    #[test]
    fn repeated_range_keeps_last() {
        let q = parse("date:1-2 date:3-4", &ranges(&["date"]));
        assert_eq!(
            q.range("date"),
            Some(&RangeValue {
                from: "3".into(),
                to: Some("4".into())
            })
        );
        assert_eq!(q.fields().count(), 1);
    }

    #[test]
    fn unregistered_key_is_text() {
        let q = parse("color:red", &ParseOptions::default());
        assert_eq!(q.text(), Some(TextValue::Scalar("color:red")));
        assert!(q.get("color").is_none());
    }

    #[test]
    fn keyword_wins_over_range() {
        let options = keywords(&["when"]).with_ranges(["when"]);
        let q = parse("when:1-2", &options);
        assert_eq!(q.keyword("when"), Some(&scalar("1-2")));
    }

    #[test]
    fn text_key_is_reserved() {
        let options = keywords(&["text"]).with_ranges(["text"]);
        let q = parse("text:foo bar", &options);
        assert_eq!(q.text, vec!["text:foo", "bar"]);
        assert!(q.get("text").is_none());
    }

    #[test]
    fn empty_key_can_be_configured() {
        let q = parse(":a", &keywords(&[""]));
        assert_eq!(q.keyword(""), Some(&scalar("a")));
    }

    #[test]
    fn mixed_query() {
        let options = keywords(&["tag"]).with_ranges(["date"]);
        let q = parse(
            "foo bar tag:a,b date:2016-2017 \"quoted phrase\" color:red",
            &options,
        );

        assert_eq!(q.text, vec!["foo", "bar", "quoted phrase", "color:red"]);
        assert_eq!(q.keyword("tag"), Some(&list(&["a", "b"])));
        assert_eq!(
            q.range("date"),
            Some(&RangeValue {
                from: "2016".into(),
                to: Some("2017".into())
            })
        );
        let names: Vec<_> = q.fields().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["tag", "date"]);
    }

    #[test]
    fn quoted_keyword_value_keeps_spaces() {
        let q = parse("author:\"jane doe\"", &keywords(&["author"]));
        assert_eq!(q.keyword("author"), Some(&scalar("jane doe")));
    }
}
