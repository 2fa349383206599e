use rstest::rstest;
use serde::Deserialize;
use serde_json::json;

use formpath::{ErrorKind, ParseOptions};

#[derive(Debug, Deserialize, PartialEq)]
struct Address {
    city: String,
    lines: Vec<String>,
}

#[derive(Debug, Deserialize, PartialEq)]
struct Signup {
    name: String,
    age: i64,
    address: Address,
    #[serde(default)]
    newsletter: Option<String>,
}

const BODY: &[u8] = b"name=Ada&age%5Bvalue%5D=37&address%5Bcity%5D=Oslo\
&address%5Blines%5D%5B0%5D=Main+St&address%5Blines%5D%5B1%5D=Apt+4";

#[rstest]
fn urlencoded_body_parses_to_nested_value() {
    let fields = formpath::parse_urlencoded(BODY, &ParseOptions::default());
    assert_eq!(
        formpath::to_value(&fields),
        json!({
            "name": "Ada",
            "age": {"value": 37},
            "address": {"city": "Oslo", "lines": ["Main St", "Apt 4"]}
        })
    );
}

#[rstest]
fn typed_extraction() {
    let body = b"name=Ada&age=37&address%5Bcity%5D=Oslo&address%5Blines%5D%5B0%5D=Main+St";
    let signup: Result<Signup, _> = formpath::from_urlencoded(body, &ParseOptions::default());
    // Plain names stay text, so `age` cannot become an integer.
    let err = signup.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Deserialize);

    let entries = [
        ("name", "Ada"),
        ("age[0]", "37"),
        ("address[city]", "Oslo"),
        ("address[lines][0]", "Main St"),
    ];

    #[derive(Debug, Deserialize)]
    struct Ages {
        age: Vec<i64>,
    }
    let ages: Ages = formpath::from_entries(entries, &ParseOptions::default()).unwrap();
    assert_eq!(ages.age, vec![37]);
}

#[rstest]
fn typed_extraction_into_struct() {
    #[derive(Debug, Deserialize, PartialEq)]
    struct Form {
        user: Signup,
    }

    let entries = [
        ("user[name]", "Ada"),
        ("user[age]", "37"),
        ("user[address][city]", "Oslo"),
        ("user[address][lines][0]", "Main St"),
    ];
    let form: Form = formpath::from_entries(entries, &ParseOptions::default()).unwrap();
    assert_eq!(
        form.user,
        Signup {
            name: "Ada".to_string(),
            age: 37,
            address: Address {
                city: "Oslo".to_string(),
                lines: vec!["Main St".to_string()],
            },
            newsletter: None,
        }
    );
}

#[rstest]
fn strict_urlencoded_rejects_repairs() {
    let options = ParseOptions::new().with_strict(true);
    let err = formpath::try_parse_urlencoded(b"a%5B%5D=1", &options).unwrap_err();
    assert_eq!(err.kind, ErrorKind::Syntax);
}

#[rstest]
fn flattened_map_round_trips_through_urlencoding() {
    let fields = formpath::parse([("tags[0]", "a"), ("tags[2]", "b"), ("q", "x y")], true);
    let body = formpath::to_urlencoded(&fields);
    assert_eq!(body, "tags=%5B%22a%22%2C%22b%22%5D&q=x+y");

    let decoded = formpath::entries_from_urlencoded(body.as_bytes());
    let again = formpath::parse(&decoded, false);
    assert_eq!(again, fields);
}

#[rstest]
fn query_string_groups_repeated_keys() {
    let grouped = formpath::group_query("?page=2&tag=a&tag=b");
    assert_eq!(
        formpath::to_value(&grouped),
        json!({"page": "2", "tag": ["a", "b"]})
    );
}

#[rstest]
fn to_json_string_is_compact() {
    let fields = formpath::parse([("a[0]", "1")], false);
    assert_eq!(formpath::to_json_string(&fields), r#"{"a":[1]}"#);
}
