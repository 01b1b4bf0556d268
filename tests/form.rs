use docx_stencil::Error;
use docx_stencil::form::{
    compose_state_country, items_from_json, mapping_from_json, pack_repeating, sanitize_filename,
};

fn column(field: &str, values: &[&str]) -> (String, Vec<String>) {
    (field.to_string(), values.iter().map(|v| v.to_string()).collect())
}

#[test]
fn packs_columns_into_rows_and_drops_empty_rows() {
    let items = pack_repeating(&[
        column("[Company Name]", &["  Acme ", "", "Initech"]),
        column("[City]", &["Paris", "   "]),
    ]);
    assert_eq!(items.len(), 2);
    assert_eq!(items[0].get("[Company Name]"), Some("Acme"));
    assert_eq!(items[0].get("[City]"), Some("Paris"));
    assert_eq!(items[1].get("[Company Name]"), Some("Initech"));
    assert_eq!(items[1].get("[City]"), Some(""));
}

#[test]
fn packing_no_columns_yields_no_items() {
    assert!(pack_repeating(&[]).is_empty());
}

#[test]
fn composes_state_and_country() {
    assert_eq!(compose_state_country("", ""), "");
    assert_eq!(compose_state_country("CA", "USA"), "CA");
    assert_eq!(compose_state_country("NY", " United States "), "NY");
    assert_eq!(compose_state_country("Bavaria", "Germany"), "Bavaria, Germany");
    assert_eq!(compose_state_country("", "Norway"), "Norway");
    assert_eq!(compose_state_country("Ontario", ""), "Ontario");
    assert_eq!(compose_state_country("", "us"), "");
}

#[test]
fn sanitizes_filenames() {
    assert_eq!(sanitize_filename("Ada Lovelace"), "Ada_Lovelace");
    assert_eq!(sanitize_filename("  a/b\\c:d*  "), "abcd");
    assert_eq!(sanitize_filename("résumé v2.1 - final"), "résumé_v2.1_-_final");
    assert_eq!(sanitize_filename("???"), "Document");
    assert_eq!(sanitize_filename("__x__"), "x");
}

#[test]
fn parses_values_in_key_order() {
    let mapping =
        mapping_from_json(r#"{"[Z]": "last", "[A]": 1, "[Flag]": true, "[None]": null}"#).unwrap();
    let entries: Vec<_> = mapping.iter().collect();
    assert_eq!(
        entries,
        vec![("[Z]", "last"), ("[A]", "1"), ("[Flag]", "true"), ("[None]", "")]
    );
}

#[test]
fn rejects_nested_values() {
    let err = mapping_from_json(r#"{"[A]": {"nested": 1}}"#).unwrap_err();
    assert!(matches!(err, Error::Input(_)));
    assert!(matches!(mapping_from_json("[1, 2]"), Err(Error::Input(_))));
}

#[test]
fn parses_items_as_records_or_columns() {
    let records = items_from_json(r#"[{"[Company Name]": "Acme"}, {"[Company Name]": "Globex"}]"#)
        .unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[1].get("[Company Name]"), Some("Globex"));

    let columns =
        items_from_json(r#"{"[Company Name]": ["Acme", "", "Initech"], "[City]": ["Paris"]}"#)
            .unwrap();
    assert_eq!(columns.len(), 2);
    assert_eq!(columns[1].get("[Company Name]"), Some("Initech"));

    assert!(matches!(items_from_json(r#"{"[A]": "x"}"#), Err(Error::Input(_))));
}
