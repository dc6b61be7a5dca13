use html::{identify, simplify};

#[test]
fn username_field_loses_oversized_class() {
    let markup =
        r#"<input id="username" class="very-long-class-name-that-exceeds-forty-characters-limit">"#;
    assert_eq!(simplify(markup), r#"<input id="username"></input>"#);
    assert_eq!(identify(markup), "id:username");
}

#[test]
fn identity_ignores_attributes_outside_allow_list() {
    let pairs = [
        (
            r#"<input name="email" autocomplete="off">"#,
            r#"<input name="email" autocomplete="on" aria-invalid="true">"#,
        ),
        (
            r#"<li class="item">Home</li>"#,
            r#"<li class="item" style="display:block" tabindex="0">Home</li>"#,
        ),
        (
            r#"<input type="text" placeholder="City">"#,
            r#"<input type="text" placeholder="City" value="Paris">"#,
        ),
    ];
    for (left, right) in pairs {
        assert_eq!(identify(left), identify(right), "{left} vs {right}");
    }
}

#[test]
fn malformed_markup_never_panics() {
    let inputs = [
        "<",
        "<<>>",
        r#"<div class="unterminated"#,
        "</span>",
        "<td>cell</td>",
        "<a href='x'>one</a><a href='y'>two",
        "\u{0}\u{feff}",
    ];
    for markup in inputs {
        let simplified = simplify(markup);
        let identity = identify(markup);
        assert_eq!(simplify(markup), simplified);
        assert_eq!(identify(markup), identity);
    }
}

#[test]
fn stray_table_cell_keeps_its_tag() {
    assert_eq!(simplify("<td> cell </td>"), "<td>cell</td>");
}

#[test]
fn clicked_table_parts_keep_tag_and_attributes() {
    let cell = r#"<td id="cell-7" class="oxd-table-cell">Admin</td>"#;
    assert_eq!(simplify(cell), cell);
    assert_eq!(identify(cell), "id:cell-7");

    let row = r#"<tr id="row-3"><td>Alice</td><td>HR</td></tr>"#;
    assert_eq!(identify(row), "id:row-3");
    assert_eq!(
        simplify(r#"<caption class="title">Users</caption>"#),
        r#"<caption class="title">Users</caption>"#
    );
    assert_eq!(simplify("<tbody><tr><td>x</td></tr></tbody>"), "<tbody>x</tbody>");
}

#[test]
fn header_and_data_cells_have_distinct_identities() {
    assert_ne!(identify("<th>Name</th>"), identify("<td>Name</td>"));
    assert_eq!(identify("<th>Name</th>"), "<th>Name</th>");
}

#[test]
fn document_level_tags_survive_when_they_lead() {
    assert_eq!(
        simplify(r#"<body class="home"><p>hi</p></body>"#),
        r#"<body class="home">hi</body>"#
    );
    assert_eq!(identify(r#"<body id="main"><p>hi</p></body>"#), "id:main");
    assert_eq!(simplify(r#"<html lang="en"><body>x</body></html>"#), "<html>x</html>");
}

#[test]
fn identity_uses_first_top_level_element() {
    assert_eq!(identify(r#"<span id="a"></span><b id="b"></b>"#), "id:a");
    assert_eq!(identify(r#"text <b name="x"></b><i id="y"></i>"#), "name:x");
}
