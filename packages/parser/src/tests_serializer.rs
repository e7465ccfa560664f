/// Tests to verify the serializer reproduces parsed markup
use crate::*;

#[test]
fn test_roundtrip_is_stable() {
    let sources = vec![
        r#"<div class="a b" id="x"><p>Hello <strong>world</strong></p></div>"#,
        r#"<table cellpadding="0"><tr><td colspan="2">cell</td></tr></table>"#,
        r#"<img src="a.png" alt=""><br><hr style="margin: 0">"#,
        r#"<a href="/x?a=1&amp;b=2" title="say &quot;hi&quot;">1 &lt; 2 &amp; 3</a>"#,
        "<p>a&nbsp;b</p><!-- kept -->",
        "<style>td > p { color: red; }</style>",
        "plain text only",
    ];

    for source in sources {
        let fragment = parse(source);
        let serialized = serialize(&fragment.nodes);
        assert_eq!(serialized, source, "not idempotent: {}", source);

        let reparsed = parse(&serialized);
        assert_eq!(fragment, reparsed);
    }
}

#[test]
fn test_normalizes_markup() {
    let fragment = parse("<DIV Class=box><BR/><input disabled></DIV>");
    assert_eq!(
        serialize(&fragment.nodes),
        r#"<div class="box"><br><input disabled=""></div>"#
    );
}

#[test]
fn test_self_closing_non_void_gets_end_tag() {
    let fragment = parse("<div/><span />");
    assert_eq!(serialize(&fragment.nodes), "<div></div><span></span>");
}

#[test]
fn test_serialize_element_outer_markup() {
    let element = Element::new("td")
        .with_attr("align", "center")
        .with_child(Node::text("a < b"));
    assert_eq!(
        serialize_element(&element),
        r#"<td align="center">a &lt; b</td>"#
    );
}

#[test]
fn test_unclosed_markup_is_closed() {
    let fragment = parse("<ul><li>one<li>two");
    assert_eq!(
        serialize(&fragment.nodes),
        "<ul><li>one</li><li>two</li></ul>"
    );
}
