use roxmltree::{Document, Node};

use crate::element::{Element, Header};
use crate::F;

#[derive(thiserror::Error, Debug)]
pub enum XmlError {
    #[error("malformed XML markup: {0}")]
    Malformed(#[from] roxmltree::Error),
    #[error("document has no root element")]
    NoRoot,
    #[error("root element is '{0}', expected 'svg'")]
    NotSvg(String),
    #[error("'{attribute}' is not implemented (found on <{tag}>)")]
    UnsupportedAttribute { tag: String, attribute: &'static str },
}

const XLINK_NS: &str = "http://www.w3.org/1999/xlink";

/// Decodes an SVG document's markup into the owned [`Element`] tree.
/// Unrecognised tag names are logged at `debug` and skipped along with
/// their subtree, producing neither a leaf nor a container.
pub fn decode(xml_text: &str) -> Result<Element, XmlError> {
    let doc = Document::parse(xml_text)?;
    let root = doc.root_element();
    if root.tag_name().name() != "svg" {
        return Err(XmlError::NotSvg(root.tag_name().name().to_string()));
    }
    node_to_element(root)?.ok_or(XmlError::NoRoot)
}

/// `transform-origin`/`transform-box` are rejected rather than silently
/// ignored when present with a non-empty value: this decoder only ever
/// implements the plain `transform` attribute's coordinate-space rules.
fn reject_unsupported_transform_attrs(node: Node) -> Result<(), XmlError> {
    for attribute in ["transform-origin", "transform-box"] {
        if let Some(value) = node.attribute(attribute) {
            if !value.trim().is_empty() {
                return Err(XmlError::UnsupportedAttribute { tag: node.tag_name().name().to_string(), attribute });
            }
        }
    }
    Ok(())
}

fn header(node: Node) -> Result<Header, XmlError> {
    reject_unsupported_transform_attrs(node)?;
    Ok(Header {
        id: node.attribute("id").map(str::to_string),
        transform: node.attribute("transform").map(str::to_string),
    })
}

fn attr_f64(node: Node, name: &str, default: F) -> F {
    node.attribute(name).and_then(|s| s.trim().parse().ok()).unwrap_or(default)
}

fn href_of(node: Node) -> String {
    node.attribute((XLINK_NS, "href"))
        .or_else(|| node.attribute("href"))
        .unwrap_or("")
        .to_string()
}

fn parse_points(s: &str) -> Vec<(F, F)> {
    let flat: Vec<F> = s
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|t| !t.is_empty())
        .filter_map(|t| t.parse::<F>().ok())
        .collect();
    flat.chunks_exact(2).map(|pair| (pair[0], pair[1])).collect()
}

fn children_of(node: Node) -> Result<Vec<Element>, XmlError> {
    let mut out = Vec::new();
    for child in node.children().filter(|n| n.is_element()) {
        if let Some(el) = node_to_element(child)? {
            out.push(el);
        }
    }
    Ok(out)
}

fn node_to_element(node: Node) -> Result<Option<Element>, XmlError> {
    let tag = node.tag_name().name();
    let h = header(node)?;
    let element = match tag {
        "svg" => Element::Svg { header: h, children: children_of(node)? },
        "g" => Element::Group { header: h, children: children_of(node)? },
        "a" => Element::Anchor { header: h, children: children_of(node)? },
        "defs" => Element::Defs { header: h, children: children_of(node)? },
        "use" => Element::Use {
            header: h,
            href: href_of(node),
            x: attr_f64(node, "x", 0.0),
            y: attr_f64(node, "y", 0.0),
        },
        "text" => Element::Text { header: h },
        "path" => Element::Path { header: h, d: node.attribute("d").unwrap_or("").to_string() },
        "line" => Element::Line {
            header: h,
            x1: attr_f64(node, "x1", 0.0),
            y1: attr_f64(node, "y1", 0.0),
            x2: attr_f64(node, "x2", 0.0),
            y2: attr_f64(node, "y2", 0.0),
        },
        "rect" => {
            let rx = attr_f64(node, "rx", 0.0).max(0.0);
            let ry = attr_f64(node, "ry", 0.0).max(0.0);
            let (rx, ry) = match (node.attribute("rx"), node.attribute("ry")) {
                (Some(_), None) => (rx, rx),
                (None, Some(_)) => (ry, ry),
                _ => (rx, ry),
            };
            Element::Rect {
                header: h,
                x: attr_f64(node, "x", 0.0),
                y: attr_f64(node, "y", 0.0),
                width: attr_f64(node, "width", 0.0),
                height: attr_f64(node, "height", 0.0),
                rx,
                ry,
            }
        }
        "circle" => Element::Circle {
            header: h,
            cx: attr_f64(node, "cx", 0.0),
            cy: attr_f64(node, "cy", 0.0),
            r: attr_f64(node, "r", 0.0),
        },
        "ellipse" => Element::Ellipse {
            header: h,
            cx: attr_f64(node, "cx", 0.0),
            cy: attr_f64(node, "cy", 0.0),
            rx: attr_f64(node, "rx", 0.0),
            ry: attr_f64(node, "ry", 0.0),
        },
        "polygon" => Element::Polygon {
            header: h,
            points: parse_points(node.attribute("points").unwrap_or("")),
        },
        "polyline" => Element::Polyline {
            header: h,
            points: parse_points(node.attribute("points").unwrap_or("")),
        },
        other => {
            log::debug!("skipping unrecognised element '<{other}>'");
            return Ok(None);
        }
    };
    Ok(Some(element))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_nested_group_with_line() {
        let doc = decode(r#"<svg><g transform="translate(1,2)"><line x1="0" y1="0" x2="1" y2="1"/></g></svg>"#).unwrap();
        match doc {
            Element::Svg { children, .. } => {
                assert_eq!(children.len(), 1);
                match &children[0] {
                    Element::Group { children, header } => {
                        assert_eq!(header.transform.as_deref(), Some("translate(1,2)"));
                        assert_eq!(children.len(), 1);
                    }
                    other => panic!("expected group, got {other:?}"),
                }
            }
            other => panic!("expected svg root, got {other:?}"),
        }
    }

    #[test]
    fn unknown_tag_is_skipped() {
        let doc = decode(r#"<svg><foo/><line x1="0" y1="0" x2="1" y2="1"/></svg>"#).unwrap();
        match doc {
            Element::Svg { children, .. } => assert_eq!(children.len(), 1),
            other => panic!("expected svg root, got {other:?}"),
        }
    }

    #[test]
    fn xlink_href_preferred_over_bare_href() {
        let doc = decode(
            r#"<svg xmlns:xlink="http://www.w3.org/1999/xlink"><use xlink:href="#a" href="#b"/></svg>"#,
        )
        .unwrap();
        match doc {
            Element::Svg { children, .. } => match &children[0] {
                Element::Use { href, .. } => assert_eq!(href, "#a"),
                other => panic!("expected use, got {other:?}"),
            },
            other => panic!("expected svg root, got {other:?}"),
        }
    }

    #[test]
    fn rect_single_radius_inherits_to_both_axes() {
        let doc = decode(r#"<svg><rect x="0" y="0" width="10" height="10" rx="2"/></svg>"#).unwrap();
        match doc {
            Element::Svg { children, .. } => match &children[0] {
                Element::Rect { rx, ry, .. } => {
                    assert_eq!(*rx, 2.0);
                    assert_eq!(*ry, 2.0);
                }
                other => panic!("expected rect, got {other:?}"),
            },
            other => panic!("expected svg root, got {other:?}"),
        }
    }

    #[test]
    fn nonempty_transform_origin_is_rejected() {
        let err = decode(r#"<svg><rect x="0" y="0" width="1" height="1" transform-origin="center"/></svg>"#)
            .unwrap_err();
        assert!(matches!(err, XmlError::UnsupportedAttribute { attribute: "transform-origin", .. }));
    }

    #[test]
    fn nonempty_transform_box_is_rejected() {
        let err = decode(r#"<svg><rect x="0" y="0" width="1" height="1" transform-box="fill-box"/></svg>"#)
            .unwrap_err();
        assert!(matches!(err, XmlError::UnsupportedAttribute { attribute: "transform-box", .. }));
    }

    #[test]
    fn empty_transform_origin_is_tolerated() {
        let doc = decode(r#"<svg><rect x="0" y="0" width="1" height="1" transform-origin=""/></svg>"#).unwrap();
        assert!(matches!(doc, Element::Svg { .. }));
    }

    #[test]
    fn polygon_points_parse_as_pairs() {
        let doc = decode(r#"<svg><polygon points="0,0 10,0 5,8"/></svg>"#).unwrap();
        match doc {
            Element::Svg { children, .. } => match &children[0] {
                Element::Polygon { points, .. } => {
                    assert_eq!(points, &vec![(0.0, 0.0), (10.0, 0.0), (5.0, 8.0)]);
                }
                other => panic!("expected polygon, got {other:?}"),
            },
            other => panic!("expected svg root, got {other:?}"),
        }
    }
}
